//! Summaries printed by `inspect`, serializable for `--json`.

use serde::Serialize;

/// Everything `inspect` reports about one file.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "format", rename_all = "snake_case")]
pub enum FileSummary {
    Variables(VariableFileSummary),
    Flash(FlashFileSummary),
}

#[derive(Debug, Clone, Serialize)]
pub struct VariableFileSummary {
    pub series: String,
    pub comment: String,
    pub entries_length: u16,
    pub checksum_valid: bool,
    pub entries: Vec<EntrySummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntrySummary {
    pub name: String,
    pub kind: String,
    pub type_tag: u8,
    pub data_length: u16,
    pub version: u8,
    pub archived: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct FlashFileSummary {
    pub name: String,
    pub revision: String,
    pub series: String,
    pub date: String,
    pub pages: Vec<PageSummary>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PageSummary {
    pub index: u16,
    pub bytes: usize,
}
