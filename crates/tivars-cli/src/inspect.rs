//! File format detection and summaries.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::debug;

use tivars::header::{
    ENTRIES_OFFSET, FLASH_SIGNATURE, checksum, parse_container_header, parse_entry_header,
    read_checksum,
};
use tivars::{Series, read_flash_application, read_variables};

use crate::types::{
    EntrySummary, FileSummary, FlashFileSummary, PageSummary, VariableFileSummary,
};

/// File families recognized by their signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Variables(Series),
    Flash,
}

/// Detect the file family from the leading signature bytes.
#[must_use]
pub fn detect_format(data: &[u8]) -> Option<FileFormat> {
    let signature = data.get(..8)?;
    if signature == FLASH_SIGNATURE.as_slice() {
        return Some(FileFormat::Flash);
    }
    Series::from_signature(signature).map(FileFormat::Variables)
}

/// Read and summarize a file.
pub fn inspect_file(path: &Path) -> Result<FileSummary> {
    let data = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    inspect_bytes(&data).with_context(|| format!("inspect {}", path.display()))
}

/// Summarize an in-memory file.
pub fn inspect_bytes(data: &[u8]) -> Result<FileSummary> {
    match detect_format(data) {
        Some(FileFormat::Variables(series)) => {
            debug!(%series, "detected variable file");
            summarize_variables(data).map(FileSummary::Variables)
        }
        Some(FileFormat::Flash) => {
            debug!("detected flash application");
            summarize_flash(data).map(FileSummary::Flash)
        }
        None => bail!("unrecognized file signature"),
    }
}

fn summarize_variables(data: &[u8]) -> Result<VariableFileSummary> {
    let variables = read_variables(data).context("parse variable file")?;
    let header = parse_container_header(data)?;

    let mut entries = Vec::with_capacity(variables.len());
    let mut offset = ENTRIES_OFFSET;
    for variable in &variables {
        let entry = parse_entry_header(data, offset)?;
        entries.push(EntrySummary {
            name: variable.display_name(),
            kind: variable
                .kind()
                .map_or_else(|| "Unknown".to_string(), |kind| kind.to_string()),
            type_tag: entry.type_tag,
            data_length: entry.data_length,
            version: entry.version,
            archived: entry.archived(),
        });
        offset = entry.next_offset();
    }

    let stored = read_checksum(data, &header)?;
    let computed = checksum(&data[ENTRIES_OFFSET..header.entries_end()]);
    Ok(VariableFileSummary {
        series: header.series.to_string(),
        comment: header.comment,
        entries_length: header.entries_length,
        checksum_valid: stored == computed,
        entries,
    })
}

fn summarize_flash(data: &[u8]) -> Result<FlashFileSummary> {
    let app = read_flash_application(data).context("parse flash application")?;
    Ok(FlashFileSummary {
        name: app.name().to_string(),
        revision: app.revision.to_string(),
        series: app.series.to_string(),
        date: app.timestamp.format("%Y-%m-%d").to_string(),
        pages: app
            .pages()
            .map(|(index, page)| PageSummary {
                index,
                bytes: page.len(),
            })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tivars::{AppVar, FlashApplication, Variable, write_flash_application, write_variables};

    #[test]
    fn test_detect_format() {
        assert_eq!(
            detect_format(b"**TI83**rest"),
            Some(FileFormat::Variables(Series::Ti83))
        );
        assert_eq!(detect_format(b"**TIFL**rest"), Some(FileFormat::Flash));
        assert_eq!(detect_format(b"**TI82**rest"), None);
        assert_eq!(detect_format(b"short"), None);
    }

    #[test]
    fn test_variable_summary() {
        let variable = Variable::named("SAVE", AppVar::new(vec![1, 2, 3]))
            .unwrap()
            .archived(true);
        let bytes = write_variables(&[variable], "note").unwrap();

        let FileSummary::Variables(summary) = inspect_bytes(&bytes).unwrap() else {
            panic!("expected a variable file");
        };
        assert_eq!(summary.comment, "note");
        assert!(summary.checksum_valid);
        assert_eq!(summary.entries.len(), 1);
        assert_eq!(summary.entries[0].name, "SAVE");
        assert_eq!(summary.entries[0].kind, "AppVar");
        assert_eq!(summary.entries[0].data_length, 5);
        assert!(summary.entries[0].archived);
    }

    #[test]
    fn test_flash_summary() {
        let mut app = FlashApplication::new("DEMO").unwrap();
        app.set_page(0, vec![0; 10]).unwrap();
        app.set_page(2, vec![0; 4]).unwrap();
        let bytes = write_flash_application(&app).unwrap();

        let FileSummary::Flash(summary) = inspect_bytes(&bytes).unwrap() else {
            panic!("expected a flash file");
        };
        assert_eq!(summary.name, "DEMO");
        assert_eq!(summary.revision, "1.0");
        assert_eq!(summary.pages.len(), 2);
        assert_eq!(summary.pages[1].index, 2);
        assert_eq!(summary.pages[1].bytes, 4);
    }
}
