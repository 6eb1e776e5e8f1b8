//! Structural validation of variable files.
//!
//! Unlike [`read_variables`](crate::read_variables), the validator walks a
//! file without stopping at the first problem and reports every issue it
//! finds, including a container checksum mismatch, which the reader never
//! checks.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use tivars::validate::VariableFileValidator;
//!
//! let report = VariableFileValidator::validate_file(Path::new("L1.8xl")).unwrap();
//!
//! println!("Valid: {}", report.is_valid());
//! for issue in report.issues() {
//!     println!("{}: {} at {}", issue.severity, issue.message, issue.location);
//! }
//! ```

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::header::{
    ContainerHeader, ENTRIES_OFFSET, EntryHeader, checksum, parse_container_header,
    parse_entry_header, read_checksum,
};
use crate::payload::decode_payload;
use crate::types::{Series, TypeTag, VarName};

/// Validation issue severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ValidationSeverity {
    /// Informational message, not an error.
    Info,
    /// Warning - file is readable but has potential issues.
    Warning,
    /// Error - file cannot be read.
    Error,
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARNING"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// Location in the file where an issue was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationLocation {
    /// Byte offset in the file.
    pub offset: Option<usize>,
    /// Section of the file.
    pub section: String,
    /// Zero-based entry index (if applicable).
    pub entry: Option<usize>,
}

impl ValidationLocation {
    /// Create a new location with section only.
    pub fn section(section: impl Into<String>) -> Self {
        Self {
            offset: None,
            section: section.into(),
            entry: None,
        }
    }

    /// Create a new location with offset.
    pub fn at_offset(offset: usize, section: impl Into<String>) -> Self {
        Self {
            offset: Some(offset),
            section: section.into(),
            entry: None,
        }
    }

    /// Create a new location for an entry.
    pub fn entry(index: usize, offset: usize) -> Self {
        Self {
            offset: Some(offset),
            section: format!("ENTRY[{index}]"),
            entry: Some(index),
        }
    }
}

impl fmt::Display for ValidationLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.offset {
            Some(offset) => write!(f, "{}, offset {offset}", self.section),
            None => f.write_str(&self.section),
        }
    }
}

/// A single validation issue.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationIssue {
    /// Severity of the issue.
    pub severity: ValidationSeverity,
    /// Issue code for programmatic handling.
    pub code: &'static str,
    /// Human-readable message.
    pub message: String,
    /// Location in the file.
    pub location: ValidationLocation,
}

impl ValidationIssue {
    /// Create a new validation issue.
    pub fn new(
        severity: ValidationSeverity,
        code: &'static str,
        message: impl Into<String>,
        location: ValidationLocation,
    ) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            location,
        }
    }

    /// Create an error issue.
    pub fn error(
        code: &'static str,
        message: impl Into<String>,
        location: ValidationLocation,
    ) -> Self {
        Self::new(ValidationSeverity::Error, code, message, location)
    }

    /// Create a warning issue.
    pub fn warning(
        code: &'static str,
        message: impl Into<String>,
        location: ValidationLocation,
    ) -> Self {
        Self::new(ValidationSeverity::Warning, code, message, location)
    }

    /// Create an info issue.
    pub fn info(
        code: &'static str,
        message: impl Into<String>,
        location: ValidationLocation,
    ) -> Self {
        Self::new(ValidationSeverity::Info, code, message, location)
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {} (at {})",
            self.code, self.severity, self.message, self.location
        )
    }
}

/// Result of validating one variable file.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    issues: Vec<ValidationIssue>,
    /// Detected series.
    pub series: Option<Series>,
    /// Container comment (if the header parsed).
    pub comment: Option<String>,
    /// Number of entries whose framing parsed.
    pub entry_count: usize,
    /// File size in bytes.
    pub file_size: usize,
}

impl ValidationReport {
    fn new(file_size: usize) -> Self {
        Self {
            issues: Vec::new(),
            series: None,
            comment: None,
            entry_count: 0,
            file_size,
        }
    }

    fn add_issue(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    /// Check if the file is readable (no errors).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.error_count() == 0
    }

    /// Get all validation issues.
    #[must_use]
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    /// Get issues of a specific severity.
    #[must_use]
    pub fn issues_by_severity(&self, severity: ValidationSeverity) -> Vec<&ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == severity)
            .collect()
    }

    /// Count issues of a specific severity.
    #[must_use]
    pub fn count(&self, severity: ValidationSeverity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.count(ValidationSeverity::Error)
    }

    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.count(ValidationSeverity::Warning)
    }

    #[must_use]
    pub fn info_count(&self) -> usize {
        self.count(ValidationSeverity::Info)
    }

    /// Whether an issue with `code` was reported.
    #[must_use]
    pub fn has_code(&self, code: &str) -> bool {
        self.issues.iter().any(|i| i.code == code)
    }

    /// Generate a summary report.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "=== Variable File Validation Report ===".to_string(),
            format!("File size: {} bytes", self.file_size),
        ];
        if let Some(series) = self.series {
            lines.push(format!("Series: {series}"));
        }
        if let Some(ref comment) = self.comment {
            lines.push(format!("Comment: {comment}"));
        }
        lines.push(format!("Entries: {}", self.entry_count));

        lines.push(String::new());
        lines.push(format!(
            "Status: {} ({} errors, {} warnings, {} info)",
            if self.is_valid() { "VALID" } else { "INVALID" },
            self.error_count(),
            self.warning_count(),
            self.info_count()
        ));

        if !self.issues.is_empty() {
            lines.push(String::new());
            lines.push("Issues:".to_string());
            for issue in &self.issues {
                lines.push(format!("  {issue}"));
            }
        }

        lines.join("\n")
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary())
    }
}

/// Variable file validator.
pub struct VariableFileValidator;

impl VariableFileValidator {
    /// Validate a variable file from a path.
    pub fn validate_file(path: &Path) -> Result<ValidationReport> {
        let data = fs::read(path)?;
        Ok(Self::validate_bytes(&data))
    }

    /// Validate a variable file from bytes.
    #[must_use]
    pub fn validate_bytes(data: &[u8]) -> ValidationReport {
        let mut report = ValidationReport::new(data.len());

        let header = match parse_container_header(data) {
            Ok(header) => header,
            Err(e) => {
                report.add_issue(ValidationIssue::error(
                    "TIV001",
                    format!("Invalid container header: {e}"),
                    ValidationLocation::at_offset(0, "HEADER"),
                ));
                return report;
            }
        };
        report.series = Some(header.series);
        report.comment = Some(header.comment.clone());
        report.add_issue(ValidationIssue::info(
            "TIV000",
            format!(
                "Detected {} file with {} bytes of entries",
                header.series, header.entries_length
            ),
            ValidationLocation::section("HEADER"),
        ));

        let entries_end = header.entries_end();
        let mut offset = ENTRIES_OFFSET;
        let mut index = 0;
        while offset < entries_end {
            let entry = match parse_entry_header(data, offset) {
                Ok(entry) => entry,
                Err(e) => {
                    report.add_issue(ValidationIssue::error(
                        "TIV010",
                        format!("Invalid entry framing: {e}"),
                        ValidationLocation::entry(index, offset),
                    ));
                    return report;
                }
            };
            Self::validate_entry(data, index, &entry, header.series, &mut report);
            report.entry_count += 1;
            offset = entry.next_offset();
            index += 1;
        }

        if offset > entries_end {
            report.add_issue(ValidationIssue::error(
                "TIV011",
                format!(
                    "Last entry ends at {offset}, past the declared entries end {entries_end}"
                ),
                ValidationLocation::at_offset(entries_end, "ENTRIES"),
            ));
            return report;
        }

        Self::validate_checksum(data, &header, &mut report);
        report
    }

    fn validate_entry(
        data: &[u8],
        index: usize,
        entry: &EntryHeader,
        series: Series,
        report: &mut ValidationReport,
    ) {
        let location = || ValidationLocation::entry(index, entry.offset);

        if entry.header_length != series.entry_header_length() {
            report.add_issue(ValidationIssue::warning(
                "TIV012",
                format!(
                    "Header length {} does not match {series} (expected {})",
                    entry.header_length,
                    series.entry_header_length()
                ),
                location(),
            ));
        }

        let padding = &data[entry.padding_range()];
        if padding.iter().any(|&b| b != 0) {
            report.add_issue(ValidationIssue::warning(
                "TIV013",
                format!("{} padding bytes after the payload are not zero", padding.len()),
                location(),
            ));
        }

        let Some(tag) = TypeTag::from_byte(entry.type_tag) else {
            report.add_issue(ValidationIssue::info(
                "TIV020",
                format!(
                    "Unknown type tag 0x{:02X}; entry is kept as raw bytes",
                    entry.type_tag
                ),
                location(),
            ));
            return;
        };

        if let Err(e) = decode_payload(entry.type_tag, &data[entry.data_range()]) {
            report.add_issue(ValidationIssue::error(
                "TIV021",
                format!("{tag} payload does not decode: {e}"),
                location(),
            ));
        }

        match VarName::from_bytes(&entry.name) {
            Ok(name) if name.is_valid_for(tag.kind()) => {}
            Ok(name) => report.add_issue(ValidationIssue::warning(
                "TIV022",
                format!("Name {name} does not follow {} naming rules", tag.kind()),
                location(),
            )),
            Err(e) => {
                report.add_issue(ValidationIssue::warning("TIV023", e.to_string(), location()));
            }
        }
    }

    fn validate_checksum(
        data: &[u8],
        header: &ContainerHeader,
        report: &mut ValidationReport,
    ) {
        let entries = &data[ENTRIES_OFFSET..header.entries_end()];
        let Ok(stored) = read_checksum(data, header) else {
            return;
        };
        let computed = checksum(entries);
        if stored != computed {
            report.add_issue(ValidationIssue::warning(
                "TIV030",
                format!("Checksum mismatch: stored 0x{stored:04X}, computed 0x{computed:04X}"),
                ValidationLocation::at_offset(header.entries_end(), "CHECKSUM"),
            ));
        }

        let trailing = data.len() - header.entries_end() - 2;
        if trailing > 0 {
            report.add_issue(ValidationIssue::info(
                "TIV031",
                format!("{trailing} bytes follow the checksum"),
                ValidationLocation::at_offset(header.entries_end() + 2, "TRAILER"),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AppVar, ListVariable, Number, Variable};
    use crate::writer::write_variables;

    fn sample() -> Vec<u8> {
        let variables = [
            Variable::named("A", Number::real(1.5)).unwrap(),
            Variable::named("L1", ListVariable::from_elements([1.0, 2.0])).unwrap(),
        ];
        write_variables(&variables, "sample").unwrap()
    }

    #[test]
    fn test_validation_severity() {
        assert!(ValidationSeverity::Error > ValidationSeverity::Warning);
        assert!(ValidationSeverity::Warning > ValidationSeverity::Info);
    }

    #[test]
    fn test_clean_file() {
        let report = VariableFileValidator::validate_bytes(&sample());
        assert!(report.is_valid());
        assert_eq!(report.warning_count(), 0);
        assert_eq!(report.entry_count, 2);
        assert_eq!(report.series, Some(Series::Ti83Plus));
        assert_eq!(report.comment.as_deref(), Some("sample"));
    }

    #[test]
    fn test_empty_data() {
        let report = VariableFileValidator::validate_bytes(&[]);
        assert!(!report.is_valid());
        assert!(report.has_code("TIV001"));
    }

    #[test]
    fn test_checksum_mismatch_is_warning() {
        let mut data = sample();
        let last = data.len() - 1;
        data[last] ^= 0xFF;
        let report = VariableFileValidator::validate_bytes(&data);
        assert!(report.is_valid());
        assert!(report.has_code("TIV030"));
    }

    #[test]
    fn test_bad_framing_is_error() {
        let mut data = sample();
        data[ENTRIES_OFFSET] = 12;
        let report = VariableFileValidator::validate_bytes(&data);
        assert!(!report.is_valid());
        assert!(report.has_code("TIV010"));
    }

    #[test]
    fn test_unknown_tag_is_info() {
        let mut data = sample();
        data[ENTRIES_OFFSET + 4] = 0x17;
        let report = VariableFileValidator::validate_bytes(&data);
        assert!(report.is_valid());
        assert!(report.has_code("TIV020"));
    }

    #[test]
    fn test_nonzero_padding_is_warning() {
        let variable = Variable::named("DATA", AppVar::new(vec![1])).unwrap();
        let mut data = write_variables(&[variable], "").unwrap();
        // Grow the buffer length by one byte and append a non-zero pad.
        let entry_end = data.len() - 2;
        data.insert(entry_end, 0xEE);
        data[ENTRIES_OFFSET + 2] += 1;
        data[53] += 1;
        let report = VariableFileValidator::validate_bytes(&data);
        assert!(report.is_valid());
        assert!(report.has_code("TIV013"));
        assert!(report.has_code("TIV030"));
    }

    #[test]
    fn test_summary() {
        let report = VariableFileValidator::validate_bytes(&sample());
        let summary = report.summary();
        assert!(summary.contains("Series: TI-83 Plus"));
        assert!(summary.contains("Status: VALID"));
    }
}
