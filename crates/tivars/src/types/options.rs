//! Reader and writer options.

use super::Series;

/// Length of the container comment field.
pub const COMMENT_LENGTH: usize = 42;

/// Default Intel-hex data bytes per line.
pub const DEFAULT_HEX_LINE_LENGTH: usize = 32;

/// Options for reading variable files.
#[derive(Debug, Clone, Default)]
pub struct ReaderOptions {
    /// Reject entry names that break the naming rules of their kind.
    pub strict_names: bool,
}

impl ReaderOptions {
    /// Create reader options with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable name validation.
    #[must_use]
    pub fn strict_names(mut self) -> Self {
        self.strict_names = true;
        self
    }
}

/// Options for writing variable and flash files.
#[derive(Debug, Clone)]
pub struct WriterOptions {
    /// Container comment, at most 42 bytes.
    pub comment: String,
    /// Output series (default: the first variable's series).
    pub series: Option<Series>,
    /// Data bytes per Intel-hex line (1..=255, default: 32).
    pub hex_line_length: usize,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            comment: String::new(),
            series: None,
            hex_line_length: DEFAULT_HEX_LINE_LENGTH,
        }
    }
}

impl WriterOptions {
    /// Create writer options with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the container comment.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Force the output series.
    #[must_use]
    pub fn with_series(mut self, series: Series) -> Self {
        self.series = Some(series);
        self
    }

    /// Set the Intel-hex data bytes per line.
    #[must_use]
    pub fn with_hex_line_length(mut self, length: usize) -> Self {
        self.hex_line_length = length;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writer_options() {
        let opts = WriterOptions::new()
            .with_comment("Saved")
            .with_series(Series::Ti83)
            .with_hex_line_length(16);
        assert_eq!(opts.comment, "Saved");
        assert_eq!(opts.series, Some(Series::Ti83));
        assert_eq!(opts.hex_line_length, 16);
        assert_eq!(WriterOptions::default().hex_line_length, 32);
    }

    #[test]
    fn test_reader_options() {
        assert!(!ReaderOptions::default().strict_names);
        assert!(ReaderOptions::new().strict_names().strict_names);
    }
}
