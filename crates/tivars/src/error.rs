//! Error types for calculator file operations.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Broad category of a [`TiError`].
///
/// Callers that only care about which invariant family failed (for example
/// to pick an exit code or a diagnostic severity) can match on this instead
/// of the individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    /// Bad signature, header length, type tag or record type.
    Format,
    /// A declared length or index runs past what is available.
    Bounds,
    /// A value violates a field constraint (name, shape, range, date).
    Validation,
    /// Intel-hex line checksum mismatch.
    Checksum,
    /// Intel-hex records arrived in an invalid order.
    State,
    /// Underlying reader or writer failed.
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Format => "format",
            Self::Bounds => "bounds",
            Self::Validation => "validation",
            Self::Checksum => "checksum",
            Self::State => "state",
            Self::Io => "io",
        };
        f.write_str(label)
    }
}

/// Errors that can occur when reading or writing calculator files.
#[derive(Debug, Error)]
pub enum TiError {
    /// Unrecognized signature, header layout, type tag or record type.
    #[error("invalid format: {message}")]
    InvalidFormat { message: String },

    /// A declared length field exceeds the remaining buffer.
    #[error(
        "{context} out of bounds at offset {offset}: needs {needed} bytes, {available} available"
    )]
    OutOfBounds {
        context: &'static str,
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// Element index outside the current shape of a list, matrix, picture or page map.
    #[error("{context} index {index} out of range ({bounds})")]
    IndexOutOfRange {
        context: &'static str,
        index: String,
        bounds: String,
    },

    /// A field value violates its constraint.
    #[error("invalid {field}: {message}")]
    Validation { field: &'static str, message: String },

    /// The decimal exponent does not fit in the biased exponent byte.
    #[error("exponent {exponent} of {value} is outside the representable range -128..=127")]
    ExponentOutOfRange { value: f64, exponent: i32 },

    /// Intel-hex line checksum mismatch.
    #[error("checksum mismatch on hex line {line}: expected {expected:02X}, found {found:02X}")]
    HexChecksum { line: usize, expected: u8, found: u8 },

    /// Intel-hex record out of sequence.
    #[error("unexpected hex record on line {line}: {message}")]
    HexState { line: usize, message: String },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for calculator file operations.
pub type Result<T> = std::result::Result<T, TiError>;

impl TiError {
    /// Create an InvalidFormat error.
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }

    /// Create an OutOfBounds error.
    pub fn out_of_bounds(
        context: &'static str,
        offset: usize,
        needed: usize,
        available: usize,
    ) -> Self {
        Self::OutOfBounds {
            context,
            offset,
            needed,
            available,
        }
    }

    /// Create an IndexOutOfRange error.
    pub fn index_out_of_range(
        context: &'static str,
        index: impl fmt::Display,
        bounds: impl fmt::Display,
    ) -> Self {
        Self::IndexOutOfRange {
            context,
            index: index.to_string(),
            bounds: bounds.to_string(),
        }
    }

    /// Create a Validation error.
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Create a HexState error.
    pub fn hex_state(line: usize, message: impl Into<String>) -> Self {
        Self::HexState {
            line,
            message: message.into(),
        }
    }

    /// The taxonomy bucket this error belongs to.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidFormat { .. } => ErrorKind::Format,
            Self::OutOfBounds { .. } | Self::IndexOutOfRange { .. } => ErrorKind::Bounds,
            Self::Validation { .. } | Self::ExponentOutOfRange { .. } => ErrorKind::Validation,
            Self::HexChecksum { .. } => ErrorKind::Checksum,
            Self::HexState { .. } => ErrorKind::State,
            Self::Io(_) => ErrorKind::Io,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TiError::invalid_format("unknown signature");
        assert_eq!(format!("{err}"), "invalid format: unknown signature");

        let err = TiError::out_of_bounds("entry", 55, 20, 12);
        assert_eq!(
            format!("{err}"),
            "entry out of bounds at offset 55: needs 20 bytes, 12 available"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let err: TiError = io_err.into();
        assert!(matches!(err, TiError::Io(_)));
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(TiError::validation("name", "empty").kind(), ErrorKind::Validation);
        assert_eq!(
            TiError::ExponentOutOfRange {
                value: 1e200,
                exponent: 200
            }
            .kind(),
            ErrorKind::Validation
        );
        assert_eq!(TiError::index_out_of_range("list", 4, "len 2").kind(), ErrorKind::Bounds);
        assert_eq!(TiError::hex_state(3, "data before page").kind(), ErrorKind::State);
        assert_eq!(
            TiError::HexChecksum {
                line: 1,
                expected: 0xFF,
                found: 0x00
            }
            .kind(),
            ErrorKind::Checksum
        );
    }
}
