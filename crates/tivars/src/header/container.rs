//! Variable file envelope.
//!
//! # Structure
//!
//! | Offset | Size | Field                                  |
//! |--------|------|----------------------------------------|
//! | 0      | 8    | series signature                       |
//! | 8      | 3    | marker `1A 0A 00`                      |
//! | 11     | 42   | comment, space padded                  |
//! | 53     | 2    | entries length                         |
//! | 55     | n    | concatenated entries                   |
//! | 55 + n | 2    | checksum: sum of entry bytes mod 65536 |

use crate::error::{Result, TiError};
use crate::types::{COMMENT_LENGTH, Series};

use super::{read_bytes, read_u16_le};

/// Fixed bytes following the signature.
pub const MARKER: [u8; 3] = [0x1A, 0x0A, 0x00];

/// Offset of the comment field.
pub const COMMENT_OFFSET: usize = 11;

/// Offset of the entries length field.
pub const ENTRIES_LENGTH_OFFSET: usize = 53;

/// Offset of the first entry.
pub const ENTRIES_OFFSET: usize = 55;

/// Parsed container header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHeader {
    pub series: Series,
    /// Comment with trailing spaces and NULs removed.
    pub comment: String,
    pub entries_length: u16,
}

impl ContainerHeader {
    /// Offset one past the last entry byte.
    #[must_use]
    pub fn entries_end(&self) -> usize {
        ENTRIES_OFFSET + usize::from(self.entries_length)
    }
}

/// Parse the container header and check that entries and checksum fit.
///
/// # Errors
///
/// - [`TiError::InvalidFormat`] when the signature and marker match no series
/// - [`TiError::OutOfBounds`] when the declared entries plus checksum exceed
///   the buffer
pub fn parse_container_header(data: &[u8]) -> Result<ContainerHeader> {
    let prefix = data
        .get(..COMMENT_OFFSET)
        .ok_or_else(|| TiError::invalid_format("file too short for a variable signature"))?;
    let (signature, marker) = prefix.split_at(8);
    let series = Series::from_signature(signature)
        .filter(|_| marker == MARKER)
        .ok_or_else(|| TiError::invalid_format("invalid variable file signature"))?;

    let comment = read_bytes(data, COMMENT_OFFSET, COMMENT_LENGTH, "comment")?;
    let comment = String::from_utf8_lossy(comment)
        .trim_end_matches([' ', '\0'])
        .to_string();

    let entries_length = read_u16_le(data, ENTRIES_LENGTH_OFFSET, "entries length")?;
    let needed = usize::from(entries_length) + 2;
    if ENTRIES_OFFSET + needed > data.len() {
        return Err(TiError::out_of_bounds(
            "entries",
            ENTRIES_OFFSET,
            needed,
            data.len().saturating_sub(ENTRIES_OFFSET),
        ));
    }

    Ok(ContainerHeader {
        series,
        comment,
        entries_length,
    })
}

/// Build the 55-byte container header.
///
/// # Errors
///
/// Fails when the comment is longer than 42 bytes.
pub fn build_container_header(
    series: Series,
    comment: &str,
    entries_length: u16,
) -> Result<[u8; ENTRIES_OFFSET]> {
    if comment.len() > COMMENT_LENGTH {
        return Err(TiError::validation(
            "comment",
            format!("{} bytes exceeds {COMMENT_LENGTH}", comment.len()),
        ));
    }

    let mut header = [b' '; ENTRIES_OFFSET];
    header[..8].copy_from_slice(series.signature());
    header[8..COMMENT_OFFSET].copy_from_slice(&MARKER);
    header[COMMENT_OFFSET..COMMENT_OFFSET + comment.len()].copy_from_slice(comment.as_bytes());
    header[ENTRIES_LENGTH_OFFSET..].copy_from_slice(&entries_length.to_le_bytes());
    Ok(header)
}

/// Container checksum over the concatenated entry bytes.
#[must_use]
pub fn checksum(entries: &[u8]) -> u16 {
    entries
        .iter()
        .fold(0u16, |sum, &byte| sum.wrapping_add(u16::from(byte)))
}

/// Stored checksum of a container whose header has been parsed.
pub fn read_checksum(data: &[u8], header: &ContainerHeader) -> Result<u16> {
    read_u16_le(data, header.entries_end(), "checksum")
}
