//! Variable entry framing.
//!
//! # Structure
//!
//! Offsets are relative to the start of the entry:
//!
//! | Offset    | Size | Field                                   |
//! |-----------|------|-----------------------------------------|
//! | 0         | 2    | header length (11 legacy, 13 enhanced)  |
//! | 2         | 2    | buffer length                           |
//! | 4         | 1    | type tag                                |
//! | 5         | 8    | name, NUL padded                        |
//! | 13        | 1    | version (enhanced only)                 |
//! | 14        | 1    | archived flags, `0x80` (enhanced only)  |
//! | hl + 2    | 2    | data length                             |
//! | hl + 4    | dl   | payload                                 |
//!
//! An entry spans `header_length + buffer_length + 4` bytes. Bytes between
//! the end of the payload and the end of the buffer are padding.

use std::ops::Range;

use crate::error::{Result, TiError};
use crate::types::{ARCHIVED_FLAG, NAME_LENGTH, Series, Variable};

use super::{read_bytes, read_u8, read_u16_le};

/// Header length of a legacy entry.
pub const LEGACY_HEADER_LENGTH: u16 = 11;

/// Header length of an enhanced entry.
pub const ENHANCED_HEADER_LENGTH: u16 = 13;

const TYPE_OFFSET: usize = 4;
const NAME_OFFSET: usize = 5;
const VERSION_OFFSET: usize = 13;
const ARCHIVED_OFFSET: usize = 14;

/// Parsed entry header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryHeader {
    /// Offset of the entry within the file.
    pub offset: usize,
    pub header_length: u16,
    pub buffer_length: u16,
    pub type_tag: u8,
    /// Raw 8-byte name field.
    pub name: [u8; NAME_LENGTH],
    /// Version byte, 0 for legacy headers.
    pub version: u8,
    /// Raw archived flags byte, 0 for legacy headers.
    pub archived_flags: u8,
    pub data_length: u16,
}

impl EntryHeader {
    /// Whether the header carries version and archive metadata.
    #[must_use]
    pub const fn is_enhanced(&self) -> bool {
        self.header_length == ENHANCED_HEADER_LENGTH
    }

    #[must_use]
    pub const fn archived(&self) -> bool {
        self.archived_flags & ARCHIVED_FLAG != 0
    }

    /// Total bytes spanned by the entry.
    #[must_use]
    pub fn entry_length(&self) -> usize {
        usize::from(self.header_length) + usize::from(self.buffer_length) + 4
    }

    /// Offset of the entry that follows this one.
    #[must_use]
    pub fn next_offset(&self) -> usize {
        self.offset + self.entry_length()
    }

    /// File range holding the payload.
    #[must_use]
    pub fn data_range(&self) -> Range<usize> {
        let start = self.offset + usize::from(self.header_length) + 4;
        start..start + usize::from(self.data_length)
    }

    /// File range holding padding after the payload.
    #[must_use]
    pub fn padding_range(&self) -> Range<usize> {
        self.data_range().end..self.next_offset()
    }
}

/// Parse and cross-check the entry header starting at `offset` in `data`.
///
/// `data` is the whole file; the entry must fit inside it.
///
/// # Errors
///
/// - [`TiError::InvalidFormat`] for a header length other than 11 or 13
/// - [`TiError::OutOfBounds`] when the entry runs past the end of the file
///   or its data length exceeds its buffer length
pub fn parse_entry_header(data: &[u8], offset: usize) -> Result<EntryHeader> {
    let header_length = read_u16_le(data, offset, "entry header length")?;
    if header_length != LEGACY_HEADER_LENGTH && header_length != ENHANCED_HEADER_LENGTH {
        return Err(TiError::invalid_format(format!(
            "unrecognized entry header length {header_length} at offset {offset}"
        )));
    }

    let buffer_length = read_u16_le(data, offset + 2, "entry buffer length")?;
    let entry_length = usize::from(header_length) + usize::from(buffer_length) + 4;
    if offset + entry_length > data.len() {
        return Err(TiError::out_of_bounds(
            "entry",
            offset,
            entry_length,
            data.len().saturating_sub(offset),
        ));
    }

    let data_length = read_u16_le(
        data,
        offset + usize::from(header_length) + 2,
        "entry data length",
    )?;
    if data_length > buffer_length {
        return Err(TiError::out_of_bounds(
            "entry data",
            offset + usize::from(header_length) + 4,
            usize::from(data_length),
            usize::from(buffer_length),
        ));
    }

    let mut name = [0u8; NAME_LENGTH];
    name.copy_from_slice(read_bytes(data, offset + NAME_OFFSET, NAME_LENGTH, "entry name")?);

    let (version, archived_flags) = if header_length == ENHANCED_HEADER_LENGTH {
        (
            read_u8(data, offset + VERSION_OFFSET, "entry version")?,
            read_u8(data, offset + ARCHIVED_OFFSET, "entry flags")?,
        )
    } else {
        (0, 0)
    };

    Ok(EntryHeader {
        offset,
        header_length,
        buffer_length,
        type_tag: read_u8(data, offset + TYPE_OFFSET, "entry type")?,
        name,
        version,
        archived_flags,
        data_length,
    })
}

/// Frame an encoded payload as one entry for `series`.
///
/// The buffer length equals the data length, so no padding is written.
///
/// # Errors
///
/// Fails when the variable has no name or the payload exceeds 65535 bytes.
pub fn build_entry(variable: &Variable, series: Series, payload: &[u8]) -> Result<Vec<u8>> {
    let name = variable.require_name()?;
    let data_length = u16::try_from(payload.len()).map_err(|_| {
        TiError::validation(
            "payload",
            format!("{} bytes exceeds {}", payload.len(), u16::MAX),
        )
    })?;
    let header_length = series.entry_header_length();

    let mut out = Vec::with_capacity(usize::from(header_length) + 4 + payload.len());
    out.extend_from_slice(&header_length.to_le_bytes());
    out.extend_from_slice(&data_length.to_le_bytes());
    out.push(variable.type_byte());
    out.extend_from_slice(&name.to_padded());
    if series.is_enhanced() {
        out.push(variable.version);
        out.push(if variable.archived { ARCHIVED_FLAG } else { 0 });
    }
    out.extend_from_slice(&data_length.to_le_bytes());
    out.extend_from_slice(payload);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::types::AppVar;

    fn appvar(name: &str, data: &[u8]) -> Variable {
        Variable::named(name, AppVar::new(data.to_vec())).unwrap()
    }

    #[test]
    fn test_legacy_layout() {
        let variable = appvar("DATA", b"");
        let entry = build_entry(&variable, Series::Ti83, &[2, 0, 0xAA, 0xBB]).unwrap();
        assert_eq!(&entry[..5], &[11, 0, 4, 0, 0x15]);
        assert_eq!(&entry[5..13], b"DATA\0\0\0\0");
        assert_eq!(&entry[13..15], &[4, 0]);
        assert_eq!(entry.len(), 19);

        let header = parse_entry_header(&entry, 0).unwrap();
        assert_eq!(header.entry_length(), entry.len());
        assert_eq!(header.data_range(), 15..19);
        assert!(!header.is_enhanced());
        assert!(header.padding_range().is_empty());
    }

    #[test]
    fn test_enhanced_layout() {
        let variable = appvar("DATA", b"").archived(true).with_version(5);
        let entry = build_entry(&variable, Series::Ti83Plus, &[0, 0]).unwrap();
        assert_eq!(&entry[..2], &[13, 0]);
        assert_eq!(entry[13], 5);
        assert_eq!(entry[14], 0x80);

        let header = parse_entry_header(&entry, 0).unwrap();
        assert!(header.is_enhanced());
        assert!(header.archived());
        assert_eq!(header.version, 5);
        assert_eq!(header.data_range(), 17..19);
    }

    #[test]
    fn test_rejects_unknown_header_length() {
        let mut entry = build_entry(&appvar("A", b""), Series::Ti83, &[0, 0]).unwrap();
        entry[0] = 12;
        assert_eq!(parse_entry_header(&entry, 0).unwrap_err().kind(), ErrorKind::Format);
    }

    #[test]
    fn test_data_length_beyond_buffer_length() {
        let mut entry = build_entry(&appvar("A", b""), Series::Ti83, &[0, 0]).unwrap();
        entry[13] = 3;
        entry.push(0);
        assert_eq!(parse_entry_header(&entry, 0).unwrap_err().kind(), ErrorKind::Bounds);
    }

    #[test]
    fn test_entry_past_end_of_file() {
        let entry = build_entry(&appvar("A", b""), Series::Ti83, &[0, 0]).unwrap();
        let err = parse_entry_header(&entry[..entry.len() - 1], 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Bounds);
    }

    #[test]
    fn test_unnamed_variable_cannot_be_framed() {
        let variable = Variable::new(AppVar::new(vec![]));
        let err = build_entry(&variable, Series::Ti83, &[0, 0]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
