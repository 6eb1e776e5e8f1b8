//! Byte layouts of the file envelopes.
//!
//! - [`container`]: variable file signature, comment, entries length and checksum
//! - [`entry`]: per-variable entry framing inside a container
//! - [`flash`]: flash application file header

pub mod container;
pub mod entry;
pub mod flash;

use crate::error::{Result, TiError};

pub use container::{
    COMMENT_OFFSET, ContainerHeader, ENTRIES_LENGTH_OFFSET, ENTRIES_OFFSET, MARKER,
    build_container_header, checksum, parse_container_header, read_checksum,
};
pub use entry::{
    ENHANCED_HEADER_LENGTH, EntryHeader, LEGACY_HEADER_LENGTH, build_entry, parse_entry_header,
};
pub use flash::{
    APPLICATION_TYPE, FLASH_HEADER_LENGTH, FLASH_SIGNATURE, FlashHeader, build_flash_header,
    parse_flash_header,
};

/// Read `len` bytes at `offset`, failing with a bounds error instead of panicking.
pub(crate) fn read_bytes<'a>(
    data: &'a [u8],
    offset: usize,
    len: usize,
    context: &'static str,
) -> Result<&'a [u8]> {
    offset
        .checked_add(len)
        .and_then(|end| data.get(offset..end))
        .ok_or_else(|| {
            TiError::out_of_bounds(context, offset, len, data.len().saturating_sub(offset))
        })
}

/// Read a little-endian `u16` at `offset`.
pub(crate) fn read_u16_le(data: &[u8], offset: usize, context: &'static str) -> Result<u16> {
    let bytes = read_bytes(data, offset, 2, context)?;
    Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
}

/// Read a single byte at `offset`.
pub(crate) fn read_u8(data: &[u8], offset: usize, context: &'static str) -> Result<u8> {
    Ok(read_bytes(data, offset, 1, context)?[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_reads_are_bounds_checked() {
        let data = [0x34, 0x12, 0xFF];
        assert_eq!(read_u16_le(&data, 0, "test").unwrap(), 0x1234);
        assert_eq!(read_u8(&data, 2, "test").unwrap(), 0xFF);
        let err = read_u16_le(&data, 2, "test").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Bounds);
        assert!(read_bytes(&data, usize::MAX, 2, "test").is_err());
    }
}
