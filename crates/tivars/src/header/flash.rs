//! Flash application file header.
//!
//! # Structure
//!
//! | Offset | Size | Field                                   |
//! |--------|------|-----------------------------------------|
//! | 0      | 8    | signature `**TIFL**`                    |
//! | 8      | 2    | revision major, minor                   |
//! | 10     | 2    | marker `01 88`                          |
//! | 12     | 2    | BCD month, BCD day                      |
//! | 14     | 2    | BCD year, big-endian                    |
//! | 16     | 1    | name length                             |
//! | 17     | 8    | name, NUL padded                        |
//! | 25     | 23   | reserved                                |
//! | 48     | 1    | series                                  |
//! | 49     | 1    | type, `0x24` for applications           |
//! | 50     | 24   | reserved                                |
//! | 74     | 4    | contents length, little-endian          |
//! | 78     | n    | Intel-hex contents                      |

use chrono::{Datelike, NaiveDate};

use crate::error::{Result, TiError};
use crate::types::{APP_NAME_LENGTH, FlashSeries, Revision};

use super::read_bytes;

/// Flash file signature.
pub const FLASH_SIGNATURE: &[u8; 8] = b"**TIFL**";

/// Bytes before the contents block.
pub const FLASH_HEADER_LENGTH: usize = 78;

/// Type byte of a flash application.
pub const APPLICATION_TYPE: u8 = 0x24;

const MARKER: [u8; 2] = [0x01, 0x88];
const REVISION_OFFSET: usize = 8;
const DATE_OFFSET: usize = 12;
const NAME_LENGTH_OFFSET: usize = 16;
const NAME_OFFSET: usize = 17;
const SERIES_OFFSET: usize = 48;
const TYPE_OFFSET: usize = 49;
const CONTENTS_LENGTH_OFFSET: usize = 74;

/// Parsed flash header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashHeader {
    pub revision: Revision,
    pub timestamp: NaiveDate,
    pub name: String,
    pub series: FlashSeries,
    pub contents_length: u32,
}

/// Parse the 78-byte flash header and check that the contents fit.
///
/// # Errors
///
/// - [`TiError::InvalidFormat`] for an unknown signature, series or type byte
/// - [`TiError::Validation`] for a bad revision, BCD digit or calendar date
/// - [`TiError::OutOfBounds`] when the contents length overruns the buffer
pub fn parse_flash_header(data: &[u8]) -> Result<FlashHeader> {
    let signature = data
        .get(..FLASH_SIGNATURE.len())
        .ok_or_else(|| TiError::invalid_format("file too short for a flash signature"))?;
    if signature != FLASH_SIGNATURE {
        return Err(TiError::invalid_format("invalid flash file signature"));
    }
    let header = read_bytes(data, 0, FLASH_HEADER_LENGTH, "flash header")?;

    let revision = Revision::new(header[REVISION_OFFSET], header[REVISION_OFFSET + 1])?;
    let timestamp = decode_date(&header[DATE_OFFSET..DATE_OFFSET + 4])?;

    let name_length = usize::from(header[NAME_LENGTH_OFFSET]);
    if name_length > APP_NAME_LENGTH {
        return Err(TiError::validation(
            "name",
            format!("name length {name_length} exceeds {APP_NAME_LENGTH}"),
        ));
    }
    let name = &header[NAME_OFFSET..NAME_OFFSET + name_length];
    let name = String::from_utf8_lossy(name).into_owned();

    let series = FlashSeries::validate(header[SERIES_OFFSET])?;
    let kind = header[TYPE_OFFSET];
    if kind != APPLICATION_TYPE {
        return Err(TiError::invalid_format(format!(
            "flash type 0x{kind:02X} is not an application"
        )));
    }

    let length_bytes = &header[CONTENTS_LENGTH_OFFSET..FLASH_HEADER_LENGTH];
    let contents_length = u32::from_le_bytes([
        length_bytes[0],
        length_bytes[1],
        length_bytes[2],
        length_bytes[3],
    ]);
    let available = data.len() - FLASH_HEADER_LENGTH;
    let needed = usize::try_from(contents_length).unwrap_or(usize::MAX);
    if needed > available {
        return Err(TiError::out_of_bounds(
            "flash contents",
            FLASH_HEADER_LENGTH,
            needed,
            available,
        ));
    }

    Ok(FlashHeader {
        revision,
        timestamp,
        name,
        series,
        contents_length,
    })
}

/// Build the 78-byte flash header.
///
/// # Errors
///
/// Fails when the name is longer than 8 bytes, the year is outside
/// 0..=9999 or the contents length does not fit in 32 bits.
pub fn build_flash_header(
    name: &str,
    revision: Revision,
    series: FlashSeries,
    timestamp: NaiveDate,
    contents_length: usize,
) -> Result<[u8; FLASH_HEADER_LENGTH]> {
    if name.len() > APP_NAME_LENGTH {
        return Err(TiError::validation(
            "name",
            format!("name {name:?} exceeds {APP_NAME_LENGTH} bytes"),
        ));
    }
    let contents_length = u32::try_from(contents_length).map_err(|_| {
        TiError::validation("contents", format!("{contents_length} bytes exceeds u32"))
    })?;

    let mut header = [0u8; FLASH_HEADER_LENGTH];
    header[..REVISION_OFFSET].copy_from_slice(FLASH_SIGNATURE);
    header[REVISION_OFFSET] = revision.major();
    header[REVISION_OFFSET + 1] = revision.minor();
    header[10..DATE_OFFSET].copy_from_slice(&MARKER);
    header[DATE_OFFSET..DATE_OFFSET + 4].copy_from_slice(&encode_date(timestamp)?);
    // Length fits: checked against APP_NAME_LENGTH above.
    header[NAME_LENGTH_OFFSET] = name.len() as u8;
    header[NAME_OFFSET..NAME_OFFSET + name.len()].copy_from_slice(name.as_bytes());
    header[SERIES_OFFSET] = series.as_byte();
    header[TYPE_OFFSET] = APPLICATION_TYPE;
    header[CONTENTS_LENGTH_OFFSET..].copy_from_slice(&contents_length.to_le_bytes());
    Ok(header)
}

/// Month, day and big-endian year as packed BCD.
fn encode_date(date: NaiveDate) -> Result<[u8; 4]> {
    let year = u32::try_from(date.year())
        .ok()
        .filter(|year| *year <= 9999)
        .ok_or_else(|| {
            TiError::validation("timestamp", format!("year {} is not BCD", date.year()))
        })?;
    let [year_hi, year_lo] = [year / 100, year % 100].map(to_bcd);
    Ok([to_bcd(date.month()), to_bcd(date.day()), year_hi, year_lo])
}

fn decode_date(bytes: &[u8]) -> Result<NaiveDate> {
    let month = from_bcd(bytes[0])?;
    let day = from_bcd(bytes[1])?;
    let year = from_bcd(bytes[2])? * 100 + from_bcd(bytes[3])?;
    NaiveDate::from_ymd_opt(year as i32, month, day).ok_or_else(|| {
        TiError::validation(
            "timestamp",
            format!("{year:04}-{month:02}-{day:02} is not a calendar date"),
        )
    })
}

/// Two decimal digits (0..=99) as one BCD byte.
fn to_bcd(value: u32) -> u8 {
    let value = value % 100;
    (((value / 10) << 4) | (value % 10)) as u8
}

fn from_bcd(byte: u8) -> Result<u32> {
    let (hi, lo) = (byte >> 4, byte & 0x0F);
    if hi > 9 || lo > 9 {
        return Err(TiError::validation(
            "timestamp",
            format!("0x{byte:02X} is not a BCD byte"),
        ));
    }
    Ok(u32::from(hi * 10 + lo))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn sample_header(contents_length: usize) -> [u8; FLASH_HEADER_LENGTH] {
        build_flash_header(
            "DEMO",
            Revision::new(1, 2).unwrap(),
            FlashSeries::Ti83Plus,
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            contents_length,
        )
        .unwrap()
    }

    #[test]
    fn test_header_layout() {
        let header = sample_header(0x0102);
        assert_eq!(&header[..8], b"**TIFL**");
        assert_eq!(&header[8..12], &[1, 2, 0x01, 0x88]);
        assert_eq!(&header[12..16], &[0x03, 0x15, 0x20, 0x24]);
        assert_eq!(header[16], 4);
        assert_eq!(&header[17..25], b"DEMO\0\0\0\0");
        assert!(header[25..48].iter().all(|&b| b == 0));
        assert_eq!(&header[48..50], &[0x73, 0x24]);
        assert!(header[50..74].iter().all(|&b| b == 0));
        assert_eq!(&header[74..], &[0x02, 0x01, 0, 0]);
    }

    #[test]
    fn test_parse_roundtrip() {
        let mut data = sample_header(3).to_vec();
        data.extend_from_slice(b"abc");
        let header = parse_flash_header(&data).unwrap();
        assert_eq!(header.name, "DEMO");
        assert_eq!(header.revision.to_string(), "1.2");
        assert_eq!(header.timestamp, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!(header.series, FlashSeries::Ti83Plus);
        assert_eq!(header.contents_length, 3);
    }

    #[test]
    fn test_contents_overrun() {
        let data = sample_header(4).to_vec();
        let err = parse_flash_header(&data).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Bounds);
    }

    #[test]
    fn test_rejections() {
        let mut data = sample_header(0).to_vec();
        data[48] = 0x00;
        assert_eq!(parse_flash_header(&data).unwrap_err().kind(), ErrorKind::Format);

        let mut data = sample_header(0).to_vec();
        data[49] = 0x23;
        assert_eq!(parse_flash_header(&data).unwrap_err().kind(), ErrorKind::Format);

        let mut data = sample_header(0).to_vec();
        data[12] = 0x1A;
        assert_eq!(parse_flash_header(&data).unwrap_err().kind(), ErrorKind::Validation);

        let mut data = sample_header(0).to_vec();
        data[12] = 0x02;
        data[13] = 0x30;
        assert_eq!(parse_flash_header(&data).unwrap_err().kind(), ErrorKind::Validation);

        assert_eq!(
            parse_flash_header(b"**TI83F*").unwrap_err().kind(),
            ErrorKind::Format
        );
    }

    #[test]
    fn test_bcd() {
        assert_eq!(to_bcd(59), 0x59);
        assert_eq!(from_bcd(0x59).unwrap(), 59);
        assert!(from_bcd(0x5A).is_err());
    }
}
