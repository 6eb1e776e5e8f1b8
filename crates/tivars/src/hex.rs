//! Intel-hex contents of flash application files.
//!
//! Each line is `:` followed by the upper-case hex of
//! `[length][address hi][address lo][type][data...][checksum]` and a CR LF.
//! The checksum is the two's complement of the sum of all preceding bytes.
//!
//! Pages are written as one PAGE record carrying the big-endian page index,
//! then DATA records addressed from [`FLASH_BASE_ADDRESS`], and the whole
//! block is closed by a single END record.

use std::collections::BTreeMap;

use crate::error::{Result, TiError};
use crate::types::{MAX_PAGE_SIZE, RecordType};

/// Address of the first byte of every flash page.
pub const FLASH_BASE_ADDRESS: u16 = 0x4000;

/// Line terminator.
pub const LINE_ENDING: &str = "\r\n";

/// One Intel-hex record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexRecord {
    pub address: u16,
    pub record_type: RecordType,
    pub data: Vec<u8>,
}

impl HexRecord {
    /// DATA record at `address`.
    #[must_use]
    pub fn data(address: u16, data: impl Into<Vec<u8>>) -> Self {
        Self {
            address,
            record_type: RecordType::Data,
            data: data.into(),
        }
    }

    /// PAGE record selecting page `index`.
    #[must_use]
    pub fn page(index: u16) -> Self {
        Self {
            address: 0,
            record_type: RecordType::Page,
            data: index.to_be_bytes().to_vec(),
        }
    }

    /// END record.
    #[must_use]
    pub fn end() -> Self {
        Self {
            address: 0,
            record_type: RecordType::End,
            data: Vec::new(),
        }
    }

    /// Raw record bytes without the checksum.
    ///
    /// # Errors
    ///
    /// Fails when the data does not fit the one-byte length field.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let length = u8::try_from(self.data.len()).map_err(|_| {
            TiError::validation(
                "hex record",
                format!("{} data bytes exceeds 255", self.data.len()),
            )
        })?;
        let mut bytes = Vec::with_capacity(self.data.len() + 4);
        bytes.push(length);
        bytes.extend_from_slice(&self.address.to_be_bytes());
        bytes.push(self.record_type.as_byte());
        bytes.extend_from_slice(&self.data);
        Ok(bytes)
    }

    /// Render as a text line including the terminator.
    pub fn to_line(&self) -> Result<String> {
        let mut bytes = self.to_bytes()?;
        bytes.push(line_checksum(&bytes));
        Ok(format!(":{}{LINE_ENDING}", hex::encode_upper(bytes)))
    }

    /// Parse one line (without terminator); `line` is its 1-based number.
    ///
    /// # Errors
    ///
    /// - [`TiError::InvalidFormat`] for a missing `:`, bad hex digits or an
    ///   unknown record type
    /// - [`TiError::OutOfBounds`] when the declared length disagrees with the line
    /// - [`TiError::HexChecksum`] on a checksum mismatch
    pub fn parse_line(text: &str, line: usize) -> Result<Self> {
        let digits = text.strip_prefix(':').ok_or_else(|| {
            TiError::invalid_format(format!("hex line {line} does not start with ':'"))
        })?;
        let bytes = hex::decode(digits)
            .map_err(|e| TiError::invalid_format(format!("hex line {line}: {e}")))?;

        let Some((&length, _)) = bytes.split_first() else {
            return Err(TiError::out_of_bounds("hex line", line, 5, 0));
        };
        let expected_len = usize::from(length) + 5;
        if bytes.len() != expected_len {
            return Err(TiError::out_of_bounds(
                "hex line",
                line,
                expected_len,
                bytes.len(),
            ));
        }

        let (body, stored) = bytes.split_at(bytes.len() - 1);
        let expected = line_checksum(body);
        if stored[0] != expected {
            return Err(TiError::HexChecksum {
                line,
                expected,
                found: stored[0],
            });
        }

        Ok(Self {
            address: u16::from_be_bytes([body[1], body[2]]),
            record_type: RecordType::validate(body[3])?,
            data: body[4..].to_vec(),
        })
    }
}

/// Two's complement of the byte sum.
#[must_use]
pub fn line_checksum(bytes: &[u8]) -> u8 {
    bytes
        .iter()
        .fold(0u8, |sum, &byte| sum.wrapping_add(byte))
        .wrapping_neg()
}

/// Encode pages (in the order given) as an Intel-hex block.
///
/// # Errors
///
/// Fails when `line_length` is outside 1..=255 or a page is larger than
/// the 16-bit address window above [`FLASH_BASE_ADDRESS`].
pub fn encode_pages<'a, I>(pages: I, line_length: usize) -> Result<String>
where
    I: IntoIterator<Item = (u16, &'a [u8])>,
{
    if !(1..=usize::from(u8::MAX)).contains(&line_length) {
        return Err(TiError::validation(
            "hex line length",
            format!("{line_length} is outside 1..=255"),
        ));
    }

    let mut out = String::new();
    for (index, page) in pages {
        if page.len() > MAX_PAGE_SIZE {
            return Err(TiError::validation(
                "page",
                format!(
                    "page {index} holds {} bytes, limit is {MAX_PAGE_SIZE}",
                    page.len()
                ),
            ));
        }
        tracing::debug!(page = index, bytes = page.len(), "encoding flash page");
        out.push_str(&HexRecord::page(index).to_line()?);
        for (chunk_index, chunk) in page.chunks(line_length).enumerate() {
            let offset = chunk_index * line_length;
            // offset < MAX_PAGE_SIZE, so the address stays within u16.
            let address = FLASH_BASE_ADDRESS + offset as u16;
            out.push_str(&HexRecord::data(address, chunk).to_line()?);
        }
    }
    out.push_str(&HexRecord::end().to_line()?);
    Ok(out)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeState {
    /// No PAGE record seen yet.
    ExpectingPage,
    /// DATA records go to this page.
    InPage(u16),
    /// END record seen.
    Ended,
}

/// Decode an Intel-hex block into pages keyed by index.
///
/// Blank lines are ignored; a trailing `\r` on each line is stripped.
///
/// # Errors
///
/// - [`TiError::HexState`] for DATA before any PAGE, any record after END,
///   or a block without END
/// - [`TiError::HexChecksum`] for a corrupted line
/// - [`TiError::InvalidFormat`] for a malformed line or a DATA address below
///   [`FLASH_BASE_ADDRESS`]
pub fn decode_pages(text: &str) -> Result<BTreeMap<u16, Vec<u8>>> {
    let mut pages: BTreeMap<u16, Vec<u8>> = BTreeMap::new();
    let mut state = DecodeState::ExpectingPage;
    let mut last_line = 0;

    for (number, raw) in text.split('\n').enumerate() {
        let line = number + 1;
        let raw = raw.trim_end_matches('\r');
        if raw.is_empty() {
            continue;
        }
        last_line = line;

        if state == DecodeState::Ended {
            return Err(TiError::hex_state(line, "extra data after end block"));
        }

        let record = HexRecord::parse_line(raw, line)?;
        tracing::trace!(
            line,
            record_type = ?record.record_type,
            address = format_args!("0x{:04X}", record.address),
            bytes = record.data.len(),
            "hex record"
        );

        match record.record_type {
            RecordType::Page => {
                let [hi, lo] = record.data[..] else {
                    return Err(TiError::invalid_format(format!(
                        "hex line {line}: page record carries {} bytes, expected 2",
                        record.data.len()
                    )));
                };
                let index = u16::from_be_bytes([hi, lo]);
                pages.entry(index).or_default();
                state = DecodeState::InPage(index);
            }
            RecordType::Data => {
                let DecodeState::InPage(index) = state else {
                    return Err(TiError::hex_state(line, "data record before any page record"));
                };
                let offset = record
                    .address
                    .checked_sub(FLASH_BASE_ADDRESS)
                    .map(usize::from)
                    .ok_or_else(|| {
                        TiError::invalid_format(format!(
                            "hex line {line}: address 0x{:04X} is below 0x{FLASH_BASE_ADDRESS:04X}",
                            record.address
                        ))
                    })?;
                let end = offset + record.data.len();
                if end > MAX_PAGE_SIZE {
                    return Err(TiError::out_of_bounds(
                        "flash page",
                        offset,
                        record.data.len(),
                        MAX_PAGE_SIZE - offset,
                    ));
                }
                let page = pages.entry(index).or_default();
                if page.len() < end {
                    page.resize(end, 0);
                }
                page[offset..end].copy_from_slice(&record.data);
            }
            RecordType::End => state = DecodeState::Ended,
        }
    }

    if state != DecodeState::Ended {
        return Err(TiError::hex_state(last_line + 1, "missing end record"));
    }
    for (index, page) in &pages {
        tracing::debug!(page = index, bytes = page.len(), "decoded flash page");
    }
    Ok(pages)
}
