//! Variable and flash file readers.
//!
//! The byte-level entry points are [`read_variables`] and
//! [`read_flash_application`]; [`VariableReader`] and [`FlashReader`] wrap
//! them for any [`Read`] source.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::{Result, TiError};
use crate::header::{
    ENTRIES_OFFSET, EntryHeader, FLASH_HEADER_LENGTH, parse_container_header, parse_entry_header,
    parse_flash_header,
};
use crate::hex::decode_pages;
use crate::payload::decode_payload;
use crate::types::{FlashApplication, ReaderOptions, Series, VarName, Variable};

/// Variable file reader.
pub struct VariableReader<R: Read> {
    reader: BufReader<R>,
    options: ReaderOptions,
}

impl<R: Read> VariableReader<R> {
    /// Create a new variable reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            options: ReaderOptions::default(),
        }
    }

    /// Create a new variable reader with options.
    pub fn with_options(reader: R, options: ReaderOptions) -> Self {
        Self {
            reader: BufReader::new(reader),
            options,
        }
    }

    /// Read the whole source and parse every entry.
    pub fn read_variables(mut self) -> Result<Vec<Variable>> {
        let data = read_all_bytes(&mut self.reader)?;
        read_variables_with_options(&data, &self.options)
    }
}

impl VariableReader<File> {
    /// Open a variable file for reading.
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::new(File::open(path)?))
    }

    /// Open a variable file with options.
    pub fn open_with_options(path: &Path, options: ReaderOptions) -> Result<Self> {
        Ok(Self::with_options(File::open(path)?, options))
    }
}

/// Flash application file reader.
pub struct FlashReader<R: Read> {
    reader: BufReader<R>,
}

impl<R: Read> FlashReader<R> {
    /// Create a new flash reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
        }
    }

    /// Read the whole source and parse the application.
    pub fn read_application(mut self) -> Result<FlashApplication> {
        let data = read_all_bytes(&mut self.reader)?;
        read_flash_application(&data)
    }
}

impl FlashReader<File> {
    /// Open a flash file for reading.
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::new(File::open(path)?))
    }
}

/// Parse every variable in a variable file.
///
/// The stored checksum is not verified; use
/// [`VariableFileValidator`](crate::validate::VariableFileValidator) for that.
///
/// # Errors
///
/// Any malformed entry aborts the read. Entries with an unrecognized type
/// tag are returned as [`VariableValue::Unknown`](crate::types::VariableValue::Unknown).
pub fn read_variables(data: &[u8]) -> Result<Vec<Variable>> {
    read_variables_with_options(data, &ReaderOptions::default())
}

/// Parse every variable in a variable file with options.
pub fn read_variables_with_options(data: &[u8], options: &ReaderOptions) -> Result<Vec<Variable>> {
    let header = parse_container_header(data)?;
    tracing::debug!(
        series = %header.series,
        entries_length = header.entries_length,
        "parsed variable file header"
    );

    let entries_end = header.entries_end();
    let mut variables = Vec::new();
    let mut offset = ENTRIES_OFFSET;
    while offset < entries_end {
        let entry = parse_entry_header(data, offset)?;
        variables.push(decode_entry(data, &entry, options)?);
        offset = entry.next_offset();
    }
    Ok(variables)
}

/// Build a variable from one framed entry.
fn decode_entry(data: &[u8], entry: &EntryHeader, options: &ReaderOptions) -> Result<Variable> {
    let value = decode_payload(entry.type_tag, &data[entry.data_range()])?;
    let name = VarName::from_bytes(&entry.name).ok();

    if options.strict_names {
        let valid = match (&name, value.kind()) {
            (Some(name), Some(kind)) => name.is_valid_for(kind),
            (Some(_), None) => true,
            (None, _) => false,
        };
        if !valid {
            return Err(TiError::validation(
                "name",
                format!(
                    "entry at offset {} has invalid name {:?}",
                    entry.offset,
                    String::from_utf8_lossy(&entry.name)
                ),
            ));
        }
    }

    let series = if entry.is_enhanced() {
        Series::Ti83Plus
    } else {
        Series::Ti83
    };
    let mut variable = Variable::new(value)
        .with_series(series)
        .archived(entry.archived())
        .with_version(entry.version);
    variable.name = name;

    tracing::debug!(
        offset = entry.offset,
        name = %variable.display_name(),
        type_tag = format_args!("0x{:02X}", entry.type_tag),
        data_length = entry.data_length,
        "parsed entry"
    );
    Ok(variable)
}

/// Parse a flash application file.
///
/// # Errors
///
/// Fails on a bad header (see [`parse_flash_header`]), non-UTF-8 contents
/// or any Intel-hex error.
pub fn read_flash_application(data: &[u8]) -> Result<FlashApplication> {
    let header = parse_flash_header(data)?;
    let end = FLASH_HEADER_LENGTH + header.contents_length as usize;
    let contents = std::str::from_utf8(&data[FLASH_HEADER_LENGTH..end])
        .map_err(|e| TiError::invalid_format(format!("flash contents are not text: {e}")))?;

    let pages = decode_pages(contents)?;
    let mut app = FlashApplication::new(&header.name)?
        .with_revision(header.revision)
        .with_series(header.series)
        .with_timestamp(header.timestamp);
    for (index, page) in pages {
        app.set_page(index, page)?;
    }
    tracing::debug!(
        name = app.name(),
        pages = app.page_count(),
        "parsed flash application"
    );
    Ok(app)
}

fn read_all_bytes(reader: &mut impl Read) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::types::{AppVar, Number, VariableValue};
    use crate::writer::write_variables;

    #[test]
    fn test_reader_adaptor() {
        let variable = Variable::named("A", Number::real(5.0)).unwrap();
        let bytes = write_variables(&[variable.clone()], "").unwrap();
        let read = VariableReader::new(bytes.as_slice()).read_variables().unwrap();
        assert_eq!(read, vec![variable]);
    }

    #[test]
    fn test_strict_names() {
        let name = VarName::from_bytes(b"AB").unwrap();
        let variable = Variable::new(Number::real(1.0)).with_name(name);
        let bytes = write_variables(&[variable], "").unwrap();

        assert!(read_variables(&bytes).is_ok());
        let err = read_variables_with_options(&bytes, &ReaderOptions::new().strict_names())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_empty_name_reads_as_none() {
        let variable = Variable::named("X", AppVar::new(vec![1])).unwrap();
        let mut bytes = write_variables(&[variable], "").unwrap();
        // First name byte of the first entry; the checksum is not verified on read.
        bytes[55 + 5] = 0;
        let read = read_variables(&bytes).unwrap();
        assert_eq!(read[0].name, None);
        assert!(matches!(read[0].value, VariableValue::AppVar(_)));
    }
}
