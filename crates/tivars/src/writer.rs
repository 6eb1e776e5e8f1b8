//! Variable and flash file writers.
//!
//! The byte-level entry points are [`write_variables`] and
//! [`write_flash_application`]; [`VariableWriter`] and [`FlashWriter`] wrap
//! them for any [`Write`] sink.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{Result, TiError};
use crate::header::{build_container_header, build_entry, build_flash_header, checksum};
use crate::hex::encode_pages;
use crate::payload::encode_payload;
use crate::types::{FlashApplication, Variable, WriterOptions};

/// Variable file writer.
pub struct VariableWriter<W: Write> {
    writer: BufWriter<W>,
    options: WriterOptions,
}

impl<W: Write> VariableWriter<W> {
    /// Create a new variable writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
            options: WriterOptions::default(),
        }
    }

    /// Create a new variable writer with options.
    pub fn with_options(writer: W, options: WriterOptions) -> Self {
        Self {
            writer: BufWriter::new(writer),
            options,
        }
    }

    /// Write the variables as one file.
    pub fn write_variables(mut self, variables: &[Variable]) -> Result<()> {
        let bytes = write_variables_with_options(variables, &self.options)?;
        self.writer.write_all(&bytes)?;
        self.writer.flush()?;
        Ok(())
    }
}

impl VariableWriter<File> {
    /// Create a variable file for writing.
    pub fn create(path: &Path) -> Result<Self> {
        Ok(Self::new(File::create(path)?))
    }

    /// Create a variable file with options.
    pub fn create_with_options(path: &Path, options: WriterOptions) -> Result<Self> {
        Ok(Self::with_options(File::create(path)?, options))
    }
}

/// Flash application file writer.
pub struct FlashWriter<W: Write> {
    writer: BufWriter<W>,
    options: WriterOptions,
}

impl<W: Write> FlashWriter<W> {
    /// Create a new flash writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
            options: WriterOptions::default(),
        }
    }

    /// Create a new flash writer with options.
    pub fn with_options(writer: W, options: WriterOptions) -> Self {
        Self {
            writer: BufWriter::new(writer),
            options,
        }
    }

    /// Write the application.
    pub fn write_application(mut self, app: &FlashApplication) -> Result<()> {
        let bytes = write_flash_application_with_options(app, &self.options)?;
        self.writer.write_all(&bytes)?;
        self.writer.flush()?;
        Ok(())
    }
}

impl FlashWriter<File> {
    /// Create a flash file for writing.
    pub fn create(path: &Path) -> Result<Self> {
        Ok(Self::new(File::create(path)?))
    }

    /// Create a flash file with options.
    pub fn create_with_options(path: &Path, options: WriterOptions) -> Result<Self> {
        Ok(Self::with_options(File::create(path)?, options))
    }
}

/// Serialize variables into a variable file with the given comment.
///
/// The output series is taken from the first variable.
pub fn write_variables(variables: &[Variable], comment: &str) -> Result<Vec<u8>> {
    write_variables_with_options(variables, &WriterOptions::new().with_comment(comment))
}

/// Serialize variables into a variable file with options.
///
/// # Errors
///
/// Fails when `variables` is empty, a variable has no name or an invalid
/// value, the comment is too long or the entries exceed 65535 bytes.
pub fn write_variables_with_options(
    variables: &[Variable],
    options: &WriterOptions,
) -> Result<Vec<u8>> {
    let first = variables
        .first()
        .ok_or_else(|| TiError::validation("variables", "at least one variable is required"))?;
    let series = options.series.unwrap_or(first.series);

    let mut entries = Vec::new();
    for variable in variables {
        let payload = encode_payload(&variable.value)?;
        let entry = build_entry(variable, series, &payload)?;
        tracing::debug!(
            name = %variable.display_name(),
            type_tag = format_args!("0x{:02X}", variable.type_byte()),
            bytes = entry.len(),
            "encoded entry"
        );
        entries.extend_from_slice(&entry);
    }

    let entries_length = u16::try_from(entries.len()).map_err(|_| {
        TiError::validation(
            "entries",
            format!("{} bytes exceeds {}", entries.len(), u16::MAX),
        )
    })?;
    let header = build_container_header(series, &options.comment, entries_length)?;

    let mut out = Vec::with_capacity(header.len() + entries.len() + 2);
    out.extend_from_slice(&header);
    out.extend_from_slice(&entries);
    out.extend_from_slice(&checksum(&entries).to_le_bytes());
    Ok(out)
}

/// Serialize a flash application with default options.
pub fn write_flash_application(app: &FlashApplication) -> Result<Vec<u8>> {
    write_flash_application_with_options(app, &WriterOptions::default())
}

/// Serialize a flash application, chunking DATA records by
/// `options.hex_line_length`.
///
/// # Errors
///
/// Fails for a line length outside 1..=255, an oversized page or a
/// timestamp whose year cannot be stored as BCD.
pub fn write_flash_application_with_options(
    app: &FlashApplication,
    options: &WriterOptions,
) -> Result<Vec<u8>> {
    let contents = encode_pages(app.pages(), options.hex_line_length)?;
    let header = build_flash_header(
        app.name(),
        app.revision,
        app.series,
        app.timestamp,
        contents.len(),
    )?;

    let mut out = Vec::with_capacity(header.len() + contents.len());
    out.extend_from_slice(&header);
    out.extend_from_slice(contents.as_bytes());
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::types::{AppVar, Number, Series};

    #[test]
    fn test_empty_variable_list_rejected() {
        let err = write_variables(&[], "").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_series_override() {
        let variable = Variable::named("A", Number::real(1.0)).unwrap();
        let options = WriterOptions::new().with_series(Series::Ti83);
        let bytes = write_variables_with_options(&[variable], &options).unwrap();
        assert_eq!(&bytes[..8], b"**TI83**");
        assert_eq!(&bytes[55..57], &[11, 0]);
    }

    #[test]
    fn test_entries_too_large() {
        let big = Variable::named("BIG", AppVar::new(vec![0; 40_000])).unwrap();
        let err = write_variables(&[big.clone(), big], "").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_writer_adaptor() {
        let variable = Variable::named("A", Number::real(2.0)).unwrap();
        let mut sink = Vec::new();
        VariableWriter::new(&mut sink)
            .write_variables(std::slice::from_ref(&variable))
            .unwrap();
        assert_eq!(sink, write_variables(&[variable], "").unwrap());
    }

    #[test]
    fn test_flash_writer_adaptor() {
        let mut app = FlashApplication::new("DEMO").unwrap();
        app.set_page(0, vec![1, 2, 3]).unwrap();
        let mut sink = Vec::new();
        FlashWriter::new(&mut sink).write_application(&app).unwrap();
        assert_eq!(sink, write_flash_application(&app).unwrap());
    }
}
