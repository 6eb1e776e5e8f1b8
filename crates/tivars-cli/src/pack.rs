//! Building and unpacking files from raw binaries.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::info;

use tivars::{
    AppVar, FlashApplication, FlashSeries, Revision, Series, Variable, WriterOptions,
    read_flash_application, write_flash_application_with_options, write_variables_with_options,
};

/// A `--page INDEX=FILE` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSpec {
    pub index: u16,
    pub path: PathBuf,
}

impl FromStr for PageSpec {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        let (index, path) = value
            .split_once('=')
            .ok_or_else(|| format!("expected INDEX=FILE, got {value:?}"))?;
        let index = index
            .trim()
            .parse::<u16>()
            .map_err(|e| format!("invalid page index {index:?}: {e}"))?;
        if path.is_empty() {
            return Err(format!("missing file for page {index}"));
        }
        Ok(Self {
            index,
            path: PathBuf::from(path),
        })
    }
}

/// Inputs for wrapping a binary into an AppVar file.
#[derive(Debug, Clone)]
pub struct AppVarRequest {
    pub name: String,
    pub input: PathBuf,
    pub output: PathBuf,
    pub series: Series,
    pub archived: bool,
    pub comment: String,
}

/// Inputs for building a flash application file.
#[derive(Debug, Clone)]
pub struct AppRequest {
    pub name: String,
    pub pages: Vec<PageSpec>,
    pub output: PathBuf,
    pub revision: Revision,
    pub series: FlashSeries,
    pub date: Option<NaiveDate>,
    pub line_length: usize,
}

/// Wrap `request.input` into a single-entry AppVar file.
pub fn pack_appvar(request: &AppVarRequest) -> Result<()> {
    let data = fs::read(&request.input)
        .with_context(|| format!("read {}", request.input.display()))?;
    let variable = Variable::named(&request.name, AppVar::new(data))
        .context("name the application variable")?
        .with_series(request.series)
        .archived(request.archived);

    let options = WriterOptions::new()
        .with_comment(request.comment.clone())
        .with_series(request.series);
    let bytes = write_variables_with_options(std::slice::from_ref(&variable), &options)
        .context("encode variable file")?;
    fs::write(&request.output, &bytes)
        .with_context(|| format!("write {}", request.output.display()))?;

    info!(
        name = %variable.display_name(),
        bytes = bytes.len(),
        output = %request.output.display(),
        "packed appvar"
    );
    Ok(())
}

/// Build a flash application from one binary per page.
pub fn pack_app(request: &AppRequest) -> Result<()> {
    let mut app = FlashApplication::new(&request.name)
        .context("name the flash application")?
        .with_revision(request.revision)
        .with_series(request.series);
    if let Some(date) = request.date {
        app = app.with_timestamp(date);
    }
    for page in &request.pages {
        let data =
            fs::read(&page.path).with_context(|| format!("read {}", page.path.display()))?;
        app.set_page(page.index, data)
            .with_context(|| format!("load page {}", page.index))?;
    }

    let options = WriterOptions::new().with_hex_line_length(request.line_length);
    let bytes =
        write_flash_application_with_options(&app, &options).context("encode flash file")?;
    fs::write(&request.output, &bytes)
        .with_context(|| format!("write {}", request.output.display()))?;

    info!(
        name = app.name(),
        pages = app.page_count(),
        output = %request.output.display(),
        "packed flash application"
    );
    Ok(())
}

/// Write every page of a flash file to `output_dir/page_XX.bin`.
///
/// Returns the written paths in page order.
pub fn unpack_app(input: &Path, output_dir: &Path) -> Result<Vec<PathBuf>> {
    let data = fs::read(input).with_context(|| format!("read {}", input.display()))?;
    let app = read_flash_application(&data)
        .with_context(|| format!("parse {}", input.display()))?;

    fs::create_dir_all(output_dir)
        .with_context(|| format!("create {}", output_dir.display()))?;
    let mut written = Vec::with_capacity(app.page_count());
    for (index, page) in app.pages() {
        let path = output_dir.join(page_file_name(index));
        fs::write(&path, page).with_context(|| format!("write {}", path.display()))?;
        written.push(path);
    }

    info!(
        name = app.name(),
        pages = written.len(),
        output_dir = %output_dir.display(),
        "unpacked flash application"
    );
    Ok(written)
}

/// File name used for an unpacked page.
#[must_use]
pub fn page_file_name(index: u16) -> String {
    format!("page_{index:02X}.bin")
}
