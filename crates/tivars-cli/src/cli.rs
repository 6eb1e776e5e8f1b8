//! CLI argument definitions for the `tivars` tool.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use tivars::{FlashSeries, Revision, Series};
use tivars_cli::pack::PageSpec;

#[derive(Parser)]
#[command(
    name = "tivars",
    version,
    about = "Inspect, validate and build graphing-calculator files",
    long_about = "Inspect, validate and build graphing-calculator files.\n\n\
                  Reads and writes variable files (.8xp, .8xl, .8xv, ...) and\n\
                  flash application files (.8xk) with Intel-hex page contents."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -vvv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the header and entries (or pages) of a file.
    Inspect(InspectArgs),

    /// Check a variable file for structural problems.
    Validate(ValidateArgs),

    /// Wrap a binary file into an application variable.
    PackAppvar(PackAppVarArgs),

    /// Build a flash application from per-page binaries.
    PackApp(PackAppArgs),

    /// Extract the pages of a flash application.
    UnpackApp(UnpackAppArgs),
}

#[derive(Parser)]
pub struct InspectArgs {
    /// Variable or flash file to inspect.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Print JSON instead of tables.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Parser)]
pub struct ValidateArgs {
    /// Variable file to validate.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Print the report as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Parser)]
pub struct PackAppVarArgs {
    /// Variable name (1 to 8 characters).
    #[arg(long = "name")]
    pub name: String,

    /// Raw bytes to store.
    #[arg(long = "input", value_name = "BIN")]
    pub input: PathBuf,

    /// Output variable file.
    #[arg(short = 'o', long = "output", value_name = "OUT")]
    pub output: PathBuf,

    /// Header format to write.
    #[arg(long = "series", value_enum, default_value = "ti83-plus")]
    pub series: SeriesArg,

    /// Mark the variable as archived (TI-83 Plus headers only).
    #[arg(long = "archived")]
    pub archived: bool,

    /// File comment (up to 42 characters).
    #[arg(long = "comment", default_value = "")]
    pub comment: String,
}

#[derive(Parser)]
pub struct PackAppArgs {
    /// Application name (1 to 8 characters).
    #[arg(long = "name")]
    pub name: String,

    /// Page contents as INDEX=FILE; repeat for each page.
    #[arg(long = "page", value_name = "INDEX=FILE", required = true)]
    pub pages: Vec<PageSpec>,

    /// Output flash file.
    #[arg(short = 'o', long = "output", value_name = "OUT")]
    pub output: PathBuf,

    /// Revision as MAJOR.MINOR (single digits).
    #[arg(long = "revision", default_value = "1.0")]
    pub revision: Revision,

    /// Target calculator series.
    #[arg(long = "series", value_enum, default_value = "ti83-plus")]
    pub series: FlashSeriesArg,

    /// Build date as YYYY-MM-DD (default: today).
    #[arg(long = "date", value_name = "YYYY-MM-DD")]
    pub date: Option<NaiveDate>,

    /// Data bytes per Intel-hex line.
    #[arg(long = "line-length", default_value_t = tivars::types::DEFAULT_HEX_LINE_LENGTH)]
    pub line_length: usize,
}

#[derive(Parser)]
pub struct UnpackAppArgs {
    /// Flash file to unpack.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Directory for the page_XX.bin files.
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: PathBuf,
}

/// Variable file series choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum SeriesArg {
    Ti83,
    Ti83Plus,
}

impl From<SeriesArg> for Series {
    fn from(value: SeriesArg) -> Self {
        match value {
            SeriesArg::Ti83 => Series::Ti83,
            SeriesArg::Ti83Plus => Series::Ti83Plus,
        }
    }
}

/// Flash application series choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum FlashSeriesArg {
    Ti73,
    Ti83Plus,
    Ti89,
    Ti92Plus,
}

impl From<FlashSeriesArg> for FlashSeries {
    fn from(value: FlashSeriesArg) -> Self {
        match value {
            FlashSeriesArg::Ti73 => FlashSeries::Ti73,
            FlashSeriesArg::Ti83Plus => FlashSeries::Ti83Plus,
            FlashSeriesArg::Ti89 => FlashSeries::Ti89,
            FlashSeriesArg::Ti92Plus => FlashSeries::Ti92Plus,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
