use anyhow::{Context, Result};
use tracing::info_span;

use tivars::validate::{ValidationReport, VariableFileValidator};
use tivars_cli::inspect::inspect_file;
use tivars_cli::pack::{AppRequest, AppVarRequest, pack_app, pack_appvar, unpack_app};

use crate::cli::{InspectArgs, PackAppArgs, PackAppVarArgs, UnpackAppArgs, ValidateArgs};
use crate::summary::{print_file_summary, print_validation_report};

pub fn run_inspect(args: &InspectArgs) -> Result<()> {
    let span = info_span!("inspect", file = %args.file.display());
    let _guard = span.enter();

    let summary = inspect_file(&args.file)?;
    if args.json {
        print_json(&summary)?;
    } else {
        print_file_summary(&summary);
    }
    Ok(())
}

/// Returns the report so the caller can pick the exit code.
pub fn run_validate(args: &ValidateArgs) -> Result<ValidationReport> {
    let span = info_span!("validate", file = %args.file.display());
    let _guard = span.enter();

    let report = VariableFileValidator::validate_file(&args.file)
        .with_context(|| format!("validate {}", args.file.display()))?;
    if args.json {
        print_json(&report)?;
    } else {
        print_validation_report(&report);
    }
    Ok(report)
}

pub fn run_pack_appvar(args: &PackAppVarArgs) -> Result<()> {
    pack_appvar(&AppVarRequest {
        name: args.name.clone(),
        input: args.input.clone(),
        output: args.output.clone(),
        series: args.series.into(),
        archived: args.archived,
        comment: args.comment.clone(),
    })?;
    println!("Wrote {}", args.output.display());
    Ok(())
}

pub fn run_pack_app(args: &PackAppArgs) -> Result<()> {
    pack_app(&AppRequest {
        name: args.name.clone(),
        pages: args.pages.clone(),
        output: args.output.clone(),
        revision: args.revision,
        series: args.series.into(),
        date: args.date,
        line_length: args.line_length,
    })?;
    println!("Wrote {}", args.output.display());
    Ok(())
}

pub fn run_unpack_app(args: &UnpackAppArgs) -> Result<()> {
    let written = unpack_app(&args.file, &args.output_dir)?;
    for path in written {
        println!("Wrote {}", path.display());
    }
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("serialize JSON")?;
    println!("{text}");
    Ok(())
}
