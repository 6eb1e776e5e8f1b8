//! Integration tests for packing, unpacking and inspecting files on disk.

use std::fs;
use std::path::Path;
use std::process::Command;

use chrono::NaiveDate;
use tempfile::TempDir;

use tivars::{FlashSeries, Revision, Series, VariableValue, read_variables};
use tivars_cli::inspect::inspect_file;
use tivars_cli::pack::{AppRequest, AppVarRequest, PageSpec, pack_app, pack_appvar, unpack_app};
use tivars_cli::types::FileSummary;

fn write_input(dir: &Path, name: &str, data: &[u8]) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, data).unwrap();
    path
}

fn appvar_request(dir: &Path) -> AppVarRequest {
    AppVarRequest {
        name: "SAVE".to_string(),
        input: write_input(dir, "save.bin", b"\x01\x02\x03\x04"),
        output: dir.join("SAVE.8xv"),
        series: Series::Ti83Plus,
        archived: true,
        comment: "packed".to_string(),
    }
}

fn app_request(dir: &Path) -> AppRequest {
    AppRequest {
        name: "DEMO".to_string(),
        pages: vec![
            PageSpec {
                index: 0,
                path: write_input(dir, "p0.bin", &[0xAA; 100]),
            },
            PageSpec {
                index: 1,
                path: write_input(dir, "p1.bin", &[0xBB, 0xCC]),
            },
        ],
        output: dir.join("DEMO.8xk"),
        revision: Revision::new(1, 2).unwrap(),
        series: FlashSeries::Ti83Plus,
        date: NaiveDate::from_ymd_opt(2023, 11, 5),
        line_length: 32,
    }
}

#[test]
fn test_pack_appvar() {
    let dir = TempDir::new().unwrap();
    let request = appvar_request(dir.path());
    pack_appvar(&request).unwrap();

    let variables = read_variables(&fs::read(&request.output).unwrap()).unwrap();
    assert_eq!(variables.len(), 1);
    assert_eq!(variables[0].display_name(), "SAVE");
    assert!(variables[0].archived);
    let VariableValue::AppVar(appvar) = &variables[0].value else {
        panic!("expected an appvar");
    };
    assert_eq!(appvar.data, vec![1, 2, 3, 4]);
}

#[test]
fn test_pack_appvar_rejects_bad_name() {
    let dir = TempDir::new().unwrap();
    let mut request = appvar_request(dir.path());
    request.name = "MUCHTOOLONG".to_string();
    assert!(pack_appvar(&request).is_err());
    assert!(!request.output.exists());
}

#[test]
fn test_pack_app_and_unpack() {
    let dir = TempDir::new().unwrap();
    let request = app_request(dir.path());
    pack_app(&request).unwrap();

    let FileSummary::Flash(summary) = inspect_file(&request.output).unwrap() else {
        panic!("expected a flash summary");
    };
    assert_eq!(summary.name, "DEMO");
    assert_eq!(summary.revision, "1.2");
    assert_eq!(summary.date, "2023-11-05");
    assert_eq!(summary.pages.len(), 2);

    let out = dir.path().join("pages");
    let written = unpack_app(&request.output, &out).unwrap();
    assert_eq!(written, vec![out.join("page_00.bin"), out.join("page_01.bin")]);
    assert_eq!(fs::read(&written[0]).unwrap(), vec![0xAA; 100]);
    assert_eq!(fs::read(&written[1]).unwrap(), vec![0xBB, 0xCC]);
}

#[test]
fn test_inspect_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = inspect_file(&dir.path().join("absent.8xp")).unwrap_err();
    assert!(format!("{err:#}").contains("absent.8xp"));
}

#[test]
fn test_validate_exit_codes() {
    let dir = TempDir::new().unwrap();
    let request = appvar_request(dir.path());
    pack_appvar(&request).unwrap();

    let status = Command::new(env!("CARGO_BIN_EXE_tivars"))
        .arg("validate")
        .arg(&request.output)
        .status()
        .unwrap();
    assert!(status.success());

    let broken = write_input(dir.path(), "broken.8xv", b"**TI83F*\x1a\x0a\x00short");
    let status = Command::new(env!("CARGO_BIN_EXE_tivars"))
        .arg("validate")
        .arg(&broken)
        .status()
        .unwrap();
    assert_eq!(status.code(), Some(1));
}

#[test]
fn test_inspect_json_output() {
    let dir = TempDir::new().unwrap();
    let request = appvar_request(dir.path());
    pack_appvar(&request).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_tivars"))
        .args(["--color", "never", "inspect", "--json"])
        .arg(&request.output)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["format"], "variables");
    assert_eq!(json["comment"], "packed");
    assert_eq!(json["entries"][0]["name"], "SAVE");
    assert_eq!(json["entries"][0]["archived"], true);
}
