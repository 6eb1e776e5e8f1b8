use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use tivars::validate::{ValidationReport, ValidationSeverity};
use tivars_cli::types::{FileSummary, FlashFileSummary, VariableFileSummary};

pub fn print_file_summary(summary: &FileSummary) {
    match summary {
        FileSummary::Variables(file) => print_variable_summary(file),
        FileSummary::Flash(file) => print_flash_summary(file),
    }
}

fn print_variable_summary(file: &VariableFileSummary) {
    println!("Series: {}", file.series);
    println!("Comment: {}", file.comment);
    println!("Entries: {} bytes", file.entries_length);
    if !file.checksum_valid {
        println!("Checksum: mismatch");
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Name"),
        header_cell("Kind"),
        header_cell("Type"),
        header_cell("Bytes"),
        header_cell("Version"),
        header_cell("Archived"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Center);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Center);

    let mut total_bytes = 0usize;
    for entry in &file.entries {
        total_bytes += usize::from(entry.data_length);
        table.add_row(vec![
            Cell::new(&entry.name)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(&entry.kind),
            Cell::new(format!("0x{:02X}", entry.type_tag)),
            Cell::new(entry.data_length),
            dim_cell(entry.version),
            flag_cell(entry.archived),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!("{} entries", file.entries.len())).add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(total_bytes).add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
    ]);
    println!("{table}");
}

fn print_flash_summary(file: &FlashFileSummary) {
    println!("Application: {}", file.name);
    println!("Revision: {}", file.revision);
    println!("Series: {}", file.series);
    println!("Date: {}", file.date);

    let mut table = Table::new();
    table.set_header(vec![header_cell("Page"), header_cell("Bytes")]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 1, CellAlignment::Right);
    for page in &file.pages {
        table.add_row(vec![Cell::new(page.index), Cell::new(page.bytes)]);
    }
    println!("{table}");
}

pub fn print_validation_report(report: &ValidationReport) {
    println!("{}", report.summary());
    if report.issues().is_empty() {
        return;
    }

    let mut issues: Vec<_> = report.issues().iter().collect();
    issues.sort_by(|a, b| b.severity.cmp(&a.severity));

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Severity"),
        header_cell("Code"),
        header_cell("Location"),
        header_cell("Message"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Center);
    align_column(&mut table, 1, CellAlignment::Center);
    for issue in issues {
        table.add_row(vec![
            severity_cell(issue.severity),
            Cell::new(issue.code),
            Cell::new(issue.location.to_string()),
            Cell::new(&issue.message),
        ]);
    }
    println!();
    println!("Issues:");
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn severity_cell(severity: ValidationSeverity) -> Cell {
    match severity {
        ValidationSeverity::Error => Cell::new("ERROR")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        ValidationSeverity::Warning => Cell::new("WARN").fg(Color::Yellow),
        ValidationSeverity::Info => dim_cell("INFO"),
    }
}

fn flag_cell(value: bool) -> Cell {
    if value {
        Cell::new("✓")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold)
    } else {
        dim_cell("-")
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
