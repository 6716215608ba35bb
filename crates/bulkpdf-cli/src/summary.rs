use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use bulkpdf_cli::pipeline::FillResult;
use bulkpdf_template::TemplateArtifacts;

pub fn print_template_summary(artifacts: &TemplateArtifacts) {
    println!("Template CSV: {}", artifacts.template_csv.display());
    match &artifacts.field_info {
        Some(path) => println!("Field info: {}", path.display()),
        None => println!("Field info: (no button or choice fields)"),
    }
}

pub fn print_fill_summary(result: &FillResult) {
    println!("Data source: {}", result.data_file.display());
    println!("Output: {}", result.output_dir.display());
    if let Some(path) = &result.report_path {
        println!("Run report: {}", path.display());
    }

    let report = &result.report;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Processed"),
        header_cell("Succeeded"),
        header_cell("Failed"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 0..3 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table.add_row(vec![
        Cell::new(report.processed).add_attribute(Attribute::Bold),
        count_cell(report.succeeded, Color::Green),
        count_cell(report.failed(), Color::Red),
    ]);
    println!("{table}");

    if report.failures.is_empty() {
        return;
    }
    let mut failures = Table::new();
    failures.set_header(vec![
        header_cell("Row"),
        header_cell("Output file"),
        header_cell("Reason"),
    ]);
    apply_summary_table_style(&mut failures);
    align_column(&mut failures, 0, CellAlignment::Right);
    for failure in &report.failures {
        failures.add_row(vec![
            Cell::new(failure.row_number),
            match &failure.output_filename {
                Some(name) => Cell::new(name),
                None => dim_cell("-"),
            },
            Cell::new(&failure.reason).fg(Color::Red),
        ]);
    }
    println!();
    println!("Failures:");
    println!("{failures}");
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

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(value: usize, color: Color) -> Cell {
    if value > 0 {
        Cell::new(value).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(value)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
