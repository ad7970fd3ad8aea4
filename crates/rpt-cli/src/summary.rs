use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use rpt_model::ReportConfiguration;
use rpt_persistence::{ImportReport, IndexEntry, Resolution};
use rpt_cli::commands::ApplyOutcome;
use rpt_validate::{Severity, ValidationReport};

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn print_index(entries: &[IndexEntry]) {
    if entries.is_empty() {
        println!("No stored configurations.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Scope"),
        header_cell("Name"),
        header_cell("Id"),
        header_cell("Updated"),
        header_cell("Active"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 4, CellAlignment::Center);
    for entry in entries {
        let active = if entry.is_active {
            Cell::new("yes").fg(Color::Green)
        } else {
            Cell::new("no").fg(Color::DarkGrey)
        };
        table.add_row(vec![
            Cell::new(&entry.scope),
            Cell::new(&entry.name),
            Cell::new(&entry.id),
            Cell::new(entry.updated_at.format("%Y-%m-%d %H:%M:%S")),
            active,
        ]);
    }
    println!("{table}");
}

pub fn print_configuration(config: &ReportConfiguration) {
    println!("Configuration: {} ({})", config.name, config.id);
    println!("Scope: {}", config.owner_scope);
    if !config.is_active {
        println!("Inactive");
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Region"),
        header_cell("Column"),
        header_cell("Chart"),
        header_cell("Title"),
        header_cell("Data source"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for region in config.regions_in_order() {
        let region_label = format!("{} ({} col)", region.order, region.column_count);
        if region.widgets.is_empty() {
            table.add_row(vec![
                Cell::new(&region_label),
                Cell::new("-").fg(Color::DarkGrey),
                Cell::new("empty").fg(Color::DarkGrey),
                Cell::new(""),
                Cell::new(""),
            ]);
            continue;
        }
        for widget in &region.widgets {
            table.add_row(vec![
                Cell::new(&region_label),
                Cell::new(widget.column_index),
                Cell::new(&widget.chart_type),
                Cell::new(&widget.presentation.title),
                Cell::new(&widget.data_source.name),
            ]);
        }
    }
    println!("{table}");
}

pub fn print_resolution(resolution: &Resolution) {
    println!("Served from: {}", resolution.source);
    print_configuration(&resolution.configuration);
}

pub fn print_report(report: &ValidationReport) {
    if report.is_empty() {
        println!("Valid: no issues found.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Severity"),
        header_cell("Category"),
        header_cell("Message"),
    ]);
    apply_table_style(&mut table);
    for issue in report.issues() {
        let severity = match issue.severity() {
            Severity::Error => Cell::new("error").fg(Color::Red),
            Severity::Warning => Cell::new("warning").fg(Color::Yellow),
        };
        table.add_row(vec![
            severity,
            Cell::new(issue.category()),
            Cell::new(issue.message()),
        ]);
    }
    println!("{table}");
    println!(
        "{} error(s), {} warning(s)",
        report.error_count(),
        report.warning_count()
    );
}

pub fn print_import(report: &ImportReport) {
    println!("Imported {} configuration(s).", report.imported.len());
    if !report.is_complete() {
        eprintln!("Failed entries:");
        for failure in &report.failures {
            match &failure.id {
                Some(id) => eprintln!("- entry {} ({id}): {}", failure.position, failure.message),
                None => eprintln!("- entry {}: {}", failure.position, failure.message),
            }
        }
    }
}

pub fn print_apply(outcome: &ApplyOutcome) {
    println!(
        "Applied {} command(s) to a configuration served from {}.",
        outcome.applied, outcome.source
    );
    print_report(&outcome.report);
    if let Some(receipt) = &outcome.receipt {
        println!("{}", receipt.message);
    }
    if let Some(error) = &outcome.save_error {
        eprintln!("Not saved: {error}");
        eprintln!("The edit was kept as a draft.");
    }
}
