//! Terminal summaries for detection and transform results.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use remit_detect::FormatRegistry;
use remit_model::{FormatDetection, TransformReport};

fn header_cell(text: &str) -> Cell {
    Cell::new(text).add_attribute(Attribute::Bold)
}

fn styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn print_detection(detection: &FormatDetection) {
    match &detection.format_name {
        Some(name) => println!(
            "Format: {name} (confidence {:.2})",
            detection.confidence
        ),
        None => println!("Format: unrecognized ({})", detection.failure_reason()),
    }

    if let Some(candidates) = detection
        .metadata
        .get("candidates")
        .and_then(serde_json::Value::as_array)
        && !candidates.is_empty()
    {
        let mut table = styled_table();
        table.set_header(vec![header_cell("Candidate"), header_cell("Confidence")]);
        for candidate in candidates {
            table.add_row(vec![
                Cell::new(candidate["name"].as_str().unwrap_or("?")),
                Cell::new(format!(
                    "{:.2}",
                    candidate["confidence"].as_f64().unwrap_or(0.0)
                ))
                .set_alignment(CellAlignment::Right),
            ]);
        }
        println!("{table}");
    }

    if !detection.column_map.is_empty() {
        let mut table = styled_table();
        table.set_header(vec![
            header_cell("Source Column"),
            header_cell("Canonical Column"),
            header_cell("Score"),
        ]);
        for (source, canonical) in &detection.column_map {
            let score = detection.confidence_scores.get(source).copied().unwrap_or(0.0);
            table.add_row(vec![
                Cell::new(source),
                Cell::new(canonical),
                Cell::new(format!("{score:.2}")).set_alignment(CellAlignment::Right),
            ]);
        }
        println!("{table}");
    }
}

pub fn print_transform_report(report: &TransformReport) {
    if let Some(format) = &report.format_name {
        println!("Table: {} (format: {format})", report.table_name);
    } else {
        println!("Table: {}", report.table_name);
    }
    if let Some(detection) = &report.detection {
        println!("Detection confidence: {:.2}", detection.confidence);
    }

    if !report.trace.is_empty() {
        let mut table = styled_table();
        table.set_header(vec![
            header_cell("Rule"),
            header_cell("Rows"),
            header_cell("Columns"),
        ]);
        for entry in &report.trace {
            table.add_row(vec![
                Cell::new(&entry.rule),
                Cell::new(format!("{} -> {}", entry.rows_before, entry.rows_after))
                    .set_alignment(CellAlignment::Right),
                Cell::new(format!(
                    "{} -> {}",
                    entry.columns_before, entry.columns_after
                ))
                .set_alignment(CellAlignment::Right),
            ]);
        }
        println!("{table}");
    }

    if !report.issues.is_empty() {
        let mut table = styled_table();
        table.set_header(vec![
            header_cell("Issue"),
            header_cell("Column"),
            header_cell("Count"),
            header_cell("Message"),
        ]);
        for issue in &report.issues {
            table.add_row(vec![
                Cell::new(issue.kind.as_str()).fg(Color::Yellow),
                Cell::new(&issue.column),
                Cell::new(issue.count).set_alignment(CellAlignment::Right),
                Cell::new(&issue.message),
            ]);
        }
        println!("{table}");
    }
}

pub fn print_formats(registry: &FormatRegistry) {
    let mut table = styled_table();
    table.set_header(vec![
        header_cell("Name"),
        header_cell("Description"),
        header_cell("Mappings"),
        header_cell("Patterns"),
    ]);
    for profile in registry.profiles() {
        table.add_row(vec![
            Cell::new(&profile.name).fg(Color::Cyan),
            Cell::new(&profile.description),
            Cell::new(profile.column_mappings.len()).set_alignment(CellAlignment::Right),
            Cell::new(profile.header_patterns.len()).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("{table}");
    println!("Registry: {}", registry.path().display());
}
