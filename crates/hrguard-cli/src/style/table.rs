//! Table formatting using comfy-table.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

fn base_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn header_cell(text: &str) -> Cell {
    if super::no_color() {
        Cell::new(text)
    } else {
        Cell::new(text).add_attribute(Attribute::Bold).fg(Color::Cyan)
    }
}

/// Creates a table with a bold header row.
pub fn data_table(columns: &[&str], rows: &[Vec<String>]) -> Table {
    let mut table = base_table();
    table.set_header(columns.iter().map(|c| header_cell(c)).collect::<Vec<_>>());
    for row in rows {
        table.add_row(row);
    }
    table
}

/// Creates a yes/no grid: one row per label, one column per header.
pub fn flag_table(corner: &str, columns: &[&str], rows: &[(String, Vec<bool>)]) -> Table {
    let mut table = base_table();

    let mut header = vec![header_cell(corner)];
    header.extend(columns.iter().map(|c| header_cell(c)));
    table.set_header(header);

    for (label, flags) in rows {
        let mut cells = vec![Cell::new(label)];
        cells.extend(flags.iter().map(|&flag| flag_cell(flag)));
        table.add_row(cells);
    }

    table
}

fn flag_cell(flag: bool) -> Cell {
    let (text, color) = if flag {
        ("✓", Color::Green)
    } else {
        ("✗", Color::DarkGrey)
    };
    let cell = Cell::new(text).set_alignment(CellAlignment::Center);
    if super::no_color() { cell } else { cell.fg(color) }
}

/// Creates a key-value info table (two columns: key and value).
pub fn info_table(entries: &[(&str, String)]) -> Table {
    let mut table = base_table();
    for (key, value) in entries {
        let key_cell = if super::no_color() {
            Cell::new(key)
        } else {
            Cell::new(key).fg(Color::DarkGrey)
        };
        table.add_row(vec![key_cell, Cell::new(value)]);
    }
    table
}
