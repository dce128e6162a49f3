//! Comma-delimited checklists: area name in the first column

use sitecheck_types::Area;

use super::non_blank_lines;

/// Header keywords recognised in the first cell of the first row
const HEADER_KEYWORDS: &[&str] = &["task", "area"];

pub(super) fn parse_csv(content: &str) -> Vec<Area> {
    let mut areas = Vec::new();

    for (idx, line) in non_blank_lines(content).enumerate() {
        let first = first_field(line);
        if idx == 0 && is_header(first) {
            continue;
        }
        if first.is_empty() {
            continue;
        }
        areas.push(Area::new(first));
    }

    areas
}

/// First comma-separated field, trimmed and unquoted
fn first_field(line: &str) -> &str {
    let field = line.split(',').next().unwrap_or("");
    clean_field(field)
}

fn clean_field(field: &str) -> &str {
    field.trim().trim_matches('"').trim()
}

fn is_header(first_cell: &str) -> bool {
    let lower = first_cell.to_lowercase();
    HEADER_KEYWORDS.iter().any(|k| lower.contains(k))
}
