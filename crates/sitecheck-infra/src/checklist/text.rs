//! Line-oriented checklists: one area per line, bullets optional

use sitecheck_types::Area;

use super::non_blank_lines;

const BULLETS: &[char] = &['-', '•', '*'];

/// Lines containing these (lowercased) are titles, not areas
const BOILERPLATE: &[&str] = &["checklist", "complete care"];

pub(super) fn parse_text(content: &str) -> Vec<Area> {
    non_blank_lines(content)
        .map(strip_bullet)
        .filter(|name| !name.is_empty() && !is_boilerplate(name))
        .map(Area::new)
        .collect()
}

/// Trim and remove one leading bullet marker
fn strip_bullet(line: &str) -> &str {
    let line = line.trim();
    line.strip_prefix(BULLETS).unwrap_or(line).trim()
}

fn is_boilerplate(name: &str) -> bool {
    let lower = name.to_lowercase();
    BOILERPLATE.iter().any(|b| lower.contains(b))
}
