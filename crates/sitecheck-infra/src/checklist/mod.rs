//! Checklist import
//!
//! Turns an externally authored checklist file into an ordered list of
//! [`Area`]s. The parser is chosen by the declared [`ChecklistKind`], never by
//! sniffing content. A file that parses but yields no areas is a success with
//! an empty list; the caller decides how to report that.

mod csv;
mod structured;
mod text;

use std::path::Path;

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};

use sitecheck_types::{Area, ChecklistError, ChecklistKind};

/// Parse already-decoded checklist text
///
/// `file_name` is only used to label errors.
pub fn parse(content: &str, kind: ChecklistKind, file_name: &str) -> Result<Vec<Area>, ChecklistError> {
    let areas = match kind {
        ChecklistKind::Csv => csv::parse_csv(content),
        ChecklistKind::PlainText => text::parse_text(content),
        ChecklistKind::Structured => structured::parse_structured(content, file_name)?,
    };

    tracing::debug!(
        file = file_name,
        kind = kind.label(),
        areas = areas.len(),
        "parsed checklist"
    );

    Ok(areas)
}

/// Decode raw file bytes and parse them
pub fn parse_bytes(bytes: &[u8], kind: ChecklistKind, file_name: &str) -> Result<Vec<Area>, ChecklistError> {
    let content = decode_text(bytes, file_name);
    parse(&content, kind, file_name)
}

/// Read a checklist file, deriving its kind from the file name suffix
pub fn parse_file(path: &Path) -> Result<Vec<Area>, ChecklistError> {
    let kind = ChecklistKind::from_path(path)
        .ok_or_else(|| ChecklistError::UnsupportedKind(path.display().to_string()))?;
    let bytes = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string());

    parse_bytes(&bytes, kind, &file_name)
}

/// Decode file bytes to text
///
/// A byte order mark selects UTF-8 or UTF-16. Without one the bytes are read
/// as UTF-8, falling back to Windows-1252 when they are not valid UTF-8
/// (spreadsheet exports on Windows).
pub fn decode_text(bytes: &[u8], file_name: &str) -> String {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (decoded, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return decoded.into_owned();
    }

    let (decoded, had_errors) = UTF_8.decode_without_bom_handling(bytes);
    if !had_errors {
        return decoded.into_owned();
    }

    tracing::warn!(
        file = file_name,
        "checklist is not valid UTF-8, decoding as Windows-1252"
    );
    let (decoded, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
    decoded.into_owned()
}

/// Non-blank lines of `content`, split on `\n`
fn non_blank_lines(content: &str) -> impl Iterator<Item = &str> {
    content.split('\n').filter(|line| !line.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn names(areas: &[Area]) -> Vec<&str> {
        areas.iter().map(|a| a.name.as_str()).collect()
    }

    #[test]
    fn test_dispatch_by_declared_kind() {
        // The same text is read differently depending on the declared kind
        let content = "Lobby,Sweep\n";
        let csv = parse(content, ChecklistKind::Csv, "a.csv").unwrap();
        let txt = parse(content, ChecklistKind::PlainText, "a.txt").unwrap();
        assert_eq!(names(&csv), vec!["Lobby"]);
        assert_eq!(names(&txt), vec!["Lobby,Sweep"]);
    }

    #[test]
    fn test_imported_areas_have_defaults() {
        let areas = parse("- Lobby\n", ChecklistKind::PlainText, "a.txt").unwrap();
        assert_eq!(areas, vec![Area::new("Lobby")]);
        assert_eq!(areas[0].score, 100);
    }

    #[test]
    fn test_decode_utf8_bom() {
        let bytes = b"\xEF\xBB\xBFTask\nLobby\n";
        let areas = parse_bytes(bytes, ChecklistKind::Csv, "bom.csv").unwrap();
        assert_eq!(names(&areas), vec!["Lobby"]);
    }

    #[test]
    fn test_decode_windows_1252_fallback() {
        // "Café" with a Latin-1 e-acute
        let bytes = b"Caf\xE9\n";
        let areas = parse_bytes(bytes, ChecklistKind::PlainText, "latin.txt").unwrap();
        assert_eq!(names(&areas), vec!["Café"]);
    }

    #[test]
    fn test_decode_utf16_bom() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "Lobby\nStairwell".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        let areas = parse_bytes(&bytes, ChecklistKind::PlainText, "wide.txt").unwrap();
        assert_eq!(names(&areas), vec!["Lobby", "Stairwell"]);
    }

    #[test]
    fn test_parse_file_by_suffix() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("walkthrough.json");
        fs::write(&path, r#"["Lobby", "Restroom"]"#).unwrap();

        let areas = parse_file(&path).unwrap();
        assert_eq!(names(&areas), vec!["Lobby", "Restroom"]);
    }

    #[test]
    fn test_parse_file_rejects_unknown_suffix() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("walkthrough.xlsx");
        fs::write(&path, "Lobby").unwrap();

        assert!(matches!(
            parse_file(&path),
            Err(ChecklistError::UnsupportedKind(_))
        ));
    }

    #[test]
    fn test_parse_error_names_file() {
        let err = parse("{oops", ChecklistKind::Structured, "broken.json").unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }
}
