//! Header label normalization.

/// Trims a label, strips a byte-order mark, and collapses inner whitespace.
///
/// Spreadsheet exports wrap long labels over several lines inside a cell;
/// collapsing keeps labels like `Reference date (as of 1 July)` stable.
pub fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let mut parts = trimmed.split_whitespace();
    let mut normalized = String::new();
    if let Some(first) = parts.next() {
        normalized.push_str(first);
        for part in parts {
            normalized.push(' ');
            normalized.push_str(part);
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("  1980-1985  "), "1980-1985");
        assert_eq!(
            normalize_header("Reference date\n(as of 1 July)"),
            "Reference date (as of 1 July)"
        );
        assert_eq!(normalize_header("\u{feff}Index"), "Index");
    }
}
