//! Small string and filesystem helpers used across the crate.
//!
//! - Date extraction from ISO-8601 timestamps
//! - Case-insensitive substring matching for titles
//! - String truncation and slugification for logs, tables and file names
//! - Output directory preparation for rendered figures

use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, instrument};

/// Return the portion of an ISO-8601 timestamp before the first `T`.
///
/// Strings without a `T` are returned whole.
///
/// ```ignore
/// assert_eq!(date_prefix("2023-10-01T12:34:56Z"), "2023-10-01");
/// ```
pub fn date_prefix(timestamp: &str) -> &str {
    match timestamp.find('T') {
        Some(idx) => &timestamp[..idx],
        None => timestamp,
    }
}

/// Case-insensitive substring test. An empty needle matches everything.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Truncate a string for logging or display.
///
/// Long strings are cut to at most `max` bytes (on a char boundary) with an
/// ellipsis and byte count indicator appended.
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Convert a search term into a file-name friendly slug.
///
/// ```ignore
/// assert_eq!(slugify("Hello World"), "hello-world");
/// ```
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .replace(|c: char| !c.is_alphanumeric() && c != ' ' && c != '-', "")
        .replace(' ', "-")
}

/// Make sure the parent directory of `path` exists.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
        debug!(dir = %parent.display(), "Output directory ready");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_prefix() {
        assert_eq!(date_prefix("2023-10-01T12:34:56Z"), "2023-10-01");
        assert_eq!(date_prefix("2023-10-01"), "2023-10-01");
        assert_eq!(date_prefix(""), "");
        assert_eq!(date_prefix("T12:00:00Z"), "");
    }

    #[test]
    fn test_contains_ignore_case() {
        assert!(contains_ignore_case("Bitcoin hits record", "bitcoin"));
        assert!(contains_ignore_case("bitcoin hits record", "BITCOIN"));
        assert!(!contains_ignore_case("Stocks rally", "bitcoin"));
        assert!(contains_ignore_case("anything", ""));
    }

    #[test]
    fn test_truncate_for_log_short_string() {
        assert_eq!(truncate_for_log("Hello, world!", 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_respects_char_boundary() {
        let s = "é".repeat(10);
        let result = truncate_for_log(&s, 3);
        assert!(result.starts_with('é'));
        assert!(result.contains("(+18 bytes)"));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("Test-Article!"), "test-article");
        assert_eq!(slugify("crypto & AI"), "crypto--ai");
    }

    #[test]
    fn test_ensure_parent_dir_creates_missing_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested/deeper/plot.svg");
        ensure_parent_dir(&target).unwrap();
        assert!(dir.path().join("nested/deeper").is_dir());
    }

    #[test]
    fn test_ensure_parent_dir_bare_file_name() {
        assert!(ensure_parent_dir(Path::new("plot.svg")).is_ok());
    }
}
