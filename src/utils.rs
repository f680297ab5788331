// src/utils.rs
use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, Utc};
use std::path::Path;

/// Calendar month key used by the usage tables, e.g. "2026-08"
pub fn month_key(now: DateTime<Utc>) -> String {
    format!("{:04}-{:02}", now.year(), now.month())
}

/// Normalize a document name for use in a download filename
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.is_empty() {
        "resume".to_string()
    } else {
        cleaned
    }
}

/// Validate an export/download format identifier
pub fn is_supported_format(format: &str) -> bool {
    matches!(format, "pdf" | "docx")
}

pub async fn ensure_dir_exists(path: &Path) -> Result<()> {
    tokio::fs::create_dir_all(path)
        .await
        .with_context(|| format!("Failed to create directory: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_month_key() {
        let ts = Utc.with_ymd_and_hms(2026, 3, 7, 10, 0, 0).unwrap();
        assert_eq!(month_key(ts), "2026-03");

        let ts = Utc.with_ymd_and_hms(2025, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(month_key(ts), "2025-12");
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("John Doe"), "John_Doe");
        assert_eq!(sanitize_filename("  cv/2026  "), "cv_2026");
        assert_eq!(sanitize_filename(""), "resume");
    }

    #[test]
    fn test_is_supported_format() {
        assert!(is_supported_format("pdf"));
        assert!(is_supported_format("docx"));
        assert!(!is_supported_format("PDF"));
        assert!(!is_supported_format("html"));
        assert!(!is_supported_format(""));
    }
}
