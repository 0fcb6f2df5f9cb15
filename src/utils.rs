//! Utility functions for string formatting, logging and file system checks.
//!
//! - Number formatting for the rendered digest
//! - String truncation for log lines
//! - Output directory validation
//! - Digest file naming

use crate::error::Result;
use chrono::{DateTime, TimeZone};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters with an ellipsis and the number
/// of dropped bytes appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}…(+{} bytes)", &s[..cut], s.len() - cut),
    }
}

/// Format an integer with comma thousands separators: `12345` -> `12,345`.
pub fn format_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Score as shown in the digest: always at least one decimal, so `25.0`
/// rather than `25`, while `12.25` keeps both digits.
pub fn format_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{score:.1}")
    } else {
        score.to_string()
    }
}

/// `ai_digest_YYYYMMDD_HHMMSS.html` inside `dir`.
pub fn digest_path<Tz>(dir: &Path, completed_at: &DateTime<Tz>) -> PathBuf
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    dir.join(format!(
        "ai_digest_{}.html",
        completed_at.format("%Y%m%d_%H%M%S")
    ))
}

/// Name of the throwaway file used to check that the output directory
/// accepts writes.
const WRITE_CHECK_FILE: &str = ".ai_digest_write_check";

/// Create `path` if needed and check that files can be written there.
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<()> {
    fs::create_dir_all(path).await?;
    let check = Path::new(path).join(WRITE_CHECK_FILE);
    fs::write(&check, b"").await?;
    fs::remove_file(&check).await?;
    info!("Output directory is writable");
    Ok(())
}
