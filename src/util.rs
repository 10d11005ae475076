use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};

pub fn now_utc_string() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn utc_compact_string(ts: DateTime<Utc>) -> String {
    ts.format("%Y%m%dT%H%M%SZ").to_string()
}

pub fn ensure_directory(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .with_context(|| format!("failed to create directory: {}", path.display()))
}

pub fn ensure_parent_directory(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_directory(parent),
        _ => Ok(()),
    }
}

/// Transcription text plus the SHA-256 of its bytes, for run provenance.
pub struct SourceText {
    pub text: String,
    pub sha256: String,
}

pub fn read_source_text(path: &Path) -> Result<SourceText> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let sha256 = format!("{:x}", Sha256::digest(&bytes));
    let text = String::from_utf8(bytes)
        .with_context(|| format!("transcription is not valid UTF-8: {}", path.display()))?;
    Ok(SourceText { text, sha256 })
}

/// Split on `\n` and drop a trailing `\r`, keeping empty lines.
pub fn split_lines(text: &str) -> Vec<String> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}

pub fn write_json_pretty<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    ensure_parent_directory(path)?;

    let data = serde_json::to_vec_pretty(value)
        .with_context(|| format!("failed to serialize json: {}", path.display()))?;

    let mut file = File::create(path)
        .with_context(|| format!("failed to create json file: {}", path.display()))?;
    file.write_all(&data)
        .with_context(|| format!("failed to write json file: {}", path.display()))?;
    file.write_all(b"\n")
        .with_context(|| format!("failed to finalize json file: {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_lines_keeps_blank_lines_and_strips_carriage_returns() {
        let lines = split_lines("1. Jan\r\ngeboren: 1650\r\n\r\n");
        assert_eq!(lines, vec!["1. Jan", "geboren: 1650", "", ""]);
    }

    #[test]
    fn utc_compact_string_has_no_separators() {
        let ts = DateTime::parse_from_rfc3339("2024-05-06T07:08:09Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(utc_compact_string(ts), "20240506T070809Z");
    }
}
