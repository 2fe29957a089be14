use crate::drafts::util::truncate_with_ellipsis;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SYNTAX: &str = "Plain Text";
pub const UNTITLED_NAME: &str = "Untitled";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const DATE_DIR_FORMAT: &str = "%Y-%m-%d";
pub const TIME_PREFIX_FORMAT: &str = "%H-%M-%S";

const PREVIEW_CHARS: usize = 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveRecord {
    pub original_file: String,
    pub content: String,
    pub timestamp: String,
    pub size: usize,
    #[serde(default)]
    pub lines: Option<usize>,
    #[serde(default = "default_syntax")]
    pub syntax: String,
    #[serde(default)]
    pub encoding: Option<String>,
}

fn default_syntax() -> String {
    DEFAULT_SYNTAX.to_string()
}

pub fn char_count(content: &str) -> usize {
    content.chars().count()
}

pub fn line_count(content: &str) -> usize {
    content.matches('\n').count() + 1
}

/// Last `/`-separated component of a host-reported name.
pub fn base_name(original: &str) -> &str {
    original.rsplit('/').next().unwrap_or(original)
}

impl ArchiveRecord {
    pub fn capture(
        original_file: &str,
        content: String,
        at: DateTime<Local>,
        syntax: Option<String>,
        encoding: Option<String>,
    ) -> Self {
        Self {
            original_file: original_file.to_string(),
            size: char_count(&content),
            lines: Some(line_count(&content)),
            content,
            timestamp: at.format(TIMESTAMP_FORMAT).to_string(),
            syntax: syntax
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(default_syntax),
            encoding: encoding.filter(|e| !e.trim().is_empty()),
        }
    }

    /// `HH:MM:SS` part of the timestamp.
    pub fn time_of_day(&self) -> &str {
        self.timestamp
            .split_once(' ')
            .map(|(_, time)| time)
            .unwrap_or(&self.timestamp)
    }

    pub fn original_base_name(&self) -> &str {
        base_name(&self.original_file)
    }

    pub fn restored_name(&self) -> String {
        format!(
            "Restored_{}_{}",
            self.time_of_day().replace(':', "-"),
            self.original_base_name()
        )
    }

    pub fn preview(&self) -> String {
        let flat = self.content.replace('\n', " ").replace('\r', "");
        truncate_with_ellipsis(&flat, PREVIEW_CHARS)
    }

    pub fn lines_label(&self) -> String {
        self.lines
            .map(|n| n.to_string())
            .unwrap_or_else(|| "Unknown".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn noon() -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2024, 3, 9, 14, 5, 7)
            .single()
            .expect("unambiguous local time")
    }

    #[test]
    fn capture_counts_characters_and_lines() {
        let record = ArchiveRecord::capture(
            "Untitled",
            "héllo\nwörld".to_string(),
            noon(),
            None,
            Some(String::new()),
        );
        assert_eq!(record.size, 11);
        assert_eq!(record.lines, Some(2));
        assert_eq!(record.timestamp, "2024-03-09 14:05:07");
        assert_eq!(record.syntax, DEFAULT_SYNTAX);
        assert_eq!(record.encoding, None);
    }

    #[test]
    fn serializes_fields_in_fixed_order_with_literal_unicode() {
        let record = ArchiveRecord::capture(
            "草稿",
            "日本語".to_string(),
            noon(),
            Some("Packages/Rust/Rust.sublime-syntax".to_string()),
            Some("UTF-8".to_string()),
        );
        let json = serde_json::to_string_pretty(&record).expect("serialize");
        let keys = [
            "original_file",
            "content",
            "timestamp",
            "size",
            "lines",
            "syntax",
            "encoding",
        ];
        let positions = keys
            .iter()
            .map(|k| json.find(&format!("\"{k}\"")).expect("key present"))
            .collect::<Vec<_>>();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(json.contains("\"日本語\""));
        assert!(json.contains("\n  \"size\": 3,"));
    }

    #[test]
    fn older_records_without_optional_fields_still_parse() {
        let raw = r#"{"original_file":"/tmp/a/notes","content":"x","timestamp":"2024-01-02 03:04:05","size":1}"#;
        let record: ArchiveRecord = serde_json::from_str(raw).expect("parse");
        assert_eq!(record.lines_label(), "Unknown");
        assert_eq!(record.syntax, DEFAULT_SYNTAX);
        assert_eq!(record.time_of_day(), "03:04:05");
        assert_eq!(record.restored_name(), "Restored_03-04-05_notes");
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let raw = r#"{"original_file":"a","timestamp":"2024-01-02 03:04:05","size":1}"#;
        assert!(serde_json::from_str::<ArchiveRecord>(raw).is_err());
    }

    #[test]
    fn preview_flattens_and_truncates() {
        let mut record = ArchiveRecord::capture("a", "one\r\ntwo".to_string(), noon(), None, None);
        assert_eq!(record.preview(), "one two");
        record.content = "x".repeat(61);
        assert_eq!(record.preview(), format!("{}…", "x".repeat(60)));
    }
}
