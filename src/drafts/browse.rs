use crate::drafts::host::{BufferId, Host, WindowId};
use crate::drafts::record::{ArchiveRecord, DATE_DIR_FORMAT, DEFAULT_SYNTAX};
use crate::drafts::retention::parse_archive_date;
use crate::error::DraftError;
use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveDay {
    pub name: String,
    pub date: NaiveDate,
    pub records: usize,
}

impl ArchiveDay {
    pub fn label(&self) -> String {
        self.date.format("%Y-%m-%d (%A)").to_string()
    }
}

#[derive(Debug, Clone)]
pub struct ListedRecord {
    pub path: PathBuf,
    pub file_name: String,
    pub record: ArchiveRecord,
}

#[derive(Debug, Clone)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct DayListing {
    pub records: Vec<ListedRecord>,
    pub skipped: Vec<SkippedFile>,
}

fn is_json(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("json")
}

fn count_records(dir: &Path) -> usize {
    fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .filter(|e| is_json(&e.path()))
                .count()
        })
        .unwrap_or(0)
}

/// Dated archive directories, newest first.
pub fn list_dates(root: &Path) -> Result<Vec<ArchiveDay>> {
    if !root.exists() {
        return Ok(Vec::new());
    }
    let entries = fs::read_dir(root).with_context(|| format!("failed to read {}", root.display()))?;

    let mut days = Vec::new();
    for entry in entries.filter_map(Result::ok) {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(date) = parse_archive_date(name) else {
            continue;
        };
        days.push(ArchiveDay {
            name: name.to_string(),
            date,
            records: count_records(&path),
        });
    }
    days.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(days)
}

fn day_dir(root: &Path, date: &str) -> Result<PathBuf> {
    let parsed = parse_archive_date(date)
        .ok_or_else(|| anyhow!("invalid archive date `{date}`: expected YYYY-MM-DD"))?;
    Ok(root.join(parsed.format(DATE_DIR_FORMAT).to_string()))
}

pub fn load_record(path: &Path) -> Result<ArchiveRecord> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let record = serde_json::from_str(&raw).map_err(|err| DraftError::MalformedRecord {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;
    Ok(record)
}

/// Records archived on `date`, newest first. Unreadable files are reported in
/// `skipped` and do not stop the listing.
pub fn list_day(root: &Path, date: &str) -> Result<DayListing> {
    let dir = day_dir(root, date)?;
    if !dir.is_dir() {
        return Ok(DayListing::default());
    }
    let entries = fs::read_dir(&dir).with_context(|| format!("failed to read {}", dir.display()))?;

    let mut out = DayListing::default();
    for entry in entries.filter_map(Result::ok) {
        let path = entry.path();
        if !path.is_file() || !is_json(&path) {
            continue;
        }
        match load_record(&path) {
            Ok(record) => out.records.push(ListedRecord {
                file_name: entry.file_name().to_string_lossy().into_owned(),
                path,
                record,
            }),
            Err(err) => out.skipped.push(SkippedFile {
                path,
                reason: format!("{err:#}"),
            }),
        }
    }
    out.records.sort_by(|a, b| {
        b.record
            .timestamp
            .cmp(&a.record.timestamp)
            .then_with(|| b.file_name.cmp(&a.file_name))
    });
    Ok(out)
}

pub fn find_record(root: &Path, date: &str, file_name: &str) -> Result<ListedRecord> {
    if file_name.contains(['/', '\\']) || file_name == ".." {
        return Err(anyhow!("invalid record name `{file_name}`"));
    }
    let path = day_dir(root, date)?.join(file_name);
    let record = load_record(&path)?;
    Ok(ListedRecord {
        path,
        file_name: file_name.to_string(),
        record,
    })
}

/// Opens a new buffer in `window` holding the archived content.
pub fn restore(host: &mut dyn Host, window: WindowId, record: &ArchiveRecord) -> Result<BufferId> {
    let buffer = host.new_buffer(window)?;
    host.insert_text(buffer, &record.content)?;
    if record.syntax != DEFAULT_SYNTAX {
        host.set_syntax(buffer, &record.syntax)?;
    }
    if let Some(encoding) = record.encoding.as_deref().filter(|e| !e.is_empty()) {
        host.set_encoding(buffer, encoding)?;
    }
    host.set_name(buffer, &record.restored_name())?;
    host.status_message(&format!("Restored: {}", record.original_base_name()));
    Ok(buffer)
}

/// Removes the whole archive tree. Returns `false` when there was nothing to
/// remove.
pub fn clear_all(root: &Path) -> Result<bool> {
    if !root.exists() {
        return Ok(false);
    }
    fs::remove_dir_all(root).with_context(|| format!("failed to remove {}", root.display()))?;
    Ok(true)
}

fn platform_opener() -> &'static str {
    if cfg!(windows) {
        "explorer"
    } else if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    }
}

/// Opens `root` in the OS file browser, creating it first when missing.
pub fn open_in_file_browser(root: &Path, opener: Option<&Path>) -> Result<PathBuf> {
    fs::create_dir_all(root).with_context(|| format!("failed to create {}", root.display()))?;
    let bin = match opener {
        Some(path) => path.to_path_buf(),
        None => which::which(platform_opener())
            .with_context(|| format!("`{}` not found on PATH", platform_opener()))?,
    };
    let status = Command::new(&bin)
        .arg(root)
        .status()
        .with_context(|| format!("failed to run {}", bin.display()))?;
    if !status.success() && !cfg!(windows) {
        return Err(anyhow!("{} exited with {status}", bin.display()));
    }
    Ok(bin)
}
