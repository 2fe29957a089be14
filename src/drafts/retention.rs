use crate::drafts::record::DATE_DIR_FORMAT;
use crate::error::{DraftError, DraftResult};
use chrono::{Datelike, Days, NaiveDate};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetentionOutcome {
    pub cutoff: Option<NaiveDate>,
    pub scanned: usize,
    pub deleted: Vec<String>,
    /// Directory name and the error that kept it from being removed.
    pub failed: Vec<(String, String)>,
}

impl RetentionOutcome {
    pub fn summary(&self) -> String {
        format!(
            "cutoff={} scanned={} deleted={} failed={}",
            self.cutoff
                .map(|d| d.format(DATE_DIR_FORMAT).to_string())
                .unwrap_or_else(|| "none".to_string()),
            self.scanned,
            self.deleted.len(),
            self.failed.len()
        )
    }
}

/// Parses a dated archive directory name such as `2024-01-31`.
pub fn parse_archive_date(name: &str) -> Option<NaiveDate> {
    let bytes = name.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    if name.matches('-').count() != 2 {
        return None;
    }
    NaiveDate::parse_from_str(name, DATE_DIR_FORMAT).ok()
}

/// Deletes dated directories older than `today - retention_days`.
pub fn sweep_expired(root: &Path, today: NaiveDate, retention_days: u64) -> DraftResult<RetentionOutcome> {
    let cutoff = today
        .checked_sub_days(Days::new(retention_days))
        .unwrap_or(NaiveDate::MIN);
    let mut out = RetentionOutcome {
        cutoff: Some(cutoff),
        ..RetentionOutcome::default()
    };
    if !root.exists() {
        return Ok(out);
    }

    let entries = fs::read_dir(root).map_err(|err| DraftError::io(root, err))?;
    let mut expired = Vec::new();
    for entry in entries {
        let Ok(entry) = entry else {
            continue;
        };
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()).map(str::to_owned) else {
            continue;
        };
        let Some(date) = parse_archive_date(&name) else {
            continue;
        };
        out.scanned += 1;
        if date < cutoff {
            expired.push((name, path));
        }
    }

    expired.sort();
    delete_expired(&mut out, expired, |path| fs::remove_dir_all(path));
    Ok(out)
}

fn delete_expired<F>(out: &mut RetentionOutcome, expired: Vec<(String, PathBuf)>, mut remove: F)
where
    F: FnMut(&Path) -> io::Result<()>,
{
    for (name, path) in expired {
        match remove(&path) {
            Ok(()) => out.deleted.push(name),
            Err(err) => out.failed.push((name, err.to_string())),
        }
    }
}

/// Runs [`sweep_expired`] only on the first day of the month.
pub fn run_monthly(
    root: &Path,
    today: NaiveDate,
    retention_days: u64,
) -> DraftResult<Option<RetentionOutcome>> {
    if today.day() != 1 {
        return Ok(None);
    }
    sweep_expired(root, today, retention_days).map(Some)
}
