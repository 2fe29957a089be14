use crate::drafts::host::{BufferId, Host};
use crate::drafts::record::{
    ArchiveRecord, DATE_DIR_FORMAT, TIME_PREFIX_FORMAT, UNTITLED_NAME, base_name,
};
use crate::error::{DraftError, DraftResult};
use chrono::{DateTime, Local};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const FALLBACK_STEM: &str = "draft";

fn sanitize_stem(original: &str) -> String {
    let stem = base_name(original).replace(['/', '\\'], "_");
    if stem.is_empty() || stem == UNTITLED_NAME {
        FALLBACK_STEM.to_string()
    } else {
        stem
    }
}

fn candidate_path(day_dir: &Path, prefix: &str, stem: &str, attempt: usize) -> PathBuf {
    if attempt == 0 {
        day_dir.join(format!("{prefix}_{stem}.json"))
    } else {
        day_dir.join(format!("{prefix}_{stem}_{attempt}.json"))
    }
}

#[derive(Debug, Clone)]
pub struct ArchiveWriter {
    root: PathBuf,
}

impl ArchiveWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn day_dir(&self, at: DateTime<Local>) -> PathBuf {
        self.root.join(at.format(DATE_DIR_FORMAT).to_string())
    }

    /// Snapshot `buffer` to today's directory.
    ///
    /// Returns `Ok(None)` when the buffer holds only whitespace; nothing is
    /// written in that case.
    pub fn archive(
        &self,
        host: &dyn Host,
        buffer: BufferId,
        now: DateTime<Local>,
    ) -> DraftResult<Option<PathBuf>> {
        let content = host.text(buffer)?;
        if content.trim().is_empty() {
            return Ok(None);
        }

        let original = host
            .file_path(buffer)
            .filter(|p| !p.is_empty())
            .or_else(|| host.display_name(buffer).filter(|n| !n.is_empty()))
            .unwrap_or_else(|| UNTITLED_NAME.to_string());
        let record = ArchiveRecord::capture(
            &original,
            content,
            now,
            host.syntax(buffer),
            host.encoding(buffer),
        );

        self.write_record(&record, now).map(Some)
    }

    pub fn write_record(&self, record: &ArchiveRecord, now: DateTime<Local>) -> DraftResult<PathBuf> {
        let day_dir = self.day_dir(now);
        fs::create_dir_all(&day_dir).map_err(|err| DraftError::io(&day_dir, err))?;

        let mut data = serde_json::to_string_pretty(record)?;
        data.push('\n');

        let mut staged =
            NamedTempFile::new_in(&day_dir).map_err(|err| DraftError::io(&day_dir, err))?;
        staged
            .write_all(data.as_bytes())
            .map_err(|err| DraftError::io(staged.path(), err))?;

        let prefix = now.format(TIME_PREFIX_FORMAT).to_string();
        let stem = sanitize_stem(&record.original_file);
        let mut attempt = 0usize;
        loop {
            let target = candidate_path(&day_dir, &prefix, &stem, attempt);
            attempt += 1;
            if target.exists() {
                continue;
            }
            match staged.persist_noclobber(&target) {
                Ok(_) => return Ok(target),
                Err(err) if err.error.kind() == ErrorKind::AlreadyExists => {
                    staged = err.file;
                }
                Err(err) => return Err(DraftError::io(&target, err.error)),
            }
        }
    }
}
