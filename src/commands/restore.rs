use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::commands::{CommandReport, load_context};
use tab_archive::drafts::browse::find_record;

/// Writes the archived content to `output`, or hands it back as the report
/// payload for stdout.
pub fn run(date: &str, file_name: &str, output: Option<&Path>) -> Result<CommandReport> {
    let (_, paths) = load_context()?;
    let mut report = CommandReport::new("restore");

    let listed = find_record(&paths.archive_root, date, file_name)?;
    let record = listed.record;

    match output {
        Some(path) => {
            if path.exists() {
                report.issue(format!(
                    "refusing to overwrite existing file {}",
                    path.display()
                ));
                return Ok(report);
            }
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            fs::write(path, &record.content)
                .with_context(|| format!("failed to write {}", path.display()))?;
            report.detail(format!("restored={}", path.display()));
            report.detail(format!("suggested_name={}", record.restored_name()));
            report.detail(format!("original_file={}", record.original_file));
            report.detail(format!("syntax={}", record.syntax));
        }
        None => report.payload(record.content),
    }
    Ok(report)
}
