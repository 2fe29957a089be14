use anyhow::Result;

use crate::commands::{CommandReport, load_context};
use tab_archive::drafts::browse::list_day;

pub fn run(date: &str) -> Result<CommandReport> {
    let (_, paths) = load_context()?;
    let mut report = CommandReport::new("list");

    let listing = list_day(&paths.archive_root, date)?;
    if listing.records.is_empty() && listing.skipped.is_empty() {
        report.detail(format!("no archived tabs for {date}"));
        return Ok(report);
    }

    for listed in &listing.records {
        let record = &listed.record;
        report.detail(format!(
            "{}  {}  {}  ({} chars, {} lines, {})  {}",
            record.time_of_day(),
            listed.file_name,
            record.original_base_name(),
            record.size,
            record.lines_label(),
            record.syntax,
            record.preview()
        ));
    }
    for skipped in &listing.skipped {
        report.issue(format!(
            "unreadable archive {}: {}",
            skipped.path.display(),
            skipped.reason
        ));
    }
    Ok(report)
}
