use anyhow::Result;

use crate::commands::{CommandReport, load_context};
use tab_archive::drafts::browse::list_dates;

pub fn run() -> Result<CommandReport> {
    let (_, paths) = load_context()?;
    let mut report = CommandReport::new("dates");

    let days = list_dates(&paths.archive_root)?;
    if days.is_empty() {
        report.detail(format!(
            "no archived tabs under {}",
            paths.archive_root.display()
        ));
        return Ok(report);
    }
    for day in days {
        let noun = if day.records == 1 { "tab" } else { "tabs" };
        report.detail(format!("{}  {} {noun}", day.label(), day.records));
    }
    Ok(report)
}
