use anyhow::Result;
use std::env;
use std::path::PathBuf;

use crate::commands::{CommandReport, load_context};
use tab_archive::drafts::browse::open_in_file_browser;

fn opener_override() -> Option<PathBuf> {
    env::var("TAB_ARCHIVE_OPENER")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

pub fn run() -> Result<CommandReport> {
    let (_, paths) = load_context()?;
    let mut report = CommandReport::new("open");

    let opener = opener_override();
    match open_in_file_browser(&paths.archive_root, opener.as_deref()) {
        Ok(bin) => {
            report.detail(format!("opened={}", paths.archive_root.display()));
            report.detail(format!("opener={}", bin.display()));
        }
        Err(err) => report.issue(format!("could not open archive folder: {err:#}")),
    }
    Ok(report)
}
