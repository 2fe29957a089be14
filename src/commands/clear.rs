use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::commands::{CommandReport, load_context, record_audit};
use tab_archive::drafts::browse::clear_all;

fn confirmed(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn prompt(root: &Path) -> Result<bool> {
    let mut stderr = io::stderr();
    write!(
        stderr,
        "Clear all archived tabs in:\n{}\n\nThis cannot be undone. [y/N] ",
        root.display()
    )?;
    stderr.flush()?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("failed to read confirmation")?;
    Ok(confirmed(&answer))
}

pub fn run(yes: bool) -> Result<CommandReport> {
    let (_, paths) = load_context()?;
    let mut report = CommandReport::new("clear");
    let root = &paths.archive_root;

    if !root.exists() {
        report.detail(format!("nothing to clear at {}", root.display()));
        return Ok(report);
    }
    if !yes && !prompt(root)? {
        report.detail("clear cancelled");
        return Ok(report);
    }

    match clear_all(root) {
        Ok(_) => {
            report.detail(format!("cleared={}", root.display()));
            record_audit(&mut report, &paths, "clear", "ok", &root.display().to_string());
        }
        Err(err) => {
            record_audit(&mut report, &paths, "clear", "failed", &format!("{err:#}"));
            report.issue(format!("failed to clear archives: {err:#}"));
        }
    }
    Ok(report)
}
