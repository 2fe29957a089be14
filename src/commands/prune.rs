use anyhow::{Result, anyhow};
use chrono::{Local, NaiveDate};

use crate::commands::{CommandReport, load_context, record_audit};
use tab_archive::drafts::retention::{parse_archive_date, run_monthly, sweep_expired};

#[derive(Debug, Clone, Default)]
pub struct PruneOptions {
    pub force: bool,
    pub today: Option<String>,
}

fn resolve_today(raw: Option<&str>) -> Result<NaiveDate> {
    match raw {
        Some(value) => parse_archive_date(value.trim())
            .ok_or_else(|| anyhow!("invalid --today `{value}`: expected YYYY-MM-DD")),
        None => Ok(Local::now().date_naive()),
    }
}

pub fn run(opts: &PruneOptions) -> Result<CommandReport> {
    let (cfg, paths) = load_context()?;
    let mut report = CommandReport::new("prune");
    let today = resolve_today(opts.today.as_deref())?;

    report.detail(format!("today={today}"));
    report.detail(format!("retention.days={}", cfg.retention.days));

    let outcome = if opts.force {
        Some(sweep_expired(&paths.archive_root, today, cfg.retention.days)?)
    } else {
        run_monthly(&paths.archive_root, today, cfg.retention.days)?
    };

    let Some(outcome) = outcome else {
        report.detail("skipped: retention runs on the first day of the month (use --force)");
        return Ok(report);
    };

    report.detail(outcome.summary());
    for name in &outcome.deleted {
        report.detail(format!("deleted={name}"));
    }
    for (name, err) in &outcome.failed {
        report.issue(format!("failed to delete {name}: {err}"));
    }

    let status = if outcome.failed.is_empty() { "ok" } else { "partial" };
    record_audit(&mut report, &paths, "retention", status, &outcome.summary());
    Ok(report)
}
