use anyhow::Result;
use std::env;

use crate::commands::{CommandReport, load_context};
use tab_archive::drafts::browse::list_dates;
use tab_archive::drafts::config::resolve_config_path;

include!(concat!(env!("OUT_DIR"), "/env_allowlist.rs"));

const ENV_NAMESPACE: &str = "TAB_ARCHIVE_";

fn unknown_env_keys<I>(keys: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut unknown = keys
        .into_iter()
        .filter(|key| key.starts_with(ENV_NAMESPACE))
        .filter(|key| !GENERATED_ENV_ALLOWLIST.contains(&key.as_str()))
        .collect::<Vec<_>>();
    unknown.sort();
    unknown
}

pub fn run() -> Result<CommandReport> {
    let (cfg, paths) = load_context()?;
    let mut report = CommandReport::new("status");

    report.detail(format!("build_id={}", env!("BUILD_ID")));
    match resolve_config_path() {
        Some(path) => report.detail(format!(
            "config_path={} exists={}",
            path.display(),
            path.exists()
        )),
        None => report.detail("config_path=none"),
    }
    report.detail(format!("archive_root={}", paths.archive_root.display()));
    report.detail(format!("logs_dir={}", paths.logs_dir.display()));
    report.detail(format!("idle.timeout_secs={}", cfg.idle.timeout_secs));
    report.detail(format!(
        "scheduler.poll_interval_secs={}",
        cfg.scheduler.poll_interval_secs
    ));
    report.detail(format!(
        "scheduler.startup_delay_secs={}",
        cfg.scheduler.startup_delay_secs
    ));
    report.detail(format!("retention.days={}", cfg.retention.days));
    report.detail(format!("host.product_name={}", cfg.host.product_name));

    if paths.archive_root.exists() {
        let days = list_dates(&paths.archive_root)?;
        let records = days.iter().map(|d| d.records).sum::<usize>();
        report.detail(format!("archived_days={} archived_tabs={records}", days.len()));
    } else {
        report.detail("archived_days=0 archived_tabs=0 (archive root not created yet)");
    }

    for key in unknown_env_keys(env::vars().map(|(k, _)| k)) {
        report.issue(format!("unknown environment variable {key} is ignored"));
    }

    Ok(report)
}
