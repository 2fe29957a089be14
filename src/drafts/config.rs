use crate::error::DraftError;
use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdleConfig {
    pub timeout_secs: u64,
}

impl Default for IdleConfig {
    fn default() -> Self {
        Self { timeout_secs: 7200 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub poll_interval_secs: u64,
    pub startup_delay_secs: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 60,
            startup_delay_secs: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionConfig {
    pub days: u64,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self { days: 30 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    pub product_name: String,
    pub archive_dir_name: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            product_name: "sublime".to_string(),
            archive_dir_name: "sublime_drafts".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DraftConfig {
    pub idle: IdleConfig,
    pub scheduler: SchedulerConfig,
    pub retention: RetentionConfig,
    pub host: HostConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PartialDraftConfig {
    idle: Option<IdleConfig>,
    scheduler: Option<SchedulerConfig>,
    retention: Option<RetentionConfig>,
    host: Option<HostConfig>,
}

fn env_or_u64(var: &str, fallback: u64) -> u64 {
    match env::var(var) {
        Ok(v) => v.trim().parse::<u64>().ok().unwrap_or(fallback),
        Err(_) => fallback,
    }
}

fn env_or_string(var: &str, fallback: &str) -> String {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => fallback.to_string(),
    }
}

pub fn validate(cfg: &DraftConfig) -> Result<()> {
    if cfg.idle.timeout_secs == 0 {
        return Err(anyhow!("invalid idle timeout: must be >= 1 second"));
    }
    if cfg.scheduler.poll_interval_secs == 0 {
        return Err(anyhow!("invalid poll interval: must be >= 1 second"));
    }
    if cfg.retention.days == 0 {
        return Err(anyhow!("invalid retention window: must be >= 1 day"));
    }
    if cfg.host.product_name.trim().is_empty() {
        return Err(anyhow!("invalid host product name: cannot be empty"));
    }
    let dir_name = cfg.host.archive_dir_name.trim();
    if dir_name.is_empty() || dir_name.contains(['/', '\\']) {
        return Err(anyhow!(
            "invalid archive dir name: must be a single non-empty path component"
        ));
    }
    Ok(())
}

pub fn resolve_config_path() -> Option<PathBuf> {
    if let Ok(custom) = env::var("TAB_ARCHIVE_CONFIG_PATH") {
        let trimmed = custom.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }

    let config_dir = dirs::config_dir()?;
    Some(config_dir.join("tab-archive").join("config.toml"))
}

fn merge_toml(base: &mut DraftConfig, raw: &str) -> Result<()> {
    let parsed: PartialDraftConfig = toml::from_str(raw)?;
    if let Some(idle) = parsed.idle {
        base.idle = idle;
    }
    if let Some(scheduler) = parsed.scheduler {
        base.scheduler = scheduler;
    }
    if let Some(retention) = parsed.retention {
        base.retention = retention;
    }
    if let Some(host) = parsed.host {
        base.host = host;
    }
    Ok(())
}

fn merge_file_config(base: &mut DraftConfig) -> Result<()> {
    let Some(path) = resolve_config_path() else {
        return Ok(());
    };
    if !path.exists() {
        return Ok(());
    }

    let raw = fs::read_to_string(&path).map_err(|err| DraftError::io(&path, err))?;
    merge_toml(base, &raw).map_err(|err| {
        anyhow::Error::from(DraftError::InvalidConfig(format!(
            "failed to parse config {}: {err}",
            path.display()
        )))
    })
}

pub fn load_config() -> Result<DraftConfig> {
    let mut cfg = DraftConfig::default();
    merge_file_config(&mut cfg)?;

    cfg.idle.timeout_secs = env_or_u64("TAB_ARCHIVE_IDLE_TIMEOUT_SECS", cfg.idle.timeout_secs);
    cfg.scheduler.poll_interval_secs = env_or_u64(
        "TAB_ARCHIVE_POLL_INTERVAL_SECS",
        cfg.scheduler.poll_interval_secs,
    );
    cfg.scheduler.startup_delay_secs = env_or_u64(
        "TAB_ARCHIVE_STARTUP_DELAY_SECS",
        cfg.scheduler.startup_delay_secs,
    );
    cfg.retention.days = env_or_u64("TAB_ARCHIVE_RETENTION_DAYS", cfg.retention.days);
    cfg.host.product_name = env_or_string("TAB_ARCHIVE_PRODUCT_NAME", &cfg.host.product_name);
    cfg.host.archive_dir_name =
        env_or_string("TAB_ARCHIVE_ARCHIVE_DIR_NAME", &cfg.host.archive_dir_name);

    validate(&cfg)?;
    Ok(cfg)
}
