use crate::drafts::config::DraftConfig;
use anyhow::Result;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct DraftPaths {
    pub archive_root: PathBuf,
    pub logs_dir: PathBuf,
}

impl DraftPaths {
    pub fn audit_log(&self) -> PathBuf {
        self.logs_dir.join("audit.log")
    }
}

fn required_home_dir() -> Result<PathBuf> {
    if let Some(home) = dirs::home_dir() {
        return Ok(home);
    }
    Err(anyhow::anyhow!("HOME directory could not be resolved"))
}

fn env_or_default_path(var: &str, fallback: PathBuf) -> PathBuf {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => PathBuf::from(v.trim()),
        _ => fallback,
    }
}

pub fn resolve_paths(cfg: &DraftConfig) -> Result<DraftPaths> {
    let home = required_home_dir()?;
    let archive_root = env_or_default_path(
        "TAB_ARCHIVE_ROOT",
        home.join("Documents").join(&cfg.host.archive_dir_name),
    );
    let data_dir = dirs::data_local_dir().unwrap_or_else(|| home.join(".local/share"));
    let logs_dir = env_or_default_path(
        "TAB_ARCHIVE_LOGS_DIR",
        data_dir.join("tab-archive").join("logs"),
    );

    Ok(DraftPaths {
        archive_root,
        logs_dir,
    })
}
