pub mod clear;
pub mod dates;
pub mod list;
pub mod open;
pub mod prune;
pub mod restore;
pub mod status;

use anyhow::Result;
use serde::Serialize;
use tab_archive::drafts::config::{DraftConfig, load_config};
use tab_archive::drafts::paths::{DraftPaths, resolve_paths};

#[derive(Debug, Clone, Serialize)]
pub struct CommandReport {
    pub command: String,
    pub ok: bool,
    pub details: Vec<String>,
    pub issues: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
}

impl CommandReport {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ok: true,
            details: Vec::new(),
            issues: Vec::new(),
            payload: None,
        }
    }

    pub fn detail(&mut self, text: impl Into<String>) {
        self.details.push(text.into());
    }

    pub fn issue(&mut self, text: impl Into<String>) {
        self.ok = false;
        self.issues.push(text.into());
    }

    /// Raw output printed verbatim in text mode instead of the detail lines.
    pub fn payload(&mut self, text: impl Into<String>) {
        self.payload = Some(text.into());
    }
}

pub fn load_context() -> Result<(DraftConfig, DraftPaths)> {
    let cfg = load_config()?;
    let paths = resolve_paths(&cfg)?;
    Ok((cfg, paths))
}

/// Appends to the audit log. A failed write is noted on the report but never
/// fails the command.
pub fn record_audit(
    report: &mut CommandReport,
    paths: &DraftPaths,
    phase: &str,
    status: &str,
    message: &str,
) {
    if let Err(err) = tab_archive::drafts::audit::append_event(paths, phase, status, message) {
        report.detail(format!("audit_log=unwritable ({err:#})"));
    }
}
