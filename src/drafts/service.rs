use crate::drafts::audit;
use crate::drafts::classify::Classifier;
use crate::drafts::config::DraftConfig;
use crate::drafts::host::{BufferId, Host};
use crate::drafts::paths::DraftPaths;
use crate::drafts::retention::{self, RetentionOutcome};
use crate::drafts::scheduler::RepeatingTimer;
use crate::drafts::sweep::{CloseSequencer, SweepOutcome, SweepStage};
use crate::drafts::tracker::ActivityTracker;
use crate::drafts::warn::{self, WarnEvent};
use crate::drafts::writer::ArchiveWriter;
use chrono::{DateTime, Duration, Local};
use std::fs;
use std::time::Instant;

pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// One archiver per editor process. The host forwards its activation,
/// modification and close notifications plus timer ticks here.
pub struct Archiver<C: Clock = SystemClock> {
    config: DraftConfig,
    paths: DraftPaths,
    classifier: Classifier,
    writer: ArchiveWriter,
    tracker: ActivityTracker,
    timer: RepeatingTimer,
    clock: C,
    startup_retention: Option<RetentionOutcome>,
    pending_status: Option<String>,
}

impl<C: Clock> Archiver<C> {
    /// Builds the service and runs the one-shot monthly retention check.
    pub fn new(config: DraftConfig, paths: DraftPaths, clock: C, started: Instant) -> Self {
        let timer = RepeatingTimer::new(
            std::time::Duration::from_secs(config.scheduler.startup_delay_secs),
            std::time::Duration::from_secs(config.scheduler.poll_interval_secs),
            started,
        );
        let mut archiver = Self {
            classifier: Classifier::new(&config.host.product_name),
            writer: ArchiveWriter::new(&paths.archive_root),
            tracker: ActivityTracker::new(),
            timer,
            clock,
            startup_retention: None,
            pending_status: None,
            config,
            paths,
        };
        archiver.prepare_root();
        archiver.run_startup_retention();
        archiver
    }

    fn prepare_root(&self) {
        let root = &self.paths.archive_root;
        if root.exists() {
            return;
        }
        match fs::create_dir_all(root) {
            Ok(()) => self.audit("startup", "ok", &format!("created {}", root.display())),
            Err(err) => warn::emit(WarnEvent {
                code: "ARCHIVE_ROOT_UNAVAILABLE",
                stage: "startup",
                action: "create-archive-root",
                buffer: "",
                archive: &root.display().to_string(),
                retry: "retry-on-first-write",
                reason: "create-dir-failed",
                err: &err.to_string(),
            }),
        }
    }

    fn run_startup_retention(&mut self) {
        let today = self.clock.now().date_naive();
        match retention::run_monthly(&self.paths.archive_root, today, self.config.retention.days) {
            Ok(None) => {}
            Ok(Some(out)) => {
                let status = if out.failed.is_empty() { "ok" } else { "degraded" };
                self.audit("retention", status, &out.summary());
                for (name, err) in &out.failed {
                    warn::emit(WarnEvent {
                        code: "RETENTION_DELETE_FAILED",
                        stage: "retention",
                        action: "remove-dated-dir",
                        buffer: "",
                        archive: name,
                        retry: "retry-next-month",
                        reason: "remove-dir-failed",
                        err,
                    });
                }
                if !out.deleted.is_empty() {
                    self.pending_status =
                        Some(format!("Cleaned up {} old archive folders", out.deleted.len()));
                }
                self.startup_retention = Some(out);
            }
            Err(err) => warn::emit(WarnEvent {
                code: "RETENTION_FAILED",
                stage: "retention",
                action: "scan-archive-root",
                buffer: "",
                archive: &self.paths.archive_root.display().to_string(),
                retry: "retry-next-month",
                reason: "read-dir-failed",
                err: &err.to_string(),
            }),
        }
    }

    fn audit(&self, phase: &str, status: &str, message: &str) {
        if let Err(err) = audit::append_event(&self.paths, phase, status, message) {
            warn::emit(WarnEvent {
                code: "AUDIT_WRITE_FAILED",
                stage: phase,
                action: "append-audit-event",
                buffer: "",
                archive: &self.paths.audit_log().display().to_string(),
                retry: "none",
                reason: "audit-log-unwritable",
                err: &format!("{err:#}"),
            });
        }
    }

    pub fn config(&self) -> &DraftConfig {
        &self.config
    }

    pub fn paths(&self) -> &DraftPaths {
        &self.paths
    }

    pub fn tracker(&self) -> &ActivityTracker {
        &self.tracker
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn startup_retention(&self) -> Option<&RetentionOutcome> {
        self.startup_retention.as_ref()
    }

    fn timeout(&self) -> Duration {
        let secs = i64::try_from(self.config.idle.timeout_secs).unwrap_or(i64::MAX);
        Duration::seconds(secs.min(i64::MAX / 1_000))
    }

    /// Starts or refreshes tracking for a temporary buffer.
    pub fn on_activate(&mut self, host: &dyn Host, buffer: BufferId) -> bool {
        if !self.classifier.is_temporary(host, buffer) {
            return false;
        }
        self.tracker.on_activate(buffer, self.clock.now());
        true
    }

    pub fn on_modify(&mut self, host: &dyn Host, buffer: BufferId) -> bool {
        if !self.classifier.is_temporary(host, buffer) {
            return false;
        }
        self.tracker.on_modify(buffer, self.clock.now())
    }

    pub fn on_close(&mut self, buffer: BufferId) {
        self.tracker.on_close(buffer);
    }

    /// Archives and closes idle temporary buffers, logging per-buffer failures.
    pub fn sweep(&mut self, host: &mut dyn Host) -> SweepOutcome {
        if let Some(status) = self.pending_status.take() {
            host.status_message(&status);
        }

        let now = self.clock.now();
        let sequencer = CloseSequencer {
            classifier: &self.classifier,
            writer: &self.writer,
            timeout: self.timeout(),
        };
        let out = sequencer.run(host, &mut self.tracker, now);

        for closed in &out.closed {
            let archive = closed
                .archive
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "none".to_string());
            self.audit(
                "close",
                "ok",
                &format!("buffer={} window={} archive={archive}", closed.buffer, closed.window),
            );
        }
        for failure in &out.failures {
            let (code, retry, reason) = match failure.stage {
                SweepStage::Archive => ("ARCHIVE_WRITE_FAILED", "none", "closed-without-archive"),
                SweepStage::Close => ("CLOSE_FAILED", "retry-next-cycle", "buffer-isolated"),
                SweepStage::Focus => ("FOCUS_RESTORE_FAILED", "none", "buffer-isolated"),
            };
            warn::emit(WarnEvent {
                code,
                stage: "sweep",
                action: failure.stage.as_str(),
                buffer: &failure.buffer.to_string(),
                archive: &failure
                    .archive
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
                retry,
                reason,
                err: &failure.error,
            });
        }
        if !out.closed.is_empty() || !out.failures.is_empty() {
            let status = if out.failures.is_empty() { "ok" } else { "degraded" };
            self.audit("sweep", status, &out.summary());
        }
        if !out.closed.is_empty() {
            host.status_message(&format!("Auto-closed {} temporary tabs", out.closed.len()));
        }

        out
    }

    /// Timer entry point; sweeps only when the repeating timer is due.
    pub fn on_timer(&mut self, host: &mut dyn Host, now: Instant) -> Option<SweepOutcome> {
        if !self.timer.poll(now) {
            return None;
        }
        Some(self.sweep(host))
    }

    pub fn until_next_sweep(&self, now: Instant) -> std::time::Duration {
        self.timer.until_due(now)
    }
}
