use crate::drafts::classify::{Classifier, Eligibility, SkipReason};
use crate::drafts::host::{BufferId, Host, WindowId};
use crate::drafts::tracker::ActivityTracker;
use crate::drafts::writer::ArchiveWriter;
use chrono::{DateTime, Duration, Local};
use std::collections::BTreeSet;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepStage {
    Archive,
    Close,
    Focus,
}

impl SweepStage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Archive => "archive",
            Self::Close => "close",
            Self::Focus => "focus",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosedBuffer {
    pub buffer: BufferId,
    pub window: WindowId,
    /// `None` when the buffer held only whitespace or the archive write
    /// failed.
    pub archive: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepFailure {
    pub buffer: BufferId,
    pub stage: SweepStage,
    pub archive: Option<PathBuf>,
    pub error: String,
}

#[derive(Debug, Clone, Default)]
pub struct SweepOutcome {
    pub tracked: usize,
    pub idle: usize,
    pub skipped: Vec<(BufferId, SkipReason)>,
    pub closed: Vec<ClosedBuffer>,
    pub failures: Vec<SweepFailure>,
    pub focus_restored: usize,
    pub dropped_stale: usize,
}

impl SweepOutcome {
    pub fn summary(&self) -> String {
        format!(
            "tracked={} idle={} skipped={} closed={} failed={} focus_restored={} dropped_stale={}",
            self.tracked,
            self.idle,
            self.skipped.len(),
            self.closed.len(),
            self.failures.len(),
            self.focus_restored,
            self.dropped_stale
        )
    }
}

pub struct CloseSequencer<'a> {
    pub classifier: &'a Classifier,
    pub writer: &'a ArchiveWriter,
    pub timeout: Duration,
}

impl CloseSequencer<'_> {
    /// Writes the archive. A failed write is reported but never blocks the
    /// close.
    fn archive_one(
        &self,
        host: &dyn Host,
        buffer: BufferId,
        now: DateTime<Local>,
        failures: &mut Vec<SweepFailure>,
    ) -> Option<PathBuf> {
        match self.writer.archive(host, buffer, now) {
            Ok(archive) => archive,
            Err(err) => {
                failures.push(SweepFailure {
                    buffer,
                    stage: SweepStage::Archive,
                    archive: None,
                    error: err.to_string(),
                });
                None
            }
        }
    }

    fn close_one(
        &self,
        host: &mut dyn Host,
        window: WindowId,
        buffer: BufferId,
        archive: Option<PathBuf>,
    ) -> Result<Option<PathBuf>, SweepFailure> {
        let failed = |error: String| SweepFailure {
            buffer,
            stage: SweepStage::Close,
            archive: archive.clone(),
            error,
        };

        let marked = host.is_dirty(buffer);
        if marked {
            host.set_scratch(buffer, true).map_err(|err| failed(err.to_string()))?;
        }
        let closed = match host.tab_index(window, buffer) {
            Some(at) => host.close_by_index(window, at),
            None => host.close_buffer(buffer),
        };
        if let Err(err) = closed {
            let mut error = err.to_string();
            // The buffer stays open, so it must read as dirty again to be
            // picked up by the next sweep.
            if marked {
                if let Err(undo) = host.set_scratch(buffer, false) {
                    error = format!("{error}; restoring dirty state failed: {undo}");
                }
            }
            return Err(failed(error));
        }

        Ok(archive)
    }

    /// Archives and closes every tracked buffer idle past the timeout that is
    /// still temporary, one window at a time.
    ///
    /// A failure on one buffer never stops the batch. A failed archive write
    /// is reported and the buffer is still closed. A buffer whose close
    /// fails keeps its dirty state and tracker entry for the next cycle.
    pub fn run(
        &self,
        host: &mut dyn Host,
        tracker: &mut ActivityTracker,
        now: DateTime<Local>,
    ) -> SweepOutcome {
        let mut out = SweepOutcome {
            tracked: tracker.len(),
            ..SweepOutcome::default()
        };
        let mut live = BTreeSet::new();

        for window in host.windows() {
            let focused = host.active_buffer(window);

            let mut due = Vec::new();
            for buffer in host.buffers(window) {
                live.insert(buffer);
                if !tracker.is_idle(buffer, now, self.timeout) {
                    continue;
                }
                out.idle += 1;
                match self.classifier.check(host, buffer) {
                    Eligibility::Temporary => due.push(buffer),
                    Eligibility::Skip(reason) => out.skipped.push((buffer, reason)),
                }
            }

            let mut closed_here = BTreeSet::new();
            for buffer in due {
                let archive = self.archive_one(host, buffer, now, &mut out.failures);
                match self.close_one(host, window, buffer, archive) {
                    Ok(archive) => {
                        tracker.forget(buffer);
                        closed_here.insert(buffer);
                        out.closed.push(ClosedBuffer {
                            buffer,
                            window,
                            archive,
                        });
                    }
                    Err(failure) => out.failures.push(failure),
                }
            }

            let Some(focused) = focused.filter(|b| !closed_here.contains(b)) else {
                continue;
            };
            if host.active_buffer(window) == Some(focused) {
                continue;
            }
            match host.focus_buffer(window, focused) {
                Ok(()) => out.focus_restored += 1,
                Err(err) => out.failures.push(SweepFailure {
                    buffer: focused,
                    stage: SweepStage::Focus,
                    archive: None,
                    error: err.to_string(),
                }),
            }
        }

        out.dropped_stale = tracker.retain_live(&live);
        out
    }
}
