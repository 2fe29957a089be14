use crate::drafts::host::BufferId;
use chrono::{DateTime, Duration, Local};
use std::collections::{BTreeMap, BTreeSet};

/// Last-activity timestamps for temporary buffers.
///
/// Callers decide eligibility; the tracker only records time.
#[derive(Debug, Clone, Default)]
pub struct ActivityTracker {
    last_active: BTreeMap<BufferId, DateTime<Local>>,
}

impl ActivityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or refreshes the entry.
    pub fn on_activate(&mut self, buffer: BufferId, now: DateTime<Local>) {
        self.last_active.insert(buffer, now);
    }

    /// Refreshes the entry; modifications alone never start tracking.
    pub fn on_modify(&mut self, buffer: BufferId, now: DateTime<Local>) -> bool {
        match self.last_active.get_mut(&buffer) {
            Some(at) => {
                *at = now;
                true
            }
            None => false,
        }
    }

    pub fn on_close(&mut self, buffer: BufferId) {
        self.last_active.remove(&buffer);
    }

    pub fn forget(&mut self, buffer: BufferId) {
        self.on_close(buffer);
    }

    pub fn contains(&self, buffer: BufferId) -> bool {
        self.last_active.contains_key(&buffer)
    }

    pub fn last_active(&self, buffer: BufferId) -> Option<DateTime<Local>> {
        self.last_active.get(&buffer).copied()
    }

    pub fn idle_for(&self, buffer: BufferId, now: DateTime<Local>) -> Option<Duration> {
        self.last_active(buffer).map(|at| now - at)
    }

    pub fn is_idle(&self, buffer: BufferId, now: DateTime<Local>, timeout: Duration) -> bool {
        self.idle_for(buffer, now).is_some_and(|idle| idle > timeout)
    }

    /// Drops entries whose buffers are no longer open anywhere.
    pub fn retain_live(&mut self, live: &BTreeSet<BufferId>) -> usize {
        let before = self.last_active.len();
        self.last_active.retain(|id, _| live.contains(id));
        before.saturating_sub(self.last_active.len())
    }

    pub fn len(&self) -> usize {
        self.last_active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_active.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2024, 6, 3, 12, 0, 0)
            .single()
            .expect("unambiguous local time")
            + Duration::seconds(secs)
    }

    #[test]
    fn idle_boundary_is_strict() {
        let mut tracker = ActivityTracker::new();
        let id = BufferId(7);
        let timeout = Duration::seconds(7200);
        tracker.on_activate(id, at(0));

        assert!(!tracker.is_idle(id, at(7199), timeout));
        assert!(!tracker.is_idle(id, at(7200), timeout));
        assert!(tracker.is_idle(id, at(7201), timeout));
    }

    #[test]
    fn modify_refreshes_but_never_inserts() {
        let mut tracker = ActivityTracker::new();
        let id = BufferId(1);
        assert!(!tracker.on_modify(id, at(0)));
        assert!(tracker.is_empty());

        tracker.on_activate(id, at(0));
        assert!(tracker.on_modify(id, at(100)));
        assert_eq!(tracker.idle_for(id, at(150)), Some(Duration::seconds(50)));
    }

    #[test]
    fn close_and_retain_drop_entries() {
        let mut tracker = ActivityTracker::new();
        tracker.on_activate(BufferId(1), at(0));
        tracker.on_activate(BufferId(2), at(0));
        tracker.on_activate(BufferId(3), at(0));

        tracker.on_close(BufferId(1));
        tracker.on_close(BufferId(99));
        assert_eq!(tracker.len(), 2);

        let live = BTreeSet::from([BufferId(3)]);
        assert_eq!(tracker.retain_live(&live), 1);
        assert!(tracker.contains(BufferId(3)));
        assert!(!tracker.contains(BufferId(2)));
    }
}
