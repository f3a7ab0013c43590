//! Published tag status.
//!
//! # States
//! - Unknown: no probe has completed yet
//! - Tagged: the last probe got a 2xx
//! - NotTagged: the last probe got anything else, or no response
//!
//! # State Transitions
//! ```text
//! Unknown → Tagged | NotTagged   (first probe)
//! Tagged ←→ NotTagged            (every later probe, per outcome)
//! ```
//!
//! Readers always see a whole [`StatusSnapshot`]: the writer builds a new
//! snapshot and swaps the pointer, it never edits one in place.

use std::sync::Arc;
use std::time::SystemTime;

use arc_swap::ArcSwap;

use crate::probe::ProbeOutcome;

/// Outcome of the most recent probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TagState {
    #[default]
    Unknown,
    Tagged,
    NotTagged,
}

impl TagState {
    /// `Unknown` reads as not tagged.
    pub fn is_tagged(self) -> bool {
        self == TagState::Tagged
    }
}

impl From<bool> for TagState {
    fn from(tagged: bool) -> Self {
        if tagged {
            TagState::Tagged
        } else {
            TagState::NotTagged
        }
    }
}

/// Immutable view of the status at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusSnapshot {
    pub state: TagState,
    /// Number of probes published so far.
    pub probes: u64,
    /// When the last probe was published.
    pub checked_at: Option<SystemTime>,
    /// When `state` last changed.
    pub changed_at: Option<SystemTime>,
    /// Why the last probe was not tagged, if the prober said.
    pub last_error: Option<String>,
}

impl StatusSnapshot {
    pub fn is_tagged(&self) -> bool {
        self.state.is_tagged()
    }
}

/// The single shared status cell. Written only by the watcher loop.
#[derive(Debug)]
pub struct StatusCell {
    current: ArcSwap<StatusSnapshot>,
}

impl StatusCell {
    pub fn new() -> Self {
        Self {
            current: ArcSwap::from_pointee(StatusSnapshot::default()),
        }
    }

    /// Current snapshot. Lock-free; never waits on the writer.
    pub fn load(&self) -> Arc<StatusSnapshot> {
        self.current.load_full()
    }

    /// Replace the snapshot with the outcome of a probe.
    ///
    /// Returns the previous state when the state changed. Only one task may
    /// publish to a cell.
    pub(crate) fn publish(&self, outcome: ProbeOutcome) -> Option<TagState> {
        let previous = self.current.load();
        let state = TagState::from(outcome.tagged);
        let now = SystemTime::now();
        let changed = previous.state != state;

        let next = StatusSnapshot {
            state,
            probes: previous.probes + 1,
            checked_at: Some(now),
            changed_at: if changed { Some(now) } else { previous.changed_at },
            last_error: outcome.error,
        };
        let previous_state = previous.state;
        self.current.store(Arc::new(next));

        changed.then_some(previous_state)
    }
}

impl Default for StatusCell {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only handle to a watcher's status, cheap to clone.
#[derive(Debug, Clone)]
pub struct StatusReader {
    cell: Arc<StatusCell>,
}

impl StatusReader {
    pub(crate) fn new(cell: Arc<StatusCell>) -> Self {
        Self { cell }
    }

    pub fn snapshot(&self) -> Arc<StatusSnapshot> {
        self.cell.load()
    }

    pub fn is_tagged(&self) -> bool {
        self.cell.load().is_tagged()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_reads_as_not_tagged() {
        let cell = StatusCell::new();
        let snapshot = cell.load();
        assert_eq!(snapshot.state, TagState::Unknown);
        assert!(!snapshot.is_tagged());
        assert_eq!(snapshot.probes, 0);
        assert!(snapshot.checked_at.is_none());
    }

    #[test]
    fn test_publish_transitions() {
        let cell = StatusCell::new();

        assert_eq!(cell.publish(false.into()), Some(TagState::Unknown));
        let first = cell.load();
        assert_eq!(first.state, TagState::NotTagged);
        assert_eq!(first.changed_at, first.checked_at);

        // Same outcome: no transition, change time kept.
        assert_eq!(cell.publish(false.into()), None);
        let second = cell.load();
        assert_eq!(second.probes, 2);
        assert_eq!(second.changed_at, first.changed_at);

        assert_eq!(cell.publish(true.into()), Some(TagState::NotTagged));
        assert!(cell.load().is_tagged());
        assert_eq!(cell.load().probes, 3);
    }

    #[test]
    fn test_last_error_tracks_latest_outcome() {
        let cell = StatusCell::new();

        cell.publish(ProbeOutcome::failed("timed out after 5s"));
        assert_eq!(cell.load().last_error.as_deref(), Some("timed out after 5s"));

        cell.publish(ProbeOutcome::failed("status 404 Not Found"));
        assert_eq!(cell.load().last_error.as_deref(), Some("status 404 Not Found"));

        cell.publish(ProbeOutcome::tagged());
        assert!(cell.load().is_tagged());
        assert!(cell.load().last_error.is_none());
    }

    #[test]
    fn test_old_snapshot_is_untouched_by_publish() {
        let cell = StatusCell::new();
        cell.publish(true.into());
        let held = cell.load();

        cell.publish(false.into());

        assert!(held.is_tagged());
        assert_eq!(held.probes, 1);
        assert!(!cell.load().is_tagged());
    }

    #[test]
    fn test_reader_follows_cell() {
        let cell = Arc::new(StatusCell::new());
        let reader = StatusReader::new(cell.clone());
        assert!(!reader.is_tagged());

        cell.publish(true.into());
        assert!(reader.is_tagged());
        assert_eq!(reader.snapshot().probes, 1);
    }
}
