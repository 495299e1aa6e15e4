//! Client Counter Mirror.
//!
//! Local view/like counts for one work, seeded from a server snapshot and
//! replaced wholesale by every realtime update for that work. A like toggle
//! moves the count optimistically by one; the next update overwrites it.
//!
//! Only one toggle may be in flight at a time. A second toggle while the
//! first is pending is rejected, so a double click cannot issue two
//! recorder calls that race each other. [`CounterMirror::toggle`] wraps the
//! pending toggle in a guard that reverts it if the caller never settles it.

use serde::{Deserialize, Serialize};

use crate::interaction::{LikeState, WorkCounters};
use crate::types::DbId;

/// The `new` row of a realtime work update. Fields other than the counters
/// are ignored; missing counters leave the mirrored value untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterUpdate {
    pub id: DbId,
    #[serde(default)]
    pub view_count: Option<i64>,
    #[serde(default)]
    pub like_count: Option<i64>,
}

impl From<WorkCounters> for CounterUpdate {
    fn from(c: WorkCounters) -> Self {
        Self {
            id: c.work_id,
            view_count: Some(c.view_count),
            like_count: Some(c.like_count),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MirrorError {
    #[error("a like toggle is already in progress")]
    ToggleInFlight,

    #[error("like state has not been loaded yet")]
    LikeStateUnknown,

    #[error("no like toggle is in progress")]
    NoPendingToggle,
}

/// What the caller must ask the recorder for after [`CounterMirror::begin_toggle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleIntent {
    Like,
    Unlike,
}

#[derive(Debug, Clone, Copy)]
struct PendingToggle {
    previous_state: LikeState,
    previous_likes: i64,
}

#[derive(Debug, Clone)]
pub struct CounterMirror {
    work_id: DbId,
    view_count: i64,
    like_count: i64,
    like_state: LikeState,
    pending: Option<PendingToggle>,
}

impl CounterMirror {
    pub fn from_snapshot(snapshot: WorkCounters) -> Self {
        Self {
            work_id: snapshot.work_id,
            view_count: snapshot.view_count,
            like_count: snapshot.like_count,
            like_state: LikeState::Unknown,
            pending: None,
        }
    }

    pub fn work_id(&self) -> DbId {
        self.work_id
    }

    pub fn view_count(&self) -> i64 {
        self.view_count
    }

    pub fn like_count(&self) -> i64 {
        self.like_count
    }

    pub fn like_state(&self) -> LikeState {
        self.like_state
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Resolve `Unknown` from the interaction lookup. Ignored once the state
    /// is known or while a toggle is pending.
    pub fn resolve_like_state(&mut self, liked: bool) {
        if self.like_state == LikeState::Unknown && self.pending.is_none() {
            self.like_state = LikeState::from_row_present(liked);
        }
    }

    /// Replace local counts with a realtime update. Returns `false` if the
    /// update is for another work.
    pub fn apply_update(&mut self, update: &CounterUpdate) -> bool {
        if update.id != self.work_id {
            return false;
        }
        if let Some(v) = update.view_count {
            self.view_count = v;
        }
        if let Some(l) = update.like_count {
            self.like_count = l;
        }
        true
    }

    /// Start a toggle: flip the like state and move the count by one.
    pub fn begin_toggle(&mut self) -> Result<ToggleIntent, MirrorError> {
        if self.pending.is_some() {
            return Err(MirrorError::ToggleInFlight);
        }
        let intent = match self.like_state {
            LikeState::Unknown => return Err(MirrorError::LikeStateUnknown),
            LikeState::Liked => ToggleIntent::Unlike,
            LikeState::NotLiked => ToggleIntent::Like,
        };

        self.pending = Some(PendingToggle {
            previous_state: self.like_state,
            previous_likes: self.like_count,
        });
        match intent {
            ToggleIntent::Like => {
                self.like_state = LikeState::Liked;
                self.like_count += 1;
            }
            ToggleIntent::Unlike => {
                self.like_state = LikeState::NotLiked;
                self.like_count = (self.like_count - 1).max(0);
            }
        }
        Ok(intent)
    }

    /// The recorder accepted the toggle. `liked` is the row state the server
    /// reported; counts from the response replace the optimistic value.
    pub fn complete_toggle(
        &mut self,
        liked: bool,
        counters: Option<WorkCounters>,
    ) -> Result<(), MirrorError> {
        self.pending.take().ok_or(MirrorError::NoPendingToggle)?;
        self.like_state = LikeState::from_row_present(liked);
        if let Some(c) = counters {
            self.apply_update(&c.into());
        }
        Ok(())
    }

    /// The recorder call failed: restore the state from before the toggle.
    pub fn fail_toggle(&mut self) -> Result<(), MirrorError> {
        let pending = self.pending.take().ok_or(MirrorError::NoPendingToggle)?;
        self.like_state = pending.previous_state;
        self.like_count = pending.previous_likes;
        Ok(())
    }
}

/// A toggle started by [`CounterMirror::toggle`]. Dropping the guard before
/// [`complete`](Self::complete) or [`fail`](Self::fail) reverts the toggle,
/// so a cancelled recorder call cannot leave the mirror locked.
#[must_use = "dropping the guard reverts the toggle"]
pub struct ToggleGuard<'a> {
    mirror: &'a mut CounterMirror,
    intent: ToggleIntent,
    settled: bool,
}

impl CounterMirror {
    /// [`begin_toggle`](Self::begin_toggle) tied to a guard.
    pub fn toggle(&mut self) -> Result<ToggleGuard<'_>, MirrorError> {
        let intent = self.begin_toggle()?;
        Ok(ToggleGuard {
            mirror: self,
            intent,
            settled: false,
        })
    }
}

impl ToggleGuard<'_> {
    pub fn intent(&self) -> ToggleIntent {
        self.intent
    }

    pub fn complete(
        mut self,
        liked: bool,
        counters: Option<WorkCounters>,
    ) -> Result<(), MirrorError> {
        self.settled = true;
        self.mirror.complete_toggle(liked, counters)
    }

    pub fn fail(mut self) -> Result<(), MirrorError> {
        self.settled = true;
        self.mirror.fail_toggle()
    }
}

impl Drop for ToggleGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            let _ = self.mirror.fail_toggle();
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn mirror(likes: i64) -> CounterMirror {
        let mut m = CounterMirror::from_snapshot(WorkCounters {
            work_id: 5,
            view_count: 10,
            like_count: likes,
        });
        m.resolve_like_state(false);
        m
    }

    #[test]
    fn starts_unknown_and_refuses_toggle() {
        let mut m = CounterMirror::from_snapshot(WorkCounters {
            work_id: 1,
            ..Default::default()
        });
        assert_eq!(m.like_state(), LikeState::Unknown);
        assert_matches!(m.begin_toggle(), Err(MirrorError::LikeStateUnknown));
    }

    #[test]
    fn optimistic_like_then_broadcast_overwrites() {
        let mut m = mirror(3);
        assert_eq!(m.begin_toggle().unwrap(), ToggleIntent::Like);
        assert_eq!(m.like_count(), 4);

        // Another user liked at the same time; the server value wins.
        let applied = m.apply_update(&CounterUpdate {
            id: 5,
            view_count: Some(11),
            like_count: Some(5),
        });
        assert!(applied);
        assert_eq!(m.like_count(), 5);
        assert_eq!(m.view_count(), 11);
    }

    #[test]
    fn second_toggle_rejected_while_pending() {
        let mut m = mirror(0);
        m.begin_toggle().unwrap();
        assert_matches!(m.begin_toggle(), Err(MirrorError::ToggleInFlight));
        assert_eq!(m.like_count(), 1);

        m.complete_toggle(true, None).unwrap();
        assert_eq!(m.begin_toggle().unwrap(), ToggleIntent::Unlike);
        assert_eq!(m.like_count(), 0);
    }

    #[test]
    fn failed_toggle_reverts() {
        let mut m = mirror(2);
        m.begin_toggle().unwrap();
        m.fail_toggle().unwrap();
        assert_eq!(m.like_count(), 2);
        assert_eq!(m.like_state(), LikeState::NotLiked);
        assert!(!m.is_pending());
    }

    #[test]
    fn dropped_guard_reverts_and_unlocks() {
        let mut m = mirror(2);
        {
            let guard = m.toggle().unwrap();
            assert_eq!(guard.intent(), ToggleIntent::Like);
        }

        assert!(!m.is_pending());
        assert_eq!(m.like_count(), 2);
        assert_eq!(m.like_state(), LikeState::NotLiked);
        assert_eq!(m.begin_toggle().unwrap(), ToggleIntent::Like);
    }

    #[test]
    fn completed_guard_keeps_server_counts() {
        let mut m = mirror(2);
        let guard = m.toggle().unwrap();
        guard
            .complete(
                true,
                Some(WorkCounters {
                    work_id: 5,
                    view_count: 10,
                    like_count: 7,
                }),
            )
            .unwrap();

        assert!(!m.is_pending());
        assert_eq!(m.like_count(), 7);
        assert_eq!(m.like_state(), LikeState::Liked);
    }

    #[test]
    fn update_for_other_work_ignored() {
        let mut m = mirror(2);
        let applied = m.apply_update(&CounterUpdate {
            id: 99,
            view_count: Some(0),
            like_count: Some(0),
        });
        assert!(!applied);
        assert_eq!(m.like_count(), 2);
    }

    #[test]
    fn partial_update_keeps_missing_fields() {
        let mut m = mirror(2);
        m.apply_update(&CounterUpdate {
            id: 5,
            view_count: Some(20),
            like_count: None,
        });
        assert_eq!(m.view_count(), 20);
        assert_eq!(m.like_count(), 2);
    }

    #[test]
    fn complete_uses_server_counts() {
        let mut m = mirror(2);
        m.begin_toggle().unwrap();
        m.complete_toggle(
            true,
            Some(WorkCounters {
                work_id: 5,
                view_count: 10,
                like_count: 7,
            }),
        )
        .unwrap();
        assert_eq!(m.like_count(), 7);
        assert_eq!(m.like_state(), LikeState::Liked);
    }

    #[test]
    fn update_payload_ignores_other_columns() {
        let json = r#"{"id":5,"title":"x","view_count":3,"like_count":1,"genre":"시"}"#;
        let update: CounterUpdate = serde_json::from_str(json).unwrap();
        assert_eq!(update.like_count, Some(1));
        assert_eq!(update.view_count, Some(3));
    }
}
