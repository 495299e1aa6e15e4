//! Interaction Recorder: one row per (work, user, kind) plus the matching
//! counter adjustment.
//!
//! The row write and the counter procedure are two separate store calls.
//! Nothing makes them atomic: if the counter call fails after the row was
//! written, the counter stays off by one until it is reconciled from the
//! interaction rows. The recorder only adjusts a counter when the row write
//! actually changed something, so repeated requests cannot drift the count.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Kinds and counters
// ---------------------------------------------------------------------------

/// Interaction type stored in `interactions.interaction_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    View,
    Like,
}

impl InteractionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            InteractionKind::View => "view",
            InteractionKind::Like => "like",
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "view" => Ok(InteractionKind::View),
            "like" => Ok(InteractionKind::Like),
            other => Err(CoreError::Validation(format!(
                "Invalid interaction type '{other}'. Must be one of: view, like"
            ))),
        }
    }
}

/// Direction of a counter adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterDelta {
    Increment,
    Decrement,
}

impl CounterDelta {
    pub fn as_i64(self) -> i64 {
        match self {
            CounterDelta::Increment => 1,
            CounterDelta::Decrement => -1,
        }
    }
}

/// Counter columns of a single work, as broadcast to realtime subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WorkCounters {
    pub work_id: DbId,
    pub view_count: i64,
    pub like_count: i64,
}

/// Whether a user currently likes a work.
///
/// `Unknown` is the client-side starting point before the interaction
/// lookup has answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LikeState {
    #[default]
    Unknown,
    Liked,
    NotLiked,
}

impl LikeState {
    pub fn from_row_present(present: bool) -> Self {
        if present {
            LikeState::Liked
        } else {
            LikeState::NotLiked
        }
    }
}

// ---------------------------------------------------------------------------
// Store seam
// ---------------------------------------------------------------------------

/// Persistence used by the recorder. The PostgreSQL implementation lives in
/// `booksummary-db`; tests use an in-memory store.
#[async_trait]
pub trait InteractionStore: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Current counters for a work, or `None` if the work does not exist.
    async fn counters(&self, work_id: DbId) -> Result<Option<WorkCounters>, Self::Error>;

    /// Whether an interaction row exists.
    async fn exists(
        &self,
        work_id: DbId,
        user_id: DbId,
        kind: InteractionKind,
    ) -> Result<bool, Self::Error>;

    /// Insert an interaction row. Returns `false` if it already existed.
    async fn insert(
        &self,
        work_id: DbId,
        user_id: DbId,
        kind: InteractionKind,
    ) -> Result<bool, Self::Error>;

    /// Delete an interaction row. Returns `false` if there was none.
    async fn delete(
        &self,
        work_id: DbId,
        user_id: DbId,
        kind: InteractionKind,
    ) -> Result<bool, Self::Error>;

    /// Run the increment/decrement procedure for `kind` and return the
    /// counters as they are after the call.
    async fn adjust_counter(
        &self,
        work_id: DbId,
        kind: InteractionKind,
        delta: CounterDelta,
    ) -> Result<WorkCounters, Self::Error>;
}

/// Failure modes of the recorder.
#[derive(Debug, thiserror::Error)]
pub enum RecordError<E: std::error::Error + 'static> {
    /// The caller is not signed in and must go through the login flow.
    #[error("login required")]
    LoginRequired,

    #[error("work {0} not found")]
    WorkNotFound(DbId),

    #[error(transparent)]
    Store(E),
}

/// Result of a record/remove call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecordOutcome {
    /// Whether a row was inserted or deleted by this call.
    pub changed: bool,
    /// Whether the interaction row exists after the call.
    pub active: bool,
    pub counters: WorkCounters,
}

// ---------------------------------------------------------------------------
// Recorder
// ---------------------------------------------------------------------------

pub struct InteractionRecorder<S> {
    store: S,
}

impl<S: InteractionStore> InteractionRecorder<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Like state for the caller. Anonymous callers never like anything.
    pub async fn like_state(
        &self,
        work_id: DbId,
        user_id: Option<DbId>,
    ) -> Result<LikeState, RecordError<S::Error>> {
        let Some(user_id) = user_id else {
            return Ok(LikeState::NotLiked);
        };
        let present = self
            .store
            .exists(work_id, user_id, InteractionKind::Like)
            .await
            .map_err(RecordError::Store)?;
        Ok(LikeState::from_row_present(present))
    }

    /// Record an interaction. A row that already exists is left alone and
    /// the counter is not touched.
    pub async fn record(
        &self,
        work_id: DbId,
        user_id: Option<DbId>,
        kind: InteractionKind,
    ) -> Result<RecordOutcome, RecordError<S::Error>> {
        let user_id = user_id.ok_or(RecordError::LoginRequired)?;
        let current = self.require_work(work_id).await?;

        let inserted = self
            .store
            .insert(work_id, user_id, kind)
            .await
            .map_err(RecordError::Store)?;

        let counters = if inserted {
            self.store
                .adjust_counter(work_id, kind, CounterDelta::Increment)
                .await
                .map_err(RecordError::Store)?
        } else {
            current
        };

        Ok(RecordOutcome {
            changed: inserted,
            active: true,
            counters,
        })
    }

    /// Remove an interaction. Removing a row that does not exist is a no-op.
    pub async fn remove(
        &self,
        work_id: DbId,
        user_id: Option<DbId>,
        kind: InteractionKind,
    ) -> Result<RecordOutcome, RecordError<S::Error>> {
        let user_id = user_id.ok_or(RecordError::LoginRequired)?;
        let current = self.require_work(work_id).await?;

        let deleted = self
            .store
            .delete(work_id, user_id, kind)
            .await
            .map_err(RecordError::Store)?;

        let counters = if deleted {
            self.store
                .adjust_counter(work_id, kind, CounterDelta::Decrement)
                .await
                .map_err(RecordError::Store)?
        } else {
            current
        };

        Ok(RecordOutcome {
            changed: deleted,
            active: false,
            counters,
        })
    }

    /// Flip the caller's like based on the stored row, not on anything the
    /// client believes.
    pub async fn toggle_like(
        &self,
        work_id: DbId,
        user_id: Option<DbId>,
    ) -> Result<RecordOutcome, RecordError<S::Error>> {
        let uid = user_id.ok_or(RecordError::LoginRequired)?;
        let liked = self
            .store
            .exists(work_id, uid, InteractionKind::Like)
            .await
            .map_err(RecordError::Store)?;
        if liked {
            self.remove(work_id, user_id, InteractionKind::Like).await
        } else {
            self.record(work_id, user_id, InteractionKind::Like).await
        }
    }

    async fn require_work(&self, work_id: DbId) -> Result<WorkCounters, RecordError<S::Error>> {
        self.store
            .counters(work_id)
            .await
            .map_err(RecordError::Store)?
            .ok_or(RecordError::WorkNotFound(work_id))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    use assert_matches::assert_matches;

    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("memory store failure")]
    struct MemoryError;

    #[derive(Default)]
    struct MemoryStore {
        rows: Mutex<HashSet<(DbId, DbId, InteractionKind)>>,
        works: Mutex<HashMap<DbId, WorkCounters>>,
        fail_counter: bool,
    }

    impl MemoryStore {
        fn with_work(work_id: DbId) -> Self {
            let store = Self::default();
            store.works.lock().unwrap().insert(
                work_id,
                WorkCounters {
                    work_id,
                    ..Default::default()
                },
            );
            store
        }

        fn like_rows(&self, work_id: DbId) -> i64 {
            self.rows
                .lock()
                .unwrap()
                .iter()
                .filter(|(w, _, k)| *w == work_id && *k == InteractionKind::Like)
                .count() as i64
        }
    }

    #[async_trait]
    impl InteractionStore for MemoryStore {
        type Error = MemoryError;

        async fn counters(&self, work_id: DbId) -> Result<Option<WorkCounters>, MemoryError> {
            Ok(self.works.lock().unwrap().get(&work_id).copied())
        }

        async fn exists(
            &self,
            work_id: DbId,
            user_id: DbId,
            kind: InteractionKind,
        ) -> Result<bool, MemoryError> {
            Ok(self.rows.lock().unwrap().contains(&(work_id, user_id, kind)))
        }

        async fn insert(
            &self,
            work_id: DbId,
            user_id: DbId,
            kind: InteractionKind,
        ) -> Result<bool, MemoryError> {
            Ok(self.rows.lock().unwrap().insert((work_id, user_id, kind)))
        }

        async fn delete(
            &self,
            work_id: DbId,
            user_id: DbId,
            kind: InteractionKind,
        ) -> Result<bool, MemoryError> {
            Ok(self.rows.lock().unwrap().remove(&(work_id, user_id, kind)))
        }

        async fn adjust_counter(
            &self,
            work_id: DbId,
            kind: InteractionKind,
            delta: CounterDelta,
        ) -> Result<WorkCounters, MemoryError> {
            if self.fail_counter {
                return Err(MemoryError);
            }
            let mut works = self.works.lock().unwrap();
            let c = works.get_mut(&work_id).ok_or(MemoryError)?;
            match kind {
                InteractionKind::View => c.view_count = (c.view_count + delta.as_i64()).max(0),
                InteractionKind::Like => c.like_count = (c.like_count + delta.as_i64()).max(0),
            }
            Ok(*c)
        }
    }

    #[tokio::test]
    async fn like_count_matches_rows_after_distinct_users() {
        let recorder = InteractionRecorder::new(MemoryStore::with_work(1));

        for user in 1..=5 {
            recorder.toggle_like(1, Some(user)).await.unwrap();
        }
        // Users 2 and 4 change their minds.
        recorder.toggle_like(1, Some(2)).await.unwrap();
        let last = recorder.toggle_like(1, Some(4)).await.unwrap();

        assert_eq!(last.counters.like_count, 3);
        assert_eq!(recorder.store().like_rows(1), 3);
    }

    #[tokio::test]
    async fn double_toggle_restores_count() {
        let recorder = InteractionRecorder::new(MemoryStore::with_work(7));
        recorder.toggle_like(7, Some(100)).await.unwrap();

        let first = recorder.toggle_like(7, Some(1)).await.unwrap();
        assert!(first.active);
        assert_eq!(first.counters.like_count, 2);

        let second = recorder.toggle_like(7, Some(1)).await.unwrap();
        assert!(!second.active);
        assert_eq!(second.counters.like_count, 1);
    }

    #[tokio::test]
    async fn duplicate_record_does_not_double_count() {
        let recorder = InteractionRecorder::new(MemoryStore::with_work(3));

        let a = recorder.record(3, Some(9), InteractionKind::Like).await.unwrap();
        let b = recorder.record(3, Some(9), InteractionKind::Like).await.unwrap();

        assert!(a.changed);
        assert!(!b.changed);
        assert_eq!(b.counters.like_count, 1);
    }

    #[tokio::test]
    async fn removing_missing_row_is_noop() {
        let recorder = InteractionRecorder::new(MemoryStore::with_work(3));
        let out = recorder.remove(3, Some(9), InteractionKind::Like).await.unwrap();
        assert!(!out.changed);
        assert_eq!(out.counters.like_count, 0);
    }

    #[tokio::test]
    async fn views_are_counted_once_per_user() {
        let recorder = InteractionRecorder::new(MemoryStore::with_work(2));
        recorder.record(2, Some(1), InteractionKind::View).await.unwrap();
        recorder.record(2, Some(1), InteractionKind::View).await.unwrap();
        let out = recorder.record(2, Some(2), InteractionKind::View).await.unwrap();
        assert_eq!(out.counters.view_count, 2);
        assert_eq!(out.counters.like_count, 0);
    }

    #[tokio::test]
    async fn anonymous_caller_must_log_in() {
        let recorder = InteractionRecorder::new(MemoryStore::with_work(1));
        assert_matches!(
            recorder.toggle_like(1, None).await,
            Err(RecordError::LoginRequired)
        );
        assert_matches!(
            recorder.record(1, None, InteractionKind::View).await,
            Err(RecordError::LoginRequired)
        );
        assert_eq!(recorder.like_state(1, None).await.unwrap(), LikeState::NotLiked);
    }

    #[tokio::test]
    async fn unknown_work_is_reported() {
        let recorder = InteractionRecorder::new(MemoryStore::default());
        assert_matches!(
            recorder.record(42, Some(1), InteractionKind::Like).await,
            Err(RecordError::WorkNotFound(42))
        );
    }

    #[tokio::test]
    async fn counter_failure_leaves_row_written() {
        let mut store = MemoryStore::with_work(1);
        store.fail_counter = true;
        let recorder = InteractionRecorder::new(store);

        let result = recorder.record(1, Some(1), InteractionKind::Like).await;

        assert_matches!(result, Err(RecordError::Store(_)));
        assert_eq!(recorder.store().like_rows(1), 1);
        assert_eq!(
            recorder.like_state(1, Some(1)).await.unwrap(),
            LikeState::Liked
        );
    }

    #[test]
    fn kind_parses_known_values() {
        assert_eq!(InteractionKind::parse("like").unwrap(), InteractionKind::Like);
        assert_eq!(InteractionKind::View.as_str(), "view");
        assert!(InteractionKind::parse("dislike").is_err());
    }
}
