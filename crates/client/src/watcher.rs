//! Live counters for one work.
//!
//! [`WorkWatcher::open`] seeds a [`CounterMirror`] from the like-status
//! snapshot and subscribes to the work's topic. Every event for the work
//! replaces the mirrored counts; [`WorkWatcher::toggle_like`] moves the like
//! count optimistically and settles it from the server response.

use booksummary_core::counter::{CounterMirror, CounterUpdate, ToggleIntent};
use booksummary_core::types::DbId;
use booksummary_events::{RealtimeEvent, Topic};

use crate::api::BookSummaryApi;
use crate::error::ClientError;
use crate::realtime::{RealtimeClient, RealtimeConnection};

pub struct WorkWatcher {
    api: BookSummaryApi,
    connection: RealtimeConnection,
    mirror: CounterMirror,
}

impl WorkWatcher {
    pub async fn open(api: BookSummaryApi, work_id: DbId) -> Result<Self, ClientError> {
        let status = api.like_status(work_id).await?;
        let mut mirror = CounterMirror::from_snapshot(status.counters());
        mirror.resolve_like_state(status.liked);

        let mut connection = RealtimeClient::new(api.ws_url()).connect().await?;
        connection.subscribe(Topic::Work(work_id)).await?;
        tracing::info!(work_id, "Watching work counters");

        Ok(Self {
            api,
            connection,
            mirror,
        })
    }

    pub fn mirror(&self) -> &CounterMirror {
        &self.mirror
    }

    /// Wait for the next update to this work and apply it. `Ok(false)` once
    /// the connection is closed.
    pub async fn next_update(&mut self) -> Result<bool, ClientError> {
        while let Some(event) = self.connection.next_event().await? {
            if apply_event(&mut self.mirror, &event) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Like or unlike depending on the current state. A second call while
    /// the first is still in flight fails with
    /// [`MirrorError::ToggleInFlight`](booksummary_core::counter::MirrorError::ToggleInFlight).
    /// Dropping the future before it finishes reverts the optimistic count.
    pub async fn toggle_like(&mut self) -> Result<(), ClientError> {
        toggle_with(&mut self.mirror, &self.api).await
    }

    /// Unsubscribe and close the connection.
    pub async fn close(mut self) -> Result<(), ClientError> {
        self.connection
            .unsubscribe(Topic::Work(self.mirror.work_id()))
            .await?;
        self.connection.close().await
    }
}

async fn toggle_with(mirror: &mut CounterMirror, api: &BookSummaryApi) -> Result<(), ClientError> {
    let work_id = mirror.work_id();
    let toggle = mirror.toggle()?;

    let result = match toggle.intent() {
        ToggleIntent::Like => api.like(work_id).await,
        ToggleIntent::Unlike => api.unlike(work_id).await,
    };

    match result {
        Ok(status) => {
            toggle.complete(status.liked, Some(status.counters()))?;
            Ok(())
        }
        Err(e) => {
            tracing::warn!(error = %e, work_id, "Like toggle failed, reverting");
            toggle.fail()?;
            Err(e)
        }
    }
}

/// Apply a realtime event to `mirror` if it is an update for the mirrored
/// work. Returns whether anything was applied.
pub fn apply_event(mirror: &mut CounterMirror, event: &RealtimeEvent) -> bool {
    if event.parsed_topic() != Some(Topic::Work(mirror.work_id())) {
        return false;
    }
    match serde_json::from_value::<CounterUpdate>(event.new.clone()) {
        Ok(update) => mirror.apply_update(&update),
        Err(e) => {
            tracing::debug!(error = %e, topic = %event.topic, "Event row has no counters");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use booksummary_core::interaction::{LikeState, WorkCounters};

    use super::*;

    fn mirror() -> CounterMirror {
        let mut m = CounterMirror::from_snapshot(WorkCounters {
            work_id: 5,
            view_count: 10,
            like_count: 2,
        });
        m.resolve_like_state(true);
        m
    }

    #[test]
    fn counter_event_replaces_counts() {
        let mut m = mirror();
        let event = RealtimeEvent::work_counters(&WorkCounters {
            work_id: 5,
            view_count: 11,
            like_count: 9,
        });

        assert!(apply_event(&mut m, &event));
        assert_eq!(m.like_count(), 9);
        assert_eq!(m.view_count(), 11);
        assert_eq!(m.like_state(), LikeState::Liked);
    }

    #[test]
    fn full_row_event_applies_counters() {
        let mut m = mirror();
        let event = RealtimeEvent::update(
            Topic::Work(5),
            serde_json::json!({
                "id": 5,
                "title": "달빛 서점",
                "view_count": 30,
                "like_count": 4,
            }),
        );

        assert!(apply_event(&mut m, &event));
        assert_eq!(m.view_count(), 30);
    }

    #[test]
    fn other_topics_ignored() {
        let mut m = mirror();
        let other_work = RealtimeEvent::work_counters(&WorkCounters {
            work_id: 6,
            view_count: 0,
            like_count: 0,
        });
        let feed = RealtimeEvent::works_feed(&WorkCounters {
            work_id: 5,
            view_count: 0,
            like_count: 0,
        });

        assert!(!apply_event(&mut m, &other_work));
        assert!(!apply_event(&mut m, &feed));
        assert_eq!(m.like_count(), 2);
    }

    #[tokio::test]
    async fn cancelled_toggle_reverts_and_unlocks() {
        // Accepts connections but never answers, so the like request hangs.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((stream, _)) = listener.accept().await {
                held.push(stream);
            }
        });
        let api = BookSummaryApi::new(format!("http://{addr}"));
        let mut m = mirror();

        let outcome =
            tokio::time::timeout(Duration::from_millis(200), toggle_with(&mut m, &api)).await;

        assert!(outcome.is_err());
        assert!(!m.is_pending());
        assert_eq!(m.like_count(), 2);
        assert_eq!(m.like_state(), LikeState::Liked);
        assert_eq!(m.begin_toggle().unwrap(), ToggleIntent::Unlike);
    }

    #[test]
    fn row_without_id_ignored() {
        let mut m = mirror();
        let event = RealtimeEvent::update(Topic::Work(5), serde_json::json!({ "like_count": 1 }));

        assert!(!apply_event(&mut m, &event));
        assert_eq!(m.like_count(), 2);
    }
}
