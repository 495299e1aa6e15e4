//! Bridge from the event bus to WebSocket topics.
//!
//! Handlers call [`publish_counters`] / [`publish_work_row`] after a write.
//! Only public works reach the topics. [`RealtimeFanout`] consumes the bus and delivers each event to the
//! connections subscribed to its topic.

use std::sync::Arc;

use axum::extract::ws::Message;
use booksummary_core::interaction::WorkCounters;
use booksummary_core::types::DbId;
use booksummary_db::models::work::Work;
use booksummary_db::repositories::LibraryRepo;
use booksummary_events::{RealtimeEvent, ServerMessage, Topic};
use tokio::sync::broadcast;

use crate::state::AppState;
use crate::ws::WsManager;

/// Routes bus events to WebSocket subscribers.
pub struct RealtimeFanout {
    ws_manager: Arc<WsManager>,
}

impl RealtimeFanout {
    pub fn new(ws_manager: Arc<WsManager>) -> Self {
        Self { ws_manager }
    }

    /// Run until the bus is dropped.
    pub async fn run(self, mut receiver: broadcast::Receiver<RealtimeEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => self.deliver(event).await,
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Realtime fan-out lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, realtime fan-out shutting down");
                    break;
                }
            }
        }
    }

    async fn deliver(&self, event: RealtimeEvent) {
        let topic = event.topic.clone();
        let json = match serde_json::to_string(&ServerMessage::Event(event)) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(error = %e, topic = %topic, "Failed to serialize realtime event");
                return;
            }
        };
        let delivered = self
            .ws_manager
            .send_to_topic(&topic, Message::Text(json.into()))
            .await;
        tracing::trace!(topic = %topic, delivered, "Realtime event delivered");
    }
}

/// Which channels a work's updates may go to. Realtime topics are open to
/// anonymous subscribers, so only public works are broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BroadcastScope {
    pub is_public: bool,
    pub library_id: Option<DbId>,
}

impl From<&Work> for BroadcastScope {
    fn from(work: &Work) -> Self {
        Self {
            is_public: work.is_public,
            library_id: work.library_id,
        }
    }
}

/// Publish new counter values on the work's topic and the list feed, then
/// refresh the owning library's totals. Private works publish nothing.
pub async fn publish_counters(state: &AppState, counters: WorkCounters, scope: BroadcastScope) {
    if !scope.is_public {
        tracing::trace!(work_id = counters.work_id, "Private work, counters not broadcast");
        return;
    }
    state
        .event_bus
        .publish(RealtimeEvent::work_counters(&counters));
    state.event_bus.publish(RealtimeEvent::works_feed(&counters));
    if let Some(library_id) = scope.library_id {
        publish_library_stats(state, library_id).await;
    }
}

/// Publish a full work row after a content update. Subscribers read the
/// counter fields from the same `new` object. Private rows are never sent.
pub fn publish_work_row(state: &AppState, work: &Work) {
    if !work.is_public {
        return;
    }
    let row = match serde_json::to_value(work) {
        Ok(row) => row,
        Err(e) => {
            tracing::error!(error = %e, work_id = work.id, "Failed to serialize work row");
            return;
        }
    };
    state
        .event_bus
        .publish(RealtimeEvent::update(Topic::Work(work.id), row.clone()));
    state
        .event_bus
        .publish(RealtimeEvent::update(Topic::WorksFeed, row));
}

/// Tell subscribers a work stopped being public. Only the id goes out.
pub fn publish_work_hidden(state: &AppState, work_id: DbId) {
    let row = serde_json::json!({ "id": work_id, "is_public": false });
    state
        .event_bus
        .publish(RealtimeEvent::update(Topic::Work(work_id), row.clone()));
    state
        .event_bus
        .publish(RealtimeEvent::update(Topic::WorksFeed, row));
}

/// Recompute and publish a library's public totals. Failures are logged only.
pub async fn publish_library_stats(state: &AppState, library_id: DbId) {
    match LibraryRepo::stats(&state.pool, library_id, false).await {
        Ok(stats) => state.event_bus.publish(RealtimeEvent::library_stats(&stats)),
        Err(e) => {
            tracing::warn!(error = %e, library_id, "Failed to load library stats for broadcast")
        }
    }
}
