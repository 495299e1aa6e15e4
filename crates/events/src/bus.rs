//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! Handlers publish a [`RealtimeEvent`] after every write that changes a
//! work row or a library aggregate; the WebSocket layer subscribes once and
//! fans events out to the clients subscribed to the matching topic.

use booksummary_core::interaction::WorkCounters;
use booksummary_core::library::LibraryStats;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::topic::Topic;

// ---------------------------------------------------------------------------
// RealtimeEvent
// ---------------------------------------------------------------------------

/// Change kind carried by every event. Rows are only ever pushed on update.
pub const EVENT_UPDATE: &str = "UPDATE";

/// A row change addressed to one topic.
///
/// Serialized as `{"topic": "...", "event": "UPDATE", "new": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeEvent {
    pub topic: String,
    pub event: String,
    /// The row after the change.
    pub new: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl RealtimeEvent {
    pub fn update(topic: Topic, new: serde_json::Value) -> Self {
        Self {
            topic: topic.to_string(),
            event: EVENT_UPDATE.to_string(),
            new,
            timestamp: Some(Utc::now()),
        }
    }

    /// Counter change for one work, on `ai_work_{id}`.
    pub fn work_counters(counters: &WorkCounters) -> Self {
        Self::update(Topic::Work(counters.work_id), counters_row(counters))
    }

    /// The same counter change on the list feed.
    pub fn works_feed(counters: &WorkCounters) -> Self {
        Self::update(Topic::WorksFeed, counters_row(counters))
    }

    /// Aggregate change for one library, on `library_{id}`.
    pub fn library_stats(stats: &LibraryStats) -> Self {
        Self::update(
            Topic::Library(stats.library_id),
            serde_json::json!({
                "id": stats.library_id,
                "total_works": stats.total_works,
                "total_views": stats.total_views,
                "total_likes": stats.total_likes,
            }),
        )
    }

    /// Parsed topic, if it is one this service knows.
    pub fn parsed_topic(&self) -> Option<Topic> {
        self.topic.parse().ok()
    }
}

fn counters_row(counters: &WorkCounters) -> serde_json::Value {
    serde_json::json!({
        "id": counters.work_id,
        "view_count": counters.view_count,
        "like_count": counters.like_count,
    })
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus, shared via `Arc<EventBus>`.
pub struct EventBus {
    sender: broadcast::Sender<RealtimeEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest unconsumed events are dropped and
    /// slow receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish to all current subscribers. Dropped if nobody is listening.
    pub fn publish(&self, event: RealtimeEvent) {
        tracing::trace!(topic = %event.topic, "Publishing realtime event");
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RealtimeEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
