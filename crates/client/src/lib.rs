//! Client for the 북서머리 API.
//!
//! - [`BookSummaryApi`]: REST calls for like status and like/unlike.
//! - [`RealtimeClient`] / [`RealtimeConnection`]: WebSocket subscription to
//!   realtime topics.
//! - [`WorkWatcher`]: a [`CounterMirror`](booksummary_core::counter::CounterMirror)
//!   for one work, kept current by its realtime topic.

pub mod api;
pub mod error;
pub mod realtime;
pub mod watcher;

pub use api::{BookSummaryApi, LikeStatus};
pub use error::ClientError;
pub use realtime::{RealtimeClient, RealtimeConnection};
pub use watcher::WorkWatcher;
