//! Realtime change events.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`RealtimeEvent`]: a row change addressed to one [`Topic`].
//! - [`Topic`]: the channel names clients subscribe to.
//! - [`protocol`]: WebSocket frames shared by server and client.

pub mod bus;
pub mod protocol;
pub mod topic;

pub use bus::{EventBus, RealtimeEvent};
pub use protocol::{ClientMessage, ServerMessage};
pub use topic::Topic;
