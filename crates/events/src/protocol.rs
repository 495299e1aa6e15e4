//! JSON frames exchanged on the realtime WebSocket.
//!
//! Clients send [`ClientMessage`]; the server answers with
//! [`ServerMessage`]. Both are tagged by a `"type"` field.

use serde::{Deserialize, Serialize};

use crate::bus::RealtimeEvent;

/// `{"type":"subscribe","topic":"ai_work_5"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientMessage {
    Subscribe { topic: String },
    Unsubscribe { topic: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerMessage {
    Subscribed { topic: String },
    Unsubscribed { topic: String },
    Error { message: String },
    /// A row change on a subscribed topic:
    /// `{"type":"event","topic":"...","event":"UPDATE","new":{...}}`.
    Event(RealtimeEvent),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Topic;
    use booksummary_core::interaction::WorkCounters;

    #[test]
    fn client_message_parses_subscribe() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"subscribe","topic":"ai_work_5"}"#).unwrap();
        assert_eq!(
            msg,
            ClientMessage::Subscribe {
                topic: "ai_work_5".into()
            }
        );
    }

    #[test]
    fn event_frame_keeps_row_under_new() {
        let event = RealtimeEvent::work_counters(&WorkCounters {
            work_id: 5,
            view_count: 1,
            like_count: 2,
        });
        let json = serde_json::to_value(ServerMessage::Event(event)).unwrap();
        assert_eq!(json["type"], "event");
        assert_eq!(json["topic"], "ai_work_5");
        assert_eq!(json["event"], "UPDATE");
        assert_eq!(json["new"]["like_count"], 2);

        let back: ServerMessage = serde_json::from_value(json).unwrap();
        match back {
            ServerMessage::Event(e) => assert_eq!(e.parsed_topic(), Some(Topic::Work(5))),
            other => panic!("unexpected frame: {other:?}"),
        }
    }
}
