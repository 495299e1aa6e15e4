//! WebSocket subscriber for realtime topics.
//!
//! [`RealtimeClient::connect`] opens a [`RealtimeConnection`]. Nothing is
//! received until [`RealtimeConnection::subscribe`] is called for at least
//! one topic; dropping or closing the connection ends every subscription.
//! There is no reconnect: after a disconnect the caller subscribes again.

use std::collections::VecDeque;

use booksummary_events::{ClientMessage, RealtimeEvent, ServerMessage, Topic};
use futures::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::error::ClientError;

type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// Connection settings for the realtime endpoint.
pub struct RealtimeClient {
    ws_url: String,
}

impl RealtimeClient {
    /// * `ws_url` - full endpoint, e.g. `ws://localhost:3000/api/v1/ws`.
    pub fn new(ws_url: impl Into<String>) -> Self {
        Self {
            ws_url: ws_url.into(),
        }
    }

    pub fn ws_url(&self) -> &str {
        &self.ws_url
    }

    pub async fn connect(&self) -> Result<RealtimeConnection, ClientError> {
        let (stream, _response) = connect_async(self.ws_url.as_str()).await.map_err(|e| {
            ClientError::Connection(format!("Failed to connect to {}: {e}", self.ws_url))
        })?;
        tracing::info!(url = %self.ws_url, "Realtime connection established");

        Ok(RealtimeConnection {
            stream,
            pending: VecDeque::new(),
        })
    }
}

/// A live realtime connection.
pub struct RealtimeConnection {
    stream: WsStream,
    /// Events that arrived while waiting for a subscribe/unsubscribe ack.
    pending: VecDeque<RealtimeEvent>,
}

impl RealtimeConnection {
    /// Subscribe to `topic` and wait for the server to confirm it.
    pub async fn subscribe(&mut self, topic: Topic) -> Result<(), ClientError> {
        let topic = topic.to_string();
        self.send(&ClientMessage::Subscribe {
            topic: topic.clone(),
        })
        .await?;

        match self.next_reply().await? {
            ServerMessage::Subscribed { topic: acked } if acked == topic => {
                tracing::debug!(topic = %topic, "Subscribed");
                Ok(())
            }
            ServerMessage::Error { message } => Err(ClientError::Rejected(message)),
            other => Err(ClientError::Protocol(format!(
                "Unexpected reply to subscribe: {other:?}"
            ))),
        }
    }

    /// Stop receiving events for `topic`.
    pub async fn unsubscribe(&mut self, topic: Topic) -> Result<(), ClientError> {
        let topic = topic.to_string();
        self.send(&ClientMessage::Unsubscribe {
            topic: topic.clone(),
        })
        .await?;

        match self.next_reply().await? {
            ServerMessage::Unsubscribed { .. } => {
                // Anything already queued for the topic is stale now.
                self.pending.retain(|e| e.topic != topic);
                tracing::debug!(topic = %topic, "Unsubscribed");
                Ok(())
            }
            ServerMessage::Error { message } => Err(ClientError::Rejected(message)),
            other => Err(ClientError::Protocol(format!(
                "Unexpected reply to unsubscribe: {other:?}"
            ))),
        }
    }

    /// Next event on any subscribed topic. `Ok(None)` once the server
    /// closes the connection.
    pub async fn next_event(&mut self) -> Result<Option<RealtimeEvent>, ClientError> {
        if let Some(event) = self.pending.pop_front() {
            return Ok(Some(event));
        }
        loop {
            match self.next_frame().await? {
                None => return Ok(None),
                Some(ServerMessage::Event(event)) => return Ok(Some(event)),
                Some(ServerMessage::Error { message }) => {
                    tracing::warn!(error = %message, "Realtime server reported an error");
                }
                Some(other) => {
                    tracing::debug!(frame = ?other, "Ignoring control frame");
                }
            }
        }
    }

    /// Send a Close frame and drop the connection.
    pub async fn close(mut self) -> Result<(), ClientError> {
        self.stream
            .close(None)
            .await
            .map_err(|e| ClientError::Protocol(e.to_string()))
    }

    async fn send(&mut self, message: &ClientMessage) -> Result<(), ClientError> {
        let json = serde_json::to_string(message)
            .map_err(|e| ClientError::Protocol(format!("Failed to encode frame: {e}")))?;
        self.stream
            .send(Message::Text(json))
            .await
            .map_err(|e| ClientError::Protocol(e.to_string()))
    }

    /// First non-event frame. Events seen on the way are kept for
    /// [`next_event`](Self::next_event).
    async fn next_reply(&mut self) -> Result<ServerMessage, ClientError> {
        loop {
            match self.next_frame().await? {
                None => return Err(ClientError::Protocol("Connection closed".into())),
                Some(ServerMessage::Event(event)) => self.pending.push_back(event),
                Some(reply) => return Ok(reply),
            }
        }
    }

    async fn next_frame(&mut self) -> Result<Option<ServerMessage>, ClientError> {
        while let Some(message) = self.stream.next().await {
            let message = message.map_err(|e| ClientError::Protocol(e.to_string()))?;
            match message {
                Message::Text(text) => return parse_frame(&text).map(Some),
                Message::Close(_) => return Ok(None),
                _ => {}
            }
        }
        Ok(None)
    }
}

/// Decode one server frame.
pub fn parse_frame(text: &str) -> Result<ServerMessage, ClientError> {
    serde_json::from_str(text)
        .map_err(|e| ClientError::Protocol(format!("Invalid server frame: {e}")))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parses_event_frame() {
        let frame = r#"{"type":"event","topic":"ai_work_5","event":"UPDATE","new":{"id":5,"like_count":2}}"#;
        let msg = parse_frame(frame).unwrap();
        assert_matches!(msg, ServerMessage::Event(e) if e.topic == "ai_work_5" && e.new["like_count"] == 2);
    }

    #[test]
    fn parses_acks_and_errors() {
        assert_matches!(
            parse_frame(r#"{"type":"subscribed","topic":"library_3"}"#),
            Ok(ServerMessage::Subscribed { topic }) if topic == "library_3"
        );
        assert_matches!(
            parse_frame(r#"{"type":"error","message":"unknown topic 'x'"}"#),
            Ok(ServerMessage::Error { .. })
        );
    }

    #[test]
    fn rejects_garbage() {
        assert_matches!(parse_frame("not json"), Err(ClientError::Protocol(_)));
    }
}
