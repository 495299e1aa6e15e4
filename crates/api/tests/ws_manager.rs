//! Unit tests for `WsManager`.
//!
//! These exercise connection and topic bookkeeping directly, without any
//! HTTP upgrade.

use axum::extract::ws::Message;
use booksummary_api::ws::WsManager;

const TOPIC: &str = "ai_work_5";

fn text(body: &str) -> Message {
    Message::Text(body.to_string().into())
}

#[tokio::test]
async fn new_manager_has_zero_connections() {
    let manager = WsManager::new();

    assert_eq!(manager.connection_count().await, 0);
}

#[tokio::test]
async fn add_and_remove_track_connection_count() {
    let manager = WsManager::new();

    let _rx = manager.add("conn-1".to_string()).await;
    assert_eq!(manager.connection_count().await, 1);

    manager.remove("conn-1").await;
    assert_eq!(manager.connection_count().await, 0);
}

#[tokio::test]
async fn remove_unknown_connection_is_noop() {
    let manager = WsManager::new();
    let _rx = manager.add("conn-1".to_string()).await;

    manager.remove("missing").await;

    assert_eq!(manager.connection_count().await, 1);
}

#[tokio::test]
async fn subscribe_unknown_connection_returns_false() {
    let manager = WsManager::new();

    assert!(!manager.subscribe("missing", TOPIC).await);
    assert_eq!(manager.subscriber_count(TOPIC).await, 0);
}

#[tokio::test]
async fn topic_messages_reach_only_subscribers() {
    let manager = WsManager::new();
    let mut rx1 = manager.add("conn-1".to_string()).await;
    let mut rx2 = manager.add("conn-2".to_string()).await;

    assert!(manager.subscribe("conn-1", TOPIC).await);
    let delivered = manager.send_to_topic(TOPIC, text("update")).await;

    assert_eq!(delivered, 1);
    assert!(matches!(rx1.try_recv(), Ok(Message::Text(t)) if t.as_str() == "update"));
    assert!(rx2.try_recv().is_err());
}

#[tokio::test]
async fn subscribing_twice_delivers_once() {
    let manager = WsManager::new();
    let mut rx = manager.add("conn-1".to_string()).await;

    manager.subscribe("conn-1", TOPIC).await;
    manager.subscribe("conn-1", TOPIC).await;

    assert_eq!(manager.send_to_topic(TOPIC, text("once")).await, 1);
    assert!(rx.try_recv().is_ok());
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn unsubscribe_stops_delivery() {
    let manager = WsManager::new();
    let mut rx = manager.add("conn-1".to_string()).await;
    manager.subscribe("conn-1", TOPIC).await;

    assert!(manager.unsubscribe("conn-1", TOPIC).await);
    assert!(!manager.unsubscribe("conn-1", TOPIC).await);

    assert_eq!(manager.send_to_topic(TOPIC, text("late")).await, 0);
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn removed_connection_leaves_topic() {
    let manager = WsManager::new();
    let _rx = manager.add("conn-1".to_string()).await;
    manager.subscribe("conn-1", TOPIC).await;
    assert_eq!(manager.subscriber_count(TOPIC).await, 1);

    manager.remove("conn-1").await;

    assert_eq!(manager.subscriber_count(TOPIC).await, 0);
}

#[tokio::test]
async fn dropped_receiver_is_skipped() {
    let manager = WsManager::new();
    let rx = manager.add("conn-1".to_string()).await;
    manager.subscribe("conn-1", TOPIC).await;
    drop(rx);

    assert_eq!(manager.send_to_topic(TOPIC, text("gone")).await, 0);
    assert!(!manager.send_to("conn-1", text("gone")).await);
}

#[tokio::test]
async fn send_to_targets_one_connection() {
    let manager = WsManager::new();
    let mut rx1 = manager.add("conn-1".to_string()).await;
    let mut rx2 = manager.add("conn-2".to_string()).await;

    assert!(manager.send_to("conn-2", text("hi")).await);
    assert!(!manager.send_to("missing", text("hi")).await);

    assert!(rx1.try_recv().is_err());
    assert!(rx2.try_recv().is_ok());
}

#[tokio::test]
async fn shutdown_all_sends_close_and_clears() {
    let manager = WsManager::new();
    let mut rx1 = manager.add("conn-1".to_string()).await;
    let mut rx2 = manager.add("conn-2".to_string()).await;

    manager.shutdown_all().await;

    assert_eq!(manager.connection_count().await, 0);
    assert!(matches!(rx1.try_recv(), Ok(Message::Close(None))));
    assert!(matches!(rx2.try_recv(), Ok(Message::Close(None))));
}

#[tokio::test]
async fn ping_all_reaches_every_connection() {
    let manager = WsManager::new();
    let mut rx = manager.add("conn-1".to_string()).await;

    manager.ping_all().await;

    assert!(matches!(rx.try_recv(), Ok(Message::Ping(_))));
}
