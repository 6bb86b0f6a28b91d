use std::sync::Mutex;
use std::time::Duration;

use futures_util::SinkExt;
use serde_json::json;
use tokio::net::TcpListener;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message as Msg;

use super::*;
use twitch_http::TransportError;

#[derive(Default)]
struct MockTransport {
    calls: Mutex<Vec<(String, String, serde_json::Value, String)>>,
}

impl SubscriptionTransport for MockTransport {
    async fn create_subscription(
        &self,
        subscription_type: &str,
        version: &str,
        condition: serde_json::Value,
        session_id: &str,
    ) -> Result<String, TransportError> {
        let mut calls = self.calls.lock().unwrap();
        calls.push((
            subscription_type.to_string(),
            version.to_string(),
            condition,
            session_id.to_string(),
        ));
        Ok(format!("sub-{}", calls.len()))
    }
}

/// Serve one websocket connection, push the given frames, then either
/// hold the socket open or close it.
async fn spawn_server(frames: Vec<serde_json::Value>, hold_open: bool) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        let Ok((stream, _)) = listener.accept().await else {
            return;
        };
        let mut ws = accept_async(stream).await.unwrap();
        for frame in frames {
            if ws.send(Msg::Text(frame.to_string().into())).await.is_err() {
                return;
            }
        }
        if hold_open {
            tokio::time::sleep(Duration::from_secs(30)).await;
        }
        let _ = ws.close(None).await;
    });
    url
}

fn welcome(session_id: &str, keepalive_timeout_seconds: u64) -> serde_json::Value {
    json!({
        "metadata": {"message_id": "m1", "message_type": "session_welcome"},
        "payload": {"session": {
            "session_id": session_id,
            "status": "connected",
            "connected_at": "2024-05-01T12:00:00Z",
            "keepalive_timeout_seconds": keepalive_timeout_seconds,
            "reconnect_url": null
        }}
    })
}

fn keepalive() -> serde_json::Value {
    json!({
        "metadata": {"message_type": "session_keepalive"},
        "payload": {}
    })
}

fn notification(subscription_type: &str, event: serde_json::Value) -> serde_json::Value {
    json!({
        "metadata": {"message_type": "notification"},
        "payload": {
            "subscription": {"id": "s1", "type": subscription_type},
            "event": event
        }
    })
}

fn reconnect(url: &str) -> serde_json::Value {
    json!({
        "metadata": {"message_type": "session_reconnect"},
        "payload": {"session": {"reconnect_url": url}}
    })
}

fn revocation(subscription_type: &str) -> serde_json::Value {
    json!({
        "metadata": {"message_type": "revocation"},
        "payload": {"subscription": {"id": "s1", "type": subscription_type, "status": "authorization_revoked"}}
    })
}

#[tokio::test]
async fn connect_returns_server_assigned_session_id() {
    let url = spawn_server(vec![welcome("abc", 10)], true).await;
    let mut session = EventSubSession::new(MockTransport::default()).with_endpoint(url);
    let session_id = session.connect().await.unwrap();
    assert_eq!(session_id, "abc");
    assert_eq!(session.session_id(), Some("abc"));
    session.close().await;
}

#[tokio::test]
async fn connect_fails_when_first_frame_is_not_welcome() {
    let url = spawn_server(vec![notification("channel.follow", json!({}))], true).await;
    let mut session = EventSubSession::new(MockTransport::default()).with_endpoint(url);
    let err = session.connect().await.unwrap_err();
    assert!(matches!(err, EventSubError::Protocol(_)), "got {err:?}");
    assert!(session.session_id().is_none());
}

#[tokio::test]
async fn keepalives_never_surface() {
    let url = spawn_server(
        vec![
            welcome("abc", 10),
            keepalive(),
            notification("channel.follow", json!({"user_name": "alice"})),
            keepalive(),
            keepalive(),
            notification("channel.follow", json!({"user_name": "bob"})),
        ],
        false,
    )
    .await;
    let mut session = EventSubSession::new(MockTransport::default()).with_endpoint(url);
    session.connect().await.unwrap();

    let mut names = Vec::new();
    while let Some(event) = session.next_event().await.unwrap() {
        match event {
            SessionEvent::Notification { event, .. } => {
                names.push(event["user_name"].as_str().unwrap().to_string());
            }
            other => panic!("unexpected element: {other:?}"),
        }
    }
    assert_eq!(names, ["alice", "bob"]);
    assert_eq!(session.disconnect_reason(), Some(DisconnectReason::ServerClosed));
}

#[tokio::test]
async fn silence_past_deadline_ends_sequence_without_error() {
    let url = spawn_server(vec![welcome("abc", 0)], true).await;
    let mut session = EventSubSession::new(MockTransport::default()).with_endpoint(url);
    session.connect().await.unwrap();
    session.keepalive_grace = Duration::from_millis(200);

    let result = tokio::time::timeout(Duration::from_secs(5), session.next_event())
        .await
        .expect("sequence must end shortly after the deadline");
    assert!(result.unwrap().is_none());
    assert_eq!(
        session.disconnect_reason(),
        Some(DisconnectReason::KeepaliveTimeout)
    );
}

#[tokio::test]
async fn reconnect_is_invisible_to_the_consumer() {
    let second = spawn_server(
        vec![
            welcome("def", 10),
            notification("channel.follow", json!({"user_name": "bob"})),
        ],
        false,
    )
    .await;
    let first = spawn_server(
        vec![
            welcome("abc", 10),
            notification("channel.follow", json!({"user_name": "alice"})),
            reconnect(&second),
        ],
        true,
    )
    .await;

    let mut session = EventSubSession::new(MockTransport::default()).with_endpoint(first);
    session.connect().await.unwrap();

    let mut names = Vec::new();
    while let Some(event) = session.next_event().await.unwrap() {
        if let SessionEvent::Notification { event, .. } = event {
            names.push(event["user_name"].as_str().unwrap().to_string());
        }
    }
    assert_eq!(names, ["alice", "bob"]);
    // The replacement connection issued a fresh session id.
    assert_eq!(session.disconnect_reason(), Some(DisconnectReason::ServerClosed));
}

#[tokio::test]
async fn revocation_is_tagged() {
    let url = spawn_server(
        vec![welcome("abc", 10), revocation("channel.follow")],
        false,
    )
    .await;
    let mut session = EventSubSession::new(MockTransport::default()).with_endpoint(url);
    session.connect().await.unwrap();

    let event = session.next_event().await.unwrap().unwrap();
    assert!(event.is_revocation());
    assert_eq!(event.subscription()["type"], "channel.follow");
    assert_eq!(event.subscription()["status"], "authorization_revoked");
}

#[tokio::test]
async fn close_is_idempotent_and_safe_before_connect() {
    let mut session = EventSubSession::new(MockTransport::default());
    session.close().await;
    session.close().await;
    assert!(session.session_id().is_none());
    assert_eq!(session.disconnect_reason(), Some(DisconnectReason::Closed));
    assert!(session.next_event().await.unwrap().is_none());
}

#[tokio::test]
async fn subscribe_requires_a_session() {
    let mut session = EventSubSession::new(MockTransport::default());
    let err = session
        .subscribe("channel.follow", "2", json!({"broadcaster_user_id": "1"}))
        .await
        .unwrap_err();
    assert!(matches!(err, EventSubError::NotConnected));
}

#[tokio::test]
async fn subscribe_registers_through_the_transport() {
    let url = spawn_server(vec![welcome("abc", 10)], true).await;
    let mut session = EventSubSession::new(MockTransport::default()).with_endpoint(url);
    session.connect().await.unwrap();

    let id = session
        .subscribe("channel.follow", "2", json!({"broadcaster_user_id": "1"}))
        .await
        .unwrap();
    assert_eq!(id, "sub-1");
    assert_eq!(session.active_subscription_ids(), ["sub-1".to_string()]);

    let calls = session.transport.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    let (subscription_type, version, condition, session_id) = &calls[0];
    assert_eq!(subscription_type, "channel.follow");
    assert_eq!(version, "2");
    assert_eq!(condition["broadcaster_user_id"], "1");
    assert_eq!(session_id, "abc");
}

#[tokio::test]
async fn events_stream_mirrors_next_event() {
    use futures_util::StreamExt;

    let url = spawn_server(
        vec![
            welcome("abc", 10),
            notification("stream.online", json!({"id": "1"})),
        ],
        false,
    )
    .await;
    let mut session = EventSubSession::new(MockTransport::default()).with_endpoint(url);
    session.connect().await.unwrap();

    let events: Vec<_> = session.events().collect().await;
    assert_eq!(events.len(), 1);
    assert!(events[0].as_ref().unwrap().subscription()["type"] == "stream.online");
}

#[test]
fn malformed_frame_is_a_protocol_error() {
    let err = connection::classify_frame("{not json").unwrap_err();
    assert!(matches!(err, EventSubError::Protocol(_)));
}

#[test]
fn frame_without_message_type_is_skipped() {
    let frame = json!({"payload": {}}).to_string();
    assert!(matches!(
        connection::classify_frame(&frame).unwrap(),
        connection::InboundFrame::Unknown
    ));
}

#[test]
fn reconnect_without_url_is_a_protocol_error() {
    let frame = json!({
        "metadata": {"message_type": "session_reconnect"},
        "payload": {"session": {"reconnect_url": ""}}
    })
    .to_string();
    assert!(matches!(
        connection::classify_frame(&frame).unwrap_err(),
        EventSubError::Protocol(_)
    ));
}
