use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use super::EventSubError;

pub(super) type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

#[derive(Debug, Deserialize)]
struct WsEnvelope {
    #[serde(default)]
    metadata: Option<WsMetadata>,
    #[serde(default)]
    payload: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct WsMetadata {
    #[serde(default)]
    message_type: Option<String>,
}

/// Session block of a session_welcome payload.
#[derive(Debug, Deserialize)]
pub(super) struct WelcomeSession {
    pub session_id: String,
    #[allow(dead_code)]
    #[serde(default)]
    pub status: Option<String>,
    #[allow(dead_code)]
    #[serde(default)]
    pub connected_at: Option<String>,
    pub keepalive_timeout_seconds: u64,
    #[serde(default)]
    pub reconnect_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WelcomePayload {
    session: WelcomeSession,
}

/// One parsed inbound text frame.
#[derive(Debug)]
pub(super) enum InboundFrame {
    Welcome(WelcomeSession),
    Keepalive,
    Notification {
        subscription_type: String,
        subscription: serde_json::Value,
        event: serde_json::Value,
    },
    Reconnect {
        reconnect_url: String,
    },
    Revocation {
        subscription: serde_json::Value,
    },
    Unknown,
}

pub(super) async fn connect_ws(url: &str) -> Result<WsStream, EventSubError> {
    let (ws, _) = connect_async(url).await?;
    Ok(ws)
}

/// Read frames until the welcome arrives, answering pings and skipping
/// non-text frames. A text frame of any other type is a protocol error.
pub(super) async fn read_welcome(
    ws: &mut WsStream,
    handshake_timeout: Duration,
) -> Result<WelcomeSession, EventSubError> {
    use tokio_tungstenite::tungstenite::Message as Msg;
    loop {
        match tokio::time::timeout(handshake_timeout, ws.next()).await {
            Ok(Some(Ok(Msg::Text(text)))) => match classify_frame(&text)? {
                InboundFrame::Welcome(session) => return Ok(session),
                _ => {
                    return Err(EventSubError::Protocol(
                        "expected session_welcome as first frame".into(),
                    ));
                }
            },
            Ok(Some(Ok(Msg::Ping(data)))) => {
                let _ = ws.send(Msg::Pong(data)).await;
            }
            Ok(Some(Ok(Msg::Close(_)))) | Ok(None) => {
                return Err(EventSubError::Protocol(
                    "connection closed before welcome".into(),
                ));
            }
            Ok(Some(Ok(_))) => continue,
            Ok(Some(Err(e))) => return Err(EventSubError::WebSocket(e)),
            Err(_) => {
                return Err(EventSubError::Protocol(
                    "timed out waiting for welcome".into(),
                ));
            }
        }
    }
}

/// Parse a text frame into its inbound kind. Unparsable JSON is a
/// protocol error; a missing or unrecognized message type is `Unknown`
/// so new server-side frame kinds pass through harmlessly.
pub(super) fn classify_frame(text: &str) -> Result<InboundFrame, EventSubError> {
    let envelope: WsEnvelope = serde_json::from_str(text)
        .map_err(|e| EventSubError::Protocol(format!("malformed frame: {e}")))?;
    let message_type = envelope
        .metadata
        .as_ref()
        .and_then(|m| m.message_type.as_deref());

    match message_type {
        Some("session_welcome") => {
            let payload: WelcomePayload = serde_json::from_value(envelope.payload)
                .map_err(|e| EventSubError::Protocol(format!("malformed welcome payload: {e}")))?;
            Ok(InboundFrame::Welcome(payload.session))
        }
        Some("session_keepalive") => Ok(InboundFrame::Keepalive),
        Some("notification") => {
            let subscription = envelope
                .payload
                .get("subscription")
                .cloned()
                .ok_or_else(|| {
                    EventSubError::Protocol("notification missing subscription".into())
                })?;
            let subscription_type = subscription
                .get("type")
                .and_then(|t| t.as_str())
                .unwrap_or_default()
                .to_string();
            let event = envelope
                .payload
                .get("event")
                .cloned()
                .unwrap_or(serde_json::Value::Null);
            Ok(InboundFrame::Notification {
                subscription_type,
                subscription,
                event,
            })
        }
        Some("session_reconnect") => match parse_reconnect_url(&envelope.payload) {
            Some(reconnect_url) => Ok(InboundFrame::Reconnect { reconnect_url }),
            None => Err(EventSubError::Protocol(
                "session_reconnect missing reconnect_url".into(),
            )),
        },
        Some("revocation") => {
            let subscription = envelope
                .payload
                .get("subscription")
                .cloned()
                .ok_or_else(|| EventSubError::Protocol("revocation missing subscription".into()))?;
            Ok(InboundFrame::Revocation { subscription })
        }
        Some(other) => {
            tracing::debug!(message_type = other, "skipping unrecognized frame");
            Ok(InboundFrame::Unknown)
        }
        None => {
            tracing::debug!("skipping frame without message_type");
            Ok(InboundFrame::Unknown)
        }
    }
}

fn parse_reconnect_url(payload: &serde_json::Value) -> Option<String> {
    payload
        .get("session")
        .and_then(|session| session.get("reconnect_url"))
        .and_then(|url| url.as_str())
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(ToOwned::to_owned)
}
