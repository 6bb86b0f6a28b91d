//! EventSub WebSocket session for real-time Twitch events.
//!
//! Connects to wss://eventsub.wss.twitch.tv/ws, performs the
//! session_welcome handshake, and exposes inbound notifications as a
//! pull-based sequence. Keepalives are filtered out, session_reconnect
//! frames are followed transparently, and a missed keepalive deadline
//! ends the sequence instead of raising. Nothing is spawned; the
//! keepalive check is a bounded wait on the next frame.

mod connection;
#[cfg(test)]
mod tests;

use std::time::Duration;

use connection::{InboundFrame, WsStream};
use twitch_http::TransportError;

const EVENTSUB_URL: &str = "wss://eventsub.wss.twitch.tv/ws";
/// Slack added on top of the server-declared keepalive interval before
/// the connection is considered dead.
const KEEPALIVE_GRACE: Duration = Duration::from_secs(10);
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// Error type for the session protocol.
#[derive(Debug, thiserror::Error)]
pub enum EventSubError {
    #[error("operation requires an established session")]
    NotConnected,

    #[error("EventSub protocol violation: {0}")]
    Protocol(String),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Why the event sequence stopped producing elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisconnectReason {
    /// No frame arrived within the keepalive deadline plus grace.
    KeepaliveTimeout,
    /// The server closed the connection.
    ServerClosed,
    /// `close()` was called.
    Closed,
}

/// Element produced by the event sequence. Revocations carry the
/// subscription payload instead of an application event so callers can
/// tell them apart from ordinary notifications.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    Notification {
        /// Subscription type name, e.g. "channel.follow".
        subscription_type: String,
        subscription: serde_json::Value,
        event: serde_json::Value,
    },
    Revocation {
        subscription: serde_json::Value,
    },
}

impl SessionEvent {
    pub fn is_revocation(&self) -> bool {
        matches!(self, SessionEvent::Revocation { .. })
    }

    /// The subscription payload attached to the frame, whichever kind it is.
    pub fn subscription(&self) -> &serde_json::Value {
        match self {
            SessionEvent::Notification { subscription, .. } => subscription,
            SessionEvent::Revocation { subscription } => subscription,
        }
    }
}

/// Creates EventSub subscriptions bound to a live websocket session.
///
/// [`crate::TwitchApi`] implements this against Helix; tests substitute
/// a mock so the handshake can be exercised offline.
pub trait SubscriptionTransport {
    /// Register a subscription for the given session and return the
    /// server-assigned subscription id.
    #[allow(async_fn_in_trait)]
    async fn create_subscription(
        &self,
        subscription_type: &str,
        version: &str,
        condition: serde_json::Value,
        session_id: &str,
    ) -> Result<String, TransportError>;
}

/// One EventSub WebSocket session.
///
/// Owns at most one live connection. Designed for single-owner
/// sequential use: one caller connects, subscribes, then drains events.
pub struct EventSubSession<T: SubscriptionTransport> {
    transport: T,
    endpoint: String,
    ws: Option<WsStream>,
    session_id: Option<String>,
    keepalive_timeout: Duration,
    keepalive_grace: Duration,
    reconnect_url: Option<String>,
    active_subscription_ids: Vec<String>,
    disconnect_reason: Option<DisconnectReason>,
}

impl<T: SubscriptionTransport> EventSubSession<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            endpoint: EVENTSUB_URL.to_string(),
            ws: None,
            session_id: None,
            keepalive_timeout: Duration::from_secs(30),
            keepalive_grace: KEEPALIVE_GRACE,
            reconnect_url: None,
            active_subscription_ids: Vec::new(),
            disconnect_reason: None,
        }
    }

    /// Override the initial endpoint. Useful for proxies and mock servers.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Session id assigned by the server, present between a successful
    /// `connect()` and `close()`.
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Why the last sequence ended, if it has.
    pub fn disconnect_reason(&self) -> Option<DisconnectReason> {
        self.disconnect_reason
    }

    /// Subscription ids created through this session. Advisory only;
    /// the server remains authoritative.
    pub fn active_subscription_ids(&self) -> &[String] {
        &self.active_subscription_ids
    }

    /// Open the connection and block until the server's welcome frame
    /// arrives. Returns the server-assigned session id.
    ///
    /// A frame of any other type first, or a malformed welcome, fails
    /// with [`EventSubError::Protocol`] and leaves the session
    /// disconnected.
    pub async fn connect(&mut self) -> Result<String, EventSubError> {
        if let Some(mut old) = self.ws.take() {
            let _ = old.close(None).await;
        }
        let url = self
            .reconnect_url
            .take()
            .unwrap_or_else(|| self.endpoint.clone());

        tracing::info!(url = %url, "connecting to EventSub");
        let mut ws = connection::connect_ws(&url).await?;
        let welcome = match connection::read_welcome(&mut ws, HANDSHAKE_TIMEOUT).await {
            Ok(welcome) => welcome,
            Err(e) => {
                let _ = ws.close(None).await;
                return Err(e);
            }
        };
        tracing::info!(
            session_id = %welcome.session_id,
            keepalive_timeout_seconds = welcome.keepalive_timeout_seconds,
            "EventSub session established"
        );

        self.keepalive_timeout = Duration::from_secs(welcome.keepalive_timeout_seconds);
        self.reconnect_url = welcome.reconnect_url;
        self.session_id = Some(welcome.session_id.clone());
        self.ws = Some(ws);
        self.disconnect_reason = None;
        Ok(welcome.session_id)
    }

    /// Create a subscription delivered over this session's websocket.
    /// Returns the server-assigned subscription id. Transport failures
    /// propagate unchanged; nothing is retried.
    pub async fn subscribe(
        &mut self,
        subscription_type: &str,
        version: &str,
        condition: serde_json::Value,
    ) -> Result<String, EventSubError> {
        let session_id = self.session_id.clone().ok_or(EventSubError::NotConnected)?;
        let id = self
            .transport
            .create_subscription(subscription_type, version, condition, &session_id)
            .await?;
        tracing::debug!(subscription_type, subscription_id = %id, "subscription created");
        self.active_subscription_ids.push(id.clone());
        Ok(id)
    }

    /// Pull the next application event.
    ///
    /// Keepalives are consumed silently. A session_reconnect frame
    /// re-runs `connect()` against the server-supplied URL without
    /// surfacing anything; a failed reconnect propagates the same error
    /// `connect()` would. `Ok(None)` means the sequence is over — the
    /// keepalive deadline elapsed, the server closed the connection, or
    /// `close()` was called; [`Self::disconnect_reason`] tells which.
    pub async fn next_event(&mut self) -> Result<Option<SessionEvent>, EventSubError> {
        use tokio_tungstenite::tungstenite::Message as Msg;
        use futures_util::{SinkExt, StreamExt};

        loop {
            let Some(ws) = self.ws.as_mut() else {
                if self.disconnect_reason.is_some() {
                    return Ok(None);
                }
                return Err(EventSubError::NotConnected);
            };
            let deadline = self.keepalive_timeout + self.keepalive_grace;
            match tokio::time::timeout(deadline, ws.next()).await {
                Err(_) => {
                    tracing::warn!(
                        deadline_secs = deadline.as_secs(),
                        "keepalive deadline elapsed, ending event sequence"
                    );
                    self.teardown(DisconnectReason::KeepaliveTimeout).await;
                    return Ok(None);
                }
                Ok(None) | Ok(Some(Ok(Msg::Close(_)))) => {
                    tracing::warn!("EventSub connection closed by server");
                    self.teardown(DisconnectReason::ServerClosed).await;
                    return Ok(None);
                }
                Ok(Some(Err(e))) => return Err(EventSubError::WebSocket(e)),
                Ok(Some(Ok(Msg::Ping(data)))) => {
                    let _ = ws.send(Msg::Pong(data)).await;
                }
                Ok(Some(Ok(Msg::Text(text)))) => match connection::classify_frame(&text)? {
                    InboundFrame::Keepalive => {
                        tracing::trace!("keepalive received");
                    }
                    InboundFrame::Notification {
                        subscription_type,
                        subscription,
                        event,
                    } => {
                        tracing::debug!(subscription_type = %subscription_type, "notification received");
                        return Ok(Some(SessionEvent::Notification {
                            subscription_type,
                            subscription,
                            event,
                        }));
                    }
                    InboundFrame::Revocation { subscription } => {
                        tracing::warn!("subscription revoked");
                        return Ok(Some(SessionEvent::Revocation { subscription }));
                    }
                    InboundFrame::Reconnect { reconnect_url } => {
                        tracing::info!(reconnect_url = %reconnect_url, "session_reconnect received");
                        self.reconnect_url = Some(reconnect_url);
                        self.connect().await?;
                    }
                    InboundFrame::Welcome(_) | InboundFrame::Unknown => {}
                },
                Ok(Some(Ok(_))) => {}
            }
        }
    }

    /// The event sequence as a `Stream`. Ends when `next_event` returns
    /// `Ok(None)`; an error is yielded once and then the stream ends.
    pub fn events(
        &mut self,
    ) -> impl futures_util::Stream<Item = Result<SessionEvent, EventSubError>> + '_ {
        futures_util::stream::unfold(Some(self), |state| async move {
            let session = state?;
            match session.next_event().await {
                Ok(Some(event)) => Some((Ok(event), Some(session))),
                Ok(None) => None,
                Err(e) => Some((Err(e), None)),
            }
        })
    }

    /// Close the connection if one is open. Idempotent; clears the
    /// session id and the subscription bookkeeping. Server-side
    /// subscriptions are not deleted.
    pub async fn close(&mut self) {
        self.teardown(DisconnectReason::Closed).await;
        self.active_subscription_ids.clear();
    }

    async fn teardown(&mut self, reason: DisconnectReason) {
        if let Some(mut ws) = self.ws.take() {
            let _ = ws.close(None).await;
        }
        self.session_id = None;
        self.reconnect_url = None;
        self.disconnect_reason = Some(reason);
    }
}
