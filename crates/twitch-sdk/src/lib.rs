//! Twitch Helix SDK.
//!
//! Typed bindings for the Helix REST API plus an EventSub WebSocket
//! session for real-time events. REST calls go through [`TwitchApi`];
//! the [`eventsub::EventSubSession`] owns one WebSocket connection and
//! produces events as a pull-based sequence.
//!
//! ```no_run
//! use twitch_sdk::{Credentials, TwitchApi};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let api = TwitchApi::new(Credentials::from_env()?);
//! let mut session = api.eventsub_session();
//! let session_id = session.connect().await?;
//! session
//!     .subscribe(
//!         "channel.follow",
//!         "2",
//!         serde_json::json!({"broadcaster_user_id": "1234", "moderator_user_id": "1234"}),
//!     )
//!     .await?;
//! while let Some(event) = session.next_event().await? {
//!     println!("{event:?}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod eventsub;

pub use api::TwitchApi;
pub use eventsub::{
    DisconnectReason, EventSubError, EventSubSession, SessionEvent, SubscriptionTransport,
};
pub use twitch_http::{Credentials, TransportError, TwitchHttpClient};
