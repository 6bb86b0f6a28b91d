//! Connect to EventSub and print follow events for a channel.
//!
//! ```sh
//! TWITCH_CLIENT_ID=... TWITCH_USER_TOKEN=... BROADCASTER_ID=... \
//!     cargo run --example listen_events
//! ```

use anyhow::Context;
use twitch_sdk::{Credentials, DisconnectReason, SessionEvent, TwitchApi};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "twitch_sdk=debug,info".into()),
        )
        .init();

    let credentials = Credentials::from_env()?;
    let broadcaster_id =
        std::env::var("BROADCASTER_ID").context("BROADCASTER_ID is not set")?;

    let api = TwitchApi::new(credentials);
    let mut session = api.eventsub_session();

    let session_id = session.connect().await?;
    tracing::info!(session_id = %session_id, "connected");

    session
        .subscribe(
            "channel.follow",
            "2",
            serde_json::json!({
                "broadcaster_user_id": broadcaster_id,
                "moderator_user_id": broadcaster_id,
            }),
        )
        .await?;

    while let Some(event) = session.next_event().await? {
        match event {
            SessionEvent::Notification {
                subscription_type,
                event,
                ..
            } => {
                println!("{subscription_type}: {event}");
            }
            SessionEvent::Revocation { subscription } => {
                eprintln!("subscription revoked: {subscription}");
            }
        }
    }

    match session.disconnect_reason() {
        Some(DisconnectReason::KeepaliveTimeout) => {
            tracing::warn!("connection went silent; reconnect if you still need events")
        }
        Some(DisconnectReason::ServerClosed) => tracing::warn!("server closed the connection"),
        _ => tracing::info!("session closed"),
    }
    Ok(())
}
