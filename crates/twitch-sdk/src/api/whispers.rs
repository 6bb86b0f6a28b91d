use serde::Serialize;

use super::TwitchApi;
use twitch_http::TransportError;

#[derive(Serialize)]
struct WhisperBody<'a> {
    message: &'a str,
}

impl TwitchApi {
    /// Send a whisper. The sender must have a verified phone number and
    /// the user:manage:whispers scope. Message length is capped at 500
    /// characters for a first whisper, 10000 afterwards.
    pub async fn send_whisper(
        &self,
        from_user_id: &str,
        to_user_id: &str,
        message: &str,
    ) -> Result<(), TransportError> {
        let query = vec![
            ("from_user_id", from_user_id.to_string()),
            ("to_user_id", to_user_id.to_string()),
        ];
        self.http
            .post("/whispers", &query, &WhisperBody { message })
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whisper_body_carries_only_the_message() {
        let body = serde_json::to_value(WhisperBody { message: "hello" }).unwrap();
        assert_eq!(body, serde_json::json!({"message": "hello"}));
    }
}
