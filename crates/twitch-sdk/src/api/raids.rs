use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::TwitchApi;
use super::models::HelixResponse;
use twitch_http::TransportError;

/// Result of POST /raids.
#[derive(Debug, Clone, Deserialize)]
pub struct Raid {
    pub created_at: DateTime<Utc>,
    pub is_mature: bool,
}

impl TwitchApi {
    /// Start a raid to another channel. Requires channel:manage:raids.
    pub async fn start_raid(
        &self,
        from_broadcaster_id: &str,
        to_broadcaster_id: &str,
    ) -> Result<HelixResponse<Raid>, TransportError> {
        let query = vec![
            ("from_broadcaster_id", from_broadcaster_id.to_string()),
            ("to_broadcaster_id", to_broadcaster_id.to_string()),
        ];
        let body = self.http.post_empty("/raids", &query).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Cancel a pending raid. Requires channel:manage:raids.
    pub async fn cancel_raid(&self, broadcaster_id: &str) -> Result<(), TransportError> {
        let query = vec![("broadcaster_id", broadcaster_id.to_string())];
        self.http.delete("/raids", &query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raid_fixture_deserializes() {
        let json = r#"{
            "data": [{
                "created_at": "2022-02-18T07:20:50.52Z",
                "is_mature": false
            }]
        }"#;
        let resp: HelixResponse<Raid> = serde_json::from_str(json).unwrap();
        assert!(!resp.data[0].is_mature);
        assert_eq!(resp.data[0].created_at.timestamp(), 1645168850);
    }
}
