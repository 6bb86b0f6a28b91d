use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::TwitchApi;
use super::models::HelixResponse;
use twitch_http::TransportError;

/// Active creator goal.
#[derive(Debug, Clone, Deserialize)]
pub struct Goal {
    pub id: String,
    pub broadcaster_id: String,
    pub broadcaster_login: String,
    pub broadcaster_name: String,
    /// follower, subscription, subscription_count, new_subscription, or
    /// new_subscription_count.
    #[serde(rename = "type")]
    pub goal_type: String,
    pub description: String,
    pub current_amount: i64,
    pub target_amount: i64,
    pub created_at: DateTime<Utc>,
}

impl TwitchApi {
    /// Get the broadcaster's active creator goals. Requires
    /// channel:read:goals.
    pub async fn get_creator_goals(
        &self,
        broadcaster_id: &str,
    ) -> Result<HelixResponse<Goal>, TransportError> {
        let query = vec![("broadcaster_id", broadcaster_id.to_string())];
        let body = self.http.get("/goals", &query).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn goal_fixture_deserializes() {
        let json = r#"{
            "data": [{
                "id": "1woowvbkiNv8BRxEWSqmQz6Zk92",
                "broadcaster_id": "141981764",
                "broadcaster_login": "twitchdev",
                "broadcaster_name": "TwitchDev",
                "type": "follower",
                "description": "Follow goal for Helix testing",
                "current_amount": 27062,
                "target_amount": 30000,
                "created_at": "2021-08-16T17:22:23Z"
            }]
        }"#;
        let resp: HelixResponse<Goal> = serde_json::from_str(json).unwrap();
        assert_eq!(resp.data[0].goal_type, "follower");
        assert_eq!(resp.data[0].target_amount, 30000);
    }
}
