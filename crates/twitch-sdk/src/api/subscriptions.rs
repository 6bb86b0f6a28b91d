use serde::Deserialize;

use super::TwitchApi;
use super::models::{Pagination, Query, push_many_opt, push_opt};
use twitch_http::TransportError;

/// Channel subscription entry.
#[derive(Debug, Clone, Deserialize)]
pub struct Subscription {
    pub broadcaster_id: String,
    pub broadcaster_login: String,
    pub broadcaster_name: String,
    #[serde(default)]
    pub gifter_id: String,
    #[serde(default)]
    pub gifter_login: String,
    #[serde(default)]
    pub gifter_name: String,
    pub is_gift: bool,
    /// 1000, 2000, or 3000.
    pub tier: String,
    #[serde(default)]
    pub plan_name: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub user_login: String,
    #[serde(default)]
    pub user_name: String,
}

/// Envelope for GET /subscriptions; carries subscriber points alongside
/// the plain total.
#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionsResponse {
    pub data: Vec<Subscription>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
    pub total: i64,
    #[serde(default)]
    pub points: i64,
}

/// Envelope for GET /subscriptions/user; empty `data` means not subscribed
/// (Helix reports that as 404, which surfaces as TransportError::Api).
#[derive(Debug, Clone, Deserialize)]
pub struct UserSubscriptionResponse {
    pub data: Vec<Subscription>,
}

/// Query params for GET /subscriptions.
#[derive(Debug, Clone, Default)]
pub struct GetSubscriptionsRequest {
    pub broadcaster_id: String,
    pub user_id: Option<Vec<String>>,
    pub first: Option<u32>,
    pub after: Option<String>,
    pub before: Option<String>,
}

impl GetSubscriptionsRequest {
    fn query(&self) -> Query {
        let mut query = vec![("broadcaster_id", self.broadcaster_id.clone())];
        push_many_opt(&mut query, "user_id", &self.user_id);
        push_opt(&mut query, "first", &self.first);
        push_opt(&mut query, "after", &self.after);
        push_opt(&mut query, "before", &self.before);
        query
    }
}

impl TwitchApi {
    /// List a channel's subscribers. Requires channel:read:subscriptions.
    pub async fn get_broadcaster_subscriptions(
        &self,
        req: &GetSubscriptionsRequest,
    ) -> Result<SubscriptionsResponse, TransportError> {
        let body = self.http.get("/subscriptions", &req.query()).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Check whether a user subscribes to a channel. Requires user:read:subscriptions.
    pub async fn check_user_subscription(
        &self,
        broadcaster_id: &str,
        user_id: &str,
    ) -> Result<UserSubscriptionResponse, TransportError> {
        let query = vec![
            ("broadcaster_id", broadcaster_id.to_string()),
            ("user_id", user_id.to_string()),
        ];
        let body = self.http.get("/subscriptions/user", &query).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscriptions_fixture_deserializes() {
        let json = r#"{
            "data": [{
                "broadcaster_id": "141981764",
                "broadcaster_login": "twitchdev",
                "broadcaster_name": "TwitchDev",
                "gifter_id": "12826",
                "gifter_login": "twitch",
                "gifter_name": "Twitch",
                "is_gift": true,
                "tier": "1000",
                "plan_name": "Channel Subscription (twitchdev)",
                "user_id": "527115020",
                "user_login": "twitchgaming",
                "user_name": "twitchgaming"
            }],
            "pagination": {"cursor": "xxxx"},
            "total": 13,
            "points": 13
        }"#;
        let resp: SubscriptionsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.total, 13);
        assert!(resp.data[0].is_gift);

        let copy = resp.clone();
        assert_eq!(copy.pagination.unwrap().cursor.as_deref(), Some("xxxx"));
    }
}
