use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TwitchApi;
use super::models::{HelixResponse, Query, push_many, push_many_opt, push_opt};
use twitch_http::TransportError;

/// Reward image URLs at the three scales Helix serves.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomRewardImage {
    pub url_1x: String,
    pub url_2x: String,
    pub url_4x: String,
}

/// Nested setting for max redemptions per stream.
#[derive(Debug, Clone, Deserialize)]
pub struct MaxPerStreamSetting {
    pub is_enabled: bool,
    pub max_per_stream: u64,
}

/// Nested setting for max redemptions per user per stream.
#[derive(Debug, Clone, Deserialize)]
pub struct MaxPerUserPerStreamSetting {
    pub is_enabled: bool,
    pub max_per_user_per_stream: u64,
}

/// Nested setting for global cooldown.
#[derive(Debug, Clone, Deserialize)]
pub struct GlobalCooldownSetting {
    pub is_enabled: bool,
    pub global_cooldown_seconds: u64,
}

/// Custom channel points reward.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomReward {
    pub broadcaster_id: String,
    pub broadcaster_login: String,
    pub broadcaster_name: String,
    pub id: String,
    pub title: String,
    pub prompt: String,
    pub cost: u64,
    #[serde(default)]
    pub image: Option<CustomRewardImage>,
    pub default_image: CustomRewardImage,
    pub background_color: String,
    pub is_enabled: bool,
    pub is_user_input_required: bool,
    pub max_per_stream_setting: MaxPerStreamSetting,
    pub max_per_user_per_stream_setting: MaxPerUserPerStreamSetting,
    pub global_cooldown_setting: GlobalCooldownSetting,
    pub is_paused: bool,
    pub is_in_stock: bool,
    pub should_redemptions_skip_request_queue: bool,
    #[serde(default)]
    pub redemptions_redeemed_current_stream: Option<u64>,
    #[serde(default)]
    pub cooldown_expires_at: Option<DateTime<Utc>>,
}

/// Query params for GET /channel_points/custom_rewards.
#[derive(Debug, Clone, Default)]
pub struct GetCustomRewardsRequest {
    pub broadcaster_id: String,
    pub id: Option<Vec<String>>,
    pub only_manageable_rewards: bool,
}

impl GetCustomRewardsRequest {
    fn query(&self) -> Query {
        let mut query = vec![("broadcaster_id", self.broadcaster_id.clone())];
        push_many_opt(&mut query, "id", &self.id);
        if self.only_manageable_rewards {
            query.push(("only_manageable_rewards", "true".into()));
        }
        query
    }
}

/// Body for POST /channel_points/custom_rewards; `broadcaster_id` goes in the query.
#[derive(Debug, Clone, Serialize)]
pub struct CreateCustomRewardRequest {
    #[serde(skip_serializing)]
    pub broadcaster_id: String,
    /// At most 45 characters.
    pub title: String,
    /// At least 1.
    pub cost: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    pub is_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    pub is_user_input_required: bool,
    pub is_max_per_stream_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_per_stream: Option<u64>,
    pub is_max_per_user_per_stream_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_per_user_per_stream: Option<u64>,
    pub is_global_cooldown_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_cooldown_seconds: Option<u64>,
    pub should_redemptions_skip_request_queue: bool,
}

impl CreateCustomRewardRequest {
    /// Minimal reward with the defaults the API applies.
    pub fn new(broadcaster_id: impl Into<String>, title: impl Into<String>, cost: u64) -> Self {
        Self {
            broadcaster_id: broadcaster_id.into(),
            title: title.into(),
            cost,
            prompt: None,
            is_enabled: true,
            background_color: None,
            is_user_input_required: false,
            is_max_per_stream_enabled: false,
            max_per_stream: None,
            is_max_per_user_per_stream_enabled: false,
            max_per_user_per_stream: None,
            is_global_cooldown_enabled: false,
            global_cooldown_seconds: None,
            should_redemptions_skip_request_queue: false,
        }
    }
}

/// Body for PATCH /channel_points/custom_rewards; ids go in the query.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateCustomRewardRequest {
    #[serde(skip_serializing)]
    pub broadcaster_id: String,
    #[serde(skip_serializing)]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_user_input_required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_max_per_stream_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_per_stream: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_max_per_user_per_stream_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_per_user_per_stream: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_global_cooldown_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_cooldown_seconds: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub should_redemptions_skip_request_queue: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_paused: Option<bool>,
}

/// Reward redemption entry.
#[derive(Debug, Clone, Deserialize)]
pub struct RewardRedemption {
    pub broadcaster_id: String,
    pub broadcaster_login: String,
    pub broadcaster_name: String,
    pub id: String,
    pub user_id: String,
    pub user_login: String,
    pub user_name: String,
    pub user_input: String,
    /// CANCELED, FULFILLED, or UNFULFILLED.
    pub status: String,
    pub redeemed_at: DateTime<Utc>,
    pub reward: serde_json::Value,
}

/// Query params for GET /channel_points/custom_rewards/redemptions.
#[derive(Debug, Clone, Default)]
pub struct GetCustomRewardRedemptionRequest {
    pub broadcaster_id: String,
    pub reward_id: String,
    pub id: Option<Vec<String>>,
    pub status: Option<String>,
    /// OLDEST or NEWEST.
    pub sort: Option<String>,
    pub first: Option<u32>,
    pub after: Option<String>,
}

impl GetCustomRewardRedemptionRequest {
    fn query(&self) -> Query {
        let mut query = vec![
            ("broadcaster_id", self.broadcaster_id.clone()),
            ("reward_id", self.reward_id.clone()),
        ];
        push_many_opt(&mut query, "id", &self.id);
        push_opt(&mut query, "status", &self.status);
        push_opt(&mut query, "sort", &self.sort);
        push_opt(&mut query, "first", &self.first);
        push_opt(&mut query, "after", &self.after);
        query
    }
}

/// Params for PATCH /channel_points/custom_rewards/redemptions.
#[derive(Debug, Clone)]
pub struct UpdateRedemptionStatusRequest {
    pub broadcaster_id: String,
    pub reward_id: String,
    pub id: Vec<String>,
    /// CANCELED or FULFILLED.
    pub status: String,
}

impl TwitchApi {
    /// Get custom rewards. Requires channel:read:redemptions or channel:manage:redemptions.
    pub async fn get_custom_rewards(
        &self,
        req: &GetCustomRewardsRequest,
    ) -> Result<HelixResponse<CustomReward>, TransportError> {
        let body = self
            .http
            .get("/channel_points/custom_rewards", &req.query())
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Create a custom reward. Requires channel:manage:redemptions.
    pub async fn create_custom_reward(
        &self,
        req: &CreateCustomRewardRequest,
    ) -> Result<HelixResponse<CustomReward>, TransportError> {
        let query = vec![("broadcaster_id", req.broadcaster_id.clone())];
        let body = self
            .http
            .post("/channel_points/custom_rewards", &query, req)
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Update a custom reward. Requires channel:manage:redemptions.
    pub async fn update_custom_reward(
        &self,
        req: &UpdateCustomRewardRequest,
    ) -> Result<HelixResponse<CustomReward>, TransportError> {
        let query = vec![
            ("broadcaster_id", req.broadcaster_id.clone()),
            ("id", req.id.clone()),
        ];
        let body = self
            .http
            .patch("/channel_points/custom_rewards", &query, req)
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Delete a custom reward. Requires channel:manage:redemptions.
    pub async fn delete_custom_reward(
        &self,
        broadcaster_id: &str,
        id: &str,
    ) -> Result<(), TransportError> {
        let query = vec![
            ("broadcaster_id", broadcaster_id.to_string()),
            ("id", id.to_string()),
        ];
        self.http.delete("/channel_points/custom_rewards", &query).await
    }

    /// Get redemptions for a custom reward.
    pub async fn get_custom_reward_redemption(
        &self,
        req: &GetCustomRewardRedemptionRequest,
    ) -> Result<HelixResponse<RewardRedemption>, TransportError> {
        let body = self
            .http
            .get("/channel_points/custom_rewards/redemptions", &req.query())
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Fulfill or cancel redemptions. Requires channel:manage:redemptions.
    pub async fn update_redemption_status(
        &self,
        req: &UpdateRedemptionStatusRequest,
    ) -> Result<HelixResponse<RewardRedemption>, TransportError> {
        let mut query = vec![
            ("broadcaster_id", req.broadcaster_id.clone()),
            ("reward_id", req.reward_id.clone()),
        ];
        push_many(&mut query, "id", &req.id);
        let body = serde_json::json!({ "status": req.status });
        let resp = self
            .http
            .patch("/channel_points/custom_rewards/redemptions", &query, &body)
            .await?;
        Ok(serde_json::from_str(&resp)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_reward_body_splits_away_broadcaster_id() {
        let req = CreateCustomRewardRequest::new("42", "Hydrate", 500);
        let body = serde_json::to_value(&req).unwrap();
        assert!(body.get("broadcaster_id").is_none());
        assert_eq!(body["title"], "Hydrate");
        assert_eq!(body["cost"], 500);
        assert_eq!(body["is_enabled"], true);
        assert!(body.get("prompt").is_none());
    }
}
