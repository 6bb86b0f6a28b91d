use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TwitchApi;
use super::models::{HelixResponse, Pagination, Query, push_many, push_many_opt, push_opt};
use twitch_http::TransportError;

/// Channel information from GET /channels.
#[derive(Debug, Clone, Deserialize)]
pub struct Channel {
    pub broadcaster_id: String,
    pub broadcaster_login: String,
    pub broadcaster_name: String,
    pub broadcaster_language: String,
    pub game_id: String,
    pub game_name: String,
    pub title: String,
    pub delay: u64,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub content_classification_labels: Vec<String>,
    #[serde(default)]
    pub is_branded_content: bool,
}

/// Body for PATCH /channels; `broadcaster_id` goes in the query string.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ModifyChannelInfoRequest {
    #[serde(skip_serializing)]
    pub broadcaster_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub broadcaster_language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_classification_labels: Option<Vec<serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_branded_content: Option<bool>,
}

/// Channel editor entry from GET /channels/editors.
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelEditor {
    pub user_id: String,
    pub user_name: String,
    pub created_at: DateTime<Utc>,
}

/// Followed channel entry from GET /channels/followed.
#[derive(Debug, Clone, Deserialize)]
pub struct FollowedChannel {
    pub broadcaster_id: String,
    pub broadcaster_login: String,
    pub broadcaster_name: String,
    pub followed_at: DateTime<Utc>,
}

/// Query params for GET /channels/followed.
#[derive(Debug, Clone, Default)]
pub struct GetFollowedChannelsRequest {
    pub user_id: String,
    pub broadcaster_id: Option<String>,
    pub first: Option<u32>,
    pub after: Option<String>,
}

impl GetFollowedChannelsRequest {
    fn query(&self) -> Query {
        let mut query = vec![("user_id", self.user_id.clone())];
        push_opt(&mut query, "broadcaster_id", &self.broadcaster_id);
        push_opt(&mut query, "first", &self.first);
        push_opt(&mut query, "after", &self.after);
        query
    }
}

/// Follower entry from GET /channels/followers.
#[derive(Debug, Clone, Deserialize)]
pub struct Follower {
    pub user_id: String,
    pub user_login: String,
    pub user_name: String,
    pub followed_at: DateTime<Utc>,
}

/// Query params for GET /channels/followers.
#[derive(Debug, Clone, Default)]
pub struct GetChannelFollowersRequest {
    pub broadcaster_id: String,
    pub user_id: Option<String>,
    pub first: Option<u32>,
    pub after: Option<String>,
}

impl GetChannelFollowersRequest {
    fn query(&self) -> Query {
        let mut query = vec![("broadcaster_id", self.broadcaster_id.clone())];
        push_opt(&mut query, "user_id", &self.user_id);
        push_opt(&mut query, "first", &self.first);
        push_opt(&mut query, "after", &self.after);
        query
    }
}

/// Follower list with the channel-wide total.
#[derive(Debug, Deserialize)]
pub struct ChannelFollowersResponse {
    pub data: Vec<Follower>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
    pub total: i64,
}

/// VIP entry from GET /channels/vips.
#[derive(Debug, Clone, Deserialize)]
pub struct Vip {
    pub user_id: String,
    pub user_login: String,
    pub user_name: String,
}

/// Query params for GET /channels/vips.
#[derive(Debug, Clone, Default)]
pub struct GetVipsRequest {
    pub broadcaster_id: String,
    pub user_id: Option<Vec<String>>,
    pub first: Option<u32>,
    pub after: Option<String>,
}

impl GetVipsRequest {
    fn query(&self) -> Query {
        let mut query = vec![("broadcaster_id", self.broadcaster_id.clone())];
        push_many_opt(&mut query, "user_id", &self.user_id);
        push_opt(&mut query, "first", &self.first);
        push_opt(&mut query, "after", &self.after);
        query
    }
}

impl TwitchApi {
    /// Get channel information for one or more broadcasters.
    pub async fn get_channel_information(
        &self,
        broadcaster_ids: &[String],
    ) -> Result<HelixResponse<Channel>, TransportError> {
        let mut query = Query::new();
        push_many(&mut query, "broadcaster_id", broadcaster_ids);
        let body = self.http.get("/channels", &query).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Modify channel information. Requires channel:manage:broadcast.
    pub async fn modify_channel_information(
        &self,
        req: &ModifyChannelInfoRequest,
    ) -> Result<(), TransportError> {
        let query = vec![("broadcaster_id", req.broadcaster_id.clone())];
        self.http.patch("/channels", &query, req).await?;
        Ok(())
    }

    /// Get the channel's editors. Requires channel:read:editors.
    pub async fn get_channel_editors(
        &self,
        broadcaster_id: &str,
    ) -> Result<HelixResponse<ChannelEditor>, TransportError> {
        let query = vec![("broadcaster_id", broadcaster_id.to_string())];
        let body = self.http.get("/channels/editors", &query).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Get channels a user follows. Requires user:read:follows.
    pub async fn get_followed_channels(
        &self,
        req: &GetFollowedChannelsRequest,
    ) -> Result<HelixResponse<FollowedChannel>, TransportError> {
        let body = self.http.get("/channels/followed", &req.query()).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Get users following a channel. Requires moderator:read:followers.
    pub async fn get_channel_followers(
        &self,
        req: &GetChannelFollowersRequest,
    ) -> Result<ChannelFollowersResponse, TransportError> {
        let body = self.http.get("/channels/followers", &req.query()).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Get the channel's VIPs. Requires channel:read:vips or channel:manage:vips.
    pub async fn get_vips(
        &self,
        req: &GetVipsRequest,
    ) -> Result<HelixResponse<Vip>, TransportError> {
        let body = self.http.get("/channels/vips", &req.query()).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Add a VIP to the channel. Requires channel:manage:vips.
    pub async fn add_channel_vip(
        &self,
        broadcaster_id: &str,
        user_id: &str,
    ) -> Result<(), TransportError> {
        let query = vec![
            ("broadcaster_id", broadcaster_id.to_string()),
            ("user_id", user_id.to_string()),
        ];
        self.http.post_empty("/channels/vips", &query).await?;
        Ok(())
    }

    /// Remove a VIP from the channel. Requires channel:manage:vips.
    pub async fn remove_channel_vip(
        &self,
        broadcaster_id: &str,
        user_id: &str,
    ) -> Result<(), TransportError> {
        let query = vec![
            ("broadcaster_id", broadcaster_id.to_string()),
            ("user_id", user_id.to_string()),
        ];
        self.http.delete("/channels/vips", &query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn followers_response_carries_total() {
        let body = r#"{
            "data": [{
                "user_id": "1",
                "user_login": "alice",
                "user_name": "Alice",
                "followed_at": "2024-01-01T00:00:00Z"
            }],
            "pagination": { "cursor": "next-cursor" },
            "total": 120
        }"#;
        let parsed: ChannelFollowersResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.data.len(), 1);
        assert_eq!(parsed.total, 120);
        assert_eq!(
            parsed.pagination.and_then(|p| p.cursor).as_deref(),
            Some("next-cursor")
        );
    }

    #[test]
    fn modify_channel_body_excludes_broadcaster_id() {
        let req = ModifyChannelInfoRequest {
            broadcaster_id: "42".into(),
            title: Some("New title".into()),
            ..Default::default()
        };
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body, serde_json::json!({"title": "New title"}));
    }
}
