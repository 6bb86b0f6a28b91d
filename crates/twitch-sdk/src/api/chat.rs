use serde::{Deserialize, Serialize};

use super::TwitchApi;
use super::models::{HelixResponse, Pagination, Query, push_many, push_opt};
use twitch_http::TransportError;

/// Emote data from the /chat/emotes endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct Emote {
    pub id: String,
    pub name: String,
    pub images: serde_json::Value,
    pub format: Vec<String>,
    pub scale: Vec<String>,
    pub theme_mode: Vec<String>,
    #[serde(default)]
    pub emote_type: Option<String>,
    #[serde(default)]
    pub emote_set_id: Option<String>,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub tier: Option<String>,
}

/// Chat badge set from the /chat/badges endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct Badge {
    pub set_id: String,
    pub versions: Vec<serde_json::Value>,
}

/// Chat settings from GET /chat/settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatSettings {
    pub broadcaster_id: String,
    pub emote_mode: bool,
    pub follower_mode: bool,
    #[serde(default)]
    pub follower_mode_duration: Option<i64>,
    #[serde(default)]
    pub moderator_id: Option<String>,
    #[serde(default)]
    pub non_moderator_chat_delay: Option<bool>,
    #[serde(default)]
    pub non_moderator_chat_delay_duration: Option<i64>,
    pub slow_mode: bool,
    #[serde(default)]
    pub slow_mode_wait_time: Option<i64>,
    pub subscriber_mode: bool,
    pub unique_chat_mode: bool,
}

/// Body for PATCH /chat/settings; the id fields go in the query string.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateChatSettingsRequest {
    #[serde(skip_serializing)]
    pub broadcaster_id: String,
    #[serde(skip_serializing)]
    pub moderator_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emote_mode: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follower_mode: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follower_mode_duration: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub non_moderator_chat_delay: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub non_moderator_chat_delay_duration: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slow_mode: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slow_mode_wait_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscriber_mode: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_chat_mode: Option<bool>,
}

/// Chatter entry from GET /chat/chatters.
#[derive(Debug, Clone, Deserialize)]
pub struct Chatter {
    pub user_id: String,
    pub user_login: String,
    pub user_name: String,
}

/// Query params for GET /chat/chatters.
#[derive(Debug, Clone, Default)]
pub struct GetChattersRequest {
    pub broadcaster_id: String,
    pub moderator_id: String,
    pub first: Option<u32>,
    pub after: Option<String>,
}

impl GetChattersRequest {
    fn query(&self) -> Query {
        let mut query = vec![
            ("broadcaster_id", self.broadcaster_id.clone()),
            ("moderator_id", self.moderator_id.clone()),
        ];
        push_opt(&mut query, "first", &self.first);
        push_opt(&mut query, "after", &self.after);
        query
    }
}

/// Chatter list with the channel-wide total.
#[derive(Debug, Deserialize)]
pub struct ChattersResponse {
    pub data: Vec<Chatter>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
    pub total: i64,
}

/// Chat color entry from GET /chat/color.
#[derive(Debug, Clone, Deserialize)]
pub struct UserChatColor {
    pub user_id: String,
    pub user_login: String,
    pub user_name: String,
    pub color: String,
}

/// Query + body for POST /chat/announcements.
#[derive(Debug, Clone)]
pub struct SendAnnouncementRequest {
    pub broadcaster_id: String,
    pub moderator_id: String,
    pub message: String,
    /// blue, green, orange, purple, or primary.
    pub color: Option<String>,
}

/// Body for POST /chat/messages.
#[derive(Debug, Clone, Serialize)]
pub struct SendMessageRequest {
    pub broadcaster_id: String,
    pub sender_id: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_parent_message_id: Option<String>,
}

/// Response from POST /chat/messages.
#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageResponse {
    pub message_id: String,
    pub is_sent: bool,
    #[serde(default)]
    pub drop_reason: Option<serde_json::Value>,
}

impl TwitchApi {
    /// Get users in the broadcaster's chat. Requires moderator:read:chatters.
    pub async fn get_chatters(
        &self,
        req: &GetChattersRequest,
    ) -> Result<ChattersResponse, TransportError> {
        let body = self.http.get("/chat/chatters", &req.query()).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Get the channel's custom emotes.
    pub async fn get_channel_emotes(
        &self,
        broadcaster_id: &str,
    ) -> Result<HelixResponse<Emote>, TransportError> {
        let query = vec![("broadcaster_id", broadcaster_id.to_string())];
        let body = self.http.get("/chat/emotes", &query).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Get global emotes.
    pub async fn get_global_emotes(&self) -> Result<HelixResponse<Emote>, TransportError> {
        let body = self.http.get("/chat/emotes/global", &[]).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Get emotes from specific emote sets.
    pub async fn get_emote_sets(
        &self,
        emote_set_ids: &[String],
    ) -> Result<HelixResponse<Emote>, TransportError> {
        let mut query = Query::new();
        push_many(&mut query, "emote_set_id", emote_set_ids);
        let body = self.http.get("/chat/emotes/set", &query).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Get the channel's chat badges.
    pub async fn get_channel_chat_badges(
        &self,
        broadcaster_id: &str,
    ) -> Result<HelixResponse<Badge>, TransportError> {
        let query = vec![("broadcaster_id", broadcaster_id.to_string())];
        let body = self.http.get("/chat/badges", &query).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Get global chat badges.
    pub async fn get_global_chat_badges(&self) -> Result<HelixResponse<Badge>, TransportError> {
        let body = self.http.get("/chat/badges/global", &[]).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Get chat settings for a channel.
    pub async fn get_chat_settings(
        &self,
        broadcaster_id: &str,
        moderator_id: Option<&str>,
    ) -> Result<HelixResponse<ChatSettings>, TransportError> {
        let mut query = vec![("broadcaster_id", broadcaster_id.to_string())];
        push_opt(&mut query, "moderator_id", &moderator_id);
        let body = self.http.get("/chat/settings", &query).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Update chat settings. Requires moderator:manage:chat_settings.
    pub async fn update_chat_settings(
        &self,
        req: &UpdateChatSettingsRequest,
    ) -> Result<HelixResponse<ChatSettings>, TransportError> {
        let query = vec![
            ("broadcaster_id", req.broadcaster_id.clone()),
            ("moderator_id", req.moderator_id.clone()),
        ];
        let body = self.http.patch("/chat/settings", &query, req).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Send a chat announcement. Requires moderator:manage:announcements.
    pub async fn send_chat_announcement(
        &self,
        req: &SendAnnouncementRequest,
    ) -> Result<(), TransportError> {
        let query = vec![
            ("broadcaster_id", req.broadcaster_id.clone()),
            ("moderator_id", req.moderator_id.clone()),
        ];
        let mut body = serde_json::json!({ "message": req.message });
        if let Some(color) = &req.color {
            body["color"] = serde_json::Value::String(color.clone());
        }
        self.http.post("/chat/announcements", &query, &body).await?;
        Ok(())
    }

    /// Send a shoutout to another broadcaster. Requires moderator:manage:shoutouts.
    pub async fn send_shoutout(
        &self,
        from_broadcaster_id: &str,
        to_broadcaster_id: &str,
        moderator_id: &str,
    ) -> Result<(), TransportError> {
        let query = vec![
            ("from_broadcaster_id", from_broadcaster_id.to_string()),
            ("to_broadcaster_id", to_broadcaster_id.to_string()),
            ("moderator_id", moderator_id.to_string()),
        ];
        self.http.post_empty("/chat/shoutouts", &query).await?;
        Ok(())
    }

    /// Get the color used for users' names in chat.
    pub async fn get_user_chat_color(
        &self,
        user_ids: &[String],
    ) -> Result<HelixResponse<UserChatColor>, TransportError> {
        let mut query = Query::new();
        push_many(&mut query, "user_id", user_ids);
        let body = self.http.get("/chat/color", &query).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Update the user's chat color. Requires user:manage:chat_color.
    pub async fn update_user_chat_color(
        &self,
        user_id: &str,
        color: &str,
    ) -> Result<(), TransportError> {
        let query = vec![
            ("user_id", user_id.to_string()),
            ("color", color.to_string()),
        ];
        self.http.put_empty("/chat/color", &query).await?;
        Ok(())
    }

    /// Send a chat message. Requires user:write:chat.
    pub async fn send_chat_message(
        &self,
        req: &SendMessageRequest,
    ) -> Result<HelixResponse<SendMessageResponse>, TransportError> {
        let body = self.http.post("/chat/messages", &[], req).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chatters_response_deserializes_total_and_cursor() {
        let body = r#"{
            "data": [{
                "user_id": "1",
                "user_login": "alice",
                "user_name": "Alice"
            }],
            "pagination": { "cursor": "next-cursor" },
            "total": 120
        }"#;
        let parsed: ChattersResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.data[0].user_login, "alice");
        assert_eq!(parsed.total, 120);
    }

    #[test]
    fn update_chat_settings_body_keeps_only_changed_fields() {
        let req = UpdateChatSettingsRequest {
            broadcaster_id: "1".into(),
            moderator_id: "2".into(),
            slow_mode: Some(true),
            slow_mode_wait_time: Some(30),
            ..Default::default()
        };
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"slow_mode": true, "slow_mode_wait_time": 30})
        );
    }
}
