use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TwitchApi;
use super::models::{HelixResponse, Query, push_many_opt, push_opt};
use twitch_http::TransportError;

/// Banned user entry from GET /moderation/banned.
#[derive(Debug, Clone, Deserialize)]
pub struct BannedUser {
    pub user_id: String,
    pub user_login: String,
    pub user_name: String,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub reason: String,
    pub moderator_id: String,
    pub moderator_login: String,
    pub moderator_name: String,
}

/// Query params for GET /moderation/banned.
#[derive(Debug, Clone, Default)]
pub struct GetBannedUsersRequest {
    pub broadcaster_id: String,
    pub user_id: Option<Vec<String>>,
    pub first: Option<u32>,
    pub before: Option<String>,
    pub after: Option<String>,
}

impl GetBannedUsersRequest {
    fn query(&self) -> Query {
        let mut query = vec![("broadcaster_id", self.broadcaster_id.clone())];
        push_many_opt(&mut query, "user_id", &self.user_id);
        push_opt(&mut query, "first", &self.first);
        push_opt(&mut query, "before", &self.before);
        push_opt(&mut query, "after", &self.after);
        query
    }
}

/// Ban request. The `data` payload is the body; ids go in the query.
#[derive(Debug, Clone)]
pub struct BanUserRequest {
    pub broadcaster_id: String,
    pub moderator_id: String,
    pub user_id: String,
    /// Seconds; `None` bans permanently.
    pub duration: Option<u64>,
    pub reason: Option<String>,
}

#[derive(Serialize)]
struct BanUserData<'a> {
    user_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'a str>,
}

/// Response from POST /moderation/bans.
#[derive(Debug, Clone, Deserialize)]
pub struct BanUserResponse {
    pub broadcaster_id: String,
    pub moderator_id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
}

/// Unban request entry from GET /moderation/unban_requests.
#[derive(Debug, Clone, Deserialize)]
pub struct UnbanRequest {
    pub id: String,
    pub broadcaster_id: String,
    pub broadcaster_login: String,
    pub broadcaster_name: String,
    pub moderator_id: String,
    pub moderator_login: String,
    pub moderator_name: String,
    pub user_id: String,
    pub user_login: String,
    pub user_name: String,
    pub text: String,
    /// pending, approved, denied, acknowledged, or canceled.
    pub status: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub resolved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub resolution_text: Option<String>,
}

/// Query params for GET /moderation/unban_requests.
#[derive(Debug, Clone, Default)]
pub struct GetUnbanRequestsRequest {
    pub broadcaster_id: String,
    pub moderator_id: String,
    pub status: Option<String>,
    pub user_id: Option<String>,
    pub first: Option<u32>,
    pub after: Option<String>,
}

impl GetUnbanRequestsRequest {
    fn query(&self) -> Query {
        let mut query = vec![
            ("broadcaster_id", self.broadcaster_id.clone()),
            ("moderator_id", self.moderator_id.clone()),
        ];
        push_opt(&mut query, "status", &self.status);
        push_opt(&mut query, "user_id", &self.user_id);
        push_opt(&mut query, "first", &self.first);
        push_opt(&mut query, "after", &self.after);
        query
    }
}

/// Query params for PATCH /moderation/unban_requests.
#[derive(Debug, Clone)]
pub struct ResolveUnbanRequestRequest {
    pub broadcaster_id: String,
    pub moderator_id: String,
    pub unban_request_id: String,
    /// approved or denied.
    pub status: String,
    pub resolution_text: Option<String>,
}

impl ResolveUnbanRequestRequest {
    fn query(&self) -> Query {
        let mut query = vec![
            ("broadcaster_id", self.broadcaster_id.clone()),
            ("moderator_id", self.moderator_id.clone()),
            ("unban_request_id", self.unban_request_id.clone()),
            ("status", self.status.clone()),
        ];
        push_opt(&mut query, "resolution_text", &self.resolution_text);
        query
    }
}

/// Blocked term entry.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockedTerm {
    pub broadcaster_id: String,
    pub moderator_id: String,
    pub id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Query params for GET /moderation/blocked_terms.
#[derive(Debug, Clone, Default)]
pub struct GetBlockedTermsRequest {
    pub broadcaster_id: String,
    pub moderator_id: String,
    pub first: Option<u32>,
    pub after: Option<String>,
}

impl GetBlockedTermsRequest {
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

/// AutoMod settings data.
#[derive(Debug, Clone, Deserialize)]
pub struct AutoModSettings {
    pub broadcaster_id: String,
    pub moderator_id: String,
    #[serde(default)]
    pub overall_level: Option<u8>,
    pub disability: u8,
    pub aggression: u8,
    pub sexuality_sex_or_gender: u8,
    pub misogyny: u8,
    pub bullying: u8,
    pub swearing: u8,
    pub race_ethnicity_or_religion: u8,
    pub sex_based_terms: u8,
}

/// Body for PUT /moderation/automod/settings; ids go in the query.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateAutoModSettingsRequest {
    #[serde(skip_serializing)]
    pub broadcaster_id: String,
    #[serde(skip_serializing)]
    pub moderator_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_level: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggression: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bullying: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disability: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub misogyny: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub race_ethnicity_or_religion: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sex_based_terms: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sexuality_sex_or_gender: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swearing: Option<u8>,
}

/// Body for POST /moderation/automod/message.
#[derive(Debug, Clone, Serialize)]
pub struct ManageHeldAutoModMessageRequest {
    pub user_id: String,
    pub msg_id: String,
    /// ALLOW or DENY.
    pub action: String,
}

/// Moderator entry from GET /moderation/moderators.
#[derive(Debug, Clone, Deserialize)]
pub struct Moderator {
    pub user_id: String,
    pub user_login: String,
    pub user_name: String,
}

/// Query params for GET /moderation/moderators.
#[derive(Debug, Clone, Default)]
pub struct GetModeratorsRequest {
    pub broadcaster_id: String,
    pub user_id: Option<Vec<String>>,
    pub first: Option<u32>,
    pub after: Option<String>,
}

impl GetModeratorsRequest {
    fn query(&self) -> Query {
        let mut query = vec![("broadcaster_id", self.broadcaster_id.clone())];
        push_many_opt(&mut query, "user_id", &self.user_id);
        push_opt(&mut query, "first", &self.first);
        push_opt(&mut query, "after", &self.after);
        query
    }
}

/// Shield mode status.
#[derive(Debug, Clone, Deserialize)]
pub struct ShieldModeStatus {
    pub is_active: bool,
    pub moderator_id: String,
    pub moderator_login: String,
    pub moderator_name: String,
    pub last_activated_at: DateTime<Utc>,
}

impl TwitchApi {
    /// Get banned users for a channel. Requires moderation:read.
    pub async fn get_banned_users(
        &self,
        req: &GetBannedUsersRequest,
    ) -> Result<HelixResponse<BannedUser>, TransportError> {
        let body = self.http.get("/moderation/banned", &req.query()).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Ban or timeout a user. Requires moderator:manage:banned_users.
    pub async fn ban_user(
        &self,
        req: &BanUserRequest,
    ) -> Result<HelixResponse<BanUserResponse>, TransportError> {
        let query = vec![
            ("broadcaster_id", req.broadcaster_id.clone()),
            ("moderator_id", req.moderator_id.clone()),
        ];
        let body = serde_json::json!({
            "data": BanUserData {
                user_id: &req.user_id,
                duration: req.duration,
                reason: req.reason.as_deref(),
            }
        });
        let resp = self.http.post("/moderation/bans", &query, &body).await?;
        Ok(serde_json::from_str(&resp)?)
    }

    /// Unban a user. Requires moderator:manage:banned_users.
    pub async fn unban_user(
        &self,
        broadcaster_id: &str,
        moderator_id: &str,
        user_id: &str,
    ) -> Result<(), TransportError> {
        let query = vec![
            ("broadcaster_id", broadcaster_id.to_string()),
            ("moderator_id", moderator_id.to_string()),
            ("user_id", user_id.to_string()),
        ];
        self.http.delete("/moderation/bans", &query).await
    }

    /// Get unban requests. Requires moderator:read:unban_requests.
    pub async fn get_unban_requests(
        &self,
        req: &GetUnbanRequestsRequest,
    ) -> Result<HelixResponse<UnbanRequest>, TransportError> {
        let body = self.http.get("/moderation/unban_requests", &req.query()).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Resolve an unban request. Requires moderator:manage:unban_requests.
    pub async fn resolve_unban_request(
        &self,
        req: &ResolveUnbanRequestRequest,
    ) -> Result<HelixResponse<UnbanRequest>, TransportError> {
        let body = self
            .http
            .patch_empty("/moderation/unban_requests", &req.query())
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Get blocked terms. Requires moderator:read:blocked_terms.
    pub async fn get_blocked_terms(
        &self,
        req: &GetBlockedTermsRequest,
    ) -> Result<HelixResponse<BlockedTerm>, TransportError> {
        let body = self.http.get("/moderation/blocked_terms", &req.query()).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Add a blocked term (2..=500 chars). Requires moderator:manage:blocked_terms.
    pub async fn add_blocked_term(
        &self,
        broadcaster_id: &str,
        moderator_id: &str,
        text: &str,
    ) -> Result<HelixResponse<BlockedTerm>, TransportError> {
        let query = vec![
            ("broadcaster_id", broadcaster_id.to_string()),
            ("moderator_id", moderator_id.to_string()),
        ];
        let body = serde_json::json!({ "text": text });
        let resp = self
            .http
            .post("/moderation/blocked_terms", &query, &body)
            .await?;
        Ok(serde_json::from_str(&resp)?)
    }

    /// Remove a blocked term. Requires moderator:manage:blocked_terms.
    pub async fn remove_blocked_term(
        &self,
        broadcaster_id: &str,
        moderator_id: &str,
        id: &str,
    ) -> Result<(), TransportError> {
        let query = vec![
            ("broadcaster_id", broadcaster_id.to_string()),
            ("moderator_id", moderator_id.to_string()),
            ("id", id.to_string()),
        ];
        self.http.delete("/moderation/blocked_terms", &query).await
    }

    /// Get AutoMod settings. Requires moderator:read:automod_settings.
    pub async fn get_automod_settings(
        &self,
        broadcaster_id: &str,
        moderator_id: &str,
    ) -> Result<HelixResponse<AutoModSettings>, TransportError> {
        let query = vec![
            ("broadcaster_id", broadcaster_id.to_string()),
            ("moderator_id", moderator_id.to_string()),
        ];
        let body = self.http.get("/moderation/automod/settings", &query).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Update AutoMod settings. Requires moderator:manage:automod_settings.
    pub async fn update_automod_settings(
        &self,
        req: &UpdateAutoModSettingsRequest,
    ) -> Result<HelixResponse<AutoModSettings>, TransportError> {
        let query = vec![
            ("broadcaster_id", req.broadcaster_id.clone()),
            ("moderator_id", req.moderator_id.clone()),
        ];
        let body = self
            .http
            .put("/moderation/automod/settings", &query, req)
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Allow or deny a message held by AutoMod. Requires moderator:manage:automod.
    pub async fn manage_held_automod_message(
        &self,
        req: &ManageHeldAutoModMessageRequest,
    ) -> Result<(), TransportError> {
        self.http.post("/moderation/automod/message", &[], req).await?;
        Ok(())
    }

    /// Get the channel's moderators. Requires moderation:read.
    pub async fn get_moderators(
        &self,
        req: &GetModeratorsRequest,
    ) -> Result<HelixResponse<Moderator>, TransportError> {
        let body = self.http.get("/moderation/moderators", &req.query()).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Add a moderator. Requires channel:manage:moderators.
    pub async fn add_moderator(
        &self,
        broadcaster_id: &str,
        user_id: &str,
    ) -> Result<(), TransportError> {
        let query = vec![
            ("broadcaster_id", broadcaster_id.to_string()),
            ("user_id", user_id.to_string()),
        ];
        self.http.post_empty("/moderation/moderators", &query).await?;
        Ok(())
    }

    /// Remove a moderator. Requires channel:manage:moderators.
    pub async fn remove_moderator(
        &self,
        broadcaster_id: &str,
        user_id: &str,
    ) -> Result<(), TransportError> {
        let query = vec![
            ("broadcaster_id", broadcaster_id.to_string()),
            ("user_id", user_id.to_string()),
        ];
        self.http.delete("/moderation/moderators", &query).await
    }

    /// Get shield mode status. Requires moderator:read:shield_mode.
    pub async fn get_shield_mode_status(
        &self,
        broadcaster_id: &str,
        moderator_id: &str,
    ) -> Result<HelixResponse<ShieldModeStatus>, TransportError> {
        let query = vec![
            ("broadcaster_id", broadcaster_id.to_string()),
            ("moderator_id", moderator_id.to_string()),
        ];
        let body = self.http.get("/moderation/shield_mode", &query).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Activate or deactivate shield mode. Requires moderator:manage:shield_mode.
    pub async fn update_shield_mode_status(
        &self,
        broadcaster_id: &str,
        moderator_id: &str,
        is_active: bool,
    ) -> Result<HelixResponse<ShieldModeStatus>, TransportError> {
        let query = vec![
            ("broadcaster_id", broadcaster_id.to_string()),
            ("moderator_id", moderator_id.to_string()),
        ];
        let body = serde_json::json!({ "is_active": is_active });
        let resp = self.http.put("/moderation/shield_mode", &query, &body).await?;
        Ok(serde_json::from_str(&resp)?)
    }

    /// Warn a chat user. Requires moderator:manage:warnings.
    pub async fn warn_chat_user(
        &self,
        broadcaster_id: &str,
        moderator_id: &str,
        user_id: &str,
        reason: &str,
    ) -> Result<(), TransportError> {
        let query = vec![
            ("broadcaster_id", broadcaster_id.to_string()),
            ("moderator_id", moderator_id.to_string()),
        ];
        let body = serde_json::json!({ "user_id": user_id, "reason": reason });
        self.http.post("/moderation/warnings", &query, &body).await?;
        Ok(())
    }

    /// Delete chat messages; no message id clears the whole chat.
    /// Requires moderator:manage:chat_messages.
    pub async fn delete_chat_messages(
        &self,
        broadcaster_id: &str,
        moderator_id: &str,
        message_id: Option<&str>,
    ) -> Result<(), TransportError> {
        let mut query = vec![
            ("broadcaster_id", broadcaster_id.to_string()),
            ("moderator_id", moderator_id.to_string()),
        ];
        push_opt(&mut query, "message_id", &message_id);
        self.http.delete("/moderation/chat", &query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banned_user_deserializes_from_fixture() {
        let body = r#"{
            "user_id": "123456",
            "user_login": "banneduser",
            "user_name": "BannedUser",
            "expires_at": "2024-12-31T23:59:59Z",
            "created_at": "2024-01-01T00:00:00Z",
            "reason": "Spam",
            "moderator_id": "789012",
            "moderator_login": "moduser",
            "moderator_name": "ModUser"
        }"#;
        let banned: BannedUser = serde_json::from_str(body).unwrap();
        assert_eq!(banned.reason, "Spam");
        assert!(banned.expires_at.is_some());
    }

    #[test]
    fn ban_user_data_omits_duration_for_permanent_bans() {
        let data = BanUserData {
            user_id: "9",
            duration: None,
            reason: Some("spam"),
        };
        let body = serde_json::to_value(&data).unwrap();
        assert_eq!(body, serde_json::json!({"user_id": "9", "reason": "spam"}));
    }
}
