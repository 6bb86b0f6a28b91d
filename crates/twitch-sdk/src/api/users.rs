use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TwitchApi;
use super::models::{HelixResponse, Query, push_many_opt, push_opt};
use twitch_http::TransportError;

/// User data from GET /users.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: String,
    pub login: String,
    pub display_name: String,
    /// staff, admin, global_mod, or empty.
    #[serde(default, rename = "type")]
    pub user_type: String,
    /// partner, affiliate, or empty.
    #[serde(default)]
    pub broadcaster_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub profile_image_url: String,
    #[serde(default)]
    pub offline_image_url: String,
    /// Present only with the user:read:email scope.
    #[serde(default)]
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Query params for GET /users. Empty returns the authenticated user.
#[derive(Debug, Clone, Default)]
pub struct GetUsersRequest {
    pub id: Option<Vec<String>>,
    pub login: Option<Vec<String>>,
}

impl GetUsersRequest {
    fn query(&self) -> Query {
        let mut query = Query::new();
        push_many_opt(&mut query, "id", &self.id);
        push_many_opt(&mut query, "login", &self.login);
        query
    }
}

/// Params for PUT /users.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Blocked user entry from GET /users/blocks.
#[derive(Debug, Clone, Deserialize)]
pub struct UserBlockTarget {
    pub user_id: String,
    pub user_login: String,
    pub display_name: String,
}

impl TwitchApi {
    /// Get information about one or more users.
    pub async fn get_users(&self, req: &GetUsersRequest) -> Result<HelixResponse<User>, TransportError> {
        let body = self.http.get("/users", &req.query()).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Update the authenticated user's description.
    pub async fn update_user(
        &self,
        req: &UpdateUserRequest,
    ) -> Result<HelixResponse<User>, TransportError> {
        let mut query = Query::new();
        push_opt(&mut query, "description", &req.description);
        let body = self.http.put_empty("/users", &query).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Get users the broadcaster has blocked. Requires user:read:blocked_users.
    pub async fn get_user_block_list(
        &self,
        broadcaster_id: &str,
        first: Option<u32>,
        after: Option<&str>,
    ) -> Result<HelixResponse<UserBlockTarget>, TransportError> {
        let mut query = vec![("broadcaster_id", broadcaster_id.to_string())];
        push_opt(&mut query, "first", &first);
        push_opt(&mut query, "after", &after);
        let body = self.http.get("/users/blocks", &query).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Block a user. Requires user:manage:blocked_users.
    pub async fn block_user(
        &self,
        target_user_id: &str,
        source_context: Option<&str>,
        reason: Option<&str>,
    ) -> Result<(), TransportError> {
        let mut query = vec![("target_user_id", target_user_id.to_string())];
        push_opt(&mut query, "source_context", &source_context);
        push_opt(&mut query, "reason", &reason);
        self.http.put_empty("/users/blocks", &query).await?;
        Ok(())
    }

    /// Unblock a user. Requires user:manage:blocked_users.
    pub async fn unblock_user(&self, target_user_id: &str) -> Result<(), TransportError> {
        let query = vec![("target_user_id", target_user_id.to_string())];
        self.http.delete("/users/blocks", &query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_deserializes_with_defaults() {
        let body = r#"{
            "id": "123456789",
            "login": "testuser",
            "display_name": "TestUser",
            "broadcaster_type": "affiliate",
            "created_at": "2020-01-01T00:00:00Z"
        }"#;
        let user: User = serde_json::from_str(body).unwrap();
        assert_eq!(user.login, "testuser");
        assert_eq!(user.broadcaster_type, "affiliate");
        assert_eq!(user.user_type, "");
        assert!(user.email.is_none());
    }

    #[test]
    fn get_users_marshals_ids_and_logins() {
        let req = GetUsersRequest {
            id: Some(vec!["123".into()]),
            login: Some(vec!["user1".into(), "user2".into()]),
        };
        assert_eq!(
            req.query(),
            vec![
                ("id", "123".to_string()),
                ("login", "user1".into()),
                ("login", "user2".into()),
            ]
        );
        assert!(GetUsersRequest::default().query().is_empty());
    }
}
