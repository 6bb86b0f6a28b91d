use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::TwitchApi;
use super::models::{HelixResponse, Query, push_opt};
use twitch_http::TransportError;

/// Team member entry.
#[derive(Debug, Clone, Deserialize)]
pub struct TeamMember {
    pub user_id: String,
    pub user_login: String,
    pub user_name: String,
}

/// Team data from the /teams endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct Team {
    pub id: String,
    pub team_name: String,
    pub team_display_name: String,
    pub info: String,
    pub thumbnail_url: String,
    #[serde(default)]
    pub banner: Option<String>,
    #[serde(default)]
    pub background_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Present on GET /teams, absent on GET /teams/channel.
    #[serde(default)]
    pub users: Option<Vec<TeamMember>>,
}

impl TwitchApi {
    /// Look up a team by name or id; exactly one selector must be set.
    pub async fn get_teams(
        &self,
        name: Option<&str>,
        id: Option<&str>,
    ) -> Result<HelixResponse<Team>, TransportError> {
        let mut query = Query::new();
        push_opt(&mut query, "name", &name);
        push_opt(&mut query, "id", &id);
        let body = self.http.get("/teams", &query).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Get the teams a broadcaster is a member of.
    pub async fn get_channel_teams(
        &self,
        broadcaster_id: &str,
    ) -> Result<HelixResponse<Team>, TransportError> {
        let query = vec![("broadcaster_id", broadcaster_id.to_string())];
        let body = self.http.get("/teams/channel", &query).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_team_deserializes_without_member_list() {
        let json = r#"{
            "data": [{
                "id": "6358",
                "team_name": "livecoders",
                "team_display_name": "Live Coders",
                "info": "Streamers who code live.",
                "thumbnail_url": "https://example.com/thumb.png",
                "banner": null,
                "background_image_url": null,
                "created_at": "2019-02-11T12:09:22Z",
                "updated_at": "2020-11-18T18:44:48Z"
            }]
        }"#;
        let resp: HelixResponse<Team> = serde_json::from_str(json).unwrap();
        assert_eq!(resp.data[0].team_name, "livecoders");
        assert!(resp.data[0].users.is_none());
    }
}
