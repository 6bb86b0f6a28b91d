use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TwitchApi;
use super::models::{HelixResponse, Query, push_many_opt, push_opt};
use twitch_http::TransportError;

/// Single poll choice with its vote tallies.
#[derive(Debug, Clone, Deserialize)]
pub struct PollChoice {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub votes: u64,
    #[serde(default)]
    pub channel_points_votes: u64,
    #[serde(default)]
    pub bits_votes: u64,
}

/// Poll on a broadcaster channel.
#[derive(Debug, Clone, Deserialize)]
pub struct Poll {
    pub id: String,
    pub broadcaster_id: String,
    pub broadcaster_login: String,
    pub broadcaster_name: String,
    pub title: String,
    pub choices: Vec<PollChoice>,
    pub channel_points_voting_enabled: bool,
    pub channel_points_per_vote: u64,
    /// ACTIVE, COMPLETED, TERMINATED, ARCHIVED, MODERATED, or INVALID.
    pub status: String,
    pub duration: u64,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub ended_at: Option<DateTime<Utc>>,
}

/// Query params for GET /polls.
#[derive(Debug, Clone, Default)]
pub struct GetPollsRequest {
    pub broadcaster_id: String,
    pub id: Option<Vec<String>>,
    pub first: Option<u32>,
    pub after: Option<String>,
}

impl GetPollsRequest {
    fn query(&self) -> Query {
        let mut query = vec![("broadcaster_id", self.broadcaster_id.clone())];
        push_many_opt(&mut query, "id", &self.id);
        push_opt(&mut query, "first", &self.first);
        push_opt(&mut query, "after", &self.after);
        query
    }
}

#[derive(Debug, Clone, Serialize)]
struct NewPollChoice<'a> {
    title: &'a str,
}

/// Body for POST /polls.
#[derive(Debug, Clone, Serialize)]
pub struct CreatePollRequest {
    pub broadcaster_id: String,
    /// At most 60 characters.
    pub title: String,
    /// 2 to 5 choice titles, 25 characters each.
    #[serde(serialize_with = "serialize_choices")]
    pub choices: Vec<String>,
    /// 15 to 1800 seconds.
    pub duration: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_points_voting_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_points_per_vote: Option<u64>,
}

fn serialize_choices<S>(choices: &[String], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_seq(choices.iter().map(|title| NewPollChoice { title }))
}

impl TwitchApi {
    /// Get polls for a channel. Requires channel:read:polls or channel:manage:polls.
    pub async fn get_polls(
        &self,
        req: &GetPollsRequest,
    ) -> Result<HelixResponse<Poll>, TransportError> {
        let body = self.http.get("/polls", &req.query()).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Start a poll. Requires channel:manage:polls.
    pub async fn create_poll(
        &self,
        req: &CreatePollRequest,
    ) -> Result<HelixResponse<Poll>, TransportError> {
        let body = self.http.post("/polls", &[], req).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// End a poll early. `status` must be TERMINATED or ARCHIVED.
    pub async fn end_poll(
        &self,
        broadcaster_id: &str,
        id: &str,
        status: &str,
    ) -> Result<HelixResponse<Poll>, TransportError> {
        let body = serde_json::json!({
            "broadcaster_id": broadcaster_id,
            "id": id,
            "status": status,
        });
        let resp = self.http.patch("/polls", &[], &body).await?;
        Ok(serde_json::from_str(&resp)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_poll_wraps_choice_titles() {
        let req = CreatePollRequest {
            broadcaster_id: "42".into(),
            title: "Next game?".into(),
            choices: vec!["Factorio".into(), "Rimworld".into()],
            duration: 300,
            channel_points_voting_enabled: None,
            channel_points_per_vote: None,
        };
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body["choices"][0]["title"], "Factorio");
        assert_eq!(body["choices"][1]["title"], "Rimworld");
        assert!(body.get("channel_points_per_vote").is_none());
    }
}
