use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::TwitchApi;
use super::models::{HelixResponse, Query, push_many_opt, push_opt};
use twitch_http::TransportError;

/// Clip metadata from GET /clips.
#[derive(Debug, Clone, Deserialize)]
pub struct Clip {
    pub id: String,
    pub url: String,
    pub embed_url: String,
    pub broadcaster_id: String,
    pub broadcaster_name: String,
    pub creator_id: String,
    pub creator_name: String,
    pub video_id: String,
    pub game_id: String,
    pub language: String,
    pub title: String,
    pub view_count: u64,
    pub created_at: DateTime<Utc>,
    pub thumbnail_url: String,
    pub duration: f64,
    #[serde(default)]
    pub vod_offset: Option<i64>,
    #[serde(default)]
    pub is_featured: bool,
}

/// Handle returned by POST /clips; the clip finishes rendering asynchronously.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedClip {
    pub id: String,
    pub edit_url: String,
}

/// Query params for GET /clips. Exactly one of `broadcaster_id`,
/// `game_id`, or `id` must be set.
#[derive(Debug, Clone, Default)]
pub struct GetClipsRequest {
    pub broadcaster_id: Option<String>,
    pub game_id: Option<String>,
    pub id: Option<Vec<String>>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub first: Option<u32>,
    pub before: Option<String>,
    pub after: Option<String>,
    pub is_featured: Option<bool>,
}

impl GetClipsRequest {
    fn query(&self) -> Query {
        let mut query = Query::new();
        push_opt(&mut query, "broadcaster_id", &self.broadcaster_id);
        push_opt(&mut query, "game_id", &self.game_id);
        push_many_opt(&mut query, "id", &self.id);
        if let Some(t) = &self.started_at {
            query.push(("started_at", t.to_rfc3339()));
        }
        if let Some(t) = &self.ended_at {
            query.push(("ended_at", t.to_rfc3339()));
        }
        push_opt(&mut query, "first", &self.first);
        push_opt(&mut query, "before", &self.before);
        push_opt(&mut query, "after", &self.after);
        push_opt(&mut query, "is_featured", &self.is_featured);
        query
    }
}

impl TwitchApi {
    /// Get clips by broadcaster, game, or id.
    pub async fn get_clips(
        &self,
        req: &GetClipsRequest,
    ) -> Result<HelixResponse<Clip>, TransportError> {
        let body = self.http.get("/clips", &req.query()).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Capture a clip from the broadcaster's live stream. Requires clips:edit.
    pub async fn create_clip(
        &self,
        broadcaster_id: &str,
        has_delay: bool,
    ) -> Result<HelixResponse<CreatedClip>, TransportError> {
        let mut query = vec![("broadcaster_id", broadcaster_id.to_string())];
        if has_delay {
            query.push(("has_delay", "true".into()));
        }
        let body = self.http.post_empty("/clips", &query).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_fixture_deserializes() {
        let json = r#"{
            "data": [{
                "id": "AwkwardClip",
                "url": "https://clips.twitch.tv/AwkwardClip",
                "embed_url": "https://clips.twitch.tv/embed?clip=AwkwardClip",
                "broadcaster_id": "67955580",
                "broadcaster_name": "ChewieMelodies",
                "creator_id": "53834192",
                "creator_name": "BlackNova03",
                "video_id": "205586603",
                "game_id": "488191",
                "language": "en",
                "title": "babymetal",
                "view_count": 10,
                "created_at": "2017-11-30T22:34:18Z",
                "thumbnail_url": "https://example.com/thumb.jpg",
                "duration": 60.0,
                "vod_offset": 480,
                "is_featured": false
            }],
            "pagination": {}
        }"#;
        let resp: HelixResponse<Clip> = serde_json::from_str(json).unwrap();
        assert_eq!(resp.data[0].vod_offset, Some(480));
        assert!(resp.pagination.unwrap().cursor.is_none());
    }
}
