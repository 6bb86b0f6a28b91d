use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::TwitchApi;
use super::models::{HelixResponse, Query, push_many, push_many_opt, push_opt};
use twitch_http::TransportError;

/// Muted segment in a VOD.
#[derive(Debug, Clone, Deserialize)]
pub struct MutedSegment {
    pub duration: u64,
    pub offset: u64,
}

/// Video data from GET /videos.
#[derive(Debug, Clone, Deserialize)]
pub struct Video {
    pub id: String,
    #[serde(default)]
    pub stream_id: Option<String>,
    pub user_id: String,
    pub user_login: String,
    pub user_name: String,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub published_at: DateTime<Utc>,
    pub url: String,
    pub thumbnail_url: String,
    pub viewable: String,
    pub view_count: u64,
    pub language: String,
    /// archive, highlight, or upload.
    #[serde(rename = "type")]
    pub video_type: String,
    /// Formatted like "3h8m33s".
    pub duration: String,
    #[serde(default)]
    pub muted_segments: Option<Vec<MutedSegment>>,
}

/// Query params for GET /videos. Exactly one of `id`, `user_id`, or
/// `game_id` must be set.
#[derive(Debug, Clone, Default)]
pub struct GetVideosRequest {
    pub id: Option<Vec<String>>,
    pub user_id: Option<String>,
    pub game_id: Option<String>,
    pub language: Option<String>,
    /// all, day, week, or month.
    pub period: Option<String>,
    /// time, trending, or views.
    pub sort: Option<String>,
    /// all, archive, highlight, or upload.
    pub video_type: Option<String>,
    pub first: Option<u32>,
    pub before: Option<String>,
    pub after: Option<String>,
}

impl GetVideosRequest {
    fn query(&self) -> Query {
        let mut query = Query::new();
        push_many_opt(&mut query, "id", &self.id);
        push_opt(&mut query, "user_id", &self.user_id);
        push_opt(&mut query, "game_id", &self.game_id);
        push_opt(&mut query, "language", &self.language);
        push_opt(&mut query, "period", &self.period);
        push_opt(&mut query, "sort", &self.sort);
        push_opt(&mut query, "type", &self.video_type);
        push_opt(&mut query, "first", &self.first);
        push_opt(&mut query, "before", &self.before);
        push_opt(&mut query, "after", &self.after);
        query
    }
}

#[derive(Debug, Deserialize)]
struct DeletedVideos {
    data: Vec<String>,
}

impl TwitchApi {
    /// Get videos by id, user, or game.
    pub async fn get_videos(
        &self,
        req: &GetVideosRequest,
    ) -> Result<HelixResponse<Video>, TransportError> {
        let body = self.http.get("/videos", &req.query()).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Delete up to 5 videos; returns the ids actually deleted.
    /// Requires channel:manage:videos.
    pub async fn delete_videos(&self, ids: &[String]) -> Result<Vec<String>, TransportError> {
        let mut query = Query::new();
        push_many(&mut query, "id", ids);
        let body = self.http.delete_returning("/videos", &query).await?;
        let resp: DeletedVideos = serde_json::from_str(&body)?;
        Ok(resp.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_fixture_deserializes() {
        let json = r#"{
            "data": [{
                "id": "335921245",
                "stream_id": null,
                "user_id": "141981764",
                "user_login": "twitchdev",
                "user_name": "TwitchDev",
                "title": "Twitch Developers 101",
                "description": "Welcome to Twitch development!",
                "created_at": "2018-11-14T21:30:18Z",
                "published_at": "2018-11-14T22:04:30Z",
                "url": "https://www.twitch.tv/videos/335921245",
                "thumbnail_url": "https://example.com/thumb-%{width}x%{height}.jpg",
                "viewable": "public",
                "view_count": 1863062,
                "language": "en",
                "type": "upload",
                "duration": "3m21s",
                "muted_segments": [{"duration": 30, "offset": 120}]
            }],
            "pagination": {}
        }"#;
        let resp: HelixResponse<Video> = serde_json::from_str(json).unwrap();
        assert_eq!(resp.data[0].video_type, "upload");
        assert_eq!(resp.data[0].muted_segments.as_ref().unwrap()[0].offset, 120);
    }

    #[test]
    fn get_videos_marshals_type_under_wire_name() {
        let req = GetVideosRequest {
            user_id: Some("141981764".into()),
            video_type: Some("archive".into()),
            ..Default::default()
        };
        let query = req.query();
        assert!(query.contains(&("type", "archive".to_string())));
        assert!(!query.iter().any(|(k, _)| *k == "video_type"));
    }
}
