use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TwitchApi;
use super::models::{HelixResponse, Query, push_many_opt, push_opt};
use twitch_http::TransportError;

/// Stream data from GET /streams.
#[derive(Debug, Clone, Deserialize)]
pub struct Stream {
    pub id: String,
    pub user_id: String,
    pub user_login: String,
    pub user_name: String,
    pub game_id: String,
    pub game_name: String,
    /// "live" or empty.
    #[serde(rename = "type")]
    pub stream_type: String,
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub viewer_count: u64,
    pub started_at: DateTime<Utc>,
    pub language: String,
    pub thumbnail_url: String,
    pub is_mature: bool,
}

/// Query params for GET /streams.
#[derive(Debug, Clone, Default)]
pub struct GetStreamsRequest {
    pub user_id: Option<Vec<String>>,
    pub user_login: Option<Vec<String>>,
    pub game_id: Option<Vec<String>>,
    /// all or live.
    pub stream_type: Option<String>,
    pub language: Option<Vec<String>>,
    pub first: Option<u32>,
    pub before: Option<String>,
    pub after: Option<String>,
}

impl GetStreamsRequest {
    fn query(&self) -> Query {
        let mut query = Query::new();
        push_many_opt(&mut query, "user_id", &self.user_id);
        push_many_opt(&mut query, "user_login", &self.user_login);
        push_many_opt(&mut query, "game_id", &self.game_id);
        push_opt(&mut query, "type", &self.stream_type);
        push_many_opt(&mut query, "language", &self.language);
        push_opt(&mut query, "first", &self.first);
        push_opt(&mut query, "before", &self.before);
        push_opt(&mut query, "after", &self.after);
        query
    }
}

/// Body for POST /streams/markers.
#[derive(Debug, Clone, Serialize)]
pub struct CreateStreamMarkerRequest {
    pub user_id: String,
    /// At most 140 characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A marker placed in a live stream or VOD.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamMarker {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub position_seconds: u64,
    pub description: String,
}

/// Markers grouped per video.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoMarkers {
    pub video_id: String,
    pub markers: Vec<StreamMarker>,
}

/// Markers grouped per user, from GET /streams/markers.
#[derive(Debug, Clone, Deserialize)]
pub struct UserMarkers {
    pub user_id: String,
    pub user_login: String,
    pub user_name: String,
    pub videos: Vec<VideoMarkers>,
}

/// Query params for GET /streams/markers (one of user_id/video_id).
#[derive(Debug, Clone, Default)]
pub struct GetStreamMarkersRequest {
    pub user_id: Option<String>,
    pub video_id: Option<String>,
    pub first: Option<u32>,
    pub before: Option<String>,
    pub after: Option<String>,
}

impl GetStreamMarkersRequest {
    fn query(&self) -> Query {
        let mut query = Query::new();
        push_opt(&mut query, "user_id", &self.user_id);
        push_opt(&mut query, "video_id", &self.video_id);
        push_opt(&mut query, "first", &self.first);
        push_opt(&mut query, "before", &self.before);
        push_opt(&mut query, "after", &self.after);
        query
    }
}

/// Stream key from GET /streams/key.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamKey {
    pub stream_key: String,
}

impl TwitchApi {
    /// Get active streams matching the query.
    pub async fn get_streams(
        &self,
        req: &GetStreamsRequest,
    ) -> Result<HelixResponse<Stream>, TransportError> {
        let body = self.http.get("/streams", &req.query()).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Get live streams from channels the user follows. Requires user:read:follows.
    pub async fn get_followed_streams(
        &self,
        user_id: &str,
        first: Option<u32>,
        after: Option<&str>,
    ) -> Result<HelixResponse<Stream>, TransportError> {
        let mut query = vec![("user_id", user_id.to_string())];
        push_opt(&mut query, "first", &first);
        push_opt(&mut query, "after", &after);
        let body = self.http.get("/streams/followed", &query).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Create a marker in a live stream. Requires user:edit:broadcast.
    pub async fn create_stream_marker(
        &self,
        req: &CreateStreamMarkerRequest,
    ) -> Result<HelixResponse<StreamMarker>, TransportError> {
        let body = self.http.post("/streams/markers", &[], req).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Get stream markers for a VOD or live stream.
    pub async fn get_stream_markers(
        &self,
        req: &GetStreamMarkersRequest,
    ) -> Result<HelixResponse<UserMarkers>, TransportError> {
        let body = self.http.get("/streams/markers", &req.query()).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Get the channel's stream key. Requires channel:read:stream_key.
    pub async fn get_stream_key(
        &self,
        broadcaster_id: &str,
    ) -> Result<HelixResponse<StreamKey>, TransportError> {
        let query = vec![("broadcaster_id", broadcaster_id.to_string())];
        let body = self.http.get("/streams/key", &query).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_deserializes_from_fixture() {
        let body = r#"{
            "id": "40944868435",
            "user_id": "123456789",
            "user_login": "testuser",
            "user_name": "TestUser",
            "game_id": "509658",
            "game_name": "Just Chatting",
            "type": "live",
            "title": "Test Stream Title",
            "tags": ["English", "Programming"],
            "viewer_count": 1234,
            "started_at": "2024-01-15T10:00:00Z",
            "language": "en",
            "thumbnail_url": "https://example.com/thumb-{width}x{height}.jpg",
            "is_mature": false
        }"#;
        let stream: Stream = serde_json::from_str(body).unwrap();
        assert_eq!(stream.stream_type, "live");
        assert_eq!(stream.viewer_count, 1234);
        assert_eq!(stream.tags.len(), 2);
    }
}
