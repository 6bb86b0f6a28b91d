use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::TwitchApi;
use super::models::{HelixResponse, Query, push_opt};
use twitch_http::TransportError;

/// Channel hit from GET /search/channels.
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelSearchResult {
    pub broadcaster_language: String,
    pub broadcaster_login: String,
    pub display_name: String,
    pub game_id: String,
    pub game_name: String,
    pub id: String,
    pub is_live: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    pub thumbnail_url: String,
    pub title: String,
    /// Empty string when the channel is offline.
    #[serde(default)]
    pub started_at: Option<String>,
}

/// Category hit from GET /search/categories.
#[derive(Debug, Clone, Deserialize)]
pub struct CategorySearchResult {
    pub id: String,
    pub name: String,
    pub box_art_url: String,
}

/// Query params shared by the two search endpoints.
#[derive(Debug, Clone, Default)]
pub struct SearchRequest {
    pub query: String,
    pub first: Option<u32>,
    pub after: Option<String>,
    /// Only meaningful for channel search.
    pub live_only: Option<bool>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    fn query(&self, include_live_only: bool) -> Query {
        let mut query = vec![("query", self.query.clone())];
        push_opt(&mut query, "first", &self.first);
        push_opt(&mut query, "after", &self.after);
        if include_live_only {
            push_opt(&mut query, "live_only", &self.live_only);
        }
        query
    }
}

impl TwitchApi {
    /// Search channels by name fragment.
    pub async fn search_channels(
        &self,
        req: &SearchRequest,
    ) -> Result<HelixResponse<ChannelSearchResult>, TransportError> {
        let body = self.http.get("/search/channels", &req.query(true)).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Search game and stream categories.
    pub async fn search_categories(
        &self,
        req: &SearchRequest,
    ) -> Result<HelixResponse<CategorySearchResult>, TransportError> {
        let body = self.http.get("/search/categories", &req.query(false)).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl ChannelSearchResult {
    /// `started_at` is RFC 3339 for live channels and "" when offline.
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
            .as_deref()
            .filter(|raw| !raw.is_empty())
            .and_then(|raw| raw.parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn live_only_applies_to_channel_search_only() {
        let req = SearchRequest {
            query: "rust".into(),
            live_only: Some(true),
            ..Default::default()
        };
        assert!(req.query(true).iter().any(|(k, _)| *k == "live_only"));
        assert!(!req.query(false).iter().any(|(k, _)| *k == "live_only"));
    }

    #[test]
    fn empty_started_at_means_offline() {
        let json = r#"{
            "broadcaster_language": "en", "broadcaster_login": "a", "display_name": "A",
            "game_id": "1", "game_name": "Rust", "id": "2", "is_live": false,
            "thumbnail_url": "", "title": "t", "started_at": ""
        }"#;
        let hit: ChannelSearchResult = serde_json::from_str(json).unwrap();
        assert!(hit.started_at().is_none());
    }
}
