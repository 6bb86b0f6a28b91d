use serde::Deserialize;

use super::TwitchApi;
use super::models::{HelixResponse, Query, push_many, push_opt};
use twitch_http::TransportError;

/// Game or category entry.
#[derive(Debug, Clone, Deserialize)]
pub struct Game {
    pub id: String,
    pub name: String,
    pub box_art_url: String,
    #[serde(default)]
    pub igdb_id: String,
}

impl TwitchApi {
    /// Look up games by id, name, or IGDB id. At least one selector
    /// must be non-empty; up to 100 total.
    pub async fn get_games(
        &self,
        ids: &[String],
        names: &[String],
        igdb_ids: &[String],
    ) -> Result<HelixResponse<Game>, TransportError> {
        let mut query = Query::new();
        push_many(&mut query, "id", ids);
        push_many(&mut query, "name", names);
        push_many(&mut query, "igdb_id", igdb_ids);
        let body = self.http.get("/games", &query).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Get the games sorted by current viewership.
    pub async fn get_top_games(
        &self,
        first: Option<u32>,
        after: Option<&str>,
        before: Option<&str>,
    ) -> Result<HelixResponse<Game>, TransportError> {
        let mut query = Query::new();
        push_opt(&mut query, "first", &first);
        push_opt(&mut query, "after", &after.map(str::to_string));
        push_opt(&mut query, "before", &before.map(str::to_string));
        let body = self.http.get("/games/top", &query).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_fixture_tolerates_missing_igdb_id() {
        let json = r#"{"data": [{"id": "33214", "name": "Fortnite", "box_art_url": "https://example.com/art.jpg"}]}"#;
        let resp: HelixResponse<Game> = serde_json::from_str(json).unwrap();
        assert_eq!(resp.data[0].igdb_id, "");
    }
}
