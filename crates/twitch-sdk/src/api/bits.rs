use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::TwitchApi;
use super::models::{DateRange, HelixResponse, Query, push_many_opt, push_opt};
use twitch_http::TransportError;

/// Leaderboard entry for GET /bits/leaderboard.
#[derive(Debug, Clone, Deserialize)]
pub struct BitsLeaderboardEntry {
    pub user_id: String,
    pub user_login: String,
    pub user_name: String,
    pub rank: u64,
    pub score: u64,
}

/// Response envelope for the bits leaderboard; unlike most Helix
/// endpoints it carries `date_range` and a mandatory `total`.
#[derive(Debug, Clone, Deserialize)]
pub struct BitsLeaderboardResponse {
    pub data: Vec<BitsLeaderboardEntry>,
    #[serde(default)]
    pub date_range: Option<DateRange>,
    pub total: i64,
}

/// Query params for GET /bits/leaderboard.
#[derive(Debug, Clone, Default)]
pub struct GetBitsLeaderboardRequest {
    /// 1 to 100, default 10.
    pub count: Option<u32>,
    /// day, week, month, year, or all.
    pub period: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub user_id: Option<String>,
}

impl GetBitsLeaderboardRequest {
    fn query(&self) -> Query {
        let mut query = Query::new();
        push_opt(&mut query, "count", &self.count);
        push_opt(&mut query, "period", &self.period);
        if let Some(started_at) = &self.started_at {
            query.push(("started_at", started_at.to_rfc3339()));
        }
        push_opt(&mut query, "user_id", &self.user_id);
        query
    }
}

/// Cheermote tier inside a cheermote set.
#[derive(Debug, Clone, Deserialize)]
pub struct CheermoteTier {
    pub min_bits: u64,
    pub id: String,
    pub color: String,
    pub images: serde_json::Value,
    pub can_cheer: bool,
    pub show_in_bits_card: bool,
}

/// Cheermote set for GET /bits/cheermotes.
#[derive(Debug, Clone, Deserialize)]
pub struct Cheermote {
    pub prefix: String,
    pub tiers: Vec<CheermoteTier>,
    /// global_first_party, global_third_party, channel_custom, display_only, or sponsored.
    #[serde(rename = "type")]
    pub cheermote_type: String,
    pub order: u64,
    pub last_updated: DateTime<Utc>,
    pub is_charitable: bool,
}

#[derive(Debug, Clone, Deserialize)]
struct CheermotesResponse {
    data: Vec<Cheermote>,
}

/// Bits-in-extensions transaction from GET /extensions/transactions.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtensionTransaction {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub broadcaster_id: String,
    pub broadcaster_login: String,
    pub broadcaster_name: String,
    pub user_id: String,
    pub user_login: String,
    pub user_name: String,
    pub product_type: String,
    pub product_data: serde_json::Value,
}

/// Query params for GET /extensions/transactions.
#[derive(Debug, Clone, Default)]
pub struct GetExtensionTransactionsRequest {
    pub extension_id: String,
    pub id: Option<Vec<String>>,
    pub first: Option<u32>,
    pub after: Option<String>,
}

impl GetExtensionTransactionsRequest {
    fn query(&self) -> Query {
        let mut query = vec![("extension_id", self.extension_id.clone())];
        push_many_opt(&mut query, "id", &self.id);
        push_opt(&mut query, "first", &self.first);
        push_opt(&mut query, "after", &self.after);
        query
    }
}

impl TwitchApi {
    /// Get the bits leaderboard for the authenticated user's channel.
    /// Requires bits:read.
    pub async fn get_bits_leaderboard(
        &self,
        req: &GetBitsLeaderboardRequest,
    ) -> Result<BitsLeaderboardResponse, TransportError> {
        let body = self.http.get("/bits/leaderboard", &req.query()).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Get available cheermotes, globally or for one channel.
    pub async fn get_cheermotes(
        &self,
        broadcaster_id: Option<&str>,
    ) -> Result<Vec<Cheermote>, TransportError> {
        let mut query = Query::new();
        if let Some(id) = broadcaster_id {
            query.push(("broadcaster_id", id.to_string()));
        }
        let body = self.http.get("/bits/cheermotes", &query).await?;
        let resp: CheermotesResponse = serde_json::from_str(&body)?;
        Ok(resp.data)
    }

    /// Get bits transactions for an extension. App token only.
    pub async fn get_extension_transactions(
        &self,
        req: &GetExtensionTransactionsRequest,
    ) -> Result<HelixResponse<ExtensionTransaction>, TransportError> {
        let body = self
            .http
            .get_app("/extensions/transactions", &req.query())
            .await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaderboard_fixture_deserializes() {
        let json = r#"{
            "data": [
                {"user_id": "1", "user_login": "a", "user_name": "A", "rank": 1, "score": 12543}
            ],
            "date_range": {
                "started_at": "2024-01-01T00:00:00Z",
                "ended_at": "2024-01-08T00:00:00Z"
            },
            "total": 1
        }"#;
        let resp: BitsLeaderboardResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.total, 1);
        assert_eq!(resp.data[0].score, 12543);
        assert!(resp.date_range.is_some());
    }

    #[test]
    fn started_at_marshals_as_rfc3339() {
        let req = GetBitsLeaderboardRequest {
            started_at: Some("2024-01-01T00:00:00Z".parse().unwrap()),
            ..Default::default()
        };
        let query = req.query();
        assert!(query.iter().any(|(k, v)| *k == "started_at" && v.starts_with("2024-01-01")));
    }
}
