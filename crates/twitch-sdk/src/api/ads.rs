use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::TwitchApi;
use super::models::HelixResponse;
use twitch_http::TransportError;

/// Result of starting a commercial.
#[derive(Debug, Clone, Deserialize)]
pub struct CommercialStarted {
    pub length: u64,
    pub message: String,
    pub retry_after: u64,
}

/// Ad schedule snapshot for a channel.
#[derive(Debug, Clone, Deserialize)]
pub struct AdSchedule {
    #[serde(default)]
    pub next_ad_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_ad_at: Option<DateTime<Utc>>,
    pub duration: u64,
    pub preroll_free_time: u64,
    pub snooze_count: u64,
    #[serde(default)]
    pub snooze_refresh_at: Option<DateTime<Utc>>,
}

/// Result of snoozing the next ad.
#[derive(Debug, Clone, Deserialize)]
pub struct SnoozeResult {
    pub snooze_count: u64,
    #[serde(default)]
    pub snooze_refresh_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub next_ad_at: Option<DateTime<Utc>>,
}

impl TwitchApi {
    /// Start a commercial break. `length` is 1 to 180 seconds.
    /// Requires channel:edit:commercial.
    pub async fn start_commercial(
        &self,
        broadcaster_id: &str,
        length: u64,
    ) -> Result<HelixResponse<CommercialStarted>, TransportError> {
        let body = serde_json::json!({
            "broadcaster_id": broadcaster_id,
            "length": length,
        });
        let resp = self.http.post("/channels/commercial", &[], &body).await?;
        Ok(serde_json::from_str(&resp)?)
    }

    /// Get the channel's ad schedule. Requires channel:read:ads.
    pub async fn get_ad_schedule(
        &self,
        broadcaster_id: &str,
    ) -> Result<HelixResponse<AdSchedule>, TransportError> {
        let query = vec![("broadcaster_id", broadcaster_id.to_string())];
        let body = self.http.get("/channels/ads", &query).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Push back the next scheduled ad by 5 minutes. Requires channel:manage:ads.
    pub async fn snooze_next_ad(
        &self,
        broadcaster_id: &str,
    ) -> Result<HelixResponse<SnoozeResult>, TransportError> {
        let query = vec![("broadcaster_id", broadcaster_id.to_string())];
        let body = self.http.post_empty("/channels/ads/schedule/snooze", &query).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ad_schedule_tolerates_null_timestamps() {
        let json = r#"{
            "data": [{
                "next_ad_at": null,
                "last_ad_at": null,
                "duration": 60,
                "preroll_free_time": 0,
                "snooze_count": 3,
                "snooze_refresh_at": "2024-05-01T12:00:00Z"
            }]
        }"#;
        let resp: HelixResponse<AdSchedule> = serde_json::from_str(json).unwrap();
        assert!(resp.data[0].next_ad_at.is_none());
        assert_eq!(resp.data[0].snooze_count, 3);
    }
}
