use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TwitchApi;
use super::models::{HelixResponse, Query, push_many_opt, push_opt};
use twitch_http::TransportError;

/// Top predictor entry inside an outcome.
#[derive(Debug, Clone, Deserialize)]
pub struct Predictor {
    pub user_id: String,
    pub user_login: String,
    pub user_name: String,
    pub channel_points_used: u64,
    pub channel_points_won: Option<u64>,
}

/// Prediction outcome with its point totals.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictionOutcome {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub users: u64,
    #[serde(default)]
    pub channel_points: u64,
    #[serde(default)]
    pub top_predictors: Option<Vec<Predictor>>,
    /// BLUE or PINK.
    pub color: String,
}

/// Channel points prediction.
#[derive(Debug, Clone, Deserialize)]
pub struct Prediction {
    pub id: String,
    pub broadcaster_id: String,
    pub broadcaster_login: String,
    pub broadcaster_name: String,
    pub title: String,
    #[serde(default)]
    pub winning_outcome_id: Option<String>,
    pub outcomes: Vec<PredictionOutcome>,
    pub prediction_window: u64,
    /// ACTIVE, CANCELED, LOCKED, or RESOLVED.
    pub status: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub ended_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub locked_at: Option<DateTime<Utc>>,
}

/// Query params for GET /predictions.
#[derive(Debug, Clone, Default)]
pub struct GetPredictionsRequest {
    pub broadcaster_id: String,
    pub id: Option<Vec<String>>,
    pub first: Option<u32>,
    pub after: Option<String>,
}

impl GetPredictionsRequest {
    fn query(&self) -> Query {
        let mut query = vec![("broadcaster_id", self.broadcaster_id.clone())];
        push_many_opt(&mut query, "id", &self.id);
        push_opt(&mut query, "first", &self.first);
        push_opt(&mut query, "after", &self.after);
        query
    }
}

#[derive(Debug, Clone, Serialize)]
struct NewOutcome<'a> {
    title: &'a str,
}

/// Body for POST /predictions.
#[derive(Debug, Clone, Serialize)]
pub struct CreatePredictionRequest {
    pub broadcaster_id: String,
    /// At most 45 characters.
    pub title: String,
    /// 2 to 10 outcome titles, 25 characters each.
    #[serde(serialize_with = "serialize_outcomes")]
    pub outcomes: Vec<String>,
    /// 30 to 1800 seconds.
    pub prediction_window: u64,
}

fn serialize_outcomes<S>(outcomes: &[String], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_seq(outcomes.iter().map(|title| NewOutcome { title }))
}

/// Body for PATCH /predictions.
#[derive(Debug, Clone, Serialize)]
pub struct EndPredictionRequest {
    pub broadcaster_id: String,
    pub id: String,
    /// RESOLVED, CANCELED, or LOCKED.
    pub status: String,
    /// Required when status is RESOLVED.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winning_outcome_id: Option<String>,
}

impl TwitchApi {
    /// Get predictions. Requires channel:read:predictions or channel:manage:predictions.
    pub async fn get_predictions(
        &self,
        req: &GetPredictionsRequest,
    ) -> Result<HelixResponse<Prediction>, TransportError> {
        let body = self.http.get("/predictions", &req.query()).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Start a prediction. Requires channel:manage:predictions.
    pub async fn create_prediction(
        &self,
        req: &CreatePredictionRequest,
    ) -> Result<HelixResponse<Prediction>, TransportError> {
        let body = self.http.post("/predictions", &[], req).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Lock, resolve, or cancel a prediction. Requires channel:manage:predictions.
    pub async fn end_prediction(
        &self,
        req: &EndPredictionRequest,
    ) -> Result<HelixResponse<Prediction>, TransportError> {
        let body = self.http.patch("/predictions", &[], req).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_prediction_omits_winner_unless_set() {
        let req = EndPredictionRequest {
            broadcaster_id: "42".into(),
            id: "p1".into(),
            status: "CANCELED".into(),
            winning_outcome_id: None,
        };
        let body = serde_json::to_value(&req).unwrap();
        assert!(body.get("winning_outcome_id").is_none());
        assert_eq!(body["status"], "CANCELED");
    }
}
