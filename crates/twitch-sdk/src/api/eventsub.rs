use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TwitchApi;
use super::models::{Pagination, Query, push_opt};
use crate::eventsub::SubscriptionTransport;
use twitch_http::TransportError;

/// Transport descriptor on an EventSub subscription. For the websocket
/// method only `session_id` is sent; for webhooks, `callback` and
/// `secret`; for conduits, `conduit_id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransportDescriptor {
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conduit_id: Option<String>,
    #[serde(default, skip_serializing)]
    pub connected_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing)]
    pub disconnected_at: Option<DateTime<Utc>>,
}

impl TransportDescriptor {
    /// Transport bound to a live websocket session.
    pub fn websocket(session_id: impl Into<String>) -> Self {
        Self {
            method: "websocket".into(),
            session_id: Some(session_id.into()),
            ..Default::default()
        }
    }

    /// Webhook transport with the shared HMAC secret.
    pub fn webhook(callback: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            method: "webhook".into(),
            callback: Some(callback.into()),
            secret: Some(secret.into()),
            ..Default::default()
        }
    }

    pub fn conduit(conduit_id: impl Into<String>) -> Self {
        Self {
            method: "conduit".into(),
            conduit_id: Some(conduit_id.into()),
            ..Default::default()
        }
    }
}

/// Body for POST /eventsub/subscriptions.
#[derive(Debug, Clone, Serialize)]
pub struct CreateEventSubSubscriptionRequest {
    /// Subscription type name, e.g. "channel.follow".
    #[serde(rename = "type")]
    pub subscription_type: String,
    pub version: String,
    pub condition: serde_json::Value,
    pub transport: TransportDescriptor,
}

/// An EventSub subscription as Helix reports it.
#[derive(Debug, Clone, Deserialize)]
pub struct EventSubSubscription {
    pub id: String,
    /// enabled, webhook_callback_verification_pending, or one of the
    /// failure states such as authorization_revoked.
    pub status: String,
    #[serde(rename = "type")]
    pub subscription_type: String,
    pub version: String,
    pub condition: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub transport: TransportDescriptor,
    pub cost: u64,
}

/// Envelope for the subscription endpoints; carries cost accounting
/// beside the usual data/pagination pair.
#[derive(Debug, Clone, Deserialize)]
pub struct EventSubSubscriptionsResponse {
    pub data: Vec<EventSubSubscription>,
    pub total: i64,
    pub total_cost: i64,
    pub max_total_cost: i64,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

/// Query params for GET /eventsub/subscriptions. The selectors are
/// mutually exclusive.
#[derive(Debug, Clone, Default)]
pub struct GetEventSubSubscriptionsRequest {
    pub status: Option<String>,
    pub subscription_type: Option<String>,
    pub user_id: Option<String>,
    pub after: Option<String>,
}

impl GetEventSubSubscriptionsRequest {
    fn query(&self) -> Query {
        let mut query = Query::new();
        push_opt(&mut query, "status", &self.status);
        push_opt(&mut query, "type", &self.subscription_type);
        push_opt(&mut query, "user_id", &self.user_id);
        push_opt(&mut query, "after", &self.after);
        query
    }
}

/// Conduit for app-token event delivery.
#[derive(Debug, Clone, Deserialize)]
pub struct Conduit {
    pub id: String,
    pub shard_count: u32,
}

/// Shard of a conduit with its transport and health status.
#[derive(Debug, Clone, Deserialize)]
pub struct ConduitShard {
    pub id: String,
    pub status: String,
    pub transport: TransportDescriptor,
}

/// Shard assignment for PATCH /eventsub/conduits/shards.
#[derive(Debug, Clone, Serialize)]
pub struct ShardUpdate {
    pub id: String,
    pub transport: TransportDescriptor,
}

#[derive(Debug, Clone, Deserialize)]
struct DataEnvelope<T> {
    data: Vec<T>,
}

impl TwitchApi {
    /// Create an EventSub subscription with the user token. Websocket
    /// subscriptions must target a session in the `connected` state.
    pub async fn create_eventsub_subscription(
        &self,
        req: &CreateEventSubSubscriptionRequest,
    ) -> Result<EventSubSubscriptionsResponse, TransportError> {
        let body = self.http.post("/eventsub/subscriptions", &[], req).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Delete an EventSub subscription.
    pub async fn delete_eventsub_subscription(&self, id: &str) -> Result<(), TransportError> {
        let query = vec![("id", id.to_string())];
        self.http.delete("/eventsub/subscriptions", &query).await
    }

    /// List EventSub subscriptions created with the user token.
    pub async fn get_eventsub_subscriptions(
        &self,
        req: &GetEventSubSubscriptionsRequest,
    ) -> Result<EventSubSubscriptionsResponse, TransportError> {
        let body = self.http.get("/eventsub/subscriptions", &req.query()).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// List conduits owned by the client. App token only.
    pub async fn get_conduits(&self) -> Result<Vec<Conduit>, TransportError> {
        let body = self.http.get_app("/eventsub/conduits", &[]).await?;
        let resp: DataEnvelope<Conduit> = serde_json::from_str(&body)?;
        Ok(resp.data)
    }

    /// Create a conduit with the given shard count. App token only.
    pub async fn create_conduit(&self, shard_count: u32) -> Result<Vec<Conduit>, TransportError> {
        let body = serde_json::json!({ "shard_count": shard_count });
        let resp = self.http.post_app("/eventsub/conduits", &[], &body).await?;
        let resp: DataEnvelope<Conduit> = serde_json::from_str(&resp)?;
        Ok(resp.data)
    }

    /// Resize a conduit. App token only.
    pub async fn update_conduit(
        &self,
        id: &str,
        shard_count: u32,
    ) -> Result<Vec<Conduit>, TransportError> {
        let body = serde_json::json!({ "id": id, "shard_count": shard_count });
        let resp = self.http.patch_app("/eventsub/conduits", &[], &body).await?;
        let resp: DataEnvelope<Conduit> = serde_json::from_str(&resp)?;
        Ok(resp.data)
    }

    /// Delete a conduit and drop its subscriptions. App token only.
    pub async fn delete_conduit(&self, id: &str) -> Result<(), TransportError> {
        let query = vec![("id", id.to_string())];
        self.http.delete_app("/eventsub/conduits", &query).await
    }

    /// List shards of a conduit, optionally filtered by status. App token only.
    pub async fn get_conduit_shards(
        &self,
        conduit_id: &str,
        status: Option<&str>,
        after: Option<&str>,
    ) -> Result<Vec<ConduitShard>, TransportError> {
        let mut query = vec![("conduit_id", conduit_id.to_string())];
        push_opt(&mut query, "status", &status.map(str::to_string));
        push_opt(&mut query, "after", &after.map(str::to_string));
        let body = self.http.get_app("/eventsub/conduits/shards", &query).await?;
        let resp: DataEnvelope<ConduitShard> = serde_json::from_str(&body)?;
        Ok(resp.data)
    }

    /// Assign transports to conduit shards. App token only.
    pub async fn update_conduit_shards(
        &self,
        conduit_id: &str,
        shards: &[ShardUpdate],
    ) -> Result<Vec<ConduitShard>, TransportError> {
        let body = serde_json::json!({ "conduit_id": conduit_id, "shards": shards });
        let resp = self
            .http
            .patch_app("/eventsub/conduits/shards", &[], &body)
            .await?;
        let resp: DataEnvelope<ConduitShard> = serde_json::from_str(&resp)?;
        Ok(resp.data)
    }
}

// The websocket session drives subscription creation through this seam
// so tests can verify the handshake without touching Helix.
impl SubscriptionTransport for TwitchApi {
    async fn create_subscription(
        &self,
        subscription_type: &str,
        version: &str,
        condition: serde_json::Value,
        session_id: &str,
    ) -> Result<String, TransportError> {
        let req = CreateEventSubSubscriptionRequest {
            subscription_type: subscription_type.to_string(),
            version: version.to_string(),
            condition,
            transport: TransportDescriptor::websocket(session_id),
        };
        let resp = self.create_eventsub_subscription(&req).await?;
        resp.data
            .into_iter()
            .next()
            .map(|sub| sub.id)
            .ok_or_else(|| TransportError::Api {
                status: 200,
                message: "subscription created but response data was empty".into(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn websocket_transport_serializes_session_id_only() {
        let req = CreateEventSubSubscriptionRequest {
            subscription_type: "channel.follow".into(),
            version: "2".into(),
            condition: serde_json::json!({
                "broadcaster_user_id": "1234",
                "moderator_user_id": "1234",
            }),
            transport: TransportDescriptor::websocket("AgoQexAMPLE"),
        };
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body["type"], "channel.follow");
        assert_eq!(body["transport"]["method"], "websocket");
        assert_eq!(body["transport"]["session_id"], "AgoQexAMPLE");
        assert!(body["transport"].get("callback").is_none());
        assert!(body["transport"].get("secret").is_none());
    }

    #[test]
    fn subscriptions_response_fixture() {
        let json = r#"{
            "data": [{
                "id": "26b1c993-bfcf-44d9-b876-379dacafe75a",
                "status": "enabled",
                "type": "stream.online",
                "version": "1",
                "condition": {"broadcaster_user_id": "1234"},
                "created_at": "2023-06-29T17:20:33.860897266Z",
                "transport": {"method": "websocket", "session_id": "AgoQexAMPLE"},
                "cost": 0
            }],
            "total": 1,
            "total_cost": 0,
            "max_total_cost": 10
        }"#;
        let resp: EventSubSubscriptionsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.data[0].subscription_type, "stream.online");
        assert_eq!(resp.max_total_cost, 10);

        let copy = resp.clone();
        assert!(copy.pagination.is_none());
        assert_eq!(copy.data[0].id, resp.data[0].id);
    }
}
