//! Shared response wrappers and query-marshaling helpers.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Generic wrapper for Helix responses with a `data` array.
#[derive(Debug, Deserialize)]
pub struct HelixResponse<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
    #[serde(default)]
    pub total: Option<i64>,
}

/// Pagination info in Helix responses.
#[derive(Debug, Clone, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub cursor: Option<String>,
}

/// Date range returned by leaderboard-style endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct DateRange {
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
}

/// Accumulated query pairs for one request.
pub(crate) type Query = Vec<(&'static str, String)>;

pub(crate) fn push_opt<T: ToString>(query: &mut Query, key: &'static str, value: &Option<T>) {
    if let Some(v) = value {
        query.push((key, v.to_string()));
    }
}

/// Repeated keys, e.g. `id=1&id=2`, the way Helix takes list parameters.
pub(crate) fn push_many(query: &mut Query, key: &'static str, values: &[String]) {
    for v in values {
        query.push((key, v.clone()));
    }
}

pub(crate) fn push_many_opt(query: &mut Query, key: &'static str, values: &Option<Vec<String>>) {
    if let Some(vs) = values {
        push_many(query, key, vs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helix_response_parses_without_pagination_or_total() {
        let body = r#"{"data": [{"id": "1"}, {"id": "2"}]}"#;
        let resp: HelixResponse<serde_json::Value> = serde_json::from_str(body).unwrap();
        assert_eq!(resp.data.len(), 2);
        assert!(resp.pagination.is_none());
        assert!(resp.total.is_none());
    }

    #[test]
    fn list_params_marshal_as_repeated_keys() {
        let mut query = Query::new();
        push_many(&mut query, "id", &["1".into(), "2".into()]);
        push_opt(&mut query, "first", &Some(20u32));
        push_opt::<u32>(&mut query, "after", &None);
        assert_eq!(
            query,
            vec![("id", "1".to_string()), ("id", "2".into()), ("first", "20".into())]
        );
    }
}
