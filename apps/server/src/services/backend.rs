// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! REST client for the hosted backend's PostgREST surface.
//!
//! Every call is a single request with no retries. A non-success status is
//! turned into [`ApiError::Backend`], carrying the backend's own `message`
//! when the body is the usual PostgREST error object.

use crate::error::ApiError;
use crate::types::schema::DefaultSort;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_RANGE};
use serde::Deserialize;
use serde_json::Value;

const PREFER: &str = "Prefer";

/// PostgREST client.
#[derive(Debug, Clone)]
pub struct BackendClient {
    rest_url: String,
    api_key: String,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct BackendErrorBody {
    message: Option<String>,
    error: Option<String>,
}

impl BackendClient {
    /// Create a client for a PostgREST root such as `https://x.supabase.co/rest/v1`.
    pub fn new(rest_url: &str, api_key: &str) -> Self {
        Self {
            rest_url: rest_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            http: reqwest::Client::new(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.rest_url, table)
    }

    /// Build the `apikey` and bearer headers.
    fn auth_headers(&self) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        if self.api_key.is_empty() {
            return Ok(headers);
        }
        let key = HeaderValue::from_str(&self.api_key)
            .map_err(|e| ApiError::Internal(format!("Invalid API key header: {e}")))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.api_key))
            .map_err(|e| ApiError::Internal(format!("Invalid API key header: {e}")))?;
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);
        Ok(headers)
    }

    /// Pass successful responses through; convert the rest into errors.
    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<BackendErrorBody>(&body)
            .ok()
            .and_then(|b| b.message.or(b.error))
            .filter(|m| !m.is_empty())
            .or_else(|| Some(body.trim().to_string()).filter(|b| !b.is_empty()))
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });
        Err(ApiError::Backend {
            status: status.as_u16(),
            message,
        })
    }

    async fn rows(resp: reqwest::Response) -> Result<Vec<Value>, ApiError> {
        let resp = Self::check(resp).await?;
        let rows: Vec<Value> = resp.json().await?;
        Ok(rows)
    }

    /// `GET /{table}?select=*[&order=key.dir]`
    pub async fn select_all(
        &self,
        table: &str,
        sort: Option<&DefaultSort>,
    ) -> Result<Vec<Value>, ApiError> {
        let mut query: Vec<(&str, String)> = vec![("select", "*".into())];
        if let Some(sort) = sort {
            query.push(("order", format!("{}.{}", sort.key, sort.direction.as_str())));
        }

        let resp = self
            .http
            .get(self.table_url(table))
            .headers(self.auth_headers()?)
            .query(&query)
            .send()
            .await?;
        let rows = Self::rows(resp).await?;
        tracing::debug!(table = %table, rows = rows.len(), "Fetched table");
        Ok(rows)
    }

    /// `GET /{table}?select=a,b`
    pub async fn select_columns(&self, table: &str, columns: &[&str]) -> Result<Vec<Value>, ApiError> {
        let resp = self
            .http
            .get(self.table_url(table))
            .headers(self.auth_headers()?)
            .query(&[("select", columns.join(","))])
            .send()
            .await?;
        Self::rows(resp).await
    }

    /// Exact row count via `HEAD` and the `Content-Range` header.
    pub async fn count(&self, table: &str) -> Result<u64, ApiError> {
        let resp = self
            .http
            .head(self.table_url(table))
            .headers(self.auth_headers()?)
            .header(PREFER, "count=exact")
            .query(&[("select", "*")])
            .send()
            .await?;
        let resp = Self::check(resp).await?;

        let range = resp
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Internal(format!("No Content-Range in count of {table}")))?;
        parse_content_range(range)
            .ok_or_else(|| ApiError::Internal(format!("Malformed Content-Range: {range}")))
    }

    /// `POST /{table}`, returning the inserted rows.
    pub async fn insert(&self, table: &str, row: &Value) -> Result<Vec<Value>, ApiError> {
        let resp = self
            .http
            .post(self.table_url(table))
            .headers(self.auth_headers()?)
            .header(PREFER, "return=representation")
            .json(row)
            .send()
            .await?;
        let rows = Self::rows(resp).await?;
        tracing::info!(table = %table, "Inserted row");
        Ok(rows)
    }

    /// `PATCH /{table}?{pk}=eq.{id}`, returning the updated rows.
    pub async fn update(
        &self,
        table: &str,
        primary_key: &str,
        id: &str,
        updates: &Value,
    ) -> Result<Vec<Value>, ApiError> {
        let resp = self
            .http
            .patch(self.table_url(table))
            .headers(self.auth_headers()?)
            .header(PREFER, "return=representation")
            .query(&[(primary_key, format!("eq.{id}"))])
            .json(updates)
            .send()
            .await?;
        let rows = Self::rows(resp).await?;
        tracing::info!(table = %table, id = %id, matched = rows.len(), "Updated row");
        Ok(rows)
    }

    /// `DELETE /{table}?{pk}=eq.{id}`
    pub async fn delete(&self, table: &str, primary_key: &str, id: &str) -> Result<(), ApiError> {
        let resp = self
            .http
            .delete(self.table_url(table))
            .headers(self.auth_headers()?)
            .query(&[(primary_key, format!("eq.{id}"))])
            .send()
            .await?;
        Self::check(resp).await?;
        tracing::info!(table = %table, id = %id, "Deleted row");
        Ok(())
    }
}

/// Total from a `Content-Range` value: `0-9/42` or `*/42`.
pub fn parse_content_range(value: &str) -> Option<u64> {
    let (_, total) = value.trim().rsplit_once('/')?;
    total.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockBackend;
    use crate::types::schema::SortDirection;
    use serde_json::json;

    #[test]
    fn test_parse_content_range() {
        assert_eq!(parse_content_range("0-9/42"), Some(42));
        assert_eq!(parse_content_range("*/0"), Some(0));
        assert_eq!(parse_content_range("*/*"), None);
        assert_eq!(parse_content_range("garbage"), None);
    }

    #[tokio::test]
    async fn test_select_all_orders_and_authenticates() {
        let mock = MockBackend::spawn(vec![(
            "ar_room_categories",
            vec![
                json!({"category_id": "2", "category_name": "Bedroom"}),
                json!({"category_id": "1", "category_name": "Living"}),
            ],
        )])
        .await;
        let client = mock.client();

        let sort = DefaultSort {
            key: "category_id",
            direction: SortDirection::Asc,
        };
        let rows = client.select_all("ar_room_categories", Some(&sort)).await.unwrap();
        assert_eq!(rows[0]["category_id"], "1");
        assert_eq!(rows[1]["category_id"], "2");
        assert_eq!(mock.last_api_key().as_deref(), Some(MockBackend::API_KEY));
    }

    #[tokio::test]
    async fn test_count_reads_content_range() {
        let mock = MockBackend::spawn(vec![("ar_nav_nodes", vec![json!({}), json!({}), json!({})])]).await;
        assert_eq!(mock.client().count("ar_nav_nodes").await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_insert_update_delete() {
        let mock = MockBackend::spawn(vec![("ar_rooms", vec![json!({"room_id": 7, "is_active": "Y"})])]).await;
        let client = mock.client();

        let inserted = client
            .insert("ar_rooms", &json!({"room_id": 8, "is_active": "N"}))
            .await
            .unwrap();
        assert_eq!(inserted, vec![json!({"room_id": 8, "is_active": "N"})]);

        let updated = client
            .update("ar_rooms", "room_id", "7", &json!({"is_active": "N"}))
            .await
            .unwrap();
        assert_eq!(updated[0]["is_active"], "N");

        client.delete("ar_rooms", "room_id", "8").await.unwrap();
        assert_eq!(mock.rows("ar_rooms").len(), 1);
    }

    #[tokio::test]
    async fn test_backend_message_becomes_error() {
        let mock = MockBackend::spawn(vec![]).await;
        let err = mock
            .client()
            .insert(MockBackend::FAILING_TABLE, &json!({"x": 1}))
            .await
            .unwrap_err();
        match err {
            ApiError::Backend { status, message } => {
                assert_eq!(status, 409);
                assert_eq!(message, "duplicate key value violates unique constraint");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let client = BackendClient::new(&format!("http://127.0.0.1:{port}/rest/v1"), "");
        let err = client.select_all("ar_rooms", None).await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }
}
