// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory stand-in for the backend's PostgREST surface, served by a tiny
//! axum router on an ephemeral localhost port.

use crate::config::Config;
use crate::services::BackendClient;
use crate::AppState;
use axum::{
    body::{to_bytes, Body, Bytes},
    extract::{Path, Query, State},
    http::{
        header::{CONTENT_RANGE, CONTENT_TYPE},
        HeaderMap, Method, Request, StatusCode,
    },
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

#[derive(Clone, Default)]
struct MockState {
    tables: Arc<Mutex<HashMap<String, Vec<Value>>>>,
    last_api_key: Arc<Mutex<Option<String>>>,
    failing: Arc<Mutex<Vec<String>>>,
}

impl MockState {
    fn is_failing(&self, table: &str) -> bool {
        table == MockBackend::FAILING_TABLE || self.failing.lock().unwrap().iter().any(|t| t == table)
    }
}

pub struct MockBackend {
    addr: SocketAddr,
    state: MockState,
}

impl MockBackend {
    pub const API_KEY: &'static str = "test-key";
    /// Every request against this table fails.
    pub const FAILING_TABLE: &'static str = "broken";

    pub async fn spawn(tables: Vec<(&str, Vec<Value>)>) -> Self {
        let state = MockState::default();
        {
            let mut map = state.tables.lock().unwrap();
            for (name, rows) in tables {
                map.insert(name.to_string(), rows);
            }
        }

        let app = Router::new()
            .route(
                "/rest/v1/:table",
                get(select).head(count).post(insert).patch(update).delete(remove),
            )
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn client(&self) -> BackendClient {
        BackendClient::new(&format!("http://{}/rest/v1", self.addr), Self::API_KEY)
    }

    pub fn config(&self) -> Config {
        let url = format!("http://{}", self.addr);
        Config::from_vars(|key| match key {
            "NAVME_BACKEND_URL" => Some(url.clone()),
            "NAVME_BACKEND_KEY" => Some(Self::API_KEY.to_string()),
            _ => None,
        })
    }

    pub fn app_state(&self) -> AppState {
        AppState::new(self.config())
    }

    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.state
            .tables
            .lock()
            .unwrap()
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    pub fn set_rows(&self, table: &str, rows: Vec<Value>) {
        self.state.tables.lock().unwrap().insert(table.to_string(), rows);
    }

    /// Make an existing table fail like [`Self::FAILING_TABLE`].
    pub fn fail_table(&self, table: &str) {
        self.state.failing.lock().unwrap().push(table.to_string());
    }

    pub fn last_api_key(&self) -> Option<String> {
        self.state.last_api_key.lock().unwrap().clone()
    }
}

fn failure(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message, "code": "MOCK" }))).into_response()
}

fn as_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn compare(a: &Value, b: &Value) -> Ordering {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => as_text(a).cmp(&as_text(b)),
    }
}

/// The `col=eq.value` filter of a mutation, if any.
fn eq_filter(params: &HashMap<String, String>) -> Option<(String, String)> {
    params.iter().find_map(|(k, v)| {
        v.strip_prefix("eq.")
            .filter(|_| k != "select")
            .map(|v| (k.clone(), v.to_string()))
    })
}

fn matches(row: &Value, filter: &(String, String)) -> bool {
    row.get(&filter.0).map(as_text).as_deref() == Some(filter.1.as_str())
}

async fn select(
    State(state): State<MockState>,
    Path(table): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    *state.last_api_key.lock().unwrap() = headers
        .get("apikey")
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    if state.is_failing(&table) {
        return failure(StatusCode::INTERNAL_SERVER_ERROR, "backend exploded");
    }
    let Some(mut rows) = state.tables.lock().unwrap().get(&table).cloned() else {
        return failure(StatusCode::NOT_FOUND, "relation does not exist");
    };

    if let Some((key, dir)) = params.get("order").and_then(|o| o.rsplit_once('.')) {
        rows.sort_by(|a, b| {
            let ord = compare(&a[key], &b[key]);
            if dir == "desc" {
                ord.reverse()
            } else {
                ord
            }
        });
    }
    if let Some(cols) = params.get("select").filter(|s| s.as_str() != "*") {
        let cols: Vec<&str> = cols.split(',').collect();
        rows = rows
            .into_iter()
            .map(|row| {
                let mut out = serde_json::Map::new();
                for c in &cols {
                    out.insert(c.to_string(), row.get(*c).cloned().unwrap_or(Value::Null));
                }
                Value::Object(out)
            })
            .collect();
    }
    Json(rows).into_response()
}

async fn count(State(state): State<MockState>, Path(table): Path<String>) -> Response {
    if state.is_failing(&table) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    let n = match state.tables.lock().unwrap().get(&table) {
        Some(rows) => rows.len(),
        None => return StatusCode::NOT_FOUND.into_response(),
    };
    let range = if n == 0 {
        "*/0".to_string()
    } else {
        format!("0-{}/{}", n - 1, n)
    };
    (StatusCode::OK, [(CONTENT_RANGE, range)]).into_response()
}

async fn insert(
    State(state): State<MockState>,
    Path(table): Path<String>,
    Json(row): Json<Value>,
) -> Response {
    if state.is_failing(&table) {
        return failure(StatusCode::CONFLICT, "duplicate key value violates unique constraint");
    }
    state
        .tables
        .lock()
        .unwrap()
        .entry(table)
        .or_default()
        .push(row.clone());
    (StatusCode::CREATED, Json(vec![row])).into_response()
}

async fn update(
    State(state): State<MockState>,
    Path(table): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    Json(updates): Json<Value>,
) -> Response {
    if state.is_failing(&table) {
        return failure(StatusCode::BAD_REQUEST, "invalid input syntax");
    }
    let Some(filter) = eq_filter(&params) else {
        return failure(StatusCode::BAD_REQUEST, "missing filter");
    };
    let mut tables = state.tables.lock().unwrap();
    let rows = tables.entry(table).or_default();
    let mut changed = Vec::new();
    for row in rows.iter_mut().filter(|r| matches(r, &filter)) {
        if let (Some(target), Some(src)) = (row.as_object_mut(), updates.as_object()) {
            for (k, v) in src {
                target.insert(k.clone(), v.clone());
            }
        }
        changed.push(row.clone());
    }
    Json(changed).into_response()
}

async fn remove(
    State(state): State<MockState>,
    Path(table): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if state.is_failing(&table) {
        return failure(StatusCode::BAD_REQUEST, "cannot delete");
    }
    let Some(filter) = eq_filter(&params) else {
        return failure(StatusCode::BAD_REQUEST, "missing filter");
    };
    if let Some(rows) = state.tables.lock().unwrap().get_mut(&table) {
        rows.retain(|r| !matches(r, &filter));
    }
    StatusCode::NO_CONTENT.into_response()
}

/// Send one request through the full router.
pub async fn call(
    state: AppState,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, HeaderMap, Bytes) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = crate::app(state).oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, bytes)
}

/// [`call`] and parse the body as JSON.
pub async fn call_json(
    state: AppState,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let (status, _, bytes) = call(state, method, uri, body).await;
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}
