// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Generic CRUD endpoints driven by the table registry.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::services::table_view::{clean_submission, form_defaults, form_from_row, list_view};
use crate::services::OVERVIEW_VIEW;
use crate::types::schema::nav_views;
use crate::types::{
    table_config, table_configs, FormQuery, LiveEvent, MutationResponse, NavView, TableConfig,
    TableQuery, TableRowsResponse,
};
use crate::AppState;

fn lookup(table: &str) -> Result<&'static TableConfig, ApiError> {
    table_config(table).ok_or_else(|| ApiError::UnknownTable(table.to_string()))
}

/// Current rows, read from the backend on every call. Rows also change
/// outside this server (presence heartbeats, the mobile app).
async fn load_rows(state: &AppState, config: &TableConfig) -> Result<Vec<Value>, ApiError> {
    state
        .backend
        .select_all(config.table_name, config.default_sort.as_ref())
        .await
}

/// Drop views derived from a table after a write, then tell live subscribers.
pub async fn refresh_table(state: &AppState, table: &'static str) {
    if state.cache.invalidate(OVERVIEW_VIEW).await {
        tracing::debug!(table = %table, "Overview counts invalidated");
    }
    state.publish(LiveEvent::Invalidated {
        table: table.to_string(),
    });
}

/// GET /api/v1/views - Sidebar views.
pub async fn views() -> Json<Vec<NavView>> {
    Json(nav_views())
}

/// GET /api/v1/tables - Every registered table with its columns.
pub async fn schema() -> Json<&'static [TableConfig]> {
    Json(table_configs())
}

/// GET /api/v1/tables/:table - One page of rows.
pub async fn list(
    State(state): State<AppState>,
    Path(table): Path<String>,
    Query(query): Query<TableQuery>,
) -> Result<Json<TableRowsResponse>, ApiError> {
    let config = lookup(&table)?;
    let rows = load_rows(&state, config).await?;
    let view = list_view(
        config,
        &rows,
        query.search.as_deref(),
        query.page.unwrap_or(0),
    );
    Ok(Json(view))
}

/// GET /api/v1/tables/:table/form - Initial values for the add or edit form.
///
/// Without `id` the form starts from column defaults; with it, from the
/// current row, blanks as `""`.
pub async fn form(
    State(state): State<AppState>,
    Path(table): Path<String>,
    Query(query): Query<FormQuery>,
) -> Result<Json<Map<String, Value>>, ApiError> {
    let config = lookup(&table)?;
    let Some(id) = query.id.filter(|id| !id.is_empty()) else {
        return Ok(Json(form_defaults(config)));
    };

    let rows = load_rows(&state, config).await?;
    let row = rows
        .iter()
        .find(|row| match row.get(config.primary_key) {
            Some(Value::String(s)) => *s == id,
            Some(Value::Number(n)) => n.to_string() == id,
            _ => false,
        })
        .ok_or_else(|| ApiError::NotFound(format!("{} {id}", config.display_name)))?;
    Ok(Json(form_from_row(config, row)))
}

/// POST /api/v1/tables/:table - Insert a row from form values.
pub async fn insert(
    State(state): State<AppState>,
    Path(table): Path<String>,
    Json(form): Json<Map<String, Value>>,
) -> Result<(StatusCode, Json<MutationResponse>), ApiError> {
    let config = lookup(&table)?;
    let row = clean_submission(config, &form).map_err(|e| e.during("add"))?;
    let rows = state
        .backend
        .insert(config.table_name, &Value::Object(row))
        .await
        .map_err(|e| e.during("add"))?;

    tracing::info!(table = %config.table_name, "Row added");
    refresh_table(&state, config.table_name).await;
    Ok((
        StatusCode::CREATED,
        Json(MutationResponse::new("Row added successfully", rows)),
    ))
}

/// PATCH /api/v1/tables/:table/:id - Update a row by primary key.
pub async fn update(
    State(state): State<AppState>,
    Path((table, id)): Path<(String, String)>,
    Json(form): Json<Map<String, Value>>,
) -> Result<Json<MutationResponse>, ApiError> {
    let config = lookup(&table)?;
    let row = clean_submission(config, &form).map_err(|e| e.during("update"))?;
    let rows = state
        .backend
        .update(config.table_name, config.primary_key, &id, &Value::Object(row))
        .await
        .map_err(|e| e.during("update"))?;

    tracing::info!(table = %config.table_name, id = %id, "Row updated");
    refresh_table(&state, config.table_name).await;
    Ok(Json(MutationResponse::new("Row updated successfully", rows)))
}

/// DELETE /api/v1/tables/:table/:id - Delete a row by primary key.
pub async fn remove(
    State(state): State<AppState>,
    Path((table, id)): Path<(String, String)>,
) -> Result<Json<MutationResponse>, ApiError> {
    let config = lookup(&table)?;
    state
        .backend
        .delete(config.table_name, config.primary_key, &id)
        .await
        .map_err(|e| e.during("delete"))?;

    tracing::info!(table = %config.table_name, id = %id, "Row deleted");
    refresh_table(&state, config.table_name).await;
    Ok(Json(MutationResponse::new("Row deleted successfully", Vec::new())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{call_json, MockBackend};
    use axum::http::Method;
    use serde_json::json;

    const CATEGORIES: &str = "ar_room_categories";

    fn categories(n: usize) -> Vec<Value> {
        (1..=n)
            .map(|i| json!({"category_id": i, "category_name": format!("Cat {i}"), "created_at": "2024-01-02T03:04:05Z"}))
            .collect()
    }

    #[tokio::test]
    async fn test_list_pages_and_searches() {
        let mock = MockBackend::spawn(vec![(CATEGORIES, categories(20))]).await;
        let state = mock.app_state();

        let (status, body) =
            call_json(state.clone(), Method::GET, "/api/v1/tables/ar_room_categories?page=1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 20);
        assert_eq!(body["total_pages"], 2);
        assert_eq!(body["rows"].as_array().unwrap().len(), 5);
        assert_eq!(body["range_label"], "16–20 of 20 entries");
        assert_eq!(body["cells"][0]["created_at"], "02 Jan 2024, 03:04");

        let (_, body) = call_json(
            state,
            Method::GET,
            "/api/v1/tables/ar_room_categories?search=CAT%202",
            None,
        )
        .await;
        assert_eq!(body["total"], 2);
    }

    #[tokio::test]
    async fn test_list_sees_external_changes() {
        let users = "ar_user_presence";
        let mock = MockBackend::spawn(vec![(
            users,
            vec![json!({"user_id": 1, "user_name": "Asha", "last_seen_at": "2024-01-01T10:00:00Z"})],
        )])
        .await;
        let state = mock.app_state();

        let (_, body) = call_json(state.clone(), Method::GET, "/api/v1/tables/ar_user_presence", None).await;
        assert_eq!(body["total"], 1);
        assert_eq!(body["cells"][0]["last_seen_at"], "01 Jan 2024, 10:00");
        assert_eq!(body["status_columns"], json!(["share_enabled"]));

        // heartbeat and a new sign-up written by another client
        mock.set_rows(
            users,
            vec![
                json!({"user_id": 1, "user_name": "Asha", "last_seen_at": "2024-01-01T12:30:00Z"}),
                json!({"user_id": 2, "user_name": "Ravi", "last_seen_at": "2024-01-01T12:00:00Z"}),
            ],
        );
        let (_, body) = call_json(state.clone(), Method::GET, "/api/v1/tables/ar_user_presence", None).await;
        assert_eq!(body["total"], 2);
        let seen: Vec<&str> = body["cells"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["last_seen_at"].as_str().unwrap())
            .collect();
        assert!(seen.contains(&"01 Jan 2024, 12:30"));
        assert!(!seen.contains(&"01 Jan 2024, 10:00"));

        let (status, body) = call_json(
            state,
            Method::GET,
            "/api/v1/tables/ar_user_presence/form?id=2",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user_name"], "Ravi");
    }

    #[tokio::test]
    async fn test_unknown_table() {
        let mock = MockBackend::spawn(vec![]).await;
        let (status, body) =
            call_json(mock.app_state(), Method::GET, "/api/v1/tables/pg_users", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "UNKNOWN_TABLE");
    }

    #[tokio::test]
    async fn test_insert_update_delete() {
        let mock = MockBackend::spawn(vec![(CATEGORIES, categories(1))]).await;
        let state = mock.app_state();
        call_json(state.clone(), Method::GET, "/api/v1/overview", None).await;
        assert!(state.cache.entry(OVERVIEW_VIEW).await.is_some());
        let mut rx = state.live.subscribe();

        let (status, body) = call_json(
            state.clone(),
            Method::POST,
            "/api/v1/tables/ar_room_categories",
            Some(json!({"category_id": "2", "category_name": "Kitchen", "icon_class": ""})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Row added successfully");
        assert_eq!(mock.rows(CATEGORIES)[1]["icon_class"], Value::Null);
        assert!(matches!(rx.recv().await.unwrap(), LiveEvent::Invalidated { .. }));
        // overview counts are dropped until the next fetch
        assert!(state.cache.entry(OVERVIEW_VIEW).await.is_none());
        let (_, body) = call_json(state.clone(), Method::GET, "/api/v1/tables/ar_room_categories", None).await;
        assert_eq!(body["total"], 2);

        let (status, body) = call_json(
            state.clone(),
            Method::PATCH,
            "/api/v1/tables/ar_room_categories/2",
            Some(json!({"category_id": "2", "category_name": "Pantry"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Row updated successfully");
        assert_eq!(mock.rows(CATEGORIES)[1]["category_name"], "Pantry");

        let (status, body) = call_json(
            state,
            Method::DELETE,
            "/api/v1/tables/ar_room_categories/2",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Row deleted successfully");
        assert_eq!(mock.rows(CATEGORIES).len(), 1);
    }

    #[tokio::test]
    async fn test_validation_and_backend_failures() {
        let mock = MockBackend::spawn(vec![(CATEGORIES, vec![])]).await;
        let state = mock.app_state();

        let (status, body) = call_json(
            state.clone(),
            Method::POST,
            "/api/v1/tables/ar_room_categories",
            Some(json!({"category_name": ""})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body["error"],
            "Failed to add: Required field(s) missing: Category Name"
        );
        assert!(mock.rows(CATEGORIES).is_empty());

        mock.fail_table(CATEGORIES);
        let (status, body) = call_json(
            state.clone(),
            Method::POST,
            "/api/v1/tables/ar_room_categories",
            Some(json!({"category_name": "Dup"})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(
            body["error"],
            "Failed to add: duplicate key value violates unique constraint"
        );

        let (status, body) = call_json(
            state,
            Method::DELETE,
            "/api/v1/tables/ar_room_categories/1",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Failed to delete: cannot delete");
    }

    #[tokio::test]
    async fn test_form_values() {
        let offers = "ar_shop_offers";
        let mock = MockBackend::spawn(vec![
            (CATEGORIES, categories(2)),
            (offers, vec![]),
        ])
        .await;
        let state = mock.app_state();

        let (_, body) =
            call_json(state.clone(), Method::GET, "/api/v1/tables/ar_shop_offers/form", None).await;
        assert_eq!(body, json!({"is_active": "Y"}));

        let (status, body) = call_json(
            state.clone(),
            Method::GET,
            "/api/v1/tables/ar_room_categories/form?id=2",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["category_name"], "Cat 2");
        assert_eq!(body["icon_class"], "");
        assert!(body.get("created_at").is_none());

        let (status, _) = call_json(
            state,
            Method::GET,
            "/api/v1/tables/ar_room_categories/form?id=9",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_schema_and_views() {
        let mock = MockBackend::spawn(vec![]).await;
        let (_, body) = call_json(mock.app_state(), Method::GET, "/api/v1/tables", None).await;
        let tables = body.as_array().unwrap();
        assert_eq!(tables.len(), table_configs().len());
        assert_eq!(tables[0]["table_name"], CATEGORIES);
        assert_eq!(tables[0]["columns"][1]["type"], "text");

        let (_, body) = call_json(mock.app_state(), Method::GET, "/api/v1/views", None).await;
        assert_eq!(body[0]["path"], "/");
        assert_eq!(body[3]["label"], "Block Shops");
    }
}
