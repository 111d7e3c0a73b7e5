// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polled dashboard views served from the read cache.

use std::future::Future;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::error::ApiError;
use crate::services::{
    fetch_activity, fetch_overview, store_view, ACTIVITY_VIEW, OVERVIEW_VIEW,
};
use crate::types::ViewResponse;
use crate::AppState;

/// Serve `view` from the cache, running `fetch` only on a miss.
async fn serve_view<T, Fut>(
    state: &AppState,
    view: &'static str,
    fetch: Fut,
) -> Result<Json<ViewResponse>, ApiError>
where
    T: Serialize,
    Fut: Future<Output = Result<T, ApiError>>,
{
    if let Some(entry) = state.cache.entry(view).await {
        tracing::debug!(view = view, "Cache HIT");
        return Ok(Json(ViewResponse {
            view: view.to_string(),
            fetched_at: entry.fetched_at,
            from_cache: true,
            data: entry.value,
        }));
    }

    tracing::debug!(view = view, "Cache MISS - fetching");
    store_view(state, view, fetch.await).await?;
    let entry = state
        .cache
        .entry(view)
        .await
        .ok_or_else(|| ApiError::Internal(format!("View {view} missing after refresh")))?;
    Ok(Json(ViewResponse {
        view: view.to_string(),
        fetched_at: entry.fetched_at,
        from_cache: false,
        data: entry.value,
    }))
}

/// GET /api/v1/overview - Row counts per table.
pub async fn overview(State(state): State<AppState>) -> Result<Json<ViewResponse>, ApiError> {
    let backend = state.backend.clone();
    serve_view(&state, OVERVIEW_VIEW, async move {
        Ok(fetch_overview(&backend).await)
    })
    .await
}

/// GET /api/v1/activity - User activity leaderboard.
pub async fn activity(State(state): State<AppState>) -> Result<Json<ViewResponse>, ApiError> {
    let backend = state.backend.clone();
    serve_view(&state, ACTIVITY_VIEW, async move { fetch_activity(&backend).await }).await
}
