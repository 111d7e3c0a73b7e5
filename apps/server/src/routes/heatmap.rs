// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Heatmap endpoints.

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::ApiError;
use crate::services::{fetch_heatmap, render_heatmap_svg, Heatmap, HeatmapOptions};
use crate::types::HeatmapQuery;
use crate::AppState;

/// GET /api/v1/heatmap - Visits per room for one floor and hour range.
pub async fn heatmap(
    State(state): State<AppState>,
    Query(query): Query<HeatmapQuery>,
) -> Result<Json<Heatmap>, ApiError> {
    let opts = HeatmapOptions::from_query(&query)?;
    let heatmap = fetch_heatmap(&state.backend, opts).await?;
    Ok(Json(heatmap))
}

/// GET /api/v1/heatmap/floorplan.svg - The same heatmap drawn on the floor plan.
pub async fn floorplan_svg(
    State(state): State<AppState>,
    Query(query): Query<HeatmapQuery>,
) -> Result<Response, ApiError> {
    let opts = HeatmapOptions::from_query(&query)?;
    let heatmap = fetch_heatmap(&state.backend, opts).await?;
    let svg = render_heatmap_svg(&heatmap, query.compact)?;

    tracing::debug!(floor = %heatmap.floor, bytes = svg.len(), "Rendered floor plan");
    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg).into_response())
}
