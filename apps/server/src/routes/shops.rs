// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Block / unblock endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::tables::refresh_table;
use crate::error::ApiError;
use crate::services::{shop_status, ShopPanel, ToggleOutcome};
use crate::types::schema::ROOMS_TABLE;
use crate::AppState;

/// GET /api/v1/shops - Every room with its active flag.
pub async fn panel(State(state): State<AppState>) -> Result<Json<ShopPanel>, ApiError> {
    Ok(Json(shop_status::fetch_panel(&state.backend).await?))
}

/// POST /api/v1/shops/:id/toggle - Block or unblock one room.
pub async fn toggle(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> Result<Json<ToggleOutcome>, ApiError> {
    let outcome = shop_status::toggle(&state.backend, &room_id).await?;
    refresh_table(&state, ROOMS_TABLE).await;
    Ok(Json(outcome))
}
