// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Health check endpoint.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

const SERVICE: &str = "navme-admin-server";

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub service: &'static str,
    /// Whether a backend key is configured
    pub backend_auth: bool,
}

/// API information response.
#[derive(Debug, Serialize)]
pub struct ApiInfoResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    pub endpoints: Vec<EndpointInfo>,
}

/// Endpoint information.
#[derive(Debug, Serialize)]
pub struct EndpointInfo {
    pub method: &'static str,
    pub path: &'static str,
    pub description: &'static str,
}

const ENDPOINTS: [(&str, &str, &str); 15] = [
    ("GET", "/api/v1/health", "Health check endpoint"),
    ("GET", "/api/v1/views", "Navigable dashboard views"),
    ("GET", "/api/v1/tables", "Table schema registry"),
    ("GET", "/api/v1/tables/:table", "List rows (?search=&page=)"),
    ("POST", "/api/v1/tables/:table", "Insert a row"),
    ("GET", "/api/v1/tables/:table/form", "Initial add / edit form values (?id=)"),
    ("PATCH", "/api/v1/tables/:table/:id", "Update a row by primary key"),
    ("DELETE", "/api/v1/tables/:table/:id", "Delete a row by primary key"),
    ("GET", "/api/v1/overview", "Row counts per table"),
    ("GET", "/api/v1/activity", "User activity leaderboard"),
    ("GET", "/api/v1/heatmap", "Visitor heatmap (?floor=&preset=&from=&to=)"),
    ("GET", "/api/v1/heatmap/floorplan.svg", "Visitor heatmap rendered as SVG"),
    ("GET", "/api/v1/shops", "Block / unblock panel"),
    ("POST", "/api/v1/shops/:id/toggle", "Toggle a shop's active flag"),
    ("GET", "/api/v1/live", "Refresh events (Server-Sent Events)"),
];

/// GET /api/v1/health - Health check endpoint.
pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        service: SERVICE,
        backend_auth: !state.config.backend_key.is_empty(),
    })
}

/// GET / - API information endpoint.
pub async fn info() -> Json<ApiInfoResponse> {
    Json(ApiInfoResponse {
        service: SERVICE,
        version: env!("CARGO_PKG_VERSION"),
        description: "Admin API for the NavMe indoor-AR venue",
        endpoints: ENDPOINTS
            .iter()
            .map(|&(method, path, description)| EndpointInfo {
                method,
                path,
                description,
            })
            .collect(),
    })
}
