// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! NavMe Admin Server - dashboard API for the NavMe indoor-AR venue.
//!
//! All persistent data lives in the hosted backend; this service reads and
//! writes it over REST, keeps in-memory read caches refreshed by pollers and
//! renders the visitor heatmap over the floor plan.
//!
//! # Endpoints
//!
//! - `GET /api/v1/health` - Health check
//! - `GET /api/v1/views` - Sidebar views
//! - `GET /api/v1/tables` - Table schema registry
//! - `GET|POST /api/v1/tables/:table` - List (`?search=&page=`) or insert rows
//! - `GET /api/v1/tables/:table/form` - Add / edit form values (`?id=`)
//! - `PATCH|DELETE /api/v1/tables/:table/:id` - Update or delete a row
//! - `GET /api/v1/overview` - Row counts
//! - `GET /api/v1/activity` - Leaderboard
//! - `GET /api/v1/heatmap` - Visitor heatmap (JSON)
//! - `GET /api/v1/heatmap/floorplan.svg` - Visitor heatmap (SVG)
//! - `GET /api/v1/shops` - Block / unblock panel
//! - `POST /api/v1/shops/:id/toggle` - Flip a shop's active flag
//! - `GET /api/v1/live` - Refresh events (SSE)

use axum::{
    http::{HeaderValue, StatusCode},
    routing::{get, patch, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod routes;
mod services;
mod types;

#[cfg(test)]
mod test_support;

use config::Config;
use services::{BackendClient, ReadCache};
use types::LiveEvent;

/// Buffered live events per subscriber before the slowest one lags.
const LIVE_CHANNEL_CAPACITY: usize = 64;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub backend: BackendClient,
    pub cache: Arc<ReadCache>,
    pub live: broadcast::Sender<LiveEvent>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let backend = BackendClient::new(&config.rest_url(), &config.backend_key);
        let (live, _) = broadcast::channel(LIVE_CHANNEL_CAPACITY);
        Self {
            config: Arc::new(config),
            backend,
            cache: Arc::new(ReadCache::new()),
            live,
        }
    }

    /// Send to every live subscriber; a no-op when nobody listens.
    pub fn publish(&self, event: LiveEvent) {
        if self.live.send(event).is_err() {
            tracing::trace!("No live subscribers");
        }
    }
}

fn cors_layer(config: &Config) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if config.cors_permissive() {
        return layer.allow_origin(Any);
    }
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

/// Build the full router with middleware.
pub fn app(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.request_timeout_secs);
    let cors = cors_layer(&state.config);

    Router::new()
        // Root endpoint - API information
        .route("/", get(routes::health::info))
        .route("/api/v1/health", get(routes::health::check))
        .route("/api/v1/views", get(routes::tables::views))
        // Generic CRUD
        .route("/api/v1/tables", get(routes::tables::schema))
        .route(
            "/api/v1/tables/:table",
            get(routes::tables::list).post(routes::tables::insert),
        )
        .route("/api/v1/tables/:table/form", get(routes::tables::form))
        .route(
            "/api/v1/tables/:table/:id",
            patch(routes::tables::update).delete(routes::tables::remove),
        )
        // Dashboard views
        .route("/api/v1/overview", get(routes::views::overview))
        .route("/api/v1/activity", get(routes::views::activity))
        .route("/api/v1/heatmap", get(routes::heatmap::heatmap))
        .route("/api/v1/heatmap/floorplan.svg", get(routes::heatmap::floorplan_svg))
        .route("/api/v1/shops", get(routes::shops::panel))
        .route("/api/v1/shops/:id/toggle", post(routes::shops::toggle))
        .route("/api/v1/live", get(routes::live::stream))
        // Middleware
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug,navme_admin_server=debug"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));
    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).pretty().init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = Config::from_env();

    tracing::info!(
        port = config.port,
        backend = %config.backend_url,
        overview_poll_secs = config.overview_poll_secs,
        activity_poll_secs = config.activity_poll_secs,
        "Starting NavMe Admin Server"
    );
    if config.backend_key.is_empty() {
        tracing::warn!("NAVME_BACKEND_KEY is not set, backend requests are unauthenticated");
    }

    let state = AppState::new(config.clone());

    services::spawn_poller(
        state.clone(),
        services::OVERVIEW_VIEW,
        config.overview_interval(),
        |s: AppState| async move { Ok(services::fetch_overview(&s.backend).await) },
    );
    services::spawn_poller(
        state.clone(),
        services::ACTIVITY_VIEW,
        config.activity_interval(),
        |s: AppState| async move { services::fetch_activity(&s.backend).await },
    );

    let app = app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
