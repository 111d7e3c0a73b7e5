// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Response types for the API.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// One page of a table listing.
#[derive(Debug, Clone, Serialize)]
pub struct TableRowsResponse {
    pub table: String,
    /// Rows on this page, unmodified backend JSON.
    pub rows: Vec<Value>,
    /// Display strings per row, keyed by column, for listed columns only.
    pub cells: Vec<serde_json::Map<String, Value>>,
    /// Listed columns drawn as an active / inactive badge.
    pub status_columns: Vec<String>,
    /// Rows matching the search across all pages.
    pub total: usize,
    pub page: usize,
    pub total_pages: usize,
    /// e.g. "1–15 of 42 entries"
    pub range_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

/// Result of a create/update/delete.
#[derive(Debug, Clone, Serialize)]
pub struct MutationResponse {
    pub message: String,
    /// Rows returned by the backend, empty for deletes.
    pub rows: Vec<Value>,
}

impl MutationResponse {
    pub fn new(message: impl Into<String>, rows: Vec<Value>) -> Self {
        Self {
            message: message.into(),
            rows,
        }
    }
}

/// Server-Sent Event published whenever a cached view changes.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LiveEvent {
    /// A poller refreshed a view.
    Refreshed {
        /// Cache key of the view, e.g. `overview`.
        view: String,
        /// Unix milliseconds of the fetch.
        fetched_at: i64,
    },

    /// A mutation invalidated a table.
    Invalidated {
        table: String,
    },

    /// A poll failed; the previous value is still served.
    Stale {
        view: String,
        message: String,
    },
}

impl LiveEvent {
    pub fn view(&self) -> &str {
        match self {
            LiveEvent::Refreshed { view, .. } | LiveEvent::Stale { view, .. } => view,
            LiveEvent::Invalidated { table } => table,
        }
    }
}

/// A polled dashboard view as served from the read cache.
#[derive(Debug, Clone, Serialize)]
pub struct ViewResponse {
    pub view: String,
    pub fetched_at: DateTime<Utc>,
    /// False when this request had to fetch the view itself.
    pub from_cache: bool,
    pub data: Value,
}
