// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Dashboard overview: row counts per table.

use futures::future::join_all;
use serde::{Deserialize, Serialize};

use super::BackendClient;
use crate::types::schema::NAV_NODES_TABLE;
use crate::types::table_configs;

/// Cache key of the overview view.
pub const OVERVIEW_VIEW: &str = "overview";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableCount {
    pub table: String,
    pub display_name: String,
    pub route: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Overview {
    pub tables: Vec<TableCount>,
    /// Navigation events logged by the AR client
    pub nav_nodes: u64,
    pub total_rows: u64,
}

/// Count that reads as zero when the backend call fails.
async fn count_or_zero(backend: &BackendClient, table: &str) -> u64 {
    match backend.count(table).await {
        Ok(n) => n,
        Err(e) => {
            tracing::warn!(table = %table, error = %e, "Count failed, reporting 0");
            0
        }
    }
}

/// Fetch every count concurrently.
pub async fn fetch_overview(backend: &BackendClient) -> Overview {
    let configs = table_configs();
    let (counts, nav_nodes) = tokio::join!(
        join_all(configs.iter().map(|c| count_or_zero(backend, c.table_name))),
        count_or_zero(backend, NAV_NODES_TABLE),
    );

    let tables: Vec<TableCount> = configs
        .iter()
        .zip(counts)
        .map(|(c, count)| TableCount {
            table: c.table_name.to_string(),
            display_name: c.display_name.to_string(),
            route: c.route.to_string(),
            count,
        })
        .collect();
    let total_rows = tables.iter().map(|t| t.count).sum();

    Overview {
        tables,
        nav_nodes,
        total_rows,
    }
}
