// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! User activity leaderboard.
//!
//! Every navigation event earns its node name one point. Names keep the order
//! they were first seen in, then the list is stably sorted by points.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::BackendClient;
use crate::error::ApiError;
use crate::types::schema::NAV_NODES_TABLE;

/// Cache key of the leaderboard view.
pub const ACTIVITY_VIEW: &str = "activity";

const UNKNOWN_NAME: &str = "Unknown";
const UNKNOWN_CREATOR: &str = "—";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeaderboardEntry {
    pub name: String,
    pub points: u64,
    /// Creator of the first event seen under this name
    pub created_by: String,
    /// Points as a percentage of the top score
    pub share: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
    pub total_points: u64,
    pub total_users: usize,
    pub top_score: u64,
}

/// Only missing, null and `""` fall back; whitespace is a real value.
fn non_empty(v: Option<&Value>) -> Option<String> {
    match v? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Group nav-node rows into the leaderboard.
pub fn build_leaderboard(nodes: &[Value]) -> Leaderboard {
    let mut index: FxHashMap<String, usize> = FxHashMap::default();
    let mut entries: Vec<LeaderboardEntry> = Vec::new();

    for node in nodes {
        let name = non_empty(node.get("node_name")).unwrap_or_else(|| UNKNOWN_NAME.to_string());
        match index.get(&name) {
            Some(&i) => entries[i].points += 1,
            None => {
                index.insert(name.clone(), entries.len());
                entries.push(LeaderboardEntry {
                    name,
                    points: 1,
                    created_by: non_empty(node.get("created_by"))
                        .unwrap_or_else(|| UNKNOWN_CREATOR.to_string()),
                    share: 0.0,
                });
            }
        }
    }

    // sort_by is stable: ties keep first-seen order
    entries.sort_by(|a, b| b.points.cmp(&a.points));
    let top_score = entries.first().map(|e| e.points).unwrap_or(0);
    for e in &mut entries {
        e.share = if top_score > 0 {
            e.points as f64 / top_score as f64 * 100.0
        } else {
            0.0
        };
    }

    Leaderboard {
        total_points: nodes.len() as u64,
        total_users: entries.len(),
        top_score,
        entries,
    }
}

pub async fn fetch_activity(backend: &BackendClient) -> Result<Leaderboard, ApiError> {
    let nodes = backend
        .select_columns(NAV_NODES_TABLE, &["node_name", "created_by"])
        .await?;
    Ok(build_leaderboard(&nodes))
}
