// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Block / unblock panel for rooms and shops.
//!
//! The active flag lives in the `is_active` column of `ar_rooms` as `Y`/`N`;
//! toggling writes the flipped flag back through the backend.

use navme_floorplan::Floor;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::BackendClient;
use crate::error::ApiError;
use crate::types::schema::ROOMS_TABLE;
use crate::types::table_config;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShopStatus {
    pub room_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    /// From `pos_y`, when the room has a position
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floor: Option<Floor>,
    pub active: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ShopPanel {
    pub shops: Vec<ShopStatus>,
    pub active: usize,
    pub blocked: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToggleOutcome {
    pub shop: ShopStatus,
    pub message: String,
}

/// Interpret a stored active flag; anything but an explicit "no" is active.
pub fn is_active_flag(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => !matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "n" | "no" | "false" | "0"
        ),
        Some(Value::Number(n)) => n.as_i64() != Some(0),
        _ => true,
    }
}

pub fn flag(active: bool) -> &'static str {
    if active {
        "Y"
    } else {
        "N"
    }
}

fn text(v: Option<&Value>) -> Option<String> {
    match v? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Numeric value from a number or numeric string.
pub fn number(v: Option<&Value>) -> Option<f64> {
    let n: f64 = match v? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

pub fn shop_from_row(row: &Value) -> Option<ShopStatus> {
    let room_id = text(row.get("room_id"))?;
    Some(ShopStatus {
        name: text(row.get("room_name")).unwrap_or_else(|| format!("Room {room_id}")),
        room_id,
        category_id: text(row.get("category_id")),
        floor: number(row.get("pos_y")).map(Floor::classify),
        active: is_active_flag(row.get("is_active")),
    })
}

pub fn build_panel(rows: &[Value]) -> ShopPanel {
    let shops: Vec<ShopStatus> = rows.iter().filter_map(shop_from_row).collect();
    let active = shops.iter().filter(|s| s.active).count();
    ShopPanel {
        active,
        blocked: shops.len() - active,
        total: shops.len(),
        shops,
    }
}

pub async fn fetch_panel(backend: &BackendClient) -> Result<ShopPanel, ApiError> {
    let sort = table_config(ROOMS_TABLE).and_then(|c| c.default_sort.as_ref());
    let rows = backend.select_all(ROOMS_TABLE, sort).await?;
    Ok(build_panel(&rows))
}

/// Flip a room's active flag and persist it.
pub async fn toggle(backend: &BackendClient, room_id: &str) -> Result<ToggleOutcome, ApiError> {
    let rows = backend.select_all(ROOMS_TABLE, None).await?;
    let current = rows
        .iter()
        .filter_map(shop_from_row)
        .find(|s| s.room_id == room_id)
        .ok_or_else(|| ApiError::NotFound(format!("Room {room_id}")))?;

    let next = !current.active;
    let updated = backend
        .update(ROOMS_TABLE, "room_id", room_id, &json!({ "is_active": flag(next) }))
        .await?;

    let shop = updated
        .first()
        .and_then(shop_from_row)
        .unwrap_or(ShopStatus {
            active: next,
            ..current
        });
    let message = if shop.active {
        format!("{} is now active", shop.name)
    } else {
        format!("{} is now disabled", shop.name)
    };
    tracing::info!(room_id = %room_id, active = shop.active, "Toggled shop");

    Ok(ToggleOutcome { shop, message })
}
