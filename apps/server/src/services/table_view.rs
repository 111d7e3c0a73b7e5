// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Generic list and form logic interpreted from [`TableConfig`].

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::types::{ColumnConfig, FieldType, TableConfig, TableRowsResponse};

/// Rows per list page.
pub const PAGE_SIZE: usize = 15;

/// Placeholder for null cells.
pub const EMPTY_CELL: &str = "—";

const STATUS_COLUMNS: [&str; 3] = ["is_active", "is_available", "share_enabled"];

/// Whether a column renders as a status badge.
fn is_status_column(key: &str) -> bool {
    STATUS_COLUMNS.contains(&key)
}

/// Initial values for a blank "add" form.
pub fn form_defaults(config: &TableConfig) -> Map<String, Value> {
    config
        .form_columns()
        .filter_map(|c| c.default_value.clone().map(|v| (c.key.to_string(), v)))
        .collect()
}

/// Form values for editing an existing row; missing and null become `""`.
pub fn form_from_row(config: &TableConfig, row: &Value) -> Map<String, Value> {
    config
        .form_columns()
        .map(|c| {
            let v = match row.get(c.key) {
                None | Some(Value::Null) => Value::from(""),
                Some(v) => v.clone(),
            };
            (c.key.to_string(), v)
        })
        .collect()
}

fn is_blank(v: Option<&Value>) -> bool {
    match v {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        _ => false,
    }
}

/// Turn submitted form values into the row sent to the backend.
///
/// Only form columns are kept. A blank optional field is sent as `null`; a
/// blank required field rejects the whole submission. Values are otherwise
/// passed through untouched.
pub fn clean_submission(
    config: &TableConfig,
    form: &Map<String, Value>,
) -> Result<Map<String, Value>, ApiError> {
    let mut cleaned = Map::new();
    let mut missing = Vec::new();

    for col in config.form_columns() {
        let value = form.get(col.key);
        if is_blank(value) {
            if col.required {
                missing.push(col.label);
            } else {
                cleaned.insert(col.key.to_string(), Value::Null);
            }
        } else if let Some(v) = value {
            cleaned.insert(col.key.to_string(), v.clone());
        }
    }

    if !missing.is_empty() {
        return Err(ApiError::Validation(format!(
            "Required field(s) missing: {}",
            missing.join(", ")
        )));
    }
    Ok(cleaned)
}

/// Plain string form of a JSON value, `None` for null.
fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Rows where any listed column contains `query`, case-insensitively.
pub fn search_rows<'a>(rows: &'a [Value], config: &TableConfig, query: &str) -> Vec<&'a Value> {
    let query = query.trim();
    if query.is_empty() {
        return rows.iter().collect();
    }
    let needle = query.to_lowercase();
    rows.iter()
        .filter(|row| {
            config.table_columns().any(|col| {
                row.get(col.key)
                    .and_then(text_of)
                    .map(|s| s.to_lowercase().contains(&needle))
                    .unwrap_or(false)
            })
        })
        .collect()
}

/// One page of a filtered list.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Zero-based, clamped to the last page
    pub page: usize,
    pub total: usize,
    pub total_pages: usize,
    pub range_label: String,
}

/// Slice `items` into [`PAGE_SIZE`] pages.
pub fn paginate<T: Clone>(items: &[T], page: usize) -> Page<T> {
    let total = items.len();
    let total_pages = total.div_ceil(PAGE_SIZE).max(1);
    let page = page.min(total_pages - 1);
    let start = page * PAGE_SIZE;
    let end = (start + PAGE_SIZE).min(total);

    let range_label = if total == 0 {
        "No entries".to_string()
    } else {
        format!("{}–{} of {} entries", start + 1, end, total)
    };

    Page {
        items: items.get(start..end).map(<[T]>::to_vec).unwrap_or_default(),
        page,
        total,
        total_pages,
        range_label,
    }
}

pub(crate) fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Display text for one cell.
pub fn format_cell(value: &Value, column: &ColumnConfig) -> String {
    let Some(raw) = text_of(value) else {
        return EMPTY_CELL.to_string();
    };

    match (column.field_type, value) {
        (FieldType::Datetime, Value::String(s)) => parse_timestamp(s)
            .map(|dt| dt.format("%d %b %Y, %H:%M").to_string())
            .unwrap_or(raw),
        (FieldType::Date, Value::String(s)) => parse_timestamp(s)
            .map(|dt| dt.format("%d %b %Y").to_string())
            .unwrap_or(raw),
        (FieldType::Select, _) => column
            .option_label(&raw)
            .map(str::to_string)
            .unwrap_or(raw),
        _ => raw,
    }
}

/// Build the list response: search, paginate, then format listed cells.
pub fn list_view(
    config: &TableConfig,
    rows: &[Value],
    search: Option<&str>,
    page: usize,
) -> TableRowsResponse {
    let matched = search_rows(rows, config, search.unwrap_or(""));
    let page = paginate(&matched, page);

    let cells: Vec<Map<String, Value>> = page
        .items
        .iter()
        .map(|row| {
            config
                .table_columns()
                .map(|col| {
                    let v = row.get(col.key).unwrap_or(&Value::Null);
                    (col.key.to_string(), Value::from(format_cell(v, col)))
                })
                .collect::<Map<String, Value>>()
        })
        .collect();

    let status_columns = config
        .table_columns()
        .filter(|col| is_status_column(col.key))
        .map(|col| col.key.to_string())
        .collect();

    TableRowsResponse {
        table: config.table_name.to_string(),
        rows: page.items.into_iter().cloned().collect(),
        cells,
        status_columns,
        total: page.total,
        page: page.page,
        total_pages: page.total_pages,
        range_label: page.range_label,
        search: search.map(str::to_string).filter(|s| !s.trim().is_empty()),
    }
}
