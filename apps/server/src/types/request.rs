// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Query-string types for the API.

use serde::Deserialize;

/// Options for table listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TableQuery {
    /// Case-insensitive substring filter over listed columns.
    #[serde(default)]
    pub search: Option<String>,

    /// Zero-based page index.
    #[serde(default)]
    pub page: Option<usize>,
}

/// Selects the row whose values pre-fill an edit form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormQuery {
    /// Primary key; absent for a blank "add" form.
    #[serde(default)]
    pub id: Option<String>,
}

/// Options for the heatmap views.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HeatmapQuery {
    /// `ground` or `first`; defaults to ground.
    #[serde(default)]
    pub floor: Option<String>,

    /// Named hour range, e.g. `morning` or `All Day`.
    #[serde(default)]
    pub preset: Option<String>,

    /// Custom range start hour, overrides the preset.
    #[serde(default)]
    pub from: Option<u32>,

    /// Custom range end hour.
    #[serde(default)]
    pub to: Option<u32>,

    /// Canvas size in pixels.
    #[serde(default)]
    pub width: Option<f64>,

    #[serde(default)]
    pub height: Option<f64>,

    /// Thin strokes and no labels.
    #[serde(default)]
    pub compact: bool,
}
