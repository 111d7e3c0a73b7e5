// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Backend access, caching and the dashboard view services.

pub mod activity;
pub mod backend;
pub mod cache;
pub mod heatmap;
pub mod overview;
pub mod poller;
pub mod shop_status;
pub mod table_view;

pub use activity::{fetch_activity, ACTIVITY_VIEW};
pub use backend::BackendClient;
pub use cache::ReadCache;
pub use heatmap::{fetch_heatmap, render_heatmap_svg, Heatmap, HeatmapOptions};
pub use overview::{fetch_overview, OVERVIEW_VIEW};
pub use poller::{spawn_poller, store_view};
pub use shop_status::{ShopPanel, ToggleOutcome};
