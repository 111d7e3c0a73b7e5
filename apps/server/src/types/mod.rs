// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Type definitions for API requests, responses and the table schema.

mod request;
mod response;
pub mod schema;

pub use request::{FormQuery, HeatmapQuery, TableQuery};
pub use response::{LiveEvent, MutationResponse, TableRowsResponse, ViewResponse};
pub use schema::{table_config, table_configs, ColumnConfig, FieldType, NavView, TableConfig};
