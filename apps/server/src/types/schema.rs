// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Table schema registry driving the generic list and form views.
//!
//! Each editable backend table is described once: its primary key, default
//! sort, and for every column the field kind plus whether it shows up in the
//! list, in the form, or both. The list/form code in
//! [`crate::services::table_view`] interprets these descriptions; nothing is
//! hard-coded per table.

use serde::Serialize;
use serde_json::Value;
use std::sync::OnceLock;

/// Read-only log of navigation events written by the AR client.
pub const NAV_NODES_TABLE: &str = "ar_nav_nodes";

/// Table holding rooms/shops with their anchor positions and active flag.
pub const ROOMS_TABLE: &str = "ar_rooms";

/// Input kind of a column.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Number,
    Date,
    Datetime,
    Boolean,
    Select,
    Textarea,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DefaultSort {
    pub key: &'static str,
    pub direction: SortDirection,
}

impl DefaultSort {
    fn asc(key: &'static str) -> Self {
        Self {
            key,
            direction: SortDirection::Asc,
        }
    }

    fn desc(key: &'static str) -> Self {
        Self {
            key,
            direction: SortDirection::Desc,
        }
    }
}

/// One column of a table.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ColumnConfig {
    pub key: &'static str,
    pub label: &'static str,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub required: bool,
    pub editable: bool,
    pub show_in_table: bool,
    pub show_in_form: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
}

impl ColumnConfig {
    /// Editable column shown in both list and form.
    fn new(key: &'static str, label: &'static str, field_type: FieldType) -> Self {
        Self {
            key,
            label,
            field_type,
            required: false,
            editable: true,
            show_in_table: true,
            show_in_form: true,
            options: Vec::new(),
            placeholder: None,
            default_value: None,
        }
    }

    fn text(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldType::Text)
    }

    /// Backend-managed column: listed, never in the form.
    fn managed(key: &'static str, label: &'static str, field_type: FieldType) -> Self {
        Self {
            editable: false,
            show_in_form: false,
            ..Self::new(key, label, field_type)
        }
    }

    fn required(mut self) -> Self {
        self.required = true;
        self
    }

    fn placeholder(mut self, placeholder: &'static str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    fn list_only(mut self) -> Self {
        self.show_in_form = false;
        self
    }

    fn options(mut self, options: &[(&'static str, &'static str)]) -> Self {
        self.options = options
            .iter()
            .map(|&(value, label)| SelectOption { value, label })
            .collect();
        self
    }

    fn default_value(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Display label for a select value, if it is one of the options.
    pub fn option_label(&self, value: &str) -> Option<&'static str> {
        self.options.iter().find(|o| o.value == value).map(|o| o.label)
    }
}

/// One CRUD table.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TableConfig {
    pub table_name: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub primary_key: &'static str,
    /// Dashboard path the table is listed under
    pub route: &'static str,
    pub columns: Vec<ColumnConfig>,
    pub default_sort: Option<DefaultSort>,
}

impl TableConfig {
    pub fn table_columns(&self) -> impl Iterator<Item = &ColumnConfig> {
        self.columns.iter().filter(|c| c.show_in_table)
    }

    pub fn form_columns(&self) -> impl Iterator<Item = &ColumnConfig> {
        self.columns.iter().filter(|c| c.show_in_form)
    }

    #[cfg(test)]
    pub fn column(&self, key: &str) -> Option<&ColumnConfig> {
        self.columns.iter().find(|c| c.key == key)
    }
}

/// All CRUD tables in display order.
pub fn table_configs() -> &'static [TableConfig] {
    static REGISTRY: OnceLock<Vec<TableConfig>> = OnceLock::new();
    REGISTRY.get_or_init(build_registry)
}

/// Look up a table by its backend name.
pub fn table_config(name: &str) -> Option<&'static TableConfig> {
    table_configs().iter().find(|t| t.table_name == name)
}

fn build_registry() -> Vec<TableConfig> {
    use FieldType::*;

    let created_on = || ColumnConfig::managed("created_at", "Created On", Datetime);
    let active_flag = || ColumnConfig::text("is_active", "Active").placeholder("Y or N");
    let floor_no = || ColumnConfig::text("floor_no", "Floor").placeholder("e.g. Ground Floor");
    let node_id = || ColumnConfig::text("node_id", "Node ID").placeholder("Node ID");

    vec![
        TableConfig {
            table_name: "ar_room_categories",
            display_name: "Room Categories",
            description: "Organize your rooms into categories for easy browsing",
            primary_key: "category_id",
            route: "/shop-categories",
            default_sort: Some(DefaultSort::asc("category_id")),
            columns: vec![
                ColumnConfig::text("category_id", "Category ID"),
                ColumnConfig::text("category_name", "Category Name")
                    .required()
                    .placeholder("e.g. Living Space, Bedroom"),
                ColumnConfig::text("icon_class", "Icon").placeholder("e.g. fa-door-open"),
                created_on(),
            ],
        },
        TableConfig {
            table_name: ROOMS_TABLE,
            display_name: "Rooms",
            description: "All rooms in the residence and their details",
            primary_key: "room_id",
            route: "/shops",
            default_sort: Some(DefaultSort::desc("room_id")),
            columns: vec![
                ColumnConfig::text("room_id", "Room ID").placeholder("Room ID"),
                ColumnConfig::text("room_name", "Room Name")
                    .required()
                    .placeholder("Name of the room"),
                ColumnConfig::text("category_id", "Category ID")
                    .required()
                    .placeholder("Category ID"),
                floor_no(),
                node_id(),
                ColumnConfig::text("description", "Description").placeholder("About this room"),
                ColumnConfig::text("contact_person", "Contact Person").placeholder("Person name"),
                ColumnConfig::text("contact_no", "Contact Number").placeholder("+91 98765 43210"),
                ColumnConfig::text("room_type", "Room Type").placeholder("e.g. Bedroom, Kitchen"),
                active_flag(),
                ColumnConfig::managed("created_at", "Added On", Datetime),
                ColumnConfig::text("created_by", "Added By").placeholder("Your name"),
                ColumnConfig::text("pos_x", "Position X").placeholder("0"),
                ColumnConfig::text("pos_y", "Position Y").placeholder("0"),
                ColumnConfig::text("pos_z", "Position Z").placeholder("0"),
                ColumnConfig::text("image_url", "Image Link").placeholder("https://"),
                ColumnConfig::new("amenities_desc", "Amenities", Textarea)
                    .placeholder("Describe the amenities..."),
                ColumnConfig::new("technology_desc", "Technology", Textarea)
                    .placeholder("Describe the technology..."),
                ColumnConfig::new("highlight_desc", "Highlights", Textarea)
                    .placeholder("Describe the highlights..."),
            ],
        },
        TableConfig {
            table_name: "ar_shop_offers",
            display_name: "Shop Offers",
            description: "Time-limited offers attached to a room or shop",
            primary_key: "offer_id",
            route: "/shop-offers",
            default_sort: Some(DefaultSort::desc("offer_id")),
            columns: vec![
                ColumnConfig::text("offer_id", "Offer ID"),
                ColumnConfig::text("room_id", "Room ID").required().placeholder("Room ID"),
                ColumnConfig::text("title", "Title").required().placeholder("e.g. Weekend special"),
                ColumnConfig::new("description", "Description", Textarea)
                    .placeholder("Describe the offer"),
                ColumnConfig::new("price", "Price", Number).placeholder("0.00"),
                ColumnConfig::new("discount_percent", "Discount %", Number).placeholder("10"),
                ColumnConfig::new("start_date", "Start Date", Date),
                ColumnConfig::new("end_date", "End Date", Date),
                ColumnConfig::new("is_active", "Status", Select)
                    .options(&[("Y", "Active"), ("N", "Inactive")])
                    .default_value(Value::from("Y")),
                created_on(),
            ],
        },
        TableConfig {
            table_name: "ar_room_information",
            display_name: "Room Information",
            description: "Additional details and info entries for each room",
            primary_key: "info_id",
            route: "/shop-items",
            default_sort: Some(DefaultSort::desc("info_id")),
            columns: vec![
                ColumnConfig::text("info_id", "Info ID"),
                ColumnConfig::text("room_id", "Room ID").required().placeholder("Room ID"),
                ColumnConfig::text("title", "Title").placeholder("Info title"),
                ColumnConfig::new("description", "Description", Textarea)
                    .placeholder("Describe this info entry"),
                ColumnConfig::text("info_type", "Info Type").placeholder("e.g. Feature, Note"),
                floor_no(),
                node_id(),
                active_flag(),
                ColumnConfig::new("start_date", "Start Date", Date),
                ColumnConfig::new("end_date", "End Date", Date),
                created_on(),
            ],
        },
        TableConfig {
            table_name: "ar_user_presence",
            display_name: "Users",
            description: "People using your NavMe experience",
            primary_key: "user_id",
            route: "/users",
            default_sort: Some(DefaultSort::desc("user_id")),
            columns: vec![
                ColumnConfig::text("user_id", "User ID"),
                ColumnConfig::text("user_name", "Name").placeholder("Display name"),
                ColumnConfig::text("email", "Email").placeholder("user@example.com"),
                ColumnConfig::text("role", "Role").placeholder("e.g. Resident, Visitor"),
                ColumnConfig::text("share_enabled", "Sharing").placeholder("true or false"),
                ColumnConfig::managed("last_seen_at", "Last Active", Datetime),
                ColumnConfig::text("session_id", "Session").list_only(),
                ColumnConfig::text("skills", "Skills").placeholder("Skills"),
                ColumnConfig::text("hobbies", "Hobbies").placeholder("Hobbies"),
                ColumnConfig::new("about", "About", Textarea).placeholder("About this user..."),
                ColumnConfig::managed("created_at", "Joined On", Datetime),
            ],
        },
    ]
}

/// A navigable dashboard view.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NavView {
    pub path: &'static str,
    pub label: &'static str,
    /// Backing CRUD table, for generic table views
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<&'static str>,
}

/// Sidebar entries: the fixed views followed by one entry per CRUD table.
pub fn nav_views() -> Vec<NavView> {
    let fixed = [
        ("/", "Dashboard"),
        ("/user-activity", "User Activity"),
        ("/heatmap", "Heatmap"),
        ("/block-shops", "Block Shops"),
    ];
    let labels = [
        ("/shop-categories", "Shop Categories"),
        ("/shops", "Shops"),
        ("/shop-offers", "Shop Offers"),
        ("/shop-items", "Shop Items"),
        ("/users", "Users"),
    ];

    let mut views: Vec<NavView> = fixed
        .iter()
        .map(|&(path, label)| NavView { path, label, table: None })
        .collect();
    for table in table_configs() {
        let label = labels
            .iter()
            .find(|(path, _)| *path == table.route)
            .map(|&(_, label)| label)
            .unwrap_or(table.display_name);
        views.push(NavView {
            path: table.route,
            label,
            table: Some(table.table_name),
        });
    }
    views
}
