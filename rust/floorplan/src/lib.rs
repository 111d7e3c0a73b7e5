// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # NavMe Floorplan
//!
//! Geometry and projection for the NavMe indoor-AR venue.
//!
//! Positions captured by the AR client live in a right-handed building
//! coordinate system: `x` runs south to north, `z` west to east and `y` is
//! height. This crate turns those into a plan view:
//!
//! - [`coords`] classifies a height into a [`Floor`] and carries planar points
//! - [`projection`] maps world `(x, z)` onto a padded SVG canvas
//! - [`layout`] holds the hand-authored rooms, walls, doors and stairs per floor
//! - [`render`] writes the line drawing plus overlays as an SVG document
//! - [`proximity`] assigns tracked points to their nearest room anchor
//! - [`heat`] derives heat levels and the scattered dot cloud per room
//!
//! ## Quick Start
//!
//! ```rust
//! use navme_floorplan::{FloorLayout, FloorPlanSvg, Projection};
//!
//! let layout = FloorLayout::ground();
//! let projection = Projection::with_defaults(layout.bounds)?;
//! let svg = FloorPlanSvg::new(&layout, &projection).render();
//! assert!(svg.starts_with("<svg"));
//! # Ok::<(), navme_floorplan::Error>(())
//! ```

pub mod coords;
pub mod error;
pub mod heat;
pub mod layout;
pub mod projection;
pub mod proximity;
pub mod render;

pub use coords::{Bounds, Floor, FloorPoint, Position, FLOOR_Y_THRESHOLD};
pub use error::{Error, Result};
pub use heat::{generate_ticks, room_color, vogel_spiral, HeatDot, HeatLevel, ROOM_COLORS};
pub use layout::{Door, FloorLayout, ReferencePoi, RoomPolygon, Stair, SwingSide, Wall};
pub use projection::{Canvas, Padding, Pixel, PixelRect, Projection};
pub use proximity::{
    classify, distance_2d, nearest_anchor, visit_counts, ProximityMatch, RoomAnchor, TrackedPoint,
    PROXIMITY_THRESHOLD,
};
pub use render::{door_swing, path_data, Breadcrumb, DoorSwing, FloorPlanSvg, HeatCloud, PoiMarker, RenderStyle};
