// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for floor-plan operations.

use thiserror::Error;

/// Result type for floor-plan operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while projecting or rendering a floor plan
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// An axis of the physical bounding box has no extent.
    #[error("degenerate {axis} axis: max {max} must be greater than min {min}")]
    DegenerateAxis { axis: char, min: f64, max: f64 },

    /// The canvas has no drawable area left after padding.
    #[error("canvas {width}x{height} leaves no drawable area after padding")]
    CanvasTooSmall { width: f64, height: f64 },

    #[error("polygon '{0}' needs at least three vertices")]
    DegeneratePolygon(String),

    #[error("unknown floor: {0}")]
    UnknownFloor(String),

    #[error("tick step must be positive, got {0}")]
    InvalidStep(f64),
}
