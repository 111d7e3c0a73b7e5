// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Physical-to-pixel projection for floor-plan drawings.
//!
//! The drawing surface maps the physical `z` axis to the horizontal pixel axis
//! (low `z` on the left) and the physical `x` axis to the vertical pixel axis,
//! inverted so the physical maximum sits at the top of the surface:
//!
//! ```text
//! px = pad.left + (z - z_min) / (z_max - z_min) * drawable_width
//! py = pad.top  + (x_max - x) / (x_max - x_min) * drawable_height
//! ```

use crate::coords::{Bounds, FloorPoint};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Drawing surface size in pixels
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

impl Canvas {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(860.0, 500.0)
    }
}

/// Insets between the canvas edge and the drawable area
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Padding {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Padding {
    pub const fn new(left: f64, right: f64, top: f64, bottom: f64) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }
}

impl Default for Padding {
    fn default() -> Self {
        Self::new(28.0, 28.0, 28.0, 24.0)
    }
}

/// A pixel coordinate on the drawing surface
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Pixel {
    pub x: f64,
    pub y: f64,
}

impl Pixel {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in pixel space
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PixelRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl PixelRect {
    /// Bounding rectangle of a set of pixels, `None` when empty.
    pub fn from_pixels(pixels: &[Pixel]) -> Option<Self> {
        let (first, rest) = pixels.split_first()?;
        let mut rect = PixelRect {
            left: first.x,
            top: first.y,
            right: first.x,
            bottom: first.y,
        };
        for p in rest {
            rect.left = rect.left.min(p.x);
            rect.right = rect.right.max(p.x);
            rect.top = rect.top.min(p.y);
            rect.bottom = rect.bottom.max(p.y);
        }
        Some(rect)
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Strict interior test.
    pub fn contains(&self, p: Pixel) -> bool {
        p.x > self.left && p.x < self.right && p.y > self.top && p.y < self.bottom
    }

    pub fn contains_inclusive(&self, p: Pixel) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }
}

/// Affine mapping from a physical bounding box onto a padded canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    canvas: Canvas,
    padding: Padding,
    bounds: Bounds,
    drawable_width: f64,
    drawable_height: f64,
}

impl Projection {
    /// Build a projection, rejecting degenerate bounds and canvases whose
    /// padding leaves nothing to draw on.
    pub fn new(canvas: Canvas, padding: Padding, bounds: Bounds) -> Result<Self> {
        bounds.validate()?;

        let drawable_width = canvas.width - padding.left - padding.right;
        let drawable_height = canvas.height - padding.top - padding.bottom;
        if !(drawable_width > 0.0 && drawable_height > 0.0) {
            return Err(Error::CanvasTooSmall {
                width: canvas.width,
                height: canvas.height,
            });
        }

        Ok(Self {
            canvas,
            padding,
            bounds,
            drawable_width,
            drawable_height,
        })
    }

    /// Projection onto the default 860x500 canvas with default padding.
    pub fn with_defaults(bounds: Bounds) -> Result<Self> {
        Self::new(Canvas::default(), Padding::default(), bounds)
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn padding(&self) -> Padding {
        self.padding
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Horizontal pixel for a physical `z` value (order-preserving).
    #[inline]
    pub fn sx(&self, z: f64) -> f64 {
        self.padding.left + (z - self.bounds.z_min) / self.bounds.z_extent() * self.drawable_width
    }

    /// Vertical pixel for a physical `x` value (order-reversing).
    #[inline]
    pub fn sy(&self, x: f64) -> f64 {
        self.padding.top + (self.bounds.x_max - x) / self.bounds.x_extent() * self.drawable_height
    }

    #[inline]
    pub fn project(&self, p: FloorPoint) -> Pixel {
        Pixel::new(self.sx(p.z), self.sy(p.x))
    }

    /// Inverse mapping, used for hit-testing pixels back onto the plan.
    pub fn unproject(&self, p: Pixel) -> FloorPoint {
        let z = self.bounds.z_min
            + (p.x - self.padding.left) / self.drawable_width * self.bounds.z_extent();
        let x = self.bounds.x_max
            - (p.y - self.padding.top) / self.drawable_height * self.bounds.x_extent();
        FloorPoint::new(x, z)
    }

    /// The padded drawing rectangle every in-bounds point projects into.
    pub fn drawable(&self) -> PixelRect {
        PixelRect {
            left: self.padding.left,
            top: self.padding.top,
            right: self.padding.left + self.drawable_width,
            bottom: self.padding.top + self.drawable_height,
        }
    }
}
