// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Building coordinate model.
//!
//! Both floors share one physical coordinate system. `x` and `z` are the two
//! horizontal axes; `y` is vertical and only decides which floor a sample
//! belongs to.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Vertical coordinate separating the ground floor from the first floor.
pub const FLOOR_Y_THRESHOLD: f64 = 2.0;

/// A point on the horizontal plane of the building
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FloorPoint {
    pub x: f64,
    pub z: f64,
}

impl FloorPoint {
    pub const fn new(x: f64, z: f64) -> Self {
        Self { x, z }
    }

    pub fn distance_to(&self, other: &FloorPoint) -> f64 {
        let dx = self.x - other.x;
        let dz = self.z - other.z;
        (dx * dx + dz * dz).sqrt()
    }

    /// Linear interpolation towards `other` (`t = 0` is `self`).
    pub fn lerp(&self, other: &FloorPoint, t: f64) -> FloorPoint {
        FloorPoint::new(
            self.x + (other.x - self.x) * t,
            self.z + (other.z - self.z) * t,
        )
    }
}

/// A full 3D position sample as stored by the backend
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Drop the vertical component.
    pub fn floor_point(&self) -> FloorPoint {
        FloorPoint::new(self.x, self.z)
    }

    pub fn floor(&self) -> Floor {
        Floor::classify(self.y)
    }
}

/// Building floor
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Floor {
    #[default]
    Ground,
    First,
}

impl Floor {
    pub const ALL: [Floor; 2] = [Floor::Ground, Floor::First];

    /// Assign a vertical coordinate to a floor.
    ///
    /// Strictly below [`FLOOR_Y_THRESHOLD`] is the ground floor; the threshold
    /// itself already belongs to the first floor.
    pub fn classify(y: f64) -> Floor {
        if y < FLOOR_Y_THRESHOLD {
            Floor::Ground
        } else {
            Floor::First
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Floor::Ground => "ground",
            Floor::First => "first",
        }
    }
}

impl fmt::Display for Floor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Floor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ground" | "gf" | "ground floor" => Ok(Floor::Ground),
            "first" | "ff" | "first floor" => Ok(Floor::First),
            _ => Err(Error::UnknownFloor(s.to_string())),
        }
    }
}

/// Axis-aligned physical bounding box on the horizontal plane
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Bounds {
    pub x_min: f64,
    pub x_max: f64,
    pub z_min: f64,
    pub z_max: f64,
}

impl Bounds {
    pub const fn new(x_min: f64, x_max: f64, z_min: f64, z_max: f64) -> Self {
        Self {
            x_min,
            x_max,
            z_min,
            z_max,
        }
    }

    /// Smallest box containing every point, `None` for an empty slice.
    pub fn from_points(points: &[FloorPoint]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut bounds = Bounds::new(first.x, first.x, first.z, first.z);
        for p in rest {
            bounds.expand(*p);
        }
        Some(bounds)
    }

    pub fn expand(&mut self, p: FloorPoint) {
        self.x_min = self.x_min.min(p.x);
        self.x_max = self.x_max.max(p.x);
        self.z_min = self.z_min.min(p.z);
        self.z_max = self.z_max.max(p.z);
    }

    pub fn x_extent(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn z_extent(&self) -> f64 {
        self.z_max - self.z_min
    }

    /// Strict interior test.
    pub fn contains(&self, p: FloorPoint) -> bool {
        p.x > self.x_min && p.x < self.x_max && p.z > self.z_min && p.z < self.z_max
    }

    pub fn contains_inclusive(&self, p: FloorPoint) -> bool {
        p.x >= self.x_min && p.x <= self.x_max && p.z >= self.z_min && p.z <= self.z_max
    }

    /// Reject boxes that would divide by zero when projected.
    pub fn validate(&self) -> Result<()> {
        // Written as `!(max > min)` so NaN extents are rejected too.
        if !(self.x_max > self.x_min) {
            return Err(Error::DegenerateAxis {
                axis: 'x',
                min: self.x_min,
                max: self.x_max,
            });
        }
        if !(self.z_max > self.z_min) {
            return Err(Error::DegenerateAxis {
                axis: 'z',
                min: self.z_min,
                max: self.z_max,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_threshold_is_first() {
        assert_eq!(Floor::classify(FLOOR_Y_THRESHOLD), Floor::First);
        assert_eq!(Floor::classify(FLOOR_Y_THRESHOLD - 1e-9), Floor::Ground);
        assert_eq!(Floor::classify(-3.0), Floor::Ground);
        assert_eq!(Floor::classify(5.4), Floor::First);
    }

    #[test]
    fn test_floor_parse_roundtrip() {
        for floor in Floor::ALL {
            assert_eq!(floor.as_str().parse::<Floor>().unwrap(), floor);
        }
        assert_eq!(" First ".parse::<Floor>().unwrap(), Floor::First);
        assert!("basement".parse::<Floor>().is_err());
    }

    #[test]
    fn test_bounds_from_points() {
        assert!(Bounds::from_points(&[]).is_none());

        let b = Bounds::from_points(&[
            FloorPoint::new(1.0, -2.0),
            FloorPoint::new(-1.5, 4.0),
            FloorPoint::new(0.5, 0.0),
        ])
        .unwrap();
        assert_eq!(b, Bounds::new(-1.5, 1.0, -2.0, 4.0));
        assert!(b.contains(FloorPoint::new(0.0, 0.0)));
        assert!(!b.contains(FloorPoint::new(1.0, 0.0)));
        assert!(b.contains_inclusive(FloorPoint::new(1.0, 0.0)));
    }

    #[test]
    fn test_degenerate_bounds_rejected() {
        let flat_x = Bounds::new(1.0, 1.0, 0.0, 5.0);
        assert!(matches!(
            flat_x.validate(),
            Err(Error::DegenerateAxis { axis: 'x', .. })
        ));

        let inverted_z = Bounds::new(0.0, 1.0, 5.0, -5.0);
        assert!(matches!(
            inverted_z.validate(),
            Err(Error::DegenerateAxis { axis: 'z', .. })
        ));

        let nan = Bounds::new(f64::NAN, 1.0, 0.0, 1.0);
        assert!(nan.validate().is_err());
    }

    #[test]
    fn test_position_drops_height() {
        let p = Position::new(0.77, 1.2, 0.52);
        assert_eq!(p.floor_point(), FloorPoint::new(0.77, 0.52));
        assert_eq!(p.floor(), Floor::Ground);
    }
}
