// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Hand-authored floor geometry.
//!
//! Each floor is a fixed table of room polygons, interior wall segments, door
//! descriptors, the outer perimeter and a stair symbol, all expressed in the
//! shared building coordinate system (see [`crate::coords`]). The tables are
//! purely declarative; rendering walks them in order.

use crate::coords::{Bounds, Floor, FloorPoint};
use crate::error::{Error, Result};
use crate::projection::{PixelRect, Projection};
use serde::{Deserialize, Serialize};

/// A room outline as an ordered, closed vertex ring
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoomPolygon {
    pub id: String,
    pub label: String,
    /// Fill colour as `#RRGGBB`
    pub color: String,
    /// Whether tracked samples inside this room are meaningful
    pub trackable: bool,
    pub points: Vec<FloorPoint>,
}

impl RoomPolygon {
    pub fn new(
        id: &str,
        label: &str,
        color: &str,
        trackable: bool,
        points: Vec<FloorPoint>,
    ) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            color: color.to_string(),
            trackable,
            points,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.points.len() < 3 {
            return Err(Error::DegeneratePolygon(self.id.clone()));
        }
        Ok(())
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(&self.points)
    }

    /// Point-in-polygon by ray casting along the `z` axis.
    pub fn contains(&self, p: FloorPoint) -> bool {
        let n = self.points.len();
        if n < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[j];
            if (a.x > p.x) != (b.x > p.x) {
                let z_cross = a.z + (p.x - a.x) / (b.x - a.x) * (b.z - a.z);
                if p.z < z_cross {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }

    /// True when no two non-adjacent edges of the ring touch.
    pub fn is_simple(&self) -> bool {
        let n = self.points.len();
        if n < 3 {
            return false;
        }
        for i in 0..n {
            let a1 = self.points[i];
            let a2 = self.points[(i + 1) % n];
            for j in (i + 1)..n {
                // Neighbouring edges share a vertex by construction
                if j == i + 1 || (i == 0 && j == n - 1) {
                    continue;
                }
                let b1 = self.points[j];
                let b2 = self.points[(j + 1) % n];
                if segments_intersect(a1, a2, b1, b2) {
                    return false;
                }
            }
        }
        true
    }

    /// Pixel-space bounding box of the projected vertices.
    pub fn pixel_bounds(&self, projection: &Projection) -> Option<PixelRect> {
        let pixels: Vec<_> = self.points.iter().map(|p| projection.project(*p)).collect();
        PixelRect::from_pixels(&pixels)
    }
}

fn orientation(a: FloorPoint, b: FloorPoint, c: FloorPoint) -> f64 {
    (b.x - a.x) * (c.z - a.z) - (b.z - a.z) * (c.x - a.x)
}

fn on_segment(a: FloorPoint, b: FloorPoint, p: FloorPoint) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.z >= a.z.min(b.z) && p.z <= a.z.max(b.z)
}

fn segments_intersect(p1: FloorPoint, p2: FloorPoint, q1: FloorPoint, q2: FloorPoint) -> bool {
    let d1 = orientation(q1, q2, p1);
    let d2 = orientation(q1, q2, p2);
    let d3 = orientation(p1, p2, q1);
    let d4 = orientation(p1, p2, q2);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && on_segment(q1, q2, p1))
        || (d2 == 0.0 && on_segment(q1, q2, p2))
        || (d3 == 0.0 && on_segment(p1, p2, q1))
        || (d4 == 0.0 && on_segment(p1, p2, q2))
}

/// Interior wall segment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Wall {
    pub start: FloorPoint,
    pub end: FloorPoint,
}

impl Wall {
    pub const fn new(start: FloorPoint, end: FloorPoint) -> Self {
        Self { start, end }
    }
}

/// Direction a door leaf swings, relative to its host wall in pixel space
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SwingSide {
    /// `+1`: perpendicular rotated clockwise on screen, SVG sweep flag 1
    Clockwise,
    /// `-1`: perpendicular rotated counter-clockwise, SVG sweep flag 0
    CounterClockwise,
}

impl SwingSide {
    pub fn sign(&self) -> f64 {
        match self {
            SwingSide::Clockwise => 1.0,
            SwingSide::CounterClockwise => -1.0,
        }
    }

    pub fn sweep_flag(&self) -> u8 {
        match self {
            SwingSide::Clockwise => 1,
            SwingSide::CounterClockwise => 0,
        }
    }
}

/// A door placed on a host wall
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Door {
    /// Host wall start
    pub start: FloorPoint,
    /// Host wall end
    pub end: FloorPoint,
    /// Fraction along the host wall where the door centre sits (0..=1)
    pub t: f64,
    /// Leaf width in physical units
    pub width: f64,
    pub side: SwingSide,
}

impl Door {
    pub fn center(&self) -> FloorPoint {
        self.start.lerp(&self.end, self.t)
    }
}

/// Staircase symbol footprint
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Stair {
    pub x1: f64,
    pub z1: f64,
    pub x2: f64,
    pub z2: f64,
    pub steps: u32,
}

/// Everything needed to draw one floor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FloorLayout {
    pub floor: Floor,
    pub bounds: Bounds,
    pub rooms: Vec<RoomPolygon>,
    pub walls: Vec<Wall>,
    pub doors: Vec<Door>,
    /// Outer perimeter, drawn as one closed path
    pub outline: Vec<FloorPoint>,
    pub stair: Stair,
}

/// A named anchor the floor tables were authored around
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferencePoi {
    pub name: &'static str,
    pub room_id: &'static str,
    pub position: FloorPoint,
}

const fn pt(x: f64, z: f64) -> FloorPoint {
    FloorPoint::new(x, z)
}

const fn poi(name: &'static str, room_id: &'static str, x: f64, z: f64) -> ReferencePoi {
    ReferencePoi {
        name,
        room_id,
        position: pt(x, z),
    }
}

fn wall(a: (f64, f64), b: (f64, f64)) -> Wall {
    Wall::new(pt(a.0, a.1), pt(b.0, b.1))
}

fn door(a: (f64, f64), b: (f64, f64), t: f64, width: f64, side: SwingSide) -> Door {
    Door {
        start: pt(a.0, a.1),
        end: pt(b.0, b.1),
        t,
        width,
        side,
    }
}

// Ground floor wall lines
mod gf {
    pub const X_S: f64 = -1.5;
    pub const X_GN: f64 = 2.2;
    pub const X_MN: f64 = 4.8;
    pub const X_SRS: f64 = 7.2;
    pub const X_N: f64 = 10.2;
    pub const Z_W: f64 = -10.8;
    pub const Z_KE: f64 = -7.4;
    pub const Z_BE: f64 = -4.2;
    pub const Z_GE: f64 = -1.0;
    pub const Z_E: f64 = 2.8;
}

// First floor wall lines
mod ff {
    pub const X_S: f64 = -1.5;
    pub const X_CN: f64 = 1.2;
    pub const X_MN: f64 = 4.8;
    pub const X_N: f64 = 8.5;
    pub const Z_W: f64 = -10.8;
    pub const Z_CE: f64 = -7.4;
    pub const Z_PE: f64 = -4.8;
    pub const Z_HE: f64 = -0.6;
    pub const Z_E: f64 = 4.5;
}

impl FloorLayout {
    pub fn for_floor(floor: Floor) -> Self {
        match floor {
            Floor::Ground => Self::ground(),
            Floor::First => Self::first(),
        }
    }

    /// Ground floor, bounds x: -1.5..10.2, z: -10.8..2.8.
    pub fn ground() -> Self {
        use gf::*;
        use SwingSide::{Clockwise as Cw, CounterClockwise as Ccw};

        let rooms = vec![
            RoomPolygon::new(
                "sun_room",
                "Sun Room",
                "#EC4899",
                true,
                vec![pt(X_SRS, Z_W), pt(X_SRS, Z_BE), pt(X_N, Z_BE), pt(X_N, Z_W)],
            ),
            RoomPolygon::new(
                "kitchen",
                "Kitchen",
                "#10B981",
                true,
                vec![pt(X_MN, Z_W), pt(X_MN, Z_KE), pt(X_SRS, Z_KE), pt(X_SRS, Z_W)],
            ),
            RoomPolygon::new(
                "breakfast",
                "Breakfast",
                "#06B6D4",
                true,
                vec![pt(X_MN, Z_KE), pt(X_MN, Z_BE), pt(X_N, Z_BE), pt(X_N, Z_KE)],
            ),
            RoomPolygon::new(
                "great_room",
                "Great Room",
                "#3B82F6",
                true,
                vec![pt(X_MN, Z_BE), pt(X_MN, Z_GE), pt(X_N, Z_GE), pt(X_N, Z_BE)],
            ),
            RoomPolygon::new(
                "guest_room",
                "Guest Room",
                "#8B5CF6",
                true,
                vec![pt(X_GN, Z_GE), pt(X_GN, Z_E), pt(X_N, Z_E), pt(X_N, Z_GE)],
            ),
            RoomPolygon::new(
                "office",
                "Office",
                "#F59E0B",
                true,
                vec![pt(X_S, Z_GE), pt(X_S, Z_E), pt(X_GN, Z_E), pt(X_GN, Z_GE)],
            ),
            RoomPolygon::new(
                "dining_room",
                "Dining Room",
                "#EF4444",
                true,
                vec![pt(X_GN, Z_BE), pt(X_GN, Z_GE), pt(X_MN, Z_GE), pt(X_MN, Z_BE)],
            ),
            RoomPolygon::new(
                "foyer",
                "Foyer",
                "#84CC16",
                true,
                vec![pt(X_S, Z_BE), pt(X_S, Z_GE), pt(X_GN, Z_GE), pt(X_GN, Z_BE)],
            ),
            RoomPolygon::new(
                "garage",
                "Car Garage",
                "#6366F1",
                true,
                vec![pt(X_S, Z_W), pt(X_S, Z_BE), pt(X_MN, Z_BE), pt(X_MN, Z_W)],
            ),
        ];

        let walls = vec![
            wall((X_SRS, Z_W), (X_SRS, Z_BE)),
            wall((X_N, Z_KE), (X_MN, Z_KE)),
            wall((X_N, Z_BE), (X_S, Z_BE)),
            wall((X_N, Z_GE), (X_S, Z_GE)),
            wall((X_MN, Z_W), (X_MN, Z_E)),
            wall((X_GN, Z_BE), (X_GN, Z_E)),
        ];

        let doors = vec![
            door((X_S, Z_W), (X_S, Z_BE), 0.32, 2.5, Cw),
            door((X_S, Z_BE), (X_S, Z_GE), 0.6, 0.9, Cw),
            door((X_MN, Z_W), (X_MN, Z_KE), 0.75, 0.9, Ccw),
            door((X_MN, Z_KE), (X_MN, Z_BE), 0.5, 0.9, Ccw),
            door((X_MN, Z_BE), (X_MN, Z_GE), 0.35, 1.0, Ccw),
            door((X_GN, Z_GE), (X_N, Z_GE), 0.8, 0.9, Cw),
            door((X_GN, Z_BE), (X_GN, Z_GE), 0.4, 0.9, Ccw),
            door((X_SRS, Z_W), (X_SRS, Z_BE), 0.7, 0.8, Cw),
        ];

        let outline = vec![
            pt(X_S, Z_W),
            pt(X_S, Z_E),
            pt(X_GN, Z_E),
            pt(X_N, Z_E),
            pt(X_N, Z_W),
            pt(X_S, Z_W),
        ];

        Self {
            floor: Floor::Ground,
            bounds: Bounds::new(X_S, X_N, Z_W, Z_E),
            rooms,
            walls,
            doors,
            outline,
            stair: Stair {
                x1: 3.1,
                z1: -3.6,
                x2: 4.5,
                z2: -2.1,
                steps: 5,
            },
        }
    }

    /// First floor, bounds x: -1.5..8.5, z: -10.8..4.5.
    pub fn first() -> Self {
        use ff::*;
        use SwingSide::{Clockwise as Cw, CounterClockwise as Ccw};

        let rooms = vec![
            RoomPolygon::new(
                "primary_suite",
                "Primary Suite",
                "#8B5CF6",
                true,
                vec![pt(X_MN, Z_W), pt(X_MN, Z_PE), pt(X_N, Z_PE), pt(X_N, Z_W)],
            ),
            RoomPolygon::new(
                "bonus_room",
                "Bonus Room",
                "#3B82F6",
                true,
                vec![pt(X_MN, Z_PE), pt(X_MN, Z_HE), pt(X_N, Z_HE), pt(X_N, Z_PE)],
            ),
            RoomPolygon::new(
                "room_4",
                "Room 4",
                "#F59E0B",
                true,
                vec![pt(X_MN, Z_HE), pt(X_MN, Z_E), pt(X_N, Z_E), pt(X_N, Z_HE)],
            ),
            // Extends down to the south wall so the Room 2 anchor (x=0.45) falls inside
            RoomPolygon::new(
                "room_2",
                "Room 2",
                "#10B981",
                true,
                vec![pt(X_S, Z_CE), pt(X_S, Z_HE), pt(X_MN, Z_HE), pt(X_MN, Z_CE)],
            ),
            RoomPolygon::new(
                "room_3",
                "Room 3",
                "#EF4444",
                true,
                vec![pt(X_CN, Z_HE), pt(X_CN, Z_E), pt(X_MN, Z_E), pt(X_MN, Z_HE)],
            ),
            RoomPolygon::new(
                "closet",
                "Closet",
                "#EC4899",
                true,
                vec![pt(X_S, Z_W), pt(X_S, Z_CE), pt(X_CN, Z_CE), pt(X_CN, Z_W)],
            ),
            RoomPolygon::new(
                "hallway",
                "Landing",
                "#84CC16",
                false,
                vec![pt(X_CN, Z_W), pt(X_CN, Z_HE), pt(X_MN, Z_HE), pt(X_MN, Z_W)],
            ),
        ];

        let walls = vec![
            wall((X_N, Z_PE), (X_MN, Z_PE)),
            wall((X_N, Z_HE), (X_S, Z_HE)),
            wall((X_MN, Z_W), (X_MN, Z_E)),
            wall((X_MN, Z_CE), (X_S, Z_CE)),
            wall((X_CN, Z_W), (X_CN, Z_HE)),
        ];

        let doors = vec![
            door((X_MN, Z_W), (X_MN, Z_PE), 0.7, 0.9, Ccw),
            door((X_MN, Z_PE), (X_MN, Z_HE), 0.5, 0.9, Ccw),
            door((X_MN, Z_HE), (X_MN, Z_E), 0.3, 0.9, Ccw),
            door((X_S, Z_CE), (X_S, Z_HE), 0.6, 0.9, Cw),
            door((X_CN, Z_HE), (X_MN, Z_HE), 0.6, 0.8, Cw),
            door((X_CN, Z_W), (X_CN, Z_CE), 0.7, 0.7, Cw),
            // Stair opening at the bottom of the landing
            door((X_S, Z_W), (X_S, Z_CE), 0.4, 1.0, Cw),
        ];

        let outline = vec![
            pt(X_S, Z_W),
            pt(X_S, Z_E),
            pt(X_MN, Z_E),
            pt(X_N, Z_E),
            pt(X_N, Z_W),
            pt(X_S, Z_W),
        ];

        Self {
            floor: Floor::First,
            bounds: Bounds::new(X_S, X_N, Z_W, Z_E),
            rooms,
            walls,
            doors,
            outline,
            stair: Stair {
                x1: 1.2,
                z1: -3.5,
                x2: 4.5,
                z2: -2.0,
                steps: 5,
            },
        }
    }

    pub fn room(&self, id: &str) -> Option<&RoomPolygon> {
        self.rooms.iter().find(|r| r.id == id)
    }

    /// First room polygon containing the point, in table order.
    pub fn room_at(&self, p: FloorPoint) -> Option<&RoomPolygon> {
        self.rooms.iter().find(|r| r.contains(p))
    }

    pub fn validate(&self) -> Result<()> {
        self.bounds.validate()?;
        for room in &self.rooms {
            room.validate()?;
        }
        Ok(())
    }

    /// The room anchors each floor table was authored around.
    pub fn reference_pois(floor: Floor) -> &'static [ReferencePoi] {
        const GROUND: &[ReferencePoi] = &[
            poi("Office", "office", 0.77, 0.52),
            poi("Guest Room", "guest_room", 3.99, 1.46),
            poi("Great Room", "great_room", 6.40, -2.63),
            poi("Breakfast", "breakfast", 5.95, -5.53),
            poi("Kitchen", "kitchen", 5.78, -9.22),
            poi("Sun Room", "sun_room", 8.69, -6.31),
            poi("Car Garage", "garage", -0.15, -8.41),
        ];
        const FIRST: &[ReferencePoi] = &[
            poi("Room 2", "room_2", 0.45, -3.80),
            poi("Room 3", "room_3", 2.76, 2.66),
            poi("Room 4", "room_4", 5.28, 0.09),
            poi("Bonus Room", "bonus_room", 6.58, -2.17),
            poi("Primary Suite", "primary_suite", 6.58, -7.21),
            poi("Closet", "closet", -0.09, -8.84),
        ];
        match floor {
            Floor::Ground => GROUND,
            Floor::First => FIRST,
        }
    }
}
