// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Nearest-room classification for tracked samples.
//!
//! Brute force over every (sample, anchor) pair; the data sets are a few
//! dozen rooms and a few thousand samples, so no spatial index is used.

use crate::coords::FloorPoint;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Distance below which a sample counts as "at" a room.
pub const PROXIMITY_THRESHOLD: f64 = 2.0;

/// Euclidean distance on the horizontal plane
#[inline]
pub fn distance_2d(a: FloorPoint, b: FloorPoint) -> f64 {
    a.distance_to(&b)
}

/// A room's anchor point
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoomAnchor {
    pub room_id: String,
    pub name: String,
    pub position: FloorPoint,
    pub color: String,
}

/// A logged position sample
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrackedPoint {
    pub id: i64,
    pub user_name: Option<String>,
    pub position: FloorPoint,
}

/// Nearest-room result for one sample
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProximityMatch {
    pub point_id: i64,
    pub position: FloorPoint,
    /// Index into the anchor slice, `None` when there were no anchors
    pub anchor_index: Option<usize>,
    pub room_id: Option<String>,
    pub room_name: Option<String>,
    pub distance: f64,
    pub inside: bool,
}

/// Nearest anchor to `p` and its distance; the first minimum wins ties.
pub fn nearest_anchor(p: FloorPoint, anchors: &[RoomAnchor]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (i, anchor) in anchors.iter().enumerate() {
        let d = distance_2d(p, anchor.position);
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((i, d)),
        }
    }
    best
}

/// Classify every sample against the anchors of the same floor.
pub fn classify(points: &[TrackedPoint], anchors: &[RoomAnchor]) -> Vec<ProximityMatch> {
    points
        .iter()
        .map(|point| match nearest_anchor(point.position, anchors) {
            Some((idx, distance)) => ProximityMatch {
                point_id: point.id,
                position: point.position,
                anchor_index: Some(idx),
                room_id: Some(anchors[idx].room_id.clone()),
                room_name: Some(anchors[idx].name.clone()),
                distance,
                inside: distance < PROXIMITY_THRESHOLD,
            },
            None => ProximityMatch {
                point_id: point.id,
                position: point.position,
                anchor_index: None,
                room_id: None,
                room_name: None,
                distance: f64::INFINITY,
                inside: false,
            },
        })
        .collect()
}

/// Number of inside-proximity samples per room id.
pub fn visit_counts(matches: &[ProximityMatch]) -> FxHashMap<String, u64> {
    let mut counts: FxHashMap<String, u64> = FxHashMap::default();
    for m in matches.iter().filter(|m| m.inside) {
        if let Some(room_id) = &m.room_id {
            *counts.entry(room_id.clone()).or_insert(0) += 1;
        }
    }
    counts
}
