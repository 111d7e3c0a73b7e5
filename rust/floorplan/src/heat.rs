// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Heat scale, palette and deterministic dot placement for the traffic map.

use crate::error::{Error, Result};
use crate::projection::Pixel;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Marker palette, cycled by room index.
pub const ROOM_COLORS: [&str; 13] = [
    "#3B82F6", "#10B981", "#8B5CF6", "#F59E0B", "#EF4444", "#EC4899", "#06B6D4", "#84CC16",
    "#F97316", "#6366F1", "#14B8A6", "#E11D48", "#9333EA",
];

pub fn room_color(index: usize) -> &'static str {
    ROOM_COLORS[index % ROOM_COLORS.len()]
}

/// Five-step traffic intensity scale
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum HeatLevel {
    Low,
    Moderate,
    High,
    VeryHigh,
    Peak,
}

impl HeatLevel {
    /// Bucket a normalised intensity in `0..=1`.
    pub fn from_intensity(intensity: f64) -> Self {
        if intensity >= 0.8 {
            HeatLevel::Peak
        } else if intensity >= 0.6 {
            HeatLevel::VeryHigh
        } else if intensity >= 0.4 {
            HeatLevel::High
        } else if intensity >= 0.2 {
            HeatLevel::Moderate
        } else {
            HeatLevel::Low
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            HeatLevel::Peak => "#EF4444",
            HeatLevel::VeryHigh => "#F97316",
            HeatLevel::High => "#EAB308",
            HeatLevel::Moderate => "#22D3EE",
            HeatLevel::Low => "#3B82F6",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HeatLevel::Peak => "Peak",
            HeatLevel::VeryHigh => "Very High",
            HeatLevel::High => "High",
            HeatLevel::Moderate => "Moderate",
            HeatLevel::Low => "Low",
        }
    }
}

/// One dot of a room's heat cloud
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct HeatDot {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub opacity: f64,
    /// Animation stagger in seconds
    pub delay: f64,
}

/// Place a room's heat dots on a Vogel (sunflower) spiral around `center`.
///
/// Busier rooms get more, larger and more opaque dots spread over a wider
/// radius. `seed` rotates the spiral so neighbouring rooms do not look
/// identical; the output depends only on the inputs.
pub fn vogel_spiral(center: Pixel, seed: u64, intensity: f64) -> Vec<HeatDot> {
    let intensity = if intensity.is_finite() {
        intensity.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let count = ((intensity * 20.0).round() as usize).max(4);
    let golden_angle = PI * (3.0 - 5f64.sqrt());
    let max_radius = 4.0 + intensity * 7.0;
    let n = count as f64;

    (0..count)
        .map(|i| {
            let fi = i as f64;
            let angle = fi * golden_angle + seed as f64 * 1.3;
            let r = ((fi + 1.0) / n).sqrt() * max_radius;
            HeatDot {
                x: center.x + angle.cos() * r,
                y: center.y + angle.sin() * r,
                size: 3.0 + intensity * 5.0 * (1.0 - (fi / n) * 0.5),
                opacity: 0.25 + intensity * 0.55 * (1.0 - (fi / n) * 0.4),
                delay: fi * 0.04,
            }
        })
        .collect()
}

/// Multiples of `step` within `[min, max]`, rounded to two decimals.
pub fn generate_ticks(min: f64, max: f64, step: f64) -> Result<Vec<f64>> {
    if !(step > 0.0) {
        return Err(Error::InvalidStep(step));
    }
    let mut ticks = Vec::new();
    let first = (min / step).ceil();
    let mut k = 0.0;
    loop {
        // Index-based stepping keeps float error from accumulating
        let v = (first + k) * step;
        if v > max {
            break;
        }
        ticks.push((v * 100.0).round() / 100.0);
        k += 1.0;
    }
    Ok(ticks)
}
