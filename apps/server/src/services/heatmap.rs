// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Visitor heatmap per floor.
//!
//! Active rooms with a numeric position become proximity anchors on their
//! floor. Navigation samples on the same floor, within the selected hour
//! range, are assigned to their nearest anchor; a sample inside the proximity
//! radius counts as one visit to that room.

use chrono::Timelike;
use navme_floorplan::{
    classify, room_color, visit_counts, vogel_spiral, Breadcrumb, Canvas, Floor, FloorLayout,
    FloorPlanSvg, FloorPoint, HeatCloud, HeatDot, HeatLevel, Padding, Pixel, PoiMarker, Position,
    Projection, ProximityMatch, RenderStyle, RoomAnchor, TrackedPoint,
};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::shop_status::{is_active_flag, number};
use super::table_view::parse_timestamp;
use super::BackendClient;
use crate::error::ApiError;
use crate::types::schema::{NAV_NODES_TABLE, ROOMS_TABLE};
use crate::types::HeatmapQuery;

/// Last selectable hour of the day.
pub const MAX_HOUR: u32 = 23;

/// Breadcrumb colour for samples with no room on their floor.
const UNASSIGNED_COLOR: &str = "#94A3B8";

/// Inclusive hour-of-day range.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct HourRange {
    pub from: u32,
    pub to: u32,
}

impl HourRange {
    pub const fn new(from: u32, to: u32) -> Self {
        Self { from, to }
    }

    pub fn contains(&self, hour: u32) -> bool {
        hour >= self.from && hour <= self.to
    }

    pub fn hours(&self) -> impl Iterator<Item = u32> {
        self.from..=self.to
    }
}

/// Named hour ranges.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TimePreset {
    AllDay,
    Morning,
    Afternoon,
    Evening,
}

impl TimePreset {
    pub const ALL: [TimePreset; 4] = [
        TimePreset::AllDay,
        TimePreset::Morning,
        TimePreset::Afternoon,
        TimePreset::Evening,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TimePreset::AllDay => "All Day",
            TimePreset::Morning => "Morning",
            TimePreset::Afternoon => "Afternoon",
            TimePreset::Evening => "Evening",
        }
    }

    pub fn range(&self) -> HourRange {
        match self {
            TimePreset::AllDay => HourRange::new(9, 20),
            TimePreset::Morning => HourRange::new(9, 12),
            TimePreset::Afternoon => HourRange::new(12, 17),
            TimePreset::Evening => HourRange::new(17, 20),
        }
    }

    /// Accepts the label in any case, with or without separators.
    pub fn parse(s: &str) -> Option<Self> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();
        Self::ALL
            .into_iter()
            .find(|p| p.label().replace(' ', "").to_lowercase() == key)
    }
}

/// Resolve the requested range.
///
/// A custom `from`/`to` overrides the preset's matching end; the end hour is
/// never earlier than the start hour.
pub fn resolve_range(
    preset: Option<&str>,
    from: Option<u32>,
    to: Option<u32>,
) -> Result<(HourRange, Option<TimePreset>), ApiError> {
    let preset = match preset.map(str::trim).filter(|p| !p.is_empty()) {
        Some(p) => Some(
            TimePreset::parse(p).ok_or_else(|| ApiError::BadRequest(format!("Unknown preset: {p}")))?,
        ),
        None => None,
    };
    for hour in [from, to].into_iter().flatten() {
        if hour > MAX_HOUR {
            return Err(ApiError::BadRequest(format!(
                "Hour {hour} out of range 0-{MAX_HOUR}"
            )));
        }
    }

    let chosen = preset.unwrap_or(TimePreset::AllDay);
    let base = chosen.range();
    let range = match (from, to) {
        (None, None) => return Ok((base, Some(chosen))),
        (Some(f), None) => HourRange::new(f, f.max(base.to)),
        (None, Some(t)) => HourRange::new(base.from.min(t), t),
        (Some(f), Some(t)) => HourRange::new(f, t.max(f)),
    };
    Ok((range, None))
}

/// `9 AM`, `12 PM`, `8 PM`.
pub fn format_hour(hour: u32) -> String {
    match hour {
        0 => "12 AM".to_string(),
        1..=11 => format!("{hour} AM"),
        12 => "12 PM".to_string(),
        h => format!("{} PM", h - 12),
    }
}

/// Room anchor read from `ar_rooms`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HeatRoom {
    pub room_id: String,
    pub name: String,
    pub color: String,
    pub position: Position,
}

fn text(v: Option<&Value>) -> Option<String> {
    match v? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn position(row: &Value) -> Option<Position> {
    Some(Position::new(
        number(row.get("pos_x"))?,
        number(row.get("pos_y"))?,
        number(row.get("pos_z"))?,
    ))
}

/// Active rooms with a complete numeric position, coloured in list order.
pub fn rooms_from_rows(rows: &[Value]) -> Vec<HeatRoom> {
    rows.iter()
        .filter(|row| is_active_flag(row.get("is_active")))
        .filter_map(|row| {
            let room_id = text(row.get("room_id"))?;
            let position = position(row)?;
            let name = text(row.get("room_name")).unwrap_or_else(|| format!("Room {room_id}"));
            Some((room_id, name, position))
        })
        .enumerate()
        .map(|(i, (room_id, name, position))| HeatRoom {
            room_id,
            name,
            color: room_color(i).to_string(),
            position,
        })
        .collect()
}

/// One logged navigation sample.
#[derive(Debug, Clone, PartialEq)]
pub struct NavSample {
    /// Backend id; rows without one get `-(index + 1)` so they never clash
    /// with stored ids.
    pub id: i64,
    pub user_name: Option<String>,
    pub position: Position,
    /// Hour of `created_at`, when parseable
    pub hour: Option<u32>,
}

pub fn samples_from_rows(rows: &[Value]) -> Vec<NavSample> {
    rows.iter()
        .enumerate()
        .filter_map(|(i, row)| {
            let id = ["id", "node_id"]
                .iter()
                .find_map(|k| row.get(*k).and_then(Value::as_i64))
                .unwrap_or(-(i as i64) - 1);
            let hour = row
                .get("created_at")
                .and_then(Value::as_str)
                .and_then(parse_timestamp)
                .map(|t| t.hour());
            Some(NavSample {
                id,
                user_name: text(row.get("node_name")),
                position: position(row)?,
                hour,
            })
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RoomHeat {
    pub room_id: String,
    pub name: String,
    pub color: String,
    pub position: FloorPoint,
    pub visits: u64,
    /// Visits relative to the busiest room, `0..=1`
    pub intensity: f64,
    pub level: HeatLevel,
    pub level_label: &'static str,
    pub heat_color: &'static str,
    pub marker: Pixel,
    pub dots: Vec<HeatDot>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HourBucket {
    pub hour: u32,
    pub label: String,
    pub visits: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HeatmapStats {
    pub total_visits: u64,
    pub max_visits: u64,
    pub peak_hour: u32,
    pub peak_hour_label: String,
    pub top_room: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Heatmap {
    pub floor: Floor,
    pub range: HourRange,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset: Option<&'static str>,
    pub canvas: Canvas,
    /// Rooms on this floor, in anchor order
    pub rooms: Vec<RoomHeat>,
    /// Room ids by visits, busiest first
    pub ranking: Vec<String>,
    pub hourly: Vec<HourBucket>,
    pub stats: HeatmapStats,
    /// Samples on this floor within the range, with their nearest room
    pub tracks: Vec<ProximityMatch>,
}

/// Parameters of one heatmap request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatmapOptions {
    pub floor: Floor,
    pub range: HourRange,
    pub preset: Option<TimePreset>,
    pub canvas: Canvas,
}

impl Default for HeatmapOptions {
    fn default() -> Self {
        Self {
            floor: Floor::Ground,
            range: TimePreset::AllDay.range(),
            preset: Some(TimePreset::AllDay),
            canvas: Canvas::default(),
        }
    }
}

impl HeatmapOptions {
    pub fn from_query(query: &HeatmapQuery) -> Result<Self, ApiError> {
        let floor = match query.floor.as_deref().map(str::trim).filter(|f| !f.is_empty()) {
            Some(f) => f
                .parse::<Floor>()
                .map_err(|e| ApiError::BadRequest(e.to_string()))?,
            None => Floor::Ground,
        };
        let (range, preset) = resolve_range(query.preset.as_deref(), query.from, query.to)?;
        let default = Canvas::default();
        Ok(Self {
            floor,
            range,
            preset,
            canvas: Canvas::new(
                query.width.unwrap_or(default.width),
                query.height.unwrap_or(default.height),
            ),
        })
    }
}

fn projection_for(floor: Floor, canvas: Canvas) -> Result<(FloorLayout, Projection), ApiError> {
    let layout = FloorLayout::for_floor(floor);
    let projection = Projection::new(canvas, Padding::default(), layout.bounds)?;
    Ok((layout, projection))
}

/// Compute the heatmap for one floor and hour range.
pub fn build_heatmap(
    rooms: &[HeatRoom],
    samples: &[NavSample],
    opts: HeatmapOptions,
) -> Result<Heatmap, ApiError> {
    let (_, projection) = projection_for(opts.floor, opts.canvas)?;

    let floor_rooms: Vec<&HeatRoom> = rooms
        .iter()
        .filter(|r| r.position.floor() == opts.floor)
        .collect();
    let anchors: Vec<RoomAnchor> = floor_rooms
        .iter()
        .map(|r| RoomAnchor {
            room_id: r.room_id.clone(),
            name: r.name.clone(),
            position: r.position.floor_point(),
            color: r.color.clone(),
        })
        .collect();

    let in_range: Vec<&NavSample> = samples
        .iter()
        .filter(|s| s.position.floor() == opts.floor)
        .filter(|s| s.hour.is_some_and(|h| opts.range.contains(h)))
        .collect();
    let points: Vec<TrackedPoint> = in_range
        .iter()
        .map(|s| TrackedPoint {
            id: s.id,
            user_name: s.user_name.clone(),
            position: s.position.floor_point(),
        })
        .collect();

    let tracks = classify(&points, &anchors);
    let visits = visit_counts(&tracks);

    let mut per_hour: FxHashMap<u32, u64> = FxHashMap::default();
    for (sample, m) in in_range.iter().zip(&tracks) {
        if let (true, Some(h)) = (m.inside, sample.hour) {
            *per_hour.entry(h).or_default() += 1;
        }
    }
    let hourly: Vec<HourBucket> = opts
        .range
        .hours()
        .map(|hour| HourBucket {
            hour,
            label: format_hour(hour),
            visits: per_hour.get(&hour).copied().unwrap_or(0),
        })
        .collect();

    let total_visits: u64 = visits.values().sum();
    let max_visits = visits.values().copied().max().unwrap_or(0).max(1);

    // Earliest hour wins ties
    let peak_hour = hourly
        .iter()
        .filter(|b| b.visits > 0)
        .fold(None::<&HourBucket>, |best, b| match best {
            Some(x) if x.visits >= b.visits => Some(x),
            _ => Some(b),
        })
        .map(|b| b.hour)
        .unwrap_or(opts.range.from);

    let room_heats: Vec<RoomHeat> = floor_rooms
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let v = visits.get(&r.room_id).copied().unwrap_or(0);
            let intensity = v as f64 / max_visits as f64;
            let level = HeatLevel::from_intensity(intensity);
            let position = r.position.floor_point();
            let marker = projection.project(position);
            let seed = r.room_id.parse::<u64>().unwrap_or(i as u64 + 1);
            RoomHeat {
                room_id: r.room_id.clone(),
                name: r.name.clone(),
                color: r.color.clone(),
                position,
                visits: v,
                intensity,
                level,
                level_label: level.label(),
                heat_color: level.color(),
                marker,
                dots: vogel_spiral(marker, seed, intensity),
            }
        })
        .collect();

    let mut order: Vec<usize> = (0..room_heats.len()).collect();
    order.sort_by(|&a, &b| room_heats[b].visits.cmp(&room_heats[a].visits));
    let ranking: Vec<String> = order.iter().map(|&i| room_heats[i].room_id.clone()).collect();
    let top_room = order
        .first()
        .filter(|_| total_visits > 0)
        .map(|&i| room_heats[i].name.clone());

    tracing::debug!(
        floor = %opts.floor,
        rooms = room_heats.len(),
        samples = tracks.len(),
        total_visits,
        "Built heatmap"
    );

    Ok(Heatmap {
        floor: opts.floor,
        range: opts.range,
        preset: opts.preset.map(|p| p.label()),
        canvas: opts.canvas,
        rooms: room_heats,
        ranking,
        hourly,
        stats: HeatmapStats {
            total_visits,
            max_visits,
            peak_hour,
            peak_hour_label: format_hour(peak_hour),
            top_room,
        },
        tracks,
    })
}

/// Draw the floor plan with room markers, heat clouds and breadcrumbs.
pub fn render_heatmap_svg(heatmap: &Heatmap, compact: bool) -> Result<String, ApiError> {
    let (layout, projection) = projection_for(heatmap.floor, heatmap.canvas)?;

    let markers: Vec<PoiMarker> = heatmap
        .rooms
        .iter()
        .map(|r| PoiMarker {
            room_id: r.room_id.clone(),
            name: r.name.clone(),
            position: r.position,
            color: r.color.clone(),
        })
        .collect();
    let clouds: Vec<HeatCloud> = heatmap
        .rooms
        .iter()
        .map(|r| HeatCloud {
            color: r.heat_color.to_string(),
            dots: r.dots.clone(),
        })
        .collect();
    let crumbs: Vec<Breadcrumb<'_>> = heatmap
        .tracks
        .iter()
        .map(|t| Breadcrumb {
            position: t.position,
            color: t
                .anchor_index
                .and_then(|i| heatmap.rooms.get(i))
                .map(|r| r.color.as_str())
                .unwrap_or(UNASSIGNED_COLOR),
            inside: t.inside,
        })
        .collect();

    let svg = FloorPlanSvg::new(&layout, &projection)
        .style(RenderStyle {
            compact,
            ..RenderStyle::default()
        })
        .breadcrumbs(crumbs)
        .heat_clouds(&clouds)
        .markers(&markers)
        .render();
    Ok(svg)
}

/// Fetch rooms and samples, then build the heatmap.
pub async fn fetch_heatmap(backend: &BackendClient, opts: HeatmapOptions) -> Result<Heatmap, ApiError> {
    let (room_rows, node_rows) = tokio::try_join!(
        backend.select_all(ROOMS_TABLE, None),
        backend.select_all(NAV_NODES_TABLE, None),
    )?;
    let rooms = rooms_from_rows(&room_rows);
    let samples = samples_from_rows(&node_rows);
    build_heatmap(&rooms, &samples, opts)
}
