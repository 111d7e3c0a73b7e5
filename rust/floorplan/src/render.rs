// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! SVG line drawing of a floor layout.
//!
//! Draw order: room tints, interior walls, door swings, outer perimeter,
//! stair symbol, north arrow, tracked breadcrumbs, heat clouds, POI markers.

use crate::coords::FloorPoint;
use crate::heat::HeatDot;
use crate::layout::{Door, FloorLayout};
use crate::projection::{Pixel, Projection};
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// Serialise a vertex ring as `M x,y L x,y ... Z` with two decimals.
pub fn path_data(points: &[FloorPoint], projection: &Projection) -> String {
    let mut d = String::with_capacity(points.len() * 16 + 2);
    for (i, p) in points.iter().enumerate() {
        let px = projection.project(*p);
        if i > 0 {
            d.push(' ');
        }
        d.push_str(&format!(
            "{}{:.2},{:.2}",
            if i == 0 { 'M' } else { 'L' },
            px.x,
            px.y
        ));
    }
    d.push_str(" Z");
    d
}

/// Pixel-space construction of one door: the gap cut into the host wall, the
/// open leaf and its quarter-circle swing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DoorSwing {
    /// Hinge end of the opening
    pub hinge: Pixel,
    /// Latch end of the opening (closed leaf tip)
    pub latch: Pixel,
    /// Open leaf tip, a quarter turn from `latch` around `hinge`
    pub tip: Pixel,
    /// Leaf length in pixels, also the arc radius
    pub radius: f64,
    pub sweep_flag: u8,
}

impl DoorSwing {
    /// Segment cut out of the host wall
    pub fn gap(&self) -> (Pixel, Pixel) {
        (self.hinge, self.latch)
    }

    /// Open leaf from hinge to tip
    pub fn leaf(&self) -> (Pixel, Pixel) {
        (self.hinge, self.tip)
    }

    /// SVG arc from the hinge to the open tip (one decimal).
    pub fn arc_path(&self) -> String {
        format!(
            "M{:.1},{:.1} A{:.1},{:.1} 0 0,{} {:.1},{:.1}",
            self.hinge.x, self.hinge.y, self.radius, self.radius, self.sweep_flag, self.tip.x, self.tip.y
        )
    }
}

/// Build a door's swing geometry.
///
/// The opening is centred at fraction `t` along the host wall and spans the
/// leaf width; the open leaf points along the opening's unit perpendicular,
/// rotated by the door's swing side.
pub fn door_swing(door: &Door, projection: &Projection) -> DoorSwing {
    let center = door.center();
    let along = Vector2::new(door.end.x - door.start.x, door.end.z - door.start.z);
    let len = match along.norm() {
        l if l > 0.0 => l,
        _ => 1.0,
    };
    let unit = along / len;
    let half = door.width / 2.0;

    let hinge = projection.project(FloorPoint::new(center.x - unit.x * half, center.z - unit.y * half));
    let latch = projection.project(FloorPoint::new(center.x + unit.x * half, center.z + unit.y * half));

    let span = Vector2::new(latch.x - hinge.x, latch.y - hinge.y);
    let sl = match span.norm() {
        l if l > 0.0 => l,
        _ => 1.0,
    };
    let side = door.side.sign();
    let perp = Vector2::new(-span.y / sl, span.x / sl) * side;

    DoorSwing {
        hinge,
        latch,
        tip: Pixel::new(hinge.x + perp.x * sl, hinge.y + perp.y * sl),
        radius: sl,
        sweep_flag: door.side.sweep_flag(),
    }
}

/// Room marker drawn on top of the plan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PoiMarker {
    pub room_id: String,
    pub name: String,
    pub position: FloorPoint,
    pub color: String,
}

/// Tracked sample drawn as a breadcrumb
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breadcrumb<'a> {
    pub position: FloorPoint,
    pub color: &'a str,
    /// Inside the proximity radius of its nearest room
    pub inside: bool,
}

/// Heat cloud around one room marker
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HeatCloud {
    pub color: String,
    pub dots: Vec<HeatDot>,
}

/// Visual parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RenderStyle {
    /// Stroke colour for walls, doors and the perimeter
    pub primary: String,
    /// Background colour used to cut door gaps into walls
    pub card: String,
    /// Thinner strokes and no labels, for small viewports
    pub compact: bool,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            primary: "#3B82F6".to_string(),
            card: "#FFFFFF".to_string(),
            compact: false,
        }
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Renders a [`FloorLayout`] plus live overlays to a standalone SVG document
pub struct FloorPlanSvg<'a> {
    layout: &'a FloorLayout,
    projection: &'a Projection,
    style: RenderStyle,
    markers: &'a [PoiMarker],
    breadcrumbs: Vec<Breadcrumb<'a>>,
    clouds: &'a [HeatCloud],
}

impl<'a> FloorPlanSvg<'a> {
    pub fn new(layout: &'a FloorLayout, projection: &'a Projection) -> Self {
        Self {
            layout,
            projection,
            style: RenderStyle::default(),
            markers: &[],
            breadcrumbs: Vec::new(),
            clouds: &[],
        }
    }

    pub fn style(mut self, style: RenderStyle) -> Self {
        self.style = style;
        self
    }

    pub fn markers(mut self, markers: &'a [PoiMarker]) -> Self {
        self.markers = markers;
        self
    }

    pub fn breadcrumbs(mut self, breadcrumbs: Vec<Breadcrumb<'a>>) -> Self {
        self.breadcrumbs = breadcrumbs;
        self
    }

    pub fn heat_clouds(mut self, clouds: &'a [HeatCloud]) -> Self {
        self.clouds = clouds;
        self
    }

    pub fn render(&self) -> String {
        let canvas = self.projection.canvas();
        let (w, h) = (canvas.width, canvas.height);
        let compact = self.style.compact;
        let primary = escape_xml(&self.style.primary);
        let card = escape_xml(&self.style.card);
        let wall_w = if compact { 1.5 } else { 2.0 };
        let outer_w = if compact { 3.0 } else { 4.0 };
        let grid = if compact { 12.0 } else { 16.0 };

        let mut svg = String::new();
        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" data-floor="{floor}">
<defs>
  <pattern id="bpDot" x="0" y="0" width="{grid}" height="{grid}" patternUnits="userSpaceOnUse">
    <circle cx="{half}" cy="{half}" r="0.65" fill="{primary}" fill-opacity="0.12"/>
  </pattern>
</defs>
<rect width="{w}" height="{h}" fill="url(#bpDot)" rx="8"/>
"#,
            floor = self.layout.floor,
            half = grid / 2.0,
        ));

        for room in &self.layout.rooms {
            svg.push_str(&format!(
                r#"<path class="room" data-room="{}" d="{}" fill="{}" fill-opacity="0.09" stroke="none"/>
"#,
                escape_xml(&room.id),
                path_data(&room.points, self.projection),
                escape_xml(&room.color)
            ));
        }

        for wall in &self.layout.walls {
            let a = self.projection.project(wall.start);
            let b = self.projection.project(wall.end);
            svg.push_str(&format!(
                r#"<line class="wall" x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{primary}" stroke-width="{wall_w}" stroke-opacity="0.45" stroke-linecap="square"/>
"#,
                a.x, a.y, b.x, b.y
            ));
        }

        let leaf_w = if compact { 1.2 } else { 1.7 };
        let arc_w = if compact { 0.8 } else { 1.1 };
        for door in &self.layout.doors {
            let s = door_swing(door, self.projection);
            svg.push_str(&format!(
                r#"<g class="door">
  <line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{card}" stroke-width="{}"/>
  <line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{primary}" stroke-width="{leaf_w}" stroke-opacity="0.8" stroke-linecap="round"/>
  <path d="{}" fill="none" stroke="{primary}" stroke-width="{arc_w}" stroke-opacity="0.35" stroke-dasharray="3 2.5"/>
</g>
"#,
                s.hinge.x, s.hinge.y, s.latch.x, s.latch.y, outer_w + 4.0,
                s.hinge.x, s.hinge.y, s.tip.x, s.tip.y,
                s.arc_path()
            ));
        }

        svg.push_str(&format!(
            r#"<path class="outline" d="{}" fill="none" stroke="{primary}" stroke-width="{outer_w}" stroke-linejoin="miter" stroke-linecap="square" opacity="0.95"/>
"#,
            path_data(&self.layout.outline, self.projection)
        ));

        self.push_stair(&mut svg, &primary);

        if !compact {
            let pad = self.projection.padding();
            let (nx, ny) = (w - pad.right - 14.0, pad.top);
            svg.push_str(&format!(
                r#"<g class="compass"><polygon points="{},{} {},{} {},{} {},{}" fill="{primary}" opacity="0.7"/><text x="{}" y="{}" text-anchor="middle" fill="{primary}" font-size="9" font-weight="800" opacity="0.6">N</text></g>
"#,
                nx, ny + 3.0, nx - 5.0, ny + 20.0, nx, ny + 16.0, nx + 5.0, ny + 20.0,
                nx, ny + 32.0
            ));
        }

        let crumb_r = if compact { 1.8 } else { 2.8 };
        for crumb in &self.breadcrumbs {
            let p = self.projection.project(crumb.position);
            svg.push_str(&format!(
                r#"<circle class="crumb" cx="{:.2}" cy="{:.2}" r="{crumb_r}" fill="{}" fill-opacity="{}"/>
"#,
                p.x,
                p.y,
                escape_xml(crumb.color),
                if crumb.inside { 0.6 } else { 0.25 }
            ));
        }

        for cloud in self.clouds {
            let color = escape_xml(&cloud.color);
            for dot in &cloud.dots {
                svg.push_str(&format!(
                    r#"<circle class="heat" cx="{:.2}" cy="{:.2}" r="{:.2}" fill="{color}" fill-opacity="{:.3}"/>
"#,
                    dot.x,
                    dot.y,
                    dot.size / 2.0,
                    dot.opacity
                ));
            }
        }

        let (outer_r, inner_r) = if compact { (7.0, 2.5) } else { (11.0, 4.0) };
        for marker in self.markers {
            let p = self.projection.project(marker.position);
            let color = escape_xml(&marker.color);
            svg.push_str(&format!(
                r#"<g class="poi" data-room="{}">
  <circle cx="{:.2}" cy="{:.2}" r="{outer_r}" fill="{color}" fill-opacity="0.1" stroke="{color}" stroke-width="1.6" stroke-opacity="0.65"/>
  <circle cx="{:.2}" cy="{:.2}" r="{inner_r}" fill="{color}"/>
"#,
                escape_xml(&marker.room_id),
                p.x, p.y, p.x, p.y
            ));
            if !compact {
                svg.push_str(&format!(
                    r#"  <text x="{:.2}" y="{:.2}" text-anchor="middle" fill="{color}" font-size="8.5" font-weight="700">{}</text>
"#,
                    p.x,
                    p.y - outer_r - 5.0,
                    escape_xml(&marker.name)
                ));
            }
            svg.push_str("</g>\n");
        }

        svg.push_str("</svg>\n");
        svg
    }

    fn push_stair(&self, svg: &mut String, primary: &str) {
        let st = self.layout.stair;
        let left = self.projection.sx(st.z1);
        let right = self.projection.sx(st.z2);
        let top = self.projection.sy(st.x2);
        let bottom = self.projection.sy(st.x1);
        let (sw, sh) = (right - left, bottom - top);
        if !(sw > 0.0 && sh > 0.0) || st.steps == 0 {
            return;
        }

        svg.push_str(&format!(
            r#"<g class="stair" opacity="0.38">
  <rect x="{left:.2}" y="{top:.2}" width="{sw:.2}" height="{sh:.2}" fill="none" stroke="{primary}" stroke-width="1"/>
"#
        ));
        let rung = sh / st.steps as f64;
        for i in 0..=st.steps {
            let y = top + rung * i as f64;
            svg.push_str(&format!(
                r#"  <line x1="{left:.2}" y1="{y:.2}" x2="{right:.2}" y2="{y:.2}" stroke="{primary}" stroke-width="0.7"/>
"#
            ));
        }
        svg.push_str(&format!(
            r#"  <text x="{:.2}" y="{:.2}" text-anchor="middle" dominant-baseline="middle" fill="{primary}" font-size="{}" font-weight="700">UP</text>
</g>
"#,
            left + sw / 2.0,
            top + sh / 2.0,
            if self.style.compact { 4.5 } else { 7.0 }
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Bounds;
    use crate::layout::SwingSide;
    use approx::assert_relative_eq;

    fn unit_projection() -> Projection {
        // 100x100 drawable area, 1 unit = 10 px
        Projection::new(
            crate::projection::Canvas::new(100.0, 100.0),
            crate::projection::Padding::new(0.0, 0.0, 0.0, 0.0),
            Bounds::new(0.0, 10.0, 0.0, 10.0),
        )
        .unwrap()
    }

    #[test]
    fn test_path_data_format() {
        let proj = unit_projection();
        let d = path_data(
            &[FloorPoint::new(10.0, 0.0), FloorPoint::new(10.0, 5.0), FloorPoint::new(5.0, 5.0)],
            &proj,
        );
        assert_eq!(d, "M0.00,0.00 L50.00,0.00 L50.00,50.00 Z");
    }

    #[test]
    fn test_door_swing_is_quarter_turn() {
        let proj = unit_projection();
        // Host wall runs along z at x = 5, door centred, 2 units wide
        let door = Door {
            start: FloorPoint::new(5.0, 0.0),
            end: FloorPoint::new(5.0, 10.0),
            t: 0.5,
            width: 2.0,
            side: SwingSide::Clockwise,
        };
        let s = door_swing(&door, &proj);
        assert_relative_eq!(s.hinge.x, 40.0, epsilon = 1e-9);
        assert_relative_eq!(s.hinge.y, 50.0, epsilon = 1e-9);
        assert_relative_eq!(s.latch.x, 60.0, epsilon = 1e-9);
        assert_relative_eq!(s.radius, 20.0, epsilon = 1e-9);
        // perpendicular of (+20, 0) rotated with side +1 is (0, +1)
        assert_relative_eq!(s.tip.x, 40.0, epsilon = 1e-9);
        assert_relative_eq!(s.tip.y, 70.0, epsilon = 1e-9);
        assert_eq!(s.arc_path(), "M40.0,50.0 A20.0,20.0 0 0,1 40.0,70.0");

        let flipped = door_swing(&Door { side: SwingSide::CounterClockwise, ..door }, &proj);
        assert_relative_eq!(flipped.tip.y, 30.0, epsilon = 1e-9);
        assert_eq!(flipped.sweep_flag, 0);
    }

    #[test]
    fn test_zero_length_wall_does_not_divide_by_zero() {
        let proj = unit_projection();
        let door = Door {
            start: FloorPoint::new(5.0, 5.0),
            end: FloorPoint::new(5.0, 5.0),
            t: 0.5,
            width: 1.0,
            side: SwingSide::Clockwise,
        };
        let s = door_swing(&door, &proj);
        assert!(s.tip.x.is_finite() && s.tip.y.is_finite());
    }

    #[test]
    fn test_render_contains_every_element() {
        let layout = FloorLayout::ground();
        let proj = Projection::with_defaults(layout.bounds).unwrap();
        let markers = vec![PoiMarker {
            room_id: "1".into(),
            name: "Office <A&B>".into(),
            position: FloorPoint::new(0.77, 0.52),
            color: "#F59E0B".into(),
        }];
        let svg = FloorPlanSvg::new(&layout, &proj)
            .markers(&markers)
            .breadcrumbs(vec![Breadcrumb {
                position: FloorPoint::new(1.0, 1.0),
                color: "#F59E0B",
                inside: true,
            }])
            .render();

        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("class=\"room\"").count(), layout.rooms.len());
        assert_eq!(svg.matches("class=\"wall\"").count(), layout.walls.len());
        assert_eq!(svg.matches("class=\"door\"").count(), layout.doors.len());
        assert!(svg.contains("Office &lt;A&amp;B&gt;"));
        assert!(svg.contains("fill-opacity=\"0.6\""));
        assert!(svg.contains(">UP</text>"));
        assert!(svg.contains(">N</text>"));
    }

    #[test]
    fn test_compact_render_hides_labels() {
        let layout = FloorLayout::first();
        let proj = Projection::with_defaults(layout.bounds).unwrap();
        let markers = vec![PoiMarker {
            room_id: "9".into(),
            name: "Room 4".into(),
            position: FloorPoint::new(5.28, 0.09),
            color: "#F59E0B".into(),
        }];
        let svg = FloorPlanSvg::new(&layout, &proj)
            .style(RenderStyle {
                compact: true,
                ..RenderStyle::default()
            })
            .markers(&markers)
            .render();
        assert!(!svg.contains(">Room 4<"));
        assert!(!svg.contains(">N</text>"));
        assert!(svg.contains("class=\"poi\""));
    }
}
