// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Projection, proximity and render throughput.
//!
//! Run with: cargo bench -p navme-floorplan --bench floorplan

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use navme_floorplan::{
    classify, Floor, FloorLayout, FloorPlanSvg, FloorPoint, Projection, RoomAnchor, TrackedPoint,
};

/// Deterministic samples spread over the layout bounds.
fn generate_points(layout: &FloorLayout, count: usize) -> Vec<TrackedPoint> {
    let b = layout.bounds;
    // Weyl sequence, good enough coverage without an RNG dependency
    let (a1, a2) = (0.754_877_666_246_692_7, 0.569_840_290_998_053_2);
    (0..count)
        .map(|i| {
            let fx = (i as f64 * a1).fract();
            let fz = (i as f64 * a2).fract();
            TrackedPoint {
                id: i as i64,
                user_name: None,
                position: FloorPoint::new(b.x_min + fx * b.x_extent(), b.z_min + fz * b.z_extent()),
            }
        })
        .collect()
}

fn anchors(floor: Floor) -> Vec<RoomAnchor> {
    FloorLayout::reference_pois(floor)
        .iter()
        .map(|poi| RoomAnchor {
            room_id: poi.room_id.to_string(),
            name: poi.name.to_string(),
            position: poi.position,
            color: "#3B82F6".to_string(),
        })
        .collect()
}

fn bench_projection(c: &mut Criterion) {
    let layout = FloorLayout::ground();
    let proj = Projection::with_defaults(layout.bounds).unwrap();
    let mut group = c.benchmark_group("projection");

    for &count in &[1_000usize, 10_000] {
        let points = generate_points(&layout, count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("project", count), &points, |b, points| {
            b.iter(|| {
                points
                    .iter()
                    .map(|p| proj.project(black_box(p.position)))
                    .fold(0.0, |acc, px| acc + px.x + px.y)
            })
        });
    }
    group.finish();
}

fn bench_proximity(c: &mut Criterion) {
    let layout = FloorLayout::ground();
    let anchors = anchors(Floor::Ground);
    let mut group = c.benchmark_group("proximity");

    for &count in &[1_000usize, 10_000] {
        let points = generate_points(&layout, count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("classify", count), &points, |b, points| {
            b.iter(|| classify(black_box(points), black_box(&anchors)))
        });
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    for floor in Floor::ALL {
        let layout = FloorLayout::for_floor(floor);
        let proj = Projection::with_defaults(layout.bounds).unwrap();
        group.bench_function(BenchmarkId::new("svg", floor), |b| {
            b.iter(|| FloorPlanSvg::new(black_box(&layout), &proj).render())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_projection, bench_proximity, bench_render);
criterion_main!(benches);
