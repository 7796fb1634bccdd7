// Copyright 2025 the Phylomap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Point, Vec2};
use phylomap_core::{
    Color, GeoTable, LatLong, MapData, MapOptions, Services, TreeNode, TreeState, Visibility,
};
use phylomap_geometry::{ArcCurve, CircularPie, MercatorViewport, WeightedRgbBlend};

const RESOLUTION: &str = "region";

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

/// `locations` places scattered over the globe, named `loc0`, `loc1`, ...
fn gen_geo(locations: usize, rng: &mut Rng) -> GeoTable {
    let mut geo = GeoTable::new();
    for i in 0..locations {
        let lat = (rng.next_f64() - 0.5) * 140.0;
        let long = (rng.next_f64() - 0.5) * 360.0;
        geo.insert(RESOLUTION, format!("loc{i}"), LatLong::new(lat, long));
    }
    geo
}

/// A random tree of `n` nodes where every node's parent precedes it.
fn gen_tree(n: usize, locations: usize, rng: &mut Rng) -> Vec<TreeNode> {
    let mut dates = vec![2000.0_f64; n];
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); n];
    for i in 1..n {
        let p = rng.below(i);
        dates[i] = dates[p] + rng.next_f64();
        children[p].push(i);
    }
    children
        .into_iter()
        .enumerate()
        .map(|(i, kids)| {
            let location = format!("loc{}", rng.below(locations));
            TreeNode::new(i, dates[i])
                .with_trait(RESOLUTION, location)
                .with_children(kids)
        })
        .collect()
}

fn gen_colors(n: usize, rng: &mut Rng) -> Vec<Color> {
    let palette = [
        Color::rgb(230, 25, 75),
        Color::rgb(60, 180, 75),
        Color::rgb(0, 130, 200),
        Color::rgb(245, 130, 48),
        Color::rgb(145, 30, 180),
    ];
    (0..n).map(|_| palette[rng.below(palette.len())]).collect()
}

fn gen_visibility(n: usize, shown: f64, rng: &mut Rng) -> Vec<Visibility> {
    (0..n)
        .map(|_| {
            if rng.next_f64() < shown {
                Visibility::Visible
            } else {
                Visibility::NotVisible
            }
        })
        .collect()
}

struct Fixture {
    nodes: Vec<TreeNode>,
    geo: GeoTable,
    colors: Vec<Color>,
    all_visible: Vec<Visibility>,
    filtered: Vec<Visibility>,
}

impl Fixture {
    fn new(n: usize) -> Self {
        let mut rng = Rng::new(0xFACE_FEED_CAFE_BABE);
        let geo = gen_geo(60, &mut rng);
        let nodes = gen_tree(n, 60, &mut rng);
        let colors = gen_colors(n, &mut rng);
        let filtered = gen_visibility(n, 0.4, &mut rng);
        Self {
            nodes,
            geo,
            colors,
            all_visible: vec![Visibility::Visible; n],
            filtered,
        }
    }

    fn build(&self, visibility: &[Visibility], viewport: &MercatorViewport) -> MapData {
        let services = Services {
            projector: viewport,
            curves: &ArcCurve::default(),
            pie: &CircularPie::default(),
            blend: &WeightedRgbBlend::default(),
        };
        let tree = TreeState::new(&self.nodes, visibility, &self.colors);
        MapData::build(tree, RESOLUTION, &self.geo, MapOptions::default(), services).0
    }
}

fn bench_visibility(c: &mut Criterion) {
    let mut group = c.benchmark_group("visibility");
    let viewport = MercatorViewport::new(1024.0);
    for &n in &[1_000_usize, 10_000] {
        let fixture = Fixture::new(n);
        let built = fixture.build(&fixture.all_visible, &viewport);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("rebuild_n{n}"), |b| {
            b.iter(|| black_box(fixture.build(&fixture.filtered, &viewport)));
        });
        group.bench_function(format!("update_n{n}"), |b| {
            b.iter_batched(
                || built.clone(),
                |map| {
                    let tree = TreeState::new(&fixture.nodes, &fixture.filtered, &fixture.colors);
                    black_box(map.with_visibility_and_colors(
                        tree,
                        RESOLUTION,
                        &CircularPie::default(),
                        &WeightedRgbBlend::default(),
                    ))
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

fn bench_projection(c: &mut Criterion) {
    let mut group = c.benchmark_group("projection");
    let viewport = MercatorViewport::new(1024.0);
    let moved = viewport
        .zoomed(1.5, Point::new(512.0, 512.0))
        .panned(Vec2::new(-40.0, 25.0));
    for &n in &[1_000_usize, 10_000] {
        let fixture = Fixture::new(n);
        let built = fixture.build(&fixture.all_visible, &viewport);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("rebuild_n{n}"), |b| {
            b.iter(|| black_box(fixture.build(&fixture.all_visible, &moved)));
        });
        group.bench_function(format!("update_n{n}"), |b| {
            b.iter_batched(
                || built.clone(),
                |map| black_box(map.with_projection(&moved, &ArcCurve::default())),
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_visibility, bench_projection);
criterion_main!(benches);
