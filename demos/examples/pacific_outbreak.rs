// Copyright 2025 the Phylomap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Build map data for a small Pacific outbreak tree, then filter and zoom it.
//!
//! The tree crosses the date line several times, and one island has no
//! coordinates so the missing-geography warning shows up in the log.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p phylomap_demos --example pacific_outbreak`

use kurbo::{Point, Vec2};
use phylomap_core::{
    Color, GeoTable, LatLong, MapData, MapOptions, Projector, Services, TreeNode, TreeState,
    Visibility,
};
use phylomap_geometry::{ArcCurve, CircularPie, MercatorViewport, WeightedRgbBlend};
use tracing::info;
use tracing_subscriber::EnvFilter;

const RESOLUTION: &str = "country";

fn geography() -> GeoTable {
    let mut geo = GeoTable::new();
    for (name, lat, long) in [
        ("fiji", -17.7, 178.0),
        ("samoa", -13.8, -172.1),
        ("tonga", -21.2, -175.2),
        ("vanuatu", -15.4, 166.9),
        ("new_caledonia", -20.9, 165.6),
        ("french_polynesia", -17.7, -149.4),
    ] {
        geo.insert(RESOLUTION, name, LatLong::new(lat, long));
    }
    geo
}

fn tree() -> Vec<TreeNode> {
    // (location, date, children)
    let layout: [(&str, f64, &[usize]); 12] = [
        ("fiji", 2014.0, &[1, 2, 3]),
        ("samoa", 2014.6, &[4, 5]),
        ("vanuatu", 2014.9, &[6, 7]),
        ("fiji", 2015.2, &[]),
        ("samoa", 2015.1, &[]),
        ("tonga", 2015.4, &[8, 9]),
        ("new_caledonia", 2015.3, &[]),
        ("vanuatu", 2015.8, &[]),
        ("tokelau", 2015.9, &[]),
        ("french_polynesia", 2016.2, &[10, 11]),
        ("french_polynesia", 2016.5, &[]),
        ("samoa", 2016.7, &[]),
    ];
    layout
        .iter()
        .enumerate()
        .map(|(i, &(location, date, children))| {
            TreeNode::new(i, date)
                .with_trait(RESOLUTION, location)
                .with_children(children.iter().copied())
        })
        .collect()
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let nodes = tree();
    let geo = geography();
    let lineage_a = Color::rgb(31, 119, 180);
    let lineage_b = Color::rgb(255, 127, 14);
    let colors: Vec<Color> = (0..nodes.len())
        .map(|i| {
            if i == 2 || i >= 5 {
                lineage_b
            } else {
                lineage_a
            }
        })
        .collect();
    let all_visible = vec![Visibility::Visible; nodes.len()];

    let viewport = MercatorViewport::new(1024.0);
    let curves = ArcCurve::default();
    let pie = CircularPie::default();
    let blend = WeightedRgbBlend::default();
    let services = Services {
        projector: &viewport,
        curves: &curves,
        pie: &pie,
        blend: &blend,
    };

    let (map, diagnostics) = MapData::build(
        TreeState::new(&nodes, &all_visible, &colors),
        RESOLUTION,
        &geo,
        MapOptions::default(),
        services,
    );
    info!(
        demes = map.demes.len(),
        transmissions = map.transmissions.len(),
        missing = ?diagnostics.missing_locations,
        "built map"
    );
    for deme in &map.demes.demes {
        let slices: Vec<String> = deme
            .visual
            .arcs()
            .unwrap_or_default()
            .iter()
            .filter(|a| a.value > 0.0)
            .map(|a| format!("{} x{}", a.color, a.value))
            .collect();
        println!(
            "deme {:<17} lon {:>7.1} at ({:>7.1}, {:>6.1}) count {} [{}]",
            deme.name,
            deme.lat_long.longitude,
            deme.coords.x,
            deme.coords.y,
            deme.count,
            slices.join(", ")
        );
    }
    for t in &map.transmissions.transmissions {
        println!(
            "transmission {:<6} {} -> {} ({:.1} -> {:.1}) extend {}",
            t.id.to_string(),
            t.origin_name,
            t.destination_name,
            t.origin_lat_long.longitude,
            t.destination_lat_long.longitude,
            t.extend
        );
    }

    // Filter to tips sampled before 2016.
    let before_2016: Vec<Visibility> = nodes
        .iter()
        .map(|n| {
            if n.num_date < 2016.0 {
                Visibility::Visible
            } else {
                Visibility::NotVisible
            }
        })
        .collect();
    let (map, _) = map.with_visibility_and_colors(
        TreeState::new(&nodes, &before_2016, &colors),
        RESOLUTION,
        &pie,
        &blend,
    );
    let shown = map
        .transmissions
        .transmissions
        .iter()
        .filter(|t| t.visible.is_visible())
        .count();
    println!(
        "after filtering: {shown} of {} transmissions visible",
        map.transmissions.len()
    );

    // Zoom on Fiji and pan a little; only positions and curves move.
    let fiji = viewport.project(-17.7, 178.0);
    let zoomed = viewport.zoomed(4.0, fiji).panned(Vec2::new(0.0, -30.0));
    let (map, _) = map.with_projection(&zoomed, &curves);
    if let Some(deme) = map.demes.for_location("fiji").next() {
        let moved: Point = deme.coords;
        println!("fiji now drawn at ({:.1}, {:.1})", moved.x, moved.y);
    }
}
