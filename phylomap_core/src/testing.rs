// Copyright 2025 the Phylomap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared fixtures and stand-in services for unit tests.

use alloc::vec::Vec;
use core::f64::consts::TAU;

use kurbo::Point;

use crate::aggregate::ColorCounts;
use crate::services::PieSlice;
use crate::types::{Color, GeoTable, LatLong, TreeNode, Visibility};

pub(crate) const RED: Color = Color::rgb(255, 0, 0);
pub(crate) const BLUE: Color = Color::rgb(0, 0, 255);
pub(crate) const GREEN: Color = Color::rgb(0, 255, 0);

/// Root at A with tips (A, red, visible), (A, blue, hidden), (B, red, visible).
pub(crate) fn two_location_tree() -> (Vec<TreeNode>, Vec<Visibility>, Vec<Color>) {
    let nodes = alloc::vec![
        TreeNode::new(0, 2000.0)
            .with_trait("country", "A")
            .with_children([1, 2, 3]),
        TreeNode::new(1, 2001.0).with_trait("country", "A"),
        TreeNode::new(2, 2002.0).with_trait("country", "A"),
        TreeNode::new(3, 2004.0).with_trait("country", "B"),
    ];
    let vis = alloc::vec![
        Visibility::Visible,
        Visibility::Visible,
        Visibility::NotVisible,
        Visibility::Visible,
    ];
    let colors = alloc::vec![RED, RED, BLUE, RED];
    (nodes, vis, colors)
}

pub(crate) fn geo() -> GeoTable {
    let mut geo = GeoTable::new();
    geo.insert("country", "A", LatLong::new(10.0, 0.0));
    geo.insert("country", "B", LatLong::new(20.0, 10.0));
    geo.insert("country", "C", LatLong::new(-5.0, 170.0));
    geo.insert("country", "D", LatLong::new(5.0, -170.0));
    geo.insert("country", "E", LatLong::new(0.0, -100.0));
    geo.insert("country", "F", LatLong::new(0.0, 100.0));
    geo
}

/// Plate carrée scaled by `scale`, panned by `dx`.
pub(crate) fn flat(scale: f64, dx: f64) -> impl Fn(f64, f64) -> Point {
    move |lat, long| Point::new(long * scale + dx, -lat * scale)
}

/// Straight line with five samples, nudged sideways by `extend`.
pub(crate) fn straight(origin: Point, destination: Point, extend: u32) -> Vec<Point> {
    (0..5)
        .map(|i| {
            let t = f64::from(i) / 4.0;
            let p = origin.lerp(destination, t);
            Point::new(p.x, p.y + f64::from(extend) * 0.01)
        })
        .collect()
}

pub(crate) fn proportional_pie(values: &[f64]) -> Vec<PieSlice> {
    let sum: f64 = values.iter().sum();
    let k = if sum > 0.0 { TAU / sum } else { 0.0 };
    let mut angle = 0.0;
    values
        .iter()
        .map(|&value| {
            let start_angle = angle;
            angle += value * k;
            PieSlice {
                value,
                start_angle,
                end_angle: angle,
            }
        })
        .collect()
}

/// The visible color with the most tips, or grey.
pub(crate) fn dominant(counts: &ColorCounts) -> Color {
    counts
        .iter()
        .filter(|(_, c)| c.n_visible > 0)
        .max_by_key(|(_, c)| c.n_visible)
        .map(|(color, _)| *color)
        .unwrap_or(Color::rgb(128, 128, 128))
}
