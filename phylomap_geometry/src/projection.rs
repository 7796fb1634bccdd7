// Copyright 2025 the Phylomap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web Mercator projection under a pan/zoom view transform.

use core::f64::consts::{FRAC_PI_4, PI};

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Affine, Point, Vec2};
use phylomap_core::Projector;

/// Latitude beyond which Web Mercator is cut off, in degrees.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Web Mercator with a zoomable, pannable view.
///
/// A longitude of -180 maps to world x = 0 and +180 to `world_size`. Longitudes
/// outside that range continue linearly, so shifted world copies sit side by
/// side. Latitudes are clamped to [`MAX_LATITUDE`]. The view transform is
/// applied last.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MercatorViewport {
    /// Width and height in pixels of one copy of the world before `view`.
    pub world_size: f64,
    /// World pixels → screen pixels.
    pub view: Affine,
}

impl Default for MercatorViewport {
    fn default() -> Self {
        Self {
            world_size: 512.0,
            view: Affine::IDENTITY,
        }
    }
}

impl MercatorViewport {
    /// A viewport for a world `world_size` pixels across, with no pan or zoom.
    pub fn new(world_size: f64) -> Self {
        Self {
            world_size,
            ..Self::default()
        }
    }

    /// Replace the view transform.
    #[must_use]
    pub fn with_view(mut self, view: Affine) -> Self {
        self.view = view;
        self
    }

    /// Scale the view by `factor` about the screen point `focus`.
    #[must_use]
    pub fn zoomed(self, factor: f64, focus: Point) -> Self {
        let about = Affine::translate(focus.to_vec2());
        self.with_view(about * Affine::scale(factor) * about.inverse() * self.view)
    }

    /// Move the view by `delta` screen pixels.
    #[must_use]
    pub fn panned(self, delta: Vec2) -> Self {
        self.with_view(Affine::translate(delta) * self.view)
    }

    /// Position in world pixels, before the view transform.
    pub fn world_point(&self, latitude: f64, longitude: f64) -> Point {
        let x = (longitude + 180.0) / 360.0 * self.world_size;
        let phi = latitude.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
        let y = (0.5 - (FRAC_PI_4 + phi / 2.0).tan().ln() / (2.0 * PI)) * self.world_size;
        Point::new(x, y)
    }
}

impl Projector for MercatorViewport {
    fn project(&self, latitude: f64, longitude: f64) -> Point {
        self.view * self.world_point(latitude, longitude)
    }
}
