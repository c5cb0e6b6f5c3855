// Copyright 2025 the Threadmark Authors
// SPDX-License-Identifier: Apache-2.0

//! UV <-> canvas pixel conversion.

use glam::Vec2;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Pixel dimensions of the texture canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether `point` lies on the canvas (right and bottom edges included)
    pub fn contains(&self, point: Point) -> bool {
        (0.0..=f64::from(self.width)).contains(&point.x) && (0.0..=f64::from(self.height)).contains(&point.y)
    }

    /// Nearest point on the canvas
    pub fn clamp(&self, point: Point) -> Point {
        Point::new(
            point.x.clamp(0.0, f64::from(self.width)),
            point.y.clamp(0.0, f64::from(self.height)),
        )
    }

    /// One pixel in UV units along the shorter side
    pub fn pixel_uv(&self) -> f64 {
        1.0 / f64::from(self.width.min(self.height).max(1))
    }

    fn dims(&self) -> (f64, f64) {
        (f64::from(self.width.max(1)), f64::from(self.height.max(1)))
    }
}

/// A UV position on the canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasCoords {
    /// Nearest whole pixel
    pub pixel: Point,
    /// Unrounded position for sub-pixel consumers
    pub precise: Point,
}

/// Clamp `uv` to the unit square and scale it to canvas pixels
pub fn uv_to_canvas(uv: Vec2, size: CanvasSize) -> CanvasCoords {
    let precise = uv_to_canvas_precise(uv, size);
    CanvasCoords {
        pixel: Point::new(precise.x.round(), precise.y.round()),
        precise,
    }
}

pub fn uv_to_canvas_precise(uv: Vec2, size: CanvasSize) -> Point {
    let (w, h) = size.dims();
    let u = f64::from(uv.x).clamp(0.0, 1.0);
    let v = f64::from(uv.y).clamp(0.0, 1.0);
    Point::new(u * w, v * h)
}

/// Inverse of [`uv_to_canvas`], clamped to the unit square
pub fn canvas_to_uv(point: Point, size: CanvasSize) -> Vec2 {
    let (w, h) = size.dims();
    Vec2::new(
        (point.x / w).clamp(0.0, 1.0) as f32,
        (point.y / h).clamp(0.0, 1.0) as f32,
    )
}

/// Largest per-axis disagreement of `uv -> canvas -> uv` against the
/// clamped input
pub fn round_trip_error(uv: Vec2, size: CanvasSize) -> f64 {
    if !uv.is_finite() {
        return f64::INFINITY;
    }
    let clamped = uv.clamp(Vec2::ZERO, Vec2::ONE);
    let back = canvas_to_uv(uv_to_canvas(uv, size).pixel, size);
    let d = (back - clamped).abs();
    f64::from(d.x.max(d.y))
}

/// Check `uv -> canvas -> uv` at sub-pixel precision against the raw
/// input and report disagreement above `tolerance`
///
/// Seams and tiling make some UV regions multi-valued, so a mismatch is
/// only logged.
pub fn check_round_trip(uv: Vec2, size: CanvasSize, tolerance: f64) -> bool {
    let error = if uv.is_finite() {
        let back = canvas_to_uv(uv_to_canvas_precise(uv, size), size);
        let d = (back - uv).abs();
        f64::from(d.x.max(d.y))
    } else {
        f64::INFINITY
    };
    let ok = error <= tolerance;
    if !ok {
        tracing::warn!(
            "uv round trip mismatch at ({}, {}) on {}x{}: {:.2e}",
            uv.x,
            uv.y,
            size.width,
            size.height,
            error
        );
    }
    ok
}
