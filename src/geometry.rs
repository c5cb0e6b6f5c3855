// Copyright 2025 the Threadmark Authors
// SPDX-License-Identifier: Apache-2.0

//! Geometry helpers shared by the path model, hit testing and tools.
//!
//! Everything here is a pure function over `kurbo` types. Coordinates are
//! canvas pixels unless noted otherwise.

use kurbo::{Point, Rect, Vec2};

/// Distance from `p` to the segment `a`-`b`, clamped to the segment ends.
///
/// A degenerate segment (`a == b`) measures the distance to `a`.
pub fn distance_point_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len_sq = ab.hypot2();
    if len_sq <= f64::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Axis-aligned bounds of `points`.
///
/// Returns a zero-size rect at the point for a single point and
/// `Rect::ZERO` for empty input.
pub fn bounds_from_points<I>(points: I) -> Rect
where
    I: IntoIterator<Item = Point>,
{
    let mut iter = points.into_iter();
    let Some(first) = iter.next() else {
        return Rect::ZERO;
    };

    let mut min_x = first.x;
    let mut max_x = first.x;
    let mut min_y = first.y;
    let mut max_y = first.y;

    for pt in iter {
        min_x = min_x.min(pt.x);
        max_x = max_x.max(pt.x);
        min_y = min_y.min(pt.y);
        max_y = max_y.max(pt.y);
    }

    Rect::new(min_x, min_y, max_x, max_y)
}

/// Pair of handle offsets relative to an anchor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlPair {
    pub control_in: Vec2,
    pub control_out: Vec2,
}

/// Catmull-Rom style handles for `curr`, scaled by `tension` in `[0, 1]`.
///
/// With both neighbors the tangent is `next - prev`. At a path end the
/// missing neighbor is reflected through `curr`, so the tangent derives
/// from the single adjacent edge. The handles are symmetric: `control_in`
/// is always `-control_out`. Tension 0.5 reproduces the uniform
/// Catmull-Rom to Bezier conversion (`tangent / 6`).
pub fn auto_control_points(
    prev: Option<Point>,
    curr: Point,
    next: Option<Point>,
    tension: f64,
) -> ControlPair {
    let tangent = match (prev, next) {
        (Some(p), Some(n)) => n - p,
        (None, Some(n)) => (n - curr) * 2.0,
        (Some(p), None) => (curr - p) * 2.0,
        (None, None) => Vec2::ZERO,
    };
    let out = tangent * (tension.clamp(0.0, 1.0) / 3.0);
    ControlPair {
        control_in: -out,
        control_out: out,
    }
}

/// Round each component to the nearest multiple of `grid_size`.
///
/// A non-positive or non-finite grid leaves the point unchanged.
pub fn snap_to_grid(point: Point, grid_size: f64) -> Point {
    if !(grid_size.is_finite() && grid_size > 0.0) {
        return point;
    }
    Point::new(
        (point.x / grid_size).round() * grid_size,
        (point.y / grid_size).round() * grid_size,
    )
}

/// Nearest candidate within `radius` of `point`, else `point` itself.
pub fn snap_to_point<I>(point: Point, candidates: I, radius: f64) -> Point
where
    I: IntoIterator<Item = Point>,
{
    let mut best: Option<(Point, f64)> = None;
    for candidate in candidates {
        let dist = point.distance(candidate);
        if dist > radius {
            continue;
        }
        match best {
            Some((_, best_dist)) if best_dist <= dist => {}
            _ => best = Some((candidate, dist)),
        }
    }
    best.map_or(point, |(candidate, _)| candidate)
}

/// True when both coordinates are finite numbers
pub fn is_finite_point(point: Point) -> bool {
    point.x.is_finite() && point.y.is_finite()
}
