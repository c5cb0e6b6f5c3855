// Copyright 2025 the Threadmark Authors
// SPDX-License-Identifier: Apache-2.0

//! Segments between consecutive anchors.
//!
//! A segment is a straight line when neither end carries a handle facing
//! the other, and a cubic Bezier otherwise. A missing handle on one side
//! of a curved segment collapses onto its anchor.

use super::point::AnchorPoint;
use crate::geometry;
use kurbo::{CubicBez, Line, ParamCurve, ParamCurveNearest, PathSeg, Point};

/// Accuracy passed to kurbo's nearest-point solver
const NEAREST_ACCURACY: f64 = 1e-3;

/// A segment of a path together with the anchors it connects
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentInfo {
    /// Index of the anchor the segment starts at
    pub start_index: usize,
    /// Index of the anchor the segment ends at (0 for a closing segment)
    pub end_index: usize,
    pub segment: PathSeg,
}

impl SegmentInfo {
    /// Build the segment joining two anchors
    pub fn between(start_index: usize, start: &AnchorPoint, end_index: usize, end: &AnchorPoint) -> Self {
        let p0 = start.position();
        let p3 = end.position();
        let segment = if start.control_out.is_none() && end.control_in.is_none() {
            PathSeg::Line(Line::new(p0, p3))
        } else {
            let p1 = p0 + start.control_out.unwrap_or_default();
            let p2 = p3 + end.control_in.unwrap_or_default();
            PathSeg::Cubic(CubicBez::new(p0, p1, p2, p3))
        };
        Self {
            start_index,
            end_index,
            segment,
        }
    }

    /// Distance from `point` to the segment and the parameter of the
    /// nearest location on it
    pub fn nearest(&self, point: Point) -> (f64, f64) {
        match self.segment {
            PathSeg::Line(line) => {
                let dist = geometry::distance_point_to_segment(point, line.p0, line.p1);
                let nearest = line.nearest(point, NEAREST_ACCURACY);
                (dist, nearest.t)
            }
            seg => {
                let nearest = seg.nearest(point, NEAREST_ACCURACY);
                (nearest.distance_sq.sqrt(), nearest.t)
            }
        }
    }

    pub fn is_line(&self) -> bool {
        matches!(self.segment, PathSeg::Line(_))
    }

    /// Point at parameter `t`
    pub fn eval(&self, t: f64) -> Point {
        self.segment.eval(t)
    }
}

/// Iterate the segments of a point list, including the closing segment
/// of a closed path
pub fn iter_segments(points: &[AnchorPoint], closed: bool) -> impl Iterator<Item = SegmentInfo> + '_ {
    let len = points.len();
    let open_count = len.saturating_sub(1);
    let closing = if closed && len >= 2 { 1 } else { 0 };
    (0..open_count + closing).map(move |i| {
        let j = (i + 1) % len;
        SegmentInfo::between(i, &points[i], j, &points[j])
    })
}
