// Copyright 2025 the Threadmark Authors
// SPDX-License-Identifier: Apache-2.0

//! Editable vector paths: anchors with optional Bezier handles.
//!
//! A `Path` is an ordered list of `AnchorPoint`s plus a closed flag and a
//! plain style. Exactly one path may be under construction at a time (the
//! session's current path); committing it produces a `Shape`, which owns
//! the path exclusively and keeps its bounding box in sync. All paths
//! convert to `kurbo::BezPath` for rendering.

pub mod point;
pub mod segment;
pub mod shape;
pub mod style;

pub use point::{AnchorKind, AnchorPoint, HandleSide};
pub use segment::{SegmentInfo, iter_segments};
pub use shape::Shape;
pub use style::{LineCap, LineJoin, PathStyle, Rgba8};

use crate::error::PathError;
use crate::geometry::{self, is_finite_point};
use crate::model::EntityId;
use kurbo::{BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Whether a deletion left the owning path usable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The path still has enough points
    Retained,
    /// The path fell below its minimum and must be removed by the owner
    RemoveEntity,
}

/// A vector path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Path {
    #[serde(skip)]
    pub id: EntityId,
    pub points: Vec<AnchorPoint>,
    #[serde(default)]
    pub closed: bool,
    #[serde(default)]
    pub style: PathStyle,
}

impl Path {
    /// A new open path seeded with a single corner anchor
    pub fn new(origin: Point, style: PathStyle) -> Self {
        Self {
            id: EntityId::next(),
            points: vec![AnchorPoint::corner(origin)],
            closed: false,
            style,
        }
    }

    /// Build a path from existing anchors
    pub fn from_points(points: Vec<AnchorPoint>, closed: bool, style: PathStyle) -> Self {
        Self {
            id: EntityId::next(),
            points,
            closed,
            style,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last_point(&self) -> Option<Point> {
        self.points.last().map(AnchorPoint::position)
    }

    /// Anchor positions in order
    pub fn positions(&self) -> impl Iterator<Item = Point> + '_ {
        self.points.iter().map(AnchorPoint::position)
    }

    /// Bounds of the anchor positions (handles excluded)
    pub fn bounds(&self) -> Rect {
        geometry::bounds_from_points(self.positions())
    }

    pub fn segments(&self) -> impl Iterator<Item = SegmentInfo> + '_ {
        iter_segments(&self.points, self.closed)
    }

    /// Append a corner anchor at the end of the path
    pub fn append_point(&mut self, point: Point) -> Result<(), PathError> {
        check_finite(point)?;
        self.points.push(AnchorPoint::corner(point));
        Ok(())
    }

    /// Move an anchor; its handles travel with it
    pub fn update_point_position(&mut self, index: usize, x: f64, y: f64) -> Result<(), PathError> {
        check_finite(Point::new(x, y))?;
        let len = self.points.len();
        let anchor = self
            .points
            .get_mut(index)
            .ok_or(PathError::IndexOutOfRange { index, len })?;
        anchor.x = x;
        anchor.y = y;
        Ok(())
    }

    /// Translate every anchor by `delta`
    pub fn translate(&mut self, delta: Vec2) {
        for anchor in &mut self.points {
            anchor.set_position(anchor.position() + delta);
        }
    }

    /// Set one handle offset; the opposite handle follows the anchor kind
    pub fn update_control_handle(
        &mut self,
        index: usize,
        side: HandleSide,
        offset: Vec2,
    ) -> Result<(), PathError> {
        if !(offset.x.is_finite() && offset.y.is_finite()) {
            return Err(PathError::InvalidCoordinate {
                x: offset.x,
                y: offset.y,
            });
        }
        let len = self.points.len();
        let anchor = self
            .points
            .get_mut(index)
            .ok_or(PathError::IndexOutOfRange { index, len })?;
        anchor.set_control(side, offset);
        Ok(())
    }

    /// Change an anchor's kind, generating or clearing handles to match.
    ///
    /// Missing handles are generated from the neighbors with
    /// `auto_control_points` and `tension`. Converting to `Symmetric`
    /// averages existing handles into an exact mirror pair.
    pub fn set_anchor_kind(&mut self, index: usize, kind: AnchorKind, tension: f64) -> Result<(), PathError> {
        let len = self.points.len();
        if index >= len {
            return Err(PathError::IndexOutOfRange { index, len });
        }

        if kind == AnchorKind::Corner {
            self.points[index].clear_controls();
            return Ok(());
        }

        let prev = self.neighbor_index(index, false).map(|i| self.points[i].position());
        let next = self.neighbor_index(index, true).map(|i| self.points[i].position());
        let anchor = &mut self.points[index];

        if anchor.control_in.is_none() || anchor.control_out.is_none() {
            let auto = geometry::auto_control_points(prev, anchor.position(), next, tension);
            let control_in = anchor.control_in.unwrap_or(auto.control_in);
            let control_out = anchor.control_out.unwrap_or(auto.control_out);
            anchor.control_in = Some(control_in);
            anchor.control_out = Some(control_out);
        }

        anchor.kind = kind;
        if kind == AnchorKind::Symmetric
            && let (Some(c_in), Some(c_out)) = (anchor.control_in, anchor.control_out)
        {
            let out = (c_out - c_in) * 0.5;
            anchor.control_out = Some(out);
            anchor.control_in = Some(-out);
        }
        Ok(())
    }

    /// Remove an anchor.
    ///
    /// Returns `RemoveEntity` when fewer than `min_points` remain; the
    /// caller is expected to drop the whole path. A closed path that can
    /// no longer enclose an area is reopened.
    pub fn delete_point(&mut self, index: usize, min_points: usize) -> Result<DeleteOutcome, PathError> {
        let len = self.points.len();
        if index >= len {
            return Err(PathError::IndexOutOfRange { index, len });
        }
        self.points.remove(index);

        if self.points.len() < min_points {
            return Ok(DeleteOutcome::RemoveEntity);
        }
        if self.closed && self.points.len() < crate::settings::pen::CLOSE_MIN_POINTS {
            self.closed = false;
        }
        Ok(DeleteOutcome::Retained)
    }

    /// Close the path into a filled shape.
    ///
    /// Requires at least three points; three collinear points produce a
    /// degenerate but valid shape.
    pub fn close(mut self, source_tool: crate::tools::ToolId) -> Result<Shape, PathError> {
        let required = crate::settings::pen::CLOSE_MIN_POINTS;
        if self.points.len() < required {
            return Err(PathError::InsufficientPoints {
                found: self.points.len(),
                required,
            });
        }
        self.closed = true;
        Ok(Shape::new(self, source_tool))
    }

    /// Commit the path as an open stroke.
    pub fn into_stroke(mut self, source_tool: crate::tools::ToolId) -> Result<Shape, PathError> {
        let required = crate::settings::pen::STROKE_MIN_POINTS;
        if self.points.len() < required {
            return Err(PathError::InsufficientPoints {
                found: self.points.len(),
                required,
            });
        }
        self.closed = false;
        Ok(Shape::new(self, source_tool))
    }

    /// Index of the neighbor before (`forward == false`) or after an anchor,
    /// wrapping on closed paths
    pub fn neighbor_index(&self, index: usize, forward: bool) -> Option<usize> {
        let len = self.points.len();
        if len < 2 {
            return None;
        }
        if forward {
            if index + 1 < len {
                Some(index + 1)
            } else if self.closed {
                Some(0)
            } else {
                None
            }
        } else if index > 0 {
            Some(index - 1)
        } else if self.closed {
            Some(len - 1)
        } else {
            None
        }
    }

    /// Convert to a kurbo path for rendering
    pub fn to_bezpath(&self) -> BezPath {
        let mut bez = BezPath::new();
        let Some(first) = self.points.first() else {
            return bez;
        };
        bez.move_to(first.position());
        for seg in self.segments() {
            match seg.segment {
                kurbo::PathSeg::Line(line) => bez.line_to(line.p1),
                kurbo::PathSeg::Cubic(c) => bez.curve_to(c.p1, c.p2, c.p3),
                kurbo::PathSeg::Quad(q) => bez.quad_to(q.p1, q.p2),
            }
        }
        if self.closed && self.points.len() >= 2 {
            bez.close_path();
        }
        bez
    }

    /// True when every anchor and handle is finite
    pub fn is_finite(&self) -> bool {
        self.points.iter().all(|pt| {
            is_finite_point(pt.position())
                && pt.control_in.is_none_or(|c| c.is_finite())
                && pt.control_out.is_none_or(|c| c.is_finite())
        })
    }
}

fn check_finite(point: Point) -> Result<(), PathError> {
    if is_finite_point(point) {
        Ok(())
    } else {
        Err(PathError::InvalidCoordinate {
            x: point.x,
            y: point.y,
        })
    }
}
