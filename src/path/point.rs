// Copyright 2025 the Threadmark Authors
// SPDX-License-Identifier: Apache-2.0

//! Anchor points and their control handles.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// How an anchor treats its control handles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorKind {
    /// No handles; segments meet at a sharp corner
    Corner,
    /// Both handles present and collinear, lengths independent
    Smooth,
    /// Both handles present, `control_out == -control_in`
    Symmetric,
}

impl AnchorKind {
    /// Next kind in the convert-anchor cycle
    pub fn cycled(self) -> Self {
        match self {
            AnchorKind::Corner => AnchorKind::Smooth,
            AnchorKind::Smooth => AnchorKind::Symmetric,
            AnchorKind::Symmetric => AnchorKind::Corner,
        }
    }

    pub fn has_handles(self) -> bool {
        !matches!(self, AnchorKind::Corner)
    }
}

/// Which handle of an anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleSide {
    /// Incoming tangent (towards the previous anchor)
    In,
    /// Outgoing tangent (towards the next anchor)
    Out,
}

impl HandleSide {
    pub fn opposite(self) -> Self {
        match self {
            HandleSide::In => HandleSide::Out,
            HandleSide::Out => HandleSide::In,
        }
    }
}

/// A vertex of a vector path
///
/// Handle offsets are stored relative to the anchor, so moving the anchor
/// carries its handles along.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnchorPoint {
    pub x: f64,
    pub y: f64,
    pub kind: AnchorKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_in: Option<Vec2>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_out: Option<Vec2>,
}

impl AnchorPoint {
    /// A corner anchor at `point`
    pub fn corner(point: Point) -> Self {
        Self {
            x: point.x,
            y: point.y,
            kind: AnchorKind::Corner,
            control_in: None,
            control_out: None,
        }
    }

    /// A smooth anchor with explicit handle offsets
    pub fn smooth(point: Point, control_in: Vec2, control_out: Vec2) -> Self {
        Self {
            x: point.x,
            y: point.y,
            kind: AnchorKind::Smooth,
            control_in: Some(control_in),
            control_out: Some(control_out),
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn set_position(&mut self, point: Point) {
        self.x = point.x;
        self.y = point.y;
    }

    pub fn control(&self, side: HandleSide) -> Option<Vec2> {
        match side {
            HandleSide::In => self.control_in,
            HandleSide::Out => self.control_out,
        }
    }

    fn control_mut(&mut self, side: HandleSide) -> &mut Option<Vec2> {
        match side {
            HandleSide::In => &mut self.control_in,
            HandleSide::Out => &mut self.control_out,
        }
    }

    /// Absolute position of a handle endpoint
    pub fn handle_point(&self, side: HandleSide) -> Option<Point> {
        self.control(side).map(|offset| self.position() + offset)
    }

    /// Set one handle and constrain the other according to the anchor kind.
    ///
    /// - `Corner` is promoted to `Smooth` and the opposite handle mirrors
    ///   the new one.
    /// - `Smooth` rotates the opposite handle to stay collinear, keeping
    ///   its own length.
    /// - `Symmetric` sets the opposite handle to the exact negation.
    pub fn set_control(&mut self, side: HandleSide, offset: Vec2) {
        *self.control_mut(side) = Some(offset);
        let opposite = side.opposite();
        match self.kind {
            AnchorKind::Corner => {
                self.kind = AnchorKind::Smooth;
                *self.control_mut(opposite) = Some(-offset);
            }
            AnchorKind::Smooth => {
                let current = self.control(opposite).unwrap_or(-offset);
                *self.control_mut(opposite) = Some(constrained_opposite(offset, current));
            }
            AnchorKind::Symmetric => {
                *self.control_mut(opposite) = Some(-offset);
            }
        }
    }

    /// Drop both handles and become a corner
    pub fn clear_controls(&mut self) {
        self.kind = AnchorKind::Corner;
        self.control_in = None;
        self.control_out = None;
    }

    /// True when the stored handles satisfy this anchor's kind
    pub fn satisfies_kind(&self) -> bool {
        match self.kind {
            AnchorKind::Corner => self.control_in.is_none() && self.control_out.is_none(),
            AnchorKind::Smooth => self.control_in.is_some() && self.control_out.is_some(),
            AnchorKind::Symmetric => match (self.control_in, self.control_out) {
                (Some(c_in), Some(c_out)) => (c_out + c_in).hypot() < 1e-9,
                _ => false,
            },
        }
    }
}

/// Rotate `opposite` so it points away from `moved`, keeping its length.
///
/// A zero-length `moved` handle leaves `opposite` untouched.
pub(crate) fn constrained_opposite(moved: Vec2, opposite: Vec2) -> Vec2 {
    let moved_len = moved.hypot();
    if moved_len <= f64::EPSILON {
        return opposite;
    }
    let length = opposite.hypot();
    -(moved / moved_len) * length
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_cycle() {
        assert_eq!(AnchorKind::Corner.cycled(), AnchorKind::Smooth);
        assert_eq!(AnchorKind::Smooth.cycled(), AnchorKind::Symmetric);
        assert_eq!(AnchorKind::Symmetric.cycled(), AnchorKind::Corner);
    }

    #[test]
    fn corner_promoted_on_handle_drag() {
        let mut pt = AnchorPoint::corner(Point::new(10.0, 10.0));
        pt.set_control(HandleSide::Out, Vec2::new(5.0, 0.0));
        assert_eq!(pt.kind, AnchorKind::Smooth);
        assert_eq!(pt.control_in, Some(Vec2::new(-5.0, 0.0)));
        assert!(pt.satisfies_kind());
    }

    #[test]
    fn smooth_keeps_opposite_length() {
        let mut pt = AnchorPoint::smooth(
            Point::ZERO,
            Vec2::new(-10.0, 0.0),
            Vec2::new(4.0, 0.0),
        );
        pt.set_control(HandleSide::In, Vec2::new(0.0, -3.0));
        let out = pt.control_out.unwrap();
        assert!((out.hypot() - 4.0).abs() < 1e-9);
        assert!((out.y - 4.0).abs() < 1e-9);
    }

    #[test]
    fn symmetric_mirrors_exactly() {
        let mut pt = AnchorPoint::smooth(Point::ZERO, Vec2::new(-1.0, 0.0), Vec2::new(1.0, 0.0));
        pt.kind = AnchorKind::Symmetric;
        pt.set_control(HandleSide::Out, Vec2::new(3.0, 7.0));
        assert_eq!(pt.control_in, Some(Vec2::new(-3.0, -7.0)));
        assert!(pt.satisfies_kind());
    }

    #[test]
    fn handle_point_is_absolute() {
        let pt = AnchorPoint::smooth(Point::new(10.0, 20.0), Vec2::new(-2.0, 0.0), Vec2::new(2.0, 1.0));
        assert_eq!(pt.handle_point(HandleSide::Out), Some(Point::new(12.0, 21.0)));
        assert_eq!(AnchorPoint::corner(Point::ZERO).handle_point(HandleSide::In), None);
    }

    #[test]
    fn anchor_json_shape() {
        let pt = AnchorPoint::corner(Point::new(1.0, 2.0));
        let json = serde_json::to_value(pt).unwrap();
        assert_eq!(json, serde_json::json!({ "x": 1.0, "y": 2.0, "kind": "corner" }));

        let smooth: AnchorPoint = serde_json::from_value(serde_json::json!({
            "x": 0.0, "y": 0.0, "kind": "smooth",
            "controlIn": { "x": -1.0, "y": 0.0 },
            "controlOut": { "x": 1.0, "y": 0.0 }
        }))
        .unwrap();
        assert_eq!(smooth.control_out, Some(Vec2::new(1.0, 0.0)));
    }
}
