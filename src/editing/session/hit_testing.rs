// Copyright 2025 the Threadmark Authors
// SPDX-License-Identifier: Apache-2.0

//! Hit testing and region queries for EditSession

use super::EditSession;
use crate::editing::hit_test::{self, HitOptions, HitPriority, HitResult};
use crate::model::EntityId;
use kurbo::{Point, Rect};

impl EditSession {
    /// Hit test every editable path with the configured radii
    pub fn hit_test(&self, point: Point, priority: HitPriority, multi_select: bool) -> Option<HitResult> {
        let options = HitOptions {
            priority,
            multi_select,
            ..HitOptions::default()
        }
        .with_radii(self.config.hit);
        hit_test::detect_hit(point, self.owned_paths(), &options)
    }

    /// Topmost committed shape whose bounding box contains `point`
    pub fn hit_test_bounds(&self, point: Point) -> Option<EntityId> {
        let margin = self.config.hit.anchor_radius;
        hit_test::detect_bounds_hit(
            point,
            self.shapes().iter().map(|shape| (shape.id(), shape.path())),
            margin,
        )
    }

    /// Committed shapes whose bounding box intersects `rect`
    pub fn shapes_in_rect(&self, rect: Rect) -> Vec<EntityId> {
        let rect = rect.abs();
        self.shapes()
            .iter()
            .filter(|shape| {
                let bbox = shape.bounding_box();
                // zero-area boxes still count when they touch the rectangle
                bbox.x0 <= rect.x1 && bbox.x1 >= rect.x0 && bbox.y0 <= rect.y1 && bbox.y1 >= rect.y0
            })
            .map(|shape| shape.id())
            .collect()
    }

    /// Committed shapes with any segment (or lone anchor) within `radius`
    pub fn shapes_near(&self, point: Point, radius: f64) -> Vec<EntityId> {
        self.shapes()
            .iter()
            .filter(|shape| {
                let path = shape.path();
                if path.len() == 1 {
                    return path.positions().any(|p| p.distance(point) <= radius);
                }
                path.segments().any(|seg| seg.nearest(point).0 <= radius)
            })
            .map(|shape| shape.id())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::editing::EditSession;
    use crate::tools::ToolId;
    use kurbo::{Point, Rect};

    fn session_with_lines() -> (EditSession, Vec<crate::model::EntityId>) {
        let mut session = EditSession::default();
        let mut ids = Vec::new();
        for y in [0.0, 100.0] {
            session.start_path(Point::new(0.0, y)).unwrap();
            session.append_to_current(Point::new(50.0, y)).unwrap();
            ids.push(session.commit_current_path(ToolId::Pen).unwrap());
        }
        (session, ids)
    }

    #[test]
    fn rect_query_hits_flat_boxes() {
        let (session, ids) = session_with_lines();
        assert_eq!(session.shapes_in_rect(Rect::new(10.0, -5.0, 20.0, 5.0)), vec![ids[0]]);
        assert_eq!(session.shapes_in_rect(Rect::new(20.0, 120.0, 10.0, -5.0)), ids);
        assert!(session.shapes_in_rect(Rect::new(60.0, 0.0, 70.0, 10.0)).is_empty());
    }

    #[test]
    fn near_query_uses_segment_distance() {
        let (session, ids) = session_with_lines();
        assert_eq!(session.shapes_near(Point::new(25.0, 95.0), 10.0), vec![ids[1]]);
        assert!(session.shapes_near(Point::new(25.0, 50.0), 10.0).is_empty());
    }

    #[test]
    fn bounds_hit_uses_margin() {
        let (session, ids) = session_with_lines();
        assert_eq!(session.hit_test_bounds(Point::new(25.0, 4.0)), Some(ids[0]));
        assert_eq!(session.hit_test_bounds(Point::new(25.0, 50.0)), None);
    }
}
