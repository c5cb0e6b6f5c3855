// Copyright 2025 the Threadmark Authors
// SPDX-License-Identifier: Apache-2.0

//! Structural edits for EditSession: anchor and handle drags, kind
//! conversion, curvature pulls, translation and deletion.

use super::EditSession;
use crate::editing::selection::AnchorRef;
use crate::error::PathError;
use crate::geometry;
use crate::model::EntityId;
use crate::path::{AnchorKind, AnchorPoint, DeleteOutcome, HandleSide};
use kurbo::{Point, Vec2};

/// Result of a delete command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteEffect {
    /// Nothing was selected
    Nothing,
    /// One anchor removed; the owner survived
    AnchorRemoved { owner: EntityId },
    /// The owner fell below its minimum and was removed
    PathRemoved { owner: EntityId },
    /// Whole shapes were removed
    ShapesRemoved { count: usize },
}

impl EditSession {
    /// Move an anchor to `target`, applying grid and point snapping
    pub fn move_anchor(&mut self, anchor: AnchorRef, target: Point) -> Result<(), PathError> {
        let snap = self.config.anchors;
        let mut target = geometry::snap_to_grid(target, snap.snap_grid);
        if snap.snap_radius > 0.0 {
            let others: Vec<Point> = self
                .owned_paths()
                .flat_map(|(owner, path)| {
                    path.positions()
                        .enumerate()
                        .filter(move |(index, _)| !(owner == anchor.owner && *index == anchor.index))
                        .map(|(_, pos)| pos)
                })
                .collect();
            target = geometry::snap_to_point(target, others, snap.snap_radius);
        }

        self.edit_path(anchor.owner, |path| {
            path.update_point_position(anchor.index, target.x, target.y)
        })
        .ok_or(PathError::ShapeNotFound(anchor.owner))?
    }

    /// Drag a handle endpoint to the absolute position `handle`
    pub fn move_handle(&mut self, anchor: AnchorRef, side: HandleSide, handle: Point) -> Result<(), PathError> {
        let origin = self
            .path(anchor.owner)
            .ok_or(PathError::ShapeNotFound(anchor.owner))?
            .points
            .get(anchor.index)
            .map(AnchorPoint::position);
        let Some(origin) = origin else {
            let len = self.path(anchor.owner).map_or(0, |path| path.len());
            return Err(PathError::IndexOutOfRange {
                index: anchor.index,
                len,
            });
        };
        self.edit_path(anchor.owner, |path| {
            path.update_control_handle(anchor.index, side, handle - origin)
        })
        .ok_or(PathError::ShapeNotFound(anchor.owner))?
    }

    /// Advance an anchor through Corner, Smooth, Symmetric
    pub fn cycle_anchor_kind(&mut self, anchor: AnchorRef) -> Result<AnchorKind, PathError> {
        let tension = self.config.anchors.auto_tension;
        self.edit_path(anchor.owner, |path| {
            let len = path.len();
            let kind = path
                .points
                .get(anchor.index)
                .ok_or(PathError::IndexOutOfRange {
                    index: anchor.index,
                    len,
                })?
                .kind
                .cycled();
            path.set_anchor_kind(anchor.index, kind, tension)?;
            Ok(kind)
        })
        .ok_or(PathError::ShapeNotFound(anchor.owner))?
    }

    /// Bend the segment starting at `segment` by pulling from `grab` to
    /// `current`.
    ///
    /// Both endpoints become `Smooth`. The start's outgoing handle points
    /// along the pull, the end's incoming handle the opposite way, each of
    /// length `min(distance * gain, max_handle)`; the far handles are kept
    /// collinear. A zero pull restores `originals`.
    pub fn pull_curvature(
        &mut self,
        owner: EntityId,
        segment: usize,
        grab: Point,
        current: Point,
        originals: (AnchorPoint, AnchorPoint),
    ) -> Result<(), PathError> {
        let curvature = self.config.curvature;
        self.edit_path(owner, |path| {
            let len = path.len();
            let end = path
                .neighbor_index(segment, true)
                .filter(|_| segment < len)
                .ok_or(PathError::IndexOutOfRange { index: segment, len })?;

            let pull = current - grab;
            let distance = pull.hypot();
            if distance <= f64::EPSILON {
                path.points[segment] = originals.0;
                path.points[end] = originals.1;
                return Ok(());
            }

            let magnitude = (distance * curvature.gain).min(curvature.max_handle);
            let handle = pull / distance * magnitude;

            for index in [segment, end] {
                let anchor = &mut path.points[index];
                if anchor.kind != AnchorKind::Smooth {
                    anchor.kind = AnchorKind::Smooth;
                }
            }
            path.points[segment].set_control(HandleSide::Out, handle);
            path.points[end].set_control(HandleSide::In, -handle);
            Ok(())
        })
        .ok_or(PathError::ShapeNotFound(owner))?
    }

    /// Translate every selected shape
    pub fn translate_selected(&mut self, delta: Vec2) {
        if !(delta.x.is_finite() && delta.y.is_finite()) || delta == Vec2::ZERO {
            return;
        }
        let ids: Vec<EntityId> = self.selection.selected_shape_ids.iter().copied().collect();
        for id in ids {
            self.edit_path(id, |path| path.translate(delta));
        }
    }

    /// Delete the selected anchor, or every selected shape when no anchor
    /// is selected.
    ///
    /// An owner that falls below its minimum point count is removed
    /// entirely (two points for the current path, `min_shape_points` for a
    /// committed shape). Otherwise the owner's last point becomes the
    /// selected anchor.
    pub fn delete_selection(&mut self) -> DeleteEffect {
        if let Some(anchor) = self.selection.selected_anchor {
            let is_current = self.is_current_path(anchor.owner);
            let min_points = if is_current {
                crate::settings::pen::STROKE_MIN_POINTS
            } else {
                self.config.anchors.min_shape_points
            };

            let outcome = self.edit_path(anchor.owner, |path| {
                path.delete_point(anchor.index, min_points).map(|outcome| (outcome, path.len()))
            });
            return match outcome {
                Some(Ok((DeleteOutcome::Retained, remaining))) => {
                    self.selection.select_anchor(AnchorRef {
                        owner: anchor.owner,
                        index: remaining - 1,
                    });
                    self.changes.selection = true;
                    DeleteEffect::AnchorRemoved { owner: anchor.owner }
                }
                Some(Ok((DeleteOutcome::RemoveEntity, _))) => {
                    if is_current {
                        self.discard_current_path();
                    } else if let Err(err) = self.remove_shape(anchor.owner) {
                        tracing::warn!("Failed to remove shape after delete: {}", err);
                    }
                    DeleteEffect::PathRemoved { owner: anchor.owner }
                }
                Some(Err(err)) => {
                    tracing::debug!("[delete_selection] rejected: {}", err);
                    self.selection.selected_anchor = None;
                    self.changes.selection = true;
                    DeleteEffect::Nothing
                }
                None => {
                    self.selection.selected_anchor = None;
                    self.changes.selection = true;
                    DeleteEffect::Nothing
                }
            };
        }

        let ids: Vec<EntityId> = self.selection.selected_shape_ids.iter().copied().collect();
        if ids.is_empty() {
            return DeleteEffect::Nothing;
        }
        let count = ids.into_iter().filter(|id| self.remove_shape(*id).is_ok()).count();
        DeleteEffect::ShapesRemoved { count }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ToolId;

    fn committed_line(session: &mut EditSession, a: (f64, f64), b: (f64, f64)) -> EntityId {
        session.start_path(Point::new(a.0, a.1)).unwrap();
        session.append_to_current(Point::new(b.0, b.1)).unwrap();
        session.commit_current_path(ToolId::Pen).unwrap()
    }

    fn pull(session: &mut EditSession, owner: EntityId, to: Point) {
        let path = session.path(owner).unwrap();
        let originals = (path.points[0], path.points[1]);
        session
            .pull_curvature(owner, 0, Point::new(50.0, 0.0), to, originals)
            .unwrap();
    }

    #[test]
    fn curvature_pull_sets_opposite_handles() {
        let mut session = EditSession::default();
        let id = committed_line(&mut session, (0.0, 0.0), (100.0, 0.0));
        pull(&mut session, id, Point::new(50.0, 30.0));

        let pts = &session.shape(id).unwrap().path().points;
        assert_eq!(pts[0].kind, AnchorKind::Smooth);
        assert_eq!(pts[1].kind, AnchorKind::Smooth);
        assert_eq!(pts[0].control_out, Some(Vec2::new(0.0, 30.0)));
        assert_eq!(pts[1].control_in, Some(Vec2::new(0.0, -30.0)));
        // far handles collinear with the pulled ones
        assert_eq!(pts[0].control_in, Some(Vec2::new(0.0, -30.0)));
        assert_eq!(pts[1].control_out, Some(Vec2::new(0.0, 30.0)));
    }

    #[test]
    fn curvature_pull_is_capped() {
        let mut session = EditSession::default();
        let id = committed_line(&mut session, (0.0, 0.0), (100.0, 0.0));
        pull(&mut session, id, Point::new(50.0, 1000.0));
        let out = session.shape(id).unwrap().path().points[0].control_out.unwrap();
        assert!((out.hypot() - crate::settings::curvature::MAX_HANDLE).abs() < 1e-9);
    }

    #[test]
    fn zero_pull_restores_originals() {
        let mut session = EditSession::default();
        let id = committed_line(&mut session, (0.0, 0.0), (100.0, 0.0));
        let before = session.shape(id).unwrap().path().points.clone();
        pull(&mut session, id, Point::new(50.0, 30.0));
        session
            .pull_curvature(id, 0, Point::new(50.0, 0.0), Point::new(50.0, 0.0), (before[0], before[1]))
            .unwrap();
        assert_eq!(session.shape(id).unwrap().path().points, before);
    }

    #[test]
    fn move_anchor_snaps_to_grid_and_points() {
        let mut session = EditSession::default();
        session.config.anchors.snap_grid = 10.0;
        session.config.anchors.snap_radius = 0.0;
        let id = committed_line(&mut session, (0.0, 0.0), (100.0, 0.0));
        session.move_anchor(AnchorRef { owner: id, index: 1 }, Point::new(43.0, 17.0)).unwrap();
        assert_eq!(session.shape(id).unwrap().path().points[1].position(), Point::new(40.0, 20.0));

        session.config.anchors.snap_grid = 0.0;
        session.config.anchors.snap_radius = 6.0;
        let other = committed_line(&mut session, (200.0, 200.0), (300.0, 300.0));
        session.move_anchor(AnchorRef { owner: id, index: 1 }, Point::new(203.0, 198.0)).unwrap();
        assert_eq!(session.shape(id).unwrap().path().points[1].position(), Point::new(200.0, 200.0));
        assert!(session.shape(other).is_some());
    }

    #[test]
    fn move_handle_uses_absolute_position() {
        let mut session = EditSession::default();
        let id = committed_line(&mut session, (10.0, 10.0), (100.0, 10.0));
        session
            .move_handle(AnchorRef { owner: id, index: 0 }, HandleSide::Out, Point::new(20.0, 30.0))
            .unwrap();
        let pt = session.shape(id).unwrap().path().points[0];
        assert_eq!(pt.control_out, Some(Vec2::new(10.0, 20.0)));
        assert_eq!(pt.kind, AnchorKind::Smooth);
    }

    #[test]
    fn cycle_kind_round_trip() {
        let mut session = EditSession::default();
        session.start_path(Point::new(0.0, 0.0)).unwrap();
        session.append_to_current(Point::new(50.0, 40.0)).unwrap();
        session.append_to_current(Point::new(100.0, 0.0)).unwrap();
        let owner = session.current_path().unwrap().id;
        let anchor = AnchorRef { owner, index: 1 };
        assert_eq!(session.cycle_anchor_kind(anchor), Ok(AnchorKind::Smooth));
        assert_eq!(session.cycle_anchor_kind(anchor), Ok(AnchorKind::Symmetric));
        assert!(session.current_path().unwrap().points[1].satisfies_kind());
        assert_eq!(session.cycle_anchor_kind(anchor), Ok(AnchorKind::Corner));
        assert!(session.current_path().unwrap().points[1].satisfies_kind());
    }

    #[test]
    fn deleting_from_two_point_current_path_discards_it() {
        let mut session = EditSession::default();
        session.start_path(Point::new(0.0, 0.0)).unwrap();
        session.append_to_current(Point::new(10.0, 0.0)).unwrap();
        let owner = session.current_path().unwrap().id;
        session.selection.select_anchor(AnchorRef { owner, index: 1 });

        assert_eq!(session.delete_selection(), DeleteEffect::PathRemoved { owner });
        assert!(session.current_path().is_none());
        assert_eq!(session.selection.selected_anchor, None);
    }

    #[test]
    fn deleting_anchor_selects_last_remaining_point() {
        let mut session = EditSession::default();
        session.start_path(Point::new(0.0, 0.0)).unwrap();
        for x in [10.0, 20.0, 30.0] {
            session.append_to_current(Point::new(x, 0.0)).unwrap();
        }
        let id = session.commit_current_path(ToolId::Pen).unwrap();
        session.selection.select_anchor(AnchorRef { owner: id, index: 1 });

        assert_eq!(session.delete_selection(), DeleteEffect::AnchorRemoved { owner: id });
        assert_eq!(session.selection.selected_anchor, Some(AnchorRef { owner: id, index: 2 }));
        assert!(session.shape(id).unwrap().path().closed);

        session.delete_selection();
        // two points left: no longer closable
        assert!(!session.shape(id).unwrap().path().closed);
        session.delete_selection();
        assert!(session.shape(id).is_none());
    }

    #[test]
    fn deleting_selected_shapes() {
        let mut session = EditSession::default();
        let a = committed_line(&mut session, (0.0, 0.0), (10.0, 0.0));
        let b = committed_line(&mut session, (0.0, 10.0), (10.0, 10.0));
        session.selection.selected_shape_ids.insert(a);
        session.selection.selected_shape_ids.insert(b);
        assert_eq!(session.delete_selection(), DeleteEffect::ShapesRemoved { count: 2 });
        assert!(session.shapes().is_empty());
        assert!(session.selection.selected_shape_ids.is_empty());
    }

    #[test]
    fn translate_moves_selected_shapes_only() {
        let mut session = EditSession::default();
        let a = committed_line(&mut session, (0.0, 0.0), (10.0, 0.0));
        let b = committed_line(&mut session, (0.0, 10.0), (10.0, 10.0));
        session.selection.selected_shape_ids.insert(a);
        session.translate_selected(Vec2::new(5.0, 5.0));
        assert_eq!(session.shape(a).unwrap().bounding_box().origin(), Point::new(5.0, 5.0));
        assert_eq!(session.shape(b).unwrap().bounding_box().origin(), Point::new(0.0, 10.0));
    }
}
