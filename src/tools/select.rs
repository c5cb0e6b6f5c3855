// Copyright 2025 the Threadmark Authors
// SPDX-License-Identifier: Apache-2.0

//! Path selection tool
//!
//! Pressing resolves, in order, an anchor, a control handle, then a whole
//! shape's bounds, and starts the matching drag. Pressing on empty space
//! clears the selection (unless shift is held) and starts a marquee.

use crate::editing::{
    ActiveDrag, AnchorRef, EditSession, HitPriority, HitTarget, PointerDelegate, PointerSample,
};
use crate::tools::{EditState, Tool, ToolId};
use kurbo::Rect;

#[derive(Debug, Clone, Copy, Default)]
pub struct SelectTool;

impl SelectTool {
    /// Select the shape owning an anchor or handle, if it is committed
    fn select_owner(session: &mut EditSession, anchor: AnchorRef, additive: bool) {
        if session.shape(anchor.owner).is_none() {
            return;
        }
        if additive {
            session.selection.selected_shape_ids.insert(anchor.owner);
        } else {
            session.selection.select_only(anchor.owner);
        }
    }
}

impl Tool for SelectTool {
    fn id(&self) -> ToolId {
        ToolId::PathSelection
    }

    fn state(&self, session: &EditSession) -> EditState {
        super::drag_state(session)
    }
}

impl PointerDelegate for SelectTool {
    type Data = EditSession;

    fn pointer_down(&mut self, sample: &PointerSample, session: &mut EditSession) {
        let point = sample.point();
        let additive = sample.modifiers.shift;
        session.mark_selection_changed();

        if let Some(hit) = session.hit_test(point, HitPriority::Anchor, additive) {
            match hit.target {
                HitTarget::Anchor { index } => {
                    let anchor = AnchorRef {
                        owner: hit.owner,
                        index,
                    };
                    Self::select_owner(session, anchor, hit.multi_select);
                    session.selection.select_anchor(anchor);
                    session.selection.begin_drag(ActiveDrag::Anchor { anchor });
                    return;
                }
                HitTarget::Control { index, side } => {
                    let anchor = AnchorRef {
                        owner: hit.owner,
                        index,
                    };
                    Self::select_owner(session, anchor, hit.multi_select);
                    session.selection.select_anchor(anchor);
                    session.selection.begin_drag(ActiveDrag::Control { anchor, side });
                    return;
                }
                // segments fall through to the bounds test
                HitTarget::Segment { .. } => {}
            }
        }

        if let Some(id) = session.hit_test_bounds(point) {
            session.selection.selected_anchor = None;
            if additive {
                session.selection.selected_shape_ids.insert(id);
            } else if !session.selection.selected_shape_ids.contains(&id) {
                session.selection.select_only(id);
            }
            session.selection.begin_drag(ActiveDrag::Bounds { last: point });
            return;
        }

        if !additive {
            session.selection.clear();
        }
        session.selection.begin_drag(ActiveDrag::Marquee {
            origin: point,
            current: point,
            additive,
        });
    }

    fn pointer_move(&mut self, sample: &PointerSample, session: &mut EditSession) {
        // drags follow the pressed button only
        if !sample.primary_down {
            return;
        }
        let point = sample.point();
        let Some(drag) = session.selection.active_drag().cloned() else {
            return;
        };
        let result = match drag {
            ActiveDrag::Anchor { anchor } => session.move_anchor(anchor, point),
            ActiveDrag::Control { anchor, side } => session.move_handle(anchor, side, point),
            ActiveDrag::Bounds { last } => {
                session.translate_selected(point - last);
                session.selection.begin_drag(ActiveDrag::Bounds { last: point });
                Ok(())
            }
            ActiveDrag::Marquee { origin, additive, .. } => {
                session.selection.begin_drag(ActiveDrag::Marquee {
                    origin,
                    current: point,
                    additive,
                });
                Ok(())
            }
            ActiveDrag::CurvaturePull { .. } => Ok(()),
        };
        if let Err(err) = result {
            tracing::debug!("Select tool: drag rejected: {}", err);
        }
    }

    fn pointer_up(&mut self, _sample: &PointerSample, session: &mut EditSession) {
        let Some(drag) = session.selection.end_drag() else {
            return;
        };
        match drag {
            ActiveDrag::Marquee {
                origin,
                current,
                additive,
            } => {
                let ids = session.shapes_in_rect(Rect::from_points(origin, current));
                if !additive {
                    session.selection.selected_shape_ids.clear();
                }
                tracing::debug!("Select tool: marquee picked {} shape(s)", ids.len());
                for id in ids {
                    session.selection.selected_shape_ids.insert(id);
                }
            }
            ActiveDrag::Anchor { .. } | ActiveDrag::Control { .. } => {
                if !session.config.anchors.keep_selection_after_drag {
                    session.selection.selected_anchor = None;
                }
            }
            _ => {}
        }
        session.mark_selection_changed();
    }

    fn cancel(&mut self, session: &mut EditSession) {
        session.selection.end_drag();
    }
}
