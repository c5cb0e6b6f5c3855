// Copyright 2025 the Threadmark Authors
// SPDX-License-Identifier: Apache-2.0

//! Convert-anchor tool: clicking an anchor cycles Corner, Smooth,
//! Symmetric; pressing a handle drags it under the anchor's constraint.

use crate::editing::{
    ActiveDrag, AnchorRef, EditSession, HitPriority, HitTarget, PointerDelegate, PointerSample,
};
use crate::tools::{EditState, Tool, ToolId};

#[derive(Debug, Clone, Copy, Default)]
pub struct ConvertAnchorTool;

impl Tool for ConvertAnchorTool {
    fn id(&self) -> ToolId {
        ToolId::ConvertAnchor
    }

    fn state(&self, session: &EditSession) -> EditState {
        super::drag_state(session)
    }
}

impl PointerDelegate for ConvertAnchorTool {
    type Data = EditSession;

    fn pointer_down(&mut self, sample: &PointerSample, session: &mut EditSession) {
        let Some(hit) = session.hit_test(sample.point(), HitPriority::Anchor, false) else {
            return;
        };
        match hit.target {
            HitTarget::Anchor { index } => {
                let anchor = AnchorRef {
                    owner: hit.owner,
                    index,
                };
                match session.cycle_anchor_kind(anchor) {
                    Ok(kind) => {
                        tracing::debug!("Convert tool: anchor {:?} is now {:?}", anchor, kind);
                        session.selection.select_anchor(anchor);
                        session.mark_selection_changed();
                    }
                    Err(err) => tracing::debug!("Convert tool: conversion rejected: {}", err),
                }
            }
            HitTarget::Control { index, side } => {
                let anchor = AnchorRef {
                    owner: hit.owner,
                    index,
                };
                session.selection.select_anchor(anchor);
                session.mark_selection_changed();
                session.selection.begin_drag(ActiveDrag::Control { anchor, side });
            }
            HitTarget::Segment { .. } => {}
        }
    }

    fn pointer_move(&mut self, sample: &PointerSample, session: &mut EditSession) {
        if sample.primary_down
            && let Some(ActiveDrag::Control { anchor, side }) = session.selection.active_drag().cloned()
            && let Err(err) = session.move_handle(anchor, side, sample.point())
        {
            tracing::debug!("Convert tool: handle drag rejected: {}", err);
        }
    }

    fn pointer_up(&mut self, _sample: &PointerSample, session: &mut EditSession) {
        if session.selection.end_drag().is_some() && !session.config.anchors.keep_selection_after_drag {
            session.selection.selected_anchor = None;
            session.mark_selection_changed();
        }
    }

    fn cancel(&mut self, session: &mut EditSession) {
        session.selection.end_drag();
    }
}
