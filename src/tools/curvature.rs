// Copyright 2025 the Threadmark Authors
// SPDX-License-Identifier: Apache-2.0

//! Curvature tool: grab a segment and pull it into a curve.
//!
//! The tool never creates geometry; pressing on empty space does nothing.

use crate::editing::{ActiveDrag, EditSession, HitPriority, HitTarget, PointerDelegate, PointerSample};
use crate::tools::{EditState, Tool, ToolId};

#[derive(Debug, Clone, Copy, Default)]
pub struct CurvatureTool;

impl Tool for CurvatureTool {
    fn id(&self) -> ToolId {
        ToolId::Curvature
    }

    fn state(&self, session: &EditSession) -> EditState {
        super::drag_state(session)
    }
}

impl PointerDelegate for CurvatureTool {
    type Data = EditSession;

    fn pointer_down(&mut self, sample: &PointerSample, session: &mut EditSession) {
        let grab = sample.point();
        let Some(hit) = session.hit_test(grab, HitPriority::Segment, false) else {
            return;
        };
        let HitTarget::Segment { index, .. } = hit.target else {
            return;
        };
        let Some(path) = session.path(hit.owner) else {
            return;
        };
        let Some(end) = path.neighbor_index(index, true) else {
            return;
        };
        let originals = (path.points[index], path.points[end]);

        tracing::debug!("Curvature tool: grabbed segment {} of {:?}", index, hit.owner);
        session.selection.begin_drag(ActiveDrag::CurvaturePull {
            owner: hit.owner,
            segment: index,
            grab,
            originals,
        });
    }

    fn pointer_move(&mut self, sample: &PointerSample, session: &mut EditSession) {
        if !sample.primary_down {
            return;
        }
        let Some(ActiveDrag::CurvaturePull {
            owner,
            segment,
            grab,
            originals,
        }) = session.selection.active_drag().cloned()
        else {
            return;
        };
        if let Err(err) = session.pull_curvature(owner, segment, grab, sample.point(), originals) {
            tracing::debug!("Curvature tool: pull rejected: {}", err);
            session.selection.end_drag();
        }
    }

    fn pointer_up(&mut self, _sample: &PointerSample, session: &mut EditSession) {
        session.selection.end_drag();
    }

    fn cancel(&mut self, session: &mut EditSession) {
        session.selection.end_drag();
    }
}
