// Copyright 2025 the Threadmark Authors
// SPDX-License-Identifier: Apache-2.0

//! Pen tool for drawing paths point by point
//!
//! A click appends a corner anchor to the current path, starting one if
//! needed. Holding the button and moving lays down points continuously,
//! debounced by distance and time. Clicking an existing anchor drags it
//! instead (shift selects it); releasing that drag commits the current
//! path, which is how clicking the first anchor closes a shape.
//! Double-click commits.

use crate::editing::{
    ActiveDrag, AnchorRef, EditSession, HitPriority, HitTarget, PointerDelegate, PointerSample,
};
use crate::tools::{EditState, Tool, ToolId};
use kurbo::Point;

// ===== Gesture State =====

/// Last point appended by this tool
#[derive(Debug, Clone, Copy, PartialEq)]
struct LastAppend {
    point: Point,
    time_ms: u64,
}

// ===== PenTool Struct =====

#[derive(Debug, Clone, Default)]
pub struct PenTool {
    last_append: Option<LastAppend>,
}

impl PenTool {
    fn record_append(&mut self, sample: &PointerSample) {
        self.last_append = Some(LastAppend {
            point: sample.point(),
            time_ms: sample.time_ms,
        });
    }

    /// True when a drag sample is far enough, in space and time, from the
    /// previous appended point
    fn passes_debounce(&self, sample: &PointerSample, session: &EditSession) -> bool {
        let pen = session.config.pen;
        match self.last_append {
            None => true,
            Some(last) => {
                sample.point().distance(last.point) >= pen.debounce_distance
                    && sample.time_ms.saturating_sub(last.time_ms) >= pen.debounce_interval_ms
            }
        }
    }
}

// ===== Tool Implementation =====

impl Tool for PenTool {
    fn id(&self) -> ToolId {
        ToolId::Pen
    }

    fn state(&self, session: &EditSession) -> EditState {
        match super::drag_state(session) {
            EditState::Idle if session.has_current_path() => EditState::Drawing,
            state => state,
        }
    }
}

// ===== PointerDelegate Implementation =====

impl PointerDelegate for PenTool {
    type Data = EditSession;

    fn pointer_down(&mut self, sample: &PointerSample, session: &mut EditSession) {
        let point = sample.point();

        if let Some(hit) = session.hit_test(point, HitPriority::Anchor, sample.modifiers.shift)
            && let HitTarget::Anchor { index } = hit.target
        {
            let anchor = AnchorRef {
                owner: hit.owner,
                index,
            };
            session.selection.select_anchor(anchor);
            session.mark_selection_changed();
            if sample.modifiers.shift {
                tracing::debug!("Pen tool: selected anchor {:?}", anchor);
            } else {
                tracing::debug!("Pen tool: dragging anchor {:?}", anchor);
                session.selection.begin_drag(ActiveDrag::Anchor { anchor });
            }
            return;
        }

        let result = if session.has_current_path() {
            session.append_to_current(point)
        } else {
            session.start_path(point).map(|_| ())
        };
        match result {
            Ok(()) => {
                self.record_append(sample);
                session.preview_point = Some(point);
            }
            Err(err) => tracing::debug!("Pen tool: ignored pointer down: {}", err),
        }
    }

    fn pointer_move(&mut self, sample: &PointerSample, session: &mut EditSession) {
        let point = sample.point();

        if let Some(ActiveDrag::Anchor { anchor }) = session.selection.active_drag().cloned() {
            if sample.primary_down
                && let Err(err) = session.move_anchor(anchor, point)
            {
                tracing::debug!("Pen tool: anchor drag rejected: {}", err);
            }
            return;
        }

        if !session.has_current_path() {
            return;
        }
        session.preview_point = Some(point);
        session.mark_current_path_changed();

        if sample.primary_down && self.passes_debounce(sample, session) {
            match session.append_to_current(point) {
                Ok(()) => self.record_append(sample),
                Err(err) => tracing::debug!("Pen tool: drag point rejected: {}", err),
            }
        }
    }

    fn pointer_up(&mut self, _sample: &PointerSample, session: &mut EditSession) {
        let Some(drag) = session.selection.end_drag() else {
            return;
        };
        if !matches!(drag, ActiveDrag::Anchor { .. }) {
            return;
        }
        if session.has_current_path() {
            session.commit_current_path(ToolId::Pen);
            self.last_append = None;
        }
        if !session.config.anchors.keep_selection_after_drag {
            session.selection.selected_anchor = None;
        }
        session.mark_selection_changed();
    }

    fn double_click(&mut self, _sample: &PointerSample, session: &mut EditSession) {
        session.selection.end_drag();
        session.commit_current_path(ToolId::Pen);
        self.last_append = None;
    }

    fn cancel(&mut self, session: &mut EditSession) {
        session.selection.end_drag();
        self.last_append = None;
    }
}
