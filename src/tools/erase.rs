// Copyright 2025 the Threadmark Authors
// SPDX-License-Identifier: Apache-2.0

//! Eraser for committed shapes: every shape whose outline passes within
//! the eraser radius of the pointer is removed, on press and while
//! dragging.

use crate::editing::{EditSession, PointerDelegate, PointerSample};
use crate::tools::{EditState, Tool, ToolId};

#[derive(Debug, Clone, Copy, Default)]
pub struct EraseTool;

impl EraseTool {
    fn erase_at(sample: &PointerSample, session: &mut EditSession) {
        let ids = session.shapes_near(sample.point(), session.config.eraser.radius);
        for id in ids {
            match session.remove_shape(id) {
                Ok(_) => tracing::debug!("Erase tool: removed {:?}", id),
                Err(err) => tracing::warn!("Erase tool: {}", err),
            }
        }
    }
}

impl Tool for EraseTool {
    fn id(&self) -> ToolId {
        ToolId::Erase
    }

    fn state(&self, _session: &EditSession) -> EditState {
        EditState::Idle
    }
}

impl PointerDelegate for EraseTool {
    type Data = EditSession;

    fn pointer_down(&mut self, sample: &PointerSample, session: &mut EditSession) {
        Self::erase_at(sample, session);
    }

    fn pointer_move(&mut self, sample: &PointerSample, session: &mut EditSession) {
        if sample.primary_down {
            Self::erase_at(sample, session);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    #[test]
    fn erases_only_while_pressed() {
        let mut session = EditSession::default();
        for y in [0.0, 100.0] {
            session.start_path(Point::new(0.0, y)).unwrap();
            session.append_to_current(Point::new(100.0, y)).unwrap();
            session.commit_current_path(ToolId::Pen).unwrap();
        }
        let mut tool = EraseTool;

        tool.pointer_move(&PointerSample::at(50.0, 5.0), &mut session);
        assert_eq!(session.shapes().len(), 2);

        tool.pointer_down(&PointerSample::at(50.0, 5.0).pressed(true), &mut session);
        assert_eq!(session.shapes().len(), 1);
        tool.pointer_move(&PointerSample::at(50.0, 50.0).pressed(true), &mut session);
        assert_eq!(session.shapes().len(), 1);
        tool.pointer_move(&PointerSample::at(50.0, 95.0).pressed(true), &mut session);
        assert!(session.shapes().is_empty());
    }
}
