// Copyright 2025 the Threadmark Authors
// SPDX-License-Identifier: Apache-2.0

//! Path editing tools

use crate::editing::{EditSession, PointerDelegate, PointerSample};
use serde::{Deserialize, Serialize};

// ===== Tool Identifier =====

/// Tool identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ToolId {
    /// Draw new paths point by point
    Pen,
    /// Bend existing segments by pulling on them
    Curvature,
    /// Select and move anchors, handles and whole shapes
    PathSelection,
    /// Cycle anchor kinds and drag their handles
    ConvertAnchor,
    /// Remove shapes under the pointer
    Erase,
}

// ===== Editing State =====

/// Interaction state of the active tool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditState {
    Idle,
    /// Pen tool with an open current path
    Drawing,
    DraggingAnchor,
    DraggingControl,
    DraggingBounds,
    PullingCurvature,
    /// Marquee selection in progress
    Selecting,
}

// ===== Tool Trait =====

/// A tool driving the edit session from pointer events
pub trait Tool: PointerDelegate<Data = EditSession> {
    fn id(&self) -> ToolId;

    /// Current interaction state
    fn state(&self, session: &EditSession) -> EditState;
}

/// State implied by the session's active drag
pub(crate) fn drag_state(session: &EditSession) -> EditState {
    use crate::editing::ActiveDrag;
    match session.selection.active_drag() {
        None => EditState::Idle,
        Some(ActiveDrag::Anchor { .. }) => EditState::DraggingAnchor,
        Some(ActiveDrag::Control { .. }) => EditState::DraggingControl,
        Some(ActiveDrag::Bounds { .. }) => EditState::DraggingBounds,
        Some(ActiveDrag::CurvaturePull { .. }) => EditState::PullingCurvature,
        Some(ActiveDrag::Marquee { .. }) => EditState::Selecting,
    }
}

// ===== ToolBox Enum =====

/// Enum wrapping all tool types
#[derive(Debug, Clone)]
pub enum ToolBox {
    Pen(pen::PenTool),
    Curvature(curvature::CurvatureTool),
    PathSelection(select::SelectTool),
    ConvertAnchor(convert::ConvertAnchorTool),
    Erase(erase::EraseTool),
}

impl ToolBox {
    /// Create a tool by ID
    pub fn for_id(id: ToolId) -> Self {
        match id {
            ToolId::Pen => ToolBox::Pen(pen::PenTool::default()),
            ToolId::Curvature => ToolBox::Curvature(curvature::CurvatureTool),
            ToolId::PathSelection => ToolBox::PathSelection(select::SelectTool),
            ToolId::ConvertAnchor => ToolBox::ConvertAnchor(convert::ConvertAnchorTool),
            ToolId::Erase => ToolBox::Erase(erase::EraseTool),
        }
    }

    pub fn id(&self) -> ToolId {
        match self {
            ToolBox::Pen(tool) => tool.id(),
            ToolBox::Curvature(tool) => tool.id(),
            ToolBox::PathSelection(tool) => tool.id(),
            ToolBox::ConvertAnchor(tool) => tool.id(),
            ToolBox::Erase(tool) => tool.id(),
        }
    }

    pub fn state(&self, session: &EditSession) -> EditState {
        match self {
            ToolBox::Pen(tool) => tool.state(session),
            ToolBox::Curvature(tool) => tool.state(session),
            ToolBox::PathSelection(tool) => tool.state(session),
            ToolBox::ConvertAnchor(tool) => tool.state(session),
            ToolBox::Erase(tool) => tool.state(session),
        }
    }

    /// Leave this tool: end any gesture and finalize the current path
    pub fn exit(&mut self, session: &mut EditSession) {
        self.cancel(session);
        if session.has_current_path() {
            let id = self.id();
            match session.commit_current_path(id) {
                Some(shape) => tracing::info!("Committed {:?} on leaving {:?}", shape, id),
                None => tracing::debug!("[ToolBox::exit] discarded current path"),
            }
        }
    }
}

// ===== PointerDelegate Implementation =====

impl PointerDelegate for ToolBox {
    type Data = EditSession;

    fn pointer_down(&mut self, sample: &PointerSample, data: &mut EditSession) {
        match self {
            ToolBox::Pen(tool) => tool.pointer_down(sample, data),
            ToolBox::Curvature(tool) => tool.pointer_down(sample, data),
            ToolBox::PathSelection(tool) => tool.pointer_down(sample, data),
            ToolBox::ConvertAnchor(tool) => tool.pointer_down(sample, data),
            ToolBox::Erase(tool) => tool.pointer_down(sample, data),
        }
    }

    fn pointer_move(&mut self, sample: &PointerSample, data: &mut EditSession) {
        match self {
            ToolBox::Pen(tool) => tool.pointer_move(sample, data),
            ToolBox::Curvature(tool) => tool.pointer_move(sample, data),
            ToolBox::PathSelection(tool) => tool.pointer_move(sample, data),
            ToolBox::ConvertAnchor(tool) => tool.pointer_move(sample, data),
            ToolBox::Erase(tool) => tool.pointer_move(sample, data),
        }
    }

    fn pointer_up(&mut self, sample: &PointerSample, data: &mut EditSession) {
        match self {
            ToolBox::Pen(tool) => tool.pointer_up(sample, data),
            ToolBox::Curvature(tool) => tool.pointer_up(sample, data),
            ToolBox::PathSelection(tool) => tool.pointer_up(sample, data),
            ToolBox::ConvertAnchor(tool) => tool.pointer_up(sample, data),
            ToolBox::Erase(tool) => tool.pointer_up(sample, data),
        }
    }

    fn double_click(&mut self, sample: &PointerSample, data: &mut EditSession) {
        match self {
            ToolBox::Pen(tool) => tool.double_click(sample, data),
            ToolBox::Curvature(tool) => tool.double_click(sample, data),
            ToolBox::PathSelection(tool) => tool.double_click(sample, data),
            ToolBox::ConvertAnchor(tool) => tool.double_click(sample, data),
            ToolBox::Erase(tool) => tool.double_click(sample, data),
        }
    }

    fn cancel(&mut self, data: &mut EditSession) {
        match self {
            ToolBox::Pen(tool) => tool.cancel(data),
            ToolBox::Curvature(tool) => tool.cancel(data),
            ToolBox::PathSelection(tool) => tool.cancel(data),
            ToolBox::ConvertAnchor(tool) => tool.cancel(data),
            ToolBox::Erase(tool) => tool.cancel(data),
        }
    }
}

// ===== Tool Modules =====

pub mod convert;
pub mod curvature;
pub mod erase;
pub mod pen;
pub mod select;
