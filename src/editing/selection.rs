// Copyright 2025 the Threadmark Authors
// SPDX-License-Identifier: Apache-2.0

//! Selection and drag state for a single gesture.
//!
//! `Selection` wraps an `Arc<BTreeSet<EntityId>>` so snapshots handed to the
//! host are cheap to clone and iterate in a stable order. `SelectionState`
//! adds the selected anchor and the one active drag; starting a drag always
//! replaces the previous one, so two drag modes can never be live at once.

use crate::model::EntityId;
use crate::path::{AnchorPoint, HandleSide};
use kurbo::Point;
use std::collections::BTreeSet;
use std::sync::Arc;

/// A set of selected shapes
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    inner: Arc<BTreeSet<EntityId>>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.inner.contains(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntityId> {
        self.inner.iter()
    }

    pub fn insert(&mut self, id: EntityId) {
        Arc::make_mut(&mut self.inner).insert(id);
    }

    pub fn remove(&mut self, id: &EntityId) {
        if self.inner.contains(id) {
            Arc::make_mut(&mut self.inner).remove(id);
        }
    }

    pub fn clear(&mut self) {
        if !self.inner.is_empty() {
            self.inner = Arc::default();
        }
    }
}

impl FromIterator<EntityId> for Selection {
    fn from_iter<T: IntoIterator<Item = EntityId>>(iter: T) -> Self {
        Self {
            inner: Arc::new(iter.into_iter().collect()),
        }
    }
}

/// An anchor addressed by owner and index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorRef {
    /// Shape id, or the current path's id
    pub owner: EntityId,
    pub index: usize,
}

/// The single drag in progress
#[derive(Debug, Clone, PartialEq)]
pub enum ActiveDrag {
    Anchor {
        anchor: AnchorRef,
    },
    Control {
        anchor: AnchorRef,
        side: HandleSide,
    },
    /// Translating every selected shape; `last` is the previous pointer
    Bounds {
        last: Point,
    },
    /// Bending the segment that starts at `segment`
    CurvaturePull {
        owner: EntityId,
        segment: usize,
        grab: Point,
        /// Start and end anchors as they were before the pull
        originals: (AnchorPoint, AnchorPoint),
    },
    /// Rubber-band rectangle from `origin`
    Marquee {
        origin: Point,
        current: Point,
        additive: bool,
    },
}

/// Selection plus drag state
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectionState {
    pub selected_shape_ids: Selection,
    pub selected_anchor: Option<AnchorRef>,
    active_drag: Option<ActiveDrag>,
}

impl SelectionState {
    pub fn active_drag(&self) -> Option<&ActiveDrag> {
        self.active_drag.as_ref()
    }

    pub fn active_drag_mut(&mut self) -> Option<&mut ActiveDrag> {
        self.active_drag.as_mut()
    }

    pub fn is_dragging(&self) -> bool {
        self.active_drag.is_some()
    }

    /// Start a drag, dropping whatever drag was active
    pub fn begin_drag(&mut self, drag: ActiveDrag) {
        if let Some(previous) = self.active_drag.take() {
            tracing::debug!("[SelectionState::begin_drag] replacing {:?}", previous);
        }
        self.active_drag = Some(drag);
    }

    pub fn end_drag(&mut self) -> Option<ActiveDrag> {
        self.active_drag.take()
    }

    /// Select exactly one shape
    pub fn select_only(&mut self, id: EntityId) {
        self.selected_shape_ids.clear();
        self.selected_shape_ids.insert(id);
    }

    pub fn select_anchor(&mut self, anchor: AnchorRef) {
        self.selected_anchor = Some(anchor);
    }

    /// Drop the selection and any drag
    pub fn clear(&mut self) {
        self.selected_shape_ids.clear();
        self.selected_anchor = None;
        self.active_drag = None;
    }

    /// Forget every reference to `owner`
    pub fn forget(&mut self, owner: EntityId) {
        self.selected_shape_ids.remove(&owner);
        if self.selected_anchor.is_some_and(|a| a.owner == owner) {
            self.selected_anchor = None;
        }
        let drag_owner = match &self.active_drag {
            Some(ActiveDrag::Anchor { anchor }) | Some(ActiveDrag::Control { anchor, .. }) => {
                Some(anchor.owner)
            }
            Some(ActiveDrag::CurvaturePull { owner, .. }) => Some(*owner),
            _ => None,
        };
        if drag_owner == Some(owner) {
            self.active_drag = None;
        }
    }
}
