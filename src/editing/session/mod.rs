// Copyright 2025 the Threadmark Authors
// SPDX-License-Identifier: Apache-2.0

//! Edit session: the committed shapes, the current path and the selection.
//!
//! Tools mutate the session; the editor reads the accumulated `ChangeSet`
//! after every event and publishes whatever changed to the host.

mod hit_testing;
mod path_editing;

pub use path_editing::DeleteEffect;

use super::selection::SelectionState;
use crate::config::EngineConfig;
use crate::error::PathError;
use crate::model::EntityId;
use crate::path::{Path, PathStyle, Shape};
use crate::render::StitchKind;
use crate::tools::ToolId;
use kurbo::Point;

/// What changed since the last `take_changes`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeSet {
    pub shapes: bool,
    pub current_path: bool,
    pub selection: bool,
    /// Shapes committed from the current path, in commit order
    pub committed: Vec<EntityId>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        !self.shapes && !self.current_path && !self.selection && self.committed.is_empty()
    }
}

/// Editing state shared by all tools
#[derive(Debug, Clone)]
pub struct EditSession {
    /// Committed shapes, bottom to top
    shapes: Vec<Shape>,
    /// The single path under construction
    current_path: Option<Path>,
    pub selection: SelectionState,
    /// Where the next pen point would land
    pub preview_point: Option<Point>,
    /// Style given to new paths
    pub style: PathStyle,
    /// Stitch kind recorded on newly committed shapes
    pub stitch_kind: Option<StitchKind>,
    pub config: EngineConfig,
    changes: ChangeSet,
}

impl EditSession {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            shapes: Vec::new(),
            current_path: None,
            selection: SelectionState::default(),
            preview_point: None,
            style: PathStyle::default(),
            stitch_kind: None,
            config,
            changes: ChangeSet::default(),
        }
    }

    /// Seed the session with existing shapes
    pub fn with_shapes(mut self, shapes: Vec<Shape>) -> Self {
        self.shapes = shapes;
        self.changes.shapes = true;
        self
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn shape(&self, id: EntityId) -> Option<&Shape> {
        self.shapes.iter().find(|shape| shape.id() == id)
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.current_path.as_ref()
    }

    pub fn has_current_path(&self) -> bool {
        self.current_path.is_some()
    }

    /// Begin a new current path at `origin`
    pub fn start_path(&mut self, origin: Point) -> Result<EntityId, PathError> {
        if self.current_path.is_some() {
            return Err(PathError::CurrentPathExists);
        }
        if !crate::geometry::is_finite_point(origin) {
            return Err(PathError::InvalidCoordinate {
                x: origin.x,
                y: origin.y,
            });
        }
        let path = Path::new(origin, self.style);
        let id = path.id;
        tracing::debug!("[EditSession::start_path] {:?} at {:?}", id, origin);
        self.current_path = Some(path);
        self.changes.current_path = true;
        Ok(id)
    }

    /// Append a point to the current path
    pub fn append_to_current(&mut self, point: Point) -> Result<(), PathError> {
        let path = self.current_path.as_mut().ok_or(PathError::NoCurrentPath)?;
        path.append_point(point)?;
        self.changes.current_path = true;
        Ok(())
    }

    /// Finalize the current path.
    ///
    /// Enough points for a closed shape close it, two points make an open
    /// stroke, anything less is discarded. Returns the new shape's id.
    pub fn commit_current_path(&mut self, tool: ToolId) -> Option<EntityId> {
        let path = self.current_path.take()?;
        self.changes.current_path = true;
        self.preview_point = None;

        let len = path.len();
        let pen = self.config.pen;
        let close_min = pen.close_min_points.max(crate::settings::pen::CLOSE_MIN_POINTS);
        let stroke_min = pen.stroke_min_points.max(crate::settings::pen::STROKE_MIN_POINTS);

        let result = if len >= close_min {
            path.close(tool)
        } else if len >= stroke_min {
            path.into_stroke(tool)
        } else {
            tracing::debug!("[EditSession::commit_current_path] discarding {} point path", len);
            self.forget(path.id);
            return None;
        };

        match result {
            Ok(shape) => {
                let shape = shape.with_stitch(self.stitch_kind);
                let id = shape.id();
                tracing::info!(
                    "Committed shape {:?}: {} points, closed={}",
                    id,
                    shape.path().len(),
                    shape.path().closed
                );
                self.shapes.push(shape);
                self.changes.shapes = true;
                self.changes.committed.push(id);
                Some(id)
            }
            Err(err) => {
                tracing::warn!("Failed to commit current path: {}", err);
                None
            }
        }
    }

    /// Drop the current path without committing
    pub fn discard_current_path(&mut self) -> bool {
        match self.current_path.take() {
            Some(path) => {
                self.forget(path.id);
                self.preview_point = None;
                self.changes.current_path = true;
                true
            }
            None => false,
        }
    }

    /// Every editable path with its owner id, bottom to top; the current
    /// path is topmost
    pub fn owned_paths(&self) -> impl Iterator<Item = (EntityId, &Path)> {
        self.shapes
            .iter()
            .map(|shape| (shape.id(), shape.path()))
            .chain(self.current_path.iter().map(|path| (path.id, path)))
    }

    pub fn path(&self, owner: EntityId) -> Option<&Path> {
        match &self.current_path {
            Some(path) if path.id == owner => Some(path),
            _ => self.shape(owner).map(Shape::path),
        }
    }

    pub fn is_current_path(&self, owner: EntityId) -> bool {
        self.current_path.as_ref().is_some_and(|path| path.id == owner)
    }

    /// Mutate the path owned by `owner`; shape bounds are refreshed
    pub fn edit_path<R>(&mut self, owner: EntityId, f: impl FnOnce(&mut Path) -> R) -> Option<R> {
        if let Some(path) = self.current_path.as_mut().filter(|path| path.id == owner) {
            self.changes.current_path = true;
            return Some(f(path));
        }
        let shape = self.shapes.iter_mut().find(|shape| shape.id() == owner)?;
        self.changes.shapes = true;
        Some(shape.edit(f))
    }

    /// Remove a committed shape
    pub fn remove_shape(&mut self, id: EntityId) -> Result<Shape, PathError> {
        let pos = self
            .shapes
            .iter()
            .position(|shape| shape.id() == id)
            .ok_or(PathError::ShapeNotFound(id))?;
        let shape = self.shapes.remove(pos);
        self.forget(id);
        self.changes.shapes = true;
        tracing::debug!("[EditSession::remove_shape] {:?}", id);
        Ok(shape)
    }

    /// Drop selection references to `owner`
    fn forget(&mut self, owner: EntityId) {
        let before = self.selection.clone();
        self.selection.forget(owner);
        if before != self.selection {
            self.changes.selection = true;
        }
    }

    /// Record a selection change made directly through `selection`
    pub fn mark_selection_changed(&mut self) {
        self.changes.selection = true;
    }

    pub fn mark_current_path_changed(&mut self) {
        self.changes.current_path = true;
    }

    /// Changes accumulated since the previous call
    pub fn take_changes(&mut self) -> ChangeSet {
        std::mem::take(&mut self.changes)
    }
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
