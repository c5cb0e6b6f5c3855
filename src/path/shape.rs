// Copyright 2025 the Threadmark Authors
// SPDX-License-Identifier: Apache-2.0

//! Committed shapes.
//!
//! A `Shape` owns its `Path` exclusively. All mutation goes through
//! `Shape::edit`, which recomputes the bounding box afterwards, so the box
//! always equals the bounds of the anchor positions.

use super::Path;
use crate::model::EntityId;
use crate::render::StitchKind;
use crate::tools::ToolId;
use kurbo::Rect;
use serde::{Deserialize, Serialize};

/// A committed path plus derived metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    #[serde(skip)]
    id: EntityId,
    path: Path,
    #[serde(skip_deserializing)]
    bounding_box: Rect,
    source_tool: ToolId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    stitch_kind: Option<StitchKind>,
}

impl Shape {
    /// Wrap a path; the shape takes over the path's id
    pub fn new(path: Path, source_tool: ToolId) -> Self {
        let bounding_box = path.bounds();
        Self {
            id: path.id,
            path,
            bounding_box,
            source_tool,
            stitch_kind: None,
        }
    }

    pub fn with_stitch(mut self, stitch_kind: Option<StitchKind>) -> Self {
        self.stitch_kind = stitch_kind;
        self
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bounding_box(&self) -> Rect {
        self.bounding_box
    }

    pub fn source_tool(&self) -> ToolId {
        self.source_tool
    }

    pub fn stitch_kind(&self) -> Option<StitchKind> {
        self.stitch_kind
    }

    /// Mutate the path and refresh the bounding box
    pub fn edit<R>(&mut self, f: impl FnOnce(&mut Path) -> R) -> R {
        let result = f(&mut self.path);
        self.refresh_bounds();
        result
    }

    /// Recompute the derived bounding box and re-link the path id
    pub(crate) fn refresh_bounds(&mut self) {
        self.path.id = self.id;
        self.bounding_box = self.path.bounds();
    }
}
