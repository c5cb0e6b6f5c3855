// Copyright 2025 the Threadmark Authors
// SPDX-License-Identifier: Apache-2.0

//! Error types for structural edits and rendering.
//!
//! Only structural violations ever reach the user as a rejected action.
//! Invalid input and mesh lookup failures are handled where they occur
//! (dropped or degraded) and never become an error value.

use crate::model::EntityId;
use thiserror::Error;

/// A rejected edit on the path model
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PathError {
    #[error("a current path already exists; commit or discard it first")]
    CurrentPathExists,

    #[error("there is no current path")]
    NoCurrentPath,

    #[error("need at least {required} points, found {found}")]
    InsufficientPoints { found: usize, required: usize },

    #[error("point index {index} out of range for path of {len} points")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("invalid coordinate ({x}, {y})")]
    InvalidCoordinate { x: f64, y: f64 },

    #[error("no shape with id {0:?}")]
    ShapeNotFound(EntityId),
}

/// A failure inside the rasterizer
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("invalid stitch configuration: {0}")]
    InvalidStitchConfig(String),

    #[error("path has no points to render")]
    EmptyPath,
}
