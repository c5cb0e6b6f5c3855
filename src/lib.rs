// Copyright 2025 the Threadmark Authors
// SPDX-License-Identifier: Apache-2.0

//! Threadmark: vector path authoring on UV-mapped garment surfaces.
//!
//! Pointer input arrives as [`editing::PointerSample`]s, is resolved to
//! canvas pixels by the [`editor::PathEditor`] (with seam correction from
//! [`surface`] when a mesh is attached) and drives the active tool. Tools
//! edit an [`editing::EditSession`]; committed shapes are rasterized by
//! [`render`] as plain strokes or simulated embroidery.

pub mod config;
pub mod editing;
pub mod editor;
pub mod error;
pub mod geometry;
pub mod model;
pub mod path;
pub mod render;
pub mod settings;
pub mod surface;
pub mod tools;

pub use config::EngineConfig;
pub use editor::{ActiveLayer, EditorHost, LayerHost, PathEditor};
pub use error::{PathError, RenderError};

/// Install the fmt subscriber, filtered by `RUST_LOG` plus
/// `threadmark=info`. Does nothing if a subscriber is already set.
pub fn init_tracing() {
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "threadmark=info".parse() {
        filter = filter.add_directive(directive);
    }
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
