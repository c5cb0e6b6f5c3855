// Copyright 2025 the Threadmark Authors
// SPDX-License-Identifier: Apache-2.0

//! Runtime configuration.
//!
//! Every section defaults to the constants in `settings`, so an empty TOML
//! document yields the stock engine. Unknown keys are rejected.
//!
//! ```toml
//! [hit]
//! anchor_radius = 10.0
//!
//! [curvature]
//! max_handle = 80.0
//!
//! [stitch]
//! kind = "satin"
//! width = 12.0
//! ```

use crate::editing::hit_test::HitRadii;
use crate::render::StitchConfig;
use crate::settings;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path as FsPath;

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub hit: HitRadii,
    pub pen: PenConfig,
    pub curvature: CurvatureConfig,
    pub anchors: AnchorConfig,
    pub surface: SurfaceConfig,
    pub eraser: EraserConfig,
    pub stitch: StitchConfig,
}

impl EngineConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).context("Failed to parse engine configuration")
    }

    pub fn load(path: &FsPath) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read engine configuration {}", path.display()))?;
        let config = Self::from_toml_str(&source)?;
        tracing::info!("Loaded engine configuration from {}", path.display());
        Ok(config)
    }
}

/// Pen tool thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PenConfig {
    /// Minimum canvas distance between points appended while dragging
    pub debounce_distance: f64,
    /// Minimum time between points appended while dragging
    pub debounce_interval_ms: u64,
    pub close_min_points: usize,
    pub stroke_min_points: usize,
}

impl Default for PenConfig {
    fn default() -> Self {
        Self {
            debounce_distance: settings::pen::DEBOUNCE_DISTANCE,
            debounce_interval_ms: settings::pen::DEBOUNCE_INTERVAL_MS,
            close_min_points: settings::pen::CLOSE_MIN_POINTS,
            stroke_min_points: settings::pen::STROKE_MIN_POINTS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CurvatureConfig {
    /// Handle length per pixel of pull
    pub gain: f64,
    /// Cap on the handle length
    pub max_handle: f64,
}

impl Default for CurvatureConfig {
    fn default() -> Self {
        Self {
            gain: settings::curvature::GAIN,
            max_handle: settings::curvature::MAX_HANDLE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnchorConfig {
    pub auto_tension: f64,
    pub min_shape_points: usize,
    pub keep_selection_after_drag: bool,
    /// Grid size for anchor drags; 0 disables grid snapping
    pub snap_grid: f64,
    /// Radius for snapping a dragged anchor onto other anchors; 0 disables
    pub snap_radius: f64,
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self {
            auto_tension: settings::anchors::AUTO_TENSION,
            min_shape_points: settings::anchors::MIN_SHAPE_POINTS,
            keep_selection_after_drag: settings::anchors::KEEP_SELECTION_AFTER_DRAG,
            snap_grid: settings::anchors::SNAP_GRID,
            snap_radius: settings::anchors::SNAP_RADIUS,
        }
    }
}

/// UV correction and surface sampling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SurfaceConfig {
    /// Initial UV-space radius for the correction scan
    pub search_radius: f64,
    /// The radius doubles up to this bound when nothing is found
    pub max_search_radius: f64,
    /// Vertices blended by inverse-distance weighting
    pub max_matches: usize,
    pub cache_capacity: usize,
    /// UV quantization step for cache keys
    pub cache_quantum: f64,
    /// UV-space radius for picking vertices to interpolate
    pub world_search_radius: f64,
    /// Distance a sample is pushed along its normal
    pub surface_offset: f32,
    pub round_trip_tolerance: f64,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            search_radius: settings::surface::SEARCH_RADIUS,
            max_search_radius: settings::surface::MAX_SEARCH_RADIUS,
            max_matches: settings::surface::MAX_MATCHES,
            cache_capacity: settings::surface::CACHE_CAPACITY,
            cache_quantum: settings::surface::CACHE_QUANTUM,
            world_search_radius: settings::surface::WORLD_SEARCH_RADIUS,
            surface_offset: settings::surface::SURFACE_OFFSET,
            round_trip_tolerance: settings::surface::ROUND_TRIP_TOLERANCE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EraserConfig {
    pub radius: f64,
}

impl Default for EraserConfig {
    fn default() -> Self {
        Self {
            radius: settings::eraser::RADIUS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::StitchKind;

    #[test]
    fn empty_document_is_default() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.hit.anchor_radius, settings::hit::ANCHOR_RADIUS);
        assert_eq!(config.surface.max_matches, 5);
    }

    #[test]
    fn partial_sections_override() {
        let config = EngineConfig::from_toml_str(
            r#"
            [curvature]
            max_handle = 80.0

            [stitch]
            kind = "zigzag"
            width = 12.0
            "#,
        )
        .unwrap();
        assert_eq!(config.curvature.max_handle, 80.0);
        assert_eq!(config.curvature.gain, settings::curvature::GAIN);
        assert_eq!(config.stitch.kind, StitchKind::Zigzag);
        assert_eq!(config.stitch.width, 12.0);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(EngineConfig::from_toml_str("[pen]\ndebounce = 3.0\n").is_err());
        assert!(EngineConfig::from_toml_str("[brush]\nsize = 3\n").is_err());
    }
}
