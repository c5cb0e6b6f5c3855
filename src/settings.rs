// Copyright 2025 the Threadmark Authors
// SPDX-License-Identifier: Apache-2.0

//! Engine settings and default constants.
//!
//! These are the compile-time defaults. Every group can be overridden at
//! runtime through `config::EngineConfig`, which is built from the public
//! modules at the bottom of this file.

// ============================================================================
// HIT TESTING
// ============================================================================
/// Anchor points are hit inside this radius (canvas pixels)
const ANCHOR_HIT_RADIUS: f64 = 8.0;

/// Control handle endpoints are hit inside this radius (canvas pixels)
const CONTROL_HIT_RADIUS: f64 = 6.0;

/// Path segments are hit inside this distance (canvas pixels)
const SEGMENT_HIT_RADIUS: f64 = 20.0;

// ============================================================================
// PEN TOOL
// ============================================================================
/// Minimum distance between consecutively appended points while dragging
const PEN_DEBOUNCE_DISTANCE: f64 = 4.0;

/// Minimum time between consecutively appended points while dragging (ms)
const PEN_DEBOUNCE_INTERVAL_MS: u64 = 16;

/// A current path needs this many points to close into a filled shape
const PEN_CLOSE_MIN_POINTS: usize = 3;

/// A current path needs this many points to commit as an open stroke
const PEN_STROKE_MIN_POINTS: usize = 2;

// ============================================================================
// CURVATURE TOOL
// ============================================================================
/// Handle length per pixel of pull distance
const CURVATURE_GAIN: f64 = 1.0;

/// Upper bound on the handle length produced by a pull (canvas pixels)
const CURVATURE_MAX_HANDLE: f64 = 120.0;

// ============================================================================
// ANCHOR EDITING
// ============================================================================
/// Tension used when handles are generated for a newly smooth anchor
const AUTO_SMOOTH_TENSION: f64 = 0.5;

/// Committed shapes with fewer points than this are removed
const MIN_SHAPE_POINTS: usize = 2;

/// Keep the dragged anchor selected once the drag ends
const KEEP_SELECTION_AFTER_DRAG: bool = true;

/// Grid spacing for anchor drags, 0 disables grid snapping
const SNAP_GRID: f64 = 0.0;

/// Anchors dragged within this radius of another anchor snap onto it
const SNAP_RADIUS: f64 = 6.0;

// ============================================================================
// UV <-> SURFACE MAPPING
// ============================================================================
/// Initial UV-space search radius for seam correction
const UV_SEARCH_RADIUS: f64 = 0.01;

/// The correction radius doubles until it passes this bound
const UV_MAX_SEARCH_RADIUS: f64 = 0.05;

/// Number of nearest vertices blended by the corrector
const UV_MAX_MATCHES: usize = 5;

/// Entries kept in the correction cache
const UV_CACHE_CAPACITY: usize = 1000;

/// UV quantum used to build correction cache keys
const UV_CACHE_QUANTUM: f64 = 1e-4;

/// Tight UV-space radius for world-position interpolation
const WORLD_SEARCH_RADIUS: f64 = 0.01;

/// Samples are lifted this far along the normal to avoid z-fighting
const SURFACE_OFFSET: f32 = 0.001;

/// uv -> canvas -> uv disagreement above this is reported
const ROUND_TRIP_TOLERANCE: f64 = 1e-3;

// ============================================================================
// ERASER
// ============================================================================
/// Shapes passing within this distance of the eraser are removed
const ERASER_RADIUS: f64 = 12.0;

// ============================================================================
// STITCH RENDERING
// ============================================================================
/// Distance between needle penetrations (canvas pixels)
const STITCH_LENGTH: f64 = 6.0;

/// Width of satin/fill columns (canvas pixels)
const STITCH_WIDTH: f64 = 8.0;

/// Widest band the renderer accepts (canvas pixels)
const STITCH_MAX_WIDTH: f64 = 256.0;

/// Most satin passes the renderer accepts
const STITCH_MAX_PASSES: u32 = 16;

/// Rendered thread thickness (canvas pixels)
const THREAD_WIDTH: f64 = 1.5;

/// Thickest thread the renderer accepts (canvas pixels)
const MAX_THREAD_WIDTH: f64 = 32.0;

/// Maximum positional jitter of a needle penetration (canvas pixels)
const STITCH_JITTER: f64 = 0.35;

/// Curve flattening tolerance used before resampling (canvas pixels)
const FLATTEN_TOLERANCE: f64 = 0.25;

// ============================================================================
// PUBLIC API
// ============================================================================

/// Hit-test radii in canvas pixels
pub mod hit {
    pub const ANCHOR_RADIUS: f64 = super::ANCHOR_HIT_RADIUS;
    pub const CONTROL_RADIUS: f64 = super::CONTROL_HIT_RADIUS;
    pub const SEGMENT_RADIUS: f64 = super::SEGMENT_HIT_RADIUS;
}

/// Pen tool debounce and commit thresholds
pub mod pen {
    pub const DEBOUNCE_DISTANCE: f64 = super::PEN_DEBOUNCE_DISTANCE;
    pub const DEBOUNCE_INTERVAL_MS: u64 = super::PEN_DEBOUNCE_INTERVAL_MS;
    pub const CLOSE_MIN_POINTS: usize = super::PEN_CLOSE_MIN_POINTS;
    pub const STROKE_MIN_POINTS: usize = super::PEN_STROKE_MIN_POINTS;
}

/// Curvature pull response
pub mod curvature {
    pub const GAIN: f64 = super::CURVATURE_GAIN;
    pub const MAX_HANDLE: f64 = super::CURVATURE_MAX_HANDLE;
}

/// Anchor editing policy
pub mod anchors {
    pub const AUTO_TENSION: f64 = super::AUTO_SMOOTH_TENSION;
    pub const MIN_SHAPE_POINTS: usize = super::MIN_SHAPE_POINTS;
    pub const KEEP_SELECTION_AFTER_DRAG: bool = super::KEEP_SELECTION_AFTER_DRAG;
    pub const SNAP_GRID: f64 = super::SNAP_GRID;
    pub const SNAP_RADIUS: f64 = super::SNAP_RADIUS;
}

/// UV correction and world-position mapping
pub mod surface {
    pub const SEARCH_RADIUS: f64 = super::UV_SEARCH_RADIUS;
    pub const MAX_SEARCH_RADIUS: f64 = super::UV_MAX_SEARCH_RADIUS;
    pub const MAX_MATCHES: usize = super::UV_MAX_MATCHES;
    pub const CACHE_CAPACITY: usize = super::UV_CACHE_CAPACITY;
    pub const CACHE_QUANTUM: f64 = super::UV_CACHE_QUANTUM;
    pub const WORLD_SEARCH_RADIUS: f64 = super::WORLD_SEARCH_RADIUS;
    pub const SURFACE_OFFSET: f32 = super::SURFACE_OFFSET;
    pub const ROUND_TRIP_TOLERANCE: f64 = super::ROUND_TRIP_TOLERANCE;
}

/// Eraser tool
pub mod eraser {
    pub const RADIUS: f64 = super::ERASER_RADIUS;
}

/// Stitch renderer defaults
pub mod stitch {
    pub const LENGTH: f64 = super::STITCH_LENGTH;
    pub const WIDTH: f64 = super::STITCH_WIDTH;
    pub const MAX_WIDTH: f64 = super::STITCH_MAX_WIDTH;
    pub const MAX_PASSES: u32 = super::STITCH_MAX_PASSES;
    pub const THREAD_WIDTH: f64 = super::THREAD_WIDTH;
    pub const MAX_THREAD_WIDTH: f64 = super::MAX_THREAD_WIDTH;
    pub const JITTER: f64 = super::STITCH_JITTER;
    pub const FLATTEN_TOLERANCE: f64 = super::FLATTEN_TOLERANCE;
}
