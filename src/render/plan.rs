// Copyright 2025 the Threadmark Authors
// SPDX-License-Identifier: Apache-2.0

//! Machine-readable stitch plans.
//!
//! A plan is the needle sequence the stitch renderer would draw, without
//! jitter, as canvas-pixel points. It opens with a color change at the
//! first needle position. `info` carries the parameters in millimetres
//! when a scale is known.

use super::stitch::{self, StitchConfig, StitchKind};
use crate::error::RenderError;
use crate::path::Shape;
use crate::settings;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// What the machine does at a point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeedleKind {
    Stitch,
    ColorChange,
}

/// One needle position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanPoint {
    pub x: f64,
    pub y: f64,
    #[serde(rename = "type")]
    pub kind: NeedleKind,
    /// Thread color as `#rrggbb`, on color changes only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl PlanPoint {
    fn stitch(p: Point) -> Self {
        Self {
            x: p.x,
            y: p.y,
            kind: NeedleKind::Stitch,
            color: None,
        }
    }
}

/// Summary of a plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanInfo {
    /// Points of kind [`NeedleKind::Stitch`]
    pub stitch_count: usize,
    pub strategy: StitchKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mm_per_px: Option<f64>,
    /// Needle spacing after density, in millimetres when scaled, else pixels
    pub stitch_len: f64,
    /// Band width, in millimetres when scaled, else pixels
    pub width: f64,
    pub passes: u32,
}

/// Needle sequence for one shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StitchPlan {
    pub points: Vec<PlanPoint>,
    pub info: PlanInfo,
}

impl StitchPlan {
    /// Plan `shape` with its own stitch kind, or `config.kind` for plain
    /// shapes. `mm_per_px` is ignored unless positive and finite.
    pub fn for_shape(shape: &Shape, config: &StitchConfig, mm_per_px: Option<f64>) -> Result<Self, RenderError> {
        let config = config.with_kind(shape.stitch_kind().unwrap_or(config.kind));
        config.validate()?;
        let path = shape.path();
        if path.is_empty() {
            return Err(RenderError::EmptyPath);
        }

        let spacing = config.spacing();
        let mut points = Vec::new();
        for line in stitch::flatten(&path.to_bezpath(), settings::stitch::FLATTEN_TOLERANCE) {
            let base = stitch::resample_polyline(&line, spacing);
            if base.len() < 2 {
                continue;
            }
            if points.is_empty() {
                points.push(PlanPoint {
                    x: base[0].x,
                    y: base[0].y,
                    kind: NeedleKind::ColorChange,
                    color: Some(config.color.to_hex()),
                });
            }
            points.extend(stitch::plan(&base, &config).into_iter().map(PlanPoint::stitch));
        }

        let mm_per_px = mm_per_px.filter(|m| m.is_finite() && *m > 0.0);
        let scale = mm_per_px.unwrap_or(1.0);
        let stitch_count = points.iter().filter(|p| p.kind == NeedleKind::Stitch).count();
        tracing::debug!("[StitchPlan::for_shape] {:?}: {} stitches", shape.id(), stitch_count);
        Ok(Self {
            points,
            info: PlanInfo {
                stitch_count,
                strategy: config.kind,
                mm_per_px,
                stitch_len: spacing * scale,
                width: config.width * scale,
                passes: config.passes,
            },
        })
    }
}
