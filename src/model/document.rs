// Copyright 2025 the Threadmark Authors
// SPDX-License-Identifier: Apache-2.0

//! JSON persistence for committed shapes.
//!
//! The format mirrors the in-memory model: a version number and a list of
//! shapes, each with its path (`points` of `{x, y, kind, controlIn?,
//! controlOut?}`), closed flag, style, source tool and optional stitch kind.
//! Ids and bounding boxes are runtime data: they are regenerated on load.

use crate::path::Shape;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path as FsPath;

/// Current document format version
pub const DOCUMENT_VERSION: u32 = 1;

/// A set of committed shapes as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeDocument {
    pub version: u32,
    pub shapes: Vec<Shape>,
}

impl ShapeDocument {
    pub fn new(shapes: Vec<Shape>) -> Self {
        Self {
            version: DOCUMENT_VERSION,
            shapes,
        }
    }

    /// Parse a document, regenerating derived data.
    ///
    /// Shapes with non-finite coordinates are dropped with a warning.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut doc: ShapeDocument =
            serde_json::from_str(json).context("Failed to parse shape document")?;

        if doc.version > DOCUMENT_VERSION {
            anyhow::bail!(
                "Shape document version {} is newer than supported version {}",
                doc.version,
                DOCUMENT_VERSION
            );
        }

        let before = doc.shapes.len();
        doc.shapes.retain(|shape| shape.path().is_finite());
        if doc.shapes.len() != before {
            tracing::warn!(
                "Dropped {} shape(s) with non-finite coordinates",
                before - doc.shapes.len()
            );
        }
        for shape in &mut doc.shapes {
            shape.refresh_bounds();
        }
        Ok(doc)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize shape document")
    }

    pub fn load(path: &FsPath) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read shape document {}", path.display()))?;
        Self::from_json(&json)
    }

    pub fn save(&self, path: &FsPath) -> Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write shape document {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::{AnchorKind, AnchorPoint, HandleSide, Path, PathStyle};
    use crate::render::StitchKind;
    use crate::tools::ToolId;
    use kurbo::{Point, Rect, Vec2};

    fn sample_shapes() -> Vec<Shape> {
        let mut path = Path::from_points(
            vec![
                AnchorPoint::corner(Point::new(0.0, 0.0)),
                AnchorPoint::corner(Point::new(40.0, 0.0)),
                AnchorPoint::corner(Point::new(20.0, 30.0)),
            ],
            false,
            PathStyle::default(),
        );
        path.update_control_handle(1, HandleSide::Out, Vec2::new(5.0, 5.0)).unwrap();
        let filled = path.close(ToolId::Pen).unwrap();

        let stroke = Path::from_points(
            vec![
                AnchorPoint::corner(Point::new(1.0, 1.0)),
                AnchorPoint::corner(Point::new(9.0, 9.0)),
            ],
            false,
            PathStyle::default(),
        )
        .into_stroke(ToolId::Pen)
        .unwrap()
        .with_stitch(Some(StitchKind::Satin));

        vec![filled, stroke]
    }

    #[test]
    fn round_trip_preserves_geometry() {
        let doc = ShapeDocument::new(sample_shapes());
        let json = doc.to_json().unwrap();
        let loaded = ShapeDocument::from_json(&json).unwrap();

        assert_eq!(loaded.shapes.len(), 2);
        for (a, b) in doc.shapes.iter().zip(&loaded.shapes) {
            assert_eq!(a.path().points, b.path().points);
            assert_eq!(a.path().closed, b.path().closed);
            assert_eq!(a.bounding_box(), b.bounding_box());
            assert_eq!(a.stitch_kind(), b.stitch_kind());
        }
        assert_eq!(loaded.shapes[0].path().points[1].kind, AnchorKind::Smooth);
    }

    #[test]
    fn bounds_are_recomputed_on_load() {
        let json = r#"{
            "version": 1,
            "shapes": [{
                "path": { "points": [
                    { "x": 2.0, "y": 3.0, "kind": "corner" },
                    { "x": 12.0, "y": 8.0, "kind": "corner" }
                ] },
                "boundingBox": { "x0": 0.0, "y0": 0.0, "x1": 999.0, "y1": 999.0 },
                "sourceTool": "pen"
            }]
        }"#;
        let doc = ShapeDocument::from_json(json).unwrap();
        assert_eq!(doc.shapes[0].bounding_box(), Rect::new(2.0, 3.0, 12.0, 8.0));
    }

    #[test]
    fn newer_version_is_rejected() {
        let json = r#"{ "version": 99, "shapes": [] }"#;
        assert!(ShapeDocument::from_json(json).is_err());
    }
}
