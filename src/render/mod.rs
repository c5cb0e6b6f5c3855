// Copyright 2025 the Threadmark Authors
// SPDX-License-Identifier: Apache-2.0

//! Path rasterizer.
//!
//! Draws a path into a `tiny_skia::Pixmap`, either plainly with the path's
//! own style or with the stitch renderer. Output depends only on the path
//! and the parameters, so rendering twice onto cleared canvases gives the
//! same pixels. An unusable stitch configuration falls back to a plain
//! render of the same path.

mod color;
pub mod plan;
pub(crate) mod rng;
pub mod stitch;

pub use plan::{NeedleKind, PlanInfo, PlanPoint, StitchPlan};
pub use stitch::{StitchConfig, StitchKind};

use crate::error::RenderError;
use crate::path::{Path, Shape};
use kurbo::{BezPath, PathEl, Rect};
use tiny_skia::{FillRule, Mask, MaskType, PathBuilder, Pixmap, PixmapPaint, Transform};

/// How to draw a path
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderMode<'a> {
    /// Stroke and fill with the path's style
    Plain,
    Stitch(&'a StitchConfig),
}

/// What a render produced
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderReport {
    /// Canvas area the render may have touched
    pub bounds: Rect,
    /// A stitch render fell back to plain
    pub fell_back: bool,
    /// Thread segments drawn (0 for plain renders)
    pub stitches: usize,
}

/// Render `path` onto `canvas`
pub fn render(canvas: &mut Pixmap, path: &Path, mode: RenderMode<'_>) -> Result<RenderReport, RenderError> {
    if path.is_empty() {
        return Err(RenderError::EmptyPath);
    }
    let anchors = path.bounds();

    if let RenderMode::Stitch(config) = mode {
        match config.validate() {
            Ok(()) => {
                let stitches = stitch::draw(canvas, path, config);
                let reach = config.reach();
                return Ok(RenderReport {
                    bounds: anchors.inflate(reach, reach),
                    fell_back: false,
                    stitches,
                });
            }
            Err(err) => tracing::warn!("{}; rendering plain stroke instead", err),
        }
    }

    render_plain(canvas, path);
    let reach = path.style.stroke_width.max(1.0) * 0.5;
    Ok(RenderReport {
        bounds: anchors.inflate(reach, reach),
        fell_back: matches!(mode, RenderMode::Stitch(_)),
        stitches: 0,
    })
}

/// Render a committed shape: stitched with its own kind when it has one
pub fn render_shape(canvas: &mut Pixmap, shape: &Shape, stitch: &StitchConfig) -> Result<RenderReport, RenderError> {
    match shape.stitch_kind() {
        Some(kind) => {
            let config = stitch.with_kind(kind);
            render(canvas, shape.path(), RenderMode::Stitch(&config))
        }
        None => render(canvas, shape.path(), RenderMode::Plain),
    }
}

fn render_plain(canvas: &mut Pixmap, path: &Path) {
    let style = &path.style;

    if path.len() == 1 {
        // a single anchor shows as a dot of the stroke width
        let p = path.points[0].position();
        let radius = (style.stroke_width.max(1.0) * 0.5) as f32;
        if let Some(dot) = PathBuilder::from_circle(p.x as f32, p.y as f32, radius) {
            let paint = color::paint(style.stroke_color.with_opacity(style.stroke_opacity));
            canvas.fill_path(&dot, &paint, FillRule::Winding, Transform::identity(), None);
        }
        return;
    }

    let Some(skia_path) = to_skia_path(&path.to_bezpath()) else {
        return;
    };

    if style.fill && path.closed {
        let paint = color::paint(style.fill_color.with_opacity(style.fill_opacity));
        canvas.fill_path(&skia_path, &paint, FillRule::Winding, Transform::identity(), None);
    }
    if style.stroke && style.stroke_width > 0.0 {
        let paint = color::paint(style.stroke_color.with_opacity(style.stroke_opacity));
        let stroke = color::stroke_for(style);
        canvas.stroke_path(&skia_path, &paint, &stroke, Transform::identity(), None);
    }
}

/// Convert a kurbo path to a tiny-skia path
pub(crate) fn to_skia_path(bez: &BezPath) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    for el in bez.elements() {
        match *el {
            PathEl::MoveTo(p) => pb.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => pb.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(p1, p2) => pb.quad_to(p1.x as f32, p1.y as f32, p2.x as f32, p2.y as f32),
            PathEl::CurveTo(p1, p2, p3) => pb.cubic_to(
                p1.x as f32,
                p1.y as f32,
                p2.x as f32,
                p2.y as f32,
                p3.x as f32,
                p3.y as f32,
            ),
            PathEl::ClosePath => pb.close(),
        }
    }
    pb.finish()
}

/// Draw `rendered` over `layer`. With `lock_transparent`, only pixels that
/// are already opaque in `layer` receive paint, in proportion to their
/// alpha.
pub fn composite_onto(layer: &mut Pixmap, rendered: &Pixmap, lock_transparent: bool) {
    let mask = lock_transparent.then(|| Mask::from_pixmap(layer.as_ref(), MaskType::Alpha));
    layer.draw_pixmap(
        0,
        0,
        rendered.as_ref(),
        &PixmapPaint::default(),
        Transform::identity(),
        mask.as_ref(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::{AnchorPoint, HandleSide, PathStyle, Rgba8};
    use kurbo::{Point, Vec2};

    fn canvas() -> Pixmap {
        Pixmap::new(64, 64).unwrap()
    }

    fn triangle(style: PathStyle) -> Path {
        let mut path = Path::from_points(
            vec![
                AnchorPoint::corner(Point::new(8.0, 8.0)),
                AnchorPoint::corner(Point::new(56.0, 8.0)),
                AnchorPoint::corner(Point::new(32.0, 56.0)),
            ],
            true,
            style,
        );
        path.update_control_handle(1, HandleSide::Out, Vec2::new(0.0, 10.0)).unwrap();
        path
    }

    fn alpha_at(pixmap: &Pixmap, x: u32, y: u32) -> u8 {
        pixmap.pixel(x, y).map_or(0, |p| p.alpha())
    }

    #[test]
    fn render_is_idempotent() {
        let path = triangle(PathStyle::default());
        let config = StitchConfig {
            kind: StitchKind::Satin,
            seed: 42,
            ..StitchConfig::default()
        };
        for mode in [RenderMode::Plain, RenderMode::Stitch(&config)] {
            let mut a = canvas();
            let mut b = canvas();
            render(&mut a, &path, mode).unwrap();
            render(&mut b, &path, mode).unwrap();
            assert_eq!(a.data(), b.data());
            assert!(a.data().iter().any(|&v| v != 0));
        }
    }

    #[test]
    fn plain_fill_covers_interior() {
        let style = PathStyle {
            fill: true,
            fill_color: Rgba8::new(255, 0, 0, 255),
            ..PathStyle::default()
        };
        let mut pixmap = canvas();
        render(&mut pixmap, &triangle(style), RenderMode::Plain).unwrap();
        assert_eq!(alpha_at(&pixmap, 32, 24), 255);
        assert_eq!(alpha_at(&pixmap, 2, 60), 0);
    }

    #[test]
    fn invalid_stitch_config_falls_back() {
        let config = StitchConfig {
            thread_width: -1.0,
            ..StitchConfig::default()
        };
        let path = triangle(PathStyle::default());
        let mut stitched = canvas();
        let report = render(&mut stitched, &path, RenderMode::Stitch(&config)).unwrap();
        assert!(report.fell_back);

        let mut plain = canvas();
        render(&mut plain, &path, RenderMode::Plain).unwrap();
        assert_eq!(stitched.data(), plain.data());
    }

    #[test]
    fn oversized_stitch_config_falls_back() {
        let path = triangle(PathStyle::default());
        for config in [
            StitchConfig {
                kind: StitchKind::Fill,
                width: 1e9,
                ..StitchConfig::default()
            },
            StitchConfig {
                kind: StitchKind::Satin,
                passes: u32::MAX,
                ..StitchConfig::default()
            },
        ] {
            let report = render(&mut canvas(), &path, RenderMode::Stitch(&config)).unwrap();
            assert!(report.fell_back);
            assert_eq!(report.stitches, 0);
        }
    }

    #[test]
    fn empty_path_is_an_error() {
        let path = Path::from_points(Vec::new(), false, PathStyle::default());
        assert_eq!(render(&mut canvas(), &path, RenderMode::Plain), Err(RenderError::EmptyPath));
    }

    #[test]
    fn single_point_draws_a_dot() {
        let path = Path::new(Point::new(20.0, 20.0), PathStyle {
            stroke_width: 6.0,
            ..PathStyle::default()
        });
        let mut pixmap = canvas();
        let report = render(&mut pixmap, &path, RenderMode::Plain).unwrap();
        assert_eq!(alpha_at(&pixmap, 20, 20), 255);
        assert!(report.bounds.contains(Point::new(22.0, 22.0)));
    }

    #[test]
    fn stitches_are_counted_for_every_kind() {
        let path = triangle(PathStyle::default());
        for kind in [
            StitchKind::Running,
            StitchKind::Satin,
            StitchKind::Zigzag,
            StitchKind::DoubleSatin,
            StitchKind::Meander,
            StitchKind::Contour,
            StitchKind::Ripple,
            StitchKind::Fill,
            StitchKind::Puff,
        ] {
            let config = StitchConfig::default().with_kind(kind);
            let report = render(&mut canvas(), &path, RenderMode::Stitch(&config)).unwrap();
            assert!(report.stitches > 0, "{kind:?} drew nothing");
            assert!(!report.fell_back);
        }
    }

    #[test]
    fn lock_transparent_masks_new_paint() {
        let mut layer = canvas();
        // opaque left half
        let half = tiny_skia::Rect::from_xywh(0.0, 0.0, 32.0, 64.0).unwrap();
        layer.fill_rect(half, &color::paint(Rgba8::WHITE), Transform::identity(), None);

        let mut rendered = canvas();
        rendered.fill(tiny_skia::Color::from_rgba8(0, 0, 255, 255));
        composite_onto(&mut layer, &rendered, true);

        let left = layer.pixel(10, 10).unwrap();
        assert_eq!((left.blue(), left.red()), (255, 0));
        assert_eq!(alpha_at(&layer, 50, 10), 0);
    }
}
