// Copyright 2025 the Threadmark Authors
// SPDX-License-Identifier: Apache-2.0

//! Conversions from path styles to tiny-skia paints and strokes.

use crate::path::{LineCap, LineJoin, PathStyle, Rgba8};
use tiny_skia::{Color, Paint, Stroke};

pub(crate) fn to_color(color: Rgba8) -> Color {
    Color::from_rgba8(color.r, color.g, color.b, color.a)
}

/// Anti-aliased solid paint
pub(crate) fn paint(color: Rgba8) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(to_color(color));
    paint.anti_alias = true;
    paint
}

pub(crate) fn stroke_for(style: &PathStyle) -> Stroke {
    Stroke {
        width: style.stroke_width.max(0.0) as f32,
        line_cap: match style.cap {
            LineCap::Butt => tiny_skia::LineCap::Butt,
            LineCap::Round => tiny_skia::LineCap::Round,
            LineCap::Square => tiny_skia::LineCap::Square,
        },
        line_join: match style.join {
            LineJoin::Miter => tiny_skia::LineJoin::Miter,
            LineJoin::Round => tiny_skia::LineJoin::Round,
            LineJoin::Bevel => tiny_skia::LineJoin::Bevel,
        },
        ..Stroke::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_maps_to_stroke() {
        let style = PathStyle {
            stroke_width: 3.0,
            cap: LineCap::Square,
            join: LineJoin::Bevel,
            ..PathStyle::default()
        };
        let stroke = stroke_for(&style);
        assert_eq!(stroke.width, 3.0);
        assert_eq!(stroke.line_cap, tiny_skia::LineCap::Square);
        assert_eq!(stroke.line_join, tiny_skia::LineJoin::Bevel);
    }

    #[test]
    fn color_channels_survive() {
        let c = to_color(Rgba8::new(255, 0, 0, 255));
        assert_eq!(c.red(), 1.0);
        assert_eq!(c.green(), 0.0);
        assert_eq!(c.alpha(), 1.0);
    }
}
