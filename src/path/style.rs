// Copyright 2025 the Threadmark Authors
// SPDX-License-Identifier: Apache-2.0

//! Plain stroke/fill styling carried by every path.

use serde::{Deserialize, Serialize};

/// 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const BLACK: Rgba8 = Rgba8::new(0x00, 0x00, 0x00, 0xff);
    pub const WHITE: Rgba8 = Rgba8::new(0xff, 0xff, 0xff, 0xff);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// `#rrggbb`, ignoring alpha
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Same color with alpha multiplied by `opacity` in `[0, 1]`
    pub fn with_opacity(self, opacity: f32) -> Self {
        let a = (self.a as f32 * opacity.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }

    /// Mix towards white by `amount` in `[0, 1]`
    pub fn lighten(self, amount: f32) -> Self {
        let t = amount.clamp(0.0, 1.0);
        let mix = |c: u8| (c as f32 + (255.0 - c as f32) * t).round() as u8;
        Self::new(mix(self.r), mix(self.g), mix(self.b), self.a)
    }

    /// Mix towards black by `amount` in `[0, 1]`
    pub fn darken(self, amount: f32) -> Self {
        let t = 1.0 - amount.clamp(0.0, 1.0);
        let mix = |c: u8| (c as f32 * t).round() as u8;
        Self::new(mix(self.r), mix(self.g), mix(self.b), self.a)
    }
}

/// Stroke join style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineJoin {
    Miter,
    #[default]
    Round,
    Bevel,
}

/// Stroke cap style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineCap {
    Butt,
    #[default]
    Round,
    Square,
}

/// Plain rendering style of a path
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PathStyle {
    pub fill: bool,
    pub stroke: bool,
    pub fill_color: Rgba8,
    pub stroke_color: Rgba8,
    pub stroke_width: f64,
    pub fill_opacity: f32,
    pub stroke_opacity: f32,
    pub join: LineJoin,
    pub cap: LineCap,
}

impl Default for PathStyle {
    fn default() -> Self {
        Self {
            fill: false,
            stroke: true,
            fill_color: Rgba8::WHITE,
            stroke_color: Rgba8::BLACK,
            stroke_width: 2.0,
            fill_opacity: 1.0,
            stroke_opacity: 1.0,
            join: LineJoin::Round,
            cap: LineCap::Round,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opacity_scales_alpha() {
        assert_eq!(Rgba8::BLACK.with_opacity(0.5).a, 128);
        assert_eq!(Rgba8::BLACK.with_opacity(2.0).a, 255);
    }

    #[test]
    fn lighten_and_darken() {
        let c = Rgba8::new(100, 0, 200, 255);
        assert_eq!(c.lighten(1.0), Rgba8::new(255, 255, 255, 255));
        assert_eq!(c.darken(1.0), Rgba8::new(0, 0, 0, 255));
        assert_eq!(c.lighten(0.0), c);
    }

    #[test]
    fn style_defaults_fill_missing_fields() {
        let style: PathStyle = serde_json::from_str(r#"{ "fill": true, "strokeWidth": 4.0 }"#).unwrap();
        assert!(style.fill);
        assert!(style.stroke);
        assert_eq!(style.stroke_width, 4.0);
        assert_eq!(style.cap, LineCap::Round);
    }
}
