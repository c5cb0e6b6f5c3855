// Copyright 2025 the Threadmark Authors
// SPDX-License-Identifier: Apache-2.0

//! Stitch rendering: an embroidery-like raster approximation of a path.
//!
//! The path is flattened to polylines, resampled at the stitch spacing and
//! turned into a needle sequence according to the `StitchKind`. Every
//! consecutive pair of needle positions becomes one thread segment, drawn
//! as a thread-width stroke with a thinner highlight on top.

use super::color;
use super::rng::Pcg32;
use crate::error::RenderError;
use crate::path::{Path, Rgba8};
use crate::settings;
use kurbo::{BezPath, PathEl, Point, Vec2};
use serde::{Deserialize, Serialize};
use tiny_skia::{LineCap, LineJoin, PathBuilder, Pixmap, Stroke, Transform};

/// Stitch pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StitchKind {
    /// Needle points along the centreline
    #[default]
    Running,
    /// Alternating offsets across the path, narrowing on later passes
    Satin,
    /// Single-pass alternating offsets
    Zigzag,
    /// Two rails side by side
    DoubleSatin,
    /// Sinusoidal wander around the centreline
    Meander,
    /// Parallel bands across the width
    Contour,
    /// Offsets pulsing between the centreline and one edge
    Ripple,
    /// Dense bands across the width at every sample
    Fill,
    /// Raised puff print: a filled body under satin rails
    Puff,
}

/// Parameters of the stitch renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StitchConfig {
    pub kind: StitchKind,
    pub color: Rgba8,
    /// Stroke width of one thread
    pub thread_width: f64,
    /// Spacing between needle positions along the path
    pub stitch_length: f64,
    /// Total width of the stitched band
    pub width: f64,
    /// Satin passes
    pub passes: u32,
    /// Divides the stitch length; higher is denser
    pub density: f64,
    /// Maximum endpoint displacement in pixels
    pub jitter: f64,
    pub seed: u64,
}

impl Default for StitchConfig {
    fn default() -> Self {
        Self {
            kind: StitchKind::Running,
            color: Rgba8::BLACK,
            thread_width: settings::stitch::THREAD_WIDTH,
            stitch_length: settings::stitch::LENGTH,
            width: settings::stitch::WIDTH,
            passes: 1,
            density: 1.0,
            jitter: settings::stitch::JITTER,
            seed: 0,
        }
    }
}

impl StitchConfig {
    pub fn with_kind(mut self, kind: StitchKind) -> Self {
        self.kind = kind;
        self
    }

    /// Reject values the renderer cannot use
    pub fn validate(&self) -> Result<(), RenderError> {
        let checks = [
            (
                "thread_width",
                self.thread_width,
                self.thread_width > 0.0 && self.thread_width <= settings::stitch::MAX_THREAD_WIDTH,
            ),
            ("stitch_length", self.stitch_length, self.stitch_length > 0.0),
            (
                "width",
                self.width,
                (0.0..=settings::stitch::MAX_WIDTH).contains(&self.width),
            ),
            ("density", self.density, self.density > 0.0),
            ("jitter", self.jitter, self.jitter >= 0.0),
        ];
        for (name, value, ok) in checks {
            if !value.is_finite() || !ok {
                return Err(RenderError::InvalidStitchConfig(format!("{name} = {value}")));
            }
        }
        if self.passes == 0 || self.passes > settings::stitch::MAX_PASSES {
            return Err(RenderError::InvalidStitchConfig(format!("passes = {}", self.passes)));
        }
        Ok(())
    }

    /// Needle spacing after applying density
    pub fn spacing(&self) -> f64 {
        (self.stitch_length / self.density.max(0.25)).max(1.0)
    }

    /// Half-width of the band covered by stitches, including thread
    pub fn reach(&self) -> f64 {
        self.width * 0.5 + self.thread_width + self.jitter
    }
}

/// Flatten a path into one polyline per subpath
pub fn flatten(path: &BezPath, tolerance: f64) -> Vec<Vec<Point>> {
    let mut lines: Vec<Vec<Point>> = Vec::new();
    let mut start = Point::ZERO;
    kurbo::flatten(path.iter(), tolerance, |el| match el {
        PathEl::MoveTo(p) => {
            start = p;
            lines.push(vec![p]);
        }
        PathEl::LineTo(p) => {
            if let Some(line) = lines.last_mut() {
                line.push(p);
            }
        }
        PathEl::ClosePath => {
            if let Some(line) = lines.last_mut()
                && line.last() != Some(&start)
            {
                line.push(start);
            }
        }
        // flatten only emits moves, lines and closes
        PathEl::QuadTo(..) | PathEl::CurveTo(..) => {}
    });
    lines
}

/// Points every `spacing` along a polyline, always keeping both ends
pub fn resample_polyline(points: &[Point], spacing: f64) -> Vec<Point> {
    if points.len() < 2 || spacing.is_nan() || spacing <= 0.0 {
        return points.to_vec();
    }
    let mut out = vec![points[0]];
    // distance walked since the last emitted sample
    let mut carry = 0.0;
    for pair in points.windows(2) {
        let (p0, p1) = (pair[0], pair[1]);
        let seg_len = p0.distance(p1);
        if seg_len <= 1e-6 {
            continue;
        }
        let dir = (p1 - p0) / seg_len;
        let mut d = spacing - carry;
        while d <= seg_len {
            out.push(p0 + dir * d);
            d += spacing;
        }
        carry = seg_len - (d - spacing);
    }
    if let Some(&last) = points.last()
        && out.last() != Some(&last)
    {
        out.push(last);
    }
    out
}

/// Unit tangent at sample `i` by central difference
pub fn tangent_at(points: &[Point], i: usize) -> Vec2 {
    let n = points.len();
    if n < 2 {
        return Vec2::new(1.0, 0.0);
    }
    let (a, b) = if i == 0 {
        (points[0], points[1])
    } else if i >= n - 1 {
        (points[n - 2], points[n - 1])
    } else {
        (points[i - 1], points[i + 1])
    };
    let d = b - a;
    let len = d.hypot();
    if len <= f64::EPSILON { Vec2::new(1.0, 0.0) } else { d / len }
}

/// Left normal at sample `i`
fn normal_at(points: &[Point], i: usize) -> Vec2 {
    let t = tangent_at(points, i);
    Vec2::new(-t.y, t.x)
}

/// Band count for fill-style patterns
fn band_count(config: &StitchConfig) -> i64 {
    ((config.width.max(2.0) / config.spacing().max(1.0)).floor() as i64).max(1)
}

/// Needle sequence for one resampled polyline
pub fn plan(base: &[Point], config: &StitchConfig) -> Vec<Point> {
    let half = config.width * 0.5;
    let mut out = Vec::with_capacity(base.len() * 2);

    match config.kind {
        StitchKind::Running => out.extend_from_slice(base),
        StitchKind::Satin | StitchKind::Puff => {
            let passes = config.passes.max(1);
            let mut side = 1.0;
            for (i, &b) in base.iter().enumerate() {
                let n = normal_at(base, i);
                for pass in 0..passes {
                    let off = config.width * (1.0 - f64::from(pass) / f64::from(passes)) * 0.5;
                    out.push(b + n * (side * off));
                }
                side = -side;
            }
        }
        StitchKind::Zigzag => {
            let mut side = 1.0;
            for (i, &b) in base.iter().enumerate() {
                out.push(b + normal_at(base, i) * (side * half));
                side = -side;
            }
        }
        StitchKind::DoubleSatin => {
            for (i, &b) in base.iter().enumerate() {
                let n = normal_at(base, i);
                out.push(b + n * (config.width * 0.25));
                out.push(b - n * half);
            }
        }
        StitchKind::Meander => {
            let freq = (2.0 / config.spacing()).max(0.2);
            let mut phase = 0.0f64;
            for (i, &b) in base.iter().enumerate() {
                phase += freq;
                out.push(b + normal_at(base, i) * (phase.sin() * half));
            }
        }
        StitchKind::Contour => {
            let bands = band_count(config);
            for (i, &b) in base.iter().enumerate() {
                let n = normal_at(base, i);
                for band in (-bands..=bands).step_by(2) {
                    out.push(b + n * (band as f64 / bands as f64 * half));
                }
            }
        }
        StitchKind::Ripple => {
            let mut phase = 0.0f64;
            for (i, &b) in base.iter().enumerate() {
                phase += 0.5;
                out.push(b + normal_at(base, i) * ((0.5 + 0.5 * phase.sin()) * half));
            }
        }
        StitchKind::Fill => {
            let bands = band_count(config);
            for (i, &b) in base.iter().enumerate() {
                let n = normal_at(base, i);
                for band in -bands..=bands {
                    out.push(b + n * (band as f64 / bands as f64 * half));
                }
            }
        }
    }
    out
}

/// Displace a needle position by up to `jitter` on each axis
fn jittered(point: Point, config: &StitchConfig, index: u64) -> Point {
    if config.jitter <= 0.0 {
        return point;
    }
    let mut rng = Pcg32::new(config.seed, index);
    let dx = rng.next_signed() * config.jitter;
    let dy = rng.next_signed() * config.jitter;
    point + Vec2::new(dx, dy)
}

fn to_f32(p: Point) -> (f32, f32) {
    (p.x as f32, p.y as f32)
}

/// Draw `path` with stitches. Returns the number of thread segments.
///
/// The configuration must already be valid.
pub(crate) fn draw(canvas: &mut Pixmap, path: &Path, config: &StitchConfig) -> usize {
    let spacing = config.spacing();
    let polylines = flatten(&path.to_bezpath(), settings::stitch::FLATTEN_TOLERANCE);

    let mut threads = PathBuilder::new();
    let mut body = PathBuilder::new();
    let mut index: u64 = 0;
    let mut count = 0;

    for line in &polylines {
        let base = resample_polyline(line, spacing);
        if base.len() < 2 {
            // a lone needle position still shows as a knot
            if let Some(&p) = base.first() {
                let (x, y) = to_f32(jittered(p, config, index));
                threads.move_to(x, y);
                threads.line_to(x, y);
                index += 1;
            }
            continue;
        }

        if config.kind == StitchKind::Puff {
            let (x, y) = to_f32(base[0]);
            body.move_to(x, y);
            for &p in &base[1..] {
                let (x, y) = to_f32(p);
                body.line_to(x, y);
            }
        }

        let needles = plan(&base, config);
        let mut previous: Option<Point> = None;
        for needle in needles {
            let needle = jittered(needle, config, index);
            index += 1;
            let (x, y) = to_f32(needle);
            match previous {
                None => threads.move_to(x, y),
                Some(_) => {
                    threads.line_to(x, y);
                    count += 1;
                }
            }
            previous = Some(needle);
        }
    }

    if let Some(body) = body.finish() {
        let stroke = Stroke {
            width: (config.width + config.thread_width) as f32,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        let paint = color::paint(config.color.darken(0.25));
        canvas.stroke_path(&body, &paint, &stroke, Transform::identity(), None);
    }

    if let Some(threads) = threads.finish() {
        let stroke = Stroke {
            width: config.thread_width as f32,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        canvas.stroke_path(&threads, &color::paint(config.color), &stroke, Transform::identity(), None);

        let highlight = Stroke {
            width: (config.thread_width * 0.35) as f32,
            ..stroke
        };
        let shine = if config.kind == StitchKind::Puff { 0.55 } else { 0.35 };
        let paint = color::paint(config.color.lighten(shine).with_opacity(0.6));
        canvas.stroke_path(&threads, &paint, &highlight, Transform::identity(), None);
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight(len: f64) -> Vec<Point> {
        vec![Point::new(0.0, 0.0), Point::new(len, 0.0)]
    }

    #[test]
    fn resample_keeps_endpoints_and_spacing() {
        let pts = resample_polyline(&straight(10.0), 3.0);
        assert_eq!(pts.first(), Some(&Point::new(0.0, 0.0)));
        assert_eq!(pts.last(), Some(&Point::new(10.0, 0.0)));
        assert_eq!(pts.len(), 5);
        assert!((pts[1].x - 3.0).abs() < 1e-9);
        assert!((pts[3].x - 9.0).abs() < 1e-9);
    }

    #[test]
    fn resample_carries_distance_across_corners() {
        let line = [Point::new(0.0, 0.0), Point::new(4.0, 0.0), Point::new(4.0, 4.0)];
        let pts = resample_polyline(&line, 3.0);
        // 3 along x, then 2 more past the corner
        assert!((pts[1].x - 3.0).abs() < 1e-9);
        assert!((pts[2].x - 4.0).abs() < 1e-9);
        assert!((pts[2].y - 2.0).abs() < 1e-9);
    }

    #[test]
    fn tangent_is_unit() {
        let pts = [Point::new(0.0, 0.0), Point::new(3.0, 4.0), Point::new(6.0, 8.0)];
        let t = tangent_at(&pts, 1);
        assert!((t.hypot() - 1.0).abs() < 1e-12);
        assert!((t.x - 0.6).abs() < 1e-12);
    }

    #[test]
    fn zigzag_alternates_sides() {
        let base = resample_polyline(&straight(12.0), 4.0);
        let config = StitchConfig {
            kind: StitchKind::Zigzag,
            width: 10.0,
            ..StitchConfig::default()
        };
        let needles = plan(&base, &config);
        assert_eq!(needles.len(), base.len());
        assert!((needles[0].y - 5.0).abs() < 1e-9);
        assert!((needles[1].y + 5.0).abs() < 1e-9);
    }

    #[test]
    fn satin_passes_narrow() {
        let base = straight(4.0);
        let config = StitchConfig {
            kind: StitchKind::Satin,
            width: 8.0,
            passes: 2,
            ..StitchConfig::default()
        };
        let needles = plan(&base, &config);
        assert_eq!(needles.len(), 4);
        assert!((needles[0].y - 4.0).abs() < 1e-9);
        assert!((needles[1].y - 2.0).abs() < 1e-9);
        assert!((needles[2].y + 4.0).abs() < 1e-9);
    }

    #[test]
    fn fill_spans_full_width() {
        let base = straight(4.0);
        let config = StitchConfig {
            kind: StitchKind::Fill,
            width: 12.0,
            stitch_length: 6.0,
            ..StitchConfig::default()
        };
        // two bands each side of the centreline
        let needles = plan(&base, &config);
        assert_eq!(needles.len(), 2 * 5);
        assert!((needles[0].y + 6.0).abs() < 1e-9);
        assert!((needles[4].y - 6.0).abs() < 1e-9);
    }

    #[test]
    fn validate_rejects_bad_values() {
        assert!(StitchConfig::default().validate().is_ok());
        let bad = StitchConfig {
            stitch_length: f64::NAN,
            ..StitchConfig::default()
        };
        assert!(matches!(bad.validate(), Err(RenderError::InvalidStitchConfig(_))));
        let bad = StitchConfig {
            passes: 0,
            ..StitchConfig::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn validate_bounds_band_and_passes() {
        let widest = StitchConfig {
            width: settings::stitch::MAX_WIDTH,
            passes: settings::stitch::MAX_PASSES,
            ..StitchConfig::default()
        };
        assert!(widest.validate().is_ok());
        for bad in [
            StitchConfig {
                width: 1e9,
                ..StitchConfig::default()
            },
            StitchConfig {
                passes: u32::MAX,
                ..StitchConfig::default()
            },
            StitchConfig {
                thread_width: 1e6,
                ..StitchConfig::default()
            },
        ] {
            assert!(matches!(bad.validate(), Err(RenderError::InvalidStitchConfig(_))));
        }
    }

    #[test]
    fn flatten_closes_subpaths() {
        let mut bez = BezPath::new();
        bez.move_to((0.0, 0.0));
        bez.line_to((10.0, 0.0));
        bez.line_to((10.0, 10.0));
        bez.close_path();
        let lines = flatten(&bez, 0.25);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].first(), lines[0].last());
    }
}
