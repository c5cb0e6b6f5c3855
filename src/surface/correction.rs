// Copyright 2025 the Threadmark Authors
// SPDX-License-Identifier: Apache-2.0

//! Seam correction for pointer UVs.
//!
//! Ray hits near mesh seams and triangle edges report noisy UVs. The
//! corrector pulls the hit toward nearby mesh vertices with an
//! inverse-distance-squared blend of up to `max_matches` of them, so the
//! result moves smoothly across triangle boundaries instead of snapping.
//! When no vertex is within reach the fallbacks are, in order: a match on a
//! single axis, then the clamped input.

use super::canvas::CanvasSize;
use super::index::{Axis, UvLookup};
use crate::config::SurfaceConfig;
use crate::settings;
use glam::Vec2;
use lru::LruCache;
use std::num::NonZeroUsize;

/// Nearest vertex closer than this is taken as is
const EXACT_DISTANCE: f32 = 1e-6;

/// Where a corrected UV came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrectionSource {
    /// The input sat on a vertex
    Exact,
    /// Weighted blend of this many vertices
    Blended(usize),
    /// Only one axis had a vertex close enough
    AxisPartial(Axis),
    /// Nothing nearby; the input clamped to the unit square
    Clamped,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Correction {
    pub uv: Vec2,
    pub source: CorrectionSource,
}

/// Correct `uv` against the mesh UVs `uvs`, searched through `lookup`
///
/// Returns `None` for non-finite input.
pub fn correct_uv(uv: Vec2, uvs: &[Vec2], lookup: &impl UvLookup, config: &SurfaceConfig) -> Option<Correction> {
    if !uv.is_finite() {
        return None;
    }
    let clamped = uv.clamp(Vec2::ZERO, Vec2::ONE);
    let max_radius = config.max_search_radius.max(config.search_radius) as f32;
    let mut radius = (config.search_radius as f32).max(EXACT_DISTANCE);

    let matches = loop {
        let found = lookup.within(clamped, radius);
        if !found.is_empty() || radius >= max_radius {
            break found;
        }
        radius = (radius * 2.0).min(max_radius);
    };

    if let Some(nearest) = matches.first() {
        if nearest.distance < EXACT_DISTANCE {
            return Some(Correction {
                uv: uvs[nearest.index].clamp(Vec2::ZERO, Vec2::ONE),
                source: CorrectionSource::Exact,
            });
        }
        let used = matches.len().min(config.max_matches.max(1));
        let mut sum = Vec2::ZERO;
        let mut total = 0.0;
        for candidate in &matches[..used] {
            let weight = 1.0 / (candidate.distance * candidate.distance);
            sum += uvs[candidate.index] * weight;
            total += weight;
        }
        return Some(Correction {
            uv: (sum / total).clamp(Vec2::ZERO, Vec2::ONE),
            source: CorrectionSource::Blended(used),
        });
    }

    if let Some(partial) = lookup.axis_partial(clamped, max_radius) {
        let vertex = uvs[partial.index];
        let corrected = match partial.axis {
            Axis::U => Vec2::new(vertex.x, clamped.y),
            Axis::V => Vec2::new(clamped.x, vertex.y),
        };
        tracing::warn!(
            "uv ({}, {}) has no vertex within {}; matched on {:?} only",
            uv.x,
            uv.y,
            max_radius,
            partial.axis
        );
        return Some(Correction {
            uv: corrected.clamp(Vec2::ZERO, Vec2::ONE),
            source: CorrectionSource::AxisPartial(partial.axis),
        });
    }

    tracing::warn!("uv ({}, {}) has no nearby vertex; using clamped input", uv.x, uv.y);
    Some(Correction {
        uv: clamped,
        source: CorrectionSource::Clamped,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
    u: i64,
    v: i64,
    width: u32,
    height: u32,
}

/// [`correct_uv`] behind a bounded LRU cache keyed on quantized UV and
/// canvas size
#[derive(Debug)]
pub struct UvCorrector {
    cache: LruCache<CacheKey, Correction>,
    quantum: f64,
}

impl UvCorrector {
    pub fn new(capacity: usize, quantum: f64) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        let quantum = if quantum > 0.0 {
            quantum
        } else {
            settings::surface::CACHE_QUANTUM
        };
        Self {
            cache: LruCache::new(capacity),
            quantum,
        }
    }

    pub fn from_config(config: &SurfaceConfig) -> Self {
        Self::new(config.cache_capacity, config.cache_quantum)
    }

    pub fn correct(
        &mut self,
        uv: Vec2,
        size: CanvasSize,
        uvs: &[Vec2],
        lookup: &impl UvLookup,
        config: &SurfaceConfig,
    ) -> Option<Correction> {
        if !uv.is_finite() {
            return None;
        }
        let key = CacheKey {
            u: (f64::from(uv.x) / self.quantum).round() as i64,
            v: (f64::from(uv.y) / self.quantum).round() as i64,
            width: size.width,
            height: size.height,
        };
        if let Some(hit) = self.cache.get(&key) {
            return Some(*hit);
        }
        let correction = correct_uv(uv, uvs, lookup, config)?;
        self.cache.put(key, correction);
        Some(correction)
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Drop every entry, e.g. after the mesh changed
    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::index::{LinearScan, UvGrid};
    use proptest::prelude::*;

    fn config() -> SurfaceConfig {
        SurfaceConfig::default()
    }

    fn quad() -> Vec<Vec2> {
        vec![
            Vec2::new(0.4, 0.4),
            Vec2::new(0.6, 0.4),
            Vec2::new(0.4, 0.6),
            Vec2::new(0.6, 0.6),
        ]
    }

    #[test]
    fn exact_vertex_is_returned() {
        let uvs = quad();
        let c = correct_uv(Vec2::new(0.6, 0.4), &uvs, &LinearScan::new(&uvs), &config()).unwrap();
        assert_eq!(c.source, CorrectionSource::Exact);
        assert_eq!(c.uv, Vec2::new(0.6, 0.4));
    }

    #[test]
    fn nearby_vertices_are_blended() {
        let uvs = vec![Vec2::new(0.50, 0.5), Vec2::new(0.51, 0.5)];
        let c = correct_uv(Vec2::new(0.502, 0.5), &uvs, &LinearScan::new(&uvs), &config()).unwrap();
        assert_eq!(c.source, CorrectionSource::Blended(2));
        // pulled toward the closer vertex, but not snapped
        assert!(c.uv.x > 0.5 && c.uv.x < 0.502, "{}", c.uv.x);
    }

    #[test]
    fn radius_widens_before_falling_back() {
        // 0.03 away: outside the initial radius, inside the widened one
        let uvs = vec![Vec2::new(0.53, 0.5)];
        let c = correct_uv(Vec2::new(0.5, 0.5), &uvs, &LinearScan::new(&uvs), &config()).unwrap();
        assert_eq!(c.source, CorrectionSource::Blended(1));
        assert!((c.uv.x - 0.53).abs() < 1e-6);
    }

    #[test]
    fn axis_partial_then_clamped() {
        let uvs = vec![Vec2::new(0.5, 0.9)];
        let lookup = LinearScan::new(&uvs);
        let c = correct_uv(Vec2::new(0.51, 0.1), &uvs, &lookup, &config()).unwrap();
        assert_eq!(c.source, CorrectionSource::AxisPartial(Axis::U));
        assert_eq!(c.uv, Vec2::new(0.5, 0.1));

        let c = correct_uv(Vec2::new(1.4, 0.1), &uvs, &lookup, &config()).unwrap();
        assert_eq!(c.source, CorrectionSource::Clamped);
        assert_eq!(c.uv, Vec2::new(1.0, 0.1));
    }

    #[test]
    fn empty_mesh_clamps() {
        let c = correct_uv(Vec2::new(-0.2, 0.3), &[], &LinearScan::new(&[]), &config()).unwrap();
        assert_eq!(c.source, CorrectionSource::Clamped);
        assert_eq!(c.uv, Vec2::new(0.0, 0.3));
    }

    #[test]
    fn non_finite_input_is_rejected() {
        let uvs = quad();
        assert_eq!(correct_uv(Vec2::new(f32::NAN, 0.5), &uvs, &LinearScan::new(&uvs), &config()), None);
    }

    #[test]
    fn blend_is_capped_at_max_matches() {
        let uvs: Vec<Vec2> = (0..8).map(|i| Vec2::new(0.5 + i as f32 * 0.001, 0.5)).collect();
        let c = correct_uv(Vec2::new(0.5035, 0.501), &uvs, &LinearScan::new(&uvs), &config()).unwrap();
        assert_eq!(c.source, CorrectionSource::Blended(5));
    }

    #[test]
    fn cache_is_bounded_and_keyed_by_canvas() {
        let uvs = quad();
        let lookup = LinearScan::new(&uvs);
        let mut corrector = UvCorrector::new(2, 1e-4);
        let size = CanvasSize::new(64, 64);
        corrector.correct(Vec2::new(0.41, 0.41), size, &uvs, &lookup, &config());
        corrector.correct(Vec2::new(0.41, 0.41), size, &uvs, &lookup, &config());
        assert_eq!(corrector.len(), 1);
        corrector.correct(Vec2::new(0.41, 0.41), CanvasSize::new(128, 128), &uvs, &lookup, &config());
        corrector.correct(Vec2::new(0.59, 0.59), size, &uvs, &lookup, &config());
        assert_eq!(corrector.len(), 2);
        corrector.clear();
        assert!(corrector.is_empty());
    }

    proptest! {
        #[test]
        fn index_and_linear_scan_agree(u in -0.1f32..1.1, v in -0.1f32..1.1) {
            let uvs: Vec<Vec2> = (0..200)
                .map(|i| {
                    let t = i as f32 * 0.754_877_7;
                    Vec2::new(t.fract(), (t * 3.1).fract())
                })
                .collect();
            let grid = UvGrid::new(&uvs);
            let uv = Vec2::new(u, v);
            prop_assert_eq!(
                correct_uv(uv, &uvs, &grid, &config()),
                correct_uv(uv, &uvs, &LinearScan::new(&uvs), &config())
            );
        }
    }
}
