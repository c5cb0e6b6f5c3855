// Copyright 2025 the Threadmark Authors
// SPDX-License-Identifier: Apache-2.0

//! Vertex lookup in UV space.
//!
//! `LinearScan` checks every vertex; `UvGrid` buckets vertices into a
//! uniform grid over the unit square and only visits buckets that can hold
//! a match. Both return the same candidates in the same order, so the
//! correction and interpolation results do not depend on which one is
//! used. Vertices outside the unit square live in the nearest edge bucket;
//! vertices with non-finite UVs are never returned.

use glam::Vec2;
use std::cmp::Ordering;

/// Which UV axis an axis-partial match agreed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    U,
    V,
}

/// A vertex found by a query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub index: usize,
    pub distance: f32,
}

/// An axis-partial match
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisMatch {
    pub index: usize,
    pub axis: Axis,
    /// Difference along `axis`
    pub delta: f32,
}

/// Queries over a mesh's UV attribute
pub trait UvLookup {
    /// Every vertex within `radius` of `center`, closest first, ties by index
    fn within(&self, center: Vec2, radius: f32) -> Vec<Candidate>;

    /// The closest vertex overall
    fn nearest(&self, center: Vec2) -> Option<Candidate>;

    /// The vertex closest to `center` along a single axis, if that
    /// difference is at most `radius`
    fn axis_partial(&self, center: Vec2, radius: f32) -> Option<AxisMatch>;
}

fn by_distance(a: &Candidate, b: &Candidate) -> Ordering {
    a.distance.total_cmp(&b.distance).then(a.index.cmp(&b.index))
}

fn axis_rank(m: &AxisMatch) -> (f32, usize, u8) {
    let axis = match m.axis {
        Axis::U => 0,
        Axis::V => 1,
    };
    (m.delta, m.index, axis)
}

fn better_axis(a: AxisMatch, b: Option<AxisMatch>) -> AxisMatch {
    match b {
        None => a,
        Some(b) => {
            let (ra, rb) = (axis_rank(&a), axis_rank(&b));
            let ord = ra.0.total_cmp(&rb.0).then(ra.1.cmp(&rb.1)).then(ra.2.cmp(&rb.2));
            if ord == Ordering::Greater { b } else { a }
        }
    }
}

/// Axis candidates for one vertex
fn axis_matches(index: usize, uv: Vec2, center: Vec2, radius: f32, best: &mut Option<AxisMatch>) {
    let du = (uv.x - center.x).abs();
    if du <= radius {
        *best = Some(better_axis(
            AxisMatch {
                index,
                axis: Axis::U,
                delta: du,
            },
            *best,
        ));
    }
    let dv = (uv.y - center.y).abs();
    if dv <= radius {
        *best = Some(better_axis(
            AxisMatch {
                index,
                axis: Axis::V,
                delta: dv,
            },
            *best,
        ));
    }
}

/// Brute-force lookup
#[derive(Debug, Clone, Copy)]
pub struct LinearScan<'a> {
    uvs: &'a [Vec2],
}

impl<'a> LinearScan<'a> {
    pub fn new(uvs: &'a [Vec2]) -> Self {
        Self { uvs }
    }
}

impl UvLookup for LinearScan<'_> {
    fn within(&self, center: Vec2, radius: f32) -> Vec<Candidate> {
        let mut out: Vec<Candidate> = self
            .uvs
            .iter()
            .enumerate()
            .filter(|(_, uv)| uv.is_finite())
            .map(|(index, uv)| Candidate {
                index,
                distance: uv.distance(center),
            })
            .filter(|c| c.distance <= radius)
            .collect();
        out.sort_by(by_distance);
        out
    }

    fn nearest(&self, center: Vec2) -> Option<Candidate> {
        self.uvs
            .iter()
            .enumerate()
            .filter(|(_, uv)| uv.is_finite())
            .map(|(index, uv)| Candidate {
                index,
                distance: uv.distance(center),
            })
            .min_by(by_distance)
    }

    fn axis_partial(&self, center: Vec2, radius: f32) -> Option<AxisMatch> {
        let mut best = None;
        for (index, uv) in self.uvs.iter().enumerate() {
            if uv.is_finite() {
                axis_matches(index, *uv, center, radius, &mut best);
            }
        }
        best
    }
}

/// Upper bound on grid resolution per axis
const MAX_CELLS: usize = 256;

/// Uniform bucket grid over the unit square
#[derive(Debug, Clone)]
pub struct UvGrid {
    uvs: Vec<Vec2>,
    cells: usize,
    cell_size: f32,
    buckets: Vec<Vec<u32>>,
}

impl UvGrid {
    pub fn new(uvs: &[Vec2]) -> Self {
        let cells = ((uvs.len() as f64 / 2.0).sqrt().ceil() as usize).clamp(1, MAX_CELLS);
        let mut grid = Self {
            uvs: uvs.to_vec(),
            cells,
            cell_size: 1.0 / cells as f32,
            buckets: vec![Vec::new(); cells * cells],
        };
        for (index, uv) in uvs.iter().enumerate() {
            if uv.is_finite() {
                let bucket = grid.bucket(grid.cell_of(uv.x), grid.cell_of(uv.y));
                grid.buckets[bucket].push(index as u32);
            }
        }
        tracing::debug!("[UvGrid::new] {} vertices in {}x{} cells", uvs.len(), cells, cells);
        grid
    }

    pub fn len(&self) -> usize {
        self.uvs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uvs.is_empty()
    }

    fn cell_of(&self, coord: f32) -> usize {
        let c = (coord.clamp(0.0, 1.0) / self.cell_size).floor();
        (c.max(0.0) as usize).min(self.cells - 1)
    }

    fn bucket(&self, col: usize, row: usize) -> usize {
        row * self.cells + col
    }

    fn visit(&self, cols: (usize, usize), rows: (usize, usize), mut f: impl FnMut(usize, Vec2)) {
        for row in rows.0..=rows.1 {
            for col in cols.0..=cols.1 {
                for &index in &self.buckets[self.bucket(col, row)] {
                    let index = index as usize;
                    f(index, self.uvs[index]);
                }
            }
        }
    }

    fn span(&self, lo: f32, hi: f32) -> (usize, usize) {
        (self.cell_of(lo), self.cell_of(hi))
    }
}

impl UvLookup for UvGrid {
    fn within(&self, center: Vec2, radius: f32) -> Vec<Candidate> {
        if !(center.is_finite() && radius >= 0.0) {
            return Vec::new();
        }
        let cols = self.span(center.x - radius, center.x + radius);
        let rows = self.span(center.y - radius, center.y + radius);
        let mut out = Vec::new();
        self.visit(cols, rows, |index, uv| {
            let distance = uv.distance(center);
            if distance <= radius {
                out.push(Candidate { index, distance });
            }
        });
        out.sort_by(by_distance);
        out
    }

    fn nearest(&self, center: Vec2) -> Option<Candidate> {
        if !center.is_finite() {
            return None;
        }
        let (cx, cy) = (self.cell_of(center.x), self.cell_of(center.y));
        let mut best: Option<Candidate> = None;

        for ring in 0..self.cells {
            let cols = (cx.saturating_sub(ring), (cx + ring).min(self.cells - 1));
            let rows = (cy.saturating_sub(ring), (cy + ring).min(self.cells - 1));
            for row in rows.0..=rows.1 {
                for col in cols.0..=cols.1 {
                    // only the ring's border cells are new
                    if col.abs_diff(cx) != ring && row.abs_diff(cy) != ring {
                        continue;
                    }
                    for &index in &self.buckets[self.bucket(col, row)] {
                        let index = index as usize;
                        let candidate = Candidate {
                            index,
                            distance: self.uvs[index].distance(center),
                        };
                        if best.is_none_or(|b| by_distance(&candidate, &b) == Ordering::Less) {
                            best = Some(candidate);
                        }
                    }
                }
            }
            // anything beyond this ring is at least `ring` cells away
            if best.is_some_and(|b| b.distance < ring as f32 * self.cell_size) {
                break;
            }
        }
        best
    }

    fn axis_partial(&self, center: Vec2, radius: f32) -> Option<AxisMatch> {
        if !(center.is_finite() && radius >= 0.0) {
            return None;
        }
        let all = (0, self.cells - 1);
        let mut best = None;
        let cols = self.span(center.x - radius, center.x + radius);
        self.visit(cols, all, |index, uv| axis_matches(index, uv, center, radius, &mut best));
        let rows = self.span(center.y - radius, center.y + radius);
        self.visit(all, rows, |index, uv| axis_matches(index, uv, center, radius, &mut best));
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn scattered(n: usize) -> Vec<Vec2> {
        // deterministic spread including a few out-of-square UVs
        (0..n)
            .map(|i| {
                let t = i as f32 * 0.618_034;
                Vec2::new((t.fract() * 1.2) - 0.1, ((t * 7.3).fract() * 1.2) - 0.1)
            })
            .collect()
    }

    #[test]
    fn grid_matches_linear_on_fixed_queries() {
        let uvs = scattered(500);
        let grid = UvGrid::new(&uvs);
        let linear = LinearScan::new(&uvs);
        for q in [Vec2::new(0.5, 0.5), Vec2::ZERO, Vec2::ONE, Vec2::new(0.02, 0.97)] {
            assert_eq!(grid.within(q, 0.05), linear.within(q, 0.05));
            assert_eq!(grid.nearest(q), linear.nearest(q));
            assert_eq!(grid.axis_partial(q, 0.01), linear.axis_partial(q, 0.01));
        }
    }

    #[test]
    fn non_finite_uvs_are_skipped() {
        let uvs = vec![Vec2::new(f32::NAN, 0.5), Vec2::new(0.5, 0.5)];
        let grid = UvGrid::new(&uvs);
        assert_eq!(grid.nearest(Vec2::new(0.4, 0.5)).map(|c| c.index), Some(1));
        assert_eq!(LinearScan::new(&uvs).nearest(Vec2::new(0.4, 0.5)).map(|c| c.index), Some(1));
    }

    #[test]
    fn empty_mesh_has_no_candidates() {
        let grid = UvGrid::new(&[]);
        assert!(grid.is_empty());
        assert_eq!(grid.nearest(Vec2::splat(0.5)), None);
        assert!(grid.within(Vec2::splat(0.5), 1.0).is_empty());
    }

    proptest! {
        #[test]
        fn grid_agrees_with_linear_scan(
            u in -0.2f32..1.2,
            v in -0.2f32..1.2,
            radius in 0.0f32..0.2,
            n in 1usize..300,
        ) {
            let uvs = scattered(n);
            let grid = UvGrid::new(&uvs);
            let linear = LinearScan::new(&uvs);
            let q = Vec2::new(u, v).clamp(Vec2::ZERO, Vec2::ONE);
            prop_assert_eq!(grid.within(q, radius), linear.within(q, radius));
            prop_assert_eq!(grid.nearest(q), linear.nearest(q));
            prop_assert_eq!(grid.axis_partial(q, radius), linear.axis_partial(q, radius));
        }
    }
}
