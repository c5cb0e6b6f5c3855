// Copyright 2025 the Threadmark Authors
// SPDX-License-Identifier: Apache-2.0

//! UV <-> surface coordinate mapping.
//!
//! The mesh itself belongs to the host application and is only read
//! through [`MeshAttributes`]. [`SurfaceMapper`] owns the UV index and the
//! correction cache built over it.

pub mod canvas;
pub mod correction;
pub mod index;
pub mod interpolate;

pub use canvas::{CanvasCoords, CanvasSize, canvas_to_uv, uv_to_canvas};
pub use correction::{Correction, CorrectionSource, UvCorrector};
pub use index::{LinearScan, UvGrid, UvLookup};

use crate::config::SurfaceConfig;
use glam::{Mat4, Vec2, Vec3};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Read-only vertex attributes of the target mesh
///
/// Attribute arrays are parallel; vertices past the shortest of positions
/// and UVs are ignored. Missing normals default to +Z.
pub trait MeshAttributes {
    fn positions(&self) -> &[Vec3];
    fn uvs(&self) -> &[Vec2];
    fn normals(&self) -> &[Vec3];
    fn world_transform(&self) -> Mat4 {
        Mat4::IDENTITY
    }
}

/// Owned mesh attributes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurfaceMesh {
    pub positions: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    #[serde(default)]
    pub normals: Vec<Vec3>,
    #[serde(default = "identity")]
    pub transform: Mat4,
}

fn identity() -> Mat4 {
    Mat4::IDENTITY
}

impl SurfaceMesh {
    pub fn new(positions: Vec<Vec3>, uvs: Vec<Vec2>, normals: Vec<Vec3>) -> Self {
        Self {
            positions,
            uvs,
            normals,
            transform: Mat4::IDENTITY,
        }
    }

    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.transform = transform;
        self
    }
}

impl MeshAttributes for SurfaceMesh {
    fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    fn uvs(&self) -> &[Vec2] {
        &self.uvs
    }

    fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    fn world_transform(&self) -> Mat4 {
        self.transform
    }
}

/// A point on the mesh surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSample {
    pub world_position: Vec3,
    pub world_normal: Vec3,
}

/// Mesh plus the lookup structures for mapping pointer input onto it
pub struct SurfaceMapper {
    mesh: Box<dyn MeshAttributes>,
    index: UvGrid,
    corrector: UvCorrector,
    config: SurfaceConfig,
}

impl SurfaceMapper {
    pub fn new(mesh: impl MeshAttributes + 'static, config: SurfaceConfig) -> Self {
        let (positions, uvs) = (mesh.positions().len(), mesh.uvs().len());
        if positions != uvs {
            tracing::warn!("mesh has {} positions but {} uvs; extra vertices are ignored", positions, uvs);
        }
        let index = UvGrid::new(&mesh.uvs()[..positions.min(uvs)]);
        Self {
            mesh: Box::new(mesh),
            index,
            corrector: UvCorrector::from_config(&config),
            config,
        }
    }

    pub fn mesh(&self) -> &dyn MeshAttributes {
        self.mesh.as_ref()
    }

    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    /// Swap in a new mesh; the index is rebuilt and the cache cleared
    pub fn replace_mesh(&mut self, mesh: impl MeshAttributes + 'static) {
        *self = Self::new(mesh, self.config);
    }

    /// Seam-corrected UV for a raw pointer hit. `None` for non-finite input.
    pub fn correct(&mut self, uv: Vec2, size: CanvasSize) -> Option<Correction> {
        self.corrector
            .correct(uv, size, self.mesh.uvs(), &self.index, &self.config)
    }

    pub fn uv_to_world(&self, uv: Vec2) -> SurfaceSample {
        interpolate::uv_to_world(uv, self.mesh.as_ref(), &self.index, &self.config)
    }

    pub fn world_to_uv(&self, position: Vec3) -> Option<Vec2> {
        interpolate::world_to_uv(position, self.mesh.as_ref())
    }

    /// Surface point under a canvas pixel
    pub fn canvas_to_world(&self, point: Point, size: CanvasSize) -> SurfaceSample {
        self.uv_to_world(canvas_to_uv(point, size))
    }
}

impl std::fmt::Debug for SurfaceMapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurfaceMapper")
            .field("vertices", &self.index.len())
            .field("cached", &self.corrector.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Flat unit plane of `n * n` quads lying in z = 0 with uv == xy
    fn plane(n: usize) -> SurfaceMesh {
        let mut positions = Vec::new();
        let mut uvs = Vec::new();
        for j in 0..=n {
            for i in 0..=n {
                let uv = Vec2::new(i as f32 / n as f32, j as f32 / n as f32);
                positions.push(uv.extend(0.0));
                uvs.push(uv);
            }
        }
        let normals = vec![Vec3::Z; positions.len()];
        SurfaceMesh::new(positions, uvs, normals)
    }

    #[test]
    fn plane_maps_uv_onto_itself() {
        let config = SurfaceConfig {
            surface_offset: 0.0,
            ..SurfaceConfig::default()
        };
        let mapper = SurfaceMapper::new(plane(50), config);
        let sample = mapper.uv_to_world(Vec2::new(0.2, 0.4));
        assert!(sample.world_position.distance(Vec3::new(0.2, 0.4, 0.0)) < 1e-4);
        let uv = mapper.world_to_uv(sample.world_position).unwrap();
        assert!(uv.distance(Vec2::new(0.2, 0.4)) < 1e-3);
    }

    #[test]
    fn correction_is_cached() {
        let mut mapper = SurfaceMapper::new(plane(10), SurfaceConfig::default());
        let size = CanvasSize::new(256, 256);
        let first = mapper.correct(Vec2::new(0.301, 0.5), size).unwrap();
        let again = mapper.correct(Vec2::new(0.301, 0.5), size).unwrap();
        assert_eq!(first, again);
        assert_eq!(mapper.corrector.len(), 1);
        assert_eq!(mapper.correct(Vec2::new(f32::INFINITY, 0.5), size), None);
    }

    #[test]
    fn mismatched_attributes_are_truncated() {
        let mut mesh = plane(2);
        mesh.uvs.truncate(4);
        let mapper = SurfaceMapper::new(mesh, SurfaceConfig::default());
        assert_eq!(mapper.index.len(), 4);
        assert!(mapper.uv_to_world(Vec2::splat(0.9)).world_position.is_finite());
    }
}
