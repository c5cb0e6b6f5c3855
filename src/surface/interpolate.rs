// Copyright 2025 the Threadmark Authors
// SPDX-License-Identifier: Apache-2.0

//! UV -> world interpolation and its inverse.
//!
//! A UV picks up to three nearby vertices and blends their positions and
//! normals: barycentric weights for a proper triangle, a projection for two
//! vertices, and inverse-distance weights when the triangle is degenerate
//! or does not contain the sample.

use super::index::{Candidate, UvLookup};
use super::{MeshAttributes, SurfaceSample};
use crate::config::SurfaceConfig;
use glam::{Mat3, Mat4, Vec2, Vec3};

/// Cross products below this make a UV triangle degenerate
const DEGENERATE_AREA: f32 = 1e-12;

/// Barycentric weights down to this are still inside the triangle
const INSIDE_SLACK: f32 = -1e-4;

const EXACT_DISTANCE: f32 = 1e-6;

/// Sample the surface at `uv`
///
/// `lookup` must index `mesh.uvs()`.
pub fn uv_to_world(
    uv: Vec2,
    mesh: &dyn MeshAttributes,
    lookup: &impl UvLookup,
    config: &SurfaceConfig,
) -> SurfaceSample {
    let positions = mesh.positions();
    let normals = mesh.normals();
    let uvs = mesh.uvs();
    let usable = |c: &Candidate| c.index < positions.len() && c.index < uvs.len();

    let mut candidates = nearby(uv, lookup, config);
    candidates.retain(usable);
    if candidates.is_empty()
        && let Some(nearest) = lookup.nearest(uv).filter(usable)
    {
        candidates.push(nearest);
    }

    let vertex = |c: &Candidate| {
        (
            positions[c.index],
            normals.get(c.index).copied().unwrap_or(Vec3::Z),
        )
    };

    let (position, normal) = match candidates.as_slice() {
        [] => {
            tracing::warn!("no mesh vertices to sample at ({}, {})", uv.x, uv.y);
            (uv.extend(0.0), Vec3::Z)
        }
        [only] => vertex(only),
        [a, b] => {
            let (ua, ub) = (uvs[a.index], uvs[b.index]);
            let span = ub - ua;
            let len2 = span.length_squared();
            let t = if len2 > 0.0 {
                ((uv - ua).dot(span) / len2).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let (pa, na) = vertex(a);
            let (pb, nb) = vertex(b);
            (pa.lerp(pb, t), na.lerp(nb, t))
        }
        [a, b, c, ..] => {
            let weights = barycentric(uv, uvs[a.index], uvs[b.index], uvs[c.index])
                .filter(|w| w.min_element() >= INSIDE_SLACK)
                .unwrap_or_else(|| inverse_distance([a.distance, b.distance, c.distance]));
            let (pa, na) = vertex(a);
            let (pb, nb) = vertex(b);
            let (pc, nc) = vertex(c);
            (
                pa * weights.x + pb * weights.y + pc * weights.z,
                na * weights.x + nb * weights.y + nc * weights.z,
            )
        }
    };

    to_world(position, normal, mesh.world_transform(), config.surface_offset)
}

/// Up to three vertices around `uv`, widening the search like the
/// corrector does until three are found or the radius is exhausted
fn nearby(uv: Vec2, lookup: &impl UvLookup, config: &SurfaceConfig) -> Vec<Candidate> {
    let max_radius = config.max_search_radius.max(config.world_search_radius) as f32;
    let mut radius = (config.world_search_radius as f32).max(EXACT_DISTANCE);
    loop {
        let mut found = lookup.within(uv, radius);
        if found.len() >= 3 || radius >= max_radius {
            found.truncate(3);
            return found;
        }
        radius = (radius * 2.0).min(max_radius);
    }
}

/// Weights of `p` against triangle `abc`, or `None` when the triangle has
/// no area
fn barycentric(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> Option<Vec3> {
    let (ab, ac, ap) = (b - a, c - a, p - a);
    let denom = ab.perp_dot(ac);
    if denom.abs() < DEGENERATE_AREA {
        return None;
    }
    let wb = ap.perp_dot(ac) / denom;
    let wc = ab.perp_dot(ap) / denom;
    Some(Vec3::new(1.0 - wb - wc, wb, wc))
}

fn inverse_distance(distances: [f32; 3]) -> Vec3 {
    if let Some(exact) = distances.iter().position(|d| *d < EXACT_DISTANCE) {
        let mut w = Vec3::ZERO;
        w[exact] = 1.0;
        return w;
    }
    let w = Vec3::from_array(distances.map(|d| 1.0 / (d * d)));
    w / w.element_sum()
}

/// Move a local sample into world space and lift it off the surface
fn to_world(position: Vec3, normal: Vec3, transform: Mat4, offset: f32) -> SurfaceSample {
    let linear = Mat3::from_mat4(transform);
    let normal_matrix = if linear.determinant().abs() > f32::EPSILON {
        linear.inverse().transpose()
    } else {
        linear
    };
    let world_normal = unit_or_z(normal_matrix * normal);
    SurfaceSample {
        world_position: transform.transform_point3(position) + world_normal * offset,
        world_normal,
    }
}

fn unit_or_z(v: Vec3) -> Vec3 {
    let n = v.normalize_or_zero();
    if n == Vec3::ZERO { Vec3::Z } else { n }
}

/// UV at a world position: inverse-distance blend of the UVs of the three
/// vertices nearest in world space. `None` for an empty mesh or a
/// non-finite position.
pub fn world_to_uv(position: Vec3, mesh: &dyn MeshAttributes) -> Option<Vec2> {
    if !position.is_finite() {
        return None;
    }
    let transform = mesh.world_transform();
    let uvs = mesh.uvs();
    let mut nearest: Vec<Candidate> = mesh
        .positions()
        .iter()
        .take(uvs.len())
        .enumerate()
        .map(|(index, p)| Candidate {
            index,
            distance: transform.transform_point3(*p).distance(position),
        })
        .filter(|c| c.distance.is_finite())
        .collect();
    nearest.sort_by(|a, b| a.distance.total_cmp(&b.distance).then(a.index.cmp(&b.index)));
    nearest.truncate(3);

    let first = nearest.first()?;
    if first.distance < EXACT_DISTANCE {
        return Some(uvs[first.index]);
    }
    let (sum, total) = nearest.iter().fold((Vec2::ZERO, 0.0), |(sum, total), c| {
        let w = 1.0 / (c.distance * c.distance);
        (sum + uvs[c.index] * w, total + w)
    });
    Some(sum / total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::SurfaceMesh;
    use crate::surface::index::{LinearScan, UvGrid};

    fn flat_config() -> SurfaceConfig {
        SurfaceConfig {
            surface_offset: 0.0,
            ..SurfaceConfig::default()
        }
    }

    fn small_triangle() -> SurfaceMesh {
        SurfaceMesh::new(
            vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 1.0), Vec3::new(0.0, 3.0, 2.0)],
            vec![Vec2::new(0.5, 0.5), Vec2::new(0.52, 0.5), Vec2::new(0.5, 0.52)],
            vec![Vec3::Z; 3],
        )
    }

    fn close(a: Vec3, b: Vec3) -> bool {
        a.distance(b) < 1e-4
    }

    #[test]
    fn centroid_maps_to_centroid() {
        let mesh = small_triangle();
        let centroid_uv = mesh.uvs().iter().copied().sum::<Vec2>() / 3.0;
        let centroid = mesh.positions().iter().copied().sum::<Vec3>() / 3.0;
        let sample = uv_to_world(centroid_uv, &mesh, &LinearScan::new(mesh.uvs()), &flat_config());
        assert!(close(sample.world_position, centroid), "{:?}", sample.world_position);
    }

    #[test]
    fn sample_is_lifted_along_the_normal() {
        let mesh = small_triangle();
        let config = SurfaceConfig::default();
        let sample = uv_to_world(Vec2::new(0.5, 0.5), &mesh, &LinearScan::new(mesh.uvs()), &config);
        assert!(close(sample.world_position, Vec3::new(0.0, 0.0, config.surface_offset)));
        assert_eq!(sample.world_normal, Vec3::Z);
    }

    #[test]
    fn far_sample_uses_nearest_vertex() {
        let mesh = small_triangle();
        let sample = uv_to_world(Vec2::new(0.9, 0.9), &mesh, &LinearScan::new(mesh.uvs()), &flat_config());
        // (0.52, 0.5) and (0.5, 0.52) tie; the lower index wins
        assert!(close(sample.world_position, Vec3::new(2.0, 0.0, 1.0)));
    }

    #[test]
    fn two_vertices_interpolate_linearly() {
        let mesh = SurfaceMesh::new(
            vec![Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0)],
            vec![Vec2::new(0.5, 0.5), Vec2::new(0.51, 0.5)],
            Vec::new(),
        );
        let sample = uv_to_world(Vec2::new(0.5025, 0.5), &mesh, &LinearScan::new(mesh.uvs()), &flat_config());
        assert!(close(sample.world_position, Vec3::new(2.5, 0.0, 0.0)), "{:?}", sample.world_position);
    }

    #[test]
    fn degenerate_triangle_falls_back_to_distance_weights() {
        let mesh = SurfaceMesh::new(
            vec![Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0)],
            vec![Vec2::new(0.5, 0.5), Vec2::new(0.505, 0.5), Vec2::new(0.51, 0.5)],
            vec![Vec3::Z; 3],
        );
        let sample = uv_to_world(Vec2::new(0.505, 0.501), &mesh, &LinearScan::new(mesh.uvs()), &flat_config());
        assert!(sample.world_position.is_finite());
        assert!((sample.world_position.x - 1.0).abs() < 0.1);
    }

    #[test]
    fn empty_mesh_returns_the_uv_plane() {
        let mesh = SurfaceMesh::default();
        let sample = uv_to_world(Vec2::new(0.25, 0.75), &mesh, &LinearScan::new(&[]), &flat_config());
        assert!(close(sample.world_position, Vec3::new(0.25, 0.75, 0.0)));
        assert_eq!(world_to_uv(Vec3::ZERO, &mesh), None);
    }

    #[test]
    fn world_transform_moves_points_and_normals() {
        let mesh = small_triangle()
            .with_transform(Mat4::from_translation(Vec3::new(0.0, 0.0, 5.0)) * Mat4::from_rotation_x(std::f32::consts::FRAC_PI_2));
        let sample = uv_to_world(Vec2::new(0.5, 0.5), &mesh, &LinearScan::new(mesh.uvs()), &flat_config());
        assert!(close(sample.world_position, Vec3::new(0.0, 0.0, 5.0)));
        // +Z rotated a quarter turn about X points along -Y
        assert!(close(sample.world_normal, Vec3::new(0.0, -1.0, 0.0)));
    }

    #[test]
    fn grid_lookup_gives_the_same_sample() {
        let mesh = small_triangle();
        let uv = Vec2::new(0.507, 0.505);
        let a = uv_to_world(uv, &mesh, &LinearScan::new(mesh.uvs()), &flat_config());
        let b = uv_to_world(uv, &mesh, &UvGrid::new(mesh.uvs()), &flat_config());
        assert_eq!(a, b);
    }

    #[test]
    fn world_to_uv_inverts_vertices() {
        let mesh = small_triangle();
        assert_eq!(world_to_uv(Vec3::new(2.0, 0.0, 1.0), &mesh), Some(Vec2::new(0.52, 0.5)));
        let uv = world_to_uv(Vec3::new(0.01, 0.0, 0.0), &mesh).unwrap();
        assert!(uv.distance(Vec2::new(0.5, 0.5)) < 1e-3);
    }
}
