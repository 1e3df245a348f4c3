//! CPU-side procedural geometry.
//!
//! Celestial bodies are UV spheres sampled over latitude/longitude angles;
//! the skybox is a fixed cube. Geometry is generated on the CPU so it can be
//! inspected and tested without a GPU, then uploaded once via
//! [`SphereGeometry::upload`].

use crate::gpu::GpuContext;
use crate::mesh::{Mesh, Vertex3d};

/// Number of vertices in the skybox cube (6 faces × 2 triangles × 3 vertices).
pub const SKYBOX_VERTEX_COUNT: usize = 36;

/// A UV-sphere mesh generated from latitude/longitude samples.
///
/// For resolution `n` the sphere has `(n + 1)²` vertices and `2n²` triangles.
/// The polar angle φ spans [0, π] and the azimuthal angle θ spans [0, 2π],
/// each over `n + 1` steps; the seam column and the pole rings duplicate
/// positions so the equirectangular UV mapping stays continuous.
#[derive(Clone, Debug)]
pub struct SphereGeometry {
    /// Vertex positions, normals, and UVs.
    pub vertices: Vec<Vertex3d>,
    /// Triangle indices, counter-clockwise when viewed from outside.
    pub indices: Vec<u32>,
}

impl SphereGeometry {
    /// Generates a sphere of the given radius centered at the origin.
    ///
    /// Each vertex position is `(r·sinφ·cosθ, r·cosφ, r·sinφ·sinθ)`; the
    /// outward normal shares that direction. UVs map linearly to
    /// `(θ/2π, φ/π)`.
    pub fn generate(radius: f32, resolution: u32) -> Self {
        let n = resolution.max(1);
        let mut vertices = Vec::with_capacity(((n + 1) * (n + 1)) as usize);
        let mut indices = Vec::with_capacity((n * n * 6) as usize);

        for i in 0..=n {
            let phi = std::f32::consts::PI * i as f32 / n as f32;
            let y = phi.cos();
            let ring_radius = phi.sin();

            for j in 0..=n {
                let theta = 2.0 * std::f32::consts::PI * j as f32 / n as f32;
                let x = ring_radius * theta.cos();
                let z = ring_radius * theta.sin();

                let position = [radius * x, radius * y, radius * z];
                let normal = [x, y, z];
                let uv = [j as f32 / n as f32, i as f32 / n as f32];

                vertices.push(Vertex3d::new(position, normal, uv));
            }
        }

        for i in 0..n {
            for j in 0..n {
                let p1 = i * (n + 1) + j;
                let p2 = p1 + 1;
                let p3 = (i + 1) * (n + 1) + j;
                let p4 = p3 + 1;

                indices.extend_from_slice(&[p1, p2, p3]);
                indices.extend_from_slice(&[p2, p4, p3]);
            }
        }

        Self { vertices, indices }
    }

    /// Number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Uploads this geometry to the GPU as a [`Mesh`].
    pub fn upload(&self, gpu: &GpuContext) -> Mesh {
        Mesh::new(gpu, &self.vertices, &self.indices)
    }
}

/// Positions for the skybox cube: 36 vertices spanning ±1 on all axes,
/// listed as triangles and visible from the inside.
///
/// The cube is sampled by direction in the skybox shader, so positions
/// double as cubemap lookup vectors; no normals or UVs are needed.
pub fn skybox_cube_positions() -> [[f32; 3]; SKYBOX_VERTEX_COUNT] {
    [
        // -Z face
        [-1.0, 1.0, -1.0],
        [-1.0, -1.0, -1.0],
        [1.0, -1.0, -1.0],
        [1.0, -1.0, -1.0],
        [1.0, 1.0, -1.0],
        [-1.0, 1.0, -1.0],
        // -X face
        [-1.0, -1.0, 1.0],
        [-1.0, -1.0, -1.0],
        [-1.0, 1.0, -1.0],
        [-1.0, 1.0, -1.0],
        [-1.0, 1.0, 1.0],
        [-1.0, -1.0, 1.0],
        // +X face
        [1.0, -1.0, -1.0],
        [1.0, -1.0, 1.0],
        [1.0, 1.0, 1.0],
        [1.0, 1.0, 1.0],
        [1.0, 1.0, -1.0],
        [1.0, -1.0, -1.0],
        // +Z face
        [-1.0, -1.0, 1.0],
        [-1.0, 1.0, 1.0],
        [1.0, 1.0, 1.0],
        [1.0, 1.0, 1.0],
        [1.0, -1.0, 1.0],
        [-1.0, -1.0, 1.0],
        // +Y face
        [-1.0, 1.0, -1.0],
        [1.0, 1.0, -1.0],
        [1.0, 1.0, 1.0],
        [1.0, 1.0, 1.0],
        [-1.0, 1.0, 1.0],
        [-1.0, 1.0, -1.0],
        // -Y face
        [-1.0, -1.0, -1.0],
        [-1.0, -1.0, 1.0],
        [1.0, -1.0, -1.0],
        [1.0, -1.0, -1.0],
        [-1.0, -1.0, 1.0],
        [1.0, -1.0, 1.0],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn sphere_vertex_and_triangle_counts() {
        for n in [1u32, 4, 16, 100] {
            let sphere = SphereGeometry::generate(1.0, n);
            let expected_vertices = ((n + 1) * (n + 1)) as usize;
            assert_eq!(sphere.vertices.len(), expected_vertices, "n = {n}");
            assert_eq!(sphere.triangle_count(), (2 * n * n) as usize, "n = {n}");
        }
    }

    #[test]
    fn sphere_vertices_lie_on_the_sphere() {
        let radius = 3.5;
        let sphere = SphereGeometry::generate(radius, 24);
        for v in &sphere.vertices {
            let distance = Vec3::from(v.position).length();
            assert!(
                (distance - radius).abs() < 1e-4,
                "vertex at distance {distance}"
            );
        }
    }

    #[test]
    fn sphere_normals_are_unit_and_radial() {
        let sphere = SphereGeometry::generate(2.0, 12);
        for v in &sphere.vertices {
            let normal = Vec3::from(v.normal);
            let position = Vec3::from(v.position);
            assert!((normal.length() - 1.0).abs() < 1e-4 || position.length() < 1e-6);
            // Normal and position point the same way on a sphere at the origin.
            assert!(position.cross(normal).length() < 1e-4);
        }
    }

    #[test]
    fn sphere_uvs_stay_in_unit_range() {
        let sphere = SphereGeometry::generate(1.0, 10);
        for v in &sphere.vertices {
            assert!((0.0..=1.0).contains(&v.uv[0]));
            assert!((0.0..=1.0).contains(&v.uv[1]));
        }
    }

    #[test]
    fn sphere_indices_are_in_bounds() {
        let sphere = SphereGeometry::generate(1.0, 8);
        let vertex_count = sphere.vertices.len() as u32;
        assert_eq!(sphere.indices.len() % 3, 0);
        for &i in &sphere.indices {
            assert!(i < vertex_count);
        }
    }

    #[test]
    fn sphere_triangles_wind_outward() {
        let sphere = SphereGeometry::generate(1.0, 8);
        for tri in sphere.indices.chunks(3) {
            let a = Vec3::from(sphere.vertices[tri[0] as usize].position);
            let b = Vec3::from(sphere.vertices[tri[1] as usize].position);
            let c = Vec3::from(sphere.vertices[tri[2] as usize].position);
            let face_normal = (b - a).cross(c - a);
            // Degenerate pole triangles have zero area; skip them.
            if face_normal.length() < 1e-6 {
                continue;
            }
            let centroid = (a + b + c) / 3.0;
            assert!(
                face_normal.dot(centroid) > 0.0,
                "inward-facing triangle {tri:?}"
            );
        }
    }

    #[test]
    fn skybox_cube_has_36_corner_vertices() {
        let positions = skybox_cube_positions();
        assert_eq!(positions.len(), SKYBOX_VERTEX_COUNT);
        for p in positions {
            assert_eq!(Vec3::from(p).abs(), Vec3::ONE);
        }
    }
}
