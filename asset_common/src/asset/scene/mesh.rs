use std::f32::consts::PI;

use ultraviolet::Vec3;

use crate::gpu::{SkinVertex, Vertex};

#[derive(Clone, Debug, Default)]
pub struct LoadedMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    /// Present when the primitive is bound to a skeleton. Same length as `vertices`.
    pub skin: Option<Vec<SkinVertex>>,
}

impl LoadedMesh {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// A UV sphere with counter-clockwise triangles and normals facing outwards.
    /// The vertex layout matches the usual latitude/longitude grid, so the
    /// texture seam sits on the negative x axis.
    pub fn new_uv_sphere(radius: f32, width_segments: u32, height_segments: u32) -> LoadedMesh {
        let width_segments = width_segments.max(3);
        let height_segments = height_segments.max(2);

        let mut vertices = Vec::with_capacity(
            ((width_segments + 1) * (height_segments + 1)) as usize,
        );
        for iy in 0..=height_segments {
            let v = iy as f32 / height_segments as f32;
            let theta = v * PI;
            for ix in 0..=width_segments {
                let u = ix as f32 / width_segments as f32;
                let phi = u * 2.0 * PI;

                let direction = Vec3::new(
                    -phi.cos() * theta.sin(),
                    theta.cos(),
                    phi.sin() * theta.sin(),
                );
                let tangent = Vec3::new(phi.sin(), 0.0, phi.cos());

                vertices.push(Vertex {
                    position: (direction * radius).into(),
                    normal: direction.into(),
                    uv: [u, 1.0 - v],
                    tangent: [tangent.x, tangent.y, tangent.z, 1.0],
                });
            }
        }

        let row = width_segments + 1;
        let mut indices = Vec::new();
        for iy in 0..height_segments {
            for ix in 0..width_segments {
                let a = iy * row + ix + 1;
                let b = iy * row + ix;
                let c = (iy + 1) * row + ix;
                let d = (iy + 1) * row + ix + 1;

                // The poles collapse one of the two triangles of the quad
                if iy != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != height_segments - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        LoadedMesh {
            vertices,
            indices,
            skin: None,
        }
    }

    /// Turns the mesh inside out: reverses the triangle winding and flips the normals,
    /// so that the faces are visible from the inside.
    pub fn inverted(mut self) -> LoadedMesh {
        for triangle in self.indices.chunks_exact_mut(3) {
            triangle.swap(1, 2);
        }
        for vertex in self.vertices.iter_mut() {
            vertex.normal = vertex.normal.map(|value| -value);
        }
        self
    }

    /// The geometric normal of a triangle, derived from its winding.
    pub fn face_normal(&self, triangle: usize) -> Vec3 {
        let corner = |i: usize| Vec3::from(self.vertices[self.indices[triangle * 3 + i] as usize].position);
        let (a, b, c) = (corner(0), corner(1), corner(2));
        (b - a).cross(c - a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn centroid(mesh: &LoadedMesh, triangle: usize) -> Vec3 {
        (0..3)
            .map(|i| Vec3::from(mesh.vertices[mesh.indices[triangle * 3 + i] as usize].position))
            .fold(Vec3::zero(), |sum, p| sum + p)
            / 3.0
    }

    #[test]
    fn sphere_faces_outwards() {
        let mesh = LoadedMesh::new_uv_sphere(100.0, 32, 32);
        assert_eq!(mesh.vertices.len(), 33 * 33);
        // Each row contributes two triangles per segment, except the pole rows
        assert_eq!(mesh.triangle_count(), 32 * 32 * 2 - 2 * 32);

        for triangle in 0..mesh.triangle_count() {
            assert!(mesh.face_normal(triangle).dot(centroid(&mesh, triangle)) > 0.0);
        }
        for vertex in &mesh.vertices {
            let position = Vec3::from(vertex.position);
            assert!((position.mag() - 100.0).abs() < 1e-3);
            assert!(Vec3::from(vertex.normal).dot(position) > 0.0);
        }
    }

    #[test]
    fn inverted_sphere_faces_inwards() {
        let mesh = LoadedMesh::new_uv_sphere(100.0, 32, 32).inverted();

        for triangle in 0..mesh.triangle_count() {
            assert!(mesh.face_normal(triangle).dot(centroid(&mesh, triangle)) < 0.0);
        }
        for vertex in &mesh.vertices {
            assert!(Vec3::from(vertex.normal).dot(Vec3::from(vertex.position)) < 0.0);
        }
    }
}
