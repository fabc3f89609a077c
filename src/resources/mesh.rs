use std::f32::consts::PI;

use crate::data_structures::model::{MeshData, ModelVertex};

/// Parameters of a UV sphere centered at the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SphereGeometry {
    pub radius: f32,
    pub width_segments: u32,
    pub height_segments: u32,
}

impl SphereGeometry {
    pub fn new(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        Self {
            radius,
            // Fewer segments than this cannot close the sphere
            width_segments: width_segments.max(3),
            height_segments: height_segments.max(2),
        }
    }

    pub fn vertex_count(&self) -> usize {
        (self.width_segments as usize + 1) * (self.height_segments as usize + 1)
    }

    /// Each row of quads yields two triangles, except the first and last rows
    /// where one of them collapses into the pole.
    pub fn index_count(&self) -> usize {
        6 * self.width_segments as usize * (self.height_segments as usize - 1)
    }

    /**
     * Tessellate the sphere.
     *
     * Vertex rows run from the north pole (v = 0) to the south pole (v = 1) and
     * columns wrap once around the Y axis with u = 0 on -X. Seam vertices are
     * duplicated so the texture wraps without a jump. Pole rows are shifted by
     * half a segment in u so every pole triangle samples the middle of its column.
     *
     * Tangents follow +u. Bitangents point toward the north pole, i.e. toward the
     * top of the image, so tangent × bitangent = normal for green-up normal maps.
     */
    pub fn tessellate(&self) -> MeshData {
        let w = self.width_segments;
        let h = self.height_segments;
        let mut vertices = Vec::with_capacity(self.vertex_count());
        let mut grid = Vec::with_capacity(h as usize + 1);

        for iy in 0..=h {
            let v = iy as f32 / h as f32;
            let u_offset = if iy == 0 {
                0.5 / w as f32
            } else if iy == h {
                -0.5 / w as f32
            } else {
                0.0
            };
            let theta = v * PI;
            let (sin_theta, cos_theta) = theta.sin_cos();

            let mut row = Vec::with_capacity(w as usize + 1);
            for ix in 0..=w {
                let u = ix as f32 / w as f32;
                let phi = u * 2.0 * PI;
                let (sin_phi, cos_phi) = phi.sin_cos();

                let normal = [-cos_phi * sin_theta, cos_theta, sin_phi * sin_theta];
                let position = normal.map(|n| n * self.radius);

                row.push(vertices.len() as u32);
                vertices.push(ModelVertex {
                    position,
                    tex_coords: [u + u_offset, v],
                    normal,
                    tangent: [sin_phi, 0.0, cos_phi],
                    bitangent: [cos_phi * cos_theta, sin_theta, -sin_phi * cos_theta],
                });
            }
            grid.push(row);
        }

        let mut indices = Vec::with_capacity(self.index_count());
        for iy in 0..h as usize {
            for ix in 0..w as usize {
                let a = grid[iy][ix + 1];
                let b = grid[iy][ix];
                let c = grid[iy + 1][ix];
                let d = grid[iy + 1][ix + 1];

                if iy != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != h as usize - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        MeshData { vertices, indices }
    }
}
