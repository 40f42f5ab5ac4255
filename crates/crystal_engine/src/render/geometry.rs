//! Crystal mesh generation
//!
//! The crystal is a subdivided icosahedron projected onto a sphere. Triangles
//! are emitted unindexed (three vertices each) so every face can carry its own
//! seam-corrected texture coordinates.

use bytemuck::{Pod, Zeroable};

use crate::foundation::math::{constants, Vec2, Vec3};

/// Vertex layout of the crystal mesh (locations 0, 1, 2 in `crystal.vert`)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Object-space position
    pub position: [f32; 3],
    /// Unit normal
    pub normal: [f32; 3],
    /// Spherical texture coordinate
    pub uv: [f32; 2],
}

impl Vertex {
    /// Position as a vector
    pub fn position(&self) -> Vec3 {
        Vec3::from(self.position)
    }

    /// Normal as a vector
    pub fn normal(&self) -> Vec3 {
        Vec3::from(self.normal)
    }

    /// Texture coordinate as a vector
    pub fn uv(&self) -> Vec2 {
        Vec2::from(self.uv)
    }
}

/// Unindexed triangle mesh
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    /// Vertices, three per triangle
    pub vertices: Vec<Vertex>,
}

impl Mesh {
    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Raw bytes for a vertex buffer upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

const ICOSAHEDRON_FACES: [[usize; 3]; 20] = [
    [0, 11, 5], [0, 5, 1], [0, 1, 7], [0, 7, 10], [0, 10, 11],
    [1, 5, 9], [5, 11, 4], [11, 10, 2], [10, 7, 6], [7, 1, 8],
    [3, 9, 4], [3, 4, 2], [3, 2, 6], [3, 6, 8], [3, 8, 9],
    [4, 9, 5], [2, 4, 11], [6, 2, 10], [8, 6, 7], [9, 8, 1],
];

fn icosahedron_corners() -> [Vec3; 12] {
    let t = (1.0 + 5.0_f32.sqrt()) / 2.0;
    [
        Vec3::new(-1.0, t, 0.0), Vec3::new(1.0, t, 0.0),
        Vec3::new(-1.0, -t, 0.0), Vec3::new(1.0, -t, 0.0),
        Vec3::new(0.0, -1.0, t), Vec3::new(0.0, 1.0, t),
        Vec3::new(0.0, -1.0, -t), Vec3::new(0.0, 1.0, -t),
        Vec3::new(t, 0.0, -1.0), Vec3::new(t, 0.0, 1.0),
        Vec3::new(-t, 0.0, -1.0), Vec3::new(-t, 0.0, 1.0),
    ]
}

/// Build an icosphere of `radius` with every icosahedron edge split into
/// `detail + 1` segments
///
/// `detail = 0` is the plain icosahedron (20 triangles); in general the mesh
/// has `20 * (detail + 1)^2` triangles.
pub fn icosphere(radius: f32, detail: u32) -> Mesh {
    let corners = icosahedron_corners();
    let cols = detail as usize + 1;
    let mut positions = Vec::with_capacity(20 * cols * cols * 3);

    for face in ICOSAHEDRON_FACES {
        subdivide_face(corners[face[0]], corners[face[1]], corners[face[2]], cols, &mut positions);
    }

    let mut vertices: Vec<Vertex> = positions
        .iter()
        .map(|p| {
            let normal = p.normalize();
            Vertex {
                position: (normal * radius).into(),
                normal: normal.into(),
                uv: spherical_uv(normal).into(),
            }
        })
        .collect();

    for triangle in vertices.chunks_mut(3) {
        correct_seam(triangle);
    }

    log::debug!("Built icosphere: radius {}, detail {}, {} triangles", radius, detail, vertices.len() / 3);
    Mesh { vertices }
}

fn subdivide_face(a: Vec3, b: Vec3, c: Vec3, cols: usize, out: &mut Vec<Vec3>) {
    // rows[i] walks from the a-c edge to the b-c edge
    let mut rows: Vec<Vec<Vec3>> = Vec::with_capacity(cols + 1);
    for i in 0..=cols {
        let t = i as f32 / cols as f32;
        let aj = a.lerp(&c, t);
        let bj = b.lerp(&c, t);
        let segments = cols - i;

        let row = (0..=segments)
            .map(|j| {
                if segments == 0 {
                    aj
                } else {
                    aj.lerp(&bj, j as f32 / segments as f32)
                }
            })
            .collect();
        rows.push(row);
    }

    for i in 0..cols {
        for j in 0..(2 * (cols - i) - 1) {
            let k = j / 2;
            if j % 2 == 0 {
                out.extend_from_slice(&[rows[i][k + 1], rows[i + 1][k], rows[i][k]]);
            } else {
                out.extend_from_slice(&[rows[i][k + 1], rows[i + 1][k + 1], rows[i + 1][k]]);
            }
        }
    }
}

fn spherical_uv(direction: Vec3) -> Vec2 {
    let azimuth = direction.z.atan2(-direction.x);
    let inclination = (-direction.y).atan2(direction.x.hypot(direction.z));
    Vec2::new(azimuth / constants::TAU + 0.5, 1.0 - (inclination / constants::PI + 0.5))
}

/// Pull triangles that straddle the u = 0/1 seam back onto one side
fn correct_seam(triangle: &mut [Vertex]) {
    let (min, max) = triangle
        .iter()
        .fold((f32::MAX, f32::MIN), |(lo, hi), v| (lo.min(v.uv[0]), hi.max(v.uv[0])));

    if max > 0.9 && min < 0.1 {
        for vertex in triangle.iter_mut() {
            if vertex.uv[0] < 0.2 {
                vertex.uv[0] += 1.0;
            }
        }
    }
}
