use std::f32::consts::{FRAC_PI_2, TAU};

use glam::Vec3;

use crate::utils::Mesh;

pub const CAPSULE_RADIUS: f32 = 0.4;
pub const CAPSULE_LENGTH: f32 = 0.4;
pub const CAPSULE_CAP_SEGMENTS: u32 = 4;
pub const CAPSULE_RADIAL_SEGMENTS: u32 = 8;
pub const RING_INNER_RADIUS: f32 = 0.5;
pub const RING_OUTER_RADIUS: f32 = 1.0;
pub const RING_SEGMENTS: u32 = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Octahedron,
    Capsule,
    Icosahedron,
    Ring,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 4] = [
        ShapeKind::Octahedron,
        ShapeKind::Capsule,
        ShapeKind::Icosahedron,
        ShapeKind::Ring,
    ];

    pub fn index(self) -> usize {
        match self {
            ShapeKind::Octahedron => 0,
            ShapeKind::Capsule => 1,
            ShapeKind::Icosahedron => 2,
            ShapeKind::Ring => 3,
        }
    }

    pub fn mesh(self) -> Mesh {
        match self {
            ShapeKind::Octahedron => octahedron(1.0),
            ShapeKind::Capsule => capsule(
                CAPSULE_RADIUS,
                CAPSULE_LENGTH,
                CAPSULE_CAP_SEGMENTS,
                CAPSULE_RADIAL_SEGMENTS,
            ),
            ShapeKind::Icosahedron => icosahedron(1.0),
            ShapeKind::Ring => ring(RING_INNER_RADIUS, RING_OUTER_RADIUS, RING_SEGMENTS),
        }
    }
}

/// Background slots indexed by `lucky_number - 1`; the duplicates skew the
/// distribution towards octahedra and capsules.
pub const BACKGROUND_SHAPES: [ShapeKind; 6] = [
    ShapeKind::Octahedron,
    ShapeKind::Octahedron,
    ShapeKind::Capsule,
    ShapeKind::Capsule,
    ShapeKind::Icosahedron,
    ShapeKind::Ring,
];

fn polyhedron(vertices: &[Vec3], indices: &[[usize; 3]], radius: f32) -> Mesh {
    let mut mesh = Mesh::empty();
    for [a, b, c] in indices {
        mesh.push_flat_triangle(
            vertices[*a].normalize() * radius,
            vertices[*b].normalize() * radius,
            vertices[*c].normalize() * radius,
        );
    }
    mesh
}

pub fn octahedron(radius: f32) -> Mesh {
    let vertices = [
        Vec3::X, Vec3::NEG_X,
        Vec3::Y, Vec3::NEG_Y,
        Vec3::Z, Vec3::NEG_Z,
    ];
    let indices = [
        [0, 2, 4], [0, 4, 3], [0, 3, 5], [0, 5, 2],
        [1, 2, 5], [1, 5, 3], [1, 3, 4], [1, 4, 2],
    ];
    polyhedron(&vertices, &indices, radius)
}

pub fn icosahedron(radius: f32) -> Mesh {
    let t = (1.0 + 5f32.sqrt()) / 2.0;
    let vertices = [
        Vec3::new(-1.0, t, 0.0), Vec3::new(1.0, t, 0.0),
        Vec3::new(-1.0, -t, 0.0), Vec3::new(1.0, -t, 0.0),
        Vec3::new(0.0, -1.0, t), Vec3::new(0.0, 1.0, t),
        Vec3::new(0.0, -1.0, -t), Vec3::new(0.0, 1.0, -t),
        Vec3::new(t, 0.0, -1.0), Vec3::new(t, 0.0, 1.0),
        Vec3::new(-t, 0.0, -1.0), Vec3::new(-t, 0.0, 1.0),
    ];
    let indices = [
        [0, 11, 5], [0, 5, 1], [0, 1, 7], [0, 7, 10], [0, 10, 11],
        [1, 5, 9], [5, 11, 4], [11, 10, 2], [10, 7, 6], [7, 1, 8],
        [3, 9, 4], [3, 4, 2], [3, 2, 6], [3, 6, 8], [3, 8, 9],
        [4, 9, 5], [2, 4, 11], [6, 2, 10], [8, 6, 7], [9, 8, 1],
    ];
    polyhedron(&vertices, &indices, radius)
}

/// Flat annulus in the XY plane facing +Z
pub fn ring(inner: f32, outer: f32, segments: u32) -> Mesh {
    let mut mesh = Mesh::empty();
    for k in 0..=segments {
        let theta = TAU * k as f32 / segments as f32;
        let dir = Vec3::new(theta.cos(), theta.sin(), 0.0);
        mesh.push_vertex(dir * inner, Vec3::Z);
        mesh.push_vertex(dir * outer, Vec3::Z);
    }
    for k in 0..segments {
        let inner_a = 2 * k;
        let outer_a = inner_a + 1;
        let inner_b = inner_a + 2;
        let outer_b = inner_a + 3;
        mesh.push_triangle(inner_a, outer_a, outer_b);
        mesh.push_triangle(inner_a, outer_b, inner_b);
    }
    mesh
}

/// Capsule along Y: a cylinder of `length` capped by two hemispheres of `radius`
pub fn capsule(radius: f32, length: f32, cap_segments: u32, radial_segments: u32) -> Mesh {
    let half = length / 2.0;

    // (radius, height, normal_r, normal_y) from the bottom pole to the top pole
    let mut profile = Vec::new();
    for i in 0..=cap_segments {
        let a = -FRAC_PI_2 + FRAC_PI_2 * i as f32 / cap_segments as f32;
        profile.push((radius * a.cos(), -half + radius * a.sin(), a.cos(), a.sin()));
    }
    for i in 0..=cap_segments {
        let a = FRAC_PI_2 * i as f32 / cap_segments as f32;
        profile.push((radius * a.cos(), half + radius * a.sin(), a.cos(), a.sin()));
    }

    let mut mesh = Mesh::empty();
    let columns = radial_segments + 1;
    for &(r, y, nr, ny) in &profile {
        for k in 0..columns {
            let theta = TAU * k as f32 / radial_segments as f32;
            let (s, c) = theta.sin_cos();
            mesh.push_vertex(
                Vec3::new(r * c, y, -r * s),
                Vec3::new(nr * c, ny, -nr * s).normalize(),
            );
        }
    }
    for row in 0..(profile.len() as u32 - 1) {
        for k in 0..radial_segments {
            let a = row * columns + k;
            let b = a + 1;
            let d = a + columns;
            let c = d + 1;
            mesh.push_triangle(a, b, c);
            mesh.push_triangle(a, c, d);
        }
    }
    mesh
}

/// Axis-aligned plane in XY facing +Z
pub fn plane(width: f32, height: f32) -> Mesh {
    let (hw, hh) = (width / 2.0, height / 2.0);
    let mut mesh = Mesh::empty();
    mesh.push_quad(
        [
            Vec3::new(-hw, -hh, 0.0),
            Vec3::new(hw, -hh, 0.0),
            Vec3::new(hw, hh, 0.0),
            Vec3::new(-hw, hh, 0.0),
        ],
        Vec3::Z,
    );
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_well_formed(mesh: &Mesh) {
        assert!(!mesh.is_empty());
        assert_eq!(mesh.indices.len() % 3, 0);
        for &i in &mesh.indices {
            assert!((i as usize) < mesh.vertices.len());
        }
        for v in &mesh.vertices {
            let n = Vec3::from_array(v.normal).length();
            assert!((n - 1.0).abs() < 1e-4, "normal not unit: {n}");
        }
    }

    fn assert_faces_point_outward(mesh: &Mesh) {
        for tri in mesh.indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| Vec3::from_array(mesh.vertices[i as usize].pos));
            let centroid = (a + b + c) / 3.0;
            let normal = (b - a).cross(c - a);
            assert!(normal.dot(centroid) > 0.0, "inward face at {centroid:?}");
        }
    }

    #[test]
    fn test_all_shapes_well_formed() {
        for kind in ShapeKind::ALL {
            assert_well_formed(&kind.mesh());
        }
        assert_well_formed(&plane(6.0, 6.0));
    }

    #[test]
    fn test_polyhedra_wind_outward() {
        let octa = octahedron(1.0);
        assert_eq!(octa.indices.len(), 8 * 3);
        assert_faces_point_outward(&octa);

        let ico = icosahedron(1.0);
        assert_eq!(ico.indices.len(), 20 * 3);
        assert_faces_point_outward(&ico);
    }

    #[test]
    fn test_capsule_extent() {
        let mesh = capsule(0.4, 0.4, 4, 8);
        let (min, max) = mesh.bounds();
        assert!((max.y - 0.6).abs() < 1e-5);
        assert!((min.y + 0.6).abs() < 1e-5);
        assert!(max.x <= 0.4 + 1e-5);
    }

    #[test]
    fn test_ring_faces_forward() {
        let mesh = ring(0.5, 1.0, 32);
        assert_eq!(mesh.indices.len(), 32 * 6);
        for tri in mesh.indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| Vec3::from_array(mesh.vertices[i as usize].pos));
            assert!((b - a).cross(c - a).z > 0.0);
        }
    }

    #[test]
    fn test_background_slots() {
        assert_eq!(BACKGROUND_SHAPES.len(), 6);
        assert_eq!(BACKGROUND_SHAPES[5], ShapeKind::Ring);
        assert_eq!(BACKGROUND_SHAPES.iter().filter(|k| **k == ShapeKind::Capsule).count(), 2);
    }
}
