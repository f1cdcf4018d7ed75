use wgpu::util::DeviceExt;
use bytemuck::{Pod, Zeroable};
use glam::Vec3;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub pos: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    pub fn new(pos: Vec3, normal: Vec3) -> Self {
        Self { pos: pos.to_array(), normal: normal.to_array() }
    }

    pub const ATTRIBUTES: [wgpu::VertexAttribute; 2] = [
        wgpu::VertexAttribute { offset: 0, shader_location: 0, format: wgpu::VertexFormat::Float32x3 },
        wgpu::VertexAttribute { offset: 12, shader_location: 1, format: wgpu::VertexFormat::Float32x3 },
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

pub struct MeshBuffer {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

/// CPU-side triangle mesh
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.indices.is_empty()
    }

    pub fn push_vertex(&mut self, pos: Vec3, normal: Vec3) -> u32 {
        self.vertices.push(Vertex::new(pos, normal));
        (self.vertices.len() - 1) as u32
    }

    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Flat-shaded triangle: three fresh vertices sharing the face normal
    pub fn push_flat_triangle(&mut self, a: Vec3, b: Vec3, c: Vec3) {
        let normal = (b - a).cross(c - a).normalize_or_zero();
        let ia = self.push_vertex(a, normal);
        let ib = self.push_vertex(b, normal);
        let ic = self.push_vertex(c, normal);
        self.push_triangle(ia, ib, ic);
    }

    /// Quad from four corners in counter-clockwise order, as two triangles
    pub fn push_quad(&mut self, corners: [Vec3; 4], normal: Vec3) {
        let base = self.vertices.len() as u32;
        for c in corners {
            self.push_vertex(c, normal);
        }
        self.push_triangle(base, base + 1, base + 2);
        self.push_triangle(base, base + 2, base + 3);
    }

    /// Axis-aligned bounds as (min, max); both zero for an empty mesh
    pub fn bounds(&self) -> (Vec3, Vec3) {
        let mut iter = self.vertices.iter().map(|v| Vec3::from_array(v.pos));
        let Some(first) = iter.next() else {
            return (Vec3::ZERO, Vec3::ZERO);
        };
        iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p)))
    }

    /// Shift every vertex so the bounding box is centred on the origin
    pub fn center(&mut self) {
        let (min, max) = self.bounds();
        let offset = (min + max) * 0.5;
        for v in self.vertices.iter_mut() {
            v.pos = (Vec3::from_array(v.pos) - offset).to_array();
        }
    }

    pub fn upload(&self, device: &wgpu::Device) -> MeshBuffer {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Vertex Buffer"),
            contents: bytemuck::cast_slice(&self.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Index Buffer"),
            contents: bytemuck::cast_slice(&self.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        MeshBuffer {
            vertex_buffer,
            index_buffer,
            index_count: self.indices.len() as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_moves_bounds_to_origin() {
        let mut mesh = Mesh::empty();
        mesh.push_flat_triangle(Vec3::new(1.0, 1.0, 1.0), Vec3::new(3.0, 1.0, 1.0), Vec3::new(1.0, 5.0, 2.0));
        mesh.center();
        let (min, max) = mesh.bounds();
        assert!((min + max).length() < 1e-6);
        assert!((max - min - Vec3::new(2.0, 4.0, 1.0)).length() < 1e-6);
    }

    #[test]
    fn test_flat_triangle_normal() {
        let mut mesh = Mesh::empty();
        mesh.push_flat_triangle(Vec3::ZERO, Vec3::X, Vec3::Y);
        assert_eq!(mesh.indices, vec![0, 1, 2]);
        for v in &mesh.vertices {
            assert_eq!(v.normal, [0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn test_empty_bounds() {
        assert!(Mesh::empty().is_empty());
        assert_eq!(Mesh::empty().bounds(), (Vec3::ZERO, Vec3::ZERO));
    }
}
