//! Vertex format and GPU buffers for the six face quads.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::face::{CUBE_FACE_COUNT, FACE_CORNER_COUNT};
use crate::scene::FaceScene;

/// Vertices uploaded per frame: four per face.
pub const SCENE_VERTEX_COUNT: usize = CUBE_FACE_COUNT * FACE_CORNER_COUNT;

/// Indices for the whole scene: two triangles per face.
pub const SCENE_INDEX_COUNT: usize = CUBE_FACE_COUNT * 6;

/// A face-quad vertex: pixel-space position plus the cube-map lookup vector.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable, PartialEq)]
pub struct FaceVertex {
    pub position: [f32; 3],
    pub env_lookup: [f32; 3],
}

impl FaceVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    /// Vertex buffer layout matching `VertexInput` in the flat-cube shader.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<FaceVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Record a copy of `contents` into the start of `destination`.
///
/// The data goes through a staging buffer and a copy command, so it lands in
/// encoder order: a pass recorded before the copy still sees the old contents.
/// `contents` must be a multiple of `COPY_BUFFER_ALIGNMENT` long.
pub fn encode_buffer_write(
    device: &wgpu::Device,
    encoder: &mut wgpu::CommandEncoder,
    destination: &wgpu::Buffer,
    contents: &[u8],
) {
    let staging = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("flat-cube-staging"),
        contents,
        usage: wgpu::BufferUsages::COPY_SRC,
    });
    encoder.copy_buffer_to_buffer(&staging, 0, destination, 0, contents.len() as u64);
}

/// Vertex and index buffers holding the whole scene.
///
/// Indices never change. Vertices are re-uploaded before each draw because
/// face positions follow the viewport size.
pub struct SceneBuffers {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl SceneBuffers {
    /// Allocate buffers sized for one [`FaceScene`].
    pub fn new(device: &wgpu::Device, label: &str) -> Self {
        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{label}-vertices")),
            size: (SCENE_VERTEX_COUNT * std::mem::size_of::<FaceVertex>()) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let indices = FaceScene::indices();
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-indices")),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
        }
    }

    /// Record an upload of the current face vertices into `encoder`.
    pub fn encode_write(
        &self,
        device: &wgpu::Device,
        encoder: &mut wgpu::CommandEncoder,
        scene: &FaceScene,
    ) {
        let vertices = scene.vertices();
        encode_buffer_write(
            device,
            encoder,
            &self.vertex_buffer,
            bytemuck::cast_slice(&vertices),
        );
    }

    /// Bind vertex and index buffers to a render pass.
    pub fn bind(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
    }

    /// Draw all six faces in one call.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}
