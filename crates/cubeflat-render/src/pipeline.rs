//! Render pipeline sampling a cube map along interpolated lookup vectors.

use std::num::NonZeroU64;

use crate::buffer::FaceVertex;
use crate::cubemap::CubeMapTexture;

/// The WGSL source of the flat-cube program.
///
/// Each vertex carries a cube-map lookup vector that is interpolated across
/// the quad; the fragment stage samples the cube map along it.
pub const FLAT_CUBE_SHADER_SOURCE: &str = r#"
struct CameraUniform {
    view_proj: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> camera: CameraUniform;

@group(1) @binding(0)
var env_map: texture_cube<f32>;
@group(1) @binding(1)
var env_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) env_lookup: vec3<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) env_lookup: vec3<f32>,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = camera.view_proj * vec4<f32>(in.position, 1.0);
    out.env_lookup = in.env_lookup;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return textureSample(env_map, env_sampler, in.env_lookup);
}
"#;

/// Compiled flat-cube program plus its bind group layouts.
pub struct FlatCubePipeline {
    pub pipeline: wgpu::RenderPipeline,
    /// Group 0: camera uniform.
    pub camera_bind_group_layout: wgpu::BindGroupLayout,
    /// Group 1: cube texture + sampler.
    pub env_map_bind_group_layout: wgpu::BindGroupLayout,
    /// Colour format the pipeline writes.
    pub target_format: wgpu::TextureFormat,
}

impl FlatCubePipeline {
    /// Compile the program for targets of `target_format`.
    pub fn new(device: &wgpu::Device, target_format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("flat-cube-shader"),
            source: wgpu::ShaderSource::Wgsl(FLAT_CUBE_SHADER_SOURCE.into()),
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("flat-cube-camera-bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: NonZeroU64::new(64), // mat4x4<f32>
                    },
                    count: None,
                }],
            });

        let env_map_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("flat-cube-env-map-bgl"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::Cube,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("flat-cube-pipeline-layout"),
            bind_group_layouts: &[&camera_bind_group_layout, &env_map_bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("flat-cube-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[FaceVertex::layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None, // degenerate sizes may flip the quads
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: None, // overlay, drawn on top of whatever is there
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        log::info!("Flat cube pipeline created for {target_format:?}");

        Self {
            pipeline,
            camera_bind_group_layout,
            env_map_bind_group_layout,
            target_format,
        }
    }
}

/// A cube map bound for sampling by a [`FlatCubePipeline`].
pub struct CubeMapBinding {
    pub bind_group: wgpu::BindGroup,
}

impl CubeMapBinding {
    /// Bind the cube view and sampler of `cube_map` against the pipeline's group 1 layout.
    pub fn new(
        device: &wgpu::Device,
        pipeline: &FlatCubePipeline,
        cube_map: &CubeMapTexture,
    ) -> Self {
        Self::from_view(device, pipeline, &cube_map.cube_view, &cube_map.sampler)
    }

    /// Bind an arbitrary cube view, e.g. one owned by another renderer.
    pub fn from_view(
        device: &wgpu::Device,
        pipeline: &FlatCubePipeline,
        cube_view: &wgpu::TextureView,
        sampler: &wgpu::Sampler,
    ) -> Self {
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("flat-cube-env-map-bg"),
            layout: &pipeline.env_map_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(cube_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });
        Self { bind_group }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::HeadlessContext;

    #[test]
    fn test_shader_entry_points() {
        assert!(FLAT_CUBE_SHADER_SOURCE.contains("fn vs_main"));
        assert!(FLAT_CUBE_SHADER_SOURCE.contains("fn fs_main"));
        assert!(FLAT_CUBE_SHADER_SOURCE.contains("texture_cube<f32>"));
    }

    #[test]
    fn test_shader_validates() {
        let module = naga::front::wgsl::parse_str(FLAT_CUBE_SHADER_SOURCE)
            .expect("flat cube shader should parse");
        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        );
        assert!(validator.validate(&module).is_ok());
    }

    #[test]
    fn test_pipeline_creation_succeeds() {
        let Ok(ctx) = HeadlessContext::new_blocking() else {
            return;
        };
        let pipeline = FlatCubePipeline::new(&ctx.device, wgpu::TextureFormat::Rgba8Unorm);
        assert_eq!(pipeline.target_format, wgpu::TextureFormat::Rgba8Unorm);
    }
}
