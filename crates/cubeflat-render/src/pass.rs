//! wgpu backend for [`SceneRenderer`].
//!
//! [`FlatCubeRenderer`] owns the compiled program, the camera uniform and the
//! quad buffers, and keeps the auto-clear setting between frames.
//! [`FlatCubeRenderer::frame`] pairs it with one frame's encoder and target
//! texture, producing the [`FrameTarget`] handed to
//! [`FlatCubeView::render`](crate::FlatCubeView::render).

use wgpu::util::DeviceExt;

use crate::buffer::{SceneBuffers, encode_buffer_write};
use crate::camera::{CameraUniform, OrthographicCamera};
use crate::cubemap::CubeMapTexture;
use crate::pipeline::{CubeMapBinding, FlatCubePipeline};
use crate::renderer::SceneRenderer;
use crate::scene::FaceScene;

/// Dark neutral grey; faces of any colour stand out against it.
pub const BACKGROUND_GREY: wgpu::Color = wgpu::Color {
    r: 0.1,
    g: 0.1,
    b: 0.1,
    a: 1.0,
};

/// Errors raised before any commands are encoded.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum RenderError {
    /// The target texture format differs from the one the pipeline was built for.
    #[error("target format {actual:?} does not match pipeline format {expected:?}")]
    FormatMismatch {
        expected: wgpu::TextureFormat,
        actual: wgpu::TextureFormat,
    },

    /// The target texture cannot be used as a colour attachment.
    #[error("target texture was not created with RENDER_ATTACHMENT usage")]
    NotRenderable,
}

/// Encode a pass that only clears `target` to `color`.
pub fn clear_target(
    encoder: &mut wgpu::CommandEncoder,
    target: &wgpu::TextureView,
    color: wgpu::Color,
) {
    let _pass = begin_pass(encoder, target, wgpu::LoadOp::Clear(color), "clear-pass");
}

fn begin_pass<'encoder>(
    encoder: &'encoder mut wgpu::CommandEncoder,
    view: &wgpu::TextureView,
    load: wgpu::LoadOp<wgpu::Color>,
    label: &'static str,
) -> wgpu::RenderPass<'encoder> {
    encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view,
            resolve_target: None,
            ops: wgpu::Operations {
                load,
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
        multiview_mask: None,
    })
}

/// GPU state shared by every frame of a flat cube view.
pub struct FlatCubeRenderer {
    pipeline: FlatCubePipeline,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    buffers: SceneBuffers,
    auto_clear: bool,
    clear_color: wgpu::Color,
}

impl FlatCubeRenderer {
    /// Compile the program for `target_format` and allocate buffers.
    ///
    /// Auto-clear starts enabled with [`BACKGROUND_GREY`].
    pub fn new(device: &wgpu::Device, target_format: wgpu::TextureFormat) -> Self {
        let pipeline = FlatCubePipeline::new(device, target_format);

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("flat-cube-camera"),
            contents: bytemuck::cast_slice(&[OrthographicCamera::default().to_uniform()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("flat-cube-camera-bg"),
            layout: &pipeline.camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        Self {
            pipeline,
            camera_buffer,
            camera_bind_group,
            buffers: SceneBuffers::new(device, "flat-cube-faces"),
            auto_clear: true,
            clear_color: BACKGROUND_GREY,
        }
    }

    pub fn pipeline(&self) -> &FlatCubePipeline {
        &self.pipeline
    }

    /// Bind a cube map for use as a view's environment map.
    pub fn bind_cube_map(
        &self,
        device: &wgpu::Device,
        cube_map: &CubeMapTexture,
    ) -> CubeMapBinding {
        CubeMapBinding::new(device, &self.pipeline, cube_map)
    }

    pub fn auto_clear(&self) -> bool {
        self.auto_clear
    }

    pub fn set_auto_clear(&mut self, auto_clear: bool) {
        self.auto_clear = auto_clear;
    }

    pub fn clear_color(&self) -> wgpu::Color {
        self.clear_color
    }

    /// Colour used when auto-clear is enabled.
    pub fn set_clear_color(&mut self, color: wgpu::Color) {
        self.clear_color = color;
    }

    /// Target one frame: commands go into `encoder`, pixels into `target`.
    ///
    /// Uploads are recorded into `encoder` ahead of each draw, so several views
    /// may render through one renderer into the same encoder.
    pub fn frame<'a>(
        &'a mut self,
        device: &'a wgpu::Device,
        encoder: &'a mut wgpu::CommandEncoder,
        target: &'a wgpu::Texture,
    ) -> FrameTarget<'a> {
        FrameTarget {
            renderer: self,
            device,
            encoder,
            target,
        }
    }

    fn check_target(&self, target: &wgpu::Texture) -> Result<(), RenderError> {
        if target.format() != self.pipeline.target_format {
            return Err(RenderError::FormatMismatch {
                expected: self.pipeline.target_format,
                actual: target.format(),
            });
        }
        if !target
            .usage()
            .contains(wgpu::TextureUsages::RENDER_ATTACHMENT)
        {
            return Err(RenderError::NotRenderable);
        }
        Ok(())
    }
}

/// One frame's encoder and target, bound to a [`FlatCubeRenderer`].
pub struct FrameTarget<'a> {
    renderer: &'a mut FlatCubeRenderer,
    device: &'a wgpu::Device,
    encoder: &'a mut wgpu::CommandEncoder,
    target: &'a wgpu::Texture,
}

impl SceneRenderer for FrameTarget<'_> {
    type EnvMap = CubeMapBinding;
    type Error = RenderError;

    fn auto_clear(&self) -> bool {
        self.renderer.auto_clear
    }

    fn set_auto_clear(&mut self, auto_clear: bool) {
        self.renderer.auto_clear = auto_clear;
    }

    fn render(
        &mut self,
        scene: &FaceScene,
        camera: &OrthographicCamera,
        env_map: &CubeMapBinding,
    ) -> Result<(), RenderError> {
        let renderer = &*self.renderer;
        renderer.check_target(self.target)?;

        let uniform: CameraUniform = camera.to_uniform();
        encode_buffer_write(
            self.device,
            self.encoder,
            &renderer.camera_buffer,
            bytemuck::bytes_of(&uniform),
        );
        renderer
            .buffers
            .encode_write(self.device, self.encoder, scene);

        let view = self
            .target
            .create_view(&wgpu::TextureViewDescriptor::default());
        let load = if renderer.auto_clear {
            wgpu::LoadOp::Clear(renderer.clear_color)
        } else {
            wgpu::LoadOp::Load
        };

        let mut pass = begin_pass(self.encoder, &view, load, "flat-cube-pass");
        pass.set_pipeline(&renderer.pipeline.pipeline);
        pass.set_bind_group(0, &renderer.camera_bind_group, &[]);
        pass.set_bind_group(1, &env_map.bind_group, &[]);
        renderer.buffers.bind(&mut pass);
        renderer.buffers.draw(&mut pass);

        log::trace!("flat cube pass encoded ({load:?})");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cubemap::{CubeMapFaces, FACE_DEBUG_COLORS};
    use crate::gpu::HeadlessContext;

    fn setup(ctx: &HeadlessContext) -> (FlatCubeRenderer, CubeMapBinding) {
        let renderer = FlatCubeRenderer::new(&ctx.device, wgpu::TextureFormat::Rgba8Unorm);
        let faces = CubeMapFaces::solid(4, FACE_DEBUG_COLORS);
        let cube = CubeMapTexture::from_faces(&ctx.device, &ctx.queue, &faces, "pass-test")
            .expect("upload should succeed");
        let binding = renderer.bind_cube_map(&ctx.device, &cube);
        (renderer, binding)
    }

    fn encoder(ctx: &HeadlessContext) -> wgpu::CommandEncoder {
        ctx.device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None })
    }

    #[test]
    fn test_background_grey_is_opaque() {
        assert_eq!(BACKGROUND_GREY.a, 1.0);
        assert!(BACKGROUND_GREY.r < 0.5);
    }

    #[test]
    fn test_renderer_defaults() {
        let Ok(ctx) = HeadlessContext::new_blocking() else {
            return;
        };
        let (renderer, _) = setup(&ctx);
        assert!(renderer.auto_clear());
        assert_eq!(renderer.clear_color(), BACKGROUND_GREY);
    }

    #[test]
    fn test_format_mismatch_is_reported() {
        let Ok(ctx) = HeadlessContext::new_blocking() else {
            return;
        };
        let (mut renderer, binding) = setup(&ctx);
        let target = ctx.create_target(8, 8, wgpu::TextureFormat::Bgra8Unorm);
        let mut encoder = encoder(&ctx);
        let result = renderer.frame(&ctx.device, &mut encoder, &target).render(
            &FaceScene::new(2.0),
            &OrthographicCamera::default(),
            &binding,
        );
        assert_eq!(
            result,
            Err(RenderError::FormatMismatch {
                expected: wgpu::TextureFormat::Rgba8Unorm,
                actual: wgpu::TextureFormat::Bgra8Unorm,
            })
        );
    }

    #[test]
    fn test_non_renderable_target_is_reported() {
        let Ok(ctx) = HeadlessContext::new_blocking() else {
            return;
        };
        let (mut renderer, binding) = setup(&ctx);
        let target = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("sample-only"),
            size: wgpu::Extent3d {
                width: 4,
                height: 4,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let mut encoder = encoder(&ctx);
        let result = renderer.frame(&ctx.device, &mut encoder, &target).render(
            &FaceScene::new(2.0),
            &OrthographicCamera::default(),
            &binding,
        );
        assert_eq!(result, Err(RenderError::NotRenderable));
    }

    #[test]
    fn test_frame_target_forwards_auto_clear() {
        let Ok(ctx) = HeadlessContext::new_blocking() else {
            return;
        };
        let (mut renderer, _) = setup(&ctx);
        let target = ctx.create_target(8, 8, wgpu::TextureFormat::Rgba8Unorm);
        let mut encoder = encoder(&ctx);
        {
            let mut frame = renderer.frame(&ctx.device, &mut encoder, &target);
            assert!(frame.auto_clear());
            frame.set_auto_clear(false);
        }
        assert!(!renderer.auto_clear());
    }

    fn pixel(pixels: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * width + x) * 4) as usize;
        [pixels[i], pixels[i + 1], pixels[i + 2], pixels[i + 3]]
    }

    #[test]
    fn test_cross_composites_over_existing_content() {
        use crate::face::CubeFace;
        use crate::readback::copy_texture_to_buffer;
        use crate::view::{FlatCubeView, FlatCubeViewOptions};

        let Ok(ctx) = HeadlessContext::new_blocking() else {
            return;
        };
        let (width, height) = (320u32, 240u32);
        let (mut renderer, binding) = setup(&ctx);
        let target = ctx.create_target(width, height, wgpu::TextureFormat::Rgba8Unorm);
        let target_view = target.create_view(&wgpu::TextureViewDescriptor::default());

        let mut view = FlatCubeView::new(
            binding,
            FlatCubeViewOptions::default()
                .with_face_size(48.0)
                .with_padding(8.0, 8.0),
        );
        view.set_size(width as f32, height as f32);

        let mut encoder = encoder(&ctx);
        clear_target(&mut encoder, &target_view, wgpu::Color::BLACK);
        view.render(&mut renderer.frame(&ctx.device, &mut encoder, &target))
            .expect("render should succeed");
        let pending = copy_texture_to_buffer(&ctx.device, &mut encoder, &target)
            .expect("rgba target is readable");
        ctx.queue.submit(std::iter::once(encoder.finish()));
        let pixels = pending.read_rgba(&ctx.device).expect("readback should succeed");

        assert!(renderer.auto_clear(), "auto-clear must be restored after render");

        for face in CubeFace::ALL {
            let centre = view.face_position(face);
            let x = (width as f32 / 2.0 + centre.x) as u32;
            let y = (height as f32 / 2.0 - centre.y) as u32;
            assert_eq!(
                pixel(&pixels, width, x, y),
                FACE_DEBUG_COLORS[face.index()],
                "{face:?} centre at ({x}, {y})"
            );
        }

        // Bottom-right corner lies outside the cross and keeps the pre-clear.
        assert_eq!(pixel(&pixels, width, width - 1, height - 1), [0, 0, 0, 255]);
    }

    #[test]
    fn test_two_views_share_one_encoder() {
        use crate::face::CubeFace;
        use crate::readback::copy_texture_to_buffer;
        use crate::view::{FlatCubeView, FlatCubeViewOptions};

        let Ok(ctx) = HeadlessContext::new_blocking() else {
            return;
        };
        let (width, height) = (640u32, 480u32);
        let (mut renderer, first_binding) = setup(&ctx);
        let faces = CubeMapFaces::solid(4, FACE_DEBUG_COLORS);
        let cube = CubeMapTexture::from_faces(&ctx.device, &ctx.queue, &faces, "pass-test-b")
            .expect("upload should succeed");
        let second_binding = renderer.bind_cube_map(&ctx.device, &cube);

        let target = ctx.create_target(width, height, wgpu::TextureFormat::Rgba8Unorm);
        let target_view = target.create_view(&wgpu::TextureViewDescriptor::default());

        let mut top_left = FlatCubeView::new(
            first_binding,
            FlatCubeViewOptions::default()
                .with_face_size(40.0)
                .with_padding(0.0, 0.0),
        );
        let mut lower_right = FlatCubeView::new(
            second_binding,
            FlatCubeViewOptions::default()
                .with_face_size(40.0)
                .with_padding(400.0, 250.0),
        );
        top_left.set_size(width as f32, height as f32);
        lower_right.set_size(width as f32, height as f32);

        let mut encoder = encoder(&ctx);
        clear_target(&mut encoder, &target_view, wgpu::Color::BLACK);
        top_left
            .render(&mut renderer.frame(&ctx.device, &mut encoder, &target))
            .expect("first render should succeed");
        lower_right
            .render(&mut renderer.frame(&ctx.device, &mut encoder, &target))
            .expect("second render should succeed");
        let pending = copy_texture_to_buffer(&ctx.device, &mut encoder, &target)
            .expect("rgba target is readable");
        ctx.queue.submit(std::iter::once(encoder.finish()));
        let pixels = pending.read_rgba(&ctx.device).expect("readback should succeed");

        assert!(renderer.auto_clear());
        for (name, view) in [("top-left", &top_left), ("lower-right", &lower_right)] {
            for face in CubeFace::ALL {
                let centre = view.face_position(face);
                let x = (width as f32 / 2.0 + centre.x) as u32;
                let y = (height as f32 / 2.0 - centre.y) as u32;
                assert_eq!(
                    pixel(&pixels, width, x, y),
                    FACE_DEBUG_COLORS[face.index()],
                    "{name} {face:?} centre at ({x}, {y})"
                );
            }
        }
    }
}
