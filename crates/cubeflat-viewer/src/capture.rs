//! One-shot offscreen render written to a PNG file.

use std::io::Write;
use std::path::{Path, PathBuf};

use cubeflat_config::Config;
use cubeflat_render::{
    FlatCubeRenderer, HeadlessContext, ReadbackError, RenderContextError, RenderError,
    TextureError, clear_target, copy_texture_to_buffer,
};
use tracing::info;

use crate::{background_color, build_view};

/// Format of the offscreen target; sRGB like the window surface.
pub const CAPTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error(transparent)]
    Context(#[from] RenderContextError),

    #[error(transparent)]
    Texture(#[from] TextureError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Readback(#[from] ReadbackError),

    #[error("capture size {width}x{height} exceeds the device limit of {max}")]
    TooLarge { width: u32, height: u32, max: u32 },

    #[error("failed to encode PNG: {0}")]
    Encode(#[from] png::EncodingError),

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// An RGBA8 image read back from the GPU.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedFrame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl CapturedFrame {
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * self.width + x) * 4) as usize;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    /// Encode as an 8-bit RGBA PNG.
    pub fn write_png<W: Write>(&self, writer: W) -> Result<(), CaptureError> {
        let mut encoder = png::Encoder::new(writer, self.width, self.height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&self.pixels)?;
        writer.finish()?;
        Ok(())
    }
}

/// Clear to the configured background, draw the cross over it and read it back.
///
/// The frame is `config.window.width` x `config.window.height` pixels.
pub fn render_frame(ctx: &HeadlessContext, config: &Config) -> Result<CapturedFrame, CaptureError> {
    let size = (config.window.width.max(1), config.window.height.max(1));
    let max = ctx.device.limits().max_texture_dimension_2d;
    if size.0 > max || size.1 > max {
        return Err(CaptureError::TooLarge {
            width: size.0,
            height: size.1,
            max,
        });
    }
    let target = ctx.create_target(size.0, size.1, CAPTURE_FORMAT);
    let target_view = target.create_view(&wgpu::TextureViewDescriptor::default());

    let mut renderer = FlatCubeRenderer::new(&ctx.device, CAPTURE_FORMAT);
    let (_texture, view) = build_view(
        &ctx.device,
        &ctx.queue,
        &renderer,
        &config.cubemap,
        &config.view,
        size,
    )?;

    let mut encoder = ctx
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("cubeflat-capture"),
        });
    clear_target(&mut encoder, &target_view, background_color(&config.view));
    view.render(&mut renderer.frame(&ctx.device, &mut encoder, &target))?;
    let pending = copy_texture_to_buffer(&ctx.device, &mut encoder, &target)?;
    ctx.queue.submit(std::iter::once(encoder.finish()));

    let pixels = pending.read_rgba(&ctx.device)?;
    Ok(CapturedFrame {
        width: size.0,
        height: size.1,
        pixels,
    })
}

/// Render one frame on a headless device and save it to `path`.
pub fn capture_to_png(config: &Config, path: &Path) -> Result<(), CaptureError> {
    let ctx = HeadlessContext::new_blocking()?;
    let frame = render_frame(&ctx, config)?;

    let file = std::fs::File::create(path).map_err(|source| CaptureError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    frame.write_png(std::io::BufWriter::new(file))?;

    info!(
        "Captured {}x{} frame to {}",
        frame.width,
        frame.height,
        path.display()
    );
    Ok(())
}
