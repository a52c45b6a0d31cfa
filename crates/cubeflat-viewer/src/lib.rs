//! The cubeflat viewer: a window showing the flat cross of a generated cube
//! map, or a one-shot offscreen capture to PNG.

pub mod app;
pub mod capture;

use cubeflat_config::{CubeMapConfig, CubeMapPattern, ViewConfig};
use cubeflat_render::{
    CubeMapBinding, CubeMapFaces, CubeMapTexture, FACE_DEBUG_COLORS, FlatCubeRenderer,
    FlatCubeView, TextureError,
};

/// CPU face data for the configured pattern.
pub fn cube_map_faces(config: &CubeMapConfig) -> CubeMapFaces {
    match config.pattern {
        CubeMapPattern::DirectionGradient => {
            CubeMapFaces::direction_gradient(config.face_resolution)
        }
        CubeMapPattern::SolidFaces => CubeMapFaces::solid(config.face_resolution, FACE_DEBUG_COLORS),
    }
}

/// Linear clear colour from the `[r, g, b, a]` config value.
pub fn background_color(view: &ViewConfig) -> wgpu::Color {
    let [r, g, b, a] = view.background;
    wgpu::Color { r, g, b, a }
}

/// Upload the configured cube map and wrap it in a view sized `width` x `height`.
///
/// The texture is returned alongside the view so callers can keep it alive.
pub fn build_view(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    renderer: &FlatCubeRenderer,
    cubemap: &CubeMapConfig,
    view: &ViewConfig,
    (width, height): (u32, u32),
) -> Result<(CubeMapTexture, FlatCubeView<CubeMapBinding>), TextureError> {
    let faces = cube_map_faces(cubemap);
    let texture = CubeMapTexture::from_faces(device, queue, &faces, "cubeflat-environment")?;
    let binding = renderer.bind_cube_map(device, &texture);

    let mut flat = FlatCubeView::new(binding, view.options());
    flat.set_size(width as f32, height as f32);
    Ok((texture, flat))
}
