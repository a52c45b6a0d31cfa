//! Cube-map resources: CPU face data, static cube textures and cube render targets.
//!
//! WebGPU cube maps are 2D textures with 6 array layers in +X, -X, +Y, -Y,
//! +Z, -Z order, viewed through a `Cube` view for sampling.

use glam::Vec3;

use crate::face::{CUBE_FACE_COUNT, CubeFace};

/// Bytes per RGBA8 texel.
const BYTES_PER_TEXEL: usize = 4;

/// One distinct colour per face, in layer order.
pub const FACE_DEBUG_COLORS: [[u8; 4]; CUBE_FACE_COUNT] = [
    [255, 0, 0, 255],   // +X red
    [0, 255, 255, 255], // -X cyan
    [0, 255, 0, 255],   // +Y green
    [255, 0, 255, 255], // -Y magenta
    [0, 0, 255, 255],   // +Z blue
    [255, 255, 0, 255], // -Z yellow
];

/// Errors that can occur while building cube-map resources.
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    /// Faces must be at least one texel wide.
    #[error("cube map face size must be non-zero")]
    ZeroFaceSize,

    /// Face edge exceeds the device's 2D texture limit.
    #[error("cube map face size {size} exceeds the device limit of {max}")]
    TooLarge { size: u32, max: u32 },

    /// Face data length doesn't match `face_size * face_size * 4`.
    #[error("face {face:?} has {actual} bytes, expected {expected}")]
    DataSizeMismatch {
        face: CubeFace,
        actual: usize,
        expected: usize,
    },
}

/// Sampling direction for a point on a face.
///
/// `s` runs left to right and `t` top to bottom across the face image, both
/// in [-1, 1]. The result is not normalized; its major axis is ±1.
pub fn texel_direction(face: CubeFace, s: f32, t: f32) -> Vec3 {
    match face {
        CubeFace::PositiveX => Vec3::new(1.0, -t, -s),
        CubeFace::NegativeX => Vec3::new(-1.0, -t, s),
        CubeFace::PositiveY => Vec3::new(s, 1.0, t),
        CubeFace::NegativeY => Vec3::new(s, -1.0, -t),
        CubeFace::PositiveZ => Vec3::new(s, -t, 1.0),
        CubeFace::NegativeZ => Vec3::new(-s, -t, -1.0),
    }
}

/// Tightly packed RGBA8 pixels for six square faces.
#[derive(Debug, Clone, PartialEq)]
pub struct CubeMapFaces {
    pub face_size: u32,
    pub faces: [Vec<u8>; CUBE_FACE_COUNT],
}

impl CubeMapFaces {
    /// Every face filled with a single colour.
    pub fn solid(face_size: u32, colors: [[u8; 4]; CUBE_FACE_COUNT]) -> Self {
        let texels = face_size as usize * face_size as usize;
        Self {
            face_size,
            faces: colors.map(|color| color.repeat(texels)),
        }
    }

    /// Each texel coloured by its normalized sampling direction (`dir * 0.5 + 0.5`).
    ///
    /// The colours are continuous across cube edges, so a correctly unfolded
    /// cross shows no seams.
    pub fn direction_gradient(face_size: u32) -> Self {
        let n = face_size as usize;
        let faces = CubeFace::ALL.map(|face| {
            let mut pixels = Vec::with_capacity(n * n * BYTES_PER_TEXEL);
            for y in 0..n {
                for x in 0..n {
                    let s = 2.0 * (x as f32 + 0.5) / n as f32 - 1.0;
                    let t = 2.0 * (y as f32 + 0.5) / n as f32 - 1.0;
                    let rgb = texel_direction(face, s, t).normalize() * 0.5 + 0.5;
                    pixels.extend_from_slice(&[
                        (rgb.x * 255.0).round() as u8,
                        (rgb.y * 255.0).round() as u8,
                        (rgb.z * 255.0).round() as u8,
                        255,
                    ]);
                }
            }
            pixels
        });
        Self { face_size, faces }
    }

    pub fn face(&self, face: CubeFace) -> &[u8] {
        &self.faces[face.index()]
    }

    /// RGBA of the texel at column `x`, row `y` of `face`.
    pub fn texel(&self, face: CubeFace, x: u32, y: u32) -> [u8; 4] {
        let start = (y as usize * self.face_size as usize + x as usize) * BYTES_PER_TEXEL;
        let mut texel = [0; 4];
        texel.copy_from_slice(&self.face(face)[start..start + BYTES_PER_TEXEL]);
        texel
    }

    /// Check that every face holds exactly `face_size²` texels.
    pub fn validate(&self) -> Result<(), TextureError> {
        if self.face_size == 0 {
            return Err(TextureError::ZeroFaceSize);
        }
        let side = self.face_size as usize;
        let expected = side
            .checked_mul(side)
            .and_then(|texels| texels.checked_mul(BYTES_PER_TEXEL));
        for face in CubeFace::ALL {
            let actual = self.face(face).len();
            if Some(actual) != expected {
                return Err(TextureError::DataSizeMismatch {
                    face,
                    actual,
                    expected: expected.unwrap_or(usize::MAX),
                });
            }
        }
        Ok(())
    }
}

/// Reject face sizes the device cannot allocate.
pub fn check_face_size(device: &wgpu::Device, face_size: u32) -> Result<(), TextureError> {
    if face_size == 0 {
        return Err(TextureError::ZeroFaceSize);
    }
    let max = device.limits().max_texture_dimension_2d;
    if face_size > max {
        return Err(TextureError::TooLarge {
            size: face_size,
            max,
        });
    }
    Ok(())
}

/// A cube texture with a sampling view, per-face views and a sampler.
pub struct CubeMapTexture {
    pub texture: wgpu::Texture,
    /// `Cube` view for `texture_cube` sampling.
    pub cube_view: wgpu::TextureView,
    /// Single-layer `D2` views, usable as render attachments for render targets.
    pub face_views: [wgpu::TextureView; CUBE_FACE_COUNT],
    pub sampler: wgpu::Sampler,
    pub face_size: u32,
    pub format: wgpu::TextureFormat,
}

impl CubeMapTexture {
    /// Upload `faces` into a static RGBA8 cube texture.
    pub fn from_faces(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        faces: &CubeMapFaces,
        label: &str,
    ) -> Result<Self, TextureError> {
        check_face_size(device, faces.face_size)?;
        faces.validate()?;
        let cube = Self::allocate(
            device,
            label,
            faces.face_size,
            wgpu::TextureFormat::Rgba8Unorm,
            wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        );

        let face_size = faces.face_size;
        for face in CubeFace::ALL {
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &cube.texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d {
                        x: 0,
                        y: 0,
                        z: face.index() as u32,
                    },
                    aspect: wgpu::TextureAspect::All,
                },
                faces.face(face),
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(face_size * BYTES_PER_TEXEL as u32),
                    rows_per_image: Some(face_size),
                },
                wgpu::Extent3d {
                    width: face_size,
                    height: face_size,
                    depth_or_array_layers: 1,
                },
            );
        }

        log::info!("Uploaded cube map '{label}': {face_size}x{face_size} per face");
        Ok(cube)
    }

    /// Allocate a cube texture that other passes render into, one face view at a time.
    pub fn render_target(
        device: &wgpu::Device,
        face_size: u32,
        format: wgpu::TextureFormat,
        label: &str,
    ) -> Result<Self, TextureError> {
        check_face_size(device, face_size)?;
        let cube = Self::allocate(
            device,
            label,
            face_size,
            format,
            wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        );
        log::info!("Created cube render target '{label}': {face_size}x{face_size} {format:?}");
        Ok(cube)
    }

    /// Per-face view for rendering into one side of the cube.
    pub fn face_view(&self, face: CubeFace) -> &wgpu::TextureView {
        &self.face_views[face.index()]
    }

    fn allocate(
        device: &wgpu::Device,
        label: &str,
        face_size: u32,
        format: wgpu::TextureFormat,
        usage: wgpu::TextureUsages,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: face_size,
                height: face_size,
                depth_or_array_layers: CUBE_FACE_COUNT as u32,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage,
            view_formats: &[],
        });

        let cube_view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some(label),
            dimension: Some(wgpu::TextureViewDimension::Cube),
            ..Default::default()
        });

        let face_views = CubeFace::ALL.map(|face| {
            texture.create_view(&wgpu::TextureViewDescriptor {
                label: Some(label),
                dimension: Some(wgpu::TextureViewDimension::D2),
                base_array_layer: face.index() as u32,
                array_layer_count: Some(1),
                ..Default::default()
            })
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self {
            texture,
            cube_view,
            face_views,
            sampler,
            face_size,
            format,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::face::FaceCorner;
    use crate::gpu::HeadlessContext;

    #[test]
    fn test_texel_direction_corners_match_lookup_table() {
        let corners = [
            (FaceCorner::UpperLeft, -1.0, -1.0),
            (FaceCorner::UpperRight, 1.0, -1.0),
            (FaceCorner::LowerLeft, -1.0, 1.0),
            (FaceCorner::LowerRight, 1.0, 1.0),
        ];
        for face in CubeFace::ALL {
            for (corner, s, t) in corners {
                assert_eq!(
                    texel_direction(face, s, t),
                    face.lookup_vector(corner),
                    "{face:?} {corner:?}"
                );
            }
        }
    }

    #[test]
    fn test_texel_direction_centre_is_face_normal() {
        for face in CubeFace::ALL {
            assert_eq!(texel_direction(face, 0.0, 0.0), face.normal());
        }
    }

    #[test]
    fn test_solid_faces() {
        let faces = CubeMapFaces::solid(4, FACE_DEBUG_COLORS);
        assert!(faces.validate().is_ok());
        for face in CubeFace::ALL {
            assert_eq!(faces.texel(face, 3, 2), FACE_DEBUG_COLORS[face.index()]);
        }
    }

    #[test]
    fn test_gradient_centre_texel_encodes_normal() {
        let faces = CubeMapFaces::direction_gradient(33);
        assert!(faces.validate().is_ok());
        // +X centre -> (1, 0, 0) -> (255, 128, 128)
        assert_eq!(faces.texel(CubeFace::PositiveX, 16, 16), [255, 128, 128, 255]);
        // -Y centre -> (0, -1, 0) -> (128, 0, 128)
        assert_eq!(faces.texel(CubeFace::NegativeY, 16, 16), [128, 0, 128, 255]);
    }

    #[test]
    fn test_gradient_is_continuous_across_cross_edges() {
        let n = 64;
        let faces = CubeMapFaces::direction_gradient(n);
        let close = |a: [u8; 4], b: [u8; 4]| a.iter().zip(b).all(|(&x, y)| x.abs_diff(y) <= 6);

        // +Z right column meets +X left column.
        for y in 0..n {
            let a = faces.texel(CubeFace::PositiveZ, n - 1, y);
            let b = faces.texel(CubeFace::PositiveX, 0, y);
            assert!(close(a, b), "row {y}: {a:?} vs {b:?}");
        }
        // +Y bottom row meets +Z top row.
        for x in 0..n {
            let a = faces.texel(CubeFace::PositiveY, x, n - 1);
            let b = faces.texel(CubeFace::PositiveZ, x, 0);
            assert!(close(a, b), "column {x}: {a:?} vs {b:?}");
        }
    }

    #[test]
    fn test_validate_rejects_zero_size() {
        let faces = CubeMapFaces::solid(0, FACE_DEBUG_COLORS);
        assert!(matches!(faces.validate(), Err(TextureError::ZeroFaceSize)));
    }

    #[test]
    fn test_validate_rejects_short_face() {
        let mut faces = CubeMapFaces::solid(2, FACE_DEBUG_COLORS);
        faces.faces[3].truncate(12);
        match faces.validate() {
            Err(TextureError::DataSizeMismatch {
                face,
                actual,
                expected,
            }) => {
                assert_eq!(face, CubeFace::NegativeY);
                assert_eq!(actual, 12);
                assert_eq!(expected, 16);
            }
            other => panic!("expected DataSizeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_upload_creates_six_layers() {
        let Ok(ctx) = HeadlessContext::new_blocking() else {
            return;
        };
        let faces = CubeMapFaces::solid(8, FACE_DEBUG_COLORS);
        let cube = CubeMapTexture::from_faces(&ctx.device, &ctx.queue, &faces, "test-cube")
            .expect("upload should succeed");
        assert_eq!(cube.texture.depth_or_array_layers(), 6);
        assert_eq!(cube.face_size, 8);
    }

    #[test]
    fn test_render_target_rejects_zero_size() {
        let Ok(ctx) = HeadlessContext::new_blocking() else {
            return;
        };
        let result = CubeMapTexture::render_target(
            &ctx.device,
            0,
            wgpu::TextureFormat::Rgba8Unorm,
            "empty",
        );
        assert!(matches!(result, Err(TextureError::ZeroFaceSize)));
    }

    #[test]
    fn test_render_target_faces_accept_clears() {
        let Ok(ctx) = HeadlessContext::new_blocking() else {
            return;
        };
        let cube = CubeMapTexture::render_target(
            &ctx.device,
            16,
            wgpu::TextureFormat::Rgba8Unorm,
            "sample-target",
        )
        .expect("non-zero size");
        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
        for face in CubeFace::ALL {
            crate::pass::clear_target(&mut encoder, cube.face_view(face), wgpu::Color::RED);
        }
        ctx.queue.submit(std::iter::once(encoder.finish()));
        assert_eq!(cube.format, wgpu::TextureFormat::Rgba8Unorm);
        assert!(
            cube.texture
                .usage()
                .contains(wgpu::TextureUsages::RENDER_ATTACHMENT)
        );
    }

    #[test]
    fn test_validate_huge_face_size_reports_mismatch() {
        let faces = CubeMapFaces {
            face_size: 70_000,
            faces: Default::default(),
        };
        match faces.validate() {
            Err(TextureError::DataSizeMismatch {
                face,
                actual,
                expected,
            }) => {
                assert_eq!(face, CubeFace::PositiveX);
                assert_eq!(actual, 0);
                assert_eq!(expected, 70_000usize * 70_000 * 4);
            }
            other => panic!("expected DataSizeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_texel_reads_last_texel_of_face() {
        let faces = CubeMapFaces::solid(3, FACE_DEBUG_COLORS);
        assert_eq!(faces.texel(CubeFace::NegativeZ, 2, 2), FACE_DEBUG_COLORS[5]);
    }

    #[test]
    fn test_oversized_faces_are_rejected_before_upload() {
        let Ok(ctx) = HeadlessContext::new_blocking() else {
            return;
        };
        let max = ctx.device.limits().max_texture_dimension_2d;
        let faces = CubeMapFaces {
            face_size: max + 1,
            faces: Default::default(),
        };
        let result = CubeMapTexture::from_faces(&ctx.device, &ctx.queue, &faces, "huge");
        assert!(matches!(
            result,
            Err(TextureError::TooLarge { size, max: limit }) if size == max + 1 && limit == max
        ));
    }

    #[test]
    fn test_oversized_render_target_is_rejected() {
        let Ok(ctx) = HeadlessContext::new_blocking() else {
            return;
        };
        let max = ctx.device.limits().max_texture_dimension_2d;
        let result = CubeMapTexture::render_target(
            &ctx.device,
            max.saturating_mul(2).max(20_000),
            wgpu::TextureFormat::Rgba8Unorm,
            "huge-target",
        );
        assert!(matches!(result, Err(TextureError::TooLarge { .. })));
    }
}
