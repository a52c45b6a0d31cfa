//! Orthographic camera measured in pixels.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

/// Uniform buffer for the camera view-projection matrix.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4], // 64 bytes, mat4x4
}

/// Orthographic projection described by its six clip planes.
///
/// The camera sits at the origin looking down -Z, so the view matrix is the
/// identity and geometry at z = 0 lies on the near plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrthographicCamera {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
    /// Near clip plane distance.
    pub near: f32,
    /// Far clip plane distance.
    pub far: f32,
}

impl OrthographicCamera {
    pub fn new(left: f32, right: f32, top: f32, bottom: f32, near: f32, far: f32) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
            near,
            far,
        }
    }

    /// Fit the view volume to a `width` x `height` pixel viewport centred on the origin.
    pub fn fit_viewport(&mut self, width: f32, height: f32) {
        let half_width = width / 2.0;
        let half_height = height / 2.0;
        self.left = -half_width;
        self.right = half_width;
        self.top = half_height;
        self.bottom = -half_height;
    }

    /// Width of the view volume.
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    /// Height of the view volume.
    pub fn height(&self) -> f32 {
        self.top - self.bottom
    }

    /// Projection matrix mapping the view volume to wgpu clip space (depth 0..1).
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::orthographic_rh(
            self.left,
            self.right,
            self.bottom,
            self.top,
            self.near,
            self.far,
        )
    }

    /// Convert the camera to a uniform suitable for GPU upload.
    pub fn to_uniform(&self) -> CameraUniform {
        CameraUniform {
            view_proj: self.projection_matrix().to_cols_array_2d(),
        }
    }
}

impl Default for OrthographicCamera {
    /// Unit volume used until the first viewport size is known.
    fn default() -> Self {
        Self::new(-1.0, 1.0, 1.0, -1.0, 0.0, 1.0)
    }
}
