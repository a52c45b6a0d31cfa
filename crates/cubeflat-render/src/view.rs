//! [`FlatCubeView`]: all six faces of a cube map unfolded into a cross.
//!
//! The view owns the face quads, the cross layout and an orthographic camera
//! measured in pixels. Call [`FlatCubeView::set_size`] whenever the output
//! resizes (and at least once before the first frame), then
//! [`FlatCubeView::render`] once per frame. Rendering never clears the
//! target, so the cross can be composited over an already drawn frame.

use glam::{Vec2, Vec3};
use log::{debug, warn};

use crate::camera::OrthographicCamera;
use crate::face::CubeFace;
use crate::layout::CrossLayout;
use crate::renderer::{AutoClearOverride, SceneRenderer};
use crate::scene::FaceScene;

/// Default face edge length in pixels.
pub const DEFAULT_FACE_SIZE_PX: f32 = 128.0;
/// Default left inset in pixels.
pub const DEFAULT_PADDING_LEFT_PX: f32 = 10.0;
/// Default right inset in pixels.
pub const DEFAULT_PADDING_RIGHT_PX: f32 = 10.0;

/// Construction options for a [`FlatCubeView`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatCubeViewOptions {
    /// Edge length of each face quad.
    pub face_size_px: f32,
    /// Horizontal inset of the cross from the left viewport edge.
    pub padding_left_px: f32,
    /// Inset used for the vertical placement of the cross.
    pub padding_right_px: f32,
}

impl Default for FlatCubeViewOptions {
    fn default() -> Self {
        Self {
            face_size_px: DEFAULT_FACE_SIZE_PX,
            padding_left_px: DEFAULT_PADDING_LEFT_PX,
            padding_right_px: DEFAULT_PADDING_RIGHT_PX,
        }
    }
}

impl FlatCubeViewOptions {
    pub fn with_face_size(mut self, face_size_px: f32) -> Self {
        self.face_size_px = face_size_px;
        self
    }

    pub fn with_padding(mut self, left_px: f32, right_px: f32) -> Self {
        self.padding_left_px = left_px;
        self.padding_right_px = right_px;
        self
    }

    /// Replace non-finite values with their defaults.
    ///
    /// Zero and negative sizes are kept; they only produce overlapping or
    /// off-screen faces.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let pick = |name: &str, value: f32, default: f32| {
            if value.is_finite() {
                value
            } else {
                warn!("flat cube view option {name} is {value}, using {default}");
                default
            }
        };
        Self {
            face_size_px: pick("face_size_px", self.face_size_px, defaults.face_size_px),
            padding_left_px: pick(
                "padding_left_px",
                self.padding_left_px,
                defaults.padding_left_px,
            ),
            padding_right_px: pick(
                "padding_right_px",
                self.padding_right_px,
                defaults.padding_right_px,
            ),
        }
    }

    /// Layout described by these options.
    pub fn layout(&self) -> CrossLayout {
        CrossLayout::new(
            self.face_size_px,
            self.padding_left_px,
            self.padding_right_px,
        )
    }
}

/// Debug view drawing a cube map as an unfolded cross.
///
/// `E` is the renderer-specific handle to the cube map; it is fixed for the
/// lifetime of the view and shared by all six faces.
pub struct FlatCubeView<E> {
    env_map: E,
    options: FlatCubeViewOptions,
    layout: CrossLayout,
    camera: OrthographicCamera,
    scene: FaceScene,
    viewport: Option<Vec2>,
}

impl<E> FlatCubeView<E> {
    /// Build the six face quads for `env_map`.
    ///
    /// Faces stay at the origin and the camera keeps a unit volume until the
    /// first [`set_size`](Self::set_size).
    pub fn new(env_map: E, options: FlatCubeViewOptions) -> Self {
        let options = options.sanitized();
        debug!(
            "flat cube view: face {}px, padding {}px/{}px",
            options.face_size_px, options.padding_left_px, options.padding_right_px
        );
        Self {
            env_map,
            options,
            layout: options.layout(),
            camera: OrthographicCamera::default(),
            scene: FaceScene::new(options.face_size_px),
            viewport: None,
        }
    }

    /// Fit the projection to a `width` x `height` pixel output and re-place the faces.
    pub fn set_size(&mut self, width: f32, height: f32) {
        self.camera.fit_viewport(width, height);
        let positions = self.layout.positions(width / 2.0, height / 2.0);
        self.scene.place(&positions);
        self.viewport = Some(Vec2::new(width, height));
        debug!("flat cube view resized to {width}x{height}");
    }

    /// Draw the cross through `renderer` without clearing its target.
    ///
    /// The renderer's auto-clear flag is forced off for the draw and restored
    /// afterwards, including when the renderer fails or panics.
    pub fn render<R>(&self, renderer: &mut R) -> Result<(), R::Error>
    where
        R: SceneRenderer<EnvMap = E> + ?Sized,
    {
        if self.viewport.is_none() {
            debug!("flat cube view rendered before set_size; using the unit projection");
        }
        let mut renderer = AutoClearOverride::new(renderer, false);
        renderer.render(&self.scene, &self.camera, &self.env_map)
    }

    pub fn env_map(&self) -> &E {
        &self.env_map
    }

    /// Options after sanitizing.
    pub fn options(&self) -> &FlatCubeViewOptions {
        &self.options
    }

    pub fn layout(&self) -> &CrossLayout {
        &self.layout
    }

    pub fn camera(&self) -> &OrthographicCamera {
        &self.camera
    }

    pub fn scene(&self) -> &FaceScene {
        &self.scene
    }

    /// Size passed to the latest [`set_size`](Self::set_size), if any.
    pub fn viewport_size(&self) -> Option<Vec2> {
        self.viewport
    }

    /// Current centre of a face in pixel space.
    pub fn face_position(&self, face: CubeFace) -> Vec3 {
        self.scene.quad(face).position()
    }
}
