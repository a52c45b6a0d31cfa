//! The contract a rendering backend fulfils for a flat cube view.

use std::ops::{Deref, DerefMut};

use crate::camera::OrthographicCamera;
use crate::scene::FaceScene;

/// A backend able to draw a [`FaceScene`] through an orthographic camera.
///
/// `EnvMap` is whatever the backend needs to sample the cube map, for example
/// a bind group for wgpu. The auto-clear flag decides whether the target is
/// cleared before drawing.
pub trait SceneRenderer {
    type EnvMap;
    type Error;

    fn auto_clear(&self) -> bool;

    fn set_auto_clear(&mut self, auto_clear: bool);

    /// Draw `scene` sampling `env_map`, in one pass.
    fn render(
        &mut self,
        scene: &FaceScene,
        camera: &OrthographicCamera,
        env_map: &Self::EnvMap,
    ) -> Result<(), Self::Error>;
}

/// Overrides a renderer's auto-clear flag until dropped.
///
/// The previous value is restored in `Drop`, so it survives early returns,
/// `?` and unwinding panics.
pub struct AutoClearOverride<'a, R: SceneRenderer + ?Sized> {
    renderer: &'a mut R,
    previous: bool,
}

impl<'a, R: SceneRenderer + ?Sized> AutoClearOverride<'a, R> {
    pub fn new(renderer: &'a mut R, auto_clear: bool) -> Self {
        let previous = renderer.auto_clear();
        renderer.set_auto_clear(auto_clear);
        Self { renderer, previous }
    }

    /// The value restored on drop.
    pub fn previous(&self) -> bool {
        self.previous
    }
}

impl<R: SceneRenderer + ?Sized> Deref for AutoClearOverride<'_, R> {
    type Target = R;

    fn deref(&self) -> &R {
        self.renderer
    }
}

impl<R: SceneRenderer + ?Sized> DerefMut for AutoClearOverride<'_, R> {
    fn deref_mut(&mut self) -> &mut R {
        self.renderer
    }
}

impl<R: SceneRenderer + ?Sized> Drop for AutoClearOverride<'_, R> {
    fn drop(&mut self) {
        self.renderer.set_auto_clear(self.previous);
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use super::*;

    /// Records what it was asked to draw.
    #[derive(Debug, Default)]
    pub struct RecordingRenderer {
        pub auto_clear: bool,
        pub auto_clear_during_render: Vec<bool>,
        pub cameras: Vec<OrthographicCamera>,
        pub scenes: Vec<FaceScene>,
        pub fail_with: Option<&'static str>,
        pub panic_on_render: bool,
    }

    impl RecordingRenderer {
        pub fn with_auto_clear(auto_clear: bool) -> Self {
            Self {
                auto_clear,
                ..Self::default()
            }
        }
    }

    impl SceneRenderer for RecordingRenderer {
        type EnvMap = &'static str;
        type Error = &'static str;

        fn auto_clear(&self) -> bool {
            self.auto_clear
        }

        fn set_auto_clear(&mut self, auto_clear: bool) {
            self.auto_clear = auto_clear;
        }

        fn render(
            &mut self,
            scene: &FaceScene,
            camera: &OrthographicCamera,
            _env_map: &Self::EnvMap,
        ) -> Result<(), Self::Error> {
            self.auto_clear_during_render.push(self.auto_clear);
            if self.panic_on_render {
                panic!("renderer exploded");
            }
            if let Some(message) = self.fail_with {
                return Err(message);
            }
            self.cameras.push(*camera);
            self.scenes.push(scene.clone());
            Ok(())
        }
    }
}
