//! Flat "cross" view of a cube map: six face quads laid out in an orthographic
//! overlay, with the wgpu resources needed to draw them.

pub mod buffer;
pub mod camera;
pub mod cubemap;
pub mod face;
pub mod gpu;
pub mod layout;
pub mod pass;
pub mod pipeline;
pub mod readback;
pub mod renderer;
pub mod scene;
pub mod view;

pub use buffer::{FaceVertex, SCENE_INDEX_COUNT, SCENE_VERTEX_COUNT, SceneBuffers};
pub use camera::{CameraUniform, OrthographicCamera};
pub use cubemap::{
    CubeMapFaces, CubeMapTexture, FACE_DEBUG_COLORS, TextureError, check_face_size,
    texel_direction,
};
pub use face::{CUBE_FACE_COUNT, CubeFace, FACE_LOOKUP_VECTORS, FaceCorner};
pub use gpu::{
    HeadlessContext, RenderContext, RenderContextError, SurfaceError,
    init_render_context_blocking,
};
pub use layout::{CROSS_OFFSETS, CrossLayout};
pub use pass::{BACKGROUND_GREY, FlatCubeRenderer, FrameTarget, RenderError, clear_target};
pub use pipeline::{CubeMapBinding, FLAT_CUBE_SHADER_SOURCE, FlatCubePipeline};
pub use readback::{PendingReadback, ReadbackError, copy_texture_to_buffer};
pub use renderer::{AutoClearOverride, SceneRenderer};
pub use scene::{FaceQuad, FaceScene};
pub use view::{FlatCubeView, FlatCubeViewOptions};
