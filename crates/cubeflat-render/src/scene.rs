//! The six face quads drawn by a flat cube view.

use glam::{Vec2, Vec3};

use crate::buffer::{FaceVertex, SCENE_INDEX_COUNT, SCENE_VERTEX_COUNT};
use crate::face::{CUBE_FACE_COUNT, CubeFace, FACE_CORNER_COUNT};

/// Two counter-clockwise triangles over corners in
/// upper-left, upper-right, lower-left, lower-right order.
pub const QUAD_INDICES: [u16; 6] = [0, 2, 1, 2, 3, 1];

/// Corners of an axis-aligned plane centred on the origin, in vertex order.
pub fn plane_corners(width: f32, height: f32) -> [Vec3; FACE_CORNER_COUNT] {
    let hw = width / 2.0;
    let hh = height / 2.0;
    [
        Vec3::new(-hw, hh, 0.0),
        Vec3::new(hw, hh, 0.0),
        Vec3::new(-hw, -hh, 0.0),
        Vec3::new(hw, -hh, 0.0),
    ]
}

/// A square quad showing one cube face.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceQuad {
    face: CubeFace,
    corners: [Vec3; FACE_CORNER_COUNT],
    lookups: [Vec3; FACE_CORNER_COUNT],
    position: Vec3,
}

impl FaceQuad {
    /// Build the quad for `face` with the given edge length, placed at the origin.
    pub fn new(face: CubeFace, size: f32) -> Self {
        Self {
            face,
            corners: plane_corners(size, size),
            lookups: face.lookup_vectors(),
            position: Vec3::ZERO,
        }
    }

    pub fn face(&self) -> CubeFace {
        self.face
    }

    /// Corner positions relative to the quad centre.
    pub fn corners(&self) -> &[Vec3; FACE_CORNER_COUNT] {
        &self.corners
    }

    /// Per-vertex cube-map lookup vectors.
    pub fn lookups(&self) -> &[Vec3; FACE_CORNER_COUNT] {
        &self.lookups
    }

    /// Centre of the quad in pixel space.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Vertices with the quad position applied.
    pub fn vertices(&self) -> [FaceVertex; FACE_CORNER_COUNT] {
        std::array::from_fn(|i| FaceVertex {
            position: (self.corners[i] + self.position).to_array(),
            env_lookup: self.lookups[i].to_array(),
        })
    }
}

/// All six face quads, indexed by [`CubeFace::index`].
#[derive(Debug, Clone, PartialEq)]
pub struct FaceScene {
    quads: [FaceQuad; CUBE_FACE_COUNT],
}

impl FaceScene {
    /// Build six quads of edge length `face_size`, all at the origin.
    pub fn new(face_size: f32) -> Self {
        Self {
            quads: CubeFace::ALL.map(|face| FaceQuad::new(face, face_size)),
        }
    }

    pub fn quads(&self) -> &[FaceQuad; CUBE_FACE_COUNT] {
        &self.quads
    }

    pub fn quad(&self, face: CubeFace) -> &FaceQuad {
        &self.quads[face.index()]
    }

    /// Move every quad to the given centres (z = 0).
    pub fn place(&mut self, positions: &[Vec2; CUBE_FACE_COUNT]) {
        for (quad, position) in self.quads.iter_mut().zip(positions) {
            quad.set_position(position.extend(0.0));
        }
    }

    /// Vertices of all quads, four per face in face order.
    pub fn vertices(&self) -> [FaceVertex; SCENE_VERTEX_COUNT] {
        std::array::from_fn(|i| {
            self.quads[i / FACE_CORNER_COUNT].vertices()[i % FACE_CORNER_COUNT]
        })
    }

    /// Index list covering all quads.
    pub fn indices() -> [u16; SCENE_INDEX_COUNT] {
        std::array::from_fn(|i| {
            let quad = (i / QUAD_INDICES.len()) as u16;
            quad * FACE_CORNER_COUNT as u16 + QUAD_INDICES[i % QUAD_INDICES.len()]
        })
    }
}
