//! Cube face identifiers and the per-corner lookup vectors of the unfolded cross.
//!
//! Every face quad carries one lookup vector per corner. The rasterizer
//! interpolates them across the quad and the fragment shader samples the cube
//! map along the result, so each quad shows exactly one side of the cube.
//! Corners are always listed upper-left, upper-right, lower-left, lower-right.
//!
//! Faces that touch in the cross layout share identical vectors along their
//! common edge, which is what makes the unfolded cross fold back into a
//! coherent cube.

use glam::Vec3;

/// Number of faces in a cube map.
pub const CUBE_FACE_COUNT: usize = 6;

/// Number of corners per face quad.
pub const FACE_CORNER_COUNT: usize = 4;

/// One side of a cube map, in cube-map layer order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CubeFace {
    PositiveX = 0,
    NegativeX = 1,
    PositiveY = 2,
    NegativeY = 3,
    PositiveZ = 4,
    NegativeZ = 5,
}

/// Corner of a face quad, in vertex order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaceCorner {
    UpperLeft = 0,
    UpperRight = 1,
    LowerLeft = 2,
    LowerRight = 3,
}

impl FaceCorner {
    /// All corners in vertex order.
    pub const ALL: [FaceCorner; FACE_CORNER_COUNT] = [
        FaceCorner::UpperLeft,
        FaceCorner::UpperRight,
        FaceCorner::LowerLeft,
        FaceCorner::LowerRight,
    ];
}

/// Lookup vectors per face, indexed by [`CubeFace::index`] then [`FaceCorner`].
///
/// See <https://scalibq.wordpress.com/2013/06/23/cubemaps/> for the layout.
pub const FACE_LOOKUP_VECTORS: [[Vec3; FACE_CORNER_COUNT]; CUBE_FACE_COUNT] = [
    // +X
    [
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(1.0, 1.0, -1.0),
        Vec3::new(1.0, -1.0, 1.0),
        Vec3::new(1.0, -1.0, -1.0),
    ],
    // -X
    [
        Vec3::new(-1.0, 1.0, -1.0),
        Vec3::new(-1.0, 1.0, 1.0),
        Vec3::new(-1.0, -1.0, -1.0),
        Vec3::new(-1.0, -1.0, 1.0),
    ],
    // +Y
    [
        Vec3::new(-1.0, 1.0, -1.0),
        Vec3::new(1.0, 1.0, -1.0),
        Vec3::new(-1.0, 1.0, 1.0),
        Vec3::new(1.0, 1.0, 1.0),
    ],
    // -Y
    [
        Vec3::new(-1.0, -1.0, 1.0),
        Vec3::new(1.0, -1.0, 1.0),
        Vec3::new(-1.0, -1.0, -1.0),
        Vec3::new(1.0, -1.0, -1.0),
    ],
    // +Z
    [
        Vec3::new(-1.0, 1.0, 1.0),
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(-1.0, -1.0, 1.0),
        Vec3::new(1.0, -1.0, 1.0),
    ],
    // -Z
    [
        Vec3::new(1.0, 1.0, -1.0),
        Vec3::new(-1.0, 1.0, -1.0),
        Vec3::new(1.0, -1.0, -1.0),
        Vec3::new(-1.0, -1.0, -1.0),
    ],
];

impl CubeFace {
    /// All faces in cube-map layer order.
    pub const ALL: [CubeFace; CUBE_FACE_COUNT] = [
        CubeFace::PositiveX,
        CubeFace::NegativeX,
        CubeFace::PositiveY,
        CubeFace::NegativeY,
        CubeFace::PositiveZ,
        CubeFace::NegativeZ,
    ];

    /// Layer index of this face (0..6).
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Face for a layer index, or `None` when out of range.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Outward normal of the face.
    pub fn normal(self) -> Vec3 {
        match self {
            CubeFace::PositiveX => Vec3::X,
            CubeFace::NegativeX => Vec3::NEG_X,
            CubeFace::PositiveY => Vec3::Y,
            CubeFace::NegativeY => Vec3::NEG_Y,
            CubeFace::PositiveZ => Vec3::Z,
            CubeFace::NegativeZ => Vec3::NEG_Z,
        }
    }

    /// The four corner lookup vectors in vertex order.
    pub fn lookup_vectors(self) -> [Vec3; FACE_CORNER_COUNT] {
        FACE_LOOKUP_VECTORS[self.index()]
    }

    /// Lookup vector of a single corner.
    pub fn lookup_vector(self, corner: FaceCorner) -> Vec3 {
        FACE_LOOKUP_VECTORS[self.index()][corner as usize]
    }
}
