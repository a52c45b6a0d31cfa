//! Cross layout of the six unfolded faces.
//!
//! ```text
//!       [2]
//! [1]  [4]  [0]  [5]
//!       [3]
//! ```
//!
//! Offsets are expressed in face-size units with rows growing downward.
//! Screen positions are in pixels with y growing upward and the origin at the
//! viewport centre, matching the orthographic camera.

use glam::Vec2;

use crate::face::{CUBE_FACE_COUNT, CubeFace};

/// Column/row of every face in the cross, indexed by [`CubeFace::index`].
pub const CROSS_OFFSETS: [Vec2; CUBE_FACE_COUNT] = [
    Vec2::new(2.0, 1.0),
    Vec2::new(0.0, 1.0),
    Vec2::new(1.0, 0.0),
    Vec2::new(1.0, 2.0),
    Vec2::new(1.0, 1.0),
    Vec2::new(3.0, 1.0),
];

/// Columns spanned by the cross.
pub const CROSS_COLUMNS: f32 = 4.0;
/// Rows spanned by the cross.
pub const CROSS_ROWS: f32 = 3.0;

/// Places the six faces of a cross layout inside a centred viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossLayout {
    /// Edge length of a face in pixels.
    pub face_size_px: f32,
    /// Inset of the cross from the left viewport edge.
    pub padding_left_px: f32,
    /// Right padding; the cross is inset from the top edge by this amount.
    pub padding_right_px: f32,
}

impl CrossLayout {
    pub fn new(face_size_px: f32, padding_left_px: f32, padding_right_px: f32) -> Self {
        Self {
            face_size_px,
            padding_left_px,
            padding_right_px,
        }
    }

    /// Offset of a face in face-size units.
    pub fn offset_for(face: CubeFace) -> Vec2 {
        CROSS_OFFSETS[face.index()]
    }

    /// Offset of a face in pixels.
    pub fn offset_px(&self, face: CubeFace) -> Vec2 {
        Self::offset_for(face) * self.face_size_px
    }

    /// Centre of the top-left cell of the cross (column 0, row 0).
    pub fn origin(&self, half_width: f32, half_height: f32) -> Vec2 {
        let half_face = self.face_size_px / 2.0;
        Vec2::new(
            -half_width + self.padding_left_px + half_face,
            half_height - self.padding_right_px - half_face,
        )
    }

    /// Centre of a face for a viewport of the given half extents.
    pub fn position_for(&self, face: CubeFace, half_width: f32, half_height: f32) -> Vec2 {
        let origin = self.origin(half_width, half_height);
        let offset = self.offset_px(face);
        Vec2::new(origin.x + offset.x, origin.y - offset.y)
    }

    /// Centres of all faces, indexed by [`CubeFace::index`].
    pub fn positions(&self, half_width: f32, half_height: f32) -> [Vec2; CUBE_FACE_COUNT] {
        CubeFace::ALL.map(|face| self.position_for(face, half_width, half_height))
    }

    /// Smallest viewport that holds the whole cross including its insets.
    pub fn min_viewport(&self) -> Vec2 {
        Vec2::new(
            CROSS_COLUMNS * self.face_size_px + self.padding_left_px,
            CROSS_ROWS * self.face_size_px + self.padding_right_px,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec2_eq(actual: Vec2, expected: Vec2) {
        assert!(
            (actual - expected).length() < 1e-4,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_offsets_in_face_units() {
        let expected = [
            (CubeFace::PositiveX, Vec2::new(2.0, 1.0)),
            (CubeFace::NegativeX, Vec2::new(0.0, 1.0)),
            (CubeFace::PositiveY, Vec2::new(1.0, 0.0)),
            (CubeFace::NegativeY, Vec2::new(1.0, 2.0)),
            (CubeFace::PositiveZ, Vec2::new(1.0, 1.0)),
            (CubeFace::NegativeZ, Vec2::new(3.0, 1.0)),
        ];
        for (face, offset) in expected {
            assert_eq!(CrossLayout::offset_for(face), offset, "{face:?}");
        }
    }

    #[test]
    fn test_offsets_form_a_cross() {
        let middle_row: Vec<f32> = CubeFace::ALL
            .iter()
            .map(|&f| CrossLayout::offset_for(f))
            .filter(|o| o.y == 1.0)
            .map(|o| o.x)
            .collect();
        assert_eq!(middle_row.len(), 4);
        for column in 0..4 {
            assert!(middle_row.contains(&(column as f32)));
        }
        assert_eq!(CrossLayout::offset_for(CubeFace::PositiveY).x, 1.0);
        assert_eq!(CrossLayout::offset_for(CubeFace::NegativeY).x, 1.0);
    }

    #[test]
    fn test_offset_px_scales_with_face_size() {
        let layout = CrossLayout::new(64.0, 0.0, 0.0);
        assert_vec2_eq(layout.offset_px(CubeFace::NegativeZ), Vec2::new(192.0, 64.0));
    }

    #[test]
    fn test_face_four_position_formula() {
        let cases = [
            (800.0, 600.0, 10.0, 10.0, 128.0),
            (1920.0, 1080.0, 0.0, 25.0, 64.0),
            (300.0, 200.0, 7.5, 3.0, 100.0),
        ];
        for (w, h, l, r, f) in cases {
            let layout = CrossLayout::new(f, l, r);
            let pos = layout.position_for(CubeFace::PositiveZ, w / 2.0, h / 2.0);
            assert_vec2_eq(
                pos,
                Vec2::new(-w / 2.0 + l + f / 2.0 + f, h / 2.0 - r - f / 2.0 - f),
            );
        }
    }

    #[test]
    fn test_top_and_bottom_faces_share_column() {
        let layout = CrossLayout::new(100.0, 0.0, 0.0);
        let top = layout.position_for(CubeFace::PositiveY, 300.0, 200.0);
        let bottom = layout.position_for(CubeFace::NegativeY, 300.0, 200.0);
        assert_vec2_eq(top, Vec2::new(-150.0, 150.0));
        assert_vec2_eq(bottom, Vec2::new(-150.0, -50.0));
    }

    #[test]
    fn test_vertical_inset_uses_right_padding() {
        let layout = CrossLayout::new(100.0, 40.0, 5.0);
        let origin = layout.origin(300.0, 200.0);
        assert_vec2_eq(origin, Vec2::new(-300.0 + 40.0 + 50.0, 200.0 - 5.0 - 50.0));
    }

    #[test]
    fn test_degenerate_face_size_collapses_without_panicking() {
        let layout = CrossLayout::new(0.0, 10.0, 10.0);
        let positions = layout.positions(50.0, 50.0);
        for pos in positions {
            assert_vec2_eq(pos, Vec2::new(-40.0, 40.0));
        }

        let negative = CrossLayout::new(-20.0, 0.0, 0.0);
        let pos = negative.position_for(CubeFace::NegativeZ, 0.0, 0.0);
        assert!(pos.is_finite());
    }

    #[test]
    fn test_min_viewport() {
        let layout = CrossLayout::new(128.0, 10.0, 10.0);
        assert_vec2_eq(layout.min_viewport(), Vec2::new(522.0, 394.0));
    }
}
