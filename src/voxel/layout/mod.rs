//! # Face Layout Module
//!
//! The strategy seam of the mesh builder. A [`Layout`] decides the geometry
//! of one voxel face (vertices, normals, UV rectangle, index winding); the
//! builder supplies world position and atlas placement. Alternate layouts
//! (sloped blocks, billboards) plug in without touching the assembly loop.

use cgmath::Point3;

pub mod block;

pub use block::BlockLayout;

/// The six faces of a voxel cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    Front,
    Back,
    Top,
    Bottom,
    Right,
    Left,
}

impl Face {
    /// All faces in the order the mesh builder emits them.
    pub const ALL: [Face; 6] = [
        Face::Front,
        Face::Back,
        Face::Top,
        Face::Bottom,
        Face::Right,
        Face::Left,
    ];

    /// Grid offset of the neighboring cell this face looks at. Front faces
    /// +Z, top faces +Y, right faces +X.
    pub fn neighbor_offset(self) -> (i32, i32, i32) {
        match self {
            Face::Front => (0, 0, 1),
            Face::Back => (0, 0, -1),
            Face::Top => (0, 1, 0),
            Face::Bottom => (0, -1, 0),
            Face::Right => (1, 0, 0),
            Face::Left => (-1, 0, 0),
        }
    }
}

/// Per-face geometry strategy for a voxel shape.
///
/// All methods are pure; a layout carries no per-voxel state and one
/// instance serves a whole chunk rebuild.
pub trait Layout: Send + Sync {
    /// Four vertex positions of `face` for a cell centered at `position`.
    fn vertices(&self, face: Face, position: Point3<f32>) -> [[f32; 3]; 4];

    /// Four normals of `face`, constant across the face.
    fn normals(&self, face: Face) -> [[f32; 3]; 4];

    /// Four UV coordinates of `face`, placed into the atlas cell at
    /// `(x_offset, y_offset)` of an atlas with `rows` rows.
    fn uvs(&self, face: Face, x_offset: f32, y_offset: f32, rows: usize) -> [[f32; 2]; 4];

    /// Six indices forming the two triangles of `face`, offset by the
    /// running vertex count `base`.
    fn indices(&self, face: Face, base: u32) -> [u32; 6];
}
