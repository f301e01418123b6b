//! # Texture Atlas Module
//!
//! Maps voxel atlas cells to normalized offsets inside a square texture
//! atlas. The atlas itself (pixel data, GPU handle) is owned by the host;
//! the core only needs the grid geometry.

use super::MeshError;

/// A square grid of texture cells inside one texture.
///
/// Cells are numbered row-major from the top-left; cell `id` occupies the
/// normalized rectangle starting at `((id % rows) / rows, (id / rows) / rows)`
/// with side `1 / rows`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureAtlas {
    rows: usize,
    texture: u64,
}

impl TextureAtlas {
    /// Cell 0, by convention a missing-texture placeholder. Callers that hit
    /// [`MeshError::AtlasCellOutOfRange`] can rewrite the offending voxels
    /// to this cell and rebuild instead of dropping the chunk.
    pub const FALLBACK_CELL: usize = 0;

    /// Creates an atlas of `rows` x `rows` cells backed by the host texture
    /// identified by `texture`.
    pub fn new(rows: usize, texture: u64) -> Self {
        TextureAtlas { rows, texture }
    }

    /// The number of cell rows (and columns).
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// The opaque host-side texture handle this atlas samples from.
    pub fn texture(&self) -> u64 {
        self.texture
    }

    /// Total number of addressable cells.
    pub fn capacity(&self) -> usize {
        self.rows * self.rows
    }

    /// The normalized origin of a cell.
    ///
    /// # Errors
    /// [`MeshError::AtlasCellOutOfRange`] when `cell` is outside the grid,
    /// which would otherwise produce UVs outside `[0, 1)`.
    pub fn cell_offset(&self, cell: usize) -> Result<(f32, f32), MeshError> {
        if cell >= self.capacity() {
            return Err(MeshError::AtlasCellOutOfRange {
                cell,
                capacity: self.capacity(),
            });
        }
        let rows = self.rows as f32;
        let x_offset = (cell % self.rows) as f32 / rows;
        let y_offset = (cell / self.rows) as f32 / rows;
        Ok((x_offset, y_offset))
    }
}
