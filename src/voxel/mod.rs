//! # Voxel Module
//!
//! Sparse block grids and the face-culled meshes built from them. A chunk
//! holds up to 16x16x16 typed voxels; the mesh builder walks the occupied
//! cells and emits one textured quad per face that borders empty space,
//! sampling each material from its cell of a shared texture atlas. The face
//! geometry itself comes from a swappable [`Layout`] strategy.

use thiserror::Error;

pub mod atlas;
pub mod chunk;
pub mod kind;
pub mod layout;
pub mod mesh;

pub use atlas::TextureAtlas;
pub use chunk::{Voxel, VoxelChunk, CHUNK_DIMENSION, CHUNK_VOLUME};
pub use kind::{VoxelKind, VoxelKindSize};
pub use layout::{BlockLayout, Face, Layout};
pub use mesh::{ChunkVertex, MeshBuffers};

/// Errors raised while building a chunk mesh.
///
/// These stem from data (a bad atlas or voxel grid), not logic, so they are
/// reported as results rather than panics; the caller decides whether to
/// skip the chunk or substitute a placeholder.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MeshError {
    /// A voxel referenced an atlas cell outside the atlas grid, which would
    /// produce UV coordinates outside `[0, 1)`.
    #[error("atlas cell {cell} is out of range for an atlas of {capacity} cells")]
    AtlasCellOutOfRange { cell: usize, capacity: usize },
}
