//! # Voxel Chunk Module
//!
//! A fixed 16x16x16 grid of voxel cells plus the mesh built from it. The
//! chunk keeps a bit per cell for occupancy so neighbor checks during
//! meshing never touch the voxel payloads, and a dirty flag so the mesh is
//! rebuilt lazily, at most once per batch of edits.

use bitvec::prelude::*;
use log::debug;
use web_time::Instant;

use super::atlas::TextureAtlas;
use super::kind::VoxelKind;
use super::layout::Layout;
use super::mesh::{self, MeshBuffers};
use super::MeshError;

/// Cells per chunk edge.
pub const CHUNK_DIMENSION: usize = 16;

/// Cells per chunk.
pub const CHUNK_VOLUME: usize = CHUNK_DIMENSION * CHUNK_DIMENSION * CHUNK_DIMENSION;

/// One occupied cell: a material kind and an optional overlay atlas cell
/// (damage crack, selection highlight) drawn over the base texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Voxel {
    pub kind: VoxelKind,
    pub overlay: Option<usize>,
}

impl Voxel {
    pub fn new(kind: VoxelKind) -> Self {
        Voxel {
            kind,
            overlay: None,
        }
    }

    pub fn with_overlay(kind: VoxelKind, overlay: usize) -> Self {
        Voxel {
            kind,
            overlay: Some(overlay),
        }
    }
}

/// A chunk grid and its lazily rebuilt mesh.
///
/// Cell `(x, y, z)` lives at linear index `x + 16y + 256z`. Out-of-bounds
/// coordinates are valid queries and always read as empty, which is what
/// makes chunk-boundary faces emit.
pub struct VoxelChunk {
    voxels: Vec<Option<Voxel>>,
    solid: BitVec,
    dirty: bool,
    overlay_dirty: bool,
    buffers: Option<MeshBuffers>,
}

impl Default for VoxelChunk {
    fn default() -> Self {
        Self::new()
    }
}

impl VoxelChunk {
    /// Creates an empty chunk.
    pub fn new() -> Self {
        VoxelChunk {
            voxels: vec![None; CHUNK_VOLUME],
            solid: bitvec![0; CHUNK_VOLUME],
            dirty: false,
            overlay_dirty: false,
            buffers: None,
        }
    }

    fn index(x: usize, y: usize, z: usize) -> usize {
        x + y * CHUNK_DIMENSION + z * CHUNK_DIMENSION * CHUNK_DIMENSION
    }

    fn in_bounds(x: usize, y: usize, z: usize) -> bool {
        x < CHUNK_DIMENSION && y < CHUNK_DIMENSION && z < CHUNK_DIMENSION
    }

    /// Places a voxel, replacing whatever the cell held. An `AIR` voxel
    /// clears the cell. Marks the chunk dirty.
    pub fn set(&mut self, x: usize, y: usize, z: usize, voxel: Voxel) {
        if !Self::in_bounds(x, y, z) {
            return;
        }
        let index = Self::index(x, y, z);
        if voxel.kind.is_solid() {
            self.voxels[index] = Some(voxel);
            self.solid.set(index, true);
        } else {
            self.voxels[index] = None;
            self.solid.set(index, false);
        }
        self.dirty = true;
    }

    /// Clears a cell, returning what it held. Marks the chunk dirty when a
    /// voxel was actually removed.
    pub fn remove(&mut self, x: usize, y: usize, z: usize) -> Option<Voxel> {
        if !Self::in_bounds(x, y, z) {
            return None;
        }
        let index = Self::index(x, y, z);
        let removed = self.voxels[index].take();
        if removed.is_some() {
            self.solid.set(index, false);
            self.dirty = true;
        }
        removed
    }

    /// The voxel at a cell, if occupied.
    pub fn voxel_at(&self, x: usize, y: usize, z: usize) -> Option<&Voxel> {
        if !Self::in_bounds(x, y, z) {
            return None;
        }
        self.voxels[Self::index(x, y, z)].as_ref()
    }

    /// Occupancy of a cell in signed coordinates; anything outside the chunk
    /// reads as empty.
    pub fn is_solid(&self, x: i32, y: i32, z: i32) -> bool {
        let limit = CHUNK_DIMENSION as i32;
        if x < 0 || y < 0 || z < 0 || x >= limit || y >= limit || z >= limit {
            return false;
        }
        self.solid[Self::index(x as usize, y as usize, z as usize)]
    }

    /// Replaces the overlay of an occupied cell. Only the overlay channels
    /// of the mesh are rebuilt; base geometry is untouched.
    pub fn set_overlay(&mut self, x: usize, y: usize, z: usize, overlay: Option<usize>) {
        if !Self::in_bounds(x, y, z) {
            return;
        }
        if let Some(voxel) = self.voxels[Self::index(x, y, z)].as_mut() {
            if voxel.overlay != overlay {
                voxel.overlay = overlay;
                self.overlay_dirty = true;
            }
        }
    }

    /// Whether the next [`VoxelChunk::mesh`] call will rebuild geometry.
    pub fn dirty(&self) -> bool {
        self.dirty
    }

    /// Number of occupied cells.
    pub fn occupied(&self) -> usize {
        self.solid.count_ones()
    }

    /// Visits every occupied cell in ascending linear-index order.
    pub(crate) fn iter_occupied(&self) -> impl Iterator<Item = ((i32, i32, i32), &Voxel)> {
        self.voxels.iter().enumerate().filter_map(|(index, slot)| {
            let voxel = slot.as_ref()?;
            let x = index % CHUNK_DIMENSION;
            let y = (index / CHUNK_DIMENSION) % CHUNK_DIMENSION;
            let z = index / (CHUNK_DIMENSION * CHUNK_DIMENSION);
            Some(((x as i32, y as i32, z as i32), voxel))
        })
    }

    /// The mesh for the current grid, rebuilding it first if any voxel was
    /// added or removed since the last build. Overlay-only edits refresh
    /// just the overlay channels.
    ///
    /// # Errors
    /// [`MeshError::AtlasCellOutOfRange`] if any voxel references a cell
    /// outside the atlas; the chunk stays dirty so a corrected atlas or
    /// grid can retry.
    pub fn mesh(
        &mut self,
        atlas: &TextureAtlas,
        layout: &dyn Layout,
    ) -> Result<&MeshBuffers, MeshError> {
        if self.dirty || self.buffers.is_none() {
            let started = Instant::now();
            let buffers = mesh::build(self, atlas, layout)?;
            debug!(
                "rebuilt chunk mesh in {:?} ({} occupied cells)",
                started.elapsed(),
                self.occupied()
            );
            self.buffers = Some(buffers);
            self.dirty = false;
            self.overlay_dirty = false;
        } else if self.overlay_dirty {
            let (overlay_uvs, overlay_flags) = mesh::build_overlay(self, atlas, layout)?;
            if let Some(buffers) = self.buffers.as_mut() {
                buffers.overlay_uvs = overlay_uvs;
                buffers.overlay_flags = overlay_flags;
            }
            self.overlay_dirty = false;
        }
        Ok(self
            .buffers
            .as_ref()
            .expect("buffers were just built"))
    }
}
