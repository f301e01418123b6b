//! # Chunk Mesh Builder
//!
//! Turns a chunk grid into flat GPU-ready buffers. Only boundary faces are
//! emitted: a face whose neighboring cell is solid is invisible and skipped,
//! so triangle count is bounded by the visible surface. Every emitted face
//! contributes four unique vertices; nothing is shared across faces, which
//! keeps UV assignment trivial.

use cgmath::Point3;
use log::debug;

use super::atlas::TextureAtlas;
use super::chunk::VoxelChunk;
use super::layout::{Face, Layout};
use super::MeshError;

/// Flat vertex/index buffers for one chunk.
///
/// `overlay_uvs` carries a second UV channel for the overlay texture layer;
/// `overlay_flags` is 1.0 per vertex where an overlay is present and 0.0
/// where the shader should skip the overlay sample.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshBuffers {
    /// 3 floats per vertex.
    pub positions: Vec<f32>,
    /// 3 floats per vertex.
    pub normals: Vec<f32>,
    /// 2 floats per vertex, base texture channel.
    pub uvs: Vec<f32>,
    /// 2 floats per vertex, overlay channel. Zeroed where absent.
    pub overlay_uvs: Vec<f32>,
    /// 1 float per vertex.
    pub overlay_flags: Vec<f32>,
    /// 6 indices per face, two triangles.
    pub indices: Vec<u32>,
}

impl MeshBuffers {
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn face_count(&self) -> usize {
        self.vertex_count() / 4
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Interleaves the channels into one record per vertex, for hosts that
    /// upload a single vertex buffer. `bytemuck::cast_slice` turns the
    /// result into upload-ready bytes.
    pub fn interleaved(&self) -> Vec<ChunkVertex> {
        (0..self.vertex_count())
            .map(|i| ChunkVertex {
                position: [
                    self.positions[i * 3],
                    self.positions[i * 3 + 1],
                    self.positions[i * 3 + 2],
                ],
                normal: [
                    self.normals[i * 3],
                    self.normals[i * 3 + 1],
                    self.normals[i * 3 + 2],
                ],
                uv: [self.uvs[i * 2], self.uvs[i * 2 + 1]],
                overlay_uv: [self.overlay_uvs[i * 2], self.overlay_uvs[i * 2 + 1]],
                overlay_flag: self.overlay_flags[i],
            })
            .collect()
    }
}

/// One interleaved vertex of a chunk mesh, laid out to match a plain
/// `float`-only shader input. All fields are `f32`, so the struct has no
/// padding and can be cast straight to bytes.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ChunkVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    pub overlay_uv: [f32; 2],
    pub overlay_flag: f32,
}

/// Visits every visible face of the chunk in deterministic order: cells in
/// ascending linear-index order, faces in [`Face::ALL`] order.
fn visible_faces<'a>(
    chunk: &'a VoxelChunk,
) -> impl Iterator<Item = ((i32, i32, i32), &'a super::chunk::Voxel, Face)> + 'a {
    chunk.iter_occupied().flat_map(move |(cell, voxel)| {
        Face::ALL.into_iter().filter_map(move |face| {
            let (dx, dy, dz) = face.neighbor_offset();
            let (x, y, z) = cell;
            if chunk.is_solid(x + dx, y + dy, z + dz) {
                None
            } else {
                Some((cell, voxel, face))
            }
        })
    })
}

/// Builds all buffers from scratch.
///
/// # Errors
/// [`MeshError::AtlasCellOutOfRange`] if any voxel's base or overlay cell
/// lies outside the atlas. Nothing is partially emitted on error.
pub(crate) fn build(
    chunk: &VoxelChunk,
    atlas: &TextureAtlas,
    layout: &dyn Layout,
) -> Result<MeshBuffers, MeshError> {
    let mut buffers = MeshBuffers::default();
    let mut base = 0u32;

    for ((x, y, z), voxel, face) in visible_faces(chunk) {
        let (x_offset, y_offset) = atlas.cell_offset(voxel.kind.atlas_cell())?;
        let position = Point3::new(x as f32, y as f32, z as f32);

        for vertex in layout.vertices(face, position) {
            buffers.positions.extend_from_slice(&vertex);
        }
        for normal in layout.normals(face) {
            buffers.normals.extend_from_slice(&normal);
        }
        for uv in layout.uvs(face, x_offset, y_offset, atlas.rows()) {
            buffers.uvs.extend_from_slice(&uv);
        }
        push_overlay(&mut buffers.overlay_uvs, &mut buffers.overlay_flags, voxel, face, atlas, layout)?;
        buffers.indices.extend_from_slice(&layout.indices(face, base));
        base += 4;
    }

    debug!(
        "meshed chunk: {} faces, {} vertices, {} indices",
        buffers.face_count(),
        buffers.vertex_count(),
        buffers.indices.len()
    );
    Ok(buffers)
}

/// Rebuilds only the overlay channels, in the same face order as
/// [`build`], so they stay aligned with the existing geometry.
pub(crate) fn build_overlay(
    chunk: &VoxelChunk,
    atlas: &TextureAtlas,
    layout: &dyn Layout,
) -> Result<(Vec<f32>, Vec<f32>), MeshError> {
    let mut overlay_uvs = Vec::new();
    let mut overlay_flags = Vec::new();
    for (_, voxel, face) in visible_faces(chunk) {
        push_overlay(&mut overlay_uvs, &mut overlay_flags, voxel, face, atlas, layout)?;
    }
    Ok((overlay_uvs, overlay_flags))
}

fn push_overlay(
    overlay_uvs: &mut Vec<f32>,
    overlay_flags: &mut Vec<f32>,
    voxel: &super::chunk::Voxel,
    face: Face,
    atlas: &TextureAtlas,
    layout: &dyn Layout,
) -> Result<(), MeshError> {
    match voxel.overlay {
        Some(cell) => {
            let (x_offset, y_offset) = atlas.cell_offset(cell)?;
            for uv in layout.uvs(face, x_offset, y_offset, atlas.rows()) {
                overlay_uvs.extend_from_slice(&uv);
            }
            overlay_flags.extend_from_slice(&[1.0; 4]);
        }
        None => {
            overlay_uvs.extend_from_slice(&[0.0; 8]);
            overlay_flags.extend_from_slice(&[0.0; 4]);
        }
    }
    Ok(())
}
