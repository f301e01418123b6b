//! # Render Boundary Module
//!
//! The core never draws. These traits are the seam to the host renderer and
//! camera: the scene pushes visible geometry into a [`RenderSink`] and pulls
//! matrices and picking rays from a [`CameraSource`]. Hosts implement both;
//! tests use small recording fakes.

use cgmath::{Matrix4, Point3, Vector3};

use crate::physics::EntityPose;
use crate::selection::Ray;
use crate::voxel::MeshBuffers;

/// Receives the geometry that survived culling for one frame.
pub trait RenderSink {
    /// Draws one chunk mesh sampled from the texture behind `texture`.
    /// Vertex positions are chunk-local; `origin` is the world position of
    /// the chunk's minimum corner, so the host translates by it when drawing.
    fn submit_chunk(&mut self, origin: Point3<f32>, buffers: &MeshBuffers, texture: u64);

    /// Draws the listed entities at their captured poses.
    fn submit_entities(&mut self, poses: &[EntityPose]);
}

/// Supplies the camera state the core reads each frame.
pub trait CameraSource {
    fn projection(&self) -> Matrix4<f32>;
    fn view(&self) -> Matrix4<f32>;
    fn position(&self) -> Point3<f32>;
    fn forward(&self) -> Vector3<f32>;

    /// Combined matrix used for frustum extraction.
    fn view_projection(&self) -> Matrix4<f32> {
        self.projection() * self.view()
    }

    /// The picking ray along the camera forward vector.
    fn ray(&self) -> Ray {
        Ray::new(self.position(), self.forward())
    }
}
