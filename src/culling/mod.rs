//! # Frustum Culling Module
//!
//! Visibility test for entity and chunk bounds against the camera frustum.
//! Planes are extracted from the combined projection*view matrix once per
//! frame; each test is then six plane-vs-box comparisons.

use cgmath::Matrix4;

use crate::physics::Aabb;

/// Six frustum planes as `(nx, ny, nz, d)`, where a point is inside the
/// half-space when `nx*x + ny*y + nz*z + d >= 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    planes: [[f32; 4]; 6],
}

impl Frustum {
    /// Extracts the planes from a column-major projection*view matrix using
    /// the Gribb-Hartmann row combinations.
    pub fn from_matrix(view_projection: Matrix4<f32>) -> Self {
        let m = view_projection;
        let row = |i: usize| [m[0][i], m[1][i], m[2][i], m[3][i]];
        let add = |a: [f32; 4], b: [f32; 4]| [a[0] + b[0], a[1] + b[1], a[2] + b[2], a[3] + b[3]];
        let sub = |a: [f32; 4], b: [f32; 4]| [a[0] - b[0], a[1] - b[1], a[2] - b[2], a[3] - b[3]];
        let w = row(3);
        Frustum {
            planes: [
                add(w, row(0)), // left
                sub(w, row(0)), // right
                add(w, row(1)), // bottom
                sub(w, row(1)), // top
                add(w, row(2)), // near
                sub(w, row(2)), // far
            ],
        }
    }

    /// Whether the box intersects the frustum volume.
    ///
    /// Per plane, only the corner most aligned with the plane normal is
    /// tested; if that corner is outside, the whole box is.
    pub fn intersects(&self, aabb: &Aabb) -> bool {
        for plane in &self.planes {
            let px = if plane[0] >= 0.0 { aabb.max.x } else { aabb.min.x };
            let py = if plane[1] >= 0.0 { aabb.max.y } else { aabb.min.y };
            let pz = if plane[2] >= 0.0 { aabb.max.z } else { aabb.min.z };
            if plane[0] * px + plane[1] * py + plane[2] * pz + plane[3] < 0.0 {
                return false;
            }
        }
        true
    }
}

/// Per-frame visibility filter.
///
/// Holds the frustum derived from the most recent camera update. Before the
/// first update, and for entities without a collider, everything is treated
/// as visible so decorative objects are never culled.
#[derive(Debug, Default, Clone)]
pub struct FrustumCullingFilter {
    frustum: Option<Frustum>,
}

impl FrustumCullingFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recomputes the frustum planes from the camera's projection*view
    /// matrix. Call once per frame.
    pub fn update(&mut self, view_projection: Matrix4<f32>) {
        self.frustum = Some(Frustum::from_matrix(view_projection));
    }

    /// Tests bounds for visibility. `None` bounds are always visible.
    pub fn is_visible(&self, aabb: Option<&Aabb>) -> bool {
        match (&self.frustum, aabb) {
            (Some(frustum), Some(aabb)) => frustum.intersects(aabb),
            _ => true,
        }
    }
}
