//! # Transform
//!
//! Position, orientation and scale of a single entity. The transform is plain
//! mutable state: collision resolution writes to it on the physics tick and
//! gameplay code writes to it directly.

use cgmath::{EuclideanSpace, Matrix4, One, Point3, Quaternion, Rad, Rotation3, Vector3};

/// Stores the position, rotation, and scale of an entity.
///
/// Every entity owns exactly one `Transform`; it is created with the entity
/// and destroyed with it. The rotation defaults to the identity quaternion
/// and the scale to `(1, 1, 1)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    position: Point3<f32>,
    rotation: Quaternion<f32>,
    scale: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

impl Transform {
    /// Creates a transform at the origin with identity rotation and unit scale.
    pub fn new() -> Self {
        Transform {
            position: Point3::new(0.0, 0.0, 0.0),
            rotation: Quaternion::one(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    /// Creates a transform at the given position with identity rotation and unit scale.
    pub fn at(position: Point3<f32>) -> Self {
        Transform {
            position,
            ..Self::new()
        }
    }

    /// The current position in world space.
    pub fn position(&self) -> Point3<f32> {
        self.position
    }

    /// Moves the entity to an absolute position.
    pub fn set_position(&mut self, position: Point3<f32>) {
        self.position = position;
    }

    /// Moves the position by an offset.
    pub fn translate_by(&mut self, offset: Vector3<f32>) {
        self.position += offset;
    }

    /// The current orientation.
    pub fn rotation(&self) -> Quaternion<f32> {
        self.rotation
    }

    /// Replaces the orientation.
    pub fn set_rotation(&mut self, rotation: Quaternion<f32>) {
        self.rotation = rotation;
    }

    /// Rotates the current orientation about an axis by the given angle.
    pub fn rotate_about_axis(&mut self, angle: Rad<f32>, axis: Vector3<f32>) {
        self.rotation = Quaternion::from_axis_angle(axis, angle) * self.rotation;
    }

    /// Sets the orientation to a rotation about an axis, discarding the
    /// previous orientation.
    pub fn set_rotation_about_axis(&mut self, angle: Rad<f32>, axis: Vector3<f32>) {
        self.rotation = Quaternion::from_axis_angle(axis, angle);
    }

    /// The current scale.
    pub fn scale(&self) -> Vector3<f32> {
        self.scale
    }

    /// Replaces the scale. Colliders derive their half extents from this, so
    /// a scale of `(1, 1, 1)` produces a unit box around the position.
    pub fn set_scale(&mut self, scale: Vector3<f32>) {
        self.scale = scale;
    }

    /// Builds the model matrix (translation * rotation * scale) used by the
    /// renderer for this entity.
    pub fn model_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position.to_vec())
            * Matrix4::from(self.rotation)
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Deg, Vector4};

    #[test]
    fn defaults_are_identity() {
        let t = Transform::new();
        assert_eq!(t.position(), Point3::new(0.0, 0.0, 0.0));
        assert_eq!(t.rotation(), Quaternion::one());
        assert_eq!(t.scale(), Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn translate_accumulates() {
        let mut t = Transform::new();
        t.translate_by(Vector3::new(1.0, 2.0, 3.0));
        t.translate_by(Vector3::new(-0.5, 0.0, 0.0));
        assert_eq!(t.position(), Point3::new(0.5, 2.0, 3.0));
    }

    #[test]
    fn model_matrix_applies_translation_last() {
        let mut t = Transform::new();
        t.set_position(Point3::new(10.0, 0.0, 0.0));
        t.set_scale(Vector3::new(2.0, 2.0, 2.0));
        let m = t.model_matrix();
        let p = m * Vector4::new(1.0, 0.0, 0.0, 1.0);
        assert!((p.x - 12.0).abs() < 1e-6);
    }

    #[test]
    fn set_rotation_about_axis_discards_previous() {
        let mut t = Transform::new();
        t.rotate_about_axis(Rad::from(Deg(90.0)), Vector3::unit_y());
        t.set_rotation_about_axis(Rad(0.0), Vector3::unit_y());
        assert_eq!(t.rotation(), Quaternion::one());
    }
}
