//! # Box Collider Component
//!
//! The collider owns no geometry of its own: its AABB is derived on demand
//! from the owning entity's transform, so moving or rescaling the entity
//! moves the collider with it.

use std::any::Any;
use std::collections::HashSet;

use crate::entity::{Anchor, Component, Transform};

use super::aabb::Aabb;

/// An axis-aligned box collider spanning `position ± scale / 2` of the owning
/// entity's transform.
///
/// The `resolve` flag decides whether the physics tick repositions this
/// entity when it penetrates another collider. With `resolve` off the entity
/// integrates freely and only receives collision callbacks, which is the
/// behavior wanted for triggers and particles.
#[derive(Debug)]
pub struct BoxCollider {
    anchor: Anchor,
    resolve: bool,
    ignore_tags: HashSet<String>,
}

impl Default for BoxCollider {
    fn default() -> Self {
        Self::new()
    }
}

impl BoxCollider {
    /// Creates a solid collider that participates in collision resolution.
    pub fn new() -> Self {
        BoxCollider {
            anchor: Anchor::new(),
            resolve: true,
            ignore_tags: HashSet::new(),
        }
    }

    /// Creates a trigger collider: overlaps fire `on_collision` but the
    /// entity is never repositioned.
    pub fn trigger() -> Self {
        BoxCollider {
            resolve: false,
            ..Self::new()
        }
    }

    /// Whether collision resolution repositions this entity.
    pub fn resolves(&self) -> bool {
        self.resolve
    }

    /// Enables or disables collision resolution for this collider.
    pub fn set_resolve(&mut self, resolve: bool) -> &mut Self {
        self.resolve = resolve;
        self
    }

    /// Excludes entities carrying `tag` from collision with this collider.
    pub fn ignore_tag(&mut self, tag: impl Into<String>) -> &mut Self {
        self.ignore_tags.insert(tag.into());
        self
    }

    /// Whether entities with the given tag are excluded from collision.
    pub fn ignores(&self, tag: &str) -> bool {
        !tag.is_empty() && self.ignore_tags.contains(tag)
    }

    /// The current world-space bounds derived from the transform.
    pub fn aabb(&self, transform: &Transform) -> Aabb {
        Aabb::from_center_scale(transform.position(), transform.scale())
    }
}

impl Component for BoxCollider {
    fn anchor(&self) -> &Anchor {
        &self.anchor
    }
    fn anchor_mut(&mut self) -> &mut Anchor {
        &mut self.anchor
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Point3, Vector3};

    #[test]
    fn aabb_follows_transform() {
        let collider = BoxCollider::new();
        let mut transform = Transform::at(Point3::new(2.0, 0.0, 0.0));
        transform.set_scale(Vector3::new(2.0, 4.0, 6.0));
        let aabb = collider.aabb(&transform);
        assert_eq!(aabb.min, Point3::new(1.0, -2.0, -3.0));
        assert_eq!(aabb.max, Point3::new(3.0, 2.0, 3.0));
    }

    #[test]
    fn trigger_does_not_resolve() {
        assert!(!BoxCollider::trigger().resolves());
        assert!(BoxCollider::new().resolves());
    }

    #[test]
    fn empty_tag_is_never_ignored() {
        let mut collider = BoxCollider::new();
        collider.ignore_tag("debris");
        assert!(collider.ignores("debris"));
        assert!(!collider.ignores(""));
    }
}
