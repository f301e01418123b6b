//! # Selection Module
//!
//! Ray picking against collider boxes. The selector does a linear scan over
//! the candidate colliders and keeps the nearest slab-test hit inside its
//! distance bound. No spatial index is used; at selection reach (around 20
//! units) the candidate count is small.

use std::collections::HashSet;

use cgmath::{InnerSpace, Point3, Vector3};
use thiserror::Error;

use crate::entity::EntityId;
use crate::physics::Aabb;

/// Errors raised by ray picking.
#[derive(Debug, Error, PartialEq)]
pub enum SelectionError {
    /// The ray direction has zero length, so no meaningful intersection
    /// exists.
    #[error("selection ray has a zero-length direction")]
    DegenerateRay,
}

/// A picking ray, usually built from the camera position and forward vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point3<f32>,
    pub direction: Vector3<f32>,
}

impl Ray {
    pub fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Self {
        Ray { origin, direction }
    }
}

/// One collider offered to the selector.
#[derive(Debug, Clone)]
pub struct PickTarget {
    pub entity: EntityId,
    pub tag: String,
    pub aabb: Aabb,
}

/// The nearest collider hit by a pick, with its entry distance along the ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    pub entity: EntityId,
    pub distance: f32,
}

/// Entry and exit distances of a ray through a box, from the slab test.
///
/// `near` is clamped to zero when the origin is inside (or exactly on) the
/// box, so it is always a valid distance along the ray.
pub fn intersect_ray(ray: &Ray, aabb: &Aabb) -> Option<(f32, f32)> {
    let mut t_min = f32::NEG_INFINITY;
    let mut t_max = f32::INFINITY;

    for axis in 0..3 {
        let origin = ray.origin[axis];
        let direction = ray.direction[axis];
        let (min, max) = (aabb.min[axis], aabb.max[axis]);
        if direction == 0.0 {
            // Parallel to this slab: a miss unless the origin lies within it.
            if origin < min || origin > max {
                return None;
            }
            continue;
        }
        let t1 = (min - origin) / direction;
        let t2 = (max - origin) / direction;
        let (t1, t2) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };
        t_min = t_min.max(t1);
        t_max = t_max.min(t2);
        if t_min > t_max {
            return None;
        }
    }

    // The whole box is behind the origin.
    if t_max < 0.0 {
        return None;
    }
    Some((t_min.max(0.0), t_max))
}

/// Linear-scan ray picker with distance bound and exclusion sets.
#[derive(Debug, Clone)]
pub struct Selector {
    max_distance: f32,
    exclude_ids: HashSet<EntityId>,
    exclude_tags: HashSet<String>,
}

impl Selector {
    /// Creates a selector reaching at most `max_distance` along the ray.
    pub fn new(max_distance: f32) -> Self {
        Selector {
            max_distance,
            exclude_ids: HashSet::new(),
            exclude_tags: HashSet::new(),
        }
    }

    /// Excludes a specific entity from picking, typically the one holding
    /// the camera.
    pub fn exclude_id(&mut self, entity: EntityId) -> &mut Self {
        self.exclude_ids.insert(entity);
        self
    }

    /// Excludes every entity carrying the given tag.
    pub fn exclude_tag(&mut self, tag: impl Into<String>) -> &mut Self {
        self.exclude_tags.insert(tag.into());
        self
    }

    /// Finds the candidate with the smallest entry distance below the bound.
    /// Ties keep the first candidate found, so callers wanting deterministic
    /// tie-breaks must pre-sort.
    ///
    /// # Errors
    /// [`SelectionError::DegenerateRay`] if the ray direction is zero.
    pub fn pick<I>(&self, ray: &Ray, candidates: I) -> Result<Option<Selection>, SelectionError>
    where
        I: IntoIterator<Item = PickTarget>,
    {
        if ray.direction.magnitude2() == 0.0 {
            return Err(SelectionError::DegenerateRay);
        }

        let mut best: Option<Selection> = None;
        let mut best_distance = self.max_distance;
        for candidate in candidates {
            if self.exclude_ids.contains(&candidate.entity)
                || self.exclude_tags.contains(&candidate.tag)
            {
                continue;
            }
            if let Some((near, _)) = intersect_ray(ray, &candidate.aabb) {
                if near < best_distance {
                    best_distance = near;
                    best = Some(Selection {
                        entity: candidate.entity,
                        distance: near,
                    });
                }
            }
        }
        Ok(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box_at(x: f32) -> Aabb {
        Aabb::from_center_scale(Point3::new(x, 0.0, 0.0), Vector3::new(1.0, 1.0, 1.0))
    }

    fn target(x: f32) -> PickTarget {
        PickTarget {
            entity: EntityId::new(),
            tag: String::new(),
            aabb: unit_box_at(x),
        }
    }

    #[test]
    fn origin_on_face_hits_at_zero() {
        let ray = Ray::new(Point3::new(-0.5, 0.0, 0.0), Vector3::unit_x());
        let (near, far) = intersect_ray(&ray, &unit_box_at(0.0)).unwrap();
        assert_eq!(near, 0.0);
        assert!((far - 1.0).abs() < 1e-6);
    }

    #[test]
    fn ray_pointing_away_misses() {
        let ray = Ray::new(Point3::new(-2.0, 0.0, 0.0), -Vector3::unit_x());
        assert!(intersect_ray(&ray, &unit_box_at(0.0)).is_none());
    }

    #[test]
    fn parallel_ray_outside_slab_misses() {
        let ray = Ray::new(Point3::new(0.0, 2.0, 0.0), Vector3::unit_x());
        assert!(intersect_ray(&ray, &unit_box_at(0.0)).is_none());
    }

    #[test]
    fn origin_inside_box_clamps_near_to_zero() {
        let ray = Ray::new(Point3::new(0.0, 0.0, 0.0), Vector3::unit_x());
        let (near, _) = intersect_ray(&ray, &unit_box_at(0.0)).unwrap();
        assert_eq!(near, 0.0);
    }

    #[test]
    fn nearest_candidate_wins() {
        let near = target(3.0);
        let far = target(6.0);
        let ray = Ray::new(Point3::new(0.0, 0.0, 0.0), Vector3::unit_x());
        let hit = Selector::new(20.0)
            .pick(&ray, vec![far, near.clone()])
            .unwrap()
            .unwrap();
        assert_eq!(hit.entity, near.entity);
        assert!((hit.distance - 2.5).abs() < 1e-6);
    }

    #[test]
    fn hits_beyond_the_bound_are_ignored() {
        let ray = Ray::new(Point3::new(0.0, 0.0, 0.0), Vector3::unit_x());
        let hit = Selector::new(2.0).pick(&ray, vec![target(6.0)]).unwrap();
        assert!(hit.is_none());
    }

    #[test]
    fn exclusions_skip_candidates() {
        let near = target(3.0);
        let mut far = target(6.0);
        far.tag = "ghost".to_owned();
        let ray = Ray::new(Point3::new(0.0, 0.0, 0.0), Vector3::unit_x());

        let mut selector = Selector::new(20.0);
        selector.exclude_id(near.entity).exclude_tag("ghost");
        let hit = selector.pick(&ray, vec![near, far]).unwrap();
        assert!(hit.is_none());
    }

    #[test]
    fn zero_direction_is_an_error() {
        let ray = Ray::new(Point3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 0.0));
        let err = Selector::new(20.0).pick(&ray, vec![target(3.0)]).unwrap_err();
        assert_eq!(err, SelectionError::DegenerateRay);
    }
}
