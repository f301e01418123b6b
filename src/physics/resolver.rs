//! # Collision Resolver
//!
//! Moves one entity through one fixed tick. Motion is separated by axis:
//! translate along X, resolve X, translate along Z, resolve Z, then the same
//! for Y. Resolving an axis immediately after translating along it means an
//! entity never tunnels diagonally through a corner that either single axis
//! would have blocked.

use cgmath::{Vector3, Zero};
use log::trace;

use crate::entity::{Entity, EntityId, Transform};

use super::aabb::{Aabb, Axis};
use super::body::PhysicsBody;
use super::collider::BoxCollider;

/// Push-out iterations per axis before the resolver gives up on a pile-up.
const MAX_RESOLVE_PASSES: usize = 16;

/// Immutable collision data captured from one entity, so the tick can mutate
/// the entity being stepped while scanning everyone else.
#[derive(Debug, Clone)]
pub(crate) struct ColliderView {
    pub entity: EntityId,
    pub tag: String,
    pub aabb: Aabb,
    pub resolve: bool,
}

impl ColliderView {
    /// Captures the collider of `entity`, if it has one.
    pub(crate) fn capture(entity: &Entity) -> Option<Self> {
        let collider = entity.get::<BoxCollider>()?;
        Some(ColliderView {
            entity: entity.id(),
            tag: entity.tag().to_owned(),
            aabb: collider.aabb(&entity.transform),
            resolve: collider.resolves(),
        })
    }
}

/// Integrates and sweeps one entity against the captured colliders of the
/// rest of the scene. Returns the ids of every entity this one was pushed
/// out of during the sweep.
pub(crate) fn step_entity(entity: &mut Entity, dt: f32, others: &[ColliderView]) -> Vec<EntityId> {
    let displacement = match entity.get_mut::<PhysicsBody>() {
        Some(body) => body.integrate(dt),
        None => Vector3::zero(),
    };

    // Indices of the colliders this entity can be pushed out of. Empty when
    // the entity has no collider or is a trigger.
    let eligible: Vec<usize> = match entity.get::<BoxCollider>() {
        Some(collider) if collider.resolves() => others
            .iter()
            .enumerate()
            .filter(|(_, other)| other.resolve && !collider.ignores(&other.tag))
            .map(|(index, _)| index)
            .collect(),
        _ => Vec::new(),
    };

    let mut contacts = Vec::new();
    for axis in Axis::SWEEP_ORDER {
        let step = displacement[axis.index()];
        if step != 0.0 {
            entity.transform.translate_by(axis.unit() * step);
        }
        if eligible.is_empty() {
            continue;
        }
        let pushed = resolve_axis(&mut entity.transform, axis, others, &eligible, &mut contacts);
        // A push on this axis means the motion was blocked; drop the blocked
        // velocity component so it does not keep accumulating into a tunnel.
        if pushed {
            if let Some(body) = entity.get_mut::<PhysicsBody>() {
                let mut velocity = body.velocity();
                velocity[axis.index()] = 0.0;
                body.set_velocity(velocity);
            }
        }
    }
    contacts
}

/// Pushes the transform out of every eligible collider it currently
/// penetrates, along a single axis. Each pass re-derives the bounds, so a
/// push out of one collider can expose a penetration of the next.
fn resolve_axis(
    transform: &mut Transform,
    axis: Axis,
    others: &[ColliderView],
    eligible: &[usize],
    contacts: &mut Vec<EntityId>,
) -> bool {
    let mut pushed = false;
    for pass in 0..MAX_RESOLVE_PASSES {
        let aabb = Aabb::from_center_scale(transform.position(), transform.scale());
        let hit = eligible
            .iter()
            .map(|&index| &others[index])
            .find(|other| aabb.overlaps(&other.aabb));
        let Some(other) = hit else {
            return pushed;
        };
        let Some(push) = aabb.push_out(&other.aabb, axis) else {
            // Overlapping in 3D but already separated on this axis; the
            // remaining axes of the sweep will handle it.
            return pushed;
        };
        transform.translate_by(axis.unit() * push);
        pushed = true;
        if !contacts.contains(&other.entity) {
            contacts.push(other.entity);
        }
        if pass == MAX_RESOLVE_PASSES - 1 {
            trace!("resolver hit the pass limit on {:?} against {}", axis, other.entity);
        }
    }
    pushed
}

/// Canonical ordering for a contact pair, so `(a, b)` and `(b, a)` collapse
/// to one entry in the scene's contact set.
pub(crate) fn ordered_pair(a: EntityId, b: EntityId) -> (EntityId, EntityId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Point3;

    fn wall_at(x: f32) -> ColliderView {
        ColliderView {
            entity: EntityId::new(),
            tag: "wall".to_owned(),
            aabb: Aabb::from_center_scale(Point3::new(x, 0.0, 0.0), Vector3::new(1.0, 1.0, 1.0)),
            resolve: true,
        }
    }

    fn mover_at(position: Point3<f32>) -> Entity {
        let mut entity = Entity::new();
        entity.transform.set_position(position);
        entity.attach(BoxCollider::new()).unwrap();
        entity.attach(PhysicsBody::new()).unwrap();
        entity
    }

    #[test]
    fn moving_into_a_wall_stops_at_exact_touch() {
        let mut entity = mover_at(Point3::new(0.9, 0.0, 0.0));
        entity
            .get_mut::<PhysicsBody>()
            .unwrap()
            .set_velocity(Vector3::new(5.0, 0.0, 0.0));
        let walls = [wall_at(2.0)];

        // One tick covers the 0.1 gap exactly; further ticks push back out.
        for _ in 0..5 {
            step_entity(&mut entity, 0.02, &walls);
        }
        let max_x = entity.transform.position().x + 0.5;
        assert!((max_x - 1.5).abs() <= 1e-5);
    }

    #[test]
    fn push_reports_the_contacted_entity() {
        let mut entity = mover_at(Point3::new(0.9, 0.0, 0.0));
        entity
            .get_mut::<PhysicsBody>()
            .unwrap()
            .set_velocity(Vector3::new(20.0, 0.0, 0.0));
        let walls = [wall_at(2.0)];
        let contacts = step_entity(&mut entity, 0.02, &walls);
        assert_eq!(contacts, vec![walls[0].entity]);
    }

    #[test]
    fn ignored_tag_passes_through() {
        let mut entity = mover_at(Point3::new(0.9, 0.0, 0.0));
        entity
            .get_mut::<BoxCollider>()
            .unwrap()
            .ignore_tag("wall");
        entity
            .get_mut::<PhysicsBody>()
            .unwrap()
            .set_velocity(Vector3::new(50.0, 0.0, 0.0));
        let walls = [wall_at(2.0)];
        let contacts = step_entity(&mut entity, 0.02, &walls);
        assert!(contacts.is_empty());
        assert!(entity.transform.position().x > 1.5);
    }

    #[test]
    fn body_without_collider_moves_freely() {
        let mut entity = Entity::new();
        entity.transform.set_position(Point3::new(0.9, 0.0, 0.0));
        entity.attach(PhysicsBody::new()).unwrap();
        entity
            .get_mut::<PhysicsBody>()
            .unwrap()
            .set_velocity(Vector3::new(50.0, 0.0, 0.0));
        step_entity(&mut entity, 0.02, &[wall_at(2.0)]);
        assert!((entity.transform.position().x - 1.9).abs() < 1e-6);
    }

    #[test]
    fn falling_body_comes_to_rest_on_a_floor() {
        let mut entity = mover_at(Point3::new(0.0, 3.0, 0.0));
        entity
            .get_mut::<PhysicsBody>()
            .unwrap()
            .set_acceleration(Vector3::new(0.0, -9.8, 0.0));
        let floor = [ColliderView {
            entity: EntityId::new(),
            tag: String::new(),
            aabb: Aabb::new(Point3::new(-10.0, -1.0, -10.0), Point3::new(10.0, 0.0, 10.0)),
            resolve: true,
        }];
        for _ in 0..200 {
            step_entity(&mut entity, 0.02, &floor);
        }
        // Resting on the floor: bottom face within epsilon of the floor top.
        let bottom = entity.transform.position().y - 0.5;
        assert!((bottom - 0.0).abs() <= 1e-5, "bottom = {bottom}");
    }

    #[test]
    fn corner_approach_resolves_each_axis_separately() {
        // Moving diagonally into a corner: X is blocked by the wall, Z keeps
        // sliding along it.
        let mut entity = mover_at(Point3::new(0.9, 0.0, 0.0));
        entity
            .get_mut::<PhysicsBody>()
            .unwrap()
            .set_velocity(Vector3::new(5.0, 0.0, 5.0));
        let walls = [ColliderView {
            entity: EntityId::new(),
            tag: String::new(),
            aabb: Aabb::new(Point3::new(1.5, -0.5, -10.0), Point3::new(2.5, 0.5, 10.0)),
            resolve: true,
        }];
        for _ in 0..10 {
            step_entity(&mut entity, 0.02, &walls);
        }
        let position = entity.transform.position();
        assert!(position.x + 0.5 <= 1.5 + 1e-5);
        assert!((position.z - 1.0).abs() < 1e-4);
    }
}
