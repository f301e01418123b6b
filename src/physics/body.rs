//! # Physics Body Component
//!
//! Velocity and acceleration state for an entity. The body only integrates;
//! collision response is the resolver's job.

use std::any::Any;

use cgmath::{Vector3, Zero};

use crate::entity::{Anchor, Component, Transform};

/// Gives an entity velocity and constant acceleration, integrated by the
/// fixed physics tick with symplectic Euler.
///
/// A body with no collider on the same entity moves freely through other
/// geometry.
#[derive(Debug)]
pub struct PhysicsBody {
    anchor: Anchor,
    velocity: Vector3<f32>,
    acceleration: Vector3<f32>,
}

impl Default for PhysicsBody {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsBody {
    pub fn new() -> Self {
        PhysicsBody {
            anchor: Anchor::new(),
            velocity: Vector3::zero(),
            acceleration: Vector3::zero(),
        }
    }

    /// Current velocity in units per second.
    pub fn velocity(&self) -> Vector3<f32> {
        self.velocity
    }

    /// Replaces the velocity.
    pub fn set_velocity(&mut self, velocity: Vector3<f32>) {
        self.velocity = velocity;
    }

    /// Replaces a single velocity component, leaving the others untouched.
    pub fn set_velocity_x(&mut self, x: f32) {
        self.velocity.x = x;
    }

    pub fn set_velocity_y(&mut self, y: f32) {
        self.velocity.y = y;
    }

    pub fn set_velocity_z(&mut self, z: f32) {
        self.velocity.z = z;
    }

    /// Current constant acceleration in units per second squared.
    pub fn acceleration(&self) -> Vector3<f32> {
        self.acceleration
    }

    /// Replaces the acceleration.
    pub fn set_acceleration(&mut self, acceleration: Vector3<f32>) {
        self.acceleration = acceleration;
    }

    /// Adds to the current acceleration.
    pub fn apply_acceleration(&mut self, delta: Vector3<f32>) {
        self.acceleration += delta;
    }

    /// One symplectic Euler step: acceleration folds into velocity first, the
    /// updated velocity then yields the displacement for this tick.
    pub(crate) fn integrate(&mut self, dt: f32) -> Vector3<f32> {
        self.velocity += self.acceleration * dt;
        self.velocity * dt
    }
}

impl Component for PhysicsBody {
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

    fn start(&mut self, _transform: &mut Transform) {
        self.velocity = Vector3::zero();
        self.acceleration = Vector3::zero();
    }
}
