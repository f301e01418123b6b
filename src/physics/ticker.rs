//! # Fixed Tick Clock and Pose Snapshots
//!
//! Physics advances on a fixed timestep regardless of the render rate. The
//! [`FixedTick`] accumulator converts wall-clock time into a whole number of
//! steps; [`TransformSnapshot`] is the handoff point where the physics thread
//! publishes entity poses for renderers on other threads.

use std::sync::{Arc, RwLock};

use web_time::Instant;

use crate::entity::EntityId;

/// Longest stretch of wall-clock time folded into the accumulator at once.
/// Bounds the number of catch-up steps after a stall.
const MAX_FRAME_SECONDS: f32 = 0.25;

/// Fixed-timestep accumulator.
///
/// Call [`FixedTick::advance`] once per loop iteration and run one physics
/// step per returned tick. Leftover time stays in the accumulator, so ticks
/// stay evenly spaced in simulated time even when frames are uneven.
#[derive(Debug)]
pub struct FixedTick {
    dt: f32,
    accumulator: f32,
    last: Instant,
}

impl FixedTick {
    /// Creates a clock stepping `dt` seconds per tick.
    pub fn new(dt: f32) -> Self {
        FixedTick {
            dt,
            accumulator: 0.0,
            last: Instant::now(),
        }
    }

    /// The fixed step in seconds.
    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Folds the wall-clock time since the previous call into the
    /// accumulator and returns the number of whole steps now due.
    pub fn advance(&mut self) -> u32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last).as_secs_f32();
        self.last = now;
        self.advance_by(elapsed)
    }

    /// Folds an explicit elapsed time into the accumulator. Elapsed time
    /// beyond [`MAX_FRAME_SECONDS`] is discarded.
    pub fn advance_by(&mut self, elapsed: f32) -> u32 {
        self.accumulator += elapsed.clamp(0.0, MAX_FRAME_SECONDS);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        steps
    }
}

/// The pose of one entity as of the end of a physics tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityPose {
    /// The entity this pose belongs to.
    pub entity: EntityId,
    /// World-space position.
    pub position: [f32; 3],
    /// Column-major model matrix, ready for upload.
    pub model: [[f32; 4]; 4],
}

/// Shared, cloneable view of the latest published poses.
///
/// The physics thread replaces the whole pose list at the end of each tick
/// under a single write lock; readers therefore always observe a consistent
/// tick, never a half-updated one.
#[derive(Debug, Clone, Default)]
pub struct TransformSnapshot {
    poses: Arc<RwLock<Vec<EntityPose>>>,
}

impl TransformSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the published poses with the result of a finished tick.
    pub(crate) fn publish(&self, poses: Vec<EntityPose>) {
        *self.poses.write().unwrap() = poses;
    }

    /// A copy of every pose from the most recent tick.
    pub fn poses(&self) -> Vec<EntityPose> {
        self.poses.read().unwrap().clone()
    }

    /// The most recent pose of a single entity, if it was present last tick.
    pub fn pose_of(&self, entity: EntityId) -> Option<EntityPose> {
        self.poses
            .read()
            .unwrap()
            .iter()
            .find(|pose| pose.entity == entity)
            .copied()
    }
}
