//! # Physics Module
//!
//! Fixed-timestep motion and collision for entities. The shapes are
//! axis-aligned boxes only; the resolver sweeps one axis at a time (X, Z,
//! then Y) and pushes penetrating entities out along the axis just moved.
//!
//! The scene drives this module: it steps each entity against a captured
//! view of everyone else's collider and publishes the resulting poses
//! through a [`TransformSnapshot`].

pub mod aabb;
pub mod body;
pub mod collider;
pub(crate) mod resolver;
pub mod ticker;

pub use aabb::{Aabb, Axis};
pub use body::PhysicsBody;
pub use collider::BoxCollider;
pub use ticker::{EntityPose, FixedTick, TransformSnapshot};
