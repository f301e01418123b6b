//! # Spatial Core
//!
//! The spatial object core of a real-time 3D engine: a component-based
//! entity model, fixed-tick axis-separated box physics, ray picking,
//! frustum culling, and a face-culled voxel chunk mesher with texture
//! atlas mapping.
//!
//! The crate draws nothing and opens no windows. Hosts implement
//! [`render::RenderSink`] and [`render::CameraSource`], push entities and
//! chunks into a [`scene::Scene`], and drive it from their loop:
//!
//! ```no_run
//! use cgmath::{Point3, Vector3};
//! use spatial_core::entity::Entity;
//! use spatial_core::physics::{BoxCollider, PhysicsBody};
//! use spatial_core::scene::Scene;
//!
//! let mut scene = Scene::new();
//! let mut player = Entity::with_tag("player");
//! player.attach(BoxCollider::new()).unwrap();
//! player.attach(PhysicsBody::new()).unwrap();
//! player
//!     .get_mut::<PhysicsBody>()
//!     .unwrap()
//!     .set_acceleration(Vector3::new(0.0, -9.8, 0.0));
//! let player = scene.add_entity(player);
//!
//! loop {
//!     scene.advance(); // runs the fixed physics ticks now due
//!     scene.update();
//!     let position = scene.entity(player).unwrap().transform.position();
//!     # let _: Point3<f32> = position;
//!     # break;
//! }
//! ```
//!
//! Physics may instead run on its own thread; renderers then read poses
//! through the [`physics::TransformSnapshot`] handle, which always serves
//! whole ticks.

pub mod config;
pub mod culling;
pub mod entity;
pub mod event;
pub mod physics;
pub mod render;
pub mod scene;
pub mod selection;
pub mod voxel;

pub use config::CoreConfig;
pub use entity::{Component, ComponentError, Entity, EntityId, Transform};
pub use event::{EventBus, EventKind, SpatialEvent};
pub use physics::{Aabb, BoxCollider, PhysicsBody, TransformSnapshot};
pub use scene::Scene;
pub use selection::{Ray, Selection, SelectionError, Selector};
pub use voxel::{MeshError, TextureAtlas, VoxelChunk, VoxelKind};
