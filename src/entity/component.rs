//! # Component Model
//!
//! Behavior objects attached to entities. A component is owned by at most one
//! entity for its entire lifetime; the [`Anchor`] embedded in every component
//! enforces that invariant at attach time.
//!
//! ## Lifecycle
//!
//! * `start` runs once, immediately after a successful attach.
//! * `update` runs every render frame.
//! * `physics_update` runs every fixed physics tick.
//! * `on_collision` is fired by the collision resolver for every overlapping
//!   collider pair the owning entity participates in.
//! * `on_remove` runs when the component is detached or its entity removed,
//!   `cleanup` when the entity is destroyed.

use std::any::Any;

use thiserror::Error;

use super::transform::Transform;
use super::EntityId;

/// Errors raised by the entity/component attachment contract.
///
/// Both variants are programmer errors: they indicate a violation of the
/// single-owner or single-instance rules rather than bad data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ComponentError {
    /// The component is already anchored to another entity. Ownership is for
    /// life, so this also fires when re-attaching a previously detached
    /// component.
    #[error("component is already owned by entity {0}")]
    AlreadyOwned(EntityId),

    /// The entity already holds a component of this type.
    #[error("entity already has a component of type `{0}`")]
    DuplicateComponent(&'static str),
}

/// Ownership record embedded in every component.
///
/// The anchor starts unbound and is bound exactly once, when the component is
/// attached to an entity. It is never unbound again, which is what makes the
/// "at most one owner for the component's lifetime" rule hold even across a
/// detach.
#[derive(Debug, Default, Clone)]
pub struct Anchor {
    owner: Option<EntityId>,
}

impl Anchor {
    /// Creates an unbound anchor.
    pub fn new() -> Self {
        Self::default()
    }

    /// The entity this component is attached to, if any.
    pub fn owner(&self) -> Option<EntityId> {
        self.owner
    }

    pub(crate) fn bind(&mut self, owner: EntityId) -> Result<(), ComponentError> {
        match self.owner {
            Some(existing) => Err(ComponentError::AlreadyOwned(existing)),
            None => {
                self.owner = Some(owner);
                Ok(())
            }
        }
    }
}

/// A typed behavior object owned by a single entity.
///
/// Implementations embed an [`Anchor`] and expose it through `anchor` /
/// `anchor_mut`; everything else is optional lifecycle hooks with empty
/// defaults. Side effects are confined to the component's own state and the
/// owning entity's transform, which is passed into each hook.
pub trait Component: Any + Send {
    /// The ownership record for this component.
    fn anchor(&self) -> &Anchor;

    /// Mutable access to the ownership record. Used by the entity during
    /// attach; user code has no reason to call this.
    fn anchor_mut(&mut self) -> &mut Anchor;

    /// Upcast used for typed component lookup.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast used for typed component lookup.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Invoked once after the component has been attached.
    fn start(&mut self, _transform: &mut Transform) {}

    /// Invoked every render frame.
    fn update(&mut self, _transform: &mut Transform) {}

    /// Invoked every fixed physics tick with the tick delta in seconds.
    fn physics_update(&mut self, _transform: &mut Transform, _dt: f32) {}

    /// Invoked by the collision resolver when the owning entity's collider
    /// overlaps `other`'s collider during a physics tick.
    fn on_collision(&mut self, _other: EntityId) {}

    /// Invoked when the component is detached from its entity.
    fn on_remove(&mut self) {}

    /// Invoked when the owning entity is destroyed.
    fn cleanup(&mut self) {}
}
