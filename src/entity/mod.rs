//! # Entity Module
//!
//! The entity is the unit of composition in the spatial core: a container
//! identified by a stable UUID that owns one [`Transform`], a free-form tag,
//! a payload list for external systems, and at most one component per type.
//!
//! There is no deep class hierarchy here; behavior comes from attaching
//! [`Component`] implementations. The entity enforces the single-owner and
//! single-instance rules and dispatches the lifecycle hooks.

use std::any::TypeId;
use std::fmt;

use uuid::Uuid;

pub mod component;
pub mod transform;

pub use component::{Anchor, Component, ComponentError};
pub use transform::Transform;

/// Stable identifier of an entity, unique for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(Uuid);

impl EntityId {
    pub(crate) fn new() -> Self {
        EntityId(Uuid::new_v4())
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A container of components with a stable identity.
///
/// The transform is a plain public field rather than a component: every
/// entity has exactly one and it cannot be detached.
pub struct Entity {
    id: EntityId,
    tag: String,
    data: Vec<String>,
    /// The spatial state of the entity. Mutated by physics and by user code.
    pub transform: Transform,
    components: Vec<(TypeId, Box<dyn Component>)>,
}

impl Default for Entity {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity {
    /// Creates an empty entity with a fresh id, an empty tag, and a default
    /// transform.
    pub fn new() -> Self {
        Entity {
            id: EntityId::new(),
            tag: String::new(),
            data: Vec::new(),
            transform: Transform::new(),
            components: Vec::new(),
        }
    }

    /// Creates an entity carrying the given lookup tag.
    pub fn with_tag(tag: impl Into<String>) -> Self {
        Entity {
            tag: tag.into(),
            ..Self::new()
        }
    }

    /// The stable id of this entity.
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// The free-form tag used by external systems for lookup.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Replaces the tag.
    pub fn set_tag(&mut self, tag: impl Into<String>) {
        self.tag = tag.into();
    }

    /// The free-form payload list owned by this entity.
    pub fn data(&self) -> &[String] {
        &self.data
    }

    /// Mutable access to the payload list.
    pub fn data_mut(&mut self) -> &mut Vec<String> {
        &mut self.data
    }

    /// Attaches a component, binding it to this entity for life and running
    /// its `start` hook.
    ///
    /// # Errors
    /// * [`ComponentError::AlreadyOwned`] if the component was ever attached
    ///   to an entity before. The component is dropped; the original owner
    ///   keeps its instance.
    /// * [`ComponentError::DuplicateComponent`] if this entity already holds
    ///   a component of the same type.
    pub fn attach<C: Component>(&mut self, mut component: C) -> Result<&mut C, ComponentError> {
        let type_id = TypeId::of::<C>();
        if self.components.iter().any(|(id, _)| *id == type_id) {
            return Err(ComponentError::DuplicateComponent(
                std::any::type_name::<C>(),
            ));
        }
        component.anchor_mut().bind(self.id)?;

        self.components.push((type_id, Box::new(component)));
        let transform = &mut self.transform;
        let boxed = &mut self
            .components
            .last_mut()
            .expect("component was just pushed")
            .1;
        boxed.start(transform);
        Ok(boxed
            .as_any_mut()
            .downcast_mut::<C>()
            .expect("component type was just checked"))
    }

    /// Returns the attached component of type `C`, if present.
    pub fn get<C: Component>(&self) -> Option<&C> {
        let type_id = TypeId::of::<C>();
        self.components
            .iter()
            .find(|(id, _)| *id == type_id)
            .and_then(|(_, c)| c.as_any().downcast_ref::<C>())
    }

    /// Returns the attached component of type `C` mutably, if present.
    pub fn get_mut<C: Component>(&mut self) -> Option<&mut C> {
        let type_id = TypeId::of::<C>();
        self.components
            .iter_mut()
            .find(|(id, _)| *id == type_id)
            .and_then(|(_, c)| c.as_any_mut().downcast_mut::<C>())
    }

    /// Whether a component of type `C` is attached.
    pub fn has<C: Component>(&self) -> bool {
        let type_id = TypeId::of::<C>();
        self.components.iter().any(|(id, _)| *id == type_id)
    }

    /// Detaches the component of type `C`, running its `on_remove` hook.
    ///
    /// The returned component stays anchored to this entity, so it can never
    /// be attached anywhere else.
    pub fn detach<C: Component>(&mut self) -> Option<Box<dyn Component>> {
        let type_id = TypeId::of::<C>();
        let index = self.components.iter().position(|(id, _)| *id == type_id)?;
        let (_, mut component) = self.components.remove(index);
        component.on_remove();
        Some(component)
    }

    pub(crate) fn dispatch_update(&mut self) {
        let transform = &mut self.transform;
        for (_, component) in &mut self.components {
            component.update(transform);
        }
    }

    pub(crate) fn dispatch_physics_update(&mut self, dt: f32) {
        let transform = &mut self.transform;
        for (_, component) in &mut self.components {
            component.physics_update(transform, dt);
        }
    }

    pub(crate) fn dispatch_on_collision(&mut self, other: EntityId) {
        for (_, component) in &mut self.components {
            component.on_collision(other);
        }
    }

    pub(crate) fn dispatch_removal(&mut self) {
        for (_, component) in &mut self.components {
            component.on_remove();
            component.cleanup();
        }
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("tag", &self.tag)
            .field("components", &self.components.len())
            .finish()
    }
}
