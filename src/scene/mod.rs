//! # Scene Module
//!
//! Owns the entities and chunks, drives the fixed physics tick, routes
//! collision callbacks and events, and feeds the culled survivors of each
//! frame to the host renderer. All engine state flows through a `Scene`
//! passed explicitly by the caller; there are no global singletons.

use std::collections::{HashMap, HashSet};

use cgmath::Vector3;
use log::{trace, warn};

use crate::config::CoreConfig;
use crate::entity::{Entity, EntityId};
use crate::event::{EventBus, EventKind, SpatialEvent};
use crate::physics::resolver::{self, ColliderView};
use crate::physics::{Aabb, Axis, BoxCollider, EntityPose, FixedTick, TransformSnapshot};
use crate::render::{CameraSource, RenderSink};
use crate::selection::{PickTarget, Ray, Selection, SelectionError, Selector};
use crate::voxel::{Layout, TextureAtlas, VoxelChunk, CHUNK_DIMENSION};

struct ChunkSlot {
    origin: cgmath::Point3<f32>,
    chunk: VoxelChunk,
}

impl ChunkSlot {
    fn aabb(&self) -> Aabb {
        let edge = CHUNK_DIMENSION as f32;
        Aabb::new(self.origin, self.origin + Vector3::new(edge, edge, edge))
    }
}

/// The spatial world: entities, chunks, physics clock, and event bus.
///
/// Entities iterate in insertion order everywhere (ticks, picking,
/// rendering), so results are deterministic for a given sequence of edits.
pub struct Scene {
    config: CoreConfig,
    entities: HashMap<EntityId, Entity>,
    order: Vec<EntityId>,
    chunks: Vec<ChunkSlot>,
    events: EventBus,
    filter: crate::culling::FrustumCullingFilter,
    tick: FixedTick,
    snapshot: TransformSnapshot,
    contacts: HashSet<(EntityId, EntityId)>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Creates a scene with default configuration.
    pub fn new() -> Self {
        Self::with_config(CoreConfig::default())
    }

    /// Creates a scene with explicit tunables.
    pub fn with_config(config: CoreConfig) -> Self {
        let tick = FixedTick::new(config.physics_dt());
        Scene {
            config,
            entities: HashMap::new(),
            order: Vec::new(),
            chunks: Vec::new(),
            events: EventBus::new(),
            filter: crate::culling::FrustumCullingFilter::new(),
            tick,
            snapshot: TransformSnapshot::new(),
            contacts: HashSet::new(),
        }
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    /// Adds an entity and publishes [`SpatialEvent::EntityAdded`].
    pub fn add_entity(&mut self, entity: Entity) -> EntityId {
        let id = entity.id();
        self.entities.insert(id, entity);
        self.order.push(id);
        self.events.publish(SpatialEvent::EntityAdded(id));
        id
    }

    /// Removes an entity, running its components' removal hooks. Returns
    /// false if the id is unknown.
    pub fn remove_entity(&mut self, id: EntityId) -> bool {
        let Some(mut entity) = self.entities.remove(&id) else {
            return false;
        };
        self.order.retain(|known| *known != id);
        entity.dispatch_removal();
        self.events.publish(SpatialEvent::EntityRemoved(id));
        true
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// The first entity carrying `tag`, in insertion order.
    pub fn entity_by_tag(&self, tag: &str) -> Option<&Entity> {
        self.order
            .iter()
            .filter_map(|id| self.entities.get(id))
            .find(|entity| entity.tag() == tag)
    }

    pub fn entity_count(&self) -> usize {
        self.order.len()
    }

    /// Registers an event handler. Handlers run synchronously on publish.
    pub fn subscribe<F>(&mut self, kind: EventKind, handler: F)
    where
        F: FnMut(&SpatialEvent) + Send + 'static,
    {
        self.events.subscribe(kind, handler);
    }

    /// Adds a chunk whose minimum corner sits at `origin` in world space.
    /// Returns the slot index for later access.
    pub fn add_chunk(&mut self, origin: cgmath::Point3<f32>, chunk: VoxelChunk) -> usize {
        self.chunks.push(ChunkSlot { origin, chunk });
        self.chunks.len() - 1
    }

    pub fn chunk(&self, slot: usize) -> Option<&VoxelChunk> {
        self.chunks.get(slot).map(|slot| &slot.chunk)
    }

    pub fn chunk_mut(&mut self, slot: usize) -> Option<&mut VoxelChunk> {
        self.chunks.get_mut(slot).map(|slot| &mut slot.chunk)
    }

    /// A cloneable handle to the poses published at the end of each tick.
    /// Renderers on other threads read this instead of the live transforms.
    pub fn snapshot(&self) -> TransformSnapshot {
        self.snapshot.clone()
    }

    /// The contact pairs observed during the most recent tick.
    pub fn contacts(&self) -> &HashSet<(EntityId, EntityId)> {
        &self.contacts
    }

    /// Runs the per-frame `update` hook of every component.
    pub fn update(&mut self) {
        for id in &self.order {
            if let Some(entity) = self.entities.get_mut(id) {
                entity.dispatch_update();
            }
        }
    }

    /// Folds real elapsed time into the physics clock and runs the ticks now
    /// due. Returns how many ran.
    pub fn advance(&mut self) -> u32 {
        let steps = self.tick.advance();
        for _ in 0..steps {
            self.physics_tick();
        }
        steps
    }

    /// One fixed physics step over every entity.
    ///
    /// Each entity is taken out of the scene, given its `physics_update`
    /// hook, then swept against a captured view of everyone else's collider.
    /// Contacts are collected across the tick and fired once per pair, after
    /// all motion has settled.
    pub fn physics_tick(&mut self) {
        let dt = self.config.physics_dt();
        let mut tick_contacts: HashSet<(EntityId, EntityId)> = HashSet::new();

        let ids = self.order.clone();
        for id in ids {
            let Some(mut entity) = self.entities.remove(&id) else {
                trace!("entity {id} vanished mid-tick, skipping");
                continue;
            };
            entity.dispatch_physics_update(dt);

            let views: Vec<ColliderView> = self
                .order
                .iter()
                .filter(|other| **other != id)
                .filter_map(|other| self.entities.get(other))
                .filter_map(ColliderView::capture)
                .collect();
            for contact in resolver::step_entity(&mut entity, dt, &views) {
                tick_contacts.insert(resolver::ordered_pair(id, contact));
            }
            self.entities.insert(id, entity);
        }

        self.detect_resting_overlaps(&mut tick_contacts);

        for &(a, b) in &tick_contacts {
            if let Some(entity) = self.entities.get_mut(&a) {
                entity.dispatch_on_collision(b);
            }
            if let Some(entity) = self.entities.get_mut(&b) {
                entity.dispatch_on_collision(a);
            }
            self.events.publish(SpatialEvent::Collision { a, b });
        }
        self.contacts = tick_contacts;
        self.publish_snapshot();
    }

    /// Pairs that overlap without having been pushed apart this tick, which
    /// covers triggers and any collider with `resolve` off.
    fn detect_resting_overlaps(&self, tick_contacts: &mut HashSet<(EntityId, EntityId)>) {
        let views: Vec<ColliderView> = self
            .order
            .iter()
            .filter_map(|id| self.entities.get(id))
            .filter_map(ColliderView::capture)
            .collect();
        let epsilon = self.config.contact_epsilon;
        for i in 0..views.len() {
            for j in (i + 1)..views.len() {
                let deep_overlap = Axis::SWEEP_ORDER
                    .iter()
                    .all(|&axis| views[i].aabb.overlap_on(&views[j].aabb, axis) > epsilon);
                if deep_overlap {
                    tick_contacts.insert(resolver::ordered_pair(views[i].entity, views[j].entity));
                }
            }
        }
    }

    fn publish_snapshot(&self) {
        let poses: Vec<EntityPose> = self
            .order
            .iter()
            .filter_map(|id| self.entities.get(id))
            .map(|entity| EntityPose {
                entity: entity.id(),
                position: entity.transform.position().into(),
                model: entity.transform.model_matrix().into(),
            })
            .collect();
        self.snapshot.publish(poses);
    }

    /// Picks the nearest collider along `ray`, bounded by the configured
    /// selection distance.
    ///
    /// # Errors
    /// [`SelectionError::DegenerateRay`] for a zero direction.
    pub fn pick(&self, ray: &Ray) -> Result<Option<Selection>, SelectionError> {
        self.pick_with(ray, &Selector::new(self.config.selection_max_distance))
    }

    /// Picks with a caller-configured selector (exclusions, custom reach).
    pub fn pick_with(
        &self,
        ray: &Ray,
        selector: &Selector,
    ) -> Result<Option<Selection>, SelectionError> {
        let candidates = self
            .order
            .iter()
            .filter_map(|id| self.entities.get(id))
            .filter_map(|entity| {
                let collider = entity.get::<BoxCollider>()?;
                Some(PickTarget {
                    entity: entity.id(),
                    tag: entity.tag().to_owned(),
                    aabb: collider.aabb(&entity.transform),
                })
            });
        selector.pick(ray, candidates)
    }

    /// Culls against the camera frustum and submits the survivors: entity
    /// poses first, then each visible chunk's mesh (rebuilt here if dirty).
    ///
    /// A chunk that fails to mesh is logged and skipped; one bad chunk never
    /// takes down the frame.
    pub fn render(
        &mut self,
        camera: &dyn CameraSource,
        sink: &mut dyn RenderSink,
        atlas: &TextureAtlas,
        layout: &dyn Layout,
    ) {
        self.filter.update(camera.view_projection());

        let visible: Vec<EntityPose> = self
            .order
            .iter()
            .filter_map(|id| self.entities.get(id))
            .filter(|entity| {
                let bounds = entity
                    .get::<BoxCollider>()
                    .map(|collider| collider.aabb(&entity.transform));
                self.filter.is_visible(bounds.as_ref())
            })
            .map(|entity| EntityPose {
                entity: entity.id(),
                position: entity.transform.position().into(),
                model: entity.transform.model_matrix().into(),
            })
            .collect();
        sink.submit_entities(&visible);

        for slot in &mut self.chunks {
            if !self.filter.is_visible(Some(&slot.aabb())) {
                continue;
            }
            match slot.chunk.mesh(atlas, layout) {
                Ok(buffers) if !buffers.is_empty() => {
                    sink.submit_chunk(slot.origin, buffers, atlas.texture())
                }
                Ok(_) => {}
                Err(error) => warn!("skipping chunk at {:?}: {error}", slot.origin),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Anchor, Component};
    use crate::physics::PhysicsBody;
    use crate::render::fakes::{FixedCamera, RecordingSink};
    use crate::voxel::{BlockLayout, Voxel, VoxelKind};
    use cgmath::Point3;
    use std::any::Any;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    };

    #[derive(Default)]
    struct ContactCounter {
        anchor: Anchor,
        hits: Vec<EntityId>,
    }

    impl Component for ContactCounter {
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
        fn on_collision(&mut self, other: EntityId) {
            self.hits.push(other);
        }
    }

    fn init_logs() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn mover(position: Point3<f32>, velocity: Vector3<f32>) -> Entity {
        let mut entity = Entity::new();
        entity.transform.set_position(position);
        entity.attach(BoxCollider::new()).unwrap();
        entity.attach(PhysicsBody::new()).unwrap();
        entity
            .get_mut::<PhysicsBody>()
            .unwrap()
            .set_velocity(velocity);
        entity
    }

    fn static_wall(position: Point3<f32>) -> Entity {
        let mut entity = Entity::with_tag("wall");
        entity.transform.set_position(position);
        entity.attach(BoxCollider::new()).unwrap();
        entity
    }

    #[test]
    fn add_and_remove_publish_events() {
        let added = Arc::new(AtomicUsize::new(0));
        let removed = Arc::new(AtomicUsize::new(0));
        let mut scene = Scene::new();
        let sink = added.clone();
        scene.subscribe(EventKind::EntityAdded, move |_| {
            sink.fetch_add(1, Ordering::SeqCst);
        });
        let sink = removed.clone();
        scene.subscribe(EventKind::EntityRemoved, move |_| {
            sink.fetch_add(1, Ordering::SeqCst);
        });

        let id = scene.add_entity(Entity::with_tag("player"));
        assert!(scene.entity_by_tag("player").is_some());
        assert!(scene.remove_entity(id));
        assert!(!scene.remove_entity(id));
        assert_eq!(added.load(Ordering::SeqCst), 1);
        assert_eq!(removed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn tick_integrates_bodies() {
        let mut scene = Scene::new();
        let id = scene.add_entity(mover(
            Point3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
        ));
        scene.physics_tick();
        let x = scene.entity(id).unwrap().transform.position().x;
        assert!((x - 0.02).abs() < 1e-6);
    }

    #[test]
    fn collision_fires_hooks_on_both_sides_and_one_event() {
        init_logs();
        let events = Arc::new(Mutex::new(Vec::new()));
        let mut scene = Scene::new();
        let sink = events.clone();
        scene.subscribe(EventKind::Collision, move |event| {
            sink.lock().unwrap().push(*event);
        });

        let mut entity = mover(Point3::new(0.7, 0.0, 0.0), Vector3::new(20.0, 0.0, 0.0));
        entity.attach(ContactCounter::default()).unwrap();
        let moving = scene.add_entity(entity);
        let mut wall = static_wall(Point3::new(2.0, 0.0, 0.0));
        wall.attach(ContactCounter::default()).unwrap();
        let wall = scene.add_entity(wall);

        scene.physics_tick();

        assert_eq!(events.lock().unwrap().len(), 1);
        assert!(scene.contacts().contains(&resolver::ordered_pair(moving, wall)));
        let hits = &scene
            .entity(moving)
            .unwrap()
            .get::<ContactCounter>()
            .unwrap()
            .hits;
        assert_eq!(hits.as_slice(), &[wall]);
        let hits = &scene
            .entity(wall)
            .unwrap()
            .get::<ContactCounter>()
            .unwrap()
            .hits;
        assert_eq!(hits.as_slice(), &[moving]);
    }

    #[test]
    fn resolved_pair_does_not_overlap_after_the_tick() {
        let mut scene = Scene::new();
        let a = scene.add_entity(mover(
            Point3::new(0.0, 0.0, 0.0),
            Vector3::new(10.0, 0.0, 0.0),
        ));
        let b = scene.add_entity(mover(
            Point3::new(1.1, 0.0, 0.0),
            Vector3::new(-10.0, 0.0, 0.0),
        ));
        scene.physics_tick();

        let aabb_a = Aabb::from_center_scale(
            scene.entity(a).unwrap().transform.position(),
            Vector3::new(1.0, 1.0, 1.0),
        );
        let aabb_b = Aabb::from_center_scale(
            scene.entity(b).unwrap().transform.position(),
            Vector3::new(1.0, 1.0, 1.0),
        );
        assert!(aabb_a.overlap_on(&aabb_b, Axis::X) <= 1e-5);
    }

    #[test]
    fn trigger_overlap_fires_without_repositioning() {
        let events = Arc::new(AtomicUsize::new(0));
        let mut scene = Scene::new();
        let sink = events.clone();
        scene.subscribe(EventKind::Collision, move |_| {
            sink.fetch_add(1, Ordering::SeqCst);
        });

        let mut trigger = Entity::with_tag("pickup");
        trigger.transform.set_position(Point3::new(0.2, 0.0, 0.0));
        trigger.attach(BoxCollider::trigger()).unwrap();
        scene.add_entity(trigger);
        scene.add_entity(static_wall(Point3::new(0.0, 0.0, 0.0)));

        scene.physics_tick();

        assert_eq!(events.load(Ordering::SeqCst), 1);
        let trigger = scene.entity_by_tag("pickup").unwrap();
        assert_eq!(trigger.transform.position(), Point3::new(0.2, 0.0, 0.0));
    }

    #[test]
    fn pick_returns_the_nearest_scene_collider() {
        let mut scene = Scene::new();
        let near = scene.add_entity(static_wall(Point3::new(0.0, 0.0, -3.0)));
        scene.add_entity(static_wall(Point3::new(0.0, 0.0, -8.0)));

        let camera = FixedCamera;
        let hit = scene.pick(&camera.ray()).unwrap().unwrap();
        assert_eq!(hit.entity, near);
        assert!((hit.distance - 2.5).abs() < 1e-6);
    }

    #[test]
    fn render_culls_entities_and_meshes_chunks() {
        let mut scene = Scene::new();
        let ahead = scene.add_entity(static_wall(Point3::new(0.0, 0.0, -5.0)));
        scene.add_entity(static_wall(Point3::new(0.0, 0.0, 50.0)));

        let mut chunk = VoxelChunk::new();
        chunk.set(0, 0, 0, Voxel::new(VoxelKind::STONE));
        scene.add_chunk(Point3::new(-8.0, -8.0, -20.0), chunk);
        // A neighboring visible chunk arrives with its own origin, so the
        // host can place the two meshes apart.
        let mut neighbor = VoxelChunk::new();
        neighbor.set(0, 0, 0, Voxel::new(VoxelKind::STONE));
        scene.add_chunk(Point3::new(8.0, -8.0, -20.0), neighbor);
        // A chunk far behind the camera must not be meshed.
        let mut hidden = VoxelChunk::new();
        hidden.set(0, 0, 0, Voxel::new(VoxelKind::STONE));
        let hidden_slot = scene.add_chunk(Point3::new(0.0, 0.0, 500.0), hidden);

        let atlas = TextureAtlas::new(4, 7);
        let mut sink = RecordingSink::default();
        scene.render(&FixedCamera, &mut sink, &atlas, &BlockLayout);

        assert_eq!(sink.entities.len(), 1);
        assert_eq!(sink.entities[0].entity, ahead);
        assert_eq!(
            sink.chunks.as_slice(),
            &[
                ([-8.0, -8.0, -20.0], 6, 7),
                ([8.0, -8.0, -20.0], 6, 7),
            ]
        );
        assert!(scene.chunk(hidden_slot).unwrap().dirty());
    }

    #[test]
    fn malformed_chunk_is_skipped_not_fatal() {
        init_logs();
        let mut scene = Scene::new();
        let mut chunk = VoxelChunk::new();
        chunk.set(0, 0, 0, Voxel::with_overlay(VoxelKind::STONE, 99));
        scene.add_chunk(Point3::new(-8.0, -8.0, -20.0), chunk);

        let atlas = TextureAtlas::new(4, 0);
        let mut sink = RecordingSink::default();
        scene.render(&FixedCamera, &mut sink, &atlas, &BlockLayout);
        assert!(sink.chunks.is_empty());
    }

    #[test]
    fn snapshot_readers_never_see_torn_positions() {
        let mut scene = Scene::new();
        for i in 0..8 {
            let mut entity = Entity::new();
            entity.transform.set_position(Point3::new(i as f32, i as f32, i as f32));
            entity.attach(PhysicsBody::new()).unwrap();
            let speed = (i + 1) as f32;
            entity
                .get_mut::<PhysicsBody>()
                .unwrap()
                .set_velocity(Vector3::new(speed, speed, speed));
            scene.add_entity(entity);
        }
        let snapshot = scene.snapshot();

        let worker = std::thread::spawn(move || {
            for _ in 0..500 {
                scene.physics_tick();
            }
            scene
        });

        // Positions start on the x == y == z diagonal and velocities keep
        // them there, so a torn read shows up as a broken diagonal.
        loop {
            for pose in snapshot.poses() {
                let [x, y, z] = pose.position;
                assert!((x - y).abs() < 1e-4 && (y - z).abs() < 1e-4, "torn read: {x} {y} {z}");
            }
            if worker.is_finished() {
                break;
            }
        }
        let scene = worker.join().unwrap();
        assert_eq!(snapshot.poses().len(), scene.entity_count());
    }
}
