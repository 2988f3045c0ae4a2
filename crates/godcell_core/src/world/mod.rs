//! The component store.
//!
//! [`World`] wraps a `hecs` world (generational handles, one component of each
//! type per entity) and keeps three side structures in lockstep with it: the
//! tag index, the string-id index and the socket-id index. Only
//! [`World::destroy_entity`] tears an entity down, and it purges all three.
//!
//! Component access follows `hecs` runtime borrow rules: a `RefMut<T>` locks
//! the whole `T` column of the entity's archetype. Systems copy values out
//! with [`World::read`] or mutate inside [`World::with_mut`] so no two borrows
//! of one column overlap.

mod factory;
pub mod index;
pub mod schedule;
pub mod tags;

pub use factory::PlayerSpawn;
pub use schedule::{DeadlineQueue, DeferredAction, RespawnQueue, RespawnRequest, TimerQueue};
pub use tags::Tag;

use crate::config::GameConfig;
use crate::error::{Result, WorldError};
use crate::metrics::Metrics;
use godcell_data::{
    CyberBug, EntropySerpent, Energy, JungleCreature, Obstacle, Stage, Swarm, Timestamp, Tree,
};
use godcell_net::ClientIntent;
use hecs::{Component, Entity};
use index::IdIndex;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;
use std::sync::Arc;
use tags::TagIndex;

/// Simulation time. Advanced only by the runner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SimClock {
    pub tick: u64,
    pub now_ms: Timestamp,
    pub delta_ms: f64,
}

impl SimClock {
    pub fn advance(&mut self, dt_seconds: f64) {
        self.tick += 1;
        self.delta_ms = dt_seconds * 1000.0;
        self.now_ms += self.delta_ms;
    }
}

pub struct World {
    pub ecs: hecs::World,
    pub config: Arc<GameConfig>,
    pub clock: SimClock,
    pub rng: ChaCha8Rng,
    pub timers: TimerQueue,
    pub respawns: RespawnQueue,
    pub intents: VecDeque<(String, ClientIntent)>,
    pub metrics: Arc<Metrics>,
    tags: TagIndex,
    ids: IdIndex,
    next_seq: u64,
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("entities", &self.ecs.len())
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

impl World {
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        let seed = config.world.seed.unwrap_or_else(rand::random);
        tracing::debug!(seed, fingerprint = %config.fingerprint(), "World created");
        Self {
            ecs: hecs::World::new(),
            config: Arc::new(config),
            clock: SimClock::default(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            timers: TimerQueue::default(),
            respawns: RespawnQueue::default(),
            intents: VecDeque::new(),
            metrics: Arc::new(Metrics::new()),
            tags: TagIndex::default(),
            ids: IdIndex::default(),
            next_seq: 0,
        }
    }

    #[must_use]
    pub fn now(&self) -> Timestamp {
        self.clock.now_ms
    }

    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.ecs.contains(entity)
    }

    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.ecs.len() as usize
    }

    // --- components ---

    #[must_use]
    pub fn get<T: Component>(&self, entity: Entity) -> Option<hecs::Ref<'_, T>> {
        self.ecs.get::<&T>(entity).ok()
    }

    /// Live mutable reference. Drop it before borrowing the same component
    /// type on another entity.
    #[must_use]
    pub fn get_mut<T: Component>(&self, entity: Entity) -> Option<hecs::RefMut<'_, T>> {
        self.ecs.get::<&mut T>(entity).ok()
    }

    #[must_use]
    pub fn read<T: Component + Copy>(&self, entity: Entity) -> Option<T> {
        self.get::<T>(entity).map(|r| *r)
    }

    /// Runs `f` on the component in place; `None` if it is absent.
    pub fn with_mut<T: Component, R>(
        &self,
        entity: Entity,
        f: impl FnOnce(&mut T) -> R,
    ) -> Option<R> {
        self.get_mut::<T>(entity).map(|mut c| f(&mut c))
    }

    #[must_use]
    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.ecs.entity(entity).is_ok_and(|e| e.has::<T>())
    }

    /// Attaches or replaces a component.
    pub fn add_component<T: Component>(&mut self, entity: Entity, value: T) -> Result<()> {
        self.ecs
            .insert_one(entity, value)
            .map_err(|_| WorldError::UnknownEntity(entity))
    }

    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> Option<T> {
        self.ecs.remove_one::<T>(entity).ok()
    }

    // --- tags ---

    pub fn add_tag(&mut self, entity: Entity, tag: Tag) {
        if self.is_alive(entity) {
            self.tags.insert(entity, tag);
        }
    }

    pub fn remove_tag(&mut self, entity: Entity, tag: Tag) -> bool {
        self.tags.remove(entity, tag)
    }

    #[must_use]
    pub fn has_tag(&self, entity: Entity, tag: Tag) -> bool {
        self.tags.has(entity, tag)
    }

    /// Snapshot of the tagged set, safe to hold across mutation.
    #[must_use]
    pub fn tagged(&self, tag: Tag) -> Vec<Entity> {
        self.tags.iter(tag).collect()
    }

    pub fn for_each_with_tag(&self, tag: Tag, mut f: impl FnMut(Entity)) {
        for entity in self.tags.iter(tag) {
            f(entity);
        }
    }

    #[must_use]
    pub fn count_tag(&self, tag: Tag) -> usize {
        self.tags.count(tag)
    }

    // --- external ids ---

    pub(crate) fn alloc_id(&mut self, prefix: &str) -> String {
        self.next_seq += 1;
        format!("{prefix}-{}", self.next_seq)
    }

    /// Binds a caller-chosen string id to a live entity.
    pub fn assign_string_id(&mut self, entity: Entity, id: &str) -> Result<()> {
        if !self.is_alive(entity) {
            return Err(WorldError::UnknownEntity(entity));
        }
        self.ids.bind_string(entity, id)
    }

    pub fn assign_socket_id(&mut self, entity: Entity, socket_id: &str) -> Result<()> {
        if !self.is_alive(entity) {
            return Err(WorldError::UnknownEntity(entity));
        }
        self.ids.bind_socket(entity, socket_id)
    }

    #[must_use]
    pub fn entity_by_id(&self, id: &str) -> Option<Entity> {
        self.ids.by_string(id)
    }

    #[must_use]
    pub fn entity_by_socket(&self, socket_id: &str) -> Option<Entity> {
        self.ids.by_socket(socket_id)
    }

    #[must_use]
    pub fn id_of(&self, entity: Entity) -> Option<&str> {
        self.ids.string_of(entity)
    }

    #[must_use]
    pub fn socket_of(&self, entity: Entity) -> Option<&str> {
        self.ids.socket_of(entity)
    }

    /// External id for event payloads.
    #[must_use]
    pub fn label(&self, entity: Entity) -> String {
        self.id_of(entity).map(str::to_string).unwrap_or_default()
    }

    #[must_use]
    pub fn connected_players(&self) -> usize {
        self.ids.socket_count()
    }

    // --- teardown ---

    /// Removes the entity, its tags and its ids. Dead handles return `false`.
    pub fn destroy_entity(&mut self, entity: Entity) -> bool {
        self.tags.purge(entity);
        self.ids.purge(entity);
        self.ecs.despawn(entity).is_ok()
    }

    // --- shared queries ---

    /// Living (energy above zero) and not shielded by an evolution.
    #[must_use]
    pub fn is_targetable(&self, entity: Entity) -> bool {
        let alive = self.read::<Energy>(entity).is_some_and(|e| e.is_alive());
        let evolving = self.read::<Stage>(entity).is_some_and(|s| s.is_evolving);
        alive && !evolving
    }

    /// Collision radius of anything that has one.
    #[must_use]
    pub fn radius_of(&self, entity: Entity) -> f64 {
        if let Some(stage) = self.read::<Stage>(entity) {
            return stage.radius;
        }
        if let Some(c) = self.read::<CyberBug>(entity) {
            return c.radius;
        }
        if let Some(c) = self.read::<JungleCreature>(entity) {
            return c.radius;
        }
        if let Some(c) = self.read::<EntropySerpent>(entity) {
            return c.radius;
        }
        if let Some(c) = self.read::<Swarm>(entity) {
            return c.radius;
        }
        if let Some(t) = self.read::<Tree>(entity) {
            return t.radius;
        }
        if let Some(o) = self.read::<Obstacle>(entity) {
            return o.radius;
        }
        if self.has_tag(entity, Tag::DataFruit) {
            return self.config.resources.fruit_radius;
        }
        if self.has_tag(entity, Tag::Nutrient) {
            return self.config.resources.nutrient_radius;
        }
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use godcell_data::{Position, Stunned};

    #[test]
    fn destroy_is_idempotent_and_purges_indices() {
        let mut world = World::default();
        let e = world.ecs.spawn((Position::new(1.0, 1.0),));
        world.add_tag(e, Tag::CyberBug);
        world.assign_string_id(e, "bug-1").expect("fresh id");
        world.assign_socket_id(e, "sock").expect("fresh socket");

        assert!(world.destroy_entity(e));
        assert!(!world.destroy_entity(e));
        assert_eq!(world.entity_by_id("bug-1"), None);
        assert_eq!(world.entity_by_socket("sock"), None);
        assert!(world.tagged(Tag::CyberBug).is_empty());
        assert!(world.get::<Position>(e).is_none());
    }

    #[test]
    fn live_reference_mutation_is_visible() {
        let mut world = World::default();
        let e = world.ecs.spawn((Stunned::default(),));
        if let Some(mut s) = world.get_mut::<Stunned>(e) {
            s.until = 500.0;
        }
        assert_eq!(world.read::<Stunned>(e).map(|s| s.until), Some(500.0));
        assert!(world.has::<Stunned>(e));
        assert!(!world.has::<Position>(e));
    }

    #[test]
    fn add_component_on_dead_handle_fails() {
        let mut world = World::default();
        let e = world.ecs.spawn((Stunned::default(),));
        world.destroy_entity(e);
        assert_eq!(
            world.add_component(e, Position::default()),
            Err(WorldError::UnknownEntity(e))
        );
        world.add_tag(e, Tag::Player);
        assert_eq!(world.count_tag(Tag::Player), 0);
    }

    #[test]
    fn removing_components_and_tags() {
        let mut world = World::default();
        let e = world.ecs.spawn((Position::new(1.0, 1.0), Stunned::default()));
        world.add_tag(e, Tag::Nutrient);

        assert_eq!(world.remove_component::<Stunned>(e), Some(Stunned::default()));
        assert!(!world.has::<Stunned>(e));
        assert!(world.has::<Position>(e));
        assert_eq!(world.remove_component::<Stunned>(e), None);

        assert!(world.remove_tag(e, Tag::Nutrient));
        assert!(!world.remove_tag(e, Tag::Nutrient));
        assert_eq!(world.count_tag(Tag::Nutrient), 0);
    }

    #[test]
    fn clock_accumulates_milliseconds() {
        let mut clock = SimClock::default();
        clock.advance(0.016);
        clock.advance(0.016);
        assert_eq!(clock.tick, 2);
        assert!((clock.now_ms - 32.0).abs() < 1e-9);
    }
}
