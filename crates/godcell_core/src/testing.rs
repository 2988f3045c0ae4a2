//! Fixtures for inline unit tests.

use crate::config::GameConfig;
use crate::world::{PlayerSpawn, World};
use godcell_data::{CombatSpecialization, Energy, EvolutionStage, Position, Specialization};
use hecs::Entity;

/// A seeded world with no content.
pub fn world() -> World {
    let mut config = GameConfig::default();
    config.world.seed = Some(7);
    World::new(config)
}

pub fn player(world: &mut World, socket: &str, stage: EvolutionStage, x: f64, y: f64) -> Entity {
    world
        .spawn_player(PlayerSpawn {
            socket_id: socket.to_string(),
            name: socket.to_string(),
            color: "#00ff88".into(),
            stage,
            position: Position::new(x, y),
            is_bot: false,
        })
        .expect("fixture player spawns")
}

pub fn specialize(world: &World, entity: Entity, spec: Specialization) {
    world.with_mut::<CombatSpecialization, _>(entity, |c| c.specialization = Some(spec));
}

pub fn set_energy(world: &World, entity: Entity, current: f64) {
    world.with_mut::<Energy, _>(entity, |e| e.current = current);
}

pub fn energy(world: &World, entity: Entity) -> f64 {
    world.read::<Energy>(entity).map_or(f64::NAN, |e| e.current)
}
