//! Player lifecycle: join, leave and respawn.

use crate::error::Result;
use crate::world::{PlayerSpawn, Tag, World};
use godcell_data::{
    Bot, CombatSpecialization, Cooldowns, DamageTracking, Energy, EvolutionStage, InputDirection,
    Knockback, Player, Position, Slowed, Stage, Stunned, Trap, Velocity,
};
use godcell_net::{Broadcaster, GameEvent, PlayerLeft, PlayerSnapshot};
use hecs::Entity;
use rand::seq::SliceRandom;

const PALETTE: [&str; 8] = [
    "#00ff88", "#00d4ff", "#ff00aa", "#ffcc00", "#aa66ff", "#ff6633", "#66ffcc", "#ff3366",
];

/// A random soup position with room for a single cell.
fn soup_spawn_point(world: &mut World) -> Position {
    let radius = world.config.stages.single_cell.radius;
    world.config.world.soup_bounds().random_point(&mut world.rng, radius)
}

/// Public view of a player, as sent in join and respawn events.
#[must_use]
pub fn snapshot(world: &World, entity: Entity) -> Option<PlayerSnapshot> {
    let player = world.get::<Player>(entity)?;
    let energy = world.read::<Energy>(entity)?;
    let stage = world.read::<Stage>(entity)?;
    Some(PlayerSnapshot {
        player_id: world.label(entity),
        name: player.name.clone(),
        color: player.color.clone(),
        position: world.read::<Position>(entity)?,
        energy: energy.current,
        max_energy: energy.max,
        stage: stage.stage,
        is_bot: world.has::<Bot>(entity),
    })
}

/// Creates a single-cell player for a new connection.
pub fn join_player(
    world: &mut World,
    broadcaster: &mut dyn Broadcaster,
    socket_id: &str,
    name: &str,
) -> Result<Entity> {
    let position = soup_spawn_point(world);
    let color = PALETTE.choose(&mut world.rng).copied().unwrap_or(PALETTE[0]);
    let entity = world.spawn_player(PlayerSpawn {
        socket_id: socket_id.to_string(),
        name: name.to_string(),
        color: color.to_string(),
        stage: EvolutionStage::SingleCell,
        position,
        is_bot: false,
    })?;
    tracing::info!(socket_id, name, "Player joined");
    if let Some(snap) = snapshot(world, entity) {
        broadcaster.broadcast(GameEvent::PlayerJoined(snap));
    }
    Ok(entity)
}

/// An AI-driven player placed anywhere in the region of `stage`.
pub fn spawn_bot(
    world: &mut World,
    broadcaster: &mut dyn Broadcaster,
    stage: EvolutionStage,
) -> Result<Entity> {
    let socket_id = world.alloc_id("bot");
    let region = world.config.world.bounds_for(stage.region());
    let radius = world.config.stages.tuning(stage).radius;
    let position = region.random_point(&mut world.rng, radius);
    let color = PALETTE.choose(&mut world.rng).copied().unwrap_or(PALETTE[0]);
    let entity = world.spawn_player(PlayerSpawn {
        socket_id: socket_id.clone(),
        name: socket_id,
        color: color.to_string(),
        stage,
        position,
        is_bot: true,
    })?;
    if let Some(snap) = snapshot(world, entity) {
        broadcaster.broadcast(GameEvent::PlayerJoined(snap));
    }
    Ok(entity)
}

/// Removes a disconnected player and the traps it left behind. Unknown
/// sockets return `false`.
pub fn leave_player(world: &mut World, broadcaster: &mut dyn Broadcaster, socket_id: &str) -> bool {
    let Some(entity) = world.entity_by_socket(socket_id) else {
        return false;
    };
    let player_id = world.label(entity);
    let traps: Vec<Entity> = world
        .tagged(Tag::Trap)
        .into_iter()
        .filter(|&t| world.read::<Trap>(t).is_some_and(|trap| trap.owner == entity))
        .collect();
    for trap in traps {
        world.destroy_entity(trap);
    }
    world.destroy_entity(entity);
    tracing::info!(socket_id, "Player left");
    broadcaster.broadcast(GameEvent::PlayerLeft(PlayerLeft { player_id }));
    true
}

/// Brings a dead player back as a fresh single cell. Components are reset
/// in place; the entity handle and ids are kept. Returns `false` unless the
/// player's death has already been processed.
pub fn respawn_player(world: &mut World, broadcaster: &mut dyn Broadcaster, entity: Entity) -> bool {
    if !world.has::<Player>(entity) || !world.read::<Energy>(entity).is_some_and(|e| e.is_processed()) {
        return false;
    }
    let tuning = world.config.stages.single_cell.clone();
    let position = soup_spawn_point(world);

    world.with_mut::<Position, _>(entity, |p| *p = position);
    world.with_mut::<Velocity, _>(entity, |v| *v = Velocity::default());
    world.with_mut::<Energy, _>(entity, |e| *e = Energy::full(tuning.starting_max_energy));
    world.with_mut::<Stage, _>(entity, |s| *s = Stage::new(EvolutionStage::SingleCell, tuning.radius));
    world.with_mut::<Stunned, _>(entity, |s| *s = Stunned::default());
    world.with_mut::<Cooldowns, _>(entity, Cooldowns::reset);
    world.with_mut::<DamageTracking, _>(entity, DamageTracking::reset);
    world.with_mut::<Knockback, _>(entity, |k| *k = Knockback::default());
    world.with_mut::<Slowed, _>(entity, |s| *s = Slowed::default());
    world.with_mut::<InputDirection, _>(entity, |d| *d = InputDirection::default());
    world.with_mut::<CombatSpecialization, _>(entity, |c| {
        c.specialization = None;
        c.selection_deadline = 0.0;
    });

    tracing::info!(player = %world.label(entity), "Player respawned");
    if let Some(snap) = snapshot(world, entity) {
        broadcaster.broadcast(GameEvent::PlayerRespawned(snap));
    }
    true
}
