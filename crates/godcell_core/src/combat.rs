//! Damage application and kill rewards shared by abilities, collisions and
//! the serpent.
//!
//! Player deaths are never resolved here: damage only records the source and
//! the death system settles it later in the tick. Fauna deaths are one-shot
//! and resolved immediately, since fauna has no death state machine.

use crate::metrics;
use crate::world::{RespawnRequest, Tag, World};
use godcell_data::{
    CyberBug, DamageRecord, DamageSource, DamageTracking, Energy, EntropySerpent, JungleCreature,
    Knockback, Position,
};
use godcell_net::{
    Broadcaster, CyberBugKilled, EntropySerpentKilled, GameEvent, JungleCreatureKilled, TargetKind,
};
use hecs::Entity;

/// Removes up to `amount` energy from a player and records `source` as the
/// pending damage. Returns what was removed.
pub fn damage_player(world: &World, target: Entity, amount: f64, source: DamageSource) -> f64 {
    let taken = world
        .with_mut::<Energy, _>(target, |e| e.drain(amount))
        .unwrap_or(0.0);
    world.with_mut::<DamageTracking, _>(target, |t| {
        t.last_damage_source = Some(source);
        if let DamageSource::Beam { shooter } = source {
            t.last_beam_shooter = Some(shooter);
        }
    });
    taken
}

/// Adds a drain-rate sample for this tick's drain visualization.
pub fn record_drain(world: &World, target: Entity, source: DamageSource, damage_rate: f64) {
    world.with_mut::<DamageTracking, _>(target, |t| {
        t.active_damage.push(DamageRecord {
            damage_rate,
            kind: source.kind(),
        });
    });
}

/// Raises capacity first, then fills current energy, so a full attacker
/// still banks the whole value. Returns `(energy_gained, capacity_gained)`.
pub fn grant_reward(world: &World, recipient: Entity, energy: f64, capacity: f64) -> (f64, f64) {
    world
        .with_mut::<Energy, _>(recipient, |e| {
            if !e.is_alive() {
                return (0.0, 0.0);
            }
            e.add_capacity(capacity);
            let gained = e.gain(energy);
            (gained, capacity.max(0.0))
        })
        .unwrap_or((0.0, 0.0))
}

/// Accumulates an impulse, creating the component on first hit.
pub fn apply_knockback(world: &mut World, target: Entity, direction: (f64, f64), strength: f64) {
    let (x, y) = (direction.0 * strength, direction.1 * strength);
    if world
        .with_mut::<Knockback, _>(target, |k| k.add(x, y))
        .is_none()
    {
        let _ = world.add_component(target, Knockback { x, y });
    }
}

#[must_use]
pub fn fauna_kind(world: &World, entity: Entity) -> Option<TargetKind> {
    if world.has_tag(entity, Tag::CyberBug) {
        Some(TargetKind::CyberBug)
    } else if world.has_tag(entity, Tag::JungleCreature) {
        Some(TargetKind::JungleCreature)
    } else if world.has_tag(entity, Tag::EntropySerpent) {
        Some(TargetKind::EntropySerpent)
    } else {
        None
    }
}

/// Damages a fauna entity; on a kill, rewards the attacker, broadcasts the
/// kill, destroys the entity and queues its respawn. Returns whether it died,
/// or `None` if `target` is not living fauna.
pub fn damage_fauna(
    world: &mut World,
    broadcaster: &mut dyn Broadcaster,
    target: Entity,
    attacker: Entity,
    amount: f64,
) -> Option<bool> {
    fauna_kind(world, target)?;
    let remaining = world.with_mut::<Energy, _>(target, |e| {
        if !e.is_alive() {
            return None;
        }
        e.drain(amount);
        Some(e.current)
    })??;
    if remaining > 0.0 {
        return Some(false);
    }
    kill_fauna(world, broadcaster, target, Some(attacker));
    Some(true)
}

/// Resolves a fauna death exactly once: the entity is gone afterwards.
pub fn kill_fauna(
    world: &mut World,
    broadcaster: &mut dyn Broadcaster,
    target: Entity,
    killer: Option<Entity>,
) {
    let Some(position) = world.read::<Position>(target) else {
        return;
    };
    let config = world.config.clone();
    let now = world.now();
    let target_id = world.label(target);
    let killer_id = killer.map(|k| world.label(k)).unwrap_or_default();

    let (event, respawn, delay) = if let Some(bug) = world.read::<CyberBug>(target) {
        let (energy_gained, capacity_gained) =
            reward(world, killer, bug.value, bug.capacity_reward);
        (
            GameEvent::CyberBugKilled(CyberBugKilled {
                bug_id: target_id,
                killer_id,
                position,
                energy_gained,
                capacity_gained,
            }),
            RespawnRequest::CyberBug { home: bug.home },
            config.cyber_bug.respawn_delay_ms,
        )
    } else if let Some(creature) = world.read::<JungleCreature>(target) {
        let (energy_gained, capacity_gained) =
            reward(world, killer, creature.value, creature.capacity_reward);
        (
            GameEvent::JungleCreatureKilled(JungleCreatureKilled {
                creature_id: target_id,
                killer_id,
                variant: creature.variant,
                position,
                energy_gained,
                capacity_gained,
            }),
            RespawnRequest::JungleCreature {
                variant: creature.variant,
                home: creature.home,
            },
            config.jungle_creature.respawn_delay_ms,
        )
    } else if let Some(serpent) = world.read::<EntropySerpent>(target) {
        let (energy_gained, capacity_gained) = reward(
            world,
            killer,
            config.serpent.kill_energy,
            config.serpent.kill_capacity,
        );
        (
            GameEvent::EntropySerpentKilled(EntropySerpentKilled {
                serpent_id: target_id,
                killer_id,
                position,
                energy_gained,
                capacity_gained,
            }),
            RespawnRequest::EntropySerpent {
                home: serpent.home,
            },
            config.serpent.respawn_delay_ms,
        )
    } else {
        return;
    };

    tracing::debug!(event = event.name(), "Fauna killed");
    world.metrics.increment_counter(metrics::KILLS);
    broadcaster.broadcast(event);
    world.destroy_entity(target);
    world.respawns.push(now + delay, respawn);
}

fn reward(world: &World, killer: Option<Entity>, energy: f64, capacity: f64) -> (f64, f64) {
    killer.map_or((0.0, 0.0), |k| grant_reward(world, k, energy, capacity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::PlayerSpawn;
    use godcell_data::EvolutionStage;
    use godcell_net::EventLog;

    fn jungle_player(world: &mut World) -> Entity {
        world
            .spawn_player(PlayerSpawn {
                socket_id: "hunter".into(),
                name: "hunter".into(),
                color: "#ffffff".into(),
                stage: EvolutionStage::CyberOrganism,
                position: Position::new(100.0, 100.0),
                is_bot: false,
            })
            .expect("spawned")
    }

    #[test]
    fn full_attacker_still_banks_bug_value() {
        let mut world = World::default();
        let hunter = jungle_player(&mut world);
        let max_before = world.read::<Energy>(hunter).map(|e| e.max).unwrap_or(0.0);
        let bug = world.spawn_cyber_bug(Position::new(150.0, 100.0));
        let mut log = EventLog::new();

        let killed = damage_fauna(&mut world, &mut log, bug, hunter, 1000.0);
        assert_eq!(killed, Some(true));
        assert!(!world.is_alive(bug));
        let energy = world.read::<Energy>(hunter).expect("energy");
        assert_eq!(energy.max, max_before + world.config.cyber_bug.capacity_reward);
        assert_eq!(energy.current, max_before + world.config.cyber_bug.value);
        assert_eq!(log.count("cyberBugKilled"), 1);
        assert_eq!(world.respawns.len(), 1);
    }

    #[test]
    fn non_lethal_fauna_hit_keeps_entity() {
        let mut world = World::default();
        let hunter = jungle_player(&mut world);
        let serpent = world.spawn_serpent(Position::new(500.0, 500.0));
        let mut log = EventLog::new();
        assert_eq!(
            damage_fauna(&mut world, &mut log, serpent, hunter, 10.0),
            Some(false)
        );
        assert!(world.is_alive(serpent));
        assert_eq!(damage_fauna(&mut world, &mut log, hunter, hunter, 10.0), None);
        assert!(log.entries.is_empty());
    }

    #[test]
    fn knockback_compounds() {
        let mut world = World::default();
        let bug = world.spawn_cyber_bug(Position::new(0.0, 0.0));
        apply_knockback(&mut world, bug, (1.0, 0.0), 100.0);
        apply_knockback(&mut world, bug, (1.0, 0.0), 50.0);
        assert_eq!(world.read::<Knockback>(bug), Some(Knockback { x: 150.0, y: 0.0 }));
    }
}
