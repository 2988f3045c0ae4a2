use super::{check, commit, CooldownSlot, Gate, StageGate};
use crate::config::GameConfig;
use crate::world::{Tag, World};
use godcell_data::{EvolutionStage, Specialization, Trap};
use godcell_net::{Broadcaster, GameEvent, TrapDespawned, TrapPlaced};
use hecs::Entity;

fn gate(config: &GameConfig) -> Gate {
    Gate {
        ability: "trap",
        stage: StageGate::AtLeast(EvolutionStage::CyberOrganism),
        specialization: Some(Specialization::Traps),
        cost: config.trap.cost,
        cooldown_ms: config.trap.cooldown_ms,
        slot: CooldownSlot::Trap,
    }
}

#[must_use]
pub fn can_place_trap(world: &World, entity: Entity) -> bool {
    check(world, entity, &gate(&world.config)).is_some()
}

/// Drops a trap under the caster. An owner at the active limit loses its
/// oldest trap.
pub fn place_trap(world: &mut World, broadcaster: &mut dyn Broadcaster, entity: Entity) -> bool {
    let config = world.config.clone();
    let gate = gate(&config);
    let Some(caster) = check(world, entity, &gate) else {
        return false;
    };
    commit(world, entity, &gate);

    let mut owned: Vec<(f64, Entity)> = world
        .tagged(Tag::Trap)
        .into_iter()
        .filter_map(|t| {
            world
                .read::<Trap>(t)
                .filter(|trap| trap.owner == entity)
                .map(|trap| (trap.placed_at, t))
        })
        .collect();
    owned.sort_by(|a, b| a.0.total_cmp(&b.0));
    let excess = (owned.len() + 1).saturating_sub(config.trap.max_active);
    for &(_, oldest) in owned.iter().take(excess) {
        broadcaster.broadcast(GameEvent::TrapDespawned(TrapDespawned {
            trap_id: world.label(oldest),
        }));
        world.destroy_entity(oldest);
    }

    let trap = world.spawn_trap(entity, caster.position);
    broadcaster.broadcast(GameEvent::TrapPlaced(TrapPlaced {
        trap_id: world.label(trap),
        owner_id: world.label(entity),
        position: caster.position,
    }));
    true
}
