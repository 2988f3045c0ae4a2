//! Metabolism, evolution, death, timers, respawns and the damage summary.

mod damage_tracking;
mod death;
mod deferred;
mod metabolism;
mod respawn;

pub use damage_tracking::DamageTrackingSystem;
pub use death::DeathSystem;
pub use deferred::DeferredActionSystem;
pub use metabolism::MetabolismSystem;
pub use respawn::RespawnSystem;

use crate::world::World;
use godcell_data::{CombatSpecialization, EvolutionStage, Specialization, Stage};
use godcell_net::{Broadcaster, GameEvent, SpecializationSelected};
use hecs::Entity;
use rand::seq::SliceRandom;

/// Fixes a player's combat role. The choice is permanent for this life and
/// only open to cyber-organisms and beyond.
pub(crate) fn select_specialization(
    world: &mut World,
    broadcaster: &mut dyn Broadcaster,
    entity: Entity,
    specialization: Specialization,
) -> bool {
    let eligible = world
        .read::<Stage>(entity)
        .is_some_and(|s| s.stage >= EvolutionStage::CyberOrganism);
    if !eligible {
        return false;
    }
    let chosen = world
        .with_mut::<CombatSpecialization, _>(entity, |c| {
            if c.specialization.is_some() {
                return false;
            }
            c.specialization = Some(specialization);
            true
        })
        .unwrap_or(false);
    if chosen {
        tracing::debug!(player = %world.label(entity), ?specialization, "Specialization selected");
        broadcaster.broadcast(GameEvent::SpecializationSelected(SpecializationSelected {
            player_id: world.label(entity),
            specialization,
        }));
    }
    chosen
}

/// Picks a specialization at random for players who never chose.
pub(crate) fn assign_random_specialization(
    world: &mut World,
    broadcaster: &mut dyn Broadcaster,
    entity: Entity,
) -> bool {
    let pick = Specialization::ALL
        .choose(&mut world.rng)
        .copied()
        .unwrap_or(Specialization::Melee);
    select_specialization(world, broadcaster, entity, pick)
}
