//! Soup-stage energy beam.
//!
//! In beam mode the pseudopod travels and is resolved by the pseudopod
//! collision system. In strike mode the hit is resolved at fire time with an
//! arc test; the spawned entity is only the visual. Either way the pseudopod
//! retracts through a deferred action once spent.

use super::{aim, check, commit, CooldownSlot, Gate, StageGate};
use crate::combat::{damage_player, record_drain};
use crate::config::GameConfig;
use crate::geometry::ArcTest;
use crate::world::{DeferredAction, Tag, World};
use godcell_data::{
    DamageSource, DamageTracking, EvolutionStage, Position, Pseudopod, PseudopodMode, Stage,
};
use godcell_net::{Broadcaster, GameEvent, PseudopodFired, PseudopodHit};
use hecs::Entity;

fn gate(config: &GameConfig) -> Gate {
    Gate {
        ability: "pseudopod",
        stage: StageGate::Exactly(EvolutionStage::MultiCell),
        specialization: None,
        cost: config.pseudopod.cost,
        cooldown_ms: config.pseudopod.cooldown_ms,
        slot: CooldownSlot::Pseudopod,
    }
}

#[must_use]
pub fn can_fire_pseudopod(world: &World, entity: Entity) -> bool {
    check(world, entity, &gate(&world.config)).is_some()
}

pub fn fire_pseudopod(
    world: &mut World,
    broadcaster: &mut dyn Broadcaster,
    entity: Entity,
    target_x: f64,
    target_y: f64,
) -> bool {
    let config = world.config.clone();
    let gate = gate(&config);
    let Some(caster) = check(world, entity, &gate) else {
        return false;
    };
    let Some(direction) = aim(&caster.position, target_x, target_y) else {
        tracing::debug!(?entity, "Pseudopod aimed at itself");
        return false;
    };
    commit(world, entity, &gate);

    let cfg = &config.pseudopod;
    let pseudopod = world.spawn_pseudopod(entity, caster.position, direction, cfg.mode);
    let reach = Position::new(
        caster.position.x + direction.0 * cfg.range,
        caster.position.y + direction.1 * cfg.range,
    );
    broadcaster.broadcast(GameEvent::PseudopodFired(PseudopodFired {
        pseudopod_id: world.label(pseudopod),
        player_id: world.label(entity),
        position: caster.position,
        target: reach,
    }));

    if cfg.mode == PseudopodMode::Strike {
        let arc = ArcTest {
            origin: caster.position,
            facing: direction.1.atan2(direction.0),
            min_range: 0.0,
            max_range: cfg.range,
            half_arc: cfg.strike_half_arc,
        };
        let victim = world.tagged(Tag::Player).into_iter().find(|&p| {
            p != entity
                && is_beam_target(world, p)
                && world
                    .read::<Position>(p)
                    .is_some_and(|pos| arc.hits(&pos, world.radius_of(p)))
        });
        if let Some(victim) = victim {
            apply_beam_hit(world, broadcaster, pseudopod, entity, victim, cfg.damage);
        }
        retire(world, pseudopod, cfg.retract_ms);
    }
    true
}

/// Soup players only; jungle stages are out of reach.
pub(crate) fn is_beam_target(world: &World, entity: Entity) -> bool {
    world.is_targetable(entity)
        && world
            .read::<Stage>(entity)
            .is_some_and(|s| s.stage.is_soup())
}

/// Damages the victim, lights its hit visual and broadcasts the hit. The
/// death system pays out beam rewards if this drained it to zero.
pub(crate) fn apply_beam_hit(
    world: &mut World,
    broadcaster: &mut dyn Broadcaster,
    pseudopod: Entity,
    shooter: Entity,
    victim: Entity,
    damage: f64,
) {
    let source = DamageSource::Beam { shooter };
    let dealt = damage_player(world, victim, damage, source);
    record_drain(world, victim, source, damage);
    let visual_until = world.now() + world.config.pseudopod.hit_visual_ms;
    world.with_mut::<DamageTracking, _>(victim, |t| {
        t.pseudopod_hit_rate = damage;
        t.pseudopod_hit_expires_at = Some(visual_until);
    });
    broadcaster.broadcast(GameEvent::PseudopodHit(PseudopodHit {
        pseudopod_id: world.label(pseudopod),
        shooter_id: world.label(shooter),
        target_id: world.label(victim),
        damage: dealt,
        position: world.read::<Position>(victim).unwrap_or_default(),
    }));
}

/// Marks the pseudopod spent and schedules its retraction.
pub(crate) fn retire(world: &mut World, pseudopod: Entity, retract_ms: f64) {
    let newly_spent = world
        .with_mut::<Pseudopod, _>(pseudopod, |p| !std::mem::replace(&mut p.spent, true))
        .unwrap_or(false);
    if newly_spent {
        let due = world.now() + retract_ms;
        world
            .timers
            .push(due, DeferredAction::RetractPseudopod { pseudopod });
    }
}
