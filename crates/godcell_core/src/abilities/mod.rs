//! Ability resolution.
//!
//! Every ability is a pair: `can_fire_x(world, entity)` runs the gates with no
//! side effects, and `fire_x(world, broadcaster, entity, ..)` runs the same
//! gates, then commits (energy, cooldown stamp), applies the effect and
//! broadcasts one event. Gates run in a fixed order:
//!
//! 1. caster has energy, stage and position
//! 2. stage (and specialization, for jungle abilities)
//! 3. alive, not evolving, not stunned
//! 4. energy covers the cost
//! 5. cooldown elapsed for this ability's slot
//!
//! A failed gate returns `false` with nothing mutated and nothing broadcast;
//! the reason is logged at debug level.

pub mod emp;
pub mod melee;
pub mod projectile;
pub mod pseudopod;
pub mod trap;

pub use emp::{can_fire_emp, fire_emp};
pub use melee::{can_fire_melee, fire_melee};
pub use projectile::{can_fire_projectile, fire_projectile};
pub use pseudopod::{can_fire_pseudopod, fire_pseudopod};
pub use trap::{can_place_trap, place_trap};

use crate::metrics;
use crate::world::World;
use godcell_data::{
    CombatSpecialization, Cooldowns, DamageSource, DamageTracking, Energy, EvolutionStage,
    Position, Specialization, Stage, Stunned, Timestamp,
};
use hecs::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageGate {
    Exactly(EvolutionStage),
    AtLeast(EvolutionStage),
}

impl StageGate {
    #[must_use]
    pub fn admits(self, stage: EvolutionStage) -> bool {
        match self {
            Self::Exactly(s) => stage == s,
            Self::AtLeast(s) => stage >= s,
        }
    }
}

/// Which cooldown field an ability reads and stamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CooldownSlot {
    Emp,
    Pseudopod,
    Projectile,
    Swipe,
    Thrust,
    Trap,
}

impl CooldownSlot {
    #[must_use]
    pub const fn last(self, c: &Cooldowns) -> Option<Timestamp> {
        match self {
            Self::Emp => c.last_emp_time,
            Self::Pseudopod => c.last_pseudopod_time,
            Self::Projectile => c.last_projectile_time,
            Self::Swipe => c.last_swipe_time,
            Self::Thrust => c.last_thrust_time,
            Self::Trap => c.last_trap_time,
        }
    }

    pub fn stamp(self, c: &mut Cooldowns, now: Timestamp) {
        let field = match self {
            Self::Emp => &mut c.last_emp_time,
            Self::Pseudopod => &mut c.last_pseudopod_time,
            Self::Projectile => &mut c.last_projectile_time,
            Self::Swipe => &mut c.last_swipe_time,
            Self::Thrust => &mut c.last_thrust_time,
            Self::Trap => &mut c.last_trap_time,
        };
        *field = Some(now);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gate {
    pub ability: &'static str,
    pub stage: StageGate,
    pub specialization: Option<Specialization>,
    pub cost: f64,
    pub cooldown_ms: f64,
    pub slot: CooldownSlot,
}

/// What the gates learned about the caster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Caster {
    pub position: Position,
    pub stage: Stage,
    pub energy: Energy,
}

fn reject(gate: &Gate, entity: Entity, reason: &'static str) -> Option<Caster> {
    tracing::debug!(ability = gate.ability, ?entity, reason, "Ability rejected");
    None
}

/// Runs all five gates without mutating anything.
pub fn check(world: &World, entity: Entity, gate: &Gate) -> Option<Caster> {
    let (Some(energy), Some(stage), Some(position)) = (
        world.read::<Energy>(entity),
        world.read::<Stage>(entity),
        world.read::<Position>(entity),
    ) else {
        return reject(gate, entity, "missing components");
    };

    if !gate.stage.admits(stage.stage) {
        return reject(gate, entity, "wrong stage");
    }
    if let Some(required) = gate.specialization {
        let chosen = world
            .read::<CombatSpecialization>(entity)
            .is_some_and(|c| c.is(required));
        if !chosen {
            return reject(gate, entity, "wrong specialization");
        }
    }

    let now = world.now();
    if !energy.is_alive() {
        return reject(gate, entity, "dead");
    }
    if stage.is_evolving {
        return reject(gate, entity, "evolving");
    }
    if world
        .read::<Stunned>(entity)
        .is_some_and(|s| s.is_active(now))
    {
        return reject(gate, entity, "stunned");
    }

    if energy.current < gate.cost {
        return reject(gate, entity, "insufficient energy");
    }

    let last = world
        .read::<Cooldowns>(entity)
        .and_then(|c| gate.slot.last(&c));
    if !Cooldowns::ready(last, now, gate.cooldown_ms) {
        return reject(gate, entity, "cooldown");
    }

    Some(Caster {
        position,
        stage,
        energy,
    })
}

/// Pays the cost and stamps the cooldown. Only called after [`check`] passed.
///
/// A caster that spends its last energy is recorded as starved so the death
/// system settles it on this tick.
pub fn commit(world: &World, entity: Entity, gate: &Gate) {
    let now = world.now();
    let emptied = world
        .with_mut::<Energy, _>(entity, |e| {
            e.current = (e.current - gate.cost).max(0.0);
            !e.is_alive()
        })
        .unwrap_or(false);
    if emptied {
        world.with_mut::<DamageTracking, _>(entity, |t| {
            t.last_damage_source = Some(DamageSource::Starvation);
        });
    }
    if world
        .with_mut::<Cooldowns, _>(entity, |c| gate.slot.stamp(c, now))
        .is_none()
    {
        tracing::warn!(?entity, ability = gate.ability, "Caster has no cooldowns");
    }
    world.metrics.increment_counter(metrics::ABILITIES_FIRED);
}

/// Unit vector from the caster toward an aim point.
pub(crate) fn aim(from: &Position, target_x: f64, target_y: f64) -> Option<(f64, f64)> {
    crate::geometry::normalize(target_x - from.x, target_y - from.y)
}
