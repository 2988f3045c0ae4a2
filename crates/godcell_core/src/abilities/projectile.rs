//! Ranged specialization: a travelling bolt that stops at its first hit.

use super::{aim, check, commit, CooldownSlot, Gate, StageGate};
use crate::combat::{damage_fauna, damage_player, fauna_kind, record_drain};
use crate::config::GameConfig;
use crate::geometry::{segment_hits_circle, segment_param};
use crate::world::{Tag, World};
use godcell_data::{
    DamageSource, Energy, EvolutionStage, Position, Projectile, Specialization, Stage,
};
use godcell_net::{
    Broadcaster, GameEvent, ProjectileFired, ProjectileHit, ProjectileRetracted, TargetKind,
};
use hecs::Entity;

fn gate(config: &GameConfig) -> Gate {
    Gate {
        ability: "projectile",
        stage: StageGate::AtLeast(EvolutionStage::CyberOrganism),
        specialization: Some(Specialization::Ranged),
        cost: config.projectile.cost,
        cooldown_ms: config.projectile.cooldown_ms,
        slot: CooldownSlot::Projectile,
    }
}

#[must_use]
pub fn can_fire_projectile(world: &World, entity: Entity) -> bool {
    check(world, entity, &gate(&world.config)).is_some()
}

/// Spawns a projectile and resolves anything already overlapping its origin
/// in the same call.
pub fn fire_projectile(
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
        tracing::debug!(?entity, "Projectile aimed at itself");
        return false;
    };
    commit(world, entity, &gate);

    let projectile = world.spawn_projectile(entity, caster.position, direction);
    broadcaster.broadcast(GameEvent::ProjectileFired(ProjectileFired {
        projectile_id: world.label(projectile),
        player_id: world.label(entity),
        position: caster.position,
        target: Position::new(target_x, target_y),
    }));
    step_projectile(world, broadcaster, projectile, 0.0);
    true
}

/// Moves a projectile `distance` pixels and resolves at most one hit along
/// the swept segment. Returns `false` once the projectile is gone.
pub(crate) fn step_projectile(
    world: &mut World,
    broadcaster: &mut dyn Broadcaster,
    projectile: Entity,
    distance: f64,
) -> bool {
    let (Some(mut bolt), Some(from)) = (
        world.read::<Projectile>(projectile),
        world.read::<Position>(projectile),
    ) else {
        return false;
    };
    let step = distance.min(bolt.max_distance - bolt.traveled).max(0.0);
    let to = Position::new(
        from.x + bolt.direction.0 * step,
        from.y + bolt.direction.1 * step,
    );
    bolt.traveled += step;

    if let Some((target, kind)) = first_hit(world, &bolt, &from, &to) {
        resolve_hit(world, broadcaster, projectile, &bolt, target, kind);
        world.destroy_entity(projectile);
        return false;
    }

    if bolt.traveled >= bolt.max_distance {
        broadcaster.broadcast(GameEvent::ProjectileRetracted(ProjectileRetracted {
            projectile_id: world.label(projectile),
        }));
        world.destroy_entity(projectile);
        return false;
    }

    world.with_mut::<Position, _>(projectile, |p| *p = to);
    world.with_mut::<Projectile, _>(projectile, |p| p.traveled = bolt.traveled);
    true
}

/// Nearest qualifying target along `from → to`. Players win exact ties.
fn first_hit(
    world: &World,
    bolt: &Projectile,
    from: &Position,
    to: &Position,
) -> Option<(Entity, TargetKind)> {
    let along = |e: Entity| {
        let pos = world.read::<Position>(e)?;
        segment_hits_circle(from, to, &pos, world.radius_of(e) + bolt.radius)
            .then(|| segment_param(from, to, &pos))
    };

    let players = world.tagged(Tag::Player).into_iter().filter_map(|p| {
        let eligible = p != bolt.owner
            && world.is_targetable(p)
            && world
                .read::<Stage>(p)
                .is_some_and(|s| s.stage.is_jungle());
        if !eligible {
            return None;
        }
        Some((along(p)?, p, TargetKind::Player))
    });
    let fauna = [Tag::CyberBug, Tag::JungleCreature, Tag::EntropySerpent]
        .into_iter()
        .flat_map(|tag| world.tagged(tag))
        .filter(|&f| world.read::<Energy>(f).is_some_and(|e| e.is_alive()))
        .filter_map(|f| Some((along(f)?, f, fauna_kind(world, f)?)));

    players
        .chain(fauna)
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, entity, kind)| (entity, kind))
}

fn resolve_hit(
    world: &mut World,
    broadcaster: &mut dyn Broadcaster,
    projectile: Entity,
    bolt: &Projectile,
    target: Entity,
    kind: TargetKind,
) {
    let position = world.read::<Position>(target).unwrap_or_default();
    let target_id = world.label(target);
    let killed = if kind == TargetKind::Player {
        let source = DamageSource::Projectile {
            shooter: bolt.owner,
        };
        damage_player(world, target, bolt.damage, source);
        record_drain(world, target, source, bolt.damage);
        world
            .read::<Energy>(target)
            .is_some_and(|e| !e.is_alive())
    } else {
        damage_fauna(world, broadcaster, target, bolt.owner, bolt.damage).unwrap_or(false)
    };
    broadcaster.broadcast(GameEvent::ProjectileHit(ProjectileHit {
        projectile_id: world.label(projectile),
        shooter_id: world.label(bolt.owner),
        target_id,
        target_kind: kind,
        damage: bolt.damage,
        killed,
        position,
    }));
}
