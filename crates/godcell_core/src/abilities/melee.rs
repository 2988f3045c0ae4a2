//! Melee specialization: swipe (wide, short) and thrust (narrow, long).
//!
//! One arc pass collects every qualifying player and fauna; damage, knockback
//! and kills are applied after the pass.

use super::{aim, check, commit, CooldownSlot, Gate, StageGate};
use crate::combat::{apply_knockback, damage_fauna, damage_player, record_drain};
use crate::config::{GameConfig, MeleeAttackConfig};
use crate::geometry::{direction, ArcTest};
use crate::world::{Tag, World};
use godcell_data::{DamageSource, Energy, EvolutionStage, Position, Specialization, Stage};
use godcell_net::{Broadcaster, GameEvent, MeleeAttackExecuted, MeleeAttackType};
use hecs::Entity;

fn attack_config(config: &GameConfig, attack: MeleeAttackType) -> &MeleeAttackConfig {
    match attack {
        MeleeAttackType::Swipe => &config.melee.swipe,
        MeleeAttackType::Thrust => &config.melee.thrust,
    }
}

fn gate(config: &GameConfig, attack: MeleeAttackType) -> Gate {
    let cfg = attack_config(config, attack);
    let (ability, slot) = match attack {
        MeleeAttackType::Swipe => ("melee_swipe", CooldownSlot::Swipe),
        MeleeAttackType::Thrust => ("melee_thrust", CooldownSlot::Thrust),
    };
    Gate {
        ability,
        stage: StageGate::AtLeast(EvolutionStage::CyberOrganism),
        specialization: Some(Specialization::Melee),
        cost: cfg.cost,
        cooldown_ms: cfg.cooldown_ms,
        slot,
    }
}

#[must_use]
pub fn can_fire_melee(world: &World, entity: Entity, attack: MeleeAttackType) -> bool {
    check(world, entity, &gate(&world.config, attack)).is_some()
}

pub fn fire_melee(
    world: &mut World,
    broadcaster: &mut dyn Broadcaster,
    entity: Entity,
    attack: MeleeAttackType,
    target_x: f64,
    target_y: f64,
) -> bool {
    let config = world.config.clone();
    let gate = gate(&config, attack);
    let Some(caster) = check(world, entity, &gate) else {
        return false;
    };
    let Some(facing) = aim(&caster.position, target_x, target_y) else {
        tracing::debug!(?entity, "Melee aimed at itself");
        return false;
    };
    commit(world, entity, &gate);

    let cfg = attack_config(&config, attack);
    let arc = ArcTest {
        origin: caster.position,
        facing: facing.1.atan2(facing.0),
        min_range: cfg.min_range,
        max_range: cfg.max_range,
        half_arc: cfg.half_arc,
    };
    let in_arc = |e: Entity| {
        world
            .read::<Position>(e)
            .is_some_and(|pos| arc.hits(&pos, world.radius_of(e)))
    };

    let hit_players: Vec<Entity> = world
        .tagged(Tag::Player)
        .into_iter()
        .filter(|&p| {
            p != entity
                && world.is_targetable(p)
                && world
                    .read::<Stage>(p)
                    .is_some_and(|s| s.stage.is_jungle())
                && in_arc(p)
        })
        .collect();
    let hit_fauna: Vec<Entity> = [Tag::CyberBug, Tag::JungleCreature, Tag::EntropySerpent]
        .into_iter()
        .flat_map(|tag| world.tagged(tag))
        .filter(|&f| world.read::<Energy>(f).is_some_and(|e| e.is_alive()) && in_arc(f))
        .collect();

    let hit_player_ids: Vec<String> = hit_players.iter().map(|&p| world.label(p)).collect();
    let hit_creature_ids: Vec<String> = hit_fauna.iter().map(|&f| world.label(f)).collect();

    let push_dir = |world: &World, target: Entity| {
        world
            .read::<Position>(target)
            .and_then(|pos| direction(&caster.position, &pos))
            .unwrap_or(facing)
    };
    let source = DamageSource::Melee { attacker: entity };
    for &p in &hit_players {
        damage_player(world, p, cfg.damage, source);
        record_drain(world, p, source, cfg.damage);
        let dir = push_dir(world, p);
        apply_knockback(world, p, dir, cfg.knockback);
    }
    for &f in &hit_fauna {
        let dir = push_dir(world, f);
        apply_knockback(world, f, dir, cfg.knockback);
        damage_fauna(world, broadcaster, f, entity, cfg.damage);
    }

    broadcaster.broadcast(GameEvent::MeleeAttackExecuted(MeleeAttackExecuted {
        player_id: world.label(entity),
        attack_type: attack,
        position: caster.position,
        direction: Position::new(facing.0, facing.1),
        hit_player_ids,
        hit_creature_ids,
    }));
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{self, player, specialize};
    use godcell_data::Knockback;
    use godcell_net::EventLog;

    fn melee_world() -> (World, Entity) {
        let mut world = testing::world();
        let attacker = player(&mut world, "a", EvolutionStage::CyberOrganism, 1000.0, 1000.0);
        specialize(&world, attacker, Specialization::Melee);
        (world, attacker)
    }

    #[test]
    fn swipe_hits_everything_in_arc() {
        let (mut world, attacker) = melee_world();
        let p1 = player(&mut world, "p1", EvolutionStage::CyberOrganism, 1080.0, 1020.0);
        let p2 = player(&mut world, "p2", EvolutionStage::CyberOrganism, 1080.0, 980.0);
        let behind = player(&mut world, "p3", EvolutionStage::CyberOrganism, 920.0, 1000.0);
        let mut log = EventLog::new();

        assert!(fire_melee(&mut world, &mut log, attacker, MeleeAttackType::Swipe, 1100.0, 1000.0));
        for p in [p1, p2] {
            let e = world.read::<Energy>(p).expect("energy");
            assert_eq!(e.current, e.max - world.config.melee.swipe.damage);
            assert!(world.read::<Knockback>(p).is_some_and(|k| k.x > 0.0));
        }
        let e = world.read::<Energy>(behind).expect("energy");
        assert_eq!(e.current, e.max);
        match log.named("meleeAttackExecuted")[0] {
            GameEvent::MeleeAttackExecuted(m) => assert_eq!(m.hit_player_ids.len(), 2),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn thrust_arc_boundary_is_inclusive() {
        let (mut world, attacker) = melee_world();
        let half_arc = world.config.melee.thrust.half_arc;
        let dist = 150.0;
        let edge = player(
            &mut world,
            "edge",
            EvolutionStage::CyberOrganism,
            1000.0 + dist * half_arc.cos(),
            1000.0 + dist * half_arc.sin(),
        );
        let beyond_angle = half_arc + 1.0 / dist;
        let beyond = player(
            &mut world,
            "beyond",
            EvolutionStage::CyberOrganism,
            1000.0 + dist * beyond_angle.cos(),
            1000.0 + dist * beyond_angle.sin(),
        );
        // Shrink radii to zero so only the bearing decides.
        for p in [edge, beyond] {
            world.with_mut::<Stage, _>(p, |s| s.radius = 0.0);
        }
        let mut log = EventLog::new();

        assert!(fire_melee(&mut world, &mut log, attacker, MeleeAttackType::Thrust, 1200.0, 1000.0));
        let hit = |p: Entity| world.read::<Energy>(p).is_some_and(|e| e.current < e.max);
        assert!(hit(edge));
        assert!(!hit(beyond));
    }

    #[test]
    fn fauna_kill_rewards_attacker_once() {
        let (mut world, attacker) = melee_world();
        let bug = world.spawn_cyber_bug(Position::new(1050.0, 1000.0));
        let mut log = EventLog::new();

        assert!(fire_melee(&mut world, &mut log, attacker, MeleeAttackType::Swipe, 1100.0, 1000.0));
        assert!(!world.is_alive(bug));
        assert_eq!(log.count("cyberBugKilled"), 1);
    }

    #[test]
    fn swipe_and_thrust_have_separate_cooldowns() {
        let (mut world, attacker) = melee_world();
        let mut log = EventLog::new();
        assert!(fire_melee(&mut world, &mut log, attacker, MeleeAttackType::Swipe, 1100.0, 1000.0));
        assert!(!can_fire_melee(&world, attacker, MeleeAttackType::Swipe));
        assert!(can_fire_melee(&world, attacker, MeleeAttackType::Thrust));
    }
}
