mod common;

use common::{energy, player_at, set_energy, specialize, TestWorld};
use godcell_lib::model::abilities::{
    can_fire_emp, can_fire_projectile, fire_emp, fire_melee, fire_projectile, place_trap,
};
use godcell_lib::model::data::{DamageKind, EvolutionStage, Position, Specialization, Stunned, Swarm};
use godcell_lib::model::net::{EventLog, GameEvent, MeleeAttackType};
use godcell_lib::model::Tag;

#[test]
fn emp_disables_swarm_and_stuns_nearby_cells() {
    let mut world = TestWorld::new().build();
    let caster = player_at(&mut world, "caster", EvolutionStage::MultiCell, 2000.0, 1500.0);
    let victim = player_at(&mut world, "victim", EvolutionStage::SingleCell, 2200.0, 1500.0);
    let far = player_at(&mut world, "far", EvolutionStage::SingleCell, 3150.0, 2150.0);
    let swarm = world.spawn_swarm(Position::new(2300.0, 1500.0));
    set_energy(&world, caster, 100.0);
    let mut log = EventLog::new();

    assert!(fire_emp(&mut world, &mut log, caster));

    assert_eq!(energy(&world, caster).current, 100.0 - world.config.emp.cost);
    let until = world.now() + world.config.emp.disable_duration_ms;
    assert_eq!(world.read::<Stunned>(victim).map(|s| s.until), Some(until));
    assert!(world.read::<Stunned>(far).is_some_and(|s| !s.is_active(world.now())));
    assert_eq!(world.read::<Swarm>(swarm).and_then(|s| s.disabled_until), Some(until));

    assert_event_count!(log, "empActivated", 1);
    let emps = log.named("empActivated");
    let GameEvent::EmpActivated(emp) = emps[0] else {
        panic!("wrong event");
    };
    assert_eq!(emp.affected_player_ids, vec![world.label(victim)]);
    assert_eq!(emp.affected_swarm_ids, vec![world.label(swarm)]);
}

#[test]
fn emp_is_gated_by_cooldown() {
    let mut world = TestWorld::new().build();
    let caster = player_at(&mut world, "caster", EvolutionStage::MultiCell, 2000.0, 1500.0);
    let mut log = EventLog::new();

    assert!(fire_emp(&mut world, &mut log, caster));
    let after_first = energy(&world, caster).current;
    assert!(!can_fire_emp(&world, caster));
    assert!(!fire_emp(&mut world, &mut log, caster));
    assert_eq!(energy(&world, caster).current, after_first);

    world.clock.advance(world.config.emp.cooldown_ms / 1000.0);
    assert!(can_fire_emp(&world, caster));
    assert_event_count!(log, "empActivated", 1);
}

#[test]
fn emp_requires_multi_cell() {
    let mut world = TestWorld::new().build();
    let single = player_at(&mut world, "s", EvolutionStage::SingleCell, 2000.0, 1500.0);
    let cyber = player_at(&mut world, "c", EvolutionStage::CyberOrganism, 500.0, 500.0);
    let mut log = EventLog::new();

    assert!(!fire_emp(&mut world, &mut log, single));
    assert!(!fire_emp(&mut world, &mut log, cyber));
    assert!(log.entries.is_empty());
}

#[test]
fn ranged_shot_kills_bug_and_melee_specialist_cannot_shoot() {
    let mut world = TestWorld::new().build();
    let shooter = player_at(&mut world, "ranged", EvolutionStage::CyberOrganism, 1000.0, 1000.0);
    specialize(&world, shooter, Specialization::Ranged);
    let bug = world.spawn_cyber_bug(Position::new(1010.0, 1000.0));
    let mut log = EventLog::new();

    let expected = energy(&world, shooter).current - world.config.projectile.cost
        + world.config.cyber_bug.value;
    assert!(fire_projectile(&mut world, &mut log, shooter, 1100.0, 1000.0));
    assert_gone!(world, bug);
    assert_eq!(energy(&world, shooter).current, expected);
    assert_event_count!(log, "cyberBugKilled", 1);
    assert_event_count!(log, "projectileHit", 1);
    assert!(matches!(log.named("projectileHit")[0], GameEvent::ProjectileHit(h) if h.killed));

    let brawler = player_at(&mut world, "melee", EvolutionStage::CyberOrganism, 3000.0, 1000.0);
    specialize(&world, brawler, Specialization::Melee);
    let other_bug = world.spawn_cyber_bug(Position::new(3010.0, 1000.0));
    let before = energy(&world, brawler);
    log.clear();

    assert!(!can_fire_projectile(&world, brawler));
    assert!(!fire_projectile(&mut world, &mut log, brawler, 3100.0, 1000.0));
    assert!(world.is_alive(other_bug));
    assert_eq!(energy(&world, brawler), before);
    assert!(log.entries.is_empty());
}

#[test]
fn projectile_fires_on_exactly_its_cost() {
    let mut sim = TestWorld::new().sim();
    let shooter = player_at(&mut sim.world, "ranged", EvolutionStage::CyberOrganism, 1000.0, 1000.0);
    specialize(&sim.world, shooter, Specialization::Ranged);
    let cost = sim.world.config.projectile.cost;

    set_energy(&sim.world, shooter, cost - 1.0);
    assert!(!fire_projectile(&mut sim.world, &mut sim.log, shooter, 1500.0, 1000.0));
    assert_eq!(energy(&sim.world, shooter).current, cost - 1.0);

    set_energy(&sim.world, shooter, cost);
    assert!(fire_projectile(&mut sim.world, &mut sim.log, shooter, 1500.0, 1000.0));
    assert_eq!(energy(&sim.world, shooter).current, 0.0);
    assert_event_count!(sim.log, "projectileFired", 1);

    sim.tick();
    assert_event_count!(sim.log, "playerDied", 1);
    let deaths = sim.log.named("playerDied");
    let GameEvent::PlayerDied(died) = deaths[0] else {
        panic!("wrong event");
    };
    assert_eq!(died.cause, DamageKind::Starvation);
}

#[test]
fn swipe_arc_edges_are_inclusive() {
    let mut world = TestWorld::new().build();
    let attacker = player_at(&mut world, "a", EvolutionStage::CyberOrganism, 1000.0, 1000.0);
    specialize(&world, attacker, Specialization::Melee);
    let swipe = world.config.melee.swipe.clone();

    let at = |angle: f64, dist: f64| (1000.0 + dist * angle.cos(), 1000.0 + dist * angle.sin());
    let (ex, ey) = at(swipe.half_arc - 1e-6, 80.0);
    let (ox, oy) = at(swipe.half_arc + 0.05, 80.0);
    let edge = world.spawn_cyber_bug(Position::new(ex, ey));
    let outside = world.spawn_cyber_bug(Position::new(ox, oy));
    let (edge_id, outside_id) = (world.label(edge), world.label(outside));
    let mut log = EventLog::new();

    assert!(fire_melee(&mut world, &mut log, attacker, MeleeAttackType::Swipe, 1100.0, 1000.0));
    let swings = log.named("meleeAttackExecuted");
    let GameEvent::MeleeAttackExecuted(hit) = swings[0] else {
        panic!("wrong event");
    };
    assert!(hit.hit_creature_ids.contains(&edge_id));
    assert!(!hit.hit_creature_ids.contains(&outside_id));
}

#[test]
fn thrust_reach_includes_target_radius() {
    let mut world = TestWorld::new().build();
    let attacker = player_at(&mut world, "a", EvolutionStage::CyberOrganism, 1000.0, 1000.0);
    specialize(&world, attacker, Specialization::Melee);
    let reach = world.config.melee.thrust.max_range + world.config.stages.cyber_organism.radius;
    let inside = player_at(&mut world, "in", EvolutionStage::CyberOrganism, 1000.0 + reach, 1000.0);
    let beyond = player_at(&mut world, "out", EvolutionStage::CyberOrganism, 1000.0, 1000.0 - reach - 1.0);
    let mut log = EventLog::new();

    assert!(fire_melee(&mut world, &mut log, attacker, MeleeAttackType::Thrust, 1100.0, 1000.0));
    let swings = log.named("meleeAttackExecuted");
    let GameEvent::MeleeAttackExecuted(hit) = swings[0] else {
        panic!("wrong event");
    };
    assert_eq!(hit.hit_player_ids, vec![world.label(inside)]);
    let damage = world.config.melee.thrust.damage;
    assert_eq!(energy(&world, inside).current, energy(&world, inside).max - damage);
    assert_eq!(energy(&world, beyond).current, energy(&world, beyond).max);
}

#[test]
fn trap_specialist_places_at_own_position() {
    let mut world = TestWorld::new().build();
    let owner = player_at(&mut world, "t", EvolutionStage::CyberOrganism, 1200.0, 800.0);
    specialize(&world, owner, Specialization::Traps);
    let mut log = EventLog::new();

    assert!(place_trap(&mut world, &mut log, owner));
    assert_eq!(world.count_tag(Tag::Trap), 1);
    let trap = world.tagged(Tag::Trap)[0];
    assert_eq!(world.read::<Position>(trap), Some(Position::new(1200.0, 800.0)));
    assert_event_count!(log, "trapPlaced", 1);
}
