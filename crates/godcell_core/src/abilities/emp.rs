use super::{check, commit, CooldownSlot, Gate, StageGate};
use crate::config::GameConfig;
use crate::world::{Tag, World};
use godcell_data::{EvolutionStage, Position, Stage, Stunned, Swarm, Velocity};
use godcell_net::{Broadcaster, EmpActivated, GameEvent};
use hecs::Entity;

fn gate(config: &GameConfig) -> Gate {
    Gate {
        ability: "emp",
        stage: StageGate::Exactly(EvolutionStage::MultiCell),
        specialization: None,
        cost: config.emp.cost,
        cooldown_ms: config.emp.cooldown_ms,
        slot: CooldownSlot::Emp,
    }
}

#[must_use]
pub fn can_fire_emp(world: &World, entity: Entity) -> bool {
    check(world, entity, &gate(&world.config)).is_some()
}

/// Disables every swarm and stuns every other soup player within range.
pub fn fire_emp(world: &mut World, broadcaster: &mut dyn Broadcaster, entity: Entity) -> bool {
    let config = world.config.clone();
    let gate = gate(&config);
    let Some(caster) = check(world, entity, &gate) else {
        return false;
    };
    commit(world, entity, &gate);

    let until = world.now() + config.emp.disable_duration_ms;
    let range = config.emp.range;

    let swarms: Vec<Entity> = world
        .tagged(Tag::Swarm)
        .into_iter()
        .filter(|&s| {
            let (Some(pos), Some(swarm)) = (world.read::<Position>(s), world.read::<Swarm>(s))
            else {
                return false;
            };
            pos.distance(&caster.position) <= range + swarm.radius
        })
        .collect();

    let players: Vec<Entity> = world
        .tagged(Tag::Player)
        .into_iter()
        .filter(|&p| p != entity && world.is_targetable(p))
        .filter(|&p| {
            let (Some(pos), Some(stage)) = (world.read::<Position>(p), world.read::<Stage>(p))
            else {
                return false;
            };
            stage.stage.is_soup() && pos.distance(&caster.position) <= range + stage.radius
        })
        .collect();

    for &s in &swarms {
        world.with_mut::<Swarm, _>(s, |swarm| {
            swarm.disabled_until = Some(swarm.disabled_until.map_or(until, |t| t.max(until)));
            swarm.target = None;
        });
        world.with_mut::<Velocity, _>(s, |v| *v = Velocity::default());
    }
    for &p in &players {
        world.with_mut::<Stunned, _>(p, |s| s.extend_to(until));
    }

    tracing::debug!(?entity, swarms = swarms.len(), players = players.len(), "EMP fired");
    broadcaster.broadcast(GameEvent::EmpActivated(EmpActivated {
        player_id: world.label(entity),
        position: caster.position,
        affected_swarm_ids: swarms.iter().map(|&s| world.label(s)).collect(),
        affected_player_ids: players.iter().map(|&p| world.label(p)).collect(),
    }));
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{self, energy, player, set_energy};
    use godcell_data::{DamageSource, DamageTracking};
    use godcell_net::EventLog;

    #[test]
    fn emp_stuns_overlapping_soup_player() {
        let mut world = testing::world();
        let attacker = player(&mut world, "a", EvolutionStage::MultiCell, 2000.0, 1500.0);
        let victim = player(&mut world, "v", EvolutionStage::MultiCell, 2000.0, 1500.0);
        set_energy(&world, attacker, 100.0);
        let mut log = EventLog::new();

        assert!(fire_emp(&mut world, &mut log, attacker));
        assert_eq!(energy(&world, attacker), 70.0);
        let until = world.read::<Stunned>(victim).map(|s| s.until);
        assert_eq!(until, Some(world.now() + world.config.emp.disable_duration_ms));
        assert_eq!(log.count("empActivated"), 1);
        match log.named("empActivated")[0] {
            GameEvent::EmpActivated(e) => assert_eq!(e.affected_player_ids, vec!["v".to_string()]),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn emp_disables_swarms_in_range_only() {
        let mut world = testing::world();
        let attacker = player(&mut world, "a", EvolutionStage::MultiCell, 2000.0, 1500.0);
        let near = world.spawn_swarm(Position::new(2300.0, 1500.0));
        let far = world.spawn_swarm(Position::new(2000.0 + 768.0 + 41.0, 1500.0));
        let mut log = EventLog::new();

        assert!(fire_emp(&mut world, &mut log, attacker));
        let now = world.now();
        assert!(world.read::<Swarm>(near).is_some_and(|s| s.is_disabled(now)));
        assert!(!world.read::<Swarm>(far).is_some_and(|s| s.is_disabled(now)));
    }

    #[test]
    fn emp_is_multi_cell_only_and_respects_cooldown() {
        let mut world = testing::world();
        let single = player(&mut world, "s", EvolutionStage::SingleCell, 2000.0, 1500.0);
        let multi = player(&mut world, "m", EvolutionStage::MultiCell, 2100.0, 1500.0);
        let mut log = EventLog::new();

        assert!(!can_fire_emp(&world, single));
        assert!(!fire_emp(&mut world, &mut log, single));
        assert!(fire_emp(&mut world, &mut log, multi));
        let after_first = energy(&world, multi);
        assert!(!fire_emp(&mut world, &mut log, multi));
        assert_eq!(energy(&world, multi), after_first);
        assert_eq!(log.count("empActivated"), 1);
    }

    #[test]
    fn emp_fires_on_exactly_its_cost_and_marks_the_empty_caster() {
        let mut world = testing::world();
        let caster = player(&mut world, "m", EvolutionStage::MultiCell, 2000.0, 1500.0);
        let cost = world.config.emp.cost;
        set_energy(&world, caster, cost - 1.0);
        assert!(!can_fire_emp(&world, caster));

        set_energy(&world, caster, cost);
        let mut log = EventLog::new();
        assert!(can_fire_emp(&world, caster));
        assert!(fire_emp(&mut world, &mut log, caster));
        assert_eq!(energy(&world, caster), 0.0);
        let source = world.get::<DamageTracking>(caster).and_then(|t| t.last_damage_source);
        assert_eq!(source, Some(DamageSource::Starvation));
    }
}
