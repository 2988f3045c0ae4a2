//! Settles player deaths exactly once.
//!
//! Damage anywhere in the tick only floors energy at zero and records a
//! source. This system turns every `Dying` player into a processed corpse:
//! it pays the killer, broadcasts the death and marks energy with the
//! sentinel so nothing fires twice.

use crate::combat::grant_reward;
use crate::metrics;
use crate::systems::{priority, System, TickContext};
use crate::world::{RespawnRequest, Tag, World};
use godcell_data::{
    Bot, DamageSource, DamageTracking, Energy, EvolutionStage, Knockback, LifeState, Player,
    Position, Stage, Velocity,
};
use godcell_net::{Broadcaster, GameEvent, PlayerDied, PlayerEngulfed};
use hecs::Entity;

#[derive(Debug, Default)]
pub struct DeathSystem;

impl System for DeathSystem {
    fn name(&self) -> &'static str {
        "death"
    }

    fn priority(&self) -> u32 {
        priority::DEATH
    }

    fn run(&mut self, world: &mut World, ctx: TickContext, broadcaster: &mut dyn Broadcaster) {
        let dying: Vec<(Entity, DamageSource)> = world
            .tagged(Tag::Player)
            .into_iter()
            .filter_map(|p| {
                let energy = world.read::<Energy>(p)?;
                let tracking = world.get::<DamageTracking>(p)?;
                match LifeState::of(&energy, &tracking) {
                    LifeState::Dying(source) => Some((p, source)),
                    _ => None,
                }
            })
            .collect();

        for (victim, source) in dying {
            settle(world, broadcaster, victim, source, ctx);
        }
    }
}

fn settle(
    world: &mut World,
    broadcaster: &mut dyn Broadcaster,
    victim: Entity,
    source: DamageSource,
    ctx: TickContext,
) {
    let config = world.config.clone();
    let (Some(energy), Some(stage), Some(position)) = (
        world.read::<Energy>(victim),
        world.read::<Stage>(victim),
        world.read::<Position>(victim),
    ) else {
        return;
    };
    let color = world
        .get::<Player>(victim)
        .map(|p| p.color.clone())
        .unwrap_or_default();
    let victim_max = energy.max;

    match source {
        DamageSource::Predation { predator } if world.is_alive(predator) => {
            let fraction = if stage.stage == EvolutionStage::SingleCell {
                config.predation.single_cell_reward_fraction
            } else {
                config.predation.multi_cell_reward_fraction
            };
            let (_, capacity_gained) = grant_reward(world, predator, 0.0, victim_max * fraction);
            broadcaster.broadcast(GameEvent::PlayerEngulfed(PlayerEngulfed {
                predator_id: world.label(predator),
                prey_id: world.label(victim),
                position,
                capacity_gained,
            }));
        }
        DamageSource::Beam { shooter } if world.is_alive(shooter) => {
            grant_reward(
                world,
                shooter,
                victim_max * config.pseudopod.kill_energy_fraction,
                victim_max * config.pseudopod.kill_capacity_fraction,
            );
        }
        _ => {}
    }

    world.with_mut::<Energy, _>(victim, Energy::mark_processed);
    world.with_mut::<DamageTracking, _>(victim, DamageTracking::reset);
    world.with_mut::<Velocity, _>(victim, |v| *v = Velocity::default());
    world.with_mut::<Knockback, _>(victim, |k| *k = Knockback::default());

    let cause = source.kind();
    let killer = source.instigator().map(|k| world.label(k));
    tracing::info!(player = %world.label(victim), ?cause, ?killer, "Player died");
    world.metrics.increment_counter(metrics::DEATHS);
    broadcaster.broadcast(GameEvent::PlayerDied(PlayerDied {
        player_id: world.label(victim),
        position,
        color,
        cause,
    }));

    if world.has::<Bot>(victim) {
        world
            .respawns
            .push(ctx.now + config.bots.respawn_delay_ms, RespawnRequest::Player { player: victim });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::damage_player;
    use crate::testing::{self, player};
    use crate::world::PlayerSpawn;
    use godcell_data::DamageKind;
    use godcell_net::EventLog;

    fn run(world: &mut World, log: &mut EventLog) {
        let ctx = TickContext {
            dt: 1.0 / 60.0,
            now: world.now(),
            tick: 1,
        };
        DeathSystem.run(world, ctx, log);
    }

    #[test]
    fn death_is_processed_once() {
        let mut world = testing::world();
        let p = player(&mut world, "p", EvolutionStage::SingleCell, 2000.0, 1500.0);
        damage_player(&world, p, 1000.0, DamageSource::Swarm);
        let mut log = EventLog::new();

        run(&mut world, &mut log);
        run(&mut world, &mut log);
        assert_eq!(log.count("playerDied"), 1);
        assert!(world.read::<Energy>(p).is_some_and(|e| e.is_processed()));
        assert_eq!(world.metrics.counter(metrics::DEATHS), 1);
        match log.named("playerDied")[0] {
            GameEvent::PlayerDied(d) => assert_eq!(d.cause, DamageKind::Swarm),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn zero_energy_without_source_is_left_alone() {
        let mut world = testing::world();
        let p = player(&mut world, "p", EvolutionStage::SingleCell, 2000.0, 1500.0);
        testing::set_energy(&world, p, 0.0);
        let mut log = EventLog::new();

        run(&mut world, &mut log);
        assert_eq!(log.count("playerDied"), 0);
        assert_eq!(testing::energy(&world, p), 0.0);
    }

    #[test]
    fn predator_gains_capacity_on_engulf() {
        let mut world = testing::world();
        let predator = player(&mut world, "pred", EvolutionStage::MultiCell, 2000.0, 1500.0);
        let prey = player(&mut world, "prey", EvolutionStage::SingleCell, 2010.0, 1500.0);
        let before = world.read::<Energy>(predator).map_or(0.0, |e| e.max);
        let prey_max = world.read::<Energy>(prey).map_or(0.0, |e| e.max);
        damage_player(&world, prey, 1000.0, DamageSource::Predation { predator });
        let mut log = EventLog::new();

        run(&mut world, &mut log);
        let after = world.read::<Energy>(predator).map_or(0.0, |e| e.max);
        let expected = prey_max * world.config.predation.single_cell_reward_fraction;
        assert!((after - before - expected).abs() < 1e-9);
        assert_eq!(log.count("playerEngulfed"), 1);
    }

    #[test]
    fn beam_kill_rewards_shooter() {
        let mut world = testing::world();
        let shooter = player(&mut world, "s", EvolutionStage::MultiCell, 2000.0, 1500.0);
        let victim = player(&mut world, "v", EvolutionStage::MultiCell, 2200.0, 1500.0);
        testing::set_energy(&world, shooter, 10.0);
        let before = world.read::<Energy>(shooter).expect("shooter energy");
        let victim_max = world.read::<Energy>(victim).map_or(0.0, |e| e.max);
        damage_player(&world, victim, 1.0e6, DamageSource::Beam { shooter });
        let mut log = EventLog::new();

        run(&mut world, &mut log);
        let after = world.read::<Energy>(shooter).expect("shooter energy");
        let capacity = victim_max * world.config.pseudopod.kill_capacity_fraction;
        let gain = victim_max * world.config.pseudopod.kill_energy_fraction;
        assert!((after.max - before.max - capacity).abs() < 1e-9);
        assert!((after.current - before.current - gain).abs() < 1e-9);
        assert_eq!(log.count("playerEngulfed"), 0);
    }

    #[test]
    fn dead_bot_is_queued_for_respawn() {
        let mut world = testing::world();
        let bot = world
            .spawn_player(PlayerSpawn {
                socket_id: "bot-9".into(),
                name: "bot".into(),
                color: "#888888".into(),
                stage: EvolutionStage::SingleCell,
                position: Position::new(2000.0, 1500.0),
                is_bot: true,
            })
            .expect("bot spawns");
        damage_player(&world, bot, 1000.0, DamageSource::Starvation);
        let mut log = EventLog::new();

        run(&mut world, &mut log);
        assert_eq!(world.respawns.len(), 1);
        assert_eq!(
            world.respawns.next_due(),
            Some(world.now() + world.config.bots.respawn_delay_ms)
        );
    }
}
