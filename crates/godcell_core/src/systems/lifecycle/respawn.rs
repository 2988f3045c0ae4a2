use crate::metrics;
use crate::players::respawn_player;
use crate::spawner::spawn_random_nutrient;
use crate::systems::{priority, System, TickContext};
use crate::world::{RespawnRequest, World};
use godcell_data::Position;
use godcell_net::{Broadcaster, EntitySpawned, GameEvent, SpawnKind};
use hecs::Entity;

/// Re-creates creatures and resources whose respawn deadline has passed.
/// Each queued request fires exactly once, in deadline order.
#[derive(Debug, Default)]
pub struct RespawnSystem;

impl System for RespawnSystem {
    fn name(&self) -> &'static str {
        "respawn"
    }

    fn priority(&self) -> u32 {
        priority::DEATH
    }

    fn run(&mut self, world: &mut World, ctx: TickContext, broadcaster: &mut dyn Broadcaster) {
        for request in world.respawns.pop_due(ctx.now) {
            let spawned: Option<(Entity, SpawnKind)> = match request {
                RespawnRequest::Swarm { home } => Some((world.spawn_swarm(home), SpawnKind::Swarm)),
                RespawnRequest::CyberBug { home } => {
                    Some((world.spawn_cyber_bug(home), SpawnKind::CyberBug))
                }
                RespawnRequest::JungleCreature { variant, home } => Some((
                    world.spawn_jungle_creature(variant, home),
                    SpawnKind::JungleCreature,
                )),
                RespawnRequest::EntropySerpent { home } => {
                    Some((world.spawn_serpent(home), SpawnKind::EntropySerpent))
                }
                RespawnRequest::Nutrient => Some((spawn_random_nutrient(world), SpawnKind::Nutrient)),
                RespawnRequest::DataFruit { tree, position } => {
                    // Fruit only regrows on a tree that still stands.
                    if tree.map_or(true, |t| world.is_alive(t)) {
                        Some((world.spawn_data_fruit(tree, position), SpawnKind::DataFruit))
                    } else {
                        None
                    }
                }
                RespawnRequest::Player { player } => {
                    if respawn_player(world, broadcaster, player) {
                        world.metrics.increment_counter(metrics::RESPAWNS);
                    }
                    None
                }
            };

            if let Some((entity, kind)) = spawned {
                let position = world.read::<Position>(entity).unwrap_or_default();
                tracing::debug!(id = %world.label(entity), ?kind, "Respawned");
                world.metrics.increment_counter(metrics::RESPAWNS);
                broadcaster.broadcast(GameEvent::EntitySpawned(EntitySpawned {
                    id: world.label(entity),
                    kind,
                    position,
                }));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{self, player};
    use crate::world::Tag;
    use godcell_data::{Energy, EvolutionStage};
    use godcell_net::EventLog;

    fn run_at(world: &mut World, log: &mut EventLog, now: f64) {
        let ctx = TickContext { dt: 1.0 / 60.0, now, tick: 1 };
        RespawnSystem.run(world, ctx, log);
    }

    #[test]
    fn each_request_fires_once_in_deadline_order() {
        let mut world = testing::world();
        world
            .respawns
            .push(200.0, RespawnRequest::CyberBug { home: Position::new(500.0, 500.0) });
        world
            .respawns
            .push(100.0, RespawnRequest::Swarm { home: Position::new(2000.0, 1500.0) });
        let mut log = EventLog::new();

        run_at(&mut world, &mut log, 150.0);
        assert_eq!(world.count_tag(Tag::Swarm), 1);
        assert_eq!(world.count_tag(Tag::CyberBug), 0);
        run_at(&mut world, &mut log, 250.0);
        run_at(&mut world, &mut log, 350.0);
        assert_eq!(world.count_tag(Tag::CyberBug), 1);
        assert_eq!(log.count("entitySpawned"), 2);
        assert!(world.respawns.is_empty());
    }

    #[test]
    fn fruit_of_a_felled_tree_does_not_regrow() {
        let mut world = testing::world();
        let tree = world.spawn_tree(Position::new(500.0, 500.0));
        world.destroy_entity(tree);
        world.respawns.push(
            0.0,
            RespawnRequest::DataFruit { tree: Some(tree), position: Position::new(500.0, 400.0) },
        );
        let mut log = EventLog::new();

        run_at(&mut world, &mut log, 10.0);
        assert_eq!(world.count_tag(Tag::DataFruit), 0);
        assert_eq!(log.count("entitySpawned"), 0);
    }

    #[test]
    fn processed_player_is_respawned() {
        let mut world = testing::world();
        let p = player(&mut world, "p", EvolutionStage::MultiCell, 2000.0, 1500.0);
        world.with_mut::<Energy, _>(p, Energy::mark_processed);
        world.respawns.push(0.0, RespawnRequest::Player { player: p });
        let mut log = EventLog::new();

        run_at(&mut world, &mut log, 10.0);
        assert!(world.read::<Energy>(p).is_some_and(|e| e.is_alive()));
        assert_eq!(log.count("playerRespawned"), 1);
        assert_eq!(world.metrics.counter(metrics::RESPAWNS), 1);
    }
}
