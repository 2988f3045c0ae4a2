use super::bodies;
use crate::combat::grant_reward;
use crate::systems::{priority, System, TickContext};
use crate::world::{RespawnRequest, Tag, World};
use godcell_data::{DataFruit, Position};
use godcell_net::{Broadcaster, GameEvent, ResourceCollected};
use hecs::Entity;
use std::collections::HashSet;

/// Jungle pickups: data fruit under the trees. Same first-touch rule as
/// nutrients; a collected fruit regrows at the same spot.
#[derive(Debug, Default)]
pub struct MacroResourceCollisionSystem;

impl System for MacroResourceCollisionSystem {
    fn name(&self) -> &'static str {
        "macro_resource_collision"
    }

    fn priority(&self) -> u32 {
        priority::RESOURCES
    }

    fn run(&mut self, world: &mut World, ctx: TickContext, broadcaster: &mut dyn Broadcaster) {
        let config = world.config.clone();
        let radius = config.resources.fruit_radius;
        let fruits: Vec<(Entity, Position, DataFruit)> = world
            .tagged(Tag::DataFruit)
            .into_iter()
            .filter_map(|f| Some((f, world.read::<Position>(f)?, world.read::<DataFruit>(f)?)))
            .collect();
        if fruits.is_empty() {
            return;
        }

        let mut collected: HashSet<Entity> = HashSet::new();
        let mut pickups: Vec<(Entity, Entity, Position, DataFruit)> = Vec::new();
        for body in bodies(world, |s| s.stage.is_jungle()) {
            for &(fruit, pos, data) in &fruits {
                if !collected.contains(&fruit) && body.touches(&pos, radius) {
                    collected.insert(fruit);
                    pickups.push((body.entity, fruit, pos, data));
                }
            }
        }

        for (player, fruit, position, data) in pickups {
            let (energy_gained, capacity_gained) =
                grant_reward(world, player, data.value, data.capacity_reward);
            broadcaster.broadcast(GameEvent::DataFruitCollected(ResourceCollected {
                resource_id: world.label(fruit),
                player_id: world.label(player),
                energy_gained,
                capacity_gained,
            }));
            world.destroy_entity(fruit);
            world.respawns.push(
                ctx.now + config.resources.fruit_respawn_ms,
                RespawnRequest::DataFruit {
                    tree: data.tree,
                    position,
                },
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{self, player};
    use godcell_data::{Energy, EvolutionStage};
    use godcell_net::EventLog;

    #[test]
    fn jungle_player_collects_fruit_and_regrowth_is_queued() {
        let mut world = testing::world();
        let fruit = world.spawn_data_fruit(None, Position::new(1000.0, 1000.0));
        let p = player(&mut world, "p", EvolutionStage::CyberOrganism, 1030.0, 1000.0);
        let before = world.read::<Energy>(p).expect("energy");
        let mut log = EventLog::new();
        let ctx = TickContext {
            dt: 1.0 / 60.0,
            now: 0.0,
            tick: 1,
        };

        MacroResourceCollisionSystem.run(&mut world, ctx, &mut log);
        assert!(!world.is_alive(fruit));
        assert_eq!(log.count("dataFruitCollected"), 1);
        let after = world.read::<Energy>(p).expect("energy");
        assert_eq!(after.max, before.max + world.config.resources.fruit_capacity);
        assert_eq!(world.respawns.len(), 1);
    }
}
