use super::bodies;
use crate::combat::grant_reward;
use crate::systems::{priority, System, TickContext};
use crate::world::{RespawnRequest, Tag, World};
use godcell_data::{Nutrient, Position};
use godcell_net::{Broadcaster, GameEvent, ResourceCollected};
use hecs::Entity;
use std::collections::HashSet;

/// Soup pickups. A nutrient goes to the first player found touching it.
#[derive(Debug, Default)]
pub struct NutrientCollisionSystem;

impl System for NutrientCollisionSystem {
    fn name(&self) -> &'static str {
        "nutrient_collision"
    }

    fn priority(&self) -> u32 {
        priority::RESOURCES
    }

    fn run(&mut self, world: &mut World, ctx: TickContext, broadcaster: &mut dyn Broadcaster) {
        let config = world.config.clone();
        let radius = config.resources.nutrient_radius;
        let cells = bodies(world, |s| s.stage.is_soup());
        if cells.is_empty() {
            return;
        }

        let mut collected: HashSet<Entity> = HashSet::new();
        let mut pickups: Vec<(Entity, Entity, Nutrient)> = Vec::new();
        for cell in &cells {
            for nutrient in world.tagged(Tag::Nutrient) {
                if collected.contains(&nutrient) {
                    continue;
                }
                let (Some(pos), Some(n)) = (
                    world.read::<Position>(nutrient),
                    world.read::<Nutrient>(nutrient),
                ) else {
                    continue;
                };
                if cell.touches(&pos, radius) {
                    collected.insert(nutrient);
                    pickups.push((cell.entity, nutrient, n));
                }
            }
        }

        for (player, nutrient, n) in pickups {
            let (energy_gained, capacity_gained) = grant_reward(
                world,
                player,
                n.value * n.value_multiplier,
                n.capacity_reward * n.value_multiplier,
            );
            broadcaster.broadcast(GameEvent::NutrientCollected(ResourceCollected {
                resource_id: world.label(nutrient),
                player_id: world.label(player),
                energy_gained,
                capacity_gained,
            }));
            world.destroy_entity(nutrient);
            world
                .respawns
                .push(ctx.now + config.resources.nutrient_respawn_ms, RespawnRequest::Nutrient);
        }
    }
}
