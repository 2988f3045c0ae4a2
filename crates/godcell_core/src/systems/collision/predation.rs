use super::bodies;
use crate::combat::{damage_player, grant_reward, record_drain};
use crate::systems::{priority, System, TickContext};
use crate::world::World;
use godcell_data::DamageSource;
use godcell_net::Broadcaster;
use hecs::Entity;
use std::collections::HashSet;

/// Contact drain in the soup: a higher-stage cell overlapping a lower-stage
/// one siphons its energy. The kill itself is paid out by the death system.
#[derive(Debug, Default)]
pub struct PredationSystem;

impl System for PredationSystem {
    fn name(&self) -> &'static str {
        "predation"
    }

    fn priority(&self) -> u32 {
        priority::COLLISIONS
    }

    fn run(&mut self, world: &mut World, ctx: TickContext, _broadcaster: &mut dyn Broadcaster) {
        let rate = world.config.predation.drain_rate;
        let cells = bodies(world, |s| s.stage.is_soup());

        let mut drained: HashSet<Entity> = HashSet::new();
        let mut feeds: Vec<(Entity, Entity)> = Vec::new();
        for predator in &cells {
            for prey in &cells {
                if prey.stage.stage >= predator.stage.stage || drained.contains(&prey.entity) {
                    continue;
                }
                if predator.touches(&prey.position, prey.stage.radius) {
                    drained.insert(prey.entity);
                    feeds.push((predator.entity, prey.entity));
                }
            }
        }

        for (predator, prey) in feeds {
            let source = DamageSource::Predation { predator };
            let taken = damage_player(world, prey, rate * ctx.dt, source);
            record_drain(world, prey, source, rate);
            grant_reward(world, predator, taken, 0.0);
        }
    }
}
