use super::bodies;
use crate::combat::{damage_player, grant_reward, record_drain};
use crate::systems::{priority, System, TickContext};
use crate::world::{RespawnRequest, Tag, World};
use godcell_data::{DamageSource, EvolutionStage, Position, Slowed, Swarm};
use godcell_net::{Broadcaster, GameEvent, SwarmConsumed};
use hecs::Entity;

/// Active swarms drain and slow soup players they touch. A multi-cell
/// player touching an EMP-disabled swarm eats it.
#[derive(Debug, Default)]
pub struct SwarmCollisionSystem;

impl System for SwarmCollisionSystem {
    fn name(&self) -> &'static str {
        "swarm_collision"
    }

    fn priority(&self) -> u32 {
        priority::COLLISIONS
    }

    fn run(&mut self, world: &mut World, ctx: TickContext, broadcaster: &mut dyn Broadcaster) {
        let config = world.config.clone();
        let cfg = &config.swarm;
        let cells = bodies(world, |s| s.stage.is_soup());

        let mut drains: Vec<Entity> = Vec::new();
        let mut meals: Vec<(Entity, Entity, Swarm)> = Vec::new();
        for swarm_entity in world.tagged(Tag::Swarm) {
            let (Some(pos), Some(swarm)) = (
                world.read::<Position>(swarm_entity),
                world.read::<Swarm>(swarm_entity),
            ) else {
                continue;
            };
            let touching = cells.iter().filter(|c| c.touches(&pos, swarm.radius));
            if swarm.is_disabled(ctx.now) {
                // First multi-cell contact claims it.
                if let Some(eater) = touching
                    .into_iter()
                    .find(|c| c.stage.stage == EvolutionStage::MultiCell)
                {
                    meals.push((eater.entity, swarm_entity, swarm));
                }
            } else {
                drains.extend(touching.map(|c| c.entity));
            }
        }

        for victim in drains {
            damage_player(world, victim, cfg.drain_rate * ctx.dt, DamageSource::Swarm);
            record_drain(world, victim, DamageSource::Swarm, cfg.drain_rate);
            world.with_mut::<Slowed, _>(victim, |s| s.factor = s.factor.min(cfg.slow_factor));
        }

        for (eater, swarm_entity, swarm) in meals {
            let (energy_gained, capacity_gained) =
                grant_reward(world, eater, cfg.consume_energy, cfg.consume_capacity);
            broadcaster.broadcast(GameEvent::SwarmConsumed(SwarmConsumed {
                swarm_id: world.label(swarm_entity),
                player_id: world.label(eater),
                energy_gained,
                capacity_gained,
            }));
            world.destroy_entity(swarm_entity);
            world
                .respawns
                .push(ctx.now + cfg.respawn_delay_ms, RespawnRequest::Swarm { home: swarm.home });
        }
    }
}
