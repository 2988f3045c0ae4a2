use super::region_bounds;
use crate::systems::{priority, System, TickContext};
use crate::world::World;
use godcell_data::{Knockback, Position};
use godcell_net::Broadcaster;
use hecs::Entity;

/// Applies accumulated knockback impulses on top of regular movement and
/// decays them exponentially.
#[derive(Debug, Default)]
pub struct KnockbackSystem;

impl System for KnockbackSystem {
    fn name(&self) -> &'static str {
        "knockback"
    }

    fn priority(&self) -> u32 {
        priority::MOVEMENT
    }

    fn run(&mut self, world: &mut World, ctx: TickContext, _broadcaster: &mut dyn Broadcaster) {
        let physics = world.config.physics.clone();
        let moving: Vec<(Entity, Knockback)> = world
            .ecs
            .query::<&Knockback>()
            .iter()
            .filter(|(_, k)| k.x != 0.0 || k.y != 0.0)
            .map(|(e, k)| (e, *k))
            .collect();

        let decay = (-physics.knockback_decay * ctx.dt).exp();
        for (entity, impulse) in moving {
            let radius = world.radius_of(entity);
            let bounds = region_bounds(world, entity);
            world.with_mut::<Position, _>(entity, |p| {
                p.x += impulse.x * ctx.dt;
                p.y += impulse.y * ctx.dt;
                if let Some(b) = bounds {
                    b.clamp(p, radius);
                }
            });
            world.with_mut::<Knockback, _>(entity, |k| {
                k.x *= decay;
                k.y *= decay;
                if k.x.hypot(k.y) < physics.knockback_epsilon {
                    *k = Knockback::default();
                }
            });
        }
    }
}
