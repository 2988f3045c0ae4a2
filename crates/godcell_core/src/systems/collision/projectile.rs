use crate::abilities::projectile::step_projectile;
use crate::systems::{priority, System, TickContext};
use crate::world::{Tag, World};
use godcell_data::Projectile;
use godcell_net::Broadcaster;

/// Advances every projectile by `speed * dt` and resolves its first hit.
#[derive(Debug, Default)]
pub struct ProjectileSystem;

impl System for ProjectileSystem {
    fn name(&self) -> &'static str {
        "projectile"
    }

    fn priority(&self) -> u32 {
        priority::COLLISIONS
    }

    fn run(&mut self, world: &mut World, ctx: TickContext, broadcaster: &mut dyn Broadcaster) {
        for projectile in world.tagged(Tag::Projectile) {
            let Some(speed) = world.read::<Projectile>(projectile).map(|p| p.speed) else {
                continue;
            };
            step_projectile(world, broadcaster, projectile, speed * ctx.dt);
        }
    }
}
