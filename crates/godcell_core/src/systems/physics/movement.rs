use super::region_bounds;
use crate::systems::ai::damp;
use crate::systems::{priority, System, TickContext};
use crate::world::{Tag, World};
use godcell_data::{Energy, InputDirection, Position, Slowed, Stage, Stunned, Swarm, Velocity};
use godcell_net::Broadcaster;
use hecs::Entity;

/// Integrates velocity into position and keeps everything inside its region.
///
/// Players steer by `InputDirection` with their stage's acceleration and
/// coast under friction when idle or stunned. Collision systems earlier in
/// the tick may have set `Slowed`; it caps speed for this tick and is reset
/// here.
#[derive(Debug, Default)]
pub struct MovementSystem;

impl System for MovementSystem {
    fn name(&self) -> &'static str {
        "movement"
    }

    fn priority(&self) -> u32 {
        priority::MOVEMENT
    }

    fn run(&mut self, world: &mut World, ctx: TickContext, _broadcaster: &mut dyn Broadcaster) {
        for player in world.tagged(Tag::Player) {
            move_player(world, player, ctx);
        }

        for tag in [Tag::Swarm, Tag::CyberBug, Tag::JungleCreature, Tag::EntropySerpent] {
            for entity in world.tagged(tag) {
                if world
                    .read::<Swarm>(entity)
                    .is_some_and(|s| s.is_disabled(ctx.now))
                {
                    continue;
                }
                integrate(world, entity, ctx.dt);
            }
        }
    }
}

fn move_player(world: &World, player: Entity, ctx: TickContext) {
    let (Some(stage), Some(energy), Some(mut vel)) = (
        world.read::<Stage>(player),
        world.read::<Energy>(player),
        world.read::<Velocity>(player),
    ) else {
        return;
    };
    if !energy.is_alive() {
        return;
    }
    let tuning = world.config.stages.tuning(stage.stage);
    let stunned = world
        .read::<Stunned>(player)
        .is_some_and(|s| s.is_active(ctx.now));
    let input = world.read::<InputDirection>(player).unwrap_or_default();
    let slowed = world
        .with_mut::<Slowed, _>(player, |s| std::mem::take(s).factor)
        .unwrap_or(1.0);

    if !stunned && (input.x != 0.0 || input.y != 0.0) {
        vel.x += input.x * tuning.acceleration * ctx.dt;
        vel.y += input.y * tuning.acceleration * ctx.dt;
    } else {
        damp(&mut vel, tuning.friction, ctx.dt);
    }
    vel.cap(tuning.max_speed * slowed);

    world.with_mut::<Velocity, _>(player, |v| *v = vel);
    integrate(world, player, ctx.dt);
}

/// `position += velocity * dt`, then clamp. A clamped axis loses its velocity.
fn integrate(world: &World, entity: Entity, dt: f64) {
    let Some(bounds) = region_bounds(world, entity) else {
        return;
    };
    let radius = world.radius_of(entity);
    let Some(mut vel) = world.read::<Velocity>(entity) else {
        return;
    };
    let hit = world.with_mut::<Position, _>(entity, |p| {
        p.x += vel.x * dt;
        p.y += vel.y * dt;
        bounds.clamp(p, radius)
    });
    if let Some((hit_x, hit_y)) = hit {
        if hit_x {
            vel.x = 0.0;
        }
        if hit_y {
            vel.y = 0.0;
        }
        world.with_mut::<Velocity, _>(entity, |v| *v = vel);
    }
}
