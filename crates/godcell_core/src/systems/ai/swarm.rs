use super::{seek, ThreatSnapshot};
use crate::geometry::random_point_in_circle;
use crate::systems::{priority, System, TickContext};
use crate::world::{Tag, World};
use godcell_data::{Position, Swarm, SwarmState, Velocity};
use godcell_net::Broadcaster;

/// Soup antagonist. Chases the nearest soup player in range, otherwise
/// patrols around home. A disabled swarm holds still.
#[derive(Debug, Default)]
pub struct SwarmAISystem;

impl System for SwarmAISystem {
    fn name(&self) -> &'static str {
        "swarm_ai"
    }

    fn priority(&self) -> u32 {
        priority::AI
    }

    fn run(&mut self, world: &mut World, ctx: TickContext, _broadcaster: &mut dyn Broadcaster) {
        let config = world.config.clone();
        let cfg = &config.swarm;
        let threats = ThreatSnapshot::collect(world);

        for entity in world.tagged(Tag::Swarm) {
            let (Some(pos), Some(mut swarm), Some(mut vel)) = (
                world.read::<Position>(entity),
                world.read::<Swarm>(entity),
                world.read::<Velocity>(entity),
            ) else {
                continue;
            };

            if swarm.is_disabled(ctx.now) {
                swarm.state = SwarmState::Patrol;
                swarm.target = None;
                vel = Velocity::default();
            } else if let Some(prey) =
                threats.nearest_within(&pos, cfg.detection_radius, |t| t.stage.is_soup())
            {
                swarm.state = SwarmState::Chase;
                swarm.target = Some(prey.entity);
                seek(&mut vel, &pos, &prey.position, cfg.acceleration, cfg.chase_speed, ctx.dt);
            } else {
                swarm.state = SwarmState::Patrol;
                swarm.target = None;
                let target = match swarm.patrol_target {
                    Some(t) if pos.distance(&t) > swarm.radius => t,
                    _ => random_point_in_circle(&mut world.rng, &swarm.home, cfg.patrol_radius),
                };
                swarm.patrol_target = Some(target);
                seek(&mut vel, &pos, &target, cfg.acceleration, cfg.patrol_speed, ctx.dt);
            }

            world.with_mut::<Swarm, _>(entity, |s| *s = swarm);
            world.with_mut::<Velocity, _>(entity, |v| *v = vel);
        }
    }
}
