use super::{damp, seek, ThreatSnapshot};
use crate::geometry::{direction, random_point_in_circle};
use crate::systems::{priority, System, TickContext};
use crate::world::{Tag, World};
use godcell_data::{CyberBug, CyberBugState, Position, Velocity};
use godcell_net::Broadcaster;
use rand::Rng;

/// Skittish prey. Idles, wanders near home, and bolts from jungle players.
#[derive(Debug, Default)]
pub struct CyberBugAISystem;

impl System for CyberBugAISystem {
    fn name(&self) -> &'static str {
        "cyber_bug_ai"
    }

    fn priority(&self) -> u32 {
        priority::AI
    }

    fn run(&mut self, world: &mut World, ctx: TickContext, _broadcaster: &mut dyn Broadcaster) {
        let config = world.config.clone();
        let cfg = &config.cyber_bug;
        let threats = ThreatSnapshot::collect(world);

        for entity in world.tagged(Tag::CyberBug) {
            let (Some(pos), Some(mut bug), Some(mut vel)) = (
                world.read::<Position>(entity),
                world.read::<CyberBug>(entity),
                world.read::<Velocity>(entity),
            ) else {
                continue;
            };

            let threat = threats.nearest_within(&pos, cfg.trigger_radius, |t| t.stage.is_jungle());
            if let Some(threat) = threat {
                bug.state = CyberBugState::Flee;
                bug.patrol_target = None;
                if let Some((dx, dy)) = direction(&threat.position, &pos) {
                    vel.x += dx * cfg.acceleration * ctx.dt;
                    vel.y += dy * cfg.acceleration * ctx.dt;
                    vel.cap(cfg.flee_speed);
                }
            } else {
                match bug.state {
                    CyberBugState::Flee => {
                        bug.state = CyberBugState::Patrol;
                        bug.patrol_target = Some(random_point_in_circle(
                            &mut world.rng,
                            &bug.home,
                            cfg.patrol_radius,
                        ));
                    }
                    CyberBugState::Idle => {
                        damp(&mut vel, cfg.idle_friction, ctx.dt);
                        if world.rng.gen_bool(cfg.idle_to_patrol_chance) {
                            bug.state = CyberBugState::Patrol;
                            bug.patrol_target = Some(random_point_in_circle(
                                &mut world.rng,
                                &bug.home,
                                cfg.patrol_radius,
                            ));
                        }
                    }
                    CyberBugState::Patrol => {
                        let target = match bug.patrol_target {
                            Some(t) => t,
                            None => random_point_in_circle(&mut world.rng, &bug.home, cfg.patrol_radius),
                        };
                        bug.patrol_target = Some(target);
                        if pos.distance(&target) <= cfg.arrival_distance {
                            if world.rng.gen_bool(cfg.return_to_idle_chance) {
                                bug.state = CyberBugState::Idle;
                                bug.patrol_target = None;
                            } else {
                                bug.patrol_target = Some(random_point_in_circle(
                                    &mut world.rng,
                                    &bug.home,
                                    cfg.patrol_radius,
                                ));
                            }
                        } else {
                            seek(&mut vel, &pos, &target, cfg.acceleration, cfg.patrol_speed, ctx.dt);
                        }
                    }
                }
            }

            world.with_mut::<CyberBug, _>(entity, |b| *b = bug);
            world.with_mut::<Velocity, _>(entity, |v| *v = vel);
        }
    }
}
