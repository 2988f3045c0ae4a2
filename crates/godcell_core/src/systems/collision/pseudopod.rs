use crate::abilities::pseudopod::{apply_beam_hit, is_beam_target, retire};
use crate::geometry::segment_hits_circle;
use crate::systems::{priority, System, TickContext};
use crate::world::{Tag, World};
use godcell_data::{Position, Pseudopod, PseudopodMode};
use godcell_net::Broadcaster;

/// Flies beam-mode pseudopods. A beam stops at its first soup victim or at
/// full reach; either way it is spent and retracts later.
#[derive(Debug, Default)]
pub struct PseudopodSystem;

impl System for PseudopodSystem {
    fn name(&self) -> &'static str {
        "pseudopod"
    }

    fn priority(&self) -> u32 {
        priority::COLLISIONS
    }

    fn run(&mut self, world: &mut World, ctx: TickContext, broadcaster: &mut dyn Broadcaster) {
        let retract_ms = world.config.pseudopod.retract_ms;
        for entity in world.tagged(Tag::Pseudopod) {
            let (Some(beam), Some(from)) = (
                world.read::<Pseudopod>(entity),
                world.read::<Position>(entity),
            ) else {
                continue;
            };
            if beam.spent || beam.mode != PseudopodMode::Beam {
                continue;
            }

            let step = (beam.speed * ctx.dt).min(beam.max_distance - beam.traveled).max(0.0);
            let to = Position::new(
                from.x + beam.direction.0 * step,
                from.y + beam.direction.1 * step,
            );
            let traveled = beam.traveled + step;
            world.with_mut::<Position, _>(entity, |p| *p = to);
            world.with_mut::<Pseudopod, _>(entity, |p| p.traveled = traveled);

            let victim = world.tagged(Tag::Player).into_iter().find(|&p| {
                p != beam.owner
                    && is_beam_target(world, p)
                    && world.read::<Position>(p).is_some_and(|pos| {
                        segment_hits_circle(&from, &to, &pos, world.radius_of(p) + beam.width / 2.0)
                    })
            });
            if let Some(victim) = victim {
                apply_beam_hit(world, broadcaster, entity, beam.owner, victim, beam.damage);
                retire(world, entity, retract_ms);
            } else if traveled >= beam.max_distance {
                retire(world, entity, retract_ms);
            }
        }
    }
}
