use super::{damp, seek, ThreatSnapshot};
use crate::geometry::random_point_in_circle;
use crate::systems::{priority, System, TickContext};
use crate::world::{Tag, World};
use godcell_data::{JungleCreature, JungleCreatureState, Position, Velocity};
use godcell_net::Broadcaster;
use rand::Rng;

/// Grazers, stalkers and ambushers. Variants differ only in tuning: a zero
/// detection radius never hunts.
#[derive(Debug, Default)]
pub struct JungleCreatureAISystem;

impl System for JungleCreatureAISystem {
    fn name(&self) -> &'static str {
        "jungle_creature_ai"
    }

    fn priority(&self) -> u32 {
        priority::AI
    }

    fn run(&mut self, world: &mut World, ctx: TickContext, _broadcaster: &mut dyn Broadcaster) {
        let config = world.config.clone();
        let shared = &config.jungle_creature;
        let threats = ThreatSnapshot::collect(world);

        for entity in world.tagged(Tag::JungleCreature) {
            let (Some(pos), Some(mut creature), Some(mut vel)) = (
                world.read::<Position>(entity),
                world.read::<JungleCreature>(entity),
                world.read::<Velocity>(entity),
            ) else {
                continue;
            };
            let tuning = shared.tuning(creature.variant);

            // Drop a hunt whose target died, evolved, or ran past the leash.
            if creature.state == JungleCreatureState::Hunt {
                let keep = creature
                    .hunt_target
                    .and_then(|t| threats.get(t))
                    .is_some_and(|t| {
                        t.stage.is_jungle() && t.position.distance(&creature.home) <= tuning.leash_radius
                    });
                if !keep {
                    creature.state = JungleCreatureState::Patrol;
                    creature.hunt_target = None;
                    creature.patrol_target = None;
                }
            }

            if creature.state != JungleCreatureState::Hunt && tuning.detection_radius > 0.0 {
                if let Some(prey) = threats.nearest_within(&pos, tuning.detection_radius, |t| {
                    t.stage.is_jungle() && t.position.distance(&creature.home) <= tuning.leash_radius
                }) {
                    creature.state = JungleCreatureState::Hunt;
                    creature.hunt_target = Some(prey.entity);
                }
            }

            match creature.state {
                JungleCreatureState::Hunt => {
                    if let Some(prey) = creature.hunt_target.and_then(|t| threats.get(t)) {
                        seek(&mut vel, &pos, &prey.position, shared.acceleration, tuning.hunt_speed, ctx.dt);
                    }
                }
                JungleCreatureState::Idle => {
                    damp(&mut vel, 0.9, ctx.dt);
                    if world.rng.gen_bool(tuning.idle_to_patrol_chance) {
                        creature.state = JungleCreatureState::Patrol;
                    }
                }
                JungleCreatureState::Patrol => {
                    let target = match creature.patrol_target {
                        Some(t) => t,
                        None => random_point_in_circle(&mut world.rng, &creature.home, tuning.patrol_radius),
                    };
                    if pos.distance(&target) <= shared.arrival_distance {
                        creature.state = JungleCreatureState::Idle;
                        creature.patrol_target = None;
                    } else {
                        creature.patrol_target = Some(target);
                        seek(&mut vel, &pos, &target, shared.acceleration, tuning.patrol_speed, ctx.dt);
                    }
                }
            }

            world.with_mut::<JungleCreature, _>(entity, |c| *c = creature);
            world.with_mut::<Velocity, _>(entity, |v| *v = vel);
        }
    }
}
