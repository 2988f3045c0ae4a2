use super::assign_random_specialization;
use crate::systems::{priority, System, TickContext};
use crate::world::{DeferredAction, Tag, World};
use godcell_data::{
    CombatSpecialization, DamageSource, DamageTracking, Energy, EvolutionStage, Stage,
};
use godcell_net::{Broadcaster, GameEvent, PlayerEvolutionStarted};
use hecs::Entity;

/// Per-stage energy decay, evolution triggers and the specialization
/// deadline.
#[derive(Debug, Default)]
pub struct MetabolismSystem;

impl System for MetabolismSystem {
    fn name(&self) -> &'static str {
        "metabolism"
    }

    fn priority(&self) -> u32 {
        priority::METABOLISM
    }

    fn run(&mut self, world: &mut World, ctx: TickContext, broadcaster: &mut dyn Broadcaster) {
        let config = world.config.clone();
        let mut evolving: Vec<(Entity, EvolutionStage, EvolutionStage)> = Vec::new();
        let mut overdue: Vec<Entity> = Vec::new();

        for player in world.tagged(Tag::Player) {
            let Some(stage) = world.read::<Stage>(player) else {
                continue;
            };
            if stage.is_evolving {
                continue;
            }
            let tuning = config.stages.tuning(stage.stage);
            let Some((energy, starved)) = world.with_mut::<Energy, _>(player, |e| {
                let was_alive = e.is_alive();
                if was_alive {
                    e.drain(tuning.decay_rate * ctx.dt);
                }
                (*e, was_alive && !e.is_alive())
            }) else {
                continue;
            };
            if starved {
                world.with_mut::<DamageTracking, _>(player, |t| {
                    t.last_damage_source = Some(DamageSource::Starvation);
                });
            }
            if !energy.is_alive() {
                continue;
            }

            if let (Some(next), Some(threshold)) = (stage.stage.next(), tuning.evolution_threshold) {
                if energy.max >= threshold {
                    evolving.push((player, stage.stage, next));
                    continue;
                }
            }

            let deadline_passed = world
                .read::<CombatSpecialization>(player)
                .is_some_and(|c| {
                    c.specialization.is_none()
                        && c.selection_deadline > 0.0
                        && ctx.now >= c.selection_deadline
                });
            if deadline_passed && stage.stage >= EvolutionStage::CyberOrganism {
                overdue.push(player);
            }
        }

        let duration = config.evolution.duration_ms;
        for (player, current, target) in evolving {
            let until = ctx.now + duration;
            world.with_mut::<Stage, _>(player, |s| {
                s.is_evolving = true;
                s.evolving_until = Some(until);
                s.evolving_to = Some(target);
            });
            world.timers.push(until, DeferredAction::FinishEvolution { player });
            tracing::info!(player = %world.label(player), ?current, ?target, "Evolution started");
            broadcaster.broadcast(GameEvent::PlayerEvolutionStarted(PlayerEvolutionStarted {
                player_id: world.label(player),
                current_stage: current,
                target_stage: target,
                duration,
            }));
        }

        for player in overdue {
            assign_random_specialization(world, broadcaster, player);
        }
    }
}
