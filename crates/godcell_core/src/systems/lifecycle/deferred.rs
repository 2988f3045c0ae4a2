use super::assign_random_specialization;
use crate::metrics;
use crate::systems::{priority, System, TickContext};
use crate::world::{DeferredAction, World};
use godcell_data::{Bot, CombatSpecialization, Energy, EvolutionStage, Stage};
use godcell_net::{Broadcaster, GameEvent, PlayerEvolved, PseudopodRetracted, SpecializationPrompt};
use hecs::Entity;

/// Fires due timers. A timer whose target is gone, or no longer in the
/// state that scheduled it, is dropped.
#[derive(Debug, Default)]
pub struct DeferredActionSystem;

impl System for DeferredActionSystem {
    fn name(&self) -> &'static str {
        "deferred_actions"
    }

    fn priority(&self) -> u32 {
        priority::DEATH
    }

    fn run(&mut self, world: &mut World, ctx: TickContext, broadcaster: &mut dyn Broadcaster) {
        for action in world.timers.pop_due(ctx.now) {
            match action {
                DeferredAction::RetractPseudopod { pseudopod } => {
                    if world.is_alive(pseudopod) {
                        broadcaster.broadcast(GameEvent::PseudopodRetracted(PseudopodRetracted {
                            pseudopod_id: world.label(pseudopod),
                        }));
                        world.destroy_entity(pseudopod);
                    }
                }
                DeferredAction::FinishEvolution { player } => {
                    finish_evolution(world, broadcaster, player, ctx);
                }
            }
        }
    }
}

fn finish_evolution(
    world: &mut World,
    broadcaster: &mut dyn Broadcaster,
    player: Entity,
    ctx: TickContext,
) {
    let Some(stage) = world.read::<Stage>(player) else {
        return;
    };
    let (true, Some(target)) = (stage.is_evolving, stage.evolving_to) else {
        return;
    };
    let config = world.config.clone();
    let tuning = config.stages.tuning(target);

    world.with_mut::<Stage, _>(player, |s| *s = Stage::new(target, tuning.radius));
    let new_max = world
        .with_mut::<Energy, _>(player, |e| {
            e.max = e.max.max(tuning.starting_max_energy);
            e.current = e.max;
            e.max
        })
        .unwrap_or(tuning.starting_max_energy);

    tracing::info!(player = %world.label(player), stage = ?target, "Evolution complete");
    world.metrics.increment_counter(metrics::EVOLUTIONS);
    broadcaster.broadcast(GameEvent::PlayerEvolved(PlayerEvolved {
        player_id: world.label(player),
        new_stage: target,
        new_max_energy: new_max,
        radius: tuning.radius,
    }));

    if target != EvolutionStage::CyberOrganism {
        return;
    }
    let deadline = ctx.now + config.evolution.specialization_timeout_ms;
    world.with_mut::<CombatSpecialization, _>(player, |c| c.selection_deadline = deadline);
    if world.has::<Bot>(player) {
        assign_random_specialization(world, broadcaster, player);
    } else if let Some(socket) = world.socket_of(player).map(str::to_owned) {
        broadcaster.emit_to(
            &socket,
            GameEvent::SpecializationPrompt(SpecializationPrompt {
                player_id: world.label(player),
                deadline,
            }),
        );
    }
}
