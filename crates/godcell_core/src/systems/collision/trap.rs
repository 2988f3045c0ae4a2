use super::bodies;
use crate::combat::{damage_fauna, damage_player, record_drain};
use crate::systems::{priority, System, TickContext};
use crate::world::{Tag, World};
use godcell_data::{DamageSource, Energy, Position, Stunned, Trap};
use godcell_net::{Broadcaster, GameEvent, TrapDespawned, TrapTriggered};
use hecs::Entity;
use std::collections::HashSet;

/// Expires old traps and springs live ones. A trap fires on one victim at
/// most, then disappears.
#[derive(Debug, Default)]
pub struct TrapSystem;

enum Victim {
    Player(Entity),
    Fauna(Entity),
}

impl System for TrapSystem {
    fn name(&self) -> &'static str {
        "trap"
    }

    fn priority(&self) -> u32 {
        priority::COLLISIONS
    }

    fn run(&mut self, world: &mut World, ctx: TickContext, broadcaster: &mut dyn Broadcaster) {
        let traps: Vec<(Entity, Position, Trap)> = world
            .tagged(Tag::Trap)
            .into_iter()
            .filter_map(|t| Some((t, world.read::<Position>(t)?, world.read::<Trap>(t)?)))
            .collect();
        if traps.is_empty() {
            return;
        }
        let players = bodies(world, |s| s.stage.is_jungle());
        let fauna: Vec<(Entity, Position, f64)> = [Tag::CyberBug, Tag::JungleCreature]
            .into_iter()
            .flat_map(|tag| world.tagged(tag))
            .filter(|&f| world.read::<Energy>(f).is_some_and(|e| e.is_alive()))
            .filter_map(|f| Some((f, world.read::<Position>(f)?, world.radius_of(f))))
            .collect();

        let mut expired: Vec<Entity> = Vec::new();
        let mut processed: HashSet<Entity> = HashSet::new();
        let mut sprung: Vec<(Entity, Trap, Victim)> = Vec::new();
        for (entity, pos, trap) in traps {
            if ctx.now >= trap.expires_at {
                expired.push(entity);
                continue;
            }
            if processed.contains(&entity) {
                continue;
            }
            let victim = players
                .iter()
                .find(|b| b.entity != trap.owner && b.touches(&pos, trap.trigger_radius))
                .map(|b| Victim::Player(b.entity))
                .or_else(|| {
                    fauna
                        .iter()
                        .find(|(_, fpos, r)| fpos.distance(&pos) < trap.trigger_radius + r)
                        .map(|(f, _, _)| Victim::Fauna(*f))
                });
            if let Some(victim) = victim {
                processed.insert(entity);
                sprung.push((entity, trap, victim));
            }
        }

        for entity in expired {
            broadcaster.broadcast(GameEvent::TrapDespawned(TrapDespawned {
                trap_id: world.label(entity),
            }));
            world.destroy_entity(entity);
        }

        for (entity, trap, victim) in sprung {
            let target = match victim {
                Victim::Player(p) | Victim::Fauna(p) => p,
            };
            // An earlier trap this pass may have already drained the victim.
            if !world.read::<Energy>(target).is_some_and(|e| e.is_alive()) {
                continue;
            }
            let trap_id = world.label(entity);
            let (victim_id, killed) = match victim {
                Victim::Player(p) => {
                    let source = DamageSource::Trap { owner: trap.owner };
                    damage_player(world, p, trap.damage, source);
                    record_drain(world, p, source, trap.damage);
                    world.with_mut::<Stunned, _>(p, |s| {
                        s.extend_to(ctx.now + trap.stun_duration_ms);
                    });
                    let killed = world.read::<Energy>(p).is_some_and(|e| !e.is_alive());
                    (world.label(p), killed)
                }
                Victim::Fauna(f) => {
                    let id = world.label(f);
                    let killed = damage_fauna(world, broadcaster, f, trap.owner, trap.damage)
                        .unwrap_or(false);
                    (id, killed)
                }
            };
            broadcaster.broadcast(GameEvent::TrapTriggered(TrapTriggered {
                trap_id,
                victim_id,
                damage: trap.damage,
                stun_duration: trap.stun_duration_ms,
                killed,
            }));
            world.destroy_entity(entity);
        }
    }
}
