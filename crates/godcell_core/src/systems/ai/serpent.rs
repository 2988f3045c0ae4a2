//! The apex predator.
//!
//! The serpent always moves along its heading, and the heading turns toward
//! its goal at a bounded rate, so pursuit curves instead of snapping. Within
//! `attack_range + head_offset` of its target it holds a stand-off distance
//! and bites with a frontal cone from its head once it faces the target.

use super::ThreatSnapshot;
use crate::combat::{apply_knockback, damage_player, kill_fauna, record_drain};
use crate::config::SerpentConfig;
use crate::geometry::{angle_diff, direction, random_point_in_circle, turn_towards, ArcTest};
use crate::systems::{priority, System, TickContext};
use crate::world::{Tag, World};
use godcell_data::{
    DamageSource, Energy, EntropySerpent, Position, SerpentState, Stage, Timestamp, Velocity,
};
use godcell_net::{Broadcaster, EntropySerpentAttack, EntropySerpentState, GameEvent};
use hecs::Entity;

#[derive(Debug, Default)]
pub struct EntropySerpentAISystem;

impl System for EntropySerpentAISystem {
    fn name(&self) -> &'static str {
        "entropy_serpent_ai"
    }

    fn priority(&self) -> u32 {
        priority::AI
    }

    fn run(&mut self, world: &mut World, ctx: TickContext, broadcaster: &mut dyn Broadcaster) {
        let config = world.config.clone();
        let cfg = &config.serpent;
        let bounds = config.world.jungle_bounds();
        let threats = ThreatSnapshot::collect(world);

        for entity in world.tagged(Tag::EntropySerpent) {
            if world.read::<Energy>(entity).is_some_and(|e| !e.is_alive()) {
                kill_fauna(world, broadcaster, entity, None);
                continue;
            }
            let (Some(pos), Some(mut serpent)) = (
                world.read::<Position>(entity),
                world.read::<EntropySerpent>(entity),
            ) else {
                continue;
            };
            let previous = serpent.state;
            let max_turn = cfg.turn_rate * ctx.dt;
            let facing = |heading: f64| (heading.cos(), heading.sin());
            let mut vel = Velocity::default();
            let mut bite = false;

            match threats.nearest_within(&pos, cfg.detection_radius, |t| t.stage.is_jungle()) {
                Some(prey) => {
                    serpent.target = Some(prey.entity);
                    serpent.patrol_target = None;
                    let desired = (prey.position.y - pos.y).atan2(prey.position.x - pos.x);
                    serpent.heading = turn_towards(serpent.heading, desired, max_turn);
                    let (hx, hy) = facing(serpent.heading);
                    let dist = pos.distance(&prey.position);

                    if dist <= cfg.attack_range + cfg.head_offset {
                        serpent.state = SerpentState::Attack;
                        let ideal = cfg.head_offset + cfg.attack_range * cfg.ideal_distance_fraction;
                        let band = cfg.attack_range * cfg.stand_off_band_fraction;
                        if dist < ideal - band {
                            vel = Velocity { x: -hx * cfg.patrol_speed, y: -hy * cfg.patrol_speed };
                        } else if dist > ideal + band {
                            vel = Velocity { x: hx * cfg.patrol_speed, y: hy * cfg.patrol_speed };
                        }
                        let aligned = angle_diff(serpent.heading, desired).abs() <= cfg.facing_tolerance;
                        bite = aligned && ready(serpent.last_attack_time, ctx.now, cfg.attack_cooldown_ms);
                    } else {
                        serpent.state = SerpentState::Chase;
                        vel = Velocity { x: hx * cfg.chase_speed, y: hy * cfg.chase_speed };
                    }
                }
                None => {
                    serpent.state = SerpentState::Patrol;
                    serpent.target = None;
                    let target = match serpent.patrol_target {
                        Some(t) if pos.distance(&t) > cfg.arrival_distance => t,
                        _ => {
                            let mut t = random_point_in_circle(&mut world.rng, &serpent.home, cfg.patrol_radius);
                            bounds.clamp(&mut t, serpent.radius);
                            t
                        }
                    };
                    serpent.patrol_target = Some(target);
                    if let Some((dx, dy)) = direction(&pos, &target) {
                        serpent.heading = turn_towards(serpent.heading, dy.atan2(dx), max_turn);
                    }
                    let (hx, hy) = facing(serpent.heading);
                    vel = Velocity { x: hx * cfg.patrol_speed, y: hy * cfg.patrol_speed };
                }
            }

            if bite {
                serpent.last_attack_time = Some(ctx.now);
            }
            world.with_mut::<EntropySerpent, _>(entity, |s| *s = serpent);
            world.with_mut::<Velocity, _>(entity, |v| *v = vel);

            if serpent.state != previous {
                broadcaster.broadcast(GameEvent::EntropySerpentState(EntropySerpentState {
                    serpent_id: world.label(entity),
                    state: serpent.state,
                }));
            }
            if bite {
                strike(world, broadcaster, entity, &pos, &serpent, cfg);
            }
        }
    }
}

fn ready(last: Option<Timestamp>, now: Timestamp, cooldown_ms: f64) -> bool {
    last.map_or(true, |t| now - t >= cooldown_ms)
}

/// One cone from the head hits every qualifying jungle player.
fn strike(
    world: &mut World,
    broadcaster: &mut dyn Broadcaster,
    entity: Entity,
    body: &Position,
    serpent: &EntropySerpent,
    cfg: &SerpentConfig,
) {
    let head = serpent.head(body, cfg.head_offset);
    let cone = ArcTest {
        origin: head,
        facing: serpent.heading,
        min_range: 0.0,
        max_range: cfg.attack_range,
        half_arc: cfg.attack_half_arc,
    };
    let victims: Vec<Entity> = world
        .tagged(Tag::Player)
        .into_iter()
        .filter(|&p| {
            world.is_targetable(p)
                && world.read::<Stage>(p).is_some_and(|s| s.stage.is_jungle())
                && world
                    .read::<Position>(p)
                    .is_some_and(|pos| cone.hits(&pos, world.radius_of(p)))
        })
        .collect();

    let heading = (serpent.heading.cos(), serpent.heading.sin());
    for &victim in &victims {
        damage_player(world, victim, cfg.attack_damage, DamageSource::Serpent);
        record_drain(world, victim, DamageSource::Serpent, cfg.attack_damage);
        let push = world
            .read::<Position>(victim)
            .and_then(|p| direction(&head, &p))
            .unwrap_or(heading);
        apply_knockback(world, victim, push, cfg.knockback);
    }

    broadcaster.broadcast(GameEvent::EntropySerpentAttack(EntropySerpentAttack {
        serpent_id: world.label(entity),
        position: head,
        heading: serpent.heading,
        hit_player_ids: victims.iter().map(|&v| world.label(v)).collect(),
    }));
}
