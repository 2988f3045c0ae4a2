//! Bot-controlled players. Bots steer through `InputDirection` like humans
//! and fire abilities through the same functions the intent system calls.

use crate::abilities::{
    can_fire_emp, can_fire_melee, can_fire_projectile, can_fire_pseudopod, can_place_trap,
    fire_emp, fire_melee, fire_projectile, fire_pseudopod, place_trap,
};
use crate::geometry::{direction, normalize};
use crate::systems::lifecycle::assign_random_specialization;
use crate::systems::{priority, System, TickContext};
use crate::world::{Tag, World};
use godcell_data::{
    Bot, CombatSpecialization, Energy, EvolutionStage, InputDirection, Position, Specialization,
    Stage, Swarm,
};
use godcell_net::{Broadcaster, MeleeAttackType};
use hecs::Entity;

#[derive(Debug, Default)]
pub struct BotAISystem;

/// Nearest entity under `tag` within `radius` that passes `filter`.
fn nearest(
    world: &World,
    tag: Tag,
    from: &Position,
    radius: f64,
    filter: impl Fn(Entity) -> bool,
) -> Option<(Entity, Position, f64)> {
    world
        .tagged(tag)
        .into_iter()
        .filter(|&e| filter(e))
        .filter_map(|e| world.read::<Position>(e).map(|p| (e, p, p.distance(from))))
        .filter(|(_, _, d)| *d <= radius)
        .min_by(|a, b| a.2.total_cmp(&b.2))
}

enum Plan {
    Toward(Position),
    AwayFrom(Position),
    Wander,
}

impl System for BotAISystem {
    fn name(&self) -> &'static str {
        "bot_ai"
    }

    fn priority(&self) -> u32 {
        priority::AI
    }

    fn run(&mut self, world: &mut World, ctx: TickContext, broadcaster: &mut dyn Broadcaster) {
        let config = world.config.clone();
        let cfg = &config.bots;

        for bot in world.tagged(Tag::Bot) {
            let (Some(mut brain), Some(pos), Some(stage), Some(energy)) = (
                world.read::<Bot>(bot),
                world.read::<Position>(bot),
                world.read::<Stage>(bot),
                world.read::<Energy>(bot),
            ) else {
                continue;
            };
            if !energy.is_alive() || stage.is_evolving || ctx.now < brain.next_decision_at {
                continue;
            }
            brain.next_decision_at = ctx.now + cfg.decision_interval_ms;

            let plan = if stage.stage.is_soup() {
                soup_plan(world, broadcaster, bot, &pos, stage.stage)
            } else {
                jungle_plan(world, broadcaster, bot, &pos)
            };

            let bounds = config.world.bounds_for(stage.stage.region());
            let steer = match plan {
                Plan::Toward(target) => direction(&pos, &target),
                Plan::AwayFrom(threat) => direction(&threat, &pos),
                Plan::Wander => {
                    let target = match brain.wander_target {
                        Some(t) if bounds.contains(&t) && t.distance(&pos) > stage.radius => t,
                        _ => bounds.random_point(&mut world.rng, stage.radius),
                    };
                    brain.wander_target = Some(target);
                    direction(&pos, &target)
                }
            };
            let (x, y) = steer.and_then(|(x, y)| normalize(x, y)).unwrap_or((0.0, 0.0));
            world.with_mut::<InputDirection, _>(bot, |d| *d = InputDirection { x, y });
            world.with_mut::<Bot, _>(bot, |b| *b = brain);
        }
    }
}

fn soup_plan(
    world: &mut World,
    broadcaster: &mut dyn Broadcaster,
    bot: Entity,
    pos: &Position,
    stage: EvolutionStage,
) -> Plan {
    let cfg = world.config.clone();
    let now = world.now();

    let swarm = nearest(world, Tag::Swarm, pos, cfg.bots.flee_distance, |s| {
        world.read::<Swarm>(s).is_some_and(|s| !s.is_disabled(now))
    });
    if let Some((_, swarm_pos, dist)) = swarm {
        if stage == EvolutionStage::MultiCell
            && dist <= cfg.bots.emp_trigger_distance
            && can_fire_emp(world, bot)
        {
            fire_emp(world, broadcaster, bot);
        }
        return Plan::AwayFrom(swarm_pos);
    }

    if stage == EvolutionStage::MultiCell {
        let prey = nearest(world, Tag::Player, pos, cfg.bots.hunt_range, |p| {
            p != bot
                && world.is_targetable(p)
                && world
                    .read::<Stage>(p)
                    .is_some_and(|s| s.stage == EvolutionStage::SingleCell)
        });
        if let Some((_, prey_pos, dist)) = prey {
            if dist <= cfg.pseudopod.range && can_fire_pseudopod(world, bot) {
                fire_pseudopod(world, broadcaster, bot, prey_pos.x, prey_pos.y);
            }
            return Plan::Toward(prey_pos);
        }
    }

    match nearest(world, Tag::Nutrient, pos, f64::INFINITY, |_| true) {
        Some((_, nutrient, _)) => Plan::Toward(nutrient),
        None => Plan::Wander,
    }
}

fn jungle_plan(
    world: &mut World,
    broadcaster: &mut dyn Broadcaster,
    bot: Entity,
    pos: &Position,
) -> Plan {
    let cfg = world.config.clone();
    if world
        .read::<CombatSpecialization>(bot)
        .is_some_and(|c| c.specialization.is_none())
    {
        // Bots never wait out the selection prompt.
        assign_random_specialization(world, broadcaster, bot);
    }
    let Some(specialization) = world
        .read::<CombatSpecialization>(bot)
        .and_then(|c| c.specialization)
    else {
        return Plan::Wander;
    };

    let prey = [Tag::CyberBug, Tag::JungleCreature]
        .into_iter()
        .filter_map(|tag| {
            nearest(world, tag, pos, cfg.bots.hunt_range, |e| {
                world.read::<Energy>(e).is_some_and(|en| en.is_alive())
            })
        })
        .min_by(|a, b| a.2.total_cmp(&b.2));

    if let Some((target, target_pos, dist)) = prey {
        let reach = world.radius_of(target);
        match specialization {
            Specialization::Ranged => {
                if dist <= cfg.projectile.max_distance && can_fire_projectile(world, bot) {
                    fire_projectile(world, broadcaster, bot, target_pos.x, target_pos.y);
                }
            }
            Specialization::Melee => {
                let attack = if dist <= cfg.melee.swipe.max_range + reach {
                    Some(MeleeAttackType::Swipe)
                } else if dist <= cfg.melee.thrust.max_range + reach {
                    Some(MeleeAttackType::Thrust)
                } else {
                    None
                };
                if let Some(attack) = attack.filter(|&a| can_fire_melee(world, bot, a)) {
                    fire_melee(world, broadcaster, bot, attack, target_pos.x, target_pos.y);
                }
            }
            Specialization::Traps => {
                if dist <= cfg.trap.trigger_radius * 3.0 && can_place_trap(world, bot) {
                    place_trap(world, broadcaster, bot);
                }
            }
        }
        return Plan::Toward(target_pos);
    }

    match nearest(world, Tag::DataFruit, pos, f64::INFINITY, |_| true) {
        Some((_, fruit, _)) => Plan::Toward(fruit),
        None => Plan::Wander,
    }
}
