use crate::combat::{damage_player, record_drain};
use crate::geometry::direction;
use crate::systems::{priority, System, TickContext};
use crate::world::{Tag, World};
use godcell_data::{DamageSource, Energy, Obstacle, Position, Stage, Velocity};
use godcell_net::Broadcaster;
use hecs::Entity;

/// Gravity wells in the soup. Pull is inverse-square, capped, and the core
/// is lethal.
#[derive(Debug, Default)]
pub struct GravitySystem;

impl System for GravitySystem {
    fn name(&self) -> &'static str {
        "gravity"
    }

    fn priority(&self) -> u32 {
        priority::GRAVITY
    }

    fn run(&mut self, world: &mut World, ctx: TickContext, _broadcaster: &mut dyn Broadcaster) {
        let max_accel = world.config.gravity.max_acceleration;
        let wells: Vec<(Position, Obstacle)> = world
            .tagged(Tag::Obstacle)
            .into_iter()
            .filter_map(|o| Some((world.read::<Position>(o)?, world.read::<Obstacle>(o)?)))
            .collect();
        if wells.is_empty() {
            return;
        }

        let mut swallowed: Vec<Entity> = Vec::new();
        for player in world.tagged(Tag::Player) {
            let (Some(pos), Some(stage), Some(energy)) = (
                world.read::<Position>(player),
                world.read::<Stage>(player),
                world.read::<Energy>(player),
            ) else {
                continue;
            };
            if !stage.stage.is_soup() || !energy.is_alive() {
                continue;
            }

            let (mut ax, mut ay) = (0.0, 0.0);
            for (center, well) in &wells {
                let dist = pos.distance(center);
                if dist > well.radius {
                    continue;
                }
                if dist <= well.core_radius {
                    swallowed.push(player);
                }
                let Some((dx, dy)) = direction(&pos, center) else {
                    continue;
                };
                let pull = (well.strength / (dist * dist)).min(max_accel);
                ax += dx * pull;
                ay += dy * pull;
            }
            if ax != 0.0 || ay != 0.0 {
                world.with_mut::<Velocity, _>(player, |v| {
                    v.x += ax * ctx.dt;
                    v.y += ay * ctx.dt;
                });
            }
        }

        for player in swallowed {
            if !world.is_targetable(player) {
                continue;
            }
            let current = world.read::<Energy>(player).map_or(0.0, |e| e.current);
            damage_player(world, player, current, DamageSource::Singularity);
            record_drain(world, player, DamageSource::Singularity, current);
            tracing::debug!(player = %world.label(player), "Player crossed a singularity core");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{self, player};
    use godcell_data::{DamageTracking, EvolutionStage};
    use godcell_net::NullBroadcaster;

    fn ctx() -> TickContext {
        TickContext {
            dt: 1.0 / 60.0,
            now: 0.0,
            tick: 1,
        }
    }

    #[test]
    fn well_pulls_nearby_soup_player() {
        let mut world = testing::world();
        world.spawn_obstacle(Position::new(2400.0, 1600.0));
        let p = player(&mut world, "p", EvolutionStage::SingleCell, 2600.0, 1600.0);

        GravitySystem.run(&mut world, ctx(), &mut NullBroadcaster);
        let v = world.read::<Velocity>(p).expect("velocity");
        assert!(v.x < 0.0);
        assert!(v.y.abs() < 1e-9);
    }

    #[test]
    fn core_drains_player_with_singularity_source() {
        let mut world = testing::world();
        world.spawn_obstacle(Position::new(2400.0, 1600.0));
        let p = player(&mut world, "p", EvolutionStage::SingleCell, 2410.0, 1600.0);

        GravitySystem.run(&mut world, ctx(), &mut NullBroadcaster);
        assert_eq!(testing::energy(&world, p), 0.0);
        let source = world.get::<DamageTracking>(p).and_then(|t| t.last_damage_source);
        assert_eq!(source, Some(DamageSource::Singularity));
    }

    #[test]
    fn jungle_players_ignore_wells() {
        let mut world = testing::world();
        world.spawn_obstacle(Position::new(2400.0, 1600.0));
        let p = player(&mut world, "p", EvolutionStage::CyberOrganism, 2410.0, 1600.0);

        GravitySystem.run(&mut world, ctx(), &mut NullBroadcaster);
        assert_eq!(world.read::<Velocity>(p), Some(Velocity::default()));
        assert!(testing::energy(&world, p) > 0.0);
    }
}
