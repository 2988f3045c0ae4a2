use super::bodies;
use crate::systems::{priority, System, TickContext};
use crate::world::{Tag, World};
use godcell_data::{Position, Tree};
use godcell_net::Broadcaster;
use hecs::Entity;

/// Trees are solid: an overlapping jungle player is pushed out along the
/// tree-to-player axis by exactly the overlap.
#[derive(Debug, Default)]
pub struct TreeCollisionSystem;

impl System for TreeCollisionSystem {
    fn name(&self) -> &'static str {
        "tree_collision"
    }

    fn priority(&self) -> u32 {
        priority::COLLISIONS
    }

    fn run(&mut self, world: &mut World, _ctx: TickContext, _broadcaster: &mut dyn Broadcaster) {
        let trees: Vec<(Position, f64)> = world
            .tagged(Tag::Tree)
            .into_iter()
            .filter_map(|t| Some((world.read::<Position>(t)?, world.read::<Tree>(t)?.radius)))
            .collect();
        if trees.is_empty() {
            return;
        }

        let mut pushes: Vec<(Entity, f64, f64)> = Vec::new();
        for body in bodies(world, |s| s.stage.is_jungle()) {
            for (center, radius) in &trees {
                let dx = body.position.x - center.x;
                let dy = body.position.y - center.y;
                let dist = dx.hypot(dy);
                let overlap = body.stage.radius + radius - dist;
                if overlap <= 0.0 {
                    continue;
                }
                let (nx, ny) = if dist > crate::geometry::EPSILON {
                    (dx / dist, dy / dist)
                } else {
                    (1.0, 0.0)
                };
                pushes.push((body.entity, nx * overlap, ny * overlap));
            }
        }

        for (entity, x, y) in pushes {
            world.with_mut::<Position, _>(entity, |p| {
                p.x += x;
                p.y += y;
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{self, player};
    use godcell_data::EvolutionStage;
    use godcell_net::NullBroadcaster;

    fn run(world: &mut World) {
        let ctx = TickContext {
            dt: 1.0 / 60.0,
            now: 0.0,
            tick: 1,
        };
        TreeCollisionSystem.run(world, ctx, &mut NullBroadcaster);
    }

    #[test]
    fn overlapping_player_is_pushed_to_contact_distance() {
        let mut world = testing::world();
        world.spawn_tree(Position::new(1000.0, 1000.0));
        let p = player(&mut world, "p", EvolutionStage::CyberOrganism, 1100.0, 1000.0);

        run(&mut world);
        let contact = world.config.resources.tree_radius + world.config.stages.cyber_organism.radius;
        let x = world.read::<Position>(p).map(|pos| pos.x).expect("position");
        assert!((x - (1000.0 + contact)).abs() < 1e-9);
    }

    #[test]
    fn coincident_player_is_pushed_along_x() {
        let mut world = testing::world();
        world.spawn_tree(Position::new(1000.0, 1000.0));
        let p = player(&mut world, "p", EvolutionStage::CyberOrganism, 1000.0, 1000.0);

        run(&mut world);
        let pos = world.read::<Position>(p).expect("position");
        assert!(pos.x > 1000.0);
        assert_eq!(pos.y, 1000.0);
    }
}
