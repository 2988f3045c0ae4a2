//! Contact systems. Each one gathers qualifying pairs first and applies
//! effects in a second pass, so nothing iterated is mutated mid-iteration.

mod macro_resource;
mod nutrient;
mod predation;
mod projectile;
mod pseudopod;
mod swarm;
mod trap;
mod tree;

pub use macro_resource::MacroResourceCollisionSystem;
pub use nutrient::NutrientCollisionSystem;
pub use predation::PredationSystem;
pub use projectile::ProjectileSystem;
pub use pseudopod::PseudopodSystem;
pub use swarm::SwarmCollisionSystem;
pub use trap::TrapSystem;
pub use tree::TreeCollisionSystem;

use crate::world::{Tag, World};
use godcell_data::{Position, Stage};
use hecs::Entity;

/// A living, non-evolving player as seen by contact checks.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Body {
    pub entity: Entity,
    pub position: Position,
    pub stage: Stage,
}

impl Body {
    pub fn touches(&self, other: &Position, other_radius: f64) -> bool {
        self.position.distance(other) < self.stage.radius + other_radius
    }
}

/// Targetable players whose stage passes `filter`.
pub(crate) fn bodies(world: &World, filter: impl Fn(&Stage) -> bool) -> Vec<Body> {
    world
        .tagged(Tag::Player)
        .into_iter()
        .filter(|&p| world.is_targetable(p))
        .filter_map(|p| {
            let stage = world.read::<Stage>(p).filter(|s| filter(s))?;
            Some(Body {
                entity: p,
                position: world.read::<Position>(p)?,
                stage,
            })
        })
        .collect()
}
