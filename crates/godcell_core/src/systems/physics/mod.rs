//! Forces and integration: gravity wells, player and creature movement,
//! knockback decay.

mod gravity;
mod knockback;
mod movement;

pub use gravity::GravitySystem;
pub use knockback::KnockbackSystem;
pub use movement::MovementSystem;

use crate::geometry::Bounds;
use crate::world::{Tag, World};
use godcell_data::Stage;
use hecs::Entity;

/// Region an entity is confined to: players by stage, swarms to the soup,
/// all other fauna to the jungle.
pub(crate) fn region_bounds(world: &World, entity: Entity) -> Option<Bounds> {
    let cfg = &world.config.world;
    if let Some(stage) = world.read::<Stage>(entity) {
        return Some(cfg.bounds_for(stage.stage.region()));
    }
    if world.has_tag(entity, Tag::Swarm) {
        return Some(cfg.soup_bounds());
    }
    let jungle_fauna = [Tag::CyberBug, Tag::JungleCreature, Tag::EntropySerpent];
    jungle_fauna
        .iter()
        .any(|&t| world.has_tag(entity, t))
        .then(|| cfg.jungle_bounds())
}
