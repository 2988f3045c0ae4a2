//! Initial content placement. Everything goes through the world's factory
//! methods; this module only decides where.

use crate::error::Result;
use crate::players::spawn_bot;
use crate::world::{Tag, World};
use godcell_data::{CreatureVariant, EvolutionStage, Obstacle, Position};
use godcell_net::Broadcaster;
use hecs::Entity;

const TREE_PLACEMENT_ATTEMPTS: usize = 16;

/// Counts of what [`seed_world`] placed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub obstacles: usize,
    pub nutrients: usize,
    pub swarms: usize,
    pub trees: usize,
    pub fruit: usize,
    pub cyber_bugs: usize,
    pub jungle_creatures: usize,
    pub serpents: usize,
    pub bots: usize,
}

/// Value multiplier for a nutrient at `position`: boosted inside the pull
/// of any gravity well.
#[must_use]
pub fn nutrient_multiplier(world: &World, position: &Position) -> f64 {
    let in_well = world.tagged(Tag::Obstacle).into_iter().any(|o| {
        match (world.read::<Position>(o), world.read::<Obstacle>(o)) {
            (Some(center), Some(well)) => center.distance(position) <= well.radius,
            _ => false,
        }
    });
    if in_well {
        world.config.resources.nutrient_gravity_bonus
    } else {
        1.0
    }
}

/// A nutrient at a random soup position.
pub fn spawn_random_nutrient(world: &mut World) -> Entity {
    let margin = world.config.resources.nutrient_radius;
    let position = world.config.world.soup_bounds().random_point(&mut world.rng, margin);
    let multiplier = nutrient_multiplier(world, &position);
    world.spawn_nutrient(position, multiplier)
}

/// Where a tree's fruit hangs.
#[must_use]
pub fn fruit_anchor(world: &World, tree: &Position) -> Position {
    let r = &world.config.resources;
    Position::new(tree.x, tree.y - (r.tree_radius + r.fruit_radius))
}

/// A random jungle point clear of the soup rectangle. Falls back to the
/// last candidate if the jungle is too crowded to find one.
fn jungle_point(world: &mut World, margin: f64) -> Position {
    let jungle = world.config.world.jungle_bounds();
    let soup = world.config.world.soup_bounds();
    let mut candidate = jungle.random_point(&mut world.rng, margin);
    for _ in 0..TREE_PLACEMENT_ATTEMPTS {
        if !soup.contains(&candidate) {
            break;
        }
        candidate = jungle.random_point(&mut world.rng, margin);
    }
    candidate
}

/// Populates an empty world from the config counts. Obstacles go first so
/// nutrient multipliers see them.
pub fn seed_world(world: &mut World, broadcaster: &mut dyn Broadcaster) -> Result<SeedSummary> {
    let config = world.config.clone();
    let soup = config.world.soup_bounds();
    let mut summary = SeedSummary::default();

    for _ in 0..config.gravity.count {
        let position = soup.random_point(&mut world.rng, config.gravity.core_radius);
        world.spawn_obstacle(position);
        summary.obstacles += 1;
    }
    for _ in 0..config.resources.nutrient_count {
        spawn_random_nutrient(world);
        summary.nutrients += 1;
    }
    for _ in 0..config.swarm.count {
        let home = soup.random_point(&mut world.rng, config.swarm.radius);
        world.spawn_swarm(home);
        summary.swarms += 1;
    }

    for _ in 0..config.resources.tree_count {
        let position = jungle_point(world, config.resources.tree_radius);
        let tree = world.spawn_tree(position);
        let anchor = fruit_anchor(world, &position);
        world.spawn_data_fruit(Some(tree), anchor);
        summary.trees += 1;
        summary.fruit += 1;
    }
    for _ in 0..config.cyber_bug.count {
        let home = jungle_point(world, config.cyber_bug.radius);
        world.spawn_cyber_bug(home);
        summary.cyber_bugs += 1;
    }
    for variant in CreatureVariant::ALL {
        let radius = config.jungle_creature.tuning(variant).radius;
        for _ in 0..config.jungle_creature.count_per_variant {
            let home = jungle_point(world, radius);
            world.spawn_jungle_creature(variant, home);
            summary.jungle_creatures += 1;
        }
    }
    for _ in 0..config.serpent.count {
        let home = jungle_point(world, config.serpent.radius);
        world.spawn_serpent(home);
        summary.serpents += 1;
    }

    for _ in 0..config.bots.soup_bots {
        spawn_bot(world, broadcaster, EvolutionStage::SingleCell)?;
        summary.bots += 1;
    }
    for _ in 0..config.bots.jungle_bots {
        spawn_bot(world, broadcaster, EvolutionStage::CyberOrganism)?;
        summary.bots += 1;
    }

    tracing::info!(?summary, "World seeded");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;
    use godcell_net::NullBroadcaster;

    #[test]
    fn seeding_matches_config_counts() {
        let mut world = testing::world();
        let summary = seed_world(&mut world, &mut NullBroadcaster).expect("seeded");
        let cfg = world.config.clone();

        assert_eq!(world.count_tag(Tag::Nutrient), cfg.resources.nutrient_count);
        assert_eq!(world.count_tag(Tag::Obstacle), cfg.gravity.count);
        assert_eq!(world.count_tag(Tag::Tree), cfg.resources.tree_count);
        assert_eq!(world.count_tag(Tag::DataFruit), cfg.resources.tree_count);
        assert_eq!(world.count_tag(Tag::Bot), cfg.bots.soup_bots + cfg.bots.jungle_bots);
        assert_eq!(summary.serpents, cfg.serpent.count);
    }

    #[test]
    fn nutrients_inside_wells_are_boosted() {
        let mut world = testing::world();
        let well = Position::new(2400.0, 1600.0);
        world.spawn_obstacle(well);
        let near = Position::new(well.x + 10.0, well.y);
        let far = Position::new(well.x + world.config.gravity.radius + 1.0, well.y);

        assert_eq!(nutrient_multiplier(&world, &near), world.config.resources.nutrient_gravity_bonus);
        assert_eq!(nutrient_multiplier(&world, &far), 1.0);
    }
}
