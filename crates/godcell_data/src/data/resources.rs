//! Static and respawning world content.

use hecs::Entity;

/// Soup pickup. Richer near gravity wells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nutrient {
    pub value: f64,
    pub capacity_reward: f64,
    pub value_multiplier: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tree {
    pub radius: f64,
}

/// Jungle pickup dropped under a tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataFruit {
    pub tree: Option<Entity>,
    pub value: f64,
    pub capacity_reward: f64,
}

/// Gravity well. Pulls soup entities inside `radius`, destroys them inside `core_radius`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub radius: f64,
    pub strength: f64,
    pub core_radius: f64,
}
