//! Short-lived entities created by ability resolution.

use super::components::Position;
use crate::Timestamp;
use hecs::Entity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trap {
    pub owner: Entity,
    pub placed_at: Timestamp,
    pub expires_at: Timestamp,
    pub trigger_radius: f64,
    pub damage: f64,
    pub stun_duration_ms: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    pub owner: Entity,
    pub origin: Position,
    /// Unit vector.
    pub direction: (f64, f64),
    pub speed: f64,
    pub max_distance: f64,
    pub traveled: f64,
    pub damage: f64,
    pub radius: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PseudopodMode {
    /// Travels like a projectile until it hits or reaches its range.
    #[default]
    Beam,
    /// Resolves instantly inside an arc, then lingers until retracted.
    Strike,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pseudopod {
    pub owner: Entity,
    pub origin: Position,
    pub direction: (f64, f64),
    pub speed: f64,
    pub max_distance: f64,
    pub traveled: f64,
    pub damage: f64,
    pub width: f64,
    pub mode: PseudopodMode,
    /// Set once the beam connected or ran out; it is then inert.
    pub spent: bool,
}
