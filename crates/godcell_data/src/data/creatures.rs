//! Per-creature AI components. Each carries its behavior state, a home
//! anchor and the rewards granted to whoever kills it.

use super::components::Position;
use crate::Timestamp;
use hecs::Entity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SwarmState {
    #[default]
    Patrol,
    Chase,
}

/// Soup antagonist. Seeks soup-stage players and drains them on contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Swarm {
    pub state: SwarmState,
    pub home: Position,
    pub patrol_target: Option<Position>,
    pub target: Option<Entity>,
    /// Set by EMP. Gates contact drain and movement while in the future.
    pub disabled_until: Option<Timestamp>,
    pub radius: f64,
}

impl Swarm {
    #[must_use]
    pub const fn new(home: Position, radius: f64) -> Self {
        Self {
            state: SwarmState::Patrol,
            home,
            patrol_target: None,
            target: None,
            disabled_until: None,
            radius,
        }
    }

    #[must_use]
    pub fn is_disabled(&self, now: Timestamp) -> bool {
        self.disabled_until.is_some_and(|until| until > now)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CyberBugState {
    #[default]
    Idle,
    Patrol,
    Flee,
}

/// Skittish jungle prey.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CyberBug {
    pub state: CyberBugState,
    pub home: Position,
    pub patrol_target: Option<Position>,
    pub value: f64,
    pub capacity_reward: f64,
    pub radius: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreatureVariant {
    Grazer,
    Stalker,
    Ambusher,
}

impl CreatureVariant {
    pub const ALL: [CreatureVariant; 3] = [
        CreatureVariant::Grazer,
        CreatureVariant::Stalker,
        CreatureVariant::Ambusher,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JungleCreatureState {
    #[default]
    Idle,
    Patrol,
    Hunt,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JungleCreature {
    pub variant: CreatureVariant,
    pub state: JungleCreatureState,
    pub home: Position,
    pub patrol_target: Option<Position>,
    pub hunt_target: Option<Entity>,
    pub value: f64,
    pub capacity_reward: f64,
    pub radius: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SerpentState {
    #[default]
    Patrol,
    Chase,
    Attack,
}

/// Apex predator of the jungle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntropySerpent {
    pub state: SerpentState,
    pub home: Position,
    /// Radians, `atan2` convention.
    pub heading: f64,
    pub patrol_target: Option<Position>,
    pub target: Option<Entity>,
    pub last_attack_time: Option<Timestamp>,
    pub radius: f64,
}

impl EntropySerpent {
    /// Head position: body center pushed forward along the heading.
    #[must_use]
    pub fn head(&self, body: &Position, head_offset: f64) -> Position {
        Position {
            x: body.x + self.heading.cos() * head_offset,
            y: body.y + self.heading.sin() * head_offset,
        }
    }
}
