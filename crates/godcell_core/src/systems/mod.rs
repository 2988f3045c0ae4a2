//! Tick systems.
//!
//! A tick is one pass over every registered [`System`] in priority order.
//! Priorities are grouped in bands; the band order carries the data
//! dependencies between systems:
//!
//! | Band | Systems | Runs after .. because it reads .. |
//! |------|---------|-----------------------------------|
//! | 100 | AI (bugs, creatures, swarms, serpent, bots) | nothing this tick |
//! | 200 | gravity | AI-written velocities, adds well pull |
//! | 300 | queued intents (abilities) | AI steering, so intents override |
//! | 400 | collisions, traps, projectiles, pseudopods | positions from last movement |
//! | 500 | movement, knockback | `Slowed` and stuns written by collisions |
//! | 600 | metabolism | damage already applied this tick |
//! | 700 | resource pickup | post-movement positions |
//! | 800 | death, deferred actions, respawns | every damage source of the tick |
//! | 900 | damage summary, network | settled state of the tick |

pub mod ai;
pub mod collision;
pub mod intent;
pub mod lifecycle;
pub mod network;
pub mod physics;
pub mod runner;

pub use runner::SystemRunner;

use crate::world::World;
use godcell_data::Timestamp;
use godcell_net::Broadcaster;

pub mod priority {
    pub const AI: u32 = 100;
    pub const GRAVITY: u32 = 200;
    pub const ABILITIES: u32 = 300;
    pub const COLLISIONS: u32 = 400;
    pub const MOVEMENT: u32 = 500;
    pub const METABOLISM: u32 = 600;
    pub const RESOURCES: u32 = 700;
    pub const DEATH: u32 = 800;
    pub const NETWORK: u32 = 900;
}

/// Per-tick values handed to every system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickContext {
    /// Seconds since the previous tick.
    pub dt: f64,
    pub now: Timestamp,
    pub tick: u64,
}

pub trait System: Send {
    fn name(&self) -> &'static str;
    fn priority(&self) -> u32;
    fn run(&mut self, world: &mut World, ctx: TickContext, broadcaster: &mut dyn Broadcaster);
}
