//! # Godcell Core
//!
//! The server-side simulation of Godcell, a multiplayer evolution game.
//!
//! This crate contains the deterministic tick logic:
//! - A `hecs`-backed component store with tag and id indices
//! - Player abilities (EMP, pseudopod, projectile, melee, traps)
//! - AI for swarms, cyber-bugs, jungle creatures, the entropy serpent and bots
//! - Physics, collisions, metabolism, death and respawn
//! - Metrics collection and structured logging
//!
//! ## Architecture
//!
//! The world owns every entity and all simulation state (clock, RNG, timer
//! and respawn queues). A [`SystemRunner`] advances it one tick at a time,
//! handing each system a [`godcell_net::Broadcaster`] for outbound events.
//!
//! ## Example
//!
//! ```
//! use godcell_core::{spawner, GameConfig, SystemRunner, World};
//! use godcell_net::EventLog;
//!
//! let mut config = GameConfig::default();
//! config.world.seed = Some(42);
//! let mut world = World::new(config);
//! let mut events = EventLog::new();
//! spawner::seed_world(&mut world, &mut events)?;
//!
//! let mut runner = SystemRunner::with_default_systems();
//! for _ in 0..60 {
//!     runner.update(&mut world, 1.0 / 60.0, &mut events);
//! }
//! assert_eq!(world.clock.tick, 60);
//! assert!(events.count("positionsUpdate") == 60);
//! # Ok::<(), godcell_core::error::WorldError>(())
//! ```

pub mod abilities;
pub mod combat;
pub mod config;
pub mod error;
pub mod geometry;
pub mod metrics;
pub mod players;
pub mod spawner;
pub mod systems;
pub mod world;

#[cfg(test)]
pub(crate) mod testing;

pub use config::GameConfig;
pub use error::{Result, WorldError};
pub use metrics::Metrics;
pub use players::{join_player, leave_player, respawn_player, spawn_bot};
pub use systems::{System, SystemRunner, TickContext};
pub use world::{Tag, World};
