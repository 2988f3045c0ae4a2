//! Godcell: server-side simulation of a multiplayer evolution game.
//!
//! The implementation lives in the workspace crates. This crate gathers
//! them under [`model`] and carries the headless runner used by the
//! `godcell` binary and the integration tests.

pub mod headless;

pub mod model {
    pub use godcell_core::{
        abilities, combat, config, error, geometry, metrics, players, spawner, systems, world,
    };
    pub use godcell_core::{GameConfig, Metrics, System, SystemRunner, Tag, TickContext, World};
    pub use godcell_data as data;
    pub use godcell_net as net;
}
