//! Component schemas for the Godcell simulation.
//!
//! Every type here is a plain record attached to at most one entity of the
//! `hecs` world owned by `godcell_core`. Systems mutate fields in place; none of
//! these types carry behavior beyond small invariant-preserving helpers.

pub mod data;

pub use data::components::*;
pub use data::creatures::*;
pub use data::resources::*;
pub use data::stage::*;
pub use data::transient::*;

/// Simulation time in milliseconds.
pub type Timestamp = f64;
