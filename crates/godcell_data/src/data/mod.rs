//! Core data structures for the Godcell simulation.

pub mod components;
pub mod creatures;
pub mod resources;
pub mod stage;
pub mod transient;
