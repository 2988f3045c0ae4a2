//! Creature and bot behavior.
//!
//! Every state machine reads a [`ThreatSnapshot`] built once at the start of
//! its run, then writes only its own creature's state and velocity.

pub mod bot;
pub mod cyber_bug;
pub mod jungle_creature;
pub mod serpent;
pub mod swarm;
pub mod threats;

pub use bot::BotAISystem;
pub use cyber_bug::CyberBugAISystem;
pub use jungle_creature::JungleCreatureAISystem;
pub use serpent::EntropySerpentAISystem;
pub use swarm::SwarmAISystem;
pub use threats::{Threat, ThreatSnapshot};

use crate::geometry::direction;
use godcell_data::{Position, Velocity};

/// Accelerates toward `target` and caps the speed. Returns `false` when the
/// direction is degenerate and nothing changed.
pub(crate) fn seek(
    velocity: &mut Velocity,
    from: &Position,
    target: &Position,
    acceleration: f64,
    max_speed: f64,
    dt: f64,
) -> bool {
    let Some((dx, dy)) = direction(from, target) else {
        return false;
    };
    velocity.x += dx * acceleration * dt;
    velocity.y += dy * acceleration * dt;
    velocity.cap(max_speed);
    true
}

/// Frame-rate independent damping; `retain` is the fraction kept per 1/60 s.
pub(crate) fn damp(velocity: &mut Velocity, retain: f64, dt: f64) {
    let k = retain.powf(dt * 60.0);
    velocity.x *= k;
    velocity.y *= k;
}
