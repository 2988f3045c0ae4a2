//! Wire-level schema shared by the simulation core and its transports.
//!
//! The core never touches sockets. It produces [`GameEvent`]s through a
//! [`Broadcaster`] and consumes [`ClientIntent`]s queued by whatever host owns
//! the connections.

pub mod broadcaster;
pub mod events;
pub mod intents;

pub use broadcaster::{Broadcaster, Delivery, EventLog, NullBroadcaster};
pub use events::*;
pub use intents::{ClientIntent, MeleeAttackType};
