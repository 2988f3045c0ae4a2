//! Error types for godcell_core.
//!
//! Ability preconditions never produce errors; they return `false`. The
//! variants here cover the external-id contract of the world, where a caller
//! can hand us an id that collides with or misses the indices.

use hecs::Entity;
use thiserror::Error;

/// Structural error raised by world operations that register or resolve
/// external ids.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorldError {
    /// Handle is not (or no longer) alive in the store
    #[error("Unknown entity: {0:?}")]
    UnknownEntity(Entity),

    /// A live entity is already bound to this socket
    #[error("Socket id already registered: {0}")]
    DuplicateSocketId(String),

    /// A live entity is already bound to this string id
    #[error("String id already registered: {0}")]
    DuplicateStringId(String),
}

/// Result type alias for world operations.
pub type Result<T> = std::result::Result<T, WorldError>;

impl WorldError {
    #[must_use]
    pub fn duplicate_socket<S: Into<String>>(id: S) -> Self {
        Self::DuplicateSocketId(id.into())
    }

    #[must_use]
    pub fn duplicate_string_id<S: Into<String>>(id: S) -> Self {
        Self::DuplicateStringId(id.into())
    }
}
