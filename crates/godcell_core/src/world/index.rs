//! External-id side indices. Only [`super::World::destroy_entity`] removes
//! entries, and it always clears both directions of both maps.

use crate::error::{Result, WorldError};
use hecs::Entity;
use std::collections::HashMap;

#[derive(Debug, Default, Clone)]
pub struct IdIndex {
    string_to_entity: HashMap<String, Entity>,
    entity_to_string: HashMap<Entity, String>,
    socket_to_entity: HashMap<String, Entity>,
    entity_to_socket: HashMap<Entity, String>,
}

impl IdIndex {
    pub fn bind_string(&mut self, entity: Entity, id: &str) -> Result<()> {
        if self.string_to_entity.contains_key(id) {
            return Err(WorldError::duplicate_string_id(id));
        }
        if let Some(old) = self.entity_to_string.insert(entity, id.to_string()) {
            self.string_to_entity.remove(&old);
        }
        self.string_to_entity.insert(id.to_string(), entity);
        Ok(())
    }

    pub fn bind_socket(&mut self, entity: Entity, socket_id: &str) -> Result<()> {
        if self.socket_to_entity.contains_key(socket_id) {
            return Err(WorldError::duplicate_socket(socket_id));
        }
        if let Some(old) = self.entity_to_socket.insert(entity, socket_id.to_string()) {
            self.socket_to_entity.remove(&old);
        }
        self.socket_to_entity.insert(socket_id.to_string(), entity);
        Ok(())
    }

    #[must_use]
    pub fn by_string(&self, id: &str) -> Option<Entity> {
        self.string_to_entity.get(id).copied()
    }

    #[must_use]
    pub fn by_socket(&self, socket_id: &str) -> Option<Entity> {
        self.socket_to_entity.get(socket_id).copied()
    }

    #[must_use]
    pub fn string_of(&self, entity: Entity) -> Option<&str> {
        self.entity_to_string.get(&entity).map(String::as_str)
    }

    #[must_use]
    pub fn socket_of(&self, entity: Entity) -> Option<&str> {
        self.entity_to_socket.get(&entity).map(String::as_str)
    }

    pub fn purge(&mut self, entity: Entity) {
        if let Some(id) = self.entity_to_string.remove(&entity) {
            self.string_to_entity.remove(&id);
        }
        if let Some(socket) = self.entity_to_socket.remove(&entity) {
            self.socket_to_entity.remove(&socket);
        }
    }

    #[must_use]
    pub fn socket_count(&self) -> usize {
        self.socket_to_entity.len()
    }
}
