use hecs::Entity;
use std::collections::{BTreeSet, HashMap};

/// Capability tags. Iteration over a tag is ordered by entity handle, so a
/// seeded run visits entities in the same order every time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tag {
    Player,
    Bot,
    Swarm,
    CyberBug,
    JungleCreature,
    EntropySerpent,
    Nutrient,
    Obstacle,
    Tree,
    DataFruit,
    Trap,
    Projectile,
    Pseudopod,
}

#[derive(Debug, Default, Clone)]
pub struct TagIndex {
    by_tag: HashMap<Tag, BTreeSet<Entity>>,
    by_entity: HashMap<Entity, Vec<Tag>>,
}

impl TagIndex {
    pub fn insert(&mut self, entity: Entity, tag: Tag) {
        if self.by_tag.entry(tag).or_default().insert(entity) {
            self.by_entity.entry(entity).or_default().push(tag);
        }
    }

    pub fn remove(&mut self, entity: Entity, tag: Tag) -> bool {
        let removed = self
            .by_tag
            .get_mut(&tag)
            .is_some_and(|set| set.remove(&entity));
        if removed {
            if let Some(tags) = self.by_entity.get_mut(&entity) {
                tags.retain(|t| *t != tag);
            }
        }
        removed
    }

    #[must_use]
    pub fn has(&self, entity: Entity, tag: Tag) -> bool {
        self.by_tag.get(&tag).is_some_and(|set| set.contains(&entity))
    }

    pub fn iter(&self, tag: Tag) -> impl Iterator<Item = Entity> + '_ {
        self.by_tag.get(&tag).into_iter().flatten().copied()
    }

    #[must_use]
    pub fn count(&self, tag: Tag) -> usize {
        self.by_tag.get(&tag).map_or(0, BTreeSet::len)
    }

    /// Drops every tag of `entity`.
    pub fn purge(&mut self, entity: Entity) {
        if let Some(tags) = self.by_entity.remove(&entity) {
            for tag in tags {
                if let Some(set) = self.by_tag.get_mut(&tag) {
                    set.remove(&entity);
                }
            }
        }
    }
}
