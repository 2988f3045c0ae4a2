//! Deadline-ordered queues for work that completes outside the tick that
//! created it: beam retraction, evolution completion, creature respawns.

use godcell_data::{CreatureVariant, Position, Timestamp};
use hecs::Entity;

/// Entries pop in deadline order; equal deadlines pop in insertion order.
#[derive(Debug, Clone)]
pub struct DeadlineQueue<T> {
    entries: Vec<(Timestamp, T)>,
}

impl<T> Default for DeadlineQueue<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> DeadlineQueue<T> {
    pub fn push(&mut self, due_at: Timestamp, item: T) {
        let idx = self.entries.partition_point(|(t, _)| *t <= due_at);
        self.entries.insert(idx, (due_at, item));
    }

    /// Removes and returns every entry due at or before `now`.
    pub fn pop_due(&mut self, now: Timestamp) -> Vec<T> {
        let split = self.entries.partition_point(|(t, _)| *t <= now);
        self.entries.drain(..split).map(|(_, item)| item).collect()
    }

    #[must_use]
    pub fn next_due(&self) -> Option<Timestamp> {
        self.entries.first().map(|(t, _)| *t)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|(_, item)| item)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Timer completions. The target may be gone by the time one fires.
#[derive(Debug, Clone, PartialEq)]
pub enum DeferredAction {
    RetractPseudopod { pseudopod: Entity },
    FinishEvolution { player: Entity },
}

#[derive(Debug, Clone, PartialEq)]
pub enum RespawnRequest {
    Swarm { home: Position },
    CyberBug { home: Position },
    JungleCreature { variant: CreatureVariant, home: Position },
    EntropySerpent { home: Position },
    /// Nutrients reappear at a fresh random soup position.
    Nutrient,
    DataFruit { tree: Option<Entity>, position: Position },
    Player { player: Entity },
}

pub type TimerQueue = DeadlineQueue<DeferredAction>;
pub type RespawnQueue = DeadlineQueue<RespawnRequest>;
