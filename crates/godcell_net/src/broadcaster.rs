use crate::events::GameEvent;

/// Outbound capability required by the core: fan out to everyone, or emit to
/// one socket.
pub trait Broadcaster {
    fn broadcast(&mut self, event: GameEvent);
    fn emit_to(&mut self, socket_id: &str, event: GameEvent);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    All,
    Socket(String),
}

/// In-memory broadcaster. Keeps every event in emission order.
#[derive(Debug, Default)]
pub struct EventLog {
    pub entries: Vec<(Delivery, GameEvent)>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> impl Iterator<Item = &GameEvent> {
        self.entries.iter().map(|(_, e)| e)
    }

    /// Number of events emitted under `name`.
    #[must_use]
    pub fn count(&self, name: &str) -> usize {
        self.events().filter(|e| e.name() == name).count()
    }

    #[must_use]
    pub fn named(&self, name: &str) -> Vec<&GameEvent> {
        self.events().filter(|e| e.name() == name).collect()
    }

    /// Events addressed to one socket only.
    #[must_use]
    pub fn sent_to(&self, socket_id: &str) -> Vec<&GameEvent> {
        self.entries
            .iter()
            .filter(|(d, _)| matches!(d, Delivery::Socket(s) if s == socket_id))
            .map(|(_, e)| e)
            .collect()
    }

    pub fn drain(&mut self) -> Vec<(Delivery, GameEvent)> {
        std::mem::take(&mut self.entries)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Broadcaster for EventLog {
    fn broadcast(&mut self, event: GameEvent) {
        self.entries.push((Delivery::All, event));
    }

    fn emit_to(&mut self, socket_id: &str, event: GameEvent) {
        self.entries
            .push((Delivery::Socket(socket_id.to_string()), event));
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullBroadcaster;

impl Broadcaster for NullBroadcaster {
    fn broadcast(&mut self, _event: GameEvent) {}
    fn emit_to(&mut self, _socket_id: &str, _event: GameEvent) {}
}
