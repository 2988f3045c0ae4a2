//! Runs the simulation without a transport and summarizes what happened.

use godcell_core::{metrics, spawner, GameConfig, SystemRunner, Tag, World};
use godcell_net::{Broadcaster, GameEvent};
use serde::Serialize;
use std::collections::BTreeMap;

/// Counts events by name instead of delivering them.
#[derive(Debug, Default)]
pub struct EventTally {
    pub broadcast: BTreeMap<&'static str, u64>,
    pub targeted: BTreeMap<&'static str, u64>,
}

impl Broadcaster for EventTally {
    fn broadcast(&mut self, event: GameEvent) {
        *self.broadcast.entry(event.name()).or_default() += 1;
    }

    fn emit_to(&mut self, _socket_id: &str, event: GameEvent) {
        *self.targeted.entry(event.name()).or_default() += 1;
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub fingerprint: String,
    pub ticks: u64,
    pub sim_ms: f64,
    pub entities: usize,
    pub players: usize,
    pub deaths: u64,
    pub kills: u64,
    pub evolutions: u64,
    pub respawns: u64,
    pub abilities_fired: u64,
    pub events: BTreeMap<&'static str, u64>,
}

/// Builds a world from `config`, optionally seeds it, and runs `ticks`
/// fixed steps at the configured tick rate.
pub fn run(config: GameConfig, ticks: u64, seed_content: bool) -> anyhow::Result<RunSummary> {
    config.validate()?;
    let fingerprint = config.fingerprint();
    let dt = 1.0 / f64::from(config.world.tick_rate.max(1));
    let mut world = World::new(config);
    let mut tally = EventTally::default();
    if seed_content {
        let seeded = spawner::seed_world(&mut world, &mut tally)?;
        tracing::debug!(?seeded, "Seeded headless world");
    }

    let mut runner = SystemRunner::with_default_systems();
    for _ in 0..ticks {
        runner.update(&mut world, dt, &mut tally);
    }

    let m = &world.metrics;
    let mut events = tally.broadcast;
    for (name, count) in tally.targeted {
        *events.entry(name).or_default() += count;
    }
    Ok(RunSummary {
        fingerprint,
        ticks: world.clock.tick,
        sim_ms: world.clock.now_ms,
        entities: world.entity_count(),
        players: world.count_tag(Tag::Player),
        deaths: m.counter(metrics::DEATHS),
        kills: m.counter(metrics::KILLS),
        evolutions: m.counter(metrics::EVOLUTIONS),
        respawns: m.counter(metrics::RESPAWNS),
        abilities_fired: m.counter(metrics::ABILITIES_FIRED),
        events,
    })
}
