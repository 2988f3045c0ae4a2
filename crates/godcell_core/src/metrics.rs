//! Tick timing and named counters.
//!
//! Systems bump counters through the shared `Arc<Metrics>` on the world; the
//! server's stats endpoint and the headless runner read them back.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

pub const DEATHS: &str = "deaths";
pub const KILLS: &str = "kills";
pub const ABILITIES_FIRED: &str = "abilities_fired";
pub const EVOLUTIONS: &str = "evolutions";
pub const RESPAWNS: &str = "respawns";

/// A summary line is logged every this many ticks.
const REPORT_EVERY: u64 = 3600;

pub struct Metrics {
    ticks: AtomicU64,
    entities: AtomicU64,
    players: AtomicU64,
    last_tick_us: AtomicU64,
    peak_tick_us: AtomicU64,
    counters: Mutex<BTreeMap<&'static str, u64>>,
    started: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metrics")
            .field("ticks", &self.tick_count())
            .field("peak_tick", &self.peak_tick_duration())
            .finish_non_exhaustive()
    }
}

impl Metrics {
    #[must_use]
    pub fn new() -> Self {
        Self {
            ticks: AtomicU64::new(0),
            entities: AtomicU64::new(0),
            players: AtomicU64::new(0),
            last_tick_us: AtomicU64::new(0),
            peak_tick_us: AtomicU64::new(0),
            counters: Mutex::new(BTreeMap::new()),
            started: Instant::now(),
        }
    }

    /// Stores the gauges for a finished tick and keeps the slowest duration.
    pub fn record_tick(&self, duration: Duration, entities: usize, players: usize) {
        let micros = u64::try_from(duration.as_micros()).unwrap_or(u64::MAX);
        let tick = self.ticks.fetch_add(1, Ordering::Relaxed) + 1;
        self.entities.store(entities as u64, Ordering::Relaxed);
        self.players.store(players as u64, Ordering::Relaxed);
        self.last_tick_us.store(micros, Ordering::Relaxed);
        self.peak_tick_us.fetch_max(micros, Ordering::Relaxed);

        if tick % REPORT_EVERY == 0 {
            tracing::info!(
                tick,
                entities,
                players,
                last_us = micros,
                peak_us = self.peak_tick_us.load(Ordering::Relaxed),
                "Simulation report"
            );
        }
    }

    pub fn increment_counter(&self, name: &'static str) {
        let mut counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        *counters.entry(name).or_default() += 1;
    }

    #[must_use]
    pub fn counter(&self, name: &str) -> u64 {
        let counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        counters.get(name).copied().unwrap_or(0)
    }

    /// Every counter bumped so far, ordered by name.
    #[must_use]
    pub fn counters(&self) -> Vec<(&'static str, u64)> {
        let counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        counters.iter().map(|(&k, &v)| (k, v)).collect()
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn entity_count(&self) -> u64 {
        self.entities.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn player_count(&self) -> u64 {
        self.players.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn last_tick_duration(&self) -> Duration {
        Duration::from_micros(self.last_tick_us.load(Ordering::Relaxed))
    }

    #[must_use]
    pub fn peak_tick_duration(&self) -> Duration {
        Duration::from_micros(self.peak_tick_us.load(Ordering::Relaxed))
    }

    #[must_use]
    pub fn uptime(&self) -> Duration {
        self.started.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_metrics_are_zero() {
        let metrics = Metrics::new();
        assert_eq!(metrics.tick_count(), 0);
        assert!(metrics.counters().is_empty());
    }

    #[test]
    fn record_tick_updates_gauges_and_peak() {
        let metrics = Metrics::new();
        metrics.record_tick(Duration::from_millis(16), 100, 4);
        metrics.record_tick(Duration::from_millis(3), 90, 3);
        assert_eq!(metrics.tick_count(), 2);
        assert_eq!(metrics.entity_count(), 90);
        assert_eq!(metrics.player_count(), 3);
        assert_eq!(metrics.last_tick_duration(), Duration::from_millis(3));
        assert_eq!(metrics.peak_tick_duration(), Duration::from_millis(16));
    }

    #[test]
    fn counters_are_sorted_by_name() {
        let metrics = Metrics::new();
        metrics.increment_counter(KILLS);
        metrics.increment_counter(DEATHS);
        metrics.increment_counter(DEATHS);
        assert_eq!(metrics.counter(DEATHS), 2);
        assert_eq!(metrics.counter(EVOLUTIONS), 0);
        assert_eq!(metrics.counters(), vec![(DEATHS, 2), (KILLS, 1)]);
    }
}
