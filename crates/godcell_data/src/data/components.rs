use super::stage::{EvolutionStage, Specialization};
use crate::Timestamp;
use hecs::Entity;
use serde::{Deserialize, Serialize};

/// World position in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn distance_sq(&self, other: &Position) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    #[must_use]
    pub fn distance(&self, other: &Position) -> f64 {
        self.distance_sq(other).sqrt()
    }
}

/// Velocity in pixels per second.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Velocity {
    pub x: f64,
    pub y: f64,
}

impl Velocity {
    #[must_use]
    pub fn speed(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Rescales the vector so its length does not exceed `max`.
    pub fn cap(&mut self, max: f64) {
        let speed = self.speed();
        if speed > max && speed > 0.0 {
            let k = max / speed;
            self.x *= k;
            self.y *= k;
        }
    }
}

/// The sole life/resource pool of player-like entities and fauna.
///
/// `current` stays inside `[-1, max]`. Damage floors it at zero; only the
/// death system writes the `PROCESSED` sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Energy {
    pub current: f64,
    pub max: f64,
}

impl Energy {
    /// Marks a death that has already been rewarded and broadcast.
    pub const PROCESSED: f64 = -1.0;

    #[must_use]
    pub const fn full(max: f64) -> Self {
        Self { current: max, max }
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    #[must_use]
    pub fn is_processed(&self) -> bool {
        self.current <= Self::PROCESSED
    }

    /// Removes up to `amount`, never below zero. Returns what was removed.
    pub fn drain(&mut self, amount: f64) -> f64 {
        if self.current <= 0.0 || amount <= 0.0 {
            return 0.0;
        }
        let taken = amount.min(self.current);
        self.current -= taken;
        taken
    }

    /// Adds up to `amount`, never above `max`. Processed entities gain nothing.
    pub fn gain(&mut self, amount: f64) -> f64 {
        if self.current < 0.0 || amount <= 0.0 {
            return 0.0;
        }
        let before = self.current;
        self.current = (self.current + amount).min(self.max);
        self.current - before
    }

    /// Raises the capacity. Current energy is untouched.
    pub fn add_capacity(&mut self, amount: f64) {
        if amount > 0.0 {
            self.max += amount;
        }
    }

    pub fn mark_processed(&mut self) {
        self.current = Self::PROCESSED;
    }
}

/// Evolution tier plus the collision radius cached for it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub stage: EvolutionStage,
    pub is_evolving: bool,
    pub radius: f64,
    pub evolving_until: Option<Timestamp>,
    pub evolving_to: Option<EvolutionStage>,
}

impl Stage {
    #[must_use]
    pub const fn new(stage: EvolutionStage, radius: f64) -> Self {
        Self {
            stage,
            is_evolving: false,
            radius,
            evolving_until: None,
            evolving_to: None,
        }
    }
}

/// Stun state. Stunned "now" means `until` lies in the future.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Stunned {
    pub until: Timestamp,
}

impl Stunned {
    #[must_use]
    pub fn is_active(&self, now: Timestamp) -> bool {
        self.until > now
    }

    /// Overlapping stuns keep the later expiry.
    pub fn extend_to(&mut self, until: Timestamp) {
        self.until = self.until.max(until);
    }
}

/// Last-use timestamps, one per ability. `None` means never used.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Cooldowns {
    pub last_emp_time: Option<Timestamp>,
    pub last_pseudopod_time: Option<Timestamp>,
    pub last_projectile_time: Option<Timestamp>,
    pub last_swipe_time: Option<Timestamp>,
    pub last_thrust_time: Option<Timestamp>,
    pub last_trap_time: Option<Timestamp>,
}

impl Cooldowns {
    #[must_use]
    pub fn ready(last: Option<Timestamp>, now: Timestamp, cooldown_ms: f64) -> bool {
        match last {
            None => true,
            Some(t) => now - t >= cooldown_ms,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Category used for death causes and for drain visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageKind {
    Starvation,
    Singularity,
    Swarm,
    Predation,
    Beam,
    Projectile,
    Melee,
    Trap,
    Serpent,
}

/// Who or what dealt the most recent damage to an entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DamageSource {
    Predation { predator: Entity },
    Beam { shooter: Entity },
    Projectile { shooter: Entity },
    Melee { attacker: Entity },
    Trap { owner: Entity },
    Swarm,
    Serpent,
    Singularity,
    Starvation,
}

impl DamageSource {
    #[must_use]
    pub const fn kind(&self) -> DamageKind {
        match self {
            Self::Predation { .. } => DamageKind::Predation,
            Self::Beam { .. } => DamageKind::Beam,
            Self::Projectile { .. } => DamageKind::Projectile,
            Self::Melee { .. } => DamageKind::Melee,
            Self::Trap { .. } => DamageKind::Trap,
            Self::Swarm => DamageKind::Swarm,
            Self::Serpent => DamageKind::Serpent,
            Self::Singularity => DamageKind::Singularity,
            Self::Starvation => DamageKind::Starvation,
        }
    }

    /// The entity credited with the damage, if any.
    #[must_use]
    pub const fn instigator(&self) -> Option<Entity> {
        match self {
            Self::Predation { predator: e }
            | Self::Beam { shooter: e }
            | Self::Projectile { shooter: e }
            | Self::Melee { attacker: e }
            | Self::Trap { owner: e } => Some(*e),
            _ => None,
        }
    }
}

/// One damage contribution recorded during the current tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageRecord {
    pub damage_rate: f64,
    pub kind: DamageKind,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DamageTracking {
    pub last_damage_source: Option<DamageSource>,
    pub last_beam_shooter: Option<Entity>,
    /// Drained every tick after being summarized.
    pub active_damage: Vec<DamageRecord>,
    pub pseudopod_hit_rate: f64,
    pub pseudopod_hit_expires_at: Option<Timestamp>,
}

impl DamageTracking {
    pub fn reset(&mut self) {
        self.last_damage_source = None;
        self.last_beam_shooter = None;
        self.active_damage.clear();
        self.pseudopod_hit_rate = 0.0;
        self.pseudopod_hit_expires_at = None;
    }
}

/// Where an entity sits in the death state machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LifeState {
    Alive,
    Dying(DamageSource),
    Processed,
}

impl LifeState {
    #[must_use]
    pub fn of(energy: &Energy, tracking: &DamageTracking) -> Self {
        if energy.is_alive() {
            Self::Alive
        } else {
            match tracking.last_damage_source {
                Some(source) if !energy.is_processed() => Self::Dying(source),
                _ => Self::Processed,
            }
        }
    }
}

/// Accumulated impulse in px/s, decayed by the knockback system.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Knockback {
    pub x: f64,
    pub y: f64,
}

impl Knockback {
    pub fn add(&mut self, x: f64, y: f64) {
        self.x += x;
        self.y += y;
    }
}

/// Combat role of a cyber-organism. `None` until chosen or auto-assigned.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CombatSpecialization {
    pub specialization: Option<Specialization>,
    pub selection_deadline: Timestamp,
}

impl CombatSpecialization {
    #[must_use]
    pub fn is(&self, spec: Specialization) -> bool {
        self.specialization == Some(spec)
    }
}

/// Player identity as shown to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub color: String,
}

/// Normalized steering intent, written by input handlers and bot AI.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct InputDirection {
    pub x: f64,
    pub y: f64,
}

/// Speed multiplier set by collision systems, consumed and reset by movement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Slowed {
    pub factor: f64,
}

impl Default for Slowed {
    fn default() -> Self {
        Self { factor: 1.0 }
    }
}

/// AI bookkeeping for bot-controlled players.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bot {
    pub wander_target: Option<Position>,
    pub next_decision_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn energy_drain_floors_at_zero() {
        let mut e = Energy::full(100.0);
        assert_eq!(e.drain(150.0), 100.0);
        assert_eq!(e.current, 0.0);
        assert_eq!(e.drain(10.0), 0.0);
    }

    #[test]
    fn energy_gain_caps_at_max_and_skips_processed() {
        let mut e = Energy { current: 90.0, max: 100.0 };
        assert_eq!(e.gain(50.0), 10.0);
        e.mark_processed();
        assert_eq!(e.gain(50.0), 0.0);
        assert!(e.is_processed());
    }

    #[test]
    fn stun_keeps_latest_expiry() {
        let mut s = Stunned { until: 500.0 };
        s.extend_to(300.0);
        assert_eq!(s.until, 500.0);
        s.extend_to(900.0);
        assert_eq!(s.until, 900.0);
        assert!(s.is_active(899.0));
        assert!(!s.is_active(900.0));
    }

    #[test]
    fn cooldown_absent_field_means_ready() {
        assert!(Cooldowns::ready(None, 0.0, 1000.0));
        assert!(!Cooldowns::ready(Some(0.0), 999.0, 1000.0));
        assert!(Cooldowns::ready(Some(0.0), 1000.0, 1000.0));
    }

    #[test]
    fn life_state_transitions() {
        let mut tracking = DamageTracking::default();
        let mut energy = Energy::full(10.0);
        assert_eq!(LifeState::of(&energy, &tracking), LifeState::Alive);
        energy.drain(10.0);
        tracking.last_damage_source = Some(DamageSource::Swarm);
        assert_eq!(
            LifeState::of(&energy, &tracking),
            LifeState::Dying(DamageSource::Swarm)
        );
        energy.mark_processed();
        tracking.last_damage_source = None;
        assert_eq!(LifeState::of(&energy, &tracking), LifeState::Processed);
    }
}
