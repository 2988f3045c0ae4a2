//! Configuration management for simulation parameters.
//!
//! This module provides strongly-typed configuration structures that map to
//! the `config.toml` file. Every tunable constant used by the systems lives
//! here; the world holds the loaded value behind an `Arc`.
//!
//! ## Configuration Hierarchy
//!
//! 1. Default values (hardcoded in `Default` impl)
//! 2. `config.toml` file (overrides defaults, section by section)
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [world]
//! width = 4800.0
//! height = 3200.0
//! seed = 42
//!
//! [emp]
//! cost = 30.0
//! cooldown_ms = 10000.0
//! ```

use crate::geometry::Bounds;
use godcell_data::{CreatureVariant, EvolutionStage, PseudopodMode, Region};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::path::Path;

/// World dimensions. The soup is a sub-rectangle of the jungle.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f64,
    pub height: f64,
    pub soup_x: f64,
    pub soup_y: f64,
    pub soup_width: f64,
    pub soup_height: f64,
    pub seed: Option<u64>,
    pub tick_rate: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 4800.0,
            height: 3200.0,
            soup_x: 1600.0,
            soup_y: 1000.0,
            soup_width: 1600.0,
            soup_height: 1200.0,
            seed: None,
            tick_rate: 60,
        }
    }
}

impl WorldConfig {
    #[must_use]
    pub fn soup_bounds(&self) -> Bounds {
        Bounds::new(
            self.soup_x,
            self.soup_y,
            self.soup_x + self.soup_width,
            self.soup_y + self.soup_height,
        )
    }

    #[must_use]
    pub fn jungle_bounds(&self) -> Bounds {
        Bounds::new(0.0, 0.0, self.width, self.height)
    }

    #[must_use]
    pub fn bounds_for(&self, region: Region) -> Bounds {
        match region {
            Region::Soup => self.soup_bounds(),
            Region::Jungle => self.jungle_bounds(),
        }
    }
}

/// Per-stage physical and metabolic tuning.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StageTuning {
    pub radius: f64,
    pub max_speed: f64,
    pub acceleration: f64,
    /// Velocity retained per 1/60 s without input.
    pub friction: f64,
    /// Energy lost per second.
    pub decay_rate: f64,
    pub starting_max_energy: f64,
    /// Capacity (`Energy.max`) needed to leave this stage. `None` at the top.
    pub evolution_threshold: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct StagesConfig {
    pub single_cell: StageTuning,
    pub multi_cell: StageTuning,
    pub cyber_organism: StageTuning,
    pub humanoid: StageTuning,
    pub godcell: StageTuning,
}

impl Default for StagesConfig {
    fn default() -> Self {
        Self {
            single_cell: StageTuning {
                radius: 15.0,
                max_speed: 300.0,
                acceleration: 1400.0,
                friction: 0.88,
                decay_rate: 2.0,
                starting_max_energy: 100.0,
                evolution_threshold: Some(250.0),
            },
            multi_cell: StageTuning {
                radius: 40.0,
                max_speed: 260.0,
                acceleration: 1200.0,
                friction: 0.88,
                decay_rate: 3.0,
                starting_max_energy: 250.0,
                evolution_threshold: Some(1000.0),
            },
            cyber_organism: StageTuning {
                radius: 60.0,
                max_speed: 340.0,
                acceleration: 1600.0,
                friction: 0.9,
                decay_rate: 4.0,
                starting_max_energy: 1000.0,
                evolution_threshold: Some(3000.0),
            },
            humanoid: StageTuning {
                radius: 80.0,
                max_speed: 320.0,
                acceleration: 1500.0,
                friction: 0.9,
                decay_rate: 5.0,
                starting_max_energy: 3000.0,
                evolution_threshold: Some(10000.0),
            },
            godcell: StageTuning {
                radius: 100.0,
                max_speed: 420.0,
                acceleration: 2000.0,
                friction: 0.92,
                decay_rate: 0.0,
                starting_max_energy: 10000.0,
                evolution_threshold: None,
            },
        }
    }
}

impl StagesConfig {
    #[must_use]
    pub const fn tuning(&self, stage: EvolutionStage) -> &StageTuning {
        match stage {
            EvolutionStage::SingleCell => &self.single_cell,
            EvolutionStage::MultiCell => &self.multi_cell,
            EvolutionStage::CyberOrganism => &self.cyber_organism,
            EvolutionStage::Humanoid => &self.humanoid,
            EvolutionStage::Godcell => &self.godcell,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct EvolutionConfig {
    pub duration_ms: f64,
    pub specialization_timeout_ms: f64,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            duration_ms: 2500.0,
            specialization_timeout_ms: 10000.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct EmpConfig {
    pub cost: f64,
    pub cooldown_ms: f64,
    pub range: f64,
    pub disable_duration_ms: f64,
}

impl Default for EmpConfig {
    fn default() -> Self {
        Self {
            cost: 30.0,
            cooldown_ms: 10000.0,
            range: 768.0,
            disable_duration_ms: 3000.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct PseudopodConfig {
    pub mode: PseudopodMode,
    pub cost: f64,
    pub cooldown_ms: f64,
    pub range: f64,
    pub speed: f64,
    pub width: f64,
    pub damage: f64,
    /// Half-arc of the strike-mode hit cone, radians.
    pub strike_half_arc: f64,
    pub retract_ms: f64,
    /// How long a hit keeps the victim's drain visual lit.
    pub hit_visual_ms: f64,
    pub kill_capacity_fraction: f64,
    pub kill_energy_fraction: f64,
}

impl Default for PseudopodConfig {
    fn default() -> Self {
        Self {
            mode: PseudopodMode::Beam,
            cost: 20.0,
            cooldown_ms: 1500.0,
            range: 300.0,
            speed: 1500.0,
            width: 10.0,
            damage: 35.0,
            strike_half_arc: 0.35,
            retract_ms: 250.0,
            hit_visual_ms: 500.0,
            kill_capacity_fraction: 0.8,
            kill_energy_fraction: 0.3,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ProjectileConfig {
    pub cost: f64,
    pub cooldown_ms: f64,
    pub speed: f64,
    pub max_distance: f64,
    pub damage: f64,
    pub radius: f64,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            cost: 25.0,
            cooldown_ms: 800.0,
            speed: 900.0,
            max_distance: 800.0,
            damage: 40.0,
            radius: 10.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MeleeAttackConfig {
    pub cost: f64,
    pub cooldown_ms: f64,
    pub min_range: f64,
    pub max_range: f64,
    /// Radians either side of the facing direction.
    pub half_arc: f64,
    pub damage: f64,
    pub knockback: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct MeleeConfig {
    pub swipe: MeleeAttackConfig,
    pub thrust: MeleeAttackConfig,
}

impl Default for MeleeConfig {
    fn default() -> Self {
        Self {
            swipe: MeleeAttackConfig {
                cost: 15.0,
                cooldown_ms: 600.0,
                min_range: 0.0,
                max_range: 120.0,
                half_arc: PI / 3.0,
                damage: 35.0,
                knockback: 300.0,
            },
            thrust: MeleeAttackConfig {
                cost: 20.0,
                cooldown_ms: 900.0,
                min_range: 0.0,
                max_range: 200.0,
                half_arc: PI / 12.0,
                damage: 50.0,
                knockback: 450.0,
            },
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct TrapConfig {
    pub cost: f64,
    pub cooldown_ms: f64,
    pub trigger_radius: f64,
    pub damage: f64,
    pub stun_duration_ms: f64,
    pub lifetime_ms: f64,
    pub max_active: usize,
}

impl Default for TrapConfig {
    fn default() -> Self {
        Self {
            cost: 30.0,
            cooldown_ms: 3000.0,
            trigger_radius: 60.0,
            damage: 60.0,
            stun_duration_ms: 1500.0,
            lifetime_ms: 60000.0,
            max_active: 5,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SwarmConfig {
    pub count: usize,
    pub radius: f64,
    pub detection_radius: f64,
    pub chase_speed: f64,
    pub patrol_speed: f64,
    pub patrol_radius: f64,
    pub acceleration: f64,
    /// Energy drained per second from a touching player.
    pub drain_rate: f64,
    pub slow_factor: f64,
    pub consume_energy: f64,
    pub consume_capacity: f64,
    pub respawn_delay_ms: f64,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            count: 8,
            radius: 40.0,
            detection_radius: 500.0,
            chase_speed: 220.0,
            patrol_speed: 80.0,
            patrol_radius: 400.0,
            acceleration: 600.0,
            drain_rate: 15.0,
            slow_factor: 0.5,
            consume_energy: 60.0,
            consume_capacity: 20.0,
            respawn_delay_ms: 20000.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct CyberBugConfig {
    pub count: usize,
    pub radius: f64,
    pub energy: f64,
    pub trigger_radius: f64,
    pub flee_speed: f64,
    pub patrol_speed: f64,
    pub patrol_radius: f64,
    pub acceleration: f64,
    /// Per-tick chance an idle bug starts patrolling.
    pub idle_to_patrol_chance: f64,
    /// Chance a bug goes idle on reaching its patrol point.
    pub return_to_idle_chance: f64,
    pub idle_friction: f64,
    pub arrival_distance: f64,
    pub value: f64,
    pub capacity_reward: f64,
    pub respawn_delay_ms: f64,
}

impl Default for CyberBugConfig {
    fn default() -> Self {
        Self {
            count: 30,
            radius: 12.0,
            energy: 20.0,
            trigger_radius: 200.0,
            flee_speed: 350.0,
            patrol_speed: 90.0,
            patrol_radius: 150.0,
            acceleration: 900.0,
            idle_to_patrol_chance: 0.02,
            return_to_idle_chance: 0.3,
            idle_friction: 0.9,
            arrival_distance: 10.0,
            value: 15.0,
            capacity_reward: 15.0,
            respawn_delay_ms: 15000.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CreatureTuning {
    pub radius: f64,
    pub energy: f64,
    pub patrol_speed: f64,
    pub hunt_speed: f64,
    pub patrol_radius: f64,
    /// Zero disables hunting for the variant.
    pub detection_radius: f64,
    /// Hunters give up once the target is this far from home.
    pub leash_radius: f64,
    pub idle_to_patrol_chance: f64,
    pub value: f64,
    pub capacity_reward: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct JungleCreatureConfig {
    pub count_per_variant: usize,
    pub acceleration: f64,
    pub arrival_distance: f64,
    pub respawn_delay_ms: f64,
    pub grazer: CreatureTuning,
    pub stalker: CreatureTuning,
    pub ambusher: CreatureTuning,
}

impl Default for JungleCreatureConfig {
    fn default() -> Self {
        Self {
            count_per_variant: 6,
            acceleration: 700.0,
            arrival_distance: 15.0,
            respawn_delay_ms: 30000.0,
            grazer: CreatureTuning {
                radius: 25.0,
                energy: 60.0,
                patrol_speed: 70.0,
                hunt_speed: 0.0,
                patrol_radius: 250.0,
                detection_radius: 0.0,
                leash_radius: 0.0,
                idle_to_patrol_chance: 0.015,
                value: 30.0,
                capacity_reward: 30.0,
            },
            stalker: CreatureTuning {
                radius: 30.0,
                energy: 100.0,
                patrol_speed: 110.0,
                hunt_speed: 240.0,
                patrol_radius: 400.0,
                detection_radius: 400.0,
                leash_radius: 900.0,
                idle_to_patrol_chance: 0.03,
                value: 60.0,
                capacity_reward: 50.0,
            },
            ambusher: CreatureTuning {
                radius: 30.0,
                energy: 120.0,
                patrol_speed: 40.0,
                hunt_speed: 380.0,
                patrol_radius: 120.0,
                detection_radius: 150.0,
                leash_radius: 350.0,
                idle_to_patrol_chance: 0.005,
                value: 80.0,
                capacity_reward: 60.0,
            },
        }
    }
}

impl JungleCreatureConfig {
    #[must_use]
    pub const fn tuning(&self, variant: CreatureVariant) -> &CreatureTuning {
        match variant {
            CreatureVariant::Grazer => &self.grazer,
            CreatureVariant::Stalker => &self.stalker,
            CreatureVariant::Ambusher => &self.ambusher,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SerpentConfig {
    pub count: usize,
    pub radius: f64,
    pub energy: f64,
    pub detection_radius: f64,
    pub patrol_speed: f64,
    pub chase_speed: f64,
    /// Radians per second.
    pub turn_rate: f64,
    pub patrol_radius: f64,
    pub arrival_distance: f64,
    pub attack_range: f64,
    pub head_offset: f64,
    /// Fraction of `attack_range` the serpent tries to hold while attacking.
    pub ideal_distance_fraction: f64,
    /// Half-width of the hold band around the ideal distance, as a fraction of `attack_range`.
    pub stand_off_band_fraction: f64,
    pub attack_half_arc: f64,
    /// Heading error allowed before an attack may fire.
    pub facing_tolerance: f64,
    pub attack_damage: f64,
    pub attack_cooldown_ms: f64,
    pub knockback: f64,
    pub kill_energy: f64,
    pub kill_capacity: f64,
    pub respawn_delay_ms: f64,
}

impl Default for SerpentConfig {
    fn default() -> Self {
        Self {
            count: 1,
            radius: 80.0,
            energy: 2000.0,
            detection_radius: 900.0,
            patrol_speed: 150.0,
            chase_speed: 260.0,
            turn_rate: 2.5,
            patrol_radius: 600.0,
            arrival_distance: 40.0,
            attack_range: 120.0,
            head_offset: 60.0,
            ideal_distance_fraction: 0.75,
            stand_off_band_fraction: 0.1,
            attack_half_arc: PI / 4.0,
            facing_tolerance: 0.35,
            attack_damage: 80.0,
            attack_cooldown_ms: 1500.0,
            knockback: 400.0,
            kill_energy: 500.0,
            kill_capacity: 300.0,
            respawn_delay_ms: 60000.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct GravityConfig {
    pub count: usize,
    pub radius: f64,
    pub strength: f64,
    pub core_radius: f64,
    /// Cap on the acceleration a single well can apply, px/s².
    pub max_acceleration: f64,
}

impl Default for GravityConfig {
    fn default() -> Self {
        Self {
            count: 3,
            radius: 600.0,
            strength: 120_000_000.0,
            core_radius: 40.0,
            max_acceleration: 1200.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct PredationConfig {
    /// Energy per second pulled from an engulfed victim.
    pub drain_rate: f64,
    pub single_cell_reward_fraction: f64,
    pub multi_cell_reward_fraction: f64,
}

impl Default for PredationConfig {
    fn default() -> Self {
        Self {
            drain_rate: 120.0,
            single_cell_reward_fraction: 0.3,
            multi_cell_reward_fraction: 0.8,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ResourceConfig {
    pub nutrient_count: usize,
    pub nutrient_value: f64,
    pub nutrient_capacity: f64,
    pub nutrient_radius: f64,
    pub nutrient_respawn_ms: f64,
    /// Multiplier for nutrients spawned inside a gravity well's pull.
    pub nutrient_gravity_bonus: f64,
    pub tree_count: usize,
    pub tree_radius: f64,
    pub fruit_value: f64,
    pub fruit_capacity: f64,
    pub fruit_radius: f64,
    pub fruit_respawn_ms: f64,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            nutrient_count: 120,
            nutrient_value: 25.0,
            nutrient_capacity: 10.0,
            nutrient_radius: 8.0,
            nutrient_respawn_ms: 30000.0,
            nutrient_gravity_bonus: 2.0,
            tree_count: 40,
            tree_radius: 80.0,
            fruit_value: 80.0,
            fruit_capacity: 40.0,
            fruit_radius: 12.0,
            fruit_respawn_ms: 20000.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct BotConfig {
    pub soup_bots: usize,
    pub jungle_bots: usize,
    pub respawn_delay_ms: f64,
    pub decision_interval_ms: f64,
    pub flee_distance: f64,
    pub emp_trigger_distance: f64,
    pub hunt_range: f64,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            soup_bots: 6,
            jungle_bots: 3,
            respawn_delay_ms: 5000.0,
            decision_interval_ms: 200.0,
            flee_distance: 250.0,
            emp_trigger_distance: 300.0,
            hunt_range: 350.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Exponential knockback decay per second.
    pub knockback_decay: f64,
    /// Knockback below this magnitude snaps to zero.
    pub knockback_epsilon: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            knockback_decay: 6.0,
            knockback_epsilon: 1.0,
        }
    }
}

/// Throttles are tick counts, never wall-clock timers.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct NetworkConfig {
    pub energy_update_interval: u64,
    pub detection_interval: u64,
    pub drain_state_interval: u64,
    pub detection_radius: f64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            energy_update_interval: 10,
            detection_interval: 15,
            drain_state_interval: 10,
            detection_radius: 1800.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct GameConfig {
    pub world: WorldConfig,
    pub stages: StagesConfig,
    pub evolution: EvolutionConfig,
    pub emp: EmpConfig,
    pub pseudopod: PseudopodConfig,
    pub projectile: ProjectileConfig,
    pub melee: MeleeConfig,
    pub trap: TrapConfig,
    pub swarm: SwarmConfig,
    pub cyber_bug: CyberBugConfig,
    pub jungle_creature: JungleCreatureConfig,
    pub serpent: SerpentConfig,
    pub gravity: GravityConfig,
    pub predation: PredationConfig,
    pub resources: ResourceConfig,
    pub bots: BotConfig,
    pub physics: PhysicsConfig,
    pub network: NetworkConfig,
}

impl GameConfig {
    /// Validates all configuration parameters.
    ///
    /// Returns `Ok(())` if all parameters are valid, or `Err` with a description
    /// of the first validation failure.
    pub fn validate(&self) -> anyhow::Result<()> {
        // World validation
        anyhow::ensure!(self.world.width > 0.0, "World width must be positive");
        anyhow::ensure!(self.world.height > 0.0, "World height must be positive");
        anyhow::ensure!(
            self.world.soup_width > 0.0 && self.world.soup_height > 0.0,
            "Soup dimensions must be positive"
        );
        anyhow::ensure!(
            self.world.soup_x >= 0.0
                && self.world.soup_y >= 0.0
                && self.world.soup_x + self.world.soup_width <= self.world.width
                && self.world.soup_y + self.world.soup_height <= self.world.height,
            "Soup rectangle must lie inside the world"
        );
        anyhow::ensure!(self.world.tick_rate > 0, "Tick rate must be positive");
        anyhow::ensure!(self.world.tick_rate <= 240, "Tick rate too high (max 240)");

        // Stage validation
        let mut last_threshold = 0.0;
        for stage in EvolutionStage::ALL {
            let tuning = self.stages.tuning(stage);
            anyhow::ensure!(tuning.radius > 0.0, "{stage:?} radius must be positive");
            anyhow::ensure!(
                tuning.max_speed > 0.0,
                "{stage:?} max speed must be positive"
            );
            anyhow::ensure!(
                (0.0..=1.0).contains(&tuning.friction),
                "{stage:?} friction must be in [0.0, 1.0]"
            );
            anyhow::ensure!(
                tuning.decay_rate >= 0.0,
                "{stage:?} decay rate must be non-negative"
            );
            anyhow::ensure!(
                tuning.starting_max_energy > 0.0,
                "{stage:?} starting max energy must be positive"
            );
            match (stage.next(), tuning.evolution_threshold) {
                (Some(_), Some(threshold)) => {
                    anyhow::ensure!(
                        threshold > last_threshold,
                        "Evolution thresholds must increase with stage"
                    );
                    last_threshold = threshold;
                }
                (Some(_), None) => anyhow::bail!("{stage:?} needs an evolution threshold"),
                (None, _) => {}
            }
        }

        // Ability validation
        let costs = [
            self.emp.cost,
            self.pseudopod.cost,
            self.projectile.cost,
            self.melee.swipe.cost,
            self.melee.thrust.cost,
            self.trap.cost,
        ];
        anyhow::ensure!(
            costs.iter().all(|c| *c >= 0.0),
            "Ability costs must be non-negative"
        );
        let cooldowns = [
            self.emp.cooldown_ms,
            self.pseudopod.cooldown_ms,
            self.projectile.cooldown_ms,
            self.melee.swipe.cooldown_ms,
            self.melee.thrust.cooldown_ms,
            self.trap.cooldown_ms,
        ];
        anyhow::ensure!(
            cooldowns.iter().all(|c| *c >= 0.0),
            "Ability cooldowns must be non-negative"
        );
        for arc in [
            self.melee.swipe.half_arc,
            self.melee.thrust.half_arc,
            self.pseudopod.strike_half_arc,
            self.serpent.attack_half_arc,
        ] {
            anyhow::ensure!(arc > 0.0 && arc <= PI, "Half-arcs must be in (0, π]");
        }
        anyhow::ensure!(
            self.melee.swipe.min_range <= self.melee.swipe.max_range
                && self.melee.thrust.min_range <= self.melee.thrust.max_range,
            "Melee min range must not exceed max range"
        );
        anyhow::ensure!(self.trap.max_active > 0, "Trap max active must be positive");
        anyhow::ensure!(
            self.projectile.speed > 0.0 && self.pseudopod.speed > 0.0,
            "Projectile speeds must be positive"
        );

        // Creature validation
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.cyber_bug.idle_to_patrol_chance)
                && (0.0..=1.0).contains(&self.cyber_bug.return_to_idle_chance),
            "Cyber bug probabilities must be in [0.0, 1.0]"
        );
        for variant in [CreatureVariant::Grazer, CreatureVariant::Stalker, CreatureVariant::Ambusher] {
            anyhow::ensure!(
                (0.0..=1.0).contains(&self.jungle_creature.tuning(variant).idle_to_patrol_chance),
                "Jungle creature idle-to-patrol chance must be in [0.0, 1.0] ({variant:?})"
            );
        }
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.swarm.slow_factor),
            "Swarm slow factor must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            self.serpent.turn_rate > 0.0,
            "Serpent turn rate must be positive"
        );
        anyhow::ensure!(
            self.serpent.stand_off_band_fraction >= 0.0,
            "Serpent stand-off band must be non-negative"
        );
        anyhow::ensure!(
            self.predation.single_cell_reward_fraction >= 0.0
                && self.predation.multi_cell_reward_fraction >= 0.0,
            "Predation reward fractions must be non-negative"
        );

        // Network validation
        anyhow::ensure!(
            self.network.energy_update_interval > 0
                && self.network.detection_interval > 0
                && self.network.drain_state_interval > 0,
            "Broadcast intervals must be positive"
        );

        Ok(())
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise returns the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.stages).as_bytes());
        hasher.update(format!("{:?}", self.emp).as_bytes());
        hasher.update(format!("{:?}", self.pseudopod).as_bytes());
        hasher.update(format!("{:?}", self.projectile).as_bytes());
        hasher.update(format!("{:?}", self.melee).as_bytes());
        hasher.update(format!("{:?}", self.trap).as_bytes());
        hasher.update(format!("{:?}", self.serpent).as_bytes());
        hex::encode(hasher.finalize())
    }
}
