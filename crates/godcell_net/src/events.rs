//! Outbound event payloads. Field names serialize in camelCase to match the
//! client renderer.

use crate::intents::MeleeAttackType;
use godcell_data::{
    CreatureVariant, DamageKind, EvolutionStage, Position, SerpentState, Specialization,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSnapshot {
    pub player_id: String,
    pub name: String,
    pub color: String,
    pub position: Position,
    pub energy: f64,
    pub max_energy: f64,
    pub stage: EvolutionStage,
    pub is_bot: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerLeft {
    pub player_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityPosition {
    pub id: String,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PositionsUpdate {
    pub tick: u64,
    pub entities: Vec<EntityPosition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyUpdate {
    pub player_id: String,
    pub energy: f64,
    pub max_energy: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectedKind {
    Player,
    Nutrient,
    Swarm,
    CyberBug,
    JungleCreature,
    EntropySerpent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedEntity {
    pub id: String,
    pub kind: DetectedKind,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionUpdate {
    pub detected: Vec<DetectedEntity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrainInfo {
    pub total_damage_rate: f64,
    pub primary_source: DamageKind,
    pub pseudopod_hit_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDrainState {
    pub damage_info: BTreeMap<String, DrainInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmpActivated {
    pub player_id: String,
    pub position: Position,
    pub affected_swarm_ids: Vec<String>,
    pub affected_player_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PseudopodFired {
    pub pseudopod_id: String,
    pub player_id: String,
    pub position: Position,
    pub target: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PseudopodHit {
    pub pseudopod_id: String,
    pub shooter_id: String,
    pub target_id: String,
    pub damage: f64,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PseudopodRetracted {
    pub pseudopod_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectileFired {
    pub projectile_id: String,
    pub player_id: String,
    pub position: Position,
    pub target: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    Player,
    CyberBug,
    JungleCreature,
    EntropySerpent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectileHit {
    pub projectile_id: String,
    pub shooter_id: String,
    pub target_id: String,
    pub target_kind: TargetKind,
    pub damage: f64,
    pub killed: bool,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectileRetracted {
    pub projectile_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeleeAttackExecuted {
    pub player_id: String,
    pub attack_type: MeleeAttackType,
    pub position: Position,
    pub direction: Position,
    pub hit_player_ids: Vec<String>,
    pub hit_creature_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrapPlaced {
    pub trap_id: String,
    pub owner_id: String,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrapTriggered {
    pub trap_id: String,
    pub victim_id: String,
    pub damage: f64,
    pub stun_duration: f64,
    pub killed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrapDespawned {
    pub trap_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CyberBugKilled {
    pub bug_id: String,
    pub killer_id: String,
    pub position: Position,
    pub energy_gained: f64,
    pub capacity_gained: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JungleCreatureKilled {
    pub creature_id: String,
    pub killer_id: String,
    pub variant: CreatureVariant,
    pub position: Position,
    pub energy_gained: f64,
    pub capacity_gained: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntropySerpentKilled {
    pub serpent_id: String,
    pub killer_id: String,
    pub position: Position,
    pub energy_gained: f64,
    pub capacity_gained: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntropySerpentAttack {
    pub serpent_id: String,
    pub position: Position,
    pub heading: f64,
    pub hit_player_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntropySerpentState {
    pub serpent_id: String,
    pub state: SerpentState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpawnKind {
    Swarm,
    CyberBug,
    JungleCreature,
    EntropySerpent,
    Nutrient,
    DataFruit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySpawned {
    pub id: String,
    pub kind: SpawnKind,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwarmConsumed {
    pub swarm_id: String,
    pub player_id: String,
    pub energy_gained: f64,
    pub capacity_gained: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceCollected {
    pub resource_id: String,
    pub player_id: String,
    pub energy_gained: f64,
    pub capacity_gained: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDied {
    pub player_id: String,
    pub position: Position,
    pub color: String,
    pub cause: DamageKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerEngulfed {
    pub predator_id: String,
    pub prey_id: String,
    pub position: Position,
    pub capacity_gained: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerEvolutionStarted {
    pub player_id: String,
    pub current_stage: EvolutionStage,
    pub target_stage: EvolutionStage,
    pub duration: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerEvolved {
    pub player_id: String,
    pub new_stage: EvolutionStage,
    pub new_max_energy: f64,
    pub radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecializationPrompt {
    pub player_id: String,
    pub deadline: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecializationSelected {
    pub player_id: String,
    pub specialization: Specialization,
}

/// Every event the core can emit. Serialized as `{"type": ..., "payload": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum GameEvent {
    PlayerJoined(PlayerSnapshot),
    PlayerLeft(PlayerLeft),
    PlayerRespawned(PlayerSnapshot),
    PositionsUpdate(PositionsUpdate),
    EnergyUpdate(EnergyUpdate),
    DetectionUpdate(DetectionUpdate),
    PlayerDrainState(PlayerDrainState),
    EmpActivated(EmpActivated),
    PseudopodFired(PseudopodFired),
    PseudopodHit(PseudopodHit),
    PseudopodRetracted(PseudopodRetracted),
    ProjectileFired(ProjectileFired),
    ProjectileHit(ProjectileHit),
    ProjectileRetracted(ProjectileRetracted),
    MeleeAttackExecuted(MeleeAttackExecuted),
    TrapPlaced(TrapPlaced),
    TrapTriggered(TrapTriggered),
    TrapDespawned(TrapDespawned),
    CyberBugKilled(CyberBugKilled),
    JungleCreatureKilled(JungleCreatureKilled),
    EntropySerpentKilled(EntropySerpentKilled),
    EntropySerpentAttack(EntropySerpentAttack),
    EntropySerpentState(EntropySerpentState),
    EntitySpawned(EntitySpawned),
    SwarmConsumed(SwarmConsumed),
    NutrientCollected(ResourceCollected),
    DataFruitCollected(ResourceCollected),
    PlayerDied(PlayerDied),
    PlayerEngulfed(PlayerEngulfed),
    PlayerEvolutionStarted(PlayerEvolutionStarted),
    PlayerEvolved(PlayerEvolved),
    SpecializationPrompt(SpecializationPrompt),
    SpecializationSelected(SpecializationSelected),
}

impl GameEvent {
    /// Event name as clients subscribe to it.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::PlayerJoined(_) => "playerJoined",
            Self::PlayerLeft(_) => "playerLeft",
            Self::PlayerRespawned(_) => "playerRespawned",
            Self::PositionsUpdate(_) => "positionsUpdate",
            Self::EnergyUpdate(_) => "energyUpdate",
            Self::DetectionUpdate(_) => "detectionUpdate",
            Self::PlayerDrainState(_) => "playerDrainState",
            Self::EmpActivated(_) => "empActivated",
            Self::PseudopodFired(_) => "pseudopodFired",
            Self::PseudopodHit(_) => "pseudopodHit",
            Self::PseudopodRetracted(_) => "pseudopodRetracted",
            Self::ProjectileFired(_) => "projectileFired",
            Self::ProjectileHit(_) => "projectileHit",
            Self::ProjectileRetracted(_) => "projectileRetracted",
            Self::MeleeAttackExecuted(_) => "meleeAttackExecuted",
            Self::TrapPlaced(_) => "trapPlaced",
            Self::TrapTriggered(_) => "trapTriggered",
            Self::TrapDespawned(_) => "trapDespawned",
            Self::CyberBugKilled(_) => "cyberBugKilled",
            Self::JungleCreatureKilled(_) => "jungleCreatureKilled",
            Self::EntropySerpentKilled(_) => "entropySerpentKilled",
            Self::EntropySerpentAttack(_) => "entropySerpentAttack",
            Self::EntropySerpentState(_) => "entropySerpentState",
            Self::EntitySpawned(_) => "entitySpawned",
            Self::SwarmConsumed(_) => "swarmConsumed",
            Self::NutrientCollected(_) => "nutrientCollected",
            Self::DataFruitCollected(_) => "dataFruitCollected",
            Self::PlayerDied(_) => "playerDied",
            Self::PlayerEngulfed(_) => "playerEngulfed",
            Self::PlayerEvolutionStarted(_) => "playerEvolutionStarted",
            Self::PlayerEvolved(_) => "playerEvolved",
            Self::SpecializationPrompt(_) => "specializationPrompt",
            Self::SpecializationSelected(_) => "specializationSelected",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_tag_matches_name() {
        let event = GameEvent::TrapTriggered(TrapTriggered {
            trap_id: "trap-1".into(),
            victim_id: "p1".into(),
            damage: 60.0,
            stun_duration: 1500.0,
            killed: false,
        });
        let json = serde_json::to_value(&event).expect("serializable");
        assert_eq!(json["type"], event.name());
        assert_eq!(json["payload"]["stunDuration"], 1500.0);
    }

    #[test]
    fn death_cause_is_snake_case() {
        let event = GameEvent::PlayerDied(PlayerDied {
            player_id: "p1".into(),
            position: Position::new(1.0, 2.0),
            color: "#00ff88".into(),
            cause: DamageKind::Singularity,
        });
        let json = serde_json::to_string(&event).expect("serializable");
        assert!(json.contains(r#""cause":"singularity""#));
    }
}
