use godcell_data::Specialization;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeleeAttackType {
    /// Wide, short arc.
    Swipe,
    /// Narrow, long arc.
    Thrust,
}

/// Inbound request from a client (or a bot planner) addressed by socket id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientIntent {
    Move {
        x: f64,
        y: f64,
    },
    FireEmp,
    FirePseudopod {
        target_x: f64,
        target_y: f64,
    },
    FireProjectile {
        target_x: f64,
        target_y: f64,
    },
    Melee {
        attack_type: MeleeAttackType,
        target_x: f64,
        target_y: f64,
    },
    PlaceTrap,
    SelectSpecialization {
        specialization: Specialization,
    },
    Respawn,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intents_parse_from_client_json() {
        let json = r#"{"type":"melee","attackType":"thrust","targetX":10.0,"targetY":-4.5}"#;
        let intent: ClientIntent = serde_json::from_str(json).expect("valid intent");
        assert_eq!(
            intent,
            ClientIntent::Melee {
                attack_type: MeleeAttackType::Thrust,
                target_x: 10.0,
                target_y: -4.5,
            }
        );

        let emp: ClientIntent = serde_json::from_str(r#"{"type":"fireEmp"}"#).expect("valid");
        assert_eq!(emp, ClientIntent::FireEmp);
    }
}
