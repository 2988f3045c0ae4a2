use crate::world::{Tag, World};
use godcell_data::{EvolutionStage, Position, Stage};
use hecs::Entity;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Threat {
    pub entity: Entity,
    pub position: Position,
    pub stage: EvolutionStage,
    pub radius: f64,
}

/// Living, non-evolving players, gathered once per system run so each
/// creature only pays for a distance check.
#[derive(Debug, Clone, Default)]
pub struct ThreatSnapshot {
    threats: Vec<Threat>,
}

impl ThreatSnapshot {
    #[must_use]
    pub fn collect(world: &World) -> Self {
        let threats = world
            .tagged(Tag::Player)
            .into_iter()
            .filter(|&p| world.is_targetable(p))
            .filter_map(|p| {
                let position = world.read::<Position>(p)?;
                let stage = world.read::<Stage>(p)?;
                Some(Threat {
                    entity: p,
                    position,
                    stage: stage.stage,
                    radius: stage.radius,
                })
            })
            .collect();
        Self { threats }
    }

    /// Nearest threat passing `filter` whose center lies within `radius`.
    pub fn nearest_within(
        &self,
        from: &Position,
        radius: f64,
        filter: impl Fn(&Threat) -> bool,
    ) -> Option<Threat> {
        let limit = radius * radius;
        self.threats
            .iter()
            .filter(|t| filter(t))
            .map(|t| (t, t.position.distance_sq(from)))
            .filter(|(_, d)| *d <= limit)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(t, _)| *t)
    }

    #[must_use]
    pub fn get(&self, entity: Entity) -> Option<&Threat> {
        self.threats.iter().find(|t| t.entity == entity)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.threats.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.threats.is_empty()
    }
}
