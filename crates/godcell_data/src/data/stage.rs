use serde::{Deserialize, Serialize};

/// Ordered evolution tier of a player-like entity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum EvolutionStage {
    #[default]
    SingleCell,
    MultiCell,
    CyberOrganism,
    Humanoid,
    Godcell,
}

impl EvolutionStage {
    pub const ALL: [EvolutionStage; 5] = [
        EvolutionStage::SingleCell,
        EvolutionStage::MultiCell,
        EvolutionStage::CyberOrganism,
        EvolutionStage::Humanoid,
        EvolutionStage::Godcell,
    ];

    /// The tier reached by the next evolution, `None` at the top.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::SingleCell => Some(Self::MultiCell),
            Self::MultiCell => Some(Self::CyberOrganism),
            Self::CyberOrganism => Some(Self::Humanoid),
            Self::Humanoid => Some(Self::Godcell),
            Self::Godcell => None,
        }
    }

    /// Soup stages are confined to the soup sub-rectangle.
    #[must_use]
    pub const fn is_soup(self) -> bool {
        matches!(self, Self::SingleCell | Self::MultiCell)
    }

    #[must_use]
    pub const fn is_jungle(self) -> bool {
        !self.is_soup()
    }

    #[must_use]
    pub const fn region(self) -> Region {
        if self.is_soup() {
            Region::Soup
        } else {
            Region::Jungle
        }
    }
}

/// Spatial sub-region an entity is confined to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    Soup,
    Jungle,
}

/// Combat role chosen on entering the cyber-organism stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Specialization {
    Ranged,
    Melee,
    Traps,
}

impl Specialization {
    pub const ALL: [Specialization; 3] = [
        Specialization::Ranged,
        Specialization::Melee,
        Specialization::Traps,
    ];
}
