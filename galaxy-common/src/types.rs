//! Closed enumerations shared across components (§3 Data Model).

use serde::{Deserialize, Serialize};

/// Planet classification driving base production (§4.B), over seven
/// named types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlanetType {
    Mining,
    Energy,
    Agricultural,
    Research,
    Industrial,
    Fortress,
    Balanced,
}

impl PlanetType {
    pub fn all() -> [PlanetType; 7] {
        [
            PlanetType::Mining,
            PlanetType::Energy,
            PlanetType::Agricultural,
            PlanetType::Research,
            PlanetType::Industrial,
            PlanetType::Fortress,
            PlanetType::Balanced,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanetStatus {
    Available,
    Colonizing,
    Active,
}

/// Per-planet construction slot (§3 Planet `buildings`), covering the
/// resource-bearing categories this engine's four resources need.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildingType {
    MiningFacility,
    PowerPlant,
    Farm,
    ResearchLab,
    Shipyard,
    Warehouse,
    PlanetaryShield,
}

impl BuildingType {
    pub fn all() -> [BuildingType; 7] {
        [
            BuildingType::MiningFacility,
            BuildingType::PowerPlant,
            BuildingType::Farm,
            BuildingType::ResearchLab,
            BuildingType::Shipyard,
            BuildingType::Warehouse,
            BuildingType::PlanetaryShield,
        ]
    }

    /// Per-type building count cap (§4.F quantity caps).
    pub fn max_count(&self) -> u32 {
        match self {
            BuildingType::MiningFacility => 10,
            BuildingType::PowerPlant => 10,
            BuildingType::Farm => 10,
            BuildingType::ResearchLab => 8,
            BuildingType::Shipyard => 5,
            BuildingType::Warehouse => 6,
            BuildingType::PlanetaryShield => 3,
        }
    }

    /// Per-building-count multiplier factor applied to the resource(s)
    /// it boosts, e.g. `mining_facility x 1.25^count` against metal (§4.B).
    pub fn multiplier_factor(&self) -> f64 {
        match self {
            BuildingType::MiningFacility => 1.25,
            BuildingType::PowerPlant => 1.25,
            BuildingType::Farm => 1.20,
            BuildingType::ResearchLab => 1.20,
            BuildingType::Shipyard => 1.0,
            BuildingType::Warehouse => 1.0,
            BuildingType::PlanetaryShield => 1.0,
        }
    }

    /// Which resource(s) this building type's multiplier applies to.
    pub fn boosts(&self) -> &'static [crate::resources::ResourceKind] {
        use crate::resources::ResourceKind::*;
        match self {
            BuildingType::MiningFacility => &[Metal],
            BuildingType::PowerPlant => &[Energy],
            BuildingType::Farm => &[Food],
            BuildingType::ResearchLab => &[Research],
            BuildingType::Shipyard | BuildingType::Warehouse | BuildingType::PlanetaryShield => &[],
        }
    }

    /// Maintenance cost per instance per turn (§4.B consumption).
    pub fn maintenance(&self) -> Resources {
        use crate::resources::Resources;
        match self {
            BuildingType::MiningFacility => Resources::new(0, 2, 0, 0),
            BuildingType::PowerPlant => Resources::new(1, 0, 0, 0),
            BuildingType::Farm => Resources::new(0, 1, 0, 0),
            BuildingType::ResearchLab => Resources::new(0, 3, 0, 0),
            BuildingType::Shipyard => Resources::new(2, 2, 0, 0),
            BuildingType::Warehouse => Resources::new(0, 1, 0, 0),
            BuildingType::PlanetaryShield => Resources::new(0, 5, 0, 0),
        }
    }
}

use crate::resources::Resources;

/// Exploration intensity for `exploreSector` (§4.E).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExplorationType {
    Scout,
    Survey,
    DeepScan,
}

impl ExplorationType {
    /// Number of planets generated, `[min, max]` inclusive (§4.E).
    pub fn planet_range(&self) -> (u32, u32) {
        match self {
            ExplorationType::Scout => (1, 3),
            ExplorationType::Survey => (2, 5),
            ExplorationType::DeepScan => (3, 7),
        }
    }

    /// Metal/energy/food cost deducted up front (§4.E).
    pub fn cost(&self) -> Resources {
        match self {
            ExplorationType::Scout => Resources::new(100, 50, 0, 0),
            ExplorationType::Survey => Resources::new(250, 150, 50, 0),
            ExplorationType::DeepScan => Resources::new(600, 400, 150, 0),
        }
    }
}

/// Trust category derived from a relation's scalar trust level (§4.D).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrustCategory {
    Hostile,
    Unfriendly,
    Neutral,
    Friendly,
    Allied,
}

impl TrustCategory {
    pub fn from_trust(trust_level: i32) -> Self {
        match trust_level {
            i32::MIN..=-61 => TrustCategory::Hostile,
            -60..=-21 => TrustCategory::Unfriendly,
            -20..=20 => TrustCategory::Neutral,
            21..=60 => TrustCategory::Friendly,
            _ => TrustCategory::Allied,
        }
    }

    /// Percentage points shaved off (positive) or added to (negative)
    /// trade-route maintenance, keyed on category.
    pub fn trade_modifier(&self) -> f64 {
        match self {
            TrustCategory::Hostile => 0.50,
            TrustCategory::Unfriendly => 0.20,
            TrustCategory::Neutral => 0.0,
            TrustCategory::Friendly => -0.10,
            TrustCategory::Allied => -0.25,
        }
    }

    pub fn research_sharing_allowed(&self) -> bool {
        matches!(self, TrustCategory::Friendly | TrustCategory::Allied)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalStatus {
    Pending,
    Accepted,
    Rejected,
    Countered,
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProposalType {
    TradeAgreement,
    NonAggressionPact,
    Alliance,
    ResearchSharing,
    MilitaryCooperation,
    WarDeclaration,
    TradeRoute,
}

impl ProposalType {
    /// `{required_trust, duration_days, trust_change_accept, trust_change_reject}` (§4.D).
    pub fn config(&self) -> ProposalConfig {
        match self {
            ProposalType::TradeAgreement => ProposalConfig::new(-20, 30, 5, -2),
            ProposalType::NonAggressionPact => ProposalConfig::new(-40, 90, 8, -3),
            ProposalType::Alliance => ProposalConfig::new(40, 180, 15, -10),
            ProposalType::ResearchSharing => ProposalConfig::new(21, 60, 10, -5),
            ProposalType::MilitaryCooperation => ProposalConfig::new(40, 90, 12, -8),
            ProposalType::WarDeclaration => ProposalConfig::new(i32::MIN, 0, -30, 0),
            ProposalType::TradeRoute => ProposalConfig::new(-20, 365, 3, -1),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ProposalConfig {
    pub required_trust: i32,
    pub duration_days: i64,
    pub trust_change_accept: i32,
    pub trust_change_reject: i32,
}

impl ProposalConfig {
    pub const fn new(
        required_trust: i32,
        duration_days: i64,
        trust_change_accept: i32,
        trust_change_reject: i32,
    ) -> Self {
        Self {
            required_trust,
            duration_days,
            trust_change_accept,
            trust_change_reject,
        }
    }
}

/// Materialized bilateral agreement kind (§3 Agreement).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgreementKind {
    TradeAgreement,
    NonAggressionPact,
    Alliance,
    ResearchSharing,
    MilitaryCooperation,
    WarDeclaration,
    TradeRoute,
}

impl From<ProposalType> for AgreementKind {
    fn from(p: ProposalType) -> Self {
        match p {
            ProposalType::TradeAgreement => AgreementKind::TradeAgreement,
            ProposalType::NonAggressionPact => AgreementKind::NonAggressionPact,
            ProposalType::Alliance => AgreementKind::Alliance,
            ProposalType::ResearchSharing => AgreementKind::ResearchSharing,
            ProposalType::MilitaryCooperation => AgreementKind::MilitaryCooperation,
            ProposalType::WarDeclaration => AgreementKind::WarDeclaration,
            ProposalType::TradeRoute => AgreementKind::TradeRoute,
        }
    }
}

/// Turn phase derived from elapsed fraction (GLOSSARY: Phase).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnPhase {
    Active,
    Warning,
    Final,
}

/// Technology category (§3 Empire `technology`); the bonus function itself
/// is left as a named hook, not yet implemented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TechnologyCategory {
    Mining,
    Energy,
    Agriculture,
    Research,
    Military,
}

impl TechnologyCategory {
    pub fn all() -> [TechnologyCategory; 5] {
        [
            TechnologyCategory::Mining,
            TechnologyCategory::Energy,
            TechnologyCategory::Agriculture,
            TechnologyCategory::Research,
            TechnologyCategory::Military,
        ]
    }
}
