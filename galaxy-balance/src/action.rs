//! The closed action-type allow-list (§4.F "action type is in a closed
//! allow-list") and the per-action-point cost the §6 route table assigns.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionType {
    RenameEmpire,
    SetPlanetSpecialization,
    QueueBuilding,
    QueueShip,
    MoveFleet,
    ComposeFleet,
    InitiateCombat,
    RetreatFromCombat,
    ProposeDiplomacy,
    RespondToProposal,
    ExploreSector,
    ColonizePlanet,
    AbandonColony,
    ProposeTradeRoute,
}

impl ActionType {
    /// Base action-point cost before the scaled-cost multiplier (§6).
    pub fn base_action_points(&self) -> u32 {
        match self {
            ActionType::RenameEmpire => 1,
            ActionType::SetPlanetSpecialization => 2,
            ActionType::QueueBuilding => 1,
            ActionType::QueueShip => 1,
            ActionType::MoveFleet => 2,
            ActionType::ComposeFleet => 1,
            ActionType::InitiateCombat => 3,
            ActionType::RetreatFromCombat => 1,
            ActionType::ProposeDiplomacy => 1,
            ActionType::RespondToProposal => 1,
            ActionType::ExploreSector => 2,
            ActionType::ColonizePlanet => 5,
            ActionType::AbandonColony => 1,
            ActionType::ProposeTradeRoute => 3,
        }
    }

    /// The time-between-actions class this action belongs to (§4.F), or
    /// `None` for actions with no cooldown floor.
    pub fn cooldown_class(&self) -> Option<&'static str> {
        match self {
            ActionType::InitiateCombat | ActionType::RetreatFromCombat => Some("attack"),
            ActionType::ColonizePlanet => Some("colonization"),
            ActionType::ProposeDiplomacy
            | ActionType::RespondToProposal
            | ActionType::ProposeTradeRoute => Some("diplomacy"),
            _ => None,
        }
    }
}
