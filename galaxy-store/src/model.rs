//! Row shapes for every persisted entity (§3 Data Model).

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use galaxy_common::{
    AgreementId, AgreementKind, BuildingType, EmpireId, ExplorationType, FleetId, FleetStatus,
    PlanetId, PlanetStatus, PlanetType, PlayerId, ProposalId, ProposalStatus, ProposalType,
    Resources, SectorCoordinate, ShipType, TechnologyCategory, TradeRouteId,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub username: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub is_moderator: bool,
    pub display_name: String,
    pub bio: String,
    pub deactivated: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Empire {
    pub id: EmpireId,
    pub player_id: PlayerId,
    pub name: String,
    pub resources: Resources,
    pub technology: BTreeMap<TechnologyCategory, u32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Planet {
    pub id: PlanetId,
    pub sector: SectorCoordinate,
    pub name: String,
    pub empire_id: Option<EmpireId>,
    pub planet_type: PlanetType,
    pub status: PlanetStatus,
    pub buildings: BTreeMap<BuildingType, u32>,
    pub population: i64,
    pub colonization_started: Option<DateTime<Utc>>,
    pub colonization_completed: Option<DateTime<Utc>>,
    /// The fleet left `colonizing` at this planet's sector (§4.E); returned
    /// to `active` by the completion sweep alongside the planet flip.
    pub colonizing_fleet_id: Option<FleetId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fleet {
    pub id: FleetId,
    pub empire_id: EmpireId,
    pub name: String,
    pub sector: SectorCoordinate,
    pub composition: BTreeMap<ShipType, u32>,
    pub status: FleetStatus,
    pub experience: u32,
    pub morale: i32,
    pub last_combat: Option<DateTime<Utc>>,
    /// Set while `colonizing` or `moving`; the sweep compares against it.
    pub action_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Fleet {
    pub fn total_ships(&self) -> u64 {
        self.composition.values().map(|&c| c as u64).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_ships() == 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiplomaticRelation {
    /// Canonical (min, max) empire pair (§3).
    pub empire_a: EmpireId,
    pub empire_b: EmpireId,
    pub trust_level: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiplomaticProposal {
    pub id: ProposalId,
    pub initiator_empire_id: EmpireId,
    pub target_empire_id: EmpireId,
    pub proposal_type: ProposalType,
    pub terms: Value,
    pub status: ProposalStatus,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agreement {
    pub id: AgreementId,
    pub empire_a: EmpireId,
    pub empire_b: EmpireId,
    pub kind: AgreementKind,
    pub effective_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub terms: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRoute {
    pub id: TradeRouteId,
    pub agreement_id: AgreementId,
    pub empire_a: EmpireId,
    pub empire_b: EmpireId,
    pub empire_a_gives: Resources,
    pub empire_b_gives: Resources,
    pub maintenance_cost: Resources,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The singleton `GlobalGameState` row (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub turn_number: u64,
    pub start_time: DateTime<Utc>,
    pub is_processing: bool,
    pub empires_processed_last_turn: u64,
    /// False until `TurnManager::initialize()` runs once; distinguishes a
    /// genuinely uninitialized galaxy from turn 1's default values.
    pub initialized: bool,
    pub updated_at: DateTime<Utc>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            turn_number: 1,
            start_time: Utc::now(),
            is_processing: false,
            empires_processed_last_turn: 0,
            initialized: false,
            updated_at: Utc::now(),
        }
    }
}

/// `ActionPointLedger` row keyed by (player_id, turn_number) (§3, §4.G).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionPointLedgerRow {
    pub player_id: PlayerId,
    pub turn_number: u64,
    pub points_available: u32,
    pub points_used: u32,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

impl ActionPointLedgerRow {
    pub fn points_remaining(&self) -> u32 {
        self.points_available.saturating_sub(self.points_used)
    }
}

/// `ActionPointReservation` row (§3, §4.G).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionPointReservation {
    pub reservation_id: Uuid,
    pub player_id: PlayerId,
    pub turn_number: u64,
    pub reserved_points: u32,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// A logged invocation of the game-balance engine, used to enforce the
/// time-between-actions floors (§4.F).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerAction {
    pub id: Uuid,
    pub player_id: PlayerId,
    pub action_class: String,
    pub occurred_at: DateTime<Utc>,
}

/// A sector the planet generator has already populated (§4.E open question:
/// exploration is global-per-sector, not per-empire).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExploredSector {
    pub sector: SectorCoordinate,
    pub exploration_type: ExplorationType,
    pub explored_at: DateTime<Utc>,
}
