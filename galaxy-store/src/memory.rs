//! In-memory reference [`Store`] implementation, exercised directly by
//! every other component crate's test suite. A single `tokio::sync::Mutex`
//! guards all tables; a transaction holds that mutex for its lifetime
//! (coarser than the row-level `FOR UPDATE` locking the real Postgres
//! implementation performs, but equivalent in observable atomicity) and
//! keeps a pre-transaction snapshot so `rollback` can restore it exactly.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use galaxy_common::{
    AgreementId, EmpireId, FleetId, PlanetId, PlanetStatus, PlayerId, ProposalId, ProposalStatus,
    ProposalType, SectorCoordinate, TradeRouteId,
};

use crate::error::StoreError;
use crate::model::*;
use crate::store::{Store, StoreTransaction};

#[derive(Debug, Default, Clone)]
struct Tables {
    players: BTreeMap<PlayerId, Player>,
    empires: BTreeMap<EmpireId, Empire>,
    planets: BTreeMap<PlanetId, Planet>,
    fleets: BTreeMap<FleetId, Fleet>,
    relations: BTreeMap<(EmpireId, EmpireId), DiplomaticRelation>,
    proposals: BTreeMap<ProposalId, DiplomaticProposal>,
    agreements: BTreeMap<AgreementId, Agreement>,
    trade_routes: BTreeMap<TradeRouteId, TradeRoute>,
    ledger: BTreeMap<(PlayerId, u64), ActionPointLedgerRow>,
    reservations: BTreeMap<Uuid, ActionPointReservation>,
    actions: Vec<PlayerAction>,
    explored_sectors: BTreeMap<(i64, i64), ExploredSector>,
    game_state: GameState,
    next_planet_id: i64,
    next_fleet_id: i64,
    next_proposal_id: i64,
    next_agreement_id: i64,
    next_trade_route_id: i64,
}

pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            tables: Arc::new(Mutex::new(Tables::default())),
        }
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>, StoreError> {
        let guard = self.tables.clone().lock_owned().await;
        Ok(Box::new(InMemoryTransaction::new(guard)))
    }

    async fn get_player(&self, id: PlayerId) -> Result<Player, StoreError> {
        let tables = self.tables.lock().await;
        tables
            .players
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("player {id}")))
    }

    async fn create_player(&self, player: Player) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().await;
        tables.players.insert(player.id, player);
        Ok(())
    }

    async fn find_player_by_username(&self, username: &str) -> Result<Option<Player>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .players
            .values()
            .find(|p| p.username == username)
            .cloned())
    }

    async fn assert_migrations_applied(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn gc_ledger_before(&self, cutoff_turn: u64) -> Result<u64, StoreError> {
        let mut tables = self.tables.lock().await;
        let before = tables.ledger.len();
        tables.ledger.retain(|(_, turn_number), _| *turn_number >= cutoff_turn);
        Ok((before - tables.ledger.len()) as u64)
    }
}

struct InMemoryTransaction {
    guard: OwnedMutexGuard<Tables>,
    snapshot: Tables,
}

impl InMemoryTransaction {
    fn new(guard: OwnedMutexGuard<Tables>) -> Self {
        let snapshot = guard.clone();
        Self { guard, snapshot }
    }
}

#[async_trait]
impl StoreTransaction for InMemoryTransaction {
    async fn lock_game_state(&mut self) -> Result<GameState, StoreError> {
        Ok(self.guard.game_state.clone())
    }

    async fn update_game_state(&mut self, state: GameState) -> Result<(), StoreError> {
        self.guard.game_state = state;
        Ok(())
    }

    async fn lock_empire(&mut self, id: EmpireId) -> Result<Empire, StoreError> {
        self.guard
            .empires
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("empire {id}")))
    }

    async fn update_empire(&mut self, empire: Empire) -> Result<(), StoreError> {
        self.guard.empires.insert(empire.id, empire);
        Ok(())
    }

    async fn create_empire(&mut self, empire: Empire) -> Result<(), StoreError> {
        if self.guard.empires.contains_key(&empire.id) {
            return Err(StoreError::Conflict(format!("empire {} exists", empire.id)));
        }
        self.guard.empires.insert(empire.id, empire);
        Ok(())
    }

    async fn find_empire_by_player(
        &mut self,
        player_id: PlayerId,
    ) -> Result<Option<Empire>, StoreError> {
        Ok(self
            .guard
            .empires
            .values()
            .find(|e| e.player_id == player_id)
            .cloned())
    }

    async fn all_empire_ids(&mut self) -> Result<Vec<EmpireId>, StoreError> {
        Ok(self.guard.empires.keys().copied().collect())
    }

    async fn lock_planet(&mut self, id: PlanetId) -> Result<Planet, StoreError> {
        self.guard
            .planets
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("planet {id}")))
    }

    async fn update_planet(&mut self, planet: Planet) -> Result<(), StoreError> {
        self.guard.planets.insert(planet.id, planet);
        Ok(())
    }

    async fn create_planet(&mut self, mut planet: Planet) -> Result<(), StoreError> {
        if planet.id.0 == 0 {
            self.guard.next_planet_id += 1;
            planet.id = PlanetId(self.guard.next_planet_id);
        }
        self.guard.planets.insert(planet.id, planet);
        Ok(())
    }

    async fn planets_in_sector(
        &mut self,
        sector: SectorCoordinate,
    ) -> Result<Vec<Planet>, StoreError> {
        Ok(self
            .guard
            .planets
            .values()
            .filter(|p| p.sector == sector)
            .cloned()
            .collect())
    }

    async fn planets_for_empire(&mut self, empire_id: EmpireId) -> Result<Vec<Planet>, StoreError> {
        Ok(self
            .guard
            .planets
            .values()
            .filter(|p| p.empire_id == Some(empire_id))
            .cloned()
            .collect())
    }

    async fn colonizing_planets_due(
        &mut self,
        now: DateTime<Utc>,
    ) -> Result<Vec<Planet>, StoreError> {
        Ok(self
            .guard
            .planets
            .values()
            .filter(|p| {
                p.status == PlanetStatus::Colonizing
                    && p.colonization_completed.map(|t| t <= now).unwrap_or(false)
            })
            .cloned()
            .collect())
    }

    async fn count_colonies_for_empire(&mut self, empire_id: EmpireId) -> Result<u32, StoreError> {
        Ok(self
            .guard
            .planets
            .values()
            .filter(|p| {
                p.empire_id == Some(empire_id)
                    && matches!(p.status, PlanetStatus::Active | PlanetStatus::Colonizing)
            })
            .count() as u32)
    }

    async fn lock_fleet(&mut self, id: FleetId) -> Result<Fleet, StoreError> {
        self.guard
            .fleets
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("fleet {id}")))
    }

    async fn update_fleet(&mut self, fleet: Fleet) -> Result<(), StoreError> {
        self.guard.fleets.insert(fleet.id, fleet);
        Ok(())
    }

    async fn create_fleet(&mut self, mut fleet: Fleet) -> Result<(), StoreError> {
        if fleet.id.0 == 0 {
            self.guard.next_fleet_id += 1;
            fleet.id = FleetId(self.guard.next_fleet_id);
        }
        self.guard.fleets.insert(fleet.id, fleet);
        Ok(())
    }

    async fn fleets_for_empire(&mut self, empire_id: EmpireId) -> Result<Vec<Fleet>, StoreError> {
        Ok(self
            .guard
            .fleets
            .values()
            .filter(|f| f.empire_id == empire_id)
            .cloned()
            .collect())
    }

    async fn count_fleets_for_empire(&mut self, empire_id: EmpireId) -> Result<u32, StoreError> {
        Ok(self
            .guard
            .fleets
            .values()
            .filter(|f| f.empire_id == empire_id)
            .count() as u32)
    }

    async fn count_ships_for_empire(&mut self, empire_id: EmpireId) -> Result<u64, StoreError> {
        Ok(self
            .guard
            .fleets
            .values()
            .filter(|f| f.empire_id == empire_id)
            .map(|f| f.total_ships())
            .sum())
    }

    async fn lock_relation(
        &mut self,
        a: EmpireId,
        b: EmpireId,
    ) -> Result<DiplomaticRelation, StoreError> {
        let key = galaxy_common::canonical_pair(a, b);
        if let Some(relation) = self.guard.relations.get(&key) {
            return Ok(relation.clone());
        }
        let now = Utc::now();
        let relation = DiplomaticRelation {
            empire_a: key.0,
            empire_b: key.1,
            trust_level: 0,
            created_at: now,
            updated_at: now,
        };
        self.guard.relations.insert(key, relation.clone());
        Ok(relation)
    }

    async fn update_relation(&mut self, relation: DiplomaticRelation) -> Result<(), StoreError> {
        let key = galaxy_common::canonical_pair(relation.empire_a, relation.empire_b);
        self.guard.relations.insert(key, relation);
        Ok(())
    }

    async fn lock_proposal(&mut self, id: ProposalId) -> Result<DiplomaticProposal, StoreError> {
        self.guard
            .proposals
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("proposal {id}")))
    }

    async fn update_proposal(&mut self, proposal: DiplomaticProposal) -> Result<(), StoreError> {
        self.guard.proposals.insert(proposal.id, proposal);
        Ok(())
    }

    async fn create_proposal(
        &mut self,
        mut proposal: DiplomaticProposal,
    ) -> Result<ProposalId, StoreError> {
        self.guard.next_proposal_id += 1;
        proposal.id = ProposalId(self.guard.next_proposal_id);
        let id = proposal.id;
        self.guard.proposals.insert(id, proposal);
        Ok(id)
    }

    async fn find_pending_proposal(
        &mut self,
        a: EmpireId,
        b: EmpireId,
        proposal_type: ProposalType,
    ) -> Result<Option<DiplomaticProposal>, StoreError> {
        Ok(self
            .guard
            .proposals
            .values()
            .find(|p| {
                p.status == ProposalStatus::Pending
                    && p.proposal_type == proposal_type
                    && ((p.initiator_empire_id == a && p.target_empire_id == b)
                        || (p.initiator_empire_id == b && p.target_empire_id == a))
            })
            .cloned())
    }

    async fn pending_proposals_expiring(
        &mut self,
        now: DateTime<Utc>,
    ) -> Result<Vec<DiplomaticProposal>, StoreError> {
        Ok(self
            .guard
            .proposals
            .values()
            .filter(|p| p.status == ProposalStatus::Pending && p.expires_at <= now)
            .cloned()
            .collect())
    }

    async fn create_agreement(&mut self, mut agreement: Agreement) -> Result<AgreementId, StoreError> {
        self.guard.next_agreement_id += 1;
        agreement.id = AgreementId(self.guard.next_agreement_id);
        let id = agreement.id;
        self.guard.agreements.insert(id, agreement);
        Ok(id)
    }

    async fn active_agreements_between(
        &mut self,
        a: EmpireId,
        b: EmpireId,
        now: DateTime<Utc>,
    ) -> Result<Vec<Agreement>, StoreError> {
        let key = galaxy_common::canonical_pair(a, b);
        Ok(self
            .guard
            .agreements
            .values()
            .filter(|ag| {
                galaxy_common::canonical_pair(ag.empire_a, ag.empire_b) == key
                    && ag.effective_at <= now
                    && ag.expires_at > now
            })
            .cloned()
            .collect())
    }

    async fn expired_agreements(&mut self, now: DateTime<Utc>) -> Result<Vec<Agreement>, StoreError> {
        Ok(self
            .guard
            .agreements
            .values()
            .filter(|ag| ag.expires_at <= now)
            .cloned()
            .collect())
    }

    async fn delete_agreement(&mut self, id: AgreementId) -> Result<(), StoreError> {
        self.guard.agreements.remove(&id);
        Ok(())
    }

    async fn create_trade_route(&mut self, mut route: TradeRoute) -> Result<TradeRouteId, StoreError> {
        self.guard.next_trade_route_id += 1;
        route.id = TradeRouteId(self.guard.next_trade_route_id);
        let id = route.id;
        self.guard.trade_routes.insert(id, route);
        Ok(id)
    }

    async fn active_trade_routes(&mut self) -> Result<Vec<TradeRoute>, StoreError> {
        Ok(self.guard.trade_routes.values().cloned().collect())
    }

    async fn lock_ledger(
        &mut self,
        player_id: PlayerId,
        turn_number: u64,
    ) -> Result<ActionPointLedgerRow, StoreError> {
        let key = (player_id, turn_number);
        if let Some(row) = self.guard.ledger.get(&key) {
            return Ok(row.clone());
        }
        let row = ActionPointLedgerRow {
            player_id,
            turn_number,
            points_available: galaxy_common::constants::DEFAULT_ACTION_POINTS_PER_TURN,
            points_used: 0,
            last_action: None,
            last_action_time: None,
        };
        self.guard.ledger.insert(key, row.clone());
        Ok(row)
    }

    async fn update_ledger(&mut self, row: ActionPointLedgerRow) -> Result<(), StoreError> {
        self.guard.ledger.insert((row.player_id, row.turn_number), row);
        Ok(())
    }

    async fn create_reservation(
        &mut self,
        reservation: ActionPointReservation,
    ) -> Result<(), StoreError> {
        self.guard
            .reservations
            .insert(reservation.reservation_id, reservation);
        Ok(())
    }

    async fn get_reservation(
        &mut self,
        reservation_id: Uuid,
    ) -> Result<Option<ActionPointReservation>, StoreError> {
        Ok(self.guard.reservations.get(&reservation_id).cloned())
    }

    async fn delete_reservation(&mut self, reservation_id: Uuid) -> Result<(), StoreError> {
        self.guard.reservations.remove(&reservation_id);
        Ok(())
    }

    async fn expired_reservations(
        &mut self,
        now: DateTime<Utc>,
    ) -> Result<Vec<ActionPointReservation>, StoreError> {
        Ok(self
            .guard
            .reservations
            .values()
            .filter(|r| r.expires_at <= now)
            .cloned()
            .collect())
    }

    async fn reserved_points_for_player(
        &mut self,
        player_id: PlayerId,
        turn_number: u64,
        now: DateTime<Utc>,
    ) -> Result<u32, StoreError> {
        Ok(self
            .guard
            .reservations
            .values()
            .filter(|r| r.player_id == player_id && r.turn_number == turn_number && r.expires_at > now)
            .map(|r| r.reserved_points)
            .sum())
    }

    async fn record_action(&mut self, action: PlayerAction) -> Result<(), StoreError> {
        self.guard.actions.push(action);
        Ok(())
    }

    async fn last_action_of_class(
        &mut self,
        player_id: PlayerId,
        action_class: &str,
    ) -> Result<Option<PlayerAction>, StoreError> {
        Ok(self
            .guard
            .actions
            .iter()
            .filter(|a| a.player_id == player_id && a.action_class == action_class)
            .max_by_key(|a| a.occurred_at)
            .cloned())
    }

    async fn mark_sector_explored(&mut self, sector: ExploredSector) -> Result<(), StoreError> {
        self.guard
            .explored_sectors
            .insert((sector.sector.x, sector.sector.y), sector);
        Ok(())
    }

    async fn sector_explored(&mut self, sector: SectorCoordinate) -> Result<bool, StoreError> {
        Ok(self.guard.explored_sectors.contains_key(&(sector.x, sector.y)))
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        Ok(())
    }

    async fn rollback(mut self: Box<Self>) -> Result<(), StoreError> {
        *self.guard = self.snapshot.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use galaxy_common::Resources;
    use std::collections::BTreeMap as Map;

    fn sample_empire(id: EmpireId) -> Empire {
        let now = Utc::now();
        Empire {
            id,
            player_id: PlayerId::new(),
            name: "Test Empire".to_string(),
            resources: Resources::new(1000, 1000, 1000, 0),
            technology: Map::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn transaction_rollback_discards_writes() {
        let store = InMemoryStore::new();
        let id = EmpireId::new();

        let mut tx = store.begin().await.unwrap();
        tx.create_empire(sample_empire(id)).await.unwrap();
        tx.rollback().await.unwrap();

        let err = store.get_empire(id).await;
        assert!(err.is_err());
    }

    #[tokio::test]
    async fn transaction_commit_persists_writes() {
        let store = InMemoryStore::new();
        let id = EmpireId::new();

        let mut tx = store.begin().await.unwrap();
        tx.create_empire(sample_empire(id)).await.unwrap();
        tx.commit().await.unwrap();

        let empire = store.get_empire(id).await.unwrap();
        assert_eq!(empire.id, id);
    }

    #[tokio::test]
    async fn relation_lookup_is_order_independent() {
        let store = InMemoryStore::new();
        let a = EmpireId::new();
        let b = EmpireId::new();

        let mut tx = store.begin().await.unwrap();
        let relation_ab = tx.lock_relation(a, b).await.unwrap();
        let relation_ba = tx.lock_relation(b, a).await.unwrap();
        tx.commit().await.unwrap();

        assert_eq!(relation_ab.empire_a, relation_ba.empire_a);
        assert_eq!(relation_ab.empire_b, relation_ba.empire_b);
    }
}
