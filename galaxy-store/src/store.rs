//! The `Store`/`StoreTransaction` traits (§4.A Persistent Store).
//!
//! §4.A describes a generic `get/find/create/update/delete/count`
//! surface. A stringly-typed filter object would let caller-constructed
//! column names reach a query builder, which is exactly what §4.A's
//! identifier allow-list requirement exists to prevent — so here each
//! query the components actually need is its own typed method instead.
//! Row-level locking is realized as `lock_*` methods on [`StoreTransaction`]
//! that return the current row and hold it for the lifetime of the
//! transaction, matching `SELECT ... FOR UPDATE`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use galaxy_common::{
    AgreementId, EmpireId, FleetId, PlanetId, PlayerId, ProposalId, SectorCoordinate,
    TradeRouteId,
};

use crate::error::StoreError;
use crate::model::*;

#[async_trait]
pub trait StoreTransaction: Send {
    async fn lock_game_state(&mut self) -> Result<GameState, StoreError>;
    async fn update_game_state(&mut self, state: GameState) -> Result<(), StoreError>;

    async fn lock_empire(&mut self, id: EmpireId) -> Result<Empire, StoreError>;
    async fn update_empire(&mut self, empire: Empire) -> Result<(), StoreError>;
    async fn create_empire(&mut self, empire: Empire) -> Result<(), StoreError>;
    async fn find_empire_by_player(&mut self, player_id: PlayerId) -> Result<Option<Empire>, StoreError>;
    async fn all_empire_ids(&mut self) -> Result<Vec<EmpireId>, StoreError>;

    async fn lock_planet(&mut self, id: PlanetId) -> Result<Planet, StoreError>;
    async fn update_planet(&mut self, planet: Planet) -> Result<(), StoreError>;
    async fn create_planet(&mut self, planet: Planet) -> Result<(), StoreError>;
    async fn planets_in_sector(&mut self, sector: SectorCoordinate) -> Result<Vec<Planet>, StoreError>;
    async fn planets_for_empire(&mut self, empire_id: EmpireId) -> Result<Vec<Planet>, StoreError>;
    async fn colonizing_planets_due(&mut self, now: DateTime<Utc>) -> Result<Vec<Planet>, StoreError>;
    async fn count_colonies_for_empire(&mut self, empire_id: EmpireId) -> Result<u32, StoreError>;

    async fn lock_fleet(&mut self, id: FleetId) -> Result<Fleet, StoreError>;
    async fn update_fleet(&mut self, fleet: Fleet) -> Result<(), StoreError>;
    async fn create_fleet(&mut self, fleet: Fleet) -> Result<(), StoreError>;
    async fn fleets_for_empire(&mut self, empire_id: EmpireId) -> Result<Vec<Fleet>, StoreError>;
    async fn count_fleets_for_empire(&mut self, empire_id: EmpireId) -> Result<u32, StoreError>;
    async fn count_ships_for_empire(&mut self, empire_id: EmpireId) -> Result<u64, StoreError>;

    async fn lock_relation(
        &mut self,
        a: EmpireId,
        b: EmpireId,
    ) -> Result<DiplomaticRelation, StoreError>;
    async fn update_relation(&mut self, relation: DiplomaticRelation) -> Result<(), StoreError>;

    async fn lock_proposal(&mut self, id: ProposalId) -> Result<DiplomaticProposal, StoreError>;
    async fn update_proposal(&mut self, proposal: DiplomaticProposal) -> Result<(), StoreError>;
    async fn create_proposal(&mut self, proposal: DiplomaticProposal) -> Result<ProposalId, StoreError>;
    async fn find_pending_proposal(
        &mut self,
        a: EmpireId,
        b: EmpireId,
        proposal_type: galaxy_common::ProposalType,
    ) -> Result<Option<DiplomaticProposal>, StoreError>;
    async fn pending_proposals_expiring(
        &mut self,
        now: DateTime<Utc>,
    ) -> Result<Vec<DiplomaticProposal>, StoreError>;

    async fn create_agreement(&mut self, agreement: Agreement) -> Result<AgreementId, StoreError>;
    async fn active_agreements_between(
        &mut self,
        a: EmpireId,
        b: EmpireId,
        now: DateTime<Utc>,
    ) -> Result<Vec<Agreement>, StoreError>;
    async fn expired_agreements(&mut self, now: DateTime<Utc>) -> Result<Vec<Agreement>, StoreError>;
    async fn delete_agreement(&mut self, id: AgreementId) -> Result<(), StoreError>;

    async fn create_trade_route(&mut self, route: TradeRoute) -> Result<TradeRouteId, StoreError>;
    async fn active_trade_routes(&mut self) -> Result<Vec<TradeRoute>, StoreError>;

    async fn lock_ledger(
        &mut self,
        player_id: PlayerId,
        turn_number: u64,
    ) -> Result<ActionPointLedgerRow, StoreError>;
    async fn update_ledger(&mut self, row: ActionPointLedgerRow) -> Result<(), StoreError>;

    async fn create_reservation(
        &mut self,
        reservation: ActionPointReservation,
    ) -> Result<(), StoreError>;
    async fn get_reservation(
        &mut self,
        reservation_id: Uuid,
    ) -> Result<Option<ActionPointReservation>, StoreError>;
    async fn delete_reservation(&mut self, reservation_id: Uuid) -> Result<(), StoreError>;
    async fn expired_reservations(
        &mut self,
        now: DateTime<Utc>,
    ) -> Result<Vec<ActionPointReservation>, StoreError>;
    /// Sum of `reserved_points` across all live (non-expired) reservations
    /// for (player, turn), used by `reserve`'s availability formula (§4.G).
    async fn reserved_points_for_player(
        &mut self,
        player_id: PlayerId,
        turn_number: u64,
        now: DateTime<Utc>,
    ) -> Result<u32, StoreError>;

    async fn record_action(&mut self, action: PlayerAction) -> Result<(), StoreError>;
    async fn last_action_of_class(
        &mut self,
        player_id: PlayerId,
        action_class: &str,
    ) -> Result<Option<PlayerAction>, StoreError>;

    async fn mark_sector_explored(&mut self, sector: ExploredSector) -> Result<(), StoreError>;
    async fn sector_explored(&mut self, sector: SectorCoordinate) -> Result<bool, StoreError>;

    async fn commit(self: Box<Self>) -> Result<(), StoreError>;
    async fn rollback(self: Box<Self>) -> Result<(), StoreError>;
}

/// Component A's top-level handle: opens transactions and offers read-only
/// convenience accessors that don't need a held lock.
#[async_trait]
pub trait Store: Send + Sync + 'static {
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>, StoreError>;

    async fn get_empire(&self, id: EmpireId) -> Result<Empire, StoreError> {
        let mut tx = self.begin().await?;
        let empire = tx.lock_empire(id).await?;
        tx.rollback().await?;
        Ok(empire)
    }

    async fn get_player(&self, id: PlayerId) -> Result<Player, StoreError>;
    async fn create_player(&self, player: Player) -> Result<(), StoreError>;
    async fn find_player_by_username(&self, username: &str) -> Result<Option<Player>, StoreError>;

    /// Deletes ledger rows for turns strictly before `cutoff_turn`, part of
    /// `advance()`'s end-of-turn garbage collection (§4.H). Returns the
    /// number of rows removed.
    async fn gc_ledger_before(&self, cutoff_turn: u64) -> Result<u64, StoreError>;

    /// Refuses to start if pending migrations remain (§4.A).
    async fn assert_migrations_applied(&self) -> Result<(), StoreError>;
}
