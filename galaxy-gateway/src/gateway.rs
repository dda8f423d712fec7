//! Component I, the Action Gateway (§4.I): the thin per-request
//! orchestrator every state-changing route calls through. Resolves the
//! caller's empire, runs the Game-Balance Engine, reserves action points,
//! invokes the domain operation, then commits or releases depending on
//! the outcome — exactly the five steps §4.I lists, with nothing else.

use std::future::Future;

use galaxy_common::clock::Clock;
use galaxy_common::{EmpireId, GameError, PlayerId, Resources};
use galaxy_store::{Empire, Store};

use galaxy_balance::{validate, ActionQuantities, ActionType};

/// Resolves `player -> empire` (§4.I step 1). Un-owned/missing empires
/// surface as `NotFound` rather than a distinct "no empire" kind, per §7's
/// "un-owned resource is surfaced as not-found to prevent enumeration".
pub async fn resolve_empire(store: &dyn Store, player_id: PlayerId) -> Result<Empire, GameError> {
    let mut tx = store.begin().await.map_err(GameError::from)?;
    let empire = tx
        .find_empire_by_player(player_id)
        .await
        .map_err(GameError::from)?;
    tx.rollback().await.map_err(GameError::from)?;
    empire.ok_or_else(|| GameError::not_found(format!("empire for player {player_id}")))
}

/// Current turn number, read without holding the singleton lock past the
/// read — every caller of [`execute_action`] needs this once, to key the
/// ledger reservation (§4.G rows are keyed by `(player_id, turn_number)`).
pub async fn current_turn_number(store: &dyn Store) -> Result<u64, GameError> {
    let mut tx = store.begin().await.map_err(GameError::from)?;
    let state = tx.lock_game_state().await.map_err(GameError::from)?;
    tx.rollback().await.map_err(GameError::from)?;
    Ok(state.turn_number)
}

/// One call's worth of inputs to the five-step pipeline (§4.I).
pub struct ActionRequest {
    pub player_id: PlayerId,
    pub empire_id: EmpireId,
    pub action_type: ActionType,
    pub proposed_cost: Resources,
    pub quantities: ActionQuantities,
    pub emergency: bool,
}

/// Runs steps 2-5 of §4.I around the caller-supplied domain operation
/// `op`: validate, reserve, invoke, then commit on success or release on
/// failure. `op` receives the balance engine's `adjusted_costs` in case
/// the domain operation needs the scaled figure (e.g. to charge it).
pub async fn execute_action<Op, Fut, T>(
    store: &dyn Store,
    clock: &dyn Clock,
    request: ActionRequest,
    op: Op,
) -> Result<T, GameError>
where
    Op: FnOnce(Resources) -> Fut,
    Fut: Future<Output = Result<T, GameError>>,
{
    let validation = validate(
        store,
        request.player_id,
        request.empire_id,
        request.action_type,
        request.proposed_cost,
        request.quantities,
    )
    .await?;

    if !validation.valid {
        let message = validation
            .violations
            .iter()
            .map(|v| v.message.clone())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(GameError::validation(message));
    }

    let turn_number = current_turn_number(store).await?;
    let required_points = request.action_type.base_action_points();

    let reservation_id = galaxy_ledger::reserve(
        store,
        clock,
        request.player_id,
        turn_number,
        required_points,
        request.emergency,
    )
    .await?;

    match op(validation.adjusted_costs).await {
        Ok(value) => {
            let action_name = format!("{:?}", request.action_type);
            galaxy_ledger::commit(store, clock, reservation_id, &action_name).await?;
            Ok(value)
        }
        Err(err) => {
            let _ = galaxy_ledger::release(store, reservation_id).await;
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use galaxy_common::clock::FrozenClock;
    use galaxy_store::memory::InMemoryStore;
    use std::collections::BTreeMap;

    async fn seed_empire(store: &InMemoryStore, player_id: PlayerId, empire_id: EmpireId) {
        let now = chrono::Utc::now();
        let mut tx = store.begin().await.unwrap();
        tx.create_empire(Empire {
            id: empire_id,
            player_id,
            name: "Gateway Test Empire".into(),
            resources: Resources::new(10_000, 10_000, 10_000, 0),
            technology: BTreeMap::new(),
            created_at: now,
            updated_at: now,
        })
        .await
        .unwrap();
        tx.commit().await.unwrap();
    }

    #[tokio::test]
    async fn failed_domain_op_releases_the_reservation() {
        let store = InMemoryStore::new();
        let clock = FrozenClock::at(chrono::Utc::now());
        let player_id = PlayerId::new();
        let empire_id = EmpireId::new();
        seed_empire(&store, player_id, empire_id).await;

        let request = ActionRequest {
            player_id,
            empire_id,
            action_type: ActionType::RenameEmpire,
            proposed_cost: Resources::zero(),
            quantities: ActionQuantities::default(),
            emergency: false,
        };

        let result: Result<(), GameError> =
            execute_action(&store, &clock, request, |_| async { Err(GameError::conflict("boom")) }).await;
        assert!(result.is_err());

        // The released reservation means the full budget is available again.
        let turn = current_turn_number(&store).await.unwrap();
        let reservation = galaxy_ledger::reserve(&store, &clock, player_id, turn, 10, false).await;
        assert!(reservation.is_ok());
    }

    #[tokio::test]
    async fn successful_domain_op_commits_and_consumes_points() {
        let store = InMemoryStore::new();
        let clock = FrozenClock::at(chrono::Utc::now());
        let player_id = PlayerId::new();
        let empire_id = EmpireId::new();
        seed_empire(&store, player_id, empire_id).await;

        let request = ActionRequest {
            player_id,
            empire_id,
            action_type: ActionType::RenameEmpire,
            proposed_cost: Resources::zero(),
            quantities: ActionQuantities::default(),
            emergency: false,
        };

        let result: Result<&str, GameError> = execute_action(&store, &clock, request, |_| async { Ok("ok") }).await;
        assert_eq!(result.unwrap(), "ok");

        let turn = current_turn_number(&store).await.unwrap();
        let mut tx = store.begin().await.unwrap();
        let row = tx.lock_ledger(player_id, turn).await.unwrap();
        tx.rollback().await.unwrap();
        assert_eq!(row.points_used, 1);
    }
}
