//! `allocateActionPoints(player)` (§4.H): idempotent per (player, turn)
//! grant, called once per empire at the start of each turn by the Turn
//! Manager. Idempotent because [`StoreTransaction::lock_ledger`] already
//! creates the row with the default grant if one doesn't exist.

use galaxy_common::{GameError, PlayerId};
use galaxy_store::{ActionPointLedgerRow, Store};

pub async fn allocate_action_points(
    store: &dyn Store,
    player_id: PlayerId,
    turn_number: u64,
) -> Result<ActionPointLedgerRow, GameError> {
    let mut tx = store.begin().await.map_err(GameError::from)?;
    let row = tx
        .lock_ledger(player_id, turn_number)
        .await
        .map_err(GameError::from)?;
    tx.commit().await.map_err(GameError::from)?;
    Ok(row)
}

/// Garbage-collects ledger rows older than `keep_last_n_turns` turns,
/// called by the Turn Manager at the end of `advance()` (§4.H).
pub async fn gc_old_ledger_rows(
    store: &dyn Store,
    current_turn: u64,
    keep_last_n_turns: u64,
) -> Result<u64, GameError> {
    if current_turn <= keep_last_n_turns {
        return Ok(0);
    }
    let cutoff = current_turn - keep_last_n_turns;
    store.gc_ledger_before(cutoff).await.map_err(GameError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use galaxy_common::constants::DEFAULT_ACTION_POINTS_PER_TURN;
    use galaxy_store::memory::InMemoryStore;

    #[tokio::test]
    async fn allocating_twice_returns_the_same_grant() {
        let store = InMemoryStore::new();
        let player_id = PlayerId::new();

        let first = allocate_action_points(&store, player_id, 3).await.unwrap();
        let second = allocate_action_points(&store, player_id, 3).await.unwrap();

        assert_eq!(first.points_available, DEFAULT_ACTION_POINTS_PER_TURN);
        assert_eq!(first.points_available, second.points_available);
        assert_eq!(first.points_used, second.points_used);
    }
}
