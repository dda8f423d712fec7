//! Two-phase reserve/commit/release (§4.G). The ledger is the single
//! ordering authority for per-player, per-turn action-point budgets (§5).

use uuid::Uuid;

use galaxy_common::clock::Clock;
use galaxy_common::constants::{ACTION_POINT_RESERVATION_TTL_SECS, EMERGENCY_ACTION_POINT_MULTIPLIER};
use galaxy_common::{GameError, PlayerId};
use galaxy_store::{ActionPointReservation, Store};

use crate::error::LedgerError;

/// `Reserve(player, required_points)` (§4.G step 1). Locks the ledger row,
/// computes `available = points_available - points_used - Σ(live reservations)`,
/// and either inserts a TTL-bounded reservation or fails with
/// `InsufficientActionPoints`. `emergency` multiplies the required points
/// by [`EMERGENCY_ACTION_POINT_MULTIPLIER`] before the check.
pub async fn reserve(
    store: &dyn Store,
    clock: &dyn Clock,
    player_id: PlayerId,
    turn_number: u64,
    required_points: u32,
    emergency: bool,
) -> Result<Uuid, GameError> {
    let now = clock.now();
    let effective_required = if emergency {
        ((required_points as f64) * EMERGENCY_ACTION_POINT_MULTIPLIER).ceil() as u32
    } else {
        required_points
    };

    let mut tx = store.begin().await.map_err(GameError::from)?;
    let row = tx
        .lock_ledger(player_id, turn_number)
        .await
        .map_err(GameError::from)?;
    let reserved = tx
        .reserved_points_for_player(player_id, turn_number, now)
        .await
        .map_err(GameError::from)?;

    let committed_and_reserved = row.points_used.saturating_add(reserved);
    let available = row.points_available.saturating_sub(committed_and_reserved);

    if available < effective_required {
        tx.rollback().await.map_err(GameError::from)?;
        return Err(GameError::InsufficientActionPoints {
            required: effective_required,
            available,
        });
    }

    let reservation_id = Uuid::new_v4();
    tx.create_reservation(ActionPointReservation {
        reservation_id,
        player_id,
        turn_number,
        reserved_points: effective_required,
        created_at: now,
        expires_at: now + chrono::Duration::seconds(ACTION_POINT_RESERVATION_TTL_SECS),
    })
    .await
    .map_err(GameError::from)?;

    tx.commit().await.map_err(GameError::from)?;
    Ok(reservation_id)
}

/// `Commit(reservation_id, action_type)` (§4.G step 2): loads the
/// reservation (failing if missing or past its TTL), appends an immutable
/// action-log row, bumps `points_used`, and deletes the reservation.
pub async fn commit(
    store: &dyn Store,
    clock: &dyn Clock,
    reservation_id: Uuid,
    action_type: &str,
) -> Result<(), GameError> {
    let now = clock.now();
    let mut tx = store.begin().await.map_err(GameError::from)?;

    let reservation = tx
        .get_reservation(reservation_id)
        .await
        .map_err(GameError::from)?
        .ok_or(LedgerError::ReservationNotFound(reservation_id))?;
    if now > reservation.expires_at {
        tx.rollback().await.map_err(GameError::from)?;
        return Err(LedgerError::ReservationExpired(reservation_id).into());
    }

    let mut row = tx
        .lock_ledger(reservation.player_id, reservation.turn_number)
        .await
        .map_err(GameError::from)?;
    row.points_used = row.points_used.saturating_add(reservation.reserved_points);
    row.last_action = Some(action_type.to_string());
    row.last_action_time = Some(now);
    tx.update_ledger(row).await.map_err(GameError::from)?;

    tx.record_action(galaxy_store::PlayerAction {
        id: Uuid::new_v4(),
        player_id: reservation.player_id,
        action_class: action_type.to_string(),
        occurred_at: now,
    })
    .await
    .map_err(GameError::from)?;

    tx.delete_reservation(reservation_id)
        .await
        .map_err(GameError::from)?;
    tx.commit().await.map_err(GameError::from)?;
    Ok(())
}

/// `Release(reservation_id)` (§4.G step 3): best-effort delete, called on
/// domain-op failure so the held points return to the available pool.
pub async fn release(store: &dyn Store, reservation_id: Uuid) -> Result<(), GameError> {
    let mut tx = store.begin().await.map_err(GameError::from)?;
    tx.delete_reservation(reservation_id)
        .await
        .map_err(GameError::from)?;
    tx.commit().await.map_err(GameError::from)?;
    Ok(())
}

/// Periodic sweep (§4.G step 4): deletes reservations whose TTL has
/// elapsed so a handler that died mid-action doesn't permanently hold its
/// budget.
pub async fn sweep_expired_reservations(store: &dyn Store, clock: &dyn Clock) -> Result<u64, GameError> {
    let now = clock.now();
    let mut tx = store.begin().await.map_err(GameError::from)?;
    let expired = tx.expired_reservations(now).await.map_err(GameError::from)?;
    let count = expired.len() as u64;
    for reservation in expired {
        tx.delete_reservation(reservation.reservation_id)
            .await
            .map_err(GameError::from)?;
    }
    tx.commit().await.map_err(GameError::from)?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use galaxy_common::clock::FrozenClock;
    use galaxy_store::memory::InMemoryStore;
    use chrono::Utc;

    #[tokio::test]
    async fn reserve_then_release_restores_full_availability() {
        let store = InMemoryStore::new();
        let clock = FrozenClock::at(Utc::now());
        let player_id = PlayerId::new();

        let reservation_id = reserve(&store, &clock, player_id, 1, 3, false).await.unwrap();
        release(&store, reservation_id).await.unwrap();

        let second = reserve(&store, &clock, player_id, 1, 10, false).await.unwrap();
        assert!(!second.is_nil());
    }

    #[tokio::test]
    async fn reservation_fails_when_points_exhausted() {
        let store = InMemoryStore::new();
        let clock = FrozenClock::at(Utc::now());
        let player_id = PlayerId::new();

        reserve(&store, &clock, player_id, 1, 8, false).await.unwrap();
        let err = reserve(&store, &clock, player_id, 1, 5, false).await.unwrap_err();

        match err {
            GameError::InsufficientActionPoints { required, available } => {
                assert_eq!(required, 5);
                assert_eq!(available, 2);
            }
            other => panic!("expected InsufficientActionPoints, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn commit_bumps_points_used_and_drops_the_reservation() {
        let store = InMemoryStore::new();
        let clock = FrozenClock::at(Utc::now());
        let player_id = PlayerId::new();

        let reservation_id = reserve(&store, &clock, player_id, 1, 3, false).await.unwrap();
        commit(&store, &clock, reservation_id, "colonize_planet")
            .await
            .unwrap();

        let mut tx = store.begin().await.unwrap();
        let row = tx.lock_ledger(player_id, 1).await.unwrap();
        tx.rollback().await.unwrap();
        assert_eq!(row.points_used, 3);

        let missing = commit(&store, &clock, reservation_id, "colonize_planet").await;
        assert!(missing.is_err());
    }

    #[tokio::test]
    async fn sweep_reclaims_expired_reservations() {
        let store = InMemoryStore::new();
        let clock = FrozenClock::at(Utc::now());
        let player_id = PlayerId::new();

        reserve(&store, &clock, player_id, 1, 3, false).await.unwrap();
        clock.advance(chrono::Duration::seconds(31));

        let swept = sweep_expired_reservations(&store, &clock).await.unwrap();
        assert_eq!(swept, 1);

        let available_again = reserve(&store, &clock, player_id, 1, 10, false).await;
        assert!(available_again.is_ok());
    }

    #[tokio::test]
    async fn emergency_reservations_cost_double() {
        let store = InMemoryStore::new();
        let clock = FrozenClock::at(Utc::now());
        let player_id = PlayerId::new();

        let err = reserve(&store, &clock, player_id, 1, 6, true).await.unwrap_err();
        match err {
            GameError::InsufficientActionPoints { required, .. } => assert_eq!(required, 12),
            other => panic!("expected InsufficientActionPoints, got {other:?}"),
        }
    }
}
