//! # Galaxy Turn Engine — Economy
//!
//! Component B, the Resource Calculator: a pure snapshot-to-outcome
//! function ([`calculator::evaluate`] / [`calculator::apply`]) plus the
//! transactional `processTurn(empireId)` contract the turn pipeline calls
//! once per empire.

pub mod calculator;
pub mod power;
pub mod production;
pub mod technology;

use chrono::Utc;
use galaxy_common::{EmpireId, GameError};
use galaxy_store::Store;

pub use calculator::{apply, evaluate, storage_cap, EconomySnapshot};

/// Runs one empire's `processTurn` inside a single transaction: read the
/// current snapshot, compute production/consumption/net, apply with
/// overflow handling, persist the new resource vector. Idempotent within a
/// single turn because re-running it against the same persisted resources
/// and the same planet/fleet snapshot reproduces the same output (§4.B).
pub async fn process_turn(store: &dyn Store, empire_id: EmpireId) -> Result<EconomySnapshot, GameError> {
    let mut tx = store.begin().await.map_err(GameError::from)?;

    let empire = tx.lock_empire(empire_id).await.map_err(GameError::from)?;
    let planets = tx
        .planets_for_empire(empire_id)
        .await
        .map_err(GameError::from)?;
    let fleets = tx
        .fleets_for_empire(empire_id)
        .await
        .map_err(GameError::from)?;

    let snapshot = evaluate(&planets, &fleets);
    let new_resources = apply(empire.resources, snapshot.net, snapshot.storage_cap);

    let mut updated = empire;
    updated.resources = new_resources;
    updated.updated_at = Utc::now();

    tx.update_empire(updated).await.map_err(GameError::from)?;
    tx.commit().await.map_err(GameError::from)?;

    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use galaxy_common::{PlanetId, PlanetStatus, PlanetType, PlayerId, Resources, SectorCoordinate};
    use galaxy_store::{memory::InMemoryStore, Empire, Planet};
    use std::collections::BTreeMap;

    fn empire(id: EmpireId) -> Empire {
        let now = Utc::now();
        Empire {
            id,
            player_id: PlayerId::new(),
            name: "Sol Dominion".into(),
            resources: Resources::new(900, 900, 900, 0),
            technology: BTreeMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn planet(id: i64, empire_id: EmpireId, planet_type: PlanetType) -> Planet {
        let now = Utc::now();
        Planet {
            id: PlanetId(id),
            sector: SectorCoordinate::new(0, 0),
            name: "Homeworld".into(),
            empire_id: Some(empire_id),
            planet_type,
            status: PlanetStatus::Active,
            buildings: BTreeMap::new(),
            population: 2000,
            colonization_started: None,
            colonization_completed: None,
            colonizing_fleet_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn process_turn_snapshot_is_deterministic_for_unchanged_state() {
        // processTurn is idempotent within a single turn because the turn
        // pipeline guarantees it runs exactly once per (empire, turn); here
        // we confirm the snapshot itself (production/consumption/net) is a
        // pure function of the planet/fleet state rather than of prior calls.
        let store = InMemoryStore::new();
        let empire_id = EmpireId::new();

        let mut tx = store.begin().await.unwrap();
        tx.create_empire(empire(empire_id)).await.unwrap();
        tx.create_planet(planet(1, empire_id, PlanetType::Mining))
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let first = process_turn(&store, empire_id).await.unwrap();
        let planets = {
            let mut tx = store.begin().await.unwrap();
            let planets = tx.planets_for_empire(empire_id).await.unwrap();
            tx.rollback().await.unwrap();
            planets
        };
        let second_snapshot = evaluate(&planets, &[]);

        assert_eq!(first.net, second_snapshot.net);
        assert_eq!(first.production, second_snapshot.production);
    }
}
