//! Sector exploration (§4.E): idempotent planet generation per sector.

use chrono::Utc;
use rand::Rng;

use galaxy_common::crypto::{generate_planet_name, generate_planet_type, DEFAULT_GALAXY_SEED};
use galaxy_common::{EmpireId, ExplorationType, GameError, PlanetId, PlanetStatus, SectorCoordinate};
use galaxy_store::{ExploredSector, Planet, Store};

/// `exploreSector(empireId, sector, type)` (§4.E). Deducts the exploration
/// cost and generates planets only on the sector's first exploration;
/// subsequent calls (by any empire) return the existing set with no
/// charge — a sector has one global planet set shared by every empire
/// that explores it.
pub async fn explore_sector(
    store: &dyn Store,
    empire_id: EmpireId,
    sector: SectorCoordinate,
    exploration_type: ExplorationType,
    rng: &mut impl Rng,
) -> Result<Vec<Planet>, GameError> {
    let mut tx = store.begin().await.map_err(GameError::from)?;

    if tx.sector_explored(sector).await.map_err(GameError::from)? {
        let planets = tx.planets_in_sector(sector).await.map_err(GameError::from)?;
        tx.rollback().await.map_err(GameError::from)?;
        return Ok(planets);
    }

    let cost = exploration_type.cost();
    let mut empire = tx.lock_empire(empire_id).await.map_err(GameError::from)?;
    if !empire.resources.has_at_least(&cost) {
        tx.rollback().await.map_err(GameError::from)?;
        return Err(GameError::InsufficientResources {
            required: cost,
            available: empire.resources,
        });
    }
    empire.resources -= cost;
    empire.updated_at = Utc::now();
    tx.update_empire(empire).await.map_err(GameError::from)?;

    let (min, max) = exploration_type.planet_range();
    let count = rng.gen_range(min..=max);

    for index in 0..count {
        let planet_type = generate_planet_type(&DEFAULT_GALAXY_SEED, sector.x, sector.y, index);
        let name = generate_planet_name(&DEFAULT_GALAXY_SEED, sector.x, sector.y, index);
        let now = Utc::now();
        let planet = Planet {
            id: PlanetId(0),
            sector,
            name,
            empire_id: None,
            planet_type,
            status: PlanetStatus::Available,
            buildings: Default::default(),
            population: 0,
            colonization_started: None,
            colonization_completed: None,
            colonizing_fleet_id: None,
            created_at: now,
            updated_at: now,
        };
        tx.create_planet(planet).await.map_err(GameError::from)?;
    }

    tx.mark_sector_explored(ExploredSector {
        sector,
        exploration_type,
        explored_at: Utc::now(),
    })
    .await
    .map_err(GameError::from)?;

    let planets = tx.planets_in_sector(sector).await.map_err(GameError::from)?;
    tx.commit().await.map_err(GameError::from)?;

    Ok(planets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use galaxy_common::{PlayerId, Resources};
    use galaxy_store::memory::InMemoryStore;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::BTreeMap;

    async fn seed_empire(store: &InMemoryStore, id: EmpireId) {
        let now = Utc::now();
        let mut tx = store.begin().await.unwrap();
        tx.create_empire(galaxy_store::Empire {
            id,
            player_id: PlayerId::new(),
            name: "Explorer".into(),
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
    async fn second_call_returns_the_same_set_without_charging_again() {
        let store = InMemoryStore::new();
        let empire_id = EmpireId::new();
        seed_empire(&store, empire_id).await;
        let sector = SectorCoordinate::new(5, 5);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let first = explore_sector(&store, empire_id, sector, ExplorationType::Scout, &mut rng)
            .await
            .unwrap();
        let after_first = store.get_empire(empire_id).await.unwrap().resources;

        let second = explore_sector(&store, empire_id, sector, ExplorationType::Scout, &mut rng)
            .await
            .unwrap();
        let after_second = store.get_empire(empire_id).await.unwrap().resources;

        assert_eq!(first.len(), second.len());
        assert_eq!(after_first, after_second);
    }

    #[tokio::test]
    async fn generates_between_one_and_three_planets_for_a_scout() {
        let store = InMemoryStore::new();
        let empire_id = EmpireId::new();
        seed_empire(&store, empire_id).await;
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        let planets = explore_sector(
            &store,
            empire_id,
            SectorCoordinate::new(9, 9),
            ExplorationType::Scout,
            &mut rng,
        )
        .await
        .unwrap();

        assert!(planets.len() >= 1 && planets.len() <= 3);
        assert!(planets.iter().all(|p| p.status == PlanetStatus::Available));
    }
}
