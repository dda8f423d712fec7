//! Building construction on an owned, active planet (§6 `POST
//! /planets/:id/buildings`). Planet lifecycle belongs to Territory
//! Expansion; the balance engine caps per-type counts (§4.F). This module
//! is the domain operation the
//! gateway invokes between those two, the same shape as
//! [`crate::colonization::colonize_planet`]: lock, check, charge, persist.

use chrono::Utc;

use galaxy_common::constants::MAX_RESOURCE_COST;
use galaxy_common::{BuildingType, EmpireId, GameError, PlanetId, PlanetStatus, Resources};
use galaxy_store::Store;

use crate::error::TerritoryError;

/// Base construction cost for the first instance of a building type;
/// each additional instance costs proportionally more, mirroring the way
/// [`BuildingType::multiplier_factor`] compounds its production bonus.
fn base_building_cost(building_type: BuildingType) -> Resources {
    match building_type {
        BuildingType::MiningFacility => Resources::new(300, 100, 0, 0),
        BuildingType::PowerPlant => Resources::new(100, 300, 0, 0),
        BuildingType::Farm => Resources::new(150, 100, 100, 0),
        BuildingType::ResearchLab => Resources::new(250, 250, 0, 50),
        BuildingType::Shipyard => Resources::new(800, 400, 0, 0),
        BuildingType::Warehouse => Resources::new(400, 100, 0, 0),
        BuildingType::PlanetaryShield => Resources::new(1200, 800, 0, 0),
    }
}

/// Cost of building the `(existing_count + 1)`-th instance of `building_type`:
/// base cost scaled by `1 + 0.5 * existing_count`, capped at
/// [`MAX_RESOURCE_COST`] per component (§4.F resource-cost bound).
pub fn building_cost(building_type: BuildingType, existing_count: u32) -> Resources {
    let scaled = base_building_cost(building_type).scaled(1000 + 500 * existing_count as i64, 1000);
    Resources::new(
        scaled.metal.min(MAX_RESOURCE_COST),
        scaled.energy.min(MAX_RESOURCE_COST),
        scaled.food.min(MAX_RESOURCE_COST),
        scaled.research.min(MAX_RESOURCE_COST),
    )
}

/// `POST /planets/:id/buildings`: queues (applies immediately — this engine
/// has no construction-time model for buildings, only for ships and
/// colonization) one more instance of `building_type` on a planet the
/// empire owns and that is `active`.
pub async fn queue_building(
    store: &dyn Store,
    empire_id: EmpireId,
    planet_id: PlanetId,
    building_type: BuildingType,
) -> Result<galaxy_store::Planet, GameError> {
    let mut tx = store.begin().await.map_err(GameError::from)?;

    let mut planet = tx.lock_planet(planet_id).await.map_err(GameError::from)?;
    if planet.empire_id != Some(empire_id) {
        tx.rollback().await.map_err(GameError::from)?;
        return Err(TerritoryError::PlanetNotOwned(planet_id).into());
    }
    if planet.status != PlanetStatus::Active {
        tx.rollback().await.map_err(GameError::from)?;
        return Err(TerritoryError::PlanetNotActive(planet_id).into());
    }

    let existing_count = planet.buildings.get(&building_type).copied().unwrap_or(0);
    if existing_count + 1 > building_type.max_count() {
        tx.rollback().await.map_err(GameError::from)?;
        return Err(TerritoryError::BuildingCapExceeded {
            cap: building_type.max_count(),
        }
        .into());
    }

    let cost = building_cost(building_type, existing_count);
    let mut empire = tx.lock_empire(empire_id).await.map_err(GameError::from)?;
    if !empire.resources.has_at_least(&cost) {
        tx.rollback().await.map_err(GameError::from)?;
        return Err(GameError::InsufficientResources {
            required: cost,
            available: empire.resources,
        });
    }

    let now = Utc::now();
    empire.resources -= cost;
    empire.updated_at = now;
    tx.update_empire(empire).await.map_err(GameError::from)?;

    planet.buildings.insert(building_type, existing_count + 1);
    planet.updated_at = now;
    tx.update_planet(planet.clone()).await.map_err(GameError::from)?;

    tx.commit().await.map_err(GameError::from)?;
    Ok(planet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use galaxy_common::{PlanetType, PlayerId, SectorCoordinate};
    use galaxy_store::memory::InMemoryStore;
    use galaxy_store::{Empire, Planet};
    use std::collections::BTreeMap;

    async fn seed(store: &InMemoryStore, empire_id: EmpireId, resources: Resources) -> PlanetId {
        let now = Utc::now();
        let mut tx = store.begin().await.unwrap();
        tx.create_empire(Empire {
            id: empire_id,
            player_id: PlayerId::new(),
            name: "Builder".into(),
            resources,
            technology: BTreeMap::new(),
            created_at: now,
            updated_at: now,
        })
        .await
        .unwrap();
        tx.create_planet(Planet {
            id: PlanetId(0),
            sector: SectorCoordinate::new(0, 0),
            name: "Forge World".into(),
            empire_id: Some(empire_id),
            planet_type: PlanetType::Industrial,
            status: PlanetStatus::Active,
            buildings: BTreeMap::new(),
            population: 2000,
            colonization_started: None,
            colonization_completed: None,
            colonizing_fleet_id: None,
            created_at: now,
            updated_at: now,
        })
        .await
        .unwrap();
        let planets = tx.planets_for_empire(empire_id).await.unwrap();
        tx.commit().await.unwrap();
        planets[0].id
    }

    #[tokio::test]
    async fn queueing_charges_escalating_cost_and_increments_count() {
        let store = InMemoryStore::new();
        let empire_id = EmpireId::new();
        let planet_id = seed(&store, empire_id, Resources::new(100_000, 100_000, 100_000, 0)).await;

        let first = queue_building(&store, empire_id, planet_id, BuildingType::MiningFacility)
            .await
            .unwrap();
        assert_eq!(first.buildings.get(&BuildingType::MiningFacility), Some(&1));

        let second = queue_building(&store, empire_id, planet_id, BuildingType::MiningFacility)
            .await
            .unwrap();
        assert_eq!(second.buildings.get(&BuildingType::MiningFacility), Some(&2));

        let empire = store.get_empire(empire_id).await.unwrap();
        let spent = Resources::new(100_000, 100_000, 100_000, 0) - empire.resources;
        let expected = building_cost(BuildingType::MiningFacility, 0) + building_cost(BuildingType::MiningFacility, 1);
        assert_eq!(spent, expected);
    }

    #[tokio::test]
    async fn rejects_past_the_per_type_cap() {
        let store = InMemoryStore::new();
        let empire_id = EmpireId::new();
        let planet_id = seed(&store, empire_id, Resources::new(10_000_000, 10_000_000, 10_000_000, 0)).await;

        for _ in 0..BuildingType::PlanetaryShield.max_count() {
            queue_building(&store, empire_id, planet_id, BuildingType::PlanetaryShield)
                .await
                .unwrap();
        }

        let err = queue_building(&store, empire_id, planet_id, BuildingType::PlanetaryShield)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "validation_error");
    }
}
