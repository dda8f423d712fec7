//! # Galaxy Turn Engine — Combat
//!
//! Component C, the Combat Resolver: a pure-ish function over two fleet
//! snapshots ([`resolver::resolve_combat`]) plus [`resolve`], the one
//! transactional fleet update that wraps it — lock both fleets,
//! run the pure resolver, persist both outcomes in one transaction.

pub mod effectiveness;
pub mod error;
pub mod resolver;

use chrono::Utc;
use rand::Rng;

use galaxy_common::{FleetId, FleetStatus, GameError};
use galaxy_store::{Fleet, Store};

pub use error::CombatError;
pub use resolver::{CombatOptions, CombatOutcome, FleetSnapshot, ResultType, Side};

/// Runs one engagement inside a single transaction (§4.C, §5): checks
/// preconditions, locks both fleet rows, resolves rounds with the supplied
/// RNG, then writes both fleets' new composition/status/experience/morale.
pub async fn resolve(
    store: &dyn Store,
    attacker_fleet_id: FleetId,
    defender_fleet_id: FleetId,
    options: CombatOptions,
    rng: &mut impl Rng,
) -> Result<CombatOutcome, GameError> {
    let mut tx = store.begin().await.map_err(GameError::from)?;

    let attacker = tx.lock_fleet(attacker_fleet_id).await.map_err(GameError::from)?;
    let defender = tx.lock_fleet(defender_fleet_id).await.map_err(GameError::from)?;

    check_preconditions(&attacker, &defender)?;

    let outcome = resolver::resolve_combat(
        &FleetSnapshot {
            composition: attacker.composition.clone(),
            experience: attacker.experience,
            morale: attacker.morale,
        },
        &FleetSnapshot {
            composition: defender.composition.clone(),
            experience: defender.experience,
            morale: defender.morale,
        },
        options,
        rng,
    );

    let now = Utc::now();

    let mut updated_attacker = attacker;
    updated_attacker.composition = outcome.final_attacker.clone();
    updated_attacker.status = if updated_attacker.composition.values().all(|&c| c == 0) {
        FleetStatus::Destroyed
    } else {
        FleetStatus::Active
    };
    updated_attacker.experience += outcome.attacker_experience_delta;
    updated_attacker.morale = (updated_attacker.morale + outcome.attacker_morale_delta).clamp(0, 100);
    updated_attacker.last_combat = Some(now);
    updated_attacker.updated_at = now;

    let mut updated_defender = defender;
    updated_defender.composition = outcome.final_defender.clone();
    updated_defender.status = if updated_defender.composition.values().all(|&c| c == 0) {
        FleetStatus::Destroyed
    } else {
        FleetStatus::Active
    };
    updated_defender.experience += outcome.defender_experience_delta;
    updated_defender.morale = (updated_defender.morale + outcome.defender_morale_delta).clamp(0, 100);
    updated_defender.last_combat = Some(now);
    updated_defender.updated_at = now;

    tx.update_fleet(updated_attacker).await.map_err(GameError::from)?;
    tx.update_fleet(updated_defender).await.map_err(GameError::from)?;
    tx.commit().await.map_err(GameError::from)?;

    Ok(outcome)
}

/// §4.C preconditions, checked fail-fast before any round is resolved.
fn check_preconditions(attacker: &Fleet, defender: &Fleet) -> Result<(), GameError> {
    if attacker.empire_id == defender.empire_id {
        return Err(CombatError::SameEmpire(attacker.id, defender.id).into());
    }
    if attacker.sector != defender.sector {
        return Err(CombatError::DifferentLocation(attacker.id, defender.id).into());
    }
    if attacker.status == FleetStatus::Destroyed {
        return Err(CombatError::FleetDestroyed(attacker.id).into());
    }
    if defender.status == FleetStatus::Destroyed {
        return Err(CombatError::FleetDestroyed(defender.id).into());
    }
    if attacker.status == FleetStatus::InCombat {
        return Err(CombatError::AlreadyInCombat(attacker.id).into());
    }
    if defender.status == FleetStatus::InCombat {
        return Err(CombatError::AlreadyInCombat(defender.id).into());
    }
    if attacker.is_empty() {
        return Err(CombatError::FleetEmpty(attacker.id).into());
    }
    if defender.is_empty() {
        return Err(CombatError::FleetEmpty(defender.id).into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use galaxy_common::{EmpireId, PlayerId, SectorCoordinate, ShipType};
    use galaxy_store::memory::InMemoryStore;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::BTreeMap;

    fn fleet(empire_id: EmpireId, sector: SectorCoordinate, ship: ShipType, count: u32) -> Fleet {
        let now = Utc::now();
        let mut composition = BTreeMap::new();
        composition.insert(ship, count);
        Fleet {
            id: FleetId(0),
            empire_id,
            name: "Strike Group".into(),
            sector,
            composition,
            status: FleetStatus::Active,
            experience: 0,
            morale: 50,
            last_combat: None,
            action_until: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn decisive_engagement_destroys_the_loser_and_persists_both_fleets() {
        let store = InMemoryStore::new();
        let sector = SectorCoordinate::new(3, 3);
        let ea = EmpireId::new();
        let ed = EmpireId::new();

        let (attacker_id, defender_id) = {
            let mut tx = store.begin().await.unwrap();
            tx.create_empire(galaxy_store::Empire {
                id: ea,
                player_id: PlayerId::new(),
                name: "Ea".into(),
                resources: Default::default(),
                technology: Default::default(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
            .await
            .unwrap();
            tx.create_empire(galaxy_store::Empire {
                id: ed,
                player_id: PlayerId::new(),
                name: "Ed".into(),
                resources: Default::default(),
                technology: Default::default(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
            .await
            .unwrap();
            tx.create_fleet(fleet(ea, sector, ShipType::Destroyer, 5)).await.unwrap();
            tx.create_fleet(fleet(ed, sector, ShipType::Corvette, 10)).await.unwrap();
            let attacker_id = tx.fleets_for_empire(ea).await.unwrap()[0].id;
            let defender_id = tx.fleets_for_empire(ed).await.unwrap()[0].id;
            tx.commit().await.unwrap();
            (attacker_id, defender_id)
        };

        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let outcome = resolve(&store, attacker_id, defender_id, CombatOptions::default(), &mut rng)
            .await
            .unwrap();

        assert_eq!(outcome.winner, Some(Side::Attacker));
        assert_eq!(outcome.result_type, ResultType::DecisiveVictory);
        assert_eq!(outcome.attacker_experience_delta, 2);
        assert_eq!(outcome.attacker_morale_delta, 10); // starting morale 50 -> 60

        let mut tx = store.begin().await.unwrap();
        let persisted_defender = tx.lock_fleet(defender_id).await.unwrap();
        assert_eq!(persisted_defender.status, FleetStatus::Destroyed);
    }

    #[tokio::test]
    async fn rejects_combat_between_fleets_in_different_sectors() {
        let store = InMemoryStore::new();
        let ea = EmpireId::new();
        let ed = EmpireId::new();

        let (attacker_id, defender_id) = {
            let mut tx = store.begin().await.unwrap();
            tx.create_fleet(fleet(ea, SectorCoordinate::new(1, 1), ShipType::Destroyer, 5))
                .await
                .unwrap();
            tx.create_fleet(fleet(ed, SectorCoordinate::new(2, 2), ShipType::Corvette, 5))
                .await
                .unwrap();
            let attacker_id = tx.fleets_for_empire(ea).await.unwrap()[0].id;
            let defender_id = tx.fleets_for_empire(ed).await.unwrap()[0].id;
            tx.commit().await.unwrap();
            (attacker_id, defender_id)
        };

        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let err = resolve(&store, attacker_id, defender_id, CombatOptions::default(), &mut rng)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "validation_error");
    }
}
