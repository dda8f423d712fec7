//! Trade route establishment and per-turn settlement (§4.D).

use chrono::{DateTime, Utc};
use tracing::warn;

use galaxy_common::{AgreementKind, EmpireId, GameError, Resources};
use galaxy_store::{Store, TradeRoute};

use crate::error::DiplomacyError;

/// Establishes a trade route backed by an active `trade_agreement`,
/// deducting `cost` (metal, typically) from both empires up front (§4.D).
pub async fn establish_trade_route(
    store: &dyn Store,
    empire_a: EmpireId,
    empire_b: EmpireId,
    empire_a_gives: Resources,
    empire_b_gives: Resources,
    maintenance_cost: Resources,
    cost: Resources,
) -> Result<galaxy_common::TradeRouteId, GameError> {
    let (a, b) = galaxy_common::canonical_pair(empire_a, empire_b);
    let now = Utc::now();

    let mut tx = store.begin().await.map_err(GameError::from)?;

    let active = tx
        .active_agreements_between(a, b, now)
        .await
        .map_err(GameError::from)?;
    if !active.iter().any(|ag| ag.kind == AgreementKind::TradeAgreement) {
        tx.rollback().await.map_err(GameError::from)?;
        return Err(DiplomacyError::NoActiveTradeAgreement(a, b).into());
    }

    let mut empire_a_row = tx.lock_empire(a).await.map_err(GameError::from)?;
    let mut empire_b_row = tx.lock_empire(b).await.map_err(GameError::from)?;

    if !empire_a_row.resources.has_at_least(&cost) || !empire_b_row.resources.has_at_least(&cost) {
        tx.rollback().await.map_err(GameError::from)?;
        return Err(GameError::InsufficientResources {
            required: cost,
            available: if empire_a_row.resources.has_at_least(&cost) {
                empire_b_row.resources
            } else {
                empire_a_row.resources
            },
        });
    }

    empire_a_row.resources -= cost;
    empire_b_row.resources -= cost;
    empire_a_row.updated_at = now;
    empire_b_row.updated_at = now;

    let agreement = galaxy_store::Agreement {
        id: galaxy_common::AgreementId(0),
        empire_a: a,
        empire_b: b,
        kind: AgreementKind::TradeRoute,
        effective_at: now,
        expires_at: now + chrono::Duration::days(365),
        terms: serde_json::Value::Null,
        created_at: now,
        updated_at: now,
    };
    let agreement_id = tx.create_agreement(agreement).await.map_err(GameError::from)?;

    let route = TradeRoute {
        id: galaxy_common::TradeRouteId(0),
        agreement_id,
        empire_a: a,
        empire_b: b,
        empire_a_gives,
        empire_b_gives,
        maintenance_cost,
        created_at: now,
        updated_at: now,
    };
    let route_id = tx.create_trade_route(route).await.map_err(GameError::from)?;

    tx.update_empire(empire_a_row).await.map_err(GameError::from)?;
    tx.update_empire(empire_b_row).await.map_err(GameError::from)?;
    tx.commit().await.map_err(GameError::from)?;

    Ok(route_id)
}

/// Per-turn settlement (§4.H step 3, §4.D): for each still-backed active
/// trade route, apply the exchange plus maintenance, in one transaction
/// per route so a breach on one route never touches another's resources
/// or aborts the rest of the turn.
pub async fn process_trade_routes(store: &dyn Store, now: DateTime<Utc>) -> Result<u64, GameError> {
    let routes = {
        let mut tx = store.begin().await.map_err(GameError::from)?;
        let routes = tx.active_trade_routes().await.map_err(GameError::from)?;
        tx.rollback().await.map_err(GameError::from)?;
        routes
    };

    let mut settled = 0u64;

    for route in routes {
        let mut tx = store.begin().await.map_err(GameError::from)?;

        let still_backed = tx
            .active_agreements_between(route.empire_a, route.empire_b, now)
            .await
            .map_err(GameError::from)?
            .iter()
            .any(|ag| ag.id == route.agreement_id);
        if !still_backed {
            tx.rollback().await.map_err(GameError::from)?;
            continue;
        }

        let mut empire_a_row = tx.lock_empire(route.empire_a).await.map_err(GameError::from)?;
        let mut empire_b_row = tx.lock_empire(route.empire_b).await.map_err(GameError::from)?;

        let a_outbound = route.empire_a_gives + route.maintenance_cost;
        let b_outbound = route.empire_b_gives + route.maintenance_cost;

        if !empire_a_row.resources.has_at_least(&a_outbound) || !empire_b_row.resources.has_at_least(&b_outbound) {
            warn!(
                route_id = route.id.0,
                empire_a = %route.empire_a,
                empire_b = %route.empire_b,
                "TradeBreach: skipping trade route settlement, outbound resources unaffordable"
            );
            tx.rollback().await.map_err(GameError::from)?;
            continue;
        }

        empire_a_row.resources = empire_a_row.resources - a_outbound + route.empire_b_gives;
        empire_b_row.resources = empire_b_row.resources - b_outbound + route.empire_a_gives;
        empire_a_row.updated_at = now;
        empire_b_row.updated_at = now;

        tx.update_empire(empire_a_row).await.map_err(GameError::from)?;
        tx.update_empire(empire_b_row).await.map_err(GameError::from)?;
        tx.commit().await.map_err(GameError::from)?;
        settled += 1;
    }

    Ok(settled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use galaxy_common::PlayerId;
    use galaxy_store::memory::InMemoryStore;
    use galaxy_store::Empire;
    use std::collections::BTreeMap;

    fn empire(id: EmpireId, resources: Resources) -> Empire {
        let now = Utc::now();
        Empire {
            id,
            player_id: PlayerId::new(),
            name: "Empire".into(),
            resources,
            technology: BTreeMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn settlement_skips_route_when_outbound_unaffordable_without_touching_partner() {
        let store = InMemoryStore::new();
        let ea = EmpireId::new();
        let ed = EmpireId::new();
        let now = Utc::now();

        let mut tx = store.begin().await.unwrap();
        tx.create_empire(empire(ea, Resources::new(50, 0, 0, 0))).await.unwrap();
        tx.create_empire(empire(ed, Resources::new(1000, 1000, 1000, 1000)))
            .await
            .unwrap();
        let agreement = galaxy_store::Agreement {
            id: galaxy_common::AgreementId(0),
            empire_a: ea.min(ed),
            empire_b: ea.max(ed),
            kind: AgreementKind::TradeRoute,
            effective_at: now,
            expires_at: now + chrono::Duration::days(30),
            terms: serde_json::Value::Null,
            created_at: now,
            updated_at: now,
        };
        let agreement_id = tx.create_agreement(agreement).await.unwrap();
        let (a, b) = galaxy_common::canonical_pair(ea, ed);
        tx.create_trade_route(TradeRoute {
            id: galaxy_common::TradeRouteId(0),
            agreement_id,
            empire_a: a,
            empire_b: b,
            empire_a_gives: Resources::new(100, 0, 0, 0),
            empire_b_gives: Resources::new(0, 50, 0, 0),
            maintenance_cost: Resources::new(10, 0, 0, 0),
            created_at: now,
            updated_at: now,
        })
        .await
        .unwrap();
        tx.commit().await.unwrap();

        let settled = process_trade_routes(&store, now).await.unwrap();
        assert_eq!(settled, 0);

        let ed_after = store.get_empire(ed).await.unwrap();
        assert_eq!(ed_after.resources, Resources::new(1000, 1000, 1000, 1000));
    }
}
