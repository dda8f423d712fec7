//! The end-of-turn pipeline (§4.H): a fixed, deterministic order over every
//! empire and every cross-empire settlement/expiry sweep. Any step may fail
//! per-empire; failures are logged and do not halt the rest of the turn
//! (§7 "Per-empire failures inside the turn pipeline are logged... and do
//! not abort the pipeline").

use chrono::{DateTime, Utc};
use tracing::warn;

use galaxy_common::{EmpireId, GameError};
use galaxy_store::Store;

/// Tally of what one pipeline run accomplished, returned to the caller of
/// [`crate::advance`] for logging/admin-RPC reporting.
#[derive(Debug, Clone, Default)]
pub struct PipelineReport {
    pub empires_processed: u64,
    pub empire_failures: Vec<(EmpireId, String)>,
    pub trade_routes_settled: u64,
    pub colonies_completed: u64,
    pub proposals_expired: u64,
    pub agreements_expired: u64,
}

/// Runs the five end-of-turn steps once, against `now`. Step 2 ("combat
/// resolution") has nothing queued to process here: combat is synchronous
/// on request, so the step exists in the ordering for documentation
/// parity but performs no work of its own.
pub async fn run_end_of_turn_pipeline(store: &dyn Store, now: DateTime<Utc>) -> PipelineReport {
    let mut report = PipelineReport::default();

    let empire_ids = {
        let mut tx = match store.begin().await {
            Ok(tx) => tx,
            Err(e) => {
                warn!(error = %e, "turn pipeline: failed to open transaction listing empires");
                return report;
            }
        };
        let ids = tx.all_empire_ids().await;
        let _ = tx.rollback().await;
        match ids {
            Ok(ids) => ids,
            Err(e) => {
                warn!(error = %e, "turn pipeline: failed to list empires");
                return report;
            }
        }
    };

    // Step 1: Resource Calculator over every empire.
    for empire_id in empire_ids {
        match galaxy_economy::process_turn(store, empire_id).await {
            Ok(_) => report.empires_processed += 1,
            Err(err) => {
                warn!(empire_id = %empire_id, error = %err, "processTurn failed for empire");
                report.empire_failures.push((empire_id, err.to_string()));
            }
        }
    }

    // Step 2: combat is resolved synchronously on request elsewhere; no
    // queued engagements exist for the pipeline to process.

    // Step 3: Diplomacy Processor trade-route settlement.
    match galaxy_diplomacy::process_trade_routes(store, now).await {
        Ok(n) => report.trade_routes_settled = n,
        Err(err) => warn!(error = %err, "trade route settlement sweep failed"),
    }

    // Step 4: Territory Expansion colonization completion sweep.
    match galaxy_territory::process_colonization_completion(store, now).await {
        Ok(n) => report.colonies_completed = n,
        Err(err) => warn!(error = %err, "colonization completion sweep failed"),
    }

    // Step 5: expire proposals and agreements past their expires_at.
    match galaxy_diplomacy::expire_due_proposals(store, now).await {
        Ok(n) => report.proposals_expired = n,
        Err(err) => warn!(error = %err, "proposal expiry sweep failed"),
    }
    match galaxy_diplomacy::expire_agreements(store, now).await {
        Ok(n) => report.agreements_expired = n,
        Err(err) => warn!(error = %err, "agreement expiry sweep failed"),
    }

    report
}

/// Narrow alias kept for call sites that only care about `Result`-shaped
/// composition (e.g. tests asserting the pipeline itself never panics).
pub async fn run(store: &dyn Store, now: DateTime<Utc>) -> Result<PipelineReport, GameError> {
    Ok(run_end_of_turn_pipeline(store, now).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use galaxy_common::{PlanetStatus, PlanetType, PlayerId, Resources, SectorCoordinate};
    use galaxy_store::memory::InMemoryStore;
    use galaxy_store::{Empire, Planet};
    use std::collections::BTreeMap;

    #[tokio::test]
    async fn pipeline_processes_every_empire_and_reports_failures_without_aborting() {
        let store = InMemoryStore::new();
        let now = Utc::now();

        let good_empire = EmpireId::new();
        let mut tx = store.begin().await.unwrap();
        tx.create_empire(Empire {
            id: good_empire,
            player_id: PlayerId::new(),
            name: "Vega Concord".into(),
            resources: Resources::new(500, 500, 500, 0),
            technology: BTreeMap::new(),
            created_at: now,
            updated_at: now,
        })
        .await
        .unwrap();
        tx.create_planet(Planet {
            id: galaxy_common::PlanetId(0),
            sector: SectorCoordinate::new(1, 1),
            name: "Vega Prime".into(),
            empire_id: Some(good_empire),
            planet_type: PlanetType::Mining,
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
        tx.commit().await.unwrap();

        let report = run_end_of_turn_pipeline(&store, now).await;
        assert_eq!(report.empires_processed, 1);
        assert!(report.empire_failures.is_empty());
    }
}
