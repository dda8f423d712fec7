//! `Balance.validate(action)` (§4.F), applied to every state-changing
//! request before the ledger reserves points.

use chrono::Utc;

use galaxy_common::constants::{
    EXPLOIT_ACTIONS_PER_MINUTE_THRESHOLD, EXPLOIT_RESOURCE_TRANSFER_PER_TURN_THRESHOLD,
    MAX_FLEETS_PER_EMPIRE, MAX_RESOURCE_COST, MAX_SHIPS_PER_EMPIRE, MAX_SHIPS_PER_FLEET,
    MIN_SECONDS_BETWEEN_ATTACKS, MIN_SECONDS_BETWEEN_COLONIZATIONS, MIN_SECONDS_BETWEEN_DIPLOMACY,
    SCALED_COST_CAP, SCALED_COST_FREE_COLONIES, SCALED_COST_STEP,
};
use galaxy_common::{BuildingType, EmpireId, GameError, PlayerId, Resources};
use galaxy_store::Store;

use crate::action::ActionType;
use crate::violations::{Severity, ValidationResult, Violation};

/// Extra, action-specific quantities the caller is requesting, so the
/// engine can check them against the §4.F quantity caps without the
/// validator needing to know how to parse every action payload itself.
#[derive(Debug, Clone, Default)]
pub struct ActionQuantities {
    pub additional_ships: u32,
    pub building_type: Option<BuildingType>,
    pub building_count_after: Option<u32>,
}

fn cooldown_floor_secs(class: &str) -> i64 {
    match class {
        "attack" => MIN_SECONDS_BETWEEN_ATTACKS,
        "colonization" => MIN_SECONDS_BETWEEN_COLONIZATIONS,
        "diplomacy" => MIN_SECONDS_BETWEEN_DIPLOMACY,
        _ => 0,
    }
}

/// Validates one proposed action for one empire. Resource-bound and
/// quantity-cap violations are hard failures (`valid=false`); exploit
/// heuristics below "high" severity are recorded as warnings only.
pub async fn validate(
    store: &dyn Store,
    player_id: PlayerId,
    empire_id: EmpireId,
    action_type: ActionType,
    proposed_cost: Resources,
    quantities: ActionQuantities,
) -> Result<ValidationResult, GameError> {
    let mut violations = Vec::new();
    let mut warnings = Vec::new();

    for (kind, amount) in proposed_cost.iter() {
        if amount < 0 || amount > MAX_RESOURCE_COST {
            violations.push(Violation::new(
                Severity::High,
                format!("{kind:?} cost {amount} outside [0, {MAX_RESOURCE_COST}]"),
            ));
        }
    }

    let empire = store.get_empire(empire_id).await.map_err(GameError::from)?;
    if !empire.resources.has_at_least(&proposed_cost) {
        violations.push(Violation::new(
            Severity::High,
            "empire cannot afford the proposed cost".to_string(),
        ));
    }

    let mut tx = store.begin().await.map_err(GameError::from)?;
    let colonies = tx
        .count_colonies_for_empire(empire_id)
        .await
        .map_err(GameError::from)?;
    let existing_fleets = tx
        .count_fleets_for_empire(empire_id)
        .await
        .map_err(GameError::from)?;
    let existing_ships = tx
        .count_ships_for_empire(empire_id)
        .await
        .map_err(GameError::from)?;

    if matches!(action_type, ActionType::ComposeFleet) && existing_fleets + 1 > MAX_FLEETS_PER_EMPIRE
    {
        violations.push(Violation::new(
            Severity::High,
            format!("fleet count would exceed {MAX_FLEETS_PER_EMPIRE}"),
        ));
    }
    if quantities.additional_ships > MAX_SHIPS_PER_FLEET {
        violations.push(Violation::new(
            Severity::High,
            format!("single fleet exceeds {MAX_SHIPS_PER_FLEET} ships"),
        ));
    }
    if existing_ships + quantities.additional_ships as u64 > MAX_SHIPS_PER_EMPIRE {
        violations.push(Violation::new(
            Severity::High,
            format!("empire ship count would exceed {MAX_SHIPS_PER_EMPIRE}"),
        ));
    }
    if let (Some(building_type), Some(count_after)) =
        (quantities.building_type, quantities.building_count_after)
    {
        if count_after > building_type.max_count() {
            violations.push(Violation::new(
                Severity::High,
                format!(
                    "{building_type:?} count {count_after} exceeds cap {}",
                    building_type.max_count()
                ),
            ));
        }
    }

    if let Some(class) = action_type.cooldown_class() {
        let floor = cooldown_floor_secs(class);
        if let Some(last) = tx
            .last_action_of_class(player_id, class)
            .await
            .map_err(GameError::from)?
        {
            let elapsed = (Utc::now() - last.occurred_at).num_seconds();
            if elapsed < floor {
                violations.push(Violation::new(
                    Severity::Medium,
                    format!("{class} actions require {floor}s between attempts, {elapsed}s elapsed"),
                ));
            }
            // Approximated actions-per-minute heuristic: the store has no
            // sliding-window counter, so a very short gap since the last
            // action of the same class stands in for a burst.
            if elapsed < 60 / EXPLOIT_ACTIONS_PER_MINUTE_THRESHOLD as i64 {
                warnings.push(format!("{class} actions arriving in a tight burst"));
            }
        }
    }

    if proposed_cost.total() > EXPLOIT_RESOURCE_TRANSFER_PER_TURN_THRESHOLD {
        warnings.push(format!(
            "resource transfer of {} exceeds the per-turn heuristic threshold",
            proposed_cost.total()
        ));
    }

    tx.rollback().await.map_err(GameError::from)?;

    let scale_steps = colonies.saturating_sub(SCALED_COST_FREE_COLONIES) as f64;
    let multiplier = (1.0 + scale_steps * SCALED_COST_STEP).min(SCALED_COST_CAP);
    let adjusted_costs = proposed_cost.scaled((multiplier * 1000.0) as i64, 1000);

    Ok(ValidationResult {
        valid: violations.is_empty(),
        violations,
        warnings,
        adjusted_costs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use galaxy_common::PlayerId;
    use galaxy_store::memory::InMemoryStore;
    use std::collections::BTreeMap;

    async fn seed_empire(store: &InMemoryStore, empire_id: EmpireId, resources: Resources) {
        let now = Utc::now();
        let mut tx = store.begin().await.unwrap();
        tx.create_empire(galaxy_store::Empire {
            id: empire_id,
            player_id: PlayerId::new(),
            name: "Validated Dominion".into(),
            resources,
            technology: BTreeMap::new(),
            created_at: now,
            updated_at: now,
        })
        .await
        .unwrap();
        tx.commit().await.unwrap();
    }

    #[tokio::test]
    async fn rejects_a_cost_the_empire_cannot_afford() {
        let store = InMemoryStore::new();
        let empire_id = EmpireId::new();
        seed_empire(&store, empire_id, Resources::new(10, 10, 10, 0)).await;

        let result = validate(
            &store,
            PlayerId::new(),
            empire_id,
            ActionType::QueueBuilding,
            Resources::new(1000, 0, 0, 0),
            ActionQuantities::default(),
        )
        .await
        .unwrap();

        assert!(!result.valid);
        assert_eq!(result.violations.len(), 1);
    }

    #[tokio::test]
    async fn an_affordable_well_formed_action_passes_clean() {
        let store = InMemoryStore::new();
        let empire_id = EmpireId::new();
        seed_empire(&store, empire_id, Resources::new(10_000, 10_000, 10_000, 0)).await;

        let result = validate(
            &store,
            PlayerId::new(),
            empire_id,
            ActionType::RenameEmpire,
            Resources::zero(),
            ActionQuantities::default(),
        )
        .await
        .unwrap();

        assert!(result.valid);
        assert!(result.violations.is_empty());
    }

    #[tokio::test]
    async fn rejects_a_cost_component_above_the_resource_bound() {
        let store = InMemoryStore::new();
        let empire_id = EmpireId::new();
        seed_empire(&store, empire_id, Resources::new(10_000_000, 0, 0, 0)).await;

        let result = validate(
            &store,
            PlayerId::new(),
            empire_id,
            ActionType::QueueBuilding,
            Resources::new(2_000_000, 0, 0, 0),
            ActionQuantities::default(),
        )
        .await
        .unwrap();

        assert!(!result.valid);
    }
}
