//! Relation lookup/creation and the derived can-attack/can-trade/can-share
//! helpers (§4.D "derived from active agreements plus trust category").

use chrono::Utc;
use galaxy_common::constants::{TRUST_LEVEL_MAX, TRUST_LEVEL_MIN};
use galaxy_common::{AgreementKind, EmpireId, GameError, TrustCategory};
use galaxy_store::{Agreement, DiplomaticRelation, Store};

/// Fetches the relation row for a pair, eagerly creating it at
/// `trust_level=0` on first interaction (§4.D). The store's `lock_relation`
/// is itself idempotent-creating, so this is a thin read-only wrapper.
pub async fn get_or_create_relation(
    store: &dyn Store,
    empire_a: EmpireId,
    empire_b: EmpireId,
) -> Result<DiplomaticRelation, GameError> {
    let (a, b) = galaxy_common::canonical_pair(empire_a, empire_b);
    let mut tx = store.begin().await.map_err(GameError::from)?;
    let relation = tx.lock_relation(a, b).await.map_err(GameError::from)?;
    tx.rollback().await.map_err(GameError::from)?;
    Ok(relation)
}

pub fn clamp_trust(trust: i32) -> i32 {
    trust.clamp(TRUST_LEVEL_MIN, TRUST_LEVEL_MAX)
}

/// Attacking is allowed unless an active non-aggression pact or alliance
/// forbids it between the pair.
pub fn can_attack(active_agreements: &[Agreement]) -> bool {
    !active_agreements.iter().any(|a| {
        matches!(
            a.kind,
            AgreementKind::NonAggressionPact | AgreementKind::Alliance
        )
    })
}

/// Trading is allowed for any non-hostile relation, or when an explicit
/// trade agreement is active regardless of trust category.
pub fn can_trade(trust_level: i32, active_agreements: &[Agreement]) -> bool {
    let category = TrustCategory::from_trust(trust_level);
    !matches!(category, TrustCategory::Hostile)
        || active_agreements
            .iter()
            .any(|a| a.kind == AgreementKind::TradeAgreement)
}

/// Research sharing follows the trust category unless a research-sharing
/// agreement overrides it.
pub fn can_share(trust_level: i32, active_agreements: &[Agreement]) -> bool {
    TrustCategory::from_trust(trust_level).research_sharing_allowed()
        || active_agreements
            .iter()
            .any(|a| a.kind == AgreementKind::ResearchSharing)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_aggression_pact_forbids_attack() {
        let now = Utc::now();
        let agreements = vec![Agreement {
            id: galaxy_common::AgreementId(1),
            empire_a: EmpireId::new(),
            empire_b: EmpireId::new(),
            kind: AgreementKind::NonAggressionPact,
            effective_at: now,
            expires_at: now,
            terms: serde_json::Value::Null,
            created_at: now,
            updated_at: now,
        }];
        assert!(!can_attack(&agreements));
        assert!(can_attack(&[]));
    }

    #[test]
    fn hostile_relations_cannot_trade_without_an_explicit_agreement() {
        assert!(!can_trade(-80, &[]));
        assert!(can_trade(0, &[]));
    }
}
