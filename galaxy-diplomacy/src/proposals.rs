//! Proposal lifecycle: create, accept/reject/counter (§4.D).

use chrono::{Duration, Utc};
use serde_json::Value;

use galaxy_common::{EmpireId, GameError, ProposalId, ProposalStatus, ProposalType};
use galaxy_store::{Agreement, DiplomaticProposal, Store};

use crate::error::DiplomacyError;

#[derive(Debug, Clone)]
pub enum ProposalResponse {
    Accept,
    Reject,
    Counter(Value),
}

/// Creates a proposal after checking the required-trust gate and the
/// no-duplicate-pending-of-same-type rule (§4.D).
pub async fn create_proposal(
    store: &dyn Store,
    initiator: EmpireId,
    target: EmpireId,
    proposal_type: ProposalType,
    terms: Value,
) -> Result<ProposalId, GameError> {
    let (a, b) = galaxy_common::canonical_pair(initiator, target);
    let mut tx = store.begin().await.map_err(GameError::from)?;

    let relation = tx.lock_relation(a, b).await.map_err(GameError::from)?;
    let config = proposal_type.config();
    if relation.trust_level < config.required_trust {
        tx.rollback().await.map_err(GameError::from)?;
        return Err(DiplomacyError::InsufficientTrust {
            trust: relation.trust_level,
            required: config.required_trust,
        }
        .into());
    }

    if tx
        .find_pending_proposal(a, b, proposal_type)
        .await
        .map_err(GameError::from)?
        .is_some()
    {
        tx.rollback().await.map_err(GameError::from)?;
        return Err(DiplomacyError::DuplicatePendingProposal.into());
    }

    let now = Utc::now();
    let proposal = DiplomaticProposal {
        id: ProposalId(0),
        initiator_empire_id: initiator,
        target_empire_id: target,
        proposal_type,
        terms,
        status: ProposalStatus::Pending,
        expires_at: now + Duration::days(config.duration_days),
        created_at: now,
        updated_at: now,
    };
    let id = tx.create_proposal(proposal).await.map_err(GameError::from)?;
    tx.commit().await.map_err(GameError::from)?;
    Ok(id)
}

/// Responds to a pending proposal as the target empire (§4.D). Accepting
/// materializes an [`Agreement`]; rejecting/countering only mutate trust
/// and status. All three paths run in one transaction with the relation
/// row and the proposal row both locked.
pub async fn respond(
    store: &dyn Store,
    proposal_id: ProposalId,
    responder: EmpireId,
    response: ProposalResponse,
) -> Result<(), GameError> {
    let mut tx = store.begin().await.map_err(GameError::from)?;

    let mut proposal = tx.lock_proposal(proposal_id).await.map_err(GameError::from)?;
    if proposal.status != ProposalStatus::Pending {
        tx.rollback().await.map_err(GameError::from)?;
        return Err(DiplomacyError::ProposalNotPending(proposal_id).into());
    }
    if responder != proposal.target_empire_id {
        tx.rollback().await.map_err(GameError::from)?;
        return Err(DiplomacyError::NotAParty(responder, proposal_id).into());
    }

    let (a, b) = galaxy_common::canonical_pair(proposal.initiator_empire_id, proposal.target_empire_id);
    let mut relation = tx.lock_relation(a, b).await.map_err(GameError::from)?;
    let config = proposal.proposal_type.config();
    let now = Utc::now();

    match response {
        ProposalResponse::Accept => {
            proposal.status = ProposalStatus::Accepted;
            relation.trust_level =
                crate::relation::clamp_trust(relation.trust_level + config.trust_change_accept);

            let agreement = Agreement {
                id: galaxy_common::AgreementId(0),
                empire_a: a,
                empire_b: b,
                kind: proposal.proposal_type.into(),
                effective_at: now,
                expires_at: now + Duration::days(config.duration_days),
                terms: proposal.terms.clone(),
                created_at: now,
                updated_at: now,
            };
            tx.create_agreement(agreement).await.map_err(GameError::from)?;
        }
        ProposalResponse::Reject => {
            proposal.status = ProposalStatus::Rejected;
            relation.trust_level =
                crate::relation::clamp_trust(relation.trust_level + config.trust_change_reject);
        }
        ProposalResponse::Counter(terms) => {
            proposal.status = ProposalStatus::Countered;
            proposal.terms = terms;
        }
    }

    proposal.updated_at = now;
    relation.updated_at = now;

    tx.update_proposal(proposal).await.map_err(GameError::from)?;
    tx.update_relation(relation).await.map_err(GameError::from)?;
    tx.commit().await.map_err(GameError::from)?;
    Ok(())
}

/// Turn-pipeline sweep: flips pending proposals past `expires_at` to
/// `Expired` (§4.H step 5).
pub async fn expire_due_proposals(store: &dyn Store, now: chrono::DateTime<Utc>) -> Result<u64, GameError> {
    let mut tx = store.begin().await.map_err(GameError::from)?;
    let due = tx.pending_proposals_expiring(now).await.map_err(GameError::from)?;
    let count = due.len() as u64;
    for mut proposal in due {
        proposal.status = ProposalStatus::Expired;
        proposal.updated_at = now;
        tx.update_proposal(proposal).await.map_err(GameError::from)?;
    }
    tx.commit().await.map_err(GameError::from)?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use galaxy_store::memory::InMemoryStore;

    #[tokio::test]
    async fn accepting_twice_fails_the_second_time_with_conflict() {
        let store = InMemoryStore::new();
        let initiator = EmpireId::new();
        let target = EmpireId::new();

        let id = create_proposal(
            &store,
            initiator,
            target,
            ProposalType::TradeAgreement,
            Value::Null,
        )
        .await
        .unwrap();

        respond(&store, id, target, ProposalResponse::Accept).await.unwrap();
        let err = respond(&store, id, target, ProposalResponse::Accept).await.unwrap_err();
        assert_eq!(err.code(), "conflict");
    }

    #[tokio::test]
    async fn duplicate_pending_proposal_of_same_type_is_rejected() {
        let store = InMemoryStore::new();
        let initiator = EmpireId::new();
        let target = EmpireId::new();

        create_proposal(&store, initiator, target, ProposalType::TradeAgreement, Value::Null)
            .await
            .unwrap();
        let err = create_proposal(&store, initiator, target, ProposalType::TradeAgreement, Value::Null)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "conflict");
    }
}
