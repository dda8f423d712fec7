//! Diplomacy-specific leaf errors (§4.D), unified into [`GameError`].

use galaxy_common::{EmpireId, GameError, ProposalId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiplomacyError {
    #[error("relation between {0} and {1} not found")]
    RelationNotFound(EmpireId, EmpireId),

    #[error("proposal {0} not found")]
    ProposalNotFound(ProposalId),

    #[error("trust level {trust} below required {required} for this proposal type")]
    InsufficientTrust { trust: i32, required: i32 },

    #[error("a pending proposal of this type already exists between these empires")]
    DuplicatePendingProposal,

    #[error("proposal {0} is not pending")]
    ProposalNotPending(ProposalId),

    #[error("empire {0} is neither initiator nor target of proposal {1}")]
    NotAParty(EmpireId, ProposalId),

    #[error("no active trade agreement between {0} and {1}")]
    NoActiveTradeAgreement(EmpireId, EmpireId),
}

impl From<DiplomacyError> for GameError {
    fn from(err: DiplomacyError) -> Self {
        match &err {
            DiplomacyError::RelationNotFound(_, _) | DiplomacyError::ProposalNotFound(_) => {
                GameError::NotFound(err.to_string())
            }
            DiplomacyError::ProposalNotPending(_) | DiplomacyError::DuplicatePendingProposal => {
                GameError::Conflict(err.to_string())
            }
            DiplomacyError::NotAParty(_, _) => GameError::AccessDenied(err.to_string()),
            DiplomacyError::InsufficientTrust { .. } | DiplomacyError::NoActiveTradeAgreement(_, _) => {
                GameError::ValidationError(err.to_string())
            }
        }
    }
}
