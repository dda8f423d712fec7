//! Ledger-specific leaf errors (§4.G), unified into [`GameError`].

use galaxy_common::GameError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("reservation {0} not found")]
    ReservationNotFound(Uuid),

    #[error("reservation {0} expired before commit")]
    ReservationExpired(Uuid),
}

impl From<LedgerError> for GameError {
    fn from(err: LedgerError) -> Self {
        GameError::Conflict(err.to_string())
    }
}
