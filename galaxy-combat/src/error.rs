//! Combat-specific leaf errors (§4.C preconditions), unified into
//! [`GameError`] at the crate boundary the way `galaxy-store`'s
//! `StoreError` is.

use galaxy_common::{FleetId, GameError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CombatError {
    #[error("fleet {0} not found")]
    FleetNotFound(FleetId),

    #[error("fleets {0} and {1} belong to the same empire")]
    SameEmpire(FleetId, FleetId),

    #[error("fleets {0} and {1} are not at the same location")]
    DifferentLocation(FleetId, FleetId),

    #[error("fleet {0} is destroyed")]
    FleetDestroyed(FleetId),

    #[error("fleet {0} is empty")]
    FleetEmpty(FleetId),

    #[error("fleet {0} is already in combat")]
    AlreadyInCombat(FleetId),
}

impl From<CombatError> for GameError {
    fn from(err: CombatError) -> Self {
        match &err {
            CombatError::FleetNotFound(_) => GameError::NotFound(err.to_string()),
            CombatError::AlreadyInCombat(_) => GameError::Conflict(err.to_string()),
            CombatError::SameEmpire(_, _)
            | CombatError::DifferentLocation(_, _)
            | CombatError::FleetDestroyed(_)
            | CombatError::FleetEmpty(_) => GameError::ValidationError(err.to_string()),
        }
    }
}
