//! Territory-specific leaf errors (§4.E), unified into [`GameError`].

use galaxy_common::{FleetId, GameError, PlanetId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TerritoryError {
    #[error("planet {0} not found")]
    PlanetNotFound(PlanetId),

    #[error("planet {0} is not available for colonization")]
    PlanetNotAvailable(PlanetId),

    #[error("planet {0} is not owned by this empire")]
    PlanetNotOwned(PlanetId),

    #[error("fleet {0} does not belong to the colonizing empire")]
    FleetNotOwned(FleetId),

    #[error("fleet {0} is not active")]
    FleetNotActive(FleetId),

    #[error("fleet {0} is not at the planet's sector")]
    FleetWrongSector(FleetId),

    #[error("fleet {0} does not meet the minimum colonization composition")]
    InsufficientColonizationShips(FleetId),

    #[error("empire already holds the maximum of {0} colonies")]
    MaxColoniesReached(u32),

    #[error("planet {0} is not active")]
    PlanetNotActive(PlanetId),

    #[error("building cap of {cap} exceeded for this type")]
    BuildingCapExceeded { cap: u32 },
}

impl From<TerritoryError> for GameError {
    fn from(err: TerritoryError) -> Self {
        match &err {
            TerritoryError::PlanetNotFound(_) => GameError::NotFound(err.to_string()),
            TerritoryError::PlanetNotAvailable(_) => GameError::Conflict(err.to_string()),
            TerritoryError::PlanetNotOwned(_) => GameError::AccessDenied(err.to_string()),
            TerritoryError::FleetNotOwned(_) => GameError::AccessDenied(err.to_string()),
            TerritoryError::FleetNotActive(_)
            | TerritoryError::FleetWrongSector(_)
            | TerritoryError::InsufficientColonizationShips(_)
            | TerritoryError::MaxColoniesReached(_)
            | TerritoryError::PlanetNotActive(_)
            | TerritoryError::BuildingCapExceeded { .. } => GameError::ValidationError(err.to_string()),
        }
    }
}
