use galaxy_common::GameError;
use thiserror::Error;

/// Store-level failure, always convertible into the unified [`GameError`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("migrations pending; refusing to start")]
    PendingMigrations,

    #[error("disallowed column or operator in dynamic query: {0}")]
    DisallowedIdentifier(String),

    #[cfg(feature = "postgres")]
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

impl From<StoreError> for GameError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => GameError::NotFound(what),
            StoreError::Conflict(what) => GameError::Conflict(what),
            StoreError::PendingMigrations => GameError::internal("pending migrations"),
            StoreError::DisallowedIdentifier(what) => {
                GameError::ValidationError(format!("disallowed identifier: {what}"))
            }
            #[cfg(feature = "postgres")]
            StoreError::Sqlx(e) => GameError::internal(e.to_string()),
        }
    }
}
