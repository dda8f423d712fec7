//! Unified error taxonomy (§7 Error Handling Design).
//!
//! One top-level `GameError` enum composed from each component's leaf
//! error type. The taxonomy is organized by HTTP-mapped *kind* rather than
//! by originating subsystem, so each component's leaf error implements
//! [`Into<GameError>`] by picking the matching kind instead of getting its
//! own wrapped variant.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::resources::Resources;

/// The nine error kinds §7 requires, each carrying a stable code and an
/// HTTP mapping via [`GameError::http_status`] / [`GameError::code`].
#[derive(Debug, Clone, Serialize, Deserialize, Error)]
pub enum GameError {
    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("auth error: {0}")]
    AuthError(String),

    #[error("access denied: {0}")]
    AccessDenied(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("insufficient resources: required {required:?}, available {available:?}")]
    InsufficientResources {
        required: Resources,
        available: Resources,
    },

    #[error("insufficient action points: required {required}, available {available}")]
    InsufficientActionPoints { required: u32, available: u32 },

    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("internal error ({correlation_id}): {message}")]
    Internal {
        message: String,
        correlation_id: Uuid,
    },
}

impl GameError {
    pub fn internal(message: impl Into<String>) -> Self {
        GameError::Internal {
            message: message.into(),
            correlation_id: Uuid::new_v4(),
        }
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        GameError::NotFound(what.into())
    }

    pub fn conflict(what: impl Into<String>) -> Self {
        GameError::Conflict(what.into())
    }

    pub fn validation(what: impl Into<String>) -> Self {
        GameError::ValidationError(what.into())
    }

    /// Stable machine-readable code, independent of the display message.
    pub fn code(&self) -> &'static str {
        match self {
            GameError::ValidationError(_) => "validation_error",
            GameError::AuthError(_) => "auth_error",
            GameError::AccessDenied(_) => "access_denied",
            GameError::NotFound(_) => "not_found",
            GameError::Conflict(_) => "conflict",
            GameError::InsufficientResources { .. } => "insufficient_resources",
            GameError::InsufficientActionPoints { .. } => "insufficient_action_points",
            GameError::RateLimited(_) => "rate_limited",
            GameError::Internal { .. } => "internal",
        }
    }

    /// HTTP status the thin gateway adapter maps this onto (§7 table).
    pub fn http_status(&self) -> u16 {
        match self {
            GameError::ValidationError(_) => 400,
            GameError::AuthError(_) => 401,
            GameError::AccessDenied(_) => 403,
            GameError::NotFound(_) => 404,
            GameError::Conflict(_) => 409,
            GameError::InsufficientResources { .. } => 409,
            GameError::InsufficientActionPoints { .. } => 429,
            GameError::RateLimited(_) => 429,
            GameError::Internal { .. } => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_matches_error_kind() {
        assert_eq!(GameError::validation("bad input").http_status(), 400);
        assert_eq!(GameError::not_found("planet 9").http_status(), 404);
        assert_eq!(
            GameError::InsufficientActionPoints {
                required: 3,
                available: 2
            }
            .http_status(),
            429
        );
    }

    #[test]
    fn internal_carries_a_correlation_id() {
        let err = GameError::internal("unexpected panic in processTurn");
        match err {
            GameError::Internal { correlation_id, .. } => assert_ne!(correlation_id, Uuid::nil()),
            _ => panic!("expected Internal variant"),
        }
    }
}
