//! Stub auth context: a minimal extractor a real deployment replaces
//! wholesale. §1 puts session/auth entirely out of scope; the only thing
//! the Gateway actually needs from it is a resolved
//! [`galaxy_common::PlayerId`], so that's the whole boundary — the §9
//! replacement for dynamic-dispatch validation middleware chains.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;

use galaxy_common::PlayerId;

#[derive(Debug, Clone, Copy)]
pub struct AuthContext {
    pub player_id: PlayerId,
    pub is_admin: bool,
}

/// Reads `Authorization: Bearer <player-uuid>` and nothing else. A real
/// deployment swaps this extractor for one that verifies a signed session
/// token and looks up `is_admin`; every downstream handler only ever sees
/// the resolved [`AuthContext`], so the swap touches nothing else.
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or((StatusCode::UNAUTHORIZED, "missing Authorization header"))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or((StatusCode::UNAUTHORIZED, "expected a Bearer token"))?;

        let uuid: uuid::Uuid = token
            .parse()
            .map_err(|_| (StatusCode::UNAUTHORIZED, "malformed bearer token"))?;

        Ok(AuthContext {
            player_id: PlayerId(uuid),
            is_admin: parts.headers.get("X-Admin").is_some(),
        })
    }
}
