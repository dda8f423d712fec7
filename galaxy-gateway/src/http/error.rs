//! Maps [`GameError`] onto an HTTP response (§7): a JSON body carrying the
//! stable `code`, a human message, and — for `Internal` only — a
//! correlation id. The underlying cause is never serialized outside
//! development (§7 "stack only in development builds").

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use galaxy_common::GameError;

pub struct ApiError(pub GameError, pub bool);

impl ApiError {
    pub fn new(err: GameError, development: bool) -> Self {
        Self(err, development)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let ApiError(err, development) = self;
        let status = StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let body = match &err {
            GameError::Internal { message, correlation_id } => json!({
                "code": err.code(),
                "error": "internal error",
                "correlation_id": correlation_id,
                "detail": if development { Some(message.clone()) } else { None },
            }),
            GameError::InsufficientResources { required, available } => json!({
                "code": err.code(),
                "error": err.to_string(),
                "required": required,
                "available": available,
            }),
            GameError::InsufficientActionPoints { required, available } => json!({
                "code": err.code(),
                "error": err.to_string(),
                "required": required,
                "available": available,
            }),
            _ => json!({
                "code": err.code(),
                "error": err.to_string(),
            }),
        };

        (status, Json(body)).into_response()
    }
}
