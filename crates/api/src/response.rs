//! Response envelope helpers.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use caixa_shared::AppError;
use serde::Serialize;
use serde_json::json;
use tracing::warn;

/// Converts a service error into the failure envelope.
///
/// Validation errors answer 400; every other failure keeps a normal status
/// and reports `sucesso: false` in the body.
pub fn error_response(err: &AppError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    warn!(error = %err, code = err.error_code(), "Request failed");

    (
        status,
        Json(json!({
            "sucesso": false,
            "erro": err.message(),
            "codigo": err.error_code(),
        })),
    )
        .into_response()
}

/// Serializes a successful result, or the failure envelope.
pub fn respond<T, F, B>(result: Result<T, AppError>, body: F) -> Response
where
    F: FnOnce(T) -> B,
    B: Serialize,
{
    match result {
        Ok(value) => Json(body(value)).into_response(),
        Err(err) => error_response(&err),
    }
}
