use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use common::prelude::ErrorKind;

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation | ErrorKind::PathEscape => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::AlreadyExists => StatusCode::CONFLICT,
        ErrorKind::Deny => StatusCode::FORBIDDEN,
        ErrorKind::Expired => StatusCode::GONE,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// JSON `{kind, msg}` body with the status for `kind`.
///
/// Internal errors are logged here and replaced by a generic message.
pub fn error_response(kind: ErrorKind, msg: impl ToString) -> Response {
    let msg = match kind {
        ErrorKind::Internal => {
            tracing::error!(error = %msg.to_string(), "internal error");
            "internal error".to_string()
        }
        _ => msg.to_string(),
    };
    let body = serde_json::json!({ "kind": kind, "msg": msg });
    (status_for(kind), Json(body)).into_response()
}
