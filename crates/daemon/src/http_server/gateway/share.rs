use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;

use common::prelude::{AccessDecision, ErrorKind, Permission};

use crate::http_server::api::v0::share::info::ShareInfo;
use crate::http_server::handlers::{error_response, file_response, Disposition};
use crate::ServiceState;

/// Serve one file through a share token.
///
/// Every refusal maps onto the usual `{kind, msg}` body; the gateway never
/// says more about the owner's namespace than the decision itself.
pub async fn handler(
    State(state): State<ServiceState>,
    Path((token, path)): Path<(String, String)>,
) -> Response {
    let decision = match state.gate().authorize(&token, &path).await {
        Ok(decision) => decision,
        Err(e) => {
            tracing::warn!(error = %e, "rejected share path");
            return error_response(e.kind(), e);
        }
    };

    let grant = match decision {
        AccessDecision::Allow(grant) => grant,
        AccessDecision::Deny => {
            return error_response(ErrorKind::Deny, "path is not part of this share")
        }
        AccessDecision::Expired => return error_response(ErrorKind::Expired, "share has expired"),
        AccessDecision::NotFound => return error_response(ErrorKind::NotFound, "not found"),
    };

    let download = match state.tree().download(&grant.owner, &grant.path).await {
        Ok(download) => download,
        Err(e) => return error_response(e.kind(), e),
    };

    let disposition = match grant.permission {
        Permission::Read => Disposition::Inline,
        Permission::Download => Disposition::Attachment,
    };
    tracing::debug!(owner = %grant.owner, path = %grant.path, ?disposition, "serving shared file");

    match file_response(download, disposition) {
        Ok(response) => response,
        Err(e) => error_response(ErrorKind::Internal, e),
    }
}

pub async fn info_handler(
    State(state): State<ServiceState>,
    Path(token): Path<String>,
) -> Response {
    match state.shares().lookup(&token).await {
        Some(record) => (http::StatusCode::OK, Json(ShareInfo::from(record))).into_response(),
        None => error_response(ErrorKind::NotFound, "share not found"),
    }
}
