use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Response};

use common::prelude::ErrorKind;

use crate::http_server::handlers::error_response;
use crate::ServiceState;

pub async fn handler(State(state): State<ServiceState>, Path(token): Path<String>) -> Response {
    match state.previews().get(&token) {
        Some(record) => Html(record.render()).into_response(),
        None => error_response(ErrorKind::NotFound, "preview not found or expired"),
    }
}
