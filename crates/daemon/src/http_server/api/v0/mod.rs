use axum::Router;

pub mod files;
pub mod preview;
pub mod share;

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .nest("/files", files::router(state.clone()))
        .nest("/share", share::router(state.clone()))
        .nest("/preview", preview::router(state.clone()))
        .with_state(state)
}
