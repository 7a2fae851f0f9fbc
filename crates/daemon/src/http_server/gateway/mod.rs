use axum::routing::get;
use axum::Router;
use http::Method;
use tower_http::cors::{Any, CorsLayer};

mod preview;
mod share;

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    let cors_layer = CorsLayer::new()
        .allow_methods(vec![Method::GET])
        .allow_origin(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/s/:token", get(share::info_handler))
        .route("/s/:token/*path", get(share::handler))
        .route("/p/:token", get(preview::handler))
        .with_state(state)
        .layer(cors_layer)
}

async fn index_handler() -> &'static str {
    "stash gateway running"
}
