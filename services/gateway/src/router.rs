use crate::handlers::{health, quote};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::timeout::RequestBodyTimeoutLayer;
use tower_http::trace::TraceLayer;

/// `body_timeout` bounds reading the request body only. Once a quote has
/// been decoded the handler runs to completion, so a committed ledger row is
/// always reported to the caller.
pub fn create_router(state: AppState, body_timeout: Duration) -> Router {
    let api_routes = Router::new().route("/quote", post(quote::create_quote));

    Router::new()
        .route("/health", get(health::health))
        .nest("/v1", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyTimeoutLayer::new(body_timeout)),
        )
        .with_state(state)
}
