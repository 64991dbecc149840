//! Route definitions for the CareDesk gateway.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(page_routes())
        .merge(auth_routes())
        .merge(health_routes())
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::guard::route_guard,
        ))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Server-rendered pages.
fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::pages::home))
        .route("/sign-in", get(handlers::pages::sign_in))
        .route("/admin", get(handlers::pages::admin))
        .route("/clinic", get(handlers::pages::clinic))
        .route("/client", get(handlers::pages::client))
        .route("/forbidden", get(handlers::pages::forbidden))
}

/// Auth flow endpoints.
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/sign-in", post(handlers::auth::sign_in))
        .route("/auth/sign-out", post(handlers::auth::sign_out))
        .route("/auth/session", get(handlers::auth::session))
}

/// Health check.
fn health_routes() -> Router<AppState> {
    Router::new().route("/healthz", get(handlers::health::healthz))
}
