//! Router assembly.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the application router with all routes.
pub fn build_router(state: AppState) -> Router {
    // Health check routes (no auth required)
    let health_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/health", get(handlers::api_health));

    // Admin pages
    let page_routes = Router::new()
        .route("/", get(handlers::dashboard::home))
        .route("/dashboard", get(handlers::dashboard::dashboard))
        .route("/contacts", get(handlers::contacts::list))
        .route("/contacts/add", post(handlers::contacts::add))
        .route("/contacts/import_csv", post(handlers::contacts::import_csv))
        .route(
            "/contacts/{contact_id}/optout",
            post(handlers::contacts::opt_out),
        )
        .route("/campaigns", get(handlers::campaigns::list))
        .route("/campaigns/create", post(handlers::campaigns::create))
        .route(
            "/campaigns/{campaign_id}/start",
            post(handlers::campaigns::start),
        )
        .route(
            "/campaigns/{campaign_id}/stats",
            get(handlers::campaigns::stats),
        );

    // JSON API
    let api_routes = Router::new()
        .route("/api/dashboard/stats", get(handlers::api::stats))
        .route("/api/audit", get(handlers::api::audit_log));

    // Public unsubscribe
    let public_routes = Router::new().route("/u/{phone}", get(handlers::unsubscribe::unsubscribe));

    Router::new()
        .merge(health_routes)
        .merge(page_routes)
        .merge(api_routes)
        .merge(public_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
