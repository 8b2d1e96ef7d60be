use axum::{
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        // Form metadata
        .route("/catalog", get(handlers::get_catalog))
        // Session lifecycle
        .route(
            "/session",
            get(handlers::get_session).delete(handlers::reset_session),
        )
        .route("/session/query", put(handlers::update_query))
        .route("/session/submit", post(handlers::submit))
        .route("/session/transcript", get(handlers::get_transcript))
        // Recommendations of the active submission
        .route("/session/recommendations", get(handlers::get_recommendations))
        .route(
            "/session/recommendations/:rank",
            get(handlers::get_recommendation),
        )
}
