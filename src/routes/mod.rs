use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    middleware::{make_span_with_request_id, request_id_middleware},
    services::MovieService,
};

pub mod movies;
pub mod user;

/// Shared state handed to every handler
pub struct AppState {
    pub movies: MovieService,
}

impl AppState {
    pub fn new(movies: MovieService) -> Self {
        Self { movies }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/movies", movie_routes())
        .layer(
            // Outermost first: the request ID must exist before the trace span is built.
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
        .with_state(Arc::new(state))
}

/// Movie routes under /api/movies
///
/// The `/user/...` routes are static and take precedence over `/:id`.
fn movie_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/search", get(movies::search))
        .route("/trending", get(movies::trending))
        .route("/user/ratings", get(user::ratings))
        .route("/user/watchlist", get(user::watchlist))
        .route("/user/recommendations", get(user::recommendations))
        .route("/:id", get(movies::details))
        .route("/:id/rate", post(user::rate))
        .route(
            "/:id/watchlist",
            post(user::add_to_watchlist).delete(user::remove_from_watchlist),
        )
}

async fn root() -> &'static str {
    "Movie Recommendation API is running"
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
