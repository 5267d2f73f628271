use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::{AuthUser, RequestId},
    models::{MovieId, Rating, WatchlistEntry},
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct RateRequest {
    pub rating: Option<f64>,
}

/// Handler for rating a movie
pub async fn rate(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    body: Result<Json<RateRequest>, JsonRejection>,
) -> AppResult<Json<Rating>> {
    let movie_id: MovieId = id.parse()?;
    let Json(request) = body.map_err(|e| AppError::InvalidInput(e.body_text()))?;
    tracing::info!(
        request_id = %request_id,
        user_id = %user,
        movie_id = %movie_id,
        "Processing rating"
    );

    let rating = state.movies.rate(user, movie_id, request.rating).await?;
    Ok(Json(rating))
}

/// Handler for listing the caller's ratings
pub async fn ratings(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> AppResult<Json<Vec<Rating>>> {
    let ratings = state.movies.list_ratings(user).await?;
    Ok(Json(ratings))
}

/// Handler for adding a movie to the caller's watchlist
pub async fn add_to_watchlist(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<WatchlistEntry>> {
    let movie_id: MovieId = id.parse()?;
    tracing::info!(
        request_id = %request_id,
        user_id = %user,
        movie_id = %movie_id,
        "Adding to watchlist"
    );

    let entry = state.movies.add_to_watchlist(user, movie_id).await?;
    Ok(Json(entry))
}

/// Handler for removing a movie from the caller's watchlist
pub async fn remove_from_watchlist(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let movie_id: MovieId = id.parse()?;
    tracing::info!(
        request_id = %request_id,
        user_id = %user,
        movie_id = %movie_id,
        "Removing from watchlist"
    );

    state.movies.remove_from_watchlist(user, movie_id).await?;
    Ok(Json(json!({ "message": "Movie removed from watchlist" })))
}

/// Handler for the caller's watchlist
pub async fn watchlist(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> AppResult<Json<Vec<WatchlistEntry>>> {
    let entries = state.movies.list_watchlist(user).await?;
    Ok(Json(entries))
}

/// Handler for personalised recommendations
pub async fn recommendations(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    AuthUser(user): AuthUser,
) -> AppResult<Json<Value>> {
    tracing::info!(request_id = %request_id, user_id = %user, "Building recommendations");
    let payload = state.movies.recommend(user).await?;
    Ok(Json(payload))
}
