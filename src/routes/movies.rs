use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::RequestId,
    models::{MovieId, TrendingWindow},
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    query: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TrendingQuery {
    time_window: Option<String>,
}

/// Handler for movie search
pub async fn search(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<Value>> {
    tracing::info!(request_id = %request_id, query = ?params.query, "Searching movies");
    let payload = state.movies.search(params.query.as_deref()).await?;
    Ok(Json(payload))
}

/// Handler for trending movies; `time_window` defaults to `week`
pub async fn trending(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TrendingQuery>,
) -> AppResult<Json<Value>> {
    let window = match params.time_window.as_deref() {
        Some(raw) => raw.parse::<TrendingWindow>()?,
        None => TrendingWindow::default(),
    };
    let payload = state.movies.trending(window).await?;
    Ok(Json(payload))
}

/// Handler for movie details
pub async fn details(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let movie_id: MovieId = id.parse()?;
    let payload = state.movies.details(movie_id).await?;
    Ok(Json(payload))
}
