/// Upstream movie metadata provider abstraction
///
/// Payloads are passed through as decoded JSON: the service never owns movie
/// metadata, it only relays it and snapshots a few display fields.
use serde_json::Value;

use crate::{
    error::AppResult,
    models::{MovieId, TrendingWindow},
};

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Trait for upstream movie data providers
///
/// Implementations report a missing movie as `AppError::NotFound` and every
/// other failure (transport, non-404 status, undecodable body) as
/// `AppError::UpstreamUnavailable`.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieProvider: Send + Sync {
    /// Search movies by free-text query
    async fn search(&self, query: &str) -> AppResult<Value>;

    /// Movies trending over the given window
    async fn trending(&self, window: TrendingWindow) -> AppResult<Value>;

    /// Full details for a single movie
    async fn details(&self, movie_id: MovieId) -> AppResult<Value>;

    /// Globally popular movies
    async fn popular(&self) -> AppResult<Value>;

    /// Movies related to the given one
    async fn recommendations(&self, movie_id: MovieId) -> AppResult<Value>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
