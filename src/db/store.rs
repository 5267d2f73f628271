/// Persistence contracts for ratings and watchlists
///
/// Both stores are keyed by the compound `(user, movie)` key, and the store
/// itself is responsible for keeping that key unique: upserts must be atomic
/// so concurrent writers for the same pair resolve to last-write-wins rather
/// than duplicate rows.
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{MovieId, MovieSnapshot, Rating, Score, WatchlistEntry},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RatingStore: Send + Sync {
    /// Insert or overwrite the rating for `(user, movie_id)`
    ///
    /// Returns the stored rating with the new score and a fresh timestamp.
    async fn upsert_rating(&self, user: Uuid, movie_id: MovieId, score: Score)
        -> AppResult<Rating>;

    /// All ratings belonging to `user`, in no particular order
    async fn list_ratings(&self, user: Uuid) -> AppResult<Vec<Rating>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait WatchlistStore: Send + Sync {
    /// Insert the entry for `(user, movie_id)` or refresh its title/poster snapshot
    ///
    /// `added_at` is set on first insert only.
    async fn upsert_entry(
        &self,
        user: Uuid,
        movie_id: MovieId,
        snapshot: MovieSnapshot,
    ) -> AppResult<WatchlistEntry>;

    /// Delete the entry for `(user, movie_id)`, returning whether one existed
    async fn remove_entry(&self, user: Uuid, movie_id: MovieId) -> AppResult<bool>;

    /// All watchlist entries belonging to `user`, in no particular order
    async fn list_entries(&self, user: Uuid) -> AppResult<Vec<WatchlistEntry>>;
}
