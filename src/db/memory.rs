use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    db::store::{RatingStore, WatchlistStore},
    error::AppResult,
    models::{MovieId, MovieSnapshot, Rating, Score, WatchlistEntry},
};

type PairKey = (Uuid, MovieId);

/// In-process store keyed by `(user, movie)`
///
/// Each upsert happens under a single write lock, which gives the same
/// last-write-wins guarantee as the database's unique key.
#[derive(Default)]
pub struct MemoryStore {
    ratings: RwLock<HashMap<PairKey, Rating>>,
    watchlist: RwLock<HashMap<PairKey, WatchlistEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl RatingStore for MemoryStore {
    async fn upsert_rating(
        &self,
        user: Uuid,
        movie_id: MovieId,
        score: Score,
    ) -> AppResult<Rating> {
        let rating = Rating {
            user_id: user,
            movie_id,
            score: score.value(),
            rated_at: Utc::now(),
        };

        let mut ratings = self.ratings.write().await;
        ratings.insert((user, movie_id), rating.clone());
        Ok(rating)
    }

    async fn list_ratings(&self, user: Uuid) -> AppResult<Vec<Rating>> {
        let ratings = self.ratings.read().await;
        Ok(ratings
            .values()
            .filter(|r| r.user_id == user)
            .cloned()
            .collect())
    }
}

#[async_trait::async_trait]
impl WatchlistStore for MemoryStore {
    async fn upsert_entry(
        &self,
        user: Uuid,
        movie_id: MovieId,
        snapshot: MovieSnapshot,
    ) -> AppResult<WatchlistEntry> {
        let mut watchlist = self.watchlist.write().await;
        let entry = watchlist
            .entry((user, movie_id))
            .and_modify(|existing| {
                existing.title = snapshot.title.clone();
                existing.poster = snapshot.poster.clone();
            })
            .or_insert_with(|| WatchlistEntry {
                user_id: user,
                movie_id,
                title: snapshot.title.clone(),
                poster: snapshot.poster.clone(),
                added_at: Utc::now(),
            });

        Ok(entry.clone())
    }

    async fn remove_entry(&self, user: Uuid, movie_id: MovieId) -> AppResult<bool> {
        let mut watchlist = self.watchlist.write().await;
        Ok(watchlist.remove(&(user, movie_id)).is_some())
    }

    async fn list_entries(&self, user: Uuid) -> AppResult<Vec<WatchlistEntry>> {
        let watchlist = self.watchlist.read().await;
        Ok(watchlist
            .values()
            .filter(|e| e.user_id == user)
            .cloned()
            .collect())
    }
}
