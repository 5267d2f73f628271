use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use crate::{
    db::store::{RatingStore, WatchlistStore},
    error::AppResult,
    models::{MovieId, MovieSnapshot, Rating, Score, WatchlistEntry},
};

/// Creates a PostgreSQL connection pool and applies pending migrations
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

/// Postgres-backed rating and watchlist store
///
/// Uniqueness of `(user_id, movie_id)` is enforced by the primary key on both
/// tables; upserts rely on `ON CONFLICT` so racing writers never duplicate rows.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl RatingStore for PgStore {
    async fn upsert_rating(
        &self,
        user: Uuid,
        movie_id: MovieId,
        score: Score,
    ) -> AppResult<Rating> {
        let rating = sqlx::query_as::<_, Rating>(
            r#"
            INSERT INTO ratings (user_id, movie_id, score, rated_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (user_id, movie_id)
            DO UPDATE SET score = EXCLUDED.score, rated_at = EXCLUDED.rated_at
            RETURNING user_id, movie_id, score, rated_at
            "#,
        )
        .bind(user)
        .bind(movie_id)
        .bind(score.value())
        .fetch_one(&self.pool)
        .await?;

        Ok(rating)
    }

    async fn list_ratings(&self, user: Uuid) -> AppResult<Vec<Rating>> {
        let ratings = sqlx::query_as::<_, Rating>(
            r#"
            SELECT user_id, movie_id, score, rated_at
            FROM ratings
            WHERE user_id = $1
            "#,
        )
        .bind(user)
        .fetch_all(&self.pool)
        .await?;

        Ok(ratings)
    }
}

#[async_trait::async_trait]
impl WatchlistStore for PgStore {
    async fn upsert_entry(
        &self,
        user: Uuid,
        movie_id: MovieId,
        snapshot: MovieSnapshot,
    ) -> AppResult<WatchlistEntry> {
        let entry = sqlx::query_as::<_, WatchlistEntry>(
            r#"
            INSERT INTO watchlist (user_id, movie_id, title, poster, added_at)
            VALUES ($1, $2, $3, $4, NOW())
            ON CONFLICT (user_id, movie_id)
            DO UPDATE SET title = EXCLUDED.title, poster = EXCLUDED.poster
            RETURNING user_id, movie_id, title, poster, added_at
            "#,
        )
        .bind(user)
        .bind(movie_id)
        .bind(snapshot.title)
        .bind(snapshot.poster)
        .fetch_one(&self.pool)
        .await?;

        Ok(entry)
    }

    async fn remove_entry(&self, user: Uuid, movie_id: MovieId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM watchlist WHERE user_id = $1 AND movie_id = $2")
            .bind(user)
            .bind(movie_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_entries(&self, user: Uuid) -> AppResult<Vec<WatchlistEntry>> {
        let entries = sqlx::query_as::<_, WatchlistEntry>(
            r#"
            SELECT user_id, movie_id, title, poster, added_at
            FROM watchlist
            WHERE user_id = $1
            "#,
        )
        .bind(user)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}
