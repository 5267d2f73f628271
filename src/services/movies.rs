use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    db::{RatingStore, WatchlistStore},
    error::{AppError, AppResult},
    models::{MovieId, MovieSnapshot, Rating, Score, TrendingWindow, WatchlistEntry},
    services::{
        providers::MovieProvider,
        recommendations::{RecommendationEngine, SeedSelector},
    },
};

/// User-facing movie operations
///
/// Validation always runs before any upstream call, and an upstream lookup
/// always runs before any store write, so a failed request leaves no partial
/// state behind.
#[derive(Clone)]
pub struct MovieService {
    provider: Arc<dyn MovieProvider>,
    ratings: Arc<dyn RatingStore>,
    watchlist: Arc<dyn WatchlistStore>,
    recommender: RecommendationEngine,
}

impl MovieService {
    pub fn new(
        provider: Arc<dyn MovieProvider>,
        ratings: Arc<dyn RatingStore>,
        watchlist: Arc<dyn WatchlistStore>,
        selector: Arc<dyn SeedSelector>,
    ) -> Self {
        let recommender = RecommendationEngine::new(ratings.clone(), provider.clone(), selector);
        Self {
            provider,
            ratings,
            watchlist,
            recommender,
        }
    }

    pub async fn search(&self, query: Option<&str>) -> AppResult<Value> {
        let query = query
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .ok_or_else(|| AppError::InvalidInput("Search query is required".to_string()))?;

        self.provider.search(query).await
    }

    pub async fn trending(&self, window: TrendingWindow) -> AppResult<Value> {
        self.provider.trending(window).await
    }

    pub async fn details(&self, movie_id: MovieId) -> AppResult<Value> {
        self.provider.details(movie_id).await
    }

    /// Rates a movie, overwriting any earlier rating by the same user
    pub async fn rate(
        &self,
        user: Uuid,
        movie_id: MovieId,
        score: Option<f64>,
    ) -> AppResult<Rating> {
        let score = score
            .ok_or_else(|| AppError::InvalidInput("Rating must be between 1 and 10".to_string()))
            .and_then(Score::new)?;

        self.require_movie(movie_id).await?;

        let rating = self.ratings.upsert_rating(user, movie_id, score).await?;
        tracing::info!(user_id = %user, movie_id = %movie_id, score = rating.score, "Movie rated");
        Ok(rating)
    }

    pub async fn list_ratings(&self, user: Uuid) -> AppResult<Vec<Rating>> {
        self.ratings.list_ratings(user).await
    }

    /// Adds a movie to the watchlist, refreshing its title/poster if already present
    pub async fn add_to_watchlist(
        &self,
        user: Uuid,
        movie_id: MovieId,
    ) -> AppResult<WatchlistEntry> {
        let details = self.require_movie(movie_id).await?;
        let snapshot = MovieSnapshot::from_details(&details)?;

        let entry = self.watchlist.upsert_entry(user, movie_id, snapshot).await?;
        tracing::info!(user_id = %user, movie_id = %movie_id, "Movie added to watchlist");
        Ok(entry)
    }

    pub async fn remove_from_watchlist(&self, user: Uuid, movie_id: MovieId) -> AppResult<()> {
        if self.watchlist.remove_entry(user, movie_id).await? {
            tracing::info!(user_id = %user, movie_id = %movie_id, "Movie removed from watchlist");
            Ok(())
        } else {
            Err(AppError::NotFound("Movie not found in watchlist".to_string()))
        }
    }

    pub async fn list_watchlist(&self, user: Uuid) -> AppResult<Vec<WatchlistEntry>> {
        self.watchlist.list_entries(user).await
    }

    pub async fn recommend(&self, user: Uuid) -> AppResult<Value> {
        self.recommender.recommend(user).await
    }

    /// Fetches upstream details, reporting a missing movie as `NotFound`
    async fn require_movie(&self, movie_id: MovieId) -> AppResult<Value> {
        self.provider.details(movie_id).await.map_err(|e| match e {
            AppError::NotFound(_) => AppError::NotFound("Movie not found".to_string()),
            other => other,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::{store::MockRatingStore, store::MockWatchlistStore, MemoryStore},
        services::{providers::MockMovieProvider, recommendations::RandomSeedSelector},
    };
    use mockall::predicate::eq;
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};

    fn service_with(provider: MockMovieProvider, store: Arc<MemoryStore>) -> MovieService {
        MovieService::new(
            Arc::new(provider),
            store.clone(),
            store,
            Arc::new(RandomSeedSelector),
        )
    }

    fn provider_with_movie(
        id: i64,
        title: &'static str,
        poster: &'static str,
    ) -> MockMovieProvider {
        let mut provider = MockMovieProvider::new();
        provider
            .expect_details()
            .with(eq(MovieId(id)))
            .returning(move |_| Ok(json!({ "id": id, "title": title, "poster_path": poster })));
        provider
    }

    #[tokio::test]
    async fn test_rate_twice_keeps_latest_score() {
        let store = Arc::new(MemoryStore::new());
        let service = service_with(provider_with_movie(550, "Fight Club", "/fc.jpg"), store);
        let user = Uuid::new_v4();

        assert_ok!(service.rate(user, MovieId(550), Some(3.0)).await);
        assert_ok!(service.rate(user, MovieId(550), Some(9.0)).await);

        let ratings = service.list_ratings(user).await.unwrap();
        assert_eq!(ratings.len(), 1);
        assert_eq!(ratings[0].movie_id, MovieId(550));
        assert_eq!(ratings[0].score, 9.0);
    }

    #[tokio::test]
    async fn test_rate_boundaries() {
        let store = Arc::new(MemoryStore::new());
        let service = service_with(provider_with_movie(1, "One", "/1.jpg"), store);
        let user = Uuid::new_v4();

        assert_ok!(service.rate(user, MovieId(1), Some(1.0)).await);
        assert_ok!(service.rate(user, MovieId(1), Some(10.0)).await);
    }

    #[tokio::test]
    async fn test_rate_out_of_range_skips_upstream_and_store() {
        let mut provider = MockMovieProvider::new();
        provider.expect_details().never();
        let mut ratings = MockRatingStore::new();
        ratings.expect_upsert_rating().never();

        let service = MovieService::new(
            Arc::new(provider),
            Arc::new(ratings),
            Arc::new(MemoryStore::new()),
            Arc::new(RandomSeedSelector),
        );
        let user = Uuid::new_v4();

        for bad in [Some(0.0), Some(11.0), None] {
            let err = service.rate(user, MovieId(1), bad).await.unwrap_err();
            assert!(matches!(err, AppError::InvalidInput(_)));
        }
    }

    #[tokio::test]
    async fn test_rate_unknown_movie_is_not_found_and_not_persisted() {
        let mut provider = MockMovieProvider::new();
        provider
            .expect_details()
            .returning(|_| Err(AppError::NotFound("TMDB resource not found".into())));
        let store = Arc::new(MemoryStore::new());
        let service = service_with(provider, store.clone());
        let user = Uuid::new_v4();

        let err = service.rate(user, MovieId(404), Some(8.0)).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(store.list_ratings(user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rate_upstream_outage_stays_distinct_from_not_found() {
        let mut provider = MockMovieProvider::new();
        provider
            .expect_details()
            .returning(|_| Err(AppError::UpstreamUnavailable("503".into())));
        let service = service_with(provider, Arc::new(MemoryStore::new()));

        let err = service
            .rate(Uuid::new_v4(), MovieId(550), Some(8.0))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UpstreamUnavailable(_)));
    }

    #[tokio::test]
    async fn test_rate_store_failure_propagates_as_internal() {
        let mut ratings = MockRatingStore::new();
        ratings
            .expect_upsert_rating()
            .returning(|_, _, _| Err(AppError::Internal("disk full".into())));

        let service = MovieService::new(
            Arc::new(provider_with_movie(550, "Fight Club", "/fc.jpg")),
            Arc::new(ratings),
            Arc::new(MemoryStore::new()),
            Arc::new(RandomSeedSelector),
        );

        let err = service
            .rate(Uuid::new_v4(), MovieId(550), Some(8.0))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Internal);
    }

    #[tokio::test]
    async fn test_remove_from_empty_watchlist_is_not_found() {
        let service = service_with(MockMovieProvider::new(), Arc::new(MemoryStore::new()));
        let err = assert_err!(
            service
                .remove_from_watchlist(Uuid::new_v4(), MovieId(550))
                .await
        );
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_add_then_remove_watchlist() {
        let store = Arc::new(MemoryStore::new());
        let service = service_with(provider_with_movie(550, "Fight Club", "/fc.jpg"), store);
        let user = Uuid::new_v4();

        let entry = service.add_to_watchlist(user, MovieId(550)).await.unwrap();
        assert_eq!(entry.title, "Fight Club");
        assert_eq!(entry.poster.as_deref(), Some("/fc.jpg"));

        assert_ok!(service.remove_from_watchlist(user, MovieId(550)).await);
        let entries = service.list_watchlist(user).await.unwrap();
        assert!(entries.iter().all(|e| e.movie_id != MovieId(550)));
    }

    #[tokio::test]
    async fn test_add_twice_keeps_latest_snapshot() {
        let mut provider = MockMovieProvider::new();
        let mut seq = mockall::Sequence::new();
        provider
            .expect_details()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(json!({ "title": "Working Title", "poster_path": "/draft.jpg" })));
        provider
            .expect_details()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(json!({ "title": "Final Title", "poster_path": "/final.jpg" })));

        let service = service_with(provider, Arc::new(MemoryStore::new()));
        let user = Uuid::new_v4();

        service.add_to_watchlist(user, MovieId(77)).await.unwrap();
        service.add_to_watchlist(user, MovieId(77)).await.unwrap();

        let entries = service.list_watchlist(user).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Final Title");
        assert_eq!(entries[0].poster.as_deref(), Some("/final.jpg"));
    }

    #[tokio::test]
    async fn test_add_unknown_movie_writes_nothing() {
        let mut provider = MockMovieProvider::new();
        provider
            .expect_details()
            .returning(|_| Err(AppError::NotFound("missing".into())));
        let mut watchlist = MockWatchlistStore::new();
        watchlist.expect_upsert_entry().never();

        let service = MovieService::new(
            Arc::new(provider),
            Arc::new(MemoryStore::new()),
            Arc::new(watchlist),
            Arc::new(RandomSeedSelector),
        );

        let err = service
            .add_to_watchlist(Uuid::new_v4(), MovieId(404))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_add_with_malformed_details_writes_nothing() {
        let mut provider = MockMovieProvider::new();
        provider
            .expect_details()
            .returning(|_| Ok(json!({ "id": 5 })));
        let store = Arc::new(MemoryStore::new());
        let service = service_with(provider, store.clone());
        let user = Uuid::new_v4();

        let err = service.add_to_watchlist(user, MovieId(5)).await.unwrap_err();
        assert!(matches!(err, AppError::UpstreamUnavailable(_)));
        assert!(store.list_entries(user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_search_makes_no_upstream_call() {
        let mut provider = MockMovieProvider::new();
        provider.expect_search().never();
        let service = service_with(provider, Arc::new(MemoryStore::new()));

        for query in [None, Some(""), Some("   ")] {
            let err = service.search(query).await.unwrap_err();
            assert!(matches!(err, AppError::InvalidInput(_)));
        }
    }

    #[tokio::test]
    async fn test_search_passes_trimmed_query_through() {
        let mut provider = MockMovieProvider::new();
        provider
            .expect_search()
            .withf(|q| q == "inception")
            .times(1)
            .returning(|_| Ok(json!({ "results": [{ "id": 27205 }] })));
        let service = service_with(provider, Arc::new(MemoryStore::new()));

        let payload = service.search(Some("  inception ")).await.unwrap();
        assert_eq!(payload["results"][0]["id"], 27205);
    }

    #[tokio::test]
    async fn test_trending_and_details_pass_through() {
        let mut provider = MockMovieProvider::new();
        provider
            .expect_trending()
            .with(eq(TrendingWindow::Day))
            .returning(|_| Ok(json!({ "window": "day" })));
        provider
            .expect_details()
            .with(eq(MovieId(13)))
            .returning(|_| Ok(json!({ "id": 13 })));
        let service = service_with(provider, Arc::new(MemoryStore::new()));

        assert_eq!(
            service.trending(TrendingWindow::Day).await.unwrap(),
            json!({ "window": "day" })
        );
        assert_eq!(service.details(MovieId(13)).await.unwrap(), json!({ "id": 13 }));
    }

    #[tokio::test]
    async fn test_recommend_uses_ratings_written_through_service() {
        let mut provider = provider_with_movie(550, "Fight Club", "/fc.jpg");
        provider
            .expect_recommendations()
            .with(eq(MovieId(550)))
            .times(1)
            .returning(|_| Ok(json!({ "results": [{ "id": 807 }] })));
        let service = service_with(provider, Arc::new(MemoryStore::new()));
        let user = Uuid::new_v4();

        service.rate(user, MovieId(550), Some(8.0)).await.unwrap();
        let payload = service.recommend(user).await.unwrap();
        assert_eq!(payload, json!({ "results": [{ "id": 807 }] }));
    }
}
