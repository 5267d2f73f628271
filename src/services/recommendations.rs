use rand::Rng;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    db::RatingStore,
    error::{AppError, AppResult},
    models::Rating,
    services::providers::MovieProvider,
};

/// Minimum score for a rating to seed recommendations
pub const HIGH_AFFINITY_THRESHOLD: f64 = 7.0;

/// Chooses which high-affinity rating seeds a recommendation request
pub trait SeedSelector: Send + Sync {
    /// Returns an index in `0..candidates`; `candidates` is never zero
    fn select(&self, candidates: usize) -> usize;
}

/// Uniformly random seed selection
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomSeedSelector;

impl SeedSelector for RandomSeedSelector {
    fn select(&self, candidates: usize) -> usize {
        rand::thread_rng().gen_range(0..candidates)
    }
}

/// Produces movie suggestions for a user from their ratings
///
/// One upstream call per request: related titles for a single randomly
/// chosen well-rated movie, or the global popular list on cold start.
#[derive(Clone)]
pub struct RecommendationEngine {
    ratings: Arc<dyn RatingStore>,
    provider: Arc<dyn MovieProvider>,
    selector: Arc<dyn SeedSelector>,
}

impl RecommendationEngine {
    pub fn new(
        ratings: Arc<dyn RatingStore>,
        provider: Arc<dyn MovieProvider>,
        selector: Arc<dyn SeedSelector>,
    ) -> Self {
        Self {
            ratings,
            provider,
            selector,
        }
    }

    pub async fn recommend(&self, user: Uuid) -> AppResult<Value> {
        let high_affinity: Vec<Rating> = self
            .ratings
            .list_ratings(user)
            .await?
            .into_iter()
            .filter(|r| r.score >= HIGH_AFFINITY_THRESHOLD)
            .collect();

        if high_affinity.is_empty() {
            tracing::info!(user_id = %user, "No high-affinity ratings, serving popular movies");
            return self.provider.popular().await;
        }

        let index = self.selector.select(high_affinity.len());
        let seed = high_affinity.get(index).ok_or_else(|| {
            AppError::Internal(format!(
                "Seed selector returned index {} for {} candidates",
                index,
                high_affinity.len()
            ))
        })?;

        tracing::info!(
            user_id = %user,
            seed_movie_id = %seed.movie_id,
            candidates = high_affinity.len(),
            "Selected recommendation seed"
        );

        self.provider
            .recommendations(seed.movie_id)
            .await
            .map_err(|e| match e {
                AppError::NotFound(msg) => AppError::UpstreamUnavailable(msg),
                other => other,
            })
    }
}
