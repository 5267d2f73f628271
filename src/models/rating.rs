use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::MovieId;
use crate::error::AppError;

pub const MIN_SCORE: f64 = 1.0;
pub const MAX_SCORE: f64 = 10.0;

/// A rating score known to lie within `MIN_SCORE..=MAX_SCORE`
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Score(f64);

impl Score {
    pub fn new(value: f64) -> Result<Self, AppError> {
        if value.is_finite() && (MIN_SCORE..=MAX_SCORE).contains(&value) {
            Ok(Self(value))
        } else {
            Err(AppError::InvalidInput(
                "Rating must be between 1 and 10".to_string(),
            ))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

/// A user's rating of a single movie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub user_id: Uuid,
    pub movie_id: MovieId,
    #[serde(rename = "rating")]
    pub score: f64,
    pub rated_at: DateTime<Utc>,
}
