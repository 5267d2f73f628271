use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::MovieId;

/// A movie saved to a user's watchlist, with the display fields captured when it was added
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistEntry {
    pub user_id: Uuid,
    pub movie_id: MovieId,
    pub title: String,
    pub poster: Option<String>,
    pub added_at: DateTime<Utc>,
}
