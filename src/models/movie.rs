use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

use crate::error::AppError;

/// TMDB movie identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct MovieId(pub i64);

impl Display for MovieId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MovieId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .ok()
            .filter(|id| *id > 0)
            .map(MovieId)
            .ok_or_else(|| AppError::InvalidInput(format!("Invalid movie id: {}", s)))
    }
}

/// Display fields copied from an upstream movie record
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MovieSnapshot {
    pub title: String,
    #[serde(rename = "poster_path", default)]
    pub poster: Option<String>,
}

impl MovieSnapshot {
    /// Extracts the snapshot fields from a TMDB `/movie/{id}` payload
    pub fn from_details(details: &serde_json::Value) -> Result<Self, AppError> {
        serde_json::from_value(details.clone()).map_err(|e| {
            AppError::UpstreamUnavailable(format!("Malformed movie details payload: {}", e))
        })
    }
}

/// Time window accepted by the trending endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TrendingWindow {
    Day,
    #[default]
    Week,
}

impl TrendingWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendingWindow::Day => "day",
            TrendingWindow::Week => "week",
        }
    }
}

impl Display for TrendingWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrendingWindow {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "day" => Ok(TrendingWindow::Day),
            "week" => Ok(TrendingWindow::Week),
            other => Err(AppError::InvalidInput(format!(
                "time_window must be 'day' or 'week', got '{}'",
                other
            ))),
        }
    }
}
