mod movie;
mod rating;
mod watchlist;

pub use movie::{MovieId, MovieSnapshot, TrendingWindow};
pub use rating::{Rating, Score, MAX_SCORE, MIN_SCORE};
pub use watchlist::WatchlistEntry;
