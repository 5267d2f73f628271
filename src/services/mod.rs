pub mod movies;
pub mod providers;
pub mod recommendations;

pub use movies::MovieService;
pub use recommendations::{RandomSeedSelector, RecommendationEngine, SeedSelector};
