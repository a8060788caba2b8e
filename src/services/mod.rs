pub mod recommendations;
pub mod stores;

pub use recommendations::{RecommendationConfig, RecommendationService};
