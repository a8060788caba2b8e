use std::sync::Arc;

use crate::{
    models::Recipe,
    services::{
        stores::{FeedbackStore, InMemoryFeedbackStore, InMemoryRecipeStore, RecipeStore},
        RecommendationConfig, RecommendationService,
    },
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub recipes: Arc<dyn RecipeStore>,
    pub feedback: Arc<dyn FeedbackStore>,
    pub recommender: RecommendationService,
    pub poll_sample_size: usize,
}

impl AppState {
    pub fn new(
        recipes: Arc<dyn RecipeStore>,
        feedback: Arc<dyn FeedbackStore>,
        config: RecommendationConfig,
    ) -> Self {
        Self {
            recommender: RecommendationService::new(recipes.clone(), config),
            recipes,
            feedback,
            poll_sample_size: 1,
        }
    }

    /// State backed by in-memory stores seeded with `recipes`
    pub fn in_memory(recipes: Vec<Recipe>) -> Self {
        Self::new(
            Arc::new(InMemoryRecipeStore::new(recipes)),
            Arc::new(InMemoryFeedbackStore::new()),
            RecommendationConfig::default(),
        )
    }

    pub fn with_poll_sample_size(mut self, size: usize) -> Self {
        self.poll_sample_size = size.max(1);
        self
    }
}
