use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use rand::seq::SliceRandom;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{FeedbackStore, RecipeStore};
use crate::{
    error::AppResult,
    models::{FeedbackEntry, Recipe, RecipeId, RecipeSummary},
};

/// Recipe catalog held in process memory
///
/// Used for local development and tests. Catalog order is insertion order.
#[derive(Clone, Default)]
pub struct InMemoryRecipeStore {
    recipes: Arc<RwLock<Vec<Recipe>>>,
}

impl InMemoryRecipeStore {
    pub fn new(recipes: Vec<Recipe>) -> Self {
        Self {
            recipes: Arc::new(RwLock::new(recipes)),
        }
    }

    /// Adds or replaces a recipe, as the offline similarity job would
    pub async fn upsert(&self, recipe: Recipe) {
        let mut recipes = self.recipes.write().await;
        if let Some(existing) = recipes.iter_mut().find(|r| r.id == recipe.id) {
            *existing = recipe;
        } else {
            recipes.push(recipe);
        }
    }
}

#[async_trait::async_trait]
impl RecipeStore for InMemoryRecipeStore {
    async fn catalog(&self) -> AppResult<Vec<Recipe>> {
        let recipes = self.recipes.read().await;
        Ok(recipes
            .iter()
            .map(|recipe| Recipe {
                ingredients: Vec::new(),
                instructions: None,
                ..recipe.clone()
            })
            .collect())
    }

    async fn find_by_ids(&self, ids: &[RecipeId]) -> AppResult<Vec<Recipe>> {
        let wanted: HashSet<&RecipeId> = ids.iter().collect();
        let recipes = self.recipes.read().await;
        Ok(recipes
            .iter()
            .filter(|recipe| wanted.contains(&recipe.id))
            .cloned()
            .collect())
    }

    async fn sample(&self, size: usize) -> AppResult<Vec<RecipeSummary>> {
        let recipes = self.recipes.read().await;
        let mut rng = rand::thread_rng();
        Ok(recipes
            .choose_multiple(&mut rng, size)
            .map(RecipeSummary::from)
            .collect())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

/// Feedback held in process memory, keyed by user
#[derive(Clone, Default)]
pub struct InMemoryFeedbackStore {
    entries: Arc<RwLock<HashMap<Uuid, Vec<FeedbackEntry>>>>,
}

impl InMemoryFeedbackStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl FeedbackStore for InMemoryFeedbackStore {
    async fn feedback(&self, user_id: Uuid) -> AppResult<Vec<FeedbackEntry>> {
        let entries = self.entries.read().await;
        Ok(entries.get(&user_id).cloned().unwrap_or_default())
    }

    async fn record(&self, user_id: Uuid, entry: FeedbackEntry) -> AppResult<()> {
        let mut entries = self.entries.write().await;
        entries.entry(user_id).or_default().push(entry);
        Ok(())
    }
}
