//! Recommendation pipeline
//!
//! Turns a user's poll feedback into ranked recipe recommendations in four
//! stages:
//!
//! 1. [`extract_liked`]: ids of positively rated recipes, in vote order
//! 2. [`match_liked`]: catalog records for those ids (set membership, so the
//!    order of either input does not matter)
//! 3. [`select_candidates`]: head of each liked recipe's similarity tier,
//!    deduplicated and excluding anything already liked
//! 4. [`fetch_recipes`]: full records for the candidates
//!
//! Stages 1-3 are pure. Stage 4 is the only store read besides the catalog scan.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{FeedbackEntry, Recipe, RecipeId},
    services::stores::RecipeStore,
};

/// Tuning for candidate selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommendationConfig {
    /// Index into each recipe's similarity table
    pub tier: usize,
    /// Candidates taken from the head of each seed's tier
    pub max_per_seed: usize,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            tier: 1,
            max_per_seed: 3,
        }
    }
}

/// Returns the ids of liked recipes, preserving feedback order
///
/// Entries with any other rating, or missing either field, are ignored.
pub fn extract_liked(feedback: &[FeedbackEntry]) -> Vec<RecipeId> {
    feedback
        .iter()
        .filter_map(FeedbackEntry::liked_recipe)
        .cloned()
        .collect()
}

/// Returns the catalog records whose id is in `liked_ids`, in catalog order
pub fn match_liked<'a>(liked_ids: &[RecipeId], catalog: &'a [Recipe]) -> Vec<&'a Recipe> {
    let liked: HashSet<&RecipeId> = liked_ids.iter().collect();
    catalog
        .iter()
        .filter(|recipe| liked.contains(&recipe.id))
        .collect()
}

/// Picks candidate ids from the similarity tables of the liked recipes
///
/// Seeds are visited in order; each contributes at most `max_per_seed` ids from
/// the head of its configured tier. Ids seen from an earlier seed, and ids the
/// user already liked, are skipped. Seeds without similarity data contribute
/// nothing, so an empty result is a normal outcome.
pub fn select_candidates(
    liked_recipes: &[&Recipe],
    liked_ids: &[RecipeId],
    config: &RecommendationConfig,
) -> Vec<RecipeId> {
    let liked: HashSet<&RecipeId> = liked_ids.iter().collect();
    let mut seen: HashSet<&RecipeId> = HashSet::new();
    let mut candidates = Vec::new();

    for seed in liked_recipes {
        let similar = seed.similar_in_tier(config.tier);
        if similar.is_empty() {
            tracing::debug!(
                recipe_id = %seed.id,
                tier = config.tier,
                "Seed has no similarity data"
            );
            continue;
        }

        for entry in similar.iter().take(config.max_per_seed) {
            if liked.contains(&entry.id) || !seen.insert(&entry.id) {
                continue;
            }
            candidates.push(entry.id.clone());
        }
    }

    candidates
}

/// Resolves candidate ids to full records
///
/// An empty id list short-circuits without touching the store. Store errors
/// are returned as-is; there is no retry here.
pub async fn fetch_recipes(ids: &[RecipeId], store: &dyn RecipeStore) -> AppResult<Vec<Recipe>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    store.find_by_ids(ids).await
}

/// Reorders fetched records to follow candidate rank
///
/// Records whose id is not a candidate are dropped.
pub fn order_by_candidates(candidates: &[RecipeId], recipes: Vec<Recipe>) -> Vec<Recipe> {
    let rank: HashMap<&RecipeId, usize> = candidates
        .iter()
        .enumerate()
        .map(|(i, id)| (id, i))
        .collect();

    let mut ranked: Vec<(usize, Recipe)> = recipes
        .into_iter()
        .filter_map(|recipe| rank.get(&recipe.id).map(|&i| (i, recipe)))
        .collect();
    ranked.sort_by_key(|(i, _)| *i);
    ranked.into_iter().map(|(_, recipe)| recipe).collect()
}

/// Runs the full pipeline against a recipe store
#[derive(Clone)]
pub struct RecommendationService {
    store: Arc<dyn RecipeStore>,
    config: RecommendationConfig,
}

impl RecommendationService {
    pub fn new(store: Arc<dyn RecipeStore>, config: RecommendationConfig) -> Self {
        Self { store, config }
    }

    /// Recommends recipes for a user given their feedback, ranked by candidate order
    pub async fn recommend(&self, feedback: &[FeedbackEntry]) -> AppResult<Vec<Recipe>> {
        let liked_ids = extract_liked(feedback);
        if liked_ids.is_empty() {
            tracing::debug!(feedback = feedback.len(), "No liked recipes yet");
            return Ok(Vec::new());
        }

        let catalog = self.store.catalog().await?;
        let liked_recipes = match_liked(&liked_ids, &catalog);
        let candidates = select_candidates(&liked_recipes, &liked_ids, &self.config);

        tracing::info!(
            liked = liked_ids.len(),
            matched = liked_recipes.len(),
            candidates = candidates.len(),
            tier = self.config.tier,
            max_per_seed = self.config.max_per_seed,
            store = self.store.name(),
            "Selected recommendation candidates"
        );

        let recipes = fetch_recipes(&candidates, self.store.as_ref()).await?;
        Ok(order_by_candidates(&candidates, recipes))
    }
}
