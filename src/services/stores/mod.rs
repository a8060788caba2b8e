//! Recipe catalog and user feedback storage abstractions
//!
//! The recommendation pipeline only reads from these stores. Recipes and their
//! similarity tables are written by the offline similarity job; feedback is
//! appended by the polling endpoint.

use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{FeedbackEntry, Recipe, RecipeId, RecipeSummary},
};

pub mod cached;
pub mod memory;
pub mod postgres;

pub use cached::CachedRecipeStore;
pub use memory::{InMemoryFeedbackStore, InMemoryRecipeStore};
pub use postgres::{PgFeedbackStore, PgRecipeStore};

/// Read access to the recipe catalog
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RecipeStore: Send + Sync {
    /// Scans the whole catalog, projecting `id`, `title`, `image` and `similarities`
    async fn catalog(&self) -> AppResult<Vec<Recipe>>;

    /// Bulk lookup of full recipe records by id
    ///
    /// Unknown ids are ignored. Result order is the store's natural order and
    /// need not match `ids`.
    async fn find_by_ids(&self, ids: &[RecipeId]) -> AppResult<Vec<Recipe>>;

    /// Draws up to `size` random recipes for the polling page
    async fn sample(&self, size: usize) -> AppResult<Vec<RecipeSummary>>;

    /// Store name for logging
    fn name(&self) -> &'static str;
}

/// Per-user poll feedback
#[async_trait::async_trait]
pub trait FeedbackStore: Send + Sync {
    /// Returns the user's feedback in append order; unknown users have none
    async fn feedback(&self, user_id: Uuid) -> AppResult<Vec<FeedbackEntry>>;

    /// Appends one vote to the user's feedback
    async fn record(&self, user_id: Uuid, entry: FeedbackEntry) -> AppResult<()>;
}
