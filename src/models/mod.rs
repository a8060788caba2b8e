mod feedback;
mod recipe;

pub use feedback::{FeedbackEntry, VoteRequest, LIKED_RATING};
pub use recipe::{Recipe, RecipeId, RecipeSummary, SimilarRecipe, SimilarityTable};
