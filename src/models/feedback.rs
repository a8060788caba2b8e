use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RecipeId;

/// Rating value that marks a recipe as liked
pub const LIKED_RATING: i64 = 1;

/// A single poll vote recorded against a user
///
/// Stored entries are not validated, so either field may be missing.
/// Such entries are kept but never contribute to recommendations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackEntry {
    #[serde(default)]
    pub recipe_id: Option<RecipeId>,
    #[serde(default)]
    pub rating: Option<i64>,
    /// When the vote was cast; absent on entries recorded before timestamps existed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voted_at: Option<DateTime<Utc>>,
}

impl FeedbackEntry {
    pub fn new(recipe_id: impl Into<String>, rating: i64) -> Self {
        Self {
            recipe_id: Some(RecipeId::new(recipe_id)),
            rating: Some(rating),
            voted_at: None,
        }
    }

    pub fn stamped(mut self, at: DateTime<Utc>) -> Self {
        self.voted_at = Some(at);
        self
    }

    /// Returns the recipe id if this entry is a well-formed positive vote
    pub fn liked_recipe(&self) -> Option<&RecipeId> {
        match (&self.recipe_id, self.rating) {
            (Some(id), Some(LIKED_RATING)) => Some(id),
            _ => None,
        }
    }
}

/// Body of a poll vote submission
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub recipe_id: RecipeId,
    pub rating: i64,
}

impl From<VoteRequest> for FeedbackEntry {
    fn from(vote: VoteRequest) -> Self {
        Self {
            recipe_id: Some(vote.recipe_id),
            rating: Some(vote.rating),
            voted_at: None,
        }
    }
}
