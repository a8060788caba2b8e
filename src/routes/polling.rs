use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    middleware::{CurrentUser, RequestId},
    models::{FeedbackEntry, RecipeSummary, VoteRequest},
    routes::AppState,
};

/// Handler returning random recipes for the user to vote on
pub async fn next_recipes(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> AppResult<Json<Vec<RecipeSummary>>> {
    let recipes = state.recipes.sample(state.poll_sample_size).await?;

    if recipes.is_empty() {
        return Err(AppError::NotFound("No recipes available to poll".to_string()));
    }

    Ok(Json(recipes))
}

/// Handler recording a poll vote
pub async fn vote(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    user: CurrentUser,
    Json(request): Json<VoteRequest>,
) -> AppResult<(StatusCode, Json<FeedbackEntry>)> {
    if request.recipe_id.as_str().trim().is_empty() {
        return Err(AppError::InvalidInput("recipeId must not be empty".to_string()));
    }

    let known = state
        .recipes
        .find_by_ids(std::slice::from_ref(&request.recipe_id))
        .await?;
    if known.is_empty() {
        return Err(AppError::NotFound(format!("Recipe {}", request.recipe_id)));
    }

    let entry = FeedbackEntry::from(request).stamped(Utc::now());
    state.feedback.record(user.0, entry.clone()).await?;

    tracing::info!(
        request_id = %request_id,
        user_id = %user.0,
        recipe_id = ?entry.recipe_id,
        rating = ?entry.rating,
        "Recorded poll vote"
    );

    Ok((StatusCode::CREATED, Json(entry)))
}

/// Handler listing the user's recorded votes
pub async fn feedback(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<FeedbackEntry>>> {
    let entries = state.feedback.feedback(user.0).await?;
    Ok(Json(entries))
}
