use axum::{extract::State, Extension, Json};
use serde::Serialize;

use crate::{
    error::AppResult,
    middleware::{CurrentUser, RequestId},
    models::Recipe,
    routes::AppState,
};

/// Payload for the home feed
#[derive(Debug, Serialize)]
pub struct HomeFeed {
    pub recommendations: Vec<Recipe>,
}

async fn recommend_for(
    state: &AppState,
    user: CurrentUser,
    request_id: &RequestId,
) -> AppResult<Vec<Recipe>> {
    let feedback = state.feedback.feedback(user.0).await?;

    tracing::debug!(
        request_id = %request_id,
        user_id = %user.0,
        feedback = feedback.len(),
        "Processing recommendation request"
    );

    let recommendations = state.recommender.recommend(&feedback).await?;

    tracing::debug!(
        request_id = %request_id,
        recommendations = recommendations.len(),
        "Recommendations ready"
    );

    Ok(recommendations)
}

/// Handler for the JSON suggestions endpoint
pub async fn suggestions(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Recipe>>> {
    let recommendations = recommend_for(&state, user, &request_id).await?;
    Ok(Json(recommendations))
}

/// Handler for the home feed
///
/// An empty `recommendations` list means the user has not liked anything with
/// similarity data yet.
pub async fn home(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    user: CurrentUser,
) -> AppResult<Json<HomeFeed>> {
    let recommendations = recommend_for(&state, user, &request_id).await?;
    Ok(Json(HomeFeed { recommendations }))
}
