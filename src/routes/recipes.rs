use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::{AppError, AppResult},
    models::{Recipe, RecipeId},
    routes::AppState,
};

/// Handler returning one full recipe record
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Recipe>> {
    let id = RecipeId(id);
    state
        .recipes
        .find_by_ids(std::slice::from_ref(&id))
        .await?
        .into_iter()
        .find(|recipe| recipe.id == id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Recipe {}", id)))
}
