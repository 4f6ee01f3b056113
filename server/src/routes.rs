use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use recipebox_core::{
    models::{FavoriteUpdate, ReorderRequest},
    NewRecipe, RecipeReference, SaveOutcome, SavedRecipes,
};
use serde_json::json;

use crate::{auth::Owner, error::ApiError, state::AppState};

type ListResponse = Result<Json<Vec<RecipeReference>>, ApiError>;

/// Run a store operation off the async runtime
async fn with_store<T, F>(state: Arc<AppState>, op: F) -> Result<T, ApiError>
where
    F: FnOnce(&SavedRecipes) -> recipebox_core::Result<T> + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(move || op(&state.recipes)).await??)
}

pub async fn root_handler() -> impl IntoResponse {
    Json(json!({ "message": "server response" }))
}

pub async fn list_saved_handler(
    State(state): State<Arc<AppState>>,
    Owner(owner): Owner,
) -> ListResponse {
    let entries = with_store(state, move |recipes| recipes.list_sorted(&owner)).await?;
    Ok(Json(entries))
}

pub async fn list_favorites_handler(
    State(state): State<Arc<AppState>>,
    Owner(owner): Owner,
) -> ListResponse {
    let entries = with_store(state, move |recipes| recipes.list_favorites(&owner)).await?;
    Ok(Json(entries))
}

pub async fn save_handler(
    State(state): State<Arc<AppState>>,
    Owner(owner): Owner,
    payload: Result<Json<NewRecipe>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(recipe) = payload?;

    let (outcome, entries) = with_store(state, move |recipes| recipes.save(&owner, recipe)).await?;
    let status = match outcome {
        SaveOutcome::Created => StatusCode::CREATED,
        SaveOutcome::Updated => StatusCode::OK,
    };

    Ok((status, Json(entries)))
}

pub async fn toggle_favorite_handler(
    State(state): State<Arc<AppState>>,
    Owner(owner): Owner,
    Path(recipe_id): Path<String>,
    payload: Result<Json<FavoriteUpdate>, JsonRejection>,
) -> ListResponse {
    let Json(update) = payload?;
    let is_favorite = update.flag()?;

    let entries = with_store(state, move |recipes| {
        recipes.toggle_favorite(&owner, &recipe_id, is_favorite)
    })
    .await?;
    Ok(Json(entries))
}

pub async fn remove_handler(
    State(state): State<Arc<AppState>>,
    Owner(owner): Owner,
    Path(recipe_id): Path<String>,
) -> ListResponse {
    let entries = with_store(state, move |recipes| recipes.remove(&owner, &recipe_id)).await?;
    Ok(Json(entries))
}

/// `DELETE /api/recipes/saved/reorder` lands on the fixed reorder route, so a
/// recipe saved under the id `reorder` is removed here
pub async fn remove_reorder_handler(
    State(state): State<Arc<AppState>>,
    Owner(owner): Owner,
) -> ListResponse {
    let entries = with_store(state, move |recipes| recipes.remove(&owner, "reorder")).await?;
    Ok(Json(entries))
}

pub async fn reorder_handler(
    State(state): State<Arc<AppState>>,
    Owner(owner): Owner,
    payload: Result<Json<ReorderRequest>, JsonRejection>,
) -> ListResponse {
    let Json(request) = payload?;

    let entries = with_store(state, move |recipes| recipes.reorder(&owner, &request)).await?;
    Ok(Json(entries))
}
