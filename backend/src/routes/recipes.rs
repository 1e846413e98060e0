//! Recipe search and saved recipe routes

use super::parse_id;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::services::RecipeService;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use pantry_tracker_shared::models::{Recipe, RecipeDetails};
use pantry_tracker_shared::types::{
    LikeResponse, RecipeSearchRequest, RecipeSearchResponse, SaveRecipeRequest,
};

pub fn recipes_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_recipes).post(save_recipe))
        .route("/search", post(search_recipes))
        .route("/catalog/:external_id", get(recipe_details))
        .route("/:id", delete(delete_recipe))
        .route("/:id/like", post(toggle_like))
}

/// POST /api/v1/recipes/search
///
/// Without a `filter` the saved preferences apply; saved intolerances
/// always apply. Unknown filter tags are validation errors.
async fn search_recipes(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<RecipeSearchRequest>, JsonRejection>,
) -> Result<Json<RecipeSearchResponse>, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::Validation(e.body_text()))?;
    let response = RecipeService::search(state.db(), &state.spoonacular, auth.user_id, req).await?;
    Ok(Json(response))
}

/// GET /api/v1/recipes/catalog/:external_id
async fn recipe_details(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(external_id): Path<i64>,
) -> Result<Json<RecipeDetails>, ApiError> {
    Ok(Json(RecipeService::details(&state.spoonacular, external_id).await?))
}

/// POST /api/v1/recipes - Save a catalog recipe
async fn save_recipe(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<SaveRecipeRequest>,
) -> Result<(StatusCode, Json<Recipe>), ApiError> {
    let recipe =
        RecipeService::save(state.db(), &state.spoonacular, auth.user_id, req.external_id).await?;
    Ok((StatusCode::CREATED, Json(recipe)))
}

/// GET /api/v1/recipes - Saved recipes, newest first
async fn list_recipes(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<Recipe>>, ApiError> {
    Ok(Json(RecipeService::list(state.db(), auth.user_id).await?))
}

/// POST /api/v1/recipes/:id/like
async fn toggle_like(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<LikeResponse>, ApiError> {
    let id = parse_id(&id, "recipe")?;
    Ok(Json(RecipeService::toggle_like(state.db(), auth.user_id, id).await?))
}

/// DELETE /api/v1/recipes/:id
async fn delete_recipe(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_id(&id, "recipe")?;
    RecipeService::delete(state.db(), auth.user_id, id).await?;
    Ok(Json(serde_json::json!({"deleted": true})))
}
