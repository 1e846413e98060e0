//! Recipe discovery and the saved recipe collection

use crate::error::ApiError;
use crate::external::SpoonacularClient;
use crate::repositories::{RecipeRecord, RecipeRepository, SaveRecipe, StoredStep};
use crate::services::preferences::PreferencesService;
use pantry_tracker_shared::filters::RecipeFilter;
use pantry_tracker_shared::models::{DietaryFlags, Recipe, RecipeDetails, RecipeStep, UserPreferences};
use pantry_tracker_shared::types::{LikeResponse, RecipeSearchRequest, RecipeSearchResponse};
use pantry_tracker_shared::validation::{check_field, validate_search_number};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

pub struct RecipeService;

/// Filter actually sent to the catalog
///
/// Without an explicit filter the saved preferences are used. An explicit
/// filter still carries the saved intolerances.
pub fn effective_filter(explicit: Option<RecipeFilter>, saved: &UserPreferences) -> RecipeFilter {
    match explicit {
        None => saved.to_filter(),
        Some(mut filter) => {
            filter
                .intolerances
                .extend(saved.intolerances.iter().copied());
            filter
        }
    }
}

fn score_to_decimal(score: Option<f64>) -> Option<Decimal> {
    score.and_then(Decimal::from_f64).map(|d| d.round_dp(2))
}

fn save_input(user_id: Uuid, details: RecipeDetails) -> SaveRecipe {
    SaveRecipe {
        user_id,
        external_id: details.external_id,
        title: details.title,
        image_url: details.image_url,
        source_url: details.source_url,
        ready_in_minutes: details.ready_in_minutes,
        servings: details.servings,
        ingredients: details.ingredients,
        steps: details
            .steps
            .into_iter()
            .map(|s| StoredStep {
                number: s.number,
                step: s.step,
            })
            .collect(),
        vegetarian: details.dietary.vegetarian,
        vegan: details.dietary.vegan,
        gluten_free: details.dietary.gluten_free,
        dairy_free: details.dietary.dairy_free,
        very_healthy: details.dietary.very_healthy,
        health_score: score_to_decimal(details.health_score),
        catalog_score: score_to_decimal(details.catalog_score),
    }
}

pub(crate) fn to_recipe(record: RecipeRecord) -> Recipe {
    Recipe {
        id: record.id,
        user_id: record.user_id,
        liked: record.liked,
        saved_at: record.saved_at,
        details: RecipeDetails {
            external_id: record.external_id,
            title: record.title,
            image_url: record.image_url,
            source_url: record.source_url,
            ready_in_minutes: record.ready_in_minutes,
            servings: record.servings,
            ingredients: record.ingredients,
            steps: record
                .steps
                .0
                .into_iter()
                .map(|s| RecipeStep {
                    number: s.number,
                    step: s.step,
                })
                .collect(),
            dietary: DietaryFlags {
                vegetarian: record.vegetarian,
                vegan: record.vegan,
                gluten_free: record.gluten_free,
                dairy_free: record.dairy_free,
                very_healthy: record.very_healthy,
            },
            health_score: record.health_score.and_then(|d| d.to_f64()),
            catalog_score: record.catalog_score.and_then(|d| d.to_f64()),
        },
    }
}

impl RecipeService {
    /// Filtered search against the catalog
    pub async fn search(
        pool: &PgPool,
        spoonacular: &SpoonacularClient,
        user_id: Uuid,
        request: RecipeSearchRequest,
    ) -> Result<RecipeSearchResponse, ApiError> {
        if let Some(number) = request.number {
            check_field("number", validate_search_number(number))?;
        }

        let saved = PreferencesService::get(pool, user_id).await?;
        let filter = effective_filter(request.filter, &saved);

        let page = spoonacular
            .search_recipes(request.query.as_deref(), &filter, request.number)
            .await?;

        info!(
            user_id = %user_id,
            results = page.results.len(),
            total = page.total_results,
            "Recipe search"
        );
        Ok(RecipeSearchResponse {
            applied_filter: filter,
            total_results: page.total_results,
            results: page.results,
        })
    }

    pub async fn details(
        spoonacular: &SpoonacularClient,
        external_id: i64,
    ) -> Result<RecipeDetails, ApiError> {
        Ok(spoonacular.recipe_details(external_id).await?)
    }

    /// Fetch a catalog recipe and save it to the user's collection
    pub async fn save(
        pool: &PgPool,
        spoonacular: &SpoonacularClient,
        user_id: Uuid,
        external_id: i64,
    ) -> Result<Recipe, ApiError> {
        let details = spoonacular.recipe_details(external_id).await?;
        let record = RecipeRepository::upsert(pool, save_input(user_id, details))
            .await
            .map_err(ApiError::Internal)?;

        info!(user_id = %user_id, recipe_id = %record.id, external_id, "Recipe saved");
        metrics::counter!("recipes_saved_total").increment(1);
        Ok(to_recipe(record))
    }

    pub async fn list(pool: &PgPool, user_id: Uuid) -> Result<Vec<Recipe>, ApiError> {
        let records = RecipeRepository::list(pool, user_id)
            .await
            .map_err(ApiError::Internal)?;
        Ok(records.into_iter().map(to_recipe).collect())
    }

    pub async fn liked(pool: &PgPool, user_id: Uuid) -> Result<Vec<Recipe>, ApiError> {
        let records = RecipeRepository::list_liked(pool, user_id)
            .await
            .map_err(ApiError::Internal)?;
        Ok(records.into_iter().map(to_recipe).collect())
    }

    pub async fn toggle_like(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<LikeResponse, ApiError> {
        let record = RecipeRepository::toggle_liked(pool, user_id, id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Recipe not found".to_string()))?;

        Ok(LikeResponse {
            id: record.id.to_string(),
            liked: record.liked,
        })
    }

    pub async fn delete(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<(), ApiError> {
        if !RecipeRepository::delete(pool, user_id, id)
            .await
            .map_err(ApiError::Internal)?
        {
            return Err(ApiError::NotFound("Recipe not found".to_string()));
        }
        Ok(())
    }
}
