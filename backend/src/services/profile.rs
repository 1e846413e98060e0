//! Profile screen: counts, liked items and usage history

use crate::error::ApiError;
use crate::repositories::{ProductRepository, RecipeRepository};
use crate::services::preferences::PreferencesService;
use crate::services::product::ProductService;
use crate::services::recipe::RecipeService;
use crate::services::user::UserService;
use pantry_tracker_shared::types::{LikedItemsResponse, ProfileSummary, UsedItemsResponse};
use sqlx::PgPool;
use uuid::Uuid;

pub struct ProfileService;

impl ProfileService {
    pub async fn summary(pool: &PgPool, user_id: Uuid) -> Result<ProfileSummary, ApiError> {
        let (profile, prefs, product_counts, recipe_counts) = tokio::join!(
            UserService::get_profile(pool, user_id),
            PreferencesService::get(pool, user_id),
            ProductRepository::counts(pool, user_id),
            RecipeRepository::counts(pool, user_id),
        );
        let product_counts = product_counts.map_err(ApiError::Internal)?;
        let recipe_counts = recipe_counts.map_err(ApiError::Internal)?;

        Ok(ProfileSummary {
            profile: profile?,
            active_products: product_counts.active,
            used_products: product_counts.used,
            liked_products: product_counts.liked,
            saved_recipes: recipe_counts.saved,
            liked_recipes: recipe_counts.liked,
            onboarding_stage: prefs?.onboarding_stage,
        })
    }

    pub async fn liked(pool: &PgPool, user_id: Uuid) -> Result<LikedItemsResponse, ApiError> {
        let (products, recipes) = tokio::join!(
            ProductService::liked(pool, user_id),
            RecipeService::liked(pool, user_id),
        );

        Ok(LikedItemsResponse {
            products: products?,
            recipes: recipes?,
        })
    }

    pub async fn used(pool: &PgPool, user_id: Uuid) -> Result<UsedItemsResponse, ApiError> {
        Ok(UsedItemsResponse {
            products: ProductService::used(pool, user_id).await?,
        })
    }
}
