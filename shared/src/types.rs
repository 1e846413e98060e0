//! API request and response types

use crate::expiration::{ExpirationStatus, Reminder};
use crate::filters::{OnboardingStage, RecipeFilter, TagCategory};
use crate::models::{CatalogProduct, GroupedProducts, Product, ProductSource, Recipe, RecipeSummary};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Auth
// ============================================================================

/// Authentication tokens response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Registration request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

/// Email verification request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyEmailRequest {
    pub token: String,
}

/// User profile response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Products
// ============================================================================

/// Manually add a product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProductRequest {
    pub title: String,
    pub expiration_date: NaiveDate,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub image_urls: Vec<String>,
}

/// Add a product by looking its barcode up in a catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddByBarcodeRequest {
    pub barcode: String,
    pub expiration_date: NaiveDate,
    #[serde(default = "default_lookup_source")]
    pub source: ProductSource,
}

fn default_lookup_source() -> ProductSource {
    ProductSource::Spoonacular
}

/// Catalog lookup query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupQuery {
    #[serde(default = "default_lookup_source")]
    pub source: ProductSource,
}

/// Barcode lookup preview
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupResponse {
    pub product: CatalogProduct,
}

/// Query carrying the client's notion of today
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TodayQuery {
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

/// Inventory grouped by expiration date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryResponse {
    pub today: NaiveDate,
    pub total_products: usize,
    pub groups: Vec<GroupedProducts>,
}

/// A product together with its expiration status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductResponse {
    #[serde(flatten)]
    pub product: Product,
    pub status: ExpirationStatus,
}

/// Reminder schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemindersResponse {
    pub generated_at: DateTime<Utc>,
    pub reminders: Vec<Reminder>,
}

// ============================================================================
// Preferences
// ============================================================================

/// Toggle one preference tag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TogglePreferenceRequest {
    pub category: TagCategory,
    pub tag: String,
}

/// Replace all preference tags
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePreferencesRequest {
    #[serde(default)]
    pub intolerances: Vec<String>,
    #[serde(default)]
    pub diets: Vec<String>,
    #[serde(default)]
    pub cuisines: Vec<String>,
}

/// Saved preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferencesResponse {
    pub intolerances: Vec<String>,
    pub diets: Vec<String>,
    pub cuisines: Vec<String>,
    pub onboarding_stage: OnboardingStage,
}

/// Result of a toggle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TogglePreferenceResponse {
    pub selected: bool,
    pub preferences: PreferencesResponse,
}

// ============================================================================
// Recipes
// ============================================================================

/// Filtered recipe search
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipeSearchRequest {
    #[serde(default)]
    pub query: Option<String>,
    /// Explicit filter; saved preferences are used when absent
    #[serde(default)]
    pub filter: Option<RecipeFilter>,
    #[serde(default)]
    pub number: Option<u32>,
}

/// Recipe search results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeSearchResponse {
    pub applied_filter: RecipeFilter,
    pub total_results: u64,
    pub results: Vec<RecipeSummary>,
}

/// Save a catalog recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveRecipeRequest {
    pub external_id: i64,
}

/// Toggle result for liked flags
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeResponse {
    pub id: String,
    pub liked: bool,
}

// ============================================================================
// Profile
// ============================================================================

/// Counts shown on the profile screen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub profile: UserProfile,
    pub active_products: i64,
    pub used_products: i64,
    pub liked_products: i64,
    pub saved_recipes: i64,
    pub liked_recipes: i64,
    pub onboarding_stage: OnboardingStage,
}

/// Liked products and recipes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikedItemsResponse {
    pub products: Vec<Product>,
    pub recipes: Vec<Recipe>,
}

/// Used products, most recently used first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsedItemsResponse {
    pub products: Vec<Product>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_barcode_request_defaults_to_spoonacular() {
        let req: AddByBarcodeRequest =
            serde_json::from_str(r#"{"barcode": "041631000564", "expiration_date": "2024-02-01"}"#)
                .unwrap();
        assert_eq!(req.source, ProductSource::Spoonacular);
    }

    #[test]
    fn test_toggle_request_category_names() {
        let req: TogglePreferenceRequest =
            serde_json::from_str(r#"{"category": "meal_type", "tag": "dessert"}"#).unwrap();
        assert_eq!(req.category, TagCategory::MealType);
    }

    #[test]
    fn test_search_request_all_optional() {
        let req: RecipeSearchRequest = serde_json::from_str("{}").unwrap();
        assert!(req.filter.is_none());
        assert!(req.query.is_none());
    }
}
