//! Data export
//!
//! - JSON: profile, preferences, every product and saved recipe
//! - CSV: the product inventory, one row per product

use crate::error::ApiError;
use crate::repositories::{ProductRepository, RecipeRepository};
use crate::services::preferences::{self, PreferencesService};
use crate::services::product::to_products;
use crate::services::recipe::to_recipe;
use crate::services::user::UserService;
use chrono::{DateTime, NaiveDate, Utc};
use pantry_tracker_shared::expiration::classify;
use pantry_tracker_shared::models::{Product, Recipe};
use pantry_tracker_shared::types::{PreferencesResponse, UserProfile};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

pub const EXPORT_VERSION: &str = "1.0";

/// Complete user data export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDataExport {
    pub export_version: String,
    pub exported_at: DateTime<Utc>,
    pub profile: UserProfile,
    pub preferences: PreferencesResponse,
    pub products: Vec<Product>,
    pub recipes: Vec<Recipe>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductCsvRow {
    pub title: String,
    pub brand: String,
    pub barcode: String,
    pub expiration_date: NaiveDate,
    pub days_remaining: i64,
    pub status: String,
    pub used: bool,
    pub liked: bool,
    pub source: String,
}

fn csv_row(product: Product, today: NaiveDate) -> ProductCsvRow {
    let status = classify(product.expiration_date, today);
    ProductCsvRow {
        title: product.title,
        brand: product.brand.unwrap_or_default(),
        barcode: product.barcode.unwrap_or_default(),
        expiration_date: product.expiration_date,
        days_remaining: status.days_remaining,
        status: status.message,
        used: product.used,
        liked: product.liked,
        source: product.source.as_str().to_string(),
    }
}

pub struct ExportService;

impl ExportService {
    pub async fn export_json(pool: &PgPool, user_id: Uuid) -> Result<UserDataExport, ApiError> {
        let (profile, prefs, products, recipes) = tokio::join!(
            UserService::get_profile(pool, user_id),
            PreferencesService::get(pool, user_id),
            ProductRepository::list_all(pool, user_id),
            RecipeRepository::list(pool, user_id),
        );

        Ok(UserDataExport {
            export_version: EXPORT_VERSION.to_string(),
            exported_at: Utc::now(),
            profile: profile?,
            preferences: preferences::to_response(&prefs?),
            products: to_products(products.map_err(ApiError::Internal)?)?,
            recipes: recipes
                .map_err(ApiError::Internal)?
                .into_iter()
                .map(to_recipe)
                .collect(),
        })
    }

    /// Inventory as CSV with statuses computed against `today`
    pub async fn export_products_csv(
        pool: &PgPool,
        user_id: Uuid,
        today: NaiveDate,
    ) -> Result<String, ApiError> {
        let products = to_products(
            ProductRepository::list_all(pool, user_id)
                .await
                .map_err(ApiError::Internal)?,
        )?;

        let rows: Vec<ProductCsvRow> = products.into_iter().map(|p| csv_row(p, today)).collect();
        Self::to_csv(&rows)
    }

    fn to_csv<T: Serialize>(data: &[T]) -> Result<String, ApiError> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record)
                .map_err(|e| ApiError::Internal(anyhow::anyhow!("CSV serialization error: {}", e)))?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| ApiError::Internal(anyhow::anyhow!("CSV flush error: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| ApiError::Internal(anyhow::anyhow!("CSV encoding error: {}", e)))
    }
}
