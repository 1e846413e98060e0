//! Grocery inventory
//!
//! Products are added by hand or from a catalog barcode lookup, listed
//! grouped by expiration date and eventually marked used or deleted. Every
//! status is computed against the caller's `today`.

use crate::config::ReminderConfig;
use crate::error::ApiError;
use crate::external::{OpenFoodFactsClient, SpoonacularClient};
use crate::repositories::{CreateProduct, ProductRecord, ProductRepository};
use chrono::{DateTime, NaiveDate, Utc};
use pantry_tracker_shared::expiration::{classify, group_by_expiration, reminder_schedule};
use pantry_tracker_shared::models::{CatalogProduct, Product, ProductSource};
use pantry_tracker_shared::types::{
    AddByBarcodeRequest, CreateProductRequest, InventoryResponse, LikeResponse, ProductResponse,
    RemindersResponse,
};
use pantry_tracker_shared::validation::{
    check_field, gtin_check_digit_valid, validate_barcode, validate_description,
    validate_expiration_date, validate_image_url, validate_title,
};
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

pub struct ProductService;

pub(crate) fn to_product(record: ProductRecord) -> Result<Product, ApiError> {
    let source: ProductSource = record
        .source
        .parse()
        .map_err(|e: String| ApiError::Internal(anyhow::anyhow!(e)))?;

    Ok(Product {
        id: record.id,
        user_id: record.user_id,
        barcode: record.barcode,
        title: record.title,
        brand: record.brand,
        description: record.description,
        image_url: record.image_url,
        image_urls: record.image_urls,
        expiration_date: record.expiration_date,
        liked: record.liked,
        used: record.used,
        used_at: record.used_at,
        source,
        external_id: record.external_id,
        created_at: record.created_at,
    })
}

pub(crate) fn to_products(records: Vec<ProductRecord>) -> Result<Vec<Product>, ApiError> {
    records.into_iter().map(to_product).collect()
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Validate a manual entry and turn it into an insert
fn manual_input(
    user_id: Uuid,
    request: CreateProductRequest,
    today: NaiveDate,
) -> Result<CreateProduct, ApiError> {
    let title = request.title.trim().to_string();
    check_field("title", validate_title(&title))?;
    check_field(
        "expiration_date",
        validate_expiration_date(request.expiration_date, today),
    )?;

    let barcode = trimmed(request.barcode);
    if let Some(barcode) = &barcode {
        check_field("barcode", validate_barcode(barcode))?;
    }
    let description = trimmed(request.description);
    if let Some(description) = &description {
        check_field("description", validate_description(description))?;
    }

    let image_url = trimmed(request.image_url);
    let image_urls: Vec<String> = request
        .image_urls
        .into_iter()
        .filter_map(|url| trimmed(Some(url)))
        .collect();
    for url in image_url.iter().chain(image_urls.iter()) {
        check_field("image_url", validate_image_url(url))?;
    }

    Ok(CreateProduct {
        user_id,
        barcode,
        title,
        brand: trimmed(request.brand),
        description,
        image_url: image_url.or_else(|| image_urls.first().cloned()),
        image_urls,
        expiration_date: request.expiration_date,
        source: ProductSource::Manual.as_str().to_string(),
        external_id: None,
    })
}

fn catalog_input(user_id: Uuid, product: CatalogProduct, expiration_date: NaiveDate) -> CreateProduct {
    CreateProduct {
        user_id,
        barcode: Some(product.barcode),
        title: product.title,
        brand: product.brand,
        description: product.description,
        image_url: product.image_url,
        image_urls: product.image_urls,
        expiration_date,
        source: product.source.as_str().to_string(),
        external_id: product.external_id,
    }
}

fn with_status(product: Product, today: NaiveDate) -> ProductResponse {
    let status = classify(product.expiration_date, today);
    ProductResponse { product, status }
}

impl ProductService {
    /// Add a product typed in by the user
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        request: CreateProductRequest,
        today: NaiveDate,
    ) -> Result<ProductResponse, ApiError> {
        let input = manual_input(user_id, request, today)?;
        let record = ProductRepository::create(pool, input)
            .await
            .map_err(ApiError::Internal)?;

        info!(user_id = %user_id, product_id = %record.id, "Product added manually");
        metrics::counter!("products_added_total", "source" => "manual").increment(1);
        Ok(with_status(to_product(record)?, today))
    }

    /// Look a barcode up in the chosen catalog without saving it
    pub async fn lookup(
        spoonacular: &SpoonacularClient,
        open_food_facts: &OpenFoodFactsClient,
        barcode: &str,
        source: ProductSource,
    ) -> Result<CatalogProduct, ApiError> {
        let barcode = barcode.trim();
        check_field("barcode", validate_barcode(barcode))?;
        if !gtin_check_digit_valid(barcode) {
            warn!(barcode = %barcode, "Barcode check digit mismatch; looking it up anyway");
        }

        let product = match source {
            ProductSource::Spoonacular => spoonacular.lookup_product(barcode).await?,
            ProductSource::OpenFoodFacts => open_food_facts.lookup_product(barcode).await?,
            ProductSource::Manual => {
                return Err(ApiError::BadRequest(
                    "Choose spoonacular or open_food_facts as the lookup source".to_string(),
                ))
            }
        };

        Ok(product)
    }

    /// Look a barcode up and add the result to the inventory
    pub async fn add_by_barcode(
        pool: &PgPool,
        spoonacular: &SpoonacularClient,
        open_food_facts: &OpenFoodFactsClient,
        user_id: Uuid,
        request: AddByBarcodeRequest,
        today: NaiveDate,
    ) -> Result<ProductResponse, ApiError> {
        check_field(
            "expiration_date",
            validate_expiration_date(request.expiration_date, today),
        )?;

        let catalog =
            Self::lookup(spoonacular, open_food_facts, &request.barcode, request.source).await?;
        let record = ProductRepository::create(
            pool,
            catalog_input(user_id, catalog, request.expiration_date),
        )
        .await
        .map_err(ApiError::Internal)?;

        info!(
            user_id = %user_id,
            product_id = %record.id,
            source = request.source.as_str(),
            "Product added from catalog"
        );
        metrics::counter!("products_added_total", "source" => request.source.as_str())
            .increment(1);
        Ok(with_status(to_product(record)?, today))
    }

    /// Unused products grouped by expiration date
    pub async fn inventory(
        pool: &PgPool,
        user_id: Uuid,
        today: NaiveDate,
    ) -> Result<InventoryResponse, ApiError> {
        let products = to_products(
            ProductRepository::list_active(pool, user_id)
                .await
                .map_err(ApiError::Internal)?,
        )?;

        Ok(InventoryResponse {
            today,
            total_products: products.len(),
            groups: group_by_expiration(products, today),
        })
    }

    pub async fn get(
        pool: &PgPool,
        user_id: Uuid,
        id: Uuid,
        today: NaiveDate,
    ) -> Result<ProductResponse, ApiError> {
        let record = ProductRepository::find_by_id(pool, user_id, id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;

        Ok(with_status(to_product(record)?, today))
    }

    pub async fn mark_used(
        pool: &PgPool,
        user_id: Uuid,
        id: Uuid,
        today: NaiveDate,
    ) -> Result<ProductResponse, ApiError> {
        let record = ProductRepository::mark_used(pool, user_id, id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;

        let product = to_product(record)?;
        if product.expiration_date < today {
            warn!(product_id = %id, "Expired product marked as used");
        }
        metrics::counter!("products_used_total").increment(1);
        Ok(with_status(product, today))
    }

    pub async fn toggle_like(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<LikeResponse, ApiError> {
        let record = ProductRepository::toggle_liked(pool, user_id, id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;

        Ok(LikeResponse {
            id: record.id.to_string(),
            liked: record.liked,
        })
    }

    pub async fn delete(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<(), ApiError> {
        if !ProductRepository::delete(pool, user_id, id)
            .await
            .map_err(ApiError::Internal)?
        {
            return Err(ApiError::NotFound("Product not found".to_string()));
        }

        info!(user_id = %user_id, product_id = %id, "Product deleted");
        metrics::counter!("products_deleted_total").increment(1);
        Ok(())
    }

    /// Reminder schedule for every unused product
    pub async fn reminders(
        pool: &PgPool,
        user_id: Uuid,
        now: DateTime<Utc>,
        config: &ReminderConfig,
    ) -> Result<RemindersResponse, ApiError> {
        let products = to_products(
            ProductRepository::list_active(pool, user_id)
                .await
                .map_err(ApiError::Internal)?,
        )?;

        Ok(RemindersResponse {
            generated_at: now,
            reminders: reminder_schedule(&products, now, &config.lead_days, config.hour),
        })
    }

    pub async fn liked(pool: &PgPool, user_id: Uuid) -> Result<Vec<Product>, ApiError> {
        to_products(
            ProductRepository::list_liked(pool, user_id)
                .await
                .map_err(ApiError::Internal)?,
        )
    }

    pub async fn used(pool: &PgPool, user_id: Uuid) -> Result<Vec<Product>, ApiError> {
        to_products(
            ProductRepository::list_used(pool, user_id)
                .await
                .map_err(ApiError::Internal)?,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn request(title: &str) -> CreateProductRequest {
        CreateProductRequest {
            title: title.to_string(),
            expiration_date: date(2024, 1, 12),
            barcode: None,
            brand: None,
            description: None,
            image_url: None,
            image_urls: vec![],
        }
    }

    #[test]
    fn test_manual_input_trims_and_tags_source() {
        let mut req = request("  Greek yogurt ");
        req.brand = Some("  ".to_string());
        req.image_urls = vec!["https://img.example/y.jpg".to_string()];

        let input = manual_input(Uuid::new_v4(), req, date(2024, 1, 10)).unwrap();
        assert_eq!(input.title, "Greek yogurt");
        assert_eq!(input.brand, None);
        assert_eq!(input.source, "manual");
        assert_eq!(input.image_url.as_deref(), Some("https://img.example/y.jpg"));
    }

    #[rstest]
    #[case::empty_title(request("   "))]
    #[case::bad_barcode(CreateProductRequest { barcode: Some("12ab".to_string()), ..request("Milk") })]
    #[case::bad_image(CreateProductRequest { image_url: Some("ftp://x".to_string()), ..request("Milk") })]
    fn test_manual_input_rejects(#[case] req: CreateProductRequest) {
        let result = manual_input(Uuid::new_v4(), req, date(2024, 1, 10));
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[test]
    fn test_catalog_input_keeps_source() {
        let catalog = CatalogProduct {
            source: ProductSource::OpenFoodFacts,
            external_id: Some("3017620422003".to_string()),
            barcode: "3017620422003".to_string(),
            title: "Nutella".to_string(),
            brand: Some("Ferrero".to_string()),
            description: None,
            image_url: None,
            image_urls: vec![],
        };

        let input = catalog_input(Uuid::new_v4(), catalog, date(2024, 6, 1));
        assert_eq!(input.source, "open_food_facts");
        assert_eq!(input.barcode.as_deref(), Some("3017620422003"));
        assert_eq!(input.expiration_date, date(2024, 6, 1));
    }

    #[test]
    fn test_record_with_unknown_source_is_internal_error() {
        let record = ProductRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            barcode: None,
            title: "Milk".to_string(),
            brand: None,
            description: None,
            image_url: None,
            image_urls: vec![],
            expiration_date: date(2024, 1, 10),
            liked: false,
            used: false,
            used_at: None,
            source: "walmart".to_string(),
            external_id: None,
            created_at: Utc::now(),
        };
        assert!(matches!(to_product(record), Err(ApiError::Internal(_))));
    }

    #[test]
    fn test_with_status_uses_today() {
        let record = ProductRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            barcode: None,
            title: "Bread".to_string(),
            brand: None,
            description: None,
            image_url: None,
            image_urls: vec![],
            expiration_date: date(2024, 1, 10),
            liked: false,
            used: false,
            used_at: None,
            source: "manual".to_string(),
            external_id: None,
            created_at: Utc::now(),
        };

        let response = with_status(to_product(record).unwrap(), date(2024, 1, 10));
        assert_eq!(response.status.message, "Expires today");
        assert_eq!(response.status.color, "orange");
    }
}
