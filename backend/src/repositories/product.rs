//! Grocery product repository

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

const PRODUCT_COLUMNS: &str = "id, user_id, barcode, title, brand, description, image_url, \
     image_urls, expiration_date, liked, used, used_at, source, external_id, created_at";

/// Product row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub barcode: Option<String>,
    pub title: String,
    pub brand: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub image_urls: Vec<String>,
    pub expiration_date: NaiveDate,
    pub liked: bool,
    pub used: bool,
    pub used_at: Option<DateTime<Utc>>,
    pub source: String,
    pub external_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for inserting a product
#[derive(Debug, Clone)]
pub struct CreateProduct {
    pub user_id: Uuid,
    pub barcode: Option<String>,
    pub title: String,
    pub brand: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub image_urls: Vec<String>,
    pub expiration_date: NaiveDate,
    pub source: String,
    pub external_id: Option<String>,
}

/// Per-user product counts
#[derive(Debug, Clone, Default, sqlx::FromRow)]
pub struct ProductCounts {
    pub active: i64,
    pub used: i64,
    pub liked: i64,
}

pub struct ProductRepository;

impl ProductRepository {
    pub async fn create(pool: &PgPool, input: CreateProduct) -> Result<ProductRecord> {
        let sql = format!(
            r#"
            INSERT INTO products (user_id, barcode, title, brand, description, image_url,
                                  image_urls, expiration_date, source, external_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        );

        let record = sqlx::query_as::<_, ProductRecord>(&sql)
            .bind(input.user_id)
            .bind(&input.barcode)
            .bind(&input.title)
            .bind(&input.brand)
            .bind(&input.description)
            .bind(&input.image_url)
            .bind(&input.image_urls)
            .bind(input.expiration_date)
            .bind(&input.source)
            .bind(&input.external_id)
            .fetch_one(pool)
            .await?;

        Ok(record)
    }

    pub async fn find_by_id(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<Option<ProductRecord>> {
        let sql = format!(
            "SELECT {} FROM products WHERE id = $1 AND user_id = $2",
            PRODUCT_COLUMNS
        );

        let record = sqlx::query_as::<_, ProductRecord>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

        Ok(record)
    }

    /// Products not yet used, soonest expiration first
    pub async fn list_active(pool: &PgPool, user_id: Uuid) -> Result<Vec<ProductRecord>> {
        let sql = format!(
            r#"
            SELECT {} FROM products
            WHERE user_id = $1 AND NOT used
            ORDER BY expiration_date ASC, title ASC
            "#,
            PRODUCT_COLUMNS
        );

        let records = sqlx::query_as::<_, ProductRecord>(&sql)
            .bind(user_id)
            .fetch_all(pool)
            .await?;

        Ok(records)
    }

    /// Used products, most recently used first
    pub async fn list_used(pool: &PgPool, user_id: Uuid) -> Result<Vec<ProductRecord>> {
        let sql = format!(
            r#"
            SELECT {} FROM products
            WHERE user_id = $1 AND used
            ORDER BY used_at DESC NULLS LAST, title ASC
            "#,
            PRODUCT_COLUMNS
        );

        let records = sqlx::query_as::<_, ProductRecord>(&sql)
            .bind(user_id)
            .fetch_all(pool)
            .await?;

        Ok(records)
    }

    pub async fn list_liked(pool: &PgPool, user_id: Uuid) -> Result<Vec<ProductRecord>> {
        let sql = format!(
            r#"
            SELECT {} FROM products
            WHERE user_id = $1 AND liked
            ORDER BY title ASC
            "#,
            PRODUCT_COLUMNS
        );

        let records = sqlx::query_as::<_, ProductRecord>(&sql)
            .bind(user_id)
            .fetch_all(pool)
            .await?;

        Ok(records)
    }

    /// Every product the user owns, for export
    pub async fn list_all(pool: &PgPool, user_id: Uuid) -> Result<Vec<ProductRecord>> {
        let sql = format!(
            r#"
            SELECT {} FROM products
            WHERE user_id = $1
            ORDER BY expiration_date ASC, title ASC
            "#,
            PRODUCT_COLUMNS
        );

        let records = sqlx::query_as::<_, ProductRecord>(&sql)
            .bind(user_id)
            .fetch_all(pool)
            .await?;

        Ok(records)
    }

    /// Mark used; a product already used keeps its original timestamp
    pub async fn mark_used(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<Option<ProductRecord>> {
        let sql = format!(
            r#"
            UPDATE products SET
                used = TRUE,
                used_at = COALESCE(used_at, NOW()),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        );

        let record = sqlx::query_as::<_, ProductRecord>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

        Ok(record)
    }

    pub async fn toggle_liked(
        pool: &PgPool,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<ProductRecord>> {
        let sql = format!(
            r#"
            UPDATE products SET liked = NOT liked, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        );

        let record = sqlx::query_as::<_, ProductRecord>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

        Ok(record)
    }

    pub async fn delete(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn counts(pool: &PgPool, user_id: Uuid) -> Result<ProductCounts> {
        let counts = sqlx::query_as::<_, ProductCounts>(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE NOT used) AS active,
                COUNT(*) FILTER (WHERE used) AS used,
                COUNT(*) FILTER (WHERE liked) AS liked
            FROM products
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(counts)
    }
}
