//! Saved recipe repository

use anyhow::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

const RECIPE_COLUMNS: &str = "id, user_id, external_id, title, image_url, source_url, \
     ready_in_minutes, servings, ingredients, steps, vegetarian, vegan, gluten_free, dairy_free, \
     very_healthy, health_score, catalog_score, liked, saved_at";

/// Instruction step as stored in the `steps` JSONB column
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct StoredStep {
    pub number: i32,
    pub step: String,
}

/// Recipe row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RecipeRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub external_id: i64,
    pub title: String,
    pub image_url: Option<String>,
    pub source_url: Option<String>,
    pub ready_in_minutes: Option<i32>,
    pub servings: Option<i32>,
    pub ingredients: Vec<String>,
    pub steps: Json<Vec<StoredStep>>,
    pub vegetarian: bool,
    pub vegan: bool,
    pub gluten_free: bool,
    pub dairy_free: bool,
    pub very_healthy: bool,
    pub health_score: Option<Decimal>,
    pub catalog_score: Option<Decimal>,
    pub liked: bool,
    pub saved_at: DateTime<Utc>,
}

/// Input for saving a recipe
#[derive(Debug, Clone)]
pub struct SaveRecipe {
    pub user_id: Uuid,
    pub external_id: i64,
    pub title: String,
    pub image_url: Option<String>,
    pub source_url: Option<String>,
    pub ready_in_minutes: Option<i32>,
    pub servings: Option<i32>,
    pub ingredients: Vec<String>,
    pub steps: Vec<StoredStep>,
    pub vegetarian: bool,
    pub vegan: bool,
    pub gluten_free: bool,
    pub dairy_free: bool,
    pub very_healthy: bool,
    pub health_score: Option<Decimal>,
    pub catalog_score: Option<Decimal>,
}

/// Per-user recipe counts
#[derive(Debug, Clone, Default, sqlx::FromRow)]
pub struct RecipeCounts {
    pub saved: i64,
    pub liked: i64,
}

pub struct RecipeRepository;

impl RecipeRepository {
    /// Insert or refresh a saved recipe; the liked flag survives a re-save
    pub async fn upsert(pool: &PgPool, input: SaveRecipe) -> Result<RecipeRecord> {
        let sql = format!(
            r#"
            INSERT INTO recipes (user_id, external_id, title, image_url, source_url,
                                 ready_in_minutes, servings, ingredients, steps, vegetarian,
                                 vegan, gluten_free, dairy_free, very_healthy, health_score,
                                 catalog_score)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            ON CONFLICT (user_id, external_id) DO UPDATE SET
                title = EXCLUDED.title,
                image_url = EXCLUDED.image_url,
                source_url = EXCLUDED.source_url,
                ready_in_minutes = EXCLUDED.ready_in_minutes,
                servings = EXCLUDED.servings,
                ingredients = EXCLUDED.ingredients,
                steps = EXCLUDED.steps,
                vegetarian = EXCLUDED.vegetarian,
                vegan = EXCLUDED.vegan,
                gluten_free = EXCLUDED.gluten_free,
                dairy_free = EXCLUDED.dairy_free,
                very_healthy = EXCLUDED.very_healthy,
                health_score = EXCLUDED.health_score,
                catalog_score = EXCLUDED.catalog_score
            RETURNING {}
            "#,
            RECIPE_COLUMNS
        );

        let record = sqlx::query_as::<_, RecipeRecord>(&sql)
            .bind(input.user_id)
            .bind(input.external_id)
            .bind(&input.title)
            .bind(&input.image_url)
            .bind(&input.source_url)
            .bind(input.ready_in_minutes)
            .bind(input.servings)
            .bind(&input.ingredients)
            .bind(Json(&input.steps))
            .bind(input.vegetarian)
            .bind(input.vegan)
            .bind(input.gluten_free)
            .bind(input.dairy_free)
            .bind(input.very_healthy)
            .bind(input.health_score)
            .bind(input.catalog_score)
            .fetch_one(pool)
            .await?;

        Ok(record)
    }

    /// Saved recipes, newest first
    pub async fn list(pool: &PgPool, user_id: Uuid) -> Result<Vec<RecipeRecord>> {
        let sql = format!(
            "SELECT {} FROM recipes WHERE user_id = $1 ORDER BY saved_at DESC",
            RECIPE_COLUMNS
        );

        let records = sqlx::query_as::<_, RecipeRecord>(&sql)
            .bind(user_id)
            .fetch_all(pool)
            .await?;

        Ok(records)
    }

    pub async fn list_liked(pool: &PgPool, user_id: Uuid) -> Result<Vec<RecipeRecord>> {
        let sql = format!(
            "SELECT {} FROM recipes WHERE user_id = $1 AND liked ORDER BY title ASC",
            RECIPE_COLUMNS
        );

        let records = sqlx::query_as::<_, RecipeRecord>(&sql)
            .bind(user_id)
            .fetch_all(pool)
            .await?;

        Ok(records)
    }

    pub async fn toggle_liked(
        pool: &PgPool,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<RecipeRecord>> {
        let sql = format!(
            r#"
            UPDATE recipes SET liked = NOT liked
            WHERE id = $1 AND user_id = $2
            RETURNING {}
            "#,
            RECIPE_COLUMNS
        );

        let record = sqlx::query_as::<_, RecipeRecord>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

        Ok(record)
    }

    pub async fn delete(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn counts(pool: &PgPool, user_id: Uuid) -> Result<RecipeCounts> {
        let counts = sqlx::query_as::<_, RecipeCounts>(
            r#"
            SELECT COUNT(*) AS saved, COUNT(*) FILTER (WHERE liked) AS liked
            FROM recipes
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(counts)
    }
}
