//! Onboarding preference storage

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

/// Preference row; tags are stored by wire name
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PreferencesRecord {
    pub user_id: Uuid,
    pub intolerances: Vec<String>,
    pub diets: Vec<String>,
    pub cuisines: Vec<String>,
    pub onboarding_stage: String,
    pub updated_at: DateTime<Utc>,
}

/// Values written by an upsert
#[derive(Debug, Clone)]
pub struct SavePreferences {
    pub intolerances: Vec<String>,
    pub diets: Vec<String>,
    pub cuisines: Vec<String>,
    pub onboarding_stage: String,
}

pub struct PreferencesRepository;

impl PreferencesRepository {
    pub async fn find(pool: &PgPool, user_id: Uuid) -> Result<Option<PreferencesRecord>> {
        let record = sqlx::query_as::<_, PreferencesRecord>(
            r#"
            SELECT user_id, intolerances, diets, cuisines, onboarding_stage, updated_at
            FROM user_preferences
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Ensure the row exists and lock it for the rest of the transaction
    pub async fn lock(conn: &mut PgConnection, user_id: Uuid) -> Result<PreferencesRecord> {
        sqlx::query(
            r#"
            INSERT INTO user_preferences (user_id)
            VALUES ($1)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .execute(&mut *conn)
        .await?;

        let record = sqlx::query_as::<_, PreferencesRecord>(
            r#"
            SELECT user_id, intolerances, diets, cuisines, onboarding_stage, updated_at
            FROM user_preferences
            WHERE user_id = $1
            FOR UPDATE
            "#,
        )
        .bind(user_id)
        .fetch_one(&mut *conn)
        .await?;

        Ok(record)
    }

    pub async fn upsert(
        conn: &mut PgConnection,
        user_id: Uuid,
        input: SavePreferences,
    ) -> Result<PreferencesRecord> {
        let record = sqlx::query_as::<_, PreferencesRecord>(
            r#"
            INSERT INTO user_preferences (user_id, intolerances, diets, cuisines, onboarding_stage)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id) DO UPDATE SET
                intolerances = EXCLUDED.intolerances,
                diets = EXCLUDED.diets,
                cuisines = EXCLUDED.cuisines,
                onboarding_stage = EXCLUDED.onboarding_stage,
                updated_at = NOW()
            RETURNING user_id, intolerances, diets, cuisines, onboarding_stage, updated_at
            "#,
        )
        .bind(user_id)
        .bind(&input.intolerances)
        .bind(&input.diets)
        .bind(&input.cuisines)
        .bind(&input.onboarding_stage)
        .fetch_one(conn)
        .await?;

        Ok(record)
    }
}
