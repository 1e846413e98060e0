//! Preference onboarding
//!
//! Users walk through intolerances, diets and cuisines in that order. Each
//! step toggles tags; advancing moves to the next step and saturates at
//! `complete`. Saved tags seed recipe searches.

use crate::error::ApiError;
use crate::repositories::{PreferencesRecord, PreferencesRepository, SavePreferences};
use pantry_tracker_shared::errors::TagError;
use pantry_tracker_shared::filters::{parse_tags, tag_names, toggle_in, FilterTag, TagCategory};
use pantry_tracker_shared::models::UserPreferences;
use pantry_tracker_shared::types::{PreferencesResponse, UpdatePreferencesRequest};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

pub struct PreferencesService;

fn from_record(record: PreferencesRecord) -> Result<UserPreferences, ApiError> {
    let corrupt = |e: TagError| ApiError::Internal(anyhow::anyhow!("Stored preference is invalid: {}", e));

    Ok(UserPreferences {
        user_id: record.user_id,
        intolerances: parse_tags(&record.intolerances).map_err(corrupt)?,
        diets: parse_tags(&record.diets).map_err(corrupt)?,
        cuisines: parse_tags(&record.cuisines).map_err(corrupt)?,
        onboarding_stage: record.onboarding_stage.parse().map_err(corrupt)?,
    })
}

fn to_save(prefs: &UserPreferences) -> SavePreferences {
    SavePreferences {
        intolerances: tag_names(&prefs.intolerances),
        diets: tag_names(&prefs.diets),
        cuisines: tag_names(&prefs.cuisines),
        onboarding_stage: prefs.onboarding_stage.as_str().to_string(),
    }
}

/// Toggle a saved tag; meal types are search-only and never saved
fn apply_toggle(prefs: &mut UserPreferences, tag: FilterTag) -> Result<bool, ApiError> {
    let selected = match tag {
        FilterTag::Intolerance(t) => toggle_in(&mut prefs.intolerances, t),
        FilterTag::Diet(t) => toggle_in(&mut prefs.diets, t),
        FilterTag::Cuisine(t) => toggle_in(&mut prefs.cuisines, t),
        FilterTag::MealType(_) => {
            return Err(ApiError::Validation(
                "Meal types are not saved preferences".to_string(),
            ))
        }
    };
    Ok(selected)
}

pub fn to_response(prefs: &UserPreferences) -> PreferencesResponse {
    PreferencesResponse {
        intolerances: tag_names(&prefs.intolerances),
        diets: tag_names(&prefs.diets),
        cuisines: tag_names(&prefs.cuisines),
        onboarding_stage: prefs.onboarding_stage,
    }
}

impl PreferencesService {
    /// Saved preferences, or empty ones at the first onboarding stage
    pub async fn get(pool: &PgPool, user_id: Uuid) -> Result<UserPreferences, ApiError> {
        match PreferencesRepository::find(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
        {
            Some(record) => from_record(record),
            None => Ok(UserPreferences {
                user_id,
                ..Default::default()
            }),
        }
    }

    /// Read-modify-write under a row lock so concurrent edits serialize
    async fn update<T>(
        pool: &PgPool,
        user_id: Uuid,
        change: impl FnOnce(&mut UserPreferences) -> Result<T, ApiError>,
    ) -> Result<(T, UserPreferences), ApiError> {
        let mut tx = pool.begin().await.map_err(|e| ApiError::Internal(e.into()))?;

        let record = PreferencesRepository::lock(&mut *tx, user_id)
            .await
            .map_err(ApiError::Internal)?;
        let mut prefs = from_record(record)?;
        let outcome = change(&mut prefs)?;

        let record = PreferencesRepository::upsert(&mut *tx, user_id, to_save(&prefs))
            .await
            .map_err(ApiError::Internal)?;
        tx.commit().await.map_err(|e| ApiError::Internal(e.into()))?;

        Ok((outcome, from_record(record)?))
    }

    /// Toggle one tag; returns whether it is selected afterwards
    pub async fn toggle(
        pool: &PgPool,
        user_id: Uuid,
        category: TagCategory,
        tag: &str,
    ) -> Result<(bool, UserPreferences), ApiError> {
        let tag = FilterTag::parse(category, tag)?;
        Self::update(pool, user_id, |prefs| apply_toggle(prefs, tag)).await
    }

    /// Replace every saved tag, keeping the onboarding stage
    pub async fn replace(
        pool: &PgPool,
        user_id: Uuid,
        request: UpdatePreferencesRequest,
    ) -> Result<UserPreferences, ApiError> {
        let intolerances = parse_tags(&request.intolerances)?;
        let diets = parse_tags(&request.diets)?;
        let cuisines = parse_tags(&request.cuisines)?;

        let ((), prefs) = Self::update(pool, user_id, |prefs| {
            prefs.intolerances = intolerances;
            prefs.diets = diets;
            prefs.cuisines = cuisines;
            Ok(())
        })
        .await?;
        Ok(prefs)
    }

    /// Move to the next onboarding stage
    pub async fn advance(pool: &PgPool, user_id: Uuid) -> Result<UserPreferences, ApiError> {
        let (previous, prefs) = Self::update(pool, user_id, |prefs| {
            let previous = prefs.onboarding_stage;
            prefs.onboarding_stage = previous.advance();
            Ok(previous)
        })
        .await?;

        info!(
            user_id = %user_id,
            from = previous.as_str(),
            to = prefs.onboarding_stage.as_str(),
            "Onboarding advanced"
        );
        Ok(prefs)
    }
}
