//! Data models for the Pantry Tracker application

use crate::expiration::ExpirationStatus;
use crate::filters::{Cuisine, Diet, Intolerance, OnboardingStage, RecipeFilter};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Where a product's data came from
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ProductSource {
    #[default]
    Manual,
    Spoonacular,
    OpenFoodFacts,
}

impl ProductSource {
    pub fn as_str(self) -> &'static str {
        match self {
            ProductSource::Manual => "manual",
            ProductSource::Spoonacular => "spoonacular",
            ProductSource::OpenFoodFacts => "open_food_facts",
        }
    }
}

impl fmt::Display for ProductSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manual" => Ok(ProductSource::Manual),
            "spoonacular" => Ok(ProductSource::Spoonacular),
            "open_food_facts" | "offa" | "off" => Ok(ProductSource::OpenFoodFacts),
            other => Err(format!("Unknown product source: {}", other)),
        }
    }
}

/// A grocery product in a user's inventory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: Uuid,
    pub user_id: Uuid,
    pub barcode: Option<String>,
    pub title: String,
    pub brand: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub image_urls: Vec<String>,
    pub expiration_date: NaiveDate,
    pub liked: bool,
    pub used: bool,
    pub used_at: Option<DateTime<Utc>>,
    pub source: ProductSource,
    pub external_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Products sharing one expiration date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupedProducts {
    pub date: NaiveDate,
    pub user_id: Uuid,
    pub status: ExpirationStatus,
    pub products: Vec<Product>,
}

/// Product data returned by a catalog lookup, before it is owned by a user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogProduct {
    pub source: ProductSource,
    pub external_id: Option<String>,
    pub barcode: String,
    pub title: String,
    pub brand: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub image_urls: Vec<String>,
}

/// Dietary flags reported for a recipe
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DietaryFlags {
    pub vegetarian: bool,
    pub vegan: bool,
    pub gluten_free: bool,
    pub dairy_free: bool,
    pub very_healthy: bool,
}

/// One numbered instruction step
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecipeStep {
    pub number: i32,
    pub step: String,
}

/// Full recipe details as returned by the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipeDetails {
    pub external_id: i64,
    pub title: String,
    pub image_url: Option<String>,
    pub source_url: Option<String>,
    pub ready_in_minutes: Option<i32>,
    pub servings: Option<i32>,
    pub ingredients: Vec<String>,
    pub steps: Vec<RecipeStep>,
    pub dietary: DietaryFlags,
    pub health_score: Option<f64>,
    pub catalog_score: Option<f64>,
}

/// Recipe search hit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipeSummary {
    pub external_id: i64,
    pub title: String,
    pub image_url: Option<String>,
    pub ready_in_minutes: Option<i32>,
    pub dietary: DietaryFlags,
}

/// A recipe saved to a user's collection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recipe {
    pub id: Uuid,
    pub user_id: Uuid,
    pub liked: bool,
    pub saved_at: DateTime<Utc>,
    #[serde(flatten)]
    pub details: RecipeDetails,
}

/// Saved preference tags and onboarding progress
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserPreferences {
    pub user_id: Uuid,
    pub intolerances: BTreeSet<Intolerance>,
    pub diets: BTreeSet<Diet>,
    pub cuisines: BTreeSet<Cuisine>,
    pub onboarding_stage: OnboardingStage,
}

impl UserPreferences {
    /// Filter seeded from the saved preferences
    pub fn to_filter(&self) -> RecipeFilter {
        RecipeFilter {
            diets: self.diets.clone(),
            cuisines: self.cuisines.clone(),
            meal_types: BTreeSet::new(),
            intolerances: self.intolerances.clone(),
        }
    }
}
