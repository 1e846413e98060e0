//! Spoonacular API client
//!
//! Used for grocery product lookups by UPC, filtered recipe search and
//! recipe details. The API key travels as the `apiKey` query parameter.
//!
//! API reference: <https://spoonacular.com/food-api/docs>

use super::{fetch_json, non_empty, CatalogError};
use crate::cache::CatalogCache;
use crate::config::SpoonacularConfig;
use pantry_tracker_shared::filters::RecipeFilter;
use pantry_tracker_shared::models::{
    CatalogProduct, DietaryFlags, ProductSource, RecipeDetails, RecipeStep, RecipeSummary,
};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

const SERVICE: &str = "Spoonacular";
const PRODUCT_NAMESPACE: &str = "spoonacular-product";
const RECIPE_NAMESPACE: &str = "spoonacular-recipe";

/// One page of recipe search results
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeSearchPage {
    pub total_results: u64,
    pub results: Vec<RecipeSummary>,
}

/// Spoonacular client, cheap to clone
#[derive(Clone)]
pub struct SpoonacularClient {
    config: SpoonacularConfig,
    http_client: reqwest::Client,
    cache: CatalogCache,
}

#[derive(Debug, Deserialize)]
struct ProductResponse {
    id: i64,
    title: String,
    upc: Option<String>,
    brand: Option<String>,
    description: Option<String>,
    image: Option<String>,
    #[serde(default)]
    images: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlagsResponse {
    #[serde(default)]
    vegetarian: bool,
    #[serde(default)]
    vegan: bool,
    #[serde(default)]
    gluten_free: bool,
    #[serde(default)]
    dairy_free: bool,
    #[serde(default)]
    very_healthy: bool,
}

impl From<FlagsResponse> for DietaryFlags {
    fn from(flags: FlagsResponse) -> Self {
        DietaryFlags {
            vegetarian: flags.vegetarian,
            vegan: flags.vegan,
            gluten_free: flags.gluten_free,
            dairy_free: flags.dairy_free,
            very_healthy: flags.very_healthy,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
    #[serde(default)]
    total_results: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchHit {
    id: i64,
    title: String,
    image: Option<String>,
    ready_in_minutes: Option<i32>,
    #[serde(flatten)]
    flags: FlagsResponse,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InformationResponse {
    id: i64,
    title: String,
    image: Option<String>,
    source_url: Option<String>,
    ready_in_minutes: Option<i32>,
    servings: Option<i32>,
    #[serde(default)]
    extended_ingredients: Vec<IngredientResponse>,
    #[serde(default)]
    analyzed_instructions: Vec<InstructionResponse>,
    health_score: Option<f64>,
    spoonacular_score: Option<f64>,
    #[serde(flatten)]
    flags: FlagsResponse,
}

#[derive(Debug, Deserialize)]
struct IngredientResponse {
    original: Option<String>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InstructionResponse {
    #[serde(default)]
    steps: Vec<StepResponse>,
}

#[derive(Debug, Deserialize)]
struct StepResponse {
    step: String,
}

impl SpoonacularClient {
    /// Create a client with the configured request timeout
    pub fn new(config: SpoonacularConfig, cache: CatalogCache) -> Result<Self, CatalogError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|source| CatalogError::Http {
                service: SERVICE,
                source,
            })?;

        Ok(Self {
            config,
            http_client,
            cache,
        })
    }

    pub fn cache_enabled(&self) -> bool {
        self.cache.is_enabled()
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);
        self.http_client
            .get(url)
            .query(&[("apiKey", self.config.api_key.as_str())])
    }

    /// Look up a grocery product by UPC barcode
    pub async fn lookup_product(&self, barcode: &str) -> Result<CatalogProduct, CatalogError> {
        if let Some(product) = self.cache.get(PRODUCT_NAMESPACE, barcode).await {
            return Ok(product);
        }

        let request = self.get(&format!("/food/products/upc/{}", barcode));
        let response: ProductResponse =
            fetch_json(SERVICE, request, || format!("Barcode {}", barcode)).await?;

        let product = product_from_response(barcode, response);
        info!(barcode = %barcode, title = %product.title, "Spoonacular product found");

        self.cache.put(PRODUCT_NAMESPACE, barcode, &product).await;
        Ok(product)
    }

    /// Search recipes matching a free-text query and filter
    pub async fn search_recipes(
        &self,
        query: Option<&str>,
        filter: &RecipeFilter,
        number: Option<u32>,
    ) -> Result<RecipeSearchPage, CatalogError> {
        let params = search_params(query, filter, number.unwrap_or(self.config.default_results));
        debug!(?params, "Searching Spoonacular recipes");

        let request = self.get("/recipes/complexSearch").query(&params);
        let response: SearchResponse =
            fetch_json(SERVICE, request, || "Recipe search".to_string()).await?;

        Ok(RecipeSearchPage {
            total_results: response.total_results,
            results: response
                .results
                .into_iter()
                .map(|hit| RecipeSummary {
                    external_id: hit.id,
                    title: hit.title,
                    image_url: non_empty(hit.image),
                    ready_in_minutes: hit.ready_in_minutes,
                    dietary: hit.flags.into(),
                })
                .collect(),
        })
    }

    /// Full recipe information
    pub async fn recipe_details(&self, external_id: i64) -> Result<RecipeDetails, CatalogError> {
        let cache_id = external_id.to_string();
        if let Some(details) = self.cache.get(RECIPE_NAMESPACE, &cache_id).await {
            return Ok(details);
        }

        let request = self
            .get(&format!("/recipes/{}/information", external_id))
            .query(&[("includeNutrition", "false")]);
        let response: InformationResponse =
            fetch_json(SERVICE, request, || format!("Recipe {}", external_id)).await?;

        let details = details_from_response(response);
        self.cache.put(RECIPE_NAMESPACE, &cache_id, &details).await;
        Ok(details)
    }
}

/// Query parameters for `complexSearch`
fn search_params(query: Option<&str>, filter: &RecipeFilter, number: u32) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if let Some(query) = query.map(str::trim).filter(|q| !q.is_empty()) {
        params.push(("query", query.to_string()));
    }
    params.extend(filter.to_query());
    params.push(("number", number.to_string()));
    params.push(("addRecipeInformation", "true".to_string()));
    params
}

fn product_from_response(barcode: &str, response: ProductResponse) -> CatalogProduct {
    let image_urls: Vec<String> = response
        .images
        .into_iter()
        .filter(|url| !url.trim().is_empty())
        .collect();
    let image_url = non_empty(response.image).or_else(|| image_urls.first().cloned());

    CatalogProduct {
        source: ProductSource::Spoonacular,
        external_id: Some(response.id.to_string()),
        barcode: non_empty(response.upc).unwrap_or_else(|| barcode.to_string()),
        title: response.title.trim().to_string(),
        brand: non_empty(response.brand),
        description: non_empty(response.description),
        image_url,
        image_urls,
    }
}

fn details_from_response(response: InformationResponse) -> RecipeDetails {
    let ingredients = response
        .extended_ingredients
        .into_iter()
        .filter_map(|i| non_empty(i.original).or_else(|| non_empty(i.name)))
        .collect();

    // Instruction groups each restart at 1, so steps are renumbered in order
    let steps = response
        .analyzed_instructions
        .into_iter()
        .flat_map(|group| group.steps)
        .filter(|s| !s.step.trim().is_empty())
        .enumerate()
        .map(|(i, s)| RecipeStep {
            number: i as i32 + 1,
            step: s.step.trim().to_string(),
        })
        .collect();

    RecipeDetails {
        external_id: response.id,
        title: response.title,
        image_url: non_empty(response.image),
        source_url: non_empty(response.source_url),
        ready_in_minutes: response.ready_in_minutes,
        servings: response.servings,
        ingredients,
        steps,
        dietary: response.flags.into(),
        health_score: response.health_score,
        catalog_score: response.spoonacular_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pantry_tracker_shared::filters::{Diet, FilterTag, Intolerance};

    #[test]
    fn test_search_params_without_filter() {
        let params = search_params(Some(" pasta "), &RecipeFilter::default(), 5);
        assert_eq!(
            params,
            vec![
                ("query", "pasta".to_string()),
                ("number", "5".to_string()),
                ("addRecipeInformation", "true".to_string()),
            ]
        );
    }

    #[test]
    fn test_search_params_with_filter() {
        let mut filter = RecipeFilter::default();
        filter.toggle(FilterTag::Diet(Diet::Vegan));
        filter.toggle(FilterTag::Intolerance(Intolerance::Peanut));

        let params = search_params(None, &filter, 10);
        assert!(params.contains(&("diet", "vegan".to_string())));
        assert!(params.contains(&("intolerances", "peanut".to_string())));
        assert!(!params.iter().any(|(k, _)| *k == "query"));
    }

    #[test]
    fn test_steps_renumbered_across_groups() {
        let response: InformationResponse = serde_json::from_value(serde_json::json!({
            "id": 1,
            "title": "Soup",
            "analyzedInstructions": [
                { "name": "", "steps": [{ "number": 1, "step": "Boil water." }] },
                { "name": "Garnish", "steps": [{ "number": 1, "step": "Add herbs." }] }
            ]
        }))
        .unwrap();

        let details = details_from_response(response);
        assert_eq!(details.steps.len(), 2);
        assert_eq!(details.steps[1].number, 2);
        assert_eq!(details.steps[1].step, "Add herbs.");
        assert!(!details.dietary.vegan);
    }

    #[test]
    fn test_product_falls_back_to_requested_barcode() {
        let response = ProductResponse {
            id: 30004,
            title: " Swan Flour ".to_string(),
            upc: None,
            brand: Some("".to_string()),
            description: None,
            image: None,
            images: vec!["https://img.example/1.jpg".to_string()],
        };

        let product = product_from_response("041631000564", response);
        assert_eq!(product.barcode, "041631000564");
        assert_eq!(product.title, "Swan Flour");
        assert_eq!(product.brand, None);
        assert_eq!(product.image_url.as_deref(), Some("https://img.example/1.jpg"));
        assert_eq!(product.external_id.as_deref(), Some("30004"));
    }
}
