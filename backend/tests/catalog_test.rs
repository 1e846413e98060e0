//! Catalog client tests against mocked Spoonacular and Open Food Facts APIs

use pantry_tracker_backend::cache::CatalogCache;
use pantry_tracker_backend::config::{OpenFoodFactsConfig, SpoonacularConfig};
use pantry_tracker_backend::external::{CatalogError, OpenFoodFactsClient, SpoonacularClient};
use pantry_tracker_shared::filters::{Diet, FilterTag, Intolerance, RecipeFilter};
use pantry_tracker_shared::models::ProductSource;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn spoonacular(server: &MockServer) -> SpoonacularClient {
    let config = SpoonacularConfig {
        base_url: server.uri(),
        api_key: "test-key".to_string(),
        ..SpoonacularConfig::default()
    };
    SpoonacularClient::new(config, CatalogCache::disabled()).unwrap()
}

fn open_food_facts(server: &MockServer) -> OpenFoodFactsClient {
    let config = OpenFoodFactsConfig {
        base_url: server.uri(),
        ..OpenFoodFactsConfig::default()
    };
    OpenFoodFactsClient::new(config, CatalogCache::disabled()).unwrap()
}

#[tokio::test]
async fn test_spoonacular_product_lookup() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/food/products/upc/041631000564"))
        .and(query_param("apiKey", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 30004,
            "title": "Swan Flour",
            "upc": "041631000564",
            "brand": "Swan",
            "image": "https://img.example/swan.jpg",
            "images": ["https://img.example/swan.jpg"]
        })))
        .mount(&server)
        .await;

    let product = spoonacular(&server)
        .lookup_product("041631000564")
        .await
        .unwrap();

    assert_eq!(product.source, ProductSource::Spoonacular);
    assert_eq!(product.title, "Swan Flour");
    assert_eq!(product.brand.as_deref(), Some("Swan"));
    assert_eq!(product.external_id.as_deref(), Some("30004"));
}

#[tokio::test]
async fn test_spoonacular_unknown_barcode_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/food/products/upc/000000000000"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "status": "failure",
            "message": "Product not found"
        })))
        .mount(&server)
        .await;

    let err = spoonacular(&server)
        .lookup_product("000000000000")
        .await
        .unwrap_err();

    assert!(matches!(err, CatalogError::NotFound(_)));
}

#[tokio::test]
async fn test_spoonacular_server_error_keeps_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/food/products/upc/041631000564"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let err = spoonacular(&server)
        .lookup_product("041631000564")
        .await
        .unwrap_err();

    match err {
        CatalogError::Status { status, body, .. } => {
            assert_eq!(status, 500);
            assert_eq!(body, "upstream down");
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_recipe_search_sends_filter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/recipes/complexSearch"))
        .and(query_param("query", "curry"))
        .and(query_param("diet", "vegan"))
        .and(query_param("intolerances", "peanut"))
        .and(query_param("number", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalResults": 42,
            "results": [
                {
                    "id": 716426,
                    "title": "Chickpea Curry",
                    "image": "https://img.example/curry.jpg",
                    "readyInMinutes": 30,
                    "vegan": true,
                    "vegetarian": true
                }
            ]
        })))
        .mount(&server)
        .await;

    let mut filter = RecipeFilter::default();
    filter.toggle(FilterTag::Diet(Diet::Vegan));
    filter.toggle(FilterTag::Intolerance(Intolerance::Peanut));

    let page = spoonacular(&server)
        .search_recipes(Some("curry"), &filter, Some(3))
        .await
        .unwrap();

    assert_eq!(page.total_results, 42);
    assert_eq!(page.results.len(), 1);
    assert_eq!(page.results[0].external_id, 716426);
    assert!(page.results[0].dietary.vegan);
    assert_eq!(page.results[0].ready_in_minutes, Some(30));
}

#[tokio::test]
async fn test_recipe_details() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/recipes/716426/information"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 716426,
            "title": "Chickpea Curry",
            "sourceUrl": "https://recipes.example/curry",
            "servings": 4,
            "healthScore": 72.0,
            "spoonacularScore": 91.5,
            "glutenFree": true,
            "extendedIngredients": [
                { "original": "1 can chickpeas", "name": "chickpeas" },
                { "original": "", "name": "coconut milk" }
            ],
            "analyzedInstructions": [
                { "name": "", "steps": [
                    { "number": 1, "step": "Fry the onions." },
                    { "number": 2, "step": "Add chickpeas." }
                ] },
                { "name": "Rice", "steps": [{ "number": 1, "step": "Cook the rice." }] }
            ]
        })))
        .mount(&server)
        .await;

    let details = spoonacular(&server).recipe_details(716426).await.unwrap();

    assert_eq!(details.title, "Chickpea Curry");
    assert_eq!(details.ingredients, vec!["1 can chickpeas", "coconut milk"]);
    assert_eq!(details.steps.len(), 3);
    assert_eq!(details.steps[2].number, 3);
    assert!(details.dietary.gluten_free);
    assert_eq!(details.catalog_score, Some(91.5));
}

#[tokio::test]
async fn test_open_food_facts_lookup() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/product/3017620422003.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": 1,
            "code": "3017620422003",
            "product": {
                "product_name": "Nutella",
                "brands": "Ferrero, Nutella",
                "image_front_url": "https://img.example/front.jpg",
                "image_url": "https://img.example/front.jpg"
            }
        })))
        .mount(&server)
        .await;

    let product = open_food_facts(&server)
        .lookup_product("3017620422003")
        .await
        .unwrap();

    assert_eq!(product.source, ProductSource::OpenFoodFacts);
    assert_eq!(product.title, "Nutella");
    assert_eq!(product.brand.as_deref(), Some("Ferrero"));
    assert_eq!(product.image_urls.len(), 1);
}

#[tokio::test]
async fn test_open_food_facts_status_zero_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/product/12345678.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": 0,
            "status_verbose": "product not found",
            "code": "12345678"
        })))
        .mount(&server)
        .await;

    let err = open_food_facts(&server)
        .lookup_product("12345678")
        .await
        .unwrap_err();

    assert!(matches!(err, CatalogError::NotFound(_)));
}
