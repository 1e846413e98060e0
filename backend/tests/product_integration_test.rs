//! Integration tests for inventory, preferences and profile endpoints

mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

const TODAY: &str = "2024-01-10";

async fn add_product(app: &common::TestApp, token: &str, title: &str, expires: &str) -> Value {
    let (status, body) = app
        .request(
            "POST",
            &format!("/api/v1/products?today={}", TODAY),
            Some(token),
            Some(json!({ "title": title, "expiration_date": expires })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);
    serde_json::from_str(&body).unwrap()
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_create_product_reports_status() {
    let app = common::TestApp::new().await;
    let token = app.register_user().await;

    let product = add_product(&app, &token, "Milk", "2024-01-12").await;

    assert_eq!(product["title"], "Milk");
    assert_eq!(product["source"], "manual");
    assert_eq!(product["status"]["days_remaining"], 2);
    assert_eq!(product["status"]["message"], "Expires in 2 days");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_create_product_rejects_blank_title() {
    let app = common::TestApp::new().await;
    let token = app.register_user().await;

    let (status, _) = app
        .request(
            "POST",
            "/api/v1/products",
            Some(&token),
            Some(json!({ "title": "   ", "expiration_date": "2024-01-12" })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_inventory_groups_by_expiration_date() {
    let app = common::TestApp::new().await;
    let token = app.register_user().await;

    add_product(&app, &token, "Yogurt", "2024-01-15").await;
    add_product(&app, &token, "Bread", "2024-01-08").await;
    add_product(&app, &token, "Cheese", "2024-01-15").await;

    let (status, body) = app
        .request(
            "GET",
            &format!("/api/v1/products?today={}", TODAY),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let inventory: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(inventory["total_products"], 3);

    let groups = inventory["groups"].as_array().unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0]["date"], "2024-01-08");
    assert_eq!(groups[0]["status"]["message"], "Expired 2 days ago");
    assert_eq!(groups[1]["date"], "2024-01-15");
    assert_eq!(groups[1]["products"].as_array().unwrap().len(), 2);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_used_products_leave_inventory() {
    let app = common::TestApp::new().await;
    let token = app.register_user().await;

    let product = add_product(&app, &token, "Eggs", "2024-01-11").await;
    let id = product["id"].as_str().unwrap();

    let (status, body) = app
        .request("POST", &format!("/api/v1/products/{}/used", id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let used: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(used["used"], true);
    assert!(used["used_at"].is_string());

    let (_, body) = app
        .request("GET", "/api/v1/products", Some(&token), None)
        .await;
    let inventory: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(inventory["total_products"], 0);

    let (_, body) = app
        .request("GET", "/api/v1/profile/used", Some(&token), None)
        .await;
    let used: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(used["products"].as_array().unwrap().len(), 1);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_like_toggles() {
    let app = common::TestApp::new().await;
    let token = app.register_user().await;

    let product = add_product(&app, &token, "Butter", "2024-02-01").await;
    let uri = format!("/api/v1/products/{}/like", product["id"].as_str().unwrap());

    let (_, body) = app.request("POST", &uri, Some(&token), None).await;
    let first: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(first["liked"], true);

    let (_, body) = app.request("POST", &uri, Some(&token), None).await;
    let second: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(second["liked"], false);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_products_are_scoped_to_owner() {
    let app = common::TestApp::new().await;
    let owner = app.register_user().await;
    let other = app.register_user().await;

    let product = add_product(&app, &owner, "Ham", "2024-01-20").await;
    let uri = format!("/api/v1/products/{}", product["id"].as_str().unwrap());

    let (status, _) = app.request("GET", &uri, Some(&other), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.request("DELETE", &uri, Some(&other), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.request("DELETE", &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_preferences_toggle_and_onboarding() {
    let app = common::TestApp::new().await;
    let token = app.register_user().await;

    let (status, body) = app
        .request(
            "POST",
            "/api/v1/preferences/toggle",
            Some(&token),
            Some(json!({ "category": "intolerance", "tag": "peanut" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let toggled: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(toggled["selected"], true);
    assert_eq!(toggled["preferences"]["intolerances"], json!(["peanut"]));

    let (status, _) = app
        .request(
            "POST",
            "/api/v1/preferences/toggle",
            Some(&token),
            Some(json!({ "category": "diet", "tag": "carnivore" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = app
        .request("POST", "/api/v1/preferences/advance", Some(&token), None)
        .await;
    let advanced: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(advanced["onboarding_stage"], "diets");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_profile_summary_and_csv_export() {
    let app = common::TestApp::new().await;
    let token = app.register_user().await;

    add_product(&app, &token, "Lettuce", "2024-01-09").await;
    add_product(&app, &token, "Rice", "2025-01-10").await;

    let (status, body) = app
        .request("GET", "/api/v1/profile", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let summary: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(summary["active_products"], 2);
    assert_eq!(summary["saved_recipes"], 0);

    let (status, csv) = app
        .request(
            "GET",
            &format!("/api/v1/profile/export/csv?today={}", TODAY),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(csv.starts_with("title,brand,barcode,expiration_date"));
    assert!(csv.contains("Lettuce"));
    assert_eq!(csv.lines().count(), 3);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_delete_account_removes_data() {
    let app = common::TestApp::new().await;
    let token = app.register_user().await;
    add_product(&app, &token, "Tofu", "2024-01-20").await;

    let (status, _) = app
        .request("DELETE", "/api/v1/profile", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .request("GET", "/api/v1/auth/me", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_concurrent_toggles_keep_both_tags() {
    let app = common::TestApp::new().await;
    let token = app.register_user().await;

    let peanut = app.request(
        "POST",
        "/api/v1/preferences/toggle",
        Some(&token),
        Some(json!({ "category": "intolerance", "tag": "peanut" })),
    );
    let egg = app.request(
        "POST",
        "/api/v1/preferences/toggle",
        Some(&token),
        Some(json!({ "category": "intolerance", "tag": "egg" })),
    );
    let ((first, _), (second, _)) = tokio::join!(peanut, egg);
    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::OK);

    let (_, body) = app
        .request("GET", "/api/v1/preferences", Some(&token), None)
        .await;
    let prefs: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(prefs["intolerances"], json!(["egg", "peanut"]));
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_reminders_are_future_and_ordered() {
    let app = common::TestApp::new().await;
    let token = app.register_user().await;

    let today = chrono::Utc::now().date_naive();
    let in_days = |n: i64| (today + chrono::Duration::days(n)).to_string();
    add_product(&app, &token, "Soup", &in_days(10)).await;
    add_product(&app, &token, "Cream", &in_days(5)).await;
    add_product(&app, &token, "Old bread", &in_days(-2)).await;
    let used = add_product(&app, &token, "Jam", &in_days(7)).await;
    app.request(
        "POST",
        &format!("/api/v1/products/{}/used", used["id"].as_str().unwrap()),
        Some(&token),
        None,
    )
    .await;

    let (status, body) = app
        .request("GET", "/api/v1/products/reminders", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let response: Value = serde_json::from_str(&body).unwrap();
    let generated_at = response["generated_at"].as_str().unwrap().to_string();
    let reminders = response["reminders"].as_array().unwrap();

    // Default lead times 3, 1 and 0 days for the two live products
    assert_eq!(reminders.len(), 6);
    assert!(reminders.iter().all(|r| r["product_title"] != "Jam"));
    assert_eq!(reminders[0]["product_title"], "Cream");
    assert_eq!(reminders[0]["days_before"], 3);

    let fire_times: Vec<chrono::DateTime<chrono::Utc>> = reminders
        .iter()
        .map(|r| r["fire_at"].as_str().unwrap().parse().unwrap())
        .collect();
    let now: chrono::DateTime<chrono::Utc> = generated_at.parse().unwrap();
    assert!(fire_times.iter().all(|t| *t > now));
    assert!(fire_times.windows(2).all(|w| w[0] <= w[1]));
}
