//! Grocery inventory routes

use super::{parse_id, today};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::services::ProductService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use pantry_tracker_shared::types::{
    AddByBarcodeRequest, CreateProductRequest, InventoryResponse, LikeResponse, LookupQuery,
    LookupResponse, ProductResponse, RemindersResponse, TodayQuery,
};

pub fn products_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(inventory).post(create_product))
        .route("/barcode", post(add_by_barcode))
        .route("/lookup/:barcode", get(lookup_barcode))
        .route("/reminders", get(reminders))
        .route("/:id", get(get_product).delete(delete_product))
        .route("/:id/used", post(mark_used))
        .route("/:id/like", post(toggle_like))
}

/// GET /api/v1/products - Unused products grouped by expiration date
async fn inventory(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<TodayQuery>,
) -> Result<Json<InventoryResponse>, ApiError> {
    let response = ProductService::inventory(state.db(), auth.user_id, today(&query)).await?;
    Ok(Json(response))
}

/// POST /api/v1/products - Add a product manually
async fn create_product(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<TodayQuery>,
    Json(req): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), ApiError> {
    let product = ProductService::create(state.db(), auth.user_id, req, today(&query)).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// POST /api/v1/products/barcode - Look a barcode up and add it
async fn add_by_barcode(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<TodayQuery>,
    Json(req): Json<AddByBarcodeRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), ApiError> {
    let product = ProductService::add_by_barcode(
        state.db(),
        &state.spoonacular,
        &state.open_food_facts,
        auth.user_id,
        req,
        today(&query),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// GET /api/v1/products/lookup/:barcode?source= - Preview a catalog lookup
async fn lookup_barcode(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(barcode): Path<String>,
    Query(query): Query<LookupQuery>,
) -> Result<Json<LookupResponse>, ApiError> {
    let product = ProductService::lookup(
        &state.spoonacular,
        &state.open_food_facts,
        &barcode,
        query.source,
    )
    .await?;
    Ok(Json(LookupResponse { product }))
}

/// GET /api/v1/products/reminders
async fn reminders(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<RemindersResponse>, ApiError> {
    let response = ProductService::reminders(
        state.db(),
        auth.user_id,
        Utc::now(),
        &state.config().reminders,
    )
    .await?;
    Ok(Json(response))
}

/// GET /api/v1/products/:id
async fn get_product(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Query(query): Query<TodayQuery>,
) -> Result<Json<ProductResponse>, ApiError> {
    let id = parse_id(&id, "product")?;
    let product = ProductService::get(state.db(), auth.user_id, id, today(&query)).await?;
    Ok(Json(product))
}

/// POST /api/v1/products/:id/used
async fn mark_used(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Query(query): Query<TodayQuery>,
) -> Result<Json<ProductResponse>, ApiError> {
    let id = parse_id(&id, "product")?;
    let product = ProductService::mark_used(state.db(), auth.user_id, id, today(&query)).await?;
    Ok(Json(product))
}

/// POST /api/v1/products/:id/like
async fn toggle_like(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<LikeResponse>, ApiError> {
    let id = parse_id(&id, "product")?;
    Ok(Json(ProductService::toggle_like(state.db(), auth.user_id, id).await?))
}

/// DELETE /api/v1/products/:id
async fn delete_product(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_id(&id, "product")?;
    ProductService::delete(state.db(), auth.user_id, id).await?;
    Ok(Json(serde_json::json!({"deleted": true})))
}
