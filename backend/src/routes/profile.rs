//! Profile, data export and account deletion routes

use super::today;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::services::{ExportService, ProfileService, UserService};
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use pantry_tracker_shared::types::{
    LikedItemsResponse, ProfileSummary, TodayQuery, UsedItemsResponse,
};

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(summary).delete(delete_account))
        .route("/liked", get(liked_items))
        .route("/used", get(used_items))
        .route("/export/json", get(export_json))
        .route("/export/csv", get(export_csv))
}

/// GET /api/v1/profile - Profile with inventory and recipe counts
async fn summary(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ProfileSummary>, ApiError> {
    Ok(Json(ProfileService::summary(state.db(), auth.user_id).await?))
}

/// GET /api/v1/profile/liked
async fn liked_items(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<LikedItemsResponse>, ApiError> {
    Ok(Json(ProfileService::liked(state.db(), auth.user_id).await?))
}

/// GET /api/v1/profile/used
async fn used_items(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<UsedItemsResponse>, ApiError> {
    Ok(Json(ProfileService::used(state.db(), auth.user_id).await?))
}

/// DELETE /api/v1/profile - Delete the account and all its data
async fn delete_account(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    UserService::delete_account(state.db(), auth.user_id).await?;
    Ok(Json(serde_json::json!({"deleted": true})))
}

fn attachment(content_type: &'static str, filename: &'static str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    headers.insert(header::CONTENT_DISPOSITION, HeaderValue::from_static(filename));
    headers
}

/// GET /api/v1/profile/export/json
async fn export_json(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let export = ExportService::export_json(state.db(), auth.user_id).await?;

    let json = serde_json::to_string_pretty(&export)
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("JSON serialization error: {}", e)))?;

    Ok((
        attachment(
            "application/json",
            "attachment; filename=\"pantry-export.json\"",
        ),
        json,
    ))
}

/// GET /api/v1/profile/export/csv - Inventory as CSV
async fn export_csv(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<TodayQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let csv = ExportService::export_products_csv(state.db(), auth.user_id, today(&query)).await?;
    Ok((
        attachment("text/csv", "attachment; filename=\"pantry-products.csv\""),
        csv,
    ))
}
