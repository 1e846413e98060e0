//! Preference onboarding routes

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::preferences::{to_response, PreferencesService};
use crate::state::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use pantry_tracker_shared::types::{
    PreferencesResponse, TogglePreferenceRequest, TogglePreferenceResponse,
    UpdatePreferencesRequest,
};

pub fn preferences_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_preferences).put(replace_preferences))
        .route("/toggle", post(toggle_preference))
        .route("/advance", post(advance_onboarding))
}

/// GET /api/v1/preferences
async fn get_preferences(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<PreferencesResponse>> {
    let prefs = PreferencesService::get(state.db(), auth.user_id).await?;
    Ok(Json(to_response(&prefs)))
}

/// PUT /api/v1/preferences - Replace all saved tags
async fn replace_preferences(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<UpdatePreferencesRequest>,
) -> ApiResult<Json<PreferencesResponse>> {
    let prefs = PreferencesService::replace(state.db(), auth.user_id, req).await?;
    Ok(Json(to_response(&prefs)))
}

/// POST /api/v1/preferences/toggle
async fn toggle_preference(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<TogglePreferenceRequest>,
) -> ApiResult<Json<TogglePreferenceResponse>> {
    let (selected, prefs) =
        PreferencesService::toggle(state.db(), auth.user_id, req.category, &req.tag).await?;
    Ok(Json(TogglePreferenceResponse {
        selected,
        preferences: to_response(&prefs),
    }))
}

/// POST /api/v1/preferences/advance
async fn advance_onboarding(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<PreferencesResponse>> {
    let prefs = PreferencesService::advance(state.db(), auth.user_id).await?;
    Ok(Json(to_response(&prefs)))
}
