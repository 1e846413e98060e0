//! Route definitions for the Pantry Tracker API
//!
//! This module organizes all API routes and applies middleware.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use chrono::{NaiveDate, Utc};
use pantry_tracker_shared::types::TodayQuery;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use uuid::Uuid;

mod auth;
mod health;
mod preferences;
mod products;
mod profile;
mod recipes;


pub use auth::auth_routes;
pub use preferences::preferences_routes;
pub use products::products_routes;
pub use profile::profile_routes;
pub use recipes::recipes_routes;

/// Create the main application router with all middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/health/live", get(health::liveness_check))
        .route("/metrics", get(health::metrics))
        .nest("/api/v1", api_routes())
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API v1 routes
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { "Pantry Tracker API v1" }))
        .nest("/auth", auth_routes())
        .nest("/preferences", preferences_routes())
        .nest("/products", products_routes())
        .nest("/recipes", recipes_routes())
        .nest("/profile", profile_routes())
}

/// The client's date, falling back to the server's UTC date
fn today(query: &TodayQuery) -> NaiveDate {
    query.today.unwrap_or_else(|| Utc::now().date_naive())
}

fn parse_id(id: &str, what: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|_| ApiError::Validation(format!("Invalid {} ID", what)))
}
