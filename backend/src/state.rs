//! Application state management
//!
//! Shared resources handed to every handler through Axum's state
//! extraction. Everything here is built once at startup and is cheap to
//! clone: the pool and HTTP clients are internally reference counted, the
//! config is behind `Arc`, and JWT keys are pre-computed.

use crate::auth::JwtService;
use crate::cache::CatalogCache;
use crate::config::AppConfig;
use crate::external::{OpenFoodFactsClient, SpoonacularClient};
use anyhow::Result;
use metrics_exporter_prometheus::PrometheusHandle;
use redis::aio::ConnectionManager;
use sqlx::PgPool;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<AppConfig>,
    /// Pre-initialized JWT service with cached keys
    pub jwt: JwtService,
    pub spoonacular: SpoonacularClient,
    pub open_food_facts: OpenFoodFactsClient,
    /// Renders `/metrics`; None when no recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Build state once at application startup
    ///
    /// `redis` is None when Redis was unreachable; catalog responses are
    /// then fetched on every request.
    pub fn new(
        db: PgPool,
        redis: Option<ConnectionManager>,
        config: AppConfig,
        metrics: Option<PrometheusHandle>,
    ) -> Result<Self> {
        let jwt = JwtService::new(&config.jwt);
        let cache = CatalogCache::new(redis, config.redis.cache_ttl_secs);
        let spoonacular = SpoonacularClient::new(config.spoonacular.clone(), cache.clone())?;
        let open_food_facts = OpenFoodFactsClient::new(config.open_food_facts.clone(), cache)?;

        Ok(Self {
            db,
            config: Arc::new(config),
            jwt,
            spoonacular,
            open_food_facts,
            metrics,
        })
    }

    #[inline]
    pub fn db(&self) -> &PgPool {
        &self.db
    }

    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[inline]
    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }
}
