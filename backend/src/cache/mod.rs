//! Redis-backed JSON cache for catalog responses
//!
//! The cache is optional: when Redis is unreachable at startup the
//! application runs without it, and runtime Redis errors are logged and
//! treated as cache misses.

use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};

/// Key prefix shared by every cache entry
const KEY_PREFIX: &str = "pantry:catalog:";

/// Response cache handle, cheap to clone
#[derive(Clone)]
pub struct CatalogCache {
    conn: Option<ConnectionManager>,
    ttl_secs: u64,
}

impl CatalogCache {
    pub fn new(conn: Option<ConnectionManager>, ttl_secs: u64) -> Self {
        Self { conn, ttl_secs }
    }

    /// A cache that never stores anything
    pub fn disabled() -> Self {
        Self {
            conn: None,
            ttl_secs: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.conn.is_some() && self.ttl_secs > 0
    }

    fn key(namespace: &str, id: &str) -> String {
        format!("{}{}:{}", KEY_PREFIX, namespace, id)
    }

    /// Fetch and decode a cached value
    pub async fn get<T: DeserializeOwned>(&self, namespace: &str, id: &str) -> Option<T> {
        if !self.is_enabled() {
            return None;
        }
        let mut conn = self.conn.clone()?;
        let key = Self::key(namespace, id);

        let raw: Option<String> = match conn.get(&key).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key = %key, "Cache read failed: {}", e);
                return None;
            }
        };

        let value = raw.and_then(|json| match serde_json::from_str(&json) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key = %key, "Discarding undecodable cache entry: {}", e);
                None
            }
        });

        if value.is_some() {
            debug!(key = %key, "Cache hit");
            metrics::counter!("catalog_cache_hits_total", "namespace" => namespace.to_string())
                .increment(1);
        }
        value
    }

    /// Encode and store a value with the configured TTL
    pub async fn put<T: Serialize>(&self, namespace: &str, id: &str, value: &T) {
        if !self.is_enabled() {
            return;
        }
        let Some(mut conn) = self.conn.clone() else {
            return;
        };
        let key = Self::key(namespace, id);

        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                warn!(key = %key, "Cache encode failed: {}", e);
                return;
            }
        };

        let result = redis::cmd("SET")
            .arg(&key)
            .arg(json)
            .arg("EX")
            .arg(self.ttl_secs)
            .query_async::<_, ()>(&mut conn)
            .await;
        if let Err(e) = result {
            warn!(key = %key, "Cache write failed: {}", e);
        }
    }
}

/// Connect to Redis with graceful fallback
///
/// Returns None if Redis is unavailable, allowing the app to run without caching
pub async fn connect(url: &str) -> Option<ConnectionManager> {
    info!("Connecting to Redis...");

    match redis::Client::open(url) {
        Ok(client) => match ConnectionManager::new(client).await {
            Ok(conn) => {
                info!("Redis connection established");
                Some(conn)
            }
            Err(e) => {
                warn!("Failed to connect to Redis: {}. Caching will be disabled.", e);
                None
            }
        },
        Err(e) => {
            warn!("Invalid Redis URL: {}. Caching will be disabled.", e);
            None
        }
    }
}
