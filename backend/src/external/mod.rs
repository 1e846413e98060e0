//! External catalog clients
//!
//! Spoonacular provides grocery product lookups and the recipe catalog;
//! Open Food Facts provides a second barcode database. Both clients share
//! the error type and response handling defined here.

pub mod open_food_facts;
pub mod spoonacular;

pub use open_food_facts::OpenFoodFactsClient;
pub use spoonacular::{RecipeSearchPage, SpoonacularClient};

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

/// Catalog client failure
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("{service} request failed: {source}")]
    Http {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} returned HTTP {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("{service} response could not be decoded: {message}")]
    Decode {
        service: &'static str,
        message: String,
    },
}

/// Send a prepared request and decode its JSON body
///
/// A 404 becomes `NotFound(what)`; every other non-success status keeps the
/// body for the log.
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    service: &'static str,
    request: reqwest::RequestBuilder,
    what: impl FnOnce() -> String,
) -> Result<T, CatalogError> {
    let response = request.send().await.map_err(|source| {
        record_request(service, "error");
        CatalogError::Http { service, source }
    })?;

    let status = response.status();
    debug!(service, status = status.as_u16(), "Catalog response");

    if status == reqwest::StatusCode::NOT_FOUND {
        record_request(service, "not_found");
        return Err(CatalogError::NotFound(what()));
    }

    if !status.is_success() {
        record_request(service, "error");
        return Err(CatalogError::Status {
            service,
            status: status.as_u16(),
            body: response.text().await.unwrap_or_default(),
        });
    }

    let decoded = response.json::<T>().await.map_err(|e| {
        record_request(service, "error");
        CatalogError::Decode {
            service,
            message: e.to_string(),
        }
    })?;

    record_request(service, "ok");
    Ok(decoded)
}

fn record_request(service: &'static str, outcome: &'static str) {
    metrics::counter!("catalog_requests_total", "service" => service, "outcome" => outcome)
        .increment(1);
}

/// Trimmed, non-empty string or None
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
