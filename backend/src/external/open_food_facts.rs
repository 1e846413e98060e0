//! Open Food Facts product lookup
//!
//! API reference: <https://openfoodfacts.github.io/openfoodfacts-server/api/>

use super::{fetch_json, non_empty, CatalogError};
use crate::cache::CatalogCache;
use crate::config::OpenFoodFactsConfig;
use pantry_tracker_shared::models::{CatalogProduct, ProductSource};
use serde::Deserialize;
use std::time::Duration;
use tracing::info;

const SERVICE: &str = "Open Food Facts";
const PRODUCT_NAMESPACE: &str = "off-product";
const FIELDS: &str = "code,product_name,generic_name,brands,image_url,image_front_url";

/// Open Food Facts client, cheap to clone
#[derive(Clone)]
pub struct OpenFoodFactsClient {
    config: OpenFoodFactsConfig,
    http_client: reqwest::Client,
    cache: CatalogCache,
}

#[derive(Debug, Deserialize)]
struct ProductResponse {
    /// 1 when found, 0 when the barcode is unknown
    #[serde(default)]
    status: i64,
    code: Option<String>,
    product: Option<ProductFields>,
}

#[derive(Debug, Deserialize)]
struct ProductFields {
    product_name: Option<String>,
    generic_name: Option<String>,
    brands: Option<String>,
    image_url: Option<String>,
    image_front_url: Option<String>,
}

impl OpenFoodFactsClient {
    /// Create a client; Open Food Facts asks callers to identify themselves
    pub fn new(config: OpenFoodFactsConfig, cache: CatalogCache) -> Result<Self, CatalogError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
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

    /// Look up a product by EAN/UPC barcode
    pub async fn lookup_product(&self, barcode: &str) -> Result<CatalogProduct, CatalogError> {
        if let Some(product) = self.cache.get(PRODUCT_NAMESPACE, barcode).await {
            return Ok(product);
        }

        let url = format!(
            "{}/api/v2/product/{}.json",
            self.config.base_url.trim_end_matches('/'),
            barcode
        );
        let request = self.http_client.get(url).query(&[("fields", FIELDS)]);
        let response: ProductResponse =
            fetch_json(SERVICE, request, || format!("Barcode {}", barcode)).await?;

        let product = product_from_response(barcode, response)?;
        info!(barcode = %barcode, title = %product.title, "Open Food Facts product found");

        self.cache.put(PRODUCT_NAMESPACE, barcode, &product).await;
        Ok(product)
    }
}

fn product_from_response(
    barcode: &str,
    response: ProductResponse,
) -> Result<CatalogProduct, CatalogError> {
    let fields = match response.product {
        Some(fields) if response.status != 0 => fields,
        _ => return Err(CatalogError::NotFound(format!("Barcode {}", barcode))),
    };

    let title = non_empty(fields.product_name)
        .or_else(|| non_empty(fields.generic_name.clone()))
        .ok_or_else(|| CatalogError::Decode {
            service: SERVICE,
            message: format!("product {} has no name", barcode),
        })?;

    // `brands` is a comma-separated list; the first entry is the owner
    let brand = non_empty(
        fields
            .brands
            .and_then(|b| b.split(',').next().map(str::to_string)),
    );

    let mut image_urls = Vec::new();
    for url in [fields.image_front_url, fields.image_url].into_iter().flatten() {
        let url = url.trim().to_string();
        if !url.is_empty() && !image_urls.contains(&url) {
            image_urls.push(url);
        }
    }

    Ok(CatalogProduct {
        source: ProductSource::OpenFoodFacts,
        external_id: non_empty(response.code.clone()),
        barcode: non_empty(response.code).unwrap_or_else(|| barcode.to_string()),
        title,
        brand,
        description: non_empty(fields.generic_name),
        image_url: image_urls.first().cloned(),
        image_urls,
    })
}
