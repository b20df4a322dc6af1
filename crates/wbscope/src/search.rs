//! Catalog search client.
//!
//! Every request starts from the same fixed parameter set and overlays the
//! caller's query and page. Failures never escape `search`: they are logged
//! and reported as `None`.

use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::config::ScoutConfig;
use crate::http_client::{HttpClient, RequestOptions};
use crate::types::{lenient_u64, parse_identifier, CatalogIndex, CatalogRecord, ScoutResult};

/// Fixed catalog parameters. `query` is appended per request; `page` and
/// `dest` are replaced.
pub const DEFAULT_PARAMS: &[(&str, &str)] = &[
    ("ab_testing", "false"),
    ("appType", "64"),
    ("curr", "rub"),
    ("dest", "12358327"),
    ("hide_dflags", "131072"),
    ("inheritFilters", "false"),
    ("lang", "ru"),
    ("page", "1"),
    ("resultset", "catalog"),
    ("sort", "popular"),
    ("spp", "30"),
    ("suppressSpellcheck", "false"),
];

/// A decoded catalog search response.
#[derive(Debug, Clone)]
pub struct SearchResponse {
    pub raw: Value,
}

impl SearchResponse {
    pub fn new(raw: Value) -> Self {
        Self { raw }
    }

    /// The `products` array, or an empty slice.
    pub fn products(&self) -> &[Value] {
        self.raw
            .get("products")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Total number of matches reported by the catalog, or 0.
    pub fn total(&self) -> u64 {
        self.raw.get("total").and_then(Value::as_u64).unwrap_or(0)
    }

    /// Identifiers of all products carrying an `id`, in catalog order.
    pub fn extract_identifiers(&self) -> Vec<u64> {
        let products = self.products();
        if products.is_empty() {
            warn!("catalog response has no products");
            return Vec::new();
        }

        let ids: Vec<u64> = products
            .iter()
            .filter_map(|p| p.get("id").and_then(parse_identifier))
            .collect();
        info!(count = ids.len(), "extracted product ids");
        ids
    }

    /// Catalog records keyed by identifier. Later duplicates win.
    pub fn extract_with_image_counts(&self) -> CatalogIndex {
        let mut index = CatalogIndex::new();
        for product in self.products() {
            let Some(id) = product.get("id").and_then(parse_identifier) else {
                continue;
            };
            let image_count = lenient_u64(product.get("pics")).min(u32::MAX as u64) as u32;
            let name = product
                .get("name")
                .and_then(Value::as_str)
                .map(str::to_string);

            index.insert(CatalogRecord {
                id,
                image_count,
                name,
                raw: product.clone(),
            });
        }
        info!(count = index.len(), "extracted catalog records");
        index
    }
}

/// Client for the catalog search endpoint.
#[derive(Clone)]
pub struct SearchClient {
    http: HttpClient,
    config: ScoutConfig,
}

impl SearchClient {
    pub fn new(config: ScoutConfig) -> Self {
        let http = HttpClient::new(&config.user_agent, config.timeout);
        Self { http, config }
    }

    /// Query parameters for one request.
    pub fn params(&self, query: &str, page: u32) -> Vec<(&'static str, String)> {
        let mut params: Vec<(&'static str, String)> = DEFAULT_PARAMS
            .iter()
            .map(|&(k, v)| match k {
                "page" => (k, page.to_string()),
                "dest" => (k, self.config.dest.clone()),
                _ => (k, v.to_string()),
            })
            .collect();
        params.push(("query", query.to_string()));
        params
    }

    /// Full request URL, for logging and display.
    pub fn build_url(&self, query: &str, page: u32) -> String {
        let params = self.params(query, page);
        match url::Url::parse_with_params(
            &self.config.search_url,
            params.iter().map(|(k, v)| (*k, v.as_str())),
        ) {
            Ok(url) => url.to_string(),
            Err(_) => self.config.search_url.clone(),
        }
    }

    /// Fetch one catalog page. Any failure is logged and yields `None`.
    pub async fn search(&self, query: &str, page: u32) -> Option<SearchResponse> {
        info!(query, page, "searching catalog");
        match self.try_search(query, page).await {
            Ok(resp) => Some(resp),
            Err(e) => {
                error!(query, page, error = %e, "catalog search failed");
                None
            }
        }
    }

    async fn try_search(&self, query: &str, page: u32) -> ScoutResult<SearchResponse> {
        let params = self.params(query, page);
        debug!(url = %self.build_url(query, page), "catalog request");
        let raw = self
            .http
            .get_json(&self.config.search_url, &params, RequestOptions::default())
            .await?;
        Ok(SearchResponse::new(raw))
    }

    /// Identifiers on one page; empty when the fetch failed.
    pub async fn search_products(&self, query: &str, page: u32) -> Vec<u64> {
        match self.search(query, page).await {
            Some(resp) => resp.extract_identifiers(),
            None => Vec::new(),
        }
    }

    /// Identifiers from pages `1..=pages`, stopping at the first empty page.
    pub async fn search_pages(&self, query: &str, pages: u32) -> Vec<u64> {
        let mut all = Vec::new();
        for page in 1..=pages {
            let ids = self.search_products(query, page).await;
            if ids.is_empty() {
                info!(page, "no products on page, stopping");
                break;
            }
            all.extend(ids);
        }
        all
    }

    /// Total match count for a query, 0 if the catalog could not be reached.
    pub async fn get_total_count(&self, query: &str) -> u64 {
        self.search(query, 1)
            .await
            .map(|resp| resp.total())
            .unwrap_or(0)
    }
}
