//! Core record types for catalog, analytics, and enriched product data.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Storefront product page prefix.
pub const PRODUCT_PAGE_BASE: &str = "https://www.wildberries.ru/catalog";

/// A product as seen by the catalog search API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub id: u64,
    pub image_count: u32,
    pub name: Option<String>,
    /// The untouched catalog element.
    pub raw: serde_json::Value,
}

/// Catalog records keyed by identifier, remembering first-seen catalog order.
///
/// Inserting an identifier that already exists replaces its record but keeps
/// the original position.
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    order: Vec<u64>,
    records: HashMap<u64, CatalogRecord>,
}

impl CatalogIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, overwriting any previous record with the same id.
    pub fn insert(&mut self, record: CatalogRecord) {
        if !self.records.contains_key(&record.id) {
            self.order.push(record.id);
        }
        self.records.insert(record.id, record);
    }

    /// Look up a record by identifier.
    pub fn get(&self, id: u64) -> Option<&CatalogRecord> {
        self.records.get(&id)
    }

    /// Identifiers in catalog order.
    pub fn ids(&self) -> &[u64] {
        &self.order
    }

    /// Records in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &CatalogRecord> {
        self.order.iter().filter_map(|id| self.records.get(id))
    }

    /// Keep only the first `limit` identifiers.
    pub fn truncate(&mut self, limit: usize) {
        if self.order.len() <= limit {
            return;
        }
        for id in self.order.drain(limit..) {
            self.records.remove(&id);
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Sales figures for one product from the analytics API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsRecord {
    pub id: u64,
    pub sales: u64,
    pub revenue: f64,
    pub lost_revenue: f64,
    pub avg_price: f64,
}

impl AnalyticsRecord {
    /// Build a record from one value of the analytics response map.
    ///
    /// Returns `None` when the value is not a JSON object. Missing or
    /// non-numeric fields read as zero.
    pub fn from_json(id: u64, value: &serde_json::Value) -> Option<Self> {
        let obj = value.as_object()?;
        Some(Self {
            id,
            sales: lenient_u64(obj.get("sales")),
            revenue: lenient_f64(obj.get("revenue")),
            lost_revenue: lenient_f64(obj.get("lost_revenue")),
            avg_price: lenient_f64(obj.get("avg_price")),
        })
    }
}

/// A catalog record joined with its analytics record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    pub id: u64,
    pub name: String,
    pub sales: u64,
    pub revenue: f64,
    pub lost_revenue: f64,
    pub avg_price: f64,
    pub image_count: u32,
    pub image_urls: Vec<String>,
}

impl EnrichedRecord {
    /// Storefront page for this product.
    pub fn product_url(&self) -> String {
        format!("{PRODUCT_PAGE_BASE}/{}/detail.aspx", self.id)
    }
}

/// Result of one aggregation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentReport {
    pub query: Option<String>,
    pub page: u32,
    pub records: Vec<EnrichedRecord>,
    /// Identifiers found before `max_products` truncation.
    pub found_count: usize,
    pub detailed_count: usize,
    /// `total` reported by the catalog, when a catalog page was fetched.
    pub total: Option<u64>,
    pub catalog_available: bool,
    pub analytics_complete: bool,
    pub failed_chunks: usize,
}

impl EnrichmentReport {
    /// Longest image list across all records.
    pub fn max_image_count(&self) -> usize {
        self.records
            .iter()
            .map(|r| r.image_urls.len())
            .max()
            .unwrap_or(0)
    }
}

/// Parse an identifier that may arrive as a JSON number or numeric string.
pub fn parse_identifier(value: &serde_json::Value) -> Option<u64> {
    match value {
        serde_json::Value::Number(n) => n.as_u64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Non-negative count from a number or numeric string. Fractions are
/// truncated, negatives and garbage read as zero.
pub(crate) fn lenient_u64(value: Option<&serde_json::Value>) -> u64 {
    match value {
        Some(serde_json::Value::Number(n)) => n.as_u64().unwrap_or_else(|| truncate(n.as_f64())),
        Some(serde_json::Value::String(s)) => {
            let s = s.trim();
            s.parse()
                .unwrap_or_else(|_| truncate(s.parse::<f64>().ok()))
        }
        _ => 0,
    }
}

fn truncate(value: Option<f64>) -> u64 {
    match value {
        Some(f) if f.is_finite() && f > 0.0 => f as u64,
        _ => 0,
    }
}

fn lenient_f64(value: Option<&serde_json::Value>) -> f64 {
    match value {
        Some(serde_json::Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(serde_json::Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Errors that can occur in the scope library.
#[derive(thiserror::Error, Debug)]
pub enum ScoutError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Unexpected response shape: {0}")]
    UnexpectedShape(String),

    #[error("Analytics session cookies are missing")]
    MissingCredentials,

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Convenience result type.
pub type ScoutResult<T> = Result<T, ScoutError>;
