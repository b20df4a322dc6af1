//! wbscope: catalog search, chunked sales analytics, and CDN image routing
//! joined into one sorted product report.

pub mod aggregator;
pub mod analytics;
pub mod config;
pub mod cookies;
pub mod http_client;
pub mod search;
pub mod shard;
pub mod types;

pub use aggregator::{Aggregator, AnalyticsSource, CatalogSource};
pub use analytics::{split, AnalyticsClient, BatchReport, ChunkOutcome, ChunkStatus};
pub use config::{ScoutConfig, MAX_CODES_PER_REQUEST};
pub use cookies::SessionCookies;
pub use search::{SearchClient, SearchResponse};
pub use shard::{image_urls, image_urls_on, ShardRoute, CDN_DOMAIN};
pub use types::*;
