//! Catalog + analytics join.
//!
//! The join is driven by analytics records: a catalog product with no sales
//! data is dropped, a sales record with no catalog match is kept with empty
//! image and name fields. Output order is sales descending, then identifier
//! ascending.

use std::cmp::Ordering;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::analytics::{AnalyticsClient, BatchReport};
use crate::config::ScoutConfig;
use crate::cookies::SessionCookies;
use crate::search::{SearchClient, SearchResponse};
use crate::shard;
use crate::types::{
    AnalyticsRecord, CatalogIndex, EnrichedRecord, EnrichmentReport, ScoutError, ScoutResult,
};

/// Where catalog pages come from.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// One catalog page, or `None` if it could not be fetched.
    async fn fetch_page(&self, query: &str, page: u32) -> Option<SearchResponse>;
}

/// Where sales figures come from.
#[async_trait]
pub trait AnalyticsSource: Send + Sync {
    fn has_session(&self) -> bool;

    async fn fetch_all(&self, ids: &[u64]) -> BatchReport;
}

#[async_trait]
impl CatalogSource for SearchClient {
    async fn fetch_page(&self, query: &str, page: u32) -> Option<SearchResponse> {
        self.search(query, page).await
    }
}

#[async_trait]
impl AnalyticsSource for AnalyticsClient {
    fn has_session(&self) -> bool {
        AnalyticsClient::has_session(self)
    }

    async fn fetch_all(&self, ids: &[u64]) -> BatchReport {
        AnalyticsClient::fetch_all(self, ids).await
    }
}

/// Sales descending, identifier ascending on ties.
pub fn by_sales_desc(a: &AnalyticsRecord, b: &AnalyticsRecord) -> Ordering {
    b.sales.cmp(&a.sales).then_with(|| a.id.cmp(&b.id))
}

/// Join sorted analytics records with catalog data.
pub fn join(
    mut analytics: Vec<AnalyticsRecord>,
    catalog: &CatalogIndex,
    cdn_domain: &str,
) -> Vec<EnrichedRecord> {
    analytics.sort_by(by_sales_desc);

    analytics
        .into_iter()
        .map(|a| {
            let (image_count, image_urls, name) = match catalog.get(a.id) {
                Some(c) => (
                    c.image_count,
                    shard::image_urls_on(cdn_domain, a.id, c.image_count),
                    c.name.clone().unwrap_or_default(),
                ),
                None => (0, Vec::new(), String::new()),
            };
            EnrichedRecord {
                id: a.id,
                name,
                sales: a.sales,
                revenue: a.revenue,
                lost_revenue: a.lost_revenue,
                avg_price: a.avg_price,
                image_count,
                image_urls,
            }
        })
        .collect()
}

/// Runs the search → analytics → join pipeline.
pub struct Aggregator<C, A> {
    catalog: C,
    analytics: A,
    cdn_domain: String,
}

impl Aggregator<SearchClient, AnalyticsClient> {
    /// Aggregator over the live HTTP clients.
    pub fn from_config(config: ScoutConfig, cookies: Option<SessionCookies>) -> Self {
        let cdn_domain = config.cdn_domain.clone();
        Self {
            catalog: SearchClient::new(config.clone()),
            analytics: AnalyticsClient::new(config, cookies),
            cdn_domain,
        }
    }
}

impl<C: CatalogSource, A: AnalyticsSource> Aggregator<C, A> {
    pub fn new(catalog: C, analytics: A) -> Self {
        Self {
            catalog,
            analytics,
            cdn_domain: shard::CDN_DOMAIN.to_string(),
        }
    }

    fn require_session(&self) -> ScoutResult<()> {
        if self.analytics.has_session() {
            Ok(())
        } else {
            Err(ScoutError::MissingCredentials)
        }
    }

    /// Enrich one catalog page.
    ///
    /// `max_products` keeps the first N products in catalog order before any
    /// sales data is requested. The only error is a missing analytics session.
    pub async fn enrich(
        &self,
        query: &str,
        page: u32,
        max_products: Option<usize>,
    ) -> ScoutResult<EnrichmentReport> {
        self.require_session()?;
        info!(query, page, ?max_products, "enriching catalog page");

        let Some(response) = self.catalog.fetch_page(query, page).await else {
            warn!(query, page, "catalog unavailable, returning empty result");
            return Ok(EnrichmentReport {
                query: Some(query.to_string()),
                page,
                records: Vec::new(),
                found_count: 0,
                detailed_count: 0,
                total: None,
                catalog_available: false,
                analytics_complete: true,
                failed_chunks: 0,
            });
        };

        let mut index = response.extract_with_image_counts();
        let found_count = index.len();
        if let Some(limit) = max_products {
            index.truncate(limit);
        }

        let batch = self.analytics.fetch_all(index.ids()).await;
        let analytics_complete = batch.is_complete();
        let failed_chunks = batch.failed_chunks();
        let records = join(batch.records, &index, &self.cdn_domain);

        info!(
            found = found_count,
            detailed = records.len(),
            failed_chunks,
            "enrichment finished"
        );

        Ok(EnrichmentReport {
            query: Some(query.to_string()),
            page,
            detailed_count: records.len(),
            records,
            found_count,
            total: Some(response.total()),
            catalog_available: true,
            analytics_complete,
            failed_chunks,
        })
    }

    /// Enrich an explicit identifier list without a catalog lookup.
    ///
    /// Records carry sales figures only: no names, no image URLs.
    pub async fn enrich_ids(&self, ids: &[u64]) -> ScoutResult<EnrichmentReport> {
        self.require_session()?;
        info!(count = ids.len(), "enriching explicit ids");

        let batch = self.analytics.fetch_all(ids).await;
        let analytics_complete = batch.is_complete();
        let failed_chunks = batch.failed_chunks();
        let records = join(batch.records, &CatalogIndex::new(), &self.cdn_domain);

        Ok(EnrichmentReport {
            query: None,
            page: 0,
            detailed_count: records.len(),
            records,
            found_count: ids.len(),
            total: None,
            catalog_available: false,
            analytics_complete,
            failed_chunks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{ChunkOutcome, ChunkStatus};
    use crate::types::CatalogRecord;
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct FakeCatalog(Option<Value>);

    #[async_trait]
    impl CatalogSource for FakeCatalog {
        async fn fetch_page(&self, _query: &str, _page: u32) -> Option<SearchResponse> {
            self.0.clone().map(SearchResponse::new)
        }
    }

    /// Answers from a fixed sales table and records every requested id list.
    struct FakeAnalytics {
        session: bool,
        sales: HashMap<u64, u64>,
        requested: Mutex<Vec<Vec<u64>>>,
    }

    impl FakeAnalytics {
        fn new(sales: &[(u64, u64)]) -> Self {
            Self {
                session: true,
                sales: sales.iter().copied().collect(),
                requested: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl AnalyticsSource for FakeAnalytics {
        fn has_session(&self) -> bool {
            self.session
        }

        async fn fetch_all(&self, ids: &[u64]) -> BatchReport {
            self.requested.lock().unwrap().push(ids.to_vec());
            let records: Vec<AnalyticsRecord> = ids
                .iter()
                .filter_map(|id| {
                    self.sales.get(id).map(|&sales| AnalyticsRecord {
                        id: *id,
                        sales,
                        revenue: 0.0,
                        lost_revenue: 0.0,
                        avg_price: 0.0,
                    })
                })
                .collect();
            BatchReport {
                chunks: vec![ChunkStatus {
                    index: 0,
                    size: ids.len(),
                    outcome: ChunkOutcome::Fetched {
                        records: records.len(),
                    },
                }],
                records,
            }
        }
    }

    fn catalog_page(products: &[(u64, u32)]) -> Value {
        let products: Vec<Value> = products
            .iter()
            .map(|(id, pics)| json!({ "id": id, "pics": pics, "name": format!("item {id}") }))
            .collect();
        json!({ "products": products, "total": 500 })
    }

    fn analytics(id: u64, sales: u64) -> AnalyticsRecord {
        AnalyticsRecord {
            id,
            sales,
            revenue: 0.0,
            lost_revenue: 0.0,
            avg_price: 0.0,
        }
    }

    #[test]
    fn test_join_sorts_and_attaches() {
        let mut index = CatalogIndex::new();
        index.insert(CatalogRecord {
            id: 164105063,
            image_count: 2,
            name: Some("jacket".into()),
            raw: json!({}),
        });
        let joined = join(
            vec![analytics(5, 10), analytics(164105063, 30), analytics(2, 10)],
            &index,
            "wbbasket.ru",
        );
        let ids: Vec<u64> = joined.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![164105063, 2, 5]);
        assert_eq!(joined[0].name, "jacket");
        assert_eq!(joined[0].image_urls.len(), 2);
        assert_eq!(joined[1].name, "");
        assert!(joined[1].image_urls.is_empty());
        assert_eq!(joined[1].image_count, 0);
    }

    #[tokio::test]
    async fn test_end_to_end_drops_unmatched_catalog() {
        let (a, b, c) = (111_000_001, 222_000_002, 333_000_003);
        let agg = Aggregator::new(
            FakeCatalog(Some(catalog_page(&[(a, 2), (b, 0), (c, 5)]))),
            FakeAnalytics::new(&[(a, 40), (c, 90)]),
        );
        let report = agg.enrich("q", 1, None).await.unwrap();

        assert_eq!(report.found_count, 3);
        assert_eq!(report.detailed_count, 2);
        assert_eq!(report.total, Some(500));
        assert_eq!(report.records[0].id, c);
        assert_eq!(report.records[0].image_urls.len(), 5);
        assert_eq!(report.records[1].id, a);
        assert_eq!(report.records[1].image_urls.len(), 2);
        assert!(report.analytics_complete);
    }

    #[tokio::test]
    async fn test_truncation_uses_catalog_order() {
        // Catalog order 1,2,3 but sales favour 3. Truncating to two must
        // keep 1 and 2, never 3.
        let agg = Aggregator::new(
            FakeCatalog(Some(catalog_page(&[(1, 0), (2, 0), (3, 0)]))),
            FakeAnalytics::new(&[(1, 5), (2, 7), (3, 1000)]),
        );
        let report = agg.enrich("q", 1, Some(2)).await.unwrap();

        let ids: Vec<u64> = report.records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(report.found_count, 3);
        assert_eq!(agg.analytics.requested.lock().unwrap()[0], vec![1, 2]);
    }

    #[tokio::test]
    async fn test_missing_session_is_hard_error() {
        let mut fake = FakeAnalytics::new(&[]);
        fake.session = false;
        let agg = Aggregator::new(FakeCatalog(Some(catalog_page(&[(1, 1)]))), fake);

        assert!(matches!(
            agg.enrich("q", 1, None).await,
            Err(ScoutError::MissingCredentials)
        ));
        assert!(matches!(
            agg.enrich_ids(&[1]).await,
            Err(ScoutError::MissingCredentials)
        ));
        assert!(agg.analytics.requested.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_catalog_failure_yields_empty_report() {
        let agg = Aggregator::new(FakeCatalog(None), FakeAnalytics::new(&[(1, 1)]));
        let report = agg.enrich("q", 1, None).await.unwrap();
        assert!(report.records.is_empty());
        assert!(!report.catalog_available);
        assert_eq!(report.total, None);
        assert!(agg.analytics.requested.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_enrich_is_deterministic() {
        let page = catalog_page(&[(10, 1), (11, 2), (12, 3), (13, 0)]);
        let sales = [(10, 5), (11, 5), (12, 9), (13, 5)];
        let first = Aggregator::new(FakeCatalog(Some(page.clone())), FakeAnalytics::new(&sales))
            .enrich("q", 1, None)
            .await
            .unwrap();
        let second = Aggregator::new(FakeCatalog(Some(page)), FakeAnalytics::new(&sales))
            .enrich("q", 1, None)
            .await
            .unwrap();

        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
        let ids: Vec<u64> = first.records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![12, 10, 11, 13]);
    }

    #[tokio::test]
    async fn test_enrich_ids_has_no_images() {
        let agg = Aggregator::new(FakeCatalog(None), FakeAnalytics::new(&[(7, 3), (8, 4)]));
        let report = agg.enrich_ids(&[7, 8, 9]).await.unwrap();
        assert_eq!(report.found_count, 3);
        assert_eq!(report.detailed_count, 2);
        assert_eq!(report.records[0].id, 8);
        assert!(report.records.iter().all(|r| r.image_urls.is_empty()));
    }
}
