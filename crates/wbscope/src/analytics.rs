//! Chunked client for the sales analytics API.
//!
//! The API takes at most 20 product codes per request and answers with a map
//! of code → sales figures. Identifier lists are split into chunks that are
//! fetched one after another; a failed chunk contributes no records and is
//! reported in the [`BatchReport`] instead of aborting the run.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::ScoutConfig;
use crate::cookies::SessionCookies;
use crate::http_client::{HttpClient, RequestOptions};
use crate::types::{AnalyticsRecord, ScoutError, ScoutResult};

const REFERER: &str = "https://app.mayak.bz/";

/// Split identifiers into consecutive chunks of at most `chunk_size`.
///
/// A `chunk_size` of zero is treated as one.
pub fn split(ids: &[u64], chunk_size: usize) -> Vec<Vec<u64>> {
    ids.chunks(chunk_size.max(1)).map(<[u64]>::to_vec).collect()
}

/// What happened to one chunk.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ChunkOutcome {
    Fetched { records: usize },
    Failed { reason: String },
}

/// Per-chunk status in request order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChunkStatus {
    pub index: usize,
    pub size: usize,
    #[serde(flatten)]
    pub outcome: ChunkOutcome,
}

impl ChunkStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, ChunkOutcome::Failed { .. })
    }
}

/// Merged analytics records plus how each chunk fared.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    pub records: Vec<AnalyticsRecord>,
    pub chunks: Vec<ChunkStatus>,
}

impl BatchReport {
    /// True when every chunk was fetched.
    pub fn is_complete(&self) -> bool {
        self.chunks.iter().all(|c| !c.is_failed())
    }

    pub fn failed_chunks(&self) -> usize {
        self.chunks.iter().filter(|c| c.is_failed()).count()
    }
}

/// Turn one analytics response body into records.
///
/// The body must be a JSON object keyed by identifier strings. Keys that are
/// not identifiers and values that are not objects are skipped.
pub fn parse_products_response(body: &Value) -> ScoutResult<Vec<AnalyticsRecord>> {
    let map = body.as_object().ok_or_else(|| {
        ScoutError::UnexpectedShape(format!(
            "expected an object keyed by product code, got {}",
            json_kind(body)
        ))
    })?;

    let mut records = Vec::with_capacity(map.len());
    for (key, value) in map {
        let Ok(id) = key.trim().parse::<u64>() else {
            warn!(key = %key, "skipping non-numeric product code");
            continue;
        };
        match AnalyticsRecord::from_json(id, value) {
            Some(record) => records.push(record),
            None => debug!(id, "skipping non-object analytics entry"),
        }
    }
    Ok(records)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Client for the analytics products endpoint.
#[derive(Clone)]
pub struct AnalyticsClient {
    http: HttpClient,
    config: ScoutConfig,
    cookies: Option<SessionCookies>,
}

impl AnalyticsClient {
    pub fn new(config: ScoutConfig, cookies: Option<SessionCookies>) -> Self {
        let http = HttpClient::new(&config.user_agent, config.timeout);
        let cookies = cookies.filter(|c| !c.is_empty());
        if let Some(c) = &cookies {
            info!(count = c.len(), "analytics session cookies set");
        }
        Self {
            http,
            config,
            cookies,
        }
    }

    /// Whether a session is configured.
    pub fn has_session(&self) -> bool {
        self.cookies.is_some()
    }

    pub fn chunk_size(&self) -> usize {
        self.config.chunk_size.max(1)
    }

    /// Fetch one chunk. Errors are returned, not swallowed.
    pub async fn fetch_chunk(&self, chunk: &[u64]) -> ScoutResult<Vec<AnalyticsRecord>> {
        if chunk.len() > self.chunk_size() {
            return Err(ScoutError::InvalidInput(format!(
                "chunk of {} codes exceeds the limit of {}",
                chunk.len(),
                self.chunk_size()
            )));
        }

        let codes = chunk
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let cookie = self.cookies.as_ref().map(SessionCookies::header_value);

        let body = self
            .http
            .get_json(
                &self.config.analytics_url,
                &[("codes", codes)],
                RequestOptions {
                    cookie: cookie.as_deref(),
                    referer: Some(REFERER),
                },
            )
            .await?;

        parse_products_response(&body)
    }

    /// Fetch analytics for any number of identifiers, chunk by chunk.
    pub async fn fetch_all(&self, ids: &[u64]) -> BatchReport {
        let chunks = split(ids, self.chunk_size());
        info!(codes = ids.len(), chunks = chunks.len(), "fetching analytics");

        let mut report = BatchReport::default();
        for (index, chunk) in chunks.iter().enumerate() {
            if index > 0 && !self.config.chunk_pause.is_zero() {
                tokio::time::sleep(self.config.chunk_pause).await;
            }

            debug!(chunk = index + 1, total = chunks.len(), size = chunk.len(), "requesting chunk");
            let outcome = match self.fetch_chunk(chunk).await {
                Ok(records) => {
                    let n = records.len();
                    report.records.extend(records);
                    ChunkOutcome::Fetched { records: n }
                }
                Err(e) => {
                    warn!(chunk = index + 1, error = %e, "analytics chunk dropped");
                    ChunkOutcome::Failed {
                        reason: e.to_string(),
                    }
                }
            };
            report.chunks.push(ChunkStatus {
                index,
                size: chunk.len(),
                outcome,
            });
        }

        info!(
            records = report.records.len(),
            failed_chunks = report.failed_chunks(),
            "analytics fetch finished"
        );
        report
    }

    /// Records for `ids`, chunking transparently when over the per-request limit.
    pub async fn fetch_products(&self, ids: &[u64]) -> Vec<AnalyticsRecord> {
        if ids.len() > self.chunk_size() {
            debug!(
                codes = ids.len(),
                limit = self.chunk_size(),
                "over-limit request split into chunks"
            );
        }
        self.fetch_all(ids).await.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    #[test]
    fn test_split_sizes() {
        for n in 0..65usize {
            let ids: Vec<u64> = (1..=n as u64).collect();
            for size in [1usize, 3, 20] {
                let chunks = split(&ids, size);
                assert_eq!(chunks.len(), n.div_ceil(size), "n={n} size={size}");
                assert!(chunks.iter().all(|c| !c.is_empty() && c.len() <= size));
                assert_eq!(chunks.concat(), ids);
            }
        }
    }

    #[test]
    fn test_split_zero_chunk_size() {
        assert_eq!(split(&[1, 2], 0), vec![vec![1], vec![2]]);
    }

    #[test]
    fn test_parse_products_response() {
        let body = json!({
            "64775386": { "sales": 7193, "revenue": 19747579, "lost_revenue": 11161879, "avg_price": 2689 },
            "306897066": { "sales": 12450 },
            "bogus": { "sales": 1 },
            "5": "not an object"
        });
        let mut records = parse_products_response(&body).unwrap();
        records.sort_by_key(|r| r.id);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, 64775386);
        assert_eq!(records[0].sales, 7193);
        assert_eq!(records[0].lost_revenue, 11161879.0);
        assert_eq!(records[1].id, 306897066);
        assert_eq!(records[1].revenue, 0.0);
    }

    #[test]
    fn test_parse_products_response_wrong_shape() {
        assert!(matches!(
            parse_products_response(&json!([1, 2, 3])),
            Err(ScoutError::UnexpectedShape(_))
        ));
    }

    #[test]
    fn test_report_completeness() {
        let mut report = BatchReport::default();
        assert!(report.is_complete());
        report.chunks.push(ChunkStatus {
            index: 0,
            size: 20,
            outcome: ChunkOutcome::Fetched { records: 20 },
        });
        report.chunks.push(ChunkStatus {
            index: 1,
            size: 3,
            outcome: ChunkOutcome::Failed {
                reason: "timeout".into(),
            },
        });
        assert!(!report.is_complete());
        assert_eq!(report.failed_chunks(), 1);
    }

    #[test]
    fn test_empty_cookies_mean_no_session() {
        let client = AnalyticsClient::new(ScoutConfig::default(), Some(SessionCookies::parse("")));
        assert!(!client.has_session());
        let client = AnalyticsClient::new(ScoutConfig::default(), Some(SessionCookies::parse("a=1")));
        assert!(client.has_session());
    }

    #[test]
    fn test_oversized_chunk_rejected() {
        let client = AnalyticsClient::new(ScoutConfig::default(), None);
        let ids: Vec<u64> = (0..21).collect();
        let result = tokio_test::block_on(client.fetch_chunk(&ids));
        assert!(matches!(result, Err(ScoutError::InvalidInput(_))));
    }

    /// Every chunk fails at request build time, so the only timers are the pauses.
    fn unroutable_client(pause: Duration) -> AnalyticsClient {
        let config = ScoutConfig {
            analytics_url: "not a url".into(),
            chunk_pause: pause,
            ..ScoutConfig::default()
        };
        AnalyticsClient::new(config, None)
    }

    #[tokio::test(start_paused = true)]
    async fn test_chunk_pause_between_chunks() {
        let client = unroutable_client(Duration::from_secs(2));
        let ids: Vec<u64> = (1..=45).collect();

        let start = tokio::time::Instant::now();
        let report = client.fetch_all(&ids).await;
        let elapsed = start.elapsed();

        assert_eq!(report.chunks.len(), 3);
        assert_eq!(report.failed_chunks(), 3);
        // three chunks, two pauses
        assert!(elapsed >= Duration::from_secs(4), "elapsed {elapsed:?}");
        assert!(elapsed < Duration::from_secs(6), "elapsed {elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_pause_by_default() {
        let client = unroutable_client(Duration::ZERO);
        let ids: Vec<u64> = (1..=45).collect();

        let start = tokio::time::Instant::now();
        let report = client.fetch_all(&ids).await;

        assert_eq!(report.chunks.len(), 3);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_chunk_never_pauses() {
        let client = unroutable_client(Duration::from_secs(2));

        let start = tokio::time::Instant::now();
        client.fetch_all(&[1, 2, 3]).await;

        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
