//! Async HTTP client wrapping reqwest.
//!
//! One GET per call: no retries, no backoff. Callers decide what a failure
//! means for them.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, COOKIE, REFERER};
use tracing::debug;

use crate::types::{ScoutError, ScoutResult};

/// Response from an HTTP GET request.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Final URL, including the encoded query string.
    pub url: String,
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl HttpResponse {
    /// Fail on anything outside 2xx.
    pub fn error_for_status(self) -> ScoutResult<Self> {
        if (200..300).contains(&self.status) {
            Ok(self)
        } else {
            Err(ScoutError::Status {
                url: self.url,
                status: self.status,
            })
        }
    }

    /// Decode the body as JSON.
    pub fn json(&self) -> ScoutResult<serde_json::Value> {
        serde_json::from_str(&self.body)
            .map_err(|e| ScoutError::Decode(format!("{} ({} bytes): {e}", self.url, self.body.len())))
    }
}

/// Per-request extras.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions<'a> {
    pub cookie: Option<&'a str>,
    pub referer: Option<&'a str>,
}

/// HTTP client shared by the catalog and analytics clients.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpClient {
    /// Create a client with browser-like default headers.
    pub fn new(user_agent: &str, timeout: Duration) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/json, text/plain, */*"),
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("ru-RU,ru;q=0.9,en;q=0.8"),
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(user_agent)
            .default_headers(headers)
            .build()
            .unwrap_or_default();

        Self { client, timeout }
    }

    /// Perform a single GET with query parameters.
    pub async fn get(
        &self,
        url: &str,
        query: &[(&str, String)],
        opts: RequestOptions<'_>,
    ) -> ScoutResult<HttpResponse> {
        let mut builder = self.client.get(url).query(query).timeout(self.timeout);

        if let Some(cookie) = opts.cookie {
            builder = builder.header(COOKIE, cookie);
        }
        if let Some(referer) = opts.referer {
            builder = builder.header(REFERER, referer);
        }

        let r = builder.send().await?;
        let status = r.status().as_u16();
        let final_url = r.url().to_string();
        let body = r.text().await?;

        debug!(url = %final_url, status, bytes = body.len(), "GET completed");

        Ok(HttpResponse {
            url: final_url,
            status,
            body,
        })
    }

    /// GET, require 2xx, decode JSON.
    pub async fn get_json(
        &self,
        url: &str,
        query: &[(&str, String)],
        opts: RequestOptions<'_>,
    ) -> ScoutResult<serde_json::Value> {
        self.get(url, query, opts).await?.error_for_status()?.json()
    }
}
