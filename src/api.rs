//! Async client for the **World Bank Indicators API (v2)**.
//!
//! Covers the two endpoints the stores need: the `country` catalog and
//! `country/{code}/indicator/{code}` time series. Every call is a single
//! best-effort GET: no retries, no caching. Failures surface unchanged to the
//! caller as [`ApiError`].
//!
//! ### Notes
//! - Responses are a two-element array `[meta, records]`. [`decode_records`] is the
//!   only place that interprets that shape.
//! - The service answers `[meta, null]` when a series has no rows; that decodes as
//!   an empty list. A missing second element is a decode error.
//! - The catalog is requested as one page of 300 records, which covers every
//!   country and aggregate the API knows about.
//!
//! Typical usage:
//! ```no_run
//! # use wbi_connectivity::{Client, Indicator, StatsSource};
//! # async fn run() -> Result<(), wbi_connectivity::ApiError> {
//! let client = Client::with_base_url("https://api.worldbank.org/v2")?;
//! let series = client
//!     .indicator_series("DEU", Indicator::InternetUsers.code(), 10)
//!     .await?;
//! # Ok(())
//! # }
//! ```
use crate::error::ApiError;
use crate::models::{Country, DataPoint, Meta};
use async_trait::async_trait;
use log::debug;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};
use reqwest::redirect::Policy;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.worldbank.org/v2";

/// Page size for the catalog request; large enough for the full country list.
pub const COUNTRY_PAGE_SIZE: u32 = 300;

/// Most-recent years requested per indicator for the detail view.
pub const DEFAULT_SERIES_POINTS: u32 = 10;

/// Source of countries and indicator observations.
///
/// Stores depend on this trait rather than on [`Client`], so tests can drive
/// them with scripted responses.
#[async_trait]
pub trait StatsSource: Send + Sync {
    /// Full country list, aggregates included.
    async fn list_countries(&self) -> Result<Vec<Country>, ApiError>;

    /// Up to `max_points` most-recent observations, most-recent-first.
    async fn indicator_series(
        &self,
        country_id: &str,
        indicator_id: &str,
        max_points: u32,
    ) -> Result<Vec<DataPoint>, ApiError>;

    /// Most recent non-null value for one country and indicator.
    async fn latest_value(
        &self,
        country_id: &str,
        indicator_id: &str,
    ) -> Result<Option<f64>, ApiError>;
}

#[async_trait]
impl<S: StatsSource + ?Sized> StatsSource for Arc<S> {
    async fn list_countries(&self) -> Result<Vec<Country>, ApiError> {
        (**self).list_countries().await
    }

    async fn indicator_series(
        &self,
        country_id: &str,
        indicator_id: &str,
        max_points: u32,
    ) -> Result<Vec<DataPoint>, ApiError> {
        (**self)
            .indicator_series(country_id, indicator_id, max_points)
            .await
    }

    async fn latest_value(
        &self,
        country_id: &str,
        indicator_id: &str,
    ) -> Result<Option<f64>, ApiError> {
        (**self).latest_value(country_id, indicator_id).await
    }
}

/// HTTP settings for [`Client`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    /// Whole-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            timeout: None,
            user_agent: concat!("wbi-connectivity/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    http: reqwest::Client,
}

// Allow -, _, . unescaped in codes (common for indicator ids)
const SAFE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

fn enc(segment: &str) -> String {
    percent_encoding::utf8_percent_encode(segment.trim(), SAFE).to_string()
}

impl Client {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder()
            .redirect(Policy::limited(5)) // cap redirects
            .user_agent(config.user_agent.as_str());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ApiError::network(&config.base_url, e))?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Client with default settings against another base URL (mirrors, test servers).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ApiError> {
        Self::new(ClientConfig {
            base_url: base_url.into(),
            ..ClientConfig::default()
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn series_url(&self, country_id: &str, indicator_id: &str) -> String {
        format!(
            "{}/country/{}/indicator/{}?format=json",
            self.base_url,
            enc(country_id),
            enc(indicator_id)
        )
    }

    async fn get_records<T: DeserializeOwned>(&self, url: &str) -> Result<Vec<T>, ApiError> {
        debug!("GET {}", url);
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::network(url, e))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::network(
                url,
                format!("request failed with HTTP {}", status),
            ));
        }
        let body: Value = resp
            .json()
            .await
            .map_err(|e| ApiError::decode(url, format!("decode json: {}", e)))?;
        decode_records(url, body)
    }
}

#[async_trait]
impl StatsSource for Client {
    async fn list_countries(&self) -> Result<Vec<Country>, ApiError> {
        let url = format!(
            "{}/country?format=json&per_page={}",
            self.base_url, COUNTRY_PAGE_SIZE
        );
        self.get_records(&url).await
    }

    async fn indicator_series(
        &self,
        country_id: &str,
        indicator_id: &str,
        max_points: u32,
    ) -> Result<Vec<DataPoint>, ApiError> {
        let url = format!(
            "{}&per_page={}",
            self.series_url(country_id, indicator_id),
            max_points.max(1)
        );
        self.get_records(&url).await
    }

    async fn latest_value(
        &self,
        country_id: &str,
        indicator_id: &str,
    ) -> Result<Option<f64>, ApiError> {
        // mrnev=1: most recent non-empty value, already first in the page.
        let url = format!(
            "{}&per_page=1&mrnev=1",
            self.series_url(country_id, indicator_id)
        );
        let points: Vec<DataPoint> = self.get_records(&url).await?;
        Ok(points.into_iter().find_map(|p| p.value))
    }
}

/// Decode a `[meta, records]` response body into typed records.
///
/// ### Errors
/// - `Service` when position 0 carries a `message` payload
/// - `Decode` when the body is not an array, the records element is missing,
///   or the records do not match `T`
pub fn decode_records<T: DeserializeOwned>(url: &str, body: Value) -> Result<Vec<T>, ApiError> {
    let Value::Array(mut arr) = body else {
        return Err(ApiError::decode(url, "not a top-level array"));
    };
    let Some(head) = arr.first() else {
        return Err(ApiError::decode(url, "empty array"));
    };
    if let Some(message) = head.get("message") {
        return Err(ApiError::Service(service_message(message)));
    }
    if let Ok(meta) = serde_json::from_value::<Meta>(head.clone()) {
        debug!(
            "page {}/{} ({} per page, {} total) from {}",
            meta.page, meta.pages, meta.per_page, meta.total, url
        );
    }
    if arr.len() < 2 {
        return Err(ApiError::decode(url, "records element missing"));
    }
    match arr.swap_remove(1) {
        Value::Null => Ok(Vec::new()),
        records @ Value::Array(_) => serde_json::from_value(records)
            .map_err(|e| ApiError::decode(url, format!("malformed records: {}", e))),
        other => Err(ApiError::decode(
            url,
            format!("records element is not an array: {}", other),
        )),
    }
}

/// The service reports errors as `{"message": [{"id", "key", "value"}]}`.
fn service_message(message: &Value) -> String {
    message
        .as_array()
        .and_then(|items| items.first())
        .and_then(|item| item.get("value").or_else(|| item.get("key")))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| message.to_string())
}
