//! HTTP client for the LTA DataMall `EVChargingPoints` endpoint.
//!
//! Wraps `reqwest` with DataMall-specific error handling, the `AccountKey`
//! credential header, and `$skip` pagination. The credential travels only in
//! a request header, never in a URL, so it cannot surface in logs or error
//! messages.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::DataMallError;
use crate::retry::retry_with_backoff;
use crate::types::FeedPage;

/// Records per OData page. The feed returns at most 500 records per request;
/// a shorter page means the end of the set.
pub const PAGE_SIZE: usize = 500;

/// Maximum number of pages to fetch before returning an error.
/// Prevents infinite loops if the feed keeps returning full pages.
const MAX_PAGES: usize = 40;

/// Client for the DataMall EV charging point feed.
///
/// Use [`DataMallClient::new`] for production or
/// [`DataMallClient::with_base_url`] to point at a mock server in tests.
pub struct DataMallClient {
    client: Client,
    account_key: String,
    base_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl DataMallClient {
    /// Creates a new client pointed at the production DataMall service root.
    ///
    /// # Errors
    ///
    /// Returns [`DataMallError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(account_key: &str, timeout_secs: u64) -> Result<Self, DataMallError> {
        Self::with_base_url(
            account_key,
            timeout_secs,
            chargemap_core::DEFAULT_DATAMALL_BASE_URL,
        )
    }

    /// Creates a new client with a custom service root (for testing with
    /// wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`DataMallError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`DataMallError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        account_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, DataMallError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("chargemap/0.1 (ev-availability)")
            .build()?;

        // Normalise: ensure the service root ends with exactly one slash so
        // joining the endpoint segment appends rather than replaces.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| DataMallError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            account_key: account_key.to_owned(),
            base_url,
            max_retries: 3,
            backoff_base_ms: 1_000,
        })
    }

    /// Overrides the retry policy. `max_retries` is the number of additional
    /// attempts after the first failure; `0` disables retries.
    #[must_use]
    pub fn with_retry_policy(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    /// Fetches one page of the feed at the given `$skip` offset, retrying
    /// transient failures per the configured policy.
    ///
    /// # Errors
    ///
    /// - [`DataMallError::UnexpectedStatus`] on a non-2xx response.
    /// - [`DataMallError::Http`] on network failure.
    /// - [`DataMallError::Deserialize`] if the body is not a feed envelope.
    pub async fn fetch_page(&self, skip: usize) -> Result<FeedPage, DataMallError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.fetch_page_once(skip)
        })
        .await
    }

    /// Fetches every page of the feed and returns the concatenated raw
    /// records. Stops at the first short page.
    ///
    /// **All-or-nothing semantics**: on any page failure, records from
    /// earlier pages are discarded and the error is returned — a partial
    /// collection would silently misrepresent availability coverage.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::fetch_page`], or
    /// [`DataMallError::PaginationLimit`] after [`MAX_PAGES`] full pages.
    pub async fn fetch_all(&self) -> Result<Vec<serde_json::Value>, DataMallError> {
        let mut records: Vec<serde_json::Value> = Vec::new();
        let mut skip = 0usize;
        let mut page_count = 0usize;

        loop {
            page_count += 1;
            if page_count > MAX_PAGES {
                return Err(DataMallError::PaginationLimit {
                    max_pages: MAX_PAGES,
                });
            }

            let page = self.fetch_page(skip).await?;
            let len = page.value.len();
            records.extend(page.value);

            if len < PAGE_SIZE {
                break;
            }
            skip += PAGE_SIZE;
        }

        tracing::debug!(records = records.len(), pages = page_count, "feed fetched");
        Ok(records)
    }

    async fn fetch_page_once(&self, skip: usize) -> Result<FeedPage, DataMallError> {
        let url = self.build_url(skip);

        let response = self
            .client
            .get(url.clone())
            .header("AccountKey", &self.account_key)
            .header("accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DataMallError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| DataMallError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }

    /// Builds the endpoint URL for one page. The `$skip` pair is always
    /// present so identical offsets produce identical URLs.
    fn build_url(&self, skip: usize) -> Url {
        let mut url = self
            .base_url
            .join("EVChargingPoints")
            .expect("static endpoint segment joins onto a parsed base URL");
        url.query_pairs_mut()
            .append_pair("$skip", &skip.to_string());
        url
    }
}
