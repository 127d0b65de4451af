//! HTTP client for the external HR directory API.
//!
//! Fetches the complete employee set via cursor pagination. Transient
//! transport failures (network errors, 429, 5xx) are retried a bounded
//! number of times per page with backoff; exhausting the retries is a
//! fatal error that aborts the whole sync run.

use std::time::Duration;

use serde::Deserialize;

use crate::record::RemoteEmployee;

/// Records requested per page.
const PAGE_SIZE: u32 = 100;

/// Retry attempts per page after the initial request.
const MAX_RETRIES: u32 = 3;

/// Base delay before the first retry; doubles on each subsequent one.
const RETRY_BASE_DELAY: Duration = Duration::from_millis(500);

/// Overall request timeout for one page fetch.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// TCP connect timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors from the directory API layer.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    /// A required credential is missing. Detected at construction and
    /// never retried.
    #[error("Directory sync is not configured: {0} is missing")]
    NotConfigured(&'static str),

    /// The API kept failing after all retries.
    #[error("Directory API request failed ({status}): {body}")]
    Api { status: u16, body: String },

    /// The HTTP request itself failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// One page of the paginated employee listing.
#[derive(Debug, Deserialize)]
struct EmployeePage {
    #[serde(default)]
    data: Vec<RemoteEmployee>,
    meta: PageMeta,
}

#[derive(Debug, Deserialize)]
struct PageMeta {
    #[serde(default)]
    next_page: Option<u32>,
}

/// Client for the external HR directory.
#[derive(Debug)]
pub struct DirectoryClient {
    client: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl DirectoryClient {
    /// Build a client from optional configuration.
    pub fn from_config(
        base_url: Option<&str>,
        access_token: Option<&str>,
    ) -> Result<Self, DirectoryError> {
        let base_url = base_url
            .filter(|u| !u.is_empty())
            .ok_or(DirectoryError::NotConfigured("DIRECTORY_BASE_URL"))?;
        let token = access_token
            .filter(|t| !t.is_empty())
            .ok_or(DirectoryError::NotConfigured("DIRECTORY_ACCESS_TOKEN"))?;
        Ok(Self::new(base_url.to_string(), token.to_string()))
    }

    pub fn new(base_url: String, access_token: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self {
            client,
            base_url,
            access_token,
        }
    }

    /// Fetch the complete remote employee set.
    ///
    /// Follows the `meta.next_page` cursor until it is absent.
    pub async fn fetch_all_employees(&self) -> Result<Vec<RemoteEmployee>, DirectoryError> {
        let mut employees = Vec::new();
        let mut page = 1;

        loop {
            tracing::debug!(page, "Fetching directory employees page");
            let body = self.fetch_page(page).await?;
            employees.extend(body.data);

            match body.meta.next_page {
                Some(next) => page = next,
                None => break,
            }
        }

        tracing::info!(total = employees.len(), "Fetched directory employees");
        Ok(employees)
    }

    /// Fetch one page, retrying transient failures with backoff.
    async fn fetch_page(&self, page: u32) -> Result<EmployeePage, DirectoryError> {
        let mut delay = RETRY_BASE_DELAY;
        let mut attempt = 0;

        loop {
            match self.try_fetch_page(page).await {
                Ok(body) => return Ok(body),
                Err(e) if attempt < MAX_RETRIES && is_transient(&e) => {
                    attempt += 1;
                    tracing::warn!(
                        page,
                        attempt,
                        error = %e,
                        "Directory page fetch failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
                Err(e) => {
                    tracing::error!(page, error = %e, "Directory page fetch failed");
                    return Err(e);
                }
            }
        }
    }

    /// Execute a single page request.
    async fn try_fetch_page(&self, page: u32) -> Result<EmployeePage, DirectoryError> {
        let response = self
            .client
            .get(format!("{}/crews", self.base_url))
            .bearer_auth(&self.access_token)
            .query(&[("page", page), ("per", PAGE_SIZE)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DirectoryError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}

/// Whether an error is worth retrying at the HTTP layer.
///
/// Timeouts and connection failures count the same as rate limiting
/// and server errors; 4xx responses (other than 429) do not.
fn is_transient(error: &DirectoryError) -> bool {
    match error {
        DirectoryError::Request(_) => true,
        DirectoryError::Api { status, .. } => *status == 429 || (500..=599).contains(status),
        DirectoryError::NotConfigured(_) => false,
    }
}
