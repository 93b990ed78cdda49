//! HTTP client with rate limiting for the Manganato site
//!
//! This module provides a rate-limited HTTP client that bounds every fetch
//! with a timeout and retries transient upstream errors with exponential
//! backoff.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::{sleep, timeout};

use crate::error::{MangaError, Result};

/// Default User-Agent mimicking a modern browser
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Default Accept-Language header
const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Rate limiter to control request frequency
///
/// Ensures that requests are spaced at least `min_interval` apart
/// to avoid overwhelming the upstream server.
pub struct RateLimiter {
    /// Minimum interval between requests
    min_interval: Duration,
    /// Timestamp of the last request
    last_request: Arc<Mutex<Option<Instant>>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the specified requests per second
    ///
    /// # Example
    /// ```
    /// use manganato_core::client::RateLimiter;
    ///
    /// let limiter = RateLimiter::new(2.0); // 2 requests per second
    /// assert_eq!(limiter.min_interval().as_millis(), 500);
    /// ```
    pub fn new(requests_per_second: f64) -> Self {
        let min_interval = if requests_per_second > 0.0 {
            Duration::from_secs_f64(1.0 / requests_per_second)
        } else {
            Duration::ZERO
        };
        Self {
            min_interval,
            last_request: Arc::new(Mutex::new(None)),
        }
    }

    /// Acquire permission to make a request
    ///
    /// Waits if necessary so that the minimum interval between requests
    /// is respected.
    pub async fn acquire(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                sleep(self.min_interval - elapsed).await;
            }
        }

        *last = Some(Instant::now());
    }

    /// Get the minimum interval between requests
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}

/// Configuration for the upstream HTTP client
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Maximum requests per second (default: 4.0, 0 disables throttling)
    pub requests_per_second: f64,
    /// Per-request timeout in seconds (default: 10)
    pub timeout_secs: u64,
    /// Retries after the first attempt for 429 and 5xx answers (default: 2)
    pub max_retries: u32,
    /// Base delay for exponential backoff in milliseconds (default: 500)
    pub retry_base_delay_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            requests_per_second: 4.0,
            timeout_secs: 10,
            max_retries: 2,
            retry_base_delay_ms: 500,
        }
    }
}

/// HTTP client for the upstream site with rate limiting and retry logic
///
/// This client automatically:
/// - Limits request rate to avoid server overload
/// - Bounds every request with a timeout
/// - Retries on transient errors (429, 5xx) with exponential backoff
pub struct MangaClient {
    client: reqwest::Client,
    rate_limiter: RateLimiter,
    timeout: Duration,
    max_retries: u32,
    retry_base_delay: Duration,
}

impl MangaClient {
    /// Create a new client with default configuration
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            reqwest::header::HeaderValue::from_static(DEFAULT_ACCEPT_LANGUAGE),
        );

        let timeout = Duration::from_secs(config.timeout_secs);

        let client = reqwest::Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| MangaError::UpstreamUnreachable(format!("client setup failed: {}", e)))?;

        Ok(Self {
            client,
            rate_limiter: RateLimiter::new(config.requests_per_second),
            timeout,
            max_retries: config.max_retries,
            retry_base_delay: Duration::from_millis(config.retry_base_delay_ms),
        })
    }

    /// Fetch the body of an absolute URL as text
    ///
    /// Each attempt, including its wait for the rate limiter, is bounded by
    /// the configured timeout.
    ///
    /// # Errors
    /// - `MangaError::UpstreamTimeout` - attempt exceeded the timeout
    /// - `MangaError::UpstreamUnreachable` - network failure
    /// - `MangaError::RateLimited` - server returned 429 after all retries
    /// - `MangaError::UpstreamStatus` - other non-success status, 404 included
    pub async fn fetch(&self, url: &str) -> Result<String> {
        let mut attempt = 0;

        loop {
            let status = match timeout(self.timeout, self.send_once(url, attempt))
                .await
                .map_err(|_| MangaError::UpstreamTimeout(url.to_string()))??
            {
                Ok(body) => return Ok(body),
                Err(status) => status,
            };

            let retryable =
                status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error();

            if retryable && attempt < self.max_retries {
                let delay = self.backoff_delay(attempt);
                tracing::warn!(
                    url,
                    status = status.as_u16(),
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "transient upstream error, retrying"
                );
                sleep(delay).await;
                attempt += 1;
                continue;
            }

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                return Err(MangaError::RateLimited);
            }

            return Err(MangaError::UpstreamStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
    }

    /// One rate-limited request. A non-success answer comes back as `Ok(Err(status))`.
    async fn send_once(
        &self,
        url: &str,
        attempt: u32,
    ) -> Result<std::result::Result<String, reqwest::StatusCode>> {
        self.rate_limiter.acquire().await;
        tracing::debug!(url, attempt, "fetching upstream page");

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status.is_success() {
            Ok(Ok(response.text().await?))
        } else {
            Ok(Err(status))
        }
    }

    /// Exponential backoff delay for a retry attempt
    fn backoff_delay(&self, attempt: u32) -> Duration {
        self.retry_base_delay * 2u32.saturating_pow(attempt)
    }
}
