//! Network utilities for HTTP requests, throttling, and response decoding.
//!
//! This module provides the networking infrastructure for titanwiki, including:
//!
//! - **HTTP Client**: A configured `reqwest` client with compression and a timeout
//! - **Rate Limiting**: An optional minimum interval between requests
//! - **Content Decoding**: Envelope/bare-array detection in [`json`]
//!
//! Requests are never retried here. A failed request surfaces as an error
//! and the user decides whether to try again.
//!
//! # Examples
//!
//! ```rust,no_run
//! use titanwiki::config::Config;
//! use titanwiki::net::HttpClient;
//!
//! # async fn example() -> titanwiki::Result<()> {
//! let client = HttpClient::new(&Config::default())?;
//!
//! let json: serde_json::Value = client
//!     .get_json("https://api.attackontitanapi.com/titans")
//!     .await?;
//! # Ok(())
//! # }
//! ```

use bytes::Bytes;
use parking_lot::Mutex;
use reqwest::{Client, header::HeaderMap};
use std::time::{Duration, Instant};

use crate::config::Config;

pub mod json;

/// Enforces a minimum delay between consecutive requests.
///
/// The wiki is a free community service; the browser issues a request on
/// every page or filter change, and this keeps bursts of key presses from
/// turning into bursts of requests.
///
/// # Thread Safety
///
/// The rate limiter uses a `Mutex` internally and is safe to use across
/// multiple threads and async tasks.
#[derive(Debug)]
pub struct RateLimiter {
    last_request: Mutex<Option<Instant>>,
    delay: Duration,
}

impl Clone for RateLimiter {
    fn clone(&self) -> Self {
        Self {
            last_request: Mutex::new(None),
            delay: self.delay,
        }
    }
}

impl RateLimiter {
    /// Creates a new rate limiter; a delay of 0 never waits.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use titanwiki::net::RateLimiter;
    ///
    /// let limiter = RateLimiter::new(250);
    /// ```
    pub fn new(delay_ms: u64) -> Self {
        Self {
            last_request: Mutex::new(None),
            delay: Duration::from_millis(delay_ms),
        }
    }

    /// Waits for this caller's turn. Each call reserves the next free slot,
    /// at least the delay after the previous one, before it sleeps, so
    /// concurrent callers are spaced out rather than released together.
    pub async fn wait(&self) {
        if self.delay.is_zero() {
            return;
        }

        let slot = {
            let mut last = self.last_request.lock();
            let now = Instant::now();
            let slot = match *last {
                Some(previous) => now.max(previous + self.delay),
                None => now,
            };
            *last = Some(slot);
            slot
        };

        tokio::time::sleep_until(slot.into()).await;
    }
}

/// HTTP client wrapper with throttling and status handling.
///
/// # Examples
///
/// ```rust,no_run
/// use titanwiki::config::Config;
/// use titanwiki::net::HttpClient;
///
/// # async fn example() -> titanwiki::Result<()> {
/// let config = Config {
///     timeout_secs: 10,
///     min_request_interval_ms: 500,
///     ..Config::default()
/// };
/// let client = HttpClient::new(&config)?.with_header("Accept", "application/json");
///
/// let body: serde_json::Value = client.get_json("https://api.attackontitanapi.com/episodes").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct HttpClient {
    inner: Client,
    rate_limiter: RateLimiter,
    headers: HeaderMap,
}

impl HttpClient {
    /// Creates a client from the configured timeout, user agent and throttle.
    ///
    /// # Errors
    ///
    /// * [`Error::Network`](crate::Error::Network) - If the TLS backend can't be initialized
    pub fn new(config: &Config) -> crate::Result<Self> {
        let inner = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .pool_max_idle_per_host(4)
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            inner,
            rate_limiter: RateLimiter::new(config.min_request_interval_ms),
            headers: HeaderMap::new(),
        })
    }

    /// Adds a custom header to all requests made by this client.
    ///
    /// Invalid header names or values are ignored.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            name.parse::<reqwest::header::HeaderName>(),
            value.parse::<reqwest::header::HeaderValue>(),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Performs a single GET request.
    ///
    /// # Returns
    ///
    /// The response body as `Bytes` on success.
    ///
    /// # Errors
    ///
    /// * [`Error::Http`](crate::Error::Http) - For non-success statuses, with the code embedded
    /// * [`Error::Network`](crate::Error::Network) - For network/connection errors
    pub async fn get(&self, url: &str) -> crate::Result<Bytes> {
        self.rate_limiter.wait().await;
        tracing::debug!(%url, "GET");

        let response = self
            .inner
            .get(url)
            .headers(self.headers.clone())
            .send()
            .await
            .inspect_err(|e| tracing::warn!(%url, error = %e, "request failed"))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), "non-success status");
            return Err(crate::Error::http(status.as_u16(), url));
        }

        Ok(response.bytes().await?)
    }

    /// Performs a GET request and deserializes the response as JSON.
    ///
    /// # Errors
    ///
    /// * All errors from [`get()`](HttpClient::get)
    /// * [`Error::Json`](crate::Error::Json) - If JSON parsing fails
    pub async fn get_json<T>(&self, url: &str) -> crate::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let bytes = self.get(url).await?;
        serde_json::from_slice(&bytes).map_err(Into::into)
    }

    /// Checks that `url` answers with a success status and an image body.
    ///
    /// Uses GET rather than HEAD; the image CDN doesn't answer HEAD reliably.
    pub async fn probe_image(&self, url: &str) -> crate::Result<()> {
        self.rate_limiter.wait().await;

        let response = self
            .inner
            .get(url)
            .headers(self.headers.clone())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(crate::Error::http(status.as_u16(), url));
        }

        let is_image = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("image/"));

        if is_image {
            Ok(())
        } else {
            Err(crate::Error::format(format!("{} is not an image", url)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_concurrent_waits_are_spaced_out() {
        let delay = Duration::from_millis(60);
        let limiter = Arc::new(RateLimiter::new(delay.as_millis() as u64));
        let start = Instant::now();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                tokio::spawn(async move {
                    limiter.wait().await;
                    start.elapsed()
                })
            })
            .collect();

        let mut finished = Vec::new();
        for handle in handles {
            finished.push(handle.await.unwrap());
        }
        finished.sort();

        for (i, elapsed) in finished.iter().enumerate() {
            assert!(
                *elapsed >= delay * i as u32,
                "call {i} went out after {elapsed:?}: {finished:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_zero_delay_never_waits() {
        let limiter = RateLimiter::new(0);
        let start = Instant::now();
        for _ in 0..10 {
            limiter.wait().await;
        }
        assert!(start.elapsed() < Duration::from_millis(50));
    }
}
