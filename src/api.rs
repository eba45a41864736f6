//! The wiki API trait and typed fetch helpers.
//!
//! This module defines the [`WikiApi`] trait every backend implements, the
//! [`Endpoint`]s the wiki exposes, and the typed helpers [`fetch_page`] and
//! [`fetch_record`] that decode raw responses into [`Resource`] records.
//!
//! Backends only move JSON. Shape detection (envelope vs. bare array) and
//! record decoding live in [`net::json`](crate::net::json), so a test double
//! that serves canned `serde_json::Value`s gets the same decoding as the real
//! client.
//!
//! # Examples
//!
//! ```rust,no_run
//! use titanwiki::prelude::*;
//!
//! # async fn example() -> titanwiki::Result<()> {
//! let client = WikiClient::new(&Config::default())?;
//!
//! let query = ListQuery::new(1);
//! let page = fetch_page::<Character>(&client, &query).await?;
//! println!("{} characters over {} pages", page.info.count, page.total_pages());
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

use crate::{
    error::Result,
    net::json,
    query::ListQuery,
    types::{Page, Resource},
};

/// The collections the wiki serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Characters,
    Episodes,
    Locations,
    Organizations,
    Titans,
}

impl Endpoint {
    /// Every endpoint, in the order the browser lists them.
    pub const ALL: [Endpoint; 5] = [
        Endpoint::Characters,
        Endpoint::Episodes,
        Endpoint::Locations,
        Endpoint::Organizations,
        Endpoint::Titans,
    ];

    /// Path segment under the API base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Characters => "characters",
            Endpoint::Episodes => "episodes",
            Endpoint::Locations => "locations",
            Endpoint::Organizations => "organizations",
            Endpoint::Titans => "titans",
        }
    }

    /// Capitalized name for headings.
    pub fn title(&self) -> &'static str {
        match self {
            Endpoint::Characters => "Characters",
            Endpoint::Episodes => "Episodes",
            Endpoint::Locations => "Locations",
            Endpoint::Organizations => "Organizations",
            Endpoint::Titans => "Titans",
        }
    }

    /// Whether the endpoint honours the status/gender/occupation filters.
    pub fn supports_filters(&self) -> bool {
        matches!(self, Endpoint::Characters)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Trait that every wiki backend implements.
///
/// # Required Methods
///
/// * [`base_url()`](WikiApi::base_url) - Root URL of the API
/// * [`get_listing()`](WikiApi::get_listing) - One page of a collection, undecoded
/// * [`get_record()`](WikiApi::get_record) - A single record by id, undecoded
/// * [`probe_image()`](WikiApi::probe_image) - Whether an image URL loads
///
/// # Implementation Guidelines
///
/// - Issue exactly one request per call; retrying is left to the user
/// - Report non-success statuses as [`Error::Http`](crate::Error::Http)
/// - Don't interpret the body beyond parsing it as JSON
///
/// # Examples
///
/// ```rust
/// use titanwiki::prelude::*;
/// use async_trait::async_trait;
/// use serde_json::{Value, json};
///
/// struct Canned;
///
/// #[async_trait]
/// impl WikiApi for Canned {
///     fn base_url(&self) -> &str { "memory://" }
///
///     async fn get_listing(&self, _endpoint: Endpoint, _query: &ListQuery) -> titanwiki::Result<Value> {
///         Ok(json!([{"id": 1, "name": "Eren Yeager"}]))
///     }
///
///     async fn get_record(&self, _endpoint: Endpoint, id: u32) -> titanwiki::Result<Value> {
///         Ok(json!({"id": id, "name": "Eren Yeager"}))
///     }
///
///     async fn probe_image(&self, _url: &str) -> titanwiki::Result<()> {
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait WikiApi: Send + Sync {
    /// Returns the root URL requests are made against, without a trailing slash.
    fn base_url(&self) -> &str;

    /// Fetches one page of `endpoint` for `query` and returns the parsed body.
    ///
    /// # Errors
    ///
    /// * [`Error::Http`](crate::Error::Http) - For non-success statuses
    /// * [`Error::Network`](crate::Error::Network) - For network/connection issues
    /// * [`Error::Json`](crate::Error::Json) - If the body is not JSON
    async fn get_listing(&self, endpoint: Endpoint, query: &ListQuery) -> Result<Value>;

    /// Fetches a single record of `endpoint` by id and returns the parsed body.
    async fn get_record(&self, endpoint: Endpoint, id: u32) -> Result<Value>;

    /// Checks that `url` serves an image.
    ///
    /// A failure here only ever affects the one image; callers fall back to
    /// a placeholder.
    async fn probe_image(&self, url: &str) -> Result<()>;
}

/// Fetches and decodes one page of `T` records.
///
/// Accepts both an envelope (`{"info": {...}, "results": [...]}`) and a bare
/// array, which is treated as the only page.
///
/// # Errors
///
/// Everything [`WikiApi::get_listing`] returns, plus
/// [`Error::Format`](crate::Error::Format) for any other response shape.
pub async fn fetch_page<T: Resource>(api: &dyn WikiApi, query: &ListQuery) -> Result<Page<T>> {
    let body = api.get_listing(T::ENDPOINT, query).await?;
    let page = json::decode_page::<T>(body)?;

    tracing::debug!(
        endpoint = %T::ENDPOINT,
        page = query.page,
        items = page.items.len(),
        total_pages = page.total_pages(),
        "decoded listing"
    );

    Ok(page)
}

/// Fetches and decodes a single `T` record by id.
pub async fn fetch_record<T: Resource>(api: &dyn WikiApi, id: u32) -> Result<T> {
    let body = api.get_record(T::ENDPOINT, id).await?;
    json::decode_record(body)
}

/// Record count of every endpoint, fetched concurrently.
///
/// Each entry carries its own result so one failing endpoint doesn't hide
/// the others.
pub async fn overview(api: &dyn WikiApi) -> Vec<(Endpoint, Result<u32>)> {
    let requests = Endpoint::ALL.iter().map(|&endpoint| async move {
        let query = ListQuery::new(1);
        let count = api
            .get_listing(endpoint, &query)
            .await
            .and_then(json::total_count);
        (endpoint, count)
    });

    futures::future::join_all(requests).await
}
