//! HTTP implementation of [`WikiApi`] for the Attack on Titan wiki API.
//!
//! # Features
//!
//! - One GET per listing, `page` plus non-empty filters in the query string
//! - Single-record lookups by id
//! - Image probing for the details view
//! - Optional request throttling and a configurable timeout
//!
//! # Examples
//!
//! ```rust,no_run
//! use titanwiki::prelude::*;
//!
//! # async fn example() -> titanwiki::Result<()> {
//! let client = WikiClient::new(&Config::default())?;
//!
//! let page = client.list::<Titan>().fetch().await?;
//! for titan in &page.items {
//!     println!("{}: {}", titan.name, titan.summary());
//! }
//!
//! let levi: Character = fetch_record(&client, 188).await?;
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    api::{Endpoint, WikiApi},
    config::Config,
    error::Result,
    net::HttpClient,
    query::{ListBuilder, ListQuery},
    types::Resource,
};

/// Client for the hosted wiki API.
#[derive(Clone, Debug)]
pub struct WikiClient {
    client: HttpClient,
    api_base: String,
}

impl WikiClient {
    /// Creates a client for the configured API base URL.
    ///
    /// # Errors
    ///
    /// * [`Error::Network`](crate::Error::Network) - If the HTTP client can't be built
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: HttpClient::new(config)?.with_header("Accept", "application/json"),
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    /// Starts a fluent listing request for `T` records.
    pub fn list<T: Resource>(&self) -> ListBuilder<'_, T> {
        ListBuilder::new(self)
    }

    /// Full URL of one listing page.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use titanwiki::prelude::*;
    ///
    /// let client = WikiClient::new(&Config::default()).unwrap();
    /// let query = ListQuery::new(2).with_filter(FilterSet::from_values("", "Alive", "", ""));
    ///
    /// assert_eq!(
    ///     client.listing_url(Endpoint::Characters, &query),
    ///     "https://api.attackontitanapi.com/characters?page=2&status=Alive"
    /// );
    /// ```
    pub fn listing_url(&self, endpoint: Endpoint, query: &ListQuery) -> String {
        format!(
            "{}/{}?{}",
            self.api_base,
            endpoint.path(),
            query.to_query_string()
        )
    }

    /// Full URL of a single record.
    pub fn record_url(&self, endpoint: Endpoint, id: u32) -> String {
        format!("{}/{}/{}", self.api_base, endpoint.path(), id)
    }
}

#[async_trait]
impl WikiApi for WikiClient {
    fn base_url(&self) -> &str {
        &self.api_base
    }

    async fn get_listing(&self, endpoint: Endpoint, query: &ListQuery) -> Result<Value> {
        let url = self.listing_url(endpoint, query);
        self.client.get_json(&url).await
    }

    async fn get_record(&self, endpoint: Endpoint, id: u32) -> Result<Value> {
        let url = self.record_url(endpoint, id);
        match self.client.get_json(&url).await {
            Err(crate::Error::Http { status: 404, .. }) => Err(crate::Error::not_found(format!(
                "{} with id {}",
                endpoint.path(),
                id
            ))),
            other => other,
        }
    }

    async fn probe_image(&self, url: &str) -> Result<()> {
        self.client.probe_image(url).await
    }
}
