//! Listing queries and the fluent list builder.
//!
//! A [`ListQuery`] is everything one listing request asks for: a page number
//! and a [`FilterSet`]. [`ListBuilder`] chains the same parameters and runs
//! the request against a [`WikiApi`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use titanwiki::prelude::*;
//!
//! # async fn example() -> titanwiki::Result<()> {
//! let client = WikiClient::new(&Config::default())?;
//!
//! let scouts = client
//!     .list::<Character>()
//!     .occupation("Soldier")
//!     .status("Alive")
//!     .page(2)
//!     .fetch()
//!     .await?;
//!
//! println!("page 2 of {}", scouts.total_pages());
//! # Ok(())
//! # }
//! ```

use std::marker::PhantomData;

use crate::{
    api::{self, WikiApi},
    error::Result,
    types::{FilterSet, Page, Resource, non_empty},
};

/// One listing request: a page and the filters to apply.
///
/// # Examples
///
/// ```rust
/// use titanwiki::query::ListQuery;
/// use titanwiki::types::FilterSet;
///
/// let query = ListQuery::new(3).with_filter(FilterSet::from_values("Eren", "", "", ""));
/// assert_eq!(query.to_query_string(), "page=3&name=Eren");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// 1-based page number
    pub page: u32,
    pub filter: FilterSet,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self::new(1)
    }
}

impl ListQuery {
    /// Creates an unfiltered query; page 0 is treated as page 1.
    pub fn new(page: u32) -> Self {
        Self {
            page: page.max(1),
            filter: FilterSet::default(),
        }
    }

    pub fn with_filter(mut self, filter: FilterSet) -> Self {
        self.filter = filter;
        self
    }

    /// Renders the query string: `page` first, then each set filter in
    /// `name`, `status`, `gender`, `occupation` order, percent-encoded.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use titanwiki::query::ListQuery;
    /// use titanwiki::types::FilterSet;
    ///
    /// let query = ListQuery::new(1).with_filter(FilterSet::from_values("Zeke Yeager", "", "Male", ""));
    /// assert_eq!(query.to_query_string(), "page=1&name=Zeke%20Yeager&gender=Male");
    /// ```
    pub fn to_query_string(&self) -> String {
        let mut parts = vec![format!("page={}", self.page)];
        parts.extend(
            self.filter
                .pairs()
                .into_iter()
                .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value))),
        );
        parts.join("&")
    }
}

/// A fluent builder that assembles a [`ListQuery`] and runs it.
///
/// Obtained from [`WikiClient::list()`](crate::client::WikiClient::list) or
/// [`ListBuilder::new`] for any other [`WikiApi`].
pub struct ListBuilder<'a, T> {
    api: &'a dyn WikiApi,
    query: ListQuery,
    _record: PhantomData<T>,
}

impl<'a, T: Resource> ListBuilder<'a, T> {
    pub fn new(api: &'a dyn WikiApi) -> Self {
        Self {
            api,
            query: ListQuery::default(),
            _record: PhantomData,
        }
    }

    /// Sets the 1-based page to fetch.
    pub fn page(mut self, page: u32) -> Self {
        self.query.page = page.max(1);
        self
    }

    /// Filters by name. An empty value clears the filter.
    pub fn name(mut self, name: impl AsRef<str>) -> Self {
        self.query.filter.name = non_empty(name.as_ref());
        self
    }

    pub fn status(mut self, status: impl AsRef<str>) -> Self {
        self.query.filter.status = non_empty(status.as_ref());
        self
    }

    pub fn gender(mut self, gender: impl AsRef<str>) -> Self {
        self.query.filter.gender = non_empty(gender.as_ref());
        self
    }

    pub fn occupation(mut self, occupation: impl AsRef<str>) -> Self {
        self.query.filter.occupation = non_empty(occupation.as_ref());
        self
    }

    /// Replaces all filters at once.
    pub fn filter(mut self, filter: FilterSet) -> Self {
        self.query.filter = filter;
        self
    }

    /// Runs the request and decodes one page of records.
    ///
    /// # Errors
    ///
    /// See [`api::fetch_page`].
    pub async fn fetch(self) -> Result<Page<T>> {
        api::fetch_page::<T>(self.api, &self.query).await
    }

    /// Returns the assembled query without running it.
    pub fn build(self) -> ListQuery {
        self.query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filters_are_omitted() {
        let query = ListQuery::new(1).with_filter(FilterSet::from_values("", "Alive", "", ""));
        assert_eq!(query.to_query_string(), "page=1&status=Alive");
        assert_eq!(ListQuery::default().to_query_string(), "page=1");
    }

    #[test]
    fn test_all_filters_in_wire_order() {
        let query = ListQuery::new(4).with_filter(FilterSet::from_values(
            "Levi",
            "Alive",
            "Male",
            "Captain & Squad Leader",
        ));
        assert_eq!(
            query.to_query_string(),
            "page=4&name=Levi&status=Alive&gender=Male&occupation=Captain%20%26%20Squad%20Leader"
        );
    }

    #[test]
    fn test_page_zero_is_page_one() {
        assert_eq!(ListQuery::new(0).page, 1);
    }
}
