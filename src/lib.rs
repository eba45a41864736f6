//! # titanwiki - Typed client and terminal browser for the Attack on Titan wiki API
//!
//! titanwiki wraps the public Attack on Titan wiki API in typed records and a
//! paging, filtering list model, and ships a terminal browser built on it.
//!
//! ## Features
//!
//! - **Typed Records**: Characters, episodes, locations, organizations and titans
//! - **Fluent Listing API**: Chain page and filter parameters, then fetch
//! - **Both Response Shapes**: Paginated envelopes and bare arrays decode to the same [`Page`]
//! - **Filter Deduplication**: Re-applying identical filters never refetches
//! - **Ordered Results**: Every fetch is sequenced and cancellable; stale responses are dropped
//! - **Page Windows**: Compact `1 ... 4 5 6 ... 9 10` pagination controls
//! - **Image Fallbacks**: Cleaned CDN URLs, with an initial-letter badge when images fail
//!
//! ## Quick Start
//!
//! ### Listing Characters
//!
//! ```rust,no_run
//! use titanwiki::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> titanwiki::Result<()> {
//!     let client = WikiClient::new(&Config::load()?)?;
//!
//!     let page = client
//!         .list::<Character>()
//!         .status("Alive")
//!         .gender("Female")
//!         .fetch()
//!         .await?;
//!
//!     for character in &page.items {
//!         println!("{:<24} {}", character.name, character.summary());
//!     }
//!     println!("page 1 of {}", page.total_pages());
//!     Ok(())
//! }
//! ```
//!
//! ### Driving a List View
//!
//! ```rust
//! use titanwiki::prelude::*;
//!
//! let mut browser: Browser<Character> = Browser::new("assets/placeholder.png");
//!
//! let effect = browser.dispatch(Action::SetFilter(FilterField::Name, "Eren".into()));
//! assert!(matches!(effect, Some(Effect::Fetch(_))));
//!
//! // Same value again: nothing to do
//! let effect = browser.dispatch(Action::SetFilter(FilterField::Name, "Eren".into()));
//! assert!(effect.is_none());
//! ```
//!
//! ## Architecture
//!
//! - [`api`]: The [`WikiApi`] trait, endpoints, and typed fetch helpers
//! - [`client`]: HTTP implementation of [`WikiApi`]
//! - [`query`]: Listing queries and the fluent [`ListBuilder`]
//! - [`browser`]: List view state machine with request sequencing
//! - [`pagination`]: Page-number windowing
//! - [`image`]: Image URL cleanup and fallbacks
//! - [`types`]: Records, pages and filters
//! - [`config`]: Layered configuration
//! - [`net`]: HTTP client, throttling and response decoding
//! - [`error`]: Error types

pub mod api;
pub mod browser;
pub mod client;
pub mod config;
pub mod error;
pub mod image;
pub mod net;
pub mod pagination;
pub mod query;
pub mod types;

#[cfg(feature = "tui")]
pub mod tui;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and traits, allowing you to
/// import everything you need with a single `use titanwiki::prelude::*;` statement.
///
/// # Example
///
/// ```rust
/// use titanwiki::prelude::*;
///
/// // Now you have access to:
/// // - WikiClient, WikiApi, Endpoint, Config
/// // - ListQuery, ListBuilder, FilterSet
/// // - Character, Episode, Location, Organization, Titan, Resource
/// // - Browser, Action, Effect, page_window
/// ```
pub mod prelude {
    pub use crate::{
        api::{Endpoint, WikiApi, fetch_page, fetch_record, overview},
        browser::{
            Action, Browser, Effect, FetchRequest, FilterField, FilterInputs, ImageProbe,
            LoadState, Modal, RequestId,
        },
        client::WikiClient,
        config::Config,
        image::{ImageSource, ImageStatus, clean_image_url, initial_badge},
        pagination::{PageControl, clamp_page, page_window},
        query::{ListBuilder, ListQuery},
        types::{
            Character, Episode, FilterSet, FilterSetBuilder, Location, Organization, Page,
            PageInfo, Resource, Titan,
        },
    };

    #[cfg(feature = "tui")]
    pub use crate::tui::*;
}

// Re-export main types at crate root for direct access
pub use api::{Endpoint, WikiApi};
pub use browser::{Action, Browser, Effect};
pub use client::WikiClient;
pub use config::Config;
pub use error::{Error, Result};
pub use query::{ListBuilder, ListQuery};
pub use types::{Character, Episode, FilterSet, Location, Organization, Page, Resource, Titan};
