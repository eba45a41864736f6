//! List view state: filters, paging, loading, and the details modal.
//!
//! A [`Browser`] owns everything one list view needs and changes only through
//! [`Browser::dispatch`]. Actions that require I/O return an [`Effect`]; the
//! caller runs it (usually with [`FetchRequest::spawn`]) and feeds the result
//! back in as another action.
//!
//! Every fetch gets a fresh [`RequestId`] and cancellation token. Issuing a new
//! fetch cancels the previous one, and a completion that isn't for the latest
//! request is dropped, so a slow response can never overwrite a newer one.
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use titanwiki::prelude::*;
//! use tokio::sync::mpsc;
//!
//! # async fn example() -> titanwiki::Result<()> {
//! let api: Arc<dyn WikiApi> = Arc::new(WikiClient::new(&Config::default())?);
//! let (tx, mut rx) = mpsc::unbounded_channel();
//!
//! let mut browser: Browser<Character> = Browser::new("assets/placeholder.png");
//! if let Some(Effect::Fetch(request)) = browser.dispatch(Action::SetFilter(FilterField::Status, "Alive".into())) {
//!     request.spawn(api.clone(), tx.clone());
//! }
//!
//! while let Some(action) = rx.recv().await {
//!     browser.dispatch(action);
//!     if !browser.is_loading() {
//!         break;
//!     }
//! }
//! println!("{} characters on page {}", browser.items().len(), browser.current_page());
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use tokio::{sync::mpsc::UnboundedSender, task::JoinHandle};
use tokio_util::sync::CancellationToken;

use crate::{
    api::{self, WikiApi},
    error::Result,
    image::{ImageSource, ImageStatus},
    pagination::{self, PageControl},
    query::ListQuery,
    types::{FilterSet, Page, Resource},
};

/// Monotonically increasing identifier of an issued fetch.
pub type RequestId = u64;

/// Hands out request ids and cancels superseded requests.
#[derive(Debug, Default)]
pub struct RequestTracker {
    latest: RequestId,
    in_flight: Option<CancellationToken>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new request, cancelling the one in flight.
    pub fn issue(&mut self) -> (RequestId, CancellationToken) {
        if let Some(previous) = self.in_flight.take() {
            previous.cancel();
        }

        self.latest += 1;
        let token = CancellationToken::new();
        self.in_flight = Some(token.clone());
        (self.latest, token)
    }

    /// Whether `id` is the latest request and hasn't completed yet.
    pub fn is_current(&self, id: RequestId) -> bool {
        id == self.latest && self.in_flight.is_some()
    }

    /// Marks `id` as completed. Returns `false` for stale or repeated ids,
    /// whose results must be dropped.
    pub fn settle(&mut self, id: RequestId) -> bool {
        if self.is_current(id) {
            self.in_flight = None;
            true
        } else {
            false
        }
    }

    pub fn latest(&self) -> RequestId {
        self.latest
    }

    /// Cancels the request in flight, if any.
    pub fn cancel(&mut self) {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
    }
}

/// Load state of a list view.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum LoadState<T> {
    /// Nothing requested yet
    #[default]
    Idle,
    Loading,
    Ready(Page<T>),
    /// The last request failed; the message is ready to show. `transient`
    /// marks failures a retry may fix.
    Failed { message: String, transient: bool },
}

impl<T> LoadState<T> {
    /// Records of a successful load; empty in every other state.
    pub fn items(&self) -> &[T] {
        match self {
            LoadState::Ready(page) => &page.items,
            _ => &[],
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Whether the last failure is one a retry may fix.
    pub fn retry_may_help(&self) -> bool {
        matches!(self, LoadState::Failed { transient: true, .. })
    }
}

/// Details modal. An open modal always carries the record it shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Modal<T> {
    #[default]
    Closed,
    Open(T),
}

impl<T> Modal<T> {
    pub fn is_open(&self) -> bool {
        matches!(self, Modal::Open(_))
    }

    pub fn item(&self) -> Option<&T> {
        match self {
            Modal::Open(item) => Some(item),
            Modal::Closed => None,
        }
    }
}

/// The four filter inputs of the characters list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
    Name,
    Status,
    Gender,
    Occupation,
}

impl FilterField {
    pub const ALL: [FilterField; 4] = [
        FilterField::Name,
        FilterField::Status,
        FilterField::Gender,
        FilterField::Occupation,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FilterField::Name => "Name",
            FilterField::Status => "Status",
            FilterField::Gender => "Gender",
            FilterField::Occupation => "Occupation",
        }
    }

    /// Known values for choice fields, starting with "any". `None` for
    /// free-text fields.
    pub fn options(&self) -> Option<&'static [&'static str]> {
        match self {
            FilterField::Status => Some(&["", "Alive", "Deceased", "Unknown"]),
            FilterField::Gender => Some(&["", "Male", "Female"]),
            FilterField::Name | FilterField::Occupation => None,
        }
    }
}

/// Raw values of the filter inputs, exactly as entered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterInputs {
    pub name: String,
    pub status: String,
    pub gender: String,
    pub occupation: String,
}

impl FilterInputs {
    pub fn get(&self, field: FilterField) -> &str {
        match field {
            FilterField::Name => &self.name,
            FilterField::Status => &self.status,
            FilterField::Gender => &self.gender,
            FilterField::Occupation => &self.occupation,
        }
    }

    pub fn set(&mut self, field: FilterField, value: String) {
        match field {
            FilterField::Name => self.name = value,
            FilterField::Status => self.status = value,
            FilterField::Gender => self.gender = value,
            FilterField::Occupation => self.occupation = value,
        }
    }

    /// The value after the current one in a choice field's options,
    /// wrapping around. Free-text fields return their value unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use titanwiki::browser::{FilterField, FilterInputs};
    ///
    /// let inputs = FilterInputs::default();
    /// assert_eq!(inputs.cycled(FilterField::Gender), "Male");
    /// ```
    pub fn cycled(&self, field: FilterField) -> String {
        let current = self.get(field);
        match field.options() {
            Some(options) => {
                let next = options
                    .iter()
                    .position(|o| o.eq_ignore_ascii_case(current.trim()))
                    .map_or(0, |i| (i + 1) % options.len());
                options[next].to_string()
            }
            None => current.to_string(),
        }
    }

    /// The filter set these inputs describe; blank inputs are left out.
    pub fn to_filter(&self) -> FilterSet {
        FilterSet::from_values(&self.name, &self.status, &self.gender, &self.occupation)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Everything that can happen to a [`Browser`].
#[derive(Debug)]
pub enum Action<T> {
    /// Fetch the current page with the applied filters
    Load,
    /// Re-issue the last request after a failure
    Retry,
    SetFilter(FilterField, String),
    ClearFilters,
    GoToPage(u32),
    NextPage,
    PreviousPage,
    FirstPage,
    LastPage,
    SelectNext,
    SelectPrevious,
    OpenSelected,
    CloseDetails,
    /// A fetch finished
    Completed {
        id: RequestId,
        result: Result<Page<T>>,
    },
    /// An image probe for the open modal finished
    ImageProbed { url: String, result: Result<()> },
}

/// I/O requested by [`Browser::dispatch`].
#[derive(Debug)]
pub enum Effect {
    Fetch(FetchRequest),
    ProbeImage(ImageProbe),
}

impl Effect {
    pub fn into_fetch(self) -> Option<FetchRequest> {
        match self {
            Effect::Fetch(request) => Some(request),
            Effect::ProbeImage(_) => None,
        }
    }
}

/// A listing request ready to run.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub id: RequestId,
    pub query: ListQuery,
    pub cancel: CancellationToken,
}

impl FetchRequest {
    /// Runs the request on the tokio runtime and sends the outcome to `tx`
    /// as [`Action::Completed`]. Nothing is sent if the request is cancelled
    /// first.
    pub fn spawn<T: Resource>(
        self,
        client: Arc<dyn WikiApi>,
        tx: UnboundedSender<Action<T>>,
    ) -> JoinHandle<()> {
        self.spawn_with(client, move |action| {
            let _ = tx.send(action);
        })
    }

    /// Like [`spawn`](FetchRequest::spawn), delivering the outcome through a
    /// callback so it can be wrapped in an application event.
    pub fn spawn_with<T, F>(self, client: Arc<dyn WikiApi>, deliver: F) -> JoinHandle<()>
    where
        T: Resource,
        F: FnOnce(Action<T>) + Send + 'static,
    {
        let FetchRequest { id, query, cancel } = self;

        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!(id, endpoint = %T::ENDPOINT, "fetch cancelled");
                }
                result = api::fetch_page::<T>(client.as_ref(), &query) => {
                    deliver(Action::Completed { id, result });
                }
            }
        })
    }
}

/// A check that the open modal's image loads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageProbe {
    pub url: String,
}

impl ImageProbe {
    pub fn spawn_with<T, F>(self, client: Arc<dyn WikiApi>, deliver: F) -> JoinHandle<()>
    where
        T: Resource,
        F: FnOnce(Action<T>) + Send + 'static,
    {
        tokio::spawn(async move {
            let result = client.probe_image(&self.url).await;
            deliver(Action::ImageProbed {
                url: self.url,
                result,
            });
        })
    }
}

/// State of one list view over `T` records.
#[derive(Debug)]
pub struct Browser<T> {
    inputs: FilterInputs,
    applied: FilterSet,
    current_page: u32,
    total_pages: u32,
    state: LoadState<T>,
    tracker: RequestTracker,
    selected: usize,
    modal: Modal<T>,
    image: ImageStatus,
    placeholder: String,
}

impl<T: Resource> Browser<T> {
    /// Creates an idle browser on page 1 with no filters.
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            inputs: FilterInputs::default(),
            applied: FilterSet::default(),
            current_page: 1,
            total_pages: 0,
            state: LoadState::Idle,
            tracker: RequestTracker::new(),
            selected: 0,
            modal: Modal::Closed,
            image: ImageStatus::Unknown,
            placeholder: placeholder.into(),
        }
    }

    /// Applies `action` and returns the I/O it requires, if any.
    pub fn dispatch(&mut self, action: Action<T>) -> Option<Effect> {
        match action {
            Action::Load | Action::Retry => Some(self.issue_fetch()),
            Action::SetFilter(field, value) => {
                self.inputs.set(field, value);
                self.commit_filters()
            }
            Action::ClearFilters => {
                self.inputs.clear();
                self.commit_filters()
            }
            Action::GoToPage(page) => self.go_to(page),
            Action::NextPage => self.go_to(self.current_page.saturating_add(1)),
            Action::PreviousPage => self.go_to(self.current_page.saturating_sub(1)),
            Action::FirstPage => self.go_to(1),
            Action::LastPage => self.go_to(self.total_pages),
            Action::SelectNext => {
                if self.selected + 1 < self.items().len() {
                    self.selected += 1;
                }
                None
            }
            Action::SelectPrevious => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            Action::OpenSelected => self.open_selected(),
            Action::CloseDetails => {
                self.modal = Modal::Closed;
                self.image = ImageStatus::Unknown;
                None
            }
            Action::Completed { id, result } => {
                self.complete(id, result);
                None
            }
            Action::ImageProbed { url, result } => {
                if self.image_source().as_ref().and_then(ImageSource::remote_url) == Some(url.as_str()) {
                    if let Err(e) = &result {
                        tracing::debug!(%url, error = %e, "image failed to load");
                    }
                    self.image = ImageStatus::from_probe(&result);
                }
                None
            }
        }
    }

    fn commit_filters(&mut self) -> Option<Effect> {
        let candidate = self.inputs.to_filter();
        if candidate == self.applied {
            return None;
        }

        self.applied = candidate;
        self.current_page = 1;
        Some(self.issue_fetch())
    }

    /// Moves to `page`, clamped to the loaded total. A failed load leaves
    /// the total at 0, so from the error panel every page move lands on
    /// page 1; [`Action::Retry`] is what re-requests the failed page.
    fn go_to(&mut self, page: u32) -> Option<Effect> {
        let target = pagination::clamp_page(page, self.total_pages);
        if target == self.current_page {
            return None;
        }

        self.current_page = target;
        Some(self.issue_fetch())
    }

    fn issue_fetch(&mut self) -> Effect {
        let (id, cancel) = self.tracker.issue();
        let query = self.query();

        tracing::debug!(id, endpoint = %T::ENDPOINT, query = %query.to_query_string(), "issuing fetch");

        self.state = LoadState::Loading;
        self.selected = 0;
        Effect::Fetch(FetchRequest { id, query, cancel })
    }

    fn complete(&mut self, id: RequestId, result: Result<Page<T>>) {
        if !self.tracker.settle(id) {
            tracing::debug!(
                id,
                latest = self.tracker.latest(),
                endpoint = %T::ENDPOINT,
                "discarding stale response"
            );
            return;
        }

        match result {
            Ok(page) => {
                self.total_pages = page.total_pages();
                self.state = LoadState::Ready(page);
            }
            Err(e) => {
                tracing::warn!(id, endpoint = %T::ENDPOINT, error = %e, "fetch failed");
                self.total_pages = 0;
                self.state = LoadState::Failed {
                    message: e.user_message(T::ENDPOINT.path()),
                    transient: e.is_transient(),
                };
            }
        }
    }

    fn open_selected(&mut self) -> Option<Effect> {
        let item = self.selected_item()?.clone();
        self.modal = Modal::Open(item);
        self.image = ImageStatus::Unknown;

        self.image_source()
            .and_then(|source| source.remote_url().map(str::to_string))
            .map(|url| Effect::ProbeImage(ImageProbe { url }))
    }

    /// The request the current page and filters describe.
    pub fn query(&self) -> ListQuery {
        ListQuery::new(self.current_page).with_filter(self.applied.clone())
    }

    pub fn inputs(&self) -> &FilterInputs {
        &self.inputs
    }

    pub fn applied_filters(&self) -> &FilterSet {
        &self.applied
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Total pages of the last successful load; 0 after a failure.
    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn state(&self) -> &LoadState<T> {
        &self.state
    }

    pub fn items(&self) -> &[T] {
        self.state.items()
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error()
    }

    /// Whether the error panel should offer to clear filters.
    pub fn can_clear_filters(&self) -> bool {
        !self.applied.is_empty()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_item(&self) -> Option<&T> {
        self.items().get(self.selected)
    }

    pub fn modal(&self) -> &Modal<T> {
        &self.modal
    }

    /// Image to show in the open modal.
    pub fn image_source(&self) -> Option<ImageSource> {
        self.modal
            .item()
            .map(|item| ImageSource::resolve(item.image(), &self.placeholder))
    }

    pub fn image_status(&self) -> ImageStatus {
        self.image
    }

    pub fn page_controls(&self) -> Vec<PageControl> {
        pagination::page_window(self.current_page, self.total_pages)
    }

    /// Cancels the request in flight, if any. A view left mid-load goes
    /// back to idle and loads again on the next [`Action::Load`].
    pub fn cancel(&mut self) {
        self.tracker.cancel();
        if self.state.is_loading() {
            self.state = LoadState::Idle;
        }
    }
}
