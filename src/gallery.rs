//! Paged photo fetching and the accumulated gallery state.
//!
//! [`GalleryController`] owns the page counter, the active search query,
//! and the ordered list of images fetched so far. Each fetch requests the
//! current page, appends the decoded images, and advances the page by one.
//!
//! ## In-flight guard
//!
//! At most one fetch runs at a time. The guard is an atomic flag claimed
//! with compare-and-set; a fetch attempted while another is outstanding
//! returns [`FetchOutcome::Busy`] immediately without touching the API or
//! the state. Attempts are dropped, not queued.
//!
//! ## Failure
//!
//! Transport and decode failures are logged and returned as
//! [`FetchOutcome::Failed`]. The page counter and image list are left
//! exactly as they were, and no [`GalleryEvent`] is sent.
//!
//! ## Resets do not cancel
//!
//! [`GalleryController::reset_search`] clears the images and rewinds to
//! page 1 immediately, even with a fetch outstanding. That fetch is not
//! cancelled: when it completes it still appends its page and advances the
//! counter on top of the reset state.

use crate::api::{ApiError, PhotoApi};
use crate::types::Image;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;

/// Notification sent after a fetch changes the image list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalleryEvent {
    DataChanged { total: usize },
}

/// Result of a fetch attempt.
#[derive(Debug)]
pub enum FetchOutcome {
    /// `added` images from `page` were appended.
    Appended { page: u32, added: usize },
    /// Another fetch was outstanding; nothing happened.
    Busy,
    /// The request failed; state is unchanged.
    Failed(ApiError),
}

impl FetchOutcome {
    pub fn is_appended(&self) -> bool {
        matches!(self, FetchOutcome::Appended { .. })
    }
}

#[derive(Debug, Clone)]
struct GalleryState {
    page: u32,
    query: String,
    images: Vec<Image>,
}

impl Default for GalleryState {
    fn default() -> Self {
        Self {
            page: 1,
            query: String::new(),
            images: Vec::new(),
        }
    }
}

/// Clears the in-flight flag when the fetch finishes or is dropped.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn claim(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct GalleryController {
    api: Arc<dyn PhotoApi>,
    per_page: u32,
    state: Mutex<GalleryState>,
    in_flight: AtomicBool,
    events: Option<mpsc::UnboundedSender<GalleryEvent>>,
}

impl GalleryController {
    pub fn new(api: Arc<dyn PhotoApi>, per_page: u32) -> Self {
        Self {
            api,
            per_page,
            state: Mutex::new(GalleryState::default()),
            in_flight: AtomicBool::new(false),
            events: None,
        }
    }

    /// Send a [`GalleryEvent`] on `tx` after every successful fetch.
    pub fn with_events(mut self, tx: mpsc::UnboundedSender<GalleryEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    fn state(&self) -> MutexGuard<'_, GalleryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Next page to fetch. Starts at 1.
    pub fn page(&self) -> u32 {
        self.state().page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Active search query. Empty means browse mode.
    pub fn query(&self) -> String {
        self.state().query.clone()
    }

    pub fn set_query(&self, query: impl Into<String>) {
        self.state().query = query.into();
    }

    pub fn is_searching(&self) -> bool {
        !self.state().query.is_empty()
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Number of images accumulated so far.
    pub fn len(&self) -> usize {
        self.state().images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn image(&self, index: usize) -> Option<Image> {
        self.state().images.get(index).cloned()
    }

    /// Copy of all accumulated images in display order.
    pub fn images(&self) -> Vec<Image> {
        self.state().images.clone()
    }

    /// Fetch the current page of unfiltered photos.
    pub async fn fetch_images(&self) -> FetchOutcome {
        let Some(_guard) = InFlight::claim(&self.in_flight) else {
            tracing::debug!("browse fetch skipped: another fetch is in flight");
            return FetchOutcome::Busy;
        };
        let page = self.page();
        let result = self.api.list_photos(page, self.per_page).await;
        self.apply(page, result)
    }

    /// Fetch the current page of photos matching `query`.
    pub async fn search_images(&self, query: &str) -> FetchOutcome {
        let Some(_guard) = InFlight::claim(&self.in_flight) else {
            tracing::debug!(query, "search fetch skipped: another fetch is in flight");
            return FetchOutcome::Busy;
        };
        let page = self.page();
        let result = self
            .api
            .search_photos(query, page)
            .await
            .map(|found| found.results);
        self.apply(page, result)
    }

    /// Clear accumulated images and rewind to page 1.
    ///
    /// Leaves the query and any outstanding fetch alone.
    pub fn reset_search(&self) {
        let mut state = self.state();
        state.page = 1;
        state.images.clear();
    }

    fn apply(&self, page: u32, result: Result<Vec<Image>, ApiError>) -> FetchOutcome {
        let fetched = match result {
            Ok(images) => images,
            Err(e) => {
                tracing::warn!(page, "Error fetching images: {}", e);
                return FetchOutcome::Failed(e);
            }
        };

        let added = fetched.len();
        let total = {
            let mut state = self.state();
            state.images.extend(fetched);
            state.page += 1;
            state.images.len()
        };
        tracing::info!(page, added, total, "fetched images");

        if let Some(tx) = &self.events {
            // A closed receiver just means nobody is rendering anymore.
            let _ = tx.send(GalleryEvent::DataChanged { total });
        }
        FetchOutcome::Appended { page, added }
    }
}

impl std::fmt::Debug for GalleryController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state();
        f.debug_struct("GalleryController")
            .field("page", &state.page)
            .field("query", &state.query)
            .field("images", &state.images.len())
            .field("in_flight", &self.is_fetching())
            .finish()
    }
}
