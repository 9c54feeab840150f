//! Binds the gallery data to a scrollable masonry grid.
//!
//! [`GalleryPresenter`] is the composition root of the gallery screen. It
//! owns the [`GalleryController`] and the [`MasonryLayout`], translates
//! user gestures into fetches, and rebuilds the grid when new data arrives.
//!
//! | Gesture | Effect |
//! |---|---|
//! | Initial load, pull-to-refresh | reset, then fetch page 1 in the current mode |
//! | Search text changed | set query, reset, search page 1 |
//! | Scrolled to the bottom | fetch the next page in the current mode |
//! | Viewport resized | re-lay out the grid at the new size |
//!
//! "Current mode" is search when a query is set and browse otherwise.
//!
//! Data-changed events from the controller are drained by [`GalleryPresenter::sync`]
//! on whatever task owns the presenter, so grid rebuilds always happen there
//! regardless of where the fetch completed.

use crate::api::PhotoApi;
use crate::config::{GalleryConfig, GridConfig};
use crate::gallery::{FetchOutcome, GalleryController, GalleryEvent};
use crate::layout::{HeightProvider, MasonryLayout, Rect, Size};
use crate::types::Image;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Visible region of the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub size: Size,
    pub offset_y: f64,
}

impl Viewport {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            offset_y: 0.0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(0.0, self.offset_y, self.size.width, self.size.height)
    }

    /// True once the bottom of the viewport has reached the end of the content.
    pub fn is_at_bottom(&self, content_height: f64) -> bool {
        self.offset_y + self.size.height >= content_height
    }
}

/// Fixed-rows item height: `(viewport_height - chrome_height) / rows_per_screen`.
///
/// Every item gets the same height regardless of the photo's aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridHeightEstimator {
    pub viewport_height: f64,
    pub chrome_height: f64,
    pub rows_per_screen: f64,
}

impl GridHeightEstimator {
    pub fn new(viewport_height: f64, grid: &GridConfig) -> Self {
        Self {
            viewport_height,
            chrome_height: grid.chrome_height,
            rows_per_screen: grid.rows_per_screen,
        }
    }

    /// Never negative: a viewport shorter than the chrome gets zero-height items.
    pub fn item_height(&self) -> f64 {
        ((self.viewport_height - self.chrome_height) / self.rows_per_screen).max(0.0)
    }
}

impl HeightProvider for GridHeightEstimator {
    fn height_for(&self, _index: usize) -> f64 {
        self.item_height()
    }
}

/// One renderable grid cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub index: usize,
    pub column: usize,
    pub frame: Rect,
    pub image_id: String,
    /// Thumbnail URL; `None` when the photo has no small rendition.
    pub url: Option<String>,
}

pub struct GalleryPresenter {
    gallery: Arc<GalleryController>,
    events: mpsc::UnboundedReceiver<GalleryEvent>,
    layout: MasonryLayout,
    grid: GridConfig,
    viewport: Viewport,
    items: Vec<Image>,
    /// Search bar state only; fetches follow the controller's stored query.
    searching: bool,
    refreshing: bool,
    reloads: usize,
}

impl GalleryPresenter {
    pub fn new(api: Arc<dyn PhotoApi>, config: &GalleryConfig, viewport: Size) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let gallery = GalleryController::new(api, config.api.per_page).with_events(tx);
        let mut layout = MasonryLayout::new(config.layout.to_masonry());
        layout.set_bounds(viewport);
        Self {
            gallery: Arc::new(gallery),
            events: rx,
            layout,
            grid: config.grid.clone(),
            viewport: Viewport::new(viewport),
            items: Vec::new(),
            searching: false,
            refreshing: false,
            reloads: 0,
        }
    }

    /// Shared handle to the data controller.
    pub fn gallery(&self) -> &Arc<GalleryController> {
        &self.gallery
    }

    pub fn layout(&self) -> &MasonryLayout {
        &self.layout
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Images currently shown by the grid (as of the last reload).
    pub fn items(&self) -> &[Image] {
        &self.items
    }

    /// Whether the search bar is in searching mode.
    ///
    /// This does not pick the fetch mode: after the text is cleared, scrolling
    /// keeps paging the last query until a new load.
    pub fn is_searching(&self) -> bool {
        self.searching
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing
    }

    /// Number of full grid reloads so far.
    pub fn reload_count(&self) -> usize {
        self.reloads
    }

    pub fn height_estimator(&self) -> GridHeightEstimator {
        GridHeightEstimator::new(self.viewport.size.height, &self.grid)
    }

    pub fn content_size(&self) -> Size {
        self.layout.content_size()
    }

    /// Initial load: reset, then fetch page 1.
    pub async fn load(&mut self) -> FetchOutcome {
        self.gallery.reset_search();
        self.fetch_current().await
    }

    /// Pull-to-refresh. The refresh indicator stays on until new data arrives.
    pub async fn refresh(&mut self) -> FetchOutcome {
        self.refreshing = true;
        self.load().await
    }

    /// Search text changed.
    ///
    /// Empty text leaves search mode without fetching; the previous query
    /// stays in effect for pagination of the results already shown.
    pub async fn update_search(&mut self, text: &str) -> Option<FetchOutcome> {
        if text.is_empty() {
            self.searching = false;
            return None;
        }
        self.searching = true;
        self.gallery.set_query(text);
        self.gallery.reset_search();
        let outcome = self.gallery.search_images(text).await;
        self.sync();
        Some(outcome)
    }

    /// Scroll position changed. Fetches the next page when the viewport
    /// reaches the end of the content and no fetch is outstanding.
    pub async fn on_scroll(&mut self, offset_y: f64) -> Option<FetchOutcome> {
        self.viewport.offset_y = offset_y;
        if !self.viewport.is_at_bottom(self.content_size().height) || self.gallery.is_fetching() {
            return None;
        }
        tracing::debug!(offset_y, "reached end of grid, fetching next page");
        Some(self.fetch_current().await)
    }

    /// Viewport size changed. Returns whether the layout was invalidated.
    pub fn resize(&mut self, size: Size) -> bool {
        self.viewport.size = size;
        let invalidated = self.layout.set_bounds(size);
        if invalidated {
            self.prepare_layout();
        }
        invalidated
    }

    async fn fetch_current(&mut self) -> FetchOutcome {
        let outcome = if self.gallery.is_searching() {
            let query = self.gallery.query();
            self.gallery.search_images(&query).await
        } else {
            self.gallery.fetch_images().await
        };
        self.sync();
        outcome
    }

    /// Drain pending data-changed events, reloading the grid if any arrived.
    ///
    /// Returns whether a reload happened.
    pub fn sync(&mut self) -> bool {
        let mut changed = false;
        while let Ok(GalleryEvent::DataChanged { .. }) = self.events.try_recv() {
            changed = true;
        }
        if changed {
            self.reload();
        }
        changed
    }

    /// Rebuild the grid from the controller's current images.
    pub fn reload(&mut self) {
        self.items = self.gallery.images();
        self.layout.invalidate();
        self.prepare_layout();
        self.refreshing = false;
        self.reloads += 1;
    }

    fn prepare_layout(&mut self) {
        let estimator = self.height_estimator();
        self.layout.prepare(self.items.len(), Some(&estimator));
    }

    fn cell(&self, index: usize, column: usize, frame: Rect) -> Option<Cell> {
        let image = self.items.get(index)?;
        Some(Cell {
            index,
            column,
            frame,
            image_id: image.id.clone(),
            url: image.thumbnail_url().map(str::to_string),
        })
    }

    /// Every laid-out cell, in item order.
    pub fn cells(&self) -> Vec<Cell> {
        self.layout
            .attributes()
            .iter()
            .filter_map(|a| self.cell(a.index, a.column, a.frame))
            .collect()
    }

    /// Cells intersecting the viewport.
    pub fn visible_cells(&self) -> Vec<Cell> {
        self.layout
            .attributes_in(&self.viewport.rect())
            .into_iter()
            .filter_map(|a| self.cell(a.index, a.column, a.frame))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::PhotoRequest;
    use crate::api::tests::{MockPhotoApi, MockReply, decode_error, sample_images};
    use crate::types::SearchResult;

    const PHONE: Size = Size {
        width: 390.0,
        height: 800.0,
    };

    fn presenter(api: &Arc<MockPhotoApi>) -> GalleryPresenter {
        GalleryPresenter::new(api.clone(), &GalleryConfig::default(), PHONE)
    }

    fn search_reply(prefix: &str, count: usize) -> MockReply {
        MockReply::Search(SearchResult {
            total: 45,
            total_pages: 3,
            results: sample_images(prefix, count),
        })
    }

    // =========================================================================
    // Height estimation
    // =========================================================================

    #[test]
    fn estimator_uses_four_rows_minus_chrome() {
        let estimator = GridHeightEstimator::new(800.0, &GridConfig::default());
        assert_eq!(estimator.item_height(), 177.5);
        assert_eq!(estimator.height_for(0), estimator.height_for(99));
    }

    #[test]
    fn estimator_never_goes_negative() {
        let estimator = GridHeightEstimator::new(40.0, &GridConfig::default());
        assert_eq!(estimator.item_height(), 0.0);
    }

    #[test]
    fn viewport_bottom_check_is_inclusive() {
        let mut viewport = Viewport::new(Size::new(100.0, 500.0));
        viewport.offset_y = 500.0;
        assert!(viewport.is_at_bottom(1000.0));
        viewport.offset_y = 499.0;
        assert!(!viewport.is_at_bottom(1000.0));
    }

    // =========================================================================
    // Load and refresh
    // =========================================================================

    #[tokio::test]
    async fn load_fetches_first_page_and_lays_out() {
        let api = Arc::new(MockPhotoApi::with_replies(vec![MockReply::Photos(
            sample_images("p1", 20),
        )]));
        let mut p = presenter(&api);

        assert!(p.load().await.is_appended());

        assert_eq!(p.items().len(), 20);
        assert_eq!(p.gallery().page(), 2);
        assert_eq!(p.reload_count(), 1);
        assert_eq!(p.layout().attributes().len(), 20);
        // Column 0 holds 7 cells of 177.5 + 12
        assert_eq!(p.content_size().height, 7.0 * 189.5);
        assert_eq!(p.content_size().width, 390.0);
    }

    #[tokio::test]
    async fn refresh_resets_and_ends_indicator() {
        let api = Arc::new(MockPhotoApi::with_replies(vec![
            MockReply::Photos(sample_images("p1", 20)),
            MockReply::Photos(sample_images("p2", 20)),
            MockReply::Photos(sample_images("fresh", 20)),
        ]));
        let mut p = presenter(&api);
        p.load().await;
        p.on_scroll(p.content_size().height).await;
        assert_eq!(p.items().len(), 40);

        let outcome = p.refresh().await;

        assert!(matches!(outcome, FetchOutcome::Appended { page: 1, .. }));
        assert!(!p.is_refreshing());
        assert_eq!(p.items().len(), 20);
        assert_eq!(p.items()[0].id, "fresh-0");
    }

    #[tokio::test]
    async fn failed_refresh_keeps_indicator_and_grid() {
        let api = Arc::new(MockPhotoApi::with_replies(vec![
            MockReply::Photos(sample_images("p1", 20)),
            MockReply::Fail(decode_error()),
        ]));
        let mut p = presenter(&api);
        p.load().await;

        let outcome = p.refresh().await;

        assert!(matches!(outcome, FetchOutcome::Failed(_)));
        assert!(p.is_refreshing());
        // The grid still shows the last reload; the controller was reset.
        assert_eq!(p.items().len(), 20);
        assert!(p.gallery().is_empty());
        assert_eq!(p.reload_count(), 1);
    }

    // =========================================================================
    // Search
    // =========================================================================

    #[tokio::test]
    async fn search_replaces_results() {
        let api = Arc::new(MockPhotoApi::with_replies(vec![
            MockReply::Photos(sample_images("p1", 20)),
            search_reply("cat", 20),
        ]));
        let mut p = presenter(&api);
        p.load().await;

        let outcome = p.update_search("cats").await.unwrap();

        assert!(outcome.is_appended());
        assert!(p.is_searching());
        assert_eq!(p.items().len(), 20);
        assert_eq!(p.items()[0].id, "cat-0");
        assert_eq!(p.gallery().page(), 2);
        assert_eq!(p.gallery().query(), "cats");
        assert_eq!(
            api.get_requests().last().unwrap(),
            &PhotoRequest::Search {
                query: "cats".into(),
                page: 1
            }
        );
    }

    #[tokio::test]
    async fn empty_search_text_does_not_fetch() {
        let api = Arc::new(MockPhotoApi::with_replies(vec![search_reply("cat", 20)]));
        let mut p = presenter(&api);
        p.update_search("cats").await;

        assert!(p.update_search("").await.is_none());

        assert!(!p.is_searching());
        assert_eq!(api.get_requests().len(), 1);
        assert_eq!(p.gallery().query(), "cats");
        assert_eq!(p.items().len(), 20);
    }

    #[tokio::test]
    async fn cleared_search_text_keeps_paging_last_query() {
        let api = Arc::new(MockPhotoApi::with_replies(vec![
            search_reply("cat", 20),
            search_reply("cat2", 20),
        ]));
        let mut p = presenter(&api);
        p.update_search("cats").await;
        p.update_search("").await;

        let bottom = p.content_size().height - PHONE.height;
        let outcome = p.on_scroll(bottom).await.unwrap();

        assert!(outcome.is_appended());
        assert!(!p.is_searching());
        assert_eq!(
            api.get_requests().last().unwrap(),
            &PhotoRequest::Search {
                query: "cats".into(),
                page: 2
            }
        );
    }

    // =========================================================================
    // Infinite scroll
    // =========================================================================

    #[tokio::test]
    async fn scroll_to_bottom_fetches_exactly_one_page() {
        let api = Arc::new(MockPhotoApi::with_replies(vec![
            MockReply::Photos(sample_images("p1", 20)),
            MockReply::Photos(sample_images("p2", 20)),
        ]));
        let mut p = presenter(&api);
        p.load().await;

        let bottom = p.content_size().height - PHONE.height;
        let outcome = p.on_scroll(bottom).await;

        assert!(matches!(outcome, Some(FetchOutcome::Appended { page: 2, added: 20 })));
        assert_eq!(api.get_requests().len(), 2);
        assert_eq!(p.items().len(), 40);
        assert_eq!(p.reload_count(), 2);
        assert_eq!(p.layout().attributes().len(), 40);
    }

    #[tokio::test]
    async fn scroll_short_of_bottom_does_nothing() {
        let api = Arc::new(MockPhotoApi::with_replies(vec![MockReply::Photos(
            sample_images("p1", 20),
        )]));
        let mut p = presenter(&api);
        p.load().await;

        let almost = p.content_size().height - PHONE.height - 1.0;
        assert!(p.on_scroll(almost).await.is_none());
        assert_eq!(api.get_requests().len(), 1);
        assert_eq!(p.viewport().offset_y, almost);
    }

    #[tokio::test]
    async fn scroll_in_search_mode_pages_search() {
        let api = Arc::new(MockPhotoApi::with_replies(vec![
            search_reply("cat", 20),
            search_reply("cat2", 20),
        ]));
        let mut p = presenter(&api);
        p.update_search("cats").await;

        p.on_scroll(p.content_size().height).await;

        assert_eq!(
            api.get_requests().last().unwrap(),
            &PhotoRequest::Search {
                query: "cats".into(),
                page: 2
            }
        );
        assert_eq!(p.items().len(), 40);
    }

    #[tokio::test]
    async fn scroll_while_fetching_is_ignored() {
        let api = Arc::new(MockPhotoApi::gated(vec![MockReply::Photos(sample_images(
            "p1", 20,
        ))]));
        let mut p = presenter(&api);

        let gallery = p.gallery().clone();
        let pending = tokio::spawn(async move { gallery.fetch_images().await });
        api.entered.notified().await;

        assert!(p.on_scroll(0.0).await.is_none());
        assert_eq!(api.get_requests().len(), 1);

        api.release();
        pending.await.unwrap();
        assert!(p.sync());
        assert_eq!(p.items().len(), 20);
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    #[tokio::test]
    async fn visible_cells_follow_viewport() {
        let api = Arc::new(MockPhotoApi::with_replies(vec![MockReply::Photos(
            sample_images("p1", 20),
        )]));
        let mut p = presenter(&api);
        p.load().await;

        // Rows of 189.5: an 800-tall viewport at the top shows rows 0..=4
        let top: Vec<usize> = p.visible_cells().iter().map(|c| c.index).collect();
        assert_eq!(top, (0..15).collect::<Vec<_>>());

        p.on_scroll(400.0).await;
        let scrolled: Vec<usize> = p.visible_cells().iter().map(|c| c.index).collect();
        assert_eq!(scrolled.first(), Some(&6));
        assert_eq!(scrolled.last(), Some(&19));

        let cell = &p.cells()[4];
        assert_eq!(cell.column, 1);
        assert_eq!(cell.image_id, "p1-4");
        assert_eq!(cell.url.as_deref(), Some("https://images.test/p1-4-small.jpg"));
    }

    #[tokio::test]
    async fn resize_relays_out_with_new_heights() {
        let api = Arc::new(MockPhotoApi::with_replies(vec![MockReply::Photos(
            sample_images("p1", 3),
        )]));
        let mut p = presenter(&api);
        p.load().await;
        assert_eq!(p.cells()[0].frame.height, 177.5);

        assert!(!p.resize(PHONE));
        assert!(p.resize(Size::new(600.0, 490.0)));

        let first = &p.cells()[0];
        assert_eq!(first.frame.height, 100.0);
        assert_eq!(first.frame.width, 200.0 - 12.0);
    }

    #[tokio::test]
    async fn viewport_shorter_than_chrome_does_not_page_endlessly() {
        let api = Arc::new(MockPhotoApi::with_replies(vec![
            MockReply::Photos(sample_images("p1", 20)),
            MockReply::Photos(sample_images("p2", 20)),
        ]));
        let mut p = GalleryPresenter::new(
            api.clone(),
            &GalleryConfig::default(),
            Size::new(390.0, 40.0),
        );
        p.load().await;

        // Zero-height items still take their padding: 7 rows of 12.
        assert_eq!(p.content_size().height, 84.0);
        let mut last_y = [0.0_f64; 3];
        for cell in p.cells() {
            assert!(cell.frame.height >= 0.0);
            assert!(cell.frame.y >= last_y[cell.column]);
            last_y[cell.column] = cell.frame.y;
        }

        for _ in 0..5 {
            assert!(p.on_scroll(0.0).await.is_none());
        }
        assert_eq!(api.get_requests().len(), 1);
    }
}
