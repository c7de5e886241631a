use crate::api::{CatalogSource, FetchError};
use crate::models::{CategoryFeed, MediaItem};
use crate::pager::ScrollPager;

/// Identifies one fetch. A result is only applied while its ticket is current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub row_id: String,
    pub path: String,
    pub generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied { count: usize },
    Failed,
    Stale,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Thumbnail {
    pub key: u64,
    pub alt: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayView {
    pub id: u64,
    pub title: String,
    pub image_url: Option<String>,
    pub release_date: Option<String>,
    pub vote_average: Option<f32>,
    pub overview: String,
}

impl OverlayView {
    fn from_item(item: &MediaItem, image_base: &str) -> Self {
        Self {
            id: item.id,
            title: item.display_name().to_string(),
            image_url: item.backdrop_url(image_base),
            release_date: item.release().map(str::to_string),
            vote_average: item.vote_average,
            overview: item.overview.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    pub id: String,
    pub title: String,
    pub thumbnails: Vec<Thumbnail>,
    pub overlay: Option<OverlayView>,
}

/// One category row: its fetch lifecycle, its items and the detail overlay.
#[derive(Debug, Clone)]
pub struct Row {
    feed: CategoryFeed,
    overlay_open: bool,
    selected: Option<MediaItem>,
    /// Path the held items were fetched for.
    loaded_path: Option<String>,
    generation: u64,
    mounted: bool,
    pub pager: ScrollPager,
}

impl Row {
    pub fn new(feed: CategoryFeed) -> Self {
        Self {
            feed,
            overlay_open: false,
            selected: None,
            loaded_path: None,
            generation: 0,
            mounted: false,
            pager: ScrollPager::default(),
        }
    }

    pub fn id(&self) -> &str {
        &self.feed.id
    }

    pub fn title(&self) -> &str {
        &self.feed.title
    }

    pub fn path(&self) -> &str {
        &self.feed.path
    }

    pub fn items(&self) -> &[MediaItem] {
        &self.feed.items
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn overlay_open(&self) -> bool {
        self.overlay_open
    }

    pub fn selected(&self) -> Option<&MediaItem> {
        self.selected.as_ref()
    }

    fn ticket(&self) -> FetchTicket {
        FetchTicket {
            row_id: self.feed.id.clone(),
            path: self.feed.path.clone(),
            generation: self.generation,
        }
    }

    /// Starts the row. Returns the initial fetch, or `None` if already mounted.
    pub fn mount(&mut self) -> Option<FetchTicket> {
        if self.mounted {
            return None;
        }
        self.mounted = true;
        self.generation += 1;
        Some(self.ticket())
    }

    /// Tears the row down; results still in flight become stale.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.generation += 1;
        self.clear_items();
        self.pager = ScrollPager::default();
    }

    fn clear_items(&mut self) {
        self.feed.items.clear();
        self.loaded_path = None;
        self.overlay_open = false;
        self.selected = None;
    }

    /// Points the row at another catalog path. Only a real change yields a fetch.
    pub fn set_path(&mut self, path: impl Into<String>) -> Option<FetchTicket> {
        let path = path.into();
        if path == self.feed.path {
            return None;
        }
        self.feed.path = path;
        self.generation += 1;
        self.pager.reset();
        self.mounted.then(|| self.ticket())
    }

    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        self.mounted
            && ticket.generation == self.generation
            && ticket.row_id == self.feed.id
            && ticket.path == self.feed.path
    }

    /// Applies a finished fetch. A failure keeps the items only if they belong to
    /// the current path; items left over from a previous path are dropped.
    pub fn apply(&mut self, ticket: &FetchTicket, result: Result<Vec<MediaItem>, FetchError>) -> FetchOutcome {
        if !self.is_current(ticket) {
            tracing::debug!(row = %ticket.row_id, path = %ticket.path, generation = ticket.generation, "dropping stale feed result");
            return FetchOutcome::Stale;
        }
        match result {
            Ok(items) => {
                let count = items.len();
                self.feed.items = items;
                self.loaded_path = Some(self.feed.path.clone());
                tracing::info!(row = %self.feed.id, count, "feed loaded");
                FetchOutcome::Applied { count }
            }
            Err(e) => {
                tracing::warn!(row = %self.feed.id, path = %self.feed.path, error = %e, "feed fetch failed");
                if self.loaded_path.as_deref() != Some(self.feed.path.as_str()) {
                    self.clear_items();
                }
                FetchOutcome::Failed
            }
        }
    }

    /// Opens the overlay on `items[index]`; the latest selection wins.
    pub fn select(&mut self, index: usize) -> bool {
        let Some(item) = self.feed.items.get(index) else {
            return false;
        };
        self.selected = Some(item.clone());
        self.overlay_open = true;
        true
    }

    pub fn close_overlay(&mut self) {
        self.overlay_open = false;
    }

    pub fn view(&self, image_base: &str) -> RowView {
        let thumbnails = self
            .feed
            .items
            .iter()
            .map(|item| Thumbnail {
                key: item.id,
                alt: item.display_name().to_string(),
                image_url: item.backdrop_url(image_base),
            })
            .collect();
        let overlay = self
            .selected
            .as_ref()
            .filter(|_| self.overlay_open)
            .map(|item| OverlayView::from_item(item, image_base));
        RowView {
            id: self.feed.id.clone(),
            title: self.feed.title.clone(),
            thumbnails,
            overlay,
        }
    }
}

/// Runs the fetch a ticket asks for and hands both back for [`Row::apply`].
pub async fn run_fetch<S: CatalogSource>(
    source: &S,
    ticket: FetchTicket,
) -> (FetchTicket, Result<Vec<MediaItem>, FetchError>) {
    let result = source.fetch(&ticket.path).await;
    (ticket, result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DEFAULT_IMAGE_BASE;
    use std::sync::Mutex;

    struct FakeSource {
        calls: Mutex<Vec<String>>,
        fail: bool,
    }

    impl FakeSource {
        fn ok() -> Self {
            Self { calls: Mutex::new(Vec::new()), fail: false }
        }

        fn failing() -> Self {
            Self { calls: Mutex::new(Vec::new()), fail: true }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl CatalogSource for FakeSource {
        async fn fetch(&self, path: &str) -> Result<Vec<MediaItem>, FetchError> {
            self.calls.lock().unwrap().push(path.to_string());
            if self.fail {
                return Err(FetchError::Status { path: path.to_string(), status: 503 });
            }
            Ok(items_for(path))
        }
    }

    fn item(id: u64, title: &str, backdrop: Option<&str>) -> MediaItem {
        MediaItem {
            id,
            title: Some(title.to_string()),
            backdrop_path: backdrop.map(str::to_string),
            overview: Some(format!("about {title}")),
            ..Default::default()
        }
    }

    fn items_for(path: &str) -> Vec<MediaItem> {
        match path {
            "/movie/top_rated" => vec![item(1, "A", Some("/a.jpg")), item(2, "B", None)],
            _ => vec![item(10, "Q1", Some("/q1.jpg")), item(11, "Q2", Some("/q2.jpg")), item(12, "Q3", None)],
        }
    }

    fn row(path: &str) -> Row {
        Row::new(CategoryFeed::new("top_rated", "Top Rated", path))
    }

    async fn mount_and_load(row: &mut Row, source: &FakeSource) -> FetchOutcome {
        let ticket = row.mount().expect("first mount yields a fetch");
        let (ticket, result) = run_fetch(source, ticket).await;
        row.apply(&ticket, result)
    }

    #[tokio::test]
    async fn mount_fetches_once_and_keeps_order() {
        let source = FakeSource::ok();
        let mut row = row("/movie/top_rated");
        assert!(row.items().is_empty());
        assert!(!row.overlay_open());

        assert_eq!(mount_and_load(&mut row, &source).await, FetchOutcome::Applied { count: 2 });
        assert_eq!(source.calls(), vec!["/movie/top_rated"]);
        assert_eq!(row.items(), items_for("/movie/top_rated").as_slice());

        assert_eq!(row.mount(), None);
        assert_eq!(source.calls().len(), 1);
    }

    #[tokio::test]
    async fn path_change_fetches_new_path_only() {
        let source = FakeSource::ok();
        let mut row = row("/movie/top_rated");
        mount_and_load(&mut row, &source).await;

        let ticket = row.set_path("/discover/movie?with_genres=35").expect("new path yields a fetch");
        let (ticket, result) = run_fetch(&source, ticket).await;
        assert_eq!(row.apply(&ticket, result), FetchOutcome::Applied { count: 3 });
        assert_eq!(source.calls(), vec!["/movie/top_rated", "/discover/movie?with_genres=35"]);

        assert_eq!(row.set_path("/discover/movie?with_genres=35"), None);
        assert_eq!(source.calls().len(), 2);
    }

    #[test]
    fn set_path_before_mount_waits_for_mount() {
        let mut row = row("/movie/top_rated");
        assert_eq!(row.set_path("/movie/now_playing"), None);
        let ticket = row.mount().unwrap();
        assert_eq!(ticket.path, "/movie/now_playing");
    }

    #[tokio::test]
    async fn result_for_replaced_path_is_stale() {
        let source = FakeSource::ok();
        let mut row = row("/movie/top_rated");
        let first = row.mount().unwrap();
        let second = row.set_path("/trending/all/week").unwrap();

        let (second, fresh) = run_fetch(&source, second).await;
        assert_eq!(row.apply(&second, fresh), FetchOutcome::Applied { count: 3 });

        let (first, late) = run_fetch(&source, first).await;
        assert_eq!(row.apply(&first, late), FetchOutcome::Stale);
        assert_eq!(row.items()[0].id, 10);
    }

    #[tokio::test]
    async fn result_after_unmount_is_discarded() {
        let source = FakeSource::ok();
        let mut row = row("/movie/top_rated");
        let ticket = row.mount().unwrap();
        row.unmount();

        let (ticket, result) = run_fetch(&source, ticket).await;
        assert_eq!(row.apply(&ticket, result), FetchOutcome::Stale);
        assert!(row.items().is_empty());

        let again = row.mount().unwrap();
        assert!(!row.is_current(&ticket));
        assert!(row.is_current(&again));
    }

    #[tokio::test]
    async fn failed_fetch_leaves_row_empty_and_unselectable() {
        let source = FakeSource::failing();
        let mut row = row("/movie/top_rated");
        assert_eq!(mount_and_load(&mut row, &source).await, FetchOutcome::Failed);

        assert!(row.items().is_empty());
        assert!(!row.select(0));
        let view = row.view(DEFAULT_IMAGE_BASE);
        assert!(view.thumbnails.is_empty());
        assert_eq!(view.overlay, None);
    }

    #[tokio::test]
    async fn failed_refetch_drops_items_of_previous_path() {
        let mut row = row("/discover/movie?with_genres=28");
        mount_and_load(&mut row, &FakeSource::ok()).await;
        assert!(row.select(0));

        let failing = FakeSource::failing();
        let ticket = row.set_path("/discover/movie?with_genres=27").unwrap();
        let (ticket, result) = run_fetch(&failing, ticket).await;
        assert_eq!(row.apply(&ticket, result), FetchOutcome::Failed);

        assert_eq!(row.path(), "/discover/movie?with_genres=27");
        assert!(row.items().is_empty());
        assert!(!row.overlay_open());
        assert!(!row.select(0));
        assert_eq!(row.view(DEFAULT_IMAGE_BASE).overlay, None);
    }

    #[tokio::test]
    async fn failed_fetch_keeps_items_of_same_path() {
        let mut row = row("/movie/top_rated");
        mount_and_load(&mut row, &FakeSource::ok()).await;

        row.set_path("/trending/all/week").unwrap();
        let back = row.set_path("/movie/top_rated").unwrap();
        let (back, result) = run_fetch(&FakeSource::failing(), back).await;
        assert_eq!(row.apply(&back, result), FetchOutcome::Failed);
        assert_eq!(row.items(), items_for("/movie/top_rated").as_slice());
    }

    #[tokio::test]
    async fn select_opens_overlay_with_item_fields() {
        let source = FakeSource::ok();
        let mut row = row("/trending/all/week");
        mount_and_load(&mut row, &source).await;

        for (i, expected) in items_for("/trending/all/week").iter().enumerate() {
            assert!(row.select(i));
            let overlay = row.view(DEFAULT_IMAGE_BASE).overlay.expect("overlay open");
            assert_eq!(overlay.id, expected.id);
            assert_eq!(overlay.title, expected.display_name());
            assert_eq!(Some(overlay.overview.as_str()), expected.overview.as_deref());
            assert_eq!(overlay.image_url, expected.backdrop_url(DEFAULT_IMAGE_BASE));
        }
    }

    #[tokio::test]
    async fn latest_selection_wins() {
        let source = FakeSource::ok();
        let mut row = row("/trending/all/week");
        mount_and_load(&mut row, &source).await;

        row.select(0);
        row.select(2);
        let overlay = row.view(DEFAULT_IMAGE_BASE).overlay.unwrap();
        assert_eq!(overlay.title, "Q3");
        assert_eq!(row.selected().map(|i| i.id), Some(12));
    }

    #[tokio::test]
    async fn close_overlay_is_idempotent_and_keeps_selection() {
        let source = FakeSource::ok();
        let mut row = row("/movie/top_rated");
        mount_and_load(&mut row, &source).await;

        row.close_overlay();
        assert!(!row.overlay_open());

        row.select(1);
        row.close_overlay();
        row.close_overlay();
        assert!(!row.overlay_open());
        assert_eq!(row.view(DEFAULT_IMAGE_BASE).overlay, None);
        assert_eq!(row.selected().map(|i| i.id), Some(2));
    }

    #[tokio::test]
    async fn two_items_one_without_backdrop() {
        let source = FakeSource::ok();
        let mut row = row("/movie/top_rated");
        mount_and_load(&mut row, &source).await;

        let view = row.view(DEFAULT_IMAGE_BASE);
        assert_eq!(view.title, "Top Rated");
        assert_eq!(view.thumbnails.len(), 2);
        assert_eq!(view.thumbnails[0].alt, "A");
        assert_eq!(
            view.thumbnails[0].image_url.as_deref(),
            Some("https://image.tmdb.org/t/p/original/a.jpg")
        );
        assert_eq!(view.thumbnails[1].image_url, None);

        assert!(row.select(1));
        let overlay = row.view(DEFAULT_IMAGE_BASE).overlay.unwrap();
        assert_eq!(overlay.title, "B");
        assert_eq!(overlay.image_url, None);
    }

    #[test]
    fn select_out_of_range_is_noop() {
        let mut row = row("/movie/top_rated");
        assert!(!row.select(3));
        assert!(!row.overlay_open());
        assert_eq!(row.selected(), None);
    }
}
