use serde::{Deserialize, Serialize};

pub const DEFAULT_IMAGE_BASE: &str = "https://image.tmdb.org/t/p/original";

/// One movie or show record as returned by the catalog API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: u64,
    pub title: Option<String>,
    pub name: Option<String>,
    pub original_title: Option<String>,
    pub original_name: Option<String>,
    pub backdrop_path: Option<String>,
    pub poster_path: Option<String>,
    pub overview: Option<String>,
    pub release_date: Option<String>,
    pub first_air_date: Option<String>,
    pub vote_average: Option<f32>,
    pub media_type: Option<String>,
}

impl MediaItem {
    /// Movies carry `title`, TV entries carry `name`.
    pub fn display_name(&self) -> &str {
        [&self.title, &self.name, &self.original_title, &self.original_name]
            .into_iter()
            .flatten()
            .map(|s| s.as_str())
            .find(|s| !s.trim().is_empty())
            .unwrap_or_default()
    }

    pub fn release(&self) -> Option<&str> {
        [&self.release_date, &self.first_air_date]
            .into_iter()
            .flatten()
            .map(|d| d.as_str())
            .find(|d| !d.is_empty())
    }

    pub fn backdrop_url(&self, image_base: &str) -> Option<String> {
        image_url(image_base, self.backdrop_path.as_deref())
    }
}

/// Joins the image host and a partial asset path. `None` when there is no
/// usable path, so callers never build a URL ending in `null`.
pub fn image_url(image_base: &str, path: Option<&str>) -> Option<String> {
    let path = path.map(str::trim).filter(|p| !p.is_empty())?;
    Some(format!(
        "{}/{}",
        image_base.trim_end_matches('/'),
        path.trim_start_matches('/')
    ))
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryFeed {
    pub id: String,
    pub title: String,
    pub path: String,
    pub items: Vec<MediaItem>,
}

impl CategoryFeed {
    pub fn new(id: impl Into<String>, title: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            path: path.into(),
            items: Vec::new(),
        }
    }
}

/// Envelope of every list endpoint; only `results` is consumed.
#[derive(Debug, Deserialize)]
pub(crate) struct ResultsPage {
    pub results: Vec<MediaItem>,
}
