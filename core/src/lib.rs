mod api;
mod models;
mod pager;
mod requests;
mod row;

pub use api::{CatalogClient, CatalogSource, FetchError};
pub use models::*;
pub use pager::{ScrollPager, ARROW_GUTTER};
pub use requests::*;
pub use row::{run_fetch, FetchOutcome, FetchTicket, OverlayView, Row, RowView, Thumbnail};

pub const DEFAULT_API_BASE: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Where and how to reach the catalog API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    pub api_base: String,
    pub api_key: String,
    pub language: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: String::new(),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}
