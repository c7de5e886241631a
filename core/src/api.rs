use std::future::Future;

use reqwest::Url;
use thiserror::Error;

use crate::models::{MediaItem, ResultsPage};
use crate::CatalogConfig;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("invalid catalog url {url}: {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("request for {path} failed: {source}")]
    Network {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("catalog answered HTTP {status} for {path}")]
    Status { path: String, status: u16 },
    #[error("unexpected response body for {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Anything that can turn a catalog path into a list of items.
pub trait CatalogSource: Send + Sync {
    fn fetch(&self, path: &str) -> impl Future<Output = Result<Vec<MediaItem>, FetchError>> + Send;
}

/// Thin client over the catalog REST API. One GET per call, no caching.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    config: CatalogConfig,
}

impl CatalogClient {
    pub fn new(config: CatalogConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("reelrows/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self::with_http(config, http))
    }

    pub fn with_http(config: CatalogConfig, http: reqwest::Client) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// `{api_base}/{path}` plus credential and language query parameters.
    /// Query parameters already present in `path` are kept.
    pub fn endpoint_url(&self, path: &str) -> Result<Url, FetchError> {
        let joined = format!(
            "{}/{}",
            self.config.api_base.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        let mut url = Url::parse(&joined).map_err(|source| FetchError::Url { url: joined.clone(), source })?;
        let params: Vec<(&str, &str)> = [("api_key", &self.config.api_key), ("language", &self.config.language)]
            .into_iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| (k, v.as_str()))
            .collect();
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }
        Ok(url)
    }

    pub async fn fetch(&self, path: &str) -> Result<Vec<MediaItem>, FetchError> {
        let url = self.endpoint_url(path)?;
        tracing::debug!(path, "fetching catalog feed");
        let network = |source: reqwest::Error| FetchError::Network { path: path.to_string(), source };

        let res = self.http.get(url).send().await.map_err(network)?;
        if !res.status().is_success() {
            return Err(FetchError::Status { path: path.to_string(), status: res.status().as_u16() });
        }
        let body = res.text().await.map_err(network)?;
        let page: ResultsPage = serde_json::from_str(&body)
            .map_err(|source| FetchError::Parse { path: path.to_string(), source })?;
        tracing::debug!(path, count = page.results.len(), "catalog feed received");
        Ok(page.results)
    }
}

impl CatalogSource for CatalogClient {
    fn fetch(&self, path: &str) -> impl Future<Output = Result<Vec<MediaItem>, FetchError>> + Send {
        CatalogClient::fetch(self, path)
    }
}
