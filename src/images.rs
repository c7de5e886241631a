use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use std::sync::mpsc::Sender;

use eframe::egui;
use tokio::sync::Semaphore;

use crate::app_state::Msg;

/// Backdrops are served at full resolution; thumbnails never need more than this.
pub const MAX_DECODED_WIDTH: u32 = 780;
pub const MAX_DECODED_HEIGHT: u32 = 440;

/// Backdrop loading and texture bookkeeping. Textures live in memory only.
pub struct ImageManager {
    http: reqwest::Client,
    textures: HashMap<String, egui::TextureHandle>,
    /// Upload order, oldest first; drives eviction once `texture_limit` is hit.
    texture_order: VecDeque<String>,
    texture_limit: usize,
    loading: HashSet<String>,
    failed: HashSet<String>,
    load_semaphore: Arc<Semaphore>,
}

impl ImageManager {
    pub fn new(http: reqwest::Client, concurrent_loads: usize, texture_limit: usize) -> Self {
        Self {
            http,
            textures: HashMap::new(),
            texture_order: VecDeque::new(),
            texture_limit: texture_limit.max(1),
            loading: HashSet::new(),
            failed: HashSet::new(),
            load_semaphore: Arc::new(Semaphore::new(concurrent_loads.max(1))),
        }
    }

    pub fn texture(&self, url: &str) -> Option<&egui::TextureHandle> {
        self.textures.get(url)
    }

    pub fn has_failed(&self, url: &str) -> bool {
        self.failed.contains(url)
    }

    /// Marks `url` as in flight. `false` if it is already loading, loaded or failed.
    fn begin(&mut self, url: &str) -> bool {
        if self.textures.contains_key(url) || self.failed.contains(url) || self.loading.contains(url) {
            return false;
        }
        self.loading.insert(url.to_string());
        true
    }

    /// Fetches and decodes `url` in the background unless already known.
    pub fn request(&mut self, url: &str, tx: &Sender<Msg>, ctx: &egui::Context) {
        if !self.begin(url) {
            return;
        }
        let url = url.to_string();
        let http = self.http.clone();
        let semaphore = self.load_semaphore.clone();
        let tx = tx.clone();
        let ctx = ctx.clone();
        tokio::spawn(async move {
            let Ok(_permit) = semaphore.acquire_owned().await else {
                return;
            };
            let msg = match fetch_and_decode(&http, &url).await {
                Ok((rgba, w, h)) => Msg::CoverDecoded { url, rgba, w, h },
                Err(error) => Msg::CoverFailed { url, error },
            };
            let _ = tx.send(msg);
            ctx.request_repaint();
        });
    }

    pub fn on_decoded(&mut self, ctx: &egui::Context, url: String, rgba: &[u8], w: u32, h: u32) {
        self.loading.remove(&url);
        let color_image = egui::ColorImage::from_rgba_unmultiplied([w as usize, h as usize], rgba);
        let texture = ctx.load_texture(url.clone(), color_image, egui::TextureOptions::LINEAR);
        if self.textures.insert(url.clone(), texture).is_none() {
            self.texture_order.push_back(url);
        }
        while self.textures.len() > self.texture_limit {
            let Some(oldest) = self.texture_order.pop_front() else { break };
            self.textures.remove(&oldest);
            tracing::trace!(url = %oldest, "texture evicted");
        }
    }

    pub fn on_failed(&mut self, url: String, error: &str) {
        tracing::warn!(%url, error, "backdrop failed to load");
        self.loading.remove(&url);
        self.failed.insert(url);
    }

    pub fn loading_count(&self) -> usize {
        self.loading.len()
    }

    #[cfg(test)]
    fn texture_count(&self) -> usize {
        self.textures.len()
    }
}

async fn fetch_and_decode(http: &reqwest::Client, url: &str) -> Result<(Vec<u8>, u32, u32), String> {
    let response = http.get(url).send().await.map_err(|e| e.to_string())?;
    if !response.status().is_success() {
        return Err(format!("HTTP {}", response.status()));
    }
    let bytes = response.bytes().await.map_err(|e| e.to_string())?;
    tracing::debug!(url, size = bytes.len(), "backdrop downloaded");
    tokio::task::spawn_blocking(move || decode_rgba(&bytes, MAX_DECODED_WIDTH, MAX_DECODED_HEIGHT))
        .await
        .map_err(|e| e.to_string())?
        .map_err(|e| e.to_string())
}

/// Decodes any supported format into RGBA8, shrinking to fit `max_w` x `max_h`.
pub fn decode_rgba(bytes: &[u8], max_w: u32, max_h: u32) -> Result<(Vec<u8>, u32, u32), image::ImageError> {
    let mut img = image::load_from_memory(bytes)?;
    if img.width() > max_w || img.height() > max_h {
        img = img.thumbnail(max_w, max_h);
    }
    let rgba = img.to_rgba8();
    let (w, h) = rgba.dimensions();
    Ok((rgba.into_raw(), w, h))
}
