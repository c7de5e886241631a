use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use reelrows_core::{CatalogConfig, DEFAULT_API_BASE, DEFAULT_IMAGE_BASE, DEFAULT_LANGUAGE};

pub const CONFIG_FILE_NAME: &str = "reelrows_config.txt";
pub const API_KEY_ENV: &str = "REELROWS_API_KEY";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_key: String,
    pub api_base: String,
    pub image_base: String,
    pub language: String,
    pub thumbnail_height: f32,
    pub font_scale: f32,
    pub image_parallel: u32,
    pub texture_cache_limit: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: DEFAULT_API_BASE.to_string(),
            image_base: DEFAULT_IMAGE_BASE.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            thumbnail_height: 150.0,
            font_scale: 1.0,
            image_parallel: 6,
            texture_cache_limit: 256,
        }
    }
}

impl Config {
    pub fn catalog(&self) -> CatalogConfig {
        CatalogConfig {
            api_base: self.api_base.clone(),
            api_key: self.api_key.clone(),
            language: self.language.clone(),
        }
    }

    /// A non-empty key from the environment wins over the file.
    pub fn with_api_key_override(mut self, key: Option<String>) -> Self {
        if let Some(key) = key.map(|k| k.trim().to_string()).filter(|k| !k.is_empty()) {
            self.api_key = key;
        }
        self
    }
}

pub fn config_dir() -> PathBuf {
    directories::ProjectDirs::from("org", "reelrows", "ReelRows")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn config_file_path() -> PathBuf {
    config_dir().join(CONFIG_FILE_NAME)
}

pub fn parse_config(content: &str) -> Config {
    let defaults = Config::default();
    let mut cfg = Config::default();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((k, v)) = line.split_once('=') else { continue };
        let v = v.trim();
        match k.trim() {
            "api_key" => cfg.api_key = v.to_string(),
            "api_base" if !v.is_empty() => cfg.api_base = v.to_string(),
            "image_base" if !v.is_empty() => cfg.image_base = v.to_string(),
            "language" => cfg.language = v.to_string(),
            "thumbnail_height" => {
                cfg.thumbnail_height = v
                    .parse::<f32>()
                    .ok()
                    .filter(|h| *h >= 40.0)
                    .unwrap_or(defaults.thumbnail_height)
            }
            "font_scale" => {
                cfg.font_scale = v
                    .parse::<f32>()
                    .ok()
                    .filter(|s| (0.5..=3.0).contains(s))
                    .unwrap_or(defaults.font_scale)
            }
            "image_parallel" => {
                cfg.image_parallel = v.parse::<u32>().unwrap_or(defaults.image_parallel).clamp(1, 32)
            }
            "texture_cache_limit" => {
                cfg.texture_cache_limit = v
                    .parse::<u32>()
                    .unwrap_or(defaults.texture_cache_limit)
                    .clamp(64, 4096)
            }
            _ => {}
        }
    }
    cfg
}

pub fn read_config_from(path: &Path) -> Result<Config, io::Error> {
    fs::read_to_string(path).map(|s| parse_config(&s))
}

pub fn write_config_to(path: &Path, cfg: &Config) -> Result<(), io::Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut f = fs::File::create(path)?;
    writeln!(f, "api_key={}", cfg.api_key)?;
    writeln!(f, "api_base={}", cfg.api_base)?;
    writeln!(f, "image_base={}", cfg.image_base)?;
    writeln!(f, "language={}", cfg.language)?;
    writeln!(f, "thumbnail_height={:.1}", cfg.thumbnail_height)?;
    writeln!(f, "font_scale={:.2}", cfg.font_scale)?;
    writeln!(f, "image_parallel={}", cfg.image_parallel)?;
    writeln!(f, "texture_cache_limit={}", cfg.texture_cache_limit)?;
    Ok(())
}

/// Reads `primary`, falling back to `fallback`. Defaults are written to `primary`
/// only when neither file exists; an unreadable `primary` is left untouched.
pub fn load_from(primary: &Path, fallback: &Path) -> Config {
    match read_config_from(primary) {
        Ok(cfg) => cfg,
        Err(e) if e.kind() == io::ErrorKind::NotFound => match read_config_from(fallback) {
            Ok(cfg) => cfg,
            Err(_) => {
                tracing::info!(path = %primary.display(), "no config file, writing defaults");
                let cfg = Config::default();
                if let Err(e) = write_config_to(primary, &cfg) {
                    tracing::warn!(error = %e, "could not write default config");
                }
                cfg
            }
        },
        Err(e) => {
            tracing::warn!(error = %e, path = %primary.display(), "config file unreadable, using defaults");
            Config::default()
        }
    }
}

/// Config for this run: file (or defaults, persisted on first start) plus env override.
pub fn load() -> Config {
    let cfg = load_from(&config_file_path(), Path::new(CONFIG_FILE_NAME));
    let cfg = cfg.with_api_key_override(std::env::var(API_KEY_ENV).ok());
    if cfg.api_key.is_empty() {
        tracing::warn!("no api_key configured; set {} or edit {}", API_KEY_ENV, config_file_path().display());
    }
    cfg
}
