//! Cached extraction persistence.
//!
//! A single JSON file holds the most recent successful extraction; each
//! save overwrites both fields together, so there is no partial state to
//! recover from.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{MelcookieError, Result};

/// How long a cached extraction is reported as recent.
pub const FRESHNESS_WINDOW_HOURS: i64 = 24;

const CACHE_FILE_NAME: &str = "last_extraction.json";

/// The most recent successful extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedExtraction {
    pub cookie_string: String,
    pub last_update: DateTime<Utc>,
}

impl CachedExtraction {
    pub fn new(cookie_string: String, last_update: DateTime<Utc>) -> Self {
        Self {
            cookie_string,
            last_update,
        }
    }

    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now.signed_duration_since(self.last_update)
    }

    /// Strictly younger than the freshness window.
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.age(now) < Duration::hours(FRESHNESS_WINDOW_HOURS)
    }

    /// Age in hours, rounded to the nearest whole hour for display.
    pub fn rounded_age_hours(&self, now: DateTime<Utc>) -> i64 {
        (self.age(now).num_minutes() as f64 / 60.0).round() as i64
    }
}

/// Persistence for the cached extraction.
pub trait CacheStore {
    fn load(&self) -> Result<Option<CachedExtraction>>;
    fn save(&self, extraction: &CachedExtraction) -> Result<()>;
}

/// JSON-file cache in the per-user cache directory.
#[derive(Debug, Clone)]
pub struct FileCacheStore {
    path: PathBuf,
}

impl FileCacheStore {
    /// Cache file in the default location. `MELCOOKIE_CACHE_DIR`
    /// overrides the directory.
    pub fn new() -> Result<Self> {
        let dir = match env::var_os("MELCOOKIE_CACHE_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => dirs::cache_dir()
                .ok_or_else(|| {
                    MelcookieError::Cache("Cannot determine cache directory".to_string())
                })?
                .join("melcookie"),
        };
        Ok(Self {
            path: dir.join(CACHE_FILE_NAME),
        })
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CacheStore for FileCacheStore {
    fn load(&self) -> Result<Option<CachedExtraction>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&self.path)?;
        match serde_json::from_str(&data) {
            Ok(cached) => Ok(Some(cached)),
            Err(err) => {
                // A mangled cache file is treated as absent.
                log::warn!("Ignoring unreadable cache file {:?}: {}", self.path, err);
                Ok(None)
            }
        }
    }

    fn save(&self, extraction: &CachedExtraction) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(extraction)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}
