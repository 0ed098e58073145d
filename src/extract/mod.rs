//! Extraction controller: read, filter, format, persist.
//!
//! The controller only talks to its collaborators through the
//! [`CookieSource`] and [`crate::cache::CacheStore`] seams, so the whole
//! read-filter-format-persist cycle can be exercised without a browser
//! or a real cache directory.

pub mod state;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::browser::Cookie;
use crate::cache::{CacheStore, CachedExtraction};
use crate::error::{MelcookieError, Result};
use crate::i18n;
use crate::output::StatusSink;
use crate::session::{self, WATCHED_DOMAIN};
use state::{Phase, PhaseTracker};

/// Read access to a browser cookie store.
#[async_trait]
pub trait CookieSource {
    /// All cookies the store holds for `domain`, in store order.
    async fn cookies_for_domain(&self, domain: &str) -> Result<Vec<Cookie>>;
}

/// Outcome of a successful extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub cookie_string: String,
    pub count: usize,
}

/// Drives one read-filter-format-persist cycle against the cookie source.
pub struct ExtractController<S, C> {
    source: S,
    cache: C,
    phase: PhaseTracker,
}

impl<S: CookieSource, C: CacheStore> ExtractController<S, C> {
    pub fn new(source: S, cache: C) -> Self {
        Self {
            source,
            cache,
            phase: PhaseTracker::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase.phase()
    }

    /// Run one extraction.
    ///
    /// The cache is written exactly once, after filtering succeeds and
    /// before the success status is emitted; the error paths never touch
    /// it.
    pub async fn extract(&mut self, status: &mut dyn StatusSink) -> Result<Extraction> {
        self.phase.begin()?;
        status.info(&i18n::fetching_message());

        match self.run(status).await {
            Ok(extraction) => {
                self.phase.succeed();
                Ok(extraction)
            }
            Err(err) => {
                self.phase.fail();
                log::error!("cookie extraction failed: {}", err);
                Err(err)
            }
        }
    }

    async fn run(&mut self, status: &mut dyn StatusSink) -> Result<Extraction> {
        let cookies = self.source.cookies_for_domain(WATCHED_DOMAIN).await?;
        if cookies.is_empty() {
            return Err(MelcookieError::NotLoggedIn(WATCHED_DOMAIN.to_string()));
        }

        let relevant = session::filter_session_cookies(&cookies);
        if relevant.is_empty() {
            return Err(MelcookieError::SessionCookiesMissing(
                WATCHED_DOMAIN.to_string(),
            ));
        }

        let cookie_string = session::build_cookie_header(relevant.iter().copied());
        let extraction = CachedExtraction::new(cookie_string.clone(), Utc::now());
        self.cache.save(&extraction)?;

        status.success(&i18n::extracted_message(relevant.len()));
        Ok(Extraction {
            cookie_string,
            count: relevant.len(),
        })
    }
}

/// The informational line shown at startup, `None` when the cache is
/// absent or older than the freshness window.
pub fn cached_status_line<C: CacheStore>(
    cache: &C,
    now: DateTime<Utc>,
) -> Result<Option<String>> {
    let cached = match cache.load()? {
        Some(cached) => cached,
        None => return Ok(None),
    };
    if !cached.is_fresh(now) {
        return Ok(None);
    }
    Ok(Some(i18n::last_cookie_message(
        cached.rounded_age_hours(now),
    )))
}
