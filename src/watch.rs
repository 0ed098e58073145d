//! Lifecycle observer: startup announcement and cookie-change watching.
//!
//! The watcher polls the cookie store on a fixed interval, diffs each
//! snapshot of the watched domain's cookies against the previous one and
//! fans the observed changes out to a subscription list of handlers.
//! Beyond the previous snapshot it keeps no state.

use std::collections::HashMap;
use std::time::Duration;

use crate::browser::Cookie;
use crate::error::Result;
use crate::extract::CookieSource;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// What happened to a cookie between two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Updated,
    Removed,
}

/// A single observed change to a watched-domain cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieChange {
    pub name: String,
    pub domain: String,
    pub kind: ChangeKind,
}

/// Handler invoked for every observed cookie change.
pub type ChangeHandler = Box<dyn Fn(&CookieChange) + Send>;

/// Polls the cookie store and fans observed changes out to handlers.
pub struct CookieWatcher {
    interval: Duration,
    handlers: Vec<ChangeHandler>,
}

impl CookieWatcher {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            handlers: Vec::new(),
        }
    }

    /// Register a change handler. Handlers are invoked in registration
    /// order, once per change.
    pub fn on_change(&mut self, handler: ChangeHandler) {
        self.handlers.push(handler);
    }

    /// Watch `domain` in `source` until the process is interrupted.
    ///
    /// A failed poll is logged and skipped; the previous snapshot is kept
    /// so the next successful poll diffs against real data.
    pub async fn run<S: CookieSource>(&self, source: &S, domain: &str) -> Result<()> {
        announce_startup();

        let mut previous = source.cookies_for_domain(domain).await?;
        log::info!(
            "watching {} ({} cookie(s) at startup, polling every {:?})",
            domain,
            previous.len(),
            self.interval
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.tick().await; // first tick completes immediately

        loop {
            ticker.tick().await;
            let current = match source.cookies_for_domain(domain).await {
                Ok(current) => current,
                Err(err) => {
                    log::warn!("cookie store read failed: {}", err);
                    continue;
                }
            };
            for change in diff_snapshots(&previous, &current) {
                for handler in &self.handlers {
                    handler(&change);
                }
            }
            previous = current;
        }
    }
}

/// Log the one-time startup line.
pub fn announce_startup() {
    log::info!("MELCloud Home cookie watcher started");
}

/// Default change handler: one log line naming the changed cookie.
pub fn log_change(change: &CookieChange) {
    log::info!("MELCloud cookie updated: {}", change.name);
}

/// Compare two snapshots of the same domain's cookies.
///
/// Cookies are keyed by (domain, name, path); additions and updates come
/// out in current-snapshot order, removals after.
pub fn diff_snapshots(previous: &[Cookie], current: &[Cookie]) -> Vec<CookieChange> {
    let key = |c: &Cookie| (c.domain.clone(), c.name.clone(), c.path.clone());
    let prev: HashMap<_, _> = previous.iter().map(|c| (key(c), c)).collect();
    let curr: HashMap<_, _> = current.iter().map(|c| (key(c), c)).collect();

    let mut changes = Vec::new();
    for cookie in current {
        match prev.get(&key(cookie)) {
            None => changes.push(CookieChange {
                name: cookie.name.clone(),
                domain: cookie.domain.clone(),
                kind: ChangeKind::Added,
            }),
            Some(old) if old.value != cookie.value => changes.push(CookieChange {
                name: cookie.name.clone(),
                domain: cookie.domain.clone(),
                kind: ChangeKind::Updated,
            }),
            Some(_) => {}
        }
    }
    for cookie in previous {
        if !curr.contains_key(&key(cookie)) {
            changes.push(CookieChange {
                name: cookie.name.clone(),
                domain: cookie.domain.clone(),
                kind: ChangeKind::Removed,
            });
        }
    }
    changes
}
