//! Browser cookie extraction module
//!
//! This module handles reading cookies for the watched domain out of
//! various browsers across different operating systems.

use async_trait::async_trait;

use crate::config::{Browser, BrowserCookieConfig};
use crate::error::Result;
use crate::extract::CookieSource;

pub mod chrome;
pub mod firefox;
pub mod safari;

/// Represents a browser cookie
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
    pub secure: bool,
    pub http_only: bool,
    pub expires: Option<i64>,
}

impl Cookie {
    /// Convenience constructor for a plain session cookie.
    pub fn new(name: &str, value: &str, domain: &str) -> Self {
        Cookie {
            name: name.to_string(),
            value: value.to_string(),
            domain: domain.to_string(),
            path: "/".to_string(),
            secure: false,
            http_only: false,
            expires: None,
        }
    }
}

/// True when `host_key` (as stored by the browser, possibly dot-prefixed)
/// is `domain` itself or one of its subdomains.
pub fn domain_matches(host_key: &str, domain: &str) -> bool {
    let host = host_key.strip_prefix('.').unwrap_or(host_key);
    host == domain || host.ends_with(&format!(".{}", domain))
}

/// Main interface for reading cookies out of a local browser store.
pub struct BrowserCookieExtractor {
    config: BrowserCookieConfig,
}

impl BrowserCookieExtractor {
    /// Create a new cookie extractor with the given configuration
    pub fn new(config: BrowserCookieConfig) -> Self {
        Self { config }
    }

    /// Read all cookies belonging to `domain` from the configured browser.
    ///
    /// An empty result means the store holds no cookies for the domain;
    /// it is not an error at this level.
    pub async fn extract(&self, domain: &str) -> Result<Vec<Cookie>> {
        match self.config.browser {
            Browser::Chrome => {
                chrome::cookies_for_domain(chrome::ChromiumBrowser::Chrome, &self.config, domain)
                    .await
            }
            Browser::Edge => {
                chrome::cookies_for_domain(chrome::ChromiumBrowser::Edge, &self.config, domain)
                    .await
            }
            Browser::Brave => {
                chrome::cookies_for_domain(chrome::ChromiumBrowser::Brave, &self.config, domain)
                    .await
            }
            Browser::Opera => {
                chrome::cookies_for_domain(chrome::ChromiumBrowser::Opera, &self.config, domain)
                    .await
            }
            Browser::Vivaldi => {
                chrome::cookies_for_domain(chrome::ChromiumBrowser::Vivaldi, &self.config, domain)
                    .await
            }
            Browser::Whale => {
                chrome::cookies_for_domain(chrome::ChromiumBrowser::Whale, &self.config, domain)
                    .await
            }
            Browser::Firefox => firefox::cookies_for_domain(&self.config, domain).await,
            Browser::Safari => safari::cookies_for_domain(&self.config, domain).await,
        }
    }
}

#[async_trait]
impl CookieSource for BrowserCookieExtractor {
    async fn cookies_for_domain(&self, domain: &str) -> Result<Vec<Cookie>> {
        self.extract(domain).await
    }
}
