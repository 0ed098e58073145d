//! Chrome/Chromium browser cookie extraction

use crate::browser::Cookie;
use crate::config::BrowserCookieConfig;
use crate::error::Result;
#[cfg(not(any(target_os = "macos", target_os = "linux")))]
use crate::error::MelcookieError;

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "macos")]
mod macos;
#[cfg(any(target_os = "linux", target_os = "macos"))]
mod store;

/// Supported Chromium-based browsers.
#[derive(Debug, Clone, Copy)]
pub enum ChromiumBrowser {
    Chrome,
    Edge,
    Brave,
    Opera,
    Vivaldi,
    Whale,
}

/// Per-browser locations and keyring identity.
#[cfg(any(target_os = "linux", target_os = "macos"))]
pub(crate) struct ChromiumSettings {
    pub(crate) user_data_dir: std::path::PathBuf,
    pub(crate) keyring_account: &'static str,
    pub(crate) supports_profiles: bool,
}

/// Read cookies for `domain` from a Chromium-family browser.
pub async fn cookies_for_domain(
    browser: ChromiumBrowser,
    config: &BrowserCookieConfig,
    domain: &str,
) -> Result<Vec<Cookie>> {
    #[cfg(target_os = "linux")]
    {
        linux::cookies_for_domain(browser, config, domain)
    }
    #[cfg(target_os = "macos")]
    {
        macos::cookies_for_domain(browser, config, domain)
    }
    #[cfg(not(any(target_os = "macos", target_os = "linux")))]
    {
        let _ = (browser, config, domain);
        Err(MelcookieError::Unsupported(
            "Chromium cookie extraction is only implemented for Linux and macOS".to_string(),
        ))
    }
}
