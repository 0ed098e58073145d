//! Safari browser cookie extraction (macOS only)

use crate::browser::Cookie;
use crate::config::BrowserCookieConfig;
use crate::error::{MelcookieError, Result};

/// Read cookies for `domain` from Safari.
///
/// Safari keeps its cookies in a proprietary .binarycookies file rather
/// than SQLite; parsing it is not implemented.
pub async fn cookies_for_domain(
    _config: &BrowserCookieConfig,
    _domain: &str,
) -> Result<Vec<Cookie>> {
    #[cfg(target_os = "macos")]
    {
        Err(MelcookieError::Unsupported(
            "Safari cookie extraction not yet implemented".to_string(),
        ))
    }

    #[cfg(not(target_os = "macos"))]
    {
        Err(MelcookieError::Unsupported(
            "Safari is only available on macOS".to_string(),
        ))
    }
}
