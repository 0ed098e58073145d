//! Configuration management for melcookie

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::Result;

/// Browser types supported for cookie extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Browser {
    Chrome,
    Firefox,
    Safari,
    Edge,
    Brave,
    Opera,
    Vivaldi,
    Whale,
}

impl FromStr for Browser {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "chrome" | "chromium" => Ok(Browser::Chrome),
            "firefox" => Ok(Browser::Firefox),
            "safari" => Ok(Browser::Safari),
            "edge" => Ok(Browser::Edge),
            "brave" => Ok(Browser::Brave),
            "opera" => Ok(Browser::Opera),
            "vivaldi" => Ok(Browser::Vivaldi),
            "whale" => Ok(Browser::Whale),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Browser::Chrome => "chrome",
            Browser::Firefox => "firefox",
            Browser::Safari => "safari",
            Browser::Edge => "edge",
            Browser::Brave => "brave",
            Browser::Opera => "opera",
            Browser::Vivaldi => "vivaldi",
            Browser::Whale => "whale",
        };
        write!(f, "{}", name)
    }
}

/// Browser cookie configuration
#[derive(Debug, Clone)]
pub struct BrowserCookieConfig {
    pub browser: Browser,
    pub profile: Option<String>,
}

impl BrowserCookieConfig {
    /// Parse from BROWSER[:PROFILE] format. PROFILE may be a profile name
    /// or a direct path to a cookie database.
    pub fn parse(input: &str) -> Result<Self> {
        let mut parts = input.splitn(2, ':');
        let browser_str = parts.next().unwrap_or(input);
        let profile = parts
            .next()
            .map(|s| s.to_string())
            .filter(|s| !s.is_empty());

        let browser = browser_str.parse::<Browser>().map_err(|_| {
            crate::error::MelcookieError::Config(format!("Unsupported browser: {}", browser_str))
        })?;

        Ok(BrowserCookieConfig { browser, profile })
    }
}

impl Default for BrowserCookieConfig {
    fn default() -> Self {
        BrowserCookieConfig {
            browser: Browser::Chrome,
            profile: None,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    pub file: Option<PathBuf>,
    pub verbose: bool,
    pub silent: bool,
}

#[cfg(test)]
mod tests {
    use super::{Browser, BrowserCookieConfig};
    use crate::error::MelcookieError;

    #[test]
    fn parse_browser_names() {
        assert_eq!("chrome".parse::<Browser>(), Ok(Browser::Chrome));
        assert_eq!("chromium".parse::<Browser>(), Ok(Browser::Chrome));
        assert_eq!("FIREFOX".parse::<Browser>(), Ok(Browser::Firefox));
        assert!("netscape".parse::<Browser>().is_err());
    }

    #[test]
    fn parse_config_with_profile() {
        let config = BrowserCookieConfig::parse("firefox:Profile 1").expect("config");
        assert_eq!(config.browser, Browser::Firefox);
        assert_eq!(config.profile.as_deref(), Some("Profile 1"));
    }

    #[test]
    fn parse_config_without_profile() {
        let config = BrowserCookieConfig::parse("brave").expect("config");
        assert_eq!(config.browser, Browser::Brave);
        assert!(config.profile.is_none());
    }

    #[test]
    fn parse_config_rejects_unknown_browser() {
        let err = BrowserCookieConfig::parse("netscape").expect_err("unknown browser");
        assert!(matches!(err, MelcookieError::Config(_)));
    }

    #[test]
    fn default_config_uses_chrome() {
        let config = BrowserCookieConfig::default();
        assert_eq!(config.browser, Browser::Chrome);
        assert!(config.profile.is_none());
    }
}
