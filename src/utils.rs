//! Utility functions and helpers

use crate::error::{MelcookieError, Result};
use std::path::PathBuf;

/// File system utilities
pub struct FileUtils;

impl FileUtils {
    /// Expand tilde (~) in file paths
    pub fn expand_path(path: &str) -> Result<PathBuf> {
        if path.starts_with('~') {
            if let Some(home_dir) = dirs::home_dir() {
                Ok(home_dir.join(&path[2..]))
            } else {
                Err(MelcookieError::Config(
                    "Cannot determine home directory".to_string(),
                ))
            }
        } else {
            Ok(PathBuf::from(path))
        }
    }
}

/// String utilities
pub struct StringUtils;

impl StringUtils {
    /// Parse duration values (supports suffixes like 's', 'm', 'h')
    pub fn parse_duration(input: &str) -> Result<std::time::Duration> {
        if let Ok(seconds) = input.parse::<u64>() {
            return Ok(std::time::Duration::from_secs(seconds));
        }

        let (number_part, suffix) = if let Some(stripped) = input.strip_suffix('s') {
            (stripped, 1)
        } else if let Some(stripped) = input.strip_suffix('m') {
            (stripped, 60)
        } else if let Some(stripped) = input.strip_suffix('h') {
            (stripped, 3600)
        } else {
            return Err(MelcookieError::Config(format!(
                "Invalid duration format: '{}'. Use number with optional suffix (s/m/h)",
                input
            )));
        };

        let number: u64 = number_part.parse().map_err(|_| {
            MelcookieError::Config(format!("Invalid duration number: '{}'", number_part))
        })?;

        Ok(std::time::Duration::from_secs(number * suffix))
    }
}
