//! Firefox browser cookie extraction
//!
//! Firefox keeps cookies unencrypted in `cookies.sqlite` inside the
//! profile directory. Schema version 16 switched the expiry column to
//! milliseconds.

use crate::browser::Cookie;
use crate::config::BrowserCookieConfig;
use crate::error::{MelcookieError, Result};

#[cfg(any(target_os = "linux", target_os = "macos"))]
use crate::browser::domain_matches;
#[cfg(any(target_os = "linux", target_os = "macos"))]
use crate::utils::FileUtils;
#[cfg(any(target_os = "linux", target_os = "macos"))]
use rusqlite::{Connection, Row};
#[cfg(any(target_os = "linux", target_os = "macos"))]
use std::fs;
#[cfg(any(target_os = "linux", target_os = "macos"))]
use std::path::{Path, PathBuf};
#[cfg(any(target_os = "linux", target_os = "macos"))]
use tempfile::tempdir;

#[cfg(any(target_os = "linux", target_os = "macos"))]
const MAX_SUPPORTED_DB_SCHEMA_VERSION: i64 = 17;

/// Read cookies for `domain` from Firefox.
pub async fn cookies_for_domain(
    config: &BrowserCookieConfig,
    domain: &str,
) -> Result<Vec<Cookie>> {
    #[cfg(any(target_os = "linux", target_os = "macos"))]
    {
        read_profile_cookies(config, domain)
    }
    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    {
        let _ = (config, domain);
        Err(MelcookieError::Unsupported(
            "Firefox cookie extraction is only implemented for Linux and macOS".to_string(),
        ))
    }
}

#[cfg(any(target_os = "linux", target_os = "macos"))]
fn read_profile_cookies(config: &BrowserCookieConfig, domain: &str) -> Result<Vec<Cookie>> {
    let roots = search_roots(config.profile.as_deref())?;
    let cookie_db = newest_path(find_cookie_dbs(&roots)).ok_or_else(|| {
        MelcookieError::FileNotFound("Firefox cookies database not found".to_string())
    })?;

    let temp_dir = tempdir()
        .map_err(|e| MelcookieError::BrowserCookie(format!("Failed to create temp dir: {}", e)))?;
    let temp_db = temp_dir.path().join("firefox-cookies.sqlite");
    fs::copy(&cookie_db, &temp_db)
        .map_err(|e| MelcookieError::BrowserCookie(format!("Failed to copy cookies DB: {}", e)))?;

    let conn = Connection::open(&temp_db)
        .map_err(|e| MelcookieError::BrowserCookie(format!("Failed to open cookies DB: {}", e)))?;
    let schema_version = read_schema_version(&conn);
    if schema_version > MAX_SUPPORTED_DB_SCHEMA_VERSION {
        log::warn!(
            "Firefox cookie DB schema version {} may be unsupported",
            schema_version
        );
    }

    let (expiry_column, secure_column, http_only_column) = cookie_columns(&conn)?;
    let query = format!(
        "SELECT host, name, value, path, {}, {}, {} FROM moz_cookies \
         WHERE host = ?1 OR host LIKE ?2",
        expiry_column, secure_column, http_only_column
    );
    let mut stmt = conn.prepare(&query).map_err(|e| {
        MelcookieError::BrowserCookie(format!("Failed to prepare Firefox query: {}", e))
    })?;
    let mut rows = stmt
        .query([domain.to_string(), format!("%.{}", domain)])
        .map_err(|e| {
            MelcookieError::BrowserCookie(format!("Failed to query Firefox cookies: {}", e))
        })?;

    let mut cookies = Vec::new();
    while let Some(row) = rows.next().map_err(|e| {
        MelcookieError::BrowserCookie(format!("Failed to read Firefox cookie row: {}", e))
    })? {
        let cookie = row_to_cookie(row, schema_version)?;
        if domain_matches(&cookie.domain, domain) {
            cookies.push(cookie);
        }
    }

    Ok(cookies)
}

#[cfg(any(target_os = "linux", target_os = "macos"))]
fn profiles_root() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| MelcookieError::Config("Cannot determine home directory".to_string()))?;
    #[cfg(target_os = "macos")]
    {
        Ok(home.join("Library/Application Support/Firefox/Profiles"))
    }
    #[cfg(not(target_os = "macos"))]
    {
        Ok(home.join(".mozilla/firefox"))
    }
}

#[cfg(any(target_os = "linux", target_os = "macos"))]
fn search_roots(profile: Option<&str>) -> Result<Vec<PathBuf>> {
    let base = profiles_root()?;

    if let Some(profile) = profile {
        if is_path_like(profile) {
            let expanded = FileUtils::expand_path(profile)?;
            return Ok(vec![expanded]);
        }
        return Ok(vec![base.join(profile)]);
    }

    Ok(vec![base])
}

#[cfg(any(target_os = "linux", target_os = "macos"))]
fn is_path_like(value: &str) -> bool {
    value.contains('/') || value.contains('\\') || value.starts_with('~')
}

#[cfg(any(target_os = "linux", target_os = "macos"))]
fn find_cookie_dbs(roots: &[PathBuf]) -> Vec<PathBuf> {
    let mut results = Vec::new();
    for root in roots {
        if root.is_file() && root.ends_with("cookies.sqlite") {
            results.push(root.clone());
            continue;
        }
        if root.exists() {
            results.extend(find_files(root, "cookies.sqlite"));
        }
    }
    results
}

#[cfg(any(target_os = "linux", target_os = "macos"))]
fn find_files(root: &Path, filename: &str) -> Vec<PathBuf> {
    let mut matches = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(_) => continue,
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
            } else if path.file_name().and_then(|name| name.to_str()) == Some(filename) {
                matches.push(path);
            }
        }
    }
    matches
}

#[cfg(any(target_os = "linux", target_os = "macos"))]
fn newest_path(paths: Vec<PathBuf>) -> Option<PathBuf> {
    paths
        .into_iter()
        .filter_map(|path| {
            let modified = fs::metadata(&path).ok()?.modified().ok()?;
            Some((modified, path))
        })
        .max_by_key(|(modified, _)| *modified)
        .map(|(_, path)| path)
}

#[cfg(any(target_os = "linux", target_os = "macos"))]
fn read_schema_version(conn: &Connection) -> i64 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap_or(0)
}

#[cfg(any(target_os = "linux", target_os = "macos"))]
fn cookie_columns(conn: &Connection) -> Result<(String, String, String)> {
    let mut stmt = conn.prepare("PRAGMA table_info(moz_cookies)").map_err(|e| {
        MelcookieError::BrowserCookie(format!("Failed to read cookie schema: {}", e))
    })?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .map_err(|e| MelcookieError::BrowserCookie(format!("Failed to read cookie schema: {}", e)))?;
    let mut columns = Vec::new();
    for row in rows {
        let name = row.map_err(|e| {
            MelcookieError::BrowserCookie(format!("Failed to read cookie schema: {}", e))
        })?;
        columns.push(name);
    }

    let expiry_column = if columns.iter().any(|c| c == "expiry") {
        "expiry"
    } else if columns.iter().any(|c| c == "expires") {
        "expires"
    } else {
        return Err(MelcookieError::BrowserCookie(
            "Firefox cookies table missing expiry column".to_string(),
        ));
    };
    let secure_column = if columns.iter().any(|c| c == "isSecure") {
        "isSecure"
    } else {
        "is_secure"
    };
    let http_only_column = if columns.iter().any(|c| c == "isHttpOnly") {
        "isHttpOnly"
    } else if columns.iter().any(|c| c == "is_http_only") {
        "is_http_only"
    } else {
        "0"
    };
    Ok((
        expiry_column.to_string(),
        secure_column.to_string(),
        http_only_column.to_string(),
    ))
}

#[cfg(any(target_os = "linux", target_os = "macos"))]
fn row_to_cookie(row: &Row<'_>, schema_version: i64) -> Result<Cookie> {
    let domain: String = row.get(0).map_err(|e| {
        MelcookieError::BrowserCookie(format!("Failed to read cookie host: {}", e))
    })?;
    let name: String = row.get(1).map_err(|e| {
        MelcookieError::BrowserCookie(format!("Failed to read cookie name: {}", e))
    })?;
    let value: String = row.get(2).map_err(|e| {
        MelcookieError::BrowserCookie(format!("Failed to read cookie value: {}", e))
    })?;
    let path: String = row.get(3).map_err(|e| {
        MelcookieError::BrowserCookie(format!("Failed to read cookie path: {}", e))
    })?;
    let expiry: Option<i64> = row.get(4).map_err(|e| {
        MelcookieError::BrowserCookie(format!("Failed to read cookie expiry: {}", e))
    })?;
    let secure: i64 = row.get(5).map_err(|e| {
        MelcookieError::BrowserCookie(format!("Failed to read cookie secure flag: {}", e))
    })?;
    let http_only: i64 = row.get(6).map_err(|e| {
        MelcookieError::BrowserCookie(format!("Failed to read cookie http-only flag: {}", e))
    })?;

    let expiry_seconds = expiry.map(|expiry| {
        if schema_version >= 16 {
            expiry / 1000
        } else {
            expiry
        }
    });
    let expires = match expiry_seconds {
        Some(seconds) if seconds > 0 => Some(seconds),
        _ => None,
    };

    Ok(Cookie {
        name,
        value,
        domain,
        path,
        secure: secure != 0,
        http_only: http_only != 0,
        expires,
    })
}

#[cfg(all(test, any(target_os = "linux", target_os = "macos")))]
mod tests {
    use super::is_path_like;

    #[test]
    fn is_path_like_detects_paths() {
        assert!(is_path_like("~/profile"));
        assert!(is_path_like("/tmp/cookies.sqlite"));
        assert!(!is_path_like("default-release"));
    }
}
