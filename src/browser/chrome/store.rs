//! Shared Chromium cookie database access.
//!
//! A running browser keeps the cookies SQLite file locked, so it is
//! copied to a temp dir before opening, then read with schema detection
//! for the column renames Chromium has shipped over the years. Value
//! decryption is platform-specific and supplied by the caller.

use rusqlite::{Connection, Row};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

use super::ChromiumSettings;
use crate::browser::{domain_matches, Cookie};
use crate::error::{MelcookieError, Result};
use crate::utils::FileUtils;

/// Read all cookies for `domain` (and its subdomains) from the browser
/// described by `settings`.
///
/// `make_decryptor` receives the database meta version and returns the
/// platform decryption routine for `encrypted_value` blobs. An empty
/// result is not an error.
pub(super) fn read_domain_cookies<D, F>(
    settings: &ChromiumSettings,
    profile: Option<&str>,
    domain: &str,
    make_decryptor: F,
) -> Result<Vec<Cookie>>
where
    F: FnOnce(i64) -> D,
    D: Fn(&[u8]) -> Option<String>,
{
    let cookie_db = find_cookie_database(settings, profile)?;

    let temp_dir = tempdir()
        .map_err(|e| MelcookieError::BrowserCookie(format!("Failed to create temp dir: {}", e)))?;
    let temp_db = temp_dir.path().join("chromium-cookies.sqlite");
    fs::copy(&cookie_db, &temp_db)
        .map_err(|e| MelcookieError::BrowserCookie(format!("Failed to copy cookies DB: {}", e)))?;

    let conn = Connection::open(&temp_db)
        .map_err(|e| MelcookieError::BrowserCookie(format!("Failed to open cookies DB: {}", e)))?;
    let meta_version = read_meta_version(&conn);
    let column_names = read_cookie_columns(&conn)?;
    let secure_column = if column_names.contains("is_secure") {
        "is_secure"
    } else {
        "secure"
    };
    let httponly_column = if column_names.contains("is_httponly") {
        "is_httponly"
    } else if column_names.contains("httponly") {
        "httponly"
    } else {
        "0"
    };

    let decrypt = make_decryptor(meta_version);

    let query = format!(
        "SELECT host_key, name, value, encrypted_value, path, expires_utc, {}, {} \
         FROM cookies WHERE host_key = ?1 OR host_key LIKE ?2",
        secure_column, httponly_column
    );
    let mut stmt = conn.prepare(&query).map_err(|e| {
        MelcookieError::BrowserCookie(format!("Failed to prepare cookie query: {}", e))
    })?;
    let mut rows = stmt
        .query([domain.to_string(), format!("%.{}", domain)])
        .map_err(|e| MelcookieError::BrowserCookie(format!("Failed to query cookies: {}", e)))?;

    let mut cookies = Vec::new();
    while let Some(row) = rows
        .next()
        .map_err(|e| MelcookieError::BrowserCookie(format!("Failed to read cookie row: {}", e)))?
    {
        if let Some(cookie) = row_to_cookie(row, &decrypt)? {
            if domain_matches(&cookie.domain, domain) {
                cookies.push(cookie);
            }
        }
    }

    Ok(cookies)
}

fn find_cookie_database(settings: &ChromiumSettings, profile: Option<&str>) -> Result<PathBuf> {
    let search_root = if let Some(profile) = profile {
        if is_path_like(profile) {
            let expanded = FileUtils::expand_path(profile)?;
            if expanded.is_file() {
                return Ok(expanded);
            }
            expanded
        } else if settings.supports_profiles {
            settings.user_data_dir.join(profile)
        } else {
            log::warn!("Profile selection is not supported for this browser");
            settings.user_data_dir.clone()
        }
    } else {
        settings.user_data_dir.clone()
    };

    if !search_root.exists() {
        return Err(MelcookieError::FileNotFound(format!(
            "Browser data dir not found: {:?}",
            search_root
        )));
    }

    let candidates = find_files(&search_root, "Cookies");
    newest_path(candidates).ok_or_else(|| {
        MelcookieError::FileNotFound("Chromium cookies database not found".to_string())
    })
}

fn is_path_like(value: &str) -> bool {
    value.contains('/') || value.contains('\\') || value.starts_with('~')
}

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

fn read_meta_version(conn: &Connection) -> i64 {
    let result: std::result::Result<String, _> =
        conn.query_row("SELECT value FROM meta WHERE key = 'version'", [], |row| {
            row.get(0)
        });
    result
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(0)
}

fn read_cookie_columns(conn: &Connection) -> Result<HashSet<String>> {
    let mut stmt = conn.prepare("PRAGMA table_info(cookies)").map_err(|e| {
        MelcookieError::BrowserCookie(format!("Failed to read cookie schema: {}", e))
    })?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .map_err(|e| MelcookieError::BrowserCookie(format!("Failed to read cookie schema: {}", e)))?;
    let mut columns = HashSet::new();
    for row in rows {
        let name = row.map_err(|e| {
            MelcookieError::BrowserCookie(format!("Failed to read cookie schema: {}", e))
        })?;
        columns.insert(name);
    }
    Ok(columns)
}

fn row_to_cookie<D>(row: &Row<'_>, decrypt: &D) -> Result<Option<Cookie>>
where
    D: Fn(&[u8]) -> Option<String>,
{
    let host_key: String = row.get(0).map_err(|e| {
        MelcookieError::BrowserCookie(format!("Failed to read cookie host: {}", e))
    })?;
    let name: String = row.get(1).map_err(|e| {
        MelcookieError::BrowserCookie(format!("Failed to read cookie name: {}", e))
    })?;
    let value: String = row.get(2).map_err(|e| {
        MelcookieError::BrowserCookie(format!("Failed to read cookie value: {}", e))
    })?;
    let encrypted_value = read_encrypted_value(row)?;
    let path: String = row.get(4).map_err(|e| {
        MelcookieError::BrowserCookie(format!("Failed to read cookie path: {}", e))
    })?;
    let expires_utc: i64 = row.get(5).map_err(|e| {
        MelcookieError::BrowserCookie(format!("Failed to read cookie expiry: {}", e))
    })?;
    let secure: i64 = row.get(6).map_err(|e| {
        MelcookieError::BrowserCookie(format!("Failed to read cookie secure flag: {}", e))
    })?;
    let http_only: i64 = row.get(7).map_err(|e| {
        MelcookieError::BrowserCookie(format!("Failed to read cookie httponly flag: {}", e))
    })?;

    let cookie_value = if !value.is_empty() {
        value
    } else if !encrypted_value.is_empty() {
        match decrypt(&encrypted_value) {
            Some(value) => value,
            None => return Ok(None),
        }
    } else {
        return Ok(None);
    };

    Ok(Some(Cookie {
        name,
        value: cookie_value,
        domain: host_key,
        path,
        secure: secure != 0,
        http_only: http_only != 0,
        expires: chromium_expires_to_unix_seconds(expires_utc),
    }))
}

fn read_encrypted_value(row: &Row<'_>) -> Result<Vec<u8>> {
    let value = row.get_ref(3).map_err(|e| {
        MelcookieError::BrowserCookie(format!("Failed to read cookie ciphertext: {}", e))
    })?;
    match value {
        rusqlite::types::ValueRef::Blob(bytes) => Ok(bytes.to_vec()),
        rusqlite::types::ValueRef::Text(text) => Ok(text.to_vec()),
        rusqlite::types::ValueRef::Null => Ok(Vec::new()),
        _ => Err(MelcookieError::BrowserCookie(
            "Unsupported cookie ciphertext type".to_string(),
        )),
    }
}

// Chromium stores expiry as microseconds since 1601-01-01.
fn chromium_expires_to_unix_seconds(expires_utc: i64) -> Option<i64> {
    if expires_utc == 0 {
        return None;
    }
    let unix_seconds = (expires_utc / 1_000_000) - 11_644_473_600;
    if unix_seconds <= 0 {
        None
    } else {
        Some(unix_seconds)
    }
}
