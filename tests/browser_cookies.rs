#![cfg(any(target_os = "linux", target_os = "macos"))]

use rusqlite::Connection;
use std::path::Path;
use tempfile::tempdir;

use melcookie::browser::BrowserCookieExtractor;
use melcookie::config::{Browser, BrowserCookieConfig};
use melcookie::error::MelcookieError;
use melcookie::session::WATCHED_DOMAIN;

fn create_chrome_cookie_db(path: &Path) {
    let conn = Connection::open(path).expect("open chrome db");
    conn.execute("CREATE TABLE meta (key TEXT, value TEXT)", [])
        .expect("create meta");
    conn.execute("INSERT INTO meta (key, value) VALUES ('version', '24')", [])
        .expect("insert meta");
    conn.execute(
        "CREATE TABLE cookies (
            host_key TEXT,
            name TEXT,
            value TEXT,
            encrypted_value BLOB,
            path TEXT,
            expires_utc INTEGER,
            is_secure INTEGER,
            is_httponly INTEGER
        )",
        [],
    )
    .expect("create cookies");

    let rows: [(&str, &str, &str); 4] = [
        (".melcloudhome.com", "__Secure-monitorandcontrol-1", "def"),
        ("app.melcloudhome.com", "__Host-blazor-xyz", "abc"),
        (".melcloudhome.com", "unrelated", "zzz"),
        ("other.com", "outsider", "qqq"),
    ];
    for (host, name, value) in rows {
        conn.execute(
            "INSERT INTO cookies (
                host_key, name, value, encrypted_value, path, expires_utc, is_secure, is_httponly
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            (host, name, value, Vec::<u8>::new(), "/", 0i64, 1i64, 1i64),
        )
        .expect("insert cookie");
    }
}

fn create_firefox_cookie_db(path: &Path) {
    let conn = Connection::open(path).expect("open firefox db");
    conn.execute("PRAGMA user_version = 16", [])
        .expect("set schema version");
    conn.execute(
        "CREATE TABLE moz_cookies (
            host TEXT,
            name TEXT,
            value TEXT,
            path TEXT,
            expiry INTEGER,
            isSecure INTEGER,
            isHttpOnly INTEGER
        )",
        [],
    )
    .expect("create moz_cookies");

    let rows: [(&str, &str, &str); 3] = [
        (".melcloudhome.com", "__Host-blazor-xyz", "abc"),
        (".melcloudhome.com", "__Secure-monitorandcontrol-1", "def"),
        ("unrelated.net", "outsider", "qqq"),
    ];
    for (host, name, value) in rows {
        conn.execute(
            "INSERT INTO moz_cookies (
                host, name, value, path, expiry, isSecure, isHttpOnly
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            (host, name, value, "/", 2_000_000_000_000i64, 1i64, 1i64),
        )
        .expect("insert cookie");
    }
}

#[tokio::test]
async fn chrome_store_returns_only_watched_domain_cookies() {
    let dir = tempdir().expect("tempdir");
    let db_path = dir.path().join("Cookies");
    create_chrome_cookie_db(&db_path);

    let config = BrowserCookieConfig {
        browser: Browser::Chrome,
        profile: Some(db_path.to_string_lossy().to_string()),
    };
    let extractor = BrowserCookieExtractor::new(config);
    let cookies = extractor
        .extract(WATCHED_DOMAIN)
        .await
        .expect("extract cookies");

    let names: Vec<&str> = cookies.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        ["__Secure-monitorandcontrol-1", "__Host-blazor-xyz", "unrelated"]
    );
    assert!(cookies.iter().all(|c| c.domain.contains("melcloudhome.com")));
}

#[tokio::test]
async fn firefox_store_returns_only_watched_domain_cookies() {
    let dir = tempdir().expect("tempdir");
    let db_path = dir.path().join("cookies.sqlite");
    create_firefox_cookie_db(&db_path);

    let config = BrowserCookieConfig {
        browser: Browser::Firefox,
        profile: Some(db_path.to_string_lossy().to_string()),
    };
    let extractor = BrowserCookieExtractor::new(config);
    let cookies = extractor
        .extract(WATCHED_DOMAIN)
        .await
        .expect("extract cookies");

    assert_eq!(cookies.len(), 2);
    assert!(cookies.iter().all(|c| c.domain == ".melcloudhome.com"));
}

#[tokio::test]
async fn store_without_watched_domain_cookies_yields_empty_list() {
    let dir = tempdir().expect("tempdir");
    let db_path = dir.path().join("cookies.sqlite");

    let conn = Connection::open(&db_path).expect("open db");
    conn.execute("PRAGMA user_version = 16", [])
        .expect("set schema version");
    conn.execute(
        "CREATE TABLE moz_cookies (
            host TEXT, name TEXT, value TEXT, path TEXT,
            expiry INTEGER, isSecure INTEGER, isHttpOnly INTEGER
        )",
        [],
    )
    .expect("create moz_cookies");
    conn.execute(
        "INSERT INTO moz_cookies (host, name, value, path, expiry, isSecure, isHttpOnly)
         VALUES ('unrelated.net', 'outsider', 'qqq', '/', 0, 0, 0)",
        [],
    )
    .expect("insert cookie");
    drop(conn);

    let config = BrowserCookieConfig {
        browser: Browser::Firefox,
        profile: Some(db_path.to_string_lossy().to_string()),
    };
    let extractor = BrowserCookieExtractor::new(config);
    let cookies = extractor
        .extract(WATCHED_DOMAIN)
        .await
        .expect("extract cookies");

    assert!(cookies.is_empty());
}

#[tokio::test]
async fn missing_chrome_profile_is_reported_as_not_found() {
    let config = BrowserCookieConfig {
        browser: Browser::Chrome,
        profile: Some("profile-that-does-not-exist".to_string()),
    };
    let extractor = BrowserCookieExtractor::new(config);
    let err = extractor
        .extract(WATCHED_DOMAIN)
        .await
        .expect_err("missing profile");
    assert!(matches!(
        err,
        MelcookieError::FileNotFound(_) | MelcookieError::Config(_)
    ));
}
