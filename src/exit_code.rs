use crate::error::MelcookieError;

pub fn exit_code_for_error(err: &MelcookieError) -> i32 {
    match err {
        MelcookieError::Config(_) => 2,
        MelcookieError::Unsupported(_) => 4,
        MelcookieError::Busy => 8,
        MelcookieError::Io(_) => 23,
        MelcookieError::Json(_) => 26,
        MelcookieError::PermissionDenied(_) | MelcookieError::FileNotFound(_) => 37,
        MelcookieError::BrowserCookie(_) => 43,
        MelcookieError::Cache(_) => 44,
        MelcookieError::CacheEmpty => 45,
        MelcookieError::Clipboard(_) => 46,
        MelcookieError::NotLoggedIn(_) => 81,
        MelcookieError::SessionCookiesMissing(_) => 82,
    }
}

#[cfg(test)]
mod tests {
    use super::exit_code_for_error;
    use crate::error::MelcookieError;

    #[test]
    fn exit_code_maps_not_logged_in() {
        let err = MelcookieError::NotLoggedIn("melcloudhome.com".to_string());
        assert_eq!(exit_code_for_error(&err), 81);
    }

    #[test]
    fn exit_code_maps_session_cookies_missing() {
        let err = MelcookieError::SessionCookiesMissing("melcloudhome.com".to_string());
        assert_eq!(exit_code_for_error(&err), 82);
    }

    #[test]
    fn exit_code_maps_cache_empty() {
        assert_eq!(exit_code_for_error(&MelcookieError::CacheEmpty), 45);
    }
}
