//! Watched-domain session cookie selection and formatting.

use crate::browser::Cookie;

/// Domain whose cookies this tool reads.
pub const WATCHED_DOMAIN: &str = "melcloudhome.com";

/// Name fragments identifying the MELCloud session cookies.
///
/// Matching is an unanchored, case-sensitive substring test on the cookie
/// name: the upstream names carry `__Secure-`/`__Host-` prefixes and
/// rotating numeric suffixes around these fragments. A cookie whose name
/// merely embeds one of the fragments also matches.
pub const SESSION_NAME_MARKERS: [&str; 2] = ["Secure-monitorandcontrol", "Host-blazor"];

/// True when `name` contains one of the session markers.
pub fn is_session_cookie(name: &str) -> bool {
    SESSION_NAME_MARKERS
        .iter()
        .any(|marker| name.contains(marker))
}

/// Keep only the session cookies, preserving store order.
pub fn filter_session_cookies(cookies: &[Cookie]) -> Vec<&Cookie> {
    cookies
        .iter()
        .filter(|cookie| is_session_cookie(&cookie.name))
        .collect()
}

/// Join cookies into an HTTP `Cookie` header value.
pub fn build_cookie_header<'a, I>(cookies: I) -> String
where
    I: IntoIterator<Item = &'a Cookie>,
{
    cookies
        .into_iter()
        .map(|c| format!("{}={}", c.name, c.value))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::{build_cookie_header, filter_session_cookies, is_session_cookie};
    use crate::browser::Cookie;

    #[test]
    fn session_markers_match_as_substrings() {
        assert!(is_session_cookie("__Secure-monitorandcontrol-1"));
        assert!(is_session_cookie("__Host-blazor-abc"));
        assert!(is_session_cookie("xSecure-monitorandcontrolx"));
        assert!(!is_session_cookie("secure-monitorandcontrol"));
        assert!(!is_session_cookie("unrelated"));
    }

    #[test]
    fn filter_preserves_store_order() {
        let cookies = vec![
            Cookie::new("__Host-blazor-xyz", "abc", "melcloudhome.com"),
            Cookie::new("unrelated", "zzz", "melcloudhome.com"),
            Cookie::new("__Secure-monitorandcontrol-1", "def", "melcloudhome.com"),
        ];
        let relevant = filter_session_cookies(&cookies);
        let names: Vec<&str> = relevant.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["__Host-blazor-xyz", "__Secure-monitorandcontrol-1"]);
    }

    #[test]
    fn header_joins_without_trailing_separator() {
        let cookies = vec![
            Cookie::new("a", "1", "melcloudhome.com"),
            Cookie::new("b", "2", "melcloudhome.com"),
        ];
        assert_eq!(build_cookie_header(cookies.iter()), "a=1; b=2");
    }

    #[test]
    fn header_for_single_cookie_has_no_separator() {
        let cookies = vec![Cookie::new("a", "1", "melcloudhome.com")];
        assert_eq!(build_cookie_header(cookies.iter()), "a=1");
    }
}
