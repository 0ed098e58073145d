use crate::error::MelcookieError;
use fluent_templates::fluent_bundle::FluentValue;
use fluent_templates::{static_loader, Loader};
use std::collections::HashMap;
use unic_langid::LanguageIdentifier;

static_loader! {
    static LOCALES = {
        locales: "locales",
        fallback_language: "en-US",
        customise: |bundle| bundle.set_use_isolating(false),
    };
}

pub fn fetching_message() -> String {
    LOCALES.lookup(&resolve_language(), "status-fetching")
}

pub fn extracted_message(count: usize) -> String {
    let mut args = HashMap::new();
    args.insert("count", FluentValue::from(count));
    LOCALES.lookup_with_args(&resolve_language(), "status-extracted", &args)
}

pub fn copied_message() -> String {
    LOCALES.lookup(&resolve_language(), "status-copied")
}

pub fn last_cookie_message(hours: i64) -> String {
    let mut args = HashMap::new();
    args.insert("hours", FluentValue::from(hours));
    LOCALES.lookup_with_args(&resolve_language(), "status-last-cookie", &args)
}

pub fn localize_error(err: &MelcookieError) -> String {
    let langid = resolve_language();
    match err {
        MelcookieError::NotLoggedIn(domain) => {
            message_with_arg(&langid, "error-not-logged-in", "domain", domain)
        }
        MelcookieError::SessionCookiesMissing(domain) => {
            message_with_arg(&langid, "error-session-missing", "domain", domain)
        }
        MelcookieError::BrowserCookie(detail) => {
            message_with_detail(&langid, "error-browser-cookie", detail)
        }
        MelcookieError::Cache(detail) => message_with_detail(&langid, "error-cache", detail),
        MelcookieError::CacheEmpty => LOCALES.lookup(&langid, "error-cache-empty"),
        MelcookieError::Clipboard(detail) => {
            message_with_detail(&langid, "error-clipboard", detail)
        }
        MelcookieError::Busy => LOCALES.lookup(&langid, "error-busy"),
        MelcookieError::Io(detail) => message_with_detail(&langid, "error-io", &detail.to_string()),
        MelcookieError::Json(detail) => {
            message_with_detail(&langid, "error-json", &detail.to_string())
        }
        MelcookieError::Config(detail) => message_with_detail(&langid, "error-config", detail),
        MelcookieError::PermissionDenied(detail) => {
            message_with_detail(&langid, "error-permission-denied", detail)
        }
        MelcookieError::FileNotFound(detail) => {
            message_with_detail(&langid, "error-file-not-found", detail)
        }
        MelcookieError::Unsupported(detail) => {
            message_with_detail(&langid, "error-unsupported", detail)
        }
    }
}

fn message_with_detail(langid: &LanguageIdentifier, key: &str, detail: &str) -> String {
    message_with_arg(langid, key, "detail", detail)
}

fn message_with_arg(langid: &LanguageIdentifier, key: &str, name: &str, value: &str) -> String {
    let mut args = HashMap::new();
    args.insert(name, FluentValue::from(value));
    LOCALES.lookup_with_args(langid, key, &args)
}

fn resolve_language() -> LanguageIdentifier {
    for key in ["LC_ALL", "LC_MESSAGES", "LANG"] {
        if let Ok(value) = std::env::var(key) {
            if let Some(lang) = normalize_lang(value) {
                if let Ok(langid) = lang.parse::<LanguageIdentifier>() {
                    return langid;
                }
            }
        }
    }
    "en-US".parse().expect("valid fallback language")
}

fn normalize_lang(value: String) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    let value = value.split('.').next().unwrap_or(value);
    let value = value.replace('_', "-");
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::{extracted_message, last_cookie_message, localize_error, normalize_lang};
    use crate::error::MelcookieError;

    #[test]
    fn normalize_lang_trims_and_normalizes() {
        assert_eq!(
            normalize_lang("sv_SE.UTF-8".to_string()),
            Some("sv-SE".to_string())
        );
        assert_eq!(normalize_lang("".to_string()), None);
    }

    #[test]
    fn localize_error_includes_domain() {
        let err = MelcookieError::NotLoggedIn("melcloudhome.com".to_string());
        let message = localize_error(&err);
        assert!(message.contains("melcloudhome.com"));
    }

    #[test]
    fn extracted_message_includes_count() {
        assert!(extracted_message(2).contains('2'));
    }

    #[test]
    fn last_cookie_message_includes_hours() {
        assert!(last_cookie_message(23).contains("23"));
    }
}
