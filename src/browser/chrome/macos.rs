//! macOS Chromium cookie decryption.
//!
//! The AES key is derived from the browser's "Safe Storage" password in
//! the login keychain. Values without a `v10` prefix are stored in the
//! clear.

use aes::Aes128;
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, KeyIvInit};
use pbkdf2::pbkdf2_hmac;
use security_framework::passwords::get_generic_password;
use sha1::Sha1;

use super::store;
use super::{ChromiumBrowser, ChromiumSettings};
use crate::browser::Cookie;
use crate::config::BrowserCookieConfig;
use crate::error::{MelcookieError, Result};

const KEY_DERIVE_SALT: &[u8] = b"saltysalt";
const KEY_DERIVE_ITERATIONS: u32 = 1003;
const KEY_LENGTH: usize = 16;
const AES_IV: &[u8; 16] = b"                ";

pub fn cookies_for_domain(
    browser: ChromiumBrowser,
    config: &BrowserCookieConfig,
    domain: &str,
) -> Result<Vec<Cookie>> {
    let settings = chromium_settings(browser)?;
    let key = keychain_key(settings.keyring_account);

    store::read_domain_cookies(
        &settings,
        config.profile.as_deref(),
        domain,
        move |meta_version| {
            move |encrypted_value: &[u8]| decrypt_value(encrypted_value, key, meta_version)
        },
    )
}

fn chromium_settings(browser: ChromiumBrowser) -> Result<ChromiumSettings> {
    let home = dirs::home_dir()
        .ok_or_else(|| MelcookieError::Config("Cannot determine home directory".to_string()))?;
    let app_support = home.join("Library/Application Support");
    let (relative_dir, keyring_account, supports_profiles) = match browser {
        ChromiumBrowser::Chrome => ("Google/Chrome", "Chrome", true),
        ChromiumBrowser::Edge => ("Microsoft Edge", "Microsoft Edge", true),
        ChromiumBrowser::Brave => ("BraveSoftware/Brave-Browser", "Brave", true),
        ChromiumBrowser::Opera => ("com.operasoftware.Opera", "Opera", false),
        ChromiumBrowser::Vivaldi => ("Vivaldi", "Vivaldi", true),
        ChromiumBrowser::Whale => ("Naver/Whale", "Whale", true),
    };
    Ok(ChromiumSettings {
        user_data_dir: app_support.join(relative_dir),
        keyring_account,
        supports_profiles,
    })
}

fn keychain_key(keyring_account: &str) -> Option<[u8; KEY_LENGTH]> {
    let service = format!("{} Safe Storage", keyring_account);
    match get_generic_password(&service, keyring_account) {
        Ok(password) => Some(derive_key(&password)),
        Err(err) => {
            log::warn!(
                "Failed to read keychain password for {}: {}",
                keyring_account,
                err
            );
            None
        }
    }
}

fn decrypt_value(
    encrypted_value: &[u8],
    key: Option<[u8; KEY_LENGTH]>,
    meta_version: i64,
) -> Option<String> {
    if encrypted_value.len() < 3 {
        return None;
    }
    let (version, ciphertext) = encrypted_value.split_at(3);
    if version == b"v10" {
        let key = key?;
        let decrypted = decrypt_aes_cbc(ciphertext, &key).ok()?;
        let trimmed = if meta_version >= 24 && decrypted.len() > 32 {
            &decrypted[32..]
        } else {
            &decrypted[..]
        };
        String::from_utf8(trimmed.to_vec()).ok()
    } else {
        String::from_utf8(encrypted_value.to_vec()).ok()
    }
}

fn derive_key(password: &[u8]) -> [u8; KEY_LENGTH] {
    let mut key = [0u8; KEY_LENGTH];
    pbkdf2_hmac::<Sha1>(password, KEY_DERIVE_SALT, KEY_DERIVE_ITERATIONS, &mut key);
    key
}

fn decrypt_aes_cbc(ciphertext: &[u8], key: &[u8; KEY_LENGTH]) -> Result<Vec<u8>> {
    let mut buffer = ciphertext.to_vec();
    let decryptor = cbc::Decryptor::<Aes128>::new_from_slices(key, AES_IV).map_err(|e| {
        MelcookieError::BrowserCookie(format!("Failed to create AES decryptor: {}", e))
    })?;
    let plaintext = decryptor
        .decrypt_padded_mut::<Pkcs7>(&mut buffer)
        .map_err(|_| MelcookieError::BrowserCookie("Failed to decrypt cookie".to_string()))?;
    Ok(plaintext.to_vec())
}
