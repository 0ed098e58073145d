//! Linux Chromium cookie decryption.
//!
//! Chromium on Linux encrypts cookie values with AES-128-CBC. `v10`
//! values use the fixed password "peanuts"; `v11` values use a per-browser
//! password stored in the desktop keyring. Database meta version 24 and
//! later prefix the plaintext with a 32-byte domain hash that must be
//! stripped.

use aes::Aes128;
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, KeyIvInit};
use pbkdf2::pbkdf2_hmac;
use secret_service::blocking::SecretService;
use secret_service::EncryptionType;
use sha1::Sha1;

use super::store;
use super::{ChromiumBrowser, ChromiumSettings};
use crate::browser::Cookie;
use crate::config::BrowserCookieConfig;
use crate::error::{MelcookieError, Result};

const KEY_DERIVE_SALT: &[u8] = b"saltysalt";
const KEY_DERIVE_ITERATIONS: u32 = 1;
const KEY_LENGTH: usize = 16;
const AES_IV: &[u8; 16] = b"                ";
const V10_PASSWORD: &[u8] = b"peanuts";

pub fn cookies_for_domain(
    browser: ChromiumBrowser,
    config: &BrowserCookieConfig,
    domain: &str,
) -> Result<Vec<Cookie>> {
    let settings = chromium_settings(browser)?;
    let keyring_password = keyring_password(settings.keyring_account);

    store::read_domain_cookies(
        &settings,
        config.profile.as_deref(),
        domain,
        move |meta_version| {
            let v10_key = derive_key(V10_PASSWORD);
            let empty_key = derive_key(b"");
            let v11_key = keyring_password.map(|password| derive_key(&password));
            move |encrypted_value: &[u8]| {
                decrypt_value(encrypted_value, &v10_key, &empty_key, v11_key, meta_version)
            }
        },
    )
}

fn chromium_settings(browser: ChromiumBrowser) -> Result<ChromiumSettings> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| MelcookieError::Config("Cannot determine config directory".to_string()))?;
    let (relative_dir, keyring_account, supports_profiles) = match browser {
        ChromiumBrowser::Chrome => ("google-chrome", "Chrome", true),
        ChromiumBrowser::Edge => ("microsoft-edge", "Microsoft Edge", true),
        ChromiumBrowser::Brave => ("BraveSoftware/Brave-Browser", "Brave", true),
        ChromiumBrowser::Opera => ("opera", "Opera", false),
        ChromiumBrowser::Vivaldi => ("vivaldi", "Vivaldi", true),
        ChromiumBrowser::Whale => ("naver-whale", "Whale", true),
    };
    Ok(ChromiumSettings {
        user_data_dir: config_dir.join(relative_dir),
        keyring_account,
        supports_profiles,
    })
}

fn decrypt_value(
    encrypted_value: &[u8],
    v10_key: &[u8; KEY_LENGTH],
    empty_key: &[u8; KEY_LENGTH],
    v11_key: Option<[u8; KEY_LENGTH]>,
    meta_version: i64,
) -> Option<String> {
    if encrypted_value.len() < 3 {
        return None;
    }
    let (version, ciphertext) = encrypted_value.split_at(3);
    let hash_prefix = meta_version >= 24;
    if version == b"v10" {
        decrypt_aes_cbc_multi(ciphertext, [v10_key, empty_key], hash_prefix)
    } else if version == b"v11" {
        let v11_key = v11_key?;
        decrypt_aes_cbc_multi(ciphertext, [&v11_key, empty_key], hash_prefix)
    } else {
        log::warn!("Unknown Chrome cookie version: {:?}", version);
        None
    }
}

fn derive_key(password: &[u8]) -> [u8; KEY_LENGTH] {
    let mut key = [0u8; KEY_LENGTH];
    pbkdf2_hmac::<Sha1>(password, KEY_DERIVE_SALT, KEY_DERIVE_ITERATIONS, &mut key);
    key
}

fn decrypt_aes_cbc_multi(
    ciphertext: &[u8],
    keys: [&[u8; KEY_LENGTH]; 2],
    hash_prefix: bool,
) -> Option<String> {
    for key in keys {
        let decrypted = match decrypt_aes_cbc(ciphertext, key) {
            Ok(decrypted) => decrypted,
            Err(_) => continue,
        };
        let trimmed = if hash_prefix && decrypted.len() > 32 {
            &decrypted[32..]
        } else {
            &decrypted[..]
        };
        if let Ok(value) = String::from_utf8(trimmed.to_vec()) {
            return Some(value);
        }
    }
    log::warn!("Failed to decrypt Chrome cookie");
    None
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

/// Look up the browser's "Safe Storage" password in the session keyring.
///
/// Every failure degrades to `None`: the v10 fallback key still covers
/// older profiles, so a missing or locked keyring is not fatal.
fn keyring_password(keyring_account: &str) -> Option<Vec<u8>> {
    let service = match SecretService::connect(EncryptionType::Dh) {
        Ok(service) => service,
        Err(err) => {
            log::warn!("Failed to connect to secret service: {}", err);
            return None;
        }
    };

    let collection = match service
        .get_default_collection()
        .or_else(|_| service.get_any_collection())
    {
        Ok(collection) => collection,
        Err(err) => {
            log::warn!("Failed to read keyring collection: {}", err);
            return None;
        }
    };

    let items = match collection.get_all_items() {
        Ok(items) => items,
        Err(err) => {
            log::warn!("Failed to read keyring items: {}", err);
            return None;
        }
    };

    let label = format!("{} Safe Storage", keyring_account);
    for item in items {
        if item.get_label().unwrap_or_default() != label {
            continue;
        }
        if item.is_locked().unwrap_or(false) {
            if let Err(err) = item.unlock() {
                log::warn!("Failed to unlock keyring item: {}", err);
            }
        }
        match item.get_secret() {
            Ok(secret) if !secret.is_empty() => return Some(secret),
            Ok(_) => return None,
            Err(err) => {
                log::warn!("Failed to read keyring secret: {}", err);
                return None;
            }
        }
    }

    log::debug!("No keyring entry labelled {:?}", label);
    None
}

#[cfg(test)]
mod tests {
    use super::{decrypt_value, derive_key};
    use aes::Aes128;
    use cbc::cipher::{block_padding::Pkcs7, BlockEncryptMut, KeyIvInit};

    fn encrypt_v10(plaintext: &[u8]) -> Vec<u8> {
        let key = derive_key(super::V10_PASSWORD);
        let encryptor =
            cbc::Encryptor::<Aes128>::new_from_slices(&key, super::AES_IV).expect("encryptor");
        let mut buffer = plaintext.to_vec();
        buffer.resize((plaintext.len() / 16 + 1) * 16, 0);
        let ciphertext = encryptor
            .encrypt_padded_mut::<Pkcs7>(&mut buffer, plaintext.len())
            .expect("encrypt");
        let mut encrypted = b"v10".to_vec();
        encrypted.extend_from_slice(ciphertext);
        encrypted
    }

    #[test]
    fn decrypts_v10_value() {
        let encrypted = encrypt_v10(b"secret-value");
        let v10_key = derive_key(super::V10_PASSWORD);
        let empty_key = derive_key(b"");
        let value = decrypt_value(&encrypted, &v10_key, &empty_key, None, 23);
        assert_eq!(value.as_deref(), Some("secret-value"));
    }

    #[test]
    fn strips_domain_hash_prefix_on_meta_v24() {
        let mut plaintext = vec![0u8; 32];
        plaintext.extend_from_slice(b"secret-value");
        let encrypted = encrypt_v10(&plaintext);
        let v10_key = derive_key(super::V10_PASSWORD);
        let empty_key = derive_key(b"");
        let value = decrypt_value(&encrypted, &v10_key, &empty_key, None, 24);
        assert_eq!(value.as_deref(), Some("secret-value"));
    }

    #[test]
    fn rejects_truncated_values() {
        let v10_key = derive_key(super::V10_PASSWORD);
        let empty_key = derive_key(b"");
        assert_eq!(decrypt_value(b"v1", &v10_key, &empty_key, None, 24), None);
    }
}
