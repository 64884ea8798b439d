//! Encryption adapter for leafdb
//!
//! Password-based encryption applied to an already-encoded document. It is
//! a post-processing stage, not a codec: the same document can move between
//! encrypted and plaintext storage by toggling the password alone.
//!
//! # Primitives
//!
//! - Key derivation: Argon2d (1 pass, 8 KiB, 1 lane, 32-byte key)
//! - Cipher: Fernet tokens (AES-128-CBC + HMAC-SHA256)
//!
//! Everything here sits behind the `encryption` cargo feature. Without it
//! every entry point fails fast with [`EncryptionError::NotAvailable`]
//! instead of silently writing plaintext.

mod errors;
#[cfg(feature = "encryption")]
mod fernet;
#[cfg(feature = "encryption")]
mod kdf;

pub use errors::{EncryptionError, EncryptionResult};
#[cfg(feature = "encryption")]
pub use kdf::{KEY_LEN, MEMORY_COST_KIB, MIN_SALT_LEN, PARALLELISM, TIME_COST};

#[cfg(feature = "encryption")]
use crate::observability::{log_event, Event};

/// Returns true if the crate was built with encryption support
pub fn is_available() -> bool {
    cfg!(feature = "encryption")
}

/// Fails with [`EncryptionError::NotAvailable`] when support is missing
pub fn check() -> EncryptionResult<()> {
    if is_available() {
        Ok(())
    } else {
        Err(EncryptionError::NotAvailable)
    }
}

/// Derives a URL-safe base64 key from a password and salt
#[cfg(feature = "encryption")]
pub fn derive_key(password: &str, salt: &[u8]) -> EncryptionResult<String> {
    kdf::derive_key(password, salt)
}

/// Encrypts an encoded document
#[cfg(feature = "encryption")]
pub fn encrypt(data: &[u8], password: &str, salt: &[u8]) -> EncryptionResult<Vec<u8>> {
    let key = kdf::derive_raw_key(password, salt)?;
    let token = fernet::seal(&key, data)?;
    log_event(
        Event::Encrypted,
        &[
            ("plaintext_bytes", &data.len().to_string()),
            ("token_bytes", &token.len().to_string()),
        ],
    );
    Ok(token)
}

/// Decrypts bytes produced by [`encrypt`]
#[cfg(feature = "encryption")]
pub fn decrypt(data: &[u8], password: &str, salt: &[u8]) -> EncryptionResult<Vec<u8>> {
    let key = kdf::derive_raw_key(password, salt)?;
    match fernet::open(&key, data) {
        Ok(plaintext) => {
            log_event(
                Event::Decrypted,
                &[("plaintext_bytes", &plaintext.len().to_string())],
            );
            Ok(plaintext)
        }
        Err(e) => {
            log_event(Event::DecryptFailed, &[("token_bytes", &data.len().to_string())]);
            Err(e)
        }
    }
}

#[cfg(not(feature = "encryption"))]
pub fn derive_key(_password: &str, _salt: &[u8]) -> EncryptionResult<String> {
    Err(EncryptionError::NotAvailable)
}

#[cfg(not(feature = "encryption"))]
pub fn encrypt(_data: &[u8], _password: &str, _salt: &[u8]) -> EncryptionResult<Vec<u8>> {
    Err(EncryptionError::NotAvailable)
}

#[cfg(not(feature = "encryption"))]
pub fn decrypt(_data: &[u8], _password: &str, _salt: &[u8]) -> EncryptionResult<Vec<u8>> {
    Err(EncryptionError::NotAvailable)
}

#[cfg(all(test, feature = "encryption"))]
mod tests {
    use super::*;

    const SALT: &[u8] = b"leafdb_default";

    #[test]
    fn test_check_passes_with_feature() {
        assert!(is_available());
        assert!(check().is_ok());
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let token = encrypt(b"{'a': 1}", "pw", SALT).unwrap();
        assert_ne!(token, b"{'a': 1}");
        assert_eq!(decrypt(&token, "pw", SALT).unwrap(), b"{'a': 1}");
    }

    #[test]
    fn test_wrong_password_is_decrypt_error() {
        let token = encrypt(b"payload", "right", SALT).unwrap();
        assert_eq!(decrypt(&token, "wrong", SALT), Err(EncryptionError::Decrypt));
    }

    #[test]
    fn test_wrong_salt_is_decrypt_error() {
        let token = encrypt(b"payload", "pw", SALT).unwrap();
        assert_eq!(
            decrypt(&token, "pw", b"another salt"),
            Err(EncryptionError::Decrypt)
        );
    }
}
