//! Password-based key derivation
//!
//! Argon2d with deliberately light parameters (one pass, 8 KiB, one lane)
//! producing a 32-byte key. The key is returned URL-safe base64 encoded,
//! the representation the token format expects.

use argon2::{Algorithm, Argon2, Params, Version};
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;

use super::errors::{EncryptionError, EncryptionResult};

/// Argon2 time cost (passes)
pub const TIME_COST: u32 = 1;
/// Argon2 memory cost in KiB
pub const MEMORY_COST_KIB: u32 = 8;
/// Argon2 lanes
pub const PARALLELISM: u32 = 1;
/// Derived key length in bytes
pub const KEY_LEN: usize = 32;
/// Shortest salt Argon2 accepts
pub const MIN_SALT_LEN: usize = 8;

/// Derives the raw 32-byte key for `(password, salt)`
pub(super) fn derive_raw_key(password: &str, salt: &[u8]) -> EncryptionResult<[u8; KEY_LEN]> {
    if salt.len() < MIN_SALT_LEN {
        return Err(EncryptionError::InvalidSalt(format!(
            "salt must be at least {} bytes, got {}",
            MIN_SALT_LEN,
            salt.len()
        )));
    }

    let params = Params::new(MEMORY_COST_KIB, TIME_COST, PARALLELISM, Some(KEY_LEN))
        .map_err(|e| EncryptionError::Encrypt(e.to_string()))?;
    let argon2 = Argon2::new(Algorithm::Argon2d, Version::V0x13, params);

    let mut key = [0u8; KEY_LEN];
    argon2
        .hash_password_into(password.as_bytes(), salt, &mut key)
        .map_err(|e| EncryptionError::Encrypt(e.to_string()))?;
    Ok(key)
}

/// Derives a URL-safe base64 key from a password and salt.
///
/// Deterministic: the same inputs always give the same key.
pub fn derive_key(password: &str, salt: &[u8]) -> EncryptionResult<String> {
    derive_raw_key(password, salt).map(|key| URL_SAFE.encode(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_key_is_deterministic() {
        let a = derive_key("hunter2", b"leafdb_default").unwrap();
        let b = derive_key("hunter2", b"leafdb_default").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_derive_key_depends_on_password_and_salt() {
        let base = derive_key("hunter2", b"salt-one").unwrap();
        assert_ne!(base, derive_key("hunter3", b"salt-one").unwrap());
        assert_ne!(base, derive_key("hunter2", b"salt-two").unwrap());
    }

    #[test]
    fn test_key_is_url_safe_base64_of_32_bytes() {
        let key = derive_key("pw", b"12345678").unwrap();
        assert_eq!(key.len(), 44);
        assert!(!key.contains('+') && !key.contains('/'));
        assert_eq!(URL_SAFE.decode(&key).unwrap().len(), KEY_LEN);
    }

    #[test]
    fn test_short_salt_is_rejected() {
        let err = derive_key("pw", b"short").unwrap_err();
        assert!(matches!(err, EncryptionError::InvalidSalt(_)));
    }
}
