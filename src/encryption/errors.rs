//! # Encryption Errors
//!
//! Unavailability is reported separately from a failed decryption so that
//! callers can tell a missing feature from a wrong password.

use thiserror::Error;

/// Result type for encryption operations
pub type EncryptionResult<T> = Result<T, EncryptionError>;

/// Errors produced by the encryption adapter
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncryptionError {
    /// Crate was built without the `encryption` feature
    #[error(
        "encryption support is not compiled in; rebuild leafdb with the `encryption` feature"
    )]
    NotAvailable,

    /// Wrong password, corrupted data, or input that is not a token
    #[error("decryption failed: invalid password or corrupted data")]
    Decrypt,

    /// Salt rejected by the key-derivation function
    #[error("invalid salt: {0}")]
    InvalidSalt(String),

    /// Key derivation or cipher setup failed
    #[error("encryption failed: {0}")]
    Encrypt(String),
}
