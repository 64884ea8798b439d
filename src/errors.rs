//! Crate-wide error type
//!
//! Error codes:
//! - LEAF_NAME_NOT_FOUND
//! - LEAF_NOT_A_NODE
//! - LEAF_FILE_NAME_UNSET
//! - LEAF_ROOT_HAS_NO_PARENT
//! - LEAF_DECODE_FAILED / LEAF_ENCODE_FAILED
//! - LEAF_ENCRYPTION_NOT_AVAILABLE / LEAF_DECRYPT_FAILED / LEAF_INVALID_SALT / LEAF_ENCRYPT_FAILED
//! - LEAF_TYPE_MISMATCH / LEAF_DIVISION_BY_ZERO / LEAF_OVERFLOW / LEAF_LITERAL_SYNTAX
//! - LEAF_IO_ERROR
//! - LEAF_CONFIG_INVALID
//!
//! Every error is returned synchronously from the call that caused it;
//! nothing is retried internally.

use std::fmt;
use std::io;
use std::path::Path;

use thiserror::Error;

use crate::codec::CodecError;
use crate::encryption::EncryptionError;
use crate::value::ValueError;

/// Result type for leafdb operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by nodes and files
#[derive(Debug, Error)]
pub enum Error {
    // ==================
    // Navigation Errors
    // ==================
    /// Navigated to a child key that does not exist
    #[error("{path} does not exist")]
    NameNotFound { path: String },

    /// Navigated into or through a value that has no children
    #[error("{path} is not a node")]
    NotANode { path: String },

    /// In-place arithmetic on the root node
    #[error("the root node has no parent to update")]
    RootHasNoParent,

    // ==================
    // Persistence Errors
    // ==================
    /// Save without a backing file or alternate name
    #[error(
        "no filename set for this data; pass a filename to save_as or use switch_to_file"
    )]
    FileNameUnset,

    /// Filesystem failure
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// Malformed configuration
    #[error("invalid configuration: {0}")]
    Config(String),

    // ==================
    // Wrapped Errors
    // ==================
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Encryption(#[from] EncryptionError),

    #[error(transparent)]
    Value(#[from] ValueError),
}

/// Stable error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    NameNotFound,
    NotANode,
    RootHasNoParent,
    FileNameUnset,
    DecodeFailed,
    EncodeFailed,
    EncryptionNotAvailable,
    DecryptFailed,
    InvalidSalt,
    EncryptFailed,
    TypeMismatch,
    DivisionByZero,
    Overflow,
    LiteralSyntax,
    IoError,
    ConfigInvalid,
}

impl ErrorCode {
    /// Returns the string code
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NameNotFound => "LEAF_NAME_NOT_FOUND",
            ErrorCode::NotANode => "LEAF_NOT_A_NODE",
            ErrorCode::RootHasNoParent => "LEAF_ROOT_HAS_NO_PARENT",
            ErrorCode::FileNameUnset => "LEAF_FILE_NAME_UNSET",
            ErrorCode::DecodeFailed => "LEAF_DECODE_FAILED",
            ErrorCode::EncodeFailed => "LEAF_ENCODE_FAILED",
            ErrorCode::EncryptionNotAvailable => "LEAF_ENCRYPTION_NOT_AVAILABLE",
            ErrorCode::DecryptFailed => "LEAF_DECRYPT_FAILED",
            ErrorCode::InvalidSalt => "LEAF_INVALID_SALT",
            ErrorCode::EncryptFailed => "LEAF_ENCRYPT_FAILED",
            ErrorCode::TypeMismatch => "LEAF_TYPE_MISMATCH",
            ErrorCode::DivisionByZero => "LEAF_DIVISION_BY_ZERO",
            ErrorCode::Overflow => "LEAF_OVERFLOW",
            ErrorCode::LiteralSyntax => "LEAF_LITERAL_SYNTAX",
            ErrorCode::IoError => "LEAF_IO_ERROR",
            ErrorCode::ConfigInvalid => "LEAF_CONFIG_INVALID",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Renders a key sequence as `<root>.a.b`
pub(crate) fn describe_path<S: AsRef<str>>(keys: &[S]) -> String {
    let mut out = String::from("<root>");
    for key in keys {
        out.push('.');
        out.push_str(key.as_ref());
    }
    out
}

impl Error {
    pub(crate) fn name_not_found<S: AsRef<str>>(keys: &[S]) -> Self {
        Error::NameNotFound {
            path: describe_path(keys),
        }
    }

    pub(crate) fn not_a_node<S: AsRef<str>>(keys: &[S]) -> Self {
        Error::NotANode {
            path: describe_path(keys),
        }
    }

    pub(crate) fn io(context: impl Into<String>, source: io::Error) -> Self {
        Error::Io {
            context: context.into(),
            source,
        }
    }

    pub(crate) fn io_at(action: &str, path: &Path, source: io::Error) -> Self {
        Error::Io {
            context: format!("failed to {} {}", action, path.display()),
            source,
        }
    }

    /// Returns the stable code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::NameNotFound { .. } => ErrorCode::NameNotFound,
            Error::NotANode { .. } => ErrorCode::NotANode,
            Error::RootHasNoParent => ErrorCode::RootHasNoParent,
            Error::FileNameUnset => ErrorCode::FileNameUnset,
            Error::Io { .. } => ErrorCode::IoError,
            Error::Config(_) => ErrorCode::ConfigInvalid,
            Error::Codec(CodecError::Decode { .. }) => ErrorCode::DecodeFailed,
            Error::Codec(CodecError::Io { .. }) => ErrorCode::EncodeFailed,
            Error::Codec(CodecError::Encode { .. }) => ErrorCode::EncodeFailed,
            Error::Codec(CodecError::UnknownFormat(_)) => ErrorCode::ConfigInvalid,
            Error::Encryption(EncryptionError::NotAvailable) => ErrorCode::EncryptionNotAvailable,
            Error::Encryption(EncryptionError::Decrypt) => ErrorCode::DecryptFailed,
            Error::Encryption(EncryptionError::InvalidSalt(_)) => ErrorCode::InvalidSalt,
            Error::Encryption(EncryptionError::Encrypt(_)) => ErrorCode::EncryptFailed,
            Error::Value(ValueError::TypeMismatch { .. }) => ErrorCode::TypeMismatch,
            Error::Value(ValueError::DivisionByZero) => ErrorCode::DivisionByZero,
            Error::Value(ValueError::Overflow { .. }) => ErrorCode::Overflow,
            Error::Value(ValueError::Syntax { .. }) => ErrorCode::LiteralSyntax,
            Error::Value(ValueError::NotAContainer { .. }) => ErrorCode::NotANode,
            Error::Value(ValueError::IndexOutOfRange { .. }) => ErrorCode::NameNotFound,
        }
    }

    /// Returns true for a missing child key
    pub fn is_name_not_found(&self) -> bool {
        self.code() == ErrorCode::NameNotFound
    }

    /// Returns true when a path runs through a leaf
    pub fn is_not_a_node(&self) -> bool {
        self.code() == ErrorCode::NotANode
    }

    /// Returns true for a wrong password or corrupted ciphertext
    pub fn is_decrypt_failure(&self) -> bool {
        self.code() == ErrorCode::DecryptFailed
    }

    /// Returns true when stored bytes did not match the declared format
    pub fn is_decode_failure(&self) -> bool {
        self.code() == ErrorCode::DecodeFailed
    }
}
