//! Persistence options
//!
//! Options can be built in code or loaded from a JSON config file:
//!
//! ```json
//! {
//!   "path": "data.pyn.gz",
//!   "format": "gzip",
//!   "autosave": true,
//!   "password": "hunter2"
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::codec::Format;
use crate::errors::{Error, Result};

/// Salt used when a password is set without an explicit salt
pub const DEFAULT_SALT: &[u8] = b"leafdb_default";

/// Policy and format settings for a persistence layer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOptions {
    /// Explicit format; inferred from the file extension when absent
    pub format: Option<Format>,

    /// Save after every mutation (default: false)
    pub autosave: bool,

    /// Save once when the last node is dropped (default: false)
    pub save_on_close: bool,

    /// Encrypt the encoded document with this password
    pub password: Option<String>,

    /// Key derivation salt (default: [`DEFAULT_SALT`])
    pub salt: Option<Vec<u8>>,
}

impl FileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_autosave(mut self, autosave: bool) -> Self {
        self.autosave = autosave;
        self
    }

    pub fn with_save_on_close(mut self, save_on_close: bool) -> Self {
        self.save_on_close = save_on_close;
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn with_salt(mut self, salt: impl Into<Vec<u8>>) -> Self {
        self.salt = Some(salt.into());
        self
    }

    /// Salt in effect, falling back to [`DEFAULT_SALT`]
    pub fn effective_salt(&self) -> Vec<u8> {
        self.salt.clone().unwrap_or_else(|| DEFAULT_SALT.to_vec())
    }

    /// Loads options from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        read_json(path.as_ref())
    }
}

/// A backing path together with its options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileConfig {
    pub path: PathBuf,

    #[serde(flatten)]
    pub options: FileOptions,
}

impl FileConfig {
    pub fn new(path: impl Into<PathBuf>, options: FileOptions) -> Self {
        Self {
            path: path.into(),
            options,
        }
    }

    /// Loads a config from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        read_json(path.as_ref())
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let contents = fs::read_to_string(path).map_err(|e| Error::io_at("read config", path, e))?;
    serde_json::from_str(&contents)
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let options = FileOptions::default();
        assert_eq!(options.format, None);
        assert!(!options.autosave);
        assert!(!options.save_on_close);
        assert!(options.password.is_none());
        assert_eq!(options.effective_salt(), DEFAULT_SALT.to_vec());
    }

    #[test]
    fn test_builder_chain() {
        let options = FileOptions::new()
            .with_format(Format::Json)
            .with_autosave(true)
            .with_password("pw")
            .with_salt(b"pepper12".to_vec());
        assert_eq!(options.format, Some(Format::Json));
        assert!(options.autosave);
        assert_eq!(options.password.as_deref(), Some("pw"));
        assert_eq!(options.effective_salt(), b"pepper12".to_vec());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let options: FileOptions = serde_json::from_str(r#"{"autosave": true}"#).unwrap();
        assert!(options.autosave);
        assert_eq!(options.format, None);
    }

    #[test]
    fn test_config_flattens_options() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("leafdb.json");
        fs::write(
            &path,
            r#"{"path": "data.json", "format": "json", "save_on_close": true}"#,
        )
        .unwrap();

        let config = FileConfig::from_json_file(&path).unwrap();
        assert_eq!(config.path, PathBuf::from("data.json"));
        assert_eq!(config.options.format, Some(Format::Json));
        assert!(config.options.save_on_close);
    }

    #[test]
    fn test_malformed_config_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, r#"{"format": "yaml"}"#).unwrap();

        let err = FileOptions::from_json_file(&path).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_missing_config_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = FileOptions::from_json_file(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
