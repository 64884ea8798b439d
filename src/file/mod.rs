//! Persistence layer for leafdb
//!
//! A [`File`] owns the document root, the backing file handle and the
//! save policy. Nodes reach the document through a shared `File`; nothing
//! else holds document data.
//!
//! # Lifecycle
//!
//! ```text
//! Uninitialized --open--> Loaded --switch_to_file--> Rebound
//!                           |  ^                        |
//!                           |  +------- reload ---------+
//!                           +--save--> Persisted
//! ```
//!
//! Bytes on disk are the codec output for the current format, wrapped in
//! an encryption token when a password is set.

mod options;

use std::fs::{self, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::codec::{self, infer_format, Format};
use crate::encryption;
use crate::errors::{Error, Result};
use crate::observability::{log_event, Event};
use crate::value::Value;

pub use options::{FileConfig, FileOptions, DEFAULT_SALT};

/// Document root plus its backing storage
#[derive(Debug)]
pub struct File {
    data: Value,
    name: Option<PathBuf>,
    format: Format,
    autosave: bool,
    save_on_close: bool,
    password: Option<String>,
    salt: Vec<u8>,
    handle: Option<fs::File>,
}

impl File {
    fn with_options(data: Value, format: Format, options: FileOptions) -> Self {
        let salt = options.effective_salt();
        Self {
            data,
            name: None,
            format,
            autosave: options.autosave,
            save_on_close: options.save_on_close,
            password: options.password,
            salt,
            handle: None,
        }
    }

    /// Opens a backing file, creating it with an empty document if missing,
    /// and loads its contents.
    pub fn open(path: impl AsRef<Path>, options: FileOptions) -> Result<Self> {
        let requested = options.format;
        let mut file = Self::with_options(Value::empty(), Format::default(), options);
        // a document that failed to load must not be written back on drop
        let loaded = file
            .switch_to_file(path, requested)
            .and_then(|_| file.read());
        match loaded {
            Ok(data) => file.data = data,
            Err(e) => {
                file.save_on_close = false;
                return Err(e);
            }
        }
        log_event(
            Event::FileOpened,
            &[
                ("path", &file.display_path()),
                ("format", file.format.name()),
            ],
        );
        Ok(file)
    }

    /// Wraps an in-memory document with no backing file.
    ///
    /// The format defaults to [`Format::Text`] until the file is bound.
    pub fn in_memory(data: Value, options: FileOptions) -> Self {
        let format = options.format.unwrap_or(Format::Text);
        Self::with_options(data, format, options)
    }

    /// Reads and decodes the backing file without touching the document
    pub fn read(&mut self) -> Result<Value> {
        let format = self.format;
        let handle = self.handle.as_mut().ok_or(Error::FileNameUnset)?;

        let mut bytes = read_from_start(handle)
            .map_err(|e| Error::io(format!("failed to read {}", display(&self.name)), e))?;

        if let Some(ref password) = self.password {
            encryption::check()?;
            bytes = encryption::decrypt(&bytes, password, &self.salt)?;
        }
        Ok(codec::decode(&bytes, format)?)
    }

    /// Replaces the document with the backing file's contents, discarding
    /// unsaved edits.
    pub fn reload(&mut self) -> Result<()> {
        self.data = self.read()?;
        log_event(Event::FileReloaded, &[("path", &self.display_path())]);
        Ok(())
    }

    /// Rebinds to another backing file.
    ///
    /// A missing target is created with an empty encoded document. The
    /// binding only changes once the new file is open, so a failure leaves
    /// the current file in place. The in-memory document is kept as is;
    /// only later saves and reloads use the new file.
    pub fn switch_to_file(&mut self, path: impl AsRef<Path>, format: Option<Format>) -> Result<()> {
        let path = path.as_ref();
        let format = format.unwrap_or_else(|| infer_format(path));

        if !path.exists() {
            let bytes = self.seal(codec::empty_document(format)?)?;
            fs::write(path, &bytes).map_err(|e| Error::io_at("create", path, e))?;
            log_event(
                Event::FileCreated,
                &[("path", &path.display().to_string()), ("format", format.name())],
            );
        }

        let handle = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| Error::io_at("open", path, e))?;

        self.close_handle();
        self.handle = Some(handle);
        self.format = format;
        self.name = Some(path.to_path_buf());

        log_event(
            Event::FileSwitched,
            &[("path", &path.display().to_string()), ("format", format.name())],
        );
        Ok(())
    }

    /// Writes the document to the backing file.
    ///
    /// The file is truncated to the written length. A failure part way
    /// through may leave it truncated.
    pub fn save(&mut self) -> Result<()> {
        if self.handle.is_none() {
            return Err(Error::FileNameUnset);
        }
        let bytes = self.seal(codec::encode(&self.data, self.format)?)?;
        let path = self.display_path();

        let handle = self.handle.as_mut().ok_or(Error::FileNameUnset)?;
        overwrite(handle, &bytes).map_err(|e| Error::io(format!("failed to write {}", path), e))?;

        log_event(
            Event::FileSaved,
            &[
                ("path", &path),
                ("format", self.format.name()),
                ("bytes", &bytes.len().to_string()),
                ("encrypted", if self.password.is_some() { "true" } else { "false" }),
            ],
        );
        Ok(())
    }

    /// Saves to `path`, then rebinds to the original file and format.
    ///
    /// Without an original backing file there is nothing to return to, so
    /// the file stays bound to `path` and later saves go there.
    pub fn save_as(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let original = self.name.clone().map(|name| (name, self.format));
        self.switch_to_file(path, None)?;
        let saved = self.save();
        if let Some((name, format)) = original {
            self.switch_to_file(name, Some(format))?;
        }
        saved
    }

    /// Sets the password, then saves (to `path` if given)
    pub fn save_with_password(
        &mut self,
        path: Option<&Path>,
        password: impl Into<String>,
    ) -> Result<()> {
        self.password = Some(password.into());
        match path {
            Some(path) => self.save_as(path),
            None => self.save(),
        }
    }

    /// Walks `keys` from the document root
    pub fn get_nested<S: AsRef<str>>(&self, keys: &[S]) -> Result<&Value> {
        let mut current = &self.data;
        for (depth, key) in keys.iter().enumerate() {
            if !current.is_container() {
                return Err(Error::not_a_node(&keys[..depth]));
            }
            current = current
                .child(key.as_ref())
                .ok_or_else(|| Error::name_not_found(&keys[..=depth]))?;
        }
        Ok(current)
    }

    /// Mutable counterpart of [`File::get_nested`]
    pub fn get_nested_mut<S: AsRef<str>>(&mut self, keys: &[S]) -> Result<&mut Value> {
        let mut current = &mut self.data;
        for (depth, key) in keys.iter().enumerate() {
            if !current.is_container() {
                return Err(Error::not_a_node(&keys[..depth]));
            }
            current = current
                .child_mut(key.as_ref())
                .ok_or_else(|| Error::name_not_found(&keys[..=depth]))?;
        }
        Ok(current)
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut Value {
        &mut self.data
    }

    /// Replaces the whole document
    pub fn set_data(&mut self, data: Value) {
        self.data = data;
    }

    /// Backing file name, if bound
    pub fn name(&self) -> Option<&Path> {
        self.name.as_deref()
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn autosave(&self) -> bool {
        self.autosave
    }

    pub fn set_autosave(&mut self, autosave: bool) {
        self.autosave = autosave;
    }

    pub fn save_on_close(&self) -> bool {
        self.save_on_close
    }

    pub fn set_save_on_close(&mut self, save_on_close: bool) {
        self.save_on_close = save_on_close;
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// Takes effect on the next save; `None` stores plaintext
    pub fn set_password(&mut self, password: Option<String>) {
        self.password = password;
    }

    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    pub fn set_salt(&mut self, salt: impl Into<Vec<u8>>) {
        self.salt = salt.into();
    }

    /// Returns true while a backing handle is held
    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    /// Saves when the autosave policy asks for it
    pub(crate) fn autosave_if_enabled(&mut self) -> Result<()> {
        if self.autosave {
            self.save()
        } else {
            Ok(())
        }
    }

    fn seal(&self, bytes: Vec<u8>) -> Result<Vec<u8>> {
        match self.password {
            Some(ref password) => {
                encryption::check()?;
                Ok(encryption::encrypt(&bytes, password, &self.salt)?)
            }
            None => Ok(bytes),
        }
    }

    fn close_handle(&mut self) {
        if self.handle.take().is_some() {
            log_event(Event::FileClosed, &[("path", &self.display_path())]);
        }
    }

    fn display_path(&self) -> String {
        display(&self.name)
    }
}

fn read_from_start(handle: &mut fs::File) -> io::Result<Vec<u8>> {
    let mut bytes = Vec::new();
    handle.seek(SeekFrom::Start(0))?;
    handle.read_to_end(&mut bytes)?;
    Ok(bytes)
}

fn overwrite(handle: &mut fs::File, bytes: &[u8]) -> io::Result<()> {
    handle.seek(SeekFrom::Start(0))?;
    handle.write_all(bytes)?;
    handle.set_len(bytes.len() as u64)?;
    handle.flush()
}

fn display(name: &Option<PathBuf>) -> String {
    name.as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "None".to_string())
}

impl Drop for File {
    fn drop(&mut self) {
        if self.save_on_close && !self.autosave {
            if let Err(e) = self.save() {
                log_event(
                    Event::SaveOnCloseFailed,
                    &[("path", &self.display_path()), ("error", &e.to_string())],
                );
            }
        }
        self.close_handle();
    }
}
