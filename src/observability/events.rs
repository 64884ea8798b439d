//! Observable events in leafdb
//!
//! Events are explicit and typed; each maps to a stable upper-case name
//! and a severity.

use std::fmt;

/// Log severity of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Routine lifecycle detail
    Debug,
    /// Notable but expected
    Info,
    /// Something failed and was reported or swallowed
    Warn,
}

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // File lifecycle
    /// Backing file opened for read/write
    FileOpened,
    /// Missing backing file created with an empty document
    FileCreated,
    /// Document reread from the backing file
    FileReloaded,
    /// Persistence layer rebound to another file
    FileSwitched,
    /// Document written to the backing file
    FileSaved,
    /// Backing handle released
    FileClosed,
    /// Final save on drop failed
    SaveOnCloseFailed,

    // Encryption
    /// Encoded document encrypted
    Encrypted,
    /// Token decrypted
    Decrypted,
    /// Token rejected (wrong password or corruption)
    DecryptFailed,
}

impl Event {
    /// Stable event name
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::FileOpened => "FILE_OPENED",
            Event::FileCreated => "FILE_CREATED",
            Event::FileReloaded => "FILE_RELOADED",
            Event::FileSwitched => "FILE_SWITCHED",
            Event::FileSaved => "FILE_SAVED",
            Event::FileClosed => "FILE_CLOSED",
            Event::SaveOnCloseFailed => "SAVE_ON_CLOSE_FAILED",
            Event::Encrypted => "ENCRYPTED",
            Event::Decrypted => "DECRYPTED",
            Event::DecryptFailed => "DECRYPT_FAILED",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Event::SaveOnCloseFailed | Event::DecryptFailed => Severity::Warn,
            Event::FileCreated | Event::FileSwitched => Severity::Info,
            _ => Severity::Debug,
        }
    }

    /// Returns true if this event reports a failure
    pub fn is_failure(&self) -> bool {
        self.severity() == Severity::Warn
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
