//! Error types for sound reload operations.
//!
//! All fallible functions in this crate return [`Result<T>`], which uses [`Error`]
//! as the error type. `std::io::Error` converts automatically; decode failures carry
//! the offending path so skipped-file reports can name it.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while scanning, installing or reporting custom sounds.
#[derive(Error, Debug)]
pub enum Error {
    /// Filesystem I/O failed (missing, unreadable or permission denied).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file exists but is not a valid audio container.
    #[error("Failed to decode '{path}': {source}")]
    Decode {
        path: Utf8PathBuf,
        #[source]
        source: hound::Error,
    },

    /// The host rejected a decoded asset.
    #[error("Failed to install sound '{name}': {reason}")]
    Install { name: String, reason: String },

    /// An asset was queried that was never recorded.
    ///
    /// This indicates a broken registry invariant rather than a runtime condition.
    #[error("Sound '{0}' is not known to the registry")]
    Lookup(String),

    /// A reload or revert is already running.
    #[error("A reload or revert is already in progress")]
    Busy,

    /// The configuration file could not be parsed.
    #[error("Invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// The configuration could not be serialized.
    #[error("Failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// Catch-all for errors from installers and other sources.
    ///
    /// During a reload an installer returning this is treated like any other
    /// per-file failure: the file is skipped and the reload continues.
    #[error("{0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}
