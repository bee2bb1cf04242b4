//! Host collaborator abstraction for live sound replacement.
//!
//! The reload engine never touches the host's audio objects directly. Instead it
//! talks to a [`ResourceInstaller`], which the host implements on top of whatever
//! asset storage it has. The crate ships [`MemoryInstaller`], an in-memory table
//! that keeps the original assets and their live replacements side by side.

use crate::decode::DecodedAudio;
use crate::error::{Error, Result};
use std::collections::HashMap;

/// Replaces and restores named sound assets inside the host.
///
/// # Implementing
///
/// Implementations must be [`Send`] so the engine can live behind a
/// [`SoundHost`](crate::SoundHost) shared across threads.
///
/// - [`install`](Self::install) may be called several times for the same name
///   within one reload (last call wins) and should return [`Error::Install`] when
///   the host rejects the audio.
/// - [`restore`](Self::restore) must be a no-op for names that were never replaced.
pub trait ResourceInstaller: Send {
    /// Replace the live asset `name` with `audio`.
    fn install(&mut self, name: &str, audio: DecodedAudio) -> Result<()>;

    /// Put the host's original asset `name` back.
    fn restore(&mut self, name: &str);
}

/// In-memory installer.
///
/// Originals are registered up front with [`with_original`](Self::with_original);
/// replacements shadow them until restored. [`get`](Self::get) returns what the host
/// would currently play.
#[derive(Debug, Default)]
pub struct MemoryInstaller {
    originals: HashMap<String, DecodedAudio>,
    replacements: HashMap<String, DecodedAudio>,
    reject_unknown: bool,
}

impl MemoryInstaller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a host-provided original asset.
    pub fn with_original(mut self, name: impl Into<String>, audio: DecodedAudio) -> Self {
        self.originals.insert(name.into(), audio);
        self
    }

    /// Reject installs for names that have no registered original.
    pub fn reject_unknown(mut self, reject: bool) -> Self {
        self.reject_unknown = reject;
        self
    }

    /// The audio currently live for `name`: the replacement if any, else the original.
    pub fn get(&self, name: &str) -> Option<&DecodedAudio> {
        self.replacements
            .get(name)
            .or_else(|| self.originals.get(name))
    }

    /// Whether `name` currently has a live replacement.
    pub fn is_replaced(&self, name: &str) -> bool {
        self.replacements.contains_key(name)
    }

    /// Number of live replacements.
    pub fn replaced_count(&self) -> usize {
        self.replacements.len()
    }
}

impl ResourceInstaller for MemoryInstaller {
    fn install(&mut self, name: &str, audio: DecodedAudio) -> Result<()> {
        if self.reject_unknown && !self.originals.contains_key(name) {
            return Err(Error::Install {
                name: name.to_string(),
                reason: "no original asset with this name".to_string(),
            });
        }
        if audio.channels.is_empty() {
            return Err(Error::Install {
                name: name.to_string(),
                reason: "audio has no channels".to_string(),
            });
        }
        self.replacements.insert(name.to_string(), audio);
        Ok(())
    }

    fn restore(&mut self, name: &str) {
        self.replacements.remove(name);
    }
}
