//! Hot-reloadable custom sound packs.
//!
//! This crate replaces a host application's built-in sounds with `.wav` files found
//! on disk, and can do so repeatedly. Every reload rescans the configured roots,
//! fingerprints each sound file, installs it through the host, and classifies each
//! sound against the previous reload:
//!
//! - **New**: present now, absent last time
//! - **Deleted**: present last time, absent now
//! - **Modified**: present both times with different contents
//! - **Already Existed**: present both times, unchanged
//!
//! Reports are grouped by the sound pack that supplied each file.
//!
//! # Example
//!
//! ```no_run
//! use custom_sounds::{MemoryInstaller, SoundHost, SoundsConfig};
//! use camino::Utf8Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SoundsConfig::for_plugin_dir(
//!     Utf8Path::new("BepInEx/plugins/CustomSounds"),
//!     Utf8Path::new("BepInEx"),
//! );
//! let host = SoundHost::new(config, MemoryInstaller::new());
//!
//! host.trigger_reload()?;
//! println!("{}", host.last_change_report()?);
//!
//! host.trigger_revert()?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod decode;
pub mod engine;
pub mod error;
pub mod hash;
pub mod host;
pub mod installer;
pub mod registry;
pub mod report;
pub mod scanner;

// Re-export main types
pub use config::SoundsConfig;
pub use decode::DecodedAudio;
pub use engine::{ReloadEngine, ReloadProgress, ReloadResult, ReloadStage, SkippedFile};
pub use error::{Error, Result};
pub use hash::Fingerprint;
pub use host::SoundHost;
pub use installer::{MemoryInstaller, ResourceInstaller};
pub use registry::{ChangeClassification, ChangeStatus, ResourceRegistry};
pub use report::{format_changes, format_listing};
pub use scanner::{PackFile, PackScanner};
