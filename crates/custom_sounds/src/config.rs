//! Reload configuration stored as TOML.
//!
//! ```toml
//! marker_dir = "CustomSounds"
//! extension = "wav"
//! roots = [
//!     "BepInEx/plugins/CustomSounds/CustomSounds/Temp",
//!     "BepInEx",
//! ]
//! ```
//!
//! Roots are scanned in the listed order, so later roots win name collisions.

use crate::error::Result;
use crate::scanner::{PackScanner, DEFAULT_EXTENSION, DEFAULT_MARKER_DIR};
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

/// Name of the plugin's own sounds folder.
///
/// This is a fixed part of the plugin layout and does not follow
/// [`SoundsConfig::marker_dir`], which only controls what the scanner matches.
pub const SOUNDS_DIR_NAME: &str = "CustomSounds";

/// Name of the temporary overlay directory inside the sounds folder.
pub const TEMP_DIR_NAME: &str = "Temp";

/// Reload configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundsConfig {
    /// Directories to scan, in override order.
    pub roots: Vec<Utf8PathBuf>,
    /// Marker directory name identifying sound packs.
    pub marker_dir: String,
    /// Sound file extension.
    pub extension: String,
}

impl Default for SoundsConfig {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            marker_dir: DEFAULT_MARKER_DIR.to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

impl SoundsConfig {
    /// Layout used when running as a plugin.
    ///
    /// The temporary overlay `<plugin_dir>/CustomSounds/Temp` is scanned first and the
    /// whole plugins root second, so installed packs override temporary ones.
    pub fn for_plugin_dir(plugin_dir: &Utf8Path, plugins_root: &Utf8Path) -> Self {
        Self {
            roots: vec![temp_dir(plugin_dir), plugins_root.to_path_buf()],
            ..Self::default()
        }
    }

    /// Load a config file.
    ///
    /// Returns `Ok(None)` if the file doesn't exist and `Err` if it exists but
    /// cannot be read or parsed.
    pub fn load(path: &Utf8Path) -> Result<Option<Self>> {
        if !path.as_std_path().exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(path.as_std_path())?;
        let config: Self = toml::from_str(&contents)?;
        Ok(Some(config))
    }

    /// Load a config file, falling back to defaults when it is missing or invalid.
    pub fn load_or_default(path: &Utf8Path) -> Self {
        match Self::load(path) {
            Ok(Some(config)) => config,
            Ok(None) => Self::default(),
            Err(e) => {
                tracing::warn!("Ignoring unreadable config {}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Save the config, creating parent directories if needed.
    pub fn save(&self, path: &Utf8Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent.as_std_path())?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path.as_std_path(), contents)?;
        Ok(())
    }

    /// Scanner matching this config's marker directory and extension.
    pub fn scanner(&self) -> PackScanner {
        PackScanner::new(self.marker_dir.clone(), self.extension.clone())
    }
}

/// The plugin's own sounds folder, `<plugin_dir>/CustomSounds`.
pub fn sounds_dir(plugin_dir: &Utf8Path) -> Utf8PathBuf {
    plugin_dir.join(SOUNDS_DIR_NAME)
}

/// The temporary overlay folder, `<plugin_dir>/CustomSounds/Temp`.
pub fn temp_dir(plugin_dir: &Utf8Path) -> Utf8PathBuf {
    sounds_dir(plugin_dir).join(TEMP_DIR_NAME)
}

/// Create the plugin's sounds folder if it is missing. Returns its path.
pub fn ensure_sounds_dir(plugin_dir: &Utf8Path) -> Result<Utf8PathBuf> {
    let dir = sounds_dir(plugin_dir);
    if !dir.as_std_path().exists() {
        tracing::info!("\"{}\" folder not found. Creating it now.", SOUNDS_DIR_NAME);
        std::fs::create_dir_all(dir.as_std_path())?;
    }
    Ok(dir)
}
