//! Sound pack discovery.
//!
//! A sound pack is any directory tree containing a *marker directory* (by default
//! `CustomSounds`). The [`PackScanner`] walks a root recursively, and for every
//! marker directory `P` it finds applies a two-level rule:
//!
//! ```text
//! root/
//!   SomeMod/
//!     CustomSounds/          # marker directory P
//!       door.wav             # level 1: pack = "SomeMod" (name of P's parent)
//!       Spooky/
//!         beep.wav           # level 2: pack = "Spooky" (name of the sub-directory)
//! ```
//!
//! This lets a single marker directory host a loose pack and any number of named
//! sub-packs at the same time. Files deeper than level 2 are only picked up if they
//! sit under another marker directory.

use camino::{Utf8Path, Utf8PathBuf};
use walkdir::WalkDir;

/// Default marker directory name.
pub const DEFAULT_MARKER_DIR: &str = "CustomSounds";

/// Default (and only supported) audio container extension.
pub const DEFAULT_EXTENSION: &str = "wav";

/// A qualifying sound file and the pack it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackFile {
    /// Logical pack name derived from the directory layout.
    pub pack: String,
    /// Full path of the sound file.
    pub path: Utf8PathBuf,
}

impl PackFile {
    /// Asset name for this file: its base name without extension.
    pub fn asset_name(&self) -> &str {
        self.path
            .file_stem()
            .unwrap_or_else(|| self.path.as_str())
    }
}

/// Walks directory trees looking for sound packs.
///
/// Scanning is restartable: every call to [`scan`](Self::scan) performs a fresh
/// traversal and holds no resources between calls.
#[derive(Debug, Clone)]
pub struct PackScanner {
    marker_dir: String,
    extension: String,
}

impl Default for PackScanner {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER_DIR, DEFAULT_EXTENSION)
    }
}

impl PackScanner {
    /// Create a scanner for the given marker directory name and file extension.
    ///
    /// Both are matched ASCII case-insensitively. A leading `.` on the extension is
    /// ignored.
    pub fn new(marker_dir: impl Into<String>, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        Self {
            marker_dir: marker_dir.into(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    /// The marker directory name this scanner looks for.
    pub fn marker_dir(&self) -> &str {
        &self.marker_dir
    }

    /// The sound file extension this scanner accepts.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Lazily yield every qualifying file under `root`, tagged with its pack name.
    ///
    /// Only descendants of `root` are matched against the marker name; `root` itself
    /// is never treated as a marker directory.
    ///
    /// A root that doesn't exist yields nothing; optional locations such as a
    /// temporary overlay directory are allowed to be absent. Entries are visited in
    /// file name order so repeated scans of the same tree produce the same sequence.
    pub fn scan<'a>(&'a self, root: &Utf8Path) -> impl Iterator<Item = PackFile> + 'a {
        let walker = root
            .as_std_path()
            .is_dir()
            .then(|| {
                WalkDir::new(root.as_std_path())
                    .min_depth(1)
                    .sort_by_file_name()
            });

        if walker.is_none() {
            tracing::debug!("Scan root {} does not exist, skipping", root);
        }

        walker
            .into_iter()
            .flat_map(|walker| walker.into_iter())
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry during scan: {}", e);
                    None
                }
            })
            .filter(move |entry| {
                entry.file_type().is_dir()
                    && entry
                        .file_name()
                        .to_str()
                        .is_some_and(|name| name.eq_ignore_ascii_case(&self.marker_dir))
            })
            .filter_map(|entry| match Utf8PathBuf::from_path_buf(entry.into_path()) {
                Ok(p) => Some(p),
                Err(p) => {
                    tracing::warn!("Skipping non-UTF-8 path: {}", p.display());
                    None
                }
            })
            .flat_map(move |marker| self.pack_files(&marker))
    }

    /// Apply the two-level rule to a single marker directory.
    fn pack_files(&self, marker: &Utf8Path) -> Vec<PackFile> {
        let loose_pack = marker
            .parent()
            .and_then(|p| p.file_name())
            .or_else(|| marker.file_name())
            .unwrap_or(self.marker_dir.as_str())
            .to_string();

        let (files, sub_dirs) = list_dir(marker);

        let mut out: Vec<PackFile> = files
            .into_iter()
            .filter(|path| self.is_qualifying(path))
            .map(|path| PackFile {
                pack: loose_pack.clone(),
                path,
            })
            .collect();

        for sub_dir in sub_dirs {
            let Some(pack) = sub_dir.file_name().map(str::to_string) else {
                continue;
            };
            let (files, _) = list_dir(&sub_dir);
            out.extend(
                files
                    .into_iter()
                    .filter(|path| self.is_qualifying(path))
                    .map(|path| PackFile {
                        pack: pack.clone(),
                        path,
                    }),
            );
        }

        tracing::trace!("Marker {} contributed {} file(s)", marker, out.len());
        out
    }

    fn is_qualifying(&self, path: &Utf8Path) -> bool {
        path.extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.extension))
    }
}

/// List the regular files and sub-directories directly inside `dir`, sorted by name.
///
/// Errors are logged and treated as an empty directory.
fn list_dir(dir: &Utf8Path) -> (Vec<Utf8PathBuf>, Vec<Utf8PathBuf>) {
    let mut files = Vec::new();
    let mut dirs = Vec::new();

    let entries = match std::fs::read_dir(dir.as_std_path()) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("Failed to read directory '{}': {}", dir, e);
            return (files, dirs);
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Failed to read entry in '{}': {}", dir, e);
                continue;
            }
        };

        let path = match Utf8PathBuf::from_path_buf(entry.path()) {
            Ok(p) => p,
            Err(p) => {
                tracing::warn!("Skipping non-UTF-8 path: {}", p.display());
                continue;
            }
        };

        if path.as_std_path().is_dir() {
            dirs.push(path);
        } else if path.as_std_path().is_file() {
            files.push(path);
        }
    }

    files.sort();
    dirs.sort();
    (files, dirs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn utf8_root(dir: &tempfile::TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap()
    }

    fn touch(path: &Utf8Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"RIFF").unwrap();
    }

    fn packs(scanner: &PackScanner, root: &Utf8Path) -> Vec<(String, String)> {
        let mut out: Vec<(String, String)> = scanner
            .scan(root)
            .map(|f| (f.pack.clone(), f.asset_name().to_string()))
            .collect();
        out.sort();
        out
    }

    #[test]
    fn test_two_level_rule() {
        let dir = tempdir().unwrap();
        let root = utf8_root(&dir);
        touch(&root.join("Mod/CustomSounds/a.wav"));
        touch(&root.join("Mod/CustomSounds/Sub/b.wav"));

        let found = packs(&PackScanner::default(), &root);
        assert_eq!(
            found,
            vec![
                ("Mod".to_string(), "a".to_string()),
                ("Sub".to_string(), "b".to_string()),
            ]
        );
    }

    #[test]
    fn test_marker_at_root_uses_root_name() {
        let dir = tempdir().unwrap();
        let root = utf8_root(&dir);
        touch(&root.join("CustomSounds/a.wav"));

        let found: Vec<PackFile> = PackScanner::default().scan(&root).collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].pack, root.file_name().unwrap());
    }

    #[test]
    fn test_root_named_like_marker_is_not_a_marker() {
        let dir = tempdir().unwrap();
        let root = utf8_root(&dir).join("CustomSounds");
        touch(&root.join("stray.wav"));
        touch(&root.join("Mod/CustomSounds/a.wav"));

        let found = packs(&PackScanner::default(), &root);
        assert_eq!(found, vec![("Mod".to_string(), "a".to_string())]);
    }

    #[test]
    fn test_missing_root_is_empty() {
        let scanner = PackScanner::default();
        assert_eq!(scanner.scan(Utf8Path::new("/does/not/exist")).count(), 0);
    }

    #[test]
    fn test_extension_filter_case_insensitive() {
        let dir = tempdir().unwrap();
        let root = utf8_root(&dir);
        touch(&root.join("Mod/CustomSounds/loud.WAV"));
        touch(&root.join("Mod/CustomSounds/notes.txt"));
        touch(&root.join("Mod/CustomSounds/song.ogg"));

        let found = packs(&PackScanner::default(), &root);
        assert_eq!(found, vec![("Mod".to_string(), "loud".to_string())]);
    }

    #[test]
    fn test_files_outside_marker_ignored() {
        let dir = tempdir().unwrap();
        let root = utf8_root(&dir);
        touch(&root.join("Mod/stray.wav"));
        touch(&root.join("Mod/Sounds/other.wav"));
        touch(&root.join("Mod/CustomSounds/Sub/Deeper/too_deep.wav"));

        assert!(packs(&PackScanner::default(), &root).is_empty());
    }

    #[test]
    fn test_nested_markers_found_recursively() {
        let dir = tempdir().unwrap();
        let root = utf8_root(&dir);
        touch(&root.join("plugins/A/CustomSounds/one.wav"));
        touch(&root.join("plugins/deep/B/customsounds/two.wav"));

        let found = packs(&PackScanner::default(), &root);
        assert_eq!(
            found,
            vec![
                ("A".to_string(), "one".to_string()),
                ("B".to_string(), "two".to_string()),
            ]
        );
    }

    #[test]
    fn test_scan_is_restartable() {
        let dir = tempdir().unwrap();
        let root = utf8_root(&dir);
        touch(&root.join("Mod/CustomSounds/a.wav"));

        let scanner = PackScanner::default();
        let first: Vec<PackFile> = scanner.scan(&root).collect();
        touch(&root.join("Mod/CustomSounds/b.wav"));
        let second: Vec<PackFile> = scanner.scan(&root).collect();

        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 2);
    }

    #[test]
    fn test_custom_marker_and_extension() {
        let dir = tempdir().unwrap();
        let root = utf8_root(&dir);
        touch(&root.join("Mod/Audio/a.flac"));

        let scanner = PackScanner::new("Audio", ".flac");
        assert_eq!(scanner.extension(), "flac");
        assert_eq!(
            packs(&scanner, &root),
            vec![("Mod".to_string(), "a".to_string())]
        );
    }
}
