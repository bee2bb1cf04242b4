//! Reload orchestration.
//!
//! The [`ReloadEngine`] runs one full reload cycle at a time:
//!
//! 1. Restore every sound the current generation installed, so reloading the same
//!    files twice never stacks replacements.
//! 2. Start a new registry generation (current becomes previous).
//! 3. Scan every root in order with the [`PackScanner`] and fingerprint each file.
//!    Fingerprints are independent, so they are computed in parallel.
//! 4. In scan order, decode each file, install it through the [`ResourceInstaller`]
//!    and record it. Later roots and packs override earlier ones for a colliding
//!    name (last-writer-wins).
//! 5. Classify the new generation against the previous one.
//!
//! Per-file failures never abort a reload. A file that cannot be read is left out
//! of the new generation; a file that cannot be decoded or installed keeps its
//! previous-generation state. Either way it is reported in
//! [`ReloadResult::skipped`].

use crate::decode::load_sound;
use crate::error::{Error, Result};
use crate::hash::Fingerprint;
use crate::installer::ResourceInstaller;
use crate::registry::{ChangeClassification, ResourceRegistry};
use crate::scanner::{PackFile, PackScanner};
use camino::Utf8PathBuf;
use rayon::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Progress information emitted during a reload.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReloadProgress {
    pub stage: ReloadStage,
    /// Sound currently being installed (set during `Installing`).
    pub current_file: Option<String>,
    /// 1-based index of the file currently being installed.
    pub current: u32,
    /// Total number of files found by the scan.
    pub total: u32,
}

/// Stages of a reload.
///
/// Emitted in order: `Restoring` -> `Scanning` -> `Hashing` -> `Installing` (repeated) -> `Complete`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ReloadStage {
    /// Putting back the sounds installed by the previous reload.
    Restoring,
    /// Walking the scan roots for sound packs.
    Scanning,
    /// Fingerprinting discovered files.
    Hashing,
    /// Decoding and installing one sound.
    Installing,
    /// Reload finished.
    Complete,
}

/// A file that was found but not installed.
#[derive(Debug)]
pub struct SkippedFile {
    pub path: Utf8PathBuf,
    pub name: String,
    pub pack: String,
    pub reason: Error,
}

/// Summary of one reload.
#[derive(Debug)]
pub struct ReloadResult {
    pub classification: ChangeClassification,
    /// Files that could not be read, decoded or installed.
    pub skipped: Vec<SkippedFile>,
    /// Number of sounds installed in this reload.
    pub installed: usize,
    /// Wall-clock time for the whole reload.
    pub elapsed: Duration,
}

type ProgressCallback = Arc<dyn Fn(ReloadProgress) + Send + Sync>;

/// Drives reloads and reverts against a [`ResourceInstaller`].
///
/// The engine owns the [`ResourceRegistry`]. All operations take `&mut self`, so a
/// reload can never overlap another reload or revert on the same engine; share it
/// through a [`SoundHost`](crate::SoundHost) to get an explicit busy policy.
pub struct ReloadEngine<I: ResourceInstaller> {
    installer: I,
    scanner: PackScanner,
    registry: ResourceRegistry,
    last_classification: ChangeClassification,
    progress_callback: Option<ProgressCallback>,
}

impl<I: ResourceInstaller> ReloadEngine<I> {
    /// Create an engine with the default scanner (`CustomSounds` / `.wav`).
    pub fn new(installer: I) -> Self {
        Self {
            installer,
            scanner: PackScanner::default(),
            registry: ResourceRegistry::new(),
            last_classification: ChangeClassification::default(),
            progress_callback: None,
        }
    }

    /// Use a custom scanner (marker directory name and extension).
    pub fn with_scanner(mut self, scanner: PackScanner) -> Self {
        self.scanner = scanner;
        self
    }

    /// Register a progress callback.
    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ReloadProgress) + Send + Sync + 'static,
    {
        self.progress_callback = Some(Arc::new(callback));
        self
    }

    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    pub fn installer(&self) -> &I {
        &self.installer
    }

    /// Classification produced by the most recent reload.
    pub fn last_classification(&self) -> &ChangeClassification {
        &self.last_classification
    }

    /// Rescan `roots` (in order) and replace every discovered sound.
    ///
    /// See the module-level docs for the full algorithm. Missing roots are treated
    /// as empty. Every per-file error, whatever its kind, is reported in
    /// [`ReloadResult::skipped`] and the reload carries on with the next file.
    pub fn reload(&mut self, roots: &[Utf8PathBuf]) -> Result<ReloadResult> {
        let start_time = Instant::now();
        tracing::info!("Reloading custom sounds from {} root(s)", roots.len());

        self.emit_progress(ReloadStage::Restoring, None, 0, 0);
        self.restore_installed();

        self.registry.begin_generation();

        self.emit_progress(ReloadStage::Scanning, None, 0, 0);
        let files: Vec<PackFile> = roots
            .iter()
            .flat_map(|root| {
                tracing::info!("Scanning {}", root);
                self.scanner.scan(root)
            })
            .collect();
        let total = files.len() as u32;
        tracing::info!("Found {} sound file(s)", total);

        self.emit_progress(ReloadStage::Hashing, None, 0, total);
        let fingerprints: Vec<Result<Fingerprint>> = files
            .par_iter()
            .map(|file| Fingerprint::from_file(&file.path))
            .collect();

        let mut skipped = Vec::new();
        let mut succeeded: HashSet<String> = HashSet::new();

        for (idx, (file, fingerprint)) in files.into_iter().zip(fingerprints).enumerate() {
            let name = file.asset_name().to_string();
            self.emit_progress(
                ReloadStage::Installing,
                Some(name.clone()),
                (idx + 1) as u32,
                total,
            );

            let fingerprint = match fingerprint {
                Ok(fingerprint) => fingerprint,
                Err(e) => {
                    // Unreadable: absent from this generation unless another file supplies it
                    tracing::warn!(
                        "[{}] Skipping unreadable sound {}: {}",
                        file.pack,
                        file.path,
                        e
                    );
                    skipped.push(SkippedFile {
                        path: file.path,
                        name,
                        pack: file.pack,
                        reason: e,
                    });
                    continue;
                }
            };

            match self.install_file(&file, &name) {
                Ok(()) => {
                    self.registry.record(&name, fingerprint, &file.pack);
                    succeeded.insert(name.clone());
                    tracing::info!("[{}] {} sound replaced!", file.pack, name);
                }
                Err(e) => {
                    tracing::warn!("[{}] Skipping sound {}: {}", file.pack, file.path, e);
                    // A file that vanished mid-reload is gone; anything else keeps the old entry
                    if !matches!(e, Error::Io(_)) && self.registry.carry_forward(&name) {
                        tracing::debug!("'{}' keeps its previous state", name);
                    }
                    skipped.push(SkippedFile {
                        path: file.path,
                        name,
                        pack: file.pack,
                        reason: e,
                    });
                }
            }
        }

        let classification = self.registry.classify();
        tracing::info!(
            "Reload complete: {} new, {} deleted, {} modified, {} unchanged, {} skipped",
            classification.new.len(),
            classification.deleted.len(),
            classification.modified.len(),
            classification.unchanged.len(),
            skipped.len()
        );
        self.last_classification = classification.clone();

        self.emit_progress(ReloadStage::Complete, None, total, total);

        Ok(ReloadResult {
            classification,
            skipped,
            installed: succeeded.len(),
            elapsed: start_time.elapsed(),
        })
    }

    /// Restore the host's original sounds for everything currently installed.
    ///
    /// The registry's generations are left alone, so the next reload still diffs
    /// against the same previous generation.
    pub fn revert(&mut self) {
        let restored = self.restore_installed();
        tracing::info!("Original game sounds restored ({} sound(s)).", restored);
    }

    fn restore_installed(&mut self) -> usize {
        let names = self.registry.installed_names();
        for name in &names {
            self.installer.restore(name);
            self.registry.mark_restored(name);
            tracing::debug!("{} restored.", name);
        }
        names.len()
    }

    fn install_file(&mut self, file: &PackFile, name: &str) -> Result<()> {
        let audio = load_sound(&file.path)?;
        self.installer.install(name, audio)
    }

    fn emit_progress(
        &self,
        stage: ReloadStage,
        current_file: Option<String>,
        current: u32,
        total: u32,
    ) {
        if let Some(callback) = &self.progress_callback {
            callback(ReloadProgress {
                stage,
                current_file,
                current,
                total,
            });
        }
    }
}
