//! Entry points for host glue (UI buttons, console commands, bootstrap).
//!
//! A [`SoundHost`] wraps a [`ReloadEngine`] behind a mutex so it can be shared by
//! whatever triggers reloads. Triggers never queue: if a reload or revert is already
//! running, the new request fails immediately with [`Error::Busy`].

use crate::config::SoundsConfig;
use crate::engine::{ReloadEngine, ReloadResult};
use crate::error::{Error, Result};
use crate::installer::ResourceInstaller;
use crate::report::{format_changes, format_listing};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, TryLockError};

/// Shared, serialized access to a reload engine.
pub struct SoundHost<I: ResourceInstaller> {
    config: SoundsConfig,
    engine: Mutex<ReloadEngine<I>>,
    initialized: AtomicBool,
}

impl<I: ResourceInstaller> SoundHost<I> {
    pub fn new(config: SoundsConfig, installer: I) -> Self {
        let engine = ReloadEngine::new(installer).with_scanner(config.scanner());
        Self::with_engine(config, engine)
    }

    /// Wrap a pre-configured engine (e.g. one with a progress callback).
    pub fn with_engine(config: SoundsConfig, engine: ReloadEngine<I>) -> Self {
        Self {
            config,
            engine: Mutex::new(engine),
            initialized: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &SoundsConfig {
        &self.config
    }

    /// Run the first reload. Later calls do nothing and return `Ok(None)`.
    pub fn initialize(&self) -> Result<Option<ReloadResult>> {
        if self.initialized.swap(true, Ordering::SeqCst) {
            return Ok(None);
        }
        tracing::info!("Initializing custom sounds");
        match self.trigger_reload() {
            Ok(result) => Ok(Some(result)),
            Err(e) => {
                self.initialized.store(false, Ordering::SeqCst);
                Err(e)
            }
        }
    }

    /// Rescan the configured roots. Fails with [`Error::Busy`] if one is running.
    pub fn trigger_reload(&self) -> Result<ReloadResult> {
        let mut engine = self.try_engine()?;
        engine.reload(&self.config.roots)
    }

    /// Restore all original sounds. Fails with [`Error::Busy`] if a reload is running.
    pub fn trigger_revert(&self) -> Result<()> {
        let mut engine = self.try_engine()?;
        engine.revert();
        Ok(())
    }

    /// Report of what changed in the most recent reload, grouped by pack.
    pub fn last_change_report(&self) -> Result<String> {
        let engine = self.try_engine()?;
        let registry = engine.registry();
        format_changes(engine.last_classification(), |name| {
            registry.last_known_pack(name)
        })
    }

    /// Listing of every sound in the current generation, grouped by pack.
    pub fn current_listing(&self) -> Result<String> {
        let engine = self.try_engine()?;
        let registry = engine.registry();
        format_listing(&registry.all_current_names(), |name| registry.pack_of(name))
    }

    /// Run `f` with the engine locked. Blocks rather than failing when busy.
    pub fn with_engine_locked<R>(
        &self,
        f: impl FnOnce(&mut ReloadEngine<I>) -> R,
    ) -> Result<R> {
        let mut engine = self
            .engine
            .lock()
            .map_err(|e| Error::Other(format!("Engine lock poisoned: {}", e)))?;
        Ok(f(&mut engine))
    }

    fn try_engine(&self) -> Result<MutexGuard<'_, ReloadEngine<I>>> {
        match self.engine.try_lock() {
            Ok(guard) => Ok(guard),
            Err(TryLockError::WouldBlock) => {
                tracing::warn!("Rejecting request: reload already in progress");
                Err(Error::Busy)
            }
            Err(TryLockError::Poisoned(e)) => {
                Err(Error::Other(format!("Engine lock poisoned: {}", e)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::installer::MemoryInstaller;
    use camino::Utf8PathBuf;

    fn host_with_roots(roots: Vec<Utf8PathBuf>) -> SoundHost<MemoryInstaller> {
        let config = SoundsConfig {
            roots,
            ..SoundsConfig::default()
        };
        SoundHost::new(config, MemoryInstaller::new())
    }

    #[test]
    fn test_initialize_runs_once() {
        let host = host_with_roots(vec![Utf8PathBuf::from("/does/not/exist")]);
        assert!(host.initialize().unwrap().is_some());
        assert!(host.initialize().unwrap().is_none());
    }

    #[test]
    fn test_busy_while_engine_locked() {
        let host = host_with_roots(Vec::new());
        host.with_engine_locked(|_| {
            assert!(matches!(host.trigger_reload(), Err(Error::Busy)));
            assert!(matches!(host.trigger_revert(), Err(Error::Busy)));
            assert!(matches!(host.last_change_report(), Err(Error::Busy)));
        })
        .unwrap();

        assert!(host.trigger_reload().is_ok());
    }

    #[test]
    fn test_empty_reports() {
        let host = host_with_roots(Vec::new());
        host.trigger_reload().unwrap();
        assert_eq!(host.last_change_report().unwrap(), "Customsounds reloaded.\n\n");
        assert_eq!(
            host.current_listing().unwrap(),
            "Listing all currently loaded custom sounds:\n\n"
        );
    }
}
