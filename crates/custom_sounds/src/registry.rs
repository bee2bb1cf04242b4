//! Generation bookkeeping and change classification.
//!
//! The [`ResourceRegistry`] keeps exactly two [`Generation`]s: the one built by the
//! most recent reload (*current*) and the one before it (*previous*). Older
//! generations are dropped. Diffing the two yields a [`ChangeClassification`].
//!
//! Nothing here is persisted; the registry is rebuilt from disk on every reload.

use crate::error::{Error, Result};
use crate::hash::Fingerprint;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

/// What the registry knows about one sound in one generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetEntry {
    pub fingerprint: Fingerprint,
    pub pack: String,
    /// Whether a live replacement for this sound is installed in the host.
    pub installed: bool,
}

/// One scan's worth of `name -> (fingerprint, pack)` mappings.
#[derive(Debug, Clone, Default)]
pub struct Generation {
    entries: HashMap<String, AssetEntry>,
}

impl Generation {
    pub fn get(&self, name: &str) -> Option<&AssetEntry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Status of a single sound relative to the previous generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ChangeStatus {
    New,
    Deleted,
    Modified,
    Unchanged,
}

impl ChangeStatus {
    /// Label used in change reports.
    pub fn label(self) -> &'static str {
        match self {
            ChangeStatus::New => "New",
            ChangeStatus::Deleted => "Deleted",
            ChangeStatus::Modified => "Modified",
            ChangeStatus::Unchanged => "Already Existed",
        }
    }
}

/// Partition of `previous ∪ current` sound names.
///
/// - `new`: in current only
/// - `deleted`: in previous only
/// - `modified`: in both, fingerprints differ
/// - `unchanged`: in both, fingerprints equal
///
/// The four sets are pairwise disjoint and ordered, so iteration is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeClassification {
    pub new: BTreeSet<String>,
    pub deleted: BTreeSet<String>,
    pub modified: BTreeSet<String>,
    pub unchanged: BTreeSet<String>,
}

impl ChangeClassification {
    /// Status of `name`, or `None` if it is in neither generation.
    pub fn status_of(&self, name: &str) -> Option<ChangeStatus> {
        if self.new.contains(name) {
            Some(ChangeStatus::New)
        } else if self.deleted.contains(name) {
            Some(ChangeStatus::Deleted)
        } else if self.modified.contains(name) {
            Some(ChangeStatus::Modified)
        } else if self.unchanged.contains(name) {
            Some(ChangeStatus::Unchanged)
        } else {
            None
        }
    }

    /// Every classified name with its status, grouped by status then sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, ChangeStatus)> {
        tagged(&self.new, ChangeStatus::New)
            .chain(tagged(&self.deleted, ChangeStatus::Deleted))
            .chain(tagged(&self.modified, ChangeStatus::Modified))
            .chain(tagged(&self.unchanged, ChangeStatus::Unchanged))
    }

    /// Total number of classified names.
    pub fn len(&self) -> usize {
        self.new.len() + self.deleted.len() + self.modified.len() + self.unchanged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether anything changed (ignoring unchanged sounds).
    pub fn has_changes(&self) -> bool {
        !(self.new.is_empty() && self.deleted.is_empty() && self.modified.is_empty())
    }
}

fn tagged(
    set: &BTreeSet<String>,
    status: ChangeStatus,
) -> impl Iterator<Item = (&str, ChangeStatus)> + '_ {
    set.iter().map(move |name| (name.as_str(), status))
}

/// Current and previous generation of installed sounds.
#[derive(Debug, Default)]
pub struct ResourceRegistry {
    current: Generation,
    previous: Generation,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the current generation to previous and start an empty one.
    ///
    /// Must be called exactly once per reload, before anything is recorded.
    pub fn begin_generation(&mut self) {
        self.previous = std::mem::take(&mut self.current);
    }

    /// Record a sound in the current generation, marked as installed.
    ///
    /// Recording the same name twice in one generation silently keeps the later call
    /// (last processed directory wins).
    pub fn record(&mut self, name: &str, fingerprint: Fingerprint, pack: &str) {
        let entry = AssetEntry {
            fingerprint,
            pack: pack.to_string(),
            installed: true,
        };
        if let Some(old) = self.current.entries.insert(name.to_string(), entry) {
            tracing::debug!("'{}' from pack '{}' overrides pack '{}'", name, pack, old.pack);
        }
    }

    /// Copy `name`'s previous-generation entry into the current generation.
    ///
    /// Used when a sound's file is still present but could not be decoded or
    /// installed: it keeps its previous state instead of showing up as deleted. The
    /// carried entry is not installed. Does nothing (and returns `false`) if the name
    /// was not in the previous generation or is already recorded in the current one.
    pub fn carry_forward(&mut self, name: &str) -> bool {
        if self.current.contains(name) {
            return false;
        }
        let Some(prev) = self.previous.get(name) else {
            return false;
        };
        let entry = AssetEntry {
            installed: false,
            ..prev.clone()
        };
        self.current.entries.insert(name.to_string(), entry);
        true
    }

    /// Mark a current-generation sound as no longer installed in the host.
    pub fn mark_restored(&mut self, name: &str) {
        if let Some(entry) = self.current.entries.get_mut(name) {
            entry.installed = false;
        }
    }

    /// Diff the current generation against the previous one.
    pub fn classify(&self) -> ChangeClassification {
        let mut result = ChangeClassification::default();

        for (name, entry) in &self.current.entries {
            match self.previous.get(name) {
                None => result.new.insert(name.clone()),
                Some(old) if old.fingerprint != entry.fingerprint => {
                    result.modified.insert(name.clone())
                }
                Some(_) => result.unchanged.insert(name.clone()),
            };
        }

        for name in self.previous.names() {
            if !self.current.contains(name) {
                result.deleted.insert(name.to_string());
            }
        }

        result
    }

    /// All sound names in the current generation.
    pub fn all_current_names(&self) -> BTreeSet<String> {
        self.current.entries.keys().cloned().collect()
    }

    /// Current-generation sounds with a live replacement installed.
    pub fn installed_names(&self) -> BTreeSet<String> {
        self.current
            .entries
            .iter()
            .filter(|(_, entry)| entry.installed)
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Pack that supplied `name` in the current generation.
    pub fn pack_of(&self, name: &str) -> Result<&str> {
        self.current
            .get(name)
            .map(|entry| entry.pack.as_str())
            .ok_or_else(|| Error::Lookup(name.to_string()))
    }

    /// Pack that last supplied `name`, looking at the current generation first and
    /// then the previous one. Used to attribute deleted sounds in reports.
    pub fn last_known_pack(&self, name: &str) -> Result<&str> {
        self.current
            .get(name)
            .or_else(|| self.previous.get(name))
            .map(|entry| entry.pack.as_str())
            .ok_or_else(|| Error::Lookup(name.to_string()))
    }

    /// Fingerprint of `name` in the current generation.
    pub fn fingerprint_of(&self, name: &str) -> Option<&Fingerprint> {
        self.current.get(name).map(|entry| &entry.fingerprint)
    }

    pub fn current(&self) -> &Generation {
        &self.current
    }

    pub fn previous(&self) -> &Generation {
        &self.previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fp(data: &str) -> Fingerprint {
        Fingerprint::from_bytes(data.as_bytes())
    }

    fn names(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_registry_classifies_empty() {
        let registry = ResourceRegistry::new();
        assert!(registry.classify().is_empty());
    }

    #[test]
    fn test_first_generation_all_new() {
        let mut registry = ResourceRegistry::new();
        registry.begin_generation();
        registry.record("door", fp("1"), "packA");
        registry.record("beep", fp("2"), "packA");

        let c = registry.classify();
        assert_eq!(c.new, names(&["beep", "door"]));
        assert!(c.deleted.is_empty() && c.modified.is_empty() && c.unchanged.is_empty());
    }

    #[test]
    fn test_door_beep_honk_scenario() {
        let mut registry = ResourceRegistry::new();
        registry.begin_generation();
        registry.record("door", fp("hash1"), "packA");
        registry.record("beep", fp("hash2"), "packA");

        registry.begin_generation();
        registry.record("beep", fp("hash3"), "packA");
        registry.record("honk", fp("hash4"), "packB");

        let c = registry.classify();
        assert_eq!(c.new, names(&["honk"]));
        assert_eq!(c.deleted, names(&["door"]));
        assert_eq!(c.modified, names(&["beep"]));
        assert!(c.unchanged.is_empty());

        assert!(registry.pack_of("door").is_err());
        assert_eq!(registry.last_known_pack("door").unwrap(), "packA");
    }

    #[test]
    fn test_partition_is_disjoint_and_complete() {
        let mut registry = ResourceRegistry::new();
        registry.begin_generation();
        for (name, data) in [("a", "1"), ("b", "2"), ("c", "3"), ("d", "4")] {
            registry.record(name, fp(data), "p");
        }
        registry.begin_generation();
        for (name, data) in [("b", "2"), ("c", "changed"), ("e", "5")] {
            registry.record(name, fp(data), "p");
        }

        let c = registry.classify();
        let mut union = BTreeSet::new();
        for set in [&c.new, &c.deleted, &c.modified, &c.unchanged] {
            for name in set {
                assert!(union.insert(name.clone()), "{} classified twice", name);
            }
        }
        assert_eq!(union, names(&["a", "b", "c", "d", "e"]));
        assert_eq!(c.status_of("a"), Some(ChangeStatus::Deleted));
        assert_eq!(c.status_of("b"), Some(ChangeStatus::Unchanged));
        assert_eq!(c.status_of("c"), Some(ChangeStatus::Modified));
        assert_eq!(c.status_of("e"), Some(ChangeStatus::New));
        assert_eq!(c.status_of("zzz"), None);
    }

    #[test]
    fn test_record_last_wins() {
        let mut registry = ResourceRegistry::new();
        registry.begin_generation();
        registry.record("beep", fp("first"), "packA");
        registry.record("beep", fp("second"), "packB");

        assert_eq!(registry.current().len(), 1);
        assert_eq!(registry.pack_of("beep").unwrap(), "packB");
        assert_eq!(registry.fingerprint_of("beep"), Some(&fp("second")));
    }

    #[test]
    fn test_older_generations_dropped() {
        let mut registry = ResourceRegistry::new();
        registry.begin_generation();
        registry.record("ancient", fp("1"), "p");
        registry.begin_generation();
        registry.begin_generation();

        assert!(!registry.previous().contains("ancient"));
        assert!(registry.classify().is_empty());
    }

    #[test]
    fn test_carry_forward_keeps_previous_state() {
        let mut registry = ResourceRegistry::new();
        registry.begin_generation();
        registry.record("door", fp("1"), "packA");
        registry.begin_generation();

        assert!(registry.carry_forward("door"));
        assert!(!registry.carry_forward("unknown"));
        assert!(!registry.carry_forward("door"));

        let c = registry.classify();
        assert_eq!(c.unchanged, names(&["door"]));
        assert!(registry.installed_names().is_empty());
    }

    #[test]
    fn test_mark_restored() {
        let mut registry = ResourceRegistry::new();
        registry.begin_generation();
        registry.record("door", fp("1"), "packA");
        registry.record("beep", fp("2"), "packA");
        registry.mark_restored("door");

        assert_eq!(registry.installed_names(), names(&["beep"]));
        assert_eq!(registry.all_current_names(), names(&["beep", "door"]));
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(ChangeStatus::New.label(), "New");
        assert_eq!(ChangeStatus::Deleted.label(), "Deleted");
        assert_eq!(ChangeStatus::Modified.label(), "Modified");
        assert_eq!(ChangeStatus::Unchanged.label(), "Already Existed");
    }
}
