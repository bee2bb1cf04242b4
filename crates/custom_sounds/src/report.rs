//! Human-readable reload reports.
//!
//! Both report kinds group sounds by pack and render one block per pack:
//!
//! ```text
//! packA :
//! - beep (Modified)
//! - door (Deleted)
//!
//! packB :
//! - honk (New)
//! ```
//!
//! Packs are sorted by name. Within a pack, change reports order sounds by status
//! (New, Deleted, Modified, Already Existed) and then by name; listings order by
//! name. Output is therefore reproducible for a given input.

use crate::error::Result;
use crate::registry::{ChangeClassification, ChangeStatus};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;

/// First line of a change report.
pub const CHANGES_TITLE: &str = "Customsounds reloaded.";

/// First line of a listing.
pub const LISTING_TITLE: &str = "Listing all currently loaded custom sounds:";

/// Render a change report.
///
/// `pack_lookup` maps a sound name to the pack it should be listed under; deleted
/// sounds need their last known pack, so
/// [`ResourceRegistry::last_known_pack`](crate::ResourceRegistry::last_known_pack)
/// is the usual choice. Lookup failures propagate.
pub fn format_changes<'a, F>(
    classification: &ChangeClassification,
    pack_lookup: F,
) -> Result<String>
where
    F: Fn(&str) -> Result<&'a str>,
{
    let mut by_pack: BTreeMap<&str, Vec<(ChangeStatus, &str)>> = BTreeMap::new();
    for (name, status) in classification.iter() {
        let pack = pack_lookup(name)?;
        by_pack.entry(pack).or_default().push((status, name));
    }

    let blocks = by_pack.into_iter().map(|(pack, mut sounds)| {
        sounds.sort();
        let lines = sounds
            .into_iter()
            .map(|(status, name)| format!("{} ({})", name, status.label()))
            .collect::<Vec<_>>();
        (pack, lines)
    });

    Ok(render(CHANGES_TITLE, blocks))
}

/// Render a listing of the given sounds with no change annotation.
pub fn format_listing<'a, F>(current_names: &BTreeSet<String>, pack_lookup: F) -> Result<String>
where
    F: Fn(&str) -> Result<&'a str>,
{
    let mut by_pack: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    // BTreeSet iteration keeps each pack's sounds sorted
    for name in current_names {
        let pack = pack_lookup(name)?;
        by_pack.entry(pack).or_default().push(name.clone());
    }

    Ok(render(LISTING_TITLE, by_pack))
}

fn render<'p>(title: &str, blocks: impl IntoIterator<Item = (&'p str, Vec<String>)>) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = writeln!(out, "{}", title);
    let _ = writeln!(out);
    for (pack, lines) in blocks {
        let _ = writeln!(out, "{} :", pack);
        for line in lines {
            let _ = writeln!(out, "- {}", line);
        }
        let _ = writeln!(out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn set(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn pack_for(name: &str) -> Result<&'static str> {
        match name {
            "door" | "beep" => Ok("packA"),
            "honk" => Ok("packB"),
            "zap" | "alarm" => Ok("packA"),
            other => Err(Error::Lookup(other.to_string())),
        }
    }

    #[test]
    fn test_format_changes_grouped_by_pack() {
        let classification = ChangeClassification {
            new: set(&["honk"]),
            deleted: set(&["door"]),
            modified: set(&["beep"]),
            unchanged: BTreeSet::new(),
        };

        let text = format_changes(&classification, pack_for).unwrap();
        assert_eq!(
            text,
            "Customsounds reloaded.\n\
             \n\
             packA :\n\
             - door (Deleted)\n\
             - beep (Modified)\n\
             \n\
             packB :\n\
             - honk (New)\n\
             \n"
        );
    }

    #[test]
    fn test_format_changes_unchanged_label() {
        let classification = ChangeClassification {
            unchanged: set(&["zap", "alarm"]),
            ..Default::default()
        };

        let text = format_changes(&classification, pack_for).unwrap();
        assert!(text.contains("- alarm (Already Existed)\n- zap (Already Existed)\n"));
    }

    #[test]
    fn test_format_changes_is_deterministic() {
        let classification = ChangeClassification {
            new: set(&["honk", "zap"]),
            modified: set(&["beep"]),
            unchanged: set(&["alarm"]),
            ..Default::default()
        };

        let a = format_changes(&classification, pack_for).unwrap();
        let b = format_changes(&classification.clone(), pack_for).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_format_changes_lookup_error_propagates() {
        let classification = ChangeClassification {
            new: set(&["ghost"]),
            ..Default::default()
        };

        let err = format_changes(&classification, pack_for).unwrap_err();
        assert!(matches!(err, Error::Lookup(name) if name == "ghost"));
    }

    #[test]
    fn test_format_changes_empty() {
        let text = format_changes(&ChangeClassification::default(), pack_for).unwrap();
        assert_eq!(text, "Customsounds reloaded.\n\n");
    }

    #[test]
    fn test_format_listing() {
        let text = format_listing(&set(&["honk", "door", "beep"]), pack_for).unwrap();
        assert_eq!(
            text,
            "Listing all currently loaded custom sounds:\n\
             \n\
             packA :\n\
             - beep\n\
             - door\n\
             \n\
             packB :\n\
             - honk\n\
             \n"
        );
    }
}
