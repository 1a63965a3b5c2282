//! Presented entry list and selection collection

use crate::registry::{sort_by_name, InstalledMod};
use serde::{Deserialize, Serialize};

/// One listed mod as shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Package name, unique within the list
    pub id: String,
    /// Human-readable name (display and sort only)
    pub name: String,
    /// Whether the user toggled this mod into the profile
    pub enabled: bool,
}

impl Entry {
    /// Create a disabled entry
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            enabled: false,
        }
    }

    /// Set the initial toggle state
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// Collect the identifiers of enabled entries, in display order
#[must_use]
pub fn collect(entries: &[Entry]) -> Vec<String> {
    entries
        .iter()
        .filter(|entry| {
            log::debug!("mod: {} - is toggled: {}", entry.id, entry.enabled);
            entry.enabled
        })
        .map(|entry| entry.id.clone())
        .collect()
}

/// The ordered entry list backing the export screen
///
/// Rebuilt from the installed mods each time the list is shown; never
/// persisted.
#[derive(Debug, Clone, Default)]
pub struct ModList {
    entries: Vec<Entry>,
}

impl ModList {
    /// Build a list from entries, keeping their order
    #[must_use]
    pub fn new(entries: Vec<Entry>) -> Self {
        Self { entries }
    }

    /// Build the list from installed mods, sorted by display name
    #[must_use]
    pub fn from_installed(mods: &[InstalledMod]) -> Self {
        let mut sorted = mods.to_vec();
        sort_by_name(&mut sorted);
        Self {
            entries: sorted
                .into_iter()
                .map(|m| Entry::new(m.id, m.name))
                .collect(),
        }
    }

    /// Entries in display order
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Set the toggle of the entry with the given identifier
    ///
    /// Returns `false` if no entry has that identifier.
    pub fn set_enabled(&mut self, id: &str, enabled: bool) -> bool {
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => {
                entry.enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// Toggle every entry at once
    pub fn set_all(&mut self, enabled: bool) {
        for entry in &mut self.entries {
            entry.enabled = enabled;
        }
    }

    /// Identifiers of the enabled entries, in display order
    #[must_use]
    pub fn selection(&self) -> Vec<String> {
        collect(&self.entries)
    }
}
