//! Palettes plus the user's "owned" marks.
//!
//! The owned set is keyed by palette name and persisted as a JSON object of
//! `name -> true` under [`OWNED_KEY`]. Names that are not in the current
//! dataset are carried along untouched. Every mutation writes the whole set
//! through immediately; a failed write is logged and the in-memory state
//! stays authoritative for the rest of the session.

use std::collections::{BTreeMap, BTreeSet};

use super::KeyValueStore;
use crate::palette::{Palette, PaletteSet};

/// Owned-set storage key. The suffix versions the value format.
pub const OWNED_KEY: &str = "owned_palettes_v1";
/// Last-used state of the "only owned" search filter.
pub const ONLY_OWNED_KEY: &str = "only_owned_filter_v1";

pub struct PaletteStore<S> {
    palettes: PaletteSet,
    owned: BTreeSet<String>,
    kv: S,
}

impl<S: KeyValueStore> PaletteStore<S> {
    /// Wrap a dataset and load the persisted owned set. Read failures and
    /// unreadable values yield an empty set.
    pub fn new(palettes: PaletteSet, kv: S) -> Self {
        let owned = load_owned(&kv);
        tracing::debug!(
            palettes = palettes.len(),
            owned = owned.len(),
            "palette store ready"
        );
        Self {
            palettes,
            owned,
            kv,
        }
    }

    pub fn palettes(&self) -> &PaletteSet {
        &self.palettes
    }

    /// All palettes in definition order.
    pub fn list_palettes(&self) -> &[Palette] {
        self.palettes.as_slice()
    }

    pub fn is_owned(&self, name: &str) -> bool {
        self.owned.contains(name)
    }

    /// Set one palette's mark and persist. Unknown names are accepted.
    pub fn set_owned(&mut self, name: &str, owned: bool) {
        let changed = if owned {
            self.owned.insert(name.to_string())
        } else {
            self.owned.remove(name)
        };
        if changed {
            tracing::info!(palette = name, owned, "ownership changed");
        }
        self.persist_owned();
    }

    /// Flip one palette's mark; returns the new state.
    pub fn toggle_owned(&mut self, name: &str) -> bool {
        let next = !self.is_owned(name);
        self.set_owned(name, next);
        next
    }

    /// Mark every defined palette as owned, or clear the set entirely.
    pub fn mark_all(&mut self, owned: bool) {
        self.owned = if owned {
            self.palettes.names().map(str::to_string).collect()
        } else {
            BTreeSet::new()
        };
        tracing::info!(owned, palettes = self.palettes.len(), "marked all palettes");
        self.persist_owned();
    }

    /// Owned palettes that exist in the current dataset, in palette order.
    pub fn owned_names(&self) -> Vec<&str> {
        self.palettes
            .names()
            .filter(|name| self.owned.contains(*name))
            .collect()
    }

    /// Last-used state of the "only owned" filter (default off).
    pub fn only_owned_filter(&self) -> bool {
        match self.kv.get(ONLY_OWNED_KEY) {
            Ok(Some(raw)) => raw.trim() == "true",
            Ok(None) => false,
            Err(e) => {
                tracing::warn!("read {ONLY_OWNED_KEY}: {e:#}");
                false
            }
        }
    }

    pub fn set_only_owned_filter(&self, only_owned: bool) {
        let value = if only_owned { "true" } else { "false" };
        if let Err(e) = self.kv.set(ONLY_OWNED_KEY, value) {
            tracing::warn!("write {ONLY_OWNED_KEY}: {e:#}");
        }
    }

    fn persist_owned(&self) {
        let map: BTreeMap<&str, bool> = self.owned.iter().map(|n| (n.as_str(), true)).collect();
        let raw = match serde_json::to_string(&map) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("serialize owned set: {e}");
                return;
            }
        };
        if let Err(e) = self.kv.set(OWNED_KEY, &raw) {
            tracing::warn!("write {OWNED_KEY}: {e:#}");
        }
    }
}

fn load_owned<S: KeyValueStore>(kv: &S) -> BTreeSet<String> {
    let raw = match kv.get(OWNED_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return BTreeSet::new(),
        Err(e) => {
            tracing::warn!("read {OWNED_KEY}: {e:#}");
            return BTreeSet::new();
        }
    };

    match serde_json::from_str::<BTreeMap<String, bool>>(&raw) {
        Ok(map) => map
            .into_iter()
            .filter_map(|(name, owned)| owned.then_some(name))
            .collect(),
        Err(e) => {
            tracing::warn!("parse {OWNED_KEY}: {e}");
            BTreeSet::new()
        }
    }
}
