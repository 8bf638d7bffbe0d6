use once_cell::sync::Lazy;

use super::PaletteSet;

const BUILTIN_JSON: &str = include_str!("../../assets/palettes.json");

/// Parsed once on first use.
pub(super) static BUILTIN: Lazy<PaletteSet> = Lazy::new(|| {
    PaletteSet::from_json(BUILTIN_JSON).unwrap_or_else(|e| {
        tracing::error!("built-in palette dataset is invalid: {e}");
        PaletteSet::default()
    })
});
