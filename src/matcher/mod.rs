//! Nearest-color search across palettes.
//!
//! A query walks every candidate cell, scores it by RGB distance, sorts,
//! then applies the exclusion and one-per-palette filters before keeping the
//! top [`MAX_RESULTS`].

use serde::Serialize;
use std::collections::HashSet;

use crate::color::{Color, distance, parse_color};
use crate::palette::{CellRef, PaletteEntry};
use crate::storage::{KeyValueStore, PaletteStore};

/// Upper bound on returned matches.
pub const MAX_RESULTS: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryFilters {
    /// Drop every cell from the palette holding the overall closest cell.
    pub exclude_same_as_best: bool,
    /// Keep only the closest cell of each palette.
    pub limit_one_per_palette: bool,
    /// Search owned palettes only.
    pub only_owned: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub palette: String,
    pub hex: String,
    pub distance: f64,
    pub row: usize,
    pub column: usize,
}

impl MatchResult {
    pub fn cell(&self) -> CellRef {
        CellRef::new(self.row, self.column)
    }

    /// Spreadsheet-style position, e.g. `B3`.
    pub fn position(&self) -> String {
        self.cell().to_string()
    }
}

/// Why a query produced no matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyReason {
    /// The query string is not a hex color.
    InvalidInput,
    /// No palette cell was eligible before scoring.
    NoCandidates,
    /// Cells were scored but the filters removed all of them.
    NoMatches,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Never empty.
    Matches(Vec<MatchResult>),
    Empty(EmptyReason),
}

impl SearchOutcome {
    pub fn matches(&self) -> &[MatchResult] {
        match self {
            SearchOutcome::Matches(m) => m,
            SearchOutcome::Empty(_) => &[],
        }
    }

    pub fn empty_reason(&self) -> Option<EmptyReason> {
        match self {
            SearchOutcome::Matches(_) => None,
            SearchOutcome::Empty(reason) => Some(*reason),
        }
    }
}

struct Scored<'a> {
    entry: PaletteEntry<'a>,
    distance: f64,
}

/// Parse `input` and run [`find_closest`].
pub fn search<S: KeyValueStore>(
    store: &PaletteStore<S>,
    input: &str,
    filters: QueryFilters,
) -> SearchOutcome {
    match parse_color(input.trim()) {
        Ok(query) => find_closest(store, query, filters),
        Err(e) => {
            tracing::debug!("rejecting query: {e}");
            SearchOutcome::Empty(EmptyReason::InvalidInput)
        }
    }
}

/// Closest palette cells to `query`, at most [`MAX_RESULTS`], ascending by
/// distance with ties kept in traversal order.
///
/// The "best palette" used by `exclude_same_as_best` is the palette of the
/// closest cell in the whole dataset, owned or not. The owned restriction
/// only narrows which cells can be returned.
pub fn find_closest<S: KeyValueStore>(
    store: &PaletteStore<S>,
    query: Color,
    filters: QueryFilters,
) -> SearchOutcome {
    let mut scored: Vec<Scored<'_>> = store
        .list_palettes()
        .iter()
        .flat_map(|p| p.entries())
        .map(|entry| Scored {
            distance: distance(query, entry.color),
            entry,
        })
        .collect();

    // sort_by is stable: equal distances keep traversal order.
    scored.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    let best_palette = scored.first().map(|s| s.entry.palette);

    if filters.only_owned {
        scored.retain(|s| store.is_owned(s.entry.palette));
    }

    let Some(best_palette) = best_palette.filter(|_| !scored.is_empty()) else {
        return SearchOutcome::Empty(EmptyReason::NoCandidates);
    };
    let candidates = scored.len();

    if filters.exclude_same_as_best {
        scored.retain(|s| s.entry.palette != best_palette);
    }

    if filters.limit_one_per_palette {
        let mut seen = HashSet::new();
        scored.retain(|s| seen.insert(s.entry.palette));
    }

    scored.truncate(MAX_RESULTS);

    tracing::debug!(
        query = %query,
        candidates,
        best_palette,
        kept = scored.len(),
        "search finished"
    );

    if scored.is_empty() {
        return SearchOutcome::Empty(EmptyReason::NoMatches);
    }

    SearchOutcome::Matches(
        scored
            .into_iter()
            .map(|s| MatchResult {
                palette: s.entry.palette.to_string(),
                hex: s.entry.color.to_hex(),
                distance: s.distance,
                row: s.entry.row,
                column: s.entry.column,
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::PaletteSet;
    use crate::storage::MemoryStore;

    fn store_from(json: &str) -> PaletteStore<MemoryStore> {
        PaletteStore::new(PaletteSet::from_json(json).unwrap(), MemoryStore::new())
    }

    fn several() -> PaletteStore<MemoryStore> {
        store_from(
            r##"{
                "Reds": [["#FF0000", "#EE0000", "#DD0000"], ["#CC0000", "#BB0000", "#AA0000"]],
                "Mixed": [["#F00000", "#00FF00"], ["#0000FF", "#E00000"]],
                "Dark": [["#000000", "#110000", "#220000"]],
                "Pale": [["#FFEEEE"]]
            }"##,
        )
    }

    fn filters(exclude: bool, one: bool, owned: bool) -> QueryFilters {
        QueryFilters {
            exclude_same_as_best: exclude,
            limit_one_per_palette: one,
            only_owned: owned,
        }
    }

    fn assert_sorted(matches: &[MatchResult]) {
        assert!(matches.windows(2).all(|w| w[0].distance <= w[1].distance));
    }

    #[test]
    fn test_exact_match_scenario() {
        let store = store_from(r##"{"Gray": [["#000000", "#FFFFFF"]]}"##);
        let outcome = search(&store, "#000000", QueryFilters::default());
        let matches = outcome.matches();
        assert_eq!(matches.len(), 2);
        assert_eq!(
            matches[0],
            MatchResult {
                palette: "Gray".into(),
                hex: "#000000".into(),
                distance: 0.0,
                row: 1,
                column: 1,
            }
        );
        assert_eq!(matches[0].position(), "A1");
    }

    #[test]
    fn test_invalid_input() {
        let store = several();
        let outcome = search(&store, "notacolor", QueryFilters::default());
        assert_eq!(outcome, SearchOutcome::Empty(EmptyReason::InvalidInput));
        assert!(outcome.matches().is_empty());
    }

    #[test]
    fn test_input_is_trimmed_and_case_insensitive() {
        let store = several();
        let outcome = search(&store, "  #ff0000 ", QueryFilters::default());
        assert_eq!(outcome.matches()[0].hex, "#FF0000");
        assert_eq!(outcome.matches()[0].distance, 0.0);
    }

    #[test]
    fn test_results_capped_and_sorted() {
        let store = several();
        for f in [
            filters(false, false, false),
            filters(true, false, false),
            filters(false, true, false),
            filters(true, true, false),
        ] {
            let outcome = search(&store, "#F10000", f);
            let matches = outcome.matches();
            assert!(matches.len() <= MAX_RESULTS);
            assert!(!matches.is_empty());
            assert_sorted(matches);
            if f.exclude_same_as_best {
                // "Mixed" holds #F00000, the closest cell overall.
                assert!(matches.iter().all(|m| m.palette != "Mixed"));
            }
            if f.limit_one_per_palette {
                let unique: HashSet<&str> = matches.iter().map(|m| m.palette.as_str()).collect();
                assert_eq!(unique.len(), matches.len());
            }
        }

        let both = search(&store, "#F10000", filters(true, true, false));
        let palettes: Vec<&str> = both.matches().iter().map(|m| m.palette.as_str()).collect();
        assert_eq!(palettes, vec!["Reds", "Dark", "Pale"]);
        assert_eq!(
            search(&store, "#F10000", QueryFilters::default()).matches().len(),
            MAX_RESULTS
        );
    }

    #[test]
    fn test_limit_one_per_palette_keeps_closest_of_each() {
        let store = several();
        let outcome = search(&store, "#E10000", filters(false, true, false));
        let matches = outcome.matches();

        let names: Vec<&str> = matches.iter().map(|m| m.palette.as_str()).collect();
        let unique: HashSet<&str> = names.iter().copied().collect();
        assert_eq!(names.len(), unique.len());
        assert_eq!(names.len(), 4);

        let query = parse_color("#E10000").unwrap();
        for m in matches {
            let palette = store.palettes().get(&m.palette).unwrap();
            let best = palette
                .entries()
                .map(|e| distance(query, e.color))
                .fold(f64::INFINITY, f64::min);
            assert_eq!(m.distance, best, "{}", m.palette);
        }
    }

    #[test]
    fn test_exclude_same_as_best_drops_best_palette() {
        let store = several();
        // Exact hit in "Mixed" makes it the best palette.
        let outcome = search(&store, "#F00000", filters(true, false, false));
        let matches = outcome.matches();
        assert!(!matches.is_empty());
        assert!(matches.iter().all(|m| m.palette != "Mixed"));
        assert_eq!(matches[0].palette, "Reds");
        assert_eq!(matches[0].hex, "#EE0000");
    }

    #[test]
    fn test_ties_keep_traversal_order() {
        let store = store_from(
            r##"{
                "First": [["#0A0000"]],
                "Second": [["#000A00", "#00000A"]]
            }"##,
        );
        let outcome = search(&store, "#000000", QueryFilters::default());
        let cells: Vec<(&str, &str)> = outcome
            .matches()
            .iter()
            .map(|m| (m.palette.as_str(), m.hex.as_str()))
            .collect();
        assert_eq!(
            cells,
            vec![
                ("First", "#0A0000"),
                ("Second", "#000A00"),
                ("Second", "#00000A"),
            ]
        );
    }

    #[test]
    fn test_exclusion_uses_first_of_tied_best() {
        let store = store_from(
            r##"{
                "First": [["#0A0000"]],
                "Second": [["#000A00"]]
            }"##,
        );
        let outcome = search(&store, "#000000", filters(true, false, false));
        let matches = outcome.matches();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].palette, "Second");
        assert_eq!(matches[0].distance, 10.0);
    }

    #[test]
    fn test_only_owned_with_nothing_owned() {
        let store = several();
        let outcome = search(&store, "#FF0000", filters(false, false, true));
        assert_eq!(outcome, SearchOutcome::Empty(EmptyReason::NoCandidates));
    }

    #[test]
    fn test_only_owned_restricts_candidates() {
        let mut store = several();
        store.set_owned("Dark", true);
        store.set_owned("Pale", true);
        let outcome = search(&store, "#FF0000", filters(false, false, true));
        let matches = outcome.matches();
        assert_eq!(matches.len(), 4);
        assert!(matches.iter().all(|m| m.palette == "Dark" || m.palette == "Pale"));
    }

    #[test]
    fn test_best_palette_ignores_owned_restriction() {
        let mut store = several();
        // "Mixed" holds the exact hit. It is not owned, so excluding it
        // removes nothing and "Reds" stays in the results.
        store.set_owned("Reds", true);
        store.set_owned("Dark", true);
        let outcome = search(&store, "#F00000", filters(true, false, true));
        let matches = outcome.matches();
        assert_eq!(matches.len(), 5);
        assert_eq!(matches[0].palette, "Reds");
        assert_eq!(matches[0].hex, "#EE0000");
        assert!(matches.iter().all(|m| m.palette == "Reds" || m.palette == "Dark"));

        // Owning "Mixed" as well makes it a candidate; it is then excluded.
        store.set_owned("Mixed", true);
        let outcome = search(&store, "#F00000", filters(true, false, true));
        assert!(outcome.matches().iter().all(|m| m.palette != "Mixed"));
        assert_eq!(outcome.matches()[0].palette, "Reds");
    }

    #[test]
    fn test_exclusion_emptying_everything_is_no_matches() {
        let store = store_from(
            r##"{
                "Only": [["#123456", "#654321"]],
                "Blank": []
            }"##,
        );
        let outcome = search(&store, "#123456", filters(true, false, false));
        assert_eq!(outcome, SearchOutcome::Empty(EmptyReason::NoMatches));
    }

    #[test]
    fn test_dataset_without_cells_has_no_candidates() {
        let store = store_from(r#"{"Blank": [[]]}"#);
        let outcome = search(&store, "#123456", QueryFilters::default());
        assert_eq!(outcome.empty_reason(), Some(EmptyReason::NoCandidates));
    }

    #[test]
    fn test_positions_are_one_based() {
        let store = several();
        let outcome = search(&store, "#E00000", QueryFilters::default());
        let top = &outcome.matches()[0];
        assert_eq!((top.palette.as_str(), top.row, top.column), ("Mixed", 2, 2));
        assert_eq!(top.position(), "B2");
    }
}
