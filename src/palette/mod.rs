//! Palette dataset
//!
//! A palette is a named 2-D grid of colors (think: a marker set laid out in
//! its case). The dataset is a JSON object mapping palette name to rows of
//! hex strings; object order is the palette order everywhere in the tool.

pub mod builtin;
pub mod cell;

use anyhow::Context;
use std::path::Path;
use thiserror::Error;

use crate::color::{Color, ParseColorError, parse_color};

pub use cell::CellRef;

#[derive(Debug, Error)]
pub enum PaletteError {
    #[error("palette dataset is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("palette {palette:?}: expected an array of rows of hex strings: {source}")]
    InvalidGrid {
        palette: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("palette {palette:?} cell {cell}: {source}")]
    InvalidColor {
        palette: String,
        cell: CellRef,
        #[source]
        source: ParseColorError,
    },

    #[error("unknown palette {0:?}")]
    UnknownPalette(String),

    #[error("invalid cell reference {0:?} (expected a column letter and row number, e.g. B3)")]
    InvalidCell(String),

    #[error("palette {palette:?} has no cell {cell}")]
    CellOutOfRange { palette: String, cell: CellRef },
}

/// A named grid of colors.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    name: String,
    grid: Vec<Vec<Color>>,
}

/// One grid cell seen during traversal. `row` and `column` are 1-based.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaletteEntry<'a> {
    pub palette: &'a str,
    pub color: Color,
    pub row: usize,
    pub column: usize,
}

impl Palette {
    pub fn new(name: impl Into<String>, grid: Vec<Vec<Color>>) -> Self {
        Self {
            name: name.into(),
            grid,
        }
    }

    /// Build a palette from rows of hex strings, validating every cell.
    pub fn from_hex_rows(name: &str, rows: &[Vec<String>]) -> Result<Self, PaletteError> {
        let mut grid = Vec::with_capacity(rows.len());
        for (r, row) in rows.iter().enumerate() {
            let mut colors = Vec::with_capacity(row.len());
            for (c, hex) in row.iter().enumerate() {
                let color = parse_color(hex).map_err(|source| PaletteError::InvalidColor {
                    palette: name.to_string(),
                    cell: CellRef::new(r + 1, c + 1),
                    source,
                })?;
                colors.push(color);
            }
            grid.push(colors);
        }
        Ok(Self::new(name, grid))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rows(&self) -> &[Vec<Color>] {
        &self.grid
    }

    /// Number of colors across all rows (rows may be ragged).
    pub fn color_count(&self) -> usize {
        self.grid.iter().map(Vec::len).sum()
    }

    /// Row-major traversal of every cell.
    pub fn entries(&self) -> impl Iterator<Item = PaletteEntry<'_>> + '_ {
        self.grid.iter().enumerate().flat_map(move |(r, row)| {
            row.iter().enumerate().map(move |(c, &color)| PaletteEntry {
                palette: &self.name,
                color,
                row: r + 1,
                column: c + 1,
            })
        })
    }

    pub fn get(&self, cell: CellRef) -> Option<Color> {
        let row = self.grid.get(cell.row.checked_sub(1)?)?;
        row.get(cell.column.checked_sub(1)?).copied()
    }
}

/// The full, ordered collection of palettes. Immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaletteSet {
    palettes: Vec<Palette>,
}

impl PaletteSet {
    /// Build a set from palettes in order. A repeated name replaces the
    /// earlier palette in place.
    pub fn new(palettes: impl IntoIterator<Item = Palette>) -> Self {
        let mut out: Vec<Palette> = Vec::new();
        for p in palettes {
            match out.iter_mut().find(|existing| existing.name == p.name) {
                Some(existing) => *existing = p,
                None => out.push(p),
            }
        }
        Self { palettes: out }
    }

    /// Parse a JSON dataset: `{ "Name": [["#RRGGBB", ...], ...], ... }`.
    pub fn from_json(json: &str) -> Result<Self, PaletteError> {
        let raw: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;

        let mut palettes = Vec::with_capacity(raw.len());
        for (name, value) in raw {
            let rows: Vec<Vec<String>> = serde_json::from_value(value).map_err(|source| {
                PaletteError::InvalidGrid {
                    palette: name.clone(),
                    source,
                }
            })?;
            palettes.push(Palette::from_hex_rows(&name, &rows)?);
        }

        tracing::debug!(palettes = palettes.len(), "parsed palette dataset");
        Ok(Self::new(palettes))
    }

    /// Load a JSON dataset from disk.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read {}", path.display()))?;
        let set = Self::from_json(&raw).with_context(|| format!("parse {}", path.display()))?;
        Ok(set)
    }

    /// The dataset compiled into the binary.
    pub fn builtin() -> Self {
        builtin::BUILTIN.clone()
    }

    pub fn as_slice(&self) -> &[Palette] {
        &self.palettes
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.palettes.iter().map(|p| p.name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&Palette> {
        self.palettes.iter().find(|p| p.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.palettes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.palettes.is_empty()
    }

    /// Look up a cell by palette name and reference such as `B3`.
    pub fn cell(&self, name: &str, reference: &str) -> Result<Color, PaletteError> {
        let palette = self
            .get(name)
            .ok_or_else(|| PaletteError::UnknownPalette(name.to_string()))?;
        let cell: CellRef = reference.parse()?;
        palette.get(cell).ok_or_else(|| PaletteError::CellOutOfRange {
            palette: name.to_string(),
            cell,
        })
    }
}
