//! Spreadsheet-style cell references (`A1`, `C12`, `AA3`).
//!
//! Columns are lettered from `A` (column 1), rows are numbered from 1.

use std::fmt;
use std::str::FromStr;

use super::PaletteError;

/// 1-based grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRef {
    pub row: usize,
    pub column: usize,
}

impl CellRef {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    /// Alternative `r3c2` label.
    pub fn numeric_label(&self) -> String {
        format!("r{}c{}", self.row, self.column)
    }
}

/// Letter label for a 1-based column: 1 -> `A`, 26 -> `Z`, 27 -> `AA`.
pub fn column_label(column: usize) -> String {
    let mut n = column;
    let mut out = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        out.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_label(self.column), self.row)
    }
}

impl FromStr for CellRef {
    type Err = PaletteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PaletteError::InvalidCell(s.to_string());

        let s_trim = s.trim();
        let split = s_trim
            .find(|c: char| !c.is_ascii_alphabetic())
            .ok_or_else(invalid)?;
        let (letters, digits) = s_trim.split_at(split);
        if letters.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let mut column: usize = 0;
        for b in letters.bytes() {
            let v = usize::from(b.to_ascii_uppercase() - b'A' + 1);
            column = column
                .checked_mul(26)
                .and_then(|c| c.checked_add(v))
                .ok_or_else(invalid)?;
        }

        let row: usize = digits.parse().map_err(|_| invalid())?;
        if row == 0 {
            return Err(invalid());
        }

        Ok(Self { row, column })
    }
}
