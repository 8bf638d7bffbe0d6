//! Text and JSON rendering of search outcomes and palettes.

use serde::Serialize;
use std::fmt::Write;

use crate::config::{DisplayConfig, PositionStyle};
use crate::matcher::{EmptyReason, MatchResult, SearchOutcome};
use crate::palette::Palette;

pub fn empty_message(reason: EmptyReason) -> &'static str {
    match reason {
        EmptyReason::InvalidInput => "Please enter a valid hex color (e.g. #AABBCC).",
        EmptyReason::NoCandidates => {
            "No palettes to search: none are marked as owned. Mark some with `swatch own` or search all palettes."
        }
        EmptyReason::NoMatches => "No matches found with the current filters.",
    }
}

fn position(m: &MatchResult, style: PositionStyle) -> String {
    match style {
        PositionStyle::Letter => m.position(),
        PositionStyle::Numeric => m.cell().numeric_label(),
    }
}

pub fn render_text(outcome: &SearchOutcome, display: &DisplayConfig) -> String {
    let matches = match outcome {
        SearchOutcome::Matches(m) => m,
        SearchOutcome::Empty(reason) => return format!("{}\n", empty_message(*reason)),
    };

    let decimals = usize::from(display.distance_decimals);
    let pos_width = matches
        .iter()
        .map(|m| position(m, display.position_style).len())
        .max()
        .unwrap_or(0);
    let name_width = matches.iter().map(|m| m.palette.len()).max().unwrap_or(0);

    let mut out = format!("Top {} closest matches:\n", matches.len());
    for (i, m) in matches.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>2}. {}  {:<name_width$}  {:<pos_width$}  distance {:.decimals$}",
            i + 1,
            m.hex,
            m.palette,
            position(m, display.position_style),
            m.distance,
        );
    }
    out
}

#[derive(Serialize)]
struct JsonMatch<'a> {
    #[serde(flatten)]
    result: &'a MatchResult,
    position: String,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<EmptyReason>,
    matches: Vec<JsonMatch<'a>>,
}

pub fn render_json(outcome: &SearchOutcome, display: &DisplayConfig) -> anyhow::Result<String> {
    let report = JsonReport {
        status: if outcome.empty_reason().is_some() { "empty" } else { "ok" },
        reason: outcome.empty_reason(),
        matches: outcome
            .matches()
            .iter()
            .map(|m| JsonMatch {
                result: m,
                position: position(m, display.position_style),
            })
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

/// Palette name, ownership mark and grid with column letters.
pub fn render_palette(palette: &Palette, owned: bool) -> String {
    let mark = if owned { "[x]" } else { "[ ]" };
    let mut out = format!("{mark} {} ({} colors)\n", palette.name(), palette.color_count());

    let columns = palette.rows().iter().map(Vec::len).max().unwrap_or(0);
    if columns == 0 {
        return out;
    }

    out.push_str("      ");
    for c in 1..=columns {
        let _ = write!(out, " {:^7}", crate::palette::cell::column_label(c));
    }
    out.push('\n');
    for (r, row) in palette.rows().iter().enumerate() {
        let _ = write!(out, "  {:>3} ", r + 1);
        for color in row {
            let _ = write!(out, " {color}");
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    fn sample_outcome() -> SearchOutcome {
        SearchOutcome::Matches(vec![
            MatchResult {
                palette: "Gray".into(),
                hex: "#000000".into(),
                distance: 0.0,
                row: 1,
                column: 1,
            },
            MatchResult {
                palette: "Warm Tones".into(),
                hex: "#110000".into(),
                distance: 17.0,
                row: 3,
                column: 2,
            },
        ])
    }

    #[test]
    fn test_text_report() {
        let text = render_text(&sample_outcome(), &DisplayConfig::default());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Top 2 closest matches:");
        assert_eq!(lines[1], " 1. #000000  Gray        A1  distance 0.0");
        assert_eq!(lines[2], " 2. #110000  Warm Tones  B3  distance 17.0");
    }

    #[test]
    fn test_numeric_positions_and_decimals() {
        let display = DisplayConfig {
            distance_decimals: 2,
            position_style: PositionStyle::Numeric,
        };
        let text = render_text(&sample_outcome(), &display);
        assert!(text.contains("r3c2  distance 17.00"));
    }

    #[test]
    fn test_empty_reasons_have_distinct_messages() {
        let display = DisplayConfig::default();
        let msgs: Vec<String> = [
            EmptyReason::InvalidInput,
            EmptyReason::NoCandidates,
            EmptyReason::NoMatches,
        ]
        .into_iter()
        .map(|r| render_text(&SearchOutcome::Empty(r), &display))
        .collect();
        assert_ne!(msgs[0], msgs[1]);
        assert_ne!(msgs[1], msgs[2]);
        assert_ne!(msgs[0], msgs[2]);
    }

    #[test]
    fn test_json_report() {
        let display = DisplayConfig::default();
        let raw = render_json(&sample_outcome(), &display).unwrap();
        let v: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(v["status"], "ok");
        assert!(v.get("reason").is_none());
        assert_eq!(v["matches"][1]["palette"], "Warm Tones");
        assert_eq!(v["matches"][1]["position"], "B3");
        assert_eq!(v["matches"][1]["row"], 3);

        let raw = render_json(&SearchOutcome::Empty(EmptyReason::NoCandidates), &display).unwrap();
        let v: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(v["status"], "empty");
        assert_eq!(v["reason"], "no_candidates");
        assert_eq!(v["matches"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_render_palette_grid() {
        let p = Palette::new(
            "Duo",
            vec![
                vec![Color::new(0, 0, 0), Color::new(255, 255, 255)],
                vec![Color::new(255, 0, 0)],
            ],
        );
        let text = render_palette(&p, true);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "[x] Duo (3 colors)");
        assert!(lines[1].contains('A') && lines[1].contains('B'));
        assert_eq!(lines[2], "    1  #000000 #FFFFFF");
        assert_eq!(lines[3], "    2  #FF0000");

        let empty = render_palette(&Palette::new("Blank", vec![]), false);
        assert_eq!(empty, "[ ] Blank (0 colors)\n");
    }
}
