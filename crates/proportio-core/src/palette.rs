//! Fixed color palettes for rulers and locks.
//!
//! Colors are plain CSS hex strings; the rendering collaborator decides
//! how to paint them.

use crate::ruler::{MAX_DIVISIONS, MIN_DIVISIONS};

/// Ruler colors indexed by `divisions - MIN_DIVISIONS`.
///
/// One entry per supported division count, chosen so adjacent counts
/// are easy to tell apart on photographs.
pub const DIVISION_COLORS: [&str; (MAX_DIVISIONS - MIN_DIVISIONS + 1) as usize] = [
    "#0066ff", // 2 - blue
    "#00cc66", // 3 - green
    "#ff6600", // 4 - orange
    "#cc00cc", // 5 - magenta
    "#ffcc00", // 6 - yellow
    "#ff0066", // 7 - pink
    "#6600ff", // 8 - purple
    "#00ccff", // 9 - cyan
    "#ff3300", // 10 - red
];

/// Color used when a division count falls outside the supported range.
pub const DEFAULT_RULER_COLOR: &str = DIVISION_COLORS[0];

/// Default lock palette. Cycles when more locks than entries exist.
pub const DEFAULT_LOCK_PALETTE: &[&str] = &[
    "#e6194b", // red
    "#3cb44b", // green
    "#4363d8", // blue
    "#f58231", // orange
    "#911eb4", // purple
    "#42d4f4", // cyan
    "#f032e6", // magenta
    "#bfef45", // lime
];

/// Ruler color for a division count.
///
/// Out-of-range counts fall back to [`DEFAULT_RULER_COLOR`] rather than
/// being clamped.
#[must_use]
pub fn color_for_divisions(divisions: u8) -> &'static str {
    if (MIN_DIVISIONS..=MAX_DIVISIONS).contains(&divisions) {
        DIVISION_COLORS[usize::from(divisions - MIN_DIVISIONS)]
    } else {
        DEFAULT_RULER_COLOR
    }
}

/// Lock color for the `sequence`-th lock ever created in a session.
///
/// Returns `None` only for an empty palette, which session config
/// validation rules out.
#[must_use]
pub fn lock_color(palette: &[String], sequence: u64) -> Option<&str> {
    if palette.is_empty() {
        return None;
    }
    let len = palette.len() as u64;
    #[allow(clippy::cast_possible_truncation)]
    let index = (sequence % len) as usize;
    palette.get(index).map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_supported_division_has_a_distinct_color() {
        let colors: Vec<&str> = (MIN_DIVISIONS..=MAX_DIVISIONS)
            .map(color_for_divisions)
            .collect();
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn default_division_count_is_orange() {
        assert_eq!(color_for_divisions(4), "#ff6600");
    }

    #[test]
    fn out_of_range_divisions_fall_back() {
        assert_eq!(color_for_divisions(0), DEFAULT_RULER_COLOR);
        assert_eq!(color_for_divisions(1), DEFAULT_RULER_COLOR);
        assert_eq!(color_for_divisions(11), DEFAULT_RULER_COLOR);
    }

    #[test]
    fn lock_colors_cycle() {
        let palette = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let picked: Vec<&str> = (0..5).filter_map(|i| lock_color(&palette, i)).collect();
        assert_eq!(picked, ["a", "b", "c", "a", "b"]);
    }

    #[test]
    fn empty_lock_palette_yields_none() {
        assert_eq!(lock_color(&[], 3), None);
    }
}
