//! Tick-mark layout along a ruler.
//!
//! Produces renderer-agnostic data: where each tick sits (as a fraction
//! of the ruler) and how prominent it is. Tick lengths are in display
//! pixels, since marks keep a constant on-screen size while zooming.

use serde::Serialize;

use crate::ruler::clamp_divisions;
use crate::types::Point;

/// Prominence of a tick mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TickKind {
    /// The midpoint of an evenly divided ruler.
    Major,
    /// The 1/4 and 3/4 points of rulers with at least four divisions.
    Quarter,
    /// Every other division boundary.
    Minor,
}

impl TickKind {
    /// Display length of the mark in pixels.
    #[must_use]
    pub const fn length(self) -> f64 {
        match self {
            Self::Major => 12.0,
            Self::Quarter => 9.0,
            Self::Minor => 7.0,
        }
    }
}

/// A single interior tick mark.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TickMark {
    /// Position along the ruler, strictly between 0 and 1.
    pub fraction: f64,
    pub kind: TickKind,
}

impl TickMark {
    /// Position of this tick on the segment `start -> end`.
    #[must_use]
    pub fn position_on(self, start: Point, end: Point) -> Point {
        start.lerp(end, self.fraction)
    }
}

/// Interior tick marks for a ruler split into `divisions` equal parts.
///
/// Endpoints are not included (they get T-shaped caps instead).
/// `divisions` is clamped like every other division count.
#[must_use]
pub fn tick_marks(divisions: u8) -> Vec<TickMark> {
    let divisions = u32::from(clamp_divisions(divisions));
    (1..divisions)
        .map(|i| {
            let kind = if divisions % 2 == 0 && i * 2 == divisions {
                TickKind::Major
            } else if divisions >= 4 && (i * 4 == divisions || i * 4 == 3 * divisions) {
                TickKind::Quarter
            } else {
                TickKind::Minor
            };
            TickMark {
                fraction: f64::from(i) / f64::from(divisions),
                kind,
            }
        })
        .collect()
}
