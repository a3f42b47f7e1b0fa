//! Ratio simplification: continuous length ratio to a small-integer ratio.
//!
//! A measured ratio such as `1.4986` is hard to read; artists want
//! "3:2". [`simplify`] searches the `1..=10` grid for the closest pair,
//! restricted to pairs whose sum is divisible by 2 or 3. The filter
//! skews results toward ratios that read as visually clean: `6:5` is
//! never produced, so `1.2` becomes `5:4`.
//!
//! Alongside the simplified pair, the measured ratio is re-expressed on
//! the simplified denominator's scale (`actual_ratio`), so a user can
//! see how far `5:4` is from the real `4.8:4`.

use serde::{Deserialize, Serialize};

/// Largest numerator or denominator considered by the search.
pub const MAX_TERM: u32 = 10;

/// Result of simplifying a length ratio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioApproximation {
    /// Reduced numerator `p` of the best candidate.
    pub numerator: u32,
    /// Reduced denominator `q` of the best candidate.
    pub denominator: u32,
    /// `"p:q"`.
    pub simple_ratio: String,
    /// `"x:q"` where `x = q * ratio`, at most two decimals.
    pub actual_ratio: String,
}

/// Whether `(x, y)` is an admissible candidate pair.
const fn is_candidate(x: u32, y: u32) -> bool {
    let sum = x + y;
    sum % 2 == 0 || sum % 3 == 0
}

/// Simplify a positive ratio into a `"p:q"` pair with terms in `1..=10`.
///
/// Scans `x` then `y` ascending, keeping the first candidate with the
/// strictly smallest `|ratio - x/y|`, seeded with `(1, 1)`. The winner is
/// reduced by its greatest common divisor. At most 100 candidates are
/// evaluated regardless of magnitude.
///
/// The caller is responsible for passing a finite ratio greater than
/// zero; see [`simplify_lengths`] for a checked entry point.
///
/// # Examples
///
/// ```
/// use proportio_core::ratio::simplify;
///
/// let r = simplify(1.5);
/// assert_eq!(r.simple_ratio, "3:2");
/// assert_eq!(r.actual_ratio, "3:2");
/// ```
#[must_use = "returns the simplified ratio"]
pub fn simplify(ratio: f64) -> RatioApproximation {
    let mut best = (1_u32, 1_u32);
    let mut best_error = (ratio - 1.0).abs();

    for x in 1..=MAX_TERM {
        for y in 1..=MAX_TERM {
            if !is_candidate(x, y) {
                continue;
            }
            let error = (ratio - f64::from(x) / f64::from(y)).abs();
            if error < best_error {
                best_error = error;
                best = (x, y);
            }
        }
    }

    let divisor = gcd(best.0, best.1);
    let numerator = best.0 / divisor;
    let denominator = best.1 / divisor;

    let actual_denominator = f64::from(denominator);
    let actual_numerator = actual_denominator * ratio;

    RatioApproximation {
        numerator,
        denominator,
        simple_ratio: format!("{numerator}:{denominator}"),
        actual_ratio: format!(
            "{}:{}",
            format_decimal(actual_numerator),
            format_decimal(actual_denominator)
        ),
    }
}

/// Simplify `length_a / length_b`, refusing degenerate input.
///
/// Returns `None` unless both lengths are finite and strictly positive;
/// a zero-length ruler can never be compared.
#[must_use]
pub fn simplify_lengths(length_a: f64, length_b: f64) -> Option<(f64, RatioApproximation)> {
    if !(length_a.is_finite() && length_b.is_finite()) || length_a <= 0.0 || length_b <= 0.0 {
        return None;
    }
    let ratio = length_a / length_b;
    Some((ratio, simplify(ratio)))
}

/// Format with at most two decimals, trimming trailing zeros and a
/// dangling decimal point (`2.00` -> `2`, `4.80` -> `4.8`).
#[must_use]
pub fn format_decimal(value: f64) -> String {
    let mut s = format!("{value:.2}");
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.');
        s.truncate(trimmed.len());
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}

/// Greatest common divisor (Euclid). `gcd(0, n) == n`.
const fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a
}
