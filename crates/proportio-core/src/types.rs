//! Shared types for the proportio measurement engine.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::palette::DEFAULT_LOCK_PALETTE;
use crate::ruler::{MAX_DIVISIONS, MIN_DIVISIONS};

/// A 2D point in image coordinates.
///
/// Image space is independent of how the image is currently zoomed or
/// panned on screen; see [`ViewTransform`](crate::viewport::ViewTransform)
/// for the mapping to display pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position (pixels from left edge).
    pub x: f64,
    /// Vertical position (pixels from top edge).
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another point.
    ///
    /// Avoids the square root for comparison purposes.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.mul_add(dx, dy * dy)
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Direction from `self` towards `other` in degrees, in `(-180, 180]`.
    ///
    /// Coincident points have no direction; `0.0` is returned.
    #[must_use]
    pub fn angle_to(self, other: Self) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        if dx == 0.0 && dy == 0.0 {
            return 0.0;
        }
        dy.atan2(dx).to_degrees()
    }

    /// Linear interpolation: `t = 0` yields `self`, `t = 1` yields `other`.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self {
            x: (other.x - self.x).mul_add(t, self.x),
            y: (other.y - self.y).mul_add(t, self.y),
        }
    }
}

/// Identifier of a [`Ruler`](crate::ruler::Ruler).
///
/// Allocated by the owning [`Session`](crate::session::Session) from a
/// monotonic counter; never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RulerId(pub u64);

impl fmt::Display for RulerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ruler-{}", self.0)
    }
}

/// Identifier of a [`LockedRatio`](crate::lock::LockedRatio).
///
/// Like [`RulerId`], drawn from a per-session counter rather than the
/// clock, so two locks created in the same millisecond stay distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LockId(pub u64);

impl fmt::Display for LockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lock-{}", self.0)
    }
}

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// How a newly created ruler picks its display color.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum RulerColorPolicy {
    /// Color follows the division count (see
    /// [`color_for_divisions`](crate::palette::color_for_divisions)).
    /// Changing divisions without an explicit color recolors the ruler.
    #[default]
    ByDivisions,
    /// Every ruler starts with the same color.
    Fixed {
        /// CSS-style color string.
        color: String,
    },
}

impl RulerColorPolicy {
    /// Color for a ruler with the given division count.
    #[must_use]
    pub fn color_for(&self, divisions: u8) -> String {
        match self {
            Self::ByDivisions => crate::palette::color_for_divisions(divisions).to_string(),
            Self::Fixed { color } => color.clone(),
        }
    }
}

/// Configuration for a measurement session.
///
/// Validated once by [`Session::new`](crate::session::Session::new);
/// every field has a default matching the stock application behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Division count given to newly created rulers.
    ///
    /// Must lie in `[MIN_DIVISIONS, MAX_DIVISIONS]`.
    pub default_divisions: u8,

    /// Color policy for newly created rulers.
    pub ruler_colors: RulerColorPolicy,

    /// Colors handed out to locks in creation order, wrapping around.
    ///
    /// Must not be empty.
    pub lock_palette: Vec<String>,

    /// Whether completing a compare pair saves a lock automatically.
    pub auto_lock: bool,
}

impl SessionConfig {
    /// Default division count for new rulers.
    pub const DEFAULT_DIVISIONS: u8 = 4;

    /// Default for [`auto_lock`](Self::auto_lock).
    pub const DEFAULT_AUTO_LOCK: bool = true;

    /// Check the invariants documented on each field.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidConfig`] describing the first
    /// violated invariant.
    pub fn validate(&self) -> Result<(), SessionError> {
        if !(MIN_DIVISIONS..=MAX_DIVISIONS).contains(&self.default_divisions) {
            return Err(SessionError::InvalidConfig(format!(
                "default_divisions must be in {MIN_DIVISIONS}..={MAX_DIVISIONS}, got {}",
                self.default_divisions
            )));
        }
        if self.lock_palette.is_empty() {
            return Err(SessionError::InvalidConfig(
                "lock_palette must contain at least one color".to_string(),
            ));
        }
        if let RulerColorPolicy::Fixed { color } = &self.ruler_colors
            && color.trim().is_empty()
        {
            return Err(SessionError::InvalidConfig(
                "fixed ruler color must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_divisions: Self::DEFAULT_DIVISIONS,
            ruler_colors: RulerColorPolicy::default(),
            lock_palette: DEFAULT_LOCK_PALETTE.iter().map(ToString::to_string).collect(),
            auto_lock: Self::DEFAULT_AUTO_LOCK,
        }
    }
}

/// Errors that can occur when setting up a session.
///
/// Session operations themselves never fail: unknown ids and unmet
/// preconditions are no-ops reported through return values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum SessionError {
    /// Session configuration is invalid.
    #[error("invalid session configuration: {0}")]
    InvalidConfig(String),
}
