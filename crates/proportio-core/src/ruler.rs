//! Rulers and the ordered registry that owns them.
//!
//! A [`Ruler`] caches its `length` and `angle`; both are recomputed by
//! the single endpoint setter so no code path can move an endpoint
//! without refreshing them. Selection flags are only written by
//! [`RulerRegistry`], which enforces exclusivity.
//!
//! Cross-registry effects (lock cascades, mode transitions) are the
//! [`Session`](crate::session::Session)'s job, not the registry's.

use serde::{Deserialize, Serialize};

use crate::types::{Point, RulerColorPolicy, RulerId};

/// Fewest divisions a ruler can show.
pub const MIN_DIVISIONS: u8 = 2;

/// Most divisions a ruler can show.
pub const MAX_DIVISIONS: u8 = 10;

/// Clamp a requested division count into `[MIN_DIVISIONS, MAX_DIVISIONS]`.
#[must_use]
pub fn clamp_divisions(divisions: u8) -> u8 {
    divisions.clamp(MIN_DIVISIONS, MAX_DIVISIONS)
}

/// A persistent measurement line placed on the image.
///
/// Serializes for render snapshots; it is never deserialized because
/// the cached `length`/`angle` must come from the endpoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ruler {
    id: RulerId,
    start_point: Point,
    end_point: Point,
    length: f64,
    angle: f64,
    color: String,
    divisions: u8,
    is_selected: bool,
    is_compare_selected: bool,
}

impl Ruler {
    /// Create an unselected ruler. `divisions` is clamped.
    #[must_use]
    pub fn new(id: RulerId, start_point: Point, end_point: Point, color: String, divisions: u8) -> Self {
        let mut ruler = Self {
            id,
            start_point,
            end_point,
            length: 0.0,
            angle: 0.0,
            color,
            divisions: clamp_divisions(divisions),
            is_selected: false,
            is_compare_selected: false,
        };
        ruler.set_endpoints(start_point, end_point);
        ruler
    }

    #[must_use]
    pub const fn id(&self) -> RulerId {
        self.id
    }

    #[must_use]
    pub const fn start_point(&self) -> Point {
        self.start_point
    }

    #[must_use]
    pub const fn end_point(&self) -> Point {
        self.end_point
    }

    /// Euclidean length in image pixels.
    #[must_use]
    pub const fn length(&self) -> f64 {
        self.length
    }

    /// Direction from start to end in degrees.
    #[must_use]
    pub const fn angle(&self) -> f64 {
        self.angle
    }

    #[must_use]
    pub fn color(&self) -> &str {
        &self.color
    }

    #[must_use]
    pub const fn divisions(&self) -> u8 {
        self.divisions
    }

    #[must_use]
    pub const fn is_selected(&self) -> bool {
        self.is_selected
    }

    #[must_use]
    pub const fn is_compare_selected(&self) -> bool {
        self.is_compare_selected
    }

    /// Zero-length rulers may exist but can never be compared.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.length <= 0.0
    }

    fn set_endpoints(&mut self, start_point: Point, end_point: Point) {
        self.start_point = start_point;
        self.end_point = end_point;
        self.length = crate::geometry::distance(start_point, end_point);
        self.angle = crate::geometry::angle_degrees(start_point, end_point);
    }

    /// Merge `patch` into this ruler.
    ///
    /// When the patch changes divisions but carries no color and the
    /// policy is [`RulerColorPolicy::ByDivisions`], the color follows the
    /// new division count.
    pub(crate) fn apply(&mut self, patch: &RulerPatch, policy: &RulerColorPolicy) -> PatchEffect {
        let geometry = patch.touches_geometry();
        if geometry {
            let start = patch.start_point.unwrap_or(self.start_point);
            let end = patch.end_point.unwrap_or(self.end_point);
            self.set_endpoints(start, end);
        }
        if let Some(divisions) = patch.divisions {
            self.divisions = clamp_divisions(divisions);
            if patch.color.is_none() && *policy == RulerColorPolicy::ByDivisions {
                self.color = policy.color_for(self.divisions);
            }
        }
        if let Some(color) = &patch.color {
            self.color.clone_from(color);
        }
        PatchEffect {
            geometry_changed: geometry,
        }
    }
}

/// Partial update for [`Session::update_ruler`](crate::session::Session::update_ruler).
///
/// `None` fields are left untouched. Length and angle are not patchable;
/// they follow the endpoints.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RulerPatch {
    pub start_point: Option<Point>,
    pub end_point: Option<Point>,
    pub color: Option<String>,
    pub divisions: Option<u8>,
}

impl RulerPatch {
    /// Patch that moves both endpoints.
    #[must_use]
    pub const fn endpoints(start_point: Point, end_point: Point) -> Self {
        Self {
            start_point: Some(start_point),
            end_point: Some(end_point),
            color: None,
            divisions: None,
        }
    }

    /// Patch that moves only the end point.
    #[must_use]
    pub const fn end_point(end_point: Point) -> Self {
        Self {
            start_point: None,
            end_point: Some(end_point),
            color: None,
            divisions: None,
        }
    }

    /// Patch that changes only the division count.
    #[must_use]
    pub const fn divisions(divisions: u8) -> Self {
        Self {
            start_point: None,
            end_point: None,
            color: None,
            divisions: Some(divisions),
        }
    }

    /// Whether applying this patch can change length or angle.
    #[must_use]
    pub const fn touches_geometry(&self) -> bool {
        self.start_point.is_some() || self.end_point.is_some()
    }
}

/// What applying a [`RulerPatch`] changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PatchEffect {
    pub geometry_changed: bool,
}

/// Ordered collection of rulers, in creation order.
#[derive(Debug, Clone, Default)]
pub struct RulerRegistry {
    rulers: Vec<Ruler>,
}

impl RulerRegistry {
    #[must_use]
    pub const fn new() -> Self {
        Self { rulers: Vec::new() }
    }

    /// Append a ruler. Id uniqueness is the caller's responsibility.
    pub fn add(&mut self, ruler: Ruler) {
        self.rulers.push(ruler);
    }

    /// Remove and return the ruler with `id`, if present.
    pub fn remove(&mut self, id: RulerId) -> Option<Ruler> {
        let index = self.rulers.iter().position(|r| r.id == id)?;
        Some(self.rulers.remove(index))
    }

    #[must_use]
    pub fn get(&self, id: RulerId) -> Option<&Ruler> {
        self.rulers.iter().find(|r| r.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: RulerId) -> Option<&mut Ruler> {
        self.rulers.iter_mut().find(|r| r.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: RulerId) -> bool {
        self.get(id).is_some()
    }

    /// All rulers in creation order.
    #[must_use]
    pub fn as_slice(&self) -> &[Ruler] {
        &self.rulers
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ruler> {
        self.rulers.iter()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.rulers.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rulers.is_empty()
    }

    /// The selected ruler, if any.
    #[must_use]
    pub fn selected(&self) -> Option<&Ruler> {
        self.rulers.iter().find(|r| r.is_selected)
    }

    /// Rulers carrying the compare flag, in registry order.
    pub fn compare_selected(&self) -> impl Iterator<Item = &Ruler> {
        self.rulers.iter().filter(|r| r.is_compare_selected)
    }

    /// Mark `id` as the only selected ruler.
    ///
    /// Returns `false` (and changes nothing) if `id` is unknown.
    pub(crate) fn select_exclusive(&mut self, id: RulerId) -> bool {
        if !self.contains(id) {
            return false;
        }
        for ruler in &mut self.rulers {
            ruler.is_selected = ruler.id == id;
        }
        true
    }

    pub(crate) fn clear_selected(&mut self) {
        for ruler in &mut self.rulers {
            ruler.is_selected = false;
        }
    }

    /// Set the compare flag on `id`. Returns `false` if `id` is unknown.
    pub(crate) fn set_compare(&mut self, id: RulerId, value: bool) -> bool {
        match self.get_mut(id) {
            Some(ruler) => {
                ruler.is_compare_selected = value;
                true
            }
            None => false,
        }
    }

    pub(crate) fn clear_compare(&mut self) {
        for ruler in &mut self.rulers {
            ruler.is_compare_selected = false;
        }
    }
}
