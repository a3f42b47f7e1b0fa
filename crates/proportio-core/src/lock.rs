//! Locked ratios: the comparison history.
//!
//! A [`LockedRatio`] stores value copies of the two rulers it compares,
//! never references to the live ones. The copies only change through
//! [`LockRegistry::resync`], which the session calls after a ruler's
//! geometry changes. Lock identity (`id`, `color`, `created_at`) is fixed
//! at creation and survives every resync.

use serde::Serialize;

use crate::ratio::simplify_lengths;
use crate::ruler::{Ruler, RulerRegistry};
use crate::types::{LockId, RulerId};

/// A saved comparison between two rulers. `ruler_a` is the numerator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LockedRatio {
    id: LockId,
    ruler_a: Ruler,
    ruler_b: Ruler,
    ratio: f64,
    simple_ratio: String,
    actual_ratio: String,
    color: String,
    created_at: u64,
}

impl LockedRatio {
    /// Build a lock from the current state of two rulers.
    ///
    /// Returns `None` if either ruler has zero length.
    #[must_use]
    pub fn new(id: LockId, ruler_a: &Ruler, ruler_b: &Ruler, color: String, created_at: u64) -> Option<Self> {
        let (ratio, approx) = simplify_lengths(ruler_a.length(), ruler_b.length())?;
        Some(Self {
            id,
            ruler_a: ruler_a.clone(),
            ruler_b: ruler_b.clone(),
            ratio,
            simple_ratio: approx.simple_ratio,
            actual_ratio: approx.actual_ratio,
            color,
            created_at,
        })
    }

    #[must_use]
    pub const fn id(&self) -> LockId {
        self.id
    }

    /// Copy of the numerator ruler as of the last sync.
    #[must_use]
    pub const fn ruler_a(&self) -> &Ruler {
        &self.ruler_a
    }

    /// Copy of the denominator ruler as of the last sync.
    #[must_use]
    pub const fn ruler_b(&self) -> &Ruler {
        &self.ruler_b
    }

    /// Unsimplified `length_a / length_b`.
    #[must_use]
    pub const fn ratio(&self) -> f64 {
        self.ratio
    }

    #[must_use]
    pub fn simple_ratio(&self) -> &str {
        &self.simple_ratio
    }

    #[must_use]
    pub fn actual_ratio(&self) -> &str {
        &self.actual_ratio
    }

    #[must_use]
    pub fn color(&self) -> &str {
        &self.color
    }

    /// Milliseconds since the Unix epoch at creation. Informational only.
    #[must_use]
    pub const fn created_at(&self) -> u64 {
        self.created_at
    }

    /// Ids of `ruler_a` and `ruler_b`, in that order.
    #[must_use]
    pub const fn ruler_ids(&self) -> [RulerId; 2] {
        [self.ruler_a.id(), self.ruler_b.id()]
    }

    #[must_use]
    pub fn references(&self, ruler_id: RulerId) -> bool {
        self.ruler_a.id() == ruler_id || self.ruler_b.id() == ruler_id
    }

    /// Replace both copies and recompute the ratio.
    ///
    /// Leaves the lock untouched and returns `false` if either ruler is
    /// now zero-length, so the stored copies always describe a valid
    /// comparison.
    fn resync_from(&mut self, ruler_a: &Ruler, ruler_b: &Ruler) -> bool {
        let Some((ratio, approx)) = simplify_lengths(ruler_a.length(), ruler_b.length()) else {
            return false;
        };
        self.ruler_a = ruler_a.clone();
        self.ruler_b = ruler_b.clone();
        self.ratio = ratio;
        self.simple_ratio = approx.simple_ratio;
        self.actual_ratio = approx.actual_ratio;
        true
    }
}

/// Comparison history, in creation order.
#[derive(Debug, Clone, Default)]
pub struct LockRegistry {
    locks: Vec<LockedRatio>,
}

impl LockRegistry {
    #[must_use]
    pub const fn new() -> Self {
        Self { locks: Vec::new() }
    }

    pub fn push(&mut self, lock: LockedRatio) {
        self.locks.push(lock);
    }

    /// Remove and return the lock with `id`, if present.
    pub fn remove(&mut self, id: LockId) -> Option<LockedRatio> {
        let index = self.locks.iter().position(|l| l.id == id)?;
        Some(self.locks.remove(index))
    }

    /// Remove every lock that references `ruler_id` on either side.
    ///
    /// Returns the ids of the removed locks.
    pub fn remove_related(&mut self, ruler_id: RulerId) -> Vec<LockId> {
        let mut removed = Vec::new();
        self.locks.retain(|lock| {
            if lock.references(ruler_id) {
                removed.push(lock.id);
                false
            } else {
                true
            }
        });
        removed
    }

    /// Refresh every lock that references `ruler_id` from the live rulers.
    ///
    /// Both sides are re-fetched, not just the edited one. Locks whose
    /// rulers are missing or degenerate are skipped. Returns how many
    /// locks were updated.
    pub fn resync(&mut self, ruler_id: RulerId, rulers: &RulerRegistry) -> usize {
        let mut updated = 0;
        for lock in self.locks.iter_mut().filter(|l| l.references(ruler_id)) {
            let [a_id, b_id] = lock.ruler_ids();
            let (Some(a), Some(b)) = (rulers.get(a_id), rulers.get(b_id)) else {
                log::trace!("skipping resync of {}: referenced ruler missing", lock.id);
                continue;
            };
            if lock.resync_from(a, b) {
                updated += 1;
            } else {
                log::trace!("skipping resync of {}: degenerate ruler length", lock.id);
            }
        }
        updated
    }

    #[must_use]
    pub fn get(&self, id: LockId) -> Option<&LockedRatio> {
        self.locks.iter().find(|l| l.id == id)
    }

    /// All locks referencing `ruler_id`, in creation order.
    pub fn locks_for_ruler(&self, ruler_id: RulerId) -> impl Iterator<Item = &LockedRatio> {
        self.locks.iter().filter(move |l| l.references(ruler_id))
    }

    #[must_use]
    pub fn as_slice(&self) -> &[LockedRatio] {
        &self.locks
    }

    pub fn iter(&self) -> impl Iterator<Item = &LockedRatio> {
        self.locks.iter()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.locks.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }

    pub fn clear(&mut self) {
        self.locks.clear();
    }
}
