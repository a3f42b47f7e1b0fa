//! The measurement session: one controller that owns every registry.
//!
//! [`Session`] is the only writer of rulers, locks and interaction
//! state. Operations never fail; an unknown id or an unmet precondition
//! leaves the session untouched, and the return value says whether
//! anything happened. Side effects of mode changes (dropping the
//! selection when a comparison starts, and the reverse) are applied by
//! the operation that causes them, so the derived mode always agrees
//! with the ruler flags.
//!
//! Renderers read a [`SessionSnapshot`], which is taken between
//! operations and therefore always consistent.

use serde::Serialize;

use crate::clock::{Clock, SystemClock};
use crate::interaction::{DragType, InteractionContext, InteractionMode, MAX_COMPARISON};
use crate::lock::{LockRegistry, LockedRatio};
use crate::palette::{DEFAULT_LOCK_PALETTE, lock_color};
use crate::ruler::{Ruler, RulerPatch, RulerRegistry, clamp_divisions};
use crate::types::{Dimensions, LockId, Point, RulerId, SessionConfig, SessionError};
use crate::viewport::ViewTransform;

// ───────────────────────── Read-model types ──────────────────────────

/// A ruler that is being drawn and has not been committed yet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RulerDraft {
    start_point: Point,
    end_point: Point,
    length: f64,
    angle: f64,
    divisions: u8,
}

impl RulerDraft {
    fn new(start_point: Point, divisions: u8) -> Self {
        Self {
            start_point,
            end_point: start_point,
            length: 0.0,
            angle: 0.0,
            divisions: clamp_divisions(divisions),
        }
    }

    fn set_end(&mut self, end_point: Point) {
        self.end_point = end_point;
        self.length = crate::geometry::distance(self.start_point, end_point);
        self.angle = crate::geometry::angle_degrees(self.start_point, end_point);
    }

    #[must_use]
    pub const fn start_point(&self) -> Point {
        self.start_point
    }

    #[must_use]
    pub const fn end_point(&self) -> Point {
        self.end_point
    }

    #[must_use]
    pub const fn length(&self) -> f64 {
        self.length
    }

    #[must_use]
    pub const fn angle(&self) -> f64 {
        self.angle
    }

    #[must_use]
    pub const fn divisions(&self) -> u8 {
        self.divisions
    }
}

/// The loaded image as far as the engine cares: its size and how it is
/// currently shown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ImageState {
    pub dimensions: Dimensions,
    pub transform: ViewTransform,
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub mode: InteractionMode,
    /// `mode`, refined to `IMAGE_MANIPULATION` while panning.
    pub activity: InteractionMode,
    pub can_create_ruler: bool,
    pub rulers: Vec<Ruler>,
    pub locks: Vec<LockedRatio>,
    pub selected_ruler: Option<RulerId>,
    pub comparison_rulers: Vec<RulerId>,
    pub highlighted_lock: Option<LockId>,
    pub highlighted_rulers: Vec<RulerId>,
    pub draft: Option<RulerDraft>,
    pub image: Option<ImageState>,
}

// ───────────────────────────── Session ───────────────────────────────

/// One measurement session over one image.
#[derive(Debug)]
pub struct Session<C = SystemClock> {
    config: SessionConfig,
    rulers: RulerRegistry,
    locks: LockRegistry,
    context: InteractionContext,
    image: Option<ImageState>,
    highlighted: Option<LockId>,
    draft: Option<RulerDraft>,
    rulers_created: u64,
    locks_created: u64,
    clock: C,
}

impl Session<SystemClock> {
    /// Create a session timestamping locks with the system clock.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidConfig`] if `config` fails
    /// [`SessionConfig::validate`].
    pub fn new(config: SessionConfig) -> Result<Self, SessionError> {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> Session<C> {
    /// Create a session with an explicit clock.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidConfig`] if `config` fails
    /// [`SessionConfig::validate`].
    pub fn with_clock(config: SessionConfig, clock: C) -> Result<Self, SessionError> {
        config.validate()?;
        log::debug!(
            "session created: default_divisions={}, auto_lock={}, {} lock colors",
            config.default_divisions,
            config.auto_lock,
            config.lock_palette.len(),
        );
        Ok(Self {
            config,
            rulers: RulerRegistry::new(),
            locks: LockRegistry::new(),
            context: InteractionContext::new(),
            image: None,
            highlighted: None,
            draft: None,
            rulers_created: 0,
            locks_created: 0,
            clock,
        })
    }

    // --- queries ---

    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub const fn rulers(&self) -> &RulerRegistry {
        &self.rulers
    }

    #[must_use]
    pub fn ruler(&self, id: RulerId) -> Option<&Ruler> {
        self.rulers.get(id)
    }

    /// Current state of the selected ruler, looked up live.
    #[must_use]
    pub fn selected_ruler(&self) -> Option<&Ruler> {
        self.context.selected_ruler().and_then(|id| self.rulers.get(id))
    }

    #[must_use]
    pub fn comparison_rulers(&self) -> &[RulerId] {
        self.context.comparison_rulers()
    }

    /// Comparison history in creation order.
    #[must_use]
    pub fn locks(&self) -> &[LockedRatio] {
        self.locks.as_slice()
    }

    #[must_use]
    pub fn lock(&self, id: LockId) -> Option<&LockedRatio> {
        self.locks.get(id)
    }

    /// Locks referencing `ruler_id` on either side, in creation order.
    pub fn locks_for_ruler(&self, ruler_id: RulerId) -> impl Iterator<Item = &LockedRatio> {
        self.locks.locks_for_ruler(ruler_id)
    }

    #[must_use]
    pub const fn highlighted_lock(&self) -> Option<LockId> {
        self.highlighted
    }

    /// Ruler ids of the highlighted history entry; empty when nothing
    /// is highlighted.
    #[must_use]
    pub fn highlighted_rulers(&self) -> Vec<RulerId> {
        self.highlighted
            .and_then(|id| self.locks.get(id))
            .map(|lock| lock.ruler_ids().to_vec())
            .unwrap_or_default()
    }

    #[must_use]
    pub const fn context(&self) -> &InteractionContext {
        &self.context
    }

    #[must_use]
    pub const fn determine_mode(&self) -> InteractionMode {
        self.context.determine_mode()
    }

    #[must_use]
    pub const fn activity(&self) -> InteractionMode {
        self.context.activity()
    }

    /// True only when idle with an image loaded.
    #[must_use]
    pub const fn can_create_ruler(&self) -> bool {
        self.context.can_create_ruler(self.image.is_some())
    }

    #[must_use]
    pub const fn image(&self) -> Option<&ImageState> {
        self.image.as_ref()
    }

    #[must_use]
    pub const fn draft(&self) -> Option<&RulerDraft> {
        self.draft.as_ref()
    }

    /// Consistent copy of everything a renderer reads.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            mode: self.determine_mode(),
            activity: self.activity(),
            can_create_ruler: self.can_create_ruler(),
            rulers: self.rulers.as_slice().to_vec(),
            locks: self.locks.as_slice().to_vec(),
            selected_ruler: self.context.selected_ruler(),
            comparison_rulers: self.context.comparison_rulers().to_vec(),
            highlighted_lock: self.highlighted,
            highlighted_rulers: self.highlighted_rulers(),
            draft: self.draft,
            image: self.image,
        }
    }

    // --- rulers ---

    /// Append a ruler with the configured default divisions and a color
    /// from the ruler color policy.
    pub fn add_ruler(&mut self, start_point: Point, end_point: Point) -> RulerId {
        self.rulers_created += 1;
        let id = RulerId(self.rulers_created);
        let divisions = self.config.default_divisions;
        let color = self.config.ruler_colors.color_for(divisions);
        let ruler = Ruler::new(id, start_point, end_point, color, divisions);
        log::debug!("{id} added: length {:.2}, angle {:.1}", ruler.length(), ruler.angle());
        self.rulers.add(ruler);
        id
    }

    /// Delete a ruler, every lock that references it, and any selection,
    /// comparison slot or highlight pointing at either.
    pub fn remove_ruler(&mut self, id: RulerId) -> bool {
        let before = self.determine_mode();
        if self.rulers.remove(id).is_none() {
            log::trace!("remove_ruler: unknown {id}");
            return false;
        }
        if self.context.selected_ruler() == Some(id) {
            self.context.set_selected(None);
        }
        self.context.remove_comparison(id);
        let cascaded = self.locks.remove_related(id);
        if self.highlighted.is_some_and(|h| cascaded.contains(&h)) {
            self.highlighted = None;
        }
        log::debug!("{id} removed, {} lock(s) cascaded", cascaded.len());
        self.log_transition(before);
        true
    }

    /// Merge `patch` into a ruler. Geometry changes resync every lock
    /// that references it.
    pub fn update_ruler(&mut self, id: RulerId, patch: &RulerPatch) -> bool {
        let Some(ruler) = self.rulers.get_mut(id) else {
            log::trace!("update_ruler: unknown {id}");
            return false;
        };
        let effect = ruler.apply(patch, &self.config.ruler_colors);
        if effect.geometry_changed {
            let resynced = self.locks.resync(id, &self.rulers);
            log::debug!("{id} geometry updated, {resynced} lock(s) resynced");
        } else {
            log::debug!("{id} updated");
        }
        true
    }

    /// Make `id` the only selected ruler. Ends any comparison and
    /// clears the history highlight.
    pub fn select_ruler(&mut self, id: RulerId) -> bool {
        let before = self.determine_mode();
        if !self.rulers.select_exclusive(id) {
            log::trace!("select_ruler: unknown {id}");
            return false;
        }
        self.context.set_selected(Some(id));
        self.drop_comparison();
        self.highlighted = None;
        log::debug!("{id} selected");
        self.log_transition(before);
        true
    }

    /// Deselect every ruler. An active comparison is left alone.
    pub fn clear_selection(&mut self) {
        let before = self.determine_mode();
        self.drop_selection();
        self.log_transition(before);
    }

    /// Deselect every compare-selected ruler.
    pub fn clear_comparison(&mut self) {
        let before = self.determine_mode();
        self.drop_comparison();
        self.log_transition(before);
    }

    /// Add `id` to the comparison, or take it out if it is already in.
    ///
    /// Joining a comparison ends any single-ruler selection. A third
    /// ruler is refused. When the pair completes and `auto_lock` is on,
    /// the new lock's id is returned.
    pub fn toggle_compare(&mut self, id: RulerId) -> Option<LockId> {
        if !self.rulers.contains(id) {
            log::trace!("toggle_compare: unknown {id}");
            return None;
        }
        let before = self.determine_mode();
        if self.context.remove_comparison(id) {
            self.rulers.set_compare(id, false);
            log::debug!("{id} left the comparison");
            self.log_transition(before);
            return None;
        }
        if self.context.comparison_rulers().len() >= MAX_COMPARISON {
            log::trace!("toggle_compare: comparison already full, ignoring {id}");
            return None;
        }
        self.drop_selection();
        self.context.push_comparison(id);
        self.rulers.set_compare(id, true);
        log::debug!("{id} joined the comparison");
        self.log_transition(before);

        if self.config.auto_lock && self.context.comparison_rulers().len() == MAX_COMPARISON {
            self.lock_current()
        } else {
            None
        }
    }

    /// Compare-select `id` as part of a one-gesture comparison.
    ///
    /// Performs exactly one [`toggle_compare`](Self::toggle_compare) and
    /// returns `true` if that toggle completed a pair.
    pub fn start_instant_comparison(&mut self, id: RulerId) -> bool {
        let completes = matches!(self.context.comparison_rulers(), [first] if *first != id);
        self.toggle_compare(id);
        completes && self.context.comparison_rulers().len() == MAX_COMPARISON
    }

    // --- locks ---

    /// Save the current comparison as a lock. The first compare-selected
    /// ruler is the numerator.
    ///
    /// No-op unless exactly two rulers are compare-selected and both
    /// have non-zero length.
    pub fn lock_current(&mut self) -> Option<LockId> {
        let &[a_id, b_id] = self.context.comparison_rulers() else {
            log::trace!("lock_current: need exactly two compare-selected rulers");
            return None;
        };
        let (Some(a), Some(b)) = (self.rulers.get(a_id), self.rulers.get(b_id)) else {
            log::trace!("lock_current: compared ruler missing");
            return None;
        };
        if a.is_degenerate() || b.is_degenerate() {
            log::trace!("lock_current: {a_id} or {b_id} has zero length");
            return None;
        }
        let id = LockId(self.locks_created + 1);
        let color = lock_color(&self.config.lock_palette, self.locks_created)
            .unwrap_or(DEFAULT_LOCK_PALETTE[0])
            .to_string();
        let Some(lock) = LockedRatio::new(id, a, b, color, self.clock.now_millis()) else {
            log::trace!("lock_current: {a_id}/{b_id} has no finite ratio");
            return None;
        };
        self.locks_created += 1;
        log::debug!(
            "{id} created: {a_id}/{b_id} = {:.4} ({}, actual {})",
            lock.ratio(),
            lock.simple_ratio(),
            lock.actual_ratio(),
        );
        self.locks.push(lock);
        Some(id)
    }

    pub fn remove_lock(&mut self, id: LockId) -> bool {
        if self.locks.remove(id).is_none() {
            log::trace!("remove_lock: unknown {id}");
            return false;
        }
        if self.highlighted == Some(id) {
            self.highlighted = None;
        }
        log::debug!("{id} removed");
        true
    }

    /// Remove every lock and the highlight.
    pub fn clear_locks(&mut self) {
        log::debug!("clearing {} lock(s)", self.locks.len());
        self.locks.clear();
        self.highlighted = None;
    }

    /// Re-enter the comparison a lock describes by compare-selecting its
    /// live rulers. Never creates a lock.
    ///
    /// Rulers that no longer exist are skipped.
    pub fn select_lock_for_comparison(&mut self, id: LockId) -> bool {
        let Some(lock) = self.locks.get(id) else {
            log::trace!("select_lock_for_comparison: unknown {id}");
            return false;
        };
        let ruler_ids = lock.ruler_ids();
        let before = self.determine_mode();
        self.drop_selection();
        self.drop_comparison();
        for ruler_id in ruler_ids {
            if self.rulers.set_compare(ruler_id, true) {
                self.context.push_comparison(ruler_id);
            } else {
                log::trace!("select_lock_for_comparison: {ruler_id} of {id} is gone");
            }
        }
        log::debug!("{id} loaded into the comparison");
        self.log_transition(before);
        true
    }

    /// Toggle the history highlight on `id` and return the highlighted
    /// ruler ids.
    ///
    /// Highlighting the current entry again clears it; another entry
    /// replaces it. Unknown ids change nothing.
    pub fn select_history(&mut self, id: LockId) -> Vec<RulerId> {
        if self.highlighted == Some(id) {
            self.highlighted = None;
            log::debug!("{id} unhighlighted");
        } else if self.locks.get(id).is_some() {
            self.highlighted = Some(id);
            log::debug!("{id} highlighted");
        } else {
            log::trace!("select_history: unknown {id}");
        }
        self.highlighted_rulers()
    }

    // --- drag state and creation ---

    /// Record the pointer drag state.
    ///
    /// Starting a `Create` drag ends any selection and comparison. Edit
    /// and pan drags leave both in place even though the mode becomes
    /// `RulerEditing`: that mode is only reported while the drag lasts,
    /// and releasing it returns to the selection or comparison it
    /// interrupted. A draft only lives while a `Create` drag is active.
    pub fn set_drag_state(&mut self, is_dragging: bool, drag_type: DragType) {
        let before = self.determine_mode();
        if is_dragging && drag_type == DragType::Create {
            self.drop_selection();
            self.drop_comparison();
        }
        self.context.set_drag(is_dragging, drag_type);
        if self.context.drag_type() != DragType::Create && self.draft.take().is_some() {
            log::trace!("draft dropped with its drag");
        }
        self.log_transition(before);
    }

    /// Start drawing a ruler at `point` (image space).
    pub fn begin_ruler_creation(&mut self, point: Point) -> bool {
        if !self.can_create_ruler() {
            log::trace!("begin_ruler_creation: not allowed in {:?}", self.determine_mode());
            return false;
        }
        self.set_drag_state(true, DragType::Create);
        self.draft = Some(RulerDraft::new(point, self.config.default_divisions));
        true
    }

    /// Move the provisional end point of the draft.
    pub fn drag_ruler_creation(&mut self, point: Point) -> bool {
        match self.draft.as_mut() {
            Some(draft) => {
                draft.set_end(point);
                true
            }
            None => {
                log::trace!("drag_ruler_creation: no draft");
                false
            }
        }
    }

    /// Commit the draft as a ruler and end the drag.
    ///
    /// A zero-length draft (a click without movement) is discarded.
    pub fn finish_ruler_creation(&mut self) -> Option<RulerId> {
        let draft = self.draft.take();
        self.end_create_drag();
        let Some(draft) = draft else {
            log::trace!("finish_ruler_creation: no draft");
            return None;
        };
        if draft.length <= 0.0 {
            log::debug!("zero-length draft discarded");
            return None;
        }
        Some(self.add_ruler(draft.start_point, draft.end_point))
    }

    /// Abandon the draft, if any.
    pub fn cancel_ruler_creation(&mut self) -> bool {
        let had_draft = self.draft.take().is_some();
        self.end_create_drag();
        had_draft
    }

    // --- image and viewport ---

    /// Record that an image of `dimensions` is shown, at identity
    /// transform. Rulers and locks are kept.
    pub fn load_image(&mut self, dimensions: Dimensions) {
        log::debug!("image loaded: {}x{}", dimensions.width, dimensions.height);
        self.image = Some(ImageState {
            dimensions,
            transform: ViewTransform::IDENTITY,
        });
    }

    /// Forget the image and every transient interaction state.
    pub fn unload_image(&mut self) -> bool {
        let before = self.determine_mode();
        let had_image = self.image.take().is_some();
        self.drop_selection();
        self.drop_comparison();
        self.highlighted = None;
        self.draft = None;
        self.context.set_drag(false, DragType::None);
        if had_image {
            log::debug!("image unloaded");
        }
        self.log_transition(before);
        had_image
    }

    /// Fit the whole image into a `viewport` of display pixels.
    pub fn fit_image(&mut self, viewport: Dimensions) -> bool {
        let Some(image) = self.image.as_mut() else {
            return false;
        };
        image.transform = ViewTransform::fit(image.dimensions, viewport);
        true
    }

    pub fn zoom_about(&mut self, anchor: Point, factor: f64) -> bool {
        let Some(image) = self.image.as_mut() else {
            return false;
        };
        image.transform.zoom_about(anchor, factor);
        true
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) -> bool {
        let Some(image) = self.image.as_mut() else {
            return false;
        };
        image.transform.pan_by(dx, dy);
        true
    }

    // --- internals ---

    fn drop_selection(&mut self) {
        self.rulers.clear_selected();
        self.context.set_selected(None);
    }

    fn drop_comparison(&mut self) {
        self.rulers.clear_compare();
        self.context.clear_comparison();
    }

    fn end_create_drag(&mut self) {
        if self.context.drag_type() == DragType::Create {
            self.set_drag_state(false, DragType::None);
        }
    }

    fn log_transition(&self, before: InteractionMode) {
        let after = self.determine_mode();
        if after != before {
            log::debug!("mode {before:?} -> {after:?}");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;

    fn session() -> Session<FixedClock> {
        Session::with_clock(SessionConfig::default(), FixedClock(1_000)).unwrap()
    }

    fn horizontal(session: &mut Session<FixedClock>, length: f64) -> RulerId {
        session.add_ruler(Point::new(0.0, 0.0), Point::new(length, 0.0))
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = SessionConfig {
            lock_palette: Vec::new(),
            ..SessionConfig::default()
        };
        assert!(Session::with_clock(config, FixedClock(0)).is_err());
    }

    #[test]
    fn ruler_ids_are_never_reused() {
        let mut s = session();
        let a = horizontal(&mut s, 1.0);
        assert!(s.remove_ruler(a));
        let b = horizontal(&mut s, 1.0);
        assert_ne!(a, b);
    }

    #[test]
    fn new_ruler_uses_default_divisions_and_policy_color() {
        let mut s = session();
        let id = horizontal(&mut s, 3.0);
        let r = s.ruler(id).unwrap();
        assert_eq!(r.divisions(), SessionConfig::DEFAULT_DIVISIONS);
        assert_eq!(r.color(), crate::palette::color_for_divisions(4));
    }

    #[test]
    fn selecting_drops_comparison_and_highlight() {
        let mut s = session();
        let a = horizontal(&mut s, 10.0);
        let b = horizontal(&mut s, 5.0);
        let c = horizontal(&mut s, 2.0);
        s.toggle_compare(a);
        let lock = s.toggle_compare(b).unwrap();
        s.select_history(lock);

        assert!(s.select_ruler(c));
        assert!(s.comparison_rulers().is_empty());
        assert_eq!(s.rulers().compare_selected().count(), 0);
        assert_eq!(s.highlighted_lock(), None);
        assert_eq!(s.determine_mode(), InteractionMode::RulerSelected);
    }

    #[test]
    fn comparing_drops_selection() {
        let mut s = session();
        let a = horizontal(&mut s, 10.0);
        let b = horizontal(&mut s, 5.0);
        s.select_ruler(a);
        s.toggle_compare(b);
        assert!(s.selected_ruler().is_none());
        assert!(s.rulers().selected().is_none());
        assert_eq!(s.determine_mode(), InteractionMode::Comparison);
    }

    #[test]
    fn clear_selection_keeps_comparison() {
        let mut s = session();
        let a = horizontal(&mut s, 10.0);
        s.toggle_compare(a);
        s.clear_selection();
        assert_eq!(s.determine_mode(), InteractionMode::Comparison);
        s.clear_comparison();
        assert_eq!(s.determine_mode(), InteractionMode::Idle);
    }

    #[test]
    fn lock_colors_follow_creation_sequence() {
        let mut s = session();
        let a = horizontal(&mut s, 10.0);
        let b = horizontal(&mut s, 5.0);
        assert!(s.lock_current().is_none());
        s.toggle_compare(a);
        let l1 = s.toggle_compare(b).unwrap();
        let l2 = s.lock_current().unwrap();
        assert_eq!(s.lock(l1).unwrap().color(), DEFAULT_LOCK_PALETTE[0]);
        assert_eq!(s.lock(l2).unwrap().color(), DEFAULT_LOCK_PALETTE[1]);
        assert_eq!(s.lock(l1).unwrap().created_at(), 1_000);
    }

    #[test]
    fn auto_lock_can_be_disabled() {
        let config = SessionConfig {
            auto_lock: false,
            ..SessionConfig::default()
        };
        let mut s = Session::with_clock(config, FixedClock(0)).unwrap();
        let a = horizontal(&mut s, 10.0);
        let b = horizontal(&mut s, 5.0);
        s.toggle_compare(a);
        assert_eq!(s.toggle_compare(b), None);
        assert!(s.locks().is_empty());
        assert!(s.lock_current().is_some());
    }

    #[test]
    fn zero_length_pair_is_not_locked() {
        let mut s = session();
        let a = horizontal(&mut s, 10.0);
        let z = horizontal(&mut s, 0.0);
        s.toggle_compare(a);
        assert_eq!(s.toggle_compare(z), None);
        assert!(s.locks().is_empty());
        assert_eq!(s.comparison_rulers(), [a, z]);
    }

    #[test]
    fn creation_requires_image() {
        let mut s = session();
        assert!(!s.begin_ruler_creation(Point::new(1.0, 1.0)));
        s.load_image(Dimensions {
            width: 100,
            height: 100,
        });
        assert!(s.begin_ruler_creation(Point::new(1.0, 1.0)));
        assert_eq!(s.determine_mode(), InteractionMode::RulerCreation);
    }

    #[test]
    fn creation_flow_commits_draft() {
        let mut s = session();
        s.load_image(Dimensions {
            width: 100,
            height: 100,
        });
        s.begin_ruler_creation(Point::new(10.0, 10.0));
        s.drag_ruler_creation(Point::new(10.0, 40.0));
        assert!((s.draft().unwrap().length() - 30.0).abs() < 1e-12);
        let id = s.finish_ruler_creation().unwrap();
        assert!(s.draft().is_none());
        assert_eq!(s.determine_mode(), InteractionMode::Idle);
        assert!((s.ruler(id).unwrap().length() - 30.0).abs() < 1e-12);
    }

    #[test]
    fn click_without_drag_creates_nothing() {
        let mut s = session();
        s.load_image(Dimensions {
            width: 10,
            height: 10,
        });
        s.begin_ruler_creation(Point::new(3.0, 3.0));
        assert_eq!(s.finish_ruler_creation(), None);
        assert!(s.rulers().is_empty());
        assert!(!s.context().is_dragging());
    }

    #[test]
    fn cancel_discards_draft_and_drag() {
        let mut s = session();
        s.load_image(Dimensions {
            width: 10,
            height: 10,
        });
        s.begin_ruler_creation(Point::new(3.0, 3.0));
        assert!(s.cancel_ruler_creation());
        assert!(!s.cancel_ruler_creation());
        assert!(s.draft().is_none());
        assert_eq!(s.determine_mode(), InteractionMode::Idle);
    }

    #[test]
    fn finishing_without_draft_keeps_edit_drag() {
        let mut s = session();
        s.set_drag_state(true, DragType::Edit);
        assert_eq!(s.finish_ruler_creation(), None);
        assert!(s.context().is_dragging());
        assert_eq!(s.context().drag_type(), DragType::Edit);
    }

    #[test]
    fn edit_drag_keeps_selection() {
        let mut s = session();
        let a = horizontal(&mut s, 10.0);
        s.select_ruler(a);
        s.set_drag_state(true, DragType::Edit);
        assert_eq!(s.determine_mode(), InteractionMode::RulerEditing);
        s.set_drag_state(false, DragType::None);
        assert_eq!(s.determine_mode(), InteractionMode::RulerSelected);
    }

    #[test]
    fn unload_image_resets_transient_state() {
        let mut s = session();
        s.load_image(Dimensions {
            width: 10,
            height: 10,
        });
        let a = horizontal(&mut s, 10.0);
        let b = horizontal(&mut s, 5.0);
        s.toggle_compare(a);
        let lock = s.toggle_compare(b).unwrap();
        s.select_history(lock);

        assert!(s.unload_image());
        assert!(s.image().is_none());
        assert!(s.comparison_rulers().is_empty());
        assert!(s.highlighted_rulers().is_empty());
        assert_eq!(s.locks().len(), 1);
        assert_eq!(s.determine_mode(), InteractionMode::Idle);
        assert!(!s.can_create_ruler());
    }

    #[test]
    fn viewport_ops_need_an_image() {
        let mut s = session();
        assert!(!s.pan_by(1.0, 1.0));
        assert!(!s.zoom_about(Point::default(), 2.0));
        s.load_image(Dimensions {
            width: 100,
            height: 50,
        });
        assert!(s.pan_by(5.0, 0.0));
        assert!(s.zoom_about(Point::default(), 2.0));
        let t = s.image().unwrap().transform;
        assert!((t.scale - 2.0).abs() < 1e-12);
        assert!(s.fit_image(Dimensions {
            width: 200,
            height: 100,
        }));
        assert!((s.image().unwrap().transform.scale - 2.0).abs() < 1e-12);
    }

    #[test]
    fn pan_drag_reports_image_manipulation() {
        let mut s = session();
        s.set_drag_state(true, DragType::Pan);
        assert_eq!(s.determine_mode(), InteractionMode::RulerEditing);
        assert_eq!(s.activity(), InteractionMode::ImageManipulation);
        assert_eq!(s.snapshot().activity, InteractionMode::ImageManipulation);
    }
}
