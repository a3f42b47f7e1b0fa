//! Interaction state: what the user is doing right now.
//!
//! [`InteractionMode`] is never stored. It is derived from the
//! lower-level fields of [`InteractionContext`] on every read, so it
//! cannot drift out of sync with them. The side effects of entering a
//! mode (clearing selection or comparison) live in
//! [`Session`](crate::session::Session), because they also touch ruler
//! flags.

use serde::{Deserialize, Serialize};

use crate::types::RulerId;

/// Most rulers that can take part in one comparison.
pub const MAX_COMPARISON: usize = 2;

/// The single high-level activity the session is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InteractionMode {
    Idle,
    RulerCreation,
    RulerEditing,
    RulerSelected,
    Comparison,
    /// Only reported by [`InteractionContext::activity`]; the mode table
    /// folds panning into [`RulerEditing`](Self::RulerEditing).
    ImageManipulation,
}

/// Kind of pointer drag in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragType {
    Create,
    Edit,
    Pan,
    #[default]
    None,
}

/// Low-level interaction fields from which the mode is derived.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct InteractionContext {
    selected_ruler: Option<RulerId>,
    comparison_rulers: Vec<RulerId>,
    is_dragging: bool,
    drag_type: DragType,
}

impl InteractionContext {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            selected_ruler: None,
            comparison_rulers: Vec::new(),
            is_dragging: false,
            drag_type: DragType::None,
        }
    }

    /// Derive the current mode. First match wins:
    ///
    /// 1. dragging: `Create` -> [`RulerCreation`](InteractionMode::RulerCreation),
    ///    anything else -> [`RulerEditing`](InteractionMode::RulerEditing)
    /// 2. any comparison ruler -> [`Comparison`](InteractionMode::Comparison)
    /// 3. a selected ruler -> [`RulerSelected`](InteractionMode::RulerSelected)
    /// 4. otherwise [`Idle`](InteractionMode::Idle)
    #[must_use]
    pub const fn determine_mode(&self) -> InteractionMode {
        if self.is_dragging {
            return match self.drag_type {
                DragType::Create => InteractionMode::RulerCreation,
                DragType::Edit | DragType::Pan | DragType::None => InteractionMode::RulerEditing,
            };
        }
        if !self.comparison_rulers.is_empty() {
            return InteractionMode::Comparison;
        }
        if self.selected_ruler.is_some() {
            return InteractionMode::RulerSelected;
        }
        InteractionMode::Idle
    }

    /// [`determine_mode`](Self::determine_mode) refined for panning:
    /// a pan drag reports [`ImageManipulation`](InteractionMode::ImageManipulation).
    ///
    /// Intended for cursors and status lines; permission checks use
    /// `determine_mode`.
    #[must_use]
    pub const fn activity(&self) -> InteractionMode {
        if self.is_dragging && matches!(self.drag_type, DragType::Pan) {
            InteractionMode::ImageManipulation
        } else {
            self.determine_mode()
        }
    }

    #[must_use]
    pub const fn selected_ruler(&self) -> Option<RulerId> {
        self.selected_ruler
    }

    /// Compare-selected ruler ids in selection order (first is the
    /// numerator of any lock created from them).
    #[must_use]
    pub fn comparison_rulers(&self) -> &[RulerId] {
        &self.comparison_rulers
    }

    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.is_dragging
    }

    #[must_use]
    pub const fn drag_type(&self) -> DragType {
        self.drag_type
    }

    /// Whether a new ruler may be started: idle, with an image loaded.
    #[must_use]
    pub const fn can_create_ruler(&self, image_loaded: bool) -> bool {
        image_loaded && matches!(self.determine_mode(), InteractionMode::Idle)
    }

    pub(crate) const fn set_selected(&mut self, id: Option<RulerId>) {
        self.selected_ruler = id;
    }

    /// Append to the comparison. Refuses duplicates and a third entry.
    pub(crate) fn push_comparison(&mut self, id: RulerId) -> bool {
        if self.comparison_rulers.len() >= MAX_COMPARISON || self.comparison_rulers.contains(&id) {
            return false;
        }
        self.comparison_rulers.push(id);
        true
    }

    pub(crate) fn remove_comparison(&mut self, id: RulerId) -> bool {
        let before = self.comparison_rulers.len();
        self.comparison_rulers.retain(|&r| r != id);
        self.comparison_rulers.len() != before
    }

    pub(crate) fn clear_comparison(&mut self) {
        self.comparison_rulers.clear();
    }

    /// Normalized drag state: not dragging always means [`DragType::None`].
    pub(crate) const fn set_drag(&mut self, is_dragging: bool, drag_type: DragType) {
        if is_dragging && !matches!(drag_type, DragType::None) {
            self.is_dragging = true;
            self.drag_type = drag_type;
        } else {
            self.is_dragging = false;
            self.drag_type = DragType::None;
        }
    }
}
