//! Serializable session commands.
//!
//! [`SessionCommand`] names every call the input-dispatch layer can make
//! on a [`Session`], so input can be recorded, scripted or sent across a
//! process boundary as JSON. [`Session::dispatch`] applies one command
//! and reports a [`CommandOutcome`].
//!
//! ```
//! use proportio_core::{CommandOutcome, FixedClock, Session, SessionCommand, SessionConfig};
//!
//! let mut session = Session::with_clock(SessionConfig::default(), FixedClock(0)).unwrap();
//! let cmd: SessionCommand = serde_json::from_str(
//!     r#"{"type": "add_ruler", "start_point": {"x": 0, "y": 0}, "end_point": {"x": 10, "y": 0}}"#,
//! )
//! .unwrap();
//! assert!(matches!(session.dispatch(cmd), CommandOutcome::RulerCreated { .. }));
//! ```

use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::interaction::DragType;
use crate::lock::LockedRatio;
use crate::ruler::RulerPatch;
use crate::session::Session;
use crate::types::{Dimensions, LockId, Point, RulerId};

/// One input-dispatch call, tagged by `"type"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionCommand {
    // Image and viewport.
    LoadImage {
        width: u32,
        height: u32,
    },
    UnloadImage,
    FitImage {
        width: u32,
        height: u32,
    },
    Zoom {
        anchor: Point,
        factor: f64,
    },
    Pan {
        dx: f64,
        dy: f64,
    },

    // Rulers.
    AddRuler {
        start_point: Point,
        end_point: Point,
    },
    RemoveRuler {
        id: RulerId,
    },
    UpdateRuler {
        id: RulerId,
        patch: RulerPatch,
    },
    SelectRuler {
        id: RulerId,
    },
    ClearSelection,
    ClearComparison,
    ToggleCompare {
        id: RulerId,
    },
    StartInstantComparison {
        id: RulerId,
    },

    // Locks.
    LockCurrent,
    RemoveLock {
        id: LockId,
    },
    ClearLocks,
    SelectLockForComparison {
        id: LockId,
    },
    SelectHistory {
        id: LockId,
    },

    // Drag state and creation.
    SetDragState {
        is_dragging: bool,
        #[serde(default)]
        drag_type: DragType,
    },
    BeginRulerCreation {
        point: Point,
    },
    DragRulerCreation {
        point: Point,
    },
    FinishRulerCreation,
    CancelRulerCreation,
}

/// What a dispatched command did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CommandOutcome {
    /// The command changed the session.
    Applied,
    /// The command was a no-op (unknown id or unmet precondition).
    Ignored,
    RulerCreated {
        id: RulerId,
    },
    LockCreated {
        id: LockId,
    },
    /// An instant comparison completed a pair. `lock` is set when the
    /// pair was auto-locked.
    ComparisonCompleted {
        lock: Option<LockId>,
    },
    /// Ruler ids now highlighted from history (possibly none).
    Highlighted {
        rulers: Vec<RulerId>,
    },
}

impl CommandOutcome {
    const fn from_applied(applied: bool) -> Self {
        if applied { Self::Applied } else { Self::Ignored }
    }
}

impl<C: Clock> Session<C> {
    /// Apply one command.
    pub fn dispatch(&mut self, command: SessionCommand) -> CommandOutcome {
        log::trace!("dispatch {command:?}");
        match command {
            SessionCommand::LoadImage { width, height } => {
                self.load_image(Dimensions { width, height });
                CommandOutcome::Applied
            }
            SessionCommand::UnloadImage => CommandOutcome::from_applied(self.unload_image()),
            SessionCommand::FitImage { width, height } => {
                CommandOutcome::from_applied(self.fit_image(Dimensions { width, height }))
            }
            SessionCommand::Zoom { anchor, factor } => {
                CommandOutcome::from_applied(self.zoom_about(anchor, factor))
            }
            SessionCommand::Pan { dx, dy } => CommandOutcome::from_applied(self.pan_by(dx, dy)),

            SessionCommand::AddRuler {
                start_point,
                end_point,
            } => CommandOutcome::RulerCreated {
                id: self.add_ruler(start_point, end_point),
            },
            SessionCommand::RemoveRuler { id } => CommandOutcome::from_applied(self.remove_ruler(id)),
            SessionCommand::UpdateRuler { id, patch } => {
                CommandOutcome::from_applied(self.update_ruler(id, &patch))
            }
            SessionCommand::SelectRuler { id } => CommandOutcome::from_applied(self.select_ruler(id)),
            SessionCommand::ClearSelection => {
                self.clear_selection();
                CommandOutcome::Applied
            }
            SessionCommand::ClearComparison => {
                self.clear_comparison();
                CommandOutcome::Applied
            }
            SessionCommand::ToggleCompare { id } => {
                let before = self.comparison_rulers().to_vec();
                match self.toggle_compare(id) {
                    Some(lock) => CommandOutcome::LockCreated { id: lock },
                    None => CommandOutcome::from_applied(self.comparison_rulers() != before),
                }
            }
            SessionCommand::StartInstantComparison { id } => {
                let before = self.comparison_rulers().to_vec();
                let locks_before = self.locks().len();
                if self.start_instant_comparison(id) {
                    let lock = if self.locks().len() > locks_before {
                        self.locks().last().map(LockedRatio::id)
                    } else {
                        None
                    };
                    CommandOutcome::ComparisonCompleted { lock }
                } else {
                    CommandOutcome::from_applied(self.comparison_rulers() != before)
                }
            }

            SessionCommand::LockCurrent => match self.lock_current() {
                Some(id) => CommandOutcome::LockCreated { id },
                None => CommandOutcome::Ignored,
            },
            SessionCommand::RemoveLock { id } => CommandOutcome::from_applied(self.remove_lock(id)),
            SessionCommand::ClearLocks => {
                self.clear_locks();
                CommandOutcome::Applied
            }
            SessionCommand::SelectLockForComparison { id } => {
                CommandOutcome::from_applied(self.select_lock_for_comparison(id))
            }
            SessionCommand::SelectHistory { id } => CommandOutcome::Highlighted {
                rulers: self.select_history(id),
            },

            SessionCommand::SetDragState {
                is_dragging,
                drag_type,
            } => {
                self.set_drag_state(is_dragging, drag_type);
                CommandOutcome::Applied
            }
            SessionCommand::BeginRulerCreation { point } => {
                CommandOutcome::from_applied(self.begin_ruler_creation(point))
            }
            SessionCommand::DragRulerCreation { point } => {
                CommandOutcome::from_applied(self.drag_ruler_creation(point))
            }
            SessionCommand::FinishRulerCreation => match self.finish_ruler_creation() {
                Some(id) => CommandOutcome::RulerCreated { id },
                None => CommandOutcome::Ignored,
            },
            SessionCommand::CancelRulerCreation => {
                CommandOutcome::from_applied(self.cancel_ruler_creation())
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::types::SessionConfig;

    fn session() -> Session<FixedClock> {
        Session::with_clock(SessionConfig::default(), FixedClock(7)).unwrap()
    }

    fn add(s: &mut Session<FixedClock>, length: f64) -> RulerId {
        match s.dispatch(SessionCommand::AddRuler {
            start_point: Point::new(0.0, 0.0),
            end_point: Point::new(length, 0.0),
        }) {
            CommandOutcome::RulerCreated { id } => id,
            other => unreachable!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let mut s = session();
        assert_eq!(
            s.dispatch(SessionCommand::RemoveRuler { id: RulerId(9) }),
            CommandOutcome::Ignored
        );
        assert_eq!(
            s.dispatch(SessionCommand::ToggleCompare { id: RulerId(9) }),
            CommandOutcome::Ignored
        );
        assert_eq!(
            s.dispatch(SessionCommand::SelectLockForComparison { id: LockId(9) }),
            CommandOutcome::Ignored
        );
    }

    #[test]
    fn completing_a_pair_reports_the_lock() {
        let mut s = session();
        let a = add(&mut s, 10.0);
        let b = add(&mut s, 5.0);
        assert_eq!(
            s.dispatch(SessionCommand::ToggleCompare { id: a }),
            CommandOutcome::Applied
        );
        assert_eq!(
            s.dispatch(SessionCommand::ToggleCompare { id: b }),
            CommandOutcome::LockCreated { id: LockId(1) }
        );
    }

    #[test]
    fn instant_comparison_reports_completion() {
        let mut s = session();
        let a = add(&mut s, 10.0);
        let b = add(&mut s, 5.0);
        assert_eq!(
            s.dispatch(SessionCommand::StartInstantComparison { id: a }),
            CommandOutcome::Applied
        );
        assert_eq!(
            s.dispatch(SessionCommand::StartInstantComparison { id: b }),
            CommandOutcome::ComparisonCompleted {
                lock: Some(LockId(1))
            }
        );
        assert_eq!(s.locks().len(), 1);
    }

    #[test]
    fn third_compare_toggle_is_ignored() {
        let mut s = session();
        let ids: Vec<RulerId> = [3.0, 4.0, 5.0].into_iter().map(|l| add(&mut s, l)).collect();
        s.dispatch(SessionCommand::ToggleCompare { id: ids[0] });
        s.dispatch(SessionCommand::ToggleCompare { id: ids[1] });
        assert_eq!(
            s.dispatch(SessionCommand::ToggleCompare { id: ids[2] }),
            CommandOutcome::Ignored
        );
    }

    #[test]
    fn commands_parse_from_tagged_json() {
        let cmd: SessionCommand =
            serde_json::from_str(r#"{"type": "update_ruler", "id": 2, "patch": {"divisions": 6}}"#)
                .unwrap();
        assert_eq!(
            cmd,
            SessionCommand::UpdateRuler {
                id: RulerId(2),
                patch: RulerPatch::divisions(6),
            }
        );

        let cmd: SessionCommand =
            serde_json::from_str(r#"{"type": "set_drag_state", "is_dragging": false}"#).unwrap();
        assert_eq!(
            cmd,
            SessionCommand::SetDragState {
                is_dragging: false,
                drag_type: DragType::None,
            }
        );
    }

    #[test]
    fn outcomes_serialize_with_tag() {
        let json = serde_json::to_string(&CommandOutcome::RulerCreated { id: RulerId(3) }).unwrap();
        assert_eq!(json, r#"{"outcome":"ruler_created","id":3}"#);
    }
}
