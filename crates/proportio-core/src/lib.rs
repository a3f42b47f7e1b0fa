//! proportio-core: Ruler measurement and comparison engine (sans-IO).
//!
//! Users place rulers on an image, compare two of them as a simple
//! integer ratio, and keep a history of locked comparisons that stay
//! correct while the rulers are edited:
//!
//! rulers -> compare pair -> ratio simplification -> lock history
//!
//! [`Session`] owns all state and is the single writer. Rendering reads
//! a [`SessionSnapshot`]; input dispatch calls `Session` methods
//! directly or sends [`SessionCommand`]s through [`Session::dispatch`].
//!
//! This crate has **no I/O dependencies** -- image decoding, drawing and
//! event wiring live with the caller.

pub mod clock;
pub mod command;
pub mod geometry;
pub mod interaction;
pub mod lock;
pub mod palette;
pub mod ratio;
pub mod ruler;
pub mod session;
pub mod ticks;
pub mod types;
pub mod viewport;

pub use clock::{Clock, FixedClock, SystemClock};
pub use command::{CommandOutcome, SessionCommand};
pub use interaction::{DragType, InteractionContext, InteractionMode};
pub use lock::{LockRegistry, LockedRatio};
pub use ratio::{RatioApproximation, simplify};
pub use ruler::{MAX_DIVISIONS, MIN_DIVISIONS, Ruler, RulerPatch, RulerRegistry};
pub use session::{ImageState, RulerDraft, Session, SessionSnapshot};
pub use ticks::{TickKind, TickMark, tick_marks};
pub use types::{
    Dimensions, LockId, Point, RulerColorPolicy, RulerId, SessionConfig, SessionError,
};
pub use viewport::ViewTransform;
