//! Routine Match library - the routine-ordering game core.
//!
//! A child-oriented matching game: drag labeled task images into their
//! slots across two sequential stages, with feedback cues and a success
//! state at the end.
//!
//! # Architecture
//!
//! - **Tasks**: static ordered registry of routine tasks
//! - **Stage**: live slots and draggable items for the stage in play
//! - **Controller**: the `Start -> StageOne -> StageTwo -> Success`
//!   state machine, with reset from anywhere
//! - **Feedback**: cue dispatch to a pluggable sink
//!
//! # Example
//!
//! ```
//! use routine_match::{DropAction, GameController, ItemId, NullSink, Phase, SlotId};
//!
//! let mut game = GameController::with_daily_routine();
//! let mut sink = NullSink;
//!
//! game.start().expect("Fresh controller starts");
//! assert_eq!(game.phase(), Phase::StageOne);
//!
//! // Item and slot share an index per task, so this drop is correct.
//! game.handle_drop(DropAction::new(ItemId(0), SlotId(0)), &mut sink);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod game;
pub mod tui;

// Crate-level exports - configuration
pub use config::{ConfigError, GameConfig, DEFAULT_STAGE_BOUNDARY};

// Crate-level exports - game core
pub use game::{
    evaluate, AssetRef, Contract, Cue, DraggableItem, DropAction, DropError, DropOutcome,
    FeedbackSink, GameController, Invariant, InvariantSet, InvariantViolation, ItemId,
    ItemIsFree, LockFillBalance, NullSink, OccupantConsistent, PendingTransition, Phase,
    PlaceableDrop, PlacementContract, RecordingSink, RegistryError, RoundInvariants, Slot,
    SlotId, SlotIsOpen, SlotItemBijection, StageRound, StartError, Task, TaskId,
    TaskRegistry, TransitionError, TransitionKind, Verdict,
};
