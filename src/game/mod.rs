//! The matching/progress state machine: task registry, placement state,
//! match predicate, stage controller, and feedback cues.

mod contracts;
mod controller;
mod feedback;
mod invariants;
mod matching;
mod stage;
pub(crate) mod tasks;

pub use contracts::{Contract, ItemIsFree, PlaceableDrop, PlacementContract, SlotIsOpen};
pub use controller::{
    DropOutcome, GameController, PendingTransition, Phase, StartError, TransitionError,
    TransitionKind,
};
pub use feedback::{Cue, FeedbackSink, NullSink, RecordingSink};
pub use invariants::{
    Invariant, InvariantSet, InvariantViolation, LockFillBalance, OccupantConsistent,
    RoundInvariants, SlotItemBijection,
};
pub use matching::{evaluate, DropAction, DropError, Verdict};
pub use stage::{DraggableItem, ItemId, Slot, SlotId, StageRound};
pub use tasks::{AssetRef, RegistryError, Task, TaskId, TaskRegistry};
