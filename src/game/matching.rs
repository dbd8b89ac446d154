//! Drop actions and the match predicate.
//!
//! A drop is a first-class domain event: the player releasing an item over
//! a slot. Modeling it as data keeps the state machine independent of how
//! gestures are captured (pointer, keyboard, test harness).

use super::stage::{DraggableItem, ItemId, Slot, SlotId};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Result of evaluating a drop against a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    /// The item belongs in this slot.
    Correct,
    /// The item belongs elsewhere.
    Incorrect,
}

/// A drop gesture: `item` released over `slot`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DropAction {
    /// The dragged item.
    pub item: ItemId,
    /// The target slot.
    pub slot: SlotId,
}

impl DropAction {
    /// Creates a new drop action.
    pub fn new(item: ItemId, slot: SlotId) -> Self {
        Self { item, slot }
    }
}

impl std::fmt::Display for DropAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "item {} -> slot {}", self.item.0, self.slot.0)
    }
}

/// Rejections absorbed as no-ops.
///
/// None of these surface to the player as failures. They guard invariants
/// the UI structure should already make unreachable: a stale reference, a
/// drop outside the active stage, or a double placement.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum DropError {
    /// No stage is active, so there is nothing to drop onto.
    #[display("No stage is active")]
    NoActiveStage,

    /// The dragged item does not exist in the active stage.
    #[display("Unknown item {}", _0.0)]
    UnknownItem(ItemId),

    /// The target slot does not exist in the active stage.
    #[display("Unknown slot {}", _0.0)]
    UnknownSlot(SlotId),

    /// The item is already locked into a slot and cannot move.
    #[display("Item {} is locked in place", _0.0)]
    ItemLocked(ItemId),

    /// The slot already holds its item.
    #[display("Slot {} is already filled", _0.0)]
    SlotFilled(SlotId),

    /// A placement postcondition failed (debug builds only).
    #[display("Invariant violation: {}", _0)]
    InvariantViolation(String),
}

impl std::error::Error for DropError {}

/// Pure match predicate: `Correct` iff the item's asset is the one the
/// slot expects. No side effects.
#[instrument]
pub fn evaluate(slot: &Slot, item: &DraggableItem) -> Verdict {
    if item.asset() == slot.expected() {
        Verdict::Correct
    } else {
        Verdict::Incorrect
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::stage::StageRound;
    use crate::game::tasks::TaskRegistry;

    #[test]
    fn test_evaluate_matches_on_asset() {
        let registry = TaskRegistry::daily_routine();
        let round = StageRound::new(&registry.tasks()[..8]);

        // Item k belongs in slot k; any other pairing is incorrect.
        let slot = round.slot(SlotId(2)).unwrap();
        let matching = round.item(ItemId(2)).unwrap();
        let other = round.item(ItemId(4)).unwrap();

        assert_eq!(evaluate(slot, matching), Verdict::Correct);
        assert_eq!(evaluate(slot, other), Verdict::Incorrect);
    }
}
