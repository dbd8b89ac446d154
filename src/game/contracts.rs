//! Contract-based validation for drops.
//!
//! Contracts define correctness through preconditions and postconditions,
//! formalizing the Hoare-style reasoning: {P} drop {Q}.

use super::invariants::{InvariantSet, RoundInvariants};
use super::matching::{DropAction, DropError};
use super::stage::StageRound;
use tracing::instrument;

/// A contract defines preconditions and postconditions for a transition.
pub trait Contract<S, A> {
    /// Checks preconditions before applying the action.
    fn pre(state: &S, action: &A) -> Result<(), DropError>;

    /// Checks postconditions after applying the action.
    fn post(before: &S, after: &S) -> Result<(), DropError>;
}

/// Precondition: the target slot exists and is not yet filled.
pub struct SlotIsOpen;

impl SlotIsOpen {
    /// Validates the slot half of a drop.
    #[instrument(skip(round))]
    pub fn check(action: &DropAction, round: &StageRound) -> Result<(), DropError> {
        match round.slot(action.slot) {
            None => Err(DropError::UnknownSlot(action.slot)),
            Some(slot) if slot.is_filled() => Err(DropError::SlotFilled(action.slot)),
            Some(_) => Ok(()),
        }
    }
}

/// Precondition: the dragged item exists and is not locked.
pub struct ItemIsFree;

impl ItemIsFree {
    /// Validates the item half of a drop.
    #[instrument(skip(round))]
    pub fn check(action: &DropAction, round: &StageRound) -> Result<(), DropError> {
        match round.item(action.item) {
            None => Err(DropError::UnknownItem(action.item)),
            Some(item) if item.is_locked() => Err(DropError::ItemLocked(action.item)),
            Some(_) => Ok(()),
        }
    }
}

/// Composite precondition: a drop is placeable if the item is free and the
/// slot is open.
pub struct PlaceableDrop;

impl PlaceableDrop {
    /// Validates all preconditions for a drop.
    #[instrument(skip(round))]
    pub fn check(action: &DropAction, round: &StageRound) -> Result<(), DropError> {
        ItemIsFree::check(action, round)?;
        SlotIsOpen::check(action, round)?;
        Ok(())
    }
}

/// Contract for correct placements.
///
/// Preconditions: item free, slot open.
/// Postconditions: all round invariants hold, and placement is monotonic
/// (a filled slot never becomes unfilled).
pub struct PlacementContract;

impl Contract<StageRound, DropAction> for PlacementContract {
    fn pre(round: &StageRound, action: &DropAction) -> Result<(), DropError> {
        PlaceableDrop::check(action, round)
    }

    fn post(before: &StageRound, after: &StageRound) -> Result<(), DropError> {
        if after.filled_count() < before.filled_count() {
            return Err(DropError::InvariantViolation(
                "Placement must not unfill slots".to_string(),
            ));
        }

        RoundInvariants::check_all(after).map_err(|violations| {
            let descriptions = violations
                .iter()
                .map(|v| v.description.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            DropError::InvariantViolation(format!("Postcondition failed: {}", descriptions))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::stage::{ItemId, SlotId};
    use crate::game::tasks::TaskRegistry;

    fn round() -> StageRound {
        let registry = TaskRegistry::daily_routine();
        StageRound::new(&registry.tasks()[..8])
    }

    #[test]
    fn test_precondition_open_slot() {
        let round = round();
        let action = DropAction::new(ItemId(0), SlotId(0));
        assert!(PlacementContract::pre(&round, &action).is_ok());
    }

    #[test]
    fn test_precondition_filled_slot() {
        let mut round = round();
        round.place(SlotId(0), ItemId(0)).unwrap();

        let action = DropAction::new(ItemId(1), SlotId(0));
        assert!(matches!(
            PlacementContract::pre(&round, &action),
            Err(DropError::SlotFilled(_))
        ));
    }

    #[test]
    fn test_precondition_locked_item() {
        let mut round = round();
        round.place(SlotId(0), ItemId(0)).unwrap();

        let action = DropAction::new(ItemId(0), SlotId(1));
        assert!(matches!(
            PlacementContract::pre(&round, &action),
            Err(DropError::ItemLocked(_))
        ));
    }

    #[test]
    fn test_postcondition_holds_after_place() {
        let before = round();
        let mut after = before.clone();
        after.place(SlotId(2), ItemId(2)).unwrap();

        assert!(PlacementContract::post(&before, &after).is_ok());
    }
}
