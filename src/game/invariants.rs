//! First-class invariants for the placement state.
//!
//! Invariants are logical properties that must hold throughout a round.
//! They are testable independently and serve as documentation of what the
//! placement tracker guarantees.

use super::stage::StageRound;
use tracing::warn;

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants checked together.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set, collecting every violation.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

impl<S, I1, I2, I3> InvariantSet<S> for (I1, I2, I3)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();

        if !I1::holds(state) {
            violations.push(InvariantViolation::new(I1::description()));
        }
        if !I2::holds(state) {
            violations.push(InvariantViolation::new(I2::description()));
        }
        if !I3::holds(state) {
            violations.push(InvariantViolation::new(I3::description()));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// Invariant: every item's asset maps to exactly one slot expecting it,
/// and the counts agree (one item per slot, one slot per item).
pub struct SlotItemBijection;

impl Invariant<StageRound> for SlotItemBijection {
    fn holds(round: &StageRound) -> bool {
        if round.slots().len() != round.items().len() {
            warn!(
                slots = round.slots().len(),
                items = round.items().len(),
                "slot/item count mismatch"
            );
            return false;
        }

        round.items().iter().all(|item| {
            match round.slot_for_asset(item.asset()) {
                Some(slot) => round
                    .slot(slot)
                    .is_some_and(|s| s.expected() == item.asset()),
                None => {
                    warn!(asset = %item.asset(), "item asset has no slot");
                    false
                }
            }
        })
    }

    fn description() -> &'static str {
        "Items and slots form a bijection over asset references"
    }
}

/// Invariant: the number of locked items equals the number of filled slots.
pub struct LockFillBalance;

impl Invariant<StageRound> for LockFillBalance {
    fn holds(round: &StageRound) -> bool {
        let locked = round.items().iter().filter(|i| i.is_locked()).count();
        let filled = round.filled_count();

        let valid = locked == filled;
        if !valid {
            warn!(locked, filled, "lock/fill balance violated");
        }
        valid
    }

    fn description() -> &'static str {
        "Locked item count equals filled slot count"
    }
}

/// Invariant: every filled slot holds an occupant whose asset is the one
/// the slot expects; unfilled slots hold nothing.
pub struct OccupantConsistent;

impl Invariant<StageRound> for OccupantConsistent {
    fn holds(round: &StageRound) -> bool {
        round.slots().iter().enumerate().all(|(ix, slot)| {
            let occupant = round.occupant(super::stage::SlotId(ix));
            match (slot.is_filled(), occupant) {
                (true, Some(item)) => round
                    .item(item)
                    .is_some_and(|i| i.asset() == slot.expected() && i.is_locked()),
                (false, None) => true,
                _ => {
                    warn!(slot = ix, "occupant inconsistent with fill state");
                    false
                }
            }
        })
    }

    fn description() -> &'static str {
        "Filled slots hold their matching locked item; unfilled slots hold nothing"
    }
}

/// All round invariants as a composable set.
pub type RoundInvariants = (SlotItemBijection, LockFillBalance, OccupantConsistent);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::stage::{ItemId, SlotId, StageRound};
    use crate::game::tasks::TaskRegistry;

    #[test]
    fn test_invariants_hold_for_fresh_round() {
        let registry = TaskRegistry::daily_routine();
        let round = StageRound::new(&registry.tasks()[..8]);
        assert!(RoundInvariants::check_all(&round).is_ok());
    }

    #[test]
    fn test_invariants_hold_after_placements() {
        let registry = TaskRegistry::daily_routine();
        let mut round = StageRound::new(&registry.tasks()[..8]);

        for ix in [3, 0, 7] {
            round.place(SlotId(ix), ItemId(ix)).unwrap();
            assert!(RoundInvariants::check_all(&round).is_ok());
        }
    }
}
