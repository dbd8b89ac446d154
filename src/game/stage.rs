//! Live placement state for the active stage.
//!
//! A [`StageRound`] owns the slots and draggable items created when a stage
//! starts, and is dropped whole on stage transition or reset. Exactly one
//! round exists at a time; the controller enforces that.

use super::matching::DropError;
use super::tasks::{AssetRef, Task};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Index of a slot within the active stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotId(pub usize);

/// Index of a draggable item within the active stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub usize);

/// A drop target expecting one specific item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    expected: AssetRef,
    label: String,
    filled: bool,
}

impl Slot {
    /// The asset reference this slot accepts.
    pub fn expected(&self) -> &AssetRef {
        &self.expected
    }

    /// Display label shown on the slot.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// True once the slot holds its correctly placed item.
    pub fn is_filled(&self) -> bool {
        self.filled
    }
}

/// A movable piece representing one task's image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraggableItem {
    asset: AssetRef,
    locked: bool,
}

impl DraggableItem {
    /// The item's asset reference.
    pub fn asset(&self) -> &AssetRef {
        &self.asset
    }

    /// True once the item is correctly placed; a locked item cannot move.
    pub fn is_locked(&self) -> bool {
        self.locked
    }
}

/// Slots, items, and placements for the stage currently in play.
///
/// One slot and one item are created per task, so assets form a bijection
/// between the two collections. The `slot_by_asset` map makes that pairing
/// explicit at initialization instead of re-deriving it by scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageRound {
    slots: Vec<Slot>,
    items: Vec<DraggableItem>,
    slot_by_asset: HashMap<AssetRef, SlotId>,
    occupants: Vec<Option<ItemId>>,
}

impl StageRound {
    /// Builds the round for the given tasks: one slot and one item each,
    /// in task order.
    #[instrument(skip(tasks), fields(task_count = tasks.len()))]
    pub fn new(tasks: &[Task]) -> Self {
        let slots: Vec<Slot> = tasks
            .iter()
            .map(|t| Slot {
                expected: t.asset.clone(),
                label: t.label.clone(),
                filled: false,
            })
            .collect();

        let items: Vec<DraggableItem> = tasks
            .iter()
            .map(|t| DraggableItem {
                asset: t.asset.clone(),
                locked: false,
            })
            .collect();

        let slot_by_asset = tasks
            .iter()
            .enumerate()
            .map(|(ix, t)| (t.asset.clone(), SlotId(ix)))
            .collect();

        Self {
            occupants: vec![None; slots.len()],
            slots,
            items,
            slot_by_asset,
        }
    }

    /// All slots in task order.
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// All items in task order.
    pub fn items(&self) -> &[DraggableItem] {
        &self.items
    }

    /// Looks up a slot.
    pub fn slot(&self, id: SlotId) -> Option<&Slot> {
        self.slots.get(id.0)
    }

    /// Looks up an item.
    pub fn item(&self, id: ItemId) -> Option<&DraggableItem> {
        self.items.get(id.0)
    }

    /// The slot a given asset belongs in.
    pub fn slot_for_asset(&self, asset: &AssetRef) -> Option<SlotId> {
        self.slot_by_asset.get(asset).copied()
    }

    /// The item locked into a slot, if the slot is filled.
    pub fn occupant(&self, slot: SlotId) -> Option<ItemId> {
        self.occupants.get(slot.0).copied().flatten()
    }

    /// Records a correct placement: fills the slot, locks the item, and
    /// associates the two for rendering.
    ///
    /// # Errors
    ///
    /// Rejects unknown ids and double placements ([`DropError::SlotFilled`],
    /// [`DropError::ItemLocked`]); on rejection nothing changes.
    #[instrument(skip(self))]
    pub fn place(&mut self, slot: SlotId, item: ItemId) -> Result<(), DropError> {
        if self.slot(slot).is_none() {
            return Err(DropError::UnknownSlot(slot));
        }
        if self.item(item).is_none() {
            return Err(DropError::UnknownItem(item));
        }
        if self.slots[slot.0].filled {
            return Err(DropError::SlotFilled(slot));
        }
        if self.items[item.0].locked {
            return Err(DropError::ItemLocked(item));
        }

        self.slots[slot.0].filled = true;
        self.items[item.0].locked = true;
        self.occupants[slot.0] = Some(item);
        debug!(slot = slot.0, item = item.0, "placement recorded");
        Ok(())
    }

    /// True iff the round has slots and every one is filled. An empty
    /// round is never in progress, so it is never complete either.
    pub fn is_complete(&self) -> bool {
        !self.slots.is_empty() && self.slots.iter().all(Slot::is_filled)
    }

    /// Number of filled slots.
    pub fn filled_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_filled()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::tasks::TaskRegistry;

    fn eight_task_round() -> StageRound {
        let registry = TaskRegistry::daily_routine();
        StageRound::new(&registry.tasks()[..8])
    }

    #[test]
    fn test_round_creates_one_slot_and_item_per_task() {
        let round = eight_task_round();
        assert_eq!(round.slots().len(), 8);
        assert_eq!(round.items().len(), 8);

        // Every item's asset resolves to exactly one slot expecting it.
        for (ix, item) in round.items().iter().enumerate() {
            let slot = round.slot_for_asset(item.asset()).expect("Bijection is total");
            assert_eq!(round.slot(slot).unwrap().expected(), item.asset());
            assert_eq!(slot.0, ix);
        }
    }

    #[test]
    fn test_place_fills_and_locks() {
        let mut round = eight_task_round();
        round.place(SlotId(3), ItemId(3)).expect("Valid placement");

        assert!(round.slot(SlotId(3)).unwrap().is_filled());
        assert!(round.item(ItemId(3)).unwrap().is_locked());
        assert_eq!(round.occupant(SlotId(3)), Some(ItemId(3)));
        assert_eq!(round.filled_count(), 1);
    }

    #[test]
    fn test_double_place_is_rejected() {
        let mut round = eight_task_round();
        round.place(SlotId(0), ItemId(0)).expect("Valid placement");

        assert_eq!(
            round.place(SlotId(0), ItemId(1)),
            Err(DropError::SlotFilled(SlotId(0)))
        );
        assert_eq!(
            round.place(SlotId(1), ItemId(0)),
            Err(DropError::ItemLocked(ItemId(0)))
        );
        // Rejections changed nothing.
        assert_eq!(round.filled_count(), 1);
        assert!(!round.item(ItemId(1)).unwrap().is_locked());
    }

    #[test]
    fn test_unknown_ids_rejected() {
        let mut round = eight_task_round();
        assert_eq!(
            round.place(SlotId(99), ItemId(0)),
            Err(DropError::UnknownSlot(SlotId(99)))
        );
        assert_eq!(
            round.place(SlotId(0), ItemId(99)),
            Err(DropError::UnknownItem(ItemId(99)))
        );
    }

    #[test]
    fn test_empty_round_is_not_complete() {
        let round = StageRound::new(&[]);
        assert!(!round.is_complete());
        assert_eq!(round.filled_count(), 0);
    }

    #[test]
    fn test_completion_thresholds() {
        let mut round = eight_task_round();
        assert!(!round.is_complete());

        round.place(SlotId(0), ItemId(0)).unwrap();
        assert!(!round.is_complete());

        for ix in 1..7 {
            round.place(SlotId(ix), ItemId(ix)).unwrap();
        }
        assert_eq!(round.filled_count(), 7);
        assert!(!round.is_complete());

        round.place(SlotId(7), ItemId(7)).unwrap();
        assert!(round.is_complete());
    }
}
