//! Slot store: per-slot contact records and the sets derived from them.

use touchslot_event_model::MtAxis;

use crate::slot_set::SlotSet;
use crate::state::{MtState, NO_CONTACT};

/// Ground truth of what is currently touching.
///
/// A slot is in the touch set exactly when its stored tracking id is not
/// `-1`; [`SlotStore::set_value`] is the only writer and keeps the two in
/// step.
#[derive(Debug, Clone)]
pub struct SlotStore {
    slots: Vec<MtState>,
    /// Tracking id the driver used for each slot's contact.
    driver_ids: Vec<i32>,
    touches: SlotSet,
    frame: SlotSet,
    last_slot: usize,
}

impl SlotStore {
    pub fn new(count: usize) -> Self {
        debug_assert!(count <= SlotSet::MAX_SLOTS);
        Self {
            slots: vec![MtState::EMPTY; count],
            driver_ids: vec![NO_CONTACT; count],
            touches: SlotSet::new(),
            frame: SlotSet::new(),
            last_slot: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn state(&self, slot: usize) -> &MtState {
        &self.slots[slot]
    }

    pub fn value(&self, slot: usize, axis: MtAxis) -> i32 {
        self.slots[slot][axis]
    }

    pub fn set_value(&mut self, slot: usize, axis: MtAxis, value: i32) {
        if axis == MtAxis::TrackingId {
            if value != NO_CONTACT {
                self.touches.insert(slot);
            } else {
                self.touches.remove(slot);
            }
        }
        self.slots[slot][axis] = value;
    }

    /// Slots holding an active contact.
    pub fn touches(&self) -> SlotSet {
        self.touches
    }

    /// Slots updated during the current frame.
    pub fn frame(&self) -> SlotSet {
        self.frame
    }

    pub fn mark_frame(&mut self, slot: usize) {
        self.frame.insert(slot);
    }

    pub fn clear_frame(&mut self) {
        self.frame.clear();
    }

    pub fn last_slot(&self) -> usize {
        self.last_slot
    }

    pub fn set_last_slot(&mut self, slot: usize) {
        debug_assert!(slot < self.len());
        self.last_slot = slot;
    }

    pub fn driver_id(&self, slot: usize) -> i32 {
        self.driver_ids[slot]
    }

    pub fn set_driver_id(&mut self, slot: usize, id: i32) {
        self.driver_ids[slot] = id;
    }

    /// Active slot whose contact carries the given driver id.
    pub fn id_to_slot(&self, driver_id: i32) -> Option<usize> {
        if driver_id == NO_CONTACT {
            return None;
        }
        self.touches
            .iter()
            .find(|&slot| self.driver_ids[slot] == driver_id)
    }

    /// Lowest slot that is neither active nor already used this frame, so a
    /// slot released earlier in the frame is never handed out again.
    pub fn first_free(&self) -> Option<usize> {
        self.touches.union(self.frame).first_absent(self.len())
    }

    /// Whether an active slot already shows this tracking id.
    pub fn is_id_active(&self, id: i32) -> bool {
        self.touches
            .iter()
            .any(|slot| self.slots[slot].tracking_id() == id)
    }
}

/// Source of fresh tracking ids.
#[derive(Debug, Clone, Default)]
pub struct TrackingIds {
    next: u16,
}

impl TrackingIds {
    /// Next counter value not shown by any active slot.
    ///
    /// Each active slot can rule out at most one candidate, so probing
    /// `touches + 1` consecutive values always finds a free one.
    pub fn mint(&mut self, store: &SlotStore) -> i32 {
        let attempts = store.touches().len() + 1;
        let mut id = self.advance();
        for _ in 1..attempts {
            if !store.is_id_active(id) {
                break;
            }
            id = self.advance();
        }
        id
    }

    fn advance(&mut self) -> i32 {
        let id = i32::from(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}
