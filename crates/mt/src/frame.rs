//! Provisional contact records collected between two sync points.
//!
//! Only used when contacts are re-matched by distance. Raw property
//! updates land in per-index records; at sync the indices that were
//! reported this frame are compacted into a dense point list, which is then
//! correlated with the active slots.

use touchslot_event_model::MtAxis;

use crate::matching::{CostMatrix, Matcher};
use crate::slot_set::SlotSet;
use crate::state::{MtState, NO_CONTACT};
use crate::store::SlotStore;

#[derive(Debug, Clone)]
pub struct FrameBuffer {
    records: Vec<MtState>,
    cursor: usize,
    /// Whether the record under the cursor was written since the last
    /// contact terminator.
    dirty: bool,
    /// Record indices reported during this frame.
    present: SlotSet,
    points: Vec<MtState>,
    costs: CostMatrix,
    matcher: Matcher,
}

impl FrameBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            records: vec![MtState::EMPTY; capacity],
            cursor: 0,
            dirty: false,
            present: SlotSet::new(),
            points: Vec::with_capacity(capacity),
            costs: CostMatrix::with_capacity(capacity, capacity),
            matcher: Matcher::new(capacity, capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.records.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn present(&self) -> SlotSet {
        self.present
    }

    /// Type B slot selection: later writes go to `slot`.
    pub fn select(&mut self, slot: usize) {
        debug_assert!(slot < self.capacity());
        self.cursor = slot;
        self.present.insert(slot);
    }

    /// Type A contact terminator: keep the current record, move on.
    ///
    /// A terminator with no values before it reports an empty contact list
    /// and is ignored. Contacts beyond the capacity are dropped.
    pub fn finish_contact(&mut self) {
        if !std::mem::take(&mut self.dirty) {
            tracing::trace!(cursor = self.cursor, "empty contact report");
        } else if self.cursor < self.capacity() {
            self.present.insert(self.cursor);
            self.cursor += 1;
        } else {
            tracing::trace!(cursor = self.cursor, "contact beyond slot capacity dropped");
        }
    }

    /// The hardware lost the contact under the cursor.
    pub fn discard_current(&mut self) {
        if self.cursor < self.capacity() {
            self.present.remove(self.cursor);
        }
    }

    /// Store one property into the record under the cursor.
    pub fn write(&mut self, axis: MtAxis, value: i32) {
        if let Some(record) = self.records.get_mut(self.cursor) {
            record[axis] = value;
        }
        self.dirty = true;
    }

    /// Replace the record under the cursor.
    pub fn stage(&mut self, state: &MtState) {
        if let Some(record) = self.records.get_mut(self.cursor) {
            *record = *state;
        }
        self.dirty = true;
    }

    /// Replace the whole frame with `points`.
    pub fn load(&mut self, points: &[MtState]) {
        debug_assert!(points.len() <= self.capacity());
        self.present.clear();
        for (index, point) in points.iter().enumerate() {
            self.records[index] = *point;
            self.present.insert(index);
        }
        self.cursor = points.len();
        self.dirty = false;
    }

    /// Dense list of the records reported this frame, in index order.
    pub fn compact(&mut self) -> &[MtState] {
        self.points.clear();
        for index in self.present.iter() {
            self.points.push(self.records[index]);
        }
        &self.points
    }

    pub fn points(&self) -> &[MtState] {
        &self.points
    }

    /// Annotate each compacted point with the driver id of the active slot
    /// it continues, or `-1` for a new contact. The store is not modified.
    pub fn correlate(&mut self, store: &SlotStore) {
        for point in &mut self.points {
            point.set_tracking_id(NO_CONTACT);
        }

        let touches = store.touches();
        let size = self.points.len();
        let active = touches.len();
        if size == 0 || active == 0 {
            return;
        }

        let mut slots = [0usize; SlotSet::BITS];
        for (column, slot) in touches.iter().enumerate() {
            slots[column] = slot;
        }
        let slots = &slots[..active];

        // The larger side becomes the rows.
        let points_are_rows = size > active;
        if points_are_rows {
            self.costs.reset(size, active);
        } else {
            self.costs.reset(active, size);
        }
        for (p, point) in self.points.iter().enumerate() {
            for (s, &slot) in slots.iter().enumerate() {
                let cost = point.squared_distance(store.state(slot));
                if points_are_rows {
                    self.costs.set(p, s, cost);
                } else {
                    self.costs.set(s, p, cost);
                }
            }
        }

        let row_to_col = self.matcher.solve(&self.costs);
        for (row, col) in row_to_col.iter().enumerate() {
            let Some(col) = *col else { continue };
            let (p, s) = if points_are_rows { (row, col) } else { (col, row) };
            self.points[p].set_tracking_id(store.driver_id(slots[s]));
        }
    }

    /// Start the next frame. Records are kept so that values a device does
    /// not repeat carry over.
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.dirty = false;
        self.present.clear();
        self.points.clear();
    }
}
