//! Per-contact property record.

use std::ops::{Index, IndexMut};

use touchslot_event_model::MtAxis;

/// Upper bound of minted tracking ids; the counter wraps past it.
pub const TRACKING_ID_MAX: i32 = 0xFFFF;

/// Tracking id of an empty slot.
pub const NO_CONTACT: i32 = -1;

/// Values of every MT property for one contact.
///
/// Used both for slot contents and for incoming points. For a point the
/// tracking id is the driver-level id, or `-1` for a contact that has not
/// been identified yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MtState {
    values: [i32; MtAxis::COUNT],
}

impl Default for MtState {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl MtState {
    /// All properties zero, no contact.
    pub const EMPTY: Self = {
        let mut values = [0; MtAxis::COUNT];
        values[MtAxis::TrackingId.index()] = NO_CONTACT;
        Self { values }
    };

    /// An unidentified contact at `(x, y)`.
    pub fn at(x: i32, y: i32) -> Self {
        Self::EMPTY
            .with(MtAxis::PositionX, x)
            .with(MtAxis::PositionY, y)
    }

    pub fn with(mut self, axis: MtAxis, value: i32) -> Self {
        self[axis] = value;
        self
    }

    pub fn with_tracking_id(self, id: i32) -> Self {
        self.with(MtAxis::TrackingId, id)
    }

    pub fn x(&self) -> i32 {
        self[MtAxis::PositionX]
    }

    pub fn y(&self) -> i32 {
        self[MtAxis::PositionY]
    }

    pub fn tracking_id(&self) -> i32 {
        self[MtAxis::TrackingId]
    }

    pub fn set_tracking_id(&mut self, id: i32) {
        self[MtAxis::TrackingId] = id;
    }

    pub fn is_active(&self) -> bool {
        self.tracking_id() != NO_CONTACT
    }

    /// Squared euclidean distance between the two positions, saturating.
    pub fn squared_distance(&self, other: &Self) -> i64 {
        let dx = i64::from(self.x()) - i64::from(other.x());
        let dy = i64::from(self.y()) - i64::from(other.y());
        dx.saturating_mul(dx).saturating_add(dy.saturating_mul(dy))
    }

    /// `(axis, value)` pairs in code order.
    pub fn iter(&self) -> impl Iterator<Item = (MtAxis, i32)> + '_ {
        MtAxis::ALL.iter().map(move |&axis| (axis, self[axis]))
    }
}

impl Index<MtAxis> for MtState {
    type Output = i32;

    fn index(&self, axis: MtAxis) -> &i32 {
        &self.values[axis.index()]
    }
}

impl IndexMut<MtAxis> for MtState {
    fn index_mut(&mut self, axis: MtAxis) -> &mut i32 {
        &mut self.values[axis.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_state_has_no_contact() {
        let state = MtState::default();
        assert_eq!(state.tracking_id(), NO_CONTACT);
        assert!(!state.is_active());
        assert_eq!(state[MtAxis::Pressure], 0);
    }

    #[test]
    fn test_builder_sets_values() {
        let state = MtState::at(10, 20)
            .with(MtAxis::Pressure, 50)
            .with_tracking_id(7);
        assert_eq!((state.x(), state.y()), (10, 20));
        assert_eq!(state[MtAxis::Pressure], 50);
        assert_eq!(state.tracking_id(), 7);
        assert!(state.is_active());
    }

    #[test]
    fn test_squared_distance() {
        let a = MtState::at(100, 100);
        let b = MtState::at(101, 101);
        assert_eq!(a.squared_distance(&b), 2);
        assert_eq!(b.squared_distance(&a), 2);

        let far = MtState::at(i32::MIN, i32::MIN);
        let other = MtState::at(i32::MAX, i32::MAX);
        assert!(far.squared_distance(&other) > 0);
    }

    #[test]
    fn test_iter_follows_code_order() {
        let axes: Vec<MtAxis> = MtState::EMPTY.iter().map(|(axis, _)| axis).collect();
        assert_eq!(axes, MtAxis::ALL.to_vec());
    }
}
