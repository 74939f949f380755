//! Fixed-width set of slot indices.

use std::fmt;

/// A set of slot indices backed by a single `u32`.
///
/// A device may use at most [`SlotSet::MAX_SLOTS`] slots, one less than the
/// bit width, so that "first free slot" always has a representable answer
/// outside the slot range.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SlotSet(u32);

impl SlotSet {
    /// Bit width of the set.
    pub const BITS: usize = u32::BITS as usize;

    /// Largest slot count a device may be configured with.
    pub const MAX_SLOTS: usize = Self::BITS - 1;

    pub const fn new() -> Self {
        Self(0)
    }

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub fn insert(&mut self, slot: usize) {
        debug_assert!(slot < Self::BITS, "slot {slot} outside slot set");
        self.0 |= 1 << slot;
    }

    pub fn remove(&mut self, slot: usize) {
        debug_assert!(slot < Self::BITS, "slot {slot} outside slot set");
        self.0 &= !(1 << slot);
    }

    pub fn contains(self, slot: usize) -> bool {
        slot < Self::BITS && self.0 & (1 << slot) != 0
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Lowest member.
    pub fn first(self) -> Option<usize> {
        (self.0 != 0).then(|| self.0.trailing_zeros() as usize)
    }

    /// Lowest index below `limit` that is not a member.
    pub fn first_absent(self, limit: usize) -> Option<usize> {
        let index = (!self.0).trailing_zeros() as usize;
        (index < limit).then_some(index)
    }

    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Members of `self` that are not in `other`.
    pub fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Members in ascending order.
    pub fn iter(self) -> Iter {
        Iter(self.0)
    }
}

/// Ascending iterator over a [`SlotSet`].
#[derive(Debug, Clone)]
pub struct Iter(u32);

impl Iterator for Iter {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.0 == 0 {
            return None;
        }
        let slot = self.0.trailing_zeros() as usize;
        self.0 &= self.0 - 1;
        Some(slot)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.0.count_ones() as usize;
        (len, Some(len))
    }
}

impl ExactSizeIterator for Iter {}

impl IntoIterator for SlotSet {
    type Item = usize;
    type IntoIter = Iter;

    fn into_iter(self) -> Iter {
        self.iter()
    }
}

impl FromIterator<usize> for SlotSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut set = Self::new();
        for slot in iter {
            set.insert(slot);
        }
        set
    }
}

impl fmt::Debug for SlotSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
