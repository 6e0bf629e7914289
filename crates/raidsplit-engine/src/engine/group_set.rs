use super::GroupId;

/// Hard upper bound on the number of groups, fixed by the width of [`GroupSet`].
pub const MAX_GROUP_COUNT: usize = u32::BITS as usize;

/// Set of group ids stored as a bitmask; tracks which groups a player already sits in.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupSet(u32);

impl GroupSet {
    pub const EMPTY: Self = Self(0);

    #[inline]
    #[must_use]
    pub const fn contains(self, group: GroupId) -> bool {
        self.0 & (1 << group) != 0
    }

    #[inline]
    pub fn insert(&mut self, group: GroupId) {
        self.0 |= 1 << group;
    }

    #[inline]
    pub fn remove(&mut self, group: GroupId) {
        self.0 &= !(1 << group);
    }

    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}
