use arrayvec::ArrayVec;

use crate::{CharacterId, PlayerId, Role};

use super::{Context, GroupId, GroupSet, MAX_GROUP_COUNT};

/// Head count and healer count of one group.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GroupLoad {
    pub count: usize,
    pub healers: usize,
}

/// Incrementally maintained group loads and per-player group membership.
///
/// Used by the initializer and the operators to test candidate moves in O(1)
/// before running the full viability check.
#[derive(Debug, Clone)]
pub struct Occupancy {
    loads: ArrayVec<GroupLoad, MAX_GROUP_COUNT>,
    player_groups: Vec<GroupSet>,
}

impl Occupancy {
    /// Creates an occupancy with `group_count` empty groups.
    ///
    /// # Panics
    ///
    /// Panics if `group_count` exceeds [`MAX_GROUP_COUNT`].
    #[must_use]
    pub fn empty(ctx: &Context, group_count: usize) -> Self {
        Self {
            loads: (0..group_count).map(|_| GroupLoad::default()).collect(),
            player_groups: vec![GroupSet::EMPTY; ctx.roster().player_count()],
        }
    }

    /// Tallies `distribution` over groups `0..group_count`.
    ///
    /// Characters assigned to a group at or beyond `group_count` are ignored,
    /// which lets a shrink repair tally only the surviving groups.
    #[must_use]
    pub fn new(ctx: &Context, distribution: &[Option<GroupId>], group_count: usize) -> Self {
        let mut this = Self::empty(ctx, group_count);
        for (cid, group) in distribution.iter().enumerate() {
            if let Some(group) = *group
                && group < group_count
            {
                this.seat(ctx, cid, group);
            }
        }
        this
    }

    #[must_use]
    pub fn group_count(&self) -> usize {
        self.loads.len()
    }

    #[must_use]
    pub fn load(&self, group: GroupId) -> GroupLoad {
        self.loads[group]
    }

    #[must_use]
    pub fn contains_player(&self, player: PlayerId, group: GroupId) -> bool {
        self.player_groups[player].contains(group)
    }

    pub fn seat(&mut self, ctx: &Context, cid: CharacterId, group: GroupId) {
        let character = ctx.character(cid);
        let load = &mut self.loads[group];
        load.count += 1;
        if character.role == Role::Healer {
            load.healers += 1;
        }
        self.player_groups[character.player].insert(group);
    }

    pub fn unseat(&mut self, ctx: &Context, cid: CharacterId, group: GroupId) {
        let character = ctx.character(cid);
        let load = &mut self.loads[group];
        load.count -= 1;
        if character.role == Role::Healer {
            load.healers -= 1;
        }
        self.player_groups[character.player].remove(group);
    }
}
