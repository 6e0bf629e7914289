use super::{CharacterId, PlayerId, Role, Roster};

/// Coarse role grouping used for placement: melee and ranged are interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleGroup {
    Tank,
    Healer,
    Dps,
}

impl RoleGroup {
    pub const ALL: [Self; 3] = [Self::Tank, Self::Healer, Self::Dps];

    #[must_use]
    pub const fn from_role(role: Role) -> Self {
        match role {
            Role::Tank => Self::Tank,
            Role::Healer => Self::Healer,
            Role::Melee | Role::Ranged => Self::Dps,
        }
    }
}

/// Characters of one [`RoleGroup`], split by main/alt status.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RoleIndex {
    pub all: Vec<CharacterId>,
    pub mains: Vec<CharacterId>,
    pub alts: Vec<CharacterId>,
}

impl RoleIndex {
    fn push(&mut self, cid: CharacterId, main: bool) {
        self.all.push(cid);
        if main {
            self.mains.push(cid);
        } else {
            self.alts.push(cid);
        }
    }

    /// Returns mains then alts, the order in which characters are seated.
    #[must_use]
    pub fn by_priority(&self) -> [&[CharacterId]; 2] {
        [&self.mains, &self.alts]
    }
}

/// Precomputed lookups over a [`Roster`], built once and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterIndex {
    roles: [RoleIndex; 3],
    player_characters: Vec<Vec<CharacterId>>,
}

impl RosterIndex {
    #[must_use]
    pub fn new(roster: &Roster) -> Self {
        let mut roles: [RoleIndex; 3] = Default::default();
        let mut player_characters = vec![vec![]; roster.player_count()];
        for (cid, character) in roster.characters().iter().enumerate() {
            player_characters[character.player].push(cid);
            roles[RoleGroup::from_role(character.role) as usize].push(cid, character.main);
        }
        Self {
            roles,
            player_characters,
        }
    }

    #[must_use]
    pub fn role(&self, group: RoleGroup) -> &RoleIndex {
        &self.roles[group as usize]
    }

    /// Returns the ids of every character owned by `player`.
    #[must_use]
    pub fn characters_of(&self, player: PlayerId) -> &[CharacterId] {
        &self.player_characters[player]
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.player_characters.len()
    }

    /// Total number of mains across all roles.
    #[must_use]
    pub fn main_count(&self) -> usize {
        self.roles.iter().map(|r| r.mains.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use crate::RosterRecord;

    use super::*;

    #[test]
    fn test_index_by_role_and_player() {
        let roster = Roster::from_records([
            RosterRecord::new("alice", "tank", "A1", "warrior", true),
            RosterRecord::new("alice", "ranged", "A2", "mage", false),
            RosterRecord::new("bob", "melee", "B1", "rogue", true),
            RosterRecord::new("bob", "healer", "B2", "priest", false),
            RosterRecord::new("carol", "tank", "C1", "druid", false),
        ])
        .unwrap();
        let index = RosterIndex::new(&roster);

        let tanks = index.role(RoleGroup::Tank);
        assert_eq!(tanks.all, [0, 4]);
        assert_eq!(tanks.mains, [0]);
        assert_eq!(tanks.alts, [4]);

        let dps = index.role(RoleGroup::Dps);
        assert_eq!(dps.all, [1, 2]);
        assert_eq!(dps.mains, [2]);
        assert_eq!(dps.alts, [1]);

        assert_eq!(index.role(RoleGroup::Healer).alts, [3]);

        assert_eq!(index.player_count(), 3);
        assert_eq!(index.characters_of(0), [0, 1]);
        assert_eq!(index.characters_of(1), [2, 3]);
        assert_eq!(index.characters_of(2), [4]);
        assert_eq!(index.main_count(), 2);
    }
}
