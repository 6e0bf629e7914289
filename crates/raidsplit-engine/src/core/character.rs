use serde::{Deserialize, Serialize};

use super::{Armor, Class, Role, Token, TokenSlotSet};

/// Stable position of a character in the [`Roster`](super::Roster).
pub type CharacterId = usize;

/// Index into the deduplicated player list of the [`Roster`](super::Roster).
pub type PlayerId = usize;

/// An assignable character.
///
/// Characters are immutable once loaded. A player may own several characters,
/// but at most one of them can sit in a given group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub player: PlayerId,
    pub name: String,
    pub class: Class,
    pub role: Role,
    /// A main must always be assigned to a group; alts may sit on the bench.
    pub main: bool,
    /// Token slots this character already owns gear for.
    pub token_slots: TokenSlotSet,
}

impl Character {
    #[must_use]
    pub const fn armor(&self) -> Armor {
        Armor::for_class(self.class)
    }

    #[must_use]
    pub const fn token(&self) -> Token {
        Token::for_class(self.class)
    }
}
