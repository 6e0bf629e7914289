use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::Class;

/// Tier token family. Each class redeems exactly one token family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Token {
    Mystic = 0,
    Venerated = 1,
    Zenith = 2,
    Dreadful = 3,
}

impl Token {
    pub const LEN: usize = 4;

    pub const ALL: [Self; Self::LEN] = [
        Self::Mystic,
        Self::Venerated,
        Self::Zenith,
        Self::Dreadful,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn for_class(class: Class) -> Self {
        match class {
            Class::Hunter | Class::Mage | Class::Druid => Self::Mystic,
            Class::Paladin | Class::Priest | Class::Shaman => Self::Venerated,
            Class::Warrior | Class::Rogue | Class::Monk => Self::Zenith,
            Class::DeathKnight | Class::Warlock | Class::DemonHunter => Self::Dreadful,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Mystic => "Mystic",
            Self::Venerated => "Venerated",
            Self::Zenith => "Zenith",
            Self::Dreadful => "Dreadful",
        };
        f.pad(s)
    }
}

/// Gear slot a token can be redeemed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TokenSlot {
    Head = 0,
    Shoulders = 1,
    Chest = 2,
    Hands = 3,
    Legs = 4,
}

const SLOT_TOKENS: [(&str, TokenSlot); TokenSlot::LEN] = [
    ("head", TokenSlot::Head),
    ("shoulders", TokenSlot::Shoulders),
    ("chest", TokenSlot::Chest),
    ("hands", TokenSlot::Hands),
    ("legs", TokenSlot::Legs),
];

impl TokenSlot {
    pub const LEN: usize = 5;

    pub const ALL: [Self; Self::LEN] = [
        Self::Head,
        Self::Shoulders,
        Self::Chest,
        Self::Hands,
        Self::Legs,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Single letter used in the compact [`TokenSlotSet`] display.
    const fn letter(self) -> char {
        match self {
            Self::Head | Self::Hands => 'H',
            Self::Shoulders => 'S',
            Self::Chest => 'C',
            Self::Legs => 'L',
        }
    }
}

impl fmt::Display for TokenSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Head => "Head",
            Self::Shoulders => "Shoulders",
            Self::Chest => "Chest",
            Self::Hands => "Hands",
            Self::Legs => "Legs",
        };
        f.pad(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown token slot: {token:?}")]
pub struct UnknownTokenSlotError {
    pub token: String,
}

impl FromStr for TokenSlot {
    type Err = UnknownTokenSlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SLOT_TOKENS
            .iter()
            .find(|(token, _)| token.eq_ignore_ascii_case(s))
            .map(|(_, slot)| *slot)
            .ok_or_else(|| UnknownTokenSlotError {
                token: s.to_owned(),
            })
    }
}

/// Set of [`TokenSlot`]s stored as a bitmask.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenSlotSet(u8);

impl TokenSlotSet {
    pub const EMPTY: Self = Self(0);

    #[must_use]
    pub const fn contains(self, slot: TokenSlot) -> bool {
        self.0 & (1 << slot as u8) != 0
    }

    pub fn insert(&mut self, slot: TokenSlot) {
        self.0 |= 1 << slot as u8;
    }

    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = TokenSlot> {
        TokenSlot::ALL.into_iter().filter(move |slot| self.contains(*slot))
    }
}

impl FromIterator<TokenSlot> for TokenSlotSet {
    fn from_iter<T: IntoIterator<Item = TokenSlot>>(iter: T) -> Self {
        let mut set = Self::EMPTY;
        for slot in iter {
            set.insert(slot);
        }
        set
    }
}

impl fmt::Display for TokenSlotSet {
    /// Formats as a fixed five-letter mask, e.g. `H---L` for head and legs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for slot in TokenSlot::ALL {
            let c = if self.contains(slot) { slot.letter() } else { '-' };
            fmt::Write::write_char(f, c)?;
        }
        Ok(())
    }
}

impl FromStr for TokenSlotSet {
    type Err = UnknownTokenSlotError;

    /// Parses a `/`-separated slot list such as `head/legs`. The empty string is the empty set.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Self::EMPTY);
        }
        s.split('/').map(str::parse::<TokenSlot>).collect()
    }
}
