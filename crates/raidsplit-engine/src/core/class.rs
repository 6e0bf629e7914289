use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// A playable class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Class {
    Warrior,
    Paladin,
    Hunter,
    Rogue,
    Priest,
    DeathKnight,
    Shaman,
    Mage,
    Warlock,
    Monk,
    Druid,
    DemonHunter,
}

/// Token to class lookup table. The first entry for each class is its canonical name.
const CLASS_TOKENS: [(&str, Class); 14] = [
    ("warrior", Class::Warrior),
    ("paladin", Class::Paladin),
    ("hunter", Class::Hunter),
    ("rogue", Class::Rogue),
    ("priest", Class::Priest),
    ("deathknight", Class::DeathKnight),
    ("dk", Class::DeathKnight),
    ("shaman", Class::Shaman),
    ("mage", Class::Mage),
    ("warlock", Class::Warlock),
    ("monk", Class::Monk),
    ("druid", Class::Druid),
    ("demonhunter", Class::DemonHunter),
    ("dh", Class::DemonHunter),
];

impl Class {
    /// Number of classes.
    pub const LEN: usize = 12;

    pub const ALL: [Self; Self::LEN] = [
        Self::Warrior,
        Self::Paladin,
        Self::Hunter,
        Self::Rogue,
        Self::Priest,
        Self::DeathKnight,
        Self::Shaman,
        Self::Mage,
        Self::Warlock,
        Self::Monk,
        Self::Druid,
        Self::DemonHunter,
    ];

    /// Returns the canonical lowercase token of this class.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        CLASS_TOKENS
            .iter()
            .find(|(_, class)| *class == self)
            .map_or("", |(token, _)| token)
    }

    /// Returns the class color as an RGB triple, used when printing rosters.
    #[must_use]
    pub const fn color(self) -> (u8, u8, u8) {
        match self {
            Self::Warrior => (198, 155, 109),
            Self::Paladin => (244, 140, 186),
            Self::Hunter => (170, 211, 114),
            Self::Rogue => (255, 244, 104),
            Self::Priest => (255, 255, 255),
            Self::DeathKnight => (196, 30, 58),
            Self::Shaman => (0, 112, 221),
            Self::Mage => (63, 199, 235),
            Self::Warlock => (135, 136, 238),
            Self::Monk => (0, 255, 152),
            Self::Druid => (255, 124, 10),
            Self::DemonHunter => (163, 48, 201),
        }
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown class: {token:?}")]
pub struct UnknownClassError {
    pub token: String,
}

impl FromStr for Class {
    type Err = UnknownClassError;

    /// Parses a class token. Matching is exact: tokens are lowercase.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CLASS_TOKENS
            .iter()
            .find(|(token, _)| *token == s)
            .map(|(_, class)| *class)
            .ok_or_else(|| UnknownClassError {
                token: s.to_owned(),
            })
    }
}
