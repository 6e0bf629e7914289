use std::fmt;

use serde::{Deserialize, Serialize};

use super::Class;

/// Armor type worn by a class. Loot of a given armor type can only be traded
/// between characters wearing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Armor {
    Cloth = 0,
    Leather = 1,
    Mail = 2,
    Plate = 3,
}

impl Armor {
    pub const LEN: usize = 4;

    pub const ALL: [Self; Self::LEN] = [Self::Cloth, Self::Leather, Self::Mail, Self::Plate];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn for_class(class: Class) -> Self {
        match class {
            Class::Priest | Class::Mage | Class::Warlock => Self::Cloth,
            Class::Rogue | Class::Monk | Class::Druid | Class::DemonHunter => Self::Leather,
            Class::Hunter | Class::Shaman => Self::Mail,
            Class::Warrior | Class::Paladin | Class::DeathKnight => Self::Plate,
        }
    }
}

impl fmt::Display for Armor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Cloth => "Cloth",
            Self::Leather => "Leather",
            Self::Mail => "Mail",
            Self::Plate => "Plate",
        };
        f.pad(s)
    }
}
