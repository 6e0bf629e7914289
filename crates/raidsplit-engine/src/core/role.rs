use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// The role a character plays in a raid.
///
/// The declaration order is the display order used when printing a group.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::IsVariant,
)]
pub enum Role {
    Tank,
    Healer,
    Melee,
    Ranged,
}

const ROLE_TOKENS: [(&str, Role); 4] = [
    ("tank", Role::Tank),
    ("healer", Role::Healer),
    ("melee", Role::Melee),
    ("ranged", Role::Ranged),
];

impl Role {
    pub const LEN: usize = 4;

    pub const ALL: [Self; Self::LEN] = [Self::Tank, Self::Healer, Self::Melee, Self::Ranged];

    /// Returns `true` for damage dealers (melee or ranged).
    #[must_use]
    pub const fn is_dps(self) -> bool {
        matches!(self, Self::Melee | Self::Ranged)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tank => "Tank",
            Self::Healer => "Heal",
            Self::Melee => "Melee",
            Self::Ranged => "Ranged",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown role: {token:?}")]
pub struct UnknownRoleError {
    pub token: String,
}

impl FromStr for Role {
    type Err = UnknownRoleError;

    /// Parses a role token, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ROLE_TOKENS
            .iter()
            .find(|(token, _)| token.eq_ignore_ascii_case(s))
            .map(|(_, role)| *role)
            .ok_or_else(|| UnknownRoleError {
                token: s.to_owned(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ignores_case() {
        assert_eq!("Tank".parse::<Role>().unwrap(), Role::Tank);
        assert_eq!("HEALER".parse::<Role>().unwrap(), Role::Healer);
        assert_eq!("melee".parse::<Role>().unwrap(), Role::Melee);
        assert_eq!("Ranged".parse::<Role>().unwrap(), Role::Ranged);
    }

    #[test]
    fn test_parse_unknown() {
        assert!("dps".parse::<Role>().is_err());
    }

    #[test]
    fn test_is_dps() {
        assert!(!Role::Tank.is_dps());
        assert!(!Role::Healer.is_dps());
        assert!(Role::Melee.is_dps());
        assert!(Role::Ranged.is_dps());
    }
}
