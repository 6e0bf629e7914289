//! Roster fixtures shared by the tests of this workspace.
//!
//! Compiled for this crate's own tests and, through the `testing` feature, for
//! the tests of downstream crates.

use crate::{Roster, RosterRecord};

use super::{Context, GroupConstraints, SearchLimits};

/// A 30-player guild that splits into two or three groups.
///
/// - 4 main tanks with an alt healer
/// - 2 main healers with an alt tank
/// - 6 main healers with an alt dps
/// - 6 main dps with an alt dps
/// - 12 main dps
#[must_use]
pub fn guild_roster() -> Roster {
    let mut records = vec![];
    let mut player = |p: usize, entries: &[(&str, &str, bool)]| {
        for (i, (role, class, main)) in entries.iter().enumerate() {
            records.push(RosterRecord::new(
                &format!("p{p}"),
                role,
                &format!("P{p}c{i}"),
                class,
                *main,
            ));
        }
    };
    for p in 0..4 {
        player(p, &[("tank", "warrior", true), ("healer", "priest", false)]);
    }
    for p in 4..6 {
        player(p, &[("healer", "druid", true), ("tank", "paladin", false)]);
    }
    for p in 6..12 {
        player(p, &[("healer", "shaman", true), ("ranged", "mage", false)]);
    }
    for p in 12..18 {
        player(p, &[("melee", "rogue", true), ("ranged", "hunter", false)]);
    }
    for p in 18..30 {
        player(p, &[("ranged", "warlock", true)]);
    }
    Roster::from_records(records).unwrap()
}

#[must_use]
pub fn guild_constraints() -> GroupConstraints {
    GroupConstraints {
        min_group_count: 2,
        max_group_count: 3,
        ..GroupConstraints::default()
    }
}

#[must_use]
pub fn guild_context() -> Context {
    Context::new(guild_roster(), guild_constraints(), SearchLimits::default()).unwrap()
}
