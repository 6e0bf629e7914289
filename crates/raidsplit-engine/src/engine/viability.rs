use crate::{CharacterId, PlayerId, PlayerSet, Role};

use super::{Context, GroupId};

/// The first reason a distribution was found infeasible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::IsVariant)]
pub enum Violation {
    #[display("main character #{cid} is benched")]
    BenchedMain { cid: CharacterId },
    #[display("character #{cid} assigned to group {group} but only {group_count} groups exist")]
    GroupOutOfRange {
        cid: CharacterId,
        group: GroupId,
        group_count: usize,
    },
    #[display("player #{player} has two characters in group {group}")]
    DuplicatePlayer { player: PlayerId, group: GroupId },
    #[display("group {group} has bad size {count}")]
    BadSize { group: GroupId, count: usize },
    #[display("group {group} has bad tank count {tanks}")]
    BadTankCount { group: GroupId, tanks: usize },
    #[display("group {group} has bad healer ratio {healers}/{count}")]
    BadHealerRatio {
        group: GroupId,
        healers: usize,
        count: usize,
    },
}

#[derive(Debug)]
struct GroupTally {
    count: usize,
    tanks: usize,
    healers: usize,
    players: PlayerSet,
}

/// Checks a whole distribution against the group constraints.
///
/// `distribution[cid]` is the group of character `cid`, or `None` when benched.
/// Returns the first violation found; the order in which violations are
/// detected carries no meaning.
pub fn check_viability(
    ctx: &Context,
    distribution: &[Option<GroupId>],
    group_count: usize,
) -> Result<(), Violation> {
    debug_assert_eq!(distribution.len(), ctx.roster().len());

    let player_count = ctx.roster().player_count();
    let mut groups = (0..group_count)
        .map(|_| GroupTally {
            count: 0,
            tanks: 0,
            healers: 0,
            players: PlayerSet::with_capacity(player_count),
        })
        .collect::<Vec<_>>();

    for (cid, group) in distribution.iter().enumerate() {
        let character = ctx.character(cid);
        let Some(group) = *group else {
            if character.main {
                return Err(Violation::BenchedMain { cid });
            }
            continue;
        };
        let Some(tally) = groups.get_mut(group) else {
            return Err(Violation::GroupOutOfRange {
                cid,
                group,
                group_count,
            });
        };
        if !tally.players.insert(character.player) {
            return Err(Violation::DuplicatePlayer {
                player: character.player,
                group,
            });
        }
        tally.count += 1;
        match character.role {
            Role::Tank => tally.tanks += 1,
            Role::Healer => tally.healers += 1,
            Role::Melee | Role::Ranged => {}
        }
    }

    let constraints = ctx.constraints();
    for (group, tally) in groups.iter().enumerate() {
        if !constraints.size_ok(tally.count) {
            return Err(Violation::BadSize {
                group,
                count: tally.count,
            });
        }
        if tally.tanks != constraints.required_tanks {
            return Err(Violation::BadTankCount {
                group,
                tanks: tally.tanks,
            });
        }
        if !constraints.healer_ratio_ok(tally.healers, tally.count) {
            return Err(Violation::BadHealerRatio {
                group,
                healers: tally.healers,
                count: tally.count,
            });
        }
    }

    Ok(())
}

/// Boolean form of [`check_viability`]; the violation, if any, is logged at debug level.
#[must_use]
pub fn is_viable(ctx: &Context, distribution: &[Option<GroupId>], group_count: usize) -> bool {
    match check_viability(ctx, distribution, group_count) {
        Ok(()) => true,
        Err(violation) => {
            log::debug!("Rejected distribution: {violation}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{GroupConstraints, Roster, RosterRecord, SearchLimits};

    use super::*;

    /// Two players, each with a main tank and an alt healer.
    fn two_player_context(min_size: usize, max_size: usize) -> Context {
        let roster = Roster::from_records([
            RosterRecord::new("alice", "tank", "AliceTank", "warrior", true),
            RosterRecord::new("alice", "healer", "AliceHeal", "priest", false),
            RosterRecord::new("bob", "tank", "BobTank", "paladin", true),
            RosterRecord::new("bob", "healer", "BobHeal", "druid", false),
        ])
        .unwrap();
        let constraints = GroupConstraints {
            min_group_size: min_size,
            max_group_size: max_size,
            required_tanks: 1,
            healer_min_ratio: 0.175,
            healer_max_ratio: 0.5,
            min_group_count: 1,
            max_group_count: 2,
        };
        Context::new(roster, constraints, SearchLimits::default()).unwrap()
    }

    /// Enumerates every distribution of `n` characters over the bench and `group_count` groups.
    fn all_distributions(n: usize, group_count: usize) -> Vec<Vec<Option<GroupId>>> {
        let choices = group_count + 1;
        let total = choices.pow(u32::try_from(n).unwrap());
        (0..total)
            .map(|mut code| {
                (0..n)
                    .map(|_| {
                        let choice = code % choices;
                        code /= choices;
                        choice.checked_sub(1)
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_single_group_with_two_main_tanks_is_never_viable() {
        let ctx = two_player_context(2, 2);
        let distributions = all_distributions(4, 1);
        assert_eq!(distributions.len(), 16);
        for distribution in &distributions {
            assert!(!is_viable(&ctx, distribution, 1), "{distribution:?}");
        }
    }

    #[test]
    fn test_two_groups_have_exactly_two_viable_distributions() {
        let ctx = two_player_context(2, 2);
        let viable = all_distributions(4, 2)
            .into_iter()
            .filter(|d| is_viable(&ctx, d, 2))
            .collect::<Vec<_>>();
        assert_eq!(
            viable,
            [
                vec![Some(0), Some(1), Some(1), Some(0)],
                vec![Some(1), Some(0), Some(0), Some(1)],
            ]
        );
    }

    #[test]
    fn test_reports_specific_violations() {
        let ctx = two_player_context(2, 2);

        assert_eq!(
            check_viability(&ctx, &[None, None, Some(0), None], 1),
            Err(Violation::BenchedMain { cid: 0 })
        );
        assert_eq!(
            check_viability(&ctx, &[Some(0), Some(0), Some(0), None], 1),
            Err(Violation::DuplicatePlayer {
                player: 0,
                group: 0
            })
        );
        assert_eq!(
            check_viability(&ctx, &[Some(0), None, Some(2), None], 1),
            Err(Violation::GroupOutOfRange {
                cid: 2,
                group: 2,
                group_count: 1
            })
        );
        assert_eq!(
            check_viability(&ctx, &[Some(0), None, Some(1), None], 2),
            Err(Violation::BadSize { group: 0, count: 1 })
        );
        assert_eq!(
            check_viability(&ctx, &[Some(0), None, Some(0), None], 1),
            Err(Violation::BadTankCount { group: 0, tanks: 2 })
        );
    }

    #[test]
    fn test_healer_ratio_boundary_in_group_of_twenty() {
        let mut records = vec![
            RosterRecord::new("t0", "tank", "T0", "warrior", true),
            RosterRecord::new("t1", "tank", "T1", "paladin", true),
        ];
        for i in 0..4 {
            records.push(RosterRecord::new(
                &format!("h{i}"),
                "healer",
                &format!("H{i}"),
                "priest",
                false,
            ));
        }
        for i in 0..15 {
            records.push(RosterRecord::new(
                &format!("d{i}"),
                "melee",
                &format!("D{i}"),
                "rogue",
                false,
            ));
        }
        let roster = Roster::from_records(records).unwrap();
        let constraints = GroupConstraints {
            min_group_size: 10,
            max_group_size: 30,
            required_tanks: 2,
            healer_min_ratio: 0.175,
            healer_max_ratio: 0.5,
            min_group_count: 1,
            max_group_count: 1,
        };
        let ctx = Context::new(roster, constraints, SearchLimits::default()).unwrap();

        // 2 tanks + 4 healers + 14 dps = 20, ratio 0.2
        let mut distribution = vec![Some(0); 21];
        distribution[20] = None;
        assert_eq!(check_viability(&ctx, &distribution, 1), Ok(()));

        // 2 tanks + 3 healers + 15 dps = 20, ratio 0.15
        distribution[5] = None;
        distribution[20] = Some(0);
        assert_eq!(
            check_viability(&ctx, &distribution, 1),
            Err(Violation::BadHealerRatio {
                group: 0,
                healers: 3,
                count: 20
            })
        );
    }
}
