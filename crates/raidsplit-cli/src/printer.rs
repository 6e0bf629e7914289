use std::io::{self, Write};

use crossterm::style::{Color, Stylize as _};
use raidsplit_engine::{Character, CharacterId, Context, Genome, Role};
use raidsplit_strategy::{Strategy, objective, secondary_fitness};

/// Prints the bench and every group side by side, then the role counts and the strategy stats.
///
/// Each column is sorted by role, class and name. Mains are printed in bold.
pub(crate) fn print_assignment(
    out: &mut impl Write,
    ctx: &Context,
    genome: &Genome,
    strategy: &dyn Strategy,
) -> io::Result<()> {
    let width = ctx.roster().longest_name().max("Group 10".len());

    let mut columns = vec![column(ctx, genome.bench())];
    columns.extend((0..genome.group_count()).map(|group| column(ctx, genome.members(group))));

    write!(out, "{:<width$}", "Bench")?;
    for group in 0..genome.group_count() {
        write!(out, " | {:<width$}", format!("Group {}", group + 1))?;
    }
    writeln!(out)?;
    writeln!(out, "{}", "-".repeat((width + 3) * columns.len() - 3))?;

    let rows = columns.iter().map(Vec::len).max().unwrap_or(0);
    for row in 0..rows {
        for (i, column) in columns.iter().enumerate() {
            if i > 0 {
                write!(out, " | ")?;
            }
            match column.get(row) {
                Some(character) => write_name(out, character, width)?,
                None => write!(out, "{:width$}", "")?,
            }
        }
        writeln!(out)?;
    }
    writeln!(out)?;

    for group in 0..genome.group_count() {
        write!(out, "[Group {:2}] {:2} characters:", group + 1, columns[group + 1].len())?;
        for role in Role::ALL {
            let count = columns[group + 1].iter().filter(|c| c.role == role).count();
            write!(out, " {count:2} {role}")?;
        }
        writeln!(out)?;
    }
    writeln!(out)?;

    strategy.write_stats(ctx, genome, out)?;
    writeln!(out)?;
    writeln!(
        out,
        "{} fitness: {:.6}  secondary: {:.6}  objective: {:.6}",
        strategy.name(),
        strategy.fitness(ctx, genome),
        secondary_fitness(ctx, genome),
        objective(strategy, ctx, genome)
    )
}

fn column<I>(ctx: &Context, members: I) -> Vec<&Character>
where
    I: IntoIterator<Item = CharacterId>,
{
    let mut characters = members
        .into_iter()
        .map(|cid| ctx.character(cid))
        .collect::<Vec<_>>();
    characters.sort_by(|a, b| (a.role, a.class, &a.name).cmp(&(b.role, b.class, &b.name)));
    characters
}

fn write_name(out: &mut impl Write, character: &Character, width: usize) -> io::Result<()> {
    let (r, g, b) = character.class.color();
    let name = format!("{:<width$}", character.name).with(Color::Rgb { r, g, b });
    if character.main {
        write!(out, "{}", name.bold())
    } else {
        write!(out, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use raidsplit_engine::{GroupConstraints, Roster, RosterRecord, SearchLimits, TokenSlotSet};
    use raidsplit_strategy::StrategyKind;

    use super::*;

    #[test]
    fn test_print_assignment() {
        let roster = Roster::from_records(vec![
            RosterRecord::new("alice", "tank", "Alitank", "warrior", true),
            RosterRecord::new("alice", "ranged", "Alimage", "mage", false),
            RosterRecord::new("bob", "healer", "Bobheal", "priest", true),
            RosterRecord::new("carol", "tank", "Carotank", "paladin", true),
            RosterRecord::new("dave", "healer", "Daveheal", "druid", true),
        ])
        .unwrap();
        let constraints = GroupConstraints {
            min_group_size: 2,
            max_group_size: 2,
            required_tanks: 1,
            healer_min_ratio: 0.5,
            healer_max_ratio: 0.5,
            min_group_count: 2,
            max_group_count: 2,
        };
        let ctx = Context::new(roster, constraints, SearchLimits::default()).unwrap();
        let genome = Genome::from_distribution(2, vec![Some(0), None, Some(0), Some(1), Some(1)]);
        let strategy = StrategyKind::Armor.build(&ctx, TokenSlotSet::EMPTY);

        let mut out = vec![];
        print_assignment(&mut out, &ctx, &genome, strategy.as_ref()).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("Bench"));
        assert!(text.contains("Group 2"));
        for name in ["Alitank", "Alimage", "Bobheal", "Carotank", "Daveheal"] {
            assert!(text.contains(name), "{name} missing from:\n{text}");
        }
        assert!(text.contains("[Group  1]  2 characters:  1 Tank  1 Heal  0 Melee  0 Ranged"));
        assert!(text.contains("[Optimal]"));
        assert!(text.contains("armor fitness:"));
    }
}
