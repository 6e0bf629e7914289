use std::io;

use raidsplit_engine::{Armor, Character, Context, Genome};

use crate::{Strategy, TradeTally, format_ratio, mean_ratio};

/// Per-armor tallies of one group or of the roster.
pub type ArmorTally = [TradeTally; Armor::LEN];

/// Balances armor trading between groups.
///
/// Mains receive loot of their armor type and alts trade it away. The roster
/// wide `traders / receivers` ratio of every armor type is the target each
/// group should match.
#[derive(Debug, Default, Clone)]
pub struct ArmorStrategy {
    targets: [f64; Armor::LEN],
}

impl ArmorStrategy {
    #[must_use]
    pub fn targets(&self) -> &[f64; Armor::LEN] {
        &self.targets
    }

    fn tally<'a, I>(characters: I) -> ArmorTally
    where
        I: IntoIterator<Item = &'a Character>,
    {
        let mut tally = ArmorTally::default();
        for character in characters {
            let entry = &mut tally[character.armor().index()];
            if character.main {
                entry.receivers += 1;
            } else {
                entry.traders += 1;
            }
        }
        tally
    }

    /// Tallies every group of `genome`.
    #[must_use]
    pub fn group_tallies(ctx: &Context, genome: &Genome) -> Vec<ArmorTally> {
        (0..genome.group_count())
            .map(|group| Self::tally(genome.members(group).map(|cid| ctx.character(cid))))
            .collect()
    }
}

impl Strategy for ArmorStrategy {
    fn name(&self) -> &'static str {
        "armor"
    }

    fn prepare(&mut self, ctx: &Context) {
        let roster = Self::tally(ctx.roster().characters());
        for armor in Armor::ALL {
            self.targets[armor.index()] = roster[armor.index()].ratio().unwrap_or(0.0);
        }
        log::info!(
            "Armor targets: {}",
            Armor::ALL
                .iter()
                .map(|armor| format!("{armor} {:.3}", self.targets[armor.index()]))
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    fn fitness(&self, ctx: &Context, genome: &Genome) -> f64 {
        Self::group_tallies(ctx, genome)
            .iter()
            .flat_map(|tally| {
                Armor::ALL
                    .iter()
                    .map(move |armor| tally[armor.index()].deviation(self.targets[armor.index()]))
            })
            .sum()
    }

    fn write_stats(
        &self,
        ctx: &Context,
        genome: &Genome,
        out: &mut dyn io::Write,
    ) -> io::Result<()> {
        let tallies = Self::group_tallies(ctx, genome);
        for (group, tally) in tallies.iter().enumerate() {
            write!(out, "[Group {:2}] ", group + 1)?;
            for armor in Armor::ALL {
                let entry = tally[armor.index()];
                write!(
                    out,
                    "{armor:<7} {:2}:{:<2} ({})  ",
                    entry.receivers,
                    entry.traders,
                    format_ratio(entry.ratio())
                )?;
            }
            writeln!(out)?;
        }

        write!(out, "[Average]  ")?;
        for armor in Armor::ALL {
            let mean = mean_ratio(tallies.iter().map(|tally| tally[armor.index()]));
            write!(out, "{armor:<7} {:>14}  ", format_ratio(mean))?;
        }
        writeln!(out)?;

        write!(out, "[Optimal]  ")?;
        for armor in Armor::ALL {
            write!(out, "{armor:<7} {:>14}  ", format_ratio(Some(self.targets[armor.index()])))?;
        }
        writeln!(out)
    }
}
