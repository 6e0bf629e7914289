use std::io;

use raidsplit_engine::{Character, Context, Genome, Token, TokenSlot, TokenSlotSet};

use crate::{ArmorStrategy, Strategy, TradeTally, format_ratio, mean_ratio};

/// Weight of the token balance relative to the armor balance.
const TOKEN_WEIGHT: f64 = 100_000.0;

/// Pieces owned beyond which a character no longer needs any token.
const FULL_SET: usize = 4;

/// Part a character plays in trading one token slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRole {
    Receiver,
    Trader,
    Neutral,
}

impl TokenRole {
    #[must_use]
    pub fn of(character: &Character, slot: TokenSlot) -> Self {
        if character.token_slots.contains(slot) || character.token_slots.len() >= FULL_SET {
            Self::Trader
        } else if character.main {
            Self::Receiver
        } else {
            Self::Neutral
        }
    }
}

/// Per-token, per-slot tallies of one group or of the roster.
pub type TokenTally = [[TradeTally; TokenSlot::LEN]; Token::LEN];

/// Balances tier token trading on the targeted slots, then armor trading.
#[derive(Debug, Clone)]
pub struct TokenStrategy {
    target_slots: TokenSlotSet,
    targets: [[f64; TokenSlot::LEN]; Token::LEN],
    armor: ArmorStrategy,
}

impl TokenStrategy {
    #[must_use]
    pub fn new(target_slots: TokenSlotSet) -> Self {
        Self {
            target_slots,
            targets: [[0.0; TokenSlot::LEN]; Token::LEN],
            armor: ArmorStrategy::default(),
        }
    }

    #[must_use]
    pub fn target_slots(&self) -> TokenSlotSet {
        self.target_slots
    }

    #[must_use]
    pub fn target(&self, token: Token, slot: TokenSlot) -> f64 {
        self.targets[token.index()][slot.index()]
    }

    fn tally<'a, I>(&self, characters: I) -> TokenTally
    where
        I: IntoIterator<Item = &'a Character>,
    {
        let mut tally = TokenTally::default();
        for character in characters {
            let token = character.token().index();
            for slot in self.target_slots.iter() {
                let entry = &mut tally[token][slot.index()];
                match TokenRole::of(character, slot) {
                    TokenRole::Receiver => entry.receivers += 1,
                    TokenRole::Trader => entry.traders += 1,
                    TokenRole::Neutral => {}
                }
            }
        }
        tally
    }

    fn group_tallies(&self, ctx: &Context, genome: &Genome) -> Vec<TokenTally> {
        (0..genome.group_count())
            .map(|group| self.tally(genome.members(group).map(|cid| ctx.character(cid))))
            .collect()
    }
}

impl Strategy for TokenStrategy {
    fn name(&self) -> &'static str {
        "token"
    }

    fn prepare(&mut self, ctx: &Context) {
        log::info!("Computing token targets for slots {}", self.target_slots);
        let roster = self.tally(ctx.roster().characters());
        for token in Token::ALL {
            for slot in self.target_slots.iter() {
                self.targets[token.index()][slot.index()] =
                    roster[token.index()][slot.index()].ratio().unwrap_or(0.0);
            }
        }
        self.armor.prepare(ctx);
    }

    fn fitness(&self, ctx: &Context, genome: &Genome) -> f64 {
        let mut delta = 0.0;
        for tally in self.group_tallies(ctx, genome) {
            for token in Token::ALL {
                for slot in self.target_slots.iter() {
                    delta += tally[token.index()][slot.index()].deviation(self.target(token, slot));
                }
            }
        }
        delta * TOKEN_WEIGHT + self.armor.fitness(ctx, genome)
    }

    fn write_stats(
        &self,
        ctx: &Context,
        genome: &Genome,
        out: &mut dyn io::Write,
    ) -> io::Result<()> {
        let tallies = self.group_tallies(ctx, genome);
        for slot in self.target_slots.iter() {
            for (group, tally) in tallies.iter().enumerate() {
                write!(out, "[Group {:2}] ", group + 1)?;
                for token in Token::ALL {
                    let entry = tally[token.index()][slot.index()];
                    write!(
                        out,
                        "{token:<9} {slot:<9} {:2}:{:<2} ({})  ",
                        entry.receivers,
                        entry.traders,
                        format_ratio(entry.ratio())
                    )?;
                }
                writeln!(out)?;
            }

            write!(out, "[Average]  ")?;
            for token in Token::ALL {
                let mean =
                    mean_ratio(tallies.iter().map(|tally| tally[token.index()][slot.index()]));
                write!(out, "{token:<9} {slot:<9} {:>14}  ", format_ratio(mean))?;
            }
            writeln!(out)?;

            write!(out, "[Optimal]  ")?;
            for token in Token::ALL {
                write!(
                    out,
                    "{token:<9} {slot:<9} {:>14}  ",
                    format_ratio(Some(self.target(token, slot)))
                )?;
            }
            writeln!(out)?;
            writeln!(out)?;
        }
        self.armor.write_stats(ctx, genome, out)
    }
}

#[cfg(test)]
mod tests {
    use raidsplit_engine::RosterRecord;

    use crate::testing::context;

    use super::*;

    fn record(player: &str, name: &str, class: &str, main: bool, slots: &str) -> RosterRecord {
        let mut record = RosterRecord::new(player, "ranged", name, class, main);
        slots.clone_into(&mut record.token_slots);
        record
    }

    #[test]
    fn test_token_role() {
        let ctx = context(vec![
            record("p0", "Owner", "mage", false, "head"),
            record("p1", "Collector", "mage", false, "shoulders/chest/hands/legs"),
            record("p2", "Main", "mage", true, "legs"),
            record("p3", "Alt", "mage", false, ""),
        ]);
        let head = TokenSlot::Head;
        assert_eq!(TokenRole::of(ctx.character(0), head), TokenRole::Trader);
        assert_eq!(TokenRole::of(ctx.character(1), head), TokenRole::Trader);
        assert_eq!(TokenRole::of(ctx.character(2), head), TokenRole::Receiver);
        assert_eq!(TokenRole::of(ctx.character(2), TokenSlot::Legs), TokenRole::Trader);
        assert_eq!(TokenRole::of(ctx.character(3), head), TokenRole::Neutral);
    }

    #[test]
    fn test_fitness_weights_tokens_over_armor() {
        let ctx = context(vec![
            record("p0", "Mage0", "mage", true, ""),
            record("p0", "Hunter0", "hunter", false, "head"),
            record("p1", "Druid1", "druid", true, ""),
            record("p1", "Priest1", "priest", false, ""),
        ]);
        let mut strategy = TokenStrategy::new("head".parse().unwrap());
        strategy.prepare(&ctx);
        assert!((strategy.target(Token::Mystic, TokenSlot::Head) - 0.5).abs() < 1e-12);

        // Mystic head: group 0 trades 1:1, group 1 receives 1:0, both 0.5 off target.
        // Armor: group 0 cloth 1:0 is 1.0 off target; group 1 leather 1:0 is on target.
        let genome = Genome::from_distribution(2, vec![Some(0), Some(0), Some(1), Some(1)]);
        assert!((strategy.fitness(&ctx, &genome) - 100_001.0).abs() < 1e-6);
    }

    #[test]
    fn test_untargeted_slots_are_ignored() {
        let ctx = context(vec![
            record("p0", "Mage0", "mage", true, ""),
            record("p1", "Hunter1", "hunter", false, "head"),
        ]);
        let mut strategy = TokenStrategy::new(TokenSlotSet::EMPTY);
        strategy.prepare(&ctx);
        let genome = Genome::from_distribution(2, vec![Some(0), Some(1)]);
        let mut armor = ArmorStrategy::default();
        armor.prepare(&ctx);
        assert!((strategy.fitness(&ctx, &genome) - armor.fitness(&ctx, &genome)).abs() < 1e-12);
    }
}
