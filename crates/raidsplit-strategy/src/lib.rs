//! Fitness strategies scoring raid assignments.
//!
//! A [`Strategy`] measures how far a [`Genome`] is from an ideal split of loot
//! between groups. Lower fitness is better. Strategies only read the genome;
//! feasibility is the engine's concern.
//!
//! - [`ArmorStrategy`] - Balances armor traders (alts) against armor receivers (mains)
//! - [`TokenStrategy`] - Balances tier token traders against receivers on chosen slots,
//!   with the armor balance as a tie-breaker
//! - [`objective`] - Combines a strategy with the class buff and group size criteria
//!
//! # Example
//!
//! ```rust,no_run
//! use raidsplit_engine::{Context, Genome, TokenSlotSet};
//! use raidsplit_strategy::{StrategyKind, objective};
//!
//! # fn run(ctx: &Context, genome: &Genome) {
//! let strategy = StrategyKind::Armor.build(ctx, TokenSlotSet::EMPTY);
//! let score = objective(strategy.as_ref(), ctx, genome);
//! # let _ = score;
//! # }
//! ```

use std::{fmt, io};

use raidsplit_engine::{Context, Genome, TokenSlotSet};

pub use self::{armor::*, objective::*, tally::*, token::*};

mod armor;
mod objective;
mod tally;
mod token;

/// Loot balancing criterion evaluated on every genome.
///
/// [`Strategy::prepare`] is called once on the full roster before the search;
/// afterwards the strategy is shared read-only between worker threads.
pub trait Strategy: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    /// Computes roster-wide targets.
    fn prepare(&mut self, ctx: &Context);

    /// Returns the distance from the targets; lower is better.
    fn fitness(&self, ctx: &Context, genome: &Genome) -> f64;

    /// Writes per-group counts and ratios, their average and the targets.
    fn write_stats(
        &self,
        ctx: &Context,
        genome: &Genome,
        out: &mut dyn io::Write,
    ) -> io::Result<()>;
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::FromStr)]
pub enum StrategyKind {
    #[default]
    #[display("armor")]
    Armor,
    #[display("token")]
    Token,
}

impl StrategyKind {
    /// Creates and prepares the strategy; `token_slots` is only used by [`StrategyKind::Token`].
    #[must_use]
    pub fn build(self, ctx: &Context, token_slots: TokenSlotSet) -> Box<dyn Strategy> {
        let mut strategy: Box<dyn Strategy> = match self {
            Self::Armor => Box::new(ArmorStrategy::default()),
            Self::Token => Box::new(TokenStrategy::new(token_slots)),
        };
        strategy.prepare(ctx);
        strategy
    }
}
