//! Evolutionary search for raid assignments.
//!
//! The search is mutation-only: every offspring is a clone of one parent
//! modified by the engine's constraint-preserving operators, so every
//! individual in every population stays viable.
//!
//! # Key Components
//!
//! - [`genetic`] - Individuals, populations, models and speciation
//! - [`Evolution`] - Island model driver: parallel populations, ring migration,
//!   hall of fame, progress logging and cancellation
//! - [`EvolutionParams`] - Run parameters
//! - [`FitnessStats`] - Population fitness summary
//!
//! # Example
//!
//! ```rust,no_run
//! use raidsplit_engine::{Context, TokenSlotSet};
//! use raidsplit_evolution::{Evolution, EvolutionParams};
//! use raidsplit_strategy::StrategyKind;
//!
//! # fn run(ctx: &Context) -> Result<(), raidsplit_evolution::EvolutionError> {
//! let strategy = StrategyKind::Armor.build(ctx, TokenSlotSet::EMPTY);
//! let evolution = Evolution::new(ctx, strategy.as_ref(), EvolutionParams::default());
//! let result = evolution.run()?;
//! if let Some(best) = result.best() {
//!     println!("best fitness: {}", best.fitness());
//! }
//! # Ok(())
//! # }
//! ```

pub use self::{evolution::*, hall_of_fame::*, params::*, progress::*, stats::*};

mod evolution;
pub mod genetic;
mod hall_of_fame;
mod params;
mod progress;
mod stats;

#[cfg(test)]
pub(crate) mod testing {
    use raidsplit_engine::{Context, Genome, GroupConstraints, Roster, RosterRecord, SearchLimits};

    pub(crate) use raidsplit_engine::engine::testing::guild_context;

    use crate::genetic::Individual;

    /// Five main tanks that cannot all be seated in a single group.
    pub(crate) fn too_many_tanks_context() -> Context {
        let records = (0..5)
            .map(|p| {
                RosterRecord::new(&format!("p{p}"), "tank", &format!("Tank{p}"), "warrior", true)
            })
            .collect::<Vec<_>>();
        let constraints = GroupConstraints {
            min_group_size: 2,
            healer_min_ratio: 0.0,
            min_group_count: 1,
            max_group_count: 1,
            ..GroupConstraints::default()
        };
        let roster = Roster::from_records(records).unwrap();
        Context::new(roster, constraints, SearchLimits::default()).unwrap()
    }

    pub(crate) fn individual(distribution: Vec<Option<usize>>, fitness: f64) -> Individual {
        Individual::from_parts(Genome::from_distribution(1, distribution), fitness)
    }
}
