//! Assignment engine: constraints, viability, genome and its operators.
//!
//! - [`GroupConstraints`] - Feasibility parameters shared by every group
//! - [`Context`] - Read-only bundle of roster, index, constraints and search limits
//! - [`check_viability`] / [`is_viable`] - The feasibility predicate
//! - [`Genome`] - A candidate assignment of characters to groups
//! - [`Genome::construct`] - Randomized constructive initializer
//! - [`Genome::mutate`] - Constraint-preserving mutation operators
//!
//! # Feasibility
//!
//! A distribution is viable when every group holds between `min_group_size` and
//! `max_group_size` characters, exactly `required_tanks` tanks, a healer ratio
//! inside `[healer_min_ratio, healer_max_ratio]`, at most one character per
//! player, and no main character sits on the bench.
//!
//! # Search
//!
//! Random reassignment almost never yields a viable distribution, so both the
//! initializer and the operators perform bounded randomized searches that only
//! consider moves preserving the role and ratio constraints, then re-check the
//! result with [`check_viability`]. Retries are capped by [`SearchLimits`].

pub use self::{
    constraints::*, construct::*, context::*, genome::*, group_set::*, group_stats::*,
    mutation::*, viability::*,
};

mod constraints;
mod construct;
mod context;
mod genome;
mod group_set;
mod group_stats;
mod mutation;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
mod viability;
