//! Constrained assignment engine for splitting a roster into raids.
//!
//! The crate is split in two layers, mirroring how the data flows:
//!
//! - [`core`] - Immutable domain data: classes, roles, characters, the loaded
//!   [`Roster`] and its precomputed [`RosterIndex`].
//! - [`engine`] - The assignment itself: [`GroupConstraints`], the read-only
//!   [`Context`], the viability predicate, the [`Genome`], its constructive
//!   initializer and the constraint-preserving mutation operators.
//!
//! Every [`Genome`] produced by [`Genome::construct`] or modified by
//! [`Genome::mutate`] satisfies [`check_viability`]. Nothing in the engine holds
//! mutable global state: all functions take the [`Context`] explicitly, so
//! independent genomes may be processed from different threads as long as each
//! thread owns its random number generator.
//!
//! # Example
//!
//! ```
//! use raidsplit_engine::{Context, Genome, GroupConstraints, Roster, SearchLimits};
//!
//! let csv = "\
//! alice,tank,Alitank,warrior,True
//! bob,tank,Bobtank,paladin,True
//! carol,healer,Carheal,priest,True
//! dave,ranged,Daveshot,hunter,True
//! ";
//! let roster = Roster::from_reader(csv.as_bytes()).unwrap();
//! let constraints = GroupConstraints {
//!     min_group_size: 4,
//!     max_group_size: 4,
//!     required_tanks: 2,
//!     healer_min_ratio: 0.25,
//!     healer_max_ratio: 0.25,
//!     min_group_count: 1,
//!     max_group_count: 1,
//! };
//! let ctx = Context::new(roster, constraints, SearchLimits::default()).unwrap();
//!
//! let mut rng = rand::rng();
//! let genome = Genome::construct(&ctx, &mut rng, 1).unwrap();
//! assert!(genome.is_viable(&ctx));
//! ```

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;
