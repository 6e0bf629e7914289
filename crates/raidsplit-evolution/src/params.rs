use serde::{Deserialize, Serialize};

use crate::genetic::Model;

const ELITE_COUNT: usize = 2;
const TOURNAMENT_SIZE: usize = 3;

/// Evolution model, named in kebab case in reports and on the command line.
#[derive(
    Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "kebab-case")]
pub enum ModelKind {
    /// Elitism plus tournament selection; every offspring is a mutated clone.
    #[default]
    #[display("generational")]
    Generational,
    /// Every individual is replaced by its mutated clone.
    #[display("mutation-only")]
    MutationOnly,
    /// Every individual is replaced by its mutated clone only when the clone is better.
    #[display("mutation-only-strict")]
    MutationOnlyStrict,
}

impl ModelKind {
    #[must_use]
    pub const fn model(self) -> Model {
        match self {
            Self::Generational => Model::Generational {
                elite_count: ELITE_COUNT,
                tournament_size: TOURNAMENT_SIZE,
            },
            Self::MutationOnly => Model::MutationOnly { strict: false },
            Self::MutationOnlyStrict => Model::MutationOnly { strict: true },
        }
    }
}

/// Parameters of an evolution run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvolutionParams {
    /// Number of island populations evolved in parallel.
    pub population_count: usize,
    /// Individuals per population.
    pub population_size: usize,
    pub generations: usize,
    pub model: ModelKind,
    /// Generations between two ring migrations; zero disables migration.
    pub migration_frequency: usize,
    /// Individuals sent to the next population at each migration.
    pub migrant_count: usize,
    pub hall_of_fame_size: usize,
    pub seed: u64,
    /// Re-check every offspring and abort the run on an infeasible one.
    pub check_viability: bool,
}

impl Default for EvolutionParams {
    fn default() -> Self {
        Self::new(12, 3000, 2000)
    }
}

impl EvolutionParams {
    /// Creates parameters with the migration schedule derived from the sizes:
    /// five migrations per run, each moving a quarter of a population.
    #[must_use]
    pub fn new(population_count: usize, population_size: usize, generations: usize) -> Self {
        Self {
            population_count,
            population_size,
            generations,
            model: ModelKind::default(),
            migration_frequency: generations / 5,
            migrant_count: population_size / 4,
            hall_of_fame_size: 1,
            seed: 0,
            check_viability: true,
        }
    }
}
