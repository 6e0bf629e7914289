//! Mutation-only genetic algorithm over raid assignments.
//!
//! # Key Components
//!
//! - [`Individual`] - A genome with its objective value (lower is better)
//! - [`Population`] - Individuals kept sorted by fitness, best first
//! - [`Model`] - How one generation produces the next
//! - [`PopulationEvolver`] - Applies a model to a population, optionally per species
//!
//! # Models
//!
//! ## Generational
//!
//! The `elite_count` best individuals survive unchanged. Every other slot is filled
//! by a mutated clone of a parent picked by tournament selection: `tournament_size`
//! individuals are drawn at random and the fittest one wins.
//!
//! ## Mutation only
//!
//! Every individual is replaced by its own mutated clone. In the strict variant the
//! clone only replaces its parent when it has a strictly lower fitness.
//!
//! # Speciation
//!
//! Genomes with different group counts are scored on the same scale but explore very
//! different neighbourhoods. When speciation is enabled, individuals are partitioned by
//! group count and each species evolves on its own, so a group count that scores
//! slightly worse early on is not wiped out by selection.
//!
//! # Crossover
//!
//! There is none. Offspring are produced by cloning and mutating a single parent, since
//! the engine only guarantees feasibility for its own mutation operators.

use std::collections::BTreeMap;

use rand::{Rng, seq::IndexedRandom};
use raidsplit_engine::{ConstructError, Context, Genome, Violation};
use raidsplit_strategy::{Strategy, objective};

use crate::FitnessStats;

/// A candidate assignment and its objective value.
#[derive(Debug, Clone, PartialEq)]
pub struct Individual {
    genome: Genome,
    fitness: f64,
}

impl Individual {
    /// Scores `genome` with the combined objective of `strategy`.
    #[must_use]
    pub fn evaluate(genome: Genome, ctx: &Context, strategy: &dyn Strategy) -> Self {
        let fitness = objective(strategy, ctx, &genome);
        Self { genome, fitness }
    }

    #[must_use]
    pub fn genome(&self) -> &Genome {
        &self.genome
    }

    /// Returns the objective value. Lower is better.
    #[must_use]
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    #[must_use]
    pub fn into_genome(self) -> Genome {
        self.genome
    }

    #[cfg(test)]
    pub(crate) fn from_parts(genome: Genome, fitness: f64) -> Self {
        Self { genome, fitness }
    }
}

/// A population of individuals, sorted by fitness ascending (best first).
#[derive(Debug, Clone, Default)]
pub struct Population {
    individuals: Vec<Individual>,
}

impl Population {
    /// Creates `count` individuals with the constructive initializer.
    ///
    /// Each individual draws its group count uniformly from the context bounds.
    pub fn random<R>(
        ctx: &Context,
        strategy: &dyn Strategy,
        count: usize,
        rng: &mut R,
    ) -> Result<Self, ConstructError>
    where
        R: Rng + ?Sized,
    {
        let individuals = (0..count)
            .map(|_| Genome::random(ctx, rng).map(|g| Individual::evaluate(g, ctx, strategy)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_individuals(individuals))
    }

    /// Wraps individuals, sorting them best first.
    #[must_use]
    pub fn from_individuals(mut individuals: Vec<Individual>) -> Self {
        individuals.sort_by(|a, b| a.fitness.total_cmp(&b.fitness));
        Self { individuals }
    }

    #[must_use]
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    #[must_use]
    pub fn best(&self) -> Option<&Individual> {
        self.individuals.first()
    }

    /// Replaces the worst individuals with `migrants`, keeping the population size.
    ///
    /// Migrants beyond the population size are ignored.
    pub fn replace_worst(&mut self, migrants: &[Individual]) {
        let count = migrants.len().min(self.individuals.len());
        self.individuals.truncate(self.individuals.len() - count);
        self.individuals.extend_from_slice(&migrants[..count]);
        self.individuals.sort_by(|a, b| a.fitness.total_cmp(&b.fitness));
    }

    #[must_use]
    pub fn compute_fitness_stats(&self) -> Option<FitnessStats> {
        let fitness = self.individuals.iter().map(|ind| ind.fitness).collect::<Vec<_>>();
        FitnessStats::from_sorted(&fitness)
    }

    /// Partitions the individuals by group count, keeping each species sorted.
    fn species(&self) -> Vec<Vec<Individual>> {
        let mut species = BTreeMap::<usize, Vec<Individual>>::new();
        for ind in &self.individuals {
            species
                .entry(ind.genome.group_count())
                .or_default()
                .push(ind.clone());
        }
        species.into_values().collect()
    }
}

/// How a generation produces the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Model {
    Generational {
        /// Number of best individuals copied unchanged.
        elite_count: usize,
        tournament_size: usize,
    },
    MutationOnly {
        /// Keep the parent unless its offspring is strictly better.
        strict: bool,
    },
}

/// Produces the next generation of a population.
#[derive(Debug, Clone, Copy)]
pub struct PopulationEvolver<'a> {
    pub ctx: &'a Context,
    pub strategy: &'a dyn Strategy,
    pub model: Model,
    /// Evolve each group count as a separate species.
    pub speciate: bool,
    /// Re-check every offspring against the constraints.
    pub check_viability: bool,
}

impl PopulationEvolver<'_> {
    /// Evolves the population to create the next generation.
    ///
    /// The result has the same size as the input. When `check_viability` is set,
    /// the first infeasible offspring aborts the generation.
    pub fn evolve<R>(&self, population: &Population, rng: &mut R) -> Result<Population, Violation>
    where
        R: Rng + ?Sized,
    {
        assert!(
            population
                .individuals
                .is_sorted_by(|a, b| a.fitness <= b.fitness)
        );

        let mut next_individuals = Vec::with_capacity(population.len());
        if self.speciate {
            for species in population.species() {
                self.evolve_species(&species, &mut next_individuals, rng)?;
            }
        } else {
            self.evolve_species(&population.individuals, &mut next_individuals, rng)?;
        }
        Ok(Population::from_individuals(next_individuals))
    }

    fn evolve_species<R>(
        &self,
        species: &[Individual],
        next_individuals: &mut Vec<Individual>,
        rng: &mut R,
    ) -> Result<(), Violation>
    where
        R: Rng + ?Sized,
    {
        match self.model {
            Model::Generational {
                elite_count,
                tournament_size,
            } => {
                let elite = elite_count.min(species.len());
                next_individuals.extend(species[..elite].iter().cloned());
                for _ in elite..species.len() {
                    let Some(parent) = tournament_select(species, tournament_size, rng) else {
                        break;
                    };
                    next_individuals.push(self.offspring(parent, rng)?);
                }
            }
            Model::MutationOnly { strict } => {
                for parent in species {
                    let child = self.offspring(parent, rng)?;
                    if strict && child.fitness >= parent.fitness {
                        next_individuals.push(parent.clone());
                    } else {
                        next_individuals.push(child);
                    }
                }
            }
        }
        Ok(())
    }

    fn offspring<R>(&self, parent: &Individual, rng: &mut R) -> Result<Individual, Violation>
    where
        R: Rng + ?Sized,
    {
        let mut genome = parent.genome.clone();
        let outcome = genome.mutate(self.ctx, rng);
        if self.check_viability && outcome.is_applied() {
            genome.check(self.ctx)?;
        }
        Ok(Individual::evaluate(genome, self.ctx, self.strategy))
    }
}

/// Selects an individual using tournament selection.
///
/// Draws `tournament_size` distinct individuals and returns the one with the lowest
/// fitness, or `None` when `population` is empty.
fn tournament_select<'a, R>(
    population: &'a [Individual],
    tournament_size: usize,
    rng: &mut R,
) -> Option<&'a Individual>
where
    R: Rng + ?Sized,
{
    assert!(tournament_size > 0);
    population
        .choose_multiple(rng, tournament_size)
        .min_by(|a, b| a.fitness.total_cmp(&b.fitness))
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use raidsplit_strategy::StrategyKind;

    use super::*;
    use crate::testing::guild_context;

    fn seeded() -> Pcg32 {
        Pcg32::seed_from_u64(7)
    }

    fn individual(group_count: usize, fitness: f64) -> Individual {
        Individual {
            genome: Genome::from_distribution(group_count, vec![]),
            fitness,
        }
    }

    mod population {
        use super::*;

        #[test]
        fn test_random_is_sorted_and_viable() {
            let ctx = guild_context();
            let strategy = StrategyKind::Armor.build(&ctx, raidsplit_engine::TokenSlotSet::EMPTY);
            let population =
                Population::random(&ctx, strategy.as_ref(), 20, &mut seeded()).unwrap();

            assert_eq!(population.len(), 20);
            assert!(population.individuals().is_sorted_by(|a, b| a.fitness() <= b.fitness()));
            assert!(population.individuals().iter().all(|ind| ind.genome().is_viable(&ctx)));
            assert_eq!(population.best(), population.individuals().first());
        }

        #[test]
        fn test_replace_worst() {
            let mut population = Population::from_individuals(vec![
                individual(2, 3.0),
                individual(2, 1.0),
                individual(2, 2.0),
            ]);
            population.replace_worst(&[individual(3, 0.5), individual(3, 2.5)]);

            let fitness = population
                .individuals()
                .iter()
                .map(Individual::fitness)
                .collect::<Vec<_>>();
            assert_eq!(fitness, [0.5, 1.0, 2.5]);
        }

        #[test]
        fn test_replace_worst_with_more_migrants_than_individuals() {
            let mut population = Population::from_individuals(vec![individual(2, 3.0)]);
            population.replace_worst(&[individual(2, 0.5), individual(2, 0.1)]);

            assert_eq!(population.len(), 1);
            assert_eq!(population.best().unwrap().fitness(), 0.5);
        }

        #[test]
        fn test_species_by_group_count() {
            let population = Population::from_individuals(vec![
                individual(3, 1.0),
                individual(2, 2.0),
                individual(3, 3.0),
                individual(2, 0.5),
            ]);
            let species = population.species();

            assert_eq!(species.len(), 2);
            assert!(species[0].iter().all(|ind| ind.genome().group_count() == 2));
            assert_eq!(species[0][0].fitness(), 0.5);
            assert_eq!(species[1].len(), 2);
            assert_eq!(species[1][0].fitness(), 1.0);
        }

        #[test]
        fn test_fitness_stats() {
            let population =
                Population::from_individuals(vec![individual(2, 1.0), individual(2, 3.0)]);
            let stats = population.compute_fitness_stats().unwrap();
            assert_eq!(stats.min, 1.0);
            assert_eq!(stats.max, 3.0);
            assert_eq!(stats.mean, 2.0);
        }
    }

    mod evolver {
        use super::*;

        #[test]
        fn test_tournament_prefers_lower_fitness() {
            let population = [individual(2, 3.0), individual(2, 1.0), individual(2, 2.0)];
            let winner = tournament_select(&population, 3, &mut seeded()).unwrap();
            assert_eq!(winner.fitness(), 1.0);
            assert!(tournament_select(&[], 3, &mut seeded()).is_none());
        }

        fn evolve(model: Model, speciate: bool) {
            let ctx = guild_context();
            let strategy = StrategyKind::Armor.build(&ctx, raidsplit_engine::TokenSlotSet::EMPTY);
            let mut rng = seeded();
            let mut population = Population::random(&ctx, strategy.as_ref(), 16, &mut rng).unwrap();
            let evolver = PopulationEvolver {
                ctx: &ctx,
                strategy: strategy.as_ref(),
                model,
                speciate,
                check_viability: true,
            };

            for _ in 0..5 {
                let best = population.best().unwrap().fitness();
                let next = evolver.evolve(&population, &mut rng).unwrap();
                assert_eq!(next.len(), population.len());
                assert!(next.individuals().iter().all(|ind| ind.genome().is_viable(&ctx)));
                if !matches!(model, Model::MutationOnly { strict: false }) {
                    assert!(next.best().unwrap().fitness() <= best);
                }
                population = next;
            }
        }

        #[test]
        fn test_generational_keeps_elite() {
            evolve(
                Model::Generational {
                    elite_count: 2,
                    tournament_size: 3,
                },
                false,
            );
        }

        #[test]
        fn test_generational_with_species() {
            evolve(
                Model::Generational {
                    elite_count: 1,
                    tournament_size: 3,
                },
                true,
            );
        }

        #[test]
        fn test_mutation_only() {
            evolve(Model::MutationOnly { strict: false }, true);
            evolve(Model::MutationOnly { strict: true }, false);
        }

        #[test]
        fn test_species_keep_their_group_count() {
            let ctx = guild_context();
            let strategy = StrategyKind::Armor.build(&ctx, raidsplit_engine::TokenSlotSet::EMPTY);
            let mut rng = seeded();
            let population = Population::random(&ctx, strategy.as_ref(), 16, &mut rng).unwrap();
            let count_of = |population: &Population, group_count| {
                population
                    .individuals()
                    .iter()
                    .filter(|ind| ind.genome().group_count() == group_count)
                    .count()
            };
            let evolver = PopulationEvolver {
                ctx: &ctx,
                strategy: strategy.as_ref(),
                model: Model::Generational {
                    elite_count: 1,
                    tournament_size: 3,
                },
                speciate: true,
                check_viability: true,
            };

            let next = evolver.evolve(&population, &mut rng).unwrap();
            assert_eq!(count_of(&next, 2), count_of(&population, 2));
            assert_eq!(count_of(&next, 3), count_of(&population, 3));
        }
    }
}
