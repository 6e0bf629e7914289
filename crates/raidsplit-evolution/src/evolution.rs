//! Island model driver.
//!
//! `population_count` populations evolve side by side. Seeding and every
//! generation run one scoped thread per population; each population owns its
//! own [`Pcg32`], seeded from a master generator seeded by
//! [`EvolutionParams::seed`], so a run is reproducible regardless of thread
//! scheduling.
//!
//! # Generation loop
//!
//! 1. **Evolve** - Every population produces its next generation through
//!    [`PopulationEvolver`], split into species by group count when the group
//!    count range is not a single value.
//! 2. **Migrate** - Every `migration_frequency` generations the best
//!    `migrant_count` individuals of population `i` replace the worst
//!    individuals of population `i + 1`; the last population feeds the first.
//! 3. **Record** - The best individuals of every population are offered to the
//!    [`HallOfFame`], and [`Progress`] logs the best fitness every 5%.
//!
//! # Cancellation
//!
//! The flag returned by [`Evolution::cancel_handle`] is checked between
//! generations. Once set, the run stops and returns the hall of fame gathered so
//! far with [`StopReason::Cancelled`].
//!
//! # Errors
//!
//! A population that cannot be seeded aborts the run with
//! [`EvolutionError::Construct`]. With [`EvolutionParams::check_viability`] set,
//! an offspring failing the constraints aborts it with
//! [`EvolutionError::InfeasibleOffspring`].

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::{Duration, Instant},
};

use rand::SeedableRng;
use rand_pcg::Pcg32;
use raidsplit_engine::{ConstructError, Context, Violation};
use raidsplit_strategy::Strategy;

use crate::{
    EvolutionParams, HallOfFame, Progress,
    genetic::{Individual, Population, PopulationEvolver},
};

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum EvolutionError {
    #[display("failed to seed population {population}")]
    Construct {
        population: usize,
        source: ConstructError,
    },
    #[display(
        "population {population} produced an infeasible offspring at generation {generation}: \
         {violation}"
    )]
    InfeasibleOffspring {
        population: usize,
        generation: usize,
        violation: Violation,
    },
    #[display("worker thread of population {population} panicked")]
    WorkerPanicked { population: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum StopReason {
    #[display("completed")]
    Completed,
    #[display("cancelled")]
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct EvolutionResult {
    /// Best distinct individuals, best first.
    pub hall_of_fame: Vec<Individual>,
    /// Number of generations actually run.
    pub generations: usize,
    pub stop_reason: StopReason,
    pub elapsed: Duration,
}

impl EvolutionResult {
    #[must_use]
    pub fn best(&self) -> Option<&Individual> {
        self.hall_of_fame.first()
    }
}

#[derive(Debug)]
struct Island {
    index: usize,
    rng: Pcg32,
    population: Population,
}

/// Runs the island model over a context and a prepared strategy.
#[derive(Debug)]
pub struct Evolution<'a> {
    ctx: &'a Context,
    strategy: &'a dyn Strategy,
    params: EvolutionParams,
    cancelled: Arc<AtomicBool>,
}

impl<'a> Evolution<'a> {
    #[must_use]
    pub fn new(ctx: &'a Context, strategy: &'a dyn Strategy, params: EvolutionParams) -> Self {
        Self {
            ctx,
            strategy,
            params,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    #[must_use]
    pub fn params(&self) -> &EvolutionParams {
        &self.params
    }

    /// Returns the flag that stops the run between two generations once set.
    #[must_use]
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    /// Seeds the populations, then evolves them until the generation count is
    /// reached or the run is cancelled.
    pub fn run(&self) -> Result<EvolutionResult, EvolutionError> {
        let started = Instant::now();
        let params = &self.params;

        let mut seeder = Pcg32::seed_from_u64(params.seed);
        let mut islands = (0..params.population_count)
            .map(|index| Island {
                index,
                rng: Pcg32::from_rng(&mut seeder),
                population: Population::default(),
            })
            .collect::<Vec<_>>();

        log::info!(
            "Seeding {} populations of {} individuals",
            params.population_count,
            params.population_size
        );
        self.seed(&mut islands)?;

        let group_counts = self.ctx.constraints().group_counts();
        let evolver = PopulationEvolver {
            ctx: self.ctx,
            strategy: self.strategy,
            model: params.model.model(),
            speciate: group_counts.start() != group_counts.end(),
            check_viability: params.check_viability,
        };

        let mut hall_of_fame = HallOfFame::new(params.hall_of_fame_size);
        let mut progress = Progress::new(params.generations);
        update_hall_of_fame(&mut hall_of_fame, &islands, params.hall_of_fame_size);
        progress.update(0, hall_of_fame.best().map(Individual::fitness));

        let mut generation = 0;
        let mut stop_reason = StopReason::Completed;
        while generation < params.generations {
            if self.cancelled.load(Ordering::Relaxed) {
                log::info!("Evolution cancelled after {generation} generations");
                stop_reason = StopReason::Cancelled;
                break;
            }

            self.step(&mut islands, &evolver, generation)?;
            generation += 1;

            if params.migration_frequency > 0
                && params.migrant_count > 0
                && generation % params.migration_frequency == 0
                && generation < params.generations
            {
                log::debug!(
                    "Migrating {} individuals at generation {generation}",
                    params.migrant_count
                );
                migrate(&mut islands, params.migrant_count);
            }

            update_hall_of_fame(&mut hall_of_fame, &islands, params.hall_of_fame_size);
            progress.update(generation, hall_of_fame.best().map(Individual::fitness));
        }

        Ok(EvolutionResult {
            hall_of_fame: hall_of_fame.into_entries(),
            generations: generation,
            stop_reason,
            elapsed: started.elapsed(),
        })
    }

    fn seed(&self, islands: &mut [Island]) -> Result<(), EvolutionError> {
        let (ctx, strategy, size) = (self.ctx, self.strategy, self.params.population_size);
        thread::scope(|s| {
            let handles = islands
                .iter_mut()
                .map(|island| {
                    s.spawn(move || {
                        island.population = Population::random(ctx, strategy, size, &mut island.rng)
                            .map_err(|source| EvolutionError::Construct {
                                population: island.index,
                                source,
                            })?;
                        Ok(())
                    })
                })
                .collect::<Vec<_>>();
            join_all(handles)
        })
    }

    fn step(
        &self,
        islands: &mut [Island],
        evolver: &PopulationEvolver<'_>,
        generation: usize,
    ) -> Result<(), EvolutionError> {
        thread::scope(|s| {
            let handles = islands
                .iter_mut()
                .map(|island| {
                    s.spawn(move || {
                        island.population = evolver
                            .evolve(&island.population, &mut island.rng)
                            .map_err(|violation| EvolutionError::InfeasibleOffspring {
                                population: island.index,
                                generation,
                                violation,
                            })?;
                        if let Some(stats) = island.population.compute_fitness_stats() {
                            log::trace!(
                                "Generation {generation} population {}: {stats}",
                                island.index
                            );
                        }
                        Ok(())
                    })
                })
                .collect::<Vec<_>>();
            join_all(handles)
        })
    }
}

/// Joins every worker, returning the first error in population order.
fn join_all(
    handles: Vec<thread::ScopedJoinHandle<'_, Result<(), EvolutionError>>>,
) -> Result<(), EvolutionError> {
    let mut result = Ok(());
    for (population, handle) in handles.into_iter().enumerate() {
        let outcome = handle
            .join()
            .unwrap_or(Err(EvolutionError::WorkerPanicked { population }));
        if result.is_ok() {
            result = outcome;
        }
    }
    result
}

fn migrate(islands: &mut [Island], migrant_count: usize) {
    if islands.len() < 2 {
        return;
    }
    let emigrants = islands
        .iter()
        .map(|island| {
            island
                .population
                .individuals()
                .iter()
                .take(migrant_count)
                .cloned()
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();
    let count = islands.len();
    for (from, migrants) in emigrants.into_iter().enumerate() {
        islands[(from + 1) % count].population.replace_worst(&migrants);
    }
}

fn update_hall_of_fame(hall_of_fame: &mut HallOfFame, islands: &[Island], size: usize) {
    for island in islands {
        hall_of_fame.update(island.population.individuals().iter().take(size));
    }
}

#[cfg(test)]
mod tests {
    use raidsplit_engine::TokenSlotSet;
    use raidsplit_strategy::StrategyKind;

    use super::*;
    use crate::{ModelKind, testing::guild_context};

    fn small_params() -> EvolutionParams {
        EvolutionParams {
            seed: 42,
            ..EvolutionParams::new(3, 12, 10)
        }
    }

    #[test]
    fn test_evolution_run() {
        let ctx = guild_context();
        let strategy = StrategyKind::Armor.build(&ctx, TokenSlotSet::EMPTY);
        let evolution = Evolution::new(&ctx, strategy.as_ref(), small_params());

        let result = evolution.run().unwrap();
        assert_eq!(result.stop_reason, StopReason::Completed);
        assert_eq!(result.generations, 10);
        assert_eq!(result.hall_of_fame.len(), 1);
        assert!(result.best().unwrap().genome().is_viable(&ctx));
    }

    #[test]
    fn test_same_seed_same_result() {
        let ctx = guild_context();
        let strategy = StrategyKind::Armor.build(&ctx, TokenSlotSet::EMPTY);
        let params = EvolutionParams {
            model: ModelKind::MutationOnlyStrict,
            hall_of_fame_size: 3,
            ..small_params()
        };

        let first = Evolution::new(&ctx, strategy.as_ref(), params).run().unwrap();
        let second = Evolution::new(&ctx, strategy.as_ref(), params).run().unwrap();
        assert_eq!(first.hall_of_fame, second.hall_of_fame);
    }

    #[test]
    fn test_cancellation() {
        let ctx = guild_context();
        let strategy = StrategyKind::Armor.build(&ctx, TokenSlotSet::EMPTY);
        let evolution = Evolution::new(&ctx, strategy.as_ref(), small_params());

        evolution.cancel_handle().store(true, Ordering::Relaxed);
        let result = evolution.run().unwrap();

        assert_eq!(result.stop_reason, StopReason::Cancelled);
        assert_eq!(result.generations, 0);
        assert!(result.best().is_some());
    }

    #[test]
    fn test_construct_error_is_reported() {
        let ctx = crate::testing::too_many_tanks_context();
        let strategy = StrategyKind::Armor.build(&ctx, TokenSlotSet::EMPTY);
        let err = Evolution::new(&ctx, strategy.as_ref(), small_params())
            .run()
            .unwrap_err();
        assert!(matches!(err, EvolutionError::Construct { population: 0, .. }));
    }

    #[test]
    fn test_migration_moves_best_to_next_population() {
        let individual = |fitness| crate::testing::individual(vec![Some(0)], fitness);
        let island = |index, fitness: &[f64]| Island {
            index,
            rng: Pcg32::seed_from_u64(0),
            population: Population::from_individuals(
                fitness.iter().copied().map(individual).collect(),
            ),
        };
        let mut islands = vec![island(0, &[1.0, 5.0, 6.0]), island(1, &[2.0, 3.0, 4.0])];

        migrate(&mut islands, 1);

        let fitness = |island: &Island| {
            island
                .population
                .individuals()
                .iter()
                .map(Individual::fitness)
                .collect::<Vec<_>>()
        };
        assert_eq!(fitness(&islands[0]), [1.0, 2.0, 5.0]);
        assert_eq!(fitness(&islands[1]), [1.0, 2.0, 3.0]);
    }
}
