use crate::genetic::Individual;

/// Best distinct individuals seen during a run, best first.
#[derive(Debug, Clone)]
pub struct HallOfFame {
    capacity: usize,
    entries: Vec<Individual>,
}

impl HallOfFame {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Vec::with_capacity(capacity + 1),
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[Individual] {
        &self.entries
    }

    #[must_use]
    pub fn best(&self) -> Option<&Individual> {
        self.entries.first()
    }

    #[must_use]
    pub fn into_entries(self) -> Vec<Individual> {
        self.entries
    }

    /// Offers candidates; each is kept if it is better than the current worst entry
    /// and its genome is not already present.
    pub fn update<'a, I>(&mut self, candidates: I)
    where
        I: IntoIterator<Item = &'a Individual>,
    {
        for candidate in candidates {
            if self.entries.len() == self.capacity
                && self
                    .entries
                    .last()
                    .is_none_or(|worst| worst.fitness() <= candidate.fitness())
            {
                continue;
            }
            if self.entries.iter().any(|e| e.genome() == candidate.genome()) {
                continue;
            }
            let pos = self
                .entries
                .partition_point(|e| e.fitness() <= candidate.fitness());
            self.entries.insert(pos, candidate.clone());
            self.entries.truncate(self.capacity);
        }
    }
}

#[cfg(test)]
mod tests {
    use raidsplit_engine::Genome;

    use super::*;
    use crate::testing::individual;

    #[test]
    fn test_keeps_best_distinct() {
        let a = individual(vec![Some(0), None], 2.0);
        let b = individual(vec![Some(1), None], 1.0);
        let c = individual(vec![None, Some(0)], 3.0);

        let mut hof = HallOfFame::new(2);
        hof.update([&a, &b, &b, &c]);

        let fitness = hof.entries().iter().map(Individual::fitness).collect::<Vec<_>>();
        assert_eq!(fitness, [1.0, 2.0]);
        assert_eq!(hof.best(), Some(&b));
    }

    #[test]
    fn test_zero_capacity_keeps_nothing() {
        let mut hof = HallOfFame::new(0);
        hof.update([&individual(vec![Some(0)], 1.0)]);
        assert!(hof.best().is_none());
    }

    #[test]
    fn test_duplicate_genome_is_ignored() {
        let genome = Genome::from_distribution(2, vec![Some(0), Some(1)]);
        let first = individual(genome.distribution().to_vec(), 1.0);
        let mut hof = HallOfFame::new(3);
        hof.update([&first]);
        hof.update([&first]);
        assert_eq!(hof.entries().len(), 1);
    }
}
