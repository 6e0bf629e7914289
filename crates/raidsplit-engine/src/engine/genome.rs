use rand::{Rng, seq::SliceRandom as _};
use serde::{Deserialize, Serialize};

use crate::CharacterId;

use super::{Context, Violation, check_viability, is_viable};

/// Index of a group within a [`Genome`], in `0..group_count`.
pub type GroupId = usize;

/// A candidate assignment of every roster character to a group or to the bench.
///
/// `distribution[cid]` is `Some(group)` when character `cid` plays in `group`
/// and `None` when it is benched. Viability is not enforced by the type itself:
/// genomes built by [`Genome::construct`] and modified by [`Genome::mutate`]
/// are viable, genomes built with [`Genome::from_distribution`] must be
/// checked by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Genome {
    group_count: usize,
    distribution: Vec<Option<GroupId>>,
}

impl Genome {
    /// Wraps an existing distribution without checking it.
    #[must_use]
    pub fn from_distribution(group_count: usize, distribution: Vec<Option<GroupId>>) -> Self {
        Self {
            group_count,
            distribution,
        }
    }

    #[must_use]
    pub fn group_count(&self) -> usize {
        self.group_count
    }

    #[must_use]
    pub fn distribution(&self) -> &[Option<GroupId>] {
        &self.distribution
    }

    #[must_use]
    pub fn group_of(&self, cid: CharacterId) -> Option<GroupId> {
        self.distribution[cid]
    }

    /// Iterates over the characters assigned to `group`.
    pub fn members(&self, group: GroupId) -> impl Iterator<Item = CharacterId> + '_ {
        self.distribution
            .iter()
            .enumerate()
            .filter(move |(_, g)| **g == Some(group))
            .map(|(cid, _)| cid)
    }

    /// Iterates over the benched characters.
    pub fn bench(&self) -> impl Iterator<Item = CharacterId> + '_ {
        self.distribution
            .iter()
            .enumerate()
            .filter(|(_, g)| g.is_none())
            .map(|(cid, _)| cid)
    }

    /// Number of characters in each group.
    #[must_use]
    pub fn group_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.group_count];
        for group in self.distribution.iter().flatten() {
            if let Some(size) = sizes.get_mut(*group) {
                *size += 1;
            }
        }
        sizes
    }

    pub fn check(&self, ctx: &Context) -> Result<(), Violation> {
        check_viability(ctx, &self.distribution, self.group_count)
    }

    #[must_use]
    pub fn is_viable(&self, ctx: &Context) -> bool {
        is_viable(ctx, &self.distribution, self.group_count)
    }

    /// Replaces the assignment with an already validated one.
    pub(crate) fn commit(&mut self, group_count: usize, distribution: Vec<Option<GroupId>>) {
        debug_assert_eq!(distribution.len(), self.distribution.len());
        self.group_count = group_count;
        self.distribution = distribution;
    }
}

/// Returns `0..n` in random order.
pub(crate) fn permutation<R>(rng: &mut R, n: usize) -> Vec<usize>
where
    R: Rng + ?Sized,
{
    let mut values = (0..n).collect::<Vec<_>>();
    values.shuffle(rng);
    values
}
