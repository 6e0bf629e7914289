use crate::{Character, CharacterId, Roster, RosterIndex};

use super::{ConstraintsError, GroupConstraints, MutationWeights, SearchLimits};

/// Read-only state shared by every engine call.
///
/// Built once before the search starts. It is never mutated afterwards, so a
/// single context can be shared by reference across threads.
#[derive(Debug, Clone)]
pub struct Context {
    roster: Roster,
    index: RosterIndex,
    constraints: GroupConstraints,
    limits: SearchLimits,
    weights: MutationWeights,
}

impl Context {
    /// Indexes the roster and bundles it with validated constraints.
    pub fn new(
        roster: Roster,
        constraints: GroupConstraints,
        limits: SearchLimits,
    ) -> Result<Self, ConstraintsError> {
        constraints.validate()?;
        let index = RosterIndex::new(&roster);
        Ok(Self {
            roster,
            index,
            constraints,
            limits,
            weights: MutationWeights::default(),
        })
    }

    #[must_use]
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    #[must_use]
    pub fn index(&self) -> &RosterIndex {
        &self.index
    }

    #[must_use]
    pub fn constraints(&self) -> &GroupConstraints {
        &self.constraints
    }

    /// Replaces the default operator weights used by [`Genome::mutate`](super::Genome::mutate).
    #[must_use]
    pub fn with_mutation_weights(self, weights: MutationWeights) -> Self {
        Self { weights, ..self }
    }

    #[must_use]
    pub fn limits(&self) -> &SearchLimits {
        &self.limits
    }

    #[must_use]
    pub fn mutation_weights(&self) -> &MutationWeights {
        &self.weights
    }

    #[inline]
    #[must_use]
    pub fn character(&self, cid: CharacterId) -> &Character {
        self.roster.character(cid)
    }
}
