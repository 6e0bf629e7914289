//! Constraint-preserving mutation operators.
//!
//! Every operator searches, in random order, for a move that keeps the genome
//! viable, applies it to a copy and re-validates the copy before committing.
//! A candidate that fails re-validation is discarded and a fresh one is drawn,
//! up to [`SearchLimits::max_redraws`] times. When no legal move exists the
//! genome is left untouched and [`MutationOutcome::Unchanged`] is returned; this
//! is not an error.
//!
//! # Operators
//!
//! - **Swap** - Exchanges the groups of two characters of the same player. A
//!   tank only swaps with a tank, a main never moves to the bench and a healer
//!   only moves when both groups keep their healer ratio. There is no fallback.
//! - **Introduce** - Seats a benched non-tank in a group below the maximum size
//!   that does not hold its player yet, keeping the healer ratio. Falls back to
//!   Bench when nobody can be seated.
//! - **Bench** - Unseats a seated alt that is not a tank, from a group above the
//!   minimum size, keeping the healer ratio. Falls back to Introduce when nobody
//!   can be benched.
//! - **Resize** - Drops one group after relabelling the groups at random: its
//!   alts go to the bench and its mains are re-homed by a repair search that
//!   may displace alts of the same role. A no-op at the minimum group count.
//!   Growing the group count is not supported.
//!
//! The Introduce/Bench fallback happens at most once per call, so the two
//! operators never hand the genome back and forth.
//!
//! # Selection
//!
//! [`Genome::mutate`] draws one operator per call from the context's
//! [`MutationWeights`]. Resize has weight zero by default.
//!
//! [`SearchLimits::max_redraws`]: super::SearchLimits::max_redraws

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{Context, Genome, GroupId, is_viable};

mod bench;
mod introduce;
mod resize;
mod swap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum MutationKind {
    #[display("swap")]
    Swap,
    #[display("introduce")]
    Introduce,
    #[display("bench")]
    Bench,
    #[display("resize")]
    Resize,
}

impl MutationKind {
    pub const ALL: [Self; 4] = [Self::Swap, Self::Introduce, Self::Bench, Self::Resize];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum MutationOutcome {
    Applied(MutationKind),
    Unchanged,
}

/// Relative draw weights of the operators used by [`Genome::mutate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationWeights {
    pub swap: u32,
    pub introduce: u32,
    pub bench: u32,
    /// Zero by default: shrinking is rarely useful once populations are split by group count.
    pub resize: u32,
}

impl Default for MutationWeights {
    fn default() -> Self {
        Self {
            swap: 1,
            introduce: 1,
            bench: 1,
            resize: 0,
        }
    }
}

impl MutationWeights {
    #[must_use]
    pub fn weight(&self, kind: MutationKind) -> u32 {
        match kind {
            MutationKind::Swap => self.swap,
            MutationKind::Introduce => self.introduce,
            MutationKind::Bench => self.bench,
            MutationKind::Resize => self.resize,
        }
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        MutationKind::ALL.iter().map(|k| self.weight(*k)).sum()
    }

    /// Draws an operator proportionally to its weight, or `None` if every weight is zero.
    pub fn pick<R>(&self, rng: &mut R) -> Option<MutationKind>
    where
        R: Rng + ?Sized,
    {
        let total = self.total();
        if total == 0 {
            return None;
        }
        let mut roll = rng.random_range(0..total);
        for kind in MutationKind::ALL {
            let weight = self.weight(kind);
            if roll < weight {
                return Some(kind);
            }
            roll -= weight;
        }
        None
    }
}

/// Whether an operator may hand over to its counterpart when it finds no move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fallback {
    Allowed,
    Exhausted,
}

impl Genome {
    /// Applies one operator drawn from the context's [`MutationWeights`].
    pub fn mutate<R>(&mut self, ctx: &Context, rng: &mut R) -> MutationOutcome
    where
        R: Rng + ?Sized,
    {
        match ctx.mutation_weights().pick(rng) {
            Some(MutationKind::Swap) => self.mutate_swap(ctx, rng),
            Some(MutationKind::Introduce) => self.mutate_introduce(ctx, rng),
            Some(MutationKind::Bench) => self.mutate_bench(ctx, rng),
            Some(MutationKind::Resize) => self.mutate_resize(ctx, rng),
            None => MutationOutcome::Unchanged,
        }
    }

    /// Runs `find` up to `max_redraws` times, committing the first candidate that
    /// passes validation.
    ///
    /// `find` returns `None` when no legal move exists at all, which ends the search.
    fn redraw<R, F>(
        &mut self,
        ctx: &Context,
        rng: &mut R,
        kind: MutationKind,
        mut find: F,
    ) -> Option<MutationOutcome>
    where
        R: Rng + ?Sized,
        F: FnMut(&Self, &mut R) -> Option<Vec<Option<GroupId>>>,
    {
        for _ in 0..ctx.limits().max_redraws.max(1) {
            let distribution = find(self, rng)?;
            if is_viable(ctx, &distribution, self.group_count()) {
                self.commit(self.group_count(), distribution);
                return Some(MutationOutcome::Applied(kind));
            }
            log::debug!("{kind} candidate failed validation, redrawing");
        }
        log::debug!("{kind} gave up after {} redraws", ctx.limits().max_redraws);
        Some(MutationOutcome::Unchanged)
    }
}
