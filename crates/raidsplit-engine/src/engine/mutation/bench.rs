use rand::Rng;

use crate::{CharacterId, Role};

use super::{
    super::{Context, Genome, Occupancy, permutation},
    Fallback, MutationKind, MutationOutcome,
};

impl Genome {
    /// Moves a seated alt, other than a tank, to the bench.
    ///
    /// The group must stay above the minimum size and inside the healer ratio
    /// band. Falls back to [`Genome::mutate_introduce`] once when nothing can
    /// be benched.
    pub fn mutate_bench<R>(&mut self, ctx: &Context, rng: &mut R) -> MutationOutcome
    where
        R: Rng + ?Sized,
    {
        self.bench_one(ctx, rng, Fallback::Allowed)
    }

    pub(super) fn bench_one<R>(
        &mut self,
        ctx: &Context,
        rng: &mut R,
        fallback: Fallback,
    ) -> MutationOutcome
    where
        R: Rng + ?Sized,
    {
        let occupancy = Occupancy::new(ctx, self.distribution(), self.group_count());
        let outcome = self.redraw(ctx, rng, MutationKind::Bench, |genome, rng| {
            let cid = genome.find_benchable(ctx, &occupancy, rng)?;
            let mut distribution = genome.distribution().to_vec();
            distribution[cid] = None;
            Some(distribution)
        });
        match (outcome, fallback) {
            (Some(outcome), _) => outcome,
            (None, Fallback::Allowed) => {
                log::debug!("Nothing to bench, introducing instead");
                self.introduce(ctx, rng, Fallback::Exhausted)
            }
            (None, Fallback::Exhausted) => {
                log::debug!("Nothing to bench");
                MutationOutcome::Unchanged
            }
        }
    }

    fn find_benchable<R>(
        &self,
        ctx: &Context,
        occupancy: &Occupancy,
        rng: &mut R,
    ) -> Option<CharacterId>
    where
        R: Rng + ?Sized,
    {
        let constraints = ctx.constraints();
        permutation(rng, self.distribution().len())
            .into_iter()
            .find(|cid| {
                let character = ctx.character(*cid);
                let Some(group) = self.group_of(*cid) else {
                    return false;
                };
                if character.main || character.role == Role::Tank {
                    return false;
                }
                let load = occupancy.load(group);
                let healer = usize::from(character.role == Role::Healer);
                load.count > constraints.min_group_size
                    && constraints.healer_ratio_ok(load.healers - healer, load.count - 1)
            })
    }
}
