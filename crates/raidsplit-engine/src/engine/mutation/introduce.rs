use rand::Rng;

use crate::{CharacterId, Role};

use super::{
    super::{Context, Genome, GroupId, Occupancy, permutation},
    Fallback, MutationKind, MutationOutcome,
};

impl Genome {
    /// Moves a benched non-tank character into a group with room for it.
    ///
    /// Falls back to [`Genome::mutate_bench`] once when nothing can be introduced.
    pub fn mutate_introduce<R>(&mut self, ctx: &Context, rng: &mut R) -> MutationOutcome
    where
        R: Rng + ?Sized,
    {
        self.introduce(ctx, rng, Fallback::Allowed)
    }

    pub(super) fn introduce<R>(
        &mut self,
        ctx: &Context,
        rng: &mut R,
        fallback: Fallback,
    ) -> MutationOutcome
    where
        R: Rng + ?Sized,
    {
        let occupancy = Occupancy::new(ctx, self.distribution(), self.group_count());
        let outcome = self.redraw(ctx, rng, MutationKind::Introduce, |genome, rng| {
            let (cid, group) = genome.find_introduction(ctx, &occupancy, rng)?;
            let mut distribution = genome.distribution().to_vec();
            distribution[cid] = Some(group);
            Some(distribution)
        });
        match (outcome, fallback) {
            (Some(outcome), _) => outcome,
            (None, Fallback::Allowed) => {
                log::debug!("Nothing to introduce, benching instead");
                self.bench_one(ctx, rng, Fallback::Exhausted)
            }
            (None, Fallback::Exhausted) => {
                log::debug!("Nothing to introduce");
                MutationOutcome::Unchanged
            }
        }
    }

    fn find_introduction<R>(
        &self,
        ctx: &Context,
        occupancy: &Occupancy,
        rng: &mut R,
    ) -> Option<(CharacterId, GroupId)>
    where
        R: Rng + ?Sized,
    {
        let constraints = ctx.constraints();
        for cid in permutation(rng, self.distribution().len()) {
            let character = ctx.character(cid);
            if self.group_of(cid).is_some() || character.role == Role::Tank {
                continue;
            }
            let healer = usize::from(character.role == Role::Healer);
            for group in permutation(rng, self.group_count()) {
                let load = occupancy.load(group);
                if load.count < constraints.max_group_size
                    && !occupancy.contains_player(character.player, group)
                    && constraints.healer_ratio_ok(load.healers + healer, load.count + 1)
                {
                    return Some((cid, group));
                }
            }
        }
        None
    }
}
