use rand::{Rng, seq::SliceRandom as _};

use crate::{CharacterId, Role};

use super::{
    super::{Context, Genome, Occupancy, permutation},
    MutationKind, MutationOutcome,
};

impl Genome {
    /// Exchanges the positions of two characters owned by the same player.
    ///
    /// Either side may be on the bench. Tanks only swap with tanks, mains never
    /// move to the bench, and a swap that moves a healer between groups must
    /// keep both groups inside the healer ratio band.
    pub fn mutate_swap<R>(&mut self, ctx: &Context, rng: &mut R) -> MutationOutcome
    where
        R: Rng + ?Sized,
    {
        let occupancy = Occupancy::new(ctx, self.distribution(), self.group_count());
        let outcome = self.redraw(ctx, rng, MutationKind::Swap, |genome, rng| {
            let (a, b) = genome.find_swap(ctx, &occupancy, rng)?;
            let mut distribution = genome.distribution().to_vec();
            distribution.swap(a, b);
            Some(distribution)
        });
        outcome.unwrap_or_else(|| {
            log::debug!("No swappable pair of characters");
            MutationOutcome::Unchanged
        })
    }

    fn find_swap<R>(
        &self,
        ctx: &Context,
        occupancy: &Occupancy,
        rng: &mut R,
    ) -> Option<(CharacterId, CharacterId)>
    where
        R: Rng + ?Sized,
    {
        for a in permutation(rng, self.distribution().len()) {
            let mut partners = ctx
                .index()
                .characters_of(ctx.character(a).player)
                .to_vec();
            partners.shuffle(rng);
            if let Some(b) = partners
                .into_iter()
                .find(|b| self.swap_allowed(ctx, occupancy, a, *b))
            {
                return Some((a, b));
            }
        }
        None
    }

    fn swap_allowed(
        &self,
        ctx: &Context,
        occupancy: &Occupancy,
        a: CharacterId,
        b: CharacterId,
    ) -> bool {
        let (ga, gb) = (self.group_of(a), self.group_of(b));
        // Same player: equal positions can only mean both benched.
        if a == b || ga == gb {
            return false;
        }
        let (ca, cb) = (ctx.character(a), ctx.character(b));
        if (ca.main && gb.is_none()) || (cb.main && ga.is_none()) {
            return false;
        }
        if ca.role == cb.role {
            return true;
        }
        if ca.role == Role::Tank || cb.role == Role::Tank {
            return false;
        }
        let constraints = ctx.constraints();
        let (losing, gaining) = match (ca.role, cb.role) {
            (Role::Healer, _) => (ga, gb),
            (_, Role::Healer) => (gb, ga),
            // melee and ranged are interchangeable
            _ => return true,
        };
        if let Some(group) = losing {
            let load = occupancy.load(group);
            if !constraints.healer_ratio_ok(load.healers - 1, load.count) {
                return false;
            }
        }
        if let Some(group) = gaining {
            let load = occupancy.load(group);
            if !constraints.healer_ratio_ok(load.healers + 1, load.count) {
                return false;
            }
        }
        true
    }
}
