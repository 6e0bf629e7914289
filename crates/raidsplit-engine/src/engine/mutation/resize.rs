use rand::{Rng, seq::SliceRandom as _};

use crate::{CharacterId, Role};

use super::{
    super::{Context, Genome, GroupId, Occupancy, is_viable, permutation},
    MutationKind, MutationOutcome,
};

/// Working copy of a genome while the last group is dissolved.
struct Shrink<'a> {
    ctx: &'a Context,
    distribution: Vec<Option<GroupId>>,
    occupancy: Occupancy,
}

impl Shrink<'_> {
    fn seat(&mut self, cid: CharacterId, group: GroupId) {
        self.distribution[cid] = Some(group);
        self.occupancy.seat(self.ctx, cid, group);
    }

    fn unseat(&mut self, cid: CharacterId, group: GroupId) {
        self.distribution[cid] = None;
        self.occupancy.unseat(self.ctx, cid, group);
    }

    fn members<R>(&self, group: GroupId, rng: &mut R) -> Vec<CharacterId>
    where
        R: Rng + ?Sized,
    {
        let mut members = (0..self.distribution.len())
            .filter(|cid| self.distribution[*cid] == Some(group))
            .collect::<Vec<_>>();
        members.shuffle(rng);
        members
    }

    /// Seats a main from the dissolved group in one of the surviving groups.
    fn rehome<R>(&mut self, main: CharacterId, rng: &mut R) -> bool
    where
        R: Rng + ?Sized,
    {
        let player = self.ctx.character(main).player;
        for group in permutation(rng, self.occupancy.group_count()) {
            if self.occupancy.contains_player(player, group)
                && !self.make_way_for_player(main, group, rng)
            {
                continue;
            }
            if self.occupancy.contains_player(player, group) {
                // The player's own character was replaced by `main` directly.
                return true;
            }
            if self.place(main, group, rng) {
                return true;
            }
        }
        false
    }

    /// Resolves a player conflict in `group`: either `main` directly replaces the
    /// player's seated character, or that character is swapped for a benched
    /// character of the same role from another player.
    ///
    /// Returns `false` if the conflict remains.
    fn make_way_for_player<R>(&mut self, main: CharacterId, group: GroupId, rng: &mut R) -> bool
    where
        R: Rng + ?Sized,
    {
        let ctx = self.ctx;
        let character = ctx.character(main);
        let Some(other) = ctx
            .index()
            .characters_of(character.player)
            .iter()
            .copied()
            .find(|cid| self.distribution[*cid] == Some(group))
        else {
            return true;
        };
        let seated = ctx.character(other);
        if seated.main {
            return false;
        }

        let load = self.occupancy.load(group);
        let healers_after = load.healers + usize::from(character.role == Role::Healer)
            - usize::from(seated.role == Role::Healer);
        let same_kind = seated.role == character.role
            || (seated.role.is_dps() && character.role.is_dps());
        let replaceable = same_kind
            || (seated.role.is_dps()
                && character.role == Role::Healer
                && ctx.constraints().healer_ratio_ok(healers_after, load.count));
        if replaceable {
            self.unseat(other, group);
            self.seat(main, group);
            return true;
        }

        // Swap the seated character for a benched one of the same role.
        let mut jokers = ctx
            .roster()
            .characters()
            .iter()
            .enumerate()
            .filter(|(cid, joker)| {
                self.distribution[*cid].is_none()
                    && *cid != main
                    && joker.role == seated.role
                    && joker.player != character.player
                    && !self.occupancy.contains_player(joker.player, group)
            })
            .map(|(cid, _)| cid)
            .collect::<Vec<_>>();
        jokers.shuffle(rng);
        let Some(joker) = jokers.first().copied() else {
            return false;
        };
        self.unseat(other, group);
        self.seat(joker, group);
        true
    }

    /// Seats `main` in `group`, where its player has no character yet.
    fn place<R>(&mut self, main: CharacterId, group: GroupId, rng: &mut R) -> bool
    where
        R: Rng + ?Sized,
    {
        let ctx = self.ctx;
        let constraints = ctx.constraints();
        let role = ctx.character(main).role;
        let load = self.occupancy.load(group);
        let has_room = load.count < constraints.max_group_size;

        match role {
            Role::Tank => {}
            Role::Healer => {
                if has_room && constraints.healer_ratio_ok(load.healers + 1, load.count + 1) {
                    self.seat(main, group);
                    return true;
                }
                return false;
            }
            Role::Melee | Role::Ranged => {
                if has_room && constraints.healer_ratio_ok(load.healers, load.count + 1) {
                    self.seat(main, group);
                    return true;
                }
            }
        }

        // Take the seat of an alt with an equivalent role.
        let Some(alt) = self.members(group, rng).into_iter().find(|cid| {
            let seated = ctx.character(*cid);
            !seated.main
                && (seated.role == role || (role.is_dps() && seated.role.is_dps()))
        }) else {
            return false;
        };
        self.unseat(alt, group);
        self.seat(main, group);
        true
    }
}

impl Genome {
    /// Changes the number of groups.
    ///
    /// Only shrinking is implemented: the groups are relabeled at random, the
    /// last group is dissolved, its alts are benched and its mains are rehomed
    /// in the surviving groups. Nothing happens at the minimum group count or
    /// when no repair is found within
    /// [`SearchLimits::shrink_attempts`](crate::SearchLimits) attempts.
    pub fn mutate_resize<R>(&mut self, ctx: &Context, rng: &mut R) -> MutationOutcome
    where
        R: Rng + ?Sized,
    {
        if self.group_count() <= ctx.constraints().min_group_count {
            log::debug!("Already at the minimum group count, not shrinking");
            return MutationOutcome::Unchanged;
        }
        self.shrink(ctx, rng)
    }

    fn shrink<R>(&mut self, ctx: &Context, rng: &mut R) -> MutationOutcome
    where
        R: Rng + ?Sized,
    {
        let labels = permutation(rng, self.group_count());
        let relabeled = self
            .distribution()
            .iter()
            .map(|group| group.map(|g| labels[g]))
            .collect::<Vec<_>>();

        let remaining = self.group_count() - 1;
        let base = Occupancy::new(ctx, &relabeled, remaining);
        let (mut mains, alts): (Vec<_>, Vec<_>) = (0..relabeled.len())
            .filter(|cid| relabeled[*cid] == Some(remaining))
            .partition(|cid| ctx.character(*cid).main);

        for attempt in 0..ctx.limits().shrink_attempts {
            let mut shrink = Shrink {
                ctx,
                distribution: relabeled.clone(),
                occupancy: base.clone(),
            };
            for alt in &alts {
                shrink.distribution[*alt] = None;
            }
            mains.shuffle(rng);
            if !mains.iter().all(|main| shrink.rehome(*main, rng)) {
                continue;
            }
            if is_viable(ctx, &shrink.distribution, remaining) {
                log::debug!("Shrunk to {remaining} groups after {} attempts", attempt + 1);
                self.commit(remaining, shrink.distribution);
                return MutationOutcome::Applied(MutationKind::Resize);
            }
        }
        log::warn!(
            "Could not shrink from {} groups after {} attempts",
            self.group_count(),
            ctx.limits().shrink_attempts
        );
        MutationOutcome::Unchanged
    }
}
