//! Randomized constructive initializer.
//!
//! A random distribution is almost never viable, so a first genome is built by
//! seating characters role by role into precomputed seats instead.
//!
//! # Seat plan
//!
//! - **Tanks** - Exactly `required_tanks` seats per group.
//! - **Healers** - The number of healers that can be spotted without putting two
//!   characters of one player in the same group, spread evenly over the groups.
//! - **Dps** - Per group, *required* seats that bring the group up to the minimum
//!   size and below the maximum healer ratio, then *bonus* seats usable while the
//!   healer ratio stays above its minimum.
//!
//! # Filling
//!
//! Roles are filled in that order because tanks and healers are the tightest
//! constraints. Inside a role, mains are seated before alts. Each character takes
//! the first free seat, in shuffled order, of a group its player is not yet in.
//! An alt without a seat stays on the bench; a main without a seat means the
//! roster cannot be split into that many groups, which is a [`ConstructError`].
//!
//! # Restarts
//!
//! Seat shapes depend on the draw order and may dead-end: too few tanks seated,
//! or a final distribution that fails [`is_viable`]. Such passes are thrown away
//! and restarted with a fresh shuffle, up to [`SearchLimits::max_restarts`]
//! times. A warning is logged once [`SearchLimits::restart_warning`] restarts
//! have been made.
//!
//! [`SearchLimits::max_restarts`]: super::SearchLimits::max_restarts
//! [`SearchLimits::restart_warning`]: super::SearchLimits::restart_warning

use std::iter;

use rand::{Rng, seq::SliceRandom as _};

use crate::{CharacterId, Role, RoleGroup};

use super::{Context, Genome, GroupConstraints, GroupId, Occupancy, is_viable};

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConstructError {
    #[display("group count {group_count} outside the allowed range {min}..={max}")]
    InvalidGroupCount {
        group_count: usize,
        min: usize,
        max: usize,
    },
    #[display("no seat left for main {role} {name}")]
    UnplaceableMain { name: String, role: Role },
    #[display("no viable distribution over {group_count} groups after {restarts} restarts")]
    RestartLimit { group_count: usize, restarts: usize },
}

/// Shuffled seats; taken seats are moved to the front so the rest can be searched again.
#[derive(Debug)]
struct SeatPool {
    seats: Vec<GroupId>,
    taken: usize,
}

impl SeatPool {
    fn new<R>(mut seats: Vec<GroupId>, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        seats.shuffle(rng);
        Self { seats, taken: 0 }
    }

    fn take<F>(&mut self, mut accept: F) -> Option<GroupId>
    where
        F: FnMut(GroupId) -> bool,
    {
        let found = (self.taken..self.seats.len()).find(|i| accept(self.seats[*i]))?;
        self.seats.swap(self.taken, found);
        self.taken += 1;
        Some(self.seats[self.taken - 1])
    }

    fn is_full(&self) -> bool {
        self.taken == self.seats.len()
    }
}

/// Seat targets for one construction pass, fixed for a given group count.
#[derive(Debug)]
struct SeatPlan {
    group_count: usize,
    tank_seats: Vec<GroupId>,
    healer_seats: Vec<GroupId>,
}

impl SeatPlan {
    fn new(ctx: &Context, group_count: usize) -> Self {
        let required_tanks = ctx.constraints().required_tanks;
        // A player can provide at most one healer per group.
        let spottable_healers = (0..ctx.roster().player_count())
            .map(|player| {
                ctx.index()
                    .characters_of(player)
                    .iter()
                    .filter(|cid| ctx.character(**cid).role == Role::Healer)
                    .count()
                    .min(group_count)
            })
            .sum::<usize>();
        let healers_per_group = spottable_healers.div_ceil(group_count);
        log::trace!(
            "Seat plan for {group_count} groups: {required_tanks} tanks and \
             {healers_per_group} healers per group"
        );

        Self {
            group_count,
            tank_seats: repeat_groups(group_count, required_tanks),
            healer_seats: repeat_groups(group_count, healers_per_group),
        }
    }
}

fn repeat_groups(group_count: usize, per_group: usize) -> Vec<GroupId> {
    (0..group_count)
        .flat_map(|group| iter::repeat_n(group, per_group))
        .collect()
}

/// Returns `(required, bonus)` dps seats for a group already holding its tanks
/// and `healers` healers.
///
/// Required seats bring the group up to the minimum size and dilute the healers
/// below the maximum ratio. Bonus seats may be filled as long as the healers
/// stay above the minimum ratio. Both are capped by the maximum group size.
#[expect(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn dps_seats(constraints: &GroupConstraints, healers: usize) -> (usize, usize) {
    let seated = constraints.required_tanks + healers;
    let room = constraints.max_group_size.saturating_sub(seated);
    let seated_f = seated as f64;
    let healers_f = healers as f64;

    let to_min_size = constraints.min_group_size as f64 - seated_f;
    let to_max_ratio = if healers == 0 {
        0.0
    } else {
        healers_f / constraints.healer_max_ratio - seated_f
    };
    let required = (to_min_size.max(to_max_ratio).max(0.0).ceil() as usize).min(room);

    let headroom = if constraints.healer_min_ratio > 0.0 {
        ((healers_f / constraints.healer_min_ratio - seated_f).floor().max(0.0) as usize).min(room)
    } else {
        room
    };
    (required, headroom.saturating_sub(required))
}

struct Attempt<'a> {
    ctx: &'a Context,
    distribution: Vec<Option<GroupId>>,
    occupancy: Occupancy,
}

impl<'a> Attempt<'a> {
    fn new(ctx: &'a Context, group_count: usize) -> Self {
        Self {
            ctx,
            distribution: vec![None; ctx.roster().len()],
            occupancy: Occupancy::empty(ctx, group_count),
        }
    }

    fn seat(&mut self, cid: CharacterId, group: GroupId) {
        self.distribution[cid] = Some(group);
        self.occupancy.seat(self.ctx, cid, group);
    }

    /// Seats the characters of `role` from `pools`, tried in order. Unseated alts stay benched.
    fn fill<R>(
        &mut self,
        role: RoleGroup,
        pools: &mut [&mut SeatPool],
        rng: &mut R,
    ) -> Result<(), ConstructError>
    where
        R: Rng + ?Sized,
    {
        let ctx = self.ctx;
        for characters in ctx.index().role(role).by_priority() {
            let mut characters = characters.to_vec();
            characters.shuffle(rng);
            for cid in characters {
                let character = ctx.character(cid);
                let occupancy = &self.occupancy;
                let group = pools.iter_mut().find_map(|pool| {
                    pool.take(|group| !occupancy.contains_player(character.player, group))
                });
                match group {
                    Some(group) => self.seat(cid, group),
                    None if character.main => {
                        return Err(ConstructError::UnplaceableMain {
                            name: character.name.clone(),
                            role: character.role,
                        });
                    }
                    None => {}
                }
            }
        }
        Ok(())
    }
}

impl Genome {
    /// Builds a viable genome over a group count drawn uniformly from the allowed range.
    pub fn random<R>(ctx: &Context, rng: &mut R) -> Result<Self, ConstructError>
    where
        R: Rng + ?Sized,
    {
        let group_count = rng.random_range(ctx.constraints().group_counts());
        Self::construct(ctx, rng, group_count)
    }

    /// Builds a viable genome over exactly `group_count` groups.
    ///
    /// Tanks, healers and dps are seated in that order, mains before alts, into
    /// per-role seat targets. Passes that end in an infeasible distribution are
    /// restarted up to [`SearchLimits::max_restarts`](super::SearchLimits) times.
    ///
    /// # Errors
    ///
    /// Fails when a main cannot be seated at all (the roster cannot be split into
    /// `group_count` groups), or when the restart limit is reached.
    pub fn construct<R>(
        ctx: &Context,
        rng: &mut R,
        group_count: usize,
    ) -> Result<Self, ConstructError>
    where
        R: Rng + ?Sized,
    {
        let constraints = ctx.constraints();
        if !constraints.group_counts().contains(&group_count) {
            return Err(ConstructError::InvalidGroupCount {
                group_count,
                min: constraints.min_group_count,
                max: constraints.max_group_count,
            });
        }

        let plan = SeatPlan::new(ctx, group_count);
        let limits = ctx.limits();
        for restart in 0..=limits.max_restarts {
            if restart > 0 && restart == limits.restart_warning {
                log::warn!(
                    "Still looking for a viable distribution over {group_count} groups \
                     after {restart} restarts"
                );
            }
            if let Some(genome) = Self::attempt(ctx, &plan, rng)? {
                log::trace!("Constructed a {group_count}-group genome after {restart} restarts");
                return Ok(genome);
            }
        }
        Err(ConstructError::RestartLimit {
            group_count,
            restarts: limits.max_restarts,
        })
    }

    fn attempt<R>(
        ctx: &Context,
        plan: &SeatPlan,
        rng: &mut R,
    ) -> Result<Option<Self>, ConstructError>
    where
        R: Rng + ?Sized,
    {
        let group_count = plan.group_count;
        let mut attempt = Attempt::new(ctx, group_count);

        let mut tanks = SeatPool::new(plan.tank_seats.clone(), rng);
        attempt.fill(RoleGroup::Tank, &mut [&mut tanks], rng)?;
        if !tanks.is_full() {
            return Ok(None);
        }

        let mut healers = SeatPool::new(plan.healer_seats.clone(), rng);
        attempt.fill(RoleGroup::Healer, &mut [&mut healers], rng)?;

        let mut required = vec![];
        let mut bonus = vec![];
        for group in 0..group_count {
            let load = attempt.occupancy.load(group);
            let (r, b) = dps_seats(ctx.constraints(), load.healers);
            required.extend(iter::repeat_n(group, r));
            bonus.extend(iter::repeat_n(group, b));
        }
        let mut required = SeatPool::new(required, rng);
        let mut bonus = SeatPool::new(bonus, rng);
        attempt.fill(RoleGroup::Dps, &mut [&mut required, &mut bonus], rng)?;

        if !is_viable(ctx, &attempt.distribution, group_count) {
            return Ok(None);
        }
        Ok(Some(Self::from_distribution(group_count, attempt.distribution)))
    }
}
