use raidsplit_engine::{Class, Context, Genome};

use crate::Strategy;

/// Raid-wide buff brought by a single class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum Buff {
    #[display("Arcane Intellect")]
    ArcaneIntellect,
    #[display("Fortitude")]
    Fortitude,
    #[display("Battle Shout")]
    BattleShout,
    #[display("Chaos Brand")]
    ChaosBrand,
    #[display("Mystic Touch")]
    MysticTouch,
}

impl Buff {
    pub const LEN: usize = 5;

    pub const ALL: [Self; Self::LEN] = [
        Self::ArcaneIntellect,
        Self::Fortitude,
        Self::BattleShout,
        Self::ChaosBrand,
        Self::MysticTouch,
    ];

    #[must_use]
    pub const fn for_class(class: Class) -> Option<Self> {
        match class {
            Class::Mage => Some(Self::ArcaneIntellect),
            Class::Priest => Some(Self::Fortitude),
            Class::Warrior => Some(Self::BattleShout),
            Class::DemonHunter => Some(Self::ChaosBrand),
            Class::Monk => Some(Self::MysticTouch),
            _ => None,
        }
    }

    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Tie-breaking criteria, always below 1.0.
///
/// Penalizes buffs missing from groups (averaged over groups) and the spread
/// between the largest and smallest group.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn secondary_fitness(ctx: &Context, genome: &Genome) -> f64 {
    let group_count = genome.group_count();
    if group_count == 0 {
        return 0.0;
    }

    let mut buffs = vec![0_u8; group_count];
    let mut sizes = vec![0_usize; group_count];
    for (cid, group) in genome.distribution().iter().copied().enumerate() {
        let Some(group) = group.filter(|g| *g < group_count) else {
            continue;
        };
        sizes[group] += 1;
        if let Some(buff) = Buff::for_class(ctx.character(cid).class) {
            buffs[group] |= buff.bit();
        }
    }

    let missing = buffs
        .iter()
        .map(|present| Buff::ALL.iter().filter(|b| present & b.bit() == 0).count())
        .sum::<usize>();
    let missing_malus = missing as f64 / group_count as f64;

    let min = sizes.iter().min().copied().unwrap_or(0);
    let max = sizes.iter().max().copied().unwrap_or(0);

    (missing_malus / Buff::LEN as f64) / 10.0 + ((max - min) as f64 / 20.0) / 10_000.0
}

/// The value minimized by the search: the strategy fitness, rounded to three
/// decimals and scaled to an integer, plus [`secondary_fitness`].
#[must_use]
pub fn objective(strategy: &dyn Strategy, ctx: &Context, genome: &Genome) -> f64 {
    (strategy.fitness(ctx, genome) * 1000.0).round() + secondary_fitness(ctx, genome)
}
