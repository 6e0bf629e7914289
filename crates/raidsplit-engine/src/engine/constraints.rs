use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::{RoleGroup, RosterIndex};

use super::MAX_GROUP_COUNT;

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConstraintsError {
    #[display("invalid group size range: {min}..={max}")]
    InvalidGroupSize { min: usize, max: usize },
    #[display("invalid healer ratio range: {min}..={max}")]
    InvalidHealerRatio { min: f64, max: f64 },
    #[display("invalid group count range: {min}..={max}")]
    InvalidGroupCount { min: usize, max: usize },
    #[display("group count {max} exceeds the supported maximum ({})", MAX_GROUP_COUNT)]
    TooManyGroups { max: usize },
    #[display("no feasible group count for this roster (bounds {min}..={max})")]
    NoFeasibleGroupCount { min: usize, max: usize },
}

/// Feasibility parameters applied to every group.
///
/// Set once before any genome is built and never changed during a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupConstraints {
    /// Smallest allowed group.
    pub min_group_size: usize,
    /// Largest allowed group.
    pub max_group_size: usize,
    /// Exact number of tanks in every group.
    pub required_tanks: usize,
    /// Lowest allowed `healers / size` ratio (inclusive).
    pub healer_min_ratio: f64,
    /// Highest allowed `healers / size` ratio (inclusive).
    pub healer_max_ratio: f64,
    /// Fewest groups a genome may have.
    pub min_group_count: usize,
    /// Most groups a genome may have.
    pub max_group_count: usize,
}

impl Default for GroupConstraints {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl GroupConstraints {
    pub const DEFAULT: Self = Self {
        min_group_size: 10,
        max_group_size: 30,
        required_tanks: 2,
        healer_min_ratio: 0.175,
        healer_max_ratio: 0.5,
        min_group_count: 2,
        max_group_count: 10,
    };

    /// Checks that the parameters are internally consistent.
    pub fn validate(&self) -> Result<(), ConstraintsError> {
        if self.min_group_size == 0 || self.min_group_size > self.max_group_size {
            return Err(ConstraintsError::InvalidGroupSize {
                min: self.min_group_size,
                max: self.max_group_size,
            });
        }
        if !(0.0..=1.0).contains(&self.healer_min_ratio)
            || !(0.0..=1.0).contains(&self.healer_max_ratio)
            || self.healer_min_ratio > self.healer_max_ratio
        {
            return Err(ConstraintsError::InvalidHealerRatio {
                min: self.healer_min_ratio,
                max: self.healer_max_ratio,
            });
        }
        if self.min_group_count == 0 || self.min_group_count > self.max_group_count {
            return Err(ConstraintsError::InvalidGroupCount {
                min: self.min_group_count,
                max: self.max_group_count,
            });
        }
        if self.max_group_count > MAX_GROUP_COUNT {
            return Err(ConstraintsError::TooManyGroups {
                max: self.max_group_count,
            });
        }
        Ok(())
    }

    /// Range of allowed group counts.
    #[must_use]
    pub fn group_counts(&self) -> RangeInclusive<usize> {
        self.min_group_count..=self.max_group_count
    }

    #[must_use]
    pub fn size_ok(&self, count: usize) -> bool {
        (self.min_group_size..=self.max_group_size).contains(&count)
    }

    /// Returns `true` if a group of `count` characters holding `healers` healers
    /// respects the healer ratio band. Empty groups never do.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn healer_ratio_ok(&self, healers: usize, count: usize) -> bool {
        if count == 0 {
            return false;
        }
        let ratio = healers as f64 / count as f64;
        (self.healer_min_ratio..=self.healer_max_ratio).contains(&ratio)
    }

    /// Narrows the group count range to what the roster can possibly fill.
    ///
    /// - Every main tank needs a tank seat, and every main needs a seat.
    /// - No more groups than there are tanks to fill them, nor than the roster
    ///   can populate at the minimum group size.
    pub fn tightened(&self, index: &RosterIndex) -> Result<Self, ConstraintsError> {
        self.validate()?;

        let tanks = index.role(RoleGroup::Tank);
        let characters = RoleGroup::ALL
            .iter()
            .map(|g| index.role(*g).all.len())
            .sum::<usize>();

        let mut min = self.min_group_count;
        let mut max = self.max_group_count;
        if self.required_tanks > 0 {
            min = min.max(tanks.mains.len().div_ceil(self.required_tanks));
            max = max.min(tanks.all.len() / self.required_tanks);
        }
        min = min.max(index.main_count().div_ceil(self.max_group_size));
        max = max.min(characters / self.min_group_size);

        log::info!("Group count bounds: {min}-{max}");
        if min > max {
            return Err(ConstraintsError::NoFeasibleGroupCount { min, max });
        }
        Ok(Self {
            min_group_count: min,
            max_group_count: max,
            ..*self
        })
    }
}

/// Caps on the randomized searches performed by the initializer and the operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchLimits {
    /// Construction restarts before giving up with an error.
    pub max_restarts: usize,
    /// Construction restarts after which a warning is logged once.
    pub restart_warning: usize,
    /// Fresh draws an operator makes when its candidate fails re-validation.
    pub max_redraws: usize,
    /// Repair attempts made when shrinking the group count.
    pub shrink_attempts: usize,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            max_restarts: 10_000,
            restart_warning: 1_000,
            max_redraws: 32,
            shrink_attempts: 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Roster, RosterRecord};

    use super::*;

    #[test]
    fn test_healer_ratio_bounds_are_inclusive() {
        let constraints = GroupConstraints {
            healer_min_ratio: 0.175,
            healer_max_ratio: 0.5,
            ..GroupConstraints::default()
        };
        assert!(constraints.healer_ratio_ok(4, 20));
        assert!(!constraints.healer_ratio_ok(3, 20));
        assert!(constraints.healer_ratio_ok(7, 40));
        assert!(constraints.healer_ratio_ok(10, 20));
        assert!(!constraints.healer_ratio_ok(11, 20));
        assert!(!constraints.healer_ratio_ok(0, 0));
    }

    #[test]
    fn test_validate_rejects_inconsistent_parameters() {
        let base = GroupConstraints::default();
        assert!(base.validate().is_ok());

        let bad_size = GroupConstraints {
            min_group_size: 31,
            ..base
        };
        assert!(matches!(
            bad_size.validate(),
            Err(ConstraintsError::InvalidGroupSize { .. })
        ));

        let bad_ratio = GroupConstraints {
            healer_min_ratio: 0.6,
            ..base
        };
        assert!(matches!(
            bad_ratio.validate(),
            Err(ConstraintsError::InvalidHealerRatio { .. })
        ));

        let too_many = GroupConstraints {
            max_group_count: MAX_GROUP_COUNT + 1,
            ..base
        };
        assert!(matches!(
            too_many.validate(),
            Err(ConstraintsError::TooManyGroups { .. })
        ));
    }

    fn roster_with(tank_mains: usize, tank_alts: usize, dps: usize) -> Roster {
        let mut records = vec![];
        for i in 0..tank_mains {
            records.push(RosterRecord::new(
                &format!("tm{i}"),
                "tank",
                &format!("TM{i}"),
                "warrior",
                true,
            ));
        }
        for i in 0..tank_alts {
            records.push(RosterRecord::new(
                &format!("ta{i}"),
                "tank",
                &format!("TA{i}"),
                "paladin",
                false,
            ));
        }
        for i in 0..dps {
            records.push(RosterRecord::new(
                &format!("d{i}"),
                "ranged",
                &format!("D{i}"),
                "mage",
                true,
            ));
        }
        Roster::from_records(records).unwrap()
    }

    #[test]
    fn test_tightened_uses_tank_and_roster_bounds() {
        // 5 main tanks need 3 groups; 8 tanks fill at most 4; 60 characters fill at most 6.
        let roster = roster_with(5, 3, 52);
        let index = RosterIndex::new(&roster);
        let constraints = GroupConstraints {
            min_group_count: 1,
            max_group_count: 10,
            ..GroupConstraints::default()
        };
        let tightened = constraints.tightened(&index).unwrap();
        assert_eq!(tightened.group_counts(), 3..=4);
    }

    #[test]
    fn test_tightened_reports_empty_range() {
        // 2 tanks can only fill one group but 45 mains need two.
        let roster = roster_with(2, 0, 43);
        let index = RosterIndex::new(&roster);
        let constraints = GroupConstraints {
            min_group_count: 1,
            ..GroupConstraints::default()
        };
        assert!(matches!(
            constraints.tightened(&index),
            Err(ConstraintsError::NoFeasibleGroupCount { min: 2, max: 1 })
        ));
    }
}
