/// Receivers and traders of one kind of loot, within a group or the whole roster.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TradeTally {
    pub receivers: usize,
    pub traders: usize,
}

impl TradeTally {
    /// Traders per receiver, or `None` when nobody receives.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn ratio(self) -> Option<f64> {
        (self.receivers > 0).then(|| self.traders as f64 / self.receivers as f64)
    }

    /// Distance of the ratio from `target`; groups without receivers count as on target.
    #[must_use]
    pub fn deviation(self, target: f64) -> f64 {
        self.ratio().map_or(0.0, |ratio| (target - ratio).abs())
    }
}

/// Mean of the defined ratios, `None` if there are none.
#[expect(clippy::cast_precision_loss)]
pub(crate) fn mean_ratio<I>(tallies: I) -> Option<f64>
where
    I: IntoIterator<Item = TradeTally>,
{
    let (sum, count) = tallies
        .into_iter()
        .filter_map(TradeTally::ratio)
        .fold((0.0, 0_usize), |(sum, count), ratio| (sum + ratio, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Formats an optional ratio for the stats tables.
pub(crate) fn format_ratio(ratio: Option<f64>) -> String {
    ratio.map_or_else(|| "-".to_owned(), |r| format!("{r:.6}"))
}
