use std::time::{Duration, Instant};

const STEP_PERCENT: usize = 5;

/// Logs the run progress every 5% of the generations.
#[derive(Debug)]
pub struct Progress {
    total: usize,
    next_percent: usize,
    started: Instant,
}

impl Progress {
    #[must_use]
    pub fn new(total: usize) -> Self {
        Self {
            total,
            next_percent: 0,
            started: Instant::now(),
        }
    }

    /// Logs the best fitness when `generation` crosses the next 5% step.
    ///
    /// Returns the logged percentage.
    pub fn update(&mut self, generation: usize, best: Option<f64>) -> Option<usize> {
        let percent = generation
            .saturating_mul(100)
            .checked_div(self.total)
            .unwrap_or(100)
            .min(100);
        if percent < self.next_percent {
            return None;
        }
        self.next_percent = (percent / STEP_PERCENT + 1) * STEP_PERCENT;

        let best = best.map_or_else(|| "-".to_owned(), |f| format!("{f:.6}"));
        match self.eta(percent) {
            Some(eta) => log::info!("{percent:3}% best={best} eta={}s", eta.as_secs()),
            None => log::info!("{percent:3}% best={best}"),
        }
        Some(percent)
    }

    /// Extrapolates the remaining time from the elapsed time.
    #[expect(clippy::cast_precision_loss)]
    fn eta(&self, percent: usize) -> Option<Duration> {
        if percent == 0 || percent >= 100 {
            return None;
        }
        let remaining = (100 - percent) as f64 / percent as f64;
        Some(self.started.elapsed().mul_f64(remaining))
    }
}
