use loadrep_model::Measure;
use loadrep_stats::{Describe, reject_outliers, sort_paired};

use crate::config::CleanupOptions;
use crate::context::RunClock;

/// Collecting half of the two-phase action statistics protocol.
///
/// Statistics only exist on [`ActionStats`], and [`finalize`]
/// consumes the accumulator, so reading early or computing twice does
/// not compile.
///
/// [`finalize`]: ActionAccumulator::finalize
#[derive(Debug, Default)]
pub struct ActionAccumulator {
    values: Vec<f64>,
    dates: Vec<f64>,
    errors: u64,
}

impl ActionAccumulator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one successful sample. Non-finite values are dropped
    /// rather than poisoning the whole data set.
    pub fn add_sample(&mut self, date: i64, value: f64) {
        if !value.is_finite() {
            return;
        }
        self.dates.push(date as f64);
        self.values.push(value);
    }

    pub fn increment_errors(&mut self) {
        self.errors += 1;
    }

    #[must_use]
    pub fn count(&self) -> u64 {
        self.values.len() as u64
    }

    #[must_use]
    pub fn count_errors(&self) -> u64 {
        self.errors
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.errors == 0
    }

    /// Computes the final statistics, applying outlier rejection when
    /// configured. Throughput spans the whole run via `clock`.
    #[must_use]
    pub fn finalize(self, clock: &RunClock, cleanup: Option<CleanupOptions>) -> ActionStats {
        let mut values = self.values;
        let mut dates = self.dates;

        let trimmed = match cleanup {
            Some(opts) => reject_outliers(
                &mut values,
                &mut dates,
                opts.keep_factor(),
                opts.keep_percentage(),
            ),
            None => 0,
        };

        let describe = Describe::from_values(&values);

        // Cleanup leaves the pairs value-sorted; series want date order.
        sort_paired(&mut dates, &mut values);
        let points: Vec<(f64, f64)> = dates.into_iter().zip(values).collect();

        let throughput = match clock.span_ms() {
            Some(span) if span > 0 => describe.n() as f64 * 1000.0 / span as f64,
            _ => -1.0,
        };

        ActionStats {
            describe,
            points,
            errors: self.errors,
            trimmed,
            throughput,
        }
    }
}

/// Finalized statistics of one action key or probe field.
#[derive(Debug)]
pub struct ActionStats {
    describe: Describe,
    points: Vec<(f64, f64)>,
    errors: u64,
    trimmed: usize,
    throughput: f64,
}

impl ActionStats {
    #[must_use]
    pub fn size(&self) -> u64 {
        self.describe.n()
    }

    #[must_use]
    pub fn count_errors(&self) -> u64 {
        self.errors
    }

    /// Samples removed by outlier rejection.
    #[must_use]
    pub fn trimmed(&self) -> usize {
        self.trimmed
    }

    #[must_use]
    pub fn mean(&self) -> f64 {
        self.describe.mean()
    }

    #[must_use]
    pub fn std_dev(&self) -> f64 {
        self.describe.std_dev()
    }

    #[must_use]
    pub fn min(&self) -> f64 {
        self.describe.min()
    }

    #[must_use]
    pub fn max(&self) -> f64 {
        self.describe.max()
    }

    #[must_use]
    pub fn median(&self) -> f64 {
        self.describe.median()
    }

    #[must_use]
    pub fn percentile(&self, p: f64) -> f64 {
        self.describe.percentile(p)
    }

    /// Events per second over the run span; -1 when the span is zero.
    #[must_use]
    pub fn throughput(&self) -> f64 {
        self.throughput
    }

    #[must_use]
    pub fn describe(&self) -> &Describe {
        &self.describe
    }

    /// Retained `(date, value)` samples in date order.
    #[must_use]
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// Report measure for this action key. Float moments are truncated
    /// to whole milliseconds; an empty set truncates to zero.
    #[must_use]
    pub fn measure(&self, name: &str) -> Measure {
        Measure {
            name: name.to_string(),
            size: self.size(),
            count_errors: self.errors,
            average: self.mean() as i64,
            median: self.median() as i64,
            min: self.min() as i64,
            max: self.max() as i64,
            std_dev: self.std_dev(),
            throughput: self.throughput,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn clock(first: i64, last: i64) -> RunClock {
        let mut clock = RunClock::new();
        clock.record(first);
        clock.record(last);
        clock
    }

    #[test]
    fn non_finite_samples_are_dropped() {
        let mut acc = ActionAccumulator::new();
        acc.add_sample(1, 10.0);
        acc.add_sample(2, f64::NAN);
        acc.add_sample(3, f64::INFINITY);
        acc.add_sample(4, 20.0);
        assert_eq!(acc.count(), 2);
    }

    #[test]
    fn finalize_computes_moments_and_throughput() {
        let mut acc = ActionAccumulator::new();
        for (date, value) in [(0, 100.0), (500, 300.0), (1000, 200.0)] {
            acc.add_sample(date, value);
        }
        acc.increment_errors();

        let stats = acc.finalize(&clock(0, 1000), None);
        assert_eq!(stats.size(), 3);
        assert_eq!(stats.count_errors(), 1);
        assert_eq!(stats.mean(), 200.0);
        assert_eq!(stats.min(), 100.0);
        assert_eq!(stats.max(), 300.0);
        assert_eq!(stats.median(), 200.0);
        // 3 samples over a 1-second span.
        assert_eq!(stats.throughput(), 3.0);
    }

    #[test]
    fn zero_span_yields_sentinel_throughput() {
        let mut acc = ActionAccumulator::new();
        acc.add_sample(5, 1.0);
        let stats = acc.finalize(&clock(5, 5), None);
        assert_eq!(stats.throughput(), -1.0);

        let empty = ActionAccumulator::new().finalize(&RunClock::new(), None);
        assert_eq!(empty.throughput(), -1.0);
    }

    #[test]
    fn points_come_back_in_date_order_after_cleanup() {
        let mut acc = ActionAccumulator::new();
        // 35 inliers with descending dates plus a far outlier.
        for i in 0..35 {
            acc.add_sample(1000 - i, 100.0 + (i % 3) as f64);
        }
        acc.add_sample(2000, 50_000.0);

        let opts = match CleanupOptions::new(2.0, 0.0) {
            Ok(o) => o,
            Err(err) => panic!("options should validate: {err}"),
        };
        let stats = acc.finalize(&clock(0, 2000), Some(opts));

        assert_eq!(stats.trimmed(), 1);
        assert_eq!(stats.size(), 35);
        for pair in stats.points().windows(2) {
            assert!(pair[0].0 <= pair[1].0);
        }
    }

    #[test]
    fn empty_stats_truncate_to_zero_in_measures() {
        let stats = ActionAccumulator::new().finalize(&RunClock::new(), None);
        let measure = stats.measure("nothing");
        assert_eq!(measure.size, 0);
        assert_eq!(measure.average, 0);
        assert_eq!(measure.median, 0);
        assert_eq!(measure.throughput, -1.0);
    }

    #[test]
    fn invalid_cleanup_options_are_rejected_before_use() {
        assert!(matches!(
            CleanupOptions::new(0.5, 150.0),
            Err(Error::InvalidKeepPercentage)
        ));
    }
}
