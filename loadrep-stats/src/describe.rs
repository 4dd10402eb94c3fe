/// Descriptive statistics over a finite value set.
///
/// Keeps a sorted copy for percentile queries. Empty sets answer NaN for
/// the floating-point accessors (callers truncating to integers get 0).
#[derive(Debug, Clone)]
pub struct Describe {
    sorted: Vec<f64>,
    mean: f64,
    std_dev: f64,
}

impl Describe {
    #[must_use]
    pub fn from_values(values: &[f64]) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let n = sorted.len();
        if n == 0 {
            return Self {
                sorted,
                mean: f64::NAN,
                std_dev: f64::NAN,
            };
        }

        let sum: f64 = sorted.iter().sum();
        let mean = sum / n as f64;

        // Bias-corrected sample standard deviation (n - 1).
        let std_dev = if n < 2 {
            0.0
        } else {
            let m2: f64 = sorted.iter().map(|v| (v - mean) * (v - mean)).sum();
            (m2 / (n as f64 - 1.0)).sqrt()
        };

        Self {
            sorted,
            mean,
            std_dev,
        }
    }

    #[must_use]
    pub fn n(&self) -> u64 {
        self.sorted.len() as u64
    }

    /// The underlying values, ascending.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.sorted
    }

    #[must_use]
    pub fn mean(&self) -> f64 {
        self.mean
    }

    #[must_use]
    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }

    #[must_use]
    pub fn min(&self) -> f64 {
        self.sorted.first().copied().unwrap_or(f64::NAN)
    }

    #[must_use]
    pub fn max(&self) -> f64 {
        self.sorted.last().copied().unwrap_or(f64::NAN)
    }

    /// Percentile `p` in `(0, 100]` using the R-6 estimate:
    /// `pos = p * (n + 1) / 100`, linear interpolation between the two
    /// closest ranks, clamped to min/max. Out-of-range `p` answers NaN.
    #[must_use]
    pub fn percentile(&self, p: f64) -> f64 {
        let n = self.sorted.len();
        if n == 0 || !(p > 0.0 && p <= 100.0) {
            return f64::NAN;
        }
        if n == 1 {
            return self.sorted[0];
        }

        let pos = p * (n as f64 + 1.0) / 100.0;
        if pos < 1.0 {
            return self.sorted[0];
        }
        if pos >= n as f64 {
            return self.sorted[n - 1];
        }

        let fpos = pos.floor();
        let d = pos - fpos;
        let idx = fpos as usize;
        let lower = self.sorted[idx - 1];
        let upper = self.sorted[idx];
        lower + d * (upper - lower)
    }

    #[must_use]
    pub fn median(&self) -> f64 {
        self.percentile(50.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn basic_moments() {
        let d = Describe::from_values(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(d.n(), 8);
        assert!(close(d.mean(), 5.0));
        assert_eq!(d.min(), 2.0);
        assert_eq!(d.max(), 9.0);
        // Sample variance: sum of squared deviations 32 / 7.
        assert!(close(d.std_dev(), (32.0_f64 / 7.0).sqrt()));
    }

    #[test]
    fn empty_set_answers_nan() {
        let d = Describe::from_values(&[]);
        assert_eq!(d.n(), 0);
        assert!(d.mean().is_nan());
        assert!(d.min().is_nan());
        assert!(d.percentile(50.0).is_nan());
        // Truncating casts land on zero, which is what measures store.
        assert_eq!(d.mean() as i64, 0);
    }

    #[test]
    fn single_value_is_every_percentile() {
        let d = Describe::from_values(&[42.0]);
        assert_eq!(d.percentile(1.0), 42.0);
        assert_eq!(d.percentile(50.0), 42.0);
        assert_eq!(d.percentile(100.0), 42.0);
        assert_eq!(d.std_dev(), 0.0);
    }

    #[test]
    fn percentile_interpolates_between_ranks() {
        let d = Describe::from_values(&[1.0, 2.0, 3.0, 4.0]);
        // pos = 50 * 5 / 100 = 2.5 -> halfway between 2nd and 3rd values.
        assert!(close(d.percentile(50.0), 2.5));
        // pos = 25 * 5 / 100 = 1.25 -> 1 + 0.25 * (2 - 1).
        assert!(close(d.percentile(25.0), 1.25));
        // Clamped at the extremes.
        assert_eq!(d.percentile(1.0), 1.0);
        assert_eq!(d.percentile(100.0), 4.0);
    }

    #[test]
    fn percentile_rejects_out_of_range_rank() {
        let d = Describe::from_values(&[1.0, 2.0]);
        assert!(d.percentile(0.0).is_nan());
        assert!(d.percentile(101.0).is_nan());
    }

    #[test]
    fn median_of_odd_count_is_middle_value() {
        let d = Describe::from_values(&[3.0, 1.0, 2.0]);
        assert!(close(d.median(), 2.0));
    }
}
