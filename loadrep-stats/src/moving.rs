use smallvec::SmallVec;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("moving-statistic period must be > 0")]
    InvalidPeriod,

    #[error("moving-statistic skip must be >= 0")]
    InvalidSkip,
}

/// Per-window aggregation strategy for [`moving_series`].
pub trait WindowReducer {
    fn reset(&mut self);
    fn accumulate(&mut self, x: f64, y: f64);
    /// Aggregate of the current window; `None` when it held no samples.
    fn finish(&mut self) -> Option<f64>;
}

/// Sliding-window reduction of an ordered `(x, y)` series.
///
/// Windows of `period` x-units are right-aligned to the final sample's x
/// and swept backward; each emitted point sits at the window's midpoint.
/// No point is emitted before `x[0] + skip`. NaN y values count toward
/// window consumption but are not accumulated, so an all-NaN window
/// emits an absent value rather than zero. Output is in ascending x
/// order.
pub fn moving_series(
    points: &[(f64, f64)],
    period: f64,
    skip: f64,
    reducer: &mut dyn WindowReducer,
) -> Result<Vec<(f64, Option<f64>)>> {
    if !(period > 0.0) {
        return Err(Error::InvalidPeriod);
    }
    if skip < 0.0 {
        return Err(Error::InvalidSkip);
    }

    let mut out: Vec<(f64, Option<f64>)> = Vec::new();
    if points.is_empty() {
        return Ok(out);
    }

    // Lowest x for which a window is emitted.
    let first_emittable = points[0].0 + skip;
    let mut window_end = points[points.len() - 1].0;

    let mut i = points.len() as isize - 1;
    while i >= 0 {
        let x = points[i as usize].0;

        // Keep window boundaries anchored to the series' last x.
        while window_end >= x + period {
            window_end -= period;
        }

        if x >= first_emittable {
            reducer.reset();
            let limit = x - period;
            let mut consumed: isize = 0;

            loop {
                let j = i - consumed;
                if j < 0 {
                    break;
                }
                let (xx, yy) = points[j as usize];
                if xx <= limit {
                    break;
                }
                if yy.is_finite() {
                    reducer.accumulate(xx, yy);
                }
                consumed += 1;
            }

            out.push((window_end - period / 2.0, reducer.finish()));
            // Resume the outer scan just before the consumed window.
            i -= consumed - 1;
        }

        i -= 1;
    }

    out.reverse();
    Ok(out)
}

#[derive(Debug, Default)]
pub struct MovingAverage {
    sum: f64,
    n: u64,
}

impl WindowReducer for MovingAverage {
    fn reset(&mut self) {
        self.sum = 0.0;
        self.n = 0;
    }

    fn accumulate(&mut self, _x: f64, y: f64) {
        self.sum += y;
        self.n += 1;
    }

    fn finish(&mut self) -> Option<f64> {
        (self.n > 0).then(|| self.sum / self.n as f64)
    }
}

#[derive(Debug, Default)]
pub struct MovingMin {
    min: f64,
    n: u64,
}

impl WindowReducer for MovingMin {
    fn reset(&mut self) {
        self.min = f64::MAX;
        self.n = 0;
    }

    fn accumulate(&mut self, _x: f64, y: f64) {
        self.min = self.min.min(y);
        self.n += 1;
    }

    fn finish(&mut self) -> Option<f64> {
        (self.n > 0).then_some(self.min)
    }
}

#[derive(Debug, Default)]
pub struct MovingMax {
    max: f64,
    n: u64,
}

impl WindowReducer for MovingMax {
    fn reset(&mut self) {
        self.max = f64::MIN;
        self.n = 0;
    }

    fn accumulate(&mut self, _x: f64, y: f64) {
        self.max = self.max.max(y);
        self.n += 1;
    }

    fn finish(&mut self) -> Option<f64> {
        (self.n > 0).then_some(self.max)
    }
}

#[derive(Debug, Default)]
pub struct MovingMedian {
    values: SmallVec<[f64; 32]>,
}

impl WindowReducer for MovingMedian {
    fn reset(&mut self) {
        self.values.clear();
    }

    fn accumulate(&mut self, _x: f64, y: f64) {
        self.values.push(y);
    }

    fn finish(&mut self) -> Option<f64> {
        if self.values.is_empty() {
            return None;
        }
        self.values.sort_by(f64::total_cmp);
        let n = self.values.len();
        // Even-length windows pick the lower of the two central values.
        let idx = if n % 2 == 0 { n / 2 - 1 } else { (n - 1) / 2 };
        Some(self.values[idx])
    }
}

/// Population standard deviation of the window values.
#[derive(Debug, Default)]
pub struct MovingStdDev {
    n: u64,
    mean: f64,
    m2: f64,
}

impl WindowReducer for MovingStdDev {
    fn reset(&mut self) {
        self.n = 0;
        self.mean = 0.0;
        self.m2 = 0.0;
    }

    fn accumulate(&mut self, _x: f64, y: f64) {
        self.n += 1;
        let delta = y - self.mean;
        self.mean += delta / self.n as f64;
        let delta2 = y - self.mean;
        self.m2 += delta * delta2;
    }

    fn finish(&mut self) -> Option<f64> {
        (self.n > 0).then(|| (self.m2 / self.n as f64).sqrt())
    }
}

/// Events per second within the window (`n * 1000 / period_ms`).
#[derive(Debug)]
pub struct MovingThroughput {
    n: u64,
    period_ms: f64,
}

impl MovingThroughput {
    #[must_use]
    pub fn new(period_ms: f64) -> Self {
        Self { n: 0, period_ms }
    }
}

impl WindowReducer for MovingThroughput {
    fn reset(&mut self) {
        self.n = 0;
    }

    fn accumulate(&mut self, _x: f64, _y: f64) {
        self.n += 1;
    }

    fn finish(&mut self) -> Option<f64> {
        (self.n > 0).then(|| self.n as f64 * 1000.0 / self.period_ms)
    }
}
