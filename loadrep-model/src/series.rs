use serde::{Deserialize, Serialize};

/// One point of a derived series. `y` is absent when a window held no
/// samples, which is distinct from an aggregate of zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub x: f64,
    pub y: Option<f64>,
}

/// Ordered `(x, y)` sequence, consumable by any charting component.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub points: Vec<SeriesPoint>,
}

impl Series {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            points: Vec::new(),
        }
    }

    pub fn push(&mut self, x: f64, y: Option<f64>) {
        self.points.push(SeriesPoint { x, y });
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Present y values, in x order.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().filter_map(|p| p.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: u64,
}

/// Value distribution as contiguous bins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub bins: Vec<HistogramBin>,
}

impl Histogram {
    #[must_use]
    pub fn total_count(&self) -> u64 {
        self.bins.iter().map(|b| b.count).sum()
    }
}

/// Identifies the chart data of one finalized accumulator.
/// `blade: None` marks the run-wide aggregated series.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChartKey {
    pub plan: String,
    pub blade: Option<String>,
    pub event: String,
}

/// Derived series of one action key or probe field. Probe accumulators
/// only carry the raw call series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSet {
    /// Raw `(date, value)` samples after cleanup.
    pub calls: Series,
    /// Moving average/min/max/median/stddev over the configured period.
    pub moving: Vec<Series>,
    pub throughput: Option<Series>,
    pub by_slice_count: Option<Histogram>,
    pub by_slice_size: Option<Histogram>,
    /// Percentile ladder 5,10,...,100; x is the percentile rank.
    pub quantiles: Option<Series>,
}
