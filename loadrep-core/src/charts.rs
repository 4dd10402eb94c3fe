use loadrep_model::{ChartSet, Histogram, HistogramBin, Series};
use loadrep_stats::{
    Bin, MovingAverage, MovingMax, MovingMedian, MovingMin, MovingStdDev, MovingThroughput,
    WindowReducer, moving_series, quantile_ladder, slice_count_histogram, slice_size_histogram,
};

use crate::accumulator::ActionStats;
use crate::config::AnalyzeConfig;
use crate::error::Result;

const MOVING_STAT_NAMES: [&str; 5] = ["average", "min", "max", "median", "stddev"];

/// Full chart set of a finalized injector or aggregated accumulator:
/// raw calls, the five moving statistics, moving throughput, both
/// distribution histograms and the quantile ladder.
pub fn injector_charts(stats: &ActionStats, config: &AnalyzeConfig) -> Result<ChartSet> {
    let mut set = ChartSet {
        calls: calls_series(stats.points()),
        ..ChartSet::default()
    };
    if stats.size() == 0 {
        return Ok(set);
    }

    let period_ms = config.moving_stat_period_secs as f64 * 1000.0;

    let mut reducers: [Box<dyn WindowReducer>; 5] = [
        Box::new(MovingAverage::default()),
        Box::new(MovingMin::default()),
        Box::new(MovingMax::default()),
        Box::new(MovingMedian::default()),
        Box::new(MovingStdDev::default()),
    ];
    for (name, reducer) in MOVING_STAT_NAMES.iter().zip(reducers.iter_mut()) {
        let points = moving_series(stats.points(), period_ms, 0.0, reducer.as_mut())?;
        set.moving.push(named_series(name, &points));
    }

    let mut throughput = MovingThroughput::new(period_ms);
    let points = moving_series(stats.points(), period_ms, 0.0, &mut throughput)?;
    set.throughput = Some(named_series("throughput", &points));

    let values = stats.describe().values();
    let (min, max) = (stats.min(), stats.max());
    set.by_slice_count = Some(histogram(&slice_count_histogram(
        values,
        min,
        max,
        config.slice_count,
    )));
    set.by_slice_size = Some(histogram(&slice_size_histogram(
        values,
        min,
        max,
        config.slice_size,
    )));

    let mut quantiles = Series::new("quantiles");
    for (rank, value) in quantile_ladder(stats.describe()) {
        quantiles.push(f64::from(rank), Some(value));
    }
    set.quantiles = Some(quantiles);

    Ok(set)
}

/// Probe fields only carry the raw call series.
#[must_use]
pub fn probe_charts(points: &[(f64, f64)]) -> ChartSet {
    ChartSet {
        calls: calls_series(points),
        ..ChartSet::default()
    }
}

fn calls_series(points: &[(f64, f64)]) -> Series {
    let mut series = Series::new("calls");
    for &(x, y) in points {
        series.push(x, Some(y));
    }
    series
}

fn named_series(name: &str, points: &[(f64, Option<f64>)]) -> Series {
    let mut series = Series::new(name);
    for &(x, y) in points {
        series.push(x, y);
    }
    series
}

fn histogram(bins: &[Bin]) -> Histogram {
    Histogram {
        bins: bins
            .iter()
            .map(|b| HistogramBin {
                lower: b.lower,
                upper: b.upper,
                count: b.count,
            })
            .collect(),
    }
}
