use crate::sort::sort_paired;

/// Never trim a sample set below this many values, whatever the
/// configured keep percentage says.
pub const MIN_STATISTICAL_SIZE: usize = 30;

/// Statistical outlier rejection ("data cleanup").
///
/// Sorts `values` ascending (reordering `dates` identically) and
/// iteratively removes whichever extreme lies further outside
/// `mean ± keep_factor * stddev`, re-deriving mean and stddev from
/// running sums after each removal. Tied duplicates at an extreme go
/// together, except where that would undercut the retention floor
/// `max(ceil(keep_percentage * n / 100), MIN_STATISTICAL_SIZE)`.
///
/// Both vectors are truncated to the retained range and stay paired;
/// they come back sorted by value. Returns the number of samples
/// removed. Sets of fewer than three samples are left untouched.
pub fn reject_outliers(
    values: &mut Vec<f64>,
    dates: &mut Vec<f64>,
    keep_factor: f64,
    keep_percentage: f64,
) -> usize {
    let n = values.len();
    if n < 3 {
        return 0;
    }

    let min_size = {
        let floor = (keep_percentage * n as f64 / 100.0).ceil() as usize;
        floor.max(MIN_STATISTICAL_SIZE)
    };

    let mut stat_nb = n;
    let mut stat_sum: f64 = values.iter().sum();
    let mut stat_sumsq: f64 = values.iter().map(|v| v * v).sum();
    let mut stat_mean = stat_sum / stat_nb as f64;
    let mut stat_std = sample_std(stat_sum, stat_sumsq, stat_nb);

    sort_paired(values, dates);

    let mut min_idx = 0usize;
    let mut max_idx = n - 1;

    while stat_nb > min_size {
        let min_val = values[min_idx];
        let max_val = values[max_idx];
        // Band bounds are rounded to whole values: samples are integral
        // durations in practice.
        let lower_out = (stat_mean - keep_factor * stat_std).ceil() - min_val;
        let upper_out = max_val - (stat_mean + keep_factor * stat_std).floor();

        if lower_out > upper_out {
            if lower_out <= 0.0 {
                break;
            }
            // Take every duplicate of the current minimum in one step.
            let mut count = 1usize;
            min_idx += 1;
            while min_idx <= max_idx && values[min_idx] == min_val {
                count += 1;
                min_idx += 1;
            }
            if count > stat_nb - min_size {
                let overshoot = count - (stat_nb - min_size);
                min_idx -= overshoot;
                count = stat_nb - min_size;
            }
            stat_sum -= count as f64 * min_val;
            stat_sumsq -= count as f64 * min_val * min_val;
            stat_nb -= count;
        } else {
            if upper_out <= 0.0 {
                break;
            }
            let mut count = 1usize;
            max_idx -= 1;
            while max_idx >= min_idx && values[max_idx] == max_val {
                count += 1;
                if max_idx == 0 {
                    break;
                }
                max_idx -= 1;
            }
            if count > stat_nb - min_size {
                let overshoot = count - (stat_nb - min_size);
                max_idx += overshoot;
                count = stat_nb - min_size;
            }
            stat_sum -= count as f64 * max_val;
            stat_sumsq -= count as f64 * max_val * max_val;
            stat_nb -= count;
        }

        stat_mean = stat_sum / stat_nb as f64;
        stat_std = sample_std(stat_sum, stat_sumsq, stat_nb);
    }

    values.truncate(max_idx + 1);
    values.drain(..min_idx);
    dates.truncate(max_idx + 1);
    dates.drain(..min_idx);

    n - values.len()
}

fn sample_std(sum: f64, sumsq: f64, n: usize) -> f64 {
    if n < 2 {
        return 0.0;
    }
    let var = (sumsq - sum * sum / n as f64) / (n as f64 - 1.0);
    var.max(0.0).sqrt()
}
