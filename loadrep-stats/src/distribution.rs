use crate::describe::Describe;

/// One histogram bucket over `[lower, upper)`; the final bucket of a
/// histogram is upper-inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub lower: f64,
    pub upper: f64,
    pub count: u64,
}

/// Histogram of `values` split into `slices` equal-width buckets across
/// `[min, max]`. Values at `max` (or past it) land in the last bucket.
/// A degenerate range (`max <= min`) yields a single bucket holding
/// everything.
#[must_use]
pub fn slice_count_histogram(values: &[f64], min: f64, max: f64, slices: usize) -> Vec<Bin> {
    if slices == 0 {
        return Vec::new();
    }

    let width = (max - min) / slices as f64;
    if !(width > 0.0) {
        return vec![Bin {
            lower: min,
            upper: max,
            count: values.len() as u64,
        }];
    }

    let mut bins: Vec<Bin> = (0..slices)
        .map(|i| Bin {
            lower: min + i as f64 * width,
            upper: min + (i + 1) as f64 * width,
            count: 0,
        })
        .collect();

    for &v in values {
        let idx = (((v - min) / width) as usize).min(slices - 1);
        bins[idx].count += 1;
    }

    bins
}

/// Histogram of `values` in fixed-width buckets of `size`, starting at
/// `min` and extending until `max` is covered. At least one bucket is
/// produced; the last bucket includes its upper edge.
#[must_use]
pub fn slice_size_histogram(values: &[f64], min: f64, max: f64, size: f64) -> Vec<Bin> {
    if !(size > 0.0) {
        return Vec::new();
    }

    let mut bins: Vec<Bin> = Vec::new();
    let mut lower = min;
    loop {
        bins.push(Bin {
            lower,
            upper: lower + size,
            count: 0,
        });
        lower += size;
        if lower >= max {
            break;
        }
    }

    let last = bins.len() - 1;
    for &v in values {
        for (i, bin) in bins.iter_mut().enumerate() {
            let hit = if i == last {
                v >= bin.lower && v <= bin.upper
            } else {
                v >= bin.lower && v < bin.upper
            };
            if hit {
                bin.count += 1;
                break;
            }
        }
    }

    bins
}

/// Percentile ladder from 5% to 100% in 5% steps.
#[must_use]
pub fn quantile_ladder(describe: &Describe) -> Vec<(u32, f64)> {
    (1..=20)
        .map(|step| {
            let p = step * 5;
            (p, describe.percentile(f64::from(p)))
        })
        .collect()
}
