pub mod cleanup;
pub mod describe;
pub mod distribution;
pub mod moving;
pub mod sort;

pub use cleanup::{MIN_STATISTICAL_SIZE, reject_outliers};
pub use describe::Describe;
pub use distribution::{Bin, quantile_ladder, slice_count_histogram, slice_size_histogram};
pub use moving::{
    Error, MovingAverage, MovingMax, MovingMedian, MovingMin, MovingStdDev, MovingThroughput,
    WindowReducer, moving_series,
};
pub use sort::sort_paired;
