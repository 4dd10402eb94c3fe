pub mod alarm;
pub mod blade;
pub mod measure;
pub mod plan;
pub mod series;

pub use alarm::{Alarm, Severity, UnknownSeverity};
pub use blade::{Injector, Probe};
pub use measure::Measure;
pub use plan::TestPlan;
pub use series::{ChartKey, ChartSet, Histogram, HistogramBin, Series, SeriesPoint};
