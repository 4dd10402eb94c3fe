pub mod accumulator;
pub mod builder;
pub mod charts;
pub mod classify;
pub mod config;
pub mod context;
pub mod error;
pub mod progress;

pub use accumulator::{ActionAccumulator, ActionStats};
pub use builder::{Report, ReportBuilder};
pub use config::{AnalyzeConfig, CleanupOptions};
pub use context::RunClock;
pub use error::{Error, Result};
pub use progress::{ProgressEvent, ProgressFn};
