use serde::{Deserialize, Serialize};

/// Finalized statistics for one action key or probe field.
///
/// `size` counts the samples that survived data cleanup; `count_errors`
/// counts events classified as failures (those never enter the value set).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Measure {
    pub name: String,
    pub size: u64,
    pub count_errors: u64,
    pub average: i64,
    pub median: i64,
    pub min: i64,
    pub max: i64,
    pub std_dev: f64,
    /// Events per second over the whole run span; -1 when the span is zero.
    pub throughput: f64,
}

impl Measure {
    /// Total classified events: successful samples plus errors.
    #[must_use]
    pub fn count_actions(&self) -> u64 {
        self.size + self.count_errors
    }

    /// Error ratio in `[0, 1]`. Zero when the measure is empty.
    #[must_use]
    pub fn error_percent(&self) -> f64 {
        let total = self.size + self.count_errors;
        if total == 0 {
            return 0.0;
        }
        self.count_errors as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_percent_of_one_in_ten() {
        let m = Measure {
            size: 9,
            count_errors: 1,
            ..Measure::default()
        };
        assert!((m.error_percent() - 0.1).abs() < 0.01);
        assert_eq!(m.count_actions(), 10);
    }

    #[test]
    fn error_percent_of_empty_measure_is_zero() {
        let m = Measure::default();
        assert_eq!(m.error_percent(), 0.0);
        assert_eq!(m.count_actions(), 0);
    }
}
