use serde::{Deserialize, Serialize};

use crate::blade::{Injector, Probe};
use crate::measure::Measure;

/// Per-run report root.
///
/// Blade names need not be unique, but aggregated measure names (action
/// keys) are unique within one plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestPlan {
    pub name: String,
    /// Run start, epoch milliseconds.
    pub date: i64,
    pub probes: Vec<Probe>,
    pub injectors: Vec<Injector>,
    pub aggregated_measures: Vec<Measure>,
}

impl TestPlan {
    #[must_use]
    pub fn new(name: impl Into<String>, date: i64) -> Self {
        Self {
            name: name.into(),
            date,
            ..Self::default()
        }
    }

    pub fn add_probe(&mut self, probe: Probe) {
        self.probes.push(probe);
    }

    pub fn add_injector(&mut self, injector: Injector) {
        self.injectors.push(injector);
    }

    pub fn add_aggregated_measure(&mut self, measure: Measure) {
        self.aggregated_measures.push(measure);
    }

    /// Run-wide measure for one action key.
    #[must_use]
    pub fn aggregated_measure(&self, name: &str) -> Option<&Measure> {
        self.aggregated_measures.iter().find(|m| m.name == name)
    }

    /// Probes hosted on the given server.
    pub fn probes_on(&self, server: &str) -> impl Iterator<Item = &Probe> {
        self.probes.iter().filter(move |p| p.server == server)
    }

    /// Injectors hosted on the given server.
    pub fn injectors_on(&self, server: &str) -> impl Iterator<Item = &Injector> {
        self.injectors.iter().filter(move |i| i.server == server)
    }
}
