use serde::{Deserialize, Serialize};

use crate::alarm::{Alarm, Severity};
use crate::measure::Measure;

/// A passive sensor blade (CPU probe, memory probe, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Probe {
    pub id: String,
    /// Short probe kind derived from the class name (e.g. `cpu`).
    pub name: Option<String>,
    pub server: String,
    pub class_name: String,
    pub argument: Option<String>,
    pub comment: Option<String>,
    pub measures: Vec<Measure>,
    pub alarms: Vec<Alarm>,
}

/// An active load-generating blade producing timed actions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Injector {
    pub id: String,
    pub name: String,
    pub server: String,
    pub class_name: String,
    pub argument: Option<String>,
    pub comment: Option<String>,
    pub measures: Vec<Measure>,
    pub alarms: Vec<Alarm>,
}

impl Probe {
    pub fn add_measure(&mut self, measure: Measure) {
        self.measures.push(measure);
    }

    pub fn add_alarm(&mut self, alarm: Alarm) {
        self.alarms.push(alarm);
    }

    /// Alarms at or above the given severity.
    pub fn alarms_at_least(&self, min: Severity) -> impl Iterator<Item = &Alarm> {
        self.alarms.iter().filter(move |a| a.severity >= min)
    }
}

impl Injector {
    pub fn add_measure(&mut self, measure: Measure) {
        self.measures.push(measure);
    }

    pub fn add_alarm(&mut self, alarm: Alarm) {
        self.alarms.push(alarm);
    }

    pub fn alarms_at_least(&self, min: Severity) -> impl Iterator<Item = &Alarm> {
        self.alarms.iter().filter(move |a| a.severity >= min)
    }

    /// Look up a per-action measure by its action key.
    #[must_use]
    pub fn measure(&self, name: &str) -> Option<&Measure> {
        self.measures.iter().find(|m| m.name == name)
    }
}
