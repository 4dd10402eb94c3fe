use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::types::{BladeDescriptor, DateFilter, EventSample, RunDescriptor};
use crate::EventStore;

/// In-memory [`EventStore`], primarily a test double. Mutators use
/// find-or-create semantics so fixtures stay short.
#[derive(Debug, Default)]
pub struct MemStore {
    runs: Vec<MemRun>,
}

#[derive(Debug)]
struct MemRun {
    descriptor: RunDescriptor,
    blades: Vec<MemBlade>,
}

#[derive(Debug)]
struct MemBlade {
    descriptor: BladeDescriptor,
    events: HashMap<String, EventTable>,
}

#[derive(Debug)]
struct EventTable {
    labels: Vec<String>,
    samples: Vec<EventSample>,
}

impl MemStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_run(&mut self, name: &str, date: i64) {
        if let Some(run) = self.runs.iter_mut().find(|r| r.descriptor.name == name) {
            run.descriptor.date = date;
            return;
        }
        self.runs.push(MemRun {
            descriptor: RunDescriptor {
                name: name.to_string(),
                date,
            },
            blades: Vec::new(),
        });
    }

    pub fn add_blade(&mut self, run: &str, blade: BladeDescriptor) {
        if self.runs.iter().all(|r| r.descriptor.name != run) {
            self.add_run(run, 0);
        }
        if let Some(run) = self.runs.iter_mut().find(|r| r.descriptor.name == run) {
            run.blades.push(MemBlade {
                descriptor: blade,
                events: HashMap::new(),
            });
        }
    }

    /// Registers the event type on the blade's label list as a side
    /// effect, so descriptors stay consistent with the tables.
    pub fn add_events(
        &mut self,
        run: &str,
        blade: &str,
        event: &str,
        labels: Vec<String>,
        samples: Vec<EventSample>,
    ) {
        let Some(run) = self.runs.iter_mut().find(|r| r.descriptor.name == run) else {
            return;
        };
        let Some(blade) = run.blades.iter_mut().find(|b| b.descriptor.id == blade) else {
            return;
        };
        if !blade
            .descriptor
            .event_type_labels
            .iter()
            .any(|l| l == event)
        {
            blade.descriptor.event_type_labels.push(event.to_string());
        }
        blade
            .events
            .insert(event.to_string(), EventTable { labels, samples });
    }

    fn run(&self, name: &str) -> Result<&MemRun> {
        self.runs
            .iter()
            .find(|r| r.descriptor.name == name)
            .ok_or_else(|| Error::MissingRun(name.to_string()))
    }

    fn blade<'a>(&self, run: &'a MemRun, blade: &str) -> Result<&'a MemBlade> {
        run.blades
            .iter()
            .find(|b| b.descriptor.id == blade)
            .ok_or_else(|| Error::MissingBlade {
                run: run.descriptor.name.clone(),
                blade: blade.to_string(),
            })
    }
}

impl EventStore for MemStore {
    fn list_runs(&self) -> Result<Vec<RunDescriptor>> {
        Ok(self.runs.iter().map(|r| r.descriptor.clone()).collect())
    }

    fn blades(&self, run: &str) -> Result<Vec<BladeDescriptor>> {
        let run = self.run(run)?;
        Ok(run.blades.iter().map(|b| b.descriptor.clone()).collect())
    }

    fn event_field_labels(&self, run: &str, blade: &str, event: &str) -> Result<Vec<String>> {
        let run = self.run(run)?;
        let blade = self.blade(run, blade)?;
        let table = blade
            .events
            .get(event)
            .ok_or_else(|| Error::MissingEventType {
                blade: blade.descriptor.id.clone(),
                event: event.to_string(),
            })?;
        Ok(table.labels.clone())
    }

    fn events(
        &self,
        run: &str,
        blade: &str,
        event: &str,
        filter: &DateFilter,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<EventSample>> {
        let run = self.run(run)?;
        let blade = self.blade(run, blade)?;
        let table = blade
            .events
            .get(event)
            .ok_or_else(|| Error::MissingEventType {
                blade: blade.descriptor.id.clone(),
                event: event.to_string(),
            })?;
        Ok(table
            .samples
            .iter()
            .filter(|s| filter.contains(s.date()))
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BladeKind, FieldValue};

    fn sample(date: i64) -> EventSample {
        EventSample::new(vec![FieldValue::I64(date), FieldValue::I64(date * 10)])
    }

    fn fixture() -> MemStore {
        let mut store = MemStore::new();
        store.add_run("plan_2026-08-01_10h00m00", 1000);
        store.add_blade(
            "plan_2026-08-01_10h00m00",
            BladeDescriptor {
                id: "inj.0".into(),
                server: "local".into(),
                class_name: "IsacRunner".into(),
                argument: "scenario.xis".into(),
                comment: "main".into(),
                kind: BladeKind::Injector,
                event_type_labels: Vec::new(),
            },
        );
        store.add_events(
            "plan_2026-08-01_10h00m00",
            "inj.0",
            "request",
            vec!["date".into(), "duration".into()],
            vec![sample(10), sample(20), sample(30), sample(40)],
        );
        store
    }

    #[test]
    fn event_type_label_registered_on_blade() {
        let store = fixture();
        let blades = match store.blades("plan_2026-08-01_10h00m00") {
            Ok(b) => b,
            Err(err) => panic!("blades failed: {err}"),
        };
        assert_eq!(blades.len(), 1);
        assert_eq!(blades[0].event_type_labels, vec!["request".to_string()]);
    }

    #[test]
    fn events_honor_filter_offset_and_limit() {
        let store = fixture();
        let filter = DateFilter {
            from: Some(20),
            to: None,
        };
        let events = match store.events(
            "plan_2026-08-01_10h00m00",
            "inj.0",
            "request",
            &filter,
            1,
            1,
        ) {
            Ok(e) => e,
            Err(err) => panic!("events failed: {err}"),
        };
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].date(), 30);
    }

    #[test]
    fn missing_run_and_blade_are_errors() {
        let store = fixture();
        assert!(matches!(store.blades("nope"), Err(Error::MissingRun(_))));
        assert!(matches!(
            store.event_field_labels("plan_2026-08-01_10h00m00", "nope", "request"),
            Err(Error::MissingBlade { .. })
        ));
        assert!(matches!(
            store.event_field_labels("plan_2026-08-01_10h00m00", "inj.0", "monitor"),
            Err(Error::MissingEventType { .. })
        ));
    }
}
