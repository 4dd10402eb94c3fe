use ahash::AHashMap;

use loadrep_model::{Alarm, ChartKey, ChartSet, Injector, Measure, Probe, Severity, TestPlan};
use loadrep_store::{BladeDescriptor, BladeKind, EventStore, RunDescriptor};

use crate::accumulator::ActionAccumulator;
use crate::charts::{injector_charts, probe_charts};
use crate::classify::{action_key, alias, is_error};
use crate::config::AnalyzeConfig;
use crate::context::RunClock;
use crate::error::{Error, Result};
use crate::progress::{ProgressEvent, ProgressFn};

// Event types that never enter the statistics.
const LIFECYCLE_EVENT: &str = "lifecycle";
const ALARM_EVENT: &str = "alarm";

/// Analysis output: the report tree plus the derived chart data of
/// every finalized accumulator.
#[derive(Debug)]
pub struct Report {
    pub plan: TestPlan,
    pub charts: Vec<(ChartKey, ChartSet)>,
}

impl Report {
    #[must_use]
    pub fn chart(&self, key: &ChartKey) -> Option<&ChartSet> {
        self.charts.iter().find(|(k, _)| k == key).map(|(_, s)| s)
    }
}

/// Builds a [`TestPlan`] report from the most recent run of an event
/// store. One builder analyzes one run at a time; all timing state is
/// scoped to the `analyze` call.
pub struct ReportBuilder {
    config: AnalyzeConfig,
    progress: Option<ProgressFn>,
}

impl ReportBuilder {
    #[must_use]
    pub fn new(config: AnalyzeConfig) -> Self {
        Self {
            config,
            progress: None,
        }
    }

    #[must_use]
    pub fn with_progress(mut self, progress: ProgressFn) -> Self {
        self.progress = Some(progress);
        self
    }

    fn emit(&self, event: ProgressEvent) {
        if let Some(progress) = &self.progress {
            progress(event);
        }
    }

    pub fn analyze(&self, store: &dyn EventStore) -> Result<Report> {
        let runs = store.list_runs()?;
        let run = latest_run(&runs).ok_or(Error::NoRuns)?;
        self.emit(ProgressEvent::RunSelected {
            run: run.name.clone(),
            date: run.date,
        });

        let plan_name = plan_short_name(&run.name).to_string();
        let mut plan = TestPlan::new(plan_name.clone(), run.date);
        let mut charts: Vec<(ChartKey, ChartSet)> = Vec::new();

        let blades = store.blades(&run.name)?;

        let mut clock = RunClock::new();
        let mut aggregated: AHashMap<String, ActionAccumulator> = AHashMap::new();
        let mut injectors: Vec<(Injector, AHashMap<String, ActionAccumulator>)> = Vec::new();

        for blade in &blades {
            self.emit(ProgressEvent::BladeStarted {
                blade: blade.id.clone(),
                kind: blade.kind,
            });
            match blade.kind {
                BladeKind::Probe => {
                    let probe =
                        self.analyze_probe(store, &run.name, blade, &plan_name, &mut charts)?;
                    plan.add_probe(probe);
                }
                BladeKind::Injector => {
                    let entry = self.read_injector(
                        store,
                        &run.name,
                        blade,
                        &mut clock,
                        &mut aggregated,
                    )?;
                    injectors.push(entry);
                }
            }
        }

        // Statistics are computed only once the run-wide clock is
        // complete, so every throughput shares the same span.
        for (mut injector, accumulators) in injectors {
            for (key, accumulator) in in_key_order(accumulators) {
                let stats = accumulator.finalize(&clock, self.config.cleanup);
                charts.push((
                    ChartKey {
                        plan: plan_name.clone(),
                        blade: Some(injector.id.clone()),
                        event: key.clone(),
                    },
                    injector_charts(&stats, &self.config)?,
                ));
                injector.add_measure(stats.measure(&key));
            }
            plan.add_injector(injector);
        }

        for (key, accumulator) in in_key_order(aggregated) {
            let stats = accumulator.finalize(&clock, self.config.cleanup);
            charts.push((
                ChartKey {
                    plan: plan_name.clone(),
                    blade: None,
                    event: key.clone(),
                },
                injector_charts(&stats, &self.config)?,
            ));
            plan.add_aggregated_measure(stats.measure(&key));
        }

        Ok(Report { plan, charts })
    }

    fn analyze_probe(
        &self,
        store: &dyn EventStore,
        run: &str,
        blade: &BladeDescriptor,
        plan_name: &str,
        charts: &mut Vec<(ChartKey, ChartSet)>,
    ) -> Result<Probe> {
        let mut probe = Probe {
            id: blade.id.clone(),
            name: probe_display_name(&blade.class_name),
            server: blade.server.clone(),
            class_name: blade.class_name.clone(),
            argument: non_empty(&blade.argument),
            comment: non_empty(&blade.comment),
            measures: Vec::new(),
            alarms: Vec::new(),
        };

        let mut samples: u64 = 0;
        for event in &blade.event_type_labels {
            if event == LIFECYCLE_EVENT {
                continue;
            }
            if event == ALARM_EVENT {
                for alarm in self.read_alarms(store, run, blade)? {
                    probe.add_alarm(alarm);
                }
                continue;
            }

            let labels = store.event_field_labels(run, &blade.id, event)?;
            let events = store.events(
                run,
                &blade.id,
                event,
                &self.config.date_filter,
                0,
                usize::MAX,
            )?;
            samples += events.len() as u64;

            // One accumulator per non-timestamp field.
            for (index, label) in labels.iter().enumerate().skip(1) {
                let mut accumulator = ActionAccumulator::new();
                for sample in &events {
                    accumulator.add_sample(sample.date(), sample.field(index).as_f64());
                }
                let stats = accumulator.finalize(&RunClock::new(), None);
                charts.push((
                    ChartKey {
                        plan: plan_name.to_string(),
                        blade: Some(blade.id.clone()),
                        event: format!("{event}.{label}"),
                    },
                    probe_charts(stats.points()),
                ));
                probe.add_measure(Measure {
                    name: label.clone(),
                    size: stats.size(),
                    count_errors: 0,
                    average: stats.mean() as i64,
                    median: stats.median() as i64,
                    min: stats.min() as i64,
                    max: stats.max() as i64,
                    std_dev: stats.std_dev(),
                    throughput: 0.0,
                });
            }
        }

        self.emit(ProgressEvent::BladeFinished {
            blade: blade.id.clone(),
            samples,
        });
        Ok(probe)
    }

    fn read_injector(
        &self,
        store: &dyn EventStore,
        run: &str,
        blade: &BladeDescriptor,
        clock: &mut RunClock,
        aggregated: &mut AHashMap<String, ActionAccumulator>,
    ) -> Result<(Injector, AHashMap<String, ActionAccumulator>)> {
        let mut injector = Injector {
            id: blade.id.clone(),
            name: blade.id.clone(),
            server: blade.server.clone(),
            class_name: blade.class_name.clone(),
            argument: non_empty(&blade.argument),
            comment: non_empty(&blade.comment),
            measures: Vec::new(),
            alarms: Vec::new(),
        };
        let mut accumulators: AHashMap<String, ActionAccumulator> = AHashMap::new();

        let mut samples: u64 = 0;
        for event in &blade.event_type_labels {
            if event == LIFECYCLE_EVENT {
                continue;
            }
            if event == ALARM_EVENT {
                for alarm in self.read_alarms(store, run, blade)? {
                    injector.add_alarm(alarm);
                }
                continue;
            }

            let labels = store.event_field_labels(run, &blade.id, event)?;
            let find = |name: &str| labels.iter().position(|l| l == name);
            let duration_idx = find("duration");
            let success_idx = find("success");
            let result_idx = find("result");
            let type_idx = find("actionType");
            let comment_idx = find("comment");

            let events = store.events(
                run,
                &blade.id,
                event,
                &self.config.date_filter,
                0,
                usize::MAX,
            )?;
            samples += events.len() as u64;

            for sample in &events {
                let date = sample.date();

                let action_type = type_idx
                    .and_then(|i| sample.field(i).as_str())
                    .unwrap_or(event);
                let comment = comment_idx
                    .and_then(|i| sample.field(i).as_str())
                    .unwrap_or("");
                let key = alias(&action_key(action_type, comment), self.config.aliases());

                let success = success_idx.and_then(|i| sample.field(i).as_bool());
                let result = result_idx
                    .and_then(|i| sample.field(i).as_str())
                    .unwrap_or("");
                let failed = is_error(success, result, self.config.success_pattern(action_type));

                let local = accumulators.entry(key.clone()).or_default();
                let global = aggregated.entry(key).or_default();
                if failed {
                    local.increment_errors();
                    global.increment_errors();
                } else {
                    // Only accepted samples bound the throughput span.
                    clock.record(date);
                    let duration = duration_idx
                        .map(|i| sample.field(i).as_f64())
                        .unwrap_or(0.0);
                    local.add_sample(date, duration);
                    global.add_sample(date, duration);
                }
            }
        }

        self.emit(ProgressEvent::BladeFinished {
            blade: blade.id.clone(),
            samples,
        });
        Ok((injector, accumulators))
    }

    fn read_alarms(
        &self,
        store: &dyn EventStore,
        run: &str,
        blade: &BladeDescriptor,
    ) -> Result<Vec<Alarm>> {
        let labels = store.event_field_labels(run, &blade.id, ALARM_EVENT)?;
        let severity_idx = labels.iter().position(|l| l == "severity").unwrap_or(1);
        let message_idx = labels.iter().position(|l| l == "message").unwrap_or(2);

        let events = store.events(
            run,
            &blade.id,
            ALARM_EVENT,
            &self.config.date_filter,
            0,
            usize::MAX,
        )?;

        let mut alarms = Vec::with_capacity(events.len());
        for sample in &events {
            let code = sample.field(severity_idx).as_i64().unwrap_or(-1);
            let severity = Severity::from_code(code).map_err(|_| Error::UnknownSeverity {
                blade: blade.id.clone(),
                code,
            })?;
            let message = sample
                .field(message_idx)
                .as_str()
                .unwrap_or("")
                .to_string();
            alarms.push(Alarm::new(sample.date(), severity, message));
        }
        Ok(alarms)
    }
}

/// Most recent run by date; the first one encountered wins ties.
fn latest_run(runs: &[RunDescriptor]) -> Option<&RunDescriptor> {
    let mut best: Option<&RunDescriptor> = None;
    for run in runs {
        match best {
            Some(current) if run.date <= current.date => {}
            _ => best = Some(run),
        }
    }
    best
}

/// Strips the harness' date/time suffix: a name with at least two
/// underscores is cut at the second-to-last one.
fn plan_short_name(run: &str) -> &str {
    let Some(last) = run.rfind('_') else {
        return run;
    };
    match run[..last].rfind('_') {
        Some(cut) => &run[..cut],
        None => run,
    }
}

/// `…probe.<kind>.Insert` class names shorten to `<kind>`.
fn probe_display_name(class_name: &str) -> Option<String> {
    let stem = class_name.strip_suffix(".Insert")?;
    let kind = stem.rsplit('.').next()?;
    if kind.is_empty() {
        return None;
    }
    Some(kind.to_string())
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

// Hash-map iteration order is arbitrary; reports sort action keys.
fn in_key_order(map: AHashMap<String, ActionAccumulator>) -> Vec<(String, ActionAccumulator)> {
    let mut entries: Vec<(String, ActionAccumulator)> = map.into_iter().collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    entries
}
