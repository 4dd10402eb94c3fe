use std::sync::Arc;
use std::time::{Duration, UNIX_EPOCH};

use loadrep_core::{ProgressEvent, Report};
use loadrep_model::{Alarm, Measure};
use loadrep_store::RunDescriptor;

use super::OutputFormatter;

pub(crate) struct HumanReadableOutput;

impl OutputFormatter for HumanReadableOutput {
    fn progress(&self) -> Option<loadrep_core::ProgressFn> {
        Some(Arc::new(|event| match event {
            ProgressEvent::RunSelected { run, date } => {
                eprintln!("analyzing run {run} ({})", format_date(date));
            }
            ProgressEvent::BladeStarted { blade, kind } => {
                eprintln!("  reading {kind} {blade} ...");
            }
            ProgressEvent::BladeFinished { blade, samples } => {
                eprintln!("  done {blade} ({samples} events)");
            }
        }))
    }

    fn print_report(&self, report: &Report, _with_series: bool) -> anyhow::Result<()> {
        let plan = &report.plan;
        println!("Test plan: {} ({})", plan.name, format_date(plan.date));
        println!(
            "  {} injector(s), {} probe(s)",
            plan.injectors.len(),
            plan.probes.len()
        );

        for injector in &plan.injectors {
            println!();
            println!("Injector {} @ {}", injector.id, injector.server);
            print_measure_table(&injector.measures);
            print_alarms(&injector.alarms);
        }

        for probe in &plan.probes {
            println!();
            let kind = probe.name.as_deref().unwrap_or(&probe.class_name);
            println!("Probe {kind} ({}) @ {}", probe.id, probe.server);
            print_measure_table(&probe.measures);
            print_alarms(&probe.alarms);
        }

        if !plan.aggregated_measures.is_empty() {
            println!();
            println!("Aggregated");
            print_measure_table(&plan.aggregated_measures);
        }
        Ok(())
    }

    fn print_runs(&self, runs: &[RunDescriptor]) -> anyhow::Result<()> {
        for run in runs {
            println!("{}\t{}", run.name, format_date(run.date));
        }
        Ok(())
    }
}

fn print_measure_table(measures: &[Measure]) {
    if measures.is_empty() {
        println!("  (no measures)");
        return;
    }
    println!(
        "  {:<24} {:>8} {:>8} {:>7} {:>8} {:>8} {:>8} {:>8} {:>9} {:>8}",
        "name", "size", "errors", "err%", "avg", "median", "min", "max", "stddev", "rate/s"
    );
    for measure in measures {
        println!("  {}", measure_line(measure));
    }
}

fn print_alarms(alarms: &[Alarm]) {
    for alarm in alarms {
        println!(
            "  ! {} {} {}",
            format_date(alarm.date),
            alarm.severity,
            alarm.message
        );
    }
}

fn measure_line(m: &Measure) -> String {
    let throughput = if m.throughput < 0.0 {
        "-".to_string()
    } else {
        format!("{:.2}", m.throughput)
    };
    format!(
        "{:<24} {:>8} {:>8} {:>6.1}% {:>8} {:>8} {:>8} {:>8} {:>9.2} {:>8}",
        m.name,
        m.size,
        m.count_errors,
        m.error_percent() * 100.0,
        m.average,
        m.median,
        m.min,
        m.max,
        m.std_dev,
        throughput
    )
}

fn format_date(ms: i64) -> String {
    if ms < 0 {
        return ms.to_string();
    }
    let time = UNIX_EPOCH + Duration::from_millis(ms as u64);
    humantime::format_rfc3339_seconds(time).to_string()
}
