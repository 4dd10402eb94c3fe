use serde::Serialize;
use std::io::Write as _;

use loadrep_core::Report;
use loadrep_model::{ChartKey, ChartSet, TestPlan};
use loadrep_store::RunDescriptor;

use super::OutputFormatter;

pub(crate) struct JsonOutput;

impl OutputFormatter for JsonOutput {
    // JSON output keeps stdout machine-readable and stays quiet.
    fn progress(&self) -> Option<loadrep_core::ProgressFn> {
        None
    }

    fn print_report(&self, report: &Report, with_series: bool) -> anyhow::Result<()> {
        let charts = with_series.then(|| {
            report
                .charts
                .iter()
                .map(|(key, data)| JsonChart { key, data })
                .collect::<Vec<_>>()
        });
        let doc = JsonReport {
            plan: &report.plan,
            charts,
        };
        emit_json(&doc)
    }

    fn print_runs(&self, runs: &[RunDescriptor]) -> anyhow::Result<()> {
        let doc: Vec<JsonRun<'_>> = runs
            .iter()
            .map(|r| JsonRun {
                name: &r.name,
                date: r.date,
            })
            .collect();
        emit_json(&doc)
    }
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    plan: &'a TestPlan,
    #[serde(skip_serializing_if = "Option::is_none")]
    charts: Option<Vec<JsonChart<'a>>>,
}

#[derive(Debug, Serialize)]
struct JsonChart<'a> {
    key: &'a ChartKey,
    data: &'a ChartSet,
}

#[derive(Debug, Serialize)]
struct JsonRun<'a> {
    name: &'a str,
    date: i64,
}

fn emit_json<T: Serialize>(doc: &T) -> anyhow::Result<()> {
    let mut out = std::io::stdout().lock();
    serde_json::to_writer(&mut out, doc)?;
    writeln!(out)?;
    Ok(())
}
