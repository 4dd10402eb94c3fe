use crate::cli::OutputFormat;

mod human;
mod json;

pub(crate) trait OutputFormatter {
    /// Per-blade progress callback; `None` when the format keeps stdout
    /// machine-readable.
    fn progress(&self) -> Option<loadrep_core::ProgressFn>;

    fn print_report(&self, report: &loadrep_core::Report, with_series: bool)
    -> anyhow::Result<()>;

    fn print_runs(&self, runs: &[loadrep_store::RunDescriptor]) -> anyhow::Result<()>;
}

pub(crate) fn formatter(format: OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::HumanReadable => Box::new(human::HumanReadableOutput),
        OutputFormat::Json => Box::new(json::JsonOutput),
    }
}
