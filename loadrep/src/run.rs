use anyhow::anyhow;

use loadrep_core::{AnalyzeConfig, CleanupOptions, ReportBuilder};
use loadrep_store::{DateFilter, EventStore, FileStore};

use crate::cli::{ReportArgs, RunsArgs};
use crate::exit_codes::ExitCode;
use crate::output;
use crate::run_error::RunError;

pub fn report(args: &ReportArgs) -> Result<ExitCode, RunError> {
    let config = build_config(args).map_err(RunError::InvalidInput)?;
    let store = FileStore::new(&args.dir);
    let formatter = output::formatter(args.output);

    let mut builder = ReportBuilder::new(config);
    if let Some(progress) = formatter.progress() {
        builder = builder.with_progress(progress);
    }

    let report = builder
        .analyze(&store)
        .map_err(|err| RunError::RuntimeError(err.into()))?;
    formatter
        .print_report(&report, args.series)
        .map_err(RunError::RuntimeError)?;
    Ok(ExitCode::Success)
}

pub fn runs(args: &RunsArgs) -> Result<ExitCode, RunError> {
    let store = FileStore::new(&args.dir);
    let runs = store
        .list_runs()
        .map_err(|err| RunError::RuntimeError(err.into()))?;
    output::formatter(args.output)
        .print_runs(&runs)
        .map_err(RunError::RuntimeError)?;
    Ok(ExitCode::Success)
}

fn build_config(args: &ReportArgs) -> anyhow::Result<AnalyzeConfig> {
    if args.period == 0 {
        return Err(anyhow!("--period must be > 0"));
    }

    let mut config = AnalyzeConfig::new();
    config.date_filter = DateFilter {
        from: args.from,
        to: args.to,
    };
    if let (Some(factor), Some(percentage)) = (args.keep_factor, args.keep_percentage) {
        config.cleanup = Some(CleanupOptions::new(factor, percentage)?);
    }
    for raw in &args.success_patterns {
        let (action_type, pattern) = split_pair("--success-pattern", raw)?;
        config.add_success_pattern(action_type, pattern)?;
    }
    for raw in &args.aliases {
        let (name, pattern) = split_pair("--alias", raw)?;
        config.add_alias(name, pattern)?;
    }
    config.moving_stat_period_secs = args.period;
    config.slice_count = args.slice_count;
    config.slice_size = args.slice_size;
    Ok(config)
}

fn split_pair<'a>(flag: &str, raw: &'a str) -> anyhow::Result<(&'a str, &'a str)> {
    match raw.split_once('=') {
        Some((name, pattern)) if !name.is_empty() => Ok((name, pattern)),
        _ => Err(anyhow!("invalid {flag} '{raw}' (expected NAME=REGEX)")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Command};
    use clap::Parser;
    use std::fs;
    use std::path::Path;

    fn report_args(extra: &[&str]) -> ReportArgs {
        let mut argv = vec!["loadrep", "report", "./results"];
        argv.extend_from_slice(extra);
        let cli = match Cli::try_parse_from(argv) {
            Ok(v) => v,
            Err(err) => panic!("failed to parse args: {err}"),
        };
        match cli.command {
            Command::Report(args) => args,
            Command::Runs(_) => panic!("expected report command"),
        }
    }

    #[test]
    fn config_carries_all_flags() {
        let args = report_args(&[
            "--from",
            "1000",
            "--to",
            "9000",
            "--keep-factor",
            "2",
            "--keep-percentage",
            "95",
            "--success-pattern",
            "get=HTTP 2..",
            "--alias",
            "reads=get-.*",
            "--period",
            "10",
            "--slice-count",
            "30",
            "--slice-size",
            "5.0",
        ]);
        let config = match build_config(&args) {
            Ok(c) => c,
            Err(err) => panic!("build_config failed: {err}"),
        };

        assert_eq!(config.date_filter.from, Some(1000));
        assert_eq!(config.date_filter.to, Some(9000));
        assert!(config.cleanup.is_some());
        assert!(config.success_pattern("get").is_some());
        assert_eq!(config.aliases().len(), 1);
        assert_eq!(config.moving_stat_period_secs, 10);
        assert_eq!(config.slice_count, 30);
        assert_eq!(config.slice_size, 5.0);
    }

    #[test]
    fn bad_cleanup_or_specs_are_invalid_input() {
        let args = report_args(&["--keep-factor", "0", "--keep-percentage", "95"]);
        assert!(build_config(&args).is_err());

        let args = report_args(&["--alias", "no-equals-sign"]);
        assert!(build_config(&args).is_err());

        let args = report_args(&["--period", "0"]);
        assert!(build_config(&args).is_err());
    }

    fn write_file(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            if let Err(err) = fs::create_dir_all(parent) {
                panic!("create_dir_all failed: {err}");
            }
        }
        if let Err(err) = fs::write(path, content) {
            panic!("write failed: {err}");
        }
    }

    #[test]
    fn report_runs_end_to_end_over_a_results_directory() {
        let dir = match tempfile::tempdir() {
            Ok(d) => d,
            Err(err) => panic!("tempdir failed: {err}"),
        };
        let run_dir = dir.path().join("myplan_2012-03-26_12h43m05");
        write_file(
            &run_dir.join("blades.csv"),
            "inj.0;host-a;org.ow2.clif.IsacRunner;scenario.xis;main;injector\n",
        );
        write_file(
            &run_dir.join("inj.0/request.csv"),
            "date;duration;success;result;actionType;comment\n\
             1000;100;true;HTTP 200;get;home\n\
             2000;200;true;HTTP 200;get;home\n\
             3000;300;false;HTTP 200;get;home\n",
        );

        let mut args = report_args(&["--alias", "reads=get-.*"]);
        args.dir = dir.path().to_path_buf();

        match report(&args) {
            Ok(code) => assert_eq!(code, ExitCode::Success),
            Err(err) => panic!("report failed: {err}"),
        }
    }

    #[test]
    fn missing_results_directory_is_a_runtime_error() {
        let mut args = report_args(&[]);
        args.dir = std::path::PathBuf::from("/definitely/not/here");

        match report(&args) {
            Ok(_) => panic!("expected failure"),
            Err(err) => assert_eq!(err.exit_code(), ExitCode::RuntimeError),
        }
    }

    #[test]
    fn invalid_options_map_to_invalid_input() {
        let mut args = report_args(&["--keep-factor=-1", "--keep-percentage", "95"]);
        args.dir = std::path::PathBuf::from(".");

        match report(&args) {
            Ok(_) => panic!("expected failure"),
            Err(err) => assert_eq!(err.exit_code(), ExitCode::InvalidInput),
        }
    }
}
