use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Accepts either epoch milliseconds or an RFC3339 timestamp.
fn parse_date(input: &str) -> Result<i64, String> {
    let s = input.trim();
    if s.is_empty() {
        return Err("date cannot be empty (expected epoch ms or RFC3339)".to_string());
    }
    if let Ok(ms) = s.parse::<i64>() {
        return Ok(ms);
    }
    let time = humantime::parse_rfc3339(s)
        .map_err(|_| format!("invalid date '{s}' (expected epoch ms or RFC3339)"))?;
    time.duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .map_err(|_| format!("date '{s}' is before the epoch"))
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report tables.
    HumanReadable,
    /// One JSON document on stdout.
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "loadrep",
    author,
    version,
    about = "Load-test result analysis and reporting",
    long_about = "loadrep reads a results directory produced by a load-test harness, \
analyzes the most recent run and produces per-blade and aggregated response-time \
statistics, derived chart series and alarms.",
    after_help = "Examples:\n  loadrep runs ./results\n  loadrep report ./results\n  loadrep report ./results --keep-factor 2 --keep-percentage 95\n  loadrep report ./results --alias 'reads=get-.*' --output json --series"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze the most recent run and print its report
    Report(ReportArgs),

    /// List the runs available in a results directory
    Runs(RunsArgs),
}

#[derive(Debug, Args)]
pub struct RunsArgs {
    /// Results directory written by the harness
    pub dir: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::HumanReadable)]
    pub output: OutputFormat,
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Results directory written by the harness
    pub dir: PathBuf,

    /// Only consider events at or after this date (epoch ms or RFC3339)
    #[arg(long, value_parser = parse_date)]
    pub from: Option<i64>,

    /// Only consider events at or before this date (epoch ms or RFC3339)
    #[arg(long, value_parser = parse_date)]
    pub to: Option<i64>,

    /// Enable outlier rejection: stddev multiplier of the keep band (> 0)
    #[arg(long, requires = "keep_percentage")]
    pub keep_factor: Option<f64>,

    /// Minimum percentage of samples outlier rejection must keep ([0,100))
    #[arg(long, requires = "keep_factor")]
    pub keep_percentage: Option<f64>,

    /// Success pattern for one action type (repeatable, TYPE=REGEX).
    /// A sample of that type only counts as successful when its result
    /// matches the whole pattern.
    #[arg(long = "success-pattern", value_name = "TYPE=REGEX")]
    pub success_patterns: Vec<String>,

    /// Action alias (repeatable, NAME=REGEX). Applied in order; the
    /// first whole-key match wins.
    #[arg(long = "alias", value_name = "NAME=REGEX")]
    pub aliases: Vec<String>,

    /// Moving-statistics window, in seconds
    #[arg(long, default_value_t = 5)]
    pub period: u64,

    /// Number of equal-width bins of the distribution histogram
    #[arg(long, default_value_t = 20)]
    pub slice_count: usize,

    /// Bin width (ms) of the fixed-size distribution histogram
    #[arg(long, default_value_t = 20.0)]
    pub slice_size: f64,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::HumanReadable)]
    pub output: OutputFormat,

    /// Include the derived chart series in JSON output
    #[arg(long)]
    pub series: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_accepts_epoch_ms_and_rfc3339() {
        assert_eq!(parse_date("1332765785000"), Ok(1_332_765_785_000));
        assert_eq!(parse_date("1970-01-01T00:00:01Z"), Ok(1000));
        assert!(parse_date("").is_err());
        assert!(parse_date("yesterday").is_err());
    }

    #[test]
    fn cli_parses_report_flags() {
        let parsed = Cli::try_parse_from([
            "loadrep",
            "report",
            "./results",
            "--from",
            "1000",
            "--keep-factor",
            "2",
            "--keep-percentage",
            "95",
            "--success-pattern",
            "get=HTTP 2..",
            "--alias",
            "reads=get-.*",
            "--alias",
            "writes=post-.*",
            "--period",
            "10",
            "--output",
            "json",
            "--series",
        ]);

        let cli = match parsed {
            Ok(v) => v,
            Err(err) => panic!("failed to parse args: {err}"),
        };

        match cli.command {
            Command::Report(args) => {
                assert_eq!(args.dir, PathBuf::from("./results"));
                assert_eq!(args.from, Some(1000));
                assert_eq!(args.to, None);
                assert_eq!(args.keep_factor, Some(2.0));
                assert_eq!(args.keep_percentage, Some(95.0));
                assert_eq!(args.success_patterns, vec!["get=HTTP 2..".to_string()]);
                assert_eq!(args.aliases.len(), 2);
                assert_eq!(args.period, 10);
                assert!(args.series);
                assert!(matches!(args.output, OutputFormat::Json));
            }
            Command::Runs(_) => panic!("expected report command"),
        }
    }

    #[test]
    fn keep_factor_requires_keep_percentage() {
        assert!(Cli::try_parse_from(["loadrep", "report", ".", "--keep-factor", "2"]).is_err());
        assert!(
            Cli::try_parse_from(["loadrep", "report", ".", "--keep-percentage", "95"]).is_err()
        );
    }

    #[test]
    fn cli_parses_runs_defaults() {
        let parsed = Cli::try_parse_from(["loadrep", "runs", "./results"]);
        let cli = match parsed {
            Ok(v) => v,
            Err(err) => panic!("failed to parse args: {err}"),
        };
        match cli.command {
            Command::Runs(args) => {
                assert_eq!(args.dir, PathBuf::from("./results"));
                assert!(matches!(args.output, OutputFormat::HumanReadable));
            }
            Command::Report(_) => panic!("expected runs command"),
        }
    }
}
