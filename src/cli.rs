//! CLI argument parsing for Cribar

use crate::report::ReportKind;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cribar")]
#[command(version)]
#[command(about = "Generate comparison charts from filter benchmark CSVs", long_about = None)]
pub struct Cli {
    /// Which report pipeline to run
    #[arg(short, long, value_enum)]
    pub report: ReportKind,

    /// Benchmark results CSV emitted by the harness
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Directory chart PNGs are written to (created if missing)
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// JSON file overriding display names, filter order, workloads, sizes
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable debug logging to stderr
    #[arg(long)]
    pub debug: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_report_and_input() {
        let cli = Cli::parse_from([
            "cribar",
            "--report",
            "thread-scaling",
            "--input",
            "threaded_results.csv",
        ]);
        assert_eq!(cli.report, ReportKind::ThreadScaling);
        assert_eq!(cli.input, PathBuf::from("threaded_results.csv"));
        assert_eq!(cli.output_dir, PathBuf::from("."));
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_short_flags_and_output_dir() {
        let cli = Cli::parse_from([
            "cribar",
            "-r",
            "space-accuracy",
            "-i",
            "trials.csv",
            "-o",
            "plots",
        ]);
        assert_eq!(cli.report, ReportKind::SpaceAccuracy);
        assert_eq!(cli.output_dir, PathBuf::from("plots"));
    }

    #[test]
    fn test_cli_rejects_unknown_report() {
        let result = Cli::try_parse_from(["cribar", "-r", "heatmap", "-i", "x.csv"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_debug_default_false() {
        let cli = Cli::parse_from(["cribar", "-r", "load-factor", "-i", "dynamic.csv"]);
        assert!(!cli.debug);
    }
}
