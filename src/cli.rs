//! Command-line interface argument parsing.
//!
//! Every flag is optional: with none of them the tool reads the two results
//! files from the working directory and writes the three figures next to them.

use clap::Parser;
use std::path::PathBuf;
use tracing::Level;

/// Radar charts of dietary environmental impact
///
/// Averages the nine impact indicators per diet group for the real-world and
/// kcal-adjusted results files, scales each indicator by its maximum, and
/// renders a static comparison plus two animations.
///
/// Examples:
///   diet_radar
///   diet_radar --data-dir ./results --out-dir ./figures
///   diet_radar --skip-animations --summary means.csv
///   diet_radar --init-config
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    ///
    /// If not specified, looks for diet_radar.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding the results CSV files
    #[arg(short, long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Directory the figures are written to
    #[arg(short, long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Also write per-group means and scaled values to this CSV
    #[arg(short, long, value_name = "FILE")]
    pub summary: Option<PathBuf>,

    /// Render only the static figure
    #[arg(long)]
    pub skip_animations: bool,

    /// Write a diet_radar.toml with the default settings and exit
    #[arg(long)]
    pub init_config: bool,

    /// Enable verbose logging output
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    pub fn parse_args() -> Self {
        Args::parse()
    }

    pub fn log_level(&self) -> Level {
        if self.verbose {
            Level::DEBUG
        } else if self.quiet {
            Level::WARN
        } else {
            Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_flags() {
        let args = Args::try_parse_from(["diet_radar"]).unwrap();
        assert!(args.config.is_none());
        assert!(!args.skip_animations);
        assert_eq!(args.log_level(), Level::INFO);
    }

    #[test]
    fn test_flags() {
        let args = Args::try_parse_from([
            "diet_radar",
            "--data-dir",
            "results",
            "-o",
            "figures",
            "--summary",
            "means.csv",
            "--skip-animations",
            "-v",
        ])
        .unwrap();

        assert_eq!(args.data_dir, Some(PathBuf::from("results")));
        assert_eq!(args.out_dir, Some(PathBuf::from("figures")));
        assert_eq!(args.summary, Some(PathBuf::from("means.csv")));
        assert!(args.skip_animations);
        assert_eq!(args.log_level(), Level::DEBUG);
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        assert!(Args::try_parse_from(["diet_radar", "-v", "-q"]).is_err());
    }
}
