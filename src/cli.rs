// src/cli.rs

use std::path::PathBuf;

use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};

#[derive(Parser, Debug)]
#[command(
    name = "csvboard",
    version,
    about = "Browse a CSV file as a sortable table with a bar chart and sales summary"
)]
pub struct Cli {
    /// CSV file to open at startup (press `o` in the app to open another).
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Write logs to a file. Nothing is logged without it, since the
    /// terminal belongs to the UI.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Width of each bar in the chart, in cells.
    #[arg(long = "bar-width", value_name = "N", default_value_t = 5,
          value_parser = clap::value_parser!(u16).range(1..=20))]
    pub bar_width: u16,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["csvboard"]).unwrap();
        assert!(cli.file.is_none());
        assert!(cli.log_file.is_none());
        assert_eq!(cli.bar_width, 5);
    }

    #[test]
    fn test_file_and_options() {
        let cli = Cli::try_parse_from([
            "csvboard",
            "sales.csv",
            "--bar-width",
            "3",
            "--log-file",
            "board.log",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.file, Some(PathBuf::from("sales.csv")));
        assert_eq!(cli.bar_width, 3);
        assert_eq!(cli.log_file, Some(PathBuf::from("board.log")));
    }

    #[test]
    fn test_bar_width_range() {
        assert!(Cli::try_parse_from(["csvboard", "--bar-width", "0"]).is_err());
    }
}
