//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use demog_model::{CountryCode, Indicator, SourceId, TableState};

#[derive(Parser)]
#[command(
    name = "demog",
    version,
    about = "Load demographic source tables and normalize them into period series",
    long_about = "Load UN population, birth-rate, and coverage tables into a file-backed store,\n\
                  map UN location codes to ISO3, and extract per-country period series."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Store directory.
    #[arg(long, value_name = "DIR", default_value = "demog-store", global = true)]
    pub store: PathBuf,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format.
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the registered source files.
    Sources,

    /// Load registered sources from an input directory.
    Load(LoadArgs),

    /// Load every CSV file in a directory, one table per file.
    LoadCsv(LoadCsvArgs),

    /// Attach ISO3 codes to UN-keyed tables, writing `<table>_mapped`.
    Map(MapArgs),

    /// List the tables in the store.
    Tables,

    /// Print rows of a table.
    Query(QueryArgs),

    /// Print one country's period series for an indicator.
    Series(SeriesArgs),

    /// Print one country's period × age-band table.
    Demography(CountryArgs),

    /// List ISO3 codes present for an indicator.
    Countries(IndicatorArgs),
}

#[derive(Args)]
pub struct LoadArgs {
    /// Directory holding the source files.
    #[arg(long = "input-dir", value_name = "DIR")]
    pub input_dir: PathBuf,

    /// Load only these sources (default: all present).
    #[arg(long = "source", value_name = "ID")]
    pub sources: Vec<SourceId>,
}

#[derive(Args)]
pub struct LoadCsvArgs {
    #[arg(long = "input-dir", value_name = "DIR")]
    pub input_dir: PathBuf,
}

#[derive(Args)]
pub struct MapArgs {
    /// Tables to map (default: every UN-keyed indicator table).
    #[arg(value_name = "TABLE")]
    pub tables: Vec<String>,
}

#[derive(Args)]
pub struct QueryArgs {
    #[arg(value_name = "TABLE")]
    pub table: String,

    /// Keep rows where COLUMN equals VALUE.
    #[arg(long = "where", value_name = "COLUMN=VALUE", value_parser = parse_filter)]
    pub filter: Option<(String, String)>,

    /// Comma-separated columns to print (default: all).
    #[arg(long, value_name = "COLUMNS", value_delimiter = ',')]
    pub columns: Vec<String>,

    /// Maximum rows to print.
    #[arg(long, default_value_t = 50)]
    pub limit: usize,
}

#[derive(Args)]
pub struct IndicatorArgs {
    #[arg(long, value_name = "INDICATOR")]
    pub indicator: Indicator,

    /// Read the loaded or the mapped table (default depends on the indicator).
    #[arg(long, value_enum)]
    pub state: Option<StateArg>,
}

#[derive(Args)]
pub struct CountryArgs {
    #[command(flatten)]
    pub indicator: IndicatorArgs,

    /// ISO3 code or UN numeric location code.
    #[arg(long, value_name = "CODE")]
    pub country: CountryCode,
}

#[derive(Args)]
pub struct SeriesArgs {
    #[command(flatten)]
    pub target: CountryArgs,

    /// Print tab-separated lines instead of a table.
    #[arg(long)]
    pub plain: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum StateArg {
    Loaded,
    Mapped,
}

impl From<StateArg> for TableState {
    fn from(state: StateArg) -> Self {
        match state {
            StateArg::Loaded => TableState::Loaded,
            StateArg::Mapped => TableState::Mapped,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

fn parse_filter(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((column, value)) if !column.trim().is_empty() => {
            Ok((column.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected COLUMN=VALUE, got '{raw}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_filter() {
        assert_eq!(
            parse_filter("Country code=496").unwrap(),
            ("Country code".to_string(), "496".to_string())
        );
        assert!(parse_filter("=496").is_err());
        assert!(parse_filter("496").is_err());
    }

    #[test]
    fn parses_series_command() {
        let cli = Cli::try_parse_from([
            "demog",
            "--store",
            "/tmp/s",
            "series",
            "--indicator",
            "bcg",
            "--country",
            "mng",
            "--plain",
        ])
        .unwrap();
        let Command::Series(args) = cli.command else {
            panic!("expected series");
        };
        assert_eq!(args.target.indicator.indicator, Indicator::BcgCoverage);
        assert_eq!(args.target.country.to_string(), "MNG");
        assert!(args.plain);
    }
}
