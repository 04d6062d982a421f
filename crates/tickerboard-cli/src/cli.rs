//! CLI argument definitions for tickerboard.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `dashboard` | Prices, metrics, chart and status for a ticker list |
//! | `prices` | Canonical price table only |
//! | `metrics` | Per-ticker statistics only |
//! | `chart` | Vega-Lite chart specification only |
//! | `overview` | Broad market index summary |
//! | `sources` | List data strategies and their configuration |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--source` | `$TICKERBOARD_SOURCE` or `synthetic` | Data strategy |
//! | `--snapshot-dir` | `$TICKERBOARD_SNAPSHOT_DIR` or `data` | Local snapshot directory |
//! | `--snapshot-url` | `$TICKERBOARD_SNAPSHOT_URL` | Remote snapshot base URL |
//! | `--timeout-ms` | `10000` | HTTP request timeout |
//! | `--as-of` | today (UTC) | Date treated as today |
//! | `--format` | `json` | Output format (json, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--strict` | `false` | Treat warnings as errors |
//!
//! # Examples
//!
//! ```bash
//! tickerboard dashboard "AAPL, MSFT" --period 6M --pretty
//! tickerboard --source snapshot --snapshot-dir ./data metrics AAPL --format table
//! tickerboard chart "AAPL,GOOGL" --style area
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tickerboard_core::{ChartStyle, SourceKind};

/// Tickerboard - stock price dashboard from the command line
#[derive(Debug, Parser)]
#[command(
    name = "tickerboard",
    author,
    version,
    about = "Stock price dashboard: prices, metrics and Vega-Lite charts",
    long_about = "Tickerboard fetches daily closing prices from a remote chart API, a static \
JSON snapshot, or a deterministic synthetic generator, then computes per-ticker statistics \
and emits a Vega-Lite chart specification.\n\
\n\
Use 'tickerboard <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Data strategy. Falls back to TICKERBOARD_SOURCE, then synthetic.
    #[arg(long, global = true, value_enum)]
    pub source: Option<SourceSelector>,

    /// Directory holding stock_data.json and friends.
    #[arg(long, global = true)]
    pub snapshot_dir: Option<PathBuf>,

    /// Base URL serving the snapshot documents; tried before the directory.
    #[arg(long, global = true)]
    pub snapshot_url: Option<String>,

    /// HTTP request timeout in milliseconds.
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Date treated as today (YYYY-MM-DD).
    #[arg(long, global = true)]
    pub as_of: Option<String>,

    /// Output format for results.
    ///
    /// - json: Single JSON envelope (default)
    /// - table: Aligned text tables
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Treat warnings and errors as failures (exit code 5).
    #[arg(long, global = true, default_value_t = false)]
    pub strict: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceSelector {
    Live,
    Snapshot,
    Synthetic,
}

impl From<SourceSelector> for SourceKind {
    fn from(selector: SourceSelector) -> Self {
        match selector {
            SourceSelector::Live => Self::Live,
            SourceSelector::Snapshot => Self::Snapshot,
            SourceSelector::Synthetic => Self::Synthetic,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StyleArg {
    Line,
    Area,
    Candlestick,
}

impl From<StyleArg> for ChartStyle {
    fn from(style: StyleArg) -> Self {
        match style {
            StyleArg::Line => Self::Line,
            StyleArg::Area => Self::Area,
            StyleArg::Candlestick => Self::Candlestick,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Full dashboard: status line, prices, metrics and chart.
    ///
    /// # Examples
    ///
    ///   tickerboard dashboard "AAPL, GOOGL, MSFT" --period 1Y
    Dashboard(TickerArgs),

    /// Canonical price table (Date, Ticker, Price, Volume).
    Prices(TickerArgs),

    /// Per-ticker statistics with formatted display rows.
    Metrics(TickerArgs),

    /// Vega-Lite price chart specification.
    Chart(TickerArgs),

    /// S&P 500 level, 30-day change and trend chart.
    Overview,

    /// List data strategies and the active configuration.
    Sources,
}

/// Arguments shared by the ticker commands.
#[derive(Debug, Args)]
pub struct TickerArgs {
    /// Comma-separated ticker symbols (e.g. "AAPL, MSFT").
    pub tickers: String,

    /// Time period: 1M, 3M, 6M, 1Y, 2Y or 5Y. Unknown labels fall back to 3M.
    #[arg(long, default_value = "3M")]
    pub period: String,

    /// Chart style.
    #[arg(long, value_enum, default_value_t = StyleArg::Line)]
    pub style: StyleArg,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "tickerboard",
            "metrics",
            "AAPL,MSFT",
            "--period",
            "1Y",
            "--source",
            "snapshot",
            "--format",
            "table",
        ])
        .expect("valid arguments");

        assert_eq!(cli.source, Some(SourceSelector::Snapshot));
        assert_eq!(cli.format, OutputFormat::Table);
        match cli.command {
            Command::Metrics(args) => {
                assert_eq!(args.tickers, "AAPL,MSFT");
                assert_eq!(args.period, "1Y");
                assert_eq!(args.style, StyleArg::Line);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn source_defaults_to_environment() {
        let cli = Cli::try_parse_from(["tickerboard", "overview"]).expect("valid");
        assert!(cli.source.is_none());
        assert!(!cli.strict);
    }

    #[test]
    fn rejects_unknown_style() {
        assert!(Cli::try_parse_from(["tickerboard", "chart", "AAPL", "--style", "pie"]).is_err());
    }
}
