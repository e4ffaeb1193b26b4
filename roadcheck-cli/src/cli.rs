//! CLI argument parsing using clap derive API
//!
//! Purely declarative; no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Roadcheck -- road-rule violation analyzer for AV test-run logs.
///
/// Use `roadcheck <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "roadcheck", version, about, long_about = None)]
pub struct Cli {
    /// Path to the roadcheck.toml configuration file.
    #[arg(short, long, default_value = "roadcheck.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze one scenario + drive log and report violations.
    Analyze(AnalyzeArgs),

    /// Show violation counts for the most recent analyzed runs.
    Summary(SummaryArgs),

    /// List persisted violations of one type for a scenario.
    Violations(ViolationsArgs),

    /// Validate a scenario file (and optionally a log) without analyzing.
    Validate(ValidateArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- analyze ----

/// Run the full pipeline: load, detect, report, optionally persist.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Path to the scenario JSON file.
    pub scenario: PathBuf,

    /// Path to the drive log.
    pub log: PathBuf,

    /// Persist the run to this SQLite database.
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Also write the report as JSON to this path.
    #[arg(long)]
    pub report: Option<PathBuf>,
}

// ---- summary ----

/// Violation counts for the N most recent runs.
#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// Number of runs to summarize.
    #[arg(default_value_t = 5)]
    pub runs: usize,

    /// Database to query (default: storage.db_path from config).
    #[arg(long)]
    pub db: Option<PathBuf>,
}

// ---- violations ----

/// List violations of a given type for one scenario.
#[derive(Args, Debug)]
pub struct ViolationsArgs {
    /// Scenario id as printed by `summary`.
    pub scenario_id: i64,

    /// Violation type (SPEEDING, TAILGATING, ROLLING_STOP, UNSAFE_LANE_CHANGE).
    #[arg(value_name = "TYPE")]
    pub kind: String,

    /// Database to query (default: storage.db_path from config).
    #[arg(long)]
    pub db: Option<PathBuf>,
}

// ---- validate ----

/// Check scenario (and log) well-formedness without running detection.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to the scenario JSON file.
    pub scenario: PathBuf,

    /// Also parse this drive log.
    #[arg(long)]
    pub log: Option<PathBuf>,
}

// ---- config ----

/// Manage roadcheck configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show,
}
