use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gasopt::{Address, AnalyticsSettings, GasAnalytics, TransactionDraft};
use gasopt_engine::{BaselineComparison, SavingsStats};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "gasopt", about = "Gas cost analytics over a batch of transactions")]
struct Cli {
    /// Path to the TOML settings file. Defaults apply when omitted.
    #[arg(long, env = "GASOPT_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Account the transactions are recorded for.
    #[arg(long, value_name = "ADDRESS")]
    account: Address,

    /// JSON file holding an array of transaction drafts.
    #[arg(long, value_name = "PATH")]
    input: PathBuf,

    /// Overrides the configured log level.
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
enum Command {
    /// Totals and extremes over every transaction.
    Report,
    /// Average gas of one category against its baseline.
    Compare {
        #[arg(long)]
        category: String,
    },
    /// Efficiency score in [0, 100].
    Efficiency,
    /// Cost spent above baseline.
    Savings,
    /// Suggested gas limit.
    Recommend,
    /// Transactions stamped within [start, end].
    Range {
        #[arg(long)]
        start: u64,
        #[arg(long)]
        end: u64,
    },
}

#[derive(Serialize)]
struct Comparison<'a> {
    category: &'a str,
    #[serde(flatten)]
    comparison: BaselineComparison,
}

#[derive(Serialize)]
struct Efficiency {
    efficiency_score: u8,
}

#[derive(Serialize)]
struct Savings {
    estimated_max_potential_savings: u128,
    #[serde(flatten)]
    reported: SavingsStats,
}

fn load_settings(path: Option<&Path>) -> Result<AnalyticsSettings> {
    match path {
        Some(path) => AnalyticsSettings::load(path)
            .with_context(|| format!("failed to load settings from {}", path.display())),
        None => Ok(AnalyticsSettings::default()),
    }
}

fn read_drafts(path: &Path) -> Result<Vec<TransactionDraft>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid transaction file {}", path.display()))
}

fn analyze(engine: &GasAnalytics, account: &Address, command: &Command) -> Result<String> {
    let output = match command {
        Command::Report => serde_json::to_string_pretty(&engine.generate_report(account))?,
        Command::Compare { category } => serde_json::to_string_pretty(&Comparison {
            category,
            comparison: engine.compare_against_baseline(account, category),
        })?,
        Command::Efficiency => serde_json::to_string_pretty(&Efficiency {
            efficiency_score: engine.efficiency_score(account),
        })?,
        Command::Savings => serde_json::to_string_pretty(&Savings {
            estimated_max_potential_savings: engine.estimate_max_potential_savings(account),
            reported: engine.stats(account),
        })?,
        Command::Recommend => serde_json::to_string_pretty(&engine.recommend(account))?,
        Command::Range { start, end } => {
            serde_json::to_string_pretty(&engine.transactions_in_range(account, *start, *end))?
        }
    };
    Ok(output)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = load_settings(cli.config.as_deref())?;
    if let Some(level) = cli.log_level {
        settings.logging.level = level;
    }
    gasopt_telemetry::init_logging(&settings.logging).context("failed to initialise logging")?;

    let engine = GasAnalytics::from_settings(&settings);
    let drafts = read_drafts(&cli.input)?;
    let committed = engine
        .batch_append(cli.account, drafts)
        .context("failed to record transactions")?;
    info!(account = %cli.account, committed, "transactions loaded");

    println!("{}", analyze(&engine, &cli.account, &cli.command)?);
    Ok(())
}
