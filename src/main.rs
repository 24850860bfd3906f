use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{self, EnvFilter};

use straddle_scan::data::yahoo::YahooProvider;
use straddle_scan::engine;
use straddle_scan::report::ledger::Ledger;
use straddle_scan::report::print_report;

/// ATM straddle scanner: fetches the spot price and the nearest option
/// expirations, derives the straddle price and implied move, and appends one
/// row per expiration to a CSV ledger.
#[derive(Parser)]
#[command(name = "straddle-scan", version, about)]
struct Cli {
    /// Stock symbol, e.g. AAPL
    symbol: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let symbol = cli.symbol.to_uppercase();

    let provider = YahooProvider::from_env()?;
    let today = chrono::Local::now().date_naive();

    let report = engine::scan(&provider, &symbol, today).await?;
    print_report(&report);

    let mut ledger = Ledger::open(Ledger::path_from_env())?;
    let rows = ledger.append(&report, chrono::Local::now().naive_local())?;
    tracing::debug!(rows, "ledger appended");

    println!("\nResults saved to {}", ledger.path().display());

    Ok(())
}
