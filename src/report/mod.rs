//! Human-readable report rendering.
//!
//! Stdout is the report surface; diagnostics go to tracing on stderr.

pub mod ledger;

use crate::engine::{ExpirationOutcome, ScanReport, StraddleSummary};

/// Print the scan to stdout: the spot quote, then one block or skip line per
/// examined expiration, in scan order.
pub fn print_report(report: &ScanReport) {
    println!(
        "\nCurrent stock price for {}: ${:.2}",
        report.quote.symbol, report.quote.price
    );

    for outcome in &report.outcomes {
        match outcome {
            ExpirationOutcome::Straddle(summary) => print_straddle(summary),
            ExpirationOutcome::Skipped(message) => println!("{message}"),
        }
    }
}

fn print_straddle(s: &StraddleSummary) {
    println!(
        "\nExpiration: {} | ATM Strike: {} | DTE: {}",
        s.expiration, s.strike, s.dte
    );
    println!(
        "Call (mid): ${:.2}, IV: {:.2}%, Delta: {}, Theta: {}",
        s.call.mid,
        s.call.implied_volatility * 100.0,
        s.call.delta,
        s.call.theta
    );
    println!(
        "Put  (mid): ${:.2}, IV: {:.2}%, Delta: {}, Theta: {}",
        s.put.mid,
        s.put.implied_volatility * 100.0,
        s.put.delta,
        s.put.theta
    );
    println!(
        "Straddle Price: ${:.2}, Implied Move: ±{:.2}%",
        s.straddle_price, s.implied_move_pct
    );
    println!("Expected Range: ${:.2} to ${:.2}", s.range_low, s.range_high);
}
