//! Per-expiration straddle calculator and scan orchestration.
//!
//! `scan` is pure over the provider interface: it returns computed records and
//! skip messages, leaving stdout and the ledger to the reporter.

use anyhow::{bail, Result};
use chrono::NaiveDate;
use ordered_float::OrderedFloat;

use crate::data::{MarketData, OptionChain, OptionQuote};

use super::types::{ExpirationOutcome, Quote, ScanReport, StraddleLeg, StraddleSummary};
use super::volatility;

/// Near-term expirations considered per run.
const MAX_EXPIRATIONS: usize = 4;

/// Why an expiration produced no row.
#[derive(Debug, Clone, PartialEq)]
pub enum ChainSkip {
    /// The chain has no call strikes to select from.
    EmptyCalls,
    /// The ATM strike exists on only one side of the chain.
    MissingSide { strike: f64 },
}

/// ATM strike: the call strike nearest the spot price.
///
/// First encountered wins on ties, preserving provider order.
pub fn atm_strike(calls: &[OptionQuote], spot: f64) -> Option<f64> {
    let mut best: Option<f64> = None;
    for quote in calls {
        let better = match best {
            Some(current) => (quote.strike - spot).abs() < (current - spot).abs(),
            None => true,
        };
        if better {
            best = Some(quote.strike);
        }
    }
    best
}

/// First record at exactly this strike, reduced to the straddle leg fields.
fn leg_at(quotes: &[OptionQuote], strike: f64) -> Option<StraddleLeg> {
    let quote = quotes
        .iter()
        .find(|q| OrderedFloat(q.strike) == OrderedFloat(strike))?;
    Some(StraddleLeg {
        mid: quote.mid(),
        implied_volatility: quote.implied_volatility,
        delta: quote.delta,
        theta: quote.theta,
    })
}

/// Straddle metrics for one expiration, or the reason it must be skipped.
///
/// Mid prices and DTE are taken as-is: zero quotes and negative day counts
/// pass through unvalidated.
pub fn straddle_for_chain(
    chain: &OptionChain,
    spot: f64,
    expiration: NaiveDate,
    today: NaiveDate,
) -> Result<StraddleSummary, ChainSkip> {
    let strike = atm_strike(&chain.calls, spot).ok_or(ChainSkip::EmptyCalls)?;
    let (call, put) = match (leg_at(&chain.calls, strike), leg_at(&chain.puts, strike)) {
        (Some(call), Some(put)) => (call, put),
        _ => return Err(ChainSkip::MissingSide { strike }),
    };

    let straddle_price = call.mid + put.mid;
    Ok(StraddleSummary {
        expiration,
        dte: (expiration - today).num_days(),
        strike,
        call,
        put,
        straddle_price,
        implied_move_pct: straddle_price / spot * 100.0,
        range_low: spot - straddle_price,
        range_high: spot + straddle_price,
    })
}

/// Run the full scan for one symbol.
///
/// Fatal conditions (no usable close, no listed expirations) abort with the
/// reported message before anything is written. Per-expiration failures are
/// recorded as skips and the remaining expirations still run.
pub async fn scan(provider: &dyn MarketData, symbol: &str, today: NaiveDate) -> Result<ScanReport> {
    let spot = match provider.latest_close(symbol).await {
        Ok(price) => price,
        Err(err) => {
            tracing::debug!(%symbol, error = %err, "latest close unavailable");
            bail!("No historical data available for {symbol}.");
        }
    };

    let expirations = match provider.expirations(symbol).await {
        Ok(dates) if !dates.is_empty() => dates,
        Ok(_) => bail!("No option data available."),
        Err(err) => {
            tracing::debug!(%symbol, error = %err, "expiration list unavailable");
            bail!("No option data available.");
        }
    };

    let closes = match provider.daily_closes(symbol).await {
        Ok(closes) => closes,
        Err(err) => {
            tracing::debug!(%symbol, error = %err, "trailing closes unavailable");
            bail!("No historical data available for {symbol}.");
        }
    };
    let historical_volatility = volatility::realized_volatility(&closes);

    let earnings_date = match provider.next_earnings(symbol).await {
        Ok(date) => date,
        Err(err) => {
            // The earnings lookup may legitimately fail; the ledger records N/A.
            tracing::debug!(%symbol, error = %err, "earnings lookup failed");
            None
        }
    };

    let mut outcomes = Vec::new();
    for expiration in expirations.into_iter().take(MAX_EXPIRATIONS) {
        let chain = match provider.option_chain(symbol, expiration).await {
            Ok(chain) => chain,
            Err(err) => {
                tracing::warn!(%symbol, %expiration, error = %err, "option chain fetch failed");
                outcomes.push(ExpirationOutcome::Skipped(format!(
                    "Error retrieving option chain for {expiration}."
                )));
                continue;
            }
        };

        match straddle_for_chain(&chain, spot, expiration, today) {
            Ok(summary) => outcomes.push(ExpirationOutcome::Straddle(summary)),
            Err(ChainSkip::EmptyCalls) => {
                tracing::warn!(%symbol, %expiration, "chain has no call strikes");
                outcomes.push(ExpirationOutcome::Skipped(format!(
                    "No ATM options found for expiration {expiration}."
                )));
            }
            Err(ChainSkip::MissingSide { strike }) => {
                tracing::warn!(%symbol, %expiration, strike, "missing ATM side");
                outcomes.push(ExpirationOutcome::Skipped(format!(
                    "No ATM options found at strike {strike} for expiration {expiration}."
                )));
            }
        }
    }

    Ok(ScanReport {
        quote: Quote {
            symbol: symbol.to_string(),
            price: spot,
        },
        historical_volatility,
        earnings_date,
        outcomes,
    })
}
