use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Spot quote for the scanned symbol. Immutable once fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    pub price: f64,
}

/// One side of the straddle at the ATM strike.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StraddleLeg {
    pub mid: f64,
    pub implied_volatility: f64,
    pub delta: f64,
    pub theta: f64,
}

/// Derived straddle metrics for a single expiration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StraddleSummary {
    pub expiration: NaiveDate,
    /// Calendar days to expiration; may be zero or negative on clock skew.
    pub dte: i64,
    pub strike: f64,
    pub call: StraddleLeg,
    pub put: StraddleLeg,
    pub straddle_price: f64,
    pub implied_move_pct: f64,
    pub range_low: f64,
    pub range_high: f64,
}

/// Outcome for one examined expiration, in provider order.
#[derive(Debug, Clone)]
pub enum ExpirationOutcome {
    Straddle(StraddleSummary),
    /// Skip message, already phrased for the report.
    Skipped(String),
}

/// Everything one scan produces, I/O-free. The reporter renders it to stdout
/// and the ledger persists the computed rows.
#[derive(Debug, Clone)]
pub struct ScanReport {
    pub quote: Quote,
    /// Annualized realized volatility, constant across the run.
    pub historical_volatility: f64,
    pub earnings_date: Option<NaiveDate>,
    pub outcomes: Vec<ExpirationOutcome>,
}

impl ScanReport {
    /// Computed straddles, in expiration order.
    pub fn straddles(&self) -> impl Iterator<Item = &StraddleSummary> {
        self.outcomes.iter().filter_map(|o| match o {
            ExpirationOutcome::Straddle(s) => Some(s),
            ExpirationOutcome::Skipped(_) => None,
        })
    }

    /// Skip messages, in expiration order.
    pub fn skipped(&self) -> impl Iterator<Item = &str> {
        self.outcomes.iter().filter_map(|o| match o {
            ExpirationOutcome::Skipped(message) => Some(message.as_str()),
            ExpirationOutcome::Straddle(_) => None,
        })
    }
}
