//! Market-data capability interface and providers.

pub mod yahoo;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced by a market-data provider.
///
/// Callers branch on these instead of swallowing failures: a missing close or
/// an empty expiration list is terminal for the run, while a failed chain or
/// earnings lookup is handled per expiration.
#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("no data returned for {0}")]
    NoData(String),
    #[error("provider request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("provider returned status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("malformed provider response: {0}")]
    Malformed(String),
}

/// A single option record on one side of a chain.
///
/// Quotes and Greeks default to zero when the provider omits them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptionQuote {
    pub strike: f64,
    #[serde(default)]
    pub bid: f64,
    #[serde(default)]
    pub ask: f64,
    #[serde(rename = "impliedVolatility", default)]
    pub implied_volatility: f64,
    #[serde(default)]
    pub delta: f64,
    #[serde(default)]
    pub theta: f64,
}

impl OptionQuote {
    /// Midpoint of the quoted spread. Zero or crossed quotes pass through
    /// unvalidated.
    pub fn mid(&self) -> f64 {
        (self.bid + self.ask) / 2.0
    }
}

/// Calls and puts for a single expiration, provider order preserved.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptionChain {
    pub calls: Vec<OptionQuote>,
    pub puts: Vec<OptionQuote>,
}

/// Capability interface over the market-data provider.
///
/// One blocking call at a time; implementations do not retry.
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Most recent daily close.
    async fn latest_close(&self, symbol: &str) -> Result<f64, MarketDataError>;

    /// Trailing ~1-month daily closes, oldest first.
    async fn daily_closes(&self, symbol: &str) -> Result<Vec<f64>, MarketDataError>;

    /// Listed option expirations, nearest first.
    async fn expirations(&self, symbol: &str) -> Result<Vec<NaiveDate>, MarketDataError>;

    /// Option chain for one expiration.
    async fn option_chain(
        &self,
        symbol: &str,
        expiration: NaiveDate,
    ) -> Result<OptionChain, MarketDataError>;

    /// Next scheduled earnings date, when the provider knows one.
    async fn next_earnings(&self, symbol: &str) -> Result<Option<NaiveDate>, MarketDataError>;
}
