//! Realized (historical) volatility from trailing daily closes.

use statrs::statistics::Statistics;

/// Trading days per year used to annualize daily volatility.
const TRADING_DAYS: f64 = 252.0;

/// Simple percentage returns between consecutive closes.
///
/// The leading undefined return is dropped; fewer than two closes yield an
/// empty series.
pub fn daily_returns(closes: &[f64]) -> Vec<f64> {
    closes.windows(2).map(|w| w[1] / w[0] - 1.0).collect()
}

/// Annualized realized volatility: population standard deviation of daily
/// returns × √252.
///
/// Too-short close series report 0.0 rather than NaN so the ledger stays
/// numeric.
pub fn realized_volatility(closes: &[f64]) -> f64 {
    let returns = daily_returns(closes);
    if returns.is_empty() {
        return 0.0;
    }
    returns.population_std_dev() * TRADING_DAYS.sqrt()
}
