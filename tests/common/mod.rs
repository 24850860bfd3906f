#![allow(dead_code)]

use chrono::NaiveDate;
use straddle_scan::data::{OptionChain, OptionQuote};

/// Build an option record with the Greeks left at zero.
pub fn quote(strike: f64, bid: f64, ask: f64, iv: f64) -> OptionQuote {
    OptionQuote {
        strike,
        bid,
        ask,
        implied_volatility: iv,
        delta: 0.0,
        theta: 0.0,
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Synthetic chain centered on a 150.00 spot:
///
///   | Strike | Call bid/ask | Put bid/ask | Call IV | Put IV |
///   |--------|--------------|-------------|---------|--------|
///   | 145    | 7.80/8.00    | 2.60/2.80   | 0.28    | 0.27   |
///   | 150    | 4.00/4.20    | 3.80/4.00   | 0.25    | 0.24   |
///   | 155    | 1.90/2.10    | 6.40/6.60   | 0.23    | 0.22   |
///
/// The 150 row reproduces the reference straddle: mids 4.10/3.90, straddle
/// 8.00, implied move 5.33%, range 142.00–158.00.
pub fn make_chain() -> OptionChain {
    OptionChain {
        calls: vec![
            quote(145.0, 7.80, 8.00, 0.28),
            quote(150.0, 4.00, 4.20, 0.25),
            quote(155.0, 1.90, 2.10, 0.23),
        ],
        puts: vec![
            quote(145.0, 2.60, 2.80, 0.27),
            quote(150.0, 3.80, 4.00, 0.24),
            quote(155.0, 6.40, 6.60, 0.22),
        ],
    }
}

/// Chain whose put side is missing the ATM strike (150).
pub fn make_chain_missing_put() -> OptionChain {
    OptionChain {
        calls: vec![quote(150.0, 4.00, 4.20, 0.25), quote(155.0, 1.90, 2.10, 0.23)],
        puts: vec![quote(145.0, 2.60, 2.80, 0.27), quote(155.0, 6.40, 6.60, 0.22)],
    }
}

/// A month of closes trending 100 → 103; same series as the volatility
/// reference case.
pub fn make_closes() -> Vec<f64> {
    vec![100.0, 102.0, 101.0, 103.0]
}
