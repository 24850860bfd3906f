pub mod scan;
pub mod types;
pub mod volatility;

pub use scan::{atm_strike, scan, straddle_for_chain, ChainSkip};
pub use types::{ExpirationOutcome, Quote, ScanReport, StraddleLeg, StraddleSummary};
