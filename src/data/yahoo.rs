//! Yahoo Finance market-data provider.
//!
//! Hand-rolled client over the public quote endpoints:
//!
//! - `/v8/finance/chart/{symbol}` — daily closes (spot and trailing month)
//! - `/v7/finance/options/{symbol}` — expiration list and per-expiration chains
//! - `/v10/finance/quoteSummary/{symbol}` — earnings calendar
//!
//! No retries and no throttling: a scan issues a handful of requests per run,
//! one at a time.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime};
use reqwest::Client;
use serde::Deserialize;

use super::{MarketData, MarketDataError, OptionChain, OptionQuote};

const BASE_URL: &str = "https://query2.finance.yahoo.com";
const TIMEOUT_SECS: u64 = 30;
// Yahoo rejects the default reqwest agent with 429s.
const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:124.0) Gecko/20100101 Firefox/124.0";

// ---------------------------------------------------------------------------
// API response types
// ---------------------------------------------------------------------------

/// Yahoo wraps every endpoint in a `{ result, error }` envelope.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    result: Option<Vec<T>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Envelope<ChartResult>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct OptionsResponse {
    #[serde(rename = "optionChain")]
    option_chain: Envelope<OptionsResult>,
}

#[derive(Debug, Deserialize)]
struct OptionsResult {
    #[serde(rename = "expirationDates", default)]
    expiration_dates: Vec<i64>,
    #[serde(default)]
    options: Vec<ChainBlock>,
}

#[derive(Debug, Default, Deserialize)]
struct ChainBlock {
    #[serde(default)]
    calls: Vec<OptionQuote>,
    #[serde(default)]
    puts: Vec<OptionQuote>,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryResponse {
    #[serde(rename = "quoteSummary")]
    quote_summary: Envelope<SummaryResult>,
}

#[derive(Debug, Deserialize)]
struct SummaryResult {
    #[serde(rename = "calendarEvents")]
    calendar_events: Option<CalendarEvents>,
}

#[derive(Debug, Deserialize)]
struct CalendarEvents {
    earnings: Option<EarningsCalendar>,
}

#[derive(Debug, Deserialize)]
struct EarningsCalendar {
    #[serde(rename = "earningsDate", default)]
    earnings_date: Vec<EpochValue>,
}

#[derive(Debug, Deserialize)]
struct EpochValue {
    raw: Option<i64>,
}

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

pub struct YahooProvider {
    client: Client,
    base_url: String,
}

impl YahooProvider {
    pub fn new(base_url: impl Into<String>) -> Result<Self, MarketDataError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Build from environment.
    ///
    /// | Env Var | Default | Purpose |
    /// |---------|---------|---------|
    /// | `YAHOO_BASE_URL` | `https://query2.finance.yahoo.com` | Endpoint override |
    pub fn from_env() -> Result<Self, MarketDataError> {
        let base = std::env::var("YAHOO_BASE_URL").unwrap_or_else(|_| BASE_URL.to_string());
        Self::new(base)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, MarketDataError> {
        let url = format!("{}{path}", self.base_url);
        let resp = self.client.get(&url).query(params).send().await?;
        let status = resp.status().as_u16();
        if let Some(message) = check_status(status) {
            return Err(MarketDataError::Status { status, message });
        }
        if !resp.status().is_success() {
            return Err(MarketDataError::Status {
                status,
                message: format!("unexpected status for {path}"),
            });
        }
        Ok(resp.json::<T>().await?)
    }

    async fn closes(&self, symbol: &str, range: &str) -> Result<Vec<f64>, MarketDataError> {
        let resp: ChartResponse = self
            .get_json(
                &format!("/v8/finance/chart/{symbol}"),
                &[("range", range.to_string()), ("interval", "1d".to_string())],
            )
            .await?;
        let result = unwrap_envelope(resp.chart, symbol)?;
        let closes = result
            .indicators
            .quote
            .first()
            .map(|q| q.close.iter().filter_map(|c| *c).collect())
            .unwrap_or_default();
        Ok(closes)
    }
}

#[async_trait]
impl MarketData for YahooProvider {
    async fn latest_close(&self, symbol: &str) -> Result<f64, MarketDataError> {
        let closes = self.closes(symbol, "1d").await?;
        closes
            .last()
            .copied()
            .ok_or_else(|| MarketDataError::NoData(symbol.to_string()))
    }

    async fn daily_closes(&self, symbol: &str) -> Result<Vec<f64>, MarketDataError> {
        self.closes(symbol, "1mo").await
    }

    async fn expirations(&self, symbol: &str) -> Result<Vec<NaiveDate>, MarketDataError> {
        let resp: OptionsResponse = self
            .get_json(&format!("/v7/finance/options/{symbol}"), &[])
            .await?;
        let result = unwrap_envelope(resp.option_chain, symbol)?;
        Ok(result
            .expiration_dates
            .iter()
            .filter_map(|ts| DateTime::from_timestamp(*ts, 0).map(|dt| dt.date_naive()))
            .collect())
    }

    async fn option_chain(
        &self,
        symbol: &str,
        expiration: NaiveDate,
    ) -> Result<OptionChain, MarketDataError> {
        // Yahoo keys each expiration by its midnight-UTC epoch.
        let epoch = expiration.and_time(NaiveTime::MIN).and_utc().timestamp();
        let resp: OptionsResponse = self
            .get_json(
                &format!("/v7/finance/options/{symbol}"),
                &[("date", epoch.to_string())],
            )
            .await?;
        let result = unwrap_envelope(resp.option_chain, symbol)?;
        let block = result.options.into_iter().next().unwrap_or_default();
        Ok(OptionChain {
            calls: block.calls,
            puts: block.puts,
        })
    }

    async fn next_earnings(&self, symbol: &str) -> Result<Option<NaiveDate>, MarketDataError> {
        let resp: QuoteSummaryResponse = self
            .get_json(
                &format!("/v10/finance/quoteSummary/{symbol}"),
                &[("modules", "calendarEvents".to_string())],
            )
            .await?;
        let result = unwrap_envelope(resp.quote_summary, symbol)?;
        Ok(result
            .calendar_events
            .and_then(|c| c.earnings)
            .and_then(|e| e.earnings_date.into_iter().find_map(|d| d.raw))
            .and_then(|ts| DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive())))
    }
}

/// Return a human-readable error for known Yahoo status codes, or None.
fn check_status(status: u16) -> Option<String> {
    match status {
        401 | 403 => Some("Yahoo Finance denied the request.".into()),
        404 => Some("symbol not found".into()),
        429 => Some("Yahoo Finance rate limit exceeded. Try again later.".into()),
        s if s >= 500 => Some(format!(
            "Yahoo Finance server error ({s}). The API may be temporarily unavailable."
        )),
        _ => None,
    }
}

/// Unwrap the `{ result, error }` envelope to its first result.
fn unwrap_envelope<T>(envelope: Envelope<T>, symbol: &str) -> Result<T, MarketDataError> {
    if let Some(err) = envelope.error {
        return Err(MarketDataError::Malformed(format!(
            "{symbol}: {} ({})",
            err.description, err.code
        )));
    }
    envelope
        .result
        .and_then(|mut results| {
            if results.is_empty() {
                None
            } else {
                Some(results.remove(0))
            }
        })
        .ok_or_else(|| MarketDataError::NoData(symbol.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_response_extracts_closes() {
        let body = r#"{
            "chart": {
                "result": [{
                    "timestamp": [1704792600, 1704879000],
                    "indicators": { "quote": [{ "close": [185.2, null, 186.1] }] }
                }],
                "error": null
            }
        }"#;
        let resp: ChartResponse = serde_json::from_str(body).unwrap();
        let result = unwrap_envelope(resp.chart, "AAPL").unwrap();
        let closes: Vec<f64> = result.indicators.quote[0]
            .close
            .iter()
            .filter_map(|c| *c)
            .collect();
        assert_eq!(closes.len(), 2);
        assert!((closes[1] - 186.1).abs() < 1e-10);
    }

    #[test]
    fn options_response_extracts_expirations_and_chain() {
        let body = r#"{
            "optionChain": {
                "result": [{
                    "expirationDates": [1705622400, 1706227200],
                    "options": [{
                        "calls": [{"strike": 150.0, "bid": 4.0, "ask": 4.2, "impliedVolatility": 0.25}],
                        "puts": [{"strike": 150.0, "bid": 3.8, "ask": 4.0, "impliedVolatility": 0.24}]
                    }]
                }],
                "error": null
            }
        }"#;
        let resp: OptionsResponse = serde_json::from_str(body).unwrap();
        let result = unwrap_envelope(resp.option_chain, "AAPL").unwrap();
        assert_eq!(result.expiration_dates.len(), 2);
        let block = &result.options[0];
        assert_eq!(block.calls.len(), 1);
        assert!((block.puts[0].mid() - 3.9).abs() < 1e-10);
    }

    #[test]
    fn envelope_error_is_malformed() {
        let body = r#"{
            "chart": {
                "result": null,
                "error": {"code": "Not Found", "description": "No data found"}
            }
        }"#;
        let resp: ChartResponse = serde_json::from_str(body).unwrap();
        let err = unwrap_envelope(resp.chart, "NOPE").unwrap_err();
        assert!(matches!(err, MarketDataError::Malformed(_)));
    }

    #[test]
    fn empty_result_is_no_data() {
        let body = r#"{"chart": {"result": [], "error": null}}"#;
        let resp: ChartResponse = serde_json::from_str(body).unwrap();
        let err = unwrap_envelope(resp.chart, "NOPE").unwrap_err();
        assert!(matches!(err, MarketDataError::NoData(_)));
    }

    #[test]
    fn earnings_date_resolves_first_raw_epoch() {
        let body = r#"{
            "quoteSummary": {
                "result": [{
                    "calendarEvents": {
                        "earnings": {
                            "earningsDate": [{"raw": 1706817600, "fmt": "2024-02-01"}]
                        }
                    }
                }],
                "error": null
            }
        }"#;
        let resp: QuoteSummaryResponse = serde_json::from_str(body).unwrap();
        let result = unwrap_envelope(resp.quote_summary, "AAPL").unwrap();
        let date = result
            .calendar_events
            .and_then(|c| c.earnings)
            .and_then(|e| e.earnings_date.into_iter().find_map(|d| d.raw))
            .and_then(|ts| DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive()))
            .unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
    }

    #[test]
    fn known_statuses_map_to_messages() {
        assert!(check_status(404).unwrap().contains("not found"));
        assert!(check_status(429).unwrap().contains("rate limit"));
        assert!(check_status(503).unwrap().contains("server error"));
        assert!(check_status(200).is_none());
    }
}
