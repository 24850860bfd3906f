//! Append-only CSV ledger of straddle snapshots.
//!
//! Rows are only ever appended; the header is written once, when the file is
//! created. Concurrent runs against the same file are not coordinated.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;

use crate::engine::{ScanReport, StraddleSummary};

/// Default ledger file, created in the working directory.
pub const DEFAULT_LEDGER_FILE: &str = "straddle_results.csv";

/// Fixed column schema.
const COLUMNS: [&str; 20] = [
    "Symbol",
    "Date",
    "Current Price",
    "Expiration Date",
    "DTE",
    "ATM Strike",
    "Call Price",
    "Call IV",
    "Call Delta",
    "Call Theta",
    "Put Price",
    "Put IV",
    "Put Delta",
    "Put Theta",
    "HV",
    "Straddle Price",
    "Implied Move %",
    "Range Low",
    "Range High",
    "Earnings Date",
];

pub struct Ledger {
    writer: csv::Writer<File>,
    path: PathBuf,
}

impl Ledger {
    /// Resolve the ledger path from the environment.
    ///
    /// | Env Var | Default | Purpose |
    /// |---------|---------|---------|
    /// | `STRADDLE_LEDGER` | `straddle_results.csv` | Ledger file path |
    pub fn path_from_env() -> PathBuf {
        std::env::var("STRADDLE_LEDGER")
            .map_or_else(|_| PathBuf::from(DEFAULT_LEDGER_FILE), PathBuf::from)
    }

    /// Open the ledger in append mode, writing the header only when the file
    /// is being created fresh.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let exists = path.exists();
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(path)
            .with_context(|| format!("Failed to open ledger: {}", path.display()))?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        if !exists {
            writer.write_record(COLUMNS)?;
        }
        Ok(Self {
            writer,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one row per computed expiration, then flush. Returns the number
    /// of rows written.
    pub fn append(&mut self, report: &ScanReport, run_at: NaiveDateTime) -> Result<usize> {
        let mut rows = 0;
        for straddle in report.straddles() {
            self.append_row(report, straddle, run_at)?;
            rows += 1;
        }
        self.writer.flush().context("Failed to flush ledger")?;
        Ok(rows)
    }

    fn append_row(
        &mut self,
        report: &ScanReport,
        s: &StraddleSummary,
        run_at: NaiveDateTime,
    ) -> Result<()> {
        let earnings = report
            .earnings_date
            .map_or_else(|| "N/A".to_string(), |d| d.format("%Y-%m-%d").to_string());
        self.writer.write_record([
            report.quote.symbol.clone(),
            run_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            format!("{:.2}", report.quote.price),
            s.expiration.format("%Y-%m-%d").to_string(),
            s.dte.to_string(),
            s.strike.to_string(),
            format!("{:.2}", s.call.mid),
            format!("{:.4}", s.call.implied_volatility),
            format!("{:.4}", s.call.delta),
            format!("{:.4}", s.call.theta),
            format!("{:.2}", s.put.mid),
            format!("{:.4}", s.put.implied_volatility),
            format!("{:.4}", s.put.delta),
            format!("{:.4}", s.put.theta),
            format!("{:.4}", report.historical_volatility),
            format!("{:.2}", s.straddle_price),
            format!("{:.2}", s.implied_move_pct),
            format!("{:.2}", s.range_low),
            format!("{:.2}", s.range_high),
            earnings,
        ])?;
        Ok(())
    }
}
