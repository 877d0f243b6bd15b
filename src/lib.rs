//! # OTM Flow - Out-of-the-Money Options Activity Scanner
//!
//! Pulls option chains for the nearest expirations of a ticker, keeps the
//! most traded out-of-the-money contracts on each side, and shapes the
//! result into datasets ready for charting.
//!
//! ## Key Components
//!
//! - **Data Fetching**: Yahoo Finance chains and spot price behind the
//!   [`data::MarketData`] trait, with an in-memory chain cache per run
//! - **Aggregator**: top 5 OTM calls and puts by volume for up to 7 expirations
//! - **Chart Datasets**: per-expiration totals, top strike bars, call bubbles
//!
//! ## Usage
//!
//! ```rust,no_run
//! use otm_flow::prelude::*;
//!
//! let yahoo = CachedMarketData::new(YahooClient::new().unwrap());
//! let (aggregation, charts) = run_scan(&yahoo, "SPY", &ScanConfig::default()).unwrap();
//!
//! println!("spot {:.2}, {} OTM calls", aggregation.spot, aggregation.calls.len());
//! println!("{}", render_text(&charts));
//! ```
//!
//! ## What This Does NOT Do
//!
//! - Persist anything beyond the process
//! - Stream quotes in real time
//! - Compute implied volatility or Greeks
//! - Retry or partially recover from a failed chain fetch

pub mod charts;
pub mod core;
pub mod data;
pub mod scan;

/// Prelude with commonly used types
pub mod prelude {
    // Core types
    pub use crate::core::{
        ExpirationPoint, ExpirationSeries, ExpirationSnapshot, OptionChain, OptionContract,
        OptionSide, OtmError, OtmResult, OtmSelection, UnifiedTable,
    };

    // Data fetching
    pub use crate::data::{
        CachedMarketData, InMemoryMarketData, MarketData, YahooClient, YahooConfig,
    };

    // Aggregation
    pub use crate::scan::{
        aggregate, normalize_ticker, prompt_ticker, Aggregation, Aggregator, ScanConfig,
    };

    // Chart datasets
    pub use crate::charts::{
        bubble_series, build_expiration_series, render_text, run_scan, top_bars, top_call_bars,
        top_put_bars, BarRow, BubblePoint, ChartDatasets, Metric,
    };
}

// Re-export main types at crate root
pub use crate::core::{OtmError, OtmResult};
pub use crate::scan::{Aggregation, Aggregator, ScanConfig};
