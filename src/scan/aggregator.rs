//! Aggregator - fetches near expirations and builds the unified OTM tables

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::{ExpirationSnapshot, OptionSide, OtmError, OtmResult, UnifiedTable};
use crate::data::MarketData;

use super::ScanConfig;

/// Result of one aggregation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregation {
    pub ticker: String,
    /// Spot fetched once at the start of the run
    pub spot: f64,
    /// Expirations actually scanned, in provider order
    pub expirations: Vec<NaiveDate>,
    pub calls: UnifiedTable,
    pub puts: UnifiedTable,
}

/// Trim and upper-case a user-entered symbol
pub fn normalize_ticker(raw: &str) -> OtmResult<String> {
    let ticker = raw.trim();

    if ticker.is_empty() {
        return Err(OtmError::invalid_ticker("ticker is empty"));
    }
    if ticker.chars().any(char::is_whitespace) {
        return Err(OtmError::invalid_ticker(format!(
            "ticker {:?} contains whitespace",
            ticker
        )));
    }

    Ok(ticker.to_uppercase())
}

/// Runs the aggregation pass against a market data source
pub struct Aggregator<'a, S: MarketData + ?Sized> {
    source: &'a S,
    config: ScanConfig,
}

impl<'a, S: MarketData + ?Sized> Aggregator<'a, S> {
    /// Create an aggregator with default configuration
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            config: ScanConfig::default(),
        }
    }

    /// Create with custom configuration
    pub fn with_config(source: &'a S, config: ScanConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Fetch the nearest expirations and select the top OTM calls and puts
    /// of each.
    ///
    /// Any chain failure aborts the whole run; tables built for earlier
    /// expirations are discarded.
    pub fn aggregate(&self, ticker: &str) -> OtmResult<Aggregation> {
        let available = self.source.list_expirations(ticker)?;
        if available.is_empty() {
            return Err(OtmError::data_unavailable(format!(
                "no option expirations listed for {}",
                ticker
            )));
        }

        let expirations: Vec<NaiveDate> = available
            .into_iter()
            .take(self.config.max_expirations)
            .collect();

        let spot = self.source.spot_price(ticker)?;
        if !spot.is_finite() || spot <= 0.0 {
            return Err(OtmError::data_unavailable(format!(
                "unusable spot price {} for {}",
                spot, ticker
            )));
        }

        tracing::info!(
            "Scanning {} expirations of {} via {} (spot {:.2})",
            expirations.len(),
            ticker,
            self.source.name(),
            spot
        );

        let mut calls = UnifiedTable::new(OptionSide::Call);
        let mut puts = UnifiedTable::new(OptionSide::Put);
        let limit = self.config.top_per_expiration;

        for &expiry in &expirations {
            let chain = self
                .source
                .option_chain(ticker, expiry)
                .map_err(|e| OtmError::chain_fetch(expiry, &e))?;

            let snapshot = ExpirationSnapshot::new(chain, spot);
            let otm_calls = snapshot.otm_selection(OptionSide::Call, limit);
            let otm_puts = snapshot.otm_selection(OptionSide::Put, limit);

            tracing::debug!(
                "{} {}: {} OTM calls, {} OTM puts selected",
                ticker,
                expiry,
                otm_calls.rows.len(),
                otm_puts.rows.len()
            );

            calls.push_selection(otm_calls);
            puts.push_selection(otm_puts);
        }

        Ok(Aggregation {
            ticker: ticker.to_string(),
            spot,
            expirations,
            calls,
            puts,
        })
    }
}

/// Aggregate with default configuration
pub fn aggregate<S: MarketData + ?Sized>(source: &S, ticker: &str) -> OtmResult<Aggregation> {
    Aggregator::new(source).aggregate(ticker)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{OptionChain, OptionContract};
    use crate::data::InMemoryMarketData;

    fn d(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, day).unwrap()
    }

    fn xyz_source() -> InMemoryMarketData {
        let e1 = d(6, 21);
        let e2 = d(6, 28);

        InMemoryMarketData::new("XYZ")
            .with_spot(100.0)
            .with_chain(
                OptionChain::new("XYZ", e1)
                    .with_calls(vec![
                        OptionContract::call(95.0, 50, 500, e1),
                        OptionContract::call(105.0, 30, 300, e1),
                        OptionContract::call(110.0, 10, 100, e1),
                    ])
                    .with_puts(vec![
                        OptionContract::put(90.0, 7, 70, e1),
                        OptionContract::put(95.0, 12, 120, e1),
                        OptionContract::put(105.0, 99, 10, e1),
                    ]),
            )
            .with_chain(
                OptionChain::new("XYZ", e2)
                    .with_calls(vec![OptionContract::call(120.0, 4, 40, e2)])
                    .with_puts(vec![]),
            )
    }

    #[test]
    fn test_normalize_ticker() {
        assert_eq!(normalize_ticker("  spy \n").unwrap(), "SPY");
        assert_eq!(normalize_ticker("brk.b").unwrap(), "BRK.B");
        assert!(matches!(normalize_ticker("   "), Err(OtmError::InvalidTicker(_))));
        assert!(matches!(normalize_ticker("A B"), Err(OtmError::InvalidTicker(_))));
    }

    #[test]
    fn test_xyz_scenario() {
        let source = xyz_source();
        let agg = aggregate(&source, "XYZ").unwrap();

        assert_eq!(agg.spot, 100.0);
        assert_eq!(agg.expirations, vec![d(6, 21), d(6, 28)]);

        let first: Vec<(f64, u64)> = agg
            .calls
            .rows_for(d(6, 21))
            .iter()
            .map(|r| (r.strike, r.volume))
            .collect();
        assert_eq!(first, vec![(105.0, 30), (110.0, 10)]);

        let put_strikes: Vec<f64> = agg.puts.rows().iter().map(|r| r.strike).collect();
        assert_eq!(put_strikes, vec![95.0, 90.0]);
    }

    #[test]
    fn test_takes_at_most_max_expirations() {
        let mut source = InMemoryMarketData::new("XYZ").with_spot(50.0);
        for day in 1..=10 {
            source = source.with_chain(OptionChain::new("XYZ", d(7, day)));
        }

        let agg = aggregate(&source, "XYZ").unwrap();
        assert_eq!(agg.expirations.len(), 7);
        assert_eq!(agg.expirations[0], d(7, 1));
        assert_eq!(agg.expirations[6], d(7, 7));
        assert_eq!(source.chain_requests(), 7);

        let config = ScanConfig {
            max_expirations: 2,
            ..Default::default()
        };
        let agg = Aggregator::with_config(&source, config).aggregate("XYZ").unwrap();
        assert_eq!(agg.expirations, vec![d(7, 1), d(7, 2)]);
    }

    #[test]
    fn test_no_expirations_is_data_unavailable() {
        let source = InMemoryMarketData::new("XYZ").with_spot(100.0);
        assert!(matches!(
            aggregate(&source, "XYZ"),
            Err(OtmError::DataUnavailable(_))
        ));
    }

    #[test]
    fn test_missing_spot_is_data_unavailable() {
        let source = InMemoryMarketData::new("XYZ").with_chain(OptionChain::new("XYZ", d(6, 21)));
        assert!(matches!(
            aggregate(&source, "XYZ"),
            Err(OtmError::DataUnavailable(_))
        ));
        // Spot is checked before any chain is requested
        assert_eq!(source.chain_requests(), 0);
    }

    #[test]
    fn test_non_positive_spot_is_data_unavailable() {
        let source = InMemoryMarketData::new("XYZ")
            .with_spot(0.0)
            .with_chain(OptionChain::new("XYZ", d(6, 21)));
        assert!(matches!(
            aggregate(&source, "XYZ"),
            Err(OtmError::DataUnavailable(_))
        ));
    }

    #[test]
    fn test_chain_failure_aborts_run() {
        let source = xyz_source().with_failing_chain(d(7, 5), "HTTP 502");

        let err = aggregate(&source, "XYZ").unwrap_err();
        match err {
            OtmError::ChainFetch { expiry, reason } => {
                assert_eq!(expiry, d(7, 5));
                assert!(reason.contains("HTTP 502"));
            }
            other => panic!("expected ChainFetch, got {:?}", other),
        }
        assert_eq!(source.chain_requests(), 3);
    }

    #[test]
    fn test_unknown_ticker_propagates() {
        let source = xyz_source();
        assert!(matches!(
            aggregate(&source, "ABC"),
            Err(OtmError::InvalidTicker(_))
        ));
    }
}
