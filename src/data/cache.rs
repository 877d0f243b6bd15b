//! In-memory chain caching
//!
//! Memoizes option chains for the lifetime of one run so that the series
//! pass reads the same chains the aggregation pass fetched, without a
//! second round of network requests. Nothing is written to disk.

use std::cell::RefCell;
use std::collections::HashMap;

use chrono::NaiveDate;

use crate::core::{OptionChain, OtmResult};

use super::source::MarketData;

/// Cached data source - combines an in-memory chain cache with live fetching
pub struct CachedMarketData<S> {
    inner: S,
    chains: RefCell<HashMap<(String, NaiveDate), OptionChain>>,
}

impl<S: MarketData> CachedMarketData<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            chains: RefCell::new(HashMap::new()),
        }
    }

    /// Wrapped source
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Number of chains held
    pub fn cached_chains(&self) -> usize {
        self.chains.borrow().len()
    }

    /// Drop every cached chain
    pub fn clear(&self) {
        self.chains.borrow_mut().clear();
    }
}

impl<S: MarketData> MarketData for CachedMarketData<S> {
    fn list_expirations(&self, ticker: &str) -> OtmResult<Vec<NaiveDate>> {
        self.inner.list_expirations(ticker)
    }

    fn spot_price(&self, ticker: &str) -> OtmResult<f64> {
        self.inner.spot_price(ticker)
    }

    fn option_chain(&self, ticker: &str, expiry: NaiveDate) -> OtmResult<OptionChain> {
        let key = (ticker.to_string(), expiry);

        if let Some(chain) = self.chains.borrow().get(&key) {
            tracing::debug!("Chain {} {} served from cache", ticker, expiry);
            return Ok(chain.clone());
        }

        // Failures are not cached
        let chain = self.inner.option_chain(ticker, expiry)?;
        self.chains.borrow_mut().insert(key, chain.clone());

        Ok(chain)
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}
