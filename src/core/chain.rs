//! Option chains and per-expiration snapshots

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::option::{OptionContract, OptionSide};
use super::table::OtmSelection;

/// Full set of calls and puts for one underlying at one expiry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionChain {
    /// Underlying symbol
    pub underlying: String,
    /// Expiry date
    pub expiry: NaiveDate,
    /// Call rows in provider order
    pub calls: Vec<OptionContract>,
    /// Put rows in provider order
    pub puts: Vec<OptionContract>,
    /// Timestamp when fetched
    pub timestamp: DateTime<Utc>,
}

impl OptionChain {
    pub fn new(underlying: impl Into<String>, expiry: NaiveDate) -> Self {
        Self {
            underlying: underlying.into(),
            expiry,
            calls: Vec::new(),
            puts: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    /// Add a contract to the side it belongs to
    pub fn add(&mut self, contract: OptionContract) {
        match contract.side {
            OptionSide::Call => self.calls.push(contract),
            OptionSide::Put => self.puts.push(contract),
        }
    }

    pub fn with_calls(mut self, calls: Vec<OptionContract>) -> Self {
        self.calls = calls;
        self
    }

    pub fn with_puts(mut self, puts: Vec<OptionContract>) -> Self {
        self.puts = puts;
        self
    }

    /// Rows for one side
    pub fn side(&self, side: OptionSide) -> &[OptionContract] {
        match side {
            OptionSide::Call => &self.calls,
            OptionSide::Put => &self.puts,
        }
    }

    /// Total traded volume on one side, unfiltered
    pub fn total_volume(&self, side: OptionSide) -> u64 {
        self.side(side).iter().map(|c| c.volume).sum()
    }

    /// Total open interest across calls and puts, unfiltered
    pub fn total_open_interest(&self) -> u64 {
        self.calls
            .iter()
            .chain(self.puts.iter())
            .map(|c| c.open_interest)
            .sum()
    }

    pub fn len(&self) -> usize {
        self.calls.len() + self.puts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty() && self.puts.is_empty()
    }
}

/// A chain paired with the spot price the run observed
///
/// The spot is fetched once per run and reused for every expiration, so it
/// can be a little stale relative to late chain fetches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpirationSnapshot {
    pub chain: OptionChain,
    pub spot: f64,
}

impl ExpirationSnapshot {
    pub fn new(chain: OptionChain, spot: f64) -> Self {
        Self { chain, spot }
    }

    pub fn expiry(&self) -> NaiveDate {
        self.chain.expiry
    }

    /// Top `limit` OTM contracts by volume on one side
    pub fn otm_selection(&self, side: OptionSide, limit: usize) -> OtmSelection {
        OtmSelection::select(self.chain.side(side), side, self.spot, self.expiry(), limit)
    }
}
