//! Ranked selections, unified cross-expiration tables and summary series

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::chain::OptionChain;
use super::option::{OptionContract, OptionSide};

/// Sort rows by descending volume, keeping source order on ties
pub fn rank_by_volume(rows: &mut [OptionContract]) {
    rows.sort_by(|a, b| b.volume.cmp(&a.volume));
}

/// The most traded OTM contracts for one expiration and one side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OtmSelection {
    pub expiry: NaiveDate,
    pub side: OptionSide,
    /// Ranked by descending volume, at most `limit` rows
    pub rows: Vec<OptionContract>,
}

impl OtmSelection {
    /// Filter `contracts` to those OTM for `side` at `spot`, rank by volume
    /// and keep the first `limit`.
    ///
    /// Every kept row is tagged with `expiry`. Fewer qualifying rows than
    /// `limit` yields all of them; none yields an empty selection.
    pub fn select(
        contracts: &[OptionContract],
        side: OptionSide,
        spot: f64,
        expiry: NaiveDate,
        limit: usize,
    ) -> Self {
        let mut rows: Vec<OptionContract> = contracts
            .iter()
            .filter(|c| c.side == side && side.is_otm(c.strike, spot))
            .cloned()
            .map(|mut c| {
                c.expiry = expiry;
                c
            })
            .collect();

        rank_by_volume(&mut rows);
        rows.truncate(limit);

        Self { expiry, side, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Concatenation of one side's selections across expirations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnifiedTable {
    pub side: OptionSide,
    rows: Vec<OptionContract>,
}

impl UnifiedTable {
    pub fn new(side: OptionSide) -> Self {
        Self {
            side,
            rows: Vec::new(),
        }
    }

    /// Append a selection after everything already in the table
    pub fn push_selection(&mut self, selection: OtmSelection) {
        debug_assert_eq!(selection.side, self.side);
        self.rows.extend(selection.rows);
    }

    /// Concatenate selections in the order given
    pub fn from_selections(
        side: OptionSide,
        selections: impl IntoIterator<Item = OtmSelection>,
    ) -> Self {
        let mut table = Self::new(side);
        for selection in selections {
            table.push_selection(selection);
        }
        table
    }

    pub fn rows(&self) -> &[OptionContract] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows belonging to one expiration, in rank order
    pub fn rows_for(&self, expiry: NaiveDate) -> Vec<&OptionContract> {
        self.rows.iter().filter(|r| r.expiry == expiry).collect()
    }

    /// Distinct expirations in table order
    pub fn expirations(&self) -> Vec<NaiveDate> {
        let mut out: Vec<NaiveDate> = Vec::new();
        for row in &self.rows {
            if !out.contains(&row.expiry) {
                out.push(row.expiry);
            }
        }
        out
    }
}

/// Aggregate activity for one expiration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpirationPoint {
    pub expiry: NaiveDate,
    pub call_volume: u64,
    pub put_volume: u64,
    /// Calls and puts combined
    pub open_interest: u64,
}

impl ExpirationPoint {
    pub fn from_chain(chain: &OptionChain) -> Self {
        Self {
            expiry: chain.expiry,
            call_volume: chain.total_volume(OptionSide::Call),
            put_volume: chain.total_volume(OptionSide::Put),
            open_interest: chain.total_open_interest(),
        }
    }
}

/// Per-expiration totals, aligned with the scanned expiration list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpirationSeries {
    pub points: Vec<ExpirationPoint>,
}

impl ExpirationSeries {
    pub fn push(&mut self, point: ExpirationPoint) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn expirations(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.expiry).collect()
    }

    pub fn call_volumes(&self) -> Vec<u64> {
        self.points.iter().map(|p| p.call_volume).collect()
    }

    pub fn put_volumes(&self) -> Vec<u64> {
        self.points.iter().map(|p| p.put_volume).collect()
    }

    pub fn open_interest(&self) -> Vec<u64> {
        self.points.iter().map(|p| p.open_interest).collect()
    }
}
