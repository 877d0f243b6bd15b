//! Bubble scatter dataset for the calls table

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::UnifiedTable;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BubblePoint {
    pub expiry: NaiveDate,
    pub strike: f64,
    /// Drives both bubble size and color
    pub volume: u64,
}

/// Project every row of `table` to a bubble, in table order
pub fn bubble_series(table: &UnifiedTable) -> Vec<BubblePoint> {
    table
        .rows()
        .iter()
        .map(|c| BubblePoint {
            expiry: c.expiry,
            strike: c.strike,
            volume: c.volume,
        })
        .collect()
}
