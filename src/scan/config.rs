//! Configuration for the OTM scan

use serde::{Deserialize, Serialize};

/// Configuration for aggregation and chart shaping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Nearest expirations to scan
    /// Default: 7
    pub max_expirations: usize,

    /// OTM contracts kept per expiration and side, ranked by volume
    /// Default: 5
    pub top_per_expiration: usize,

    /// Contracts shown in each strike bar chart, ranked across all expirations
    /// Default: 5
    pub top_bars: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_expirations: 7,
            top_per_expiration: 5,
            top_bars: 5,
        }
    }
}

impl ScanConfig {
    /// Front-month only: fewer expirations, same ranking depth
    pub fn near_term() -> Self {
        Self {
            max_expirations: 3,
            ..Default::default()
        }
    }
}
