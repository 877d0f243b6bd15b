//! Strike bar datasets: top contracts by volume across all expirations,
//! melted into long form for grouped bars.

use serde::{Deserialize, Serialize};

use crate::core::{rank_by_volume, OptionContract, UnifiedTable};

/// Which quantity a bar shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    Volume,
    OpenInterest,
}

impl Metric {
    pub const ALL: [Metric; 2] = [Metric::Volume, Metric::OpenInterest];

    pub fn label(&self) -> &'static str {
        match self {
            Metric::Volume => "volume",
            Metric::OpenInterest => "openInterest",
        }
    }

    pub fn value(&self, contract: &OptionContract) -> u64 {
        match self {
            Metric::Volume => contract.volume,
            Metric::OpenInterest => contract.open_interest,
        }
    }
}

/// One (strike, metric, value) row
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarRow {
    pub strike: f64,
    pub metric: Metric,
    pub value: u64,
}

/// The `n` highest-volume rows of `table`, regardless of expiration.
///
/// Output holds every volume row in rank order followed by every open
/// interest row in the same order. Ties keep table order.
pub fn top_bars(table: &UnifiedTable, n: usize) -> Vec<BarRow> {
    let mut ranked: Vec<OptionContract> = table.rows().to_vec();
    rank_by_volume(&mut ranked);
    ranked.truncate(n);

    Metric::ALL
        .iter()
        .flat_map(|&metric| {
            ranked.iter().map(move |c| BarRow {
                strike: c.strike,
                metric,
                value: metric.value(c),
            })
        })
        .collect()
}

pub fn top_call_bars(calls: &UnifiedTable, n: usize) -> Vec<BarRow> {
    top_bars(calls, n)
}

pub fn top_put_bars(puts: &UnifiedTable, n: usize) -> Vec<BarRow> {
    top_bars(puts, n)
}
