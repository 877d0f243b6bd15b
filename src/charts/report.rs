//! Chart datasets bundle and plain-text rendering

use std::fmt::Write;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::{ExpirationSeries, OtmResult};
use crate::data::MarketData;
use crate::scan::{Aggregation, Aggregator, ScanConfig};

use super::{
    bubble_series, build_expiration_series, top_call_bars, top_put_bars, BarRow, BubblePoint,
};

/// Everything the rendering layer draws for one ticker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDatasets {
    pub ticker: String,
    pub spot: f64,
    pub expirations: Vec<NaiveDate>,
    /// Panel 1: open interest with call and put volume per expiration
    pub series: ExpirationSeries,
    /// Panel 2: top calls by strike
    pub call_bars: Vec<BarRow>,
    /// Panel 3: calls by expiration and strike, sized by volume
    pub bubbles: Vec<BubblePoint>,
    /// Panel 4: top puts by strike
    pub put_bars: Vec<BarRow>,
}

impl ChartDatasets {
    /// Derive all four views from an aggregation.
    ///
    /// The series pass requests every chain again through `source`; wrap the
    /// source in [`crate::data::CachedMarketData`] to serve it from memory.
    pub fn build<S: MarketData + ?Sized>(
        source: &S,
        aggregation: &Aggregation,
        config: &ScanConfig,
    ) -> OtmResult<Self> {
        let series =
            build_expiration_series(source, &aggregation.ticker, &aggregation.expirations)?;

        Ok(Self {
            ticker: aggregation.ticker.clone(),
            spot: aggregation.spot,
            expirations: aggregation.expirations.clone(),
            series,
            call_bars: top_call_bars(&aggregation.calls, config.top_bars),
            bubbles: bubble_series(&aggregation.calls),
            put_bars: top_put_bars(&aggregation.puts, config.top_bars),
        })
    }
}

/// Aggregate `ticker` and build its chart datasets in one go
pub fn run_scan<S: MarketData + ?Sized>(
    source: &S,
    ticker: &str,
    config: &ScanConfig,
) -> OtmResult<(Aggregation, ChartDatasets)> {
    let aggregation = Aggregator::with_config(source, config.clone()).aggregate(ticker)?;
    let datasets = ChartDatasets::build(source, &aggregation, config)?;

    tracing::info!(
        "{}: {} OTM calls, {} OTM puts across {} expirations",
        ticker,
        aggregation.calls.len(),
        aggregation.puts.len(),
        aggregation.expirations.len()
    );

    Ok((aggregation, datasets))
}

/// Render the four views as terminal tables
pub fn render_text(data: &ChartDatasets) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail
    let _ = write_report(&mut out, data);
    out
}

fn write_report(out: &mut String, data: &ChartDatasets) -> std::fmt::Result {
    writeln!(
        out,
        "{}  spot ${:.2}  ({} expirations)",
        data.ticker,
        data.spot,
        data.expirations.len()
    )?;

    writeln!(out, "\nVolume and open interest by expiration")?;
    writeln!(out, "{:<12} {:>12} {:>12} {:>14}", "Expiration", "Call vol", "Put vol", "Open int")?;
    if data.series.is_empty() {
        writeln!(out, "  (no rows)")?;
    }
    for p in &data.series.points {
        writeln!(
            out,
            "{:<12} {:>12} {:>12} {:>14}",
            p.expiry.to_string(),
            p.call_volume,
            p.put_volume,
            p.open_interest
        )?;
    }

    write_bars(out, "Top OTM calls", &data.call_bars)?;

    writeln!(out, "\nOTM call volume by expiration and strike")?;
    writeln!(out, "{:<12} {:>10} {:>10}", "Expiration", "Strike", "Volume")?;
    if data.bubbles.is_empty() {
        writeln!(out, "  (no rows)")?;
    }
    for b in &data.bubbles {
        writeln!(out, "{:<12} {:>10.2} {:>10}", b.expiry.to_string(), b.strike, b.volume)?;
    }

    write_bars(out, "Top OTM puts", &data.put_bars)
}

fn write_bars(out: &mut String, title: &str, bars: &[BarRow]) -> std::fmt::Result {
    writeln!(out, "\n{}", title)?;
    writeln!(out, "{:>10} {:<14} {:>12}", "Strike", "Metric", "Value")?;
    if bars.is_empty() {
        writeln!(out, "  (no rows)")?;
    }
    for bar in bars {
        writeln!(out, "{:>10.2} {:<14} {:>12}", bar.strike, bar.metric.label(), bar.value)?;
    }
    Ok(())
}
