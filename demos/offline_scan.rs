//! Example: OTM scan over canned chains, no network
//!
//! Run with: cargo run --example offline_scan

use chrono::NaiveDate;
use otm_flow::prelude::*;

fn chain(expiry: NaiveDate, spot: f64, skew: u64) -> OptionChain {
    let mut chain = OptionChain::new("DEMO", expiry);

    for step in -6i32..=6 {
        let strike = spot + step as f64 * 5.0;
        let distance = step.unsigned_abs() as u64;

        // Activity peaks a few strikes away from spot and fades further out
        let volume = 400u64.saturating_sub(distance.abs_diff(2) * 90) + skew * distance;
        let open_interest = volume * 7 + 150;

        chain.add(OptionContract::call(strike, volume, open_interest, expiry));
        chain.add(OptionContract::put(strike, volume / 2 + skew, open_interest / 2, expiry));
    }

    chain
}

fn main() {
    let spot = 100.0;
    let expirations: Vec<NaiveDate> = (0..9)
        .filter_map(|week| {
            NaiveDate::from_ymd_opt(2024, 6, 7).map(|d| d + chrono::Duration::weeks(week))
        })
        .collect();

    let mut source = InMemoryMarketData::new("DEMO").with_spot(spot);
    for (i, &expiry) in expirations.iter().enumerate() {
        source = source.with_chain(chain(expiry, spot, i as u64 * 3));
    }

    let cached = CachedMarketData::new(source);

    match run_scan(&cached, "DEMO", &ScanConfig::default()) {
        Ok((aggregation, charts)) => {
            println!("=== OTM Scan (offline) ===\n");
            println!("Listed expirations:  {}", expirations.len());
            println!("Scanned expirations: {}", aggregation.expirations.len());
            println!("OTM calls kept:      {}", aggregation.calls.len());
            println!("OTM puts kept:       {}", aggregation.puts.len());
            println!(
                "Chain requests:      {} (series pass served from cache)\n",
                cached.inner().chain_requests()
            );

            print!("{}", render_text(&charts));
        }
        Err(e) => println!("Scan failed: {}", e),
    }
}
