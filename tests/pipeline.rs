//! End-to-end scan behaviour over in-memory market data

use chrono::NaiveDate;
use otm_flow::prelude::*;

fn d(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, month, day).unwrap()
}

/// A chain with strikes 80..=120 step 5 and volumes that vary by strike
fn busy_chain(expiry: NaiveDate, seed: u64) -> OptionChain {
    let mut chain = OptionChain::new("XYZ", expiry);
    for (i, strike) in (80..=120).step_by(5).enumerate() {
        let i = i as u64;
        let volume = (i * 37 + seed * 11) % 97;
        chain.add(OptionContract::call(strike as f64, volume, volume * 3, expiry));
        chain.add(OptionContract::put(strike as f64, (volume + 13) % 89, volume * 2, expiry));
    }
    chain
}

fn busy_source(expirations: usize) -> InMemoryMarketData {
    let mut source = InMemoryMarketData::new("XYZ").with_spot(100.0);
    for i in 0..expirations {
        let expiry = d(6, 1) + chrono::Duration::weeks(i as i64);
        source = source.with_chain(busy_chain(expiry, i as u64));
    }
    source
}

#[test]
fn expiration_count_is_min_of_seven_and_available() {
    for available in [1, 3, 7, 12] {
        let source = busy_source(available);
        let agg = aggregate(&source, "XYZ").unwrap();
        assert_eq!(agg.expirations.len(), available.min(7));
    }
}

#[test]
fn every_row_is_out_of_the_money() {
    let agg = aggregate(&busy_source(7), "XYZ").unwrap();

    assert!(agg.calls.rows().iter().all(|r| r.strike > agg.spot));
    assert!(agg.puts.rows().iter().all(|r| r.strike < agg.spot));
    assert!(agg.calls.rows().iter().all(|r| r.side == OptionSide::Call));
    assert!(agg.puts.rows().iter().all(|r| r.side == OptionSide::Put));
}

#[test]
fn at_most_five_ranked_rows_per_expiration() {
    let agg = aggregate(&busy_source(7), "XYZ").unwrap();

    for table in [&agg.calls, &agg.puts] {
        for &expiry in &agg.expirations {
            let rows = table.rows_for(expiry);
            assert!(rows.len() <= 5);
            assert!(rows.windows(2).all(|w| w[0].volume >= w[1].volume));
        }
        // Expirations appear in scan order
        let seen = table.expirations();
        let expected: Vec<NaiveDate> = agg
            .expirations
            .iter()
            .copied()
            .filter(|e| seen.contains(e))
            .collect();
        assert_eq!(seen, expected);
    }
}

#[test]
fn series_aligns_with_expirations() {
    let source = busy_source(9);
    let agg = aggregate(&source, "XYZ").unwrap();
    let series = build_expiration_series(&source, "XYZ", &agg.expirations).unwrap();

    assert_eq!(series.expirations(), agg.expirations);
}

#[test]
fn top_call_bars_is_idempotent() {
    let agg = aggregate(&busy_source(7), "XYZ").unwrap();
    assert_eq!(top_call_bars(&agg.calls, 5), top_call_bars(&agg.calls, 5));
    assert_eq!(top_call_bars(&agg.calls, 5).len(), 10);
}

#[test]
fn no_calls_above_spot_gives_empty_outputs() {
    let mut source = InMemoryMarketData::new("XYZ").with_spot(500.0);
    for week in 0..3 {
        source = source.with_chain(busy_chain(d(6, 7) + chrono::Duration::weeks(week), 1));
    }

    let (agg, charts) = run_scan(&source, "XYZ", &ScanConfig::default()).unwrap();

    assert!(agg.calls.is_empty());
    assert!(top_call_bars(&agg.calls, 5).is_empty());
    assert!(charts.call_bars.is_empty());
    assert!(charts.bubbles.is_empty());
    assert_eq!(charts.series.len(), 3);
}

#[test]
fn xyz_scenario() {
    let e1 = d(6, 21);
    let e2 = d(6, 28);
    let source = InMemoryMarketData::new("XYZ")
        .with_spot(100.0)
        .with_chain(OptionChain::new("XYZ", e1).with_calls(vec![
            OptionContract::call(95.0, 50, 0, e1),
            OptionContract::call(105.0, 30, 0, e1),
            OptionContract::call(110.0, 10, 0, e1),
        ]))
        .with_chain(OptionChain::new("XYZ", e2));

    let agg = aggregate(&source, "XYZ").unwrap();

    let selected: Vec<(f64, u64, NaiveDate)> = agg
        .calls
        .rows()
        .iter()
        .map(|r| (r.strike, r.volume, r.expiry))
        .collect();
    assert_eq!(selected, vec![(105.0, 30, e1), (110.0, 10, e1)]);
    assert_eq!(agg.expirations, vec![e1, e2]);
}

#[test]
fn fewer_than_five_otm_puts_are_kept_as_is() {
    let e1 = d(6, 21);
    let source = InMemoryMarketData::new("XYZ")
        .with_spot(100.0)
        .with_chain(OptionChain::new("XYZ", e1).with_puts(vec![
            OptionContract::put(90.0, 3, 0, e1),
            OptionContract::put(95.0, 8, 0, e1),
            OptionContract::put(100.0, 40, 0, e1),
            OptionContract::put(105.0, 60, 0, e1),
        ]));

    let agg = aggregate(&source, "XYZ").unwrap();
    let strikes: Vec<f64> = agg.puts.rows().iter().map(|r| r.strike).collect();
    assert_eq!(strikes, vec![95.0, 90.0]);
}

#[test]
fn third_chain_failure_discards_everything() {
    let source = InMemoryMarketData::new("XYZ")
        .with_spot(100.0)
        .with_chain(busy_chain(d(6, 7), 0))
        .with_chain(busy_chain(d(6, 14), 1))
        .with_failing_chain(d(6, 21), "HTTP 500")
        .with_chain(busy_chain(d(6, 28), 3));

    let result = run_scan(&source, "XYZ", &ScanConfig::default());

    match result {
        Err(OtmError::ChainFetch { expiry, .. }) => assert_eq!(expiry, d(6, 21)),
        other => panic!("expected ChainFetch, got {:?}", other.map(|_| ())),
    }
    // Stopped at the failing expiration
    assert_eq!(source.chain_requests(), 3);
}

#[test]
fn cached_source_serves_series_pass() {
    let cached = CachedMarketData::new(busy_source(9));
    let (agg, _) = run_scan(&cached, "XYZ", &ScanConfig::default()).unwrap();

    assert_eq!(cached.inner().chain_requests(), agg.expirations.len());
}
