//! OTM Flow CLI
//!
//! Prompts for a ticker, scans its nearest expirations on Yahoo Finance and
//! prints the four chart datasets as tables.

use std::io;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use otm_flow::prelude::*;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    println!("OTM Options Flow");
    println!("================\n");

    let ticker = prompt_ticker(&mut io::stdin().lock(), &mut io::stdout())?;

    let yahoo = CachedMarketData::new(YahooClient::new()?);
    let (_, charts) = run_scan(&yahoo, &ticker, &ScanConfig::default())
        .with_context(|| format!("scan of {} failed", ticker))?;

    println!();
    print!("{}", render_text(&charts));

    Ok(())
}
