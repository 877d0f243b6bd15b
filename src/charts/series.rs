//! Per-expiration volume and open interest totals

use chrono::NaiveDate;

use crate::core::{ExpirationPoint, ExpirationSeries, OtmError, OtmResult};
use crate::data::MarketData;

/// Re-fetch every expiration's full chain and total its activity.
///
/// Uses the unfiltered call and put sets, so nothing dropped by the OTM
/// filter is missing from the sums. The result has one point per entry of
/// `expirations`, in the same order.
pub fn build_expiration_series<S: MarketData + ?Sized>(
    source: &S,
    ticker: &str,
    expirations: &[NaiveDate],
) -> OtmResult<ExpirationSeries> {
    let mut series = ExpirationSeries::default();

    for &expiry in expirations {
        let chain = source
            .option_chain(ticker, expiry)
            .map_err(|e| OtmError::chain_fetch(expiry, &e))?;

        series.push(ExpirationPoint::from_chain(&chain));
    }

    tracing::debug!("Built expiration series for {} ({} points)", ticker, series.len());
    Ok(series)
}
