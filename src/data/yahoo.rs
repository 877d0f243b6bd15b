//! Yahoo Finance data fetcher
//!
//! Fetches free options data for any listed ticker through Yahoo Finance's
//! unofficial JSON API.
//!
//! Note: This is for educational/research purposes. Yahoo Finance
//! data is delayed ~15 minutes and intended for personal use.

use chrono::{DateTime, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::core::{OptionChain, OptionContract, OptionSide, OtmError, OtmResult};

use super::source::MarketData;

/// Endpoints and client identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YahooConfig {
    /// Base for `/options/{symbol}`
    pub options_url: String,
    /// Base for `/chart/{symbol}`
    pub chart_url: String,
    pub user_agent: String,
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            options_url: "https://query1.finance.yahoo.com/v7/finance".to_string(),
            chart_url: "https://query1.finance.yahoo.com/v8/finance".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36"
                .to_string(),
        }
    }
}

/// Yahoo Finance API client
pub struct YahooClient {
    client: reqwest::blocking::Client,
    config: YahooConfig,
}

impl YahooClient {
    pub fn new() -> OtmResult<Self> {
        Self::with_config(YahooConfig::default())
    }

    pub fn with_config(config: YahooConfig) -> OtmResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| OtmError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str, what: &str) -> OtmResult<T> {
        tracing::debug!("GET {}", url);

        self.client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| OtmError::Network(e.to_string()))?
            .json()
            .map_err(|e| OtmError::Serialization(format!("Failed to parse {}: {}", what, e)))
    }

    fn options_result(&self, url: &str, symbol: &str) -> OtmResult<YahooOptionChainData> {
        let response: YahooOptionsResponse = self.get_json(url, "options")?;

        response
            .option_chain
            .result
            .into_iter()
            .next()
            .ok_or_else(|| OtmError::invalid_ticker(format!("no options listing for {}", symbol)))
    }

    /// Get the most recent daily close
    pub fn get_spot(&self, symbol: &str) -> OtmResult<f64> {
        let url = format!(
            "{}/chart/{}?range=1d&interval=1d",
            self.config.chart_url, symbol
        );

        let response: YahooChartResponse = self.get_json(&url, "chart")?;

        let result = response
            .chart
            .result
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| OtmError::data_unavailable(format!("no price history for {}", symbol)))?;

        let close = result
            .indicators
            .quote
            .iter()
            .flat_map(|q| q.close.iter().rev())
            .find_map(|c| *c)
            .or(result.meta.regular_market_price);

        match close {
            Some(price) if price.is_finite() && price > 0.0 => Ok(price),
            _ => Err(OtmError::data_unavailable(format!(
                "no recent trading price for {}",
                symbol
            ))),
        }
    }

    /// Get available option expiration dates
    pub fn get_expirations(&self, symbol: &str) -> OtmResult<Vec<NaiveDate>> {
        let url = format!("{}/options/{}", self.config.options_url, symbol);
        let chain = self.options_result(&url, symbol)?;

        let expiries: Vec<NaiveDate> = chain
            .expiration_dates
            .iter()
            .filter_map(|&ts| DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive()))
            .collect();

        Ok(expiries)
    }

    /// Get option chain for a specific expiration
    pub fn get_option_chain(&self, symbol: &str, expiry: NaiveDate) -> OtmResult<OptionChain> {
        // Yahoo keys expirations by midnight UTC
        let expiry_ts = expiry.and_time(NaiveTime::MIN).and_utc().timestamp();

        let url = format!(
            "{}/options/{}?date={}",
            self.config.options_url, symbol, expiry_ts
        );

        let chain_data = self.options_result(&url, symbol)?;
        let mut chain = OptionChain::new(symbol, expiry);

        if let Some(options) = chain_data.options.first() {
            for (rows, side) in [
                (&options.calls, OptionSide::Call),
                (&options.puts, OptionSide::Put),
            ] {
                for row in rows {
                    if let Some(contract) = convert_option_row(row, expiry, side) {
                        chain.add(contract);
                    }
                }
            }
        }

        tracing::debug!(
            "{} {}: {} calls, {} puts",
            symbol,
            expiry,
            chain.calls.len(),
            chain.puts.len()
        );

        Ok(chain)
    }
}

impl MarketData for YahooClient {
    fn list_expirations(&self, ticker: &str) -> OtmResult<Vec<NaiveDate>> {
        self.get_expirations(ticker)
    }

    fn spot_price(&self, ticker: &str) -> OtmResult<f64> {
        self.get_spot(ticker)
    }

    fn option_chain(&self, ticker: &str, expiry: NaiveDate) -> OtmResult<OptionChain> {
        self.get_option_chain(ticker, expiry)
    }

    fn name(&self) -> &'static str {
        "Yahoo"
    }
}

/// Convert a Yahoo row, dropping rows without a strike or with bad counts
fn convert_option_row(
    data: &YahooOptionData,
    expiry: NaiveDate,
    side: OptionSide,
) -> Option<OptionContract> {
    let strike = data.strike?;

    match OptionContract::try_new(strike, data.volume, data.open_interest, expiry, side) {
        Ok(contract) => Some(match &data.contract_symbol {
            Some(symbol) => contract.with_symbol(symbol.clone()),
            None => contract,
        }),
        Err(e) => {
            tracing::warn!("Rejected {} row: {}", side.label(), e);
            None
        }
    }
}

// Yahoo Finance API response structures

#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooChartData>>,
}

#[derive(Debug, Deserialize)]
struct YahooChartData {
    meta: YahooChartMeta,
    #[serde(default)]
    indicators: YahooIndicators,
}

#[derive(Debug, Deserialize)]
struct YahooChartMeta {
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct YahooIndicators {
    #[serde(default)]
    quote: Vec<YahooChartQuote>,
}

#[derive(Debug, Deserialize)]
struct YahooChartQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct YahooOptionsResponse {
    #[serde(rename = "optionChain")]
    option_chain: YahooOptionChain,
}

#[derive(Debug, Deserialize)]
struct YahooOptionChain {
    #[serde(default)]
    result: Vec<YahooOptionChainData>,
}

#[derive(Debug, Deserialize)]
struct YahooOptionChainData {
    #[serde(rename = "expirationDates", default)]
    expiration_dates: Vec<i64>,
    #[serde(default)]
    options: Vec<YahooOptions>,
}

#[derive(Debug, Deserialize)]
struct YahooOptions {
    #[serde(default)]
    calls: Vec<YahooOptionData>,
    #[serde(default)]
    puts: Vec<YahooOptionData>,
}

#[derive(Debug, Deserialize)]
struct YahooOptionData {
    #[serde(rename = "contractSymbol")]
    contract_symbol: Option<String>,
    strike: Option<f64>,
    volume: Option<i64>,
    #[serde(rename = "openInterest")]
    open_interest: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const OPTIONS_BODY: &str = r#"{
        "optionChain": {
            "result": [{
                "underlyingSymbol": "XYZ",
                "expirationDates": [1718928000, 1719532800],
                "options": [{
                    "expirationDate": 1718928000,
                    "calls": [
                        {"contractSymbol": "XYZ240621C00105000", "strike": 105.0, "volume": 30, "openInterest": 120},
                        {"contractSymbol": "XYZ240621C00110000", "strike": 110.0, "openInterest": 40},
                        {"contractSymbol": "XYZ240621C00115000", "strike": 115.0, "volume": -3, "openInterest": 1},
                        {"contractSymbol": "XYZ240621C00120000", "volume": 9}
                    ],
                    "puts": [
                        {"contractSymbol": "XYZ240621P00095000", "strike": 95.0, "volume": 12, "openInterest": 300}
                    ]
                }]
            }],
            "error": null
        }
    }"#;

    #[test]
    fn test_parse_options_response() {
        let response: YahooOptionsResponse = serde_json::from_str(OPTIONS_BODY).unwrap();
        let data = &response.option_chain.result[0];

        let expiries: Vec<NaiveDate> = data
            .expiration_dates
            .iter()
            .filter_map(|&ts| DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive()))
            .collect();

        assert_eq!(
            expiries,
            vec![
                NaiveDate::from_ymd_opt(2024, 6, 21).unwrap(),
                NaiveDate::from_ymd_opt(2024, 6, 28).unwrap(),
            ]
        );
    }

    #[test]
    fn test_convert_rows_rejects_malformed() {
        let response: YahooOptionsResponse = serde_json::from_str(OPTIONS_BODY).unwrap();
        let options = &response.option_chain.result[0].options[0];
        let expiry = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();

        let calls: Vec<OptionContract> = options
            .calls
            .iter()
            .filter_map(|row| convert_option_row(row, expiry, OptionSide::Call))
            .collect();

        // Negative volume and missing strike are both dropped
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].volume, 30);
        assert_eq!(calls[0].symbol.as_deref(), Some("XYZ240621C00105000"));
        // Missing volume counts as zero
        assert_eq!(calls[1].volume, 0);
        assert_eq!(calls[1].open_interest, 40);
    }

    #[test]
    fn test_parse_chart_response() {
        let body = r#"{
            "chart": {
                "result": [{
                    "meta": {"regularMarketPrice": 101.5},
                    "indicators": {"quote": [{"close": [null, 100.25]}]}
                }],
                "error": null
            }
        }"#;

        let response: YahooChartResponse = serde_json::from_str(body).unwrap();
        let results = response.chart.result.unwrap();
        let result = &results[0];
        let close = result.indicators.quote[0].close.iter().rev().find_map(|c| *c);

        assert_eq!(close, Some(100.25));
        assert_eq!(result.meta.regular_market_price, Some(101.5));
    }

    #[test]
    fn test_parse_unknown_symbol_chart() {
        let body = r#"{"chart": {"result": null, "error": {"code": "Not Found"}}}"#;
        let response: YahooChartResponse = serde_json::from_str(body).unwrap();
        assert!(response.chart.result.is_none());
    }

    #[test]
    #[ignore] // Requires network
    fn test_get_spot() {
        let client = YahooClient::new().unwrap();
        let spot = client.get_spot("SPY").unwrap();

        assert!(spot > 0.0);
        println!("SPY spot: {}", spot);
    }

    #[test]
    #[ignore] // Requires network
    fn test_get_option_chain() {
        let client = YahooClient::new().unwrap();
        let expiries = client.get_expirations("SPY").unwrap();

        if let Some(&expiry) = expiries.first() {
            let chain = client.get_option_chain("SPY", expiry).unwrap();

            println!(
                "Chain for {}: {} calls, {} puts",
                expiry,
                chain.calls.len(),
                chain.puts.len()
            );

            assert!(!chain.calls.is_empty());
            assert!(!chain.puts.is_empty());
        }
    }
}
