//! Option contract definitions
//!
//! One validated row per option instrument at one expiration.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::{OtmError, OtmResult};

/// Option side (Call or Put)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionSide {
    Call,
    Put,
}

impl OptionSide {
    /// Is a contract at `strike` out of the money with the underlying at `spot`?
    ///
    /// Calls are OTM strictly above spot, puts strictly below. A strike equal
    /// to spot is OTM for neither side.
    pub fn is_otm(&self, strike: f64, spot: f64) -> bool {
        match self {
            OptionSide::Call => strike > spot,
            OptionSide::Put => strike < spot,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OptionSide::Call => "call",
            OptionSide::Put => "put",
        }
    }
}

/// A single option row as observed at fetch time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionContract {
    /// Strike price
    pub strike: f64,
    /// Contracts traded in the session (absent volume is stored as 0)
    pub volume: u64,
    /// Outstanding contracts (absent open interest is stored as 0)
    pub open_interest: u64,
    /// Expiration date
    pub expiry: NaiveDate,
    /// Call or put
    pub side: OptionSide,
    /// Contract symbol (exchange-specific)
    pub symbol: Option<String>,
}

impl OptionContract {
    /// Build a contract from raw provider values.
    ///
    /// Rejects non-finite or non-positive strikes and negative counts.
    /// Missing counts become 0.
    pub fn try_new(
        strike: f64,
        volume: Option<i64>,
        open_interest: Option<i64>,
        expiry: NaiveDate,
        side: OptionSide,
    ) -> OtmResult<Self> {
        if !strike.is_finite() || strike <= 0.0 {
            return Err(OtmError::malformed_row(format!(
                "{} {} strike must be positive, got {}",
                expiry,
                side.label(),
                strike
            )));
        }

        Ok(Self {
            strike,
            volume: non_negative("volume", volume, strike)?,
            open_interest: non_negative("open interest", open_interest, strike)?,
            expiry,
            side,
            symbol: None,
        })
    }

    /// Shorthand for a call with known counts
    pub fn call(strike: f64, volume: u64, open_interest: u64, expiry: NaiveDate) -> Self {
        Self {
            strike,
            volume,
            open_interest,
            expiry,
            side: OptionSide::Call,
            symbol: None,
        }
    }

    /// Shorthand for a put with known counts
    pub fn put(strike: f64, volume: u64, open_interest: u64, expiry: NaiveDate) -> Self {
        Self {
            strike,
            volume,
            open_interest,
            expiry,
            side: OptionSide::Put,
            symbol: None,
        }
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    /// Is this option out of the money?
    pub fn is_otm(&self, spot: f64) -> bool {
        self.side.is_otm(self.strike, spot)
    }
}

fn non_negative(field: &str, value: Option<i64>, strike: f64) -> OtmResult<u64> {
    match value {
        None => Ok(0),
        Some(v) => u64::try_from(v).map_err(|_| {
            OtmError::malformed_row(format!("{} at strike {} is negative: {}", field, strike, v))
        }),
    }
}
