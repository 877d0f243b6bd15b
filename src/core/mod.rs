//! Core data types for the OTM flow pipeline
//!
//! Defines fundamental types:
//! - OptionContract: strike, volume, open interest, expiry, side
//! - OptionChain / ExpirationSnapshot: one expiry's rows plus the run's spot
//! - OtmSelection / UnifiedTable: ranked OTM rows per side
//! - ExpirationSeries: per-expiry volume and open interest totals

pub mod chain;
pub mod error;
pub mod option;
pub mod table;

pub use chain::*;
pub use error::*;
pub use option::*;
pub use table::*;
