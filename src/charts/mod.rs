//! Chart dataset builder
//!
//! Four views, all derived from already-fetched data:
//! - Expiration series: total call volume, put volume and open interest
//! - Call bars: top calls across all expirations, volume and open interest
//! - Bubbles: every selected call by expiration and strike, sized by volume
//! - Put bars: top puts across all expirations
//!
//! None of the builders fail on empty tables.

mod bars;
mod bubble;
mod report;
mod series;

pub use bars::*;
pub use bubble::*;
pub use report::*;
pub use series::*;
