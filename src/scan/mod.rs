//! OTM scan: the aggregation pass
//!
//! For one ticker:
//! 1. Take the nearest expirations the provider lists (7 by default)
//! 2. Fetch the spot price once and reuse it for every expiration
//! 3. Keep OTM calls (strike > spot) and OTM puts (strike < spot)
//! 4. Rank each side by volume and keep the top 5 per expiration
//! 5. Concatenate per side into unified cross-expiration tables

mod aggregator;
mod config;
mod prompt;

pub use aggregator::*;
pub use config::*;
pub use prompt::*;
