//! Data fetching
//!
//! Handles:
//! - The market data trait every pipeline stage fetches through
//! - Yahoo Finance API for live chains and spot prices (free)
//! - In-memory chain caching for the length of one run

pub mod cache;
pub mod source;
pub mod yahoo;

pub use cache::*;
pub use source::*;
pub use yahoo::*;
