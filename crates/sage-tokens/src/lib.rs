//! # sage-tokens
//!
//! Unit estimation and cost calculation for assistant usage.
//!
//! Sage never counts real tokens: every cost-bearing decision in the core
//! (compaction thresholds, daily spend tracking) runs on a cheap,
//! deterministic estimate. Callers must treat results as relative, not as
//! any vendor's real accounting.
//!
//! - [`estimate_units`] — text → approximate cost units
//! - [`estimate_cost`] — units → monetary estimate at the fixed rate
//! - [`format_cost`] / [`format_units`] — display helpers for UI layers

#![deny(unsafe_code)]

pub mod estimator;
pub mod pricing;

pub use estimator::{CHARS_PER_UNIT, estimate_units};
pub use pricing::{RATE_PER_1000_UNITS, estimate_cost, format_cost, format_units};
