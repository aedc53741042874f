//! commercetools metrics core - shared types library.
//!
//! This crate provides the types used by the reporter and the CLI:
//! - [`TimeRange`] - validated half-open UTC interval
//! - [`MetricMode`] - the closed set of report categories
//! - [`CustomerEmail`] / [`EmailSet`] - customer identity for repeat detection
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. Interval generation is pure and lives here too.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod intervals;
pub mod types;

pub use intervals::generate_intervals;
pub use types::*;
