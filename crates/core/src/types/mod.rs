//! Core types for the metrics reporter.
//!
//! Ranges, modes and customer identity. Everything here is transient and
//! built per run.

pub mod email;
pub mod mode;
pub mod range;

pub use email::{CustomerEmail, EmailError, EmailSet};
pub use mode::{MetricMode, ModeClass, ModeParseError};
pub use range::{RangeError, TimeRange, to_iso};
