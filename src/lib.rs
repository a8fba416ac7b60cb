//! qpcr-optimizer - Exhaustive pairing search for qPCR condition groups
//!
//! Given a control (reference) group and condition groups of n labeled
//! measurements each, this library scores all n! sample-to-control pairings by
//! the sample standard deviation of `2^(-diff) * 100` and ranks them from most
//! to least consistent. Input collection, CSV/JSON/HTML export and the text
//! display sit around the pure, deterministic optimization core.

pub mod cli;
pub mod csv_output;
pub mod display;
pub mod error;
pub mod html_output;
pub mod input;
pub mod json_output;
pub mod labeled;
pub mod optimize;
pub mod report;

pub use error::{OptimizeError, Result};
