//! # Countyq
//!
//! A batch interpreter for filtering and aggregating county demographic
//! data. An operations file drives the run: each line names one operation,
//! filters progressively narrow the in-memory working dataset, and
//! aggregates print totals, subtotals, and percentages to stdout.
//!
//! ## Usage
//!
//! ```bash
//! countyq operations.txt [--data counties.json]
//! ```
//!
//! ## Modules
//!
//! - `data` - County record model, JSON dataset loader, dotted field-path
//!   resolution
//! - `ops` - Parsing of operation lines into typed operations
//! - `interpreter` - Execution of operations against the working dataset

pub mod data;
pub mod interpreter;
pub mod ops;

pub use data::{load_counties, CountyRecord};
pub use interpreter::Interpreter;
pub use ops::{OpError, Operation};
