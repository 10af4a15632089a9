//! # fictus-csv
//!
//! The tabular record reader and writer for the mock-patient CSV tree.
//!
//! This crate owns everything file-format: the lazy delimited-row reader
//! with its malformed-row policy, the fixed per-entity header sets, and the
//! wide-layout CMAS converter. It knows nothing about randomization or the
//! remote API.

pub mod cmas;
pub mod reader;
pub mod tree;

pub use cmas::read_cmas;
pub use reader::{Row, RowReader, DEFAULT_DELIMITER};
pub use tree::RecordTree;
