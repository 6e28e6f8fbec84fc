//! Index Module
//!
//! Name → code mapping with approximate lookup.
//!
//! ## Responsibilities
//! - Exact name lookup (last writer wins per name)
//! - Reverse removal of every name mapped to a code
//! - Fuzzy lookup by weighted edit distance over Unicode scalar values
//!
//! Fuzzy lookup scans every entry; it is meant for small catalogs.

mod fuzzy;

pub use fuzzy::{weighted_distance, FuzzyIndex, DEFAULT_MAX_DISTANCE};
