//! Operation log entry definitions
//!
//! Defines the operations that can be logged and the marker lines that
//! introduce them.

use crate::error::{Result, StoreError};
use crate::record::codec;
use crate::record::Item;

/// Marker line introducing a logged insert
pub const INSERT_MARKER: &str = "[insert]";

/// Marker line introducing a logged update
pub const UPDATE_MARKER: &str = "[update]";

/// Prefix of a delete line; the code follows with no separator
pub const DELETE_MARKER: &str = "[delete]";

/// Operations that can be logged
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operation<'a> {
    /// Append a new item
    Insert(&'a Item),

    /// Replace the item sharing this item's code
    Update(&'a Item),

    /// Remove every item with the given code
    Delete { code: i64 },
}

impl Operation<'_> {
    /// Encode as newline-terminated log text
    pub fn encode(&self) -> String {
        match self {
            Operation::Insert(item) => format!("{}\n{}", INSERT_MARKER, codec::encode_item(item)),
            Operation::Update(item) => format!("{}\n{}", UPDATE_MARKER, codec::encode_item(item)),
            Operation::Delete { code } => format!("{}{}\n", DELETE_MARKER, code),
        }
    }
}

/// A parsed marker line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Insert,
    Update,
    Delete { code: i64 },
}

impl Marker {
    /// Parse a marker line
    ///
    /// Returns `Ok(None)` for lines that are not markers at all and
    /// `LogCorruption` for bracketed lines that are not a known marker.
    pub fn parse(line: &str) -> Result<Option<Marker>> {
        if !is_marker_line(line) {
            return Ok(None);
        }

        let line = line.trim_end();
        if line == INSERT_MARKER {
            return Ok(Some(Marker::Insert));
        }
        if line == UPDATE_MARKER {
            return Ok(Some(Marker::Update));
        }
        if let Some(raw) = line.strip_prefix(DELETE_MARKER) {
            let code = raw.trim().parse().map_err(|_| {
                StoreError::LogCorruption(format!("invalid delete code {:?}", raw))
            })?;
            return Ok(Some(Marker::Delete { code }));
        }

        Err(StoreError::LogCorruption(format!("unknown operation marker {:?}", line)))
    }
}

/// Whether a logical line starts an operation
pub fn is_marker_line(line: &str) -> bool {
    line.starts_with('[')
}
