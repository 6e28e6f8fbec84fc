//! Operation Log Module
//!
//! Provides durability through an append-only log of pending mutations.
//!
//! ## Responsibilities
//! - Append an operation before any in-memory mutation
//! - Count pending operations to drive compaction
//! - Replay pending operations onto the snapshot's record list
//!
//! ## File Format
//! ```text
//! [insert]
//! ITEM|Shirt,1001,Red,150
//! BRAND|Cotton Co,2001,80,89.99
//! BRAND|Plain,2002,70,79.5
//! [update]
//! ITEM|Shirt,1001,Blue,150
//! [delete]1002
//! ```

mod entry;
mod log;
mod replay;

pub use entry::{is_marker_line, Marker, Operation, DELETE_MARKER, INSERT_MARKER, UPDATE_MARKER};
pub use log::OperationLog;
pub use replay::{replay, ReplayResult};
