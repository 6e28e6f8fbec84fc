//! Storage Module
//!
//! Durable storage for the record set: a snapshot plus an operation log.
//!
//! ## Responsibilities
//! - Own backing files through explicit open/close handles
//! - Hold the full record set in a snapshot rewritten on compaction
//! - Turn mutations into cheap log appends, amortising snapshot rewrites
//!
//! ## Snapshot Format
//! ```text
//! ITEM|Shirt,1001,Red,150
//! BRAND|Cotton Co,2001,80,89.99
//! BRAND|Plain,2002,70,79.5
//!
//! ITEM|"Jeans, slim",1002,Blue,75
//!
//! ```
//! Each item is followed by its brand lines and a blank separator line.

mod handle;
mod persister;
mod snapshot;

pub use handle::FileHandle;
pub use persister::Persister;
pub use snapshot::SnapshotStore;
