//! Snapshot Store
//!
//! Full-state file holding the authoritative record set as of the last
//! compaction. Always rewritten wholesale.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::record::codec;
use crate::record::Item;

use super::FileHandle;

/// Reads and rewrites the snapshot file
pub struct SnapshotStore {
    handle: FileHandle,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            handle: FileHandle::new(path),
        }
    }

    /// Read every record, in file order
    ///
    /// A missing file is created and reads as empty.
    pub fn read(&mut self) -> Result<Vec<Item>> {
        self.handle.open()?;
        let contents = self.handle.read_to_string();
        self.handle.close()?;

        codec::decode_items(&contents?)
    }

    /// Replace the snapshot with `items`
    ///
    /// Writes a sibling temporary file, syncs it, then renames it into place
    /// so a crash mid-write leaves the previous snapshot intact.
    pub fn write(&mut self, items: &[Item]) -> Result<()> {
        let contents = codec::encode_items(items);
        let tmp_path = self.tmp_path();

        {
            let mut tmp = File::create(&tmp_path)?;
            tmp.write_all(contents.as_bytes())?;
            tmp.sync_all()?;
        }
        fs::rename(&tmp_path, self.handle.path())?;

        tracing::debug!(
            path = %self.handle.path().display(),
            records = items.len(),
            bytes = contents.len(),
            "snapshot rewritten"
        );
        Ok(())
    }

    pub fn path(&self) -> &Path {
        self.handle.path()
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .handle
            .path()
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.handle.path().with_file_name(name)
    }
}
