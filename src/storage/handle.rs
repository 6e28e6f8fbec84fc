//! Scoped file handle
//!
//! Owns one readable/writable backing file. Opening and closing are
//! explicit: opening an open handle or touching a closed one fails without
//! side effects.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::{Result, StoreError};

/// Exclusive owner of a single backing file
#[derive(Debug)]
pub struct FileHandle {
    /// Backing file path
    path: PathBuf,
    /// Open file, `None` while closed
    file: Option<File>,
}

impl FileHandle {
    /// Create a closed handle for `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file: None,
        }
    }

    /// Open the file for reading and writing, creating it if missing
    ///
    /// Existing content is kept.
    pub fn open(&mut self) -> Result<()> {
        if self.file.is_some() {
            return Err(StoreError::FileAlreadyOpen(self.path.clone()));
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)?;

        self.file = Some(file);
        Ok(())
    }

    /// Release the file
    pub fn close(&mut self) -> Result<()> {
        match self.file.take() {
            Some(_) => Ok(()),
            None => Err(StoreError::FileClosed(self.path.clone())),
        }
    }

    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Move the cursor back to the start without reopening
    pub fn rewind(&mut self) -> Result<()> {
        self.file_mut()?.seek(SeekFrom::Start(0))?;
        Ok(())
    }

    /// Read the whole file; the cursor is left at the start
    pub fn read_to_string(&mut self) -> Result<String> {
        let file = self.file_mut()?;
        file.seek(SeekFrom::Start(0))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        file.seek(SeekFrom::Start(0))?;

        Ok(contents)
    }

    /// Append `text` at the end of the file and flush it to the OS
    pub fn append(&mut self, text: &str) -> Result<()> {
        let file = self.file_mut()?;
        file.seek(SeekFrom::End(0))?;
        file.write_all(text.as_bytes())?;
        file.flush()?;
        Ok(())
    }

    /// Discard all content
    pub fn truncate(&mut self) -> Result<()> {
        let file = self.file_mut()?;
        file.set_len(0)?;
        file.seek(SeekFrom::Start(0))?;
        Ok(())
    }

    /// Force file data to disk
    pub fn sync(&mut self) -> Result<()> {
        self.file_mut()?.sync_data()?;
        Ok(())
    }

    fn file_mut(&mut self) -> Result<&mut File> {
        match self.file.as_mut() {
            Some(file) => Ok(file),
            None => Err(StoreError::FileClosed(self.path.clone())),
        }
    }
}
