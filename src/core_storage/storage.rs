use crate::core_storage::error::StorageError;
use crate::core_storage::fat_time::FatDateTime;
use chrono::NaiveDateTime;
use std::io::{Read, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    Read,
    /// Create or truncate.
    Write,
    /// Create or append.
    Append,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
    pub size: u64,
    pub modified: FatDateTime,
}

/// An open file owned by the session. Dropping it closes it.
pub trait StorageFile: Read + Write {
    fn size(&self) -> Result<u64, StorageError>;
}

/// Directory cursor, advanced one entry at a time and closed on drop.
pub type DirCursor = Box<dyn Iterator<Item = DirEntry>>;

/// Filesystem capability interface used by the protocol engine.
///
/// Paths are canonical absolute names inside the served tree (leading '/',
/// no trailing '/' except for the root itself).
pub trait Storage {
    fn metadata(&self, path: &str) -> Result<DirEntry, StorageError>;
    fn remove(&mut self, path: &str) -> Result<(), StorageError>;
    fn mkdir(&mut self, path: &str) -> Result<(), StorageError>;
    fn rmdir(&mut self, path: &str) -> Result<(), StorageError>;
    fn rename(&mut self, from: &str, to: &str) -> Result<(), StorageError>;
    fn open(&mut self, path: &str, mode: OpenMode) -> Result<Box<dyn StorageFile>, StorageError>;
    fn open_dir(&mut self, path: &str) -> Result<DirCursor, StorageError>;
    fn set_modified(&mut self, path: &str, when: NaiveDateTime) -> Result<(), StorageError>;
    /// Free space in bytes.
    fn free_space(&self) -> Result<u64, StorageError>;
    /// Total capacity in bytes.
    fn capacity(&self) -> Result<u64, StorageError>;

    fn exists(&self, path: &str) -> bool {
        self.metadata(path).is_ok()
    }

    fn is_dir(&self, path: &str) -> bool {
        self.metadata(path).map(|m| m.is_dir).unwrap_or(false)
    }

    fn file_size(&self, path: &str) -> Result<u64, StorageError> {
        self.metadata(path).map(|m| m.size)
    }

    fn modified(&self, path: &str) -> Result<FatDateTime, StorageError> {
        self.metadata(path).map(|m| m.modified)
    }
}
