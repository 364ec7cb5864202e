use crate::core_storage::error::StorageError;
use crate::core_storage::fat_time::FatDateTime;
use crate::core_storage::storage::{DirCursor, DirEntry, OpenMode, Storage, StorageFile};
use chrono::{DateTime, NaiveDateTime, Utc};
use filetime::{set_file_mtime, FileTime};
use log::{debug, warn};
use std::fs::{self, File, Metadata, OpenOptions};
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;
use sysinfo::{DiskExt, System, SystemExt};

/// Serves a directory of the local disk as the FTP root.
#[derive(Debug)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    /// Creates the root directory when it is missing.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        let shown = root.display().to_string();
        fs::create_dir_all(&root).map_err(|e| StorageError::io(&shown, e))?;
        let root = root
            .canonicalize()
            .map_err(|e| StorageError::io(&shown, e))?;
        debug!("Local storage rooted at {:?}", root);
        Ok(Self { root })
    }

    /// Maps a served path onto the disk. Only plain name segments are
    /// accepted, so the result always stays below the root.
    fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        let mut full = self.root.clone();
        for component in Path::new(path).components() {
            match component {
                Component::RootDir | Component::CurDir => {}
                Component::Normal(part) => full.push(part),
                Component::ParentDir | Component::Prefix(_) => {
                    warn!("Refusing path outside of the storage root: {}", path);
                    return Err(StorageError::OutsideRoot(path.to_string()));
                }
            }
        }
        Ok(full)
    }

    fn disk_space(&self) -> Result<(u64, u64), StorageError> {
        let mut sys = System::new();
        sys.refresh_disks_list();

        sys.disks()
            .iter()
            .filter(|disk| self.root.starts_with(disk.mount_point()))
            .max_by_key(|disk| disk.mount_point().as_os_str().len())
            .map(|disk| (disk.available_space(), disk.total_space()))
            .ok_or_else(|| StorageError::CapacityUnavailable(self.root.display().to_string()))
    }
}

fn to_fat_time(modified: std::io::Result<SystemTime>) -> FatDateTime {
    match modified {
        Ok(time) => FatDateTime::from_naive(&DateTime::<Utc>::from(time).naive_utc()),
        Err(_) => FatDateTime::EPOCH,
    }
}

fn entry_from_metadata(name: String, metadata: &Metadata) -> DirEntry {
    let is_dir = metadata.is_dir();
    DirEntry {
        name,
        is_dir,
        size: if is_dir { 0 } else { metadata.len() },
        modified: to_fat_time(metadata.modified()),
    }
}

impl StorageFile for File {
    fn size(&self) -> Result<u64, StorageError> {
        self.metadata()
            .map(|m| m.len())
            .map_err(|e| StorageError::io("<open file>", e))
    }
}

impl Storage for LocalStorage {
    fn metadata(&self, path: &str) -> Result<DirEntry, StorageError> {
        let full = self.resolve(path)?;
        let metadata = fs::metadata(&full).map_err(|e| StorageError::io(path, e))?;
        let name = full
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| String::from("/"));
        Ok(entry_from_metadata(name, &metadata))
    }

    fn remove(&mut self, path: &str) -> Result<(), StorageError> {
        let full = self.resolve(path)?;
        fs::remove_file(&full).map_err(|e| StorageError::io(path, e))
    }

    fn mkdir(&mut self, path: &str) -> Result<(), StorageError> {
        let full = self.resolve(path)?;
        fs::create_dir(&full).map_err(|e| StorageError::io(path, e))
    }

    fn rmdir(&mut self, path: &str) -> Result<(), StorageError> {
        let full = self.resolve(path)?;
        if full == self.root {
            return Err(StorageError::OutsideRoot(path.to_string()));
        }
        fs::remove_dir(&full).map_err(|e| StorageError::io(path, e))
    }

    fn rename(&mut self, from: &str, to: &str) -> Result<(), StorageError> {
        let source = self.resolve(from)?;
        let target = self.resolve(to)?;
        fs::rename(&source, &target).map_err(|e| StorageError::io(from, e))
    }

    fn open(&mut self, path: &str, mode: OpenMode) -> Result<Box<dyn StorageFile>, StorageError> {
        let full = self.resolve(path)?;
        let mut options = OpenOptions::new();
        match mode {
            OpenMode::Read => options.read(true),
            OpenMode::Write => options.write(true).create(true).truncate(true),
            OpenMode::Append => options.append(true).create(true),
        };
        let file = options.open(&full).map_err(|e| StorageError::io(path, e))?;
        if file
            .metadata()
            .map(|m| m.is_dir())
            .map_err(|e| StorageError::io(path, e))?
        {
            return Err(StorageError::NotFound(path.to_string()));
        }
        Ok(Box::new(file))
    }

    fn open_dir(&mut self, path: &str) -> Result<DirCursor, StorageError> {
        let full = self.resolve(path)?;
        if !full.is_dir() {
            return Err(StorageError::NotADirectory(path.to_string()));
        }
        let entries = fs::read_dir(&full).map_err(|e| StorageError::io(path, e))?;
        Ok(Box::new(entries.filter_map(|entry| {
            let entry = entry.ok()?;
            let metadata = entry.metadata().ok()?;
            Some(entry_from_metadata(
                entry.file_name().to_string_lossy().to_string(),
                &metadata,
            ))
        })))
    }

    fn set_modified(&mut self, path: &str, when: NaiveDateTime) -> Result<(), StorageError> {
        let full = self.resolve(path)?;
        let filetime = FileTime::from_unix_time(when.and_utc().timestamp(), 0);
        set_file_mtime(&full, filetime).map_err(|e| StorageError::io(path, e))
    }

    fn free_space(&self) -> Result<u64, StorageError> {
        self.disk_space().map(|(free, _)| free)
    }

    fn capacity(&self) -> Result<u64, StorageError> {
        self.disk_space().map(|(_, total)| total)
    }
}
