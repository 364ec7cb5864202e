// Filesystem capability interface and its local disk implementation
pub mod error;
pub mod fat_time;
pub mod local;
pub mod storage;

pub use error::StorageError;
pub use fat_time::FatDateTime;
pub use local::LocalStorage;
pub use storage::{DirCursor, DirEntry, OpenMode, Storage, StorageFile};
