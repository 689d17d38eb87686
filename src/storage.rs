/// Snapshot backends: files and memory.
pub mod backend;
mod selection;
mod snapshot;

pub use backend::{FileStorage, MemoryStorage, SnapshotStorage, StorageError};
pub use selection::SelectionStore;
