//! Local storage backends.

mod atomic_file;
mod file_kv_store;
mod memory_kv_store;

pub use atomic_file::{AtomicFile, AtomicFileError, FileFormat};
pub use file_kv_store::FileKeyValueStore;
pub use memory_kv_store::MemoryKeyValueStore;
