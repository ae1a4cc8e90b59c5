//! Atomic document files.
//!
//! Provides a thin layer for safe access to JSON and TOML documents: writes go
//! to a temporary sibling, are fsynced and then renamed over the target.

use serde::{Serialize, de::DeserializeOwned};
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use arcana_core::ArcanaError;

/// Errors that can occur during atomic file operations.
#[derive(Debug)]
pub enum AtomicFileError {
    /// File I/O error.
    IoError(std::io::Error),
    /// The document could not be parsed or rendered.
    FormatError { format: FileFormat, message: String },
    /// File locking error.
    LockError(String),
}

impl std::fmt::Display for AtomicFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AtomicFileError::IoError(e) => write!(f, "I/O error: {}", e),
            AtomicFileError::FormatError { format, message } => {
                write!(f, "{:?} format error: {}", format, message)
            }
            AtomicFileError::LockError(e) => write!(f, "Lock error: {}", e),
        }
    }
}

impl std::error::Error for AtomicFileError {}

impl From<std::io::Error> for AtomicFileError {
    fn from(e: std::io::Error) -> Self {
        AtomicFileError::IoError(e)
    }
}

impl From<AtomicFileError> for ArcanaError {
    fn from(err: AtomicFileError) -> Self {
        match err {
            AtomicFileError::IoError(e) => ArcanaError::from(e),
            AtomicFileError::FormatError { format, message } => ArcanaError::Serialization {
                format: format!("{:?}", format).to_uppercase(),
                message,
            },
            AtomicFileError::LockError(message) => ArcanaError::io(message),
        }
    }
}

/// On-disk encoding of an [`AtomicFile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Toml,
}

impl FileFormat {
    fn parse<T: DeserializeOwned>(&self, content: &str) -> Result<T, AtomicFileError> {
        match self {
            FileFormat::Json => serde_json::from_str(content).map_err(|e| self.error(e)),
            FileFormat::Toml => toml::from_str(content).map_err(|e| self.error(e)),
        }
    }

    fn render<T: Serialize>(&self, data: &T) -> Result<String, AtomicFileError> {
        match self {
            FileFormat::Json => serde_json::to_string_pretty(data).map_err(|e| self.error(e)),
            FileFormat::Toml => toml::to_string_pretty(data).map_err(|e| self.error(e)),
        }
    }

    fn error(&self, e: impl std::fmt::Display) -> AtomicFileError {
        AtomicFileError::FormatError {
            format: *self,
            message: e.to_string(),
        }
    }
}

/// A handle to a document file updated atomically.
///
/// Provides:
/// - **Atomicity**: Updates are all-or-nothing via tmp file + atomic rename
/// - **Isolation**: `save` holds an exclusive lock file for its duration
/// - **Durability**: Explicit fsync before rename
pub struct AtomicFile<T> {
    path: PathBuf,
    format: FileFormat,
    _phantom: PhantomData<T>,
}

impl<T> AtomicFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf, format: FileFormat) -> Self {
        Self {
            path,
            format,
            _phantom: PhantomData,
        }
    }

    pub fn json(path: PathBuf) -> Self {
        Self::new(path, FileFormat::Json)
    }

    pub fn toml(path: PathBuf) -> Self {
        Self::new(path, FileFormat::Toml)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and parses the file.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(T))`: Successfully loaded and parsed
    /// - `Ok(None)`: File doesn't exist or is empty
    /// - `Err`: Failed to read or parse the file
    pub fn load(&self) -> Result<Option<T>, AtomicFileError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;

        if content.trim().is_empty() {
            return Ok(None);
        }

        self.format.parse(&content).map(Some)
    }

    /// Writes `data` atomically while holding the exclusive lock file.
    ///
    /// Writers in other processes wait for the lock, so the shared temp
    /// sibling is never written by two of them at once.
    pub fn save(&self, data: &T) -> Result<(), AtomicFileError> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let rendered = self.format.render(data)?;

        let _lock = FileLock::acquire(&self.lock_path())?;
        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(rendered.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;

        Ok(())
    }

    pub fn lock_path(&self) -> PathBuf {
        self.path.with_extension("lock")
    }

    fn temp_path(&self) -> Result<PathBuf, AtomicFileError> {
        let invalid = |msg: &str| {
            AtomicFileError::IoError(std::io::Error::new(std::io::ErrorKind::InvalidInput, msg.to_string()))
        };
        let parent = self
            .path
            .parent()
            .ok_or_else(|| invalid("Path has no parent directory"))?;
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| invalid("Path has no file name"))?;

        Ok(parent.join(format!(".{}.tmp", file_name.to_string_lossy())))
    }
}

/// Exclusive advisory lock held until dropped.
///
/// The lock file stays on disk so every process locks the same inode.
struct FileLock {
    file: File,
}

impl FileLock {
    fn acquire(lock_path: &Path) -> Result<Self, AtomicFileError> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(lock_path)?;

        file.lock_exclusive()
            .map_err(|e| AtomicFileError::LockError(format!("Failed to acquire lock: {}", e)))?;

        Ok(FileLock { file })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::warn!(error = %e, "failed to release store lock");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Settings {
        name: String,
        count: u32,
    }

    #[test]
    fn test_toml_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicFile::<Settings>::toml(temp_dir.path().join("settings.toml"));

        file.save(&Settings {
            name: "luna".to_string(),
            count: 3,
        })
        .unwrap();

        let loaded = file.load().unwrap().unwrap();
        assert_eq!(loaded.name, "luna");
        assert_eq!(loaded.count, 3);
    }

    #[test]
    fn test_missing_and_empty_files_are_none() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");
        let file = AtomicFile::<BTreeMap<String, String>>::json(path.clone());
        assert!(file.load().unwrap().is_none());

        fs::write(&path, "  \n").unwrap();
        assert!(file.load().unwrap().is_none());
    }

    #[test]
    fn test_save_creates_parents_and_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("store.json");
        let file = AtomicFile::<BTreeMap<String, String>>::json(path.clone());

        let mut map = BTreeMap::new();
        map.insert("@app_language".to_string(), "zh".to_string());
        file.save(&map).unwrap();

        let loaded = file.load().unwrap().unwrap();
        assert_eq!(loaded.get("@app_language").map(String::as_str), Some("zh"));
        assert!(file.lock_path().exists());
        assert!(!temp_dir.path().join("nested").join(".store.json.tmp").exists());
    }

    #[test]
    fn test_concurrent_writers_never_interleave() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");

        let writers: Vec<_> = (0..8)
            .map(|writer| {
                let path = path.clone();
                std::thread::spawn(move || {
                    // Separate handles, as two processes would have.
                    let file = AtomicFile::<BTreeMap<String, String>>::json(path);
                    for round in 0..25 {
                        let map: BTreeMap<String, String> = (0..50)
                            .map(|i| (format!("key_{i}"), format!("{writer}-{round}")))
                            .collect();
                        file.save(&map).unwrap();
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }

        let loaded = AtomicFile::<BTreeMap<String, String>>::json(path)
            .load()
            .unwrap()
            .unwrap();
        assert_eq!(loaded.len(), 50);
        let first = loaded.get("key_0").unwrap();
        assert!(loaded.values().all(|v| v == first));
    }

    #[test]
    fn test_corrupt_file_maps_to_serialization_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");
        fs::write(&path, "{not json").unwrap();

        let file = AtomicFile::<BTreeMap<String, String>>::json(path);
        let err: ArcanaError = file.load().unwrap_err().into();
        assert!(matches!(err, ArcanaError::Serialization { ref format, .. } if format == "JSON"));
    }
}
