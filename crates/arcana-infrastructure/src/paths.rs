//! Unified path management for Arcana files.
//!
//! ```text
//! ~/.config/arcana/            # Config directory
//! └── config.toml              # Application configuration
//!
//! ~/.local/share/arcana/       # Data directory
//! ├── store.json               # Key-value store (session, wallet, transcripts)
//! └── logs/                    # Application logs
//!     └── arcana.log.YYYY-MM-DD
//! ```

use std::path::{Path, PathBuf};

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for arcana_core::ArcanaError {
    fn from(err: PathError) -> Self {
        arcana_core::ArcanaError::config(err.to_string())
    }
}

const APP_DIR: &str = "arcana";

/// Resolved configuration and data directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArcanaPaths {
    config_dir: PathBuf,
    data_dir: PathBuf,
}

impl ArcanaPaths {
    /// Platform directories (XDG on Linux, the usual locations elsewhere).
    ///
    /// # Returns
    ///
    /// - `Ok(ArcanaPaths)`: Both directories resolved
    /// - `Err(PathError::HomeDirNotFound)`: The platform gave no base directory
    pub fn resolve() -> Result<Self, PathError> {
        let config_dir = dirs::config_dir()
            .ok_or(PathError::HomeDirNotFound)?
            .join(APP_DIR);
        let data_dir = dirs::data_dir()
            .ok_or(PathError::HomeDirNotFound)?
            .join(APP_DIR);
        Ok(Self {
            config_dir,
            data_dir,
        })
    }

    /// Keeps everything under a single root (tests, portable installs).
    pub fn at(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            config_dir: root.join("config"),
            data_dir: root.join("data"),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    /// JSON file backing the key-value store.
    pub fn store_file(&self) -> PathBuf {
        self.data_dir.join("store.json")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}
